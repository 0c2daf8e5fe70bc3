//! Core category domain types and the duplicate name check.

use serde::{Deserialize, Serialize};

use crate::{auth::UserID, database_id::DatabaseId, name::Name, text_enum::text_enum};

text_enum! {
    /// Whether money came in or went out.
    ///
    /// Used for both categories and transactions.
    pub enum TransactionKind {
        /// Money received, e.g. a salary.
        Income => "income",
        /// Money spent, e.g. groceries.
        Expense => "expense",
    }
}

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A user defined label for income or expenses (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserID,
    pub name: Name,
    pub kind: TransactionKind,
    /// An icon name hint for clients.
    pub icon: Option<String>,
    /// A colour hint for clients, e.g. "#f97316".
    pub color: Option<String>,
}

/// The fields of a category that the user supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: Name,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Request body for creating and updating categories.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TryFrom<CategoryForm> for NewCategory {
    type Error = crate::Error;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: Name::new(&form.name)?,
            kind: form.kind,
            icon: non_blank(form.icon),
            color: non_blank(form.color),
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Find a category in `existing` that `name` would clash with.
///
/// Names clash when they are equal ignoring letter case and belong to the
/// same kind, so "Food" can exist once for income and once for expenses.
/// The category with the ID `exclude` is skipped, which lets a category be
/// saved under its own name.
pub fn find_duplicate<'a>(
    existing: &'a [Category],
    name: &Name,
    kind: TransactionKind,
    exclude: Option<CategoryId>,
) -> Option<&'a Category> {
    let key = name.comparison_key();

    existing.iter().find(|category| {
        Some(category.id) != exclude
            && category.kind == kind
            && category.name.comparison_key() == key
    })
}

/// The categories offered to new users: name, kind, icon and colour.
pub const DEFAULT_CATEGORIES: &[(&str, TransactionKind, &str, &str)] = &[
    ("Gaji", TransactionKind::Income, "briefcase", "#16a34a"),
    ("Bonus", TransactionKind::Income, "sparkles", "#22c55e"),
    ("Investasi", TransactionKind::Income, "trending-up", "#0d9488"),
    ("Hadiah", TransactionKind::Income, "gift", "#84cc16"),
    ("Lainnya", TransactionKind::Income, "ellipsis", "#6b7280"),
    ("Makan & Minum", TransactionKind::Expense, "utensils", "#f97316"),
    ("Transportasi", TransactionKind::Expense, "car", "#3b82f6"),
    ("Belanja", TransactionKind::Expense, "shopping-bag", "#ec4899"),
    ("Tagihan", TransactionKind::Expense, "receipt", "#ef4444"),
    ("Hiburan", TransactionKind::Expense, "film", "#a855f7"),
    ("Kesehatan", TransactionKind::Expense, "heart-pulse", "#14b8a6"),
    ("Pendidikan", TransactionKind::Expense, "graduation-cap", "#6366f1"),
    ("Lainnya", TransactionKind::Expense, "ellipsis", "#6b7280"),
];

#[cfg(test)]
mod find_duplicate_tests {
    use crate::{auth::UserID, name::Name};

    use super::{Category, TransactionKind, find_duplicate};

    fn category(id: i64, name: &str, kind: TransactionKind) -> Category {
        Category {
            id,
            user_id: UserID::new(1),
            name: Name::new_unchecked(name),
            kind,
            icon: None,
            color: None,
        }
    }

    #[test]
    fn matches_ignoring_case() {
        let existing = vec![category(1, "Makan", TransactionKind::Expense)];

        let duplicate = find_duplicate(
            &existing,
            &Name::new("  mAKAN ").unwrap(),
            TransactionKind::Expense,
            None,
        );

        assert_eq!(duplicate, Some(&existing[0]));
    }

    #[test]
    fn same_name_with_other_kind_is_allowed() {
        let existing = vec![category(1, "Lainnya", TransactionKind::Income)];

        let duplicate = find_duplicate(
            &existing,
            &Name::new_unchecked("Lainnya"),
            TransactionKind::Expense,
            None,
        );

        assert_eq!(duplicate, None);
    }

    #[test]
    fn excluded_category_does_not_clash_with_itself() {
        let existing = vec![
            category(1, "Makan", TransactionKind::Expense),
            category(2, "Transport", TransactionKind::Expense),
        ];

        assert_eq!(
            find_duplicate(
                &existing,
                &Name::new_unchecked("makan"),
                TransactionKind::Expense,
                Some(1)
            ),
            None
        );
        assert_eq!(
            find_duplicate(
                &existing,
                &Name::new_unchecked("makan"),
                TransactionKind::Expense,
                Some(2)
            ),
            Some(&existing[0])
        );
    }

    #[test]
    fn kind_parses_from_text() {
        assert_eq!("income".parse(), Ok(TransactionKind::Income));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
