//! Database operations for categories.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, params};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, NewCategory, TransactionKind, find_duplicate},
    name::Name,
};

const SELECT_COLUMNS: &str = "SELECT id, user_id, name, kind, icon, color FROM category";

/// Create a category for `user_id` and return it with its generated ID.
///
/// The user's existing categories are checked for a clashing name first.
///
/// # Errors
///
/// Returns an [Error::DuplicateCategoryName] if the user already has a
/// category of the same kind with the same name, ignoring case.
pub fn create_category(
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let existing = get_categories(user_id, None, connection)?;

    if find_duplicate(&existing, &category.name, category.kind, None).is_some() {
        return Err(Error::DuplicateCategoryName(category.name.to_string()));
    }

    insert_category(user_id, category, connection)
}

fn insert_category(
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name, kind, icon, color) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id.as_i64(),
                category.name.as_ref(),
                category.kind,
                category.icon,
                category.color
            ],
        )
        .map_err(|error| map_unique_error(error, &category.name))?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        name: category.name,
        kind: category.kind,
        icon: category.icon,
        color: category.color,
    })
}

/// Retrieve a single category owned by `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// someone else.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE id = :id AND user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's categories ordered by kind and then name, optionally
/// only those of `kind`.
pub fn get_categories(
    user_id: UserID,
    kind: Option<TransactionKind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 AND (?2 IS NULL OR kind = ?2)
             ORDER BY kind ASC, name COLLATE NOCASE ASC"
        ))?
        .query_map(params![user_id.as_i64(), kind], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace the fields of a category.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// someone else, or an [Error::DuplicateCategoryName] if the new name clashes
/// with another of the user's categories.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    let existing = get_categories(user_id, None, connection)?;

    if !existing.iter().any(|c| c.id == category_id) {
        return Err(Error::NotFound);
    }

    if find_duplicate(&existing, &category.name, category.kind, Some(category_id)).is_some() {
        return Err(Error::DuplicateCategoryName(category.name.to_string()));
    }

    connection
        .execute(
            "UPDATE category SET name = ?1, kind = ?2, icon = ?3, color = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                category.name.as_ref(),
                category.kind,
                category.icon,
                category.color,
                category_id,
                user_id.as_i64()
            ],
        )
        .map_err(|error| map_unique_error(error, &category.name))?;

    Ok(Category {
        id: category_id,
        user_id,
        name: category.name,
        kind: category.kind,
        icon: category.icon,
        color: category.color,
    })
}

/// Delete a category.
///
/// Transactions in the category are kept and become uncategorised. Budgets
/// for the category are deleted.
///
/// # Errors
///
/// Returns an [Error::NotFound] if the category does not exist or belongs to
/// someone else.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        params![category_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Add the categories in `defaults` that the user does not already have.
///
/// All inserts happen in one SQL transaction. Returns the categories that
/// were created.
pub fn add_default_categories(
    user_id: UserID,
    defaults: &[(&str, TransactionKind, &str, &str)],
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Deferred)?;
    let mut existing = get_categories(user_id, None, &transaction)?;
    let mut created = Vec::new();

    for (name, kind, icon, color) in defaults {
        let name = Name::new(name)?;

        if find_duplicate(&existing, &name, *kind, None).is_some() {
            continue;
        }

        let category = insert_category(
            user_id,
            NewCategory {
                name,
                kind: *kind,
                icon: Some((*icon).to_owned()),
                color: Some((*color).to_owned()),
            },
            &transaction,
        )?;
        existing.push(category.clone());
        created.push(category);
    }

    transaction.commit()?;

    Ok(created)
}

fn map_unique_error(error: rusqlite::Error, name: &Name) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, _)
            if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateCategoryName(name.to_string())
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: Name::new_unchecked(&raw_name),
        kind: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
    })
}
