//! Category creation endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    auth::UserID,
    category::{
        Category, CategoryForm, DEFAULT_CATEGORIES, NewCategory, add_default_categories,
        create_category,
    },
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category creation, responding with the new category and 201.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let new_category = NewCategory::try_from(form)?;
    let connection = lock_connection(&state.db_connection)?;

    let category = create_category(user_id, new_category, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Give the user the default set of categories, skipping any they already
/// have. Responds with the categories that were created.
pub async fn create_default_categories_endpoint(
    State(state): State<CreateCategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<(StatusCode, Json<Vec<Category>>), Error> {
    let connection = lock_connection(&state.db_connection)?;

    let created = add_default_categories(user_id, DEFAULT_CATEGORIES, &connection)?;
    tracing::info!(
        "Added {} default categories for user {user_id}",
        created.len()
    );

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode};

    use crate::{
        Error,
        auth::User,
        category::{CategoryForm, DEFAULT_CATEGORIES, TransactionKind, get_categories},
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{
        CreateCategoryState, create_category_endpoint, create_default_categories_endpoint,
    };

    fn get_state() -> (CreateCategoryState, User) {
        let connection = get_test_connection();
        let user = create_test_user(&connection);

        (
            CreateCategoryState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user,
        )
    }

    fn form(name: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_owned(),
            kind: TransactionKind::Expense,
            icon: Some("  ".to_owned()),
            color: Some(" #f97316 ".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_category() {
        let (state, user) = get_state();

        let (status, Json(category)) =
            create_category_endpoint(State(state), Extension(user.id), Json(form(" Makan ")))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(category.name.as_ref(), "Makan");
        assert_eq!(category.icon, None);
        assert_eq!(category.color.as_deref(), Some("#f97316"));
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let (state, user) = get_state();

        let result =
            create_category_endpoint(State(state), Extension(user.id), Json(form(" "))).await;

        assert_eq!(result.unwrap_err(), Error::EmptyName);
    }

    #[tokio::test]
    async fn create_category_fails_on_duplicate_name() {
        let (state, user) = get_state();
        create_category_endpoint(
            State(state.clone()),
            Extension(user.id),
            Json(form("Makan")),
        )
        .await
        .unwrap();

        let result =
            create_category_endpoint(State(state), Extension(user.id), Json(form("makan "))).await;

        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateCategoryName("makan".to_owned())
        );
    }

    #[tokio::test]
    async fn default_categories_are_added_once() {
        let (state, user) = get_state();

        let (_, Json(created)) =
            create_default_categories_endpoint(State(state.clone()), Extension(user.id))
                .await
                .unwrap();
        let (_, Json(created_again)) =
            create_default_categories_endpoint(State(state.clone()), Extension(user.id))
                .await
                .unwrap();

        assert_eq!(created.len(), DEFAULT_CATEGORIES.len());
        assert!(created_again.is_empty());
        let stored = get_categories(user.id, None, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored.len(), DEFAULT_CATEGORIES.len());
    }
}
