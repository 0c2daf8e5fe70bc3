//! Categories label transactions as a kind of income or expense.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{create_category_endpoint, create_default_categories_endpoint};
pub use db::{
    add_default_categories, create_category, delete_category, get_categories, get_category,
    update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryForm, CategoryId, DEFAULT_CATEGORIES, NewCategory, TransactionKind,
    find_duplicate,
};
pub use edit::update_category_endpoint;
pub use list::{get_category_endpoint, list_categories_endpoint};
