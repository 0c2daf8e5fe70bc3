use rusqlite::Connection;
use time::macros::datetime;

use crate::{
    AppState, PaginationConfig,
    auth::{Email, PasswordHash, User, ValidatedPassword, create_user},
    db::initialize,
    name::Name,
};

/// The password of the user made by [create_test_user].
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

/// The lowest cost bcrypt accepts, keeps tests fast.
const TEST_HASH_COST: u32 = 4;

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

pub(crate) fn create_test_user(connection: &Connection) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .expect("Could not hash password");

    create_user(
        Name::new_unchecked("Budi Santoso"),
        Email::new_unchecked("budi@example.com"),
        password_hash,
        datetime!(2026-01-05 09:30 UTC),
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    let mut state = AppState::new(
        connection,
        "aprettylongandsecuresecretfortests",
        "Asia/Jakarta",
        PaginationConfig::default(),
    )
    .expect("Could not create app state");
    state.password_hash_cost = TEST_HASH_COST;

    state
}
