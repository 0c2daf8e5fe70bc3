//! Code for storing and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::{Email, PasswordHash},
    name::Name,
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// The password hash is never serialized so that a `User` can be sent to the
/// client as is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user goes by.
    pub name: Name,
    /// The email address the user logs in with.
    pub email: Email,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns an [Error::DuplicateEmail] if the email is already registered, or
/// an [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    name: Name,
    email: Email,
    password_hash: PasswordHash,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        (
            name.as_ref(),
            email.as_ref(),
            password_hash.as_ref(),
            created_at,
        ),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name,
        email,
        password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if no user has registered with `email`.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", email.as_ref())], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the password hash for `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        name: Name::new_unchecked(&raw_name),
        email: Email::new_unchecked(&raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        Error,
        auth::{Email, PasswordHash, UserID},
        name::Name,
        test_utils::get_test_connection,
    };

    use super::{create_user, get_user_by_email, get_user_by_id, update_password};

    #[test]
    fn create_and_get_user() {
        let connection = get_test_connection();
        let user = create_user(
            Name::new_unchecked("Siti"),
            Email::new_unchecked("siti@example.com"),
            PasswordHash::new_unchecked("hash"),
            datetime!(2026-10-16 08:00 UTC),
            &connection,
        )
        .unwrap();

        assert_eq!(get_user_by_id(user.id, &connection), Ok(user.clone()));
        assert_eq!(
            get_user_by_email(&Email::new_unchecked("siti@example.com"), &connection),
            Ok(user)
        );
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let connection = get_test_connection();
        let email = Email::new_unchecked("siti@example.com");
        create_user(
            Name::new_unchecked("Siti"),
            email.clone(),
            PasswordHash::new_unchecked("hash"),
            datetime!(2026-10-16 08:00 UTC),
            &connection,
        )
        .unwrap();

        let result = create_user(
            Name::new_unchecked("Another Siti"),
            email,
            PasswordHash::new_unchecked("hash2"),
            datetime!(2026-10-16 09:00 UTC),
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_missing_user_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_password_replaces_hash() {
        let connection = get_test_connection();
        let user = create_user(
            Name::new_unchecked("Siti"),
            Email::new_unchecked("siti@example.com"),
            PasswordHash::new_unchecked("old"),
            datetime!(2026-10-16 08:00 UTC),
            &connection,
        )
        .unwrap();

        update_password(user.id, &PasswordHash::new_unchecked("new"), &connection).unwrap();

        let got = get_user_by_id(user.id, &connection).unwrap();
        assert_eq!(got.password_hash, PasswordHash::new_unchecked("new"));
    }

    #[test]
    fn update_password_for_missing_user_returns_not_found() {
        let connection = get_test_connection();

        let result = update_password(
            UserID::new(7),
            &PasswordHash::new_unchecked("new"),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn serialized_user_has_no_password_hash() {
        let connection = get_test_connection();
        let user = create_user(
            Name::new_unchecked("Siti"),
            Email::new_unchecked("siti@example.com"),
            PasswordHash::new_unchecked("secret-hash"),
            datetime!(2026-10-16 08:00 UTC),
            &connection,
        )
        .unwrap();

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "siti@example.com");
        assert_eq!(json["created_at"], "2026-10-16T08:00:00Z");
        assert!(json.get("password_hash").is_none());
    }
}
