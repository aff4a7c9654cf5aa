//! Code for creating the user table and storing and fetching users from the database.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{
    Error, PasswordHash, Timestamps,
    db::{CreateTable, MapRow},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, ToSchema)]
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
/// The password hash is never included when a user is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address, in lower case.
    pub email: String,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// When the user registered and last changed their profile.
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Handles the creation and retrieval of [User]s.
pub trait UserStore {
    /// Create a new user with no name.
    ///
    /// The email is stored in lower case.
    fn create(&mut self, email: &EmailAddress, password_hash: PasswordHash)
    -> Result<User, Error>;

    /// Get a user by their ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email, ignoring case.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Replace the names of the user that has both the given `id` and `email`.
    ///
    /// Returns `Ok(None)` if no user matches both.
    fn update_profile(
        &mut self,
        id: UserID,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<User>, Error>;

    /// Replace the password hash of the user with `id`.
    fn update_password_hash(&mut self, id: UserID, password_hash: &PasswordHash)
    -> Result<(), Error>;

    /// Get the number of users.
    fn count(&self) -> Result<usize, Error>;
}

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, created_at, updated_at";

/// Emails are stored and looked up in lower case.
///
/// `COLLATE NOCASE` on the email column only folds ASCII letters, so every
/// query folds the email first to match addresses with non-ASCII letters.
fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if the email is already in use regardless of case,
    /// [Error::DatabaseLockError] if the database lock is poisoned or [Error::SqlError] if an
    /// SQL related error occurred.
    fn create(
        &mut self,
        email: &EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let now = OffsetDateTime::now_utc();

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "INSERT INTO user (email, password, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)
                RETURNING {USER_COLUMNS}"
            ))?
            .query_row(
                (normalize_email(email.as_str()), password_hash.as_ref(), now),
                SQLiteUserStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Get the user from the database that has the specified `id`, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified id or [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified email or [Error::SqlError] there are SQL related errors.
    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM user WHERE email = :email"
            ))?
            .query_row(
                &[(":email", &normalize_email(email))],
                SQLiteUserStore::map_row,
            )
            .map_err(|e| e.into())
    }

    fn update_profile(
        &mut self,
        id: UserID,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<User>, Error> {
        let now = OffsetDateTime::now_utc();

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "UPDATE user SET first_name = ?1, last_name = ?2, updated_at = ?3
                WHERE id = ?4 AND email = ?5
                RETURNING {USER_COLUMNS}"
            ))?
            .query_row(
                (
                    first_name,
                    last_name,
                    now,
                    id.as_i64(),
                    normalize_email(email),
                ),
                SQLiteUserStore::map_row,
            )
            .optional()
            .map_err(|error| error.into())
    }

    fn update_password_hash(
        &mut self,
        id: UserID,
        password_hash: &PasswordHash,
    ) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "UPDATE user SET password = ?1 WHERE id = ?2",
                (password_hash.as_ref(), id.as_i64()),
            )?;

        match rows_affected {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    password TEXT NOT NULL,
                    first_name TEXT,
                    last_name TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_password_hash: String = row.get(offset + 2)?;

        Ok(User {
            id: UserID::new(row.get(offset)?),
            email: row.get(offset + 1)?,
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            first_name: row.get(offset + 3)?,
            last_name: row.get(offset + 4)?,
            timestamps: Timestamps {
                created_at: row.get(offset + 5)?,
                updated_at: row.get(offset + 6)?,
            },
        })
    }
}

#[cfg(test)]
mod user_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{PasswordHash, db::initialize};

    use super::{Error, SQLiteUserStore, UserID, UserStore};

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn insert_user_succeeds() {
        let mut store = get_store();

        let email = EmailAddress::from_str("hello@world.com").unwrap();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = store.create(&email, password_hash.clone()).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "hello@world.com");
        assert_eq!(inserted_user.password_hash, password_hash);
        assert_eq!(inserted_user.first_name, None);
        assert_eq!(inserted_user.last_name, None);
        assert_eq!(
            inserted_user.timestamps.created_at,
            inserted_user.timestamps.updated_at
        );
    }

    #[test]
    fn insert_user_stores_lower_case_email() {
        let mut store = get_store();

        let email = EmailAddress::from_str("Hello@World.com").unwrap();

        let inserted_user = store
            .create(&email, PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        assert_eq!(inserted_user.email, "hello@world.com");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let mut store = get_store();

        let email = EmailAddress::from_str("hello@world.com").unwrap();

        assert!(
            store
                .create(&email, PasswordHash::new_unchecked("hunter2"))
                .is_ok()
        );

        assert_eq!(
            store.create(&email, PasswordHash::new_unchecked("hunter3")),
            Err(Error::DuplicateEmail)
        );
        assert_eq!(store.count(), Ok(1));
    }

    #[test]
    fn insert_user_fails_on_duplicate_email_with_different_case() {
        let mut store = get_store();

        store
            .create(
                &EmailAddress::from_str("foo@example.com").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        // Bypass the lower casing to check the column constraint itself.
        let result = store.connection.lock().unwrap().execute(
            "INSERT INTO user (email, password, created_at, updated_at) VALUES ('FOO@EXAMPLE.COM', 'x', 'now', 'now')",
            (),
        );

        assert_eq!(result.map_err(Error::from), Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        let id = UserID::new(42);

        assert_eq!(store.get(id), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let mut store = get_store();

        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let retrieved_user = store.get(test_user.id).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_fails_with_non_existent_email() {
        let store = get_store();

        // This email is not in the database.
        assert_eq!(
            store.get_by_email("notavalidemail@foo.bar"),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let mut store = get_store();

        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let retrieved_user = store.get_by_email("FOO@Bar.baz").unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_profile_sets_names_and_updated_at() {
        let mut store = get_store();
        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let updated_user = store
            .update_profile(test_user.id, "foo@bar.baz", Some("Jane"), Some("Doe"))
            .unwrap()
            .expect("user should match id and email");

        assert_eq!(updated_user.id, test_user.id);
        assert_eq!(updated_user.first_name.as_deref(), Some("Jane"));
        assert_eq!(updated_user.last_name.as_deref(), Some("Doe"));
        assert_eq!(updated_user.password_hash, test_user.password_hash);
        assert_eq!(
            updated_user.timestamps.created_at,
            test_user.timestamps.created_at
        );
        assert!(updated_user.timestamps.updated_at >= test_user.timestamps.updated_at);
        assert_eq!(store.get(test_user.id), Ok(updated_user));
    }

    #[test]
    fn non_ascii_email_is_found_in_any_case() {
        let mut store = get_store();
        let test_user = store
            .create(
                &EmailAddress::from_str("Ärger@example.com").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        assert_eq!(test_user.email, "ärger@example.com");
        assert_eq!(store.get_by_email("Ärger@example.com"), Ok(test_user.clone()));
        assert_eq!(store.get_by_email("ÄRGER@EXAMPLE.COM"), Ok(test_user.clone()));
        assert!(matches!(
            store.update_profile(test_user.id, "ÄRGER@example.com", Some("Jane"), None),
            Ok(Some(_))
        ));
    }

    #[test]
    fn update_profile_with_mismatched_email_is_no_op() {
        let mut store = get_store();
        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let result = store.update_profile(test_user.id, "other@bar.baz", Some("Jane"), None);

        assert_eq!(result, Ok(None));
        assert_eq!(store.get(test_user.id), Ok(test_user));
    }

    #[test]
    fn update_profile_with_unknown_id_is_no_op() {
        let mut store = get_store();

        let result = store.update_profile(UserID::new(42), "foo@bar.baz", Some("Jane"), None);

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn update_password_hash_replaces_hash() {
        let mut store = get_store();
        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        store.update_password_hash(test_user.id, &new_hash).unwrap();

        assert_eq!(store.get(test_user.id).unwrap().password_hash, new_hash);
    }

    #[test]
    fn update_password_hash_fails_with_unknown_id() {
        let mut store = get_store();

        let result = store.update_password_hash(UserID::new(42), &PasswordHash::new_unchecked("x"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn serialized_user_omits_password_hash() {
        let mut store = get_store();
        let test_user = store
            .create(
                &EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        let json = serde_json::to_value(&test_user).unwrap();

        assert_eq!(json["email"], "foo@bar.baz");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("firstName").is_some());
    }
}
