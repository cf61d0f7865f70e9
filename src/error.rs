// ⚠️ Directory errors - every failure a visitor can trigger
//
// Display strings double as the user-facing messages. None of these are
// fatal: the caller shows the message and the state stays untouched.

use thiserror::Error;

/// Which kind of session an operation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Vendor,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Member => "member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of the persistence substrate itself (not a parse failure)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Username already exists.")]
    DuplicateUsername,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Please log in as a {0} first.")]
    NotLoggedIn(Role),

    #[error("Vendor is already saved in your favourites.")]
    AlreadySaved,

    #[error("Please fill out the {0} field.")]
    MissingField(&'static str),

    #[error("Rating must be between 1 and 5 stars, got {0}.")]
    InvalidRating(i64),

    #[error("No vendor named {0:?} in the directory.")]
    UnknownVendor(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = DirectoryError> = std::result::Result<T, E>;

/// Trim a raw form field and fail with `MissingField` when nothing is left
pub fn required(field: &'static str, raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DirectoryError::MissingField(field));
    }
    Ok(value.to_string())
}
