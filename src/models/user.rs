use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of an account. Identity fields are immutable after
/// registration; only the credential can be rotated.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// Usernames are 3-20 characters of letters, digits, and underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let ok_len = (3..=20).contains(&username.len());
    let ok_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if ok_len && ok_chars {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message = Some(
            "Username must be 3-20 characters and contain only letters, numbers, and underscores"
                .into(),
        );
        Err(err)
    }
}
