// src/models/user.rs
// DOCUMENTATION: Accounts, profiles, and sessions
// PURPOSE: Registration/login forms and the profile page payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{media_url, RatingResponse};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

/// Extended profile, one per user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub avatar_path: Option<String>,
    pub bio: String,
    pub location: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Logged-in caller resolved from a session token
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub profile: UserProfile,
    pub token: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_password_confirmation"))]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_username")]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    pub password_confirm: String,
}

/// Letters, digits and @ . + - _ only
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_characters"))
    }
}

fn validate_password_confirmation(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.password == req.password_confirm {
        Ok(())
    } else {
        Err(ValidationError::new("password_mismatch"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

/// Edit-profile form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub avatar_url: Option<String>,
    pub bio: String,
    pub location: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: String,
    pub updated_at: DateTime<Utc>,
    /// The user's ratings, newest first
    pub ratings: Vec<RatingResponse>,
}

impl User {
    pub fn to_response(&self, is_admin: bool) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin,
            date_joined: self.date_joined,
        }
    }
}

impl UserProfile {
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar_path.as_deref().map(media_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: "ana@example.com".into(),
            password: password.into(),
            password_confirm: confirm.into(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(register("ana.silva", "correct horse", "correct horse")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        assert!(register("ana", "correct horse", "correct house")
            .validate()
            .is_err());
    }

    #[test]
    fn test_short_password() {
        assert!(register("ana", "short", "short").validate().is_err());
    }

    #[test]
    fn test_username_characters() {
        assert!(register("ana silva", "correct horse", "correct horse")
            .validate()
            .is_err());
        assert!(register("ana+test@x", "correct horse", "correct horse")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_profile_lengths() {
        let req = UpdateProfileRequest {
            phone: Some("0".repeat(21)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
