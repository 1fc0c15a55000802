// src/models/contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Message left through the contact form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1))]
    pub message: String,
}

/// Filter of the admin message list
#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// Admin "mark selected as read" action
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_validation() {
        let ok = CreateContactRequest {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: "Hello".into(),
            message: "Great site".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateContactRequest {
            email: "ana-at-example".into(),
            ..ok.clone()
        };
        assert!(bad.validate().is_err());

        let empty = CreateContactRequest {
            message: String::new(),
            ..ok
        };
        assert!(empty.validate().is_err());
    }
}
