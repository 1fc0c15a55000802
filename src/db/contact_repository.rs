// src/db/contact_repository.rs

use crate::errors::VenueError;
use crate::models::{ContactMessage, CreateContactRequest};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ContactRepository;

impl ContactRepository {
    /// Store a message as unread
    pub async fn create(
        pool: &PgPool,
        req: &CreateContactRequest,
    ) -> Result<ContactMessage, VenueError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(req.subject.trim())
        .bind(req.message.trim())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to store contact message: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        log::info!("Contact message {} received from {}", message.id, message.email);
        Ok(message)
    }

    /// Newest first
    pub async fn list(pool: &PgPool, unread_only: bool) -> Result<Vec<ContactMessage>, VenueError> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT * FROM contact_messages
            WHERE NOT $1 OR is_read = FALSE
            ORDER BY created_at DESC
            "#,
        )
        .bind(unread_only)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list contact messages: {}", e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    pub async fn mark_read(pool: &PgPool, ids: &[Uuid]) -> Result<u64, VenueError> {
        let result = sqlx::query("UPDATE contact_messages SET is_read = TRUE WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to mark messages read: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;
        Ok(result.rows_affected())
    }
}
