// src/services/contact_service.rs

use crate::db::ContactRepository;
use crate::errors::VenueError;
use crate::models::{CreateContactRequest, MessageResponse};
use sqlx::PgPool;
use validator::Validate;

pub struct ContactService;

impl ContactService {
    /// Validate and store a contact form submission
    pub async fn submit(
        pool: &PgPool,
        req: CreateContactRequest,
    ) -> Result<MessageResponse, VenueError> {
        req.validate()?;
        ContactRepository::create(pool, &req).await?;
        Ok(MessageResponse::new(
            "Thank you for your message! We will get back to you soon.",
        ))
    }
}
