// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Venue category (hotels, restaurants, cafes, amusement parks, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Icon class name used by the frontend
    pub icon: String,
    pub created_at: DateTime<Utc>,

    /// Populated only by the dashboard query
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(length(min = 1, max = 100))]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub slug: Option<String>,

    pub description: Option<String>,

    #[validate(length(max = 50))]
    pub icon: Option<String>,
}
