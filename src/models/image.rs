// src/models/image.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Uploaded venue image
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VenueImage {
    pub id: Uuid,
    pub venue_id: Uuid,
    /// Path relative to the media root
    pub image_path: String,
    pub caption: String,
    pub is_primary: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Image DTO for API responses
#[derive(Debug, Clone, Serialize)]
pub struct VenueImageResponse {
    pub id: Uuid,
    pub url: String,
    pub caption: String,
    pub is_primary: bool,
    pub display_order: i32,
}

/// Public URL of a file stored under the media root
pub fn media_url(relative_path: &str) -> String {
    format!("/media/{}", relative_path.trim_start_matches('/'))
}

impl VenueImage {
    pub fn to_response(&self) -> VenueImageResponse {
        VenueImageResponse {
            id: self.id,
            url: media_url(&self.image_path),
            caption: self.caption.clone(),
            is_primary: self.is_primary,
            display_order: self.display_order,
        }
    }
}

/// Query string of the image upload endpoint
#[derive(Debug, Deserialize)]
pub struct ImageUploadQuery {
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url("venues/images/a.jpg"),
            "/media/venues/images/a.jpg"
        );
        assert_eq!(media_url("/profiles/avatars/b.png"), "/media/profiles/avatars/b.png");
    }
}
