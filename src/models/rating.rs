// src/models/rating.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user's 1-5 score for a venue, one per (venue, user)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(default)]
    pub username: Option<String>,
    #[sqlx(default)]
    pub venue_name: Option<String>,
    #[sqlx(default)]
    pub venue_slug: Option<String>,
}

/// Rating form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateVenueRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[serde(default)]
    pub comment: Option<String>,
}

/// Rating DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub username: Option<String>,
    pub venue_name: Option<String>,
    pub venue_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of submitting the rating form
#[derive(Debug, Serialize)]
pub struct RateVenueResponse {
    pub message: String,
    pub created: bool,
    pub rating: RatingResponse,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub total_reviews: i32,
}

/// Aggregates over all ratings of one venue
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, FromRow)]
pub struct VenueRatingStats {
    pub average_rating: f64,
    pub total_ratings: i32,
    pub total_reviews: i32,
}

impl Rating {
    pub fn to_response(&self) -> RatingResponse {
        RatingResponse {
            id: self.id,
            rating: self.rating,
            comment: self.comment.clone(),
            username: self.username.clone(),
            venue_name: self.venue_name.clone(),
            venue_slug: self.venue_slug.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for value in 1..=5 {
            let req = RateVenueRequest { rating: value, comment: None };
            assert!(req.validate().is_ok(), "rating {} should be valid", value);
        }
        for value in [0, 6, -1] {
            let req = RateVenueRequest { rating: value, comment: None };
            assert!(req.validate().is_err(), "rating {} should be invalid", value);
        }
    }

    #[test]
    fn test_comment_is_optional() {
        let req: RateVenueRequest = serde_json::from_str(r#"{"rating": 4}"#).unwrap();
        assert_eq!(req.rating, 4);
        assert!(req.comment.is_none());
    }
}
