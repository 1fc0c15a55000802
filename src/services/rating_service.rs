// src/services/rating_service.rs
// DOCUMENTATION: Rating submission
// PURPOSE: Upsert a user's rating and keep venue and site aggregates current

use crate::db::{RatingRepository, VenueRepository};
use crate::errors::VenueError;
use crate::models::{RateVenueRequest, RateVenueResponse, RatingResponse, SessionUser};
use crate::services::StatisticsService;
use sqlx::PgPool;
use validator::Validate;

pub struct RatingService;

impl RatingService {
    /// Create or update the caller's rating of an active venue
    pub async fn rate_venue(
        pool: &PgPool,
        caller: &SessionUser,
        slug: &str,
        req: RateVenueRequest,
    ) -> Result<RateVenueResponse, VenueError> {
        req.validate()?;

        let venue = VenueRepository::get_by_slug(pool, slug, true).await?;
        let comment = req.comment.as_deref().unwrap_or("").trim();

        let (mut rating, created) =
            RatingRepository::upsert(pool, venue.id, caller.user.id, req.rating, comment).await?;
        rating.username = Some(caller.user.username.clone());

        let stats = RatingRepository::update_venue_stats(pool, venue.id).await?;
        StatisticsService::refresh(pool).await;

        let message = if created {
            "Thank you for your rating!"
        } else {
            "Your rating has been updated!"
        };
        log::info!(
            "{} rated {} with {} ({})",
            caller.user.username,
            venue.slug,
            rating.rating,
            if created { "new" } else { "updated" }
        );

        Ok(RateVenueResponse {
            message: message.to_string(),
            created,
            rating: rating.to_response(),
            average_rating: stats.average_rating,
            total_ratings: stats.total_ratings,
            total_reviews: stats.total_reviews,
        })
    }

    /// The caller's current rating, to prefill the form
    pub async fn my_rating(
        pool: &PgPool,
        caller: &SessionUser,
        slug: &str,
    ) -> Result<Option<RatingResponse>, VenueError> {
        let venue = VenueRepository::get_by_slug(pool, slug, true).await?;
        let rating = RatingRepository::find_for_user(pool, venue.id, caller.user.id).await?;
        Ok(rating.map(|r| r.to_response()))
    }
}
