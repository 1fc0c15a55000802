// src/db/rating_repository.rs
// DOCUMENTATION: Rating database operations
// PURPOSE: One rating per (venue, user), plus the per-venue aggregates

use crate::errors::VenueError;
use crate::models::{Rating, VenueRatingStats};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

pub struct RatingRepository;

impl RatingRepository {
    /// Insert or replace the caller's rating. Returns the row and whether it was new.
    pub async fn upsert(
        pool: &PgPool,
        venue_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<(Rating, bool), VenueError> {
        let row = sqlx::query(
            r#"
            INSERT INTO ratings (venue_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (venue_id, user_id) DO UPDATE
            SET rating = EXCLUDED.rating,
                comment = EXCLUDED.comment,
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(venue_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to save rating for venue {}: {}", venue_id, e);
            VenueError::DatabaseError(format!("Save rating failed: {}", e))
        })?;

        let inserted: bool = row
            .try_get("inserted")
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;
        let saved = Rating::from_row(&row).map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        Ok((saved, inserted))
    }

    pub async fn find_for_user(
        pool: &PgPool,
        venue_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Rating>, VenueError> {
        sqlx::query_as::<_, Rating>("SELECT * FROM ratings WHERE venue_id = $1 AND user_id = $2")
            .bind(venue_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch rating: {}", e);
                VenueError::DatabaseError(e.to_string())
            })
    }

    /// Ratings of a venue with the author's username, newest first
    pub async fn list_by_venue(pool: &PgPool, venue_id: Uuid) -> Result<Vec<Rating>, VenueError> {
        sqlx::query_as::<_, Rating>(
            r#"
            SELECT r.*, u.username
            FROM ratings r
            JOIN users u ON u.id = r.user_id
            WHERE r.venue_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(venue_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch ratings for venue {}: {}", venue_id, e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    /// Ratings written by a user with the venue name and slug, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Rating>, VenueError> {
        sqlx::query_as::<_, Rating>(
            r#"
            SELECT r.*, v.name AS venue_name, v.slug AS venue_slug
            FROM ratings r
            JOIN venues v ON v.id = r.venue_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch ratings of user {}: {}", user_id, e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    /// Recompute and store a venue's average (2 decimals), count, and review count
    pub async fn update_venue_stats(
        pool: &PgPool,
        venue_id: Uuid,
    ) -> Result<VenueRatingStats, VenueError> {
        let stats = sqlx::query_as::<_, VenueRatingStats>(
            r#"
            WITH agg AS (
                SELECT
                    COALESCE(ROUND(AVG(rating)::numeric, 2), 0)::float8 AS average_rating,
                    COUNT(*)::int AS total_ratings,
                    (COUNT(*) FILTER (WHERE comment <> ''))::int AS total_reviews
                FROM ratings
                WHERE venue_id = $1
            )
            UPDATE venues v
            SET average_rating = agg.average_rating,
                total_ratings = agg.total_ratings,
                total_reviews = agg.total_reviews
            FROM agg
            WHERE v.id = $1
            RETURNING v.average_rating, v.total_ratings, v.total_reviews
            "#,
        )
        .bind(venue_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update rating stats for venue {}: {}", venue_id, e);
            VenueError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| VenueError::NotFound(format!("Venue {}", venue_id)))?;

        log::debug!(
            "Venue {} rating stats: avg={} ratings={} reviews={}",
            venue_id,
            stats.average_rating,
            stats.total_ratings,
            stats.total_reviews
        );
        Ok(stats)
    }

    /// Ratings on venues of a category
    pub async fn count_for_category(pool: &PgPool, category_id: Uuid) -> Result<i64, VenueError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM ratings r
            JOIN venues v ON v.id = r.venue_id
            WHERE v.category_id = $1
            "#,
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
        .map_err(|e| VenueError::DatabaseError(e.to_string()))?;
        Ok(count)
    }
}
