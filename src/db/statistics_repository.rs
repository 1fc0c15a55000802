// src/db/statistics_repository.rs
// DOCUMENTATION: Site statistics singleton
// PURPOSE: Read live aggregates and persist the snapshot row (id = 1)

use crate::errors::VenueError;
use crate::models::{RawStatistics, Statistics, StatisticsCounts};
use sqlx::PgPool;

pub struct StatisticsRepository;

impl StatisticsRepository {
    /// Insert the empty singleton if missing. Returns the stored row and whether it was just created.
    pub async fn get_or_create(pool: &PgPool) -> Result<(Statistics, bool), VenueError> {
        let created = sqlx::query_as::<_, Statistics>(
            "INSERT INTO site_statistics (id) VALUES (1) ON CONFLICT (id) DO NOTHING RETURNING *",
        )
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create statistics row: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        if let Some(stats) = created {
            return Ok((stats, true));
        }

        let stats = sqlx::query_as::<_, Statistics>("SELECT * FROM site_statistics WHERE id = 1")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load statistics: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;
        Ok((stats, false))
    }

    /// Live counts over active venues, users, and ratings
    pub async fn load_raw(pool: &PgPool) -> Result<RawStatistics, VenueError> {
        let per_category: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT c.name, COUNT(v.id)
            FROM categories c
            JOIN venues v ON v.category_id = c.id AND v.is_active
            GROUP BY c.name
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to count venues per category: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let (active_venues, distinct_cities, users, ratings): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM venues WHERE is_active),
                    (SELECT COUNT(DISTINCT city) FROM venues WHERE is_active),
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM ratings)
                "#,
            )
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load site totals: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;

        Ok(RawStatistics {
            active_by_category: per_category.into_iter().collect(),
            active_venues,
            distinct_cities,
            users,
            ratings,
        })
    }

    /// Write counters into the singleton and stamp last_updated
    pub async fn save(pool: &PgPool, counts: &StatisticsCounts) -> Result<Statistics, VenueError> {
        sqlx::query_as::<_, Statistics>(
            r#"
            INSERT INTO site_statistics (
                id, total_venues, total_hotels, total_restaurants, total_cafes,
                total_attractions, total_users, total_ratings, total_cities, last_updated
            )
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (id) DO UPDATE
            SET total_venues = EXCLUDED.total_venues,
                total_hotels = EXCLUDED.total_hotels,
                total_restaurants = EXCLUDED.total_restaurants,
                total_cafes = EXCLUDED.total_cafes,
                total_attractions = EXCLUDED.total_attractions,
                total_users = EXCLUDED.total_users,
                total_ratings = EXCLUDED.total_ratings,
                total_cities = EXCLUDED.total_cities,
                last_updated = NOW()
            RETURNING *
            "#,
        )
        .bind(counts.total_venues)
        .bind(counts.total_hotels)
        .bind(counts.total_restaurants)
        .bind(counts.total_cafes)
        .bind(counts.total_attractions)
        .bind(counts.total_users)
        .bind(counts.total_ratings)
        .bind(counts.total_cities)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to save statistics: {}", e);
            VenueError::DatabaseError(e.to_string())
        })
    }
}
