// src/services/statistics_service.rs
// DOCUMENTATION: Site statistics maintenance
// PURPOSE: Get-or-create the snapshot and recompute it after mutations

use crate::db::StatisticsRepository;
use crate::errors::VenueError;
use crate::models::{Statistics, StatisticsCounts};
use sqlx::PgPool;

pub struct StatisticsService;

impl StatisticsService {
    /// Stored snapshot; a freshly created row is recomputed immediately
    pub async fn get_or_create(pool: &PgPool) -> Result<Statistics, VenueError> {
        let (stats, created) = StatisticsRepository::get_or_create(pool).await?;
        if created {
            log::info!("Statistics row created, computing initial counts");
            return Self::update_all(pool).await;
        }
        Ok(stats)
    }

    /// Recompute every counter from live data
    pub async fn update_all(pool: &PgPool) -> Result<Statistics, VenueError> {
        let raw = StatisticsRepository::load_raw(pool).await?;
        let counts = StatisticsCounts::from_raw(&raw);
        let stats = StatisticsRepository::save(pool, &counts).await?;

        log::debug!(
            "Statistics refreshed: {} venues, {} users, {} ratings",
            stats.total_venues,
            stats.total_users,
            stats.total_ratings
        );
        Ok(stats)
    }

    /// Refresh after a mutation. The mutation already succeeded, so a failure is only logged.
    pub async fn refresh(pool: &PgPool) {
        if let Err(e) = Self::update_all(pool).await {
            log::warn!("Statistics refresh failed: {}", e);
        }
    }
}
