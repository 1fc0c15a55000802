// src/models/statistics.rs
// DOCUMENTATION: Site-wide statistics snapshot
// PURPOSE: Singleton row recomputed from live venue, user, and rating counts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

/// Category names that feed the per-kind counters
pub const HOTELS_CATEGORY: &str = "Hotels";
pub const RESTAURANTS_CATEGORY: &str = "Restaurants";
pub const CAFES_CATEGORY: &str = "Cafes";
pub const ATTRACTION_CATEGORIES: [&str; 2] = ["Amusement Parks", "Attractions"];

/// Stored snapshot (row id = 1)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Statistics {
    #[serde(skip_serializing)]
    pub id: i32,
    pub total_venues: i32,
    pub total_hotels: i32,
    pub total_restaurants: i32,
    pub total_cafes: i32,
    pub total_attractions: i32,
    pub total_users: i32,
    pub total_ratings: i32,
    pub total_cities: i32,
    pub last_updated: DateTime<Utc>,
}

/// Freshly computed counters, before they are written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatisticsCounts {
    pub total_venues: i32,
    pub total_hotels: i32,
    pub total_restaurants: i32,
    pub total_cafes: i32,
    pub total_attractions: i32,
    pub total_users: i32,
    pub total_ratings: i32,
    pub total_cities: i32,
}

/// Raw aggregates read from the database
#[derive(Debug, Clone, Default)]
pub struct RawStatistics {
    /// Active venues per category name
    pub active_by_category: HashMap<String, i64>,
    pub active_venues: i64,
    pub distinct_cities: i64,
    pub users: i64,
    pub ratings: i64,
}

fn clamp(value: i64) -> i32 {
    value.clamp(0, i32::MAX as i64) as i32
}

impl StatisticsCounts {
    /// Fold raw aggregates into the stored counters.
    /// Attractions combine the "Amusement Parks" and "Attractions" categories.
    pub fn from_raw(raw: &RawStatistics) -> Self {
        let by_name = |name: &str| raw.active_by_category.get(name).copied().unwrap_or(0);

        StatisticsCounts {
            total_venues: clamp(raw.active_venues),
            total_hotels: clamp(by_name(HOTELS_CATEGORY)),
            total_restaurants: clamp(by_name(RESTAURANTS_CATEGORY)),
            total_cafes: clamp(by_name(CAFES_CATEGORY)),
            total_attractions: clamp(ATTRACTION_CATEGORIES.iter().map(|c| by_name(c)).sum()),
            total_users: clamp(raw.users),
            total_ratings: clamp(raw.ratings),
            total_cities: clamp(raw.distinct_cities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_from_raw() {
        let mut active_by_category = HashMap::new();
        active_by_category.insert("Hotels".to_string(), 4);
        active_by_category.insert("Restaurants".to_string(), 3);
        active_by_category.insert("Amusement Parks".to_string(), 2);
        active_by_category.insert("Attractions".to_string(), 5);
        active_by_category.insert("Museums".to_string(), 7);

        let raw = RawStatistics {
            active_by_category,
            active_venues: 21,
            distinct_cities: 6,
            users: 10,
            ratings: 42,
        };

        let counts = StatisticsCounts::from_raw(&raw);
        assert_eq!(counts.total_venues, 21);
        assert_eq!(counts.total_hotels, 4);
        assert_eq!(counts.total_restaurants, 3);
        assert_eq!(counts.total_cafes, 0);
        assert_eq!(counts.total_attractions, 7);
        assert_eq!(counts.total_users, 10);
        assert_eq!(counts.total_ratings, 42);
        assert_eq!(counts.total_cities, 6);
    }

    #[test]
    fn test_empty_database() {
        assert_eq!(
            StatisticsCounts::from_raw(&RawStatistics::default()),
            StatisticsCounts::default()
        );
    }

    #[test]
    fn test_category_names_are_case_sensitive() {
        let mut active_by_category = HashMap::new();
        active_by_category.insert("hotels".to_string(), 9);
        let raw = RawStatistics {
            active_by_category,
            ..Default::default()
        };
        assert_eq!(StatisticsCounts::from_raw(&raw).total_hotels, 0);
    }
}
