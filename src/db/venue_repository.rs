// src/db/venue_repository.rs
// DOCUMENTATION: Database access layer for venues
// PURPOSE: Filtered listings, lookups, admin mutations, and slug queries

use crate::db::{contains_pattern, escape_like, is_unique_violation};
use crate::errors::VenueError;
use crate::models::Venue;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashSet;
use uuid::Uuid;

/// Venue columns plus category name/slug and the primary image path
const VENUE_SELECT: &str = r#"
    SELECT
        v.*,
        c.name AS category_name,
        c.slug AS category_slug,
        img.image_path AS primary_image
    FROM venues v
    JOIN categories c ON c.id = v.category_id
    -- the flagged image, else the first in display order
    LEFT JOIN LATERAL (
        SELECT image_path
        FROM venue_images
        WHERE venue_id = v.id
        ORDER BY is_primary DESC, display_order ASC, created_at ASC
        LIMIT 1
    ) img ON true
"#;

const VENUE_COUNT: &str = r#"
    SELECT COUNT(*)
    FROM venues v
    JOIN categories c ON c.id = v.category_id
"#;

/// Columns matched by a free-text search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFields {
    #[default]
    NameDescriptionCityCountry,
    NameDescription,
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VenueOrder {
    /// Highest average rating first, then most ratings
    #[default]
    TopRated,
    /// Most recently created first
    Newest,
}

/// Composable venue filter; blank strings are treated as absent
#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    pub active_only: bool,
    pub featured_only: bool,
    pub category_slug: Option<String>,
    pub category_id: Option<Uuid>,
    /// Case-insensitive contains on city
    pub city_contains: Option<String>,
    /// Exact city match (nearby venues)
    pub city_exact: Option<String>,
    pub search: Option<String>,
    pub search_fields: SearchFields,
    /// Case-insensitive contains on city or country
    pub location: Option<String>,
    pub exclude_id: Option<Uuid>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &VenueFilter) {
    qb.push(" WHERE TRUE");

    if filter.active_only {
        qb.push(" AND v.is_active = TRUE");
    }

    if filter.featured_only {
        qb.push(" AND v.is_featured = TRUE");
    }

    if let Some(slug) = non_blank(&filter.category_slug) {
        qb.push(" AND c.slug = ").push_bind(slug.to_string());
    }

    if let Some(category_id) = filter.category_id {
        qb.push(" AND v.category_id = ").push_bind(category_id);
    }

    if let Some(city) = non_blank(&filter.city_contains) {
        qb.push(" AND v.city ILIKE ").push_bind(contains_pattern(city));
    }

    if let Some(city) = non_blank(&filter.city_exact) {
        qb.push(" AND v.city = ").push_bind(city.to_string());
    }

    if let Some(term) = non_blank(&filter.search) {
        let pattern = contains_pattern(term);
        qb.push(" AND (v.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.description ILIKE ")
            .push_bind(pattern.clone());
        if filter.search_fields == SearchFields::NameDescriptionCityCountry {
            qb.push(" OR v.city ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.country ILIKE ")
                .push_bind(pattern);
        }
        qb.push(")");
    }

    if let Some(location) = non_blank(&filter.location) {
        let pattern = contains_pattern(location);
        qb.push(" AND (v.city ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.country ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(exclude) = filter.exclude_id {
        qb.push(" AND v.id <> ").push_bind(exclude);
    }
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, order: VenueOrder) {
    match order {
        VenueOrder::TopRated => {
            qb.push(" ORDER BY v.average_rating DESC, v.total_ratings DESC, v.created_at DESC")
        }
        VenueOrder::Newest => qb.push(" ORDER BY v.created_at DESC"),
    };
}

/// Resolved add-venue form, ready to insert
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: Uuid,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub price_range_min: Option<f64>,
    pub price_range_max: Option<f64>,
    pub currency: String,
    pub booking_com_link: String,
    pub trip_com_link: String,
    pub facilities: Vec<String>,
    pub languages_spoken: Vec<String>,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Resolved edit-venue form; None leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct VenueChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range_min: Option<f64>,
    pub price_range_max: Option<f64>,
    pub currency: Option<String>,
    pub booking_com_link: Option<String>,
    pub trip_com_link: Option<String>,
    pub facilities: Option<Vec<String>>,
    pub languages_spoken: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// VenueRepository: All database operations for venues
pub struct VenueRepository;

impl VenueRepository {
    /// Filtered listing; `limit = None` returns every match
    pub async fn list(
        pool: &PgPool,
        filter: &VenueFilter,
        order: VenueOrder,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Venue>, VenueError> {
        let mut qb = QueryBuilder::<Postgres>::new(VENUE_SELECT);
        push_filters(&mut qb, filter);
        push_order(&mut qb, order);
        if let Some(limit) = limit {
            qb.push(" LIMIT ").push_bind(limit);
            qb.push(" OFFSET ").push_bind(offset.max(0));
        }

        log::debug!("Executing venue query: {}", qb.sql());

        qb.build_query_as::<Venue>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Venue listing query error: {}", e);
                VenueError::DatabaseError(e.to_string())
            })
    }

    /// Number of venues matching a filter
    pub async fn count(pool: &PgPool, filter: &VenueFilter) -> Result<i64, VenueError> {
        let mut qb = QueryBuilder::<Postgres>::new(VENUE_COUNT);
        push_filters(&mut qb, filter);

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Venue count query error: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;

        Ok(count)
    }

    /// Retrieve venue by ID regardless of status
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Venue, VenueError> {
        let sql = format!("{} WHERE v.id = $1", VENUE_SELECT);
        sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching venue: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Venue not found: {}", id);
                VenueError::NotFound(format!("Venue {}", id))
            })
    }

    /// Retrieve venue by slug
    pub async fn get_by_slug(
        pool: &PgPool,
        slug: &str,
        active_only: bool,
    ) -> Result<Venue, VenueError> {
        let sql = format!(
            "{} WHERE v.slug = $1 AND (v.is_active = TRUE OR NOT $2)",
            VENUE_SELECT
        );
        sqlx::query_as::<_, Venue>(&sql)
            .bind(slug)
            .bind(active_only)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching venue {}: {}", slug, e);
                VenueError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Venue not found: {}", slug);
                VenueError::NotFound(format!("Venue '{}'", slug))
            })
    }

    /// Insert a venue and return the stored record
    pub async fn create(pool: &PgPool, venue: &NewVenue) -> Result<Venue, VenueError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO venues (
                name, slug, description, category_id,
                address, city, country, latitude, longitude,
                phone, email, website,
                price_range_min, price_range_max, currency,
                booking_com_link, trip_com_link,
                facilities, languages_spoken, amenities,
                is_active, is_featured
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8, $9,
                $10, $11, $12,
                $13, $14, $15,
                $16, $17,
                $18, $19, $20,
                $21, $22
            )
            RETURNING id
            "#,
        )
        .bind(&venue.name) // $1
        .bind(&venue.slug) // $2
        .bind(&venue.description) // $3
        .bind(venue.category_id) // $4
        .bind(&venue.address) // $5
        .bind(&venue.city) // $6
        .bind(&venue.country) // $7
        .bind(venue.latitude) // $8
        .bind(venue.longitude) // $9
        .bind(&venue.phone) // $10
        .bind(&venue.email) // $11
        .bind(&venue.website) // $12
        .bind(venue.price_range_min) // $13
        .bind(venue.price_range_max) // $14
        .bind(&venue.currency) // $15
        .bind(&venue.booking_com_link) // $16
        .bind(&venue.trip_com_link) // $17
        .bind(&venue.facilities) // $18
        .bind(&venue.languages_spoken) // $19
        .bind(&venue.amenities) // $20
        .bind(venue.is_active) // $21
        .bind(venue.is_featured) // $22
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return VenueError::AlreadyExists(format!("Venue slug '{}'", venue.slug));
            }
            log::error!("Failed to create venue: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let created = Self::get_by_id(pool, id).await?;
        log::info!("Created venue {} ({})", created.slug, created.id);
        Ok(created)
    }

    /// Partial update - only provided fields are modified
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &VenueChanges,
    ) -> Result<Venue, VenueError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE venues
            SET name = COALESCE($1, name),
                slug = COALESCE($2, slug),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                country = COALESCE($7, country),
                latitude = COALESCE($8, latitude),
                longitude = COALESCE($9, longitude),
                phone = COALESCE($10, phone),
                email = COALESCE($11, email),
                website = COALESCE($12, website),
                price_range_min = COALESCE($13, price_range_min),
                price_range_max = COALESCE($14, price_range_max),
                currency = COALESCE($15, currency),
                booking_com_link = COALESCE($16, booking_com_link),
                trip_com_link = COALESCE($17, trip_com_link),
                facilities = COALESCE($18, facilities),
                languages_spoken = COALESCE($19, languages_spoken),
                amenities = COALESCE($20, amenities),
                is_active = COALESCE($21, is_active),
                is_featured = COALESCE($22, is_featured),
                updated_at = NOW()
            WHERE id = $23
            RETURNING id
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.description)
        .bind(changes.category_id)
        .bind(&changes.address)
        .bind(&changes.city)
        .bind(&changes.country)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .bind(&changes.phone)
        .bind(&changes.email)
        .bind(&changes.website)
        .bind(changes.price_range_min)
        .bind(changes.price_range_max)
        .bind(&changes.currency)
        .bind(&changes.booking_com_link)
        .bind(&changes.trip_com_link)
        .bind(&changes.facilities)
        .bind(&changes.languages_spoken)
        .bind(&changes.amenities)
        .bind(changes.is_active)
        .bind(changes.is_featured)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return VenueError::AlreadyExists("Venue slug".to_string());
            }
            log::error!("Update failed for venue {}: {}", id, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let (id,) = updated.ok_or_else(|| VenueError::NotFound(format!("Venue {}", id)))?;
        log::info!("Updated venue: {}", id);
        Self::get_by_id(pool, id).await
    }

    /// Hard delete; images and ratings go with it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), VenueError> {
        let rows = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for venue {}: {}", id, e);
                VenueError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(VenueError::NotFound(format!("Venue {}", id)));
        }

        log::info!("Deleted venue: {}", id);
        Ok(())
    }

    /// Toggle active/featured flags of a venue that belongs to the category
    pub async fn set_flags(
        pool: &PgPool,
        id: Uuid,
        category_id: Uuid,
        is_active: bool,
        is_featured: bool,
    ) -> Result<Venue, VenueError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE venues
            SET is_active = $1, is_featured = $2, updated_at = NOW()
            WHERE id = $3 AND category_id = $4
            RETURNING id
            "#,
        )
        .bind(is_active)
        .bind(is_featured)
        .bind(id)
        .bind(category_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Flag update failed for venue {}: {}", id, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        match updated {
            Some((id,)) => Self::get_by_id(pool, id).await,
            None => Err(VenueError::NotFound("Venue not found.".to_string())),
        }
    }

    /// Activate or deactivate the given venues within a category
    pub async fn bulk_set_active(
        pool: &PgPool,
        ids: &[Uuid],
        category_id: Uuid,
        active: bool,
    ) -> Result<u64, VenueError> {
        let result = sqlx::query(
            r#"
            UPDATE venues
            SET is_active = $1, updated_at = NOW()
            WHERE id = ANY($2) AND category_id = $3
            "#,
        )
        .bind(active)
        .bind(ids)
        .bind(category_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Bulk status update failed: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }

    /// Delete the given venues within a category
    pub async fn bulk_delete(
        pool: &PgPool,
        ids: &[Uuid],
        category_id: Uuid,
    ) -> Result<u64, VenueError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ANY($1) AND category_id = $2")
            .bind(ids)
            .bind(category_id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Bulk delete failed: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }

    /// Slugs equal to `base` or shaped like `base-<suffix>`, other than the given venue's
    pub async fn slugs_with_base(
        pool: &PgPool,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<HashSet<String>, VenueError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT slug FROM venues
            WHERE (slug = $1 OR slug LIKE $2)
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(base)
        .bind(format!("{}-%", escape_like(base)))
        .bind(exclude_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to load slugs for {}: {}", base, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }

    /// Whether another venue already uses this slug
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, VenueError> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM venues WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
        .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        Ok(taken)
    }

    /// (id, name) of venues whose slug is blank
    pub async fn with_empty_slug(pool: &PgPool) -> Result<Vec<(Uuid, String)>, VenueError> {
        sqlx::query_as("SELECT id, name FROM venues WHERE TRIM(slug) = '' ORDER BY created_at")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to find venues without slug: {}", e);
                VenueError::DatabaseError(e.to_string())
            })
    }

    pub async fn set_slug(pool: &PgPool, id: Uuid, slug: &str) -> Result<(), VenueError> {
        sqlx::query("UPDATE venues SET slug = $1, updated_at = NOW() WHERE id = $2")
            .bind(slug)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return VenueError::AlreadyExists(format!("Venue slug '{}'", slug));
                }
                VenueError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }
}
