// src/db/image_repository.rs
// DOCUMENTATION: Venue image database operations
// PURPOSE: Gallery listing, upload bookkeeping, and primary image selection

use crate::errors::VenueError;
use crate::models::VenueImage;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ImageRepository;

impl ImageRepository {
    /// Gallery of a venue in display order
    pub async fn list_by_venue(pool: &PgPool, venue_id: Uuid) -> Result<Vec<VenueImage>, VenueError> {
        sqlx::query_as::<_, VenueImage>(
            r#"
            SELECT * FROM venue_images
            WHERE venue_id = $1
            ORDER BY display_order ASC, created_at ASC
            "#,
        )
        .bind(venue_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch images for venue {}: {}", venue_id, e);
            VenueError::DatabaseError(format!("Fetch images failed: {}", e))
        })
    }

    /// Stored file paths of the given venues within a category
    pub async fn paths_for_venues(
        pool: &PgPool,
        venue_ids: &[Uuid],
        category_id: Uuid,
    ) -> Result<Vec<String>, VenueError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT i.image_path
            FROM venue_images i
            JOIN venues v ON v.id = i.venue_id
            WHERE v.id = ANY($1) AND v.category_id = $2
            "#,
        )
        .bind(venue_ids)
        .bind(category_id)
        .fetch_all(pool)
        .await
        .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|(path,)| path).collect())
    }

    /// Record a stored file, appended after the existing images.
    /// The first image of a venue becomes primary; `make_primary` demotes any existing primary.
    pub async fn create(
        pool: &PgPool,
        venue_id: Uuid,
        image_path: &str,
        caption: &str,
        make_primary: bool,
    ) -> Result<VenueImage, VenueError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM venue_images WHERE venue_id = $1")
                .bind(venue_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        let is_primary = make_primary || existing == 0;
        if is_primary {
            sqlx::query("UPDATE venue_images SET is_primary = FALSE WHERE venue_id = $1")
                .bind(venue_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    log::error!("Failed to unset primary images: {}", e);
                    VenueError::DatabaseError(format!("Unset primary failed: {}", e))
                })?;
        }

        let image = sqlx::query_as::<_, VenueImage>(
            r#"
            INSERT INTO venue_images (venue_id, image_path, caption, is_primary, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(venue_id)
        .bind(image_path)
        .bind(caption)
        .bind(is_primary)
        .bind(existing as i32)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create image: {}", e);
            VenueError::DatabaseError(format!("Create image failed: {}", e))
        })?;

        tx.commit()
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        Ok(image)
    }

    /// Remove an image row; returns it so the caller can delete the file
    pub async fn delete(
        pool: &PgPool,
        venue_id: Uuid,
        image_id: Uuid,
    ) -> Result<VenueImage, VenueError> {
        sqlx::query_as::<_, VenueImage>(
            "DELETE FROM venue_images WHERE id = $1 AND venue_id = $2 RETURNING *",
        )
        .bind(image_id)
        .bind(venue_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to delete image {}: {}", image_id, e);
            VenueError::DatabaseError(format!("Delete image failed: {}", e))
        })?
        .ok_or_else(|| VenueError::NotFound(format!("Image {}", image_id)))
    }

    /// Mark one image as primary and unset the others of the venue
    pub async fn set_primary(
        pool: &PgPool,
        venue_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), VenueError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        sqlx::query("UPDATE venue_images SET is_primary = FALSE WHERE venue_id = $1")
            .bind(venue_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to unset primary images: {}", e);
                VenueError::DatabaseError(format!("Unset primary failed: {}", e))
            })?;

        let rows = sqlx::query(
            "UPDATE venue_images SET is_primary = TRUE WHERE id = $1 AND venue_id = $2",
        )
        .bind(image_id)
        .bind(venue_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to set primary image: {}", e);
            VenueError::DatabaseError(format!("Set primary failed: {}", e))
        })?
        .rows_affected();

        if rows == 0 {
            // dropping tx rolls back the unset
            return Err(VenueError::NotFound(format!("Image {}", image_id)));
        }

        tx.commit()
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
