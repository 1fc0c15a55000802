// src/db/category_repository.rs
// DOCUMENTATION: Category database operations
// PURPOSE: Listing, lookup, and admin CRUD for venue categories

use crate::db::is_unique_violation;
use crate::errors::VenueError;
use crate::models::Category;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CategoryRepository;

impl CategoryRepository {
    /// All categories ordered by name
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, VenueError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, icon, created_at FROM categories ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list categories: {}", e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    /// Categories annotated with their number of venues (active or not)
    pub async fn list_with_venue_counts(pool: &PgPool) -> Result<Vec<Category>, VenueError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.slug, c.description, c.icon, c.created_at,
                   COUNT(v.id) AS venue_count
            FROM categories c
            LEFT JOIN venues v ON v.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to count venues per category: {}", e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Category, VenueError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, icon, created_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to get category {}: {}", slug, e);
            VenueError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| {
            log::warn!("Category not found: {}", slug);
            VenueError::NotFound(format!("Category '{}'", slug))
        })
    }

    /// Same as get_by_slug but absence is not an error
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, VenueError> {
        match Self::get_by_slug(pool, slug).await {
            Ok(category) => Ok(Some(category)),
            Err(VenueError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Category, VenueError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, icon, created_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to get category {}: {}", id, e);
            VenueError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| VenueError::NotFound(format!("Category {}", id)))
    }

    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
        description: &str,
        icon: &str,
    ) -> Result<Category, VenueError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, description, icon, created_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(icon)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return VenueError::AlreadyExists(format!("Category '{}'", name));
            }
            log::error!("Failed to create category {}: {}", name, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        log::info!("Created category {} ({})", category.name, category.slug);
        Ok(category)
    }

    /// Partial update - only provided fields are modified
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        slug: Option<&str>,
        description: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Category, VenueError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($1, name),
                slug = COALESCE($2, slug),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon)
            WHERE id = $5
            RETURNING id, name, slug, description, icon, created_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(icon)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return VenueError::AlreadyExists("Category name or slug".to_string());
            }
            log::error!("Failed to update category {}: {}", id, e);
            VenueError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| VenueError::NotFound(format!("Category {}", id)))
    }

    /// Deletes the category and, by cascade, its venues
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), VenueError> {
        let rows = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete category {}: {}", id, e);
                VenueError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(VenueError::NotFound(format!("Category {}", id)));
        }

        log::info!("Deleted category {}", id);
        Ok(())
    }
}
