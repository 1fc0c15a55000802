// src/services/admin_service.rs
// DOCUMENTATION: Admin dashboard logic
// PURPOSE: Category views, inline flag edits, bulk actions, categories, and messages

use crate::db::{
    CategoryRepository, ContactRepository, ImageRepository, RatingRepository, VenueFilter,
    VenueOrder, VenueRepository,
};
use crate::errors::VenueError;
use crate::models::{
    BulkAction, BulkActionRequest, BulkActionResponse, Category, CategoryVenuesResponse,
    ContactMessage, CreateCategoryRequest, DashboardResponse, MessageResponse,
    UpdateCategoryRequest, UpdateFlagsRequest,
};
use crate::services::{slug, MediaStorage, StatisticsService};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct AdminService;

impl AdminService {
    pub async fn dashboard(pool: &PgPool) -> Result<DashboardResponse, VenueError> {
        let categories = CategoryRepository::list_with_venue_counts(pool).await?;
        let statistics = StatisticsService::get_or_create(pool).await?;
        Ok(DashboardResponse {
            categories,
            statistics,
        })
    }

    /// Every venue of a category, newest first, with status counts
    pub async fn venues_by_category(
        pool: &PgPool,
        category_slug: &str,
        search: Option<&str>,
    ) -> Result<CategoryVenuesResponse, VenueError> {
        let category = CategoryRepository::get_by_slug(pool, category_slug).await?;
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let filter = VenueFilter {
            category_id: Some(category.id),
            search: search.clone(),
            ..Default::default()
        };
        let venues = VenueRepository::list(pool, &filter, VenueOrder::Newest, None, 0).await?;
        let total_ratings = RatingRepository::count_for_category(pool, category.id).await?;

        let active_venues = venues.iter().filter(|v| v.is_active).count() as i64;
        let featured_venues = venues.iter().filter(|v| v.is_featured).count() as i64;

        Ok(CategoryVenuesResponse {
            total_venues: venues.len() as i64,
            active_venues,
            featured_venues,
            total_ratings,
            venues: venues.iter().map(|v| v.to_summary()).collect(),
            search_query: search,
            category,
        })
    }

    /// Toggle active/featured on a venue of the category
    pub async fn update_flags(
        pool: &PgPool,
        category_slug: &str,
        req: UpdateFlagsRequest,
    ) -> Result<MessageResponse, VenueError> {
        let category = CategoryRepository::get_by_slug(pool, category_slug).await?;
        let venue = VenueRepository::set_flags(
            pool,
            req.venue_id,
            category.id,
            req.is_active,
            req.is_featured,
        )
        .await?;

        StatisticsService::refresh(pool).await;
        Ok(MessageResponse::new(format!(
            "Venue {} updated successfully.",
            venue.name
        )))
    }

    /// Activate, deactivate, or delete the selected venues of a category
    pub async fn bulk_action(
        pool: &PgPool,
        storage: &MediaStorage,
        category_slug: &str,
        req: BulkActionRequest,
    ) -> Result<BulkActionResponse, VenueError> {
        let category = CategoryRepository::get_by_slug(pool, category_slug).await?;

        if req.venue_ids.is_empty() {
            return Err(VenueError::InvalidInput("No venues selected.".to_string()));
        }
        let action = BulkAction::parse(req.action.trim())
            .ok_or_else(|| VenueError::InvalidInput("Invalid action.".to_string()))?;

        let affected = match action {
            BulkAction::Activate => {
                VenueRepository::bulk_set_active(pool, &req.venue_ids, category.id, true).await?
            }
            BulkAction::Deactivate => {
                VenueRepository::bulk_set_active(pool, &req.venue_ids, category.id, false).await?
            }
            BulkAction::Delete => {
                let paths =
                    ImageRepository::paths_for_venues(pool, &req.venue_ids, category.id).await?;
                let deleted =
                    VenueRepository::bulk_delete(pool, &req.venue_ids, category.id).await?;
                for path in &paths {
                    storage.delete(path).await;
                }
                deleted
            }
        };

        StatisticsService::refresh(pool).await;
        log::info!(
            "Bulk {} on {} venues of {}",
            action.past_tense(),
            affected,
            category.slug
        );

        Ok(BulkActionResponse {
            message: format!("{} venues {} successfully.", affected, action.past_tense()),
            affected,
        })
    }

    pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, VenueError> {
        CategoryRepository::list_with_venue_counts(pool).await
    }

    pub async fn create_category(
        pool: &PgPool,
        req: CreateCategoryRequest,
    ) -> Result<Category, VenueError> {
        req.validate()?;
        let name = req.name.trim();
        let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(given) => slug::slugify(given),
            None => slug::slugify(name),
        };
        CategoryRepository::create(pool, name, &slug, req.description.trim(), req.icon.trim()).await
    }

    pub async fn update_category(
        pool: &PgPool,
        id: Uuid,
        req: UpdateCategoryRequest,
    ) -> Result<Category, VenueError> {
        req.validate()?;
        let slug = req.slug.as_deref().map(slug::slugify);
        let category = CategoryRepository::update(
            pool,
            id,
            req.name.as_deref().map(str::trim),
            slug.as_deref(),
            req.description.as_deref(),
            req.icon.as_deref(),
        )
        .await?;

        if req.name.is_some() {
            // per-kind counters are keyed by category name
            StatisticsService::refresh(pool).await;
        }
        Ok(category)
    }

    pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), VenueError> {
        CategoryRepository::delete(pool, id).await?;
        StatisticsService::refresh(pool).await;
        Ok(())
    }

    pub async fn list_messages(
        pool: &PgPool,
        unread_only: bool,
    ) -> Result<Vec<ContactMessage>, VenueError> {
        ContactRepository::list(pool, unread_only).await
    }

    pub async fn mark_messages_read(
        pool: &PgPool,
        ids: &[Uuid],
    ) -> Result<MessageResponse, VenueError> {
        if ids.is_empty() {
            return Err(VenueError::InvalidInput("No messages selected.".to_string()));
        }
        let updated = ContactRepository::mark_read(pool, ids).await?;
        Ok(MessageResponse::new(format!(
            "{} messages marked as read.",
            updated
        )))
    }
}
