// src/services/venue_service.rs
// DOCUMENTATION: Business logic for venues
// PURPOSE: Public listings and detail pages, plus admin venue and image management

use crate::db::{
    CategoryRepository, ImageRepository, NewVenue, RatingRepository, SearchFields, VenueChanges,
    VenueFilter, VenueOrder, VenueRepository,
};
use crate::errors::VenueError;
use crate::models::{
    Category, CreateVenueRequest, HomeResponse, PageInfo, SessionUser, Statistics,
    UpdateVenueRequest, VenueDetailResponse, VenueImageResponse, VenueListQuery,
    VenueListResponse, VenueResponse, VenueSearchQuery, VenueSearchResponse, DEFAULT_CURRENCY,
    VENUES_PER_PAGE,
};
use crate::services::{slug, MediaStorage, StatisticsService, VENUE_IMAGES_DIR};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const FEATURED_LIMIT: i64 = 6;
const NEARBY_LIMIT: i64 = 6;

/// Trimmed, non-empty query parameter
fn param(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub struct VenueService;

impl VenueService {
    /// Landing page: statistics, featured venues, categories
    pub async fn home(pool: &PgPool) -> Result<HomeResponse, VenueError> {
        let statistics = StatisticsService::get_or_create(pool).await?;
        let filter = VenueFilter {
            active_only: true,
            featured_only: true,
            ..Default::default()
        };
        let featured =
            VenueRepository::list(pool, &filter, VenueOrder::TopRated, Some(FEATURED_LIMIT), 0)
                .await?;
        let categories = CategoryRepository::list_all(pool).await?;

        Ok(HomeResponse {
            statistics,
            featured_venues: featured.iter().map(|v| v.to_summary()).collect(),
            categories,
        })
    }

    pub async fn about(pool: &PgPool) -> Result<Statistics, VenueError> {
        StatisticsService::get_or_create(pool).await
    }

    /// Active venues filtered by category, city, and free text; 12 per page
    pub async fn list_venues(
        pool: &PgPool,
        query: VenueListQuery,
    ) -> Result<VenueListResponse, VenueError> {
        let filter = VenueFilter {
            active_only: true,
            category_slug: param(&query.category),
            city_contains: param(&query.city),
            search: param(&query.search),
            search_fields: SearchFields::NameDescriptionCityCountry,
            ..Default::default()
        };

        Self::paginated_listing(pool, filter, query, None).await
    }

    /// Listing of one category; search covers name and description only
    pub async fn list_by_category(
        pool: &PgPool,
        category_slug: &str,
        query: VenueListQuery,
    ) -> Result<VenueListResponse, VenueError> {
        let category = CategoryRepository::get_by_slug(pool, category_slug).await?;
        let filter = VenueFilter {
            active_only: true,
            category_id: Some(category.id),
            city_contains: param(&query.city),
            search: param(&query.search),
            search_fields: SearchFields::NameDescription,
            ..Default::default()
        };

        Self::paginated_listing(pool, filter, query, Some(category)).await
    }

    async fn paginated_listing(
        pool: &PgPool,
        filter: VenueFilter,
        query: VenueListQuery,
        category: Option<Category>,
    ) -> Result<VenueListResponse, VenueError> {
        let total_count = VenueRepository::count(pool, &filter).await?;
        let page = PageInfo::resolve(query.page.as_deref(), total_count, VENUES_PER_PAGE);
        let venues = VenueRepository::list(
            pool,
            &filter,
            VenueOrder::TopRated,
            Some(page.per_page),
            page.offset(),
        )
        .await?;
        let categories = CategoryRepository::list_all(pool).await?;

        Ok(VenueListResponse {
            venues: venues.iter().map(|v| v.to_summary()).collect(),
            page,
            categories,
            selected_category: category
                .as_ref()
                .map(|c| c.slug.clone())
                .or_else(|| param(&query.category)),
            category,
            search_query: param(&query.search),
            city_filter: param(&query.city),
        })
    }

    /// Unpaginated search over active venues
    pub async fn search_venues(
        pool: &PgPool,
        query: VenueSearchQuery,
    ) -> Result<VenueSearchResponse, VenueError> {
        let filter = VenueFilter {
            active_only: true,
            search: param(&query.q),
            search_fields: SearchFields::NameDescriptionCityCountry,
            category_slug: param(&query.category),
            location: param(&query.location),
            ..Default::default()
        };
        let venues = VenueRepository::list(pool, &filter, VenueOrder::TopRated, None, 0).await?;

        log::debug!("Search '{:?}' matched {} venues", query.q, venues.len());

        Ok(VenueSearchResponse {
            venues: venues.iter().map(|v| v.to_summary()).collect(),
            search_query: param(&query.q),
            category_filter: param(&query.category),
            location_filter: param(&query.location),
        })
    }

    /// Active venue with gallery, ratings, nearby venues, and the caller's rating
    pub async fn venue_detail(
        pool: &PgPool,
        slug: &str,
        caller: Option<&SessionUser>,
    ) -> Result<VenueDetailResponse, VenueError> {
        let venue = VenueRepository::get_by_slug(pool, slug, true).await?;
        let images = ImageRepository::list_by_venue(pool, venue.id).await?;
        let ratings = RatingRepository::list_by_venue(pool, venue.id).await?;

        let nearby_filter = VenueFilter {
            active_only: true,
            city_exact: Some(venue.city.clone()),
            exclude_id: Some(venue.id),
            ..Default::default()
        };
        let nearby = VenueRepository::list(
            pool,
            &nearby_filter,
            VenueOrder::TopRated,
            Some(NEARBY_LIMIT),
            0,
        )
        .await?;

        let user_rating = match caller {
            Some(caller) => RatingRepository::find_for_user(pool, venue.id, caller.user.id)
                .await?
                .map(|r| r.to_response()),
            None => None,
        };

        Ok(VenueDetailResponse {
            venue: venue.to_response(),
            images: images.iter().map(|i| i.to_response()).collect(),
            ratings: ratings.iter().map(|r| r.to_response()).collect(),
            nearby_venues: nearby.iter().map(|v| v.to_summary()).collect(),
            user_rating,
        })
    }

    /// Resolve the category of the add form: explicit id first, then the preselected slug
    async fn resolve_category(
        pool: &PgPool,
        category_id: Option<Uuid>,
        preselected: Option<&str>,
    ) -> Result<Uuid, VenueError> {
        if let Some(id) = category_id {
            return match CategoryRepository::get_by_id(pool, id).await {
                Ok(category) => Ok(category.id),
                Err(VenueError::NotFound(_)) => Err(VenueError::ValidationError(
                    "category: Select a valid choice.".to_string(),
                )),
                Err(e) => Err(e),
            };
        }

        if let Some(slug) = preselected.map(str::trim).filter(|s| !s.is_empty()) {
            if let Some(category) = CategoryRepository::find_by_slug(pool, slug).await? {
                return Ok(category.id);
            }
        }

        Err(VenueError::ValidationError(
            "category: This field is required.".to_string(),
        ))
    }

    /// Validate the add form, derive a unique slug, store the venue
    pub async fn create_venue(
        pool: &PgPool,
        mut req: CreateVenueRequest,
        preselected_category: Option<&str>,
    ) -> Result<VenueResponse, VenueError> {
        req.normalize();
        req.validate()?;

        let category_id =
            Self::resolve_category(pool, req.category_id, preselected_category).await?;

        let slug = match &req.slug {
            Some(requested) => {
                let slug = slug::slugify(requested);
                if VenueRepository::slug_taken(pool, &slug, None).await? {
                    return Err(VenueError::AlreadyExists(format!("Venue slug '{}'", slug)));
                }
                slug
            }
            None => slug::unique_venue_slug(pool, &req.name, None).await?,
        };

        let new_venue = NewVenue {
            name: req.name,
            slug,
            description: req.description,
            category_id,
            address: req.address,
            city: req.city,
            country: req.country,
            latitude: req.latitude,
            longitude: req.longitude,
            phone: req.phone.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            website: req.website.unwrap_or_default(),
            price_range_min: req.price_range_min,
            price_range_max: req.price_range_max,
            currency: req.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            booking_com_link: req.booking_com_link.unwrap_or_default(),
            trip_com_link: req.trip_com_link.unwrap_or_default(),
            facilities: req.facilities.unwrap_or_default().into_list(),
            languages_spoken: req.languages_spoken.unwrap_or_default().into_list(),
            amenities: req.amenities.unwrap_or_default().into_list(),
            is_active: req.is_active.unwrap_or(true),
            is_featured: req.is_featured.unwrap_or(false),
        };

        let venue = VenueRepository::create(pool, &new_venue).await?;
        StatisticsService::refresh(pool).await;

        Ok(venue.to_response())
    }

    /// Partial edit; an explicit slug must not collide with another venue
    pub async fn update_venue(
        pool: &PgPool,
        id: Uuid,
        mut req: UpdateVenueRequest,
    ) -> Result<VenueResponse, VenueError> {
        req.normalize();
        req.validate_form()?;

        let existing = VenueRepository::get_by_id(pool, id).await?;
        req.validate_against(&existing)?;

        if let Some(category_id) = req.category_id {
            Self::resolve_category(pool, Some(category_id), None).await?;
        }

        let slug = match &req.slug {
            Some(requested) => {
                let slug = slug::slugify(requested);
                if slug != existing.slug && VenueRepository::slug_taken(pool, &slug, Some(id)).await? {
                    return Err(VenueError::AlreadyExists(format!("Venue slug '{}'", slug)));
                }
                Some(slug)
            }
            // a venue saved without a slug gets one now
            None if existing.slug.trim().is_empty() => {
                let name = req.name.as_deref().unwrap_or(&existing.name);
                Some(slug::unique_venue_slug(pool, name, Some(id)).await?)
            }
            None => None,
        };

        let changes = VenueChanges {
            name: req.name,
            slug,
            description: req.description,
            category_id: req.category_id,
            address: req.address,
            city: req.city,
            country: req.country,
            latitude: req.latitude,
            longitude: req.longitude,
            phone: req.phone,
            email: req.email,
            website: req.website,
            price_range_min: req.price_range_min,
            price_range_max: req.price_range_max,
            currency: req.currency,
            booking_com_link: req.booking_com_link,
            trip_com_link: req.trip_com_link,
            facilities: req.facilities.map(|l| l.into_list()),
            languages_spoken: req.languages_spoken.map(|l| l.into_list()),
            amenities: req.amenities.map(|l| l.into_list()),
            is_active: req.is_active,
            is_featured: req.is_featured,
        };

        let venue = VenueRepository::update(pool, id, &changes).await?;
        if changes.is_active.is_some() || changes.category_id.is_some() || changes.city.is_some() {
            StatisticsService::refresh(pool).await;
        }

        Ok(venue.to_response())
    }

    /// Delete a venue with its images (rows and files) and ratings
    pub async fn delete_venue(
        pool: &PgPool,
        storage: &MediaStorage,
        id: Uuid,
    ) -> Result<String, VenueError> {
        let venue = VenueRepository::get_by_id(pool, id).await?;
        let images = ImageRepository::list_by_venue(pool, id).await?;

        VenueRepository::delete(pool, id).await?;
        for image in &images {
            storage.delete(&image.image_path).await;
        }

        StatisticsService::refresh(pool).await;
        Ok(venue.name)
    }

    pub async fn upload_image(
        pool: &PgPool,
        storage: &MediaStorage,
        venue_id: Uuid,
        extension: &str,
        bytes: &[u8],
        caption: Option<&str>,
    ) -> Result<VenueImageResponse, VenueError> {
        // 404 before touching the disk
        VenueRepository::get_by_id(pool, venue_id).await?;

        let caption: String = caption.unwrap_or("").trim().chars().take(200).collect();
        let path = storage.save(VENUE_IMAGES_DIR, extension, bytes).await?;

        match ImageRepository::create(pool, venue_id, &path, &caption, false).await {
            Ok(image) => Ok(image.to_response()),
            Err(e) => {
                storage.delete(&path).await;
                Err(e)
            }
        }
    }

    pub async fn delete_image(
        pool: &PgPool,
        storage: &MediaStorage,
        venue_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), VenueError> {
        let image = ImageRepository::delete(pool, venue_id, image_id).await?;
        storage.delete(&image.image_path).await;
        log::info!("Deleted image {} of venue {}", image_id, venue_id);
        Ok(())
    }

    /// Make one image primary; returns the gallery
    pub async fn set_primary_image(
        pool: &PgPool,
        venue_id: Uuid,
        image_id: Uuid,
    ) -> Result<Vec<VenueImageResponse>, VenueError> {
        ImageRepository::set_primary(pool, venue_id, image_id).await?;
        let images = ImageRepository::list_by_venue(pool, venue_id).await?;
        Ok(images.iter().map(|i| i.to_response()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_trims_and_drops_blank() {
        assert_eq!(param(&Some("  Lisbon ".to_string())), Some("Lisbon".to_string()));
        assert_eq!(param(&Some("   ".to_string())), None);
        assert_eq!(param(&None), None);
    }
}
