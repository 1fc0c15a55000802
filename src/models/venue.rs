// src/models/venue.rs
// DOCUMENTATION: Core data structures for venues
// PURPOSE: Database row, form DTOs with validation, and API responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{media_url, Category, ListInput, RatingResponse, Statistics, VenueImageResponse};

/// Currency used when the form leaves it blank
pub const DEFAULT_CURRENCY: &str = "USD";

/// Represents a complete venue record from the database
/// DOCUMENTATION: Maps to the venues table; the category and primary image
/// columns are filled by joins in the listing queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: Uuid,

    // Location
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // Contact
    pub phone: String,
    pub email: String,
    pub website: String,

    // Pricing
    pub price_range_min: Option<f64>,
    pub price_range_max: Option<f64>,
    pub currency: String,

    // External booking links
    pub booking_com_link: String,
    pub trip_com_link: String,

    // Facilities and features
    pub facilities: Vec<String>,
    pub languages_spoken: Vec<String>,
    pub amenities: Vec<String>,

    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Calculated from ratings; see RatingRepository::update_venue_stats
    pub average_rating: f64,
    pub total_ratings: i32,
    pub total_reviews: i32,

    #[sqlx(default)]
    pub category_name: Option<String>,
    #[sqlx(default)]
    pub category_slug: Option<String>,
    #[sqlx(default)]
    pub primary_image: Option<String>,
}

/// Request DTO for creating a venue
/// DOCUMENTATION: Admin add-venue form; optional fields may be blank
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_numbers"))]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,

    #[validate(length(min = 1))]
    pub description: String,

    /// Falls back to the `category` query parameter of the add-venue page
    pub category_id: Option<Uuid>,

    #[validate(length(min = 1))]
    pub address: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[validate(range(min = 0.0))]
    pub price_range_min: Option<f64>,

    #[validate(range(min = 0.0))]
    pub price_range_max: Option<f64>,

    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,

    #[validate(url)]
    pub booking_com_link: Option<String>,

    #[validate(url)]
    pub trip_com_link: Option<String>,

    #[serde(default)]
    pub facilities: Option<ListInput>,

    #[serde(default)]
    pub languages_spoken: Option<ListInput>,

    #[serde(default)]
    pub amenities: Option<ListInput>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

/// Request DTO for editing a venue
/// DOCUMENTATION: All fields optional - only provided fields are updated
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_numbers"))]
pub struct UpdateVenueRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(length(min = 1))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[validate(range(min = 0.0))]
    pub price_range_min: Option<f64>,

    #[validate(range(min = 0.0))]
    pub price_range_max: Option<f64>,

    #[validate(custom = "validate_currency")]
    pub currency: Option<String>,

    #[validate(url)]
    pub booking_com_link: Option<String>,

    #[validate(url)]
    pub trip_com_link: Option<String>,

    pub facilities: Option<ListInput>,

    pub languages_spoken: Option<ListInput>,

    pub amenities: Option<ListInput>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,
}

fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency_code"))
    }
}

/// Coordinate bounds and price ordering, shared by both venue forms
fn check_numbers(
    latitude: Option<f64>,
    longitude: Option<f64>,
    price_min: Option<f64>,
    price_max: Option<f64>,
) -> Result<(), ValidationError> {
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        return Err(ValidationError::new("latitude_range"));
    }
    if longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
        return Err(ValidationError::new("longitude_range"));
    }
    match (price_min, price_max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::new("price_range_order")),
        _ => Ok(()),
    }
}

fn validate_create_numbers(req: &CreateVenueRequest) -> Result<(), ValidationError> {
    check_numbers(req.latitude, req.longitude, req.price_range_min, req.price_range_max)
}

fn validate_update_numbers(req: &UpdateVenueRequest) -> Result<(), ValidationError> {
    check_numbers(req.latitude, req.longitude, req.price_range_min, req.price_range_max)
}

/// Blank optional text counts as "not provided"
fn blank_to_none(field: &mut Option<String>) {
    let trimmed = field.as_deref().map(str::trim).map(str::to_string);
    *field = trimmed.filter(|s| !s.is_empty());
}

impl CreateVenueRequest {
    /// Trim the form before validation
    pub fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.description,
            &mut self.address,
            &mut self.city,
            &mut self.country,
        ] {
            *field = field.trim().to_string();
        }
        for field in [
            &mut self.slug,
            &mut self.phone,
            &mut self.email,
            &mut self.website,
            &mut self.currency,
            &mut self.booking_com_link,
            &mut self.trip_com_link,
        ] {
            blank_to_none(field);
        }
        if let Some(currency) = &mut self.currency {
            *currency = currency.to_ascii_uppercase();
        }
    }
}

impl UpdateVenueRequest {
    /// Trim the form before validation. Blank required fields stay as empty
    /// strings so validation rejects them; blank contact fields stay empty
    /// so an edit can clear them.
    pub fn normalize(&mut self) {
        for field in [&mut self.slug, &mut self.currency] {
            blank_to_none(field);
        }
        for field in [
            &mut self.name,
            &mut self.description,
            &mut self.address,
            &mut self.city,
            &mut self.country,
            &mut self.phone,
            &mut self.website,
            &mut self.booking_com_link,
            &mut self.trip_com_link,
            &mut self.email,
        ] {
            if let Some(value) = field {
                *value = value.trim().to_string();
            }
        }
        if let Some(currency) = &mut self.currency {
            *currency = currency.to_ascii_uppercase();
        }
    }

    /// Validation that tolerates clearing optional text fields
    pub fn validate_form(&self) -> Result<(), validator::ValidationErrors> {
        let mut candidate = self.clone();
        for field in [
            &mut candidate.phone,
            &mut candidate.email,
            &mut candidate.website,
            &mut candidate.booking_com_link,
            &mut candidate.trip_com_link,
        ] {
            blank_to_none(field);
        }
        candidate.validate()
    }

    /// Price ordering and coordinates with unchanged fields taken from the stored venue
    pub fn validate_against(&self, stored: &Venue) -> Result<(), ValidationErrors> {
        self.check_merged(
            stored.latitude,
            stored.longitude,
            stored.price_range_min,
            stored.price_range_max,
        )
    }

    fn check_merged(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        price_min: Option<f64>,
        price_max: Option<f64>,
    ) -> Result<(), ValidationErrors> {
        check_numbers(
            self.latitude.or(latitude),
            self.longitude.or(longitude),
            self.price_range_min.or(price_min),
            self.price_range_max.or(price_max),
        )
        .map_err(|error| {
            let mut errors = ValidationErrors::new();
            errors.add("__all__", error);
            errors
        })
    }
}

/// Filters of the public venue listing (`/venues`, `/venues/category/{slug}`)
#[derive(Debug, Default, Deserialize)]
pub struct VenueListQuery {
    pub category: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

/// Parameters of the search form (`/venues/search`)
#[derive(Debug, Default, Deserialize)]
pub struct VenueSearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

/// Search filter of the admin category view
#[derive(Debug, Default, Deserialize)]
pub struct AdminVenueQuery {
    pub search: Option<String>,
}

/// `category` query parameter of the add-venue page
#[derive(Debug, Default, Deserialize)]
pub struct AddVenueQuery {
    pub category: Option<String>,
}

/// Compact venue card used by listings
#[derive(Debug, Clone, Serialize)]
pub struct VenueSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub category: Option<String>,
    pub category_slug: Option<String>,
    pub city: String,
    pub country: String,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub total_reviews: i32,
    pub price_range_min: Option<f64>,
    pub price_range_max: Option<f64>,
    pub currency: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub primary_image_url: Option<String>,
}

/// Full venue payload used by detail and admin responses
#[derive(Debug, Clone, Serialize)]
pub struct VenueResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category_id: Uuid,
    pub category: Option<String>,
    pub category_slug: Option<String>,
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
    pub average_rating: f64,
    pub total_ratings: i32,
    pub total_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Venue detail page payload
#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub images: Vec<VenueImageResponse>,
    pub ratings: Vec<RatingResponse>,
    pub nearby_venues: Vec<VenueSummary>,
    /// The caller's own rating when logged in
    pub user_rating: Option<RatingResponse>,
}

/// Unpaginated search results
#[derive(Debug, Serialize)]
pub struct VenueSearchResponse {
    pub venues: Vec<VenueSummary>,
    pub search_query: Option<String>,
    pub category_filter: Option<String>,
    pub location_filter: Option<String>,
}

/// Landing page payload
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub statistics: Statistics,
    pub featured_venues: Vec<VenueSummary>,
    pub categories: Vec<Category>,
}

/// Listing page payload
#[derive(Debug, Serialize)]
pub struct VenueListResponse {
    pub venues: Vec<VenueSummary>,
    pub page: super::PageInfo,
    pub categories: Vec<Category>,
    /// Set when listing a single category
    pub category: Option<Category>,
    pub selected_category: Option<String>,
    pub search_query: Option<String>,
    pub city_filter: Option<String>,
}

impl Venue {
    pub fn to_summary(&self) -> VenueSummary {
        VenueSummary {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            category: self.category_name.clone(),
            category_slug: self.category_slug.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
            total_reviews: self.total_reviews,
            price_range_min: self.price_range_min,
            price_range_max: self.price_range_max,
            currency: self.currency.clone(),
            is_active: self.is_active,
            is_featured: self.is_featured,
            primary_image_url: self.primary_image.as_deref().map(media_url),
        }
    }

    pub fn to_response(&self) -> VenueResponse {
        VenueResponse {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
            category: self.category_name.clone(),
            category_slug: self.category_slug.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            price_range_min: self.price_range_min,
            price_range_max: self.price_range_max,
            currency: self.currency.clone(),
            booking_com_link: self.booking_com_link.clone(),
            trip_com_link: self.trip_com_link.clone(),
            facilities: self.facilities.clone(),
            languages_spoken: self.languages_spoken.clone(),
            amenities: self.amenities.clone(),
            is_active: self.is_active,
            is_featured: self.is_featured,
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
            total_reviews: self.total_reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateVenueRequest {
        CreateVenueRequest {
            name: "Grand Hotel".into(),
            description: "Rooms with a view".into(),
            category_id: Some(Uuid::new_v4()),
            address: "1 Main Street".into(),
            city: "Lisbon".into(),
            country: "Portugal".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_form_is_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let mut req = valid_request();
        req.name = "   ".into();
        req.normalize();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_optional_fields_are_ignored() {
        let mut req = valid_request();
        req.email = Some("".into());
        req.website = Some("  ".into());
        req.normalize();
        assert!(req.email.is_none());
        assert!(req.website.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_and_url() {
        let mut req = valid_request();
        req.email = Some("not-an-email".into());
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.booking_com_link = Some("booking".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_currency_is_upper_cased_and_checked() {
        let mut req = valid_request();
        req.currency = Some("eur".into());
        req.normalize();
        assert_eq!(req.currency.as_deref(), Some("EUR"));
        assert!(req.validate().is_ok());

        req.currency = Some("EURO".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_price_range_order() {
        let mut req = valid_request();
        req.price_range_min = Some(200.0);
        req.price_range_max = Some(100.0);
        assert!(req.validate().is_err());

        req.price_range_max = Some(250.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_coordinates_range() {
        let mut req = valid_request();
        req.latitude = Some(91.0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_allows_clearing_contact_fields() {
        let mut req = UpdateVenueRequest {
            email: Some("  ".into()),
            website: Some("".into()),
            ..Default::default()
        };
        req.normalize();
        assert_eq!(req.email.as_deref(), Some(""));
        assert!(req.validate_form().is_ok());
    }

    #[test]
    fn test_blank_description_and_address_are_rejected() {
        let mut req = valid_request();
        req.description = "   ".into();
        req.normalize();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.address = "  \t ".into();
        req.normalize();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_required_fields_are_trimmed() {
        let mut req = valid_request();
        req.description = "  Rooms with a view \n".into();
        req.address = " 1 Main Street ".into();
        req.normalize();
        assert_eq!(req.description, "Rooms with a view");
        assert_eq!(req.address, "1 Main Street");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_required_fields() {
        for blank in ["name", "description", "address", "city", "country"] {
            let mut req = UpdateVenueRequest::default();
            let value = Some("  ".to_string());
            match blank {
                "name" => req.name = value,
                "description" => req.description = value,
                "address" => req.address = value,
                "city" => req.city = value,
                _ => req.country = value,
            }
            req.normalize();
            assert!(req.validate_form().is_err(), "blank {} accepted", blank);
        }
    }

    #[test]
    fn test_update_blank_slug_means_no_change() {
        let mut req = UpdateVenueRequest {
            slug: Some("  ".into()),
            ..Default::default()
        };
        req.normalize();
        assert!(req.slug.is_none());
        assert!(req.validate_form().is_ok());
    }

    #[test]
    fn test_partial_price_edit_checked_against_stored_range() {
        let req = UpdateVenueRequest {
            price_range_min: Some(500.0),
            ..Default::default()
        };
        assert!(req.validate_form().is_ok());
        assert!(req.check_merged(None, None, None, Some(100.0)).is_err());
        assert!(req.check_merged(None, None, None, Some(800.0)).is_ok());
        assert!(req.check_merged(None, None, None, None).is_ok());

        let req = UpdateVenueRequest {
            price_range_min: Some(50.0),
            price_range_max: Some(80.0),
            ..Default::default()
        };
        assert!(req.check_merged(None, None, Some(10.0), Some(20.0)).is_ok());
    }

    #[test]
    fn test_form_accepts_comma_lists() {
        let json = r#"{
            "name": "Cafe Luz",
            "description": "Coffee",
            "address": "Rua 2",
            "city": "Porto",
            "country": "Portugal",
            "facilities": "WiFi, Terrace",
            "amenities": ["Vegan options"]
        }"#;
        let req: CreateVenueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            req.facilities.unwrap().into_list(),
            vec!["WiFi".to_string(), "Terrace".to_string()]
        );
        assert_eq!(req.amenities.unwrap().into_list(), vec!["Vegan options".to_string()]);
        assert!(req.languages_spoken.is_none());
    }
}
