// tests/db_integration.rs
// Repository and service behaviour against PostgreSQL.
// Each test gets a fresh database with the migrations applied:
//   DATABASE_URL=postgres://... cargo test --test db_integration -- --ignored

use sqlx::PgPool;
use uuid::Uuid;
use venuerate::db::{
    CategoryRepository, ImageRepository, NewVenue, RatingRepository, UserRepository,
    VenueRepository,
};
use venuerate::errors::VenueError;
use venuerate::models::{BulkActionRequest, Venue};
use venuerate::services::{AdminService, MediaStorage, StatisticsService};

async fn category_id(pool: &PgPool, slug: &str) -> Uuid {
    CategoryRepository::get_by_slug(pool, slug).await.unwrap().id
}

fn new_venue(category_id: Uuid, name: &str, slug: &str, city: &str) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        slug: slug.to_string(),
        description: "Test venue".to_string(),
        category_id,
        address: "1 Test Street".to_string(),
        city: city.to_string(),
        country: "Portugal".to_string(),
        latitude: None,
        longitude: None,
        phone: String::new(),
        email: String::new(),
        website: String::new(),
        price_range_min: None,
        price_range_max: None,
        currency: "EUR".to_string(),
        booking_com_link: String::new(),
        trip_com_link: String::new(),
        facilities: Vec::new(),
        languages_spoken: Vec::new(),
        amenities: Vec::new(),
        is_active: true,
        is_featured: false,
    }
}

async fn create_venue(pool: &PgPool, category: &str, slug: &str) -> Venue {
    let category_id = category_id(pool, category).await;
    VenueRepository::create(pool, &new_venue(category_id, slug, slug, "Lisbon"))
        .await
        .unwrap()
}

async fn create_user(pool: &PgPool, username: &str) -> Uuid {
    let (user, _) = UserRepository::create_with_profile(pool, username, "", "not-a-real-hash", false)
        .await
        .unwrap();
    user.id
}

fn temp_storage() -> MediaStorage {
    let root = std::env::temp_dir().join(format!("venuerate-it-{}", Uuid::new_v4().simple()));
    MediaStorage::new(root, 1024)
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_rating_stats_without_ratings_are_zero(pool: PgPool) {
    let venue = create_venue(&pool, "hotels", "empty-hotel").await;

    let stats = RatingRepository::update_venue_stats(&pool, venue.id).await.unwrap();
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.total_ratings, 0);
    assert_eq!(stats.total_reviews, 0);
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_rating_stats_round_and_count_reviews(pool: PgPool) {
    let venue = create_venue(&pool, "restaurants", "casa-test").await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let carol = create_user(&pool, "carol").await;

    RatingRepository::upsert(&pool, venue.id, alice, 5, "Excellent").await.unwrap();
    RatingRepository::upsert(&pool, venue.id, bob, 4, "").await.unwrap();
    RatingRepository::upsert(&pool, venue.id, carol, 4, "Good value").await.unwrap();

    let stats = RatingRepository::update_venue_stats(&pool, venue.id).await.unwrap();
    assert!((stats.average_rating - 4.33).abs() < 1e-9);
    assert_eq!(stats.total_ratings, 3);
    assert_eq!(stats.total_reviews, 2);

    let stored = VenueRepository::get_by_id(&pool, venue.id).await.unwrap();
    assert!((stored.average_rating - 4.33).abs() < 1e-9);
    assert_eq!(stored.total_ratings, 3);
    assert_eq!(stored.total_reviews, 2);
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_rating_stats_unknown_venue(pool: PgPool) {
    let result = RatingRepository::update_venue_stats(&pool, Uuid::new_v4()).await;
    assert!(matches!(result, Err(VenueError::NotFound(_))));
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_second_rating_replaces_the_first(pool: PgPool) {
    let venue = create_venue(&pool, "cafes", "bean-test").await;
    let user = create_user(&pool, "dora").await;

    let (first, created) = RatingRepository::upsert(&pool, venue.id, user, 2, "Meh").await.unwrap();
    assert!(created);

    let (second, created) = RatingRepository::upsert(&pool, venue.id, user, 5, "").await.unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.rating, 5);
    assert_eq!(second.comment, "");

    let ratings = RatingRepository::list_by_venue(&pool, venue.id).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].username.as_deref(), Some("dora"));

    let stats = RatingRepository::update_venue_stats(&pool, venue.id).await.unwrap();
    assert_eq!(stats.average_rating, 5.0);
    assert_eq!(stats.total_ratings, 1);
    assert_eq!(stats.total_reviews, 0);
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_statistics_computed_on_first_creation(pool: PgPool) {
    create_venue(&pool, "hotels", "first-hotel").await;
    create_venue(&pool, "attractions", "old-castle").await;
    let hidden = create_venue(&pool, "hotels", "closed-hotel").await;
    VenueRepository::bulk_set_active(&pool, &[hidden.id], hidden.category_id, false)
        .await
        .unwrap();
    create_user(&pool, "erin").await;

    let stats = StatisticsService::get_or_create(&pool).await.unwrap();
    assert_eq!(stats.total_venues, 2);
    assert_eq!(stats.total_hotels, 1);
    assert_eq!(stats.total_attractions, 1);
    assert_eq!(stats.total_cities, 1);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_ratings, 0);

    // an existing snapshot is returned as stored until the next refresh
    create_user(&pool, "frank").await;
    let stale = StatisticsService::get_or_create(&pool).await.unwrap();
    assert_eq!(stale.total_users, 1);

    let fresh = StatisticsService::update_all(&pool).await.unwrap();
    assert_eq!(fresh.total_users, 2);
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_slugs_with_base_treats_wildcards_literally(pool: PgPool) {
    let hotels = category_id(&pool, "hotels").await;
    let mut ids = Vec::new();
    for slug in ["a_b", "a_b-2", "axb-3", "100%", "100%-1", "1000-1"] {
        let venue = VenueRepository::create(&pool, &new_venue(hotels, slug, slug, "Porto"))
            .await
            .unwrap();
        ids.push(venue.id);
    }

    let taken = VenueRepository::slugs_with_base(&pool, "a_b", None).await.unwrap();
    assert_eq!(taken.len(), 2);
    assert!(taken.contains("a_b"));
    assert!(taken.contains("a_b-2"));

    let taken = VenueRepository::slugs_with_base(&pool, "100%", None).await.unwrap();
    assert_eq!(taken.len(), 2);
    assert!(taken.contains("100%-1"));
    assert!(!taken.contains("1000-1"));

    let taken = VenueRepository::slugs_with_base(&pool, "a_b", Some(ids[0])).await.unwrap();
    assert_eq!(taken.len(), 1);
    assert!(taken.contains("a_b-2"));
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_bulk_action_only_touches_the_category(pool: PgPool) {
    let storage = temp_storage();
    let hotel_a = create_venue(&pool, "hotels", "hotel-a").await;
    let hotel_b = create_venue(&pool, "hotels", "hotel-b").await;
    let restaurant = create_venue(&pool, "restaurants", "diner").await;

    let response = AdminService::bulk_action(
        &pool,
        &storage,
        "hotels",
        BulkActionRequest {
            action: "deactivate".to_string(),
            venue_ids: vec![hotel_a.id, restaurant.id],
        },
    )
    .await
    .unwrap();
    assert_eq!(response.affected, 1);
    assert!(!VenueRepository::get_by_id(&pool, hotel_a.id).await.unwrap().is_active);
    assert!(VenueRepository::get_by_id(&pool, restaurant.id).await.unwrap().is_active);

    let response = AdminService::bulk_action(
        &pool,
        &storage,
        "hotels",
        BulkActionRequest {
            action: "delete".to_string(),
            venue_ids: vec![hotel_b.id, restaurant.id],
        },
    )
    .await
    .unwrap();
    assert_eq!(response.affected, 1);
    assert!(matches!(
        VenueRepository::get_by_id(&pool, hotel_b.id).await,
        Err(VenueError::NotFound(_))
    ));
    assert!(VenueRepository::get_by_id(&pool, restaurant.id).await.is_ok());
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_bulk_action_rejects_unknown_action(pool: PgPool) {
    let venue = create_venue(&pool, "cafes", "corner-cafe").await;
    let result = AdminService::bulk_action(
        &pool,
        &temp_storage(),
        "cafes",
        BulkActionRequest {
            action: "archive".to_string(),
            venue_ids: vec![venue.id],
        },
    )
    .await;
    assert!(matches!(result, Err(VenueError::InvalidInput(_))));
}

#[sqlx::test]
#[ignore = "Requires a PostgreSQL server (DATABASE_URL)"]
async fn test_gallery_in_display_order(pool: PgPool) {
    let venue = create_venue(&pool, "attractions", "tower").await;

    let first = ImageRepository::create(&pool, venue.id, "venues/images/1.jpg", "", false)
        .await
        .unwrap();
    assert!(first.is_primary);
    assert_eq!(first.display_order, 0);

    let second = ImageRepository::create(&pool, venue.id, "venues/images/2.jpg", "", true)
        .await
        .unwrap();
    assert!(second.is_primary);
    assert_eq!(second.display_order, 1);

    let gallery = ImageRepository::list_by_venue(&pool, venue.id).await.unwrap();
    let paths: Vec<&str> = gallery.iter().map(|i| i.image_path.as_str()).collect();
    assert_eq!(paths, vec!["venues/images/1.jpg", "venues/images/2.jpg"]);
    assert_eq!(gallery.iter().filter(|i| i.is_primary).count(), 1);

    let stored = VenueRepository::get_by_id(&pool, venue.id).await.unwrap();
    assert_eq!(stored.primary_image.as_deref(), Some("venues/images/2.jpg"));
}
