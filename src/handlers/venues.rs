// src/handlers/venues.rs
// DOCUMENTATION: Public venue handlers
// PURPOSE: Listings, search, category pages, detail pages, and rating

use crate::errors::VenueError;
use crate::models::{RateVenueRequest, VenueListQuery, VenueSearchQuery};
use crate::services::{AuthService, RatingService, VenueService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// GET /venues?category=&city=&search=&page=
pub async fn list_venues(
    pool: web::Data<PgPool>,
    query: web::Query<VenueListQuery>,
) -> Result<impl Responder, VenueError> {
    let page = VenueService::list_venues(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /venues/search?q=&category=&location=
pub async fn search_venues(
    pool: web::Data<PgPool>,
    query: web::Query<VenueSearchQuery>,
) -> Result<impl Responder, VenueError> {
    let results = VenueService::search_venues(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// GET /venues/category/{slug}?city=&search=&page=
pub async fn list_by_category(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<VenueListQuery>,
) -> Result<impl Responder, VenueError> {
    let slug = path.into_inner();
    let page = VenueService::list_by_category(pool.get_ref(), &slug, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /venue/{slug}
pub async fn venue_detail(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::current_user(pool.get_ref(), &req).await?;
    let detail = VenueService::venue_detail(pool.get_ref(), &path, caller.as_ref()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// GET /venue/{slug}/rate
/// The caller's current rating, or null
pub async fn my_rating(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_user(pool.get_ref(), &req).await?;
    let rating = RatingService::my_rating(pool.get_ref(), &caller, &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "rating": rating })))
}

/// POST /venue/{slug}/rate
pub async fn rate_venue(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<RateVenueRequest>,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_user(pool.get_ref(), &req).await?;
    let result =
        RatingService::rate_venue(pool.get_ref(), &caller, &path, body.into_inner()).await?;

    if result.created {
        Ok(HttpResponse::Created().json(result))
    } else {
        Ok(HttpResponse::Ok().json(result))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venues")
            .route("", web::get().to(list_venues))
            .route("/search", web::get().to(search_venues))
            .route("/category/{slug}", web::get().to(list_by_category)),
    )
    .service(
        web::scope("/venue")
            .route("/{slug}", web::get().to(venue_detail))
            .route("/{slug}/rate", web::get().to(my_rating))
            .route("/{slug}/rate", web::post().to(rate_venue)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_rate_requires_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/venue/grand-hotel/rate")
            .set_json(json!({ "rating": 5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/venue/grand-hotel/rate")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
