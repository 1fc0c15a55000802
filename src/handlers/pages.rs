// src/handlers/pages.rs
// DOCUMENTATION: Landing and about pages
// PURPOSE: Statistics snapshot, featured venues, and categories

use crate::errors::VenueError;
use crate::services::VenueService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /
pub async fn home(pool: web::Data<PgPool>) -> Result<impl Responder, VenueError> {
    let page = VenueService::home(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /about
pub async fn about(pool: web::Data<PgPool>) -> Result<impl Responder, VenueError> {
    let statistics = VenueService::about(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "statistics": statistics })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/about", web::get().to(about));
}
