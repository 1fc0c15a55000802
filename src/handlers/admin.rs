// src/handlers/admin.rs
// DOCUMENTATION: Admin dashboard handlers
// PURPOSE: Venue, image, category, and message management for staff users

use crate::errors::VenueError;
use crate::handlers::accounts::upload_extension;
use crate::models::{
    AddVenueQuery, AdminVenueQuery, BulkActionRequest, ContactListQuery, CreateCategoryRequest,
    CreateVenueRequest, ImageUploadQuery, MarkReadRequest, MessageResponse, UpdateCategoryRequest,
    UpdateFlagsRequest, UpdateVenueRequest,
};
use crate::services::{AdminService, AuthService, MediaStorage, StatisticsService, VenueService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// GET /admin/dashboard
pub async fn dashboard(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let dashboard = AdminService::dashboard(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// GET /admin/category/{slug}?search=
pub async fn venues_by_category(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<AdminVenueQuery>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let view =
        AdminService::venues_by_category(pool.get_ref(), &path, query.search.as_deref()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /admin/category/{slug}/edit
pub async fn edit_venues(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let view = AdminService::venues_by_category(pool.get_ref(), &path, None).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /admin/category/{slug}/edit
pub async fn update_flags(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateFlagsRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let result = AdminService::update_flags(pool.get_ref(), &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /admin/category/{slug}/bulk-action
pub async fn bulk_action(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<BulkActionRequest>,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_admin(pool.get_ref(), &req).await?;
    let result =
        AdminService::bulk_action(pool.get_ref(), storage.get_ref(), &path, body.into_inner())
            .await?;
    log::info!("{} ran a bulk action: {}", caller.user.username, result.message);
    Ok(HttpResponse::Ok().json(result))
}

/// POST /admin/venues?category=
pub async fn add_venue(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<AddVenueQuery>,
    body: web::Json<CreateVenueRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let venue =
        VenueService::create_venue(pool.get_ref(), body.into_inner(), query.category.as_deref())
            .await?;
    Ok(HttpResponse::Created().json(venue))
}

/// PUT /admin/venues/{id}
pub async fn edit_venue(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateVenueRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let venue =
        VenueService::update_venue(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(venue))
}

/// DELETE /admin/venues/{id}
pub async fn delete_venue(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let name = VenueService::delete_venue(pool.get_ref(), storage.get_ref(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Venue {} deleted successfully.",
        name
    ))))
}

/// POST /admin/venues/{id}/images?caption=
/// Raw image body; Content-Type selects the file extension
pub async fn upload_image(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ImageUploadQuery>,
    body: web::Bytes,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let extension = upload_extension(&req)?;

    let image = VenueService::upload_image(
        pool.get_ref(),
        storage.get_ref(),
        path.into_inner(),
        extension,
        &body,
        query.caption.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Created().json(image))
}

/// DELETE /admin/venues/{id}/images/{image_id}
pub async fn delete_image(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let (venue_id, image_id) = path.into_inner();
    VenueService::delete_image(pool.get_ref(), storage.get_ref(), venue_id, image_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /admin/venues/{id}/images/{image_id}/primary
pub async fn set_primary_image(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let (venue_id, image_id) = path.into_inner();
    let images = VenueService::set_primary_image(pool.get_ref(), venue_id, image_id).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// GET /admin/categories
pub async fn list_categories(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let categories = AdminService::list_categories(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// POST /admin/categories
pub async fn create_category(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<CreateCategoryRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let category = AdminService::create_category(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

/// PUT /admin/categories/{id}
pub async fn update_category(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let category =
        AdminService::update_category(pool.get_ref(), path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(category))
}

/// DELETE /admin/categories/{id}
/// Cascades to the category's venues
pub async fn delete_category(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    AdminService::delete_category(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /admin/messages?unread_only=
pub async fn list_messages(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    query: web::Query<ContactListQuery>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let messages = AdminService::list_messages(pool.get_ref(), query.unread_only).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// POST /admin/messages/mark-read
pub async fn mark_messages_read(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<MarkReadRequest>,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let result = AdminService::mark_messages_read(pool.get_ref(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /admin/statistics
/// Recompute and return the snapshot
pub async fn statistics(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, VenueError> {
    AuthService::require_admin(pool.get_ref(), &req).await?;
    let stats = StatisticsService::update_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/dashboard", web::get().to(dashboard))
            .route("/category/{slug}", web::get().to(venues_by_category))
            .route("/category/{slug}/edit", web::get().to(edit_venues))
            .route("/category/{slug}/edit", web::post().to(update_flags))
            .route("/category/{slug}/bulk-action", web::post().to(bulk_action))
            .route("/venues", web::post().to(add_venue))
            .route("/venues/{id}", web::put().to(edit_venue))
            .route("/venues/{id}", web::delete().to(delete_venue))
            .route("/venues/{id}/images", web::post().to(upload_image))
            .route("/venues/{id}/images/{image_id}", web::delete().to(delete_image))
            .route(
                "/venues/{id}/images/{image_id}/primary",
                web::post().to(set_primary_image),
            )
            .route("/categories", web::get().to(list_categories))
            .route("/categories", web::post().to(create_category))
            .route("/categories/{id}", web::put().to(update_category))
            .route("/categories/{id}", web::delete().to(delete_category))
            .route("/messages", web::get().to(list_messages))
            .route("/messages/mark-read", web::post().to(mark_messages_read))
            .route("/statistics", web::get().to(statistics)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_admin_routes_require_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        for uri in ["/admin/dashboard", "/admin/category/hotels", "/admin/statistics"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_unauthorized_body_shape() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/dashboard").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}
