// src/handlers/accounts.rs
// DOCUMENTATION: Account handlers
// PURPOSE: Registration, login/logout sessions, and the profile page

use crate::config::Config;
use crate::errors::VenueError;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, UpdateProfileRequest};
use crate::services::{
    client_key, extension_for_content_type, session_token, AuthService, MediaStorage,
    RateLimiters, SESSION_COOKIE,
};
use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// HttpOnly session cookie; Secure outside development
fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.environment == "production")
        .max_age(time::Duration::hours(config.session_lifetime_hours()))
        .finish()
}

/// POST /accounts/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, VenueError> {
    let session =
        AuthService::register(pool.get_ref(), body.into_inner(), config.session_lifetime_hours())
            .await?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&session.token, &config))
        .json(session))
}

/// POST /accounts/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiters: web::Data<RateLimiters>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, VenueError> {
    limiters.login.check(&client_key(&req))?;

    let session =
        AuthService::login(pool.get_ref(), body.into_inner(), config.session_lifetime_hours())
            .await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session.token, &config))
        .json(session))
}

/// POST /accounts/logout
pub async fn logout(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, VenueError> {
    if let Some(token) = session_token(&req) {
        AuthService::logout(pool.get_ref(), &token).await?;
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(MessageResponse::new("You have been logged out.")))
}

/// GET /accounts/profile
pub async fn profile(
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_user(pool.get_ref(), &req).await?;
    let profile = AuthService::profile(pool.get_ref(), &caller).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /accounts/profile
pub async fn edit_profile(
    pool: web::Data<PgPool>,
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_user(pool.get_ref(), &req).await?;
    let profile = AuthService::update_profile(pool.get_ref(), &caller, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /accounts/profile/avatar
/// Raw image body; Content-Type selects the file extension
pub async fn upload_avatar(
    pool: web::Data<PgPool>,
    storage: web::Data<MediaStorage>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, VenueError> {
    let caller = AuthService::require_user(pool.get_ref(), &req).await?;
    let extension = upload_extension(&req)?;

    let profile =
        AuthService::upload_avatar(pool.get_ref(), storage.get_ref(), &caller, extension, &body)
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// File extension of an image upload, from its Content-Type
pub(crate) fn upload_extension(req: &HttpRequest) -> Result<&'static str, VenueError> {
    req.headers()
        .get("Content-Type")
        .and_then(|h| h.to_str().ok())
        .and_then(extension_for_content_type)
        .ok_or_else(|| {
            VenueError::InvalidInput(
                "Upload a valid image (JPEG, PNG, GIF, or WebP).".to_string(),
            )
        })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/accounts")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/profile", web::get().to(profile))
            .route("/profile", web::put().to(edit_profile))
            .route("/profile/avatar", web::put().to(upload_avatar)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_register_validates_before_touching_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/accounts/register")
            .set_json(json!({
                "username": "ana",
                "email": "ana@example.com",
                "password": "correct horse",
                "password_confirm": "different horse"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_profile_requires_login() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/accounts/profile").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_logout_without_session_clears_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post().uri("/accounts/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), "");
    }

    #[actix_web::test]
    async fn test_session_cookie_matches_stored_lifetime() {
        let mut config = Config::for_tests();
        config.session_ttl_hours = 0;
        let cookie = session_cookie("token", &config);
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[actix_web::test]
    async fn test_upload_extension() {
        let req = test::TestRequest::default()
            .insert_header(("Content-Type", "image/png"))
            .to_http_request();
        assert_eq!(upload_extension(&req).unwrap(), "png");

        let req = test::TestRequest::default()
            .insert_header(("Content-Type", "application/pdf"))
            .to_http_request();
        assert!(upload_extension(&req).is_err());
    }
}
