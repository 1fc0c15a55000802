// src/handlers/contact.rs

use crate::errors::VenueError;
use crate::models::CreateContactRequest;
use crate::services::{client_key, ContactService, RateLimiters};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /contact
pub async fn submit_contact(
    pool: web::Data<PgPool>,
    limiters: web::Data<RateLimiters>,
    req: HttpRequest,
    body: web::Json<CreateContactRequest>,
) -> Result<impl Responder, VenueError> {
    limiters.contact.check(&client_key(&req))?;

    let response = ContactService::submit(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(submit_contact));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::lazy_pool;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    fn invalid_message() -> serde_json::Value {
        json!({
            "name": "Ana",
            "email": "not-an-email",
            "subject": "Hello",
            "message": "Hi"
        })
    }

    #[actix_web::test]
    async fn test_invalid_contact_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(RateLimiters::new(10, 10)))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/contact")
            .set_json(invalid_message())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_contact_is_rate_limited() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(RateLimiters::new(10, 1)))
                .configure(config),
        )
        .await;

        let first = test::TestRequest::post()
            .uri("/contact")
            .insert_header(("X-Forwarded-For", "198.51.100.4"))
            .set_json(invalid_message())
            .to_request();
        assert_eq!(
            test::call_service(&app, first).await.status(),
            StatusCode::BAD_REQUEST
        );

        let second = test::TestRequest::post()
            .uri("/contact")
            .insert_header(("X-Forwarded-For", "198.51.100.4"))
            .set_json(invalid_message())
            .to_request();
        assert_eq!(
            test::call_service(&app, second).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
