// src/handlers/media.rs
// DOCUMENTATION: Uploaded file serving
// PURPOSE: Stream venue images and avatars from MEDIA_ROOT

use crate::errors::VenueError;
use crate::services::{content_type_for_path, MediaStorage};
use actix_web::{web, HttpResponse, Responder};

/// GET /media/{path:.*}
pub async fn serve_media(
    storage: web::Data<MediaStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, VenueError> {
    let relative = path.into_inner();
    let bytes = storage.read(&relative).await?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for_path(&relative))
        .insert_header(("Cache-Control", "public, max-age=86400"))
        .body(bytes))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/media/{path:.*}", web::get().to(serve_media));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::VENUE_IMAGES_DIR;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    fn temp_storage() -> MediaStorage {
        let root = std::env::temp_dir().join(format!("venuerate-media-{}", uuid::Uuid::new_v4().simple()));
        MediaStorage::new(root, 1024)
    }

    #[actix_web::test]
    async fn test_serves_stored_file() {
        let storage = temp_storage();
        let path = storage.save(VENUE_IMAGES_DIR, "png", b"png-bytes").await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/media/{}", path))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
            "image/png"
        );
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"png-bytes");
    }

    #[actix_web::test]
    async fn test_missing_and_traversal_paths_are_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(temp_storage()))
                .configure(config),
        )
        .await;

        for uri in ["/media/venues/images/missing.jpg", "/media/venues/%2E%2E/%2E%2E/etc/passwd"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }
}
