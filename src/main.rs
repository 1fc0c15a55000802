// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use venuerate::config::{self, Config};
use venuerate::errors::VenueError;
use venuerate::handlers;
use venuerate::services::{
    start_rate_limit_cleanup_task, start_session_purge_task, MediaStorage, RateLimiters,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting venuerate...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool (runs migrations)
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Upload storage and rate limiters
    let storage = MediaStorage::new(&config.media_root, config.max_upload_bytes);
    log::info!("Media root: {}", config.media_root);

    let limiters = Arc::new(RateLimiters::new(
        config.login_rate_per_minute,
        config.contact_rate_per_minute,
    ));

    // Background maintenance (every 10 minutes)
    start_session_purge_task(pool.clone(), 600);
    start_rate_limit_cleanup_task(limiters.clone(), 600);
    log::info!("Started session purge and rate limiter cleanup tasks");

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();
    let limiters = web::Data::from(limiters);

    HttpServer::new(move || {
        let json_config = web::JsonConfig::default()
            .limit(64 * 1024)
            .error_handler(|err, _req| VenueError::InvalidInput(err.to_string()).into());
        let query_config = web::QueryConfig::default()
            .error_handler(|err, _req| VenueError::InvalidInput(err.to_string()).into());
        let path_config = web::PathConfig::default()
            .error_handler(|err, _req| VenueError::NotFound(err.to_string()).into());

        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(limiters.clone())
            .app_data(web::PayloadConfig::new(config_clone.max_upload_bytes))
            .app_data(json_config)
            .app_data(query_config)
            .app_data(path_config)
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::pages_config)
            .configure(handlers::venues_config)
            .configure(handlers::accounts_config)
            .configure(handlers::contact_config)
            .configure(handlers::admin_config)
            .configure(handlers::media_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
