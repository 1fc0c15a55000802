// src/bin/manage.rs
// DOCUMENTATION: Maintenance commands
// PURPOSE: Slug repair, image import, admin accounts, statistics, and a data report

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use venuerate::config::{init_db_pool, Config};
use venuerate::db::{ImageRepository, VenueFilter, VenueOrder, VenueRepository};
use venuerate::errors::VenueError;
use venuerate::models::Statistics;
use venuerate::services::{
    image_extension, slug, AuthService, MediaStorage, StatisticsService, VENUE_IMAGES_DIR,
};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Venue rating maintenance commands", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Give every venue with an empty slug a unique one derived from its name
    FixSlugs,

    /// Copy an image file into media storage and attach it to a venue
    AddImage {
        /// Slug of the venue
        #[arg(long, value_name = "SLUG")]
        venue_slug: String,

        /// Path of the image file to import
        #[arg(long, value_name = "PATH")]
        image_path: PathBuf,

        /// Optional caption
        #[arg(long, default_value = "")]
        caption: String,

        /// Make it the primary image even if the venue already has one
        #[arg(long)]
        primary: bool,
    },

    /// Create an admin account, or promote an existing user and reset their password
    CreateAdmin {
        #[arg(long, value_name = "USERNAME")]
        username: String,

        #[arg(long, value_name = "EMAIL", default_value = "")]
        email: String,

        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },

    /// Recompute the site statistics
    RefreshStats,

    /// Print counts, venues per category, top-rated venues, and cities
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::FixSlugs => fix_slugs(&pool).await?,
        Commands::AddImage {
            venue_slug,
            image_path,
            caption,
            primary,
        } => {
            let storage = MediaStorage::new(&config.media_root, config.max_upload_bytes);
            add_image(&pool, &storage, &venue_slug, &image_path, &caption, primary).await?
        }
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => create_admin(&pool, &username, &email, &password).await?,
        Commands::RefreshStats => {
            let stats = StatisticsService::update_all(&pool).await?;
            print_statistics(&stats);
        }
        Commands::Report => report(&pool).await?,
    }

    Ok(())
}

async fn fix_slugs(pool: &sqlx::PgPool) -> Result<()> {
    let venues = VenueRepository::with_empty_slug(pool).await?;
    if venues.is_empty() {
        println!("{}All venues already have slugs.{}", GREEN, RESET);
        return Ok(());
    }

    let mut fixed = 0;
    for (id, name) in venues {
        let new_slug = slug::unique_venue_slug(pool, &name, Some(id)).await?;
        VenueRepository::set_slug(pool, id, &new_slug).await?;
        println!("Fixed slug for venue '{}': {}", name, new_slug);
        fixed += 1;
    }

    println!("{}Fixed {} venue slugs{}", GREEN, fixed, RESET);
    Ok(())
}

async fn add_image(
    pool: &sqlx::PgPool,
    storage: &MediaStorage,
    venue_slug: &str,
    image_path: &Path,
    caption: &str,
    primary: bool,
) -> Result<()> {
    if !image_path.is_file() {
        bail!("Image file not found: {}", image_path.display());
    }
    let extension = match image_extension(image_path) {
        Some(ext) => ext,
        None => bail!("Unsupported image type: {}", image_path.display()),
    };

    let venue = match VenueRepository::get_by_slug(pool, venue_slug, false).await {
        Ok(venue) => venue,
        Err(VenueError::NotFound(_)) => bail!("Venue with slug '{}' not found", venue_slug),
        Err(e) => return Err(e.into()),
    };

    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read {}", image_path.display()))?;
    let stored = storage.save(VENUE_IMAGES_DIR, extension, &bytes).await?;
    let image = ImageRepository::create(pool, venue.id, &stored, caption.trim(), primary).await?;

    println!(
        "{}Added image to {}: {} (primary: {}, order: {}){}",
        GREEN, venue.name, stored, image.is_primary, image.display_order, RESET
    );
    Ok(())
}

async fn create_admin(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        bail!("Username must not be empty");
    }
    if password.chars().count() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let (id, created) = AuthService::create_admin(pool, username, email.trim(), password).await?;
    if created {
        println!("{}Created admin user {} ({}){}", GREEN, username, id, RESET);
    } else {
        println!(
            "{}User {} already existed: promoted to admin and password reset{}",
            YELLOW, username, RESET
        );
    }
    Ok(())
}

fn print_statistics(stats: &Statistics) {
    println!("{}Site statistics{} (updated {})", BOLD, RESET, stats.last_updated);
    println!("  Venues:      {}", stats.total_venues);
    println!("  Hotels:      {}", stats.total_hotels);
    println!("  Restaurants: {}", stats.total_restaurants);
    println!("  Cafes:       {}", stats.total_cafes);
    println!("  Attractions: {}", stats.total_attractions);
    println!("  Cities:      {}", stats.total_cities);
    println!("  Users:       {}", stats.total_users);
    println!("  Ratings:     {}", stats.total_ratings);
}

async fn report(pool: &sqlx::PgPool) -> Result<()> {
    let stats = StatisticsService::update_all(pool).await?;
    print_statistics(&stats);

    let filter = VenueFilter {
        active_only: true,
        ..Default::default()
    };
    let venues = VenueRepository::list(pool, &filter, VenueOrder::TopRated, None, 0).await?;

    // category -> (venues, sum of averages)
    let mut per_category: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    let mut per_city: BTreeMap<String, usize> = BTreeMap::new();
    for venue in &venues {
        let name = venue.category_name.clone().unwrap_or_default();
        let entry = per_category.entry(name).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += venue.average_rating;
        *per_city.entry(venue.city.clone()).or_insert(0) += 1;
    }

    println!("\n{}Venues per category{}", CYAN, RESET);
    println!("──────────────────────────────────────────────");
    println!("{:<25} {:>8} {:>10}", "Category", "Venues", "Avg");
    for (category, (count, sum)) in &per_category {
        println!("{:<25} {:>8} {:>10.2}", category, count, sum / *count as f64);
    }

    println!("\n{}Top rated venues{}", CYAN, RESET);
    println!("──────────────────────────────────────────────");
    for venue in venues.iter().filter(|v| v.total_ratings > 0).take(5) {
        println!(
            "{:<30} {:>5.2} ({} ratings)",
            venue.name, venue.average_rating, venue.total_ratings
        );
    }

    println!("\n{}Cities{}", CYAN, RESET);
    println!("──────────────────────────────────────────────");
    for (city, count) in &per_city {
        println!("{:<30} {:>5}", city, count);
    }

    Ok(())
}
