// src/bin/seed.rs
// Creates demo venues on a running instance through the admin API
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

// --- Data ---

#[derive(Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct VenuePayload {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    address: &'static str,
    city: &'static str,
    country: &'static str,
    price_range_min: f64,
    price_range_max: f64,
    currency: &'static str,
    amenities: Vec<&'static str>,
    is_featured: bool,
}

#[derive(Deserialize, Debug)]
struct CreatedVenue {
    slug: String,
}

struct DemoVenue {
    category: &'static str,
    venue: VenuePayload,
}

#[derive(Debug)]
struct SeedResult {
    name: String,
    category: String,
    outcome: Outcome,
    duration_secs: f64,
}

#[derive(Debug)]
enum Outcome {
    Created(String),
    Exists,
    Failed(String),
}

/// Fixed slugs: a second run gets 409 instead of creating copies
fn demo_venues() -> Vec<DemoVenue> {
    vec![
        DemoVenue {
            category: "hotels",
            venue: VenuePayload {
                name: "Grand Riverside Hotel",
                slug: "grand-riverside-hotel",
                description: "Quiet rooms above the river with a rooftop terrace.",
                address: "12 Quay Street",
                city: "Lisbon",
                country: "Portugal",
                price_range_min: 120.0,
                price_range_max: 340.0,
                currency: "EUR",
                amenities: vec!["WiFi", "Breakfast", "Rooftop bar"],
                is_featured: true,
            },
        },
        DemoVenue {
            category: "hotels",
            venue: VenuePayload {
                name: "Old Town Inn",
                slug: "old-town-inn",
                description: "Family-run inn a short walk from the cathedral.",
                address: "4 Market Lane",
                city: "Porto",
                country: "Portugal",
                price_range_min: 70.0,
                price_range_max: 140.0,
                currency: "EUR",
                amenities: vec!["WiFi", "Parking"],
                is_featured: false,
            },
        },
        DemoVenue {
            category: "restaurants",
            venue: VenuePayload {
                name: "Casa do Mar",
                slug: "casa-do-mar",
                description: "Grilled fish and seafood rice by the harbour.",
                address: "88 Harbour Road",
                city: "Lisbon",
                country: "Portugal",
                price_range_min: 20.0,
                price_range_max: 55.0,
                currency: "EUR",
                amenities: vec!["Terrace", "Reservations"],
                is_featured: true,
            },
        },
        DemoVenue {
            category: "restaurants",
            venue: VenuePayload {
                name: "Trattoria Nonna",
                slug: "trattoria-nonna",
                description: "Fresh pasta made every morning.",
                address: "21 Via Roma",
                city: "Florence",
                country: "Italy",
                price_range_min: 15.0,
                price_range_max: 40.0,
                currency: "EUR",
                amenities: vec!["Vegetarian options"],
                is_featured: false,
            },
        },
        DemoVenue {
            category: "cafes",
            venue: VenuePayload {
                name: "Morning Grind",
                slug: "morning-grind",
                description: "Specialty coffee and pastries from a local bakery.",
                address: "3 Station Square",
                city: "London",
                country: "United Kingdom",
                price_range_min: 3.0,
                price_range_max: 12.0,
                currency: "GBP",
                amenities: vec!["WiFi", "Outdoor seating"],
                is_featured: true,
            },
        },
        DemoVenue {
            category: "cafes",
            venue: VenuePayload {
                name: "Kaffeehaus Linde",
                slug: "kaffeehaus-linde",
                description: "Cakes, coffee and newspapers in a century-old room.",
                address: "9 Lindenplatz",
                city: "Vienna",
                country: "Austria",
                price_range_min: 4.0,
                price_range_max: 15.0,
                currency: "EUR",
                amenities: vec!["Newspapers"],
                is_featured: false,
            },
        },
        DemoVenue {
            category: "amusement-parks",
            venue: VenuePayload {
                name: "Sunny Bay Park",
                slug: "sunny-bay-park",
                description: "Roller coasters and a water park by the beach.",
                address: "1 Coast Highway",
                city: "Barcelona",
                country: "Spain",
                price_range_min: 35.0,
                price_range_max: 60.0,
                currency: "EUR",
                amenities: vec!["Parking", "Lockers", "Food court"],
                is_featured: false,
            },
        },
        DemoVenue {
            category: "attractions",
            venue: VenuePayload {
                name: "Castle Hill Lookout",
                slug: "castle-hill-lookout",
                description: "Medieval walls with the best view over the city.",
                address: "Castle Road",
                city: "Lisbon",
                country: "Portugal",
                price_range_min: 0.0,
                price_range_max: 10.0,
                currency: "EUR",
                amenities: vec!["Guided tours"],
                is_featured: true,
            },
        },
    ]
}

// --- Seeder ---

struct DemoSeeder {
    base_url: String,
    client: Client,
    results: Vec<SeedResult>,
}

impl DemoSeeder {
    fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// The session cookie is kept by the client's cookie store
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/accounts/login", self.base_url))
            .json(&LoginPayload { username, password })
            .send()
            .await
            .context("Login request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Login rejected: HTTP {} - {}", status, body);
        }
        Ok(())
    }

    async fn create_venue(&self, demo: &DemoVenue) -> Outcome {
        let url = format!("{}/admin/venues?category={}", self.base_url, demo.category);
        let response = match self.client.post(&url).json(&demo.venue).send().await {
            Ok(response) => response,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<CreatedVenue>().await {
                Ok(created) => Outcome::Created(created.slug),
                Err(e) => Outcome::Failed(format!("Failed to parse response JSON: {}", e)),
            }
        } else if status == reqwest::StatusCode::CONFLICT {
            Outcome::Exists
        } else {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Outcome::Failed(format!("HTTP {} - {}", status, body))
        }
    }

    async fn run(&mut self, username: &str, password: &str) -> Result<()> {
        println!("\n{}Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            bail!("Service unavailable at {}", self.base_url);
        }
        println!("{}Service available{}", GREEN, RESET);

        self.login(username, password).await?;
        println!("{}Logged in as {}{}\n", GREEN, username, RESET);

        let venues = demo_venues();
        println!("{}Creating {} demo venues...{}\n", BOLD, venues.len(), RESET);

        for (i, demo) in venues.iter().enumerate() {
            let start_time = Instant::now();
            let outcome = self.create_venue(demo).await;
            let duration = start_time.elapsed().as_secs_f64();

            match &outcome {
                Outcome::Created(slug) => println!(
                    "{}[{}/{}] {} created ({}){}",
                    GREEN,
                    i + 1,
                    venues.len(),
                    demo.venue.name,
                    slug,
                    RESET
                ),
                Outcome::Exists => println!(
                    "{}[{}/{}] {} already exists{}",
                    YELLOW,
                    i + 1,
                    venues.len(),
                    demo.venue.name,
                    RESET
                ),
                Outcome::Failed(err) => println!(
                    "{}[{}/{}] {} failed: {}{}",
                    RED,
                    i + 1,
                    venues.len(),
                    demo.venue.name,
                    err,
                    RESET
                ),
            }

            self.results.push(SeedResult {
                name: demo.venue.name.to_string(),
                category: demo.category.to_string(),
                outcome,
                duration_secs: duration,
            });
        }

        self.print_summary();
        Ok(())
    }

    fn print_summary(&self) {
        println!("\n{}Seed Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────────────");
        println!(
            "{:<28} {:<18} {:<10} {:>10}",
            "Venue", "Category", "Status", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────────────");

        let mut created = 0;
        let mut existing = 0;
        let mut failed = 0;

        for res in &self.results {
            let status = match res.outcome {
                Outcome::Created(_) => {
                    created += 1;
                    "created"
                }
                Outcome::Exists => {
                    existing += 1;
                    "exists"
                }
                Outcome::Failed(_) => {
                    failed += 1;
                    "failed"
                }
            };
            println!(
                "{:<28} {:<18} {:<10} {:>9.2}s",
                res.name, res.category, status, res.duration_secs
            );
        }

        println!("──────────────────────────────────────────────────────────────────────");
        println!("  • Created: {}{}{}", GREEN, created, RESET);
        println!("  • Already present: {}{}{}", YELLOW, existing, RESET);
        println!("  • Failed: {}{}{}", RED, failed, RESET);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("SEED_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let username = env::var("SEED_ADMIN_USERNAME").context("SEED_ADMIN_USERNAME must be set")?;
    let password = env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD must be set")?;

    let mut seeder = DemoSeeder::new(base_url)?;
    seeder.run(&username, &password).await
}
