//! # Seed Data Generator
//!
//! Populates a development database with payment methods and gym retail
//! products so the sale engine has something to sell.
//!
//! ## Usage
//! ```bash
//! # Default: 60 products into $GYM_DATABASE_PATH (or ./gym-pos.db)
//! cargo run -p gym-db --bin seed
//!
//! # Custom amount and file
//! cargo run -p gym-db --bin seed -- --count 200 --db ./data/gym.db
//! ```
//!
//! ## Generated Data
//! - Payment methods: Cash, Card, Bank Transfer (all active)
//! - Products across drinks, supplements, snacks, gear and apparel
//!
//! Prices and stock are derived from the product index, so two runs against
//! empty databases produce the same catalog.

use std::env;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gym_core::{NewProduct, PaymentMethodType, ProductStatus};
use gym_db::{Database, GymConfig};

/// Product categories with base names and a base price in cents.
const CATEGORIES: &[(&str, i64, &[&str])] = &[
    (
        "Drinks",
        250,
        &[
            "Still Water",
            "Sparkling Water",
            "Isotonic Drink",
            "Electrolyte Mix",
            "Cold Brew Coffee",
            "Coconut Water",
        ],
    ),
    (
        "Supplements",
        2900,
        &[
            "Whey Protein",
            "Vegan Protein",
            "Creatine Monohydrate",
            "Pre-Workout",
            "BCAA Powder",
            "Casein Protein",
        ],
    ),
    (
        "Snacks",
        300,
        &[
            "Protein Bar",
            "Oat Bar",
            "Rice Cakes",
            "Trail Mix",
            "Peanut Butter Cups",
            "Beef Jerky",
        ],
    ),
    (
        "Gear",
        1500,
        &[
            "Shaker Bottle",
            "Lifting Straps",
            "Resistance Band",
            "Jump Rope",
            "Wrist Wraps",
            "Chalk Block",
        ],
    ),
    (
        "Apparel",
        2000,
        &[
            "Training Tee",
            "Tank Top",
            "Shorts",
            "Hoodie",
            "Gym Towel",
            "Headband",
        ],
    ),
];

/// Size or flavor variants with a price add-on in cents.
const VARIANTS: &[(&str, i64)] = &[("Regular", 0), ("Large", 150)];

const PAYMENT_METHODS: &[(&str, PaymentMethodType)] = &[
    ("Cash", PaymentMethodType::Cash),
    ("Card", PaymentMethodType::Card),
    ("Bank Transfer", PaymentMethodType::Transfer),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gym_db=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = GymConfig::from_env()?;
    let mut count: usize = 60;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Gym POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: $GYM_DATABASE_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(database = %config.database_path.display(), count, "Seeding database");

    let db = Database::new(config.db_config()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    for (name, method_type) in PAYMENT_METHODS {
        let method = db.payment_methods().insert(name, *method_type).await?;
        info!(id = %method.id, name = %method.name, "Payment method created");
    }

    let start = Instant::now();
    let mut generated = 0;

    'outer: for (category, base_price, names) in CATEGORIES {
        for name in names.iter() {
            for (variant, addon) in VARIANTS {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(category, name, variant, base_price + addon, generated);
                let label = product.name.clone();

                match db.products().insert(product).await {
                    Ok(_) => generated += 1,
                    Err(e) => warn!(product = %label, error = %e, "Failed to insert product"),
                }
            }
        }
    }

    info!(generated, elapsed = ?start.elapsed(), "Products generated");

    let shakers = db.products().search("shaker", 10).await?;
    info!(results = shakers.len(), "Search 'shaker'");

    Ok(())
}

/// Builds one catalog entry. `seed` drives price jitter, stock and status.
fn generate_product(category: &str, name: &str, variant: &str, base_price: i64, seed: usize) -> NewProduct {
    // Up to 99 cents of jitter, ending in 9 like a shelf price
    let jitter = ((seed * 37) % 10) as i64 * 10 + 9;

    // Stock 0 - 48, with every 12th product sold out
    let stock = if seed % 12 == 11 { 0 } else { ((seed * 7) % 49) as i64 };

    // Every 15th product is discontinued
    let status = if seed % 15 == 14 {
        ProductStatus::Inactive
    } else {
        ProductStatus::Active
    };

    NewProduct {
        name: format!("{name} ({variant})"),
        description: Some(format!("{category}: {name}, {variant} size")),
        unit_price_cents: base_price + jitter,
        stock,
        status,
    }
}
