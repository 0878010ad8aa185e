//! # Seed Data Generator
//!
//! Populates the database with a development catalog.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p storefront-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p storefront-db --bin seed -- --count 1000 --db ./data/storefront.db
//! ```
//!
//! ## Generated Products
//! - Unique code: `{CATEGORY}-{NAME}-{SEED}`
//! - Categories: tools, electronics, toys, home, books
//! - Every 7th product is unavailable, every 25th is free
//! - Stock 0 - 50

use chrono::Utc;
use clap::Parser;
use storefront_core::Product;
use storefront_db::{Database, DbConfig};
use uuid::Uuid;

/// Product names per category.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "tools",
        &["Hammer", "Screwdriver Set", "Tape Measure", "Cordless Drill", "Wrench", "Pliers"],
    ),
    (
        "electronics",
        &["USB Cable", "Headphones", "Power Bank", "Keyboard", "Mouse", "Webcam"],
    ),
    (
        "toys",
        &["Puzzle", "Building Blocks", "Yo-Yo", "Kite", "Board Game", "Plush Bear"],
    ),
    (
        "home",
        &["Mug", "Lamp", "Cushion", "Candle", "Picture Frame", "Doormat"],
    ),
    (
        "books",
        &["Cookbook", "Atlas", "Notebook", "Novel", "Dictionary", "Sketchbook"],
    ),
];

/// Storefront seed data generator
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Number of products to generate
    #[arg(short, long, default_value_t = 200)]
    count: usize,

    /// Database file path
    #[arg(short, long, env = "STOREFRONT_DATABASE_PATH", default_value = "./storefront.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database: {}", args.db);
    println!("Products: {}", args.count);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicate codes.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    let names = CATEGORIES
        .iter()
        .flat_map(|(category, names)| names.iter().map(move |name| (*category, *name)))
        .cycle()
        .take(args.count);

    for (seed, (category, name)) in names.enumerate() {
        let product = generate_product(category, name, seed);

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.code, e);
            continue;
        }

        generated += 1;

        if generated % 100 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic data.
fn generate_product(category: &str, name: &str, seed: usize) -> Product {
    let now = Utc::now();

    let slug: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let code = format!("{}-{}-{:04}", category[..3].to_uppercase(), slug, seed);

    // $1.99 - $49.99, with an occasional free item
    let price_cents = if seed % 25 == 24 {
        0
    } else {
        199 + ((seed * 137) % 4800) as i64
    };

    Product {
        id: Uuid::new_v4().to_string(),
        title: format!("{} #{}", name, seed + 1),
        description: format!("{} from the {} department", name, category),
        price_cents,
        code: code.clone(),
        stock: (seed % 51) as i64,
        category: category.to_string(),
        status: seed % 7 != 6,
        thumbnails: vec![format!("/img/products/{}.jpg", code.to_lowercase())],
        created_at: now,
        updated_at: now,
    }
}
