//! # Seed Data Generator
//!
//! Populates the database with a demo establishment and menu for
//! development. This is the "operator tooling" that creates tenants;
//! the order pipeline itself never writes establishments or products.
//!
//! ## Usage
//! ```bash
//! cargo run -p comanda-db --bin seed
//!
//! # Specify database path
//! cargo run -p comanda-db --bin seed -- --db ./data/comanda.db
//!
//! # Attach real messaging credentials
//! BOT_TOKEN=123:abc OWNER_TELEGRAM_ID=42 cargo run -p comanda-db --bin seed
//! ```

use chrono::Utc;
use std::env;

use comanda_core::{Establishment, Product, DEFAULT_ESTABLISHMENT_ID};
use comanda_db::{Database, DbConfig};

/// Demo menu: (product id, name, price in cents)
const MENU: &[(i64, &str, i64)] = &[
    (10, "Burger", 500),
    (11, "Cheeseburger", 650),
    (12, "Fries", 250),
    (13, "Onion Rings", 300),
    (14, "Soda 330ml", 200),
    (15, "Milkshake", 450),
    (16, "Veggie Wrap", 550),
    (17, "Chicken Nuggets 6pc", 400),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./comanda_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Comanda Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./comanda_dev.db)");
                println!("  -h, --help         Show this help message");
                println!();
                println!("Environment:");
                println!("  BOT_TOKEN          Telegram bot token for the demo store");
                println!("  OWNER_TELEGRAM_ID  Chat id that receives new-order alerts");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Comanda Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db
        .establishments()
        .get_by_id(DEFAULT_ESTABLISHMENT_ID)
        .await?
        .is_some()
    {
        println!("⚠ Demo establishment already exists, skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    let establishment = Establishment {
        id: DEFAULT_ESTABLISHMENT_ID,
        name: "Burger Barn".to_string(),
        bot_token: env::var("BOT_TOKEN").ok(),
        owner_telegram_id: env::var("OWNER_TELEGRAM_ID")
            .ok()
            .and_then(|v| v.parse().ok()),
        is_active: true,
        created_at: now,
    };
    db.establishments().insert(&establishment).await?;
    println!("✓ Created establishment #{} ({})", establishment.id, establishment.name);

    for (id, name, price_cents) in MENU {
        let product = Product {
            id: *id,
            establishment_id: DEFAULT_ESTABLISHMENT_ID,
            name: (*name).to_string(),
            price_cents: *price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
    }
    println!("✓ Created {} menu products", MENU.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
