//! # Seed Data Generator
//!
//! Populates the database with a realistic café menu, a handful of
//! daily offers and the default GST configuration for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p cafe-db --bin seed
//!
//! # Specify database path
//! cargo run -p cafe-db --bin seed -- --db ./data/cafe.db
//! ```
//!
//! ## Generated Data
//! - Menu items across beverages, desserts, snacks and art-prints
//! - A weekday percentage offer, a weekend dessert offer and a
//!   flat-off offer with a minimum order
//! - Tax settings at the default 2.5% CGST + 2.5% SGST on subtotal

use cafe_core::{Money, OfferType};
use cafe_db::{Database, DbConfig, NewMenuItem, NewOffer};
use chrono::{Duration, Utc};
use std::env;

/// Menu catalog: (category, name, description, price in rupees)
const MENU: &[(&str, &str, &str, i64)] = &[
    ("beverages", "Espresso", "Double shot", 120),
    ("beverages", "Americano", "Espresso with hot water", 140),
    ("beverages", "Cappuccino", "Espresso with steamed milk foam", 180),
    ("beverages", "Latte", "Espresso with steamed milk", 200),
    ("beverages", "Cold Brew", "18-hour steep, served black", 220),
    ("beverages", "Masala Chai", "House spice blend", 100),
    ("beverages", "Filter Coffee", "South Indian style", 90),
    ("beverages", "Fresh Lime Soda", "Sweet, salted or mixed", 110),
    ("desserts", "Carrot Cake", "Cream cheese frosting", 280),
    ("desserts", "Chocolate Brownie", "Served warm", 220),
    ("desserts", "Cheesecake", "Baked, seasonal fruit", 320),
    ("desserts", "Tiramisu", "Classic, espresso-soaked", 340),
    ("desserts", "Gulab Jamun", "Two pieces, warm", 140),
    ("snacks", "Grilled Sandwich", "Three cheese and tomato", 240),
    ("snacks", "Samosa Plate", "Two pieces with chutney", 120),
    ("snacks", "Banana Bread", "Toasted, salted butter", 160),
    ("snacks", "Fries", "Peri-peri seasoning", 180),
    ("snacks", "Hummus Platter", "With pita and crudites", 300),
    ("art-prints", "Local Artist Print A4", "Rotating collection", 500),
    ("art-prints", "Local Artist Print A3", "Rotating collection", 900),
    ("art-prints", "Postcard Set", "Pack of six", 250),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cafe_dev.db");

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
                println!("Café POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cafe_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Café POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.menu_items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} menu items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding menu...");
    for (category, name, description, rupees) in MENU {
        db.menu_items()
            .insert(NewMenuItem {
                name: name.to_string(),
                category: category.to_string(),
                description: Some(description.to_string()),
                price: Money::from_rupees(*rupees),
            })
            .await?;
    }
    println!("✓ {} menu items", MENU.len());

    println!("Seeding offers...");
    let now = Utc::now();
    let offers = vec![
        NewOffer {
            name: "Weekday Beverages 10%".to_string(),
            description: Some("10% off beverages, Monday to Friday".to_string()),
            offer_type: OfferType::Percentage,
            discount_value: 1_000,
            min_order_paise: 0,
            max_discount_paise: Some(10_000),
            applicable_categories: vec!["beverages".to_string()],
            applicable_items: vec![],
            start_date: now,
            end_date: now + Duration::days(90),
            applicable_days: vec![1, 2, 3, 4, 5],
            priority: 10,
        },
        NewOffer {
            name: "Weekend Dessert 15%".to_string(),
            description: Some("15% off desserts on Saturday and Sunday".to_string()),
            offer_type: OfferType::Percentage,
            discount_value: 1_500,
            min_order_paise: 0,
            max_discount_paise: Some(15_000),
            applicable_categories: vec!["desserts".to_string()],
            applicable_items: vec![],
            start_date: now,
            end_date: now + Duration::days(90),
            applicable_days: vec![0, 6],
            priority: 10,
        },
        NewOffer {
            name: "₹50 off above ₹500".to_string(),
            description: Some("Flat ₹50 off on orders of ₹500 or more".to_string()),
            offer_type: OfferType::Fixed,
            discount_value: 5_000,
            min_order_paise: 50_000,
            max_discount_paise: None,
            applicable_categories: vec![],
            applicable_items: vec![],
            start_date: now,
            end_date: now + Duration::days(30),
            applicable_days: vec![],
            priority: 5,
        },
    ];
    let offer_count = offers.len();
    for offer in offers {
        db.offers().insert(offer).await?;
    }
    println!("✓ {} offers", offer_count);

    println!("Seeding tax settings...");
    let settings = db.tax_settings().get().await?;
    println!(
        "✓ GST at {} + {} bps, {:?}",
        settings.cgst_rate_bps, settings.sgst_rate_bps, settings.method
    );

    println!();
    println!("Done.");
    Ok(())
}
