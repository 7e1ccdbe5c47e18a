//! # Seed Data Generator
//!
//! Populates the database with a realistic ramen shop setup for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p ramen-db --bin seed
//!
//! # Specify database path
//! cargo run -p ramen-db --bin seed -- --db ./data/ramen.db
//! ```
//!
//! ## Generated Data
//! - Inventory: noodle/broth/topping ingredients with varied stock levels
//! - Menu: ramen bowls, sides, drinks and add-ons with real recipes
//! - A couple of pending mobile orders so the kitchen queue isn't empty

use std::env;

use ramen_core::{MobileOrderItem, RecipeIngredient};
use ramen_db::repository::menu::NewMenuItem;
use ramen_db::repository::mobile_order::NewMobileOrder;
use ramen_db::{Database, DbConfig};

/// Ingredient name and starting stock.
const INVENTORY: &[(&str, i64)] = &[
    ("Noodles", 120),
    ("Tonkotsu Broth", 60),
    ("Shoyu Broth", 50),
    ("Miso Broth", 45),
    ("Chashu", 40),
    ("Ajitama Egg", 48),
    ("Nori", 80),
    ("Green Onion", 100),
    ("Corn", 35),
    ("Butter", 30),
    ("Gyoza Wrapper", 90),
    ("Ground Pork", 55),
    ("Rice", 70),
    ("Karaage Chicken", 8), // intentionally low: exercises the low-stock view
    ("Matcha Powder", 0),   // intentionally out: exercises out-of-stock view
];

/// Menu: name, price in centavos, category, recipe.
const MENU: &[(&str, i64, &str, &[(&str, i64)])] = &[
    (
        "Tonkotsu Ramen",
        25000,
        "ramen",
        &[
            ("Noodles", 2),
            ("Tonkotsu Broth", 1),
            ("Chashu", 1),
            ("Ajitama Egg", 1),
            ("Green Onion", 1),
        ],
    ),
    (
        "Shoyu Ramen",
        22000,
        "ramen",
        &[
            ("Noodles", 2),
            ("Shoyu Broth", 1),
            ("Nori", 1),
            ("Green Onion", 1),
        ],
    ),
    (
        "Miso Corn Butter Ramen",
        24000,
        "ramen",
        &[
            ("Noodles", 2),
            ("Miso Broth", 1),
            ("Corn", 1),
            ("Butter", 1),
        ],
    ),
    (
        "Gyoza (6 pcs)",
        12000,
        "sides",
        &[("Gyoza Wrapper", 6), ("Ground Pork", 2)],
    ),
    (
        "Karaage Rice Bowl",
        16000,
        "sides",
        &[("Karaage Chicken", 3), ("Rice", 1)],
    ),
    ("Matcha Latte", 11000, "drinks", &[("Matcha Powder", 1)]),
    ("Extra Chashu", 8000, "add-ons", &[("Chashu", 1)]),
    ("Extra Noodles", 5000, "add-ons", &[("Noodles", 1)]),
    ("Ajitama", 4000, "add-ons", &[("Ajitama Egg", 1)]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ramen_dev.db");

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
                println!("Ramen POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ramen_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍜 Ramen POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().list().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} inventory items", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding inventory...");
    for (name, stock) in INVENTORY {
        db.inventory().insert(name, *stock).await?;
    }
    println!("✓ {} inventory items", INVENTORY.len());

    println!("Seeding menu...");
    for (name, price_cents, category, recipe) in MENU {
        db.menu()
            .insert(NewMenuItem {
                name: name.to_string(),
                price_cents: *price_cents,
                category: category.to_string(),
                image: None,
                ingredients: recipe
                    .iter()
                    .map(|(ing, qty)| RecipeIngredient {
                        inventory_item: ing.to_string(),
                        quantity: *qty,
                    })
                    .collect(),
            })
            .await?;
    }
    println!("✓ {} menu items", MENU.len());

    println!("Seeding mobile orders...");
    db.mobile_orders()
        .insert(NewMobileOrder {
            order_id: "M-0001".to_string(),
            customer_name: Some("Mika Tan".to_string()),
            items: vec![MobileOrderItem {
                name: "Shoyu Ramen".to_string(),
                price_cents: 22000,
                quantity: 1,
                selected_add_ons: vec!["Ajitama".to_string()],
            }],
            delivery_method: Some("pickup".to_string()),
            notes: Some("Less salty please".to_string()),
        })
        .await?;
    db.mobile_orders()
        .insert(NewMobileOrder {
            order_id: "M-0002".to_string(),
            customer_name: None,
            items: vec![MobileOrderItem {
                name: "Tonkotsu Ramen".to_string(),
                price_cents: 25000,
                quantity: 2,
                selected_add_ons: vec![],
            }],
            delivery_method: Some("delivery".to_string()),
            notes: None,
        })
        .await?;
    println!("✓ 2 mobile orders");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
