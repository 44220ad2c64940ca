//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockbook_dev.db
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! - One product per catalogue entry, with opening stock
//! - A purchase order per product, every other one delivered
//! - A handful of sales for three sellers, some partly on credit
//! - A few outstanding dues against shops

use anyhow::Context;
use chrono::{Duration, Utc};
use std::env;
use stockbook_core::{NewDue, NewProduct, NewPurchaseOrder, NewSale, NewSaleLine, Product};
use stockbook_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (name, opening stock, buying price, selling price) in cents
const CATALOGUE: &[(&str, i64, i64, i64)] = &[
    ("Rice 5kg", 40, 900, 1250),
    ("Cooking Oil 1L", 60, 350, 499),
    ("Sugar 1kg", 80, 120, 175),
    ("Tea 250g", 50, 280, 399),
    ("Flour 10kg", 25, 1400, 1899),
    ("Soap Bar", 120, 45, 80),
    ("Toothpaste", 70, 150, 225),
    ("Matches 10-Pack", 200, 30, 60),
];

const SELLERS: &[&str] = &["Acme Traders", "Bilal Stores", "Corner Mart"];

const SHOPS: &[&str] = &["Main Street", "Station Road", "Old Bazaar"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./stockbook_dev.db");

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
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockbook_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockbook Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {}", db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Products
    let mut products: Vec<Product> = Vec::with_capacity(CATALOGUE.len());
    for (name, stock, buying, selling) in CATALOGUE {
        let product = db
            .products()
            .create(&NewProduct {
                name: name.to_string(),
                initial_stock: *stock,
                buying_price_cents: *buying,
                selling_price_cents: *selling,
            })
            .await
            .with_context(|| format!("creating product {}", name))?;
        products.push(product);
    }
    println!("✓ Created {} products", products.len());

    // Purchase orders
    let mut delivered = 0;
    for (idx, product) in products.iter().enumerate() {
        let order = db
            .purchase_orders()
            .create(&NewPurchaseOrder {
                product_id: product.id.clone(),
                quantity: 10 + (idx as i64 * 5),
                buying_price_cents: product.buying_price_cents,
            })
            .await?;

        if idx % 2 == 0 {
            db.purchase_orders().mark_delivered(&order.id).await?;
            delivered += 1;
        }
    }
    println!(
        "✓ Created {} purchase orders ({} delivered)",
        products.len(),
        delivered
    );

    // Sales
    let today = Utc::now().date_naive();
    let mut sales = 0;
    for day in 0..6i64 {
        let seller = SELLERS[day as usize % SELLERS.len()];
        let first = &products[day as usize % products.len()];
        let second = &products[(day as usize + 3) % products.len()];

        let items = vec![
            NewSaleLine {
                product_id: first.id.clone(),
                quantity: 2 + day,
                selling_price_cents: first.selling_price_cents,
            },
            NewSaleLine {
                product_id: second.id.clone(),
                quantity: 1,
                selling_price_cents: second.selling_price_cents,
            },
        ];

        let total = first.selling_price_cents * (2 + day) + second.selling_price_cents;
        let due = if day % 3 == 0 { total / 4 } else { 0 };

        match db
            .sales()
            .create(&NewSale {
                seller_name: seller.to_string(),
                items,
                total_due_amount_cents: due,
                total_sales_amount_cents: None,
                date: today - Duration::days(day * 9),
            })
            .await
        {
            Ok(_) => sales += 1,
            Err(e) => eprintln!("Failed to record sale for {}: {}", seller, e),
        }
    }
    println!("✓ Recorded {} sales", sales);

    // Dues
    for (idx, shop) in SHOPS.iter().enumerate() {
        db.dues()
            .create(&NewDue {
                seller_name: SELLERS[idx].to_string(),
                shop_name: shop.to_string(),
                due_amount_cents: 1500 + idx as i64 * 750,
                date_added: today - Duration::days(idx as i64 * 4),
            })
            .await?;
    }
    println!("✓ Added {} dues", SHOPS.len());

    let totals = db.products().inventory_totals().await?;
    println!();
    println!("Inventory:");
    println!("  Remaining units: {}", totals.total_remaining_quantity);
    println!("  Sales value:     {}", stockbook_core::Money::from_cents(totals.total_sales_value_cents));
    println!("  Profit/loss:     {}", stockbook_core::Money::from_cents(totals.total_profit_loss_cents));

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    Ok(())
}
