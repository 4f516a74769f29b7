//! # Seed
//!
//! Populates the database with the walk-in client and a sample meat
//! catalog for development. Idempotent: existing rows are left alone, so
//! it is safe to run on every startup.
//!
//! ## Usage
//! ```bash
//! cargo run -p boucherie-db --bin seed
//!
//! # Specify database path
//! BOUCHERIE_DB=./data/boucherie.db cargo run -p boucherie-db --bin seed
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;

use boucherie_core::{MeatCategory, Product};
use boucherie_db::{AppConfig, ClientService, Database, DbConfig};

/// Sample catalog with stable ids so reseeding never duplicates.
const SAMPLE_PRODUCTS: &[(&str, &str, MeatCategory, i64)] = &[
    ("prod-entrecote", "Entrecôte", MeatCategory::Boeuf, 2890),
    ("prod-faux-filet", "Faux-filet", MeatCategory::Boeuf, 2590),
    ("prod-bavette", "Bavette d'aloyau", MeatCategory::Boeuf, 2190),
    ("prod-gigot", "Gigot d'agneau", MeatCategory::Agneau, 2450),
    ("prod-cotelettes", "Côtelettes d'agneau", MeatCategory::Agneau, 2690),
    ("prod-poulet-fermier", "Poulet fermier", MeatCategory::Poulet, 1290),
    ("prod-cuisses-poulet", "Cuisses de poulet", MeatCategory::Poulet, 890),
    ("prod-escalope-veau", "Escalope de veau", MeatCategory::Veau, 3190),
    ("prod-merguez", "Merguez", MeatCategory::Charcuterie, 1490),
    ("prod-saucisson", "Saucisson sec", MeatCategory::Charcuterie, 2290),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load();
    info!(db = %config.db_path.display(), "seeding database");

    let db = Database::new(DbConfig::new(&config.db_path)).await?;

    // Walk-in sentinel client; sales reference it without registration.
    ClientService::new(db.clone()).provision_walk_in().await?;

    let mut created = 0;
    for &(id, name, category, price_per_kg_cents) in SAMPLE_PRODUCTS {
        let product = Product {
            id: id.to_string(),
            name: name.to_string(),
            category,
            price_per_kg_cents,
            image: String::new(),
            in_stock: true,
        };
        if db.products().insert_if_absent(&product).await? {
            created += 1;
        }
    }

    info!(
        created,
        skipped = SAMPLE_PRODUCTS.len() - created,
        "catalog seeded"
    );

    db.close().await;
    Ok(())
}
