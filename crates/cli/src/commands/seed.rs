//! Demo catalog seeding.

use medina_admin::backend::types::NewProductRow;
use medina_core::Money;

use super::data_client;

/// Insert the demo product catalog.
///
/// Safe to run against a non-empty catalog: every run inserts fresh rows,
/// it never deletes or overwrites.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let data = data_client()?;
    let catalog = demo_catalog();
    let total = catalog.len();

    for product in &catalog {
        let created = data.insert_product(product).await?;
        tracing::info!("Seeded product {} ({})", created.name, created.id);
    }

    tracing::info!("Seeded {total} products");
    Ok(())
}

fn price(s: &str) -> Money {
    // Literals below are well-formed decimals.
    Money::new(s.parse().unwrap_or_default())
}

fn demo_catalog() -> Vec<NewProductRow> {
    let entry = |name: &str,
                 amount: &str,
                 original: Option<&str>,
                 category: &str,
                 is_new: bool,
                 is_on_sale: bool,
                 stock: i32| NewProductRow {
        name: name.to_string(),
        price: price(amount),
        original_price: original.map(price),
        image_url: None,
        category: Some(category.to_string()),
        description: None,
        is_new,
        is_on_sale,
        stock,
    };

    vec![
        entry("Linen shirt", "89.00", None, "shirts", true, false, 24),
        entry("Oversized tee", "35.00", None, "shirts", true, false, 60),
        entry("Slim chinos", "75.00", Some("95.00"), "trousers", false, true, 18),
        entry("Wide-leg trousers", "82.00", None, "trousers", false, false, 12),
        entry("Wool scarf", "29.00", Some("39.00"), "accessories", false, true, 45),
        entry("Leather belt", "49.00", None, "accessories", false, false, 30),
        entry("Canvas tote", "22.00", None, "accessories", true, false, 80),
        entry("Denim jacket", "120.00", None, "outerwear", true, false, 9),
    ]
}
