use serde::Serialize;
use storefront_core::config::{LoadOptions, StorefrontConfig};
use storefront_core::{format_price, Catalog};

use super::{escape_json, CommandResult};

#[derive(Debug, Serialize)]
struct CatalogEntry {
    position: usize,
    id: String,
    title: String,
    price: String,
    price_label: String,
    checkout_url: String,
}

pub fn run(json_output: bool) -> CommandResult {
    let config = match StorefrontConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("catalog", "config_validation", error.to_string(), 2)
        }
    };

    let catalog = match config.build_catalog() {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("catalog", "catalog_validation", error.to_string(), 3)
        }
    };

    let entries = entries(&catalog, &config.store.currency_symbol);
    let output = if json_output {
        serde_json::to_string_pretty(&entries).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"catalog\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&entries)
    };

    CommandResult { exit_code: 0, output }
}

fn entries(catalog: &Catalog, currency_symbol: &str) -> Vec<CatalogEntry> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, product)| CatalogEntry {
            position: index + 1,
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            price_label: format_price(product.price, currency_symbol),
            checkout_url: product.checkout_url.clone(),
        })
        .collect()
}

fn render_human(entries: &[CatalogEntry]) -> String {
    let mut lines = vec![format!("catalog ({} product(s), store order):", entries.len())];
    for entry in entries {
        lines.push(format!(
            "{}. {} | {} | {} | checkout: {}",
            entry.position, entry.id, entry.title, entry.price_label, entry.checkout_url
        ));
    }
    lines.join("\n")
}
