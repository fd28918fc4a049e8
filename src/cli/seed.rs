use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::info;

use crate::models::catalog::validate_tiers;
use crate::models::{NewProduct, NewProductPrice, NewSocialMediaPrice, NewSocialMediaService};
use crate::storage::Storage;
use crate::validation::Validate;

const SAMPLE_PRODUCTS: &str = include_str!("../../seed/sample_products.json");
const SAMPLE_SERVICES: &str = include_str!("../../seed/sample_services.json");

#[derive(Debug, Deserialize)]
struct SeedProduct {
    #[serde(flatten)]
    product: NewProduct,
    prices: Vec<NewProductPrice>,
}

#[derive(Debug, Deserialize)]
struct SeedService {
    #[serde(flatten)]
    service: NewSocialMediaService,
    prices: Vec<NewSocialMediaPrice>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products_created: usize,
    pub services_created: usize,
    pub skipped: usize,
}

fn invalid(name: &str, errors: Vec<crate::validation::FieldError>) -> anyhow::Error {
    anyhow::anyhow!("sample {name:?} is invalid: {errors:?}")
}

/// Inserts the sample catalog. Items whose name already exists are skipped,
/// so running it twice is harmless.
pub async fn run(store: &dyn Storage) -> Result<SeedSummary> {
    let products: Vec<SeedProduct> =
        serde_json::from_str(SAMPLE_PRODUCTS).context("parsing sample products")?;
    let services: Vec<SeedService> =
        serde_json::from_str(SAMPLE_SERVICES).context("parsing sample services")?;
    let mut summary = SeedSummary::default();

    let existing: HashSet<String> = store
        .list_products(false)
        .await?
        .into_iter()
        .map(|p| p.product.name)
        .collect();
    for item in products {
        if existing.contains(&item.product.name) {
            info!(name = %item.product.name, "sample product exists; skipping");
            summary.skipped += 1;
            continue;
        }
        item.product.validate().map_err(|e| invalid(&item.product.name, e))?;
        let tiers = validate_tiers(&item.prices).map_err(|e| invalid(&item.product.name, e))?;
        store.create_product(&item.product, &tiers).await?;
        info!(name = %item.product.name, tiers = tiers.len(), "sample product created");
        summary.products_created += 1;
    }

    let existing: HashSet<String> = store
        .list_services(false)
        .await?
        .into_iter()
        .map(|s| s.service.name)
        .collect();
    for item in services {
        if existing.contains(&item.service.name) {
            summary.skipped += 1;
            continue;
        }
        item.service.validate().map_err(|e| invalid(&item.service.name, e))?;
        let tiers = validate_tiers(&item.prices).map_err(|e| invalid(&item.service.name, e))?;
        store.create_service(&item.service, &tiers).await?;
        info!(name = %item.service.name, tiers = tiers.len(), "sample service created");
        summary.services_created += 1;
    }

    Ok(summary)
}
