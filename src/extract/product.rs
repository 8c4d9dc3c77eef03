//! Product-page extraction via a live browser page
//!
//! E-commerce pages vary widely; each field is tried against a cascade of
//! common selectors and left empty when nothing matches. Reviews are only
//! collected when requested.

use anyhow::Result;
use serde::Serialize;

use super::first_selector_text;
use crate::browser::PageDriver;

/// Selectors tried in order for the product name
const NAME_SELECTORS: &[&str] = &[
    "[data-testid='product-title']",
    ".product-title",
    ".product-name",
    "h1",
    "[data-testid='title']",
    ".title",
];

/// Selectors tried in order for the price
const PRICE_SELECTORS: &[&str] = &[
    "[data-testid='price']",
    ".price",
    ".product-price",
    ".current-price",
    "[class*='price']",
];

/// Selectors tried in order for the description
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".product-description",
    ".description",
    ".product-details",
    "[data-testid='description']",
];

/// Selectors tried in order for availability/stock status
const AVAILABILITY_SELECTORS: &[&str] = &[
    ".availability",
    ".stock",
    ".in-stock",
    "[data-testid*='stock']",
];

/// Selectors tried in order for customer reviews
const REVIEW_SELECTORS: &[&str] = &[
    ".review",
    ".review-item",
    "[data-testid*='review']",
    ".customer-review",
];

/// Maximum number of reviews collected per product
const MAX_REVIEWS: usize = 5;

/// Extracted product fields
///
/// `reviews` is `None` when review collection was not requested.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInfo {
    pub url: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub availability: String,
    pub reviews: Option<Vec<String>>,
}

/// Navigate to a product URL and extract its details
pub async fn scrape_product(
    driver: &dyn PageDriver,
    product_url: &str,
    include_reviews: bool,
) -> Result<ProductInfo> {
    driver.navigate(product_url).await?;

    let name = first_selector_text(driver, NAME_SELECTORS)
        .await
        .unwrap_or_default();
    let price = first_selector_text(driver, PRICE_SELECTORS)
        .await
        .unwrap_or_default();
    let description = first_selector_text(driver, DESCRIPTION_SELECTORS)
        .await
        .unwrap_or_default();
    let availability = first_selector_text(driver, AVAILABILITY_SELECTORS)
        .await
        .unwrap_or_default();

    let reviews = if include_reviews {
        Some(collect_reviews(driver).await)
    } else {
        None
    };

    Ok(ProductInfo {
        url: product_url.to_string(),
        name,
        price,
        description,
        availability,
        reviews,
    })
}

/// First review cascade that yields text, capped at [`MAX_REVIEWS`]
async fn collect_reviews(driver: &dyn PageDriver) -> Vec<String> {
    for selector in REVIEW_SELECTORS {
        if let Ok(texts) = driver.extract_text_all(selector).await {
            let reviews: Vec<String> = texts
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .take(MAX_REVIEWS)
                .collect();
            if !reviews.is_empty() {
                return reviews;
            }
        }
    }
    Vec::new()
}
