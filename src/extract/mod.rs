//! Site-specific content extractors
//!
//! Each extractor tries a cascade of CSS selectors, taking the first that
//! yields non-empty text. Article and document extraction go over plain HTTP
//! (reqwest + scraper); profile and product extraction drive a live browser
//! page through [`crate::browser::PageDriver`].

pub mod article;
pub mod document;
pub mod product;
pub mod profile;

pub use article::{NewsArticle, extract_news_article};
pub use document::{DocumentDownload, download_document};
pub use product::{ProductInfo, scrape_product};
pub use profile::{SocialProfile, scrape_social_profile};

use crate::browser::PageDriver;

/// First non-empty trimmed text for a cascade of selectors on a live page
///
/// Selector misses are expected; only a non-empty hit short-circuits.
pub(crate) async fn first_selector_text(
    driver: &dyn PageDriver,
    selectors: &[&str],
) -> Option<String> {
    for selector in selectors {
        if let Ok(text) = driver.extract_text(selector).await {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
