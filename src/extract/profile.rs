//! Social-media profile extraction via a live browser page
//!
//! Profile pages are JS-heavy, so extraction drives the shared browser
//! rather than fetching raw HTML. Selector cascades cover the common
//! platform layouts; misses leave the field unset.

use anyhow::Result;
use serde::Serialize;

use super::first_selector_text;
use crate::browser::PageDriver;

/// Selectors tried in order for the profile display name
const NAME_SELECTORS: &[&str] = &[
    "[data-testid='ocf-headline']",
    ".profile h1",
    "h1",
    ".username",
    "[data-testid='UserProfileHeader_Items']",
];

/// Selectors tried in order for the profile bio/description
const BIO_SELECTORS: &[&str] = &[
    ".bio",
    "[data-testid='UserProfileHeader_Items']",
    ".profile p",
    ".description",
];

/// Publicly visible profile fields
#[derive(Debug, Clone, Serialize)]
pub struct SocialProfile {
    pub platform: String,
    pub url: String,
    pub title: String,
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// Navigate to a profile URL and extract public fields
pub async fn scrape_social_profile(
    driver: &dyn PageDriver,
    platform: &str,
    profile_url: &str,
) -> Result<SocialProfile> {
    driver.navigate(profile_url).await?;

    let title = driver.extract_text("title").await.unwrap_or_default();
    let name = first_selector_text(driver, NAME_SELECTORS).await;
    let bio = first_selector_text(driver, BIO_SELECTORS).await;

    Ok(SocialProfile {
        platform: platform.to_string(),
        url: profile_url.to_string(),
        title: title.trim().to_string(),
        name,
        bio,
    })
}
