//! News-article extraction over plain HTTP
//!
//! Articles don't need a browser: fetch the HTML, then run selector cascades
//! for title, body, author, and date, with an all-paragraphs fallback when no
//! content container matches.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde::Serialize;

/// Selectors tried in order for the article title
const TITLE_SELECTORS: &[&str] = &["h1", "h2", "title", ".article-title", ".post-title"];

/// Selectors tried in order for the main article body
const CONTENT_SELECTORS: &[&str] = &[
    ".article-body",
    ".post-content",
    ".entry-content",
    ".content",
    "article",
    ".story-body",
    ".article-content",
];

/// Selectors tried in order for the byline
const AUTHOR_SELECTORS: &[&str] = &[
    ".author",
    ".byline",
    "[rel='author']",
    ".article-author",
    ".post-author",
];

/// Selectors tried in order for the publication date
const DATE_SELECTORS: &[&str] = &[
    "time",
    ".date",
    ".publish-date",
    ".article-date",
    "[property*='published']",
];

/// Extracted article content and metadata
///
/// Fields the page didn't yield stay empty rather than failing the whole
/// extraction.
#[derive(Debug, Clone, Serialize)]
pub struct NewsArticle {
    pub url: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: String,
}

/// Fetch an article URL and extract its content
pub async fn extract_news_article(
    client: &reqwest::Client,
    url: &str,
    include_metadata: bool,
) -> Result<NewsArticle> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch article from {url}"))?;
    let body = response
        .text()
        .await
        .context("Failed to read article response body")?;

    // Html is parsed and dropped without crossing an await point
    Ok(parse_article(&body, url, include_metadata))
}

fn parse_article(html: &str, url: &str, include_metadata: bool) -> NewsArticle {
    let document = Html::parse_document(html);

    let title = select_first_text(&document, TITLE_SELECTORS).unwrap_or_default();

    let content = select_first_text(&document, CONTENT_SELECTORS)
        .unwrap_or_else(|| all_paragraph_text(&document));

    let (author, date) = if include_metadata {
        (
            select_first_text(&document, AUTHOR_SELECTORS).unwrap_or_default(),
            select_first_text(&document, DATE_SELECTORS).unwrap_or_default(),
        )
    } else {
        (String::new(), String::new())
    };

    NewsArticle {
        url: url.to_string(),
        title,
        content,
        author,
        date,
    }
}

/// First non-empty trimmed text for a cascade of selectors
fn select_first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Fallback: every paragraph's text, space-joined
fn all_paragraph_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    document
        .select(&selector)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_HTML: &str = r#"
        <html><head><title>Fallback Title</title></head><body>
        <h1>Big Headline</h1>
        <div class="byline">Jane Reporter</div>
        <time>2024-03-01</time>
        <div class="article-body">Lead paragraph. Second sentence.</div>
        </body></html>
    "#;

    #[test]
    fn extracts_title_content_and_metadata() {
        let article = parse_article(ARTICLE_HTML, "https://example.com/story", true);
        assert_eq!(article.title, "Big Headline");
        assert_eq!(article.content, "Lead paragraph. Second sentence.");
        assert_eq!(article.author, "Jane Reporter");
        assert_eq!(article.date, "2024-03-01");
    }

    #[test]
    fn metadata_skipped_when_not_requested() {
        let article = parse_article(ARTICLE_HTML, "https://example.com/story", false);
        assert!(article.author.is_empty());
        assert!(article.date.is_empty());
        assert_eq!(article.title, "Big Headline");
    }

    #[test]
    fn falls_back_to_paragraphs_without_content_container() {
        let html = "<html><body><p>one</p><p>two</p></body></html>";
        let article = parse_article(html, "https://example.com", true);
        assert_eq!(article.content, "one two");
    }
}
