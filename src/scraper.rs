use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use url::Url;
use crate::error::{AppError, Result};

/// Bodies below this size are tracking pixels or placeholders.
pub const MIN_IMAGE_BYTES: usize = 1024;

/// Candidates kept from a manufacturer page.
pub const MAX_PAGE_IMAGES: usize = 5;

/// Candidates kept from the generic image search.
pub const MAX_SEARCH_IMAGES: usize = 3;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const FALLBACK_HINTS: [&str; 9] = [
    "large", "big", "main", "hero", "product", "800", "600", "1000", "1200",
];

const TRACKING_DOMAIN: &str = "gstatic.com";

// Create static selectors to avoid recompiling them each time
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to parse img selector")
});

pub fn build_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("fr-FR,fr;q=0.9,en;q=0.8"),
    );

    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;
    Ok(html)
}

/// Fetches `url` and returns the raw body if it looks like a real image.
pub async fn fetch_image(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(AppError::ValidationError(format!("non-image content: {:?}", content_type)));
    }

    let body = response.bytes().await?;
    if body.len() < MIN_IMAGE_BYTES {
        return Err(AppError::ValidationError(format!("image too small: {} bytes", body.len())));
    }

    Ok(body.to_vec())
}

/// Image URLs matched by `selectors` on a manufacturer page, resolved against
/// `page_url`. Falls back to hinted `<img>` tags when no selector matches.
pub fn extract_page_images(html: &str, page_url: &str, selectors: &[&str]) -> Result<Vec<String>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let mut urls: Vec<String> = Vec::new();

    for raw in selectors {
        let selector = Selector::parse(raw)
            .map_err(|e| AppError::ParseError(format!("bad selector {:?}: {:?}", raw, e)))?;
        for element in document.select(&selector) {
            if let Some(src) = first_attr(&element, &["src", "data-src", "data-lazy-src"]) {
                push_unique(&mut urls, &base, src);
            }
        }
    }

    if urls.is_empty() {
        for element in document.select(&IMG_SELECTOR) {
            if let Some(src) = first_attr(&element, &["src", "data-src"]) {
                if FALLBACK_HINTS.iter().any(|hint| src.contains(hint)) {
                    push_unique(&mut urls, &base, src);
                }
            }
        }
    }

    urls.truncate(MAX_PAGE_IMAGES);
    Ok(urls)
}

/// Absolute `<img src>` URLs from a search results page, minus tracking images.
pub fn extract_search_images(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document.select(&IMG_SELECTOR)
        .filter_map(|element| element.value().attr("src"))
        .filter(|src| src.starts_with("http") && !src.contains(TRACKING_DOMAIN))
        .take(MAX_SEARCH_IMAGES)
        .map(str::to_string)
        .collect()
}

fn first_attr<'a>(element: &ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names.iter()
        .filter_map(|name| element.value().attr(name))
        .find(|value| !value.is_empty())
}

fn push_unique(urls: &mut Vec<String>, base: &Url, src: &str) {
    if let Ok(resolved) = base.join(src) {
        let resolved = resolved.to_string();
        if !urls.contains(&resolved) {
            urls.push(resolved);
        }
    }
}
