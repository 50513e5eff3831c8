use reqwest::Client;
use tracing::debug;
use url::Url;
use crate::error::Result;
use crate::scraper::{extract_page_images, extract_search_images, fetch_html};

pub const GOOGLE_IMAGES_URL: &str = "https://www.google.com/search?tbm=isch&q={query}";
pub const GENERIC_SOURCE_LABEL: &str = "google_images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerProfile {
    pub base_url: String,
    pub search_url: String,
    pub img_selectors: Vec<String>,
}

impl ManufacturerProfile {
    pub fn new(base_url: &str, search_url: &str, img_selectors: &[&str]) -> Self {
        ManufacturerProfile {
            base_url: base_url.to_string(),
            search_url: search_url.to_string(),
            img_selectors: img_selectors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Built-in manufacturer sites, keyed by lowercased manufacturer name.
pub fn known_manufacturers() -> Vec<(&'static str, ManufacturerProfile)> {
    vec![
        ("yamaha", ManufacturerProfile::new(
            "https://www.yamaha.com",
            "https://www.yamaha.com/search?q={query}",
            &["img.product-image", ".product-photo img", ".gallery img"],
        )),
        ("sony", ManufacturerProfile::new(
            "https://www.sony.com",
            "https://www.sony.com/search?q={query}",
            &["img.product-hero-image", ".product-image img", ".gallery-image"],
        )),
        ("panasonic", ManufacturerProfile::new(
            "https://www.panasonic.com",
            "https://www.panasonic.com/search?q={query}",
            &["img.product-image", ".hero-image img", ".product-gallery img"],
        )),
        ("bose", ManufacturerProfile::new(
            "https://www.bose.com",
            "https://www.bose.com/search?q={query}",
            &["img.product-image", ".hero-image", ".product-hero img"],
        )),
    ]
}

/// Where candidate image URLs come from, in the order the scraper tries them.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Manufacturer { name: String, profile: ManufacturerProfile },
    GenericSearch { template: String },
}

impl ImageSource {
    /// Value recorded as `source` for images saved from this source.
    pub fn label(&self) -> String {
        match self {
            ImageSource::Manufacturer { name, .. } => format!("{}_official", name),
            ImageSource::GenericSearch { .. } => GENERIC_SOURCE_LABEL.to_string(),
        }
    }

    /// Search page for `query`. Manufacturer templates may be relative to the
    /// profile's `base_url`.
    pub fn search_url(&self, query: &str) -> Result<String> {
        match self {
            ImageSource::Manufacturer { profile, .. } => {
                let filled = profile.search_url.replace("{query}", query);
                Ok(Url::parse(&profile.base_url)?.join(&filled)?.to_string())
            }
            ImageSource::GenericSearch { template } => Ok(template.replace("{query}", query)),
        }
    }

    pub async fn candidate_urls(&self, client: &Client, query: &str) -> Result<Vec<String>> {
        let url = self.search_url(query)?;
        debug!(source = %self.label(), %url, "fetching candidate page");
        let html = fetch_html(client, &url).await?;

        match self {
            ImageSource::Manufacturer { profile, .. } => {
                let selectors: Vec<&str> = profile.img_selectors.iter().map(String::as_str).collect();
                extract_page_images(&html, &url, &selectors)
            }
            ImageSource::GenericSearch { .. } => Ok(extract_search_images(&html)),
        }
    }
}
