use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedImage {
    pub filename: String,
    pub source_url: String,
    pub source: String,
}

/// Outcome of one scraping run, also written as the `--output-json` report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub product_name: String,
    pub manufacturer: String,
    pub product_uid: String,
    pub scraped_images: Vec<ScrapedImage>,
    pub errors: Vec<String>,
    pub success: bool,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapeResult {
    pub fn new(product_name: &str, manufacturer: &str, product_uid: &str) -> Self {
        ScrapeResult {
            product_name: product_name.to_string(),
            manufacturer: manufacturer.to_string(),
            product_uid: product_uid.to_string(),
            scraped_images: Vec::new(),
            errors: Vec::new(),
            success: false,
            scraped_at: Utc::now(),
        }
    }

    pub fn downloaded(&self) -> usize {
        self.scraped_images.len()
    }
}
