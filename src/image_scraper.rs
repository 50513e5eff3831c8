use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::models::{ScrapeResult, ScrapedImage};
use crate::scraper::{build_client, fetch_image};
use crate::sources::{known_manufacturers, ImageSource, ManufacturerProfile, GOOGLE_IMAGES_URL};

static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s-]").expect("Failed to compile special chars pattern")
});

/// Search query for a product: special characters stripped, manufacturer
/// prepended, words joined with `+`.
pub fn build_search_query(product_name: &str, manufacturer: &str) -> String {
    let mut query = SPECIAL_CHARS.replace_all(product_name, "").into_owned();
    if !manufacturer.is_empty() {
        query = format!("{} {}", manufacturer, query);
    }
    query.replace(' ', "+")
}

/// Identifier used to name files when the caller supplies none.
pub fn product_uid(product_name: &str, manufacturer: &str) -> String {
    let digest = Md5::digest(format!("{}_{}", product_name, manufacturer).as_bytes());
    hex::encode(digest)[..8].to_string()
}

pub fn image_filename(product_uid: &str, image_url: &str, index: usize) -> String {
    let path = Url::parse(image_url)
        .map(|url| url.path().to_lowercase())
        .unwrap_or_else(|_| image_url.to_lowercase());

    let ext = if path.contains(".jpg") || path.contains(".jpeg") {
        "jpg"
    } else if path.contains(".png") {
        "png"
    } else if path.contains(".webp") {
        "webp"
    } else if path.contains(".gif") {
        "gif"
    } else {
        "jpg"
    };

    if index == 0 {
        format!("{}_scraped.{}", product_uid, ext)
    } else {
        format!("{}_scraped_{}.{}", product_uid, index, ext)
    }
}

pub struct ImageScraper {
    client: Client,
    photos_path: PathBuf,
    scraped_path: PathBuf,
    manufacturers: HashMap<String, ManufacturerProfile>,
    search_template: String,
    delay: Duration,
}

impl ImageScraper {
    /// Creates `<medias>/photos` and `<medias>/scraped` if they are missing.
    pub fn new(medias_path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let medias_path = medias_path.as_ref();
        let photos_path = medias_path.join("photos");
        let scraped_path = medias_path.join("scraped");
        fs::create_dir_all(&photos_path)?;
        fs::create_dir_all(&scraped_path)?;

        let manufacturers = known_manufacturers()
            .into_iter()
            .map(|(name, profile)| (name.to_string(), profile))
            .collect();

        Ok(ImageScraper {
            client: build_client(config.http_timeout)?,
            photos_path,
            scraped_path,
            manufacturers,
            search_template: GOOGLE_IMAGES_URL.to_string(),
            delay: config.request_delay,
        })
    }

    pub fn with_manufacturer(mut self, name: &str, profile: ManufacturerProfile) -> Self {
        self.manufacturers.insert(name.to_lowercase(), profile);
        self
    }

    pub fn with_search_template(mut self, template: &str) -> Self {
        self.search_template = template.to_string();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn photos_path(&self) -> &Path {
        &self.photos_path
    }

    pub fn scraped_path(&self) -> &Path {
        &self.scraped_path
    }

    /// Sources in the order they are tried for `manufacturer`.
    pub fn sources_for(&self, manufacturer: &str) -> Vec<ImageSource> {
        let mut sources = Vec::with_capacity(2);
        if let Some(profile) = self.manufacturers.get(&manufacturer.to_lowercase()) {
            sources.push(ImageSource::Manufacturer {
                name: manufacturer.to_string(),
                profile: profile.clone(),
            });
        }
        sources.push(ImageSource::GenericSearch { template: self.search_template.clone() });
        sources
    }

    pub async fn scrape_product_images(
        &self,
        product_name: &str,
        manufacturer: &str,
        product_uid_override: &str,
        max_images: usize,
    ) -> ScrapeResult {
        info!(product = product_name, manufacturer, "searching images");

        let uid = if product_uid_override.is_empty() {
            product_uid(product_name, manufacturer)
        } else {
            product_uid_override.to_string()
        };
        let mut result = ScrapeResult::new(product_name, manufacturer, &uid);

        let query = build_search_query(product_name, manufacturer);
        info!(%query, "search query");

        for source in self.sources_for(manufacturer) {
            if result.downloaded() >= max_images {
                break;
            }
            self.scrape_source(&source, &query, max_images, &mut result).await;
        }

        result.success = result.downloaded() > 0;
        info!(downloaded = result.downloaded(), max_images, "scraping finished");
        result
    }

    async fn scrape_source(&self, source: &ImageSource, query: &str, max_images: usize, result: &mut ScrapeResult) {
        let label = source.label();
        let candidates = match source.candidate_urls(&self.client, query).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(source = %label, error = %e, "source yielded nothing");
                result.errors.push(format!("{}: {}", label, e));
                return;
            }
        };
        info!(source = %label, candidates = candidates.len(), "candidate images found");

        for image_url in candidates {
            if result.downloaded() >= max_images {
                break;
            }

            let filename = image_filename(&result.product_uid, &image_url, result.downloaded());
            match self.download_image(&image_url, &filename).await {
                Ok(size) => {
                    info!(%filename, size, "image saved");
                    result.scraped_images.push(ScrapedImage {
                        filename,
                        source_url: image_url,
                        source: label.clone(),
                    });
                }
                Err(e) => {
                    warn!(url = %image_url, error = %e, "download rejected");
                    result.errors.push(format!("{}: {}", image_url, e));
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }

    async fn download_image(&self, image_url: &str, filename: &str) -> Result<usize> {
        let bytes = fetch_image(&self.client, image_url).await?;
        fs::write(self.scraped_path.join(filename), &bytes)?;
        Ok(bytes.len())
    }
}
