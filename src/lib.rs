pub mod avatars;
pub mod config;
pub mod css;
pub mod error;
pub mod image_scraper;
pub mod media;
pub mod models;
pub mod qrcodes;
pub mod scraper;
pub mod sources;
pub mod telemetry;
