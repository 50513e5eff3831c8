use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use magsav_scripts::{
    config::Config,
    error::{AppError, Result},
    image_scraper::ImageScraper,
    models::ScrapeResult,
    telemetry,
};
use tracing::error;

/// Finds and downloads product photos for MAGSAV.
#[derive(Parser)]
#[command(name = "image_scraper", version)]
struct Cli {
    /// Product name
    #[arg(long)]
    product: String,

    /// Product manufacturer
    #[arg(long)]
    manufacturer: Option<String>,

    /// Product UID used to name the files
    #[arg(long)]
    uid: Option<String>,

    /// Maximum number of images to download
    #[arg(long, default_value_t = 3)]
    max_images: usize,

    /// Media root (defaults to MAGSAV_MEDIAS_PATH or "medias")
    #[arg(long)]
    medias_path: Option<PathBuf>,

    /// Write the results as JSON to this file
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Pause between downloads, in seconds
    #[arg(long)]
    delay_secs: Option<f64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(result) if result.success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "image scraper failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ScrapeResult> {
    let mut config = Config::load()?;
    if let Some(secs) = cli.delay_secs {
        config.request_delay = Duration::try_from_secs_f64(secs)
            .map_err(|e| AppError::ValidationError(format!("Invalid --delay-secs: {}", e)))?;
    }
    let medias_path = cli.medias_path.unwrap_or_else(|| config.medias_path.clone());

    let scraper = ImageScraper::new(&medias_path, &config)?;
    let result = scraper
        .scrape_product_images(
            &cli.product,
            cli.manufacturer.as_deref().unwrap_or(""),
            cli.uid.as_deref().unwrap_or(""),
            cli.max_images,
        )
        .await;

    print_summary(&result);

    if let Some(path) = cli.output_json {
        let json = serde_json::to_string_pretty(&result)?;
        fs::write(&path, json)?;
        println!("\nResults saved: {}", path.display());
    }

    Ok(result)
}

fn print_summary(result: &ScrapeResult) {
    println!("\nRESULTS:");
    println!("   Product: {}", result.product_name);
    println!("   Manufacturer: {}", result.manufacturer);
    println!("   Images found: {}", result.scraped_images.len());
    println!("   Errors: {}", result.errors.len());
    println!("   Success: {}", result.success);

    if !result.scraped_images.is_empty() {
        println!("\nDownloaded images:");
        for image in &result.scraped_images {
            println!("   - {} (source: {})", image.filename, image.source);
        }
    }

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for err in &result.errors {
            println!("   - {}", err);
        }
    }
}
