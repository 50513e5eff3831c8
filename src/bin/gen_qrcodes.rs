use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use magsav_scripts::{
    config::Config,
    qrcodes::{generate_qrcodes, TEST_QR_CODES},
    telemetry,
};

/// Encodes the test products and vehicles as QR code PNGs.
#[derive(Parser)]
#[command(name = "gen_qrcodes", version)]
struct Cli {
    /// Media root (defaults to MAGSAV_MEDIAS_PATH or "medias")
    medias_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let medias_path = match cli.medias_path {
        Some(path) => path,
        None => match Config::load() {
            Ok(config) => config.medias_path,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match generate_qrcodes(&TEST_QR_CODES, &medias_path.join("qrcodes")) {
        Ok(written) => {
            for path in &written {
                println!("Created {}", path.display());
            }
            println!("{} QR code(s) generated", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
