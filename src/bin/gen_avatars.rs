use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use magsav_scripts::{
    avatars::{generate_avatars, AvatarFont, TEST_USERS},
    config::Config,
    telemetry,
};

/// Renders initials avatars for the test users.
#[derive(Parser)]
#[command(name = "gen_avatars", version)]
struct Cli {
    /// Media root (defaults to MAGSAV_MEDIAS_PATH or "medias")
    medias_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let out_dir = cli
        .medias_path
        .unwrap_or(config.medias_path)
        .join("avatars")
        .join("users");
    let font = AvatarFont::load(&config.avatar_font);

    match generate_avatars(&TEST_USERS, &out_dir, &font) {
        Ok(written) => {
            for path in &written {
                println!("Created {}", path.display());
            }
            println!("{} avatar(s) generated", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
