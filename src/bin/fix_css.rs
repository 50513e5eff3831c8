use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use magsav_scripts::{config::Config, css::fix_css_dir, telemetry};

/// Adds standard CSS fallbacks next to JavaFX `-fx-` declarations.
#[derive(Parser)]
#[command(name = "fix_css", version)]
struct Cli {
    /// Stylesheet directory (defaults to MAGSAV_CSS_DIR)
    dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let root = match cli.dir {
        Some(dir) => dir,
        None => match Config::load() {
            Ok(config) => config.css_dir,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    println!("Scanning {}", root.display());
    let report = match fix_css_dir(&root) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for path in &report.modified {
        println!("Fixed: {}", path.display());
    }
    for (path, err) in &report.errors {
        println!("Failed: {} ({})", path.display(), err);
    }
    println!(
        "{} stylesheet(s) scanned, {} updated, {} error(s)",
        report.scanned,
        report.modified.len(),
        report.errors.len()
    );

    ExitCode::SUCCESS
}
