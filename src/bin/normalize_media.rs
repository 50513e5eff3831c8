use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use magsav_scripts::{
    media::{normalize_into, MediaKind},
    telemetry,
};

/// Copies media into the database folders under slugified names.
#[derive(Parser)]
#[command(name = "normalize_media", version)]
struct Cli {
    /// photos or logos
    category: MediaKind,

    /// Database directory receiving photos/ and logos/
    db_dir: PathBuf,

    /// File or directory to copy
    source: PathBuf,

    /// Name to use instead of the source file name
    #[arg(long)]
    key: Option<String>,
}

fn main() -> ExitCode {
    telemetry::init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let kind = cli.category;
    match normalize_into(kind, &cli.db_dir, &cli.source, cli.key.as_deref()) {
        Ok(written) => {
            for path in &written {
                println!("Copied: {}", path.display());
            }
            println!("{} file(s) copied to {}", written.len(), cli.db_dir.join(kind.folder()).display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
