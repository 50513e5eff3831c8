use std::env;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_MEDIAS_PATH: &str = "medias";
pub const DEFAULT_CSS_DIR: &str = "/opt/magsav/desktop-javafx/src/main/resources/styles";
pub const DEFAULT_AVATAR_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

#[derive(Clone, Debug)]
pub struct Config {
    pub medias_path: PathBuf,
    pub request_delay: Duration,
    pub http_timeout: Duration,
    pub css_dir: PathBuf,
    pub avatar_font: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            medias_path: PathBuf::from(DEFAULT_MEDIAS_PATH),
            request_delay: Duration::from_secs(2),
            http_timeout: Duration::from_secs(30),
            css_dir: PathBuf::from(DEFAULT_CSS_DIR),
            avatar_font: PathBuf::from(DEFAULT_AVATAR_FONT),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let medias_path = env::var("MAGSAV_MEDIAS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.medias_path);
        let css_dir = env::var("MAGSAV_CSS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.css_dir);
        let avatar_font = env::var("MAGSAV_AVATAR_FONT")
            .map(PathBuf::from)
            .unwrap_or(defaults.avatar_font);

        let request_delay = secs_var("MAGSAV_REQUEST_DELAY_SECS")?.unwrap_or(defaults.request_delay);
        let http_timeout = secs_var("MAGSAV_HTTP_TIMEOUT_SECS")?.unwrap_or(defaults.http_timeout);

        Ok(Config {
            medias_path,
            request_delay,
            http_timeout,
            css_dir,
            avatar_font,
        })
    }
}

fn secs_var(name: &str) -> Result<Option<Duration>> {
    match env::var(name) {
        Ok(raw) => {
            let secs = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e)))?;
            Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", name, e)))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_scraper_settings() {
        let config = Config::default();
        assert_eq!(config.medias_path, PathBuf::from("medias"));
        assert_eq!(config.request_delay, Duration::from_secs(2));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }
}
