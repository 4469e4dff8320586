//! Application configuration loaded from the environment at startup.
//!
//! A `.env` file in the working directory is honored outside of tests.

use crate::assistant::TypingDelay;
use crate::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "ACEE_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the SQLite record store.
    pub data_dir: PathBuf,
    /// Explicit store URL; overrides `data_dir` when set.
    pub database_url: Option<String>,
    pub typing_delay: TypingDelay,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            database_url: None,
            typing_delay: TypingDelay::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Reads `ACEE_DATA_DIR`, `ACEE_DATABASE_URL`, `ACEE_TYPING_DELAY_MS`,
    /// `ACEE_TYPING_JITTER_MS` and `ACEE_LOG_FORMAT`, defaulting missing ones.
    pub fn from_env() -> Result<Self, AppError> {
        if !cfg!(test) {
            dotenv::dotenv().ok();
        }

        let defaults = Self::default();

        let data_dir = std::env::var("ACEE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let database_url = std::env::var("ACEE_DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let base = read_millis("ACEE_TYPING_DELAY_MS")?.unwrap_or(defaults.typing_delay.base);
        let jitter = read_millis("ACEE_TYPING_JITTER_MS")?.unwrap_or(defaults.typing_delay.jitter);

        let log_format = match std::env::var("ACEE_LOG_FORMAT") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            data_dir,
            database_url,
            typing_delay: TypingDelay::new(base, jitter),
            log_format,
        })
    }

    /// URL of the record store database.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "sqlite://{}",
                self.data_dir.join("acee.sqlite").to_string_lossy()
            ),
        }
    }
}

fn read_millis(name: &str) -> Result<Option<Duration>, AppError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| AppError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
