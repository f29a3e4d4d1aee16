use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::constants::{
    DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_TIMEOUT_SECONDS, DOWNLOADED_LIST_FILE,
    MAPILLARY_SEARCH_URL,
};
use crate::types::ThumbSize;

#[derive(Clone, Debug)]
pub struct Config {
    pub search_url: String,
    pub output_dir: PathBuf,
    pub thumb_size: ThumbSize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: MAPILLARY_SEARCH_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            thumb_size: ThumbSize::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let search_url = trim_endpoint(&env_string("MAPILLARY_SEARCH_URL", MAPILLARY_SEARCH_URL));
        let output_dir = PathBuf::from(env_string("MAPILLARY_OUTPUT_DIR", DEFAULT_OUTPUT_DIR));
        let thumb_size = match env_optional("MAPILLARY_THUMB_SIZE") {
            Some(value) => value
                .parse::<ThumbSize>()
                .with_context(|| format!("Failed to parse MAPILLARY_THUMB_SIZE={value}"))?,
            None => ThumbSize::default(),
        };
        let request_timeout = Duration::from_secs(env_u64(
            "MAPILLARY_REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?);

        Ok(Self {
            search_url,
            output_dir,
            thumb_size,
            request_timeout,
        })
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, thumb_size: Option<ThumbSize>, output_dir: Option<PathBuf>) -> Self {
        if let Some(thumb_size) = thumb_size {
            self.thumb_size = thumb_size;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    pub fn downloaded_list_path(&self) -> PathBuf {
        self.output_dir.join(DOWNLOADED_LIST_FILE)
    }
}

fn trim_endpoint(value: &str) -> String {
    value.trim().trim_end_matches(['?', '/']).to_string()
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_string(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match env_optional(name) {
        Some(value) => value
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {}={} as u64", name, value)),
        None => Ok(default),
    }
}
