// Runtime configuration, read from the environment (optionally seeded by a
// `.env` file in the working directory).

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_MOVIES_FILE: &str = "data/movies.json";
pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_TEMPLATE: &str = "static/index_template.html";
pub const DEFAULT_OUTPUT: &str = "static/index.html";

#[derive(Debug, Clone)]
pub struct Config {
    /// Storage file; a `.csv` suffix selects the CSV backend.
    pub movies_file: PathBuf,
    pub omdb_url: String,
    pub omdb_api_key: String,
    pub site_template: PathBuf,
    pub site_output: PathBuf,
}

impl Config {
    /// Loads `.env` if there is one, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("loaded environment from {:?}", path),
            Err(e) => log::debug!("no .env file loaded ({})", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as
    /// unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let omdb_api_key = get("OMDB_API_KEY")
            .context("Missing required environment variable: OMDB_API_KEY")?;

        Ok(Config {
            movies_file: get("MOVIES_FILE")
                .unwrap_or_else(|| DEFAULT_MOVIES_FILE.into())
                .into(),
            omdb_url: get("OMDB_URL").unwrap_or_else(|| DEFAULT_OMDB_URL.into()),
            omdb_api_key,
            site_template: get("SITE_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_TEMPLATE.into())
                .into(),
            site_output: get("SITE_OUTPUT")
                .unwrap_or_else(|| DEFAULT_OUTPUT.into())
                .into(),
        })
    }
}
