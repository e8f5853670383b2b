// OMDb client: a small blocking HTTP client that resolves a movie title to
// its year, IMDb rating and poster. One request per lookup, no retries.

use crate::movie::parse_rating_text;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

/// What the lookup service knows about a title.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundMovie {
    pub year: String,
    pub rating: Option<f64>,
    pub poster: String,
}

/// Resolves titles against a movie information service.
///
/// `Ok(None)` means the service answered but has no such movie; `Err` means
/// the service could not be asked (transport failure, bad status, garbage
/// body).
pub trait MovieLookup {
    fn find(&self, title: &str) -> Result<Option<FoundMovie>>;
}

/// Client for the OMDb API (`?apikey=..&t=<title>`).
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Body returned by OMDb. A miss looks like
/// `{"Response":"False","Error":"Movie not found!"}`.
#[derive(Deserialize, Debug)]
pub struct OmdbResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl OmdbResponse {
    /// Turns the raw body into a hit, or `None` when OMDb reported an error.
    pub fn into_found(self) -> Option<FoundMovie> {
        let failed = self.error.is_some()
            || self
                .response
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case("false"));
        if failed {
            return None;
        }
        Some(FoundMovie {
            year: self.year.unwrap_or_default(),
            rating: self.imdb_rating.as_deref().and_then(parse_rating_text),
            poster: self.poster.unwrap_or_default(),
        })
    }
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(OmdbClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl MovieLookup for OmdbClient {
    fn find(&self, title: &str) -> Result<Option<FoundMovie>> {
        log::debug!("looking up {:?} on {}", title, self.base_url);
        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .context("Failed to send OMDb request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            anyhow::bail!("OMDb lookup failed: {} - {}", status, txt);
        }
        let body: OmdbResponse = res.json().context("Parsing OMDb response json")?;
        if let Some(err) = &body.error {
            log::debug!("OMDb has no match for {:?}: {}", title, err);
        }
        Ok(body.into_found())
    }
}
