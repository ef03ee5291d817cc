//! Data sources: the remote adventures API and a local JSON file.

use crate::error::FetchError;
use crate::model::{Adventure, decode_adventures};
use anyhow::Result;
use std::fs;

/// Client for the adventures HTTP API.
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the given API base URL. A trailing slash on the
    /// base is tolerated. No timeout beyond the reqwest default.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full adventure list: `GET {base}/adventure/get/all`.
    /// Non-success statuses fail as transport errors before the body is read.
    pub fn fetch_all(&self) -> Result<Vec<Adventure>, FetchError> {
        let url = format!("{}/adventure/get/all", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(FetchError::Transport)?;
        let body = response.text().map_err(FetchError::Transport)?;
        decode_adventures(&body)
    }
}

/// Loads the same payload shape from a local file, for offline use.
pub fn load_file(path: &str) -> Result<Vec<Adventure>, FetchError> {
    let body = fs::read_to_string(path).map_err(FetchError::Io)?;
    decode_adventures(&body)
}
