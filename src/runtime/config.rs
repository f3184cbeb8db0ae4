//! # Feed Configuration
//!
//! [`FeedConfig`] is a plain value handed to a
//! [`FeedClient`](crate::clients::FeedClient) at construction. There is no
//! global settings cache: load it once and pass it where it is needed.
//!
//! ```yaml
//! # config/feeds.yml
//! worksheet_token: "1/abc..."
//! list_token: "1/def..."
//! source: "sheet-record"
//! ```
//!
//! Every key is optional; missing ones fall back to [`FeedConfig::default`].

use crate::framework::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The two feeds a client talks to. Each has its own auth token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Lists the collections (worksheets) of a store.
    Worksheet,
    /// Lists, creates and updates rows.
    List,
}

/// Settings for the feed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Auth token sent with worksheet feed requests.
    pub worksheet_token: Option<String>,
    /// Auth token sent with list feed requests.
    pub list_token: Option<String>,
    /// Client name reported to the service.
    pub source: String,
    /// Value of the `GData-Version` header.
    pub gdata_version: String,
    /// Base URL of the worksheets feed.
    pub worksheet_base_url: String,
    /// Base URL of the list feed.
    pub list_base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            worksheet_token: None,
            list_token: None,
            source: "sheet-record".to_string(),
            gdata_version: "3".to_string(),
            worksheet_base_url: "https://spreadsheets.google.com/feeds/worksheets".to_string(),
            list_base_url: "https://spreadsheets.google.com/feeds/list".to_string(),
        }
    }
}

impl FeedConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> FeedResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> FeedResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| FeedError::Config(format!("{}: {e}", path.display())))?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// The token for requests against `feed`.
    pub fn token_for(&self, feed: FeedKind) -> Option<&str> {
        match feed {
            FeedKind::Worksheet => self.worksheet_token.as_deref(),
            FeedKind::List => self.list_token.as_deref(),
        }
    }
}
