use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::{form_urlencoded, Url};

use super::parse::SearchResponse;
use crate::validate::{validate, ValidationIssues};

pub const DEFAULT_ENDPOINT: &str = "https://openlibrary.org/search.json";

/// Page size sent with every query.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to reach search endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint answered {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Validation(#[from] ValidationIssues),
}

/// Raised while setting up a client, before any query is sent.
#[derive(Error, Debug)]
pub enum CreateClientError {
    #[error("cannot build http client: {0}")]
    Http(#[source] reqwest::Error),

    #[error("search endpoint must be http or https, got {0}")]
    UnsupportedScheme(String),
}

impl SearchError {
    /// True when no JSON document was obtained at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_) | SearchError::Status(_))
    }

    pub fn issues(&self) -> Option<&ValidationIssues> {
        match self {
            SearchError::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchClient {
    client: Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(endpoint: Url) -> Result<SearchClient, CreateClientError> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(CreateClientError::UnsupportedScheme(endpoint.to_string()));
        }
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CreateClientError::Http)?;
        Ok(SearchClient { client, endpoint })
    }

    /// `<endpoint>?q=<query>&limit=10`, with spaces sent as `%20`.
    pub fn build_url(&self, query: &str) -> Url {
        // form encoding escapes a literal '+' as %2B, so any '+' left is a space
        let q = form_urlencoded::byte_serialize(query.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!("q={}&limit={}", q, SEARCH_LIMIT)));
        url
    }

    /// Sends one request and validates the body. Never retries.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let url = self.build_url(query);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Search for {:?} failed with status {}", query, status);
            return Err(SearchError::Status(status));
        }
        let raw = response.json::<Value>().await?;

        match validate(&raw) {
            Ok(results) => {
                info!(
                    "Search for {:?}: {} of {} results",
                    query,
                    results.docs.len(),
                    results.num_found
                );
                Ok(results)
            }
            Err(issues) => {
                warn!("Search for {:?} returned an unexpected shape\n{}", query, issues);
                Err(issues.into())
            }
        }
    }
}
