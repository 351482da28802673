use async_trait::async_trait;

pub mod client;
pub mod parse;

pub use client::{CreateClientError, SearchClient, SearchError, SEARCH_LIMIT};
pub use parse::{Book, SearchResponse};

#[async_trait]
pub trait Searcher {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}

#[async_trait]
impl Searcher for SearchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        SearchClient::search(self, query).await
    }
}
