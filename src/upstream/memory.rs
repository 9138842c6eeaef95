use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use reqwest::Url;
use std::collections::HashMap;

use crate::upstream::traits::{FetchRequest, FetchResponse, UpstreamFetcher};

#[derive(Debug, Clone)]
enum Canned {
    Response(FetchResponse),
    Unreachable,
}

/// In-memory stand-in for the document host.
///
/// Answers from canned responses keyed by exact URL, 404 for anything else,
/// and records every request it sees in order.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: RwLock<HashMap<String, Canned>>,
    requests: RwLock<Vec<FetchRequest>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &Url, response: FetchResponse) {
        self.responses
            .write()
            .insert(url.as_str().to_string(), Canned::Response(response));
    }

    /// Requests for `url` fail without any response, like a dropped connection
    pub fn insert_unreachable(&self, url: &Url) {
        self.responses
            .write()
            .insert(url.as_str().to_string(), Canned::Unreachable);
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.read().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }
}

#[async_trait::async_trait]
impl UpstreamFetcher for MemoryFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.requests.write().push(request.clone());

        match self.responses.read().get(request.url.as_str()) {
            Some(Canned::Response(response)) => Ok(response.clone()),
            Some(Canned::Unreachable) => Err(anyhow!("connection to {} refused", request.url)),
            None => Ok(FetchResponse::status(404)),
        }
    }
}
