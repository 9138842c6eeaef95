use anyhow::Result;
use reqwest::Url;

use crate::model::ItemFormat;

/// One upstream request; credentials are the fetcher's concern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,
    pub format: ItemFormat,
}

impl FetchRequest {
    pub fn new(url: Url, format: ItemFormat) -> Self {
        Self { url, format }
    }
}

/// Whatever the document host answered, success or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Raw authenticated access to the document host.
///
/// `Err` means no response was obtained at all (connection, timeout); a
/// non-success status is an `Ok` response the caller has to inspect.
#[async_trait::async_trait]
pub trait UpstreamFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
