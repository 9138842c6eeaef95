use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

use crate::upstream::traits::{FetchRequest, FetchResponse, UpstreamFetcher};

/// Fetches from the document host over HTTPS with a static Basic credential
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    authorization: HeaderValue,
}

impl HttpFetcher {
    pub fn new(credential: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        let mut authorization = HeaderValue::from_str(&basic_authorization(credential))
            .context("credential cannot be sent as a header")?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            authorization,
        })
    }
}

/// `Basic base64(":" + credential)`: empty user name, credential as password
pub fn basic_authorization(credential: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{}", credential)))
}

#[async_trait::async_trait]
impl UpstreamFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let response = self
            .client
            .get(request.url.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, request.format.accept())
            .send()
            .await
            .with_context(|| format!("request to {} failed", request.url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading body from {} failed", request.url))?;

        Ok(FetchResponse {
            status,
            body: body.to_vec(),
        })
    }
}
