pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod upstream;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{RelayError, TemplateError};

// Export logic types
pub use logic::{DescriptorBuilder, NavigationIndexBuilder, RelayService, TemplateSource};

// Export all model types
pub use model::*;

// Export upstream types
pub use upstream::{FetchRequest, FetchResponse, HttpFetcher, MemoryFetcher, UpstreamFetcher};

/// Build the relay router against the real document host
pub fn build_app(config: &config::AppConfig) -> anyhow::Result<axum::Router> {
    use std::sync::Arc;

    let credential = config.credential()?;
    let fetcher = HttpFetcher::new(&credential, config.fetch_timeout())?;
    let relay = Arc::new(RelayService::new(Arc::new(fetcher), config));

    Ok(api::routes::create_router().with_state(relay))
}
