use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::{AppConfig, NavigationConfig};
use crate::error::{RelayError, TemplateError};
use crate::logic::descriptor_builder::DescriptorBuilder;
use crate::logic::navigation_index::{NavigationIndexBuilder, TemplateSource};
use crate::logic::path_resolver::{parent_dir, resolve};
use crate::model::{
    ActivityIndex, DocumentPayload, DocumentReference, GiftPayload, ImagePayload, ItemFormat,
    ItemsEndpoint, LinkKind, Manifest, RepositoryCoordinate, ResourceDescriptor,
    TemplateDocument,
};
use crate::upstream::{FetchRequest, UpstreamFetcher};

/// Request flows of the relay: the document fetch with its resources and the
/// activity index lookup. Holds no per-request state.
pub struct RelayService<F: UpstreamFetcher> {
    fetcher: Arc<F>,
    endpoint: ItemsEndpoint,
    host_prefix: String,
    navigation: NavigationConfig,
}

impl<F: UpstreamFetcher> RelayService<F> {
    pub fn new(fetcher: Arc<F>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            endpoint: ItemsEndpoint::new(&config.upstream.host_prefix, &config.upstream.api_version),
            host_prefix: config.upstream.host_prefix.clone(),
            navigation: config.navigation.clone(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn endpoint(&self) -> &ItemsEndpoint {
        &self.endpoint
    }

    /// Fetch the document behind `url` along with every image and gift it
    /// links to. The first failed fetch aborts the whole request.
    pub async fn fetch_document(&self, url: &str) -> Result<DocumentPayload, RelayError> {
        let document = DocumentReference::parse(url, &self.host_prefix)?;
        log::info!(
            "fetching {} from {}/{}/{}",
            document.path,
            document.coordinate.organization,
            document.coordinate.project,
            document.coordinate.repository
        );

        let document_url =
            self.endpoint
                .item_url(&document.coordinate, &document.path, ItemFormat::Text)?;
        let response = self
            .fetcher
            .fetch(&FetchRequest::new(document_url, ItemFormat::Text))
            .await?;
        if !response.is_success() {
            return Err(RelayError::Upstream {
                status: response.status,
                reason: "Failed to fetch file content",
            });
        }
        let content = response.text();

        let builder = DescriptorBuilder::new(&self.endpoint, &document);

        let imgs = self
            .fetch_resources(builder.build(&content, LinkKind::Image), "Failed to fetch image")
            .await?
            .into_iter()
            .map(|(descriptor, data)| ImagePayload {
                img_data: data,
                name: descriptor.canonical_name,
                old_name: descriptor.original_relative_path,
            })
            .collect();

        let gifts = self
            .fetch_resources(builder.build(&content, LinkKind::Gift), "Failed to fetch gift")
            .await?
            .into_iter()
            .map(|(descriptor, data)| GiftPayload {
                gift_data: data,
                name: descriptor.canonical_name,
                old_name: descriptor.original_relative_path,
            })
            .collect();

        Ok(DocumentPayload {
            content,
            imgs,
            gifts,
        })
    }

    /// Fetch each descriptor in order, one at a time, base64-encoding the bodies
    async fn fetch_resources(
        &self,
        descriptors: Vec<ResourceDescriptor>,
        failure: &'static str,
    ) -> Result<Vec<(ResourceDescriptor, String)>, RelayError> {
        let mut fetched = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let response = self
                .fetcher
                .fetch(&FetchRequest::new(
                    descriptor.fetch_url.clone(),
                    ItemFormat::Binary,
                ))
                .await?;
            if !response.is_success() {
                log::warn!(
                    "resource {} answered {}",
                    descriptor.original_relative_path,
                    response.status
                );
                return Err(RelayError::Upstream {
                    status: response.status,
                    reason: failure,
                });
            }
            let data = STANDARD.encode(&response.body);
            fetched.push((descriptor, data));
        }

        Ok(fetched)
    }

    /// Build the activity index for `unit_name` from the first repository
    /// candidate whose manifest yields any activities.
    pub async fn fetch_activity_index(&self, unit_name: &str) -> Result<ActivityIndex, RelayError> {
        let unit_name = unit_name.trim();
        if unit_name.is_empty() {
            return Err(RelayError::Validation("Unit name is required".to_string()));
        }

        for repository in repository_candidates(&self.navigation.repository_prefix, unit_name) {
            let coordinate = RepositoryCoordinate::new(
                &self.navigation.organization,
                &self.navigation.project,
                repository,
            );

            let manifest: Manifest = match self
                .fetch_json(&coordinate, &self.navigation.manifest_path)
                .await
            {
                Ok(manifest) => manifest,
                Err(e) => {
                    log::debug!("no manifest in {}: {}", coordinate.repository, e);
                    continue;
                }
            };

            let templates = RepositoryTemplates {
                relay: self,
                coordinate: &coordinate,
                directory: parent_dir(&self.navigation.manifest_path),
            };
            let index = NavigationIndexBuilder::build(&manifest, &templates).await;
            if index.is_empty() {
                log::info!(
                    "manifest in {} produced no activities, trying next candidate",
                    coordinate.repository
                );
                continue;
            }

            log::info!(
                "activity index for {} built from {} ({} entries)",
                unit_name,
                coordinate.repository,
                index.len()
            );
            return Ok(index);
        }

        Err(RelayError::NotFound("Navigation data not found".to_string()))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        coordinate: &RepositoryCoordinate,
        path: &str,
    ) -> Result<T, TemplateError> {
        let url = self.endpoint.item_url(coordinate, path, ItemFormat::Text)?;
        let response = self
            .fetcher
            .fetch(&FetchRequest::new(url, ItemFormat::Text))
            .await?;
        if !response.is_success() {
            return Err(TemplateError::Status(response.status));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Repository spellings tried for a unit, in order
pub fn repository_candidates(prefix: &str, unit_name: &str) -> [String; 4] {
    [
        format!("{}-{}", prefix, unit_name),
        format!("{} - {}", prefix, unit_name),
        format!("{} -{}", prefix, unit_name),
        format!("{}- {}", prefix, unit_name),
    ]
}

/// Templates living next to a manifest in one repository
struct RepositoryTemplates<'a, F: UpstreamFetcher> {
    relay: &'a RelayService<F>,
    coordinate: &'a RepositoryCoordinate,
    directory: &'a str,
}

#[async_trait::async_trait]
impl<'a, F: UpstreamFetcher> TemplateSource for RepositoryTemplates<'a, F> {
    async fn fetch_template(&self, name: &str) -> Result<TemplateDocument, TemplateError> {
        let path = resolve(self.directory, name);
        self.relay.fetch_json(self.coordinate, &path).await
    }
}
