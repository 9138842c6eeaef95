use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::model::RepositoryCoordinate;

/// How an item should be returned by the document host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFormat {
    /// Raw file contents as text (documents, manifests, templates)
    Text,
    /// Raw file bytes (images, gifts)
    Binary,
}

impl ItemFormat {
    pub fn accept(&self) -> &'static str {
        match self {
            ItemFormat::Text => "text/plain",
            ItemFormat::Binary => "application/octet-stream",
        }
    }
}

/// Composes Items API URLs on the document host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsEndpoint {
    base: String,
    api_version: String,
}

impl ItemsEndpoint {
    pub fn new(base: impl Into<String>, api_version: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            api_version: api_version.into(),
        }
    }

    /// URL for the item at `path` in `coordinate`; the branch is only
    /// qualified when the coordinate carries one.
    pub fn item_url(
        &self,
        coordinate: &RepositoryCoordinate,
        path: &str,
        format: ItemFormat,
    ) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("items endpoint base cannot carry a path: {}", self.base))?
            .pop_if_empty()
            .extend([
                coordinate.organization.as_str(),
                coordinate.project.as_str(),
                "_apis",
                "git",
                "repositories",
                coordinate.repository.as_str(),
                "items",
            ]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("path", path);
            match format {
                ItemFormat::Text => {
                    query.append_pair("includeContent", "true");
                }
                ItemFormat::Binary => {
                    query.append_pair("$format", "octetStream");
                }
            }
            if let Some(branch) = &coordinate.branch {
                query.append_pair("versionDescriptor.version", branch);
                query.append_pair("versionDescriptor.versionType", "branch");
            }
            query.append_pair("api-version", &self.api_version);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> ItemsEndpoint {
        ItemsEndpoint::new("https://dev.azure.com", "7.1-preview.1")
    }

    #[test]
    fn test_item_url_without_branch() {
        let coordinate = RepositoryCoordinate::new("acme", "Courses", "Unit-1");
        let url = endpoint()
            .item_url(&coordinate, "/docs/intro.md", ItemFormat::Text)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/acme/Courses/_apis/git/repositories/Unit-1/items\
             ?path=%2Fdocs%2Fintro.md&includeContent=true&api-version=7.1-preview.1"
        );
    }

    #[test]
    fn test_item_url_with_branch_and_binary_format() {
        let coordinate = RepositoryCoordinate::new("acme", "Courses", "Unit 1").with_branch("draft");
        let url = endpoint()
            .item_url(&coordinate, "/img/a.png", ItemFormat::Binary)
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(url.path().ends_with("/repositories/Unit%201/items"));
        assert!(pairs.contains(&("path".into(), "/img/a.png".into())));
        assert!(pairs.contains(&("$format".into(), "octetStream".into())));
        assert!(pairs.contains(&("versionDescriptor.version".into(), "draft".into())));
    }
}
