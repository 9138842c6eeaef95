use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Identifies where a document or resource lives on the document host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCoordinate {
    pub organization: String,
    pub project: String,
    pub repository: String,
    /// When absent the host's default branch applies
    pub branch: Option<String>,
}

impl RepositoryCoordinate {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            repository: repository.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// A document's own location, used as the base for resolving its links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub coordinate: RepositoryCoordinate,
    pub path: String,
}

impl DocumentReference {
    /// Parse a browser-facing document URL such as
    /// `https://dev.azure.com/{org}/{project}/_git/{repo}?path=/docs/a.md&version=GBmain`.
    ///
    /// Only `GB`-prefixed (branch) version descriptors are honoured; anything
    /// else falls back to the default branch.
    pub fn parse(url: &str, host_prefix: &str) -> Result<Self, RelayError> {
        if !url.starts_with(host_prefix) {
            return Err(RelayError::Validation("Invalid Azure DevOps URL".to_string()));
        }

        let parsed = Url::parse(url)
            .map_err(|_| RelayError::Validation("Invalid Azure DevOps URL".to_string()))?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let (organization, project, repository) = match segments.as_slice() {
            [org, project, "_git", repo, ..] => (
                decode_segment(org),
                decode_segment(project),
                decode_segment(repo),
            ),
            _ => return Err(RelayError::Validation("Invalid Azure DevOps URL".to_string())),
        };

        let mut path = None;
        let mut branch = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "path" if !value.is_empty() => path = Some(value.into_owned()),
                "version" => {
                    branch = value
                        .strip_prefix("GB")
                        .filter(|b| !b.is_empty())
                        .map(str::to_string)
                }
                _ => {}
            }
        }

        let path = path.ok_or_else(|| {
            RelayError::Validation("File path not found in URL".to_string())
        })?;

        Ok(Self {
            coordinate: RepositoryCoordinate {
                organization,
                project,
                repository,
                branch,
            },
            path,
        })
    }
}

/// Path segments come back percent-encoded; repository names routinely carry spaces.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
