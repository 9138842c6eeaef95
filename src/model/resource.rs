use reqwest::Url;
use serde::{Deserialize, Serialize};

/// The kinds of binary resource a document can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Markdown image syntax `![alt](target)`
    Image,
    /// Markdown link to a `.gift` file `[label](dir/name.gift)`
    Gift,
}

impl LinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            LinkKind::Image => "image",
            LinkKind::Gift => "gift",
        }
    }
}

/// One match of a link pattern, borrowed from the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLink<'a> {
    pub matched_text: &'a str,
    pub raw_relative_path: &'a str,
}

/// A request-ready description of one referenced resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub fetch_url: Url,
    /// Final segment of the author's reference with `&` escaped; unique per build
    pub canonical_name: String,
    pub original_relative_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub img_data: String,
    pub name: String,
    pub old_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftPayload {
    pub gift_data: String,
    pub name: String,
    pub old_name: String,
}

/// Response body of the fetch-document flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub content: String,
    pub imgs: Vec<ImagePayload>,
    pub gifts: Vec<GiftPayload>,
}
