//! Search result data models

use serde::{Deserialize, Deserializer, Serialize};

/// Decoded web search payload
///
/// Only the `web` section is read; other top-level sections the provider
/// returns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// Web results, absent when the provider found nothing
    #[serde(default)]
    pub web: Option<WebResults>,
}

impl SearchResultSet {
    /// Result set with a `web` section holding `items`
    pub fn with_items(items: Vec<SearchResultItem>) -> Self {
        Self {
            web: Some(WebResults { results: items }),
        }
    }

    /// Items in display order, empty when there is no `web` section
    pub fn items(&self) -> &[SearchResultItem] {
        self.web.as_ref().map(|w| w.results.as_slice()).unwrap_or(&[])
    }
}

/// The `web` section of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebResults {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// A single web hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub url: String,
}

impl SearchResultItem {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }
}

/// Providers send `null` for some hits without a snippet
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
