//! reqwest-backed accessor for the query service.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use dua_model::{Category, CategoryId, Dua, Subcategory, SubcategoryId};

use crate::error::{FetchError, Result};

/// Default base URL of a locally running service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Requests that take longer than this fail with [`FetchError::Timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT_VALUE: &str = concat!("dua-browser/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    base: Url,
}

impl FetchClient {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| FetchError::Setup(format!("invalid base URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::Setup(format!(
                "base URL {base_url:?} cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| FetchError::Setup(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_list(self.endpoint(&["categories"])).await
    }

    pub async fn list_subcategories(&self, category: CategoryId) -> Result<Vec<Subcategory>> {
        let id = category.to_string();
        self.get_list(self.endpoint(&["categories", id.as_str(), "subcategories"]))
            .await
    }

    pub async fn list_duas(&self, subcategory: SubcategoryId) -> Result<Vec<Dua>> {
        let id = subcategory.to_string();
        self.get_list(self.endpoint(&["subcategories", id.as_str(), "duas"]))
            .await
    }

    /// Search hits carry only id, names and arabic text; the remaining
    /// fields of each returned [`Dua`] are absent.
    pub async fn search_duas(&self, query: &str) -> Result<Vec<Dua>> {
        let mut url = self.endpoint(&["search"]);
        url.query_pairs_mut().append_pair("q", query);
        self.get_list(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%url, %status, "Request failed");
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        parse_list(&body)
    }
}

/// Parses a body that must be a JSON array of `T`.
///
/// Any other JSON value is rejected rather than coerced to an empty list.
pub(crate) fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(FetchError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                FetchError::MalformedResponse(format!("item {index} has unexpected shape: {e}"))
            })
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_segments_onto_base_path() {
        let client = FetchClient::new("http://example.test/api/", DEFAULT_TIMEOUT).unwrap();
        let url = client.endpoint(&["categories", "7", "subcategories"]);
        assert_eq!(
            url.as_str(),
            "http://example.test/api/categories/7/subcategories"
        );

        let client = FetchClient::new("http://example.test", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.endpoint(&["categories"]).as_str(),
            "http://example.test/categories"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            FetchClient::new("not a url", DEFAULT_TIMEOUT),
            Err(FetchError::Setup(_))
        ));
        assert!(matches!(
            FetchClient::new("mailto:someone@example.test", DEFAULT_TIMEOUT),
            Err(FetchError::Setup(_))
        ));
    }

    #[test]
    fn partial_search_hits_parse_as_duas() {
        let duas: Vec<Dua> =
            parse_list(r#"[{"id": 3, "name_en": "Ayatul Kursi", "name_bn": null}]"#).unwrap();
        assert_eq!(duas.len(), 1);
        assert_eq!(duas[0].name_en.as_deref(), Some("Ayatul Kursi"));
        assert!(duas[0].translation_en.is_none());
    }

    #[test]
    fn non_array_body_is_malformed() {
        let err = parse_list::<Category>(r#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(ref m) if m.contains("object")));

        let err = parse_list::<Category>("<html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn wrongly_shaped_item_is_malformed() {
        let err = parse_list::<Category>(r#"[{"id": "one"}]"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(ref m) if m.contains("item 0")));
    }
}
