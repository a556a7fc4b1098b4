//! Async HTTP client for the catalog REST API.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use shelf_core::{
  Book, Error, Result, VolumeId, catalog::CatalogSource,
};
use tracing::debug;

/// Connection settings for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
  /// Base URL, e.g. `https://www.googleapis.com/books/v1`.
  pub base_url: String,
  /// Optional API key, passed as the `key` query parameter.
  pub api_key:  Option<String>,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      base_url: "https://www.googleapis.com/books/v1".to_owned(),
      api_key:  None,
    }
  }
}

/// Async HTTP client for the catalog.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CatalogClient {
  client: Client,
  config: CatalogConfig,
}

impl CatalogClient {
  pub fn new(config: CatalogConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| Error::CatalogUnavailable {
        status:  None,
        message: format!("failed to build HTTP client: {e}"),
      })?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }

  /// Issue a GET, check the status, and decode the JSON body. Every failure
  /// mode maps to [`Error::CatalogUnavailable`] so resolution stays
  /// per-identifier retryable.
  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T> {
    let mut req = self.client.get(self.url(path)).query(query);
    if let Some(key) = &self.config.api_key {
      req = req.query(&[("key", key.as_str())]);
    }

    let resp = req.send().await.map_err(|e| Error::CatalogUnavailable {
      status:  None,
      message: format!("GET {path} failed: {e}"),
    })?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::CatalogUnavailable {
        status:  Some(status.as_u16()),
        message: format!("GET {path} returned {status}"),
      });
    }

    resp.json().await.map_err(|e| Error::CatalogUnavailable {
      status:  Some(status.as_u16()),
      message: format!("decoding {path} response: {e}"),
    })
  }
}

impl CatalogSource for CatalogClient {
  async fn search(&self, term: &str, max_results: u32) -> Result<Vec<Book>> {
    debug!(term, max_results, "catalog search");
    let resp: crate::dto::SearchResponse = self
      .get_json(
        "/volumes",
        &[("q", term.to_owned()), ("maxResults", max_results.to_string())],
      )
      .await?;
    Ok(resp.into_books())
  }

  async fn fetch_by_id(&self, id: &VolumeId) -> Result<Book> {
    debug!(%id, "catalog fetch");
    let dto: crate::dto::VolumeDto =
      self.get_json(&format!("/volumes/{id}"), &[]).await?;
    Ok(dto.into_book())
  }
}
