//! Entity backend contract and its HTTP implementation
//!
//! The backend is a long-lived local process (search, registry lookups,
//! hierarchy building, pairing persistence). leiscope never starts it; it only
//! assumes it is reachable at the configured base URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{LeiscopeError, Result};
use crate::types::{
  BulkRow, BulkSearchRequest, CompanyRecord, DataEnvelope, HealthStatus, HierarchyNode,
  PairingSubmission, PersistedPairing, SaveAck, SavePairingsRequest, SearchResult, TextEnvelope,
};

/// Operations the entity backend exposes.
///
/// A response that carries an `error` field surfaces as
/// [`LeiscopeError::Service`] with the message untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityService: Send + Sync {
  /// Ranked candidates for an informal name
  async fn search(&self, name: &str, top_k: usize) -> Result<Vec<SearchResult>>;

  /// Registry record for an LEI; `None` when the backend had nothing to return
  async fn company_details(&self, lei: &str) -> Result<Option<CompanyRecord>>;

  /// Hierarchy text for the `match_index`-th (1-based) candidate of a name search
  async fn hierarchy_by_name(&self, name: &str, match_index: usize) -> Result<Option<String>>;

  /// Hierarchy text rooted at the ultimate parent of an LEI
  async fn hierarchy_by_lei(&self, lei: &str) -> Result<Option<String>>;

  /// Flattened hierarchy nodes for map projection
  async fn hierarchy_geo(&self, lei: &str) -> Result<Vec<HierarchyNode>>;

  async fn bulk_search(&self, targets: &[String], top_k: usize) -> Result<Vec<BulkRow>>;

  async fn save_pairings(&self, pairings: &[PairingSubmission]) -> Result<SaveAck>;

  async fn list_pairings(&self) -> Result<Vec<PersistedPairing>>;

  async fn health(&self) -> Result<HealthStatus>;
}

/// reqwest-backed [`EntityService`]
pub struct HttpEntityService {
  client: Client,
  base_url: String,
}

impl HttpEntityService {
  pub fn new(config: &Config) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, base_url: config.base_url().to_string() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
    tracing::debug!(endpoint = path, "GET");
    let response = self.client.get(self.url(path)).query(query).send().await?;
    Self::decode(path, response).await
  }

  async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    tracing::debug!(endpoint = path, "POST");
    let response = self.client.post(self.url(path)).json(body).send().await?;
    Self::decode(path, response).await
  }

  async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
      return Err(LeiscopeError::Http { endpoint: path.to_string(), status: status.as_u16() });
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
      .map_err(|e| LeiscopeError::Decode { endpoint: path.to_string(), message: e.to_string() })
  }
}

/// Collapse a data envelope: error field first, then the payload.
fn unwrap_data<T>(envelope: DataEnvelope<T>) -> Result<Option<T>> {
  if let Some(error) = envelope.error {
    return Err(LeiscopeError::service(error));
  }
  Ok(envelope.data)
}

fn unwrap_text(envelope: TextEnvelope) -> Result<Option<String>> {
  if let Some(error) = envelope.error {
    return Err(LeiscopeError::service(error));
  }
  Ok(envelope.text)
}

#[async_trait]
impl EntityService for HttpEntityService {
  async fn search(&self, name: &str, top_k: usize) -> Result<Vec<SearchResult>> {
    let envelope: DataEnvelope<Vec<SearchResult>> =
      self.get_json("search", &[("name", name), ("top", top_k.to_string().as_str())]).await?;
    unwrap_data(envelope)?.ok_or_else(|| LeiscopeError::unexpected("Unexpected response format"))
  }

  async fn company_details(&self, lei: &str) -> Result<Option<CompanyRecord>> {
    let envelope: DataEnvelope<CompanyRecord> = self.get_json("company", &[("lei", lei)]).await?;
    unwrap_data(envelope)
  }

  async fn hierarchy_by_name(&self, name: &str, match_index: usize) -> Result<Option<String>> {
    let envelope: TextEnvelope = self
      .get_json("hierarchy", &[("name", name), ("match", match_index.to_string().as_str())])
      .await?;
    unwrap_text(envelope)
  }

  async fn hierarchy_by_lei(&self, lei: &str) -> Result<Option<String>> {
    let envelope: TextEnvelope = self.get_json("hierarchy_by_lei", &[("lei", lei)]).await?;
    unwrap_text(envelope)
  }

  async fn hierarchy_geo(&self, lei: &str) -> Result<Vec<HierarchyNode>> {
    let envelope: DataEnvelope<Vec<HierarchyNode>> =
      self.get_json("hierarchy_geo", &[("lei", lei)]).await?;
    Ok(unwrap_data(envelope)?.unwrap_or_default())
  }

  async fn bulk_search(&self, targets: &[String], top_k: usize) -> Result<Vec<BulkRow>> {
    let request = BulkSearchRequest { targets, top: top_k };
    let envelope: DataEnvelope<Vec<BulkRow>> = self.post_json("bulk-search", &request).await?;
    Ok(unwrap_data(envelope)?.unwrap_or_default())
  }

  async fn save_pairings(&self, pairings: &[PairingSubmission]) -> Result<SaveAck> {
    let request = SavePairingsRequest { pairings };
    let ack: SaveAck = self.post_json("pairings", &request).await?;
    match ack.error {
      Some(error) => Err(LeiscopeError::service(error)),
      None => Ok(ack),
    }
  }

  async fn list_pairings(&self) -> Result<Vec<PersistedPairing>> {
    let envelope: DataEnvelope<Vec<PersistedPairing>> = self.get_json("pairings", &[]).await?;
    Ok(unwrap_data(envelope)?.unwrap_or_default())
  }

  async fn health(&self) -> Result<HealthStatus> {
    self.get_json("health", &[]).await
  }
}
