//! Country code to coordinate resolution
//!
//! Resolution order: process-wide cache, static centroid table, remote
//! geocoder. Failures resolve to [`LatLon::SENTINEL`] and are not cached, so a
//! later request for the same code tries the geocoder again.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{centroids, LatLon};
use crate::config::Config;
use crate::error::{LeiscopeError, Result};

/// Remote country geocoding. Best effort: callers never surface its errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
  async fn lookup(&self, code: &str) -> Result<LatLon>;
}

/// Append-only country code -> position store shared by resolver and projector.
#[derive(Debug, Default)]
pub struct CoordinateCache {
  entries: RwLock<HashMap<String, LatLon>>,
}

impl CoordinateCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, code: &str) -> Option<LatLon> {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).get(code).copied()
  }

  /// First write wins; a resolved code keeps its value for the process lifetime.
  pub fn insert(&self, code: &str, position: LatLon) -> LatLon {
    *self
      .entries
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .entry(code.to_string())
      .or_insert(position)
  }

  pub fn contains(&self, code: &str) -> bool {
    self.get(code).is_some()
  }

  pub fn len(&self) -> usize {
    self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

pub struct CoordinateResolver {
  cache: Arc<CoordinateCache>,
  geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
  pub fn new(cache: Arc<CoordinateCache>, geocoder: Arc<dyn Geocoder>) -> Self {
    Self { cache, geocoder }
  }

  pub fn cache(&self) -> &Arc<CoordinateCache> {
    &self.cache
  }

  pub async fn resolve(&self, country: &str) -> LatLon {
    let code = normalize(country);
    if code.is_empty() {
      return LatLon::SENTINEL;
    }

    if let Some(position) = self.cache.get(&code) {
      return position;
    }

    if let Some(position) = centroids::lookup(&code) {
      return self.cache.insert(&code, position);
    }

    match self.geocoder.lookup(&code).await {
      Ok(position) if position.is_valid() && !position.is_sentinel() => {
        self.cache.insert(&code, position)
      }
      Ok(position) => {
        tracing::debug!(code = %code, ?position, "geocoder returned an unusable position");
        LatLon::SENTINEL
      }
      Err(e) => {
        tracing::debug!(code = %code, error = %e, "geocoding failed, leaving unpositioned");
        LatLon::SENTINEL
      }
    }
  }
}

fn normalize(country: &str) -> String {
  country.trim().to_ascii_uppercase()
}

/// Geocoder backed by a restcountries-style `/alpha/{code}` endpoint.
pub struct HttpGeocoder {
  client: Client,
  base_url: String,
}

impl HttpGeocoder {
  pub fn new(config: &Config) -> Result<Self> {
    let client = Client::builder().timeout(config.geocoder_timeout()).build()?;
    Ok(Self { client, base_url: config.geocoder_url.trim_end_matches('/').to_string() })
  }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
  async fn lookup(&self, code: &str) -> Result<LatLon> {
    let endpoint = format!("{}/alpha/{}", self.base_url, code);
    let response = self.client.get(&endpoint).send().await?;
    if !response.status().is_success() {
      return Err(LeiscopeError::Http { endpoint, status: response.status().as_u16() });
    }

    let body: serde_json::Value = response
      .json()
      .await
      .map_err(|e| LeiscopeError::Decode { endpoint: endpoint.clone(), message: e.to_string() })?;

    first_coordinate_pair(&body).ok_or_else(|| LeiscopeError::Decode {
      endpoint,
      message: "no latlng pair in response".to_string(),
    })
  }
}

/// Extract `latlng` from the first entry of the response (or the object itself).
pub fn first_coordinate_pair(body: &serde_json::Value) -> Option<LatLon> {
  let entry = match body {
    serde_json::Value::Array(items) => items.first()?,
    other => other,
  };

  let pair = entry.get("latlng")?.as_array()?;
  match pair.as_slice() {
    [lat, lon, ..] => Some(LatLon::new(lat.as_f64()?, lon.as_f64()?)),
    _ => None,
  }
}
