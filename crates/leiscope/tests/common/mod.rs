#![allow(dead_code)]

use async_trait::async_trait;
use leiscope::geo::{CoordinateCache, CoordinateResolver, Geocoder, LatLon};
use leiscope::types::{
  BulkRow, CompanyRecord, HealthStatus, HierarchyNode, PairingSubmission, PersistedPairing, SaveAck,
  SearchResult,
};
use leiscope::{EntityService, Explorer, ExplorerOptions, LeiscopeError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory entity backend for testing
#[derive(Default)]
pub struct FakeService {
  pub search_results: HashMap<String, Vec<SearchResult>>,
  /// Artificial latency per search term
  pub search_delays: HashMap<String, Duration>,
  pub companies: HashMap<String, CompanyRecord>,
  pub hierarchy_texts: HashMap<String, String>,
  pub geo_nodes: HashMap<String, Vec<HierarchyNode>>,
  /// Artificial latency per geo lookup LEI
  pub geo_delays: HashMap<String, Duration>,
  pub bulk_rows: HashMap<String, Vec<SearchResult>>,
  /// What `list_pairings` answers with, regardless of what was saved
  pub stored_pairings: Vec<PersistedPairing>,
  pub saved: Mutex<Vec<PairingSubmission>>,
  pub should_fail: bool,
  pub call_count: AtomicUsize,
}

impl FakeService {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_test_data() -> Self {
    let mut fake = Self::new();

    fake.search_results.insert(
      "Apple".to_string(),
      vec![hit("Apple Inc.", "HWUPKR0MPOU8FGXBT394", 0.93), hit("Apple Bank for Savings", "L2", 0.61)],
    );
    fake.search_results.insert("Acme".to_string(), vec![hit("Acme Holdings", "ACME", 0.88)]);

    fake.companies.insert("HWUPKR0MPOU8FGXBT394".to_string(), company("HWUPKR0MPOU8FGXBT394", "Apple Inc."));
    fake.companies.insert("ACME".to_string(), company("ACME", "Acme Holdings"));

    fake.hierarchy_texts.insert("ACME".to_string(), "Acme Holdings\n  └─ Acme Ireland".to_string());
    fake.geo_nodes.insert(
      "ACME".to_string(),
      vec![node("ACME", None, "US"), node("ACME-IE", Some("ACME"), "IE")],
    );

    fake.bulk_rows.insert("Apple".to_string(), vec![hit("Apple Inc.", "HWUPKR0MPOU8FGXBT394", 0.93)]);
    fake.bulk_rows.insert(
      "Microsoft".to_string(),
      vec![hit("Microsoft Corporation", "INR2EJN1ERAN0W5ZP974", 0.95), hit("Microsoft Ireland", "L4", 0.7)],
    );

    fake
  }

  pub fn calls(&self) -> usize {
    self.call_count.load(Ordering::SeqCst)
  }

  fn record_call(&self) -> Result<()> {
    self.call_count.fetch_add(1, Ordering::SeqCst);
    if self.should_fail {
      return Err(LeiscopeError::Connection { message: "backend offline".to_string() });
    }
    Ok(())
  }
}

#[async_trait]
impl EntityService for FakeService {
  async fn search(&self, name: &str, top_k: usize) -> Result<Vec<SearchResult>> {
    self.record_call()?;
    if let Some(delay) = self.search_delays.get(name) {
      tokio::time::sleep(*delay).await;
    }
    let mut results = self.search_results.get(name).cloned().unwrap_or_default();
    results.truncate(top_k);
    Ok(results)
  }

  async fn company_details(&self, lei: &str) -> Result<Option<CompanyRecord>> {
    self.record_call()?;
    Ok(self.companies.get(lei).cloned())
  }

  async fn hierarchy_by_name(&self, name: &str, match_index: usize) -> Result<Option<String>> {
    self.record_call()?;
    let lei = self
      .search_results
      .get(name)
      .and_then(|results| results.get(match_index.checked_sub(1)?))
      .map(|r| r.lei.clone());
    Ok(lei.and_then(|lei| self.hierarchy_texts.get(&lei).cloned()))
  }

  async fn hierarchy_by_lei(&self, lei: &str) -> Result<Option<String>> {
    self.record_call()?;
    Ok(self.hierarchy_texts.get(lei).cloned())
  }

  async fn hierarchy_geo(&self, lei: &str) -> Result<Vec<HierarchyNode>> {
    self.record_call()?;
    if let Some(delay) = self.geo_delays.get(lei) {
      tokio::time::sleep(*delay).await;
    }
    Ok(self.geo_nodes.get(lei).cloned().unwrap_or_default())
  }

  async fn bulk_search(&self, targets: &[String], top_k: usize) -> Result<Vec<BulkRow>> {
    self.record_call()?;
    Ok(
      targets
        .iter()
        .map(|target| {
          let mut matches = self.bulk_rows.get(target).cloned().unwrap_or_default();
          matches.truncate(top_k);
          BulkRow { target: target.clone(), matches }
        })
        .collect(),
    )
  }

  async fn save_pairings(&self, pairings: &[PairingSubmission]) -> Result<SaveAck> {
    self.record_call()?;
    self.saved.lock().unwrap().extend(pairings.iter().cloned());
    Ok(SaveAck { status: Some("saved".to_string()), count: Some(pairings.len()), error: None })
  }

  async fn list_pairings(&self) -> Result<Vec<PersistedPairing>> {
    self.record_call()?;
    Ok(self.stored_pairings.clone())
  }

  async fn health(&self) -> Result<HealthStatus> {
    self.record_call()?;
    Ok(HealthStatus { status: "ok".to_string(), message: "fake backend".to_string() })
  }
}

/// Geocoder that counts lookups and knows a fixed set of codes
#[derive(Default)]
pub struct CountingGeocoder {
  pub known: HashMap<String, LatLon>,
  pub lookups: AtomicUsize,
}

impl CountingGeocoder {
  pub fn with(codes: &[(&str, LatLon)]) -> Self {
    Self {
      known: codes.iter().map(|(code, pos)| (code.to_string(), *pos)).collect(),
      lookups: AtomicUsize::new(0),
    }
  }

  pub fn lookups(&self) -> usize {
    self.lookups.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
  async fn lookup(&self, code: &str) -> Result<LatLon> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    self.known.get(code).copied().ok_or_else(|| LeiscopeError::service(format!("unknown code {code}")))
  }
}

pub fn hit(entity: &str, lei: &str, score: f64) -> SearchResult {
  SearchResult { entity: entity.to_string(), lei: lei.to_string(), score: Some(score) }
}

pub fn company(lei: &str, name: &str) -> CompanyRecord {
  CompanyRecord { lei: lei.to_string(), legal_name: name.to_string(), ..Default::default() }
}

pub fn node(lei: &str, parent: Option<&str>, country: &str) -> HierarchyNode {
  HierarchyNode {
    lei: lei.to_string(),
    name: lei.to_string(),
    parent_lei: parent.map(str::to_string),
    country: country.to_string(),
    external_id: None,
  }
}

pub fn resolver(geocoder: Arc<CountingGeocoder>) -> CoordinateResolver {
  CoordinateResolver::new(Arc::new(CoordinateCache::new()), geocoder)
}

pub fn explorer(service: Arc<FakeService>) -> Explorer {
  let geocoder = Arc::new(CountingGeocoder::default());
  Explorer::new(service, resolver(geocoder), ExplorerOptions { top_k: 5, pacing: Duration::ZERO })
}
