//! Data model shared by the service client, the engines and the display layer
//!
//! Shapes follow the JSON the entity backend emits. Absent fields fall back to
//! defaults so a partially populated registry record still decodes.

use serde::{Deserialize, Serialize};

/// Identifier the backend reports when a suggested name has no LEI record.
pub const LEI_NOT_FOUND: &str = "LEI_NOT_FOUND";

// Search
// ======

/// One ranked candidate returned by a single-name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
  pub entity: String,
  pub lei: String,
  #[serde(default)]
  pub score: Option<f64>,
}

impl SearchResult {
  /// Whether the identifier points at a real registry record.
  pub fn has_record(&self) -> bool {
    !self.lei.is_empty() && self.lei != LEI_NOT_FOUND
  }

  /// Score clamped into [0, 1], if the backend reported one.
  pub fn bounded_score(&self) -> Option<f64> {
    self.score.filter(|s| s.is_finite()).map(|s| s.clamp(0.0, 1.0))
  }
}

/// Bulk candidates carry the same shape as single search results.
pub type EntityMatch = SearchResult;

// Company record
// ==============

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
  pub lei: String,
  #[serde(default)]
  pub legal_name: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub legal_form: String,
  #[serde(default)]
  pub creation_date: String,
  #[serde(default)]
  pub registration: Registration,
  #[serde(default)]
  pub addresses: Addresses,
  #[serde(default)]
  pub lei_registration: LeiRegistration,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Registration {
  #[serde(default)]
  pub country: String,
  #[serde(default)]
  pub date: String,
  #[serde(default)]
  pub status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Addresses {
  #[serde(default)]
  pub legal: Address,
  #[serde(default)]
  pub headquarters: Address,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub first_address_line: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub region: String,
  #[serde(default)]
  pub country: String,
  #[serde(default)]
  pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeiRegistration {
  #[serde(default)]
  pub initial_date: String,
  #[serde(default)]
  pub last_update: String,
  #[serde(default)]
  pub next_renewal: String,
  #[serde(default)]
  pub managing_lou: String,
}

// Hierarchy
// =========

/// One entity of a flattened ownership hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
  pub lei: String,
  #[serde(default)]
  pub name: String,
  /// Absent for the root, or when the parent lies outside the fetched set.
  #[serde(default)]
  pub parent_lei: Option<String>,
  #[serde(default)]
  pub country: String,
  /// Secondary identifier from an external registry (e.g. a BIC or OpenCorporates id).
  #[serde(default)]
  pub external_id: Option<String>,
}

impl HierarchyNode {
  pub fn is_parentless(&self) -> bool {
    self.parent_lei.as_deref().map_or(true, |p| p.trim().is_empty())
  }
}

// Bulk search and pairings
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRow {
  pub target: String,
  #[serde(default)]
  pub matches: Vec<EntityMatch>,
}

/// A selection submitted for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingSubmission {
  pub target: String,
  pub selected: EntityMatch,
}

/// A pairing as the persistence store reports it back.
///
/// The store may answer with the bare selected match, so the target is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPairing {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target: Option<String>,
  #[serde(flatten)]
  pub selected: EntityMatch,
}

impl PersistedPairing {
  pub fn lei(&self) -> &str {
    &self.selected.lei
  }

  pub fn entity(&self) -> &str {
    &self.selected.entity
  }
}

// Response envelopes
// ==================

/// `{"data": ..., "error": ..., "message": ...}` as sent by the data endpoints.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
  pub data: Option<T>,
  #[serde(default)]
  pub error: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

/// `{"text": ..., "error": ...}` as sent by the hierarchy text endpoints.
#[derive(Debug, Deserialize)]
pub struct TextEnvelope {
  #[serde(default)]
  pub text: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkSearchRequest<'a> {
  pub targets: &'a [String],
  pub top: usize,
}

#[derive(Debug, Serialize)]
pub struct SavePairingsRequest<'a> {
  pub pairings: &'a [PairingSubmission],
}

/// Acknowledgement of a pairing save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveAck {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub count: Option<usize>,
  #[serde(default)]
  pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub message: String,
}
