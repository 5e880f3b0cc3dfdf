//! Bulk name resolution state
//!
//! Parsing of multi-name input, per-target candidate selection, and the
//! pairing list as last reported by the persistence store. Remote calls live
//! in the explorer; everything here is plain state.

use std::collections::{HashMap, HashSet};

use crate::types::{BulkRow, EntityMatch, PairingSubmission, PersistedPairing};

/// Most names accepted per bulk request. Extra names are dropped, not rejected.
pub const MAX_TARGETS: usize = 10;

/// Candidates requested per name in a bulk request.
pub const BULK_TOP_K: usize = 5;

/// Split on commas or newlines, trim, drop empties, keep the first ten.
pub fn parse_targets(raw: &str) -> Vec<String> {
  raw
    .split([',', '\n'])
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .take(MAX_TARGETS)
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkState {
  rows: Vec<BulkRow>,
  selections: HashMap<String, EntityMatch>,
  pairings: Vec<PersistedPairing>,
  selected_pairing: Option<String>,
}

impl BulkState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn rows(&self) -> &[BulkRow] {
    &self.rows
  }

  pub fn pairings(&self) -> &[PersistedPairing] {
    &self.pairings
  }

  pub fn selected_pairing(&self) -> Option<&str> {
    self.selected_pairing.as_deref()
  }

  pub fn selection(&self, target: &str) -> Option<&EntityMatch> {
    self.selections.get(target)
  }

  pub fn selection_count(&self) -> usize {
    self.selections.len()
  }

  /// Drop rows and selections ahead of a new request. Pairings are kept.
  pub fn clear_results(&mut self) {
    self.rows.clear();
    self.selections.clear();
  }

  /// Store a bulk response and seed each target's selection with its first match.
  pub fn load_rows(&mut self, mut rows: Vec<BulkRow>) {
    for row in &mut rows {
      row.matches.truncate(BULK_TOP_K);
    }
    self.selections = seed_selections(&rows);
    self.rows = rows;
  }

  pub fn select_match(&mut self, target: &str, selected: EntityMatch) {
    self.selections.insert(target.to_string(), selected);
  }

  /// Select the `index`-th candidate of `target`'s own row.
  ///
  /// Returns false when the target or the index is unknown.
  pub fn select_match_at(&mut self, target: &str, index: usize) -> bool {
    let candidate = self
      .rows
      .iter()
      .find(|row| row.target == target)
      .and_then(|row| row.matches.get(index))
      .cloned();

    match candidate {
      Some(candidate) => {
        self.select_match(target, candidate);
        true
      }
      None => false,
    }
  }

  pub fn is_selected(&self, target: &str, candidate: &EntityMatch) -> bool {
    self.selections.get(target).is_some_and(|s| s.lei == candidate.lei)
  }

  /// The full selection map as submissions: row order first, then any
  /// selection whose target has no row, by target name.
  pub fn submissions(&self) -> Vec<PairingSubmission> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(self.selections.len());

    for row in &self.rows {
      if !seen.insert(row.target.as_str()) {
        continue;
      }
      if let Some(selected) = self.selections.get(&row.target) {
        out.push(PairingSubmission { target: row.target.clone(), selected: selected.clone() });
      }
    }

    let mut orphans: Vec<_> =
      self.selections.iter().filter(|(target, _)| !seen.contains(target.as_str())).collect();
    orphans.sort_by(|a, b| a.0.cmp(b.0));
    out.extend(
      orphans
        .into_iter()
        .map(|(target, selected)| PairingSubmission { target: target.clone(), selected: selected.clone() }),
    );

    out
  }

  /// Adopt the store's list as the authoritative pairing state.
  pub fn replace_pairings(&mut self, pairings: Vec<PersistedPairing>) {
    self.pairings = pairings;
  }

  pub fn set_selected_pairing(&mut self, lei: &str) {
    self.selected_pairing = Some(lei.to_string());
  }
}

fn seed_selections(rows: &[BulkRow]) -> HashMap<String, EntityMatch> {
  let mut selections = HashMap::new();
  for row in rows {
    if let Some(first) = row.matches.first() {
      selections.entry(row.target.clone()).or_insert_with(|| first.clone());
    }
  }
  selections
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(entity: &str, lei: &str) -> EntityMatch {
    EntityMatch { entity: entity.to_string(), lei: lei.to_string(), score: Some(0.8) }
  }

  fn row(target: &str, matches: Vec<EntityMatch>) -> BulkRow {
    BulkRow { target: target.to_string(), matches }
  }

  #[test]
  fn test_parse_drops_empty_tokens() {
    assert_eq!(parse_targets("Apple, Microsoft,, 3M"), vec!["Apple", "Microsoft", "3M"]);
  }

  #[test]
  fn test_parse_mixed_separators() {
    assert_eq!(parse_targets(" Siemens\nBASF ,\n\n Bayer "), vec!["Siemens", "BASF", "Bayer"]);
  }

  #[test]
  fn test_parse_truncates_to_ten_in_order() {
    let raw = (1..=14).map(|i| format!("name{i}")).collect::<Vec<_>>().join(",");
    let parsed = parse_targets(&raw);
    assert_eq!(parsed.len(), MAX_TARGETS);
    assert_eq!(parsed.first().unwrap(), "name1");
    assert_eq!(parsed.last().unwrap(), "name10");
  }

  #[test]
  fn test_parse_is_idempotent_on_clean_input() {
    let once = parse_targets("a, b\nc");
    assert_eq!(parse_targets(&once.join(",")), once);
  }

  #[test]
  fn test_parse_blank_input() {
    assert!(parse_targets(" ,\n , ").is_empty());
  }

  #[test]
  fn test_seeding_skips_targets_without_matches() {
    let mut state = BulkState::new();
    state.load_rows(vec![
      row("Apple", vec![candidate("Apple Inc.", "L1"), candidate("Apple Bank", "L2")]),
      row("Nowhere Ltd", vec![]),
    ]);

    assert_eq!(state.rows().len(), 2);
    assert_eq!(state.selection("Apple").unwrap().lei, "L1");
    assert!(state.selection("Nowhere Ltd").is_none());
    assert_eq!(state.selection_count(), 1);
  }

  #[test]
  fn test_load_truncates_candidates() {
    let matches = (0..8).map(|i| candidate("X", &format!("L{i}"))).collect();
    let mut state = BulkState::new();
    state.load_rows(vec![row("X", matches)]);
    assert_eq!(state.rows()[0].matches.len(), BULK_TOP_K);
  }

  #[test]
  fn test_select_match_at_stays_within_row() {
    let mut state = BulkState::new();
    state.load_rows(vec![
      row("Apple", vec![candidate("Apple Inc.", "L1"), candidate("Apple Bank", "L2")]),
      row("3M", vec![candidate("3M Company", "L3")]),
    ]);

    assert!(state.select_match_at("Apple", 1));
    assert!(!state.select_match_at("3M", 4));
    assert!(!state.select_match_at("Unknown", 0));
    assert_eq!(state.selection("Apple").unwrap().lei, "L2");
    assert_eq!(state.selection("3M").unwrap().lei, "L3");
  }

  #[test]
  fn test_submissions_follow_row_order() {
    let mut state = BulkState::new();
    state.load_rows(vec![
      row("b", vec![candidate("B", "LB")]),
      row("a", vec![candidate("A", "LA")]),
      row("b", vec![candidate("B2", "LB2")]),
    ]);
    state.select_match("zeta", candidate("Z", "LZ"));

    let targets: Vec<_> = state.submissions().into_iter().map(|s| s.target).collect();
    assert_eq!(targets, vec!["b", "a", "zeta"]);
  }

  #[test]
  fn test_clear_results_keeps_pairings() {
    let mut state = BulkState::new();
    state.load_rows(vec![row("a", vec![candidate("A", "LA")])]);
    state.replace_pairings(vec![PersistedPairing { target: None, selected: candidate("A", "LA") }]);
    state.clear_results();
    assert!(state.rows().is_empty());
    assert_eq!(state.selection_count(), 0);
    assert_eq!(state.pairings().len(), 1);
  }
}
