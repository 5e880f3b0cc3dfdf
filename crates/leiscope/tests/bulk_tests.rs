mod common;

use common::{explorer, hit, FakeService};
use leiscope::types::PersistedPairing;
use leiscope::view::View;
use std::sync::Arc;

#[tokio::test]
async fn test_bulk_search_seeds_first_match() {
  let explorer = explorer(Arc::new(FakeService::with_test_data()));

  explorer.bulk_search("Apple, Microsoft,, Nowhere Ltd").await;

  let state = explorer.snapshot();
  let targets: Vec<_> = state.bulk.rows().iter().map(|r| r.target.as_str()).collect();
  assert_eq!(targets, vec!["Apple", "Microsoft", "Nowhere Ltd"]);
  assert_eq!(state.bulk.selection("Microsoft").unwrap().lei, "INR2EJN1ERAN0W5ZP974");
  assert!(state.bulk.selection("Nowhere Ltd").is_none());
  assert_eq!(state.bulk.selection_count(), 2);
}

#[tokio::test]
async fn test_blank_bulk_input_makes_no_call() {
  let service = Arc::new(FakeService::with_test_data());
  let explorer = explorer(service.clone());

  explorer.bulk_search(" ,\n ").await;

  assert_eq!(service.calls(), 0);
  assert!(explorer.snapshot().bulk.rows().is_empty());
}

#[tokio::test]
async fn test_bulk_request_is_capped_at_ten_targets() {
  let explorer = explorer(Arc::new(FakeService::with_test_data()));
  let raw = (1..=12).map(|i| format!("Name {i}")).collect::<Vec<_>>().join("\n");

  explorer.bulk_search(&raw).await;

  let state = explorer.snapshot();
  assert_eq!(state.bulk.rows().len(), 10);
  assert_eq!(state.bulk.rows()[9].target, "Name 10");
}

#[tokio::test]
async fn test_saved_list_comes_from_server() {
  let mut fake = FakeService::with_test_data();
  fake.stored_pairings = vec![PersistedPairing {
    target: Some("Legacy".to_string()),
    selected: hit("Legacy Corp", "LEGACY", 0.8),
  }];
  let service = Arc::new(fake);
  let explorer = explorer(service.clone());

  explorer.bulk_search("Apple, Microsoft").await;
  assert!(explorer.select_match_at("Microsoft", 1));
  explorer.save_pairings().await;

  let submitted = service.saved.lock().unwrap().clone();
  assert_eq!(submitted.len(), 2);
  assert_eq!(submitted[0].target, "Apple");
  assert_eq!(submitted[1].selected.lei, "L4");

  let state = explorer.snapshot();
  assert_eq!(state.bulk.pairings().len(), 1);
  assert_eq!(state.bulk.pairings()[0].lei(), "LEGACY");
}

#[tokio::test]
async fn test_save_failure_message() {
  let mut fake = FakeService::with_test_data();
  fake.should_fail = true;
  let explorer = explorer(Arc::new(fake));

  explorer.save_pairings().await;

  assert_eq!(
    explorer.snapshot().error.as_deref(),
    Some("Error saving pairings: Connection error: backend offline")
  );
}

#[tokio::test]
async fn test_select_pairing_opens_company() {
  let explorer = explorer(Arc::new(FakeService::with_test_data()));

  explorer.search("Acme").await;
  explorer.select_pairing("HWUPKR0MPOU8FGXBT394").await;

  let state = explorer.snapshot();
  assert_eq!(state.view, View::Company);
  assert!(state.results.is_empty());
  assert_eq!(state.bulk.selected_pairing(), Some("HWUPKR0MPOU8FGXBT394"));
}

#[tokio::test]
async fn test_new_bulk_search_keeps_pairings() {
  let mut fake = FakeService::with_test_data();
  fake.stored_pairings = vec![PersistedPairing { target: None, selected: hit("Apple Inc.", "A", 0.9) }];
  let explorer = explorer(Arc::new(fake));

  explorer.load_pairings().await;
  explorer.bulk_search("Microsoft").await;

  assert_eq!(explorer.snapshot().bulk.pairings().len(), 1);
}
