use super::Explorer;
use crate::bulk::{parse_targets, BULK_TOP_K, MAX_TARGETS};
use crate::error::LeiscopeError;
use crate::task::Outcome;
use crate::types::EntityMatch;

impl Explorer {
  /// Parse a comma/newline separated list and resolve every name at once.
  pub async fn bulk_search(&self, raw: &str) {
    let targets = parse_targets(raw);
    self.run_bulk_search(&targets).await;
  }

  /// Resolve at most [`MAX_TARGETS`] names; the rest are dropped.
  pub async fn run_bulk_search(&self, targets: &[String]) {
    if targets.is_empty() {
      return;
    }
    let targets = &targets[..targets.len().min(MAX_TARGETS)];

    self.update(|s| {
      s.reset_for_search();
      s.bulk.clear_results();
    });

    let mut run = self.runner.begin();
    let result = async {
      let rows = run
        .step("Running bulk search...", 30, self.service.bulk_search(targets, BULK_TOP_K))
        .await?;
      run.checkpoint("Bulk search complete", 100)?;
      Ok::<_, LeiscopeError>(rows)
    }
    .await;

    match run.finish(result) {
      Outcome::Applied(rows) => self.update(|s| s.bulk.load_rows(rows)),
      Outcome::Failed(message) => self.set_error(message),
      Outcome::Superseded => {}
    }
  }

  pub fn select_match(&self, target: &str, selected: EntityMatch) {
    self.update(|s| s.bulk.select_match(target, selected));
  }

  /// Pick the `index`-th candidate in `target`'s row. False if there is none.
  pub fn select_match_at(&self, target: &str, index: usize) -> bool {
    self.update(|s| s.bulk.select_match_at(target, index))
  }

  /// Persist every current selection, then adopt the store's list.
  pub async fn save_pairings(&self) {
    let submissions = self.lock().bulk.submissions();

    let mut run = self.runner.begin();
    let result = async {
      let ack = run.step("Saving pairings...", 50, self.service.save_pairings(&submissions)).await?;
      tracing::debug!(count = ?ack.count, status = ?ack.status, "pairings saved");
      let pairings = run.step("Refreshing pairings...", 80, self.service.list_pairings()).await?;
      run.checkpoint("Pairings saved", 100)?;
      Ok::<_, LeiscopeError>(pairings)
    }
    .await;

    match run.finish(result) {
      Outcome::Applied(pairings) => self.update(|s| s.bulk.replace_pairings(pairings)),
      Outcome::Failed(message) => self.set_error(format!("Error saving pairings: {message}")),
      Outcome::Superseded => {}
    }
  }

  /// Fetch the persisted pairing list without saving anything.
  pub async fn load_pairings(&self) {
    let mut run = self.runner.begin();
    let result = async {
      let pairings = run.step("Loading pairings...", 50, self.service.list_pairings()).await?;
      run.checkpoint("Pairings loaded", 100)?;
      Ok::<_, LeiscopeError>(pairings)
    }
    .await;

    match run.finish(result) {
      Outcome::Applied(pairings) => self.update(|s| s.bulk.replace_pairings(pairings)),
      Outcome::Failed(message) => self.set_error(message),
      Outcome::Superseded => {}
    }
  }

  /// Open the registry record behind a saved pairing.
  pub async fn select_pairing(&self, lei: &str) {
    let lei = lei.trim();
    if lei.is_empty() {
      return;
    }

    self.update(|s| s.bulk.set_selected_pairing(lei));
    self.open_company(lei).await;
  }
}
