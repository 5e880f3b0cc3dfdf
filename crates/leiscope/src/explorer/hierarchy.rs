use std::sync::Arc;

use super::Explorer;
use crate::error::LeiscopeError;
use crate::geo::{GeoProjection, ProjectionMemo};
use crate::task::Outcome;
use crate::types::HierarchyNode;
use crate::view::{HierarchyMode, View};

/// Geo data for the hierarchy currently shown, anchored on one LEI.
#[derive(Debug, Clone)]
pub struct HierarchyMap {
  pub lei: String,
  pub nodes: Arc<Vec<HierarchyNode>>,
  memo: ProjectionMemo,
}

impl HierarchyMap {
  pub fn projection(&self) -> Option<Arc<GeoProjection>> {
    self.memo.get(&self.nodes)
  }
}

impl Explorer {
  /// Hierarchy text for the `index`-th search result, looked up by search term.
  pub async fn hierarchy_for_result(&self, index: usize) {
    let (selected, term) = {
      let state = self.lock();
      (state.results.get(index).cloned(), state.search_term.clone())
    };
    let Some(selected) = selected else {
      self.set_error(format!("No search result at position {}", index + 1));
      return;
    };

    self.update(|s| s.error = None);
    let pacing = self.options.pacing;

    let mut run = self.runner.begin();
    let result = async {
      run.checkpoint(format!("Selected: {}", selected.entity), 10)?;
      run.pace("Looking up LEI code...", 20, pacing).await?;
      run.pace("Fetching ultimate parent...", 40, pacing).await?;
      let text = run
        .step("Building corporate hierarchy...", 60, self.service.hierarchy_by_name(&term, index + 1))
        .await?;
      run.checkpoint("Processing subsidiaries...", 80)?;
      run.checkpoint("Hierarchy complete", 100)?;
      Ok::<_, LeiscopeError>(text)
    }
    .await;

    let anchor = selected.has_record().then(|| selected.lei.clone());
    self.apply_hierarchy(run.finish(result), anchor);
  }

  /// Hierarchy text rooted at the ultimate parent of the loaded company.
  pub async fn hierarchy_from_company(&self) {
    let company = self.lock().company.clone();
    let Some(company) = company else {
      return;
    };

    self.update(|s| s.error = None);
    let pacing = self.options.pacing;

    let mut run = self.runner.begin();
    let result = async {
      run.checkpoint(format!("Building hierarchy for: {}", company.legal_name), 10)?;
      run.pace("Fetching ultimate parent...", 30, pacing).await?;
      let text = run
        .step("Building corporate hierarchy...", 60, self.service.hierarchy_by_lei(&company.lei))
        .await?;
      run.checkpoint("Processing subsidiaries...", 80)?;
      run.checkpoint("Hierarchy complete", 100)?;
      Ok::<_, LeiscopeError>(text)
    }
    .await;

    self.apply_hierarchy(run.finish(result), Some(company.lei.clone()));
  }

  fn apply_hierarchy(&self, outcome: Outcome<Option<String>>, anchor: Option<String>) {
    match outcome {
      Outcome::Applied(Some(text)) => self.update(|s| {
        if s.hierarchy_lei != anchor {
          s.map = None;
        }
        s.hierarchy_text = Some(text);
        s.hierarchy_lei = anchor;
        s.view = View::Hierarchy(HierarchyMode::Tree);
      }),
      Outcome::Applied(None) => self.set_error("No hierarchy data received"),
      Outcome::Failed(message) => self.set_error(message),
      Outcome::Superseded => {}
    }
  }

  /// Switch the hierarchy view to the map, fetching and projecting geo data
  /// the first time for the current anchor.
  pub async fn show_map(&self) {
    let (view, anchor, cached) = {
      let state = self.lock();
      let cached = state.map.clone().filter(|m| Some(&m.lei) == state.hierarchy_lei.as_ref());
      (state.view, state.hierarchy_lei.clone(), cached)
    };

    if !view.is_hierarchy() {
      return;
    }
    let Some(lei) = anchor else {
      self.set_error("No entity available to place on the map");
      return;
    };

    if cached.as_ref().is_some_and(|m| m.projection().is_some()) {
      self.update(|s| s.view = View::Hierarchy(HierarchyMode::Map));
      return;
    }

    self.load_map(lei, cached.map(|m| m.nodes)).await;
  }

  async fn load_map(&self, lei: String, known_nodes: Option<Arc<Vec<HierarchyNode>>>) {
    self.update(|s| s.error = None);
    let mut memo = self.lock().map.as_ref().map(|m| m.memo.clone()).unwrap_or_default();

    let mut run = self.runner.begin();
    let result = async {
      let nodes = match known_nodes {
        Some(nodes) => nodes,
        None => {
          let fetched = run
            .step("Fetching subsidiaries with locations...", 30, self.service.hierarchy_geo(&lei))
            .await?;
          Arc::new(fetched)
        }
      };
      let resolver = &self.resolver;
      let memo = &mut memo;
      let nodes_ref = &nodes;
      run
        .step("Resolving coordinates...", 70, async move {
          Ok::<_, LeiscopeError>(memo.get_or_project(nodes_ref, resolver).await)
        })
        .await?;
      run.checkpoint("Map ready", 100)?;
      Ok::<_, LeiscopeError>(nodes)
    }
    .await;

    match run.finish(result) {
      // Anything that moves the anchor supersedes this run first.
      Outcome::Applied(nodes) => self.update(|s| {
        s.map = Some(HierarchyMap { lei, nodes, memo });
        s.view = s.view.with_mode(HierarchyMode::Map);
      }),
      Outcome::Failed(message) => self.set_error(message),
      Outcome::Superseded => {}
    }
  }

  pub fn show_tree(&self) {
    self.update(|s| s.view = s.view.with_mode(HierarchyMode::Tree));
  }

  pub async fn toggle_hierarchy_mode(&self) {
    let mode = self.lock().view.hierarchy_mode();
    match mode {
      Some(HierarchyMode::Tree) => self.show_map().await,
      Some(HierarchyMode::Map) => self.show_tree(),
      None => {}
    }
  }
}
