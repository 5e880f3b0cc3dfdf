//! User-level operations over the entity backend
//!
//! An [`Explorer`] owns the task runner, the coordinate resolver and all
//! presentation state. Each operation resets what it invalidates, dispatches a
//! run, and applies the result only if that run is still the latest one.

mod bulk;
mod hierarchy;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::bulk::BulkState;
use crate::config::Config;
use crate::error::{LeiscopeError, Result};
use crate::geo::{CoordinateCache, CoordinateResolver, HttpGeocoder};
use crate::service::{EntityService, HttpEntityService};
use crate::task::{Outcome, Progress, TaskRunner};
use crate::types::{CompanyRecord, SearchResult};
use crate::view::View;

pub use hierarchy::HierarchyMap;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
  pub view: View,
  /// Term of the last single search, reused for hierarchy-by-name lookups
  pub search_term: String,
  pub results: Vec<SearchResult>,
  pub company: Option<CompanyRecord>,
  pub hierarchy_text: Option<String>,
  /// LEI the current hierarchy is anchored on
  pub hierarchy_lei: Option<String>,
  pub map: Option<HierarchyMap>,
  pub error: Option<String>,
  pub bulk: BulkState,
}

impl ExplorerState {
  fn reset_hierarchy(&mut self) {
    self.hierarchy_text = None;
    self.hierarchy_lei = None;
    self.map = None;
  }

  /// What any new search invalidates.
  fn reset_for_search(&mut self) {
    self.reset_hierarchy();
    self.company = None;
    self.error = None;
    self.view = View::Search;
  }
}

#[derive(Debug, Clone)]
pub struct ExplorerOptions {
  pub top_k: usize,
  pub pacing: Duration,
}

impl Default for ExplorerOptions {
  fn default() -> Self {
    let config = Config::default();
    Self { top_k: config.top_k, pacing: config.pacing() }
  }
}

impl From<&Config> for ExplorerOptions {
  fn from(config: &Config) -> Self {
    Self { top_k: config.top_k, pacing: config.pacing() }
  }
}

pub struct Explorer {
  service: Arc<dyn EntityService>,
  resolver: CoordinateResolver,
  runner: TaskRunner,
  state: Mutex<ExplorerState>,
  options: ExplorerOptions,
}

impl Explorer {
  pub fn new(
    service: Arc<dyn EntityService>,
    resolver: CoordinateResolver,
    options: ExplorerOptions,
  ) -> Self {
    Self {
      service,
      resolver,
      runner: TaskRunner::new(),
      state: Mutex::new(ExplorerState::default()),
      options,
    }
  }

  /// HTTP backend and geocoder from configuration, with a fresh coordinate cache.
  pub fn from_config(config: &Config) -> Result<Self> {
    let service = Arc::new(HttpEntityService::new(config)?);
    let geocoder = Arc::new(HttpGeocoder::new(config)?);
    let resolver = CoordinateResolver::new(Arc::new(CoordinateCache::new()), geocoder);
    Ok(Self::new(service, resolver, ExplorerOptions::from(config)))
  }

  pub fn service(&self) -> &Arc<dyn EntityService> {
    &self.service
  }

  pub fn runner(&self) -> &TaskRunner {
    &self.runner
  }

  pub fn resolver(&self) -> &CoordinateResolver {
    &self.resolver
  }

  pub fn progress(&self) -> Progress {
    self.runner.progress()
  }

  pub fn is_loading(&self) -> bool {
    self.runner.is_loading()
  }

  pub fn snapshot(&self) -> ExplorerState {
    self.lock().clone()
  }

  // Held only between suspension points.
  fn lock(&self) -> MutexGuard<'_, ExplorerState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn update<R>(&self, f: impl FnOnce(&mut ExplorerState) -> R) -> R {
    f(&mut self.lock())
  }

  fn set_error(&self, message: impl Into<String>) {
    self.lock().error = Some(message.into());
  }

  /// Ranked single-name search.
  pub async fn search(&self, name: &str) {
    let term = name.trim();
    if term.is_empty() {
      return;
    }

    self.update(|s| {
      s.reset_for_search();
      s.search_term = term.to_string();
    });

    let mut run = self.runner.begin();
    let result = async {
      run.checkpoint(format!("Searching for \"{term}\"..."), 20)?;
      let results = run
        .step("Contacting GLEIF registry...", 40, self.service.search(term, self.options.top_k))
        .await?;
      run.pace("Processing semantic similarity scores...", 70, self.options.pacing).await?;
      run.checkpoint("Search completed", 100)?;
      Ok::<_, LeiscopeError>(results)
    }
    .await;

    match run.finish(result) {
      Outcome::Applied(results) => self.update(|s| {
        if results.is_empty() {
          s.error = Some(format!("No results found for {term}"));
        }
        s.results = results;
      }),
      Outcome::Failed(message) => self.update(|s| {
        s.results.clear();
        s.error = Some(message);
      }),
      Outcome::Superseded => {}
    }
  }

  /// Open the registry record of the `index`-th search result.
  pub async fn view_company(&self, index: usize) {
    let selected = self.lock().results.get(index).cloned();
    let Some(selected) = selected else {
      self.set_error(format!("No search result at position {}", index + 1));
      return;
    };

    if !selected.has_record() {
      self.set_error("LEI not found for this company");
      return;
    }

    self.load_company(&selected.lei, &selected.entity).await;
  }

  /// Open a registry record by LEI, dropping single-search and hierarchy state.
  pub async fn open_company(&self, lei: &str) {
    let lei = lei.trim();
    if lei.is_empty() {
      return;
    }

    self.update(|s| {
      s.search_term.clear();
      s.results.clear();
      s.reset_for_search();
    });

    self.load_company(lei, lei).await;
  }

  async fn load_company(&self, lei: &str, label: &str) {
    self.update(|s| s.error = None);

    let mut run = self.runner.begin();
    let result = async {
      run.checkpoint(format!("Loading details for: {label}"), 20)?;
      let record = run
        .step("Fetching company data from GLEIF...", 50, self.service.company_details(lei))
        .await?;
      run.checkpoint("Processing company information...", 80)?;
      run.checkpoint("Company details loaded", 100)?;
      Ok::<_, LeiscopeError>(record)
    }
    .await;

    match run.finish(result) {
      Outcome::Applied(Some(record)) => self.update(|s| {
        s.company = Some(record);
        s.view = View::Company;
      }),
      Outcome::Applied(None) => self.set_error("No company data received"),
      Outcome::Failed(message) => self.set_error(message),
      Outcome::Superseded => {}
    }
  }

  /// Back navigation, which also abandons any run in flight: hierarchy -> company (if loaded) else search; company -> search.
  pub fn back(&self) {
    self.runner.supersede();
    self.update(|s| {
      let target = s.view.back(s.company.is_some());
      if target == View::Search {
        s.company = None;
      }
      s.reset_hierarchy();
      s.error = None;
      s.view = target;
    });
  }

  /// Drop single-search results and everything derived from them.
  pub fn clear(&self) {
    self.runner.supersede();
    self.update(|s| {
      s.reset_for_search();
      s.results.clear();
      s.search_term.clear();
    });
  }
}
