//! Phased task runner with progress reporting
//!
//! Every remote-backed action runs as a [`Run`]: an ordered sequence of
//! labelled phases, each announced with a `(message, percent)` update before it
//! executes. Runs are fenced by a sequence number assigned at dispatch.
//! Starting a run cancels the previous one, and a run only produces an
//! [`Outcome::Applied`] if it is still the latest when it resolves.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::error::{LeiscopeError, Result};

/// Snapshot of the progress line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
  /// True exactly while a phase of the latest run is executing
  pub loading: bool,
  pub message: String,
  pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
  Started { seq: u64 },
  Phase { seq: u64, message: String, percent: u8 },
  Cleared { seq: u64 },
}

/// How a run ended, from the point of view of shared state.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  /// The run is still the latest and succeeded: apply `T`.
  Applied(T),
  /// The run is still the latest and failed: show this message.
  Failed(String),
  /// A newer run started; discard everything.
  Superseded,
}

pub struct TaskRunner {
  latest: AtomicU64,
  active: Mutex<Option<CancellationToken>>,
  progress: watch::Sender<Progress>,
  listeners: Mutex<Vec<mpsc::UnboundedSender<ProgressEvent>>>,
}

impl Default for TaskRunner {
  fn default() -> Self {
    Self::new()
  }
}

impl TaskRunner {
  pub fn new() -> Self {
    let (progress, _) = watch::channel(Progress::default());
    Self {
      latest: AtomicU64::new(0),
      active: Mutex::new(None),
      progress,
      listeners: Mutex::new(Vec::new()),
    }
  }

  /// Dispatch a new run, superseding whatever run is in flight.
  pub fn begin(&self) -> Run<'_> {
    let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
    let token = CancellationToken::new();

    let previous = self.active.lock().unwrap_or_else(PoisonError::into_inner).replace(token.clone());
    if let Some(previous) = previous {
      previous.cancel();
    }

    self.progress.send_replace(Progress { loading: true, message: String::new(), percent: 0 });
    self.emit(ProgressEvent::Started { seq });
    tracing::debug!(run = seq, "run started");

    Run { runner: self, seq, token, percent: 0 }
  }

  /// Fence off the run in flight without dispatching a new one. Its result
  /// will resolve as [`Outcome::Superseded`].
  pub fn supersede(&self) {
    let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
    let previous = self.active.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(previous) = previous {
      previous.cancel();
    }
    if self.is_loading() {
      self.clear(seq);
    }
  }

  /// Current progress snapshot.
  pub fn progress(&self) -> Progress {
    self.progress.borrow().clone()
  }

  pub fn is_loading(&self) -> bool {
    self.progress.borrow().loading
  }

  /// Watch the progress snapshot.
  pub fn subscribe(&self) -> watch::Receiver<Progress> {
    self.progress.subscribe()
  }

  /// Receive every progress event from now on.
  pub fn events(&self) -> mpsc::UnboundedReceiver<ProgressEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    self.listeners.lock().unwrap_or_else(PoisonError::into_inner).push(tx);
    rx
  }

  pub fn latest_seq(&self) -> u64 {
    self.latest.load(Ordering::SeqCst)
  }

  fn emit(&self, event: ProgressEvent) {
    let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
    listeners.retain(|tx| tx.send(event.clone()).is_ok());
  }

  fn clear(&self, seq: u64) {
    self.progress.send_replace(Progress::default());
    self.emit(ProgressEvent::Cleared { seq });
    tracing::debug!(run = seq, "run finished");
  }
}

/// One dispatched unit of work. Dropping it clears progress if it is still
/// the latest run.
pub struct Run<'a> {
  runner: &'a TaskRunner,
  seq: u64,
  token: CancellationToken,
  percent: u8,
}

impl Run<'_> {
  pub fn seq(&self) -> u64 {
    self.seq
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.token
  }

  pub fn is_current(&self) -> bool {
    !self.token.is_cancelled() && self.runner.latest_seq() == self.seq
  }

  /// Announce a phase that has no work of its own.
  pub fn checkpoint(&mut self, message: impl Into<String>, percent: u8) -> Result<()> {
    if !self.is_current() {
      return Err(LeiscopeError::Superseded);
    }
    self.report(message.into(), percent);
    Ok(())
  }

  /// Announce a phase, then drive `work` unless the run is superseded first.
  pub async fn step<T, F>(&mut self, message: impl Into<String>, percent: u8, work: F) -> Result<T>
  where
    F: Future<Output = Result<T>>,
  {
    self.checkpoint(message, percent)?;
    tokio::select! {
      biased;
      _ = self.token.cancelled() => Err(LeiscopeError::Superseded),
      result = work => result,
    }
  }

  /// Fixed pacing phase.
  pub async fn pace(&mut self, message: impl Into<String>, percent: u8, delay: Duration) -> Result<()> {
    self
      .step(message, percent, async move {
        if !delay.is_zero() {
          tokio::time::sleep(delay).await;
        }
        Ok::<_, LeiscopeError>(())
      })
      .await
  }

  /// Resolve the run against shared state.
  pub fn finish<T>(self, result: Result<T>) -> Outcome<T> {
    if !self.is_current() {
      tracing::debug!(run = self.seq, "discarding superseded run");
      return Outcome::Superseded;
    }
    match result {
      Ok(value) => Outcome::Applied(value),
      Err(e) if e.is_superseded() => Outcome::Superseded,
      Err(e) => {
        tracing::warn!(run = self.seq, error = %e, "run failed");
        Outcome::Failed(e.to_string())
      }
    }
  }

  fn report(&mut self, message: String, percent: u8) {
    self.percent = self.percent.max(percent.min(100));
    tracing::debug!(run = self.seq, percent = self.percent, "{message}");
    self.runner.progress.send_replace(Progress {
      loading: true,
      message: message.clone(),
      percent: self.percent,
    });
    self.runner.emit(ProgressEvent::Phase { seq: self.seq, message, percent: self.percent });
  }
}

impl Drop for Run<'_> {
  fn drop(&mut self) {
    if self.runner.latest_seq() == self.seq {
      self.runner.clear(self.seq);
    }
  }
}
