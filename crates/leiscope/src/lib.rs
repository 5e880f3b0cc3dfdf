//! leiscope - Legal Entity Identifier lookup and ownership exploration
//!
//! A client for a local entity backend that ranks registry candidates for
//! informal company names, resolves names in bulk into durable pairings, and
//! projects ownership hierarchies onto a map.

pub mod bulk;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod explorer;
pub mod geo;
pub mod service;
pub mod task;
pub mod types;
pub mod view;

pub use config::Config;
pub use error::{LeiscopeError, Result};
pub use explorer::{Explorer, ExplorerOptions, ExplorerState};
pub use service::{EntityService, HttpEntityService};
