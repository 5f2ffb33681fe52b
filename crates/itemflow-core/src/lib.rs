//! Itemflow Core - a run-to-fixpoint pipeline for typed items.
//!
//! An item (encoded image, JSON text, ZIP archive, ...) is loaded from a
//! location and handed to an ordered list of actions. Each round the first
//! action that claims the current item transforms it into a new item; the
//! pipeline stops when no action claims the item.
//!
//! # Architecture
//!
//! ```text
//! Location → Load → Item₀ → [first applicable action]* → final Item
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use itemflow_core::{standard_actions, Config, Location, Pipeline};
//!
//! fn main() -> itemflow_core::Result<()> {
//!     let config = Config::load()?;
//!     let mut pipeline = Pipeline::from_config(Location::parse("file://test.json"), &config);
//!     for action in standard_actions(&config) {
//!         pipeline.add_action(action);
//!     }
//!
//!     let item = pipeline.execute()?;
//!     println!("Final kind: {}", item.kind());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod action;
pub mod config;
pub mod error;
pub mod item;
pub mod loader;
pub mod location;
pub mod pipeline;
pub mod sniff;

// Re-exports for convenient access
pub use action::{standard_actions, Action, Process};
pub use config::Config;
pub use error::{
    ActionError, ConfigError, ItemflowError, LoadError, PipelineError, PipelineResult, Result,
};
pub use item::{classify, Item, ItemSummary, Kind, Payload};
pub use loader::{FixtureLoader, Loader, SchemeLoader};
pub use location::{Location, Scheme};
pub use pipeline::{Pipeline, PipelineState, RunReport, RunSummary, StepRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
