//! Error types for the itemflow pipeline.
//!
//! Errors are organized by stage so a failure names where it happened: the
//! load step, a specific action, or the pipeline loop itself.

use std::path::PathBuf;
use thiserror::Error;

use crate::item::{Item, Kind};
use crate::location::Scheme;
use crate::pipeline::PipelineState;

/// Top-level error type for itemflow operations.
#[derive(Error, Debug)]
pub enum ItemflowError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline execution errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// The load step could not turn a location into an initial item.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No resolver exists for this scheme
    #[error("Unsupported scheme {scheme} for location '{location}'")]
    UnsupportedScheme { location: String, scheme: Scheme },

    /// The location does not name a usable path
    #[error("Invalid location '{location}': {reason}")]
    InvalidPath { location: String, reason: String },

    /// Resolved path does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Resolved path exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    TooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },
}

/// Failure raised by a concrete action's `process`.
#[derive(Error, Debug)]
pub enum ActionError {
    /// `process` was called on an item the action does not claim
    #[error("Item of kind {kind} is not accepted by this action")]
    Unsupported { kind: Kind },

    /// The payload variant does not match what the action transforms
    #[error("Expected {expected} payload, found {found}")]
    UnexpectedPayload {
        expected: &'static str,
        found: &'static str,
    },

    /// Image decoding failed
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    /// Image dimensions exceed limit
    #[error("Image too large: {width}x{height} > {max_dim}")]
    ImageTooLarge { width: u32, height: u32, max_dim: u32 },

    /// The archive could not be opened or read
    #[error("Archive error: {0}")]
    Archive(String),

    /// The archive holds no file entries
    #[error("Archive contains no file entries")]
    EmptyArchive,

    /// A decompressed entry exceeds the size limit
    #[error("Archive entry '{name}' too large ({size_mb}MB > {max_mb}MB)")]
    EntryTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// JSON text could not be parsed
    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Free-form failure, used by closure-backed actions
    #[error("{0}")]
    Failed(String),
}

/// Pipeline execution errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The load step failed; no action ran
    #[error("Failed to load '{location}': {source}")]
    Load {
        location: String,
        #[source]
        source: LoadError,
    },

    /// An action failed; the item it received is kept for inspection
    #[error(
        "Action '{action}' failed at step {step} on item '{classifier}': {source}",
        classifier = .item.classifier()
    )]
    Action {
        action: String,
        step: usize,
        item: Box<Item>,
        #[source]
        source: ActionError,
    },

    /// The configured step ceiling was reached while an action still applied
    #[error("Step limit of {limit} exceeded: '{action}' still claims item '{classifier}'")]
    StepLimitExceeded {
        limit: usize,
        action: String,
        classifier: String,
    },

    /// A pipeline runs exactly once
    #[error("Pipeline cannot execute from state {state:?}")]
    AlreadyExecuted { state: PipelineState },
}

/// Convenience type alias for itemflow results.
pub type Result<T> = std::result::Result<T, ItemflowError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
