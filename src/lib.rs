//! Serp-Sift: rule-driven record extraction for search result pages
//!
//! This crate turns captured result-page markup into ranked records (organic
//! listings, text ads, ...) using declarative per-source selector
//! specifications. Page acquisition and durable storage stay outside the
//! crate; see [`sink`] for the interfaces those collaborators plug into.

pub mod document;
pub mod extract;
pub mod sink;
pub mod spec;

use thiserror::Error;

/// Main error type for Serp-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Document parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Specification error: {0}")]
    Specification(#[from] SpecificationError),

    #[error("No specification registered for source type '{source_type}'")]
    UnknownSourceType { source_type: String },

    #[error("Invalid extraction state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: extract::DriverState,
        to: extract::DriverState,
    },

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),
}

/// Raw markup could not be tokenized into any tree at all
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Markup is not valid UTF-8 (valid up to byte {valid_up_to})")]
    Encoding { valid_up_to: usize },
}

/// Selector specification errors, raised at load time only
#[derive(Debug, Error)]
pub enum SpecificationError {
    #[error("Failed to read specification file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector '{selector}' in {location}: {message}")]
    InvalidSelector {
        location: String,
        selector: String,
        message: String,
    },

    #[error("Duplicate source type: {0}")]
    DuplicateSourceType(String),
}

/// Result type alias for Serp-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for specification loading
pub type SpecResult<T> = std::result::Result<T, SpecificationError>;

// Re-export commonly used types
pub use document::Document;
pub use extract::{extract_with_spec, Extraction, ExtractionStats, Extractor, Record};
pub use spec::{AcceptancePolicy, ExtractionMode, FieldRule, SelectorSpec, SpecRegistry};
