//! Selector specification module
//!
//! A specification tells the extraction engine, for one source type, where
//! each record starts and how to pull every field out of it. Specifications
//! come from the built-in engine set or from TOML files, and are validated
//! and compiled once at load time.
//!
//! # Example
//!
//! ```
//! use serp_sift::spec::{parse_spec, ExtractionMode};
//!
//! let spec = parse_spec(r#"
//! source-type = "example"
//!
//! [[category]]
//! name = "organic"
//! scope = "li.result"
//!
//! [[category.field]]
//! name = "link"
//! selector = "a"
//! mode = { attribute = "href" }
//! "#).unwrap();
//!
//! let organic = spec.category("organic").unwrap();
//! assert_eq!(organic.fields[0].mode, ExtractionMode::Attribute("href".into()));
//! ```

pub mod builtin;
mod parser;
mod registry;
mod types;
mod validation;

// Re-export types
pub use types::{
    AcceptancePolicy, CategoryDefinition, CategorySpec, ExtractionMode, FieldDefinition,
    FieldRule, SelectorSpec, SpecDefinition,
};

// Re-export loading functions
pub use parser::{
    compile_spec, compute_fingerprint, compute_spec_hash, load_spec, load_spec_with_hash,
    parse_spec,
};
pub use registry::SpecRegistry;
