//! Extraction engine
//!
//! This module turns a parsed document plus a selector specification into
//! ranked records:
//! - Field resolution with exactly-one cardinality
//! - Record assembly under a per-category acceptance policy
//! - The per-call driver that walks categories and assigns ranks

mod assembler;
mod driver;
mod record;
mod resolver;
mod stats;

pub use assembler::{assemble, assemble_with_stats, is_acceptable};
pub use driver::{extract_category, extract_with_spec, DriverState, ExtractionRun, Extractor};
pub use record::{CategoryRecords, Extraction, Record};
pub use resolver::{resolve, resolve_outcome, FieldOutcome};
pub use stats::ExtractionStats;
