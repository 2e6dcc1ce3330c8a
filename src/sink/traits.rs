//! Collaborator-facing types and the sink trait
//!
//! Acquisition hands the engine a [`CapturedPage`]; the engine hands a
//! [`HarvestBatch`] to whatever implements [`RecordSink`].

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::extract::Extraction;

/// Errors that can occur while handing records to a sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to store batch: {0}")]
    Storage(String),

    #[error("Duplicate {source_type} row for query '{query}' at {captured_at}: {category} #{rank}")]
    Duplicate {
        source_type: String,
        query: String,
        captured_at: DateTime<Utc>,
        category: String,
        rank: u32,
    },
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// One result page as delivered by the acquisition side
#[derive(Debug, Clone)]
pub struct CapturedPage {
    /// Query term that produced the page
    pub query: String,

    /// When the page was captured
    pub captured_at: DateTime<Utc>,

    /// Which specification applies (e.g., "google")
    pub source_type: String,

    /// Complete page markup
    pub markup: String,
}

impl CapturedPage {
    pub fn new(
        query: impl Into<String>,
        source_type: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            captured_at: Utc::now(),
            source_type: source_type.into(),
            markup: markup.into(),
        }
    }

    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = captured_at;
        self
    }
}

/// Extraction output of one page together with its provenance
#[derive(Debug, Clone)]
pub struct HarvestBatch {
    pub query: String,
    pub captured_at: DateTime<Utc>,
    pub source_type: String,

    /// Fingerprint of the specification revision that produced the records
    pub spec_fingerprint: String,

    pub extraction: Extraction,
}

/// One storable row: a record flattened with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub query: String,
    pub captured_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub source_type: String,
    pub category: String,
    pub rank: u32,
    pub fields: BTreeMap<String, String>,
}

impl HarvestBatch {
    /// Flattens the batch into rows, categories in specification order and
    /// records by rank
    pub fn rows(&self) -> Vec<RecordRow> {
        let date = self.captured_at.date_naive();

        self.extraction
            .categories
            .iter()
            .flat_map(|category| {
                category.records.iter().map(move |record| RecordRow {
                    query: self.query.clone(),
                    captured_at: self.captured_at,
                    date,
                    source_type: self.source_type.clone(),
                    category: category.category.clone(),
                    rank: record.rank,
                    fields: record.fields.clone(),
                })
            })
            .collect()
    }
}

/// Trait for persistence collaborators
///
/// Implementations own durability and keying; the engine only guarantees
/// that (query, captured_at, category, rank) is unique within a batch.
pub trait RecordSink {
    /// Stores one harvested batch
    fn store(&mut self, batch: &HarvestBatch) -> SinkResult<()>;
}
