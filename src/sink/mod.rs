//! Hand-off to the persistence side
//!
//! This module covers everything after extraction:
//! - The page and batch types exchanged with collaborators
//! - The `RecordSink` trait persistence backends implement
//! - An in-memory sink
//! - `harvest`, which extracts one captured page into a sink

mod memory;
mod traits;

pub use memory::MemorySink;
pub use traits::{CapturedPage, HarvestBatch, RecordRow, RecordSink, SinkError, SinkResult};

use crate::extract::{extract_with_spec, Extractor};
use crate::SiftError;

/// Per-category record counts of one harvested page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub source_type: String,
    pub query: String,
    pub counts: Vec<(String, usize)>,
}

impl HarvestSummary {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Extracts one captured page and stores the result
///
/// # Arguments
///
/// * `extractor` - Extractor holding the specification for the page's source type
/// * `page` - The captured page
/// * `sink` - Where the batch goes
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - Records were extracted and stored
/// * `Err(SiftError)` - Unknown source type, unparseable page, or sink failure
pub fn harvest(
    extractor: &Extractor,
    page: &CapturedPage,
    sink: &mut dyn RecordSink,
) -> Result<HarvestSummary, SiftError> {
    let spec = extractor.spec_for(&page.source_type)?;

    let extraction = extract_with_spec(&page.markup, spec)?;

    let summary = HarvestSummary {
        source_type: page.source_type.clone(),
        query: page.query.clone(),
        counts: extraction
            .categories
            .iter()
            .map(|c| (c.category.clone(), c.records.len()))
            .collect(),
    };

    let batch = HarvestBatch {
        query: page.query.clone(),
        captured_at: page.captured_at,
        source_type: page.source_type.clone(),
        spec_fingerprint: spec.fingerprint.clone(),
        extraction,
    };
    sink.store(&batch)?;

    tracing::info!(
        "Harvested {} records for '{}' from {}",
        summary.total(),
        page.query,
        page.source_type
    );

    Ok(summary)
}
