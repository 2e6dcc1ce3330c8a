use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::sink::traits::{HarvestBatch, RecordRow, RecordSink, SinkError, SinkResult};

type RowKey = (String, String, DateTime<Utc>, String, u32);

/// In-memory sink keyed by (source_type, query, captured_at, category, rank)
///
/// A batch whose rows collide with stored rows is rejected as a whole.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<RecordRow>,
    keys: HashSet<RowKey>,
    batches: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored rows, in insertion order
    pub fn rows(&self) -> &[RecordRow] {
        &self.rows
    }

    /// Stored rows for one query and category, by source type, capture time and rank
    pub fn rows_for(&self, query: &str, category: &str) -> Vec<&RecordRow> {
        let mut rows: Vec<&RecordRow> = self
            .rows
            .iter()
            .filter(|r| r.query == query && r.category == category)
            .collect();
        rows.sort_by(|a, b| {
            (&a.source_type, a.captured_at, a.rank).cmp(&(&b.source_type, b.captured_at, b.rank))
        });
        rows
    }

    /// Number of batches stored
    pub fn batch_count(&self) -> usize {
        self.batches
    }
}

impl RecordSink for MemorySink {
    fn store(&mut self, batch: &HarvestBatch) -> SinkResult<()> {
        let rows = batch.rows();

        for row in &rows {
            if self.keys.contains(&row_key(row)) {
                return Err(SinkError::Duplicate {
                    source_type: row.source_type.clone(),
                    query: row.query.clone(),
                    captured_at: row.captured_at,
                    category: row.category.clone(),
                    rank: row.rank,
                });
            }
        }

        for row in rows {
            self.keys.insert(row_key(&row));
            self.rows.push(row);
        }
        self.batches += 1;

        Ok(())
    }
}

fn row_key(row: &RecordRow) -> RowKey {
    (
        row.source_type.clone(),
        row.query.clone(),
        row.captured_at,
        row.category.clone(),
        row.rank,
    )
}
