use serde::Serialize;
use std::collections::BTreeMap;

use crate::extract::stats::ExtractionStats;

/// One extracted record: resolved fields plus its rank in the category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// 1-based position among accepted records; 0 until the driver stamps it
    pub rank: u32,

    /// Field name -> extracted value, only for fields that resolved
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub(crate) fn unranked(fields: BTreeMap<String, String>) -> Self {
        Self { rank: 0, fields }
    }

    /// Gets a field value by name
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns true if the field resolved
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The ordered records of one category plus its diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRecords {
    pub category: String,
    pub records: Vec<Record>,

    #[serde(skip)]
    pub stats: ExtractionStats,
}

/// Output of one extraction call, categories in specification order
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub source_type: String,
    pub categories: Vec<CategoryRecords>,
}

impl Extraction {
    /// Records of a category, ranked ascending
    ///
    /// Returns None only if the specification has no such category; a
    /// category that found nothing yields an empty slice.
    pub fn records(&self, category: &str) -> Option<&[Record]> {
        self.find(category).map(|c| c.records.as_slice())
    }

    /// Diagnostics of a category
    pub fn stats(&self, category: &str) -> Option<&ExtractionStats> {
        self.find(category).map(|c| &c.stats)
    }

    /// Diagnostics summed over every category
    pub fn total_stats(&self) -> ExtractionStats {
        self.categories
            .iter()
            .fold(ExtractionStats::default(), |mut total, c| {
                total.merge(&c.stats);
                total
            })
    }

    /// Total number of records over every category
    pub fn record_count(&self) -> usize {
        self.categories.iter().map(|c| c.records.len()).sum()
    }

    /// Converts into a category -> records map
    pub fn into_map(self) -> BTreeMap<String, Vec<Record>> {
        self.categories
            .into_iter()
            .map(|c| (c.category, c.records))
            .collect()
    }

    fn find(&self, category: &str) -> Option<&CategoryRecords> {
        self.categories.iter().find(|c| c.category == category)
    }
}
