//! Extraction diagnostics
//!
//! Records never say why a field is missing. These counters keep the
//! distinction between absent and ambiguous matches for observability.

use crate::extract::resolver::FieldOutcome;

/// Counters for one category (or a sum over categories)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Elements matched by the scope selector
    pub candidates: u64,

    /// Candidates that became ranked records
    pub accepted: u64,

    /// Candidates dropped by the acceptance policy
    pub rejected: u64,

    /// Field rules that produced a value
    pub fields_resolved: u64,

    /// Field rules whose selector matched nothing
    pub fields_absent: u64,

    /// Field rules whose selector matched more than once
    pub fields_ambiguous: u64,

    /// Attribute rules whose single match lacked the attribute
    pub attributes_missing: u64,
}

impl ExtractionStats {
    /// Counts one field resolution
    pub fn record_field(&mut self, outcome: &FieldOutcome) {
        match outcome {
            FieldOutcome::Resolved(_) => self.fields_resolved += 1,
            FieldOutcome::Absent => self.fields_absent += 1,
            FieldOutcome::Ambiguous => self.fields_ambiguous += 1,
            FieldOutcome::MissingAttribute => self.attributes_missing += 1,
        }
    }

    /// Adds another set of counters into this one
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.candidates += other.candidates;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.fields_resolved += other.fields_resolved;
        self.fields_absent += other.fields_absent;
        self.fields_ambiguous += other.fields_ambiguous;
        self.attributes_missing += other.attributes_missing;
    }

    /// Field rules that did not produce a value, for any reason
    pub fn fields_unresolved(&self) -> u64 {
        self.fields_absent + self.fields_ambiguous + self.attributes_missing
    }
}
