//! Record assembly and acceptance

use scraper::ElementRef;
use std::collections::BTreeMap;

use crate::extract::record::Record;
use crate::extract::resolver::resolve_outcome;
use crate::extract::stats::ExtractionStats;
use crate::spec::{AcceptancePolicy, CategorySpec};

/// Assembles one candidate element into an unranked record
///
/// Every field rule of the category is resolved inside `element`. The
/// candidate is rejected (None) when nothing resolved, or when the
/// category's acceptance policy names a field that did not resolve.
pub fn assemble(element: ElementRef<'_>, category: &CategorySpec) -> Option<Record> {
    assemble_with_stats(element, category, &mut ExtractionStats::default())
}

/// Same as [`assemble`], counting field outcomes into `stats`
///
/// Only field counters are touched; candidate and acceptance counters
/// belong to the driver.
pub fn assemble_with_stats(
    element: ElementRef<'_>,
    category: &CategorySpec,
    stats: &mut ExtractionStats,
) -> Option<Record> {
    let mut fields = BTreeMap::new();

    for rule in &category.fields {
        let outcome = resolve_outcome(element, rule);
        stats.record_field(&outcome);

        if let Some(value) = outcome.into_value() {
            fields.insert(rule.name.clone(), value);
        }
    }

    if !is_acceptable(&fields, &category.acceptance) {
        return None;
    }

    Some(Record::unranked(fields))
}

/// Applies an acceptance policy to a resolved field map
pub fn is_acceptable(fields: &BTreeMap<String, String>, policy: &AcceptancePolicy) -> bool {
    if fields.is_empty() {
        return false;
    }

    match policy {
        AcceptancePolicy::AnyField => true,
        AcceptancePolicy::RequireAll(required) => {
            required.iter().all(|name| fields.contains_key(name))
        }
    }
}
