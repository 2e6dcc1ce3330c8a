//! Field resolution within one record scope
//!
//! A field resolves only when its selector matches exactly one element
//! inside the scope. Zero matches and multiple matches both leave the field
//! unresolved; the resolver never picks among candidates.

use scraper::ElementRef;

use crate::document::{select_within, visible_text};
use crate::spec::{ExtractionMode, FieldRule};

/// Result of applying one field rule to one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// Exactly one match, value extracted
    Resolved(String),

    /// The selector matched nothing
    Absent,

    /// The selector matched more than one element
    Ambiguous,

    /// Exactly one match, but it lacks the requested attribute
    MissingAttribute,
}

impl FieldOutcome {
    /// Returns the value, discarding the reason it is missing
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Absent | Self::Ambiguous | Self::MissingAttribute => None,
        }
    }
}

/// Resolves a field rule within `scope`
///
/// # Arguments
///
/// * `scope` - Root element of the record being assembled
/// * `rule` - The compiled field rule
///
/// # Returns
///
/// * `Some(String)` - The selector matched exactly once and the mode produced a value
/// * `None` - No match, several matches, or a missing attribute
pub fn resolve(scope: ElementRef<'_>, rule: &FieldRule) -> Option<String> {
    resolve_outcome(scope, rule).into_value()
}

/// Resolves a field rule within `scope`, keeping the reason for a miss
pub fn resolve_outcome(scope: ElementRef<'_>, rule: &FieldRule) -> FieldOutcome {
    let matches = select_within(scope, &rule.selector);

    let element = match matches.as_slice() {
        [single] => *single,
        [] => return FieldOutcome::Absent,
        _ => {
            tracing::trace!(
                "Field '{}' matched {} elements for '{}', leaving it unresolved",
                rule.name,
                matches.len(),
                rule.selector_source
            );
            return FieldOutcome::Ambiguous;
        }
    };

    match extract_value(element, &rule.mode) {
        Some(value) => FieldOutcome::Resolved(value),
        None => FieldOutcome::MissingAttribute,
    }
}

/// Turns a single matched element into a value according to `mode`
fn extract_value(element: ElementRef<'_>, mode: &ExtractionMode) -> Option<String> {
    match mode {
        ExtractionMode::Text => Some(visible_text(element)),
        ExtractionMode::Attribute(name) => element.value().attr(name).map(String::from),
        ExtractionMode::RawInnerContent => Some(element.inner_html()),
    }
}
