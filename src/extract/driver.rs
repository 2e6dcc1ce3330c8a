use std::fmt;

use crate::document::Document;
use crate::extract::assembler::assemble_with_stats;
use crate::extract::record::{CategoryRecords, Extraction};
use crate::extract::stats::ExtractionStats;
use crate::spec::{CategorySpec, SelectorSpec, SpecRegistry};
use crate::{SiftError, SpecificationError};

/// Phases of one extraction call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    /// Nothing loaded yet
    Idle,

    /// Document parsed, no category visited
    DocumentLoaded,

    /// The category at this index (specification order) has been extracted
    PerCategory(usize),

    /// Every category extracted, results available
    Done,
}

impl DriverState {
    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: DriverState) -> bool {
        match (*self, next) {
            (Self::Idle, Self::DocumentLoaded) => true,
            (Self::DocumentLoaded, Self::PerCategory(0)) => true,
            (Self::DocumentLoaded, Self::Done) => true,
            (Self::PerCategory(i), Self::PerCategory(j)) => j == i + 1,
            (Self::PerCategory(_), Self::Done) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::DocumentLoaded => write!(f, "document_loaded"),
            Self::PerCategory(i) => write!(f, "per_category({})", i),
            Self::Done => write!(f, "done"),
        }
    }
}

/// One extraction call over one document with one specification
///
/// The run owns its document; it is dropped as soon as the last category
/// has been extracted.
#[derive(Debug)]
pub struct ExtractionRun<'s> {
    spec: &'s SelectorSpec,
    state: DriverState,
    document: Option<Document>,
    results: Vec<CategoryRecords>,
}

impl<'s> ExtractionRun<'s> {
    pub fn new(spec: &'s SelectorSpec) -> Self {
        Self {
            spec,
            state: DriverState::Idle,
            document: None,
            results: Vec::with_capacity(spec.categories.len()),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Parses raw markup and loads it
    pub fn load(&mut self, raw: &str) -> Result<(), SiftError> {
        self.ensure_transition(DriverState::DocumentLoaded)?;
        let document = Document::parse(raw)?;
        self.load_document(document)
    }

    /// Loads an already parsed document
    pub fn load_document(&mut self, document: Document) -> Result<(), SiftError> {
        self.transition(DriverState::DocumentLoaded)?;
        self.document = Some(document);
        Ok(())
    }

    /// Extracts the next category
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A category was extracted
    /// * `Ok(false)` - The run is done, nothing left to extract
    /// * `Err(SiftError::InvalidTransition)` - No document loaded yet
    pub fn step(&mut self) -> Result<bool, SiftError> {
        let next = match self.state {
            DriverState::Idle => {
                return Err(SiftError::InvalidTransition {
                    from: DriverState::Idle,
                    to: DriverState::PerCategory(0),
                })
            }
            DriverState::DocumentLoaded => 0,
            DriverState::PerCategory(i) => i + 1,
            DriverState::Done => return Ok(false),
        };

        let Some(category) = self.spec.categories.get(next) else {
            self.transition(DriverState::Done)?;
            self.document = None;
            return Ok(false);
        };

        self.transition(DriverState::PerCategory(next))?;
        if let Some(document) = &self.document {
            self.results.push(extract_category(document, category));
        }
        Ok(true)
    }

    /// Returns the results of a finished run
    pub fn finish(self) -> Result<Extraction, SiftError> {
        if !self.state.is_terminal() {
            return Err(SiftError::InvalidTransition {
                from: self.state,
                to: DriverState::Done,
            });
        }

        Ok(Extraction {
            source_type: self.spec.source_type.clone(),
            categories: self.results,
        })
    }

    /// Loads `raw`, extracts every category and returns the results
    pub fn run(mut self, raw: &str) -> Result<Extraction, SiftError> {
        self.load(raw)?;
        self.run_loaded()
    }

    /// Extracts every category of an already parsed document
    pub fn run_document(mut self, document: Document) -> Result<Extraction, SiftError> {
        self.load_document(document)?;
        self.run_loaded()
    }

    fn run_loaded(mut self) -> Result<Extraction, SiftError> {
        while self.step()? {}
        self.finish()
    }

    fn ensure_transition(&self, next: DriverState) -> Result<(), SiftError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(SiftError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn transition(&mut self, next: DriverState) -> Result<(), SiftError> {
        self.ensure_transition(next)?;
        tracing::trace!(
            "Extraction '{}': {} -> {}",
            self.spec.source_type,
            self.state,
            next
        );
        self.state = next;
        Ok(())
    }
}

/// Extracts one category from a document
///
/// Candidates are visited in document order. Accepted records are ranked
/// 1, 2, 3, ...; rejected candidates consume no rank.
pub fn extract_category(document: &Document, category: &CategorySpec) -> CategoryRecords {
    let candidates = document.select(&category.scope);
    let mut stats = ExtractionStats {
        candidates: candidates.len() as u64,
        ..Default::default()
    };
    let mut records = Vec::new();

    for (position, candidate) in candidates.into_iter().enumerate() {
        match assemble_with_stats(candidate, category, &mut stats) {
            Some(mut record) => {
                record.rank = records.len() as u32 + 1;
                records.push(record);
            }
            None => {
                tracing::trace!(
                    "Rejected candidate #{} in category '{}'",
                    position + 1,
                    category.name
                );
            }
        }
    }

    stats.accepted = records.len() as u64;
    stats.rejected = stats.candidates - stats.accepted;

    tracing::debug!(
        "Category '{}' ({}): {} candidates, {} accepted, {} rejected",
        category.name,
        category.scope_source,
        stats.candidates,
        stats.accepted,
        stats.rejected
    );

    CategoryRecords {
        category: category.name.clone(),
        records,
        stats,
    }
}

/// Extracts every category of `spec` from raw markup
pub fn extract_with_spec(raw: &str, spec: &SelectorSpec) -> Result<Extraction, SiftError> {
    ExtractionRun::new(spec).run(raw)
}

/// Extraction entry point over a registry of specifications
///
/// The extractor is immutable once built and can be shared between threads;
/// every call parses its own document.
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: SpecRegistry,
}

impl Extractor {
    pub fn new(registry: SpecRegistry) -> Self {
        Self { registry }
    }

    /// Creates an extractor over the built-in engine specifications
    pub fn builtin() -> Result<Self, SpecificationError> {
        Ok(Self::new(SpecRegistry::builtin()?))
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    /// Extracts every category for `source_type` from raw markup
    ///
    /// # Arguments
    ///
    /// * `raw` - Complete markup of one result page
    /// * `source_type` - Which specification to apply (e.g., "google")
    ///
    /// # Returns
    ///
    /// * `Ok(Extraction)` - Ranked records per category (possibly all empty)
    /// * `Err(SiftError::UnknownSourceType)` - No specification for `source_type`
    ///
    /// # Example
    ///
    /// ```
    /// use serp_sift::Extractor;
    ///
    /// let extractor = Extractor::builtin().unwrap();
    /// let extraction = extractor.extract("", "google").unwrap();
    /// assert!(extraction.records("organic").unwrap().is_empty());
    /// ```
    pub fn extract(&self, raw: &str, source_type: &str) -> Result<Extraction, SiftError> {
        extract_with_spec(raw, self.spec_for(source_type)?)
    }

    /// Like [`Extractor::extract`], for markup that has not been decoded yet
    ///
    /// Bytes that are not valid UTF-8 fail with `SiftError::Parse` and yield
    /// no partial results.
    pub fn extract_bytes(&self, raw: &[u8], source_type: &str) -> Result<Extraction, SiftError> {
        let spec = self.spec_for(source_type)?;
        let document = Document::parse_bytes(raw)?;
        ExtractionRun::new(spec).run_document(document)
    }

    pub(crate) fn spec_for(&self, source_type: &str) -> Result<&SelectorSpec, SiftError> {
        self.registry
            .get(source_type)
            .ok_or_else(|| SiftError::UnknownSourceType {
                source_type: source_type.to_string(),
            })
    }
}
