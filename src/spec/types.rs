use scraper::Selector;
use serde::Deserialize;
use std::fmt;

/// How a matched element is turned into a field value
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// Rendered visible text, whitespace-normalized
    #[default]
    Text,

    /// Literal value of the named attribute
    Attribute(String),

    /// Serialized markup of all child nodes, tags included
    RawInnerContent,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Attribute(name) => write!(f, "attribute:{}", name),
            Self::RawInnerContent => write!(f, "raw-inner-content"),
        }
    }
}

/// When an assembled candidate counts as a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptancePolicy {
    /// Accept as soon as any declared field resolved
    #[default]
    AnyField,

    /// Accept only if every listed field resolved
    RequireAll(Vec<String>),
}

impl fmt::Display for AcceptancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyField => write!(f, "any-field"),
            Self::RequireAll(fields) => write!(f, "require-all:{}", fields.join(",")),
        }
    }
}

/// Field rule as written in a specification file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDefinition {
    /// Output field name (e.g., "title")
    pub name: String,

    /// CSS selector evaluated inside the record scope
    pub selector: String,

    /// Extraction mode, defaults to visible text
    #[serde(default)]
    pub mode: ExtractionMode,
}

/// Record category as written in a specification file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryDefinition {
    /// Category name (e.g., "organic", "ads")
    pub name: String,

    /// CSS selector locating each record's root element
    pub scope: String,

    /// Acceptance policy for assembled candidates
    #[serde(default)]
    pub acceptance: AcceptancePolicy,

    /// Field rules, in declaration order
    #[serde(rename = "field", default)]
    pub fields: Vec<FieldDefinition>,
}

/// A whole per-source specification before selector compilation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecDefinition {
    /// Source type this specification describes (e.g., "google")
    #[serde(rename = "source-type")]
    pub source_type: String,

    /// Record categories, in declaration order
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryDefinition>,
}

/// One compiled field rule
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub selector_source: String,
    pub selector: Selector,
    pub mode: ExtractionMode,
}

/// One compiled record category
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub name: String,
    pub scope_source: String,
    pub scope: Selector,
    pub fields: Vec<FieldRule>,
    pub acceptance: AcceptancePolicy,
}

/// A compiled, read-only selector specification for one source type
#[derive(Debug, Clone)]
pub struct SelectorSpec {
    pub source_type: String,
    pub categories: Vec<CategorySpec>,

    /// Hex SHA-256 over the canonical rule listing
    pub fingerprint: String,
}

impl SelectorSpec {
    /// Looks up a category by name
    pub fn category(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}
