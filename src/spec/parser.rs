use crate::spec::types::{CategorySpec, FieldRule, SelectorSpec, SpecDefinition};
use crate::spec::validation::{compile_selector, validate};
use crate::SpecificationError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, validates and compiles a specification file
///
/// # Arguments
///
/// * `path` - Path to the TOML specification file
///
/// # Returns
///
/// * `Ok(SelectorSpec)` - Compiled specification, ready for extraction
/// * `Err(SpecificationError)` - Failed to read, parse, validate or compile
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use serp_sift::spec::load_spec;
///
/// let spec = load_spec(Path::new("specs/duckduckgo.toml")).unwrap();
/// println!("Categories: {:?}", spec.category_names());
/// ```
pub fn load_spec(path: &Path) -> Result<SelectorSpec, SpecificationError> {
    let content = std::fs::read_to_string(path)?;
    parse_spec(&content)
}

/// Parses, validates and compiles a specification from TOML text
pub fn parse_spec(content: &str) -> Result<SelectorSpec, SpecificationError> {
    let definition: SpecDefinition = toml::from_str(content)?;
    compile_spec(&definition)
}

/// Validates a definition and compiles every selector in it
///
/// Any invalid selector fails the whole specification, so a broken rule is
/// reported before a single document is processed.
pub fn compile_spec(definition: &SpecDefinition) -> Result<SelectorSpec, SpecificationError> {
    validate(definition)?;

    let mut categories = Vec::with_capacity(definition.categories.len());
    for category in &definition.categories {
        let location = format!("{}.{}", definition.source_type, category.name);
        let scope = compile_selector(&format!("{} scope", location), &category.scope)?;

        let mut fields = Vec::with_capacity(category.fields.len());
        for field in &category.fields {
            let selector =
                compile_selector(&format!("{}.{}", location, field.name), &field.selector)?;
            fields.push(FieldRule {
                name: field.name.clone(),
                selector_source: field.selector.clone(),
                selector,
                mode: field.mode.clone(),
            });
        }

        categories.push(CategorySpec {
            name: category.name.clone(),
            scope_source: category.scope.clone(),
            scope,
            fields,
            acceptance: category.acceptance.clone(),
        });
    }

    Ok(SelectorSpec {
        source_type: definition.source_type.clone(),
        categories,
        fingerprint: compute_fingerprint(definition),
    })
}

/// Computes a SHA-256 fingerprint of a definition's rules
///
/// The canonical listing covers source type, categories, scopes, policies
/// and field rules in declaration order, so formatting changes in a file do
/// not change the fingerprint but any rule change does.
pub fn compute_fingerprint(definition: &SpecDefinition) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("source-type={}\n", definition.source_type).as_bytes());

    for category in &definition.categories {
        hasher.update(
            format!(
                "category={}\nscope={}\nacceptance={}\n",
                category.name, category.scope, category.acceptance
            )
            .as_bytes(),
        );
        for field in &category.fields {
            hasher.update(
                format!("field={}\nselector={}\nmode={}\n", field.name, field.selector, field.mode)
                    .as_bytes(),
            );
        }
    }

    hex::encode(hasher.finalize())
}

/// Computes a SHA-256 hash of a specification file's raw content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(SpecificationError)` - Failed to read the file
pub fn compute_spec_hash(path: &Path) -> Result<String, SpecificationError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a specification and returns both the compiled spec and its file hash
pub fn load_spec_with_hash(path: &Path) -> Result<(SelectorSpec, String), SpecificationError> {
    let spec = load_spec(path)?;
    let hash = compute_spec_hash(path)?;
    Ok((spec, hash))
}
