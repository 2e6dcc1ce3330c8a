use crate::spec::types::{AcceptancePolicy, CategoryDefinition, ExtractionMode, SpecDefinition};
use crate::SpecificationError;
use scraper::Selector;
use std::collections::HashSet;

/// Validates the structure of a specification definition
///
/// Selector syntax is checked separately by [`compile_selector`] during
/// compilation.
pub fn validate(spec: &SpecDefinition) -> Result<(), SpecificationError> {
    validate_name("source-type", &spec.source_type)?;

    if spec.categories.is_empty() {
        return Err(SpecificationError::Validation(format!(
            "Specification '{}' must declare at least one category",
            spec.source_type
        )));
    }

    let mut seen = HashSet::new();
    for category in &spec.categories {
        validate_category(&spec.source_type, category)?;

        if !seen.insert(category.name.as_str()) {
            return Err(SpecificationError::Validation(format!(
                "Duplicate category '{}' in specification '{}'",
                category.name, spec.source_type
            )));
        }
    }

    Ok(())
}

/// Validates one category definition
fn validate_category(
    source_type: &str,
    category: &CategoryDefinition,
) -> Result<(), SpecificationError> {
    validate_name("category name", &category.name)?;

    if category.fields.is_empty() {
        return Err(SpecificationError::Validation(format!(
            "Category '{}.{}' must declare at least one field",
            source_type, category.name
        )));
    }

    let mut declared = HashSet::new();
    for field in &category.fields {
        validate_name("field name", &field.name)?;

        if !declared.insert(field.name.as_str()) {
            return Err(SpecificationError::Validation(format!(
                "Duplicate field '{}' in category '{}.{}'",
                field.name, source_type, category.name
            )));
        }

        if let ExtractionMode::Attribute(attr) = &field.mode {
            if attr.trim().is_empty() {
                return Err(SpecificationError::Validation(format!(
                    "Field '{}.{}.{}' uses attribute mode with an empty attribute name",
                    source_type, category.name, field.name
                )));
            }
        }
    }

    if let AcceptancePolicy::RequireAll(required) = &category.acceptance {
        if required.is_empty() {
            return Err(SpecificationError::Validation(format!(
                "Category '{}.{}' has an empty require-all list",
                source_type, category.name
            )));
        }

        for name in required {
            if !declared.contains(name.as_str()) {
                return Err(SpecificationError::Validation(format!(
                    "Category '{}.{}' requires undeclared field '{}'",
                    source_type, category.name, name
                )));
            }
        }
    }

    Ok(())
}

/// Validates an identifier: non-empty, no surrounding whitespace
fn validate_name(kind: &str, name: &str) -> Result<(), SpecificationError> {
    if name.is_empty() {
        return Err(SpecificationError::Validation(format!(
            "{} cannot be empty",
            kind
        )));
    }

    if name.trim() != name {
        return Err(SpecificationError::Validation(format!(
            "{} '{}' has leading or trailing whitespace",
            kind, name
        )));
    }

    Ok(())
}

/// Compiles a CSS selector, reporting where it was declared on failure
pub fn compile_selector(location: &str, source: &str) -> Result<Selector, SpecificationError> {
    if source.trim().is_empty() {
        return Err(SpecificationError::InvalidSelector {
            location: location.to_string(),
            selector: source.to_string(),
            message: "selector is empty".to_string(),
        });
    }

    Selector::parse(source).map_err(|e| SpecificationError::InvalidSelector {
        location: location.to_string(),
        selector: source.to_string(),
        message: format!("{:?}", e),
    })
}
