use crate::spec::builtin::builtin_definitions;
use crate::spec::parser::{compile_spec, load_spec};
use crate::spec::types::SelectorSpec;
use crate::SpecificationError;
use std::collections::HashMap;
use std::path::Path;

/// Process-wide set of compiled specifications, keyed by source type
///
/// Built once at startup and only read afterwards, so it can be shared
/// across extraction threads without locking.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    specs: HashMap<String, SelectorSpec>,
}

impl SpecRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in engine specifications
    pub fn builtin() -> Result<Self, SpecificationError> {
        let mut registry = Self::new();
        for definition in builtin_definitions() {
            registry.register(compile_spec(&definition)?)?;
        }
        Ok(registry)
    }

    /// Adds a compiled specification
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Registered
    /// * `Err(SpecificationError::DuplicateSourceType)` - The source type is taken
    pub fn register(&mut self, spec: SelectorSpec) -> Result<(), SpecificationError> {
        if self.specs.contains_key(&spec.source_type) {
            return Err(SpecificationError::DuplicateSourceType(spec.source_type));
        }

        tracing::info!(
            "Registered specification '{}' ({} categories, fingerprint {})",
            spec.source_type,
            spec.categories.len(),
            spec.fingerprint.get(..12).unwrap_or(spec.fingerprint.as_str())
        );

        self.specs.insert(spec.source_type.clone(), spec);
        Ok(())
    }

    /// Loads and registers one TOML specification file
    ///
    /// Returns the registered source type.
    pub fn load_file(&mut self, path: &Path) -> Result<String, SpecificationError> {
        tracing::debug!("Loading specification from: {}", path.display());
        let spec = load_spec(path)?;
        let source_type = spec.source_type.clone();
        self.register(spec)?;
        Ok(source_type)
    }

    /// Loads every `*.toml` file in a directory, in file-name order
    ///
    /// The first invalid file aborts loading and leaves the registry unchanged.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>, SpecificationError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut staged = Self::new();
        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            let source_type = staged.load_file(&path)?;
            if self.specs.contains_key(&source_type) {
                return Err(SpecificationError::DuplicateSourceType(source_type));
            }
            loaded.push(source_type);
        }

        self.specs.extend(staged.specs);
        Ok(loaded)
    }

    /// Gets the specification for a source type
    pub fn get(&self, source_type: &str) -> Option<&SelectorSpec> {
        self.specs.get(source_type)
    }

    /// Registered source types, sorted
    pub fn source_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
