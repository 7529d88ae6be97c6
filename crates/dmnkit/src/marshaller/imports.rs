//! Resolution of imported DMN models.
//!
//! Imports are resolved before the graph is built: the resolver is the only
//! asynchronous step of unmarshalling.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use dmnkit_core::dmn::{Definitions, DrgElement, Import, ItemDefinition};

use crate::DmnError;

/// Where the document being unmarshalled came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    location: Option<PathBuf>,
    title: Option<String>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path of the document; relative import locations resolve against it.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// The models referenced by a document's imports.
#[derive(Debug, Clone, Default)]
pub struct ImportedModels {
    models: Vec<(Import, Definitions)>,
}

impl ImportedModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, import: Import, definitions: Definitions) {
        self.models.push((import, definitions));
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Import, Definitions)> {
        self.models.iter()
    }

    /// DRG elements of every imported model.
    ///
    /// Ids are kept so that shapes referencing `prefix:id` still resolve;
    /// names are qualified with the import name.
    pub fn drg_elements(&self) -> Vec<DrgElement> {
        self.models
            .iter()
            .flat_map(|(import, definitions)| {
                definitions.drg_elements.iter().map(|element| {
                    let mut element = element.clone();
                    let header = element.header_mut();
                    header.name = qualified_name(&import.name, &header.name);
                    element
                })
            })
            .collect()
    }

    /// Item definitions of every imported model, flagged read-only.
    pub fn item_definitions(&self) -> Vec<ItemDefinition> {
        self.models
            .iter()
            .flat_map(|(import, definitions)| {
                definitions.item_definitions.iter().map(|item| {
                    let mut item = item.clone();
                    item.name = qualified_name(&import.name, &item.name);
                    mark_read_only(&mut item);
                    item
                })
            })
            .collect()
    }
}

fn qualified_name(import_name: &str, name: &str) -> String {
    if import_name.is_empty() {
        name.to_string()
    } else {
        format!("{import_name}.{name}")
    }
}

fn mark_read_only(item: &mut ItemDefinition) {
    item.read_only = true;
    for component in &mut item.item_components {
        mark_read_only(component);
    }
}

/// Loads the models a document imports.
#[async_trait]
pub trait ImportResolver: Send + Sync {
    /// Resolves `imports` of the document described by `metadata`.
    ///
    /// A failure aborts unmarshalling; no partial graph is produced.
    async fn resolve(
        &self,
        metadata: &Metadata,
        imports: &[Import],
    ) -> Result<ImportedModels, DmnError>;
}

/// Resolver for documents whose imports are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

#[async_trait]
impl ImportResolver for NoImports {
    async fn resolve(
        &self,
        _metadata: &Metadata,
        _imports: &[Import],
    ) -> Result<ImportedModels, DmnError> {
        Ok(ImportedModels::default())
    }
}
