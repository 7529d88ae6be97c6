//! Import resolution against the file system.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, warn};

use dmnkit::{
    DmnError,
    dmn::{DmnVersion, Import},
    marshaller::{ImportResolver, ImportedModels, Metadata},
};

/// Resolves each DMN import's `locationURI` relative to the importing file.
///
/// Imports of other kinds, such as PMML, are skipped.
#[derive(Debug, Clone, Default)]
pub struct FsImportResolver;

impl FsImportResolver {
    fn base_dir(metadata: &Metadata) -> PathBuf {
        metadata
            .location()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImportResolver for FsImportResolver {
    async fn resolve(
        &self,
        metadata: &Metadata,
        imports: &[Import],
    ) -> Result<ImportedModels, DmnError> {
        let base = Self::base_dir(metadata);
        let mut models = ImportedModels::new();

        for import in imports {
            if DmnVersion::from_namespace(&import.import_type).is_none() {
                debug!(
                    name = import.name.as_str(),
                    import_type = import.import_type.as_str();
                    "Skipping non-DMN import"
                );
                continue;
            }
            let Some(location) = import.location_uri.as_deref() else {
                warn!(name = import.name.as_str(); "DMN import without a location");
                continue;
            };

            let path = base.join(location);
            let source = fs::read_to_string(&path).map_err(|err| {
                DmnError::Import(format!("cannot read `{}`: {err}", path.display()))
            })?;
            let definitions = dmnkit_xml::read_definitions(&source).map_err(|err| {
                DmnError::Import(format!("cannot parse `{}`: {err}", path.display()))
            })?;

            debug!(
                name = import.name.as_str(),
                path = path.display().to_string();
                "Import resolved"
            );
            models.insert(import.clone(), definitions);
        }

        Ok(models)
    }
}
