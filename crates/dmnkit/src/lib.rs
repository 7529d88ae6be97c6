//! dmnkit - DMN documents as editable graphs.
//!
//! Reads DMN XML into an in-memory graph of nodes and edges, writes the graph
//! back as DMN XML, and reorders the data type hierarchy through
//! drag-and-drop gestures.

pub mod config;
pub mod dnd;
pub mod marshaller;
pub mod structure;

mod error;

pub use dmnkit_core::{color, dmn, geometry, identifier};

pub use error::DmnError;

use log::{debug, info, trace};

use dmnkit_core::dmn::Definitions;
use dmnkit_xml::WriteOptions;

use config::AppConfig;
use dnd::DataTypeList;
use marshaller::{DmnMarshaller, DmnUnmarshaller, ImportResolver, Metadata};
use structure::Graph;

/// Builder for reading, converting and writing DMN documents.
///
/// This provides an API for processing DMN documents through parsing,
/// unmarshalling, marshalling and writing stages.
///
/// # Examples
///
/// ```rust,no_run
/// use dmnkit::{DmnBuilder, config::AppConfig, marshaller::Metadata};
///
/// let source = r#"<definitions xmlns="https://www.omg.org/spec/DMN/20191111/MODEL/"
///     id="_defs" name="Loan" namespace="urn:loan"/>"#;
///
/// let builder = DmnBuilder::new(AppConfig::default());
///
/// // Parse source to the document model
/// let definitions = builder.parse(source)
///     .expect("Failed to parse");
///
/// // Build the graph and write it back
/// let mut graph = futures::executor::block_on(builder.unmarshall(&Metadata::new(), definitions))
///     .expect("Failed to unmarshall");
/// let xml = builder.write(&builder.marshall(&mut graph).expect("Failed to marshall"))
///     .expect("Failed to write");
/// ```
#[derive(Default)]
pub struct DmnBuilder {
    config: AppConfig,
    unmarshaller: DmnUnmarshaller,
    marshaller: DmnMarshaller,
}

impl DmnBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// Imports are ignored until a resolver is set with
    /// [`with_import_resolver`](Self::with_import_resolver).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dmnkit::{DmnBuilder, config::AppConfig};
    ///
    /// let builder = DmnBuilder::new(AppConfig::default());
    /// ```
    pub fn new(config: AppConfig) -> Self {
        Self {
            unmarshaller: DmnUnmarshaller::new(config.unmarshaller().clone()),
            marshaller: DmnMarshaller::new(config.marshaller().clone()),
            config,
        }
    }

    /// Resolve imports through `resolver` while unmarshalling.
    pub fn with_import_resolver(mut self, resolver: impl ImportResolver + 'static) -> Self {
        self.unmarshaller = self.unmarshaller.with_import_resolver(resolver);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse DMN XML into the document model.
    ///
    /// # Errors
    ///
    /// Returns [`DmnError::Parse`] with the source attached for malformed
    /// XML and unsupported DMN content.
    pub fn parse(&self, source: &str) -> Result<Definitions, DmnError> {
        info!("Parsing DMN document");

        let definitions = dmnkit_xml::read_definitions(source)
            .map_err(|err| DmnError::new_parse_error(err, source))?;

        debug!(
            drg_elements_count = definitions.drg_elements.len(),
            version:? = definitions.version;
            "Document parsed successfully"
        );
        trace!(definitions:?; "Parsed document");

        Ok(definitions)
    }

    /// Build the graph of a document, resolving its imports first.
    ///
    /// # Errors
    ///
    /// Returns [`DmnError::Import`] when the imports cannot be resolved.
    pub async fn unmarshall(
        &self,
        metadata: &Metadata,
        definitions: Definitions,
    ) -> Result<Graph, DmnError> {
        info!(name = definitions.name.as_str(); "Unmarshalling document");
        self.unmarshaller.unmarshall(metadata, definitions).await
    }

    /// Rebuild a document from its graph.
    ///
    /// The graph is left in the framing it was given in.
    ///
    /// # Errors
    ///
    /// Returns [`DmnError::Marshall`] for graphs no valid document maps to.
    pub fn marshall(&self, graph: &mut Graph) -> Result<Definitions, DmnError> {
        info!(nodes_count = graph.nodes_count(); "Marshalling graph");
        self.marshaller.marshall(graph)
    }

    /// Write a document as DMN XML.
    ///
    /// # Errors
    ///
    /// Returns [`DmnError::Write`] when the document cannot be serialized.
    pub fn write(&self, definitions: &Definitions) -> Result<String, DmnError> {
        let options = WriteOptions::new(self.config.marshaller().indent());
        let xml = dmnkit_xml::write_definitions(definitions, &options)?;
        debug!(bytes = xml.len(); "Document written");
        Ok(xml)
    }

    /// Read, unmarshall, marshall and write a document in one go.
    ///
    /// The output carries every shape, including those synthesized for
    /// elements the source never placed, and is written as DMN 1.2 or later.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub async fn normalize(&self, metadata: &Metadata, source: &str) -> Result<String, DmnError> {
        let definitions = self.parse(source)?;
        let mut graph = self.unmarshall(metadata, definitions).await?;
        let definitions = self.marshall(&mut graph)?;
        self.write(&definitions)
    }

    /// The item definitions of a document as a drag-and-drop list.
    pub fn data_type_list(&self, definitions: &Definitions) -> DataTypeList {
        DataTypeList::from_item_definitions(
            &definitions.item_definitions,
            *self.config.dnd(),
        )
    }
}
