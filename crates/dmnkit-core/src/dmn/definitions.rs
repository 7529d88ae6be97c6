//! The DMN `definitions` root and its non-graphical members.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::dmn::{Artifact, Association, DrgElement, Dmndi, RawElement, TextAnnotation};

/// DMN model namespace of DMN 1.1.
pub const DMN_11_NAMESPACE: &str = "http://www.omg.org/spec/DMN/20151101/dmn.xsd";
/// DMN model namespace of DMN 1.2.
pub const DMN_12_NAMESPACE: &str = "http://www.omg.org/spec/DMN/20180521/MODEL/";
/// DMN model namespace of DMN 1.3.
pub const DMN_13_NAMESPACE: &str = "https://www.omg.org/spec/DMN/20191111/MODEL/";

/// The DMN specification version a document was written against.
///
/// The names match external configuration strings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum DmnVersion {
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    #[default]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

impl DmnVersion {
    /// Detects the version from a model namespace URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::dmn::DmnVersion;
    ///
    /// let version = DmnVersion::from_namespace("https://www.omg.org/spec/DMN/20191111/MODEL/");
    /// assert_eq!(version, Some(DmnVersion::V1_3));
    /// ```
    pub fn from_namespace(uri: &str) -> Option<Self> {
        match uri {
            DMN_11_NAMESPACE => Some(Self::V1_1),
            DMN_12_NAMESPACE => Some(Self::V1_2),
            DMN_13_NAMESPACE => Some(Self::V1_3),
            _ => None,
        }
    }

    /// Returns the model namespace URI for this version.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::V1_1 => DMN_11_NAMESPACE,
            Self::V1_2 => DMN_12_NAMESPACE,
            Self::V1_3 => DMN_13_NAMESPACE,
        }
    }

    /// DMN 1.1 has no diagram interchange schema.
    pub fn has_dmndi(self) -> bool {
        !matches!(self, Self::V1_1)
    }
}

impl FromStr for DmnVersion {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.1" => Ok(Self::V1_1),
            "1.2" => Ok(Self::V1_2),
            "1.3" => Ok(Self::V1_3),
            _ => Err("Unsupported DMN version"),
        }
    }
}

impl From<DmnVersion> for &'static str {
    fn from(val: DmnVersion) -> Self {
        match val {
            DmnVersion::V1_1 => "1.1",
            DmnVersion::V1_2 => "1.2",
            DmnVersion::V1_3 => "1.3",
        }
    }
}

impl Display for DmnVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A reference to another DMN model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Import {
    pub namespace: String,
    pub location_uri: Option<String>,
    pub import_type: String,
    pub name: String,
}

/// A typed variable attached to a DRG element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InformationItem {
    pub id: Option<String>,
    pub name: String,
    pub type_ref: Option<String>,
}

/// A custom data type declared by the model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemDefinition {
    pub id: Option<String>,
    pub name: String,
    pub label: Option<String>,
    pub type_ref: Option<String>,
    pub type_language: Option<String>,
    pub is_collection: bool,
    pub allowed_values: Option<RawElement>,
    pub item_components: Vec<ItemDefinition>,
    /// Set on definitions that came from an imported model. Not serialized.
    pub read_only: bool,
}

/// The root of a DMN document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definitions {
    pub id: Option<String>,
    pub name: String,
    pub namespace: String,
    pub expression_language: Option<String>,
    pub type_language: Option<String>,
    pub exporter: Option<String>,
    pub exporter_version: Option<String>,
    pub description: Option<String>,
    /// Namespace declarations in source order, `(prefix, uri)`. The default
    /// namespace uses an empty prefix.
    pub namespaces: Vec<(String, String)>,
    pub version: DmnVersion,
    pub extension_elements: Option<RawElement>,
    pub imports: Vec<Import>,
    pub item_definitions: Vec<ItemDefinition>,
    pub drg_elements: Vec<DrgElement>,
    pub artifacts: Vec<Artifact>,
    pub dmndi: Option<Dmndi>,
}

impl Definitions {
    /// Finds a DRG element by its exact id.
    pub fn drg_element(&self, id: &str) -> Option<&DrgElement> {
        self.drg_elements.iter().find(|element| element.id() == id)
    }

    /// Iterates over the text annotations among the artifacts.
    pub fn text_annotations(&self) -> impl Iterator<Item = &TextAnnotation> {
        self.artifacts.iter().filter_map(Artifact::as_text_annotation)
    }

    /// Iterates over the associations among the artifacts.
    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.artifacts.iter().filter_map(Artifact::as_association)
    }

    /// Looks up the uri bound to `prefix` by the document.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Looks up the first prefix bound to `uri` by the document.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Returns a copy of this document without DRG elements and artifacts.
    ///
    /// Diagram headers are kept but their elements are dropped.
    pub fn header(&self) -> Self {
        let mut header = self.clone();
        header.drg_elements.clear();
        header.artifacts.clear();
        if let Some(dmndi) = header.dmndi.as_mut() {
            for diagram in &mut dmndi.diagrams {
                diagram.elements.clear();
                diagram.extension.components_widths.clear();
            }
        }
        header
    }
}
