//! Decision Requirements Graph elements.
//!
//! Every DRG element kind is a variant of the closed [`DrgElement`] enum so
//! consumers match exhaustively instead of probing types at runtime.

use crate::dmn::{InformationItem, RawElement};

/// A reference to another element, `href="#id"` or `href="namespace#id"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DmnElementReference {
    pub href: String,
}

impl DmnElementReference {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Creates a local reference (`#id`) to the given element id.
    pub fn local(id: &str) -> Self {
        Self {
            href: format!("#{id}"),
        }
    }

    /// Returns the part of the href after `#`, or the whole href when there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::dmn::DmnElementReference;
    ///
    /// assert_eq!(DmnElementReference::new("#_i1").fragment(), "_i1");
    /// assert_eq!(DmnElementReference::new("urn:model#_i1").fragment(), "_i1");
    /// assert_eq!(DmnElementReference::new("_i1").fragment(), "_i1");
    /// ```
    pub fn fragment(&self) -> &str {
        self.href
            .split_once('#')
            .map_or(self.href.as_str(), |(_, fragment)| fragment)
    }
}

/// `informationRequirement`: a decision depends on an input or another decision.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InformationRequirement {
    pub id: Option<String>,
    pub required_decision: Option<DmnElementReference>,
    pub required_input: Option<DmnElementReference>,
}

impl InformationRequirement {
    /// Returns whichever reference is set, decision first.
    pub fn required(&self) -> Option<&DmnElementReference> {
        self.required_decision
            .as_ref()
            .or(self.required_input.as_ref())
    }
}

/// `knowledgeRequirement`: invocation of a business knowledge model or decision service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KnowledgeRequirement {
    pub id: Option<String>,
    pub required_knowledge: Option<DmnElementReference>,
}

/// `authorityRequirement`: a knowledge source governs the element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthorityRequirement {
    pub id: Option<String>,
    pub required_decision: Option<DmnElementReference>,
    pub required_input: Option<DmnElementReference>,
    pub required_authority: Option<DmnElementReference>,
}

impl AuthorityRequirement {
    /// Returns whichever reference is set: decision, then input, then authority.
    pub fn required(&self) -> Option<&DmnElementReference> {
        self.required_decision
            .as_ref()
            .or(self.required_input.as_ref())
            .or(self.required_authority.as_ref())
    }
}

/// Attributes shared by all DRG elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrgElementHeader {
    pub id: String,
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub extension_elements: Option<RawElement>,
    pub variable: Option<InformationItem>,
}

impl DrgElementHeader {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputData {
    pub header: DrgElementHeader,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decision {
    pub header: DrgElementHeader,
    pub question: Option<String>,
    pub allowed_answers: Option<String>,
    pub information_requirements: Vec<InformationRequirement>,
    pub knowledge_requirements: Vec<KnowledgeRequirement>,
    pub authority_requirements: Vec<AuthorityRequirement>,
    /// Decision logic kept verbatim.
    pub expression: Option<RawElement>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BusinessKnowledgeModel {
    pub header: DrgElementHeader,
    /// The `encapsulatedLogic` function definition kept verbatim.
    pub encapsulated_logic: Option<RawElement>,
    pub knowledge_requirements: Vec<KnowledgeRequirement>,
    pub authority_requirements: Vec<AuthorityRequirement>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KnowledgeSource {
    pub header: DrgElementHeader,
    pub authority_requirements: Vec<AuthorityRequirement>,
    pub r#type: Option<String>,
    pub owner: Option<DmnElementReference>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionService {
    pub header: DrgElementHeader,
    pub output_decisions: Vec<DmnElementReference>,
    pub encapsulated_decisions: Vec<DmnElementReference>,
    pub input_decisions: Vec<DmnElementReference>,
    pub input_data: Vec<DmnElementReference>,
}

/// A DRG element of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DrgElement {
    InputData(InputData),
    Decision(Decision),
    BusinessKnowledgeModel(BusinessKnowledgeModel),
    KnowledgeSource(KnowledgeSource),
    DecisionService(DecisionService),
}

impl DrgElement {
    pub fn header(&self) -> &DrgElementHeader {
        match self {
            Self::InputData(e) => &e.header,
            Self::Decision(e) => &e.header,
            Self::BusinessKnowledgeModel(e) => &e.header,
            Self::KnowledgeSource(e) => &e.header,
            Self::DecisionService(e) => &e.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut DrgElementHeader {
        match self {
            Self::InputData(e) => &mut e.header,
            Self::Decision(e) => &mut e.header,
            Self::BusinessKnowledgeModel(e) => &mut e.header,
            Self::KnowledgeSource(e) => &mut e.header,
            Self::DecisionService(e) => &mut e.header,
        }
    }

    pub fn id(&self) -> &str {
        &self.header().id
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    /// The XML tag local name for this element kind.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::InputData(_) => "inputData",
            Self::Decision(_) => "decision",
            Self::BusinessKnowledgeModel(_) => "businessKnowledgeModel",
            Self::KnowledgeSource(_) => "knowledgeSource",
            Self::DecisionService(_) => "decisionService",
        }
    }

    /// Decision logic that component widths may be attached to.
    pub fn logic(&self) -> Option<&RawElement> {
        match self {
            Self::Decision(e) => e.expression.as_ref(),
            Self::BusinessKnowledgeModel(e) => e.encapsulated_logic.as_ref(),
            Self::InputData(_) | Self::KnowledgeSource(_) | Self::DecisionService(_) => None,
        }
    }
}
