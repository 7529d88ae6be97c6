//! Artifacts: text annotations and the associations that attach them.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::dmn::DmnElementReference;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextAnnotation {
    pub id: String,
    pub text: String,
    pub text_format: Option<String>,
    pub description: Option<String>,
}

/// Direction of an association's arrow heads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationDirection {
    #[default]
    None,
    One,
    Both,
}

impl FromStr for AssociationDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "One" => Ok(Self::One),
            "Both" => Ok(Self::Both),
            _ => Err("Unsupported association direction"),
        }
    }
}

impl From<AssociationDirection> for &'static str {
    fn from(val: AssociationDirection) -> Self {
        match val {
            AssociationDirection::None => "None",
            AssociationDirection::One => "One",
            AssociationDirection::Both => "Both",
        }
    }
}

impl Display for AssociationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Association {
    pub id: String,
    pub source_ref: DmnElementReference,
    pub target_ref: DmnElementReference,
    pub association_direction: AssociationDirection,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    TextAnnotation(TextAnnotation),
    Association(Association),
}

impl Artifact {
    pub fn id(&self) -> &str {
        match self {
            Self::TextAnnotation(a) => &a.id,
            Self::Association(a) => &a.id,
        }
    }

    pub fn as_text_annotation(&self) -> Option<&TextAnnotation> {
        match self {
            Self::TextAnnotation(a) => Some(a),
            Self::Association(_) => None,
        }
    }

    pub fn as_association(&self) -> Option<&Association> {
        match self {
            Self::Association(a) => Some(a),
            Self::TextAnnotation(_) => None,
        }
    }
}
