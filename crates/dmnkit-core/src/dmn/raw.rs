//! Opaque XML subtrees.
//!
//! Decision logic (decision tables, literal expressions, contexts, function
//! definitions), extension elements and allowed values are not interpreted by
//! the marshalling engine. They are carried as [`RawElement`] trees so a read
//! followed by a write preserves them.

/// One child of a [`RawElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Element(RawElement),
    Text(String),
}

/// A verbatim XML element with its qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawElement {
    /// Qualified tag name as it appeared in the source (`dmn:decisionTable`).
    pub name: String,
    /// Attributes in source order, keys qualified as in the source.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<RawNode>,
}

impl RawElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the tag name without its namespace prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::dmn::RawElement;
    ///
    /// let table = RawElement::new("dmn:decisionTable");
    /// assert_eq!(table.local_name(), "decisionTable");
    /// ```
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Returns the value of the attribute whose unprefixed name is `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || key.rsplit_once(':').is_some_and(|(_, k)| k == name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the `id` attribute of this element, if present.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Collects the ids of this element and every nested element, depth first.
    ///
    /// Component widths are keyed by these ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use dmnkit_core::dmn::{RawElement, RawNode};
    ///
    /// let mut table = RawElement::new("decisionTable");
    /// table.attributes.push(("id".to_string(), "_table".to_string()));
    /// let mut rule = RawElement::new("rule");
    /// rule.attributes.push(("id".to_string(), "_rule".to_string()));
    /// table.children.push(RawNode::Element(rule));
    ///
    /// assert_eq!(table.contained_ids(), vec!["_table", "_rule"]);
    /// ```
    pub fn contained_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        if let Some(id) = self.id() {
            ids.push(id);
        }
        for child in self.child_elements() {
            child.collect_ids(ids);
        }
    }

    /// Iterates over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &RawElement> {
        self.children.iter().filter_map(|child| match child {
            RawNode::Element(element) => Some(element),
            RawNode::Text(_) => None,
        })
    }

    /// Concatenated text content of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                RawNode::Text(text) => Some(text.as_str()),
                RawNode::Element(_) => None,
            })
            .collect()
    }
}
