//! Id helpers shared by the marshaller and unmarshaller.
//!
//! Diagram elements of a multi-diagram document are prefixed with their
//! diagram id: `dmnshape-<diagram>#<element>`.

use uuid::Uuid;

const SEPARATOR: &str = "#";

/// Joins the non-empty parts with `#`.
///
/// # Examples
///
/// ```
/// use dmnkit::marshaller::id_utils::get_prefixed_id;
///
/// assert_eq!(get_prefixed_id("_diagram", "_d1"), "_diagram#_d1");
/// assert_eq!(get_prefixed_id("", "_d1"), "_d1");
/// ```
pub fn get_prefixed_id(prefix_id: &str, raw_id: &str) -> String {
    [prefix_id, raw_id]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Returns the raw id from a prefixed one.
///
/// One part is returned as is, two parts return the second, anything else
/// is `""`.
///
/// # Examples
///
/// ```
/// use dmnkit::marshaller::id_utils::get_raw_id;
///
/// assert_eq!(get_raw_id("_diagram#_d1"), "_d1");
/// assert_eq!(get_raw_id("_d1"), "_d1");
/// assert_eq!(get_raw_id("a#b#c"), "");
/// ```
pub fn get_raw_id(prefixed_id: &str) -> &str {
    if prefixed_id.is_empty() {
        return "";
    }

    let parts: Vec<&str> = prefixed_id.split(SEPARATOR).collect();
    match parts.as_slice() {
        [raw] => raw,
        [_, raw] => raw,
        _ => "",
    }
}

/// A fresh element id: `_` followed by an uppercase UUID.
pub fn unique_id() -> String {
    format!("_{}", Uuid::new_v4().to_string().to_uppercase())
}

/// The `DMNShape` id of an element on a diagram.
pub fn shape_id(diagram_id: &str, element_id: &str) -> String {
    format!("dmnshape-{}", get_prefixed_id(diagram_id, element_id))
}

/// The `DMNEdge` id of a requirement or association on a diagram.
pub fn edge_id(diagram_id: &str, element_id: &str) -> String {
    format!("dmnedge-{}", get_prefixed_id(diagram_id, element_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_prefixed_id() {
        assert_eq!(get_prefixed_id("_p", "_r"), "_p#_r");
        assert_eq!(get_prefixed_id("_p", ""), "_p");
        assert_eq!(get_prefixed_id("", ""), "");
    }

    #[test]
    fn test_get_raw_id() {
        assert_eq!(get_raw_id(""), "");
        assert_eq!(get_raw_id("_r"), "_r");
        assert_eq!(get_raw_id("_p#_r"), "_r");
        assert_eq!(get_raw_id("#_r"), "_r");
        assert_eq!(get_raw_id("_a#_b#_c"), "");
    }

    #[test]
    fn test_raw_id_reverses_prefixed_id() {
        let prefixed = get_prefixed_id("_diagram", "_element");
        assert_eq!(get_raw_id(&prefixed), "_element");
    }

    #[test]
    fn test_unique_id_format() {
        let id = unique_id();

        assert!(id.starts_with('_'));
        assert_eq!(id.len(), 37);
        assert_eq!(id, id.to_uppercase());
        assert_ne!(id, unique_id());
    }

    #[test]
    fn test_shape_and_edge_ids() {
        assert_eq!(shape_id("_diagram", "_d1"), "dmnshape-_diagram#_d1");
        assert_eq!(edge_id("_diagram", "_ir1"), "dmnedge-_diagram#_ir1");
        assert_eq!(shape_id("", "_d1"), "dmnshape-_d1");
    }
}
