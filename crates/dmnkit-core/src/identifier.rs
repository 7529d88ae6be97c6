//! Interned identifiers for graph nodes, edges and diagrams.
//!
//! DMN element ids stay plain strings inside the document model because they
//! are written back verbatim. Everything the graph keys on is an [`Id`]: a
//! `Copy` handle into a process-wide string interner.

use std::{
    convert::Infallible,
    fmt,
    str::FromStr,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Locks the interner. A poisoned lock is still usable since interning never
/// leaves the table half-written.
fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// An interned graph identifier.
///
/// # Examples
///
/// ```
/// use dmnkit_core::identifier::Id;
///
/// let service = Id::new("_service_1");
/// let decision = Id::new("_decision_1");
///
/// // Decision service child edges join both node ids
/// assert_eq!(service.join("er", decision), "_service_1er_decision_1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// The id `self` + `separator` + `other`.
    pub fn join(&self, separator: &str, other: Id) -> Self {
        let mut interner = interner();
        let joined = format!(
            "{}{separator}{}",
            interner.resolve(self.0).unwrap_or_default(),
            interner.resolve(other.0).unwrap_or_default()
        );
        Self(interner.get_or_intern(joined))
    }

    fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        f(interner.resolve(self.0).unwrap_or_default())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

impl FromStr for Id {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|s| s == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_id() {
        assert_eq!(Id::new("_decision"), Id::new("_decision"));
        assert_ne!(Id::new("_decision"), Id::new("_input"));
    }

    #[test]
    fn test_join_builds_child_edge_ids() {
        let service = Id::new("_service");

        let first = service.join("er", Id::new("_first"));
        let second = service.join("er", Id::new("_second"));

        assert_eq!(first, "_serviceer_first");
        assert_eq!(second, "_serviceer_second");
        assert_eq!(first, Id::new("_serviceer_first"));
    }

    #[test]
    fn test_display_and_parse() {
        let id: Id = "dmnshape-drg#_d1".parse().unwrap();

        assert_eq!(id.to_string(), "dmnshape-drg#_d1");
        assert_eq!(id, Id::from("dmnshape-drg#_d1"));
    }

    #[test]
    fn test_compare_with_str() {
        let id = Id::new("drg#_bkm");
        let owned = String::from("drg#_bkm");

        assert!(id == owned.as_str());
        assert!(id != "_bkm");
        assert!(Id::new("") == "");
    }

    #[test]
    fn test_usable_as_map_key() {
        use std::collections::HashMap;

        let mut widths = HashMap::new();
        widths.insert(Id::new("_table"), 3);

        assert_eq!(widths.get(&Id::new("_table")), Some(&3));
        assert_eq!(widths.get(&Id::new("_other")), None);
    }
}
