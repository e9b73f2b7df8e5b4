//! Extension trees: typed name/value annotations attached to resources.

use serde::{Deserialize, Serialize};

use super::reference::Reference;
use crate::concept::Concept;

/// The standard data-absent-reason extension url.
pub const URL_DATA_ABSENT_REASON: &str =
    "http://hl7.org/fhir/StructureDefinition/data-absent-reason";

/// Why a value is absent.
///
/// The two markers are semantically distinct and must never be collapsed:
/// `TempUnknown` means the value has not been supplied yet, `Unknown` means
/// it was affirmatively declared unknowable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsentReason {
    TempUnknown,
    Unknown,
}

impl AbsentReason {
    /// The wire code for this reason.
    pub fn code(self) -> &'static str {
        match self {
            AbsentReason::TempUnknown => "temp-unknown",
            AbsentReason::Unknown => "unknown",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "temp-unknown" => Some(AbsentReason::TempUnknown),
            "unknown" => Some(AbsentReason::Unknown),
            _ => None,
        }
    }
}

/// A typed extension value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtensionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    Code(String),
    Date(String),
    DateTime(String),
    Time(String),
    Concept(Concept),
    Reference(Reference),
    /// A data-absent-reason recorded at the value position itself.
    Absent(AbsentReason),
}

impl ExtensionValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ExtensionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s)
            | ExtensionValue::Code(s)
            | ExtensionValue::Date(s)
            | ExtensionValue::DateTime(s)
            | ExtensionValue::Time(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExtensionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// A node in an extension tree: url, optional value, child extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ExtensionValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Extension {
    /// An extension with no value and no children.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            value: None,
            extensions: Vec::new(),
        }
    }

    /// Attach a value.
    pub fn with_value(mut self, value: ExtensionValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a child extension.
    pub fn with_child(mut self, child: Extension) -> Self {
        self.extensions.push(child);
        self
    }

    /// First child with the given url.
    pub fn child(&self, url: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.url == url)
    }

    /// First child with the given url, mutable.
    pub fn child_mut(&mut self, url: &str) -> Option<&mut Extension> {
        self.extensions.iter_mut().find(|e| e.url == url)
    }

    /// First child with the given url, appended if absent.
    pub fn child_or_insert(&mut self, url: &str) -> &mut Extension {
        if let Some(pos) = self.extensions.iter().position(|e| e.url == url) {
            &mut self.extensions[pos]
        } else {
            self.extensions.push(Extension::new(url));
            self.extensions.last_mut().unwrap()
        }
    }

    /// Remove every child with the given url.
    pub fn remove_child(&mut self, url: &str) {
        self.extensions.retain(|e| e.url != url);
    }
}

/// First extension with the given url in a slice.
pub fn find_extension<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
    extensions.iter().find(|e| e.url == url)
}

/// First extension with the given url, mutable.
pub fn find_extension_mut<'a>(
    extensions: &'a mut Vec<Extension>,
    url: &str,
) -> Option<&'a mut Extension> {
    extensions.iter_mut().find(|e| e.url == url)
}

/// First extension with the given url, appended if absent.
pub fn extension_or_insert<'a>(extensions: &'a mut Vec<Extension>, url: &str) -> &'a mut Extension {
    if let Some(pos) = extensions.iter().position(|e| e.url == url) {
        &mut extensions[pos]
    } else {
        extensions.push(Extension::new(url));
        extensions.last_mut().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_or_insert_is_idempotent() {
        let mut ext = Extension::new("outer");
        ext.child_or_insert("a").value = Some(ExtensionValue::Integer(1));
        ext.child_or_insert("a").value = Some(ExtensionValue::Integer(2));
        assert_eq!(ext.extensions.len(), 1);
        assert_eq!(ext.child("a").unwrap().value.as_ref().unwrap().as_integer(), Some(2));
    }

    #[test]
    fn remove_child_removes_all() {
        let mut ext = Extension::new("outer")
            .with_child(Extension::new("x"))
            .with_child(Extension::new("x"))
            .with_child(Extension::new("y"));
        ext.remove_child("x");
        assert_eq!(ext.extensions.len(), 1);
        assert!(ext.child("y").is_some());
    }

    #[test]
    fn absent_reason_codes() {
        assert_eq!(AbsentReason::TempUnknown.code(), "temp-unknown");
        assert_eq!(AbsentReason::from_code("unknown"), Some(AbsentReason::Unknown));
        assert_eq!(AbsentReason::from_code("masked"), None);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(ExtensionValue::Integer(7).as_integer(), Some(7));
        assert_eq!(ExtensionValue::Code("x".into()).as_str(), Some("x"));
        assert_eq!(ExtensionValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(ExtensionValue::Boolean(true).as_integer(), None);
    }
}
