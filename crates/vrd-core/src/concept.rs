//! Coded concepts and the code systems used across a death record.

use serde::{Deserialize, Serialize};

/// SNOMED CT.
pub const SYSTEM_SNOMED: &str = "http://snomed.info/sct";

/// LOINC.
pub const SYSTEM_LOINC: &str = "http://loinc.org";

/// HL7 v3 RoleCode (family relationships).
pub const SYSTEM_ROLE_CODE: &str = "http://terminology.hl7.org/CodeSystem/v3-RoleCode";

/// HL7 v2 yes/no indicator table.
pub const SYSTEM_YES_NO: &str = "http://terminology.hl7.org/CodeSystem/v2-0136";

/// Document section codes of the death certificate composition.
pub const SYSTEM_DOCUMENT_SECTION: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-document-section-cs";

/// Location type codes (death, disposition, injury).
pub const SYSTEM_LOCATION_TYPE: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-location-type-cs";

/// A coded concept: code + system pair, optional display, optional free text.
///
/// Every field is optional; a concept may be purely textual (`text` only) or
/// purely coded. An empty concept carries no information and classifiers
/// treat it the same as an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Concept {
    /// A coded concept without display text.
    pub fn coded(system: &str, code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            system: Some(system.to_string()),
            display: None,
            text: None,
        }
    }

    /// A purely textual concept.
    pub fn text_only(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// Attach display text.
    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    /// Attach free text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// The primary code, if present and non-empty.
    pub fn primary_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether this concept carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.primary_code() == Some(code)
    }

    /// Whether the concept carries neither a code nor text.
    pub fn is_empty(&self) -> bool {
        self.primary_code().is_none() && self.text.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_concept() {
        let c = Concept::coded(SYSTEM_SNOMED, "38605008").with_display("Natural death");
        assert_eq!(c.primary_code(), Some("38605008"));
        assert!(c.has_code("38605008"));
        assert!(!c.has_code("7878000"));
        assert!(!c.is_empty());
    }

    #[test]
    fn empty_code_is_not_primary() {
        let c = Concept {
            code: Some(String::new()),
            ..Concept::default()
        };
        assert_eq!(c.primary_code(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn text_only_concept() {
        let c = Concept::text_only("Pneumonia");
        assert_eq!(c.primary_code(), None);
        assert!(!c.is_empty());
    }

    #[test]
    fn serde_skips_absent_fields() {
        let c = Concept::coded(SYSTEM_LOINC, "69449-7");
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("display"));
        assert!(!json.contains("text"));
    }
}
