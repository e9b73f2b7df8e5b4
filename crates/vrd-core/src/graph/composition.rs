//! The document's table-of-contents resource and its sections.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extension::Extension;
use super::reference::Reference;
use super::resource::ResourceId;
use crate::concept::{Concept, SYSTEM_LOINC};

/// Category code of a composition section. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionCode {
    DecedentDemographics,
    DeathInvestigation,
    DeathCertification,
    DecedentDisposition,
    CodedContent,
}

impl SectionCode {
    /// The wire code for this section category.
    pub fn code(self) -> &'static str {
        match self {
            SectionCode::DecedentDemographics => "DecedentDemographics",
            SectionCode::DeathInvestigation => "DeathInvestigation",
            SectionCode::DeathCertification => "DeathCertification",
            SectionCode::DecedentDisposition => "DecedentDisposition",
            SectionCode::CodedContent => "CodedContent",
        }
    }
}

impl fmt::Display for SectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One section of the composition: a category code plus an ordered list of
/// entry references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub code: SectionCode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Reference>,
}

impl Section {
    pub fn new(code: SectionCode) -> Self {
        Self {
            code,
            entries: Vec::new(),
        }
    }
}

/// The mandatory table-of-contents resource of a full document.
///
/// Holds the subject (decedent), the attester (certifier) and the section
/// list partitioning entry references by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: Concept,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attester: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Composition {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            status: "final".to_string(),
            kind: Concept::coded(SYSTEM_LOINC, "64297-5").with_display("Death certificate"),
            subject: None,
            attester: None,
            title: Some("Death Certificate".to_string()),
            date: None,
            sections: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// The section with the given category code.
    pub fn section(&self, code: SectionCode) -> Option<&Section> {
        self.sections.iter().find(|s| s.code == code)
    }

    /// The section with the given category code, created and appended on
    /// first use (linear scan, else appended).
    pub fn section_or_insert(&mut self, code: SectionCode) -> &mut Section {
        if let Some(pos) = self.sections.iter().position(|s| s.code == code) {
            &mut self.sections[pos]
        } else {
            self.sections.push(Section::new(code));
            self.sections.last_mut().unwrap()
        }
    }

    /// Register an entry reference in the given section, once.
    pub fn register(&mut self, code: SectionCode, entry: Reference) {
        let section = self.section_or_insert(code);
        if !section.entries.contains(&entry) {
            section.entries.push(entry);
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_created_on_first_use() {
        let mut c = Composition::new();
        assert!(c.section(SectionCode::DeathInvestigation).is_none());
        c.section_or_insert(SectionCode::DeathInvestigation);
        c.section_or_insert(SectionCode::DeathInvestigation);
        assert_eq!(c.sections.len(), 1);
    }

    #[test]
    fn sections_appended_in_first_use_order() {
        let mut c = Composition::new();
        c.section_or_insert(SectionCode::CodedContent);
        c.section_or_insert(SectionCode::DecedentDemographics);
        assert_eq!(c.sections[0].code, SectionCode::CodedContent);
        assert_eq!(c.sections[1].code, SectionCode::DecedentDemographics);
    }

    #[test]
    fn register_is_idempotent() {
        let mut c = Composition::new();
        let r = Reference::urn(Uuid::new_v4());
        c.register(SectionCode::DeathCertification, r.clone());
        c.register(SectionCode::DeathCertification, r);
        assert_eq!(
            c.section(SectionCode::DeathCertification).unwrap().entries.len(),
            1
        );
    }
}
