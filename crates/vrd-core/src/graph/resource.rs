//! Typed resource records.
//!
//! Every resource is identified by a globally unique id and zero or more
//! profile tags. Resources never own one another; they are addressed only by
//! id from the containing graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::composition::Composition;
use super::extension::Extension;
use super::reference::Reference;
use crate::concept::Concept;

/// Globally unique resource identifier.
pub type ResourceId = Uuid;

/// A structured personal name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl HumanName {
    /// Render as "Given Middle Family Suffix", skipping absent parts.
    pub fn full(&self) -> String {
        let mut parts: Vec<&str> = self.given.iter().map(String::as_str).collect();
        if let Some(f) = self.family.as_deref() {
            parts.push(f);
        }
        if let Some(s) = self.suffix.as_deref() {
            parts.push(s);
        }
        parts.join(" ")
    }
}

/// A postal address, reduced to the parts a death record reasons about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// The decedent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Patient {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            name: None,
            gender: None,
            birth_date: None,
            extensions: Vec::new(),
        }
    }
}

impl Default for Patient {
    fn default() -> Self {
        Self::new()
    }
}

/// The certifying practitioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Practitioner {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            name: None,
            extensions: Vec::new(),
        }
    }
}

impl Default for Practitioner {
    fn default() -> Self {
        Self::new()
    }
}

/// The death certification procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Procedure {
    pub fn new(code: Concept) -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            status: "completed".to_string(),
            code: Some(code),
            subject: None,
            performer: None,
            performed: None,
            extensions: Vec::new(),
        }
    }
}

/// A typed observation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservationValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    Concept(Concept),
    DateTime(String),
    Quantity {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl ObservationValue {
    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            ObservationValue::Concept(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&str> {
        match self {
            ObservationValue::DateTime(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ObservationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// A coded observation sub-value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub code: Concept,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ObservationValue>,
}

/// A classified measurement or assertion about the death.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    pub status: String,
    /// Primary classifying code. Required on every observation in a valid
    /// document; the resolver rejects observations without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ObservationValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Observation {
    pub fn new(code: Concept) -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            status: "final".to_string(),
            code: Some(code),
            subject: None,
            value: None,
            components: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Primary classifying code, if present and non-empty.
    pub fn primary_code(&self) -> Option<&str> {
        self.code.as_ref().and_then(Concept::primary_code)
    }

    /// First component whose code matches.
    pub fn component(&self, code: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.code.has_code(code))
    }

    /// Set a component value, replacing an existing component with the same code.
    pub fn set_component(&mut self, code: Concept, value: ObservationValue) {
        let key = code.code.clone();
        if let Some(existing) = self
            .components
            .iter_mut()
            .find(|c| c.code.code == key && key.is_some())
        {
            existing.value = Some(value);
        } else {
            self.components.push(Component {
                code,
                value: Some(value),
            });
        }
    }
}

/// A cause-of-death or contributing condition.
///
/// Three facets: the written cause text (`code.text`), the onset-to-death
/// interval, and an optional coded cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Condition {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            code: None,
            onset: None,
            subject: None,
            extensions: Vec::new(),
        }
    }

    /// The written cause text facet.
    pub fn text(&self) -> Option<&str> {
        self.code.as_ref().and_then(|c| c.text.as_deref())
    }

    /// Set the written cause text facet.
    pub fn set_text(&mut self, text: &str) {
        self.code.get_or_insert_with(Concept::default).text = Some(text.to_string());
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::new()
    }
}

/// A person related to the decedent (father, mother, spouse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPerson {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl RelatedPerson {
    pub fn new(relationship: Concept) -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            relationship: Some(relationship),
            name: None,
            extensions: Vec::new(),
        }
    }

    /// Relationship code, if present and non-empty.
    pub fn relationship_code(&self) -> Option<&str> {
        self.relationship.as_ref().and_then(Concept::primary_code)
    }
}

/// A place relevant to the death (death, disposition, or injury location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    /// Location type coding; classification skips locations without one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Location {
    pub fn new(kind: Concept) -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            kind: Some(kind),
            name: None,
            description: None,
            address: None,
            extensions: Vec::new(),
        }
    }
}

/// An organization involved in disposition (e.g. the funeral home).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Organization {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            name: None,
            address: None,
            extensions: Vec::new(),
        }
    }
}

impl Default for Organization {
    fn default() -> Self {
        Self::new()
    }
}

/// One positional entry of an ordered list resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Reference>,
}

/// An ordered list of references; backing store for the cause pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResource {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    pub status: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ListEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl ListResource {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profiles: Vec::new(),
            status: "current".to_string(),
            mode: "snapshot".to_string(),
            entries: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl Default for ListResource {
    fn default() -> Self {
        Self::new()
    }
}

/// A semantically-typed resource record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Composition(Composition),
    Patient(Patient),
    Practitioner(Practitioner),
    Procedure(Procedure),
    Observation(Observation),
    Condition(Condition),
    RelatedPerson(RelatedPerson),
    Location(Location),
    Organization(Organization),
    List(ListResource),
}

impl Resource {
    /// The resource's unique id.
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Composition(r) => r.id,
            Resource::Patient(r) => r.id,
            Resource::Practitioner(r) => r.id,
            Resource::Procedure(r) => r.id,
            Resource::Observation(r) => r.id,
            Resource::Condition(r) => r.id,
            Resource::RelatedPerson(r) => r.id,
            Resource::Location(r) => r.id,
            Resource::Organization(r) => r.id,
            Resource::List(r) => r.id,
        }
    }

    /// Profile tags declared on the resource.
    pub fn profiles(&self) -> &[String] {
        match self {
            Resource::Composition(r) => &r.profiles,
            Resource::Patient(r) => &r.profiles,
            Resource::Practitioner(r) => &r.profiles,
            Resource::Procedure(r) => &r.profiles,
            Resource::Observation(r) => &r.profiles,
            Resource::Condition(r) => &r.profiles,
            Resource::RelatedPerson(r) => &r.profiles,
            Resource::Location(r) => &r.profiles,
            Resource::Organization(r) => &r.profiles,
            Resource::List(r) => &r.profiles,
        }
    }

    /// Extension tree attached to the resource.
    pub fn extensions(&self) -> &[Extension] {
        match self {
            Resource::Composition(r) => &r.extensions,
            Resource::Patient(r) => &r.extensions,
            Resource::Practitioner(r) => &r.extensions,
            Resource::Procedure(r) => &r.extensions,
            Resource::Observation(r) => &r.extensions,
            Resource::Condition(r) => &r.extensions,
            Resource::RelatedPerson(r) => &r.extensions,
            Resource::Location(r) => &r.extensions,
            Resource::Organization(r) => &r.extensions,
            Resource::List(r) => &r.extensions,
        }
    }

    /// Whether the resource carries the given profile tag.
    pub fn has_profile(&self, url: &str) -> bool {
        self.profiles().iter().any(|p| p == url)
    }

    /// The wire name of the resource type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Resource::Composition(_) => "Composition",
            Resource::Patient(_) => "Patient",
            Resource::Practitioner(_) => "Practitioner",
            Resource::Procedure(_) => "Procedure",
            Resource::Observation(_) => "Observation",
            Resource::Condition(_) => "Condition",
            Resource::RelatedPerson(_) => "RelatedPerson",
            Resource::Location(_) => "Location",
            Resource::Organization(_) => "Organization",
            Resource::List(_) => "List",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::{Concept, SYSTEM_LOINC};

    #[test]
    fn observation_primary_code() {
        let obs = Observation::new(Concept::coded(SYSTEM_LOINC, "69449-7"));
        assert_eq!(obs.primary_code(), Some("69449-7"));

        let mut blank = obs.clone();
        blank.code = None;
        assert_eq!(blank.primary_code(), None);
    }

    #[test]
    fn set_component_replaces_by_code() {
        let mut obs = Observation::new(Concept::coded(SYSTEM_LOINC, "69453-9"));
        let line = Concept::coded(SYSTEM_LOINC, "lineNumber");
        obs.set_component(line.clone(), ObservationValue::Integer(1));
        obs.set_component(line, ObservationValue::Integer(2));
        assert_eq!(obs.components.len(), 1);
        assert_eq!(
            obs.component("lineNumber").unwrap().value,
            Some(ObservationValue::Integer(2))
        );
    }

    #[test]
    fn condition_text_facet() {
        let mut c = Condition::new();
        assert_eq!(c.text(), None);
        c.set_text("Pneumonia");
        assert_eq!(c.text(), Some("Pneumonia"));
        // coded facet survives alongside the text facet
        c.code.as_mut().unwrap().code = Some("J18.9".to_string());
        assert_eq!(c.text(), Some("Pneumonia"));
    }

    #[test]
    fn resource_enum_serde_tag() {
        let r = Resource::Patient(Patient::new());
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"resourceType\":\"Patient\""));
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), r.id());
        assert_eq!(back.type_name(), "Patient");
    }

    #[test]
    fn human_name_rendering() {
        let name = HumanName {
            family: Some("Koury".to_string()),
            given: vec!["Madelyn".to_string(), "Patricia".to_string()],
            suffix: Some("Jr.".to_string()),
        };
        assert_eq!(name.full(), "Madelyn Patricia Koury Jr.");
        assert_eq!(HumanName::default().full(), "");
    }
}
