//! The flat, category-organized field view.
//!
//! An explicit, ordered schema table maps field keys to accessor pairs over
//! the document. The table is plain data iterated directly; nothing here
//! inspects types at runtime. Only the representative field set is tabled;
//! the full per-field accessor surface lives with application code.

use std::fmt;

use vrd_core::HumanName;
use vrd_core::PartialField;

use crate::builder::DeathDocument;

/// The category a field is grouped under in the flat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Identity,
    Demographics,
    Investigation,
    Certification,
    Disposition,
}

impl FieldCategory {
    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::Identity => "Identity",
            FieldCategory::Demographics => "Demographics",
            FieldCategory::Investigation => "Death Investigation",
            FieldCategory::Certification => "Death Certification",
            FieldCategory::Disposition => "Decedent Disposition",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The value shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Code,
    Date,
    Time,
}

/// One row of the schema table: key, category, value kind, accessor pair.
pub struct FieldSpec {
    pub key: &'static str,
    pub category: FieldCategory,
    pub kind: FieldKind,
    pub read: fn(&DeathDocument) -> Option<String>,
    pub write: fn(&mut DeathDocument, &str),
}

/// A read-out field: key, category and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub key: &'static str,
    pub category: FieldCategory,
    pub value: Option<String>,
}

// --- Readers and writers ---

fn name_string(name: Option<&HumanName>) -> Option<String> {
    name.map(HumanName::full).filter(|s| !s.is_empty())
}

/// Parse "Given [Middle...] Family" into a structured name; the last token
/// is the family name.
fn parse_name(value: &str) -> HumanName {
    let mut tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    let family = tokens.pop();
    HumanName {
        family,
        given: tokens,
        suffix: None,
    }
}

fn read_certificate_number(doc: &DeathDocument) -> Option<String> {
    doc.certificate_number().map(str::to_string)
}

fn write_certificate_number(doc: &mut DeathDocument, value: &str) {
    doc.set_certificate_number(value);
}

fn read_auxiliary_state_id(doc: &DeathDocument) -> Option<String> {
    doc.auxiliary_state_id().map(str::to_string)
}

fn write_auxiliary_state_id(doc: &mut DeathDocument, value: &str) {
    doc.set_auxiliary_state_id(value);
}

fn read_replace_status(doc: &DeathDocument) -> Option<String> {
    doc.replace_status().map(str::to_string)
}

fn write_replace_status(doc: &mut DeathDocument, value: &str) {
    doc.set_replace_status(value);
}

fn read_decedent_name(doc: &DeathDocument) -> Option<String> {
    name_string(doc.decedent_name())
}

fn write_decedent_name(doc: &mut DeathDocument, value: &str) {
    doc.set_decedent_name(parse_name(value));
}

fn read_father_name(doc: &DeathDocument) -> Option<String> {
    name_string(doc.father_name())
}

fn write_father_name(doc: &mut DeathDocument, value: &str) {
    doc.set_father_name(parse_name(value));
}

fn read_mother_name(doc: &DeathDocument) -> Option<String> {
    name_string(doc.mother_name())
}

fn write_mother_name(doc: &mut DeathDocument, value: &str) {
    doc.set_mother_name(parse_name(value));
}

fn read_spouse_name(doc: &DeathDocument) -> Option<String> {
    name_string(doc.spouse_name())
}

fn write_spouse_name(doc: &mut DeathDocument, value: &str) {
    doc.set_spouse_name(parse_name(value));
}

fn read_date_of_death(doc: &DeathDocument) -> Option<String> {
    doc.death_date_literal().map(str::to_string)
}

fn write_date_of_death(doc: &mut DeathDocument, value: &str) {
    doc.set_death_date_literal(value);
}

fn read_time_of_death(doc: &DeathDocument) -> Option<String> {
    doc.death_time().known()
}

fn write_time_of_death(doc: &mut DeathDocument, value: &str) {
    doc.set_death_time(PartialField::Known(value.to_string()));
}

fn read_death_location_name(doc: &DeathDocument) -> Option<String> {
    doc.death_location_name().map(str::to_string)
}

fn write_death_location_name(doc: &mut DeathDocument, value: &str) {
    doc.set_death_location_name(value);
}

fn read_death_location_jurisdiction(doc: &DeathDocument) -> Option<String> {
    doc.death_location_jurisdiction().map(str::to_string)
}

fn write_death_location_jurisdiction(doc: &mut DeathDocument, value: &str) {
    doc.set_death_location_jurisdiction(value);
}

fn read_injury_location_name(doc: &DeathDocument) -> Option<String> {
    doc.injury_location_name().map(str::to_string)
}

fn write_injury_location_name(doc: &mut DeathDocument, value: &str) {
    doc.set_injury_location_name(value);
}

fn read_manner_of_death(doc: &DeathDocument) -> Option<String> {
    doc.manner_of_death()
        .and_then(|c| c.primary_code())
        .map(str::to_string)
}

fn write_manner_of_death(doc: &mut DeathDocument, value: &str) {
    doc.set_manner_of_death_code(value);
}

fn read_certifier_name(doc: &DeathDocument) -> Option<String> {
    name_string(doc.certifier_name())
}

fn write_certifier_name(doc: &mut DeathDocument, value: &str) {
    doc.set_certifier_name(parse_name(value));
}

fn read_contributing_condition(doc: &DeathDocument) -> Option<String> {
    doc.contributing_condition_text().map(str::to_string)
}

fn write_contributing_condition(doc: &mut DeathDocument, value: &str) {
    doc.set_contributing_condition_text(value);
}

fn read_funeral_home_name(doc: &DeathDocument) -> Option<String> {
    doc.funeral_home_name().map(str::to_string)
}

fn write_funeral_home_name(doc: &mut DeathDocument, value: &str) {
    doc.set_funeral_home_name(value);
}

/// The ordered schema table.
pub const FIELD_TABLE: &[FieldSpec] = &[
    FieldSpec {
        key: "certificateNumber",
        category: FieldCategory::Identity,
        kind: FieldKind::Text,
        read: read_certificate_number,
        write: write_certificate_number,
    },
    FieldSpec {
        key: "auxiliaryStateId",
        category: FieldCategory::Identity,
        kind: FieldKind::Text,
        read: read_auxiliary_state_id,
        write: write_auxiliary_state_id,
    },
    FieldSpec {
        key: "replaceStatus",
        category: FieldCategory::Identity,
        kind: FieldKind::Code,
        read: read_replace_status,
        write: write_replace_status,
    },
    FieldSpec {
        key: "decedentName",
        category: FieldCategory::Demographics,
        kind: FieldKind::Text,
        read: read_decedent_name,
        write: write_decedent_name,
    },
    FieldSpec {
        key: "fatherName",
        category: FieldCategory::Demographics,
        kind: FieldKind::Text,
        read: read_father_name,
        write: write_father_name,
    },
    FieldSpec {
        key: "motherName",
        category: FieldCategory::Demographics,
        kind: FieldKind::Text,
        read: read_mother_name,
        write: write_mother_name,
    },
    FieldSpec {
        key: "spouseName",
        category: FieldCategory::Demographics,
        kind: FieldKind::Text,
        read: read_spouse_name,
        write: write_spouse_name,
    },
    FieldSpec {
        key: "dateOfDeath",
        category: FieldCategory::Investigation,
        kind: FieldKind::Date,
        read: read_date_of_death,
        write: write_date_of_death,
    },
    FieldSpec {
        key: "timeOfDeath",
        category: FieldCategory::Investigation,
        kind: FieldKind::Time,
        read: read_time_of_death,
        write: write_time_of_death,
    },
    FieldSpec {
        key: "deathLocationName",
        category: FieldCategory::Investigation,
        kind: FieldKind::Text,
        read: read_death_location_name,
        write: write_death_location_name,
    },
    FieldSpec {
        key: "deathLocationJurisdiction",
        category: FieldCategory::Investigation,
        kind: FieldKind::Text,
        read: read_death_location_jurisdiction,
        write: write_death_location_jurisdiction,
    },
    FieldSpec {
        key: "injuryLocationName",
        category: FieldCategory::Investigation,
        kind: FieldKind::Text,
        read: read_injury_location_name,
        write: write_injury_location_name,
    },
    FieldSpec {
        key: "mannerOfDeath",
        category: FieldCategory::Certification,
        kind: FieldKind::Code,
        read: read_manner_of_death,
        write: write_manner_of_death,
    },
    FieldSpec {
        key: "certifierName",
        category: FieldCategory::Certification,
        kind: FieldKind::Text,
        read: read_certifier_name,
        write: write_certifier_name,
    },
    FieldSpec {
        key: "contributingCondition",
        category: FieldCategory::Certification,
        kind: FieldKind::Text,
        read: read_contributing_condition,
        write: write_contributing_condition,
    },
    FieldSpec {
        key: "funeralHomeName",
        category: FieldCategory::Disposition,
        kind: FieldKind::Text,
        read: read_funeral_home_name,
        write: write_funeral_home_name,
    },
];

/// Read every tabled field in table order.
pub fn describe(doc: &DeathDocument) -> Vec<FieldValue> {
    FIELD_TABLE
        .iter()
        .map(|spec| FieldValue {
            key: spec.key,
            category: spec.category,
            value: (spec.read)(doc),
        })
        .collect()
}

/// Write a field by key. Returns false for unknown keys.
pub fn write_field(doc: &mut DeathDocument, key: &str, value: &str) -> bool {
    match FIELD_TABLE.iter().find(|spec| spec.key == key) {
        Some(spec) => {
            (spec.write)(doc, value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrd_core::ConceptCatalog;

    fn doc() -> DeathDocument {
        DeathDocument::new(ConceptCatalog::mortality_defaults())
    }

    #[test]
    fn keys_are_unique() {
        for (i, spec) in FIELD_TABLE.iter().enumerate() {
            assert!(
                !FIELD_TABLE[i + 1..].iter().any(|s| s.key == spec.key),
                "duplicate field key {}",
                spec.key
            );
        }
    }

    #[test]
    fn describe_follows_table_order() {
        let view = describe(&doc());
        let keys: Vec<_> = view.iter().map(|f| f.key).collect();
        let table_keys: Vec<_> = FIELD_TABLE.iter().map(|s| s.key).collect();
        assert_eq!(keys, table_keys);
    }

    #[test]
    fn writes_reflect_in_the_view() {
        let mut doc = doc();
        assert!(write_field(&mut doc, "certificateNumber", "42"));
        assert!(write_field(&mut doc, "mannerOfDeath", "38605008"));
        assert!(write_field(&mut doc, "decedentName", "Madelyn Patricia Koury"));
        assert!(!write_field(&mut doc, "noSuchField", "x"));

        let view = describe(&doc);
        let get = |key: &str| {
            view.iter()
                .find(|f| f.key == key)
                .and_then(|f| f.value.clone())
        };
        assert_eq!(get("certificateNumber").as_deref(), Some("42"));
        assert_eq!(get("mannerOfDeath").as_deref(), Some("38605008"));
        assert_eq!(get("decedentName").as_deref(), Some("Madelyn Patricia Koury"));
        assert_eq!(get("funeralHomeName"), None);
    }

    #[test]
    fn name_parsing_splits_family_from_given() {
        let name = parse_name("Madelyn Patricia Koury");
        assert_eq!(name.family.as_deref(), Some("Koury"));
        assert_eq!(name.given, vec!["Madelyn", "Patricia"]);
    }

    #[test]
    fn categories_group_fields() {
        let view = describe(&doc());
        assert!(view
            .iter()
            .any(|f| f.category == FieldCategory::Investigation));
        assert!(view.iter().any(|f| f.category == FieldCategory::Disposition));

        // categories form contiguous runs: once one ends it never recurs
        let mut seen = Vec::new();
        for field in &view {
            if seen.last() != Some(&field.category) {
                assert!(
                    !seen.contains(&field.category),
                    "category {:?} appears in two separate runs",
                    field.category
                );
                seen.push(field.category);
            }
        }
    }
}
