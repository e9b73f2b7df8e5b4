//! Immutable code-to-display lookup tables.
//!
//! The catalog is constructed explicitly and passed by reference into the
//! builder and the field view; there is no process-wide lookup state.

use std::collections::BTreeMap;

use crate::concept::{
    Concept, SYSTEM_LOCATION_TYPE, SYSTEM_ROLE_CODE, SYSTEM_SNOMED, SYSTEM_YES_NO,
};

/// An immutable (system, code) → display table.
#[derive(Debug, Clone, Default)]
pub struct ConceptCatalog {
    entries: BTreeMap<(String, String), String>,
}

impl ConceptCatalog {
    /// Build a catalog from (system, code, display) rows.
    pub fn new<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let entries = rows
            .into_iter()
            .map(|(system, code, display)| {
                ((system.to_string(), code.to_string()), display.to_string())
            })
            .collect();
        Self { entries }
    }

    /// Display text for a (system, code) pair.
    pub fn display(&self, system: &str, code: &str) -> Option<&str> {
        self.entries
            .get(&(system.to_string(), code.to_string()))
            .map(String::as_str)
    }

    /// Backfill the display text of a concept from the table, when the
    /// concept has a system and code but no display yet.
    pub fn fill_display(&self, concept: &mut Concept) {
        if concept.display.is_some() {
            return;
        }
        if let (Some(system), Some(code)) = (concept.system.as_deref(), concept.code.as_deref()) {
            if let Some(display) = self.display(system, code) {
                concept.display = Some(display.to_string());
            }
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The standard mortality coding rows: manner of death, family
    /// relationships, yes/no indicators, location types.
    pub fn mortality_defaults() -> Self {
        Self::new([
            (SYSTEM_SNOMED, "38605008", "Natural death"),
            (SYSTEM_SNOMED, "7878000", "Accidental death"),
            (SYSTEM_SNOMED, "44301001", "Suicide"),
            (SYSTEM_SNOMED, "27935005", "Homicide"),
            (SYSTEM_SNOMED, "185973002", "Patient awaiting investigation"),
            (SYSTEM_SNOMED, "65037004", "Death, manner undetermined"),
            (SYSTEM_ROLE_CODE, "FTH", "father"),
            (SYSTEM_ROLE_CODE, "MTH", "mother"),
            (SYSTEM_ROLE_CODE, "SPS", "spouse"),
            (SYSTEM_YES_NO, "Y", "Yes"),
            (SYSTEM_YES_NO, "N", "No"),
            (SYSTEM_LOCATION_TYPE, "death", "death location"),
            (SYSTEM_LOCATION_TYPE, "disposition", "disposition location"),
            (SYSTEM_LOCATION_TYPE, "injury", "injury location"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let catalog = ConceptCatalog::mortality_defaults();
        assert_eq!(
            catalog.display(SYSTEM_SNOMED, "38605008"),
            Some("Natural death")
        );
        assert_eq!(catalog.display(SYSTEM_SNOMED, "0"), None);
    }

    #[test]
    fn fill_display_does_not_overwrite() {
        let catalog = ConceptCatalog::mortality_defaults();
        let mut c = Concept::coded(SYSTEM_SNOMED, "44301001").with_display("kept");
        catalog.fill_display(&mut c);
        assert_eq!(c.display.as_deref(), Some("kept"));

        let mut c = Concept::coded(SYSTEM_SNOMED, "44301001");
        catalog.fill_display(&mut c);
        assert_eq!(c.display.as_deref(), Some("Suicide"));
    }

    #[test]
    fn empty_catalog_fills_nothing() {
        let catalog = ConceptCatalog::default();
        assert!(catalog.is_empty());
        let mut c = Concept::coded(SYSTEM_SNOMED, "38605008");
        catalog.fill_display(&mut c);
        assert_eq!(c.display, None);
    }
}
