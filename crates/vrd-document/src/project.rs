//! Scoped sub-bundle projections of a resolved document.
//!
//! A projection copies a fixed, profile-specific allow-list of resolved
//! slots into a fresh collection shell. The shell gets its own id and a
//! distinct profile tag; the parent's identifier block is carried verbatim
//! so the certificate number and auxiliary state id stay traceable across
//! every projection.

use vrd_core::graph::extension::find_extension;
use vrd_core::profiles;
use vrd_core::{Extension, ExtensionValue, GraphKind, Resource, ResourceGraph, ResourceId};

use crate::slots::ResolvedSlots;

/// The scoped document views derivable from a full document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    CauseOfDeathCodedContent,
    DemographicCodedContent,
    MortalityRoster,
}

impl ProjectionKind {
    /// The profile tag the projection shell carries.
    pub fn profile(self) -> &'static str {
        match self {
            ProjectionKind::CauseOfDeathCodedContent => profiles::CAUSE_OF_DEATH_CODED_BUNDLE,
            ProjectionKind::DemographicCodedContent => profiles::DEMOGRAPHIC_CODED_BUNDLE,
            ProjectionKind::MortalityRoster => profiles::MORTALITY_ROSTER_BUNDLE,
        }
    }
}

fn allow_list(slots: &ResolvedSlots, kind: ProjectionKind) -> Vec<ResourceId> {
    let mut ids: Vec<Option<ResourceId>> = Vec::new();
    match kind {
        ProjectionKind::CauseOfDeathCodedContent => {
            ids.extend(slots.cause_part1);
            ids.extend(slots.pathway.iter().copied().map(Some));
            ids.push(slots.contributing);
            ids.extend(slots.entity_axis.iter().copied().map(Some));
            ids.extend(slots.record_axis.iter().copied().map(Some));
            ids.push(slots.manner_of_death);
            ids.push(slots.death_date);
            ids.push(slots.pregnancy_status);
            ids.push(slots.tobacco_use);
            ids.push(slots.injury_incident);
            ids.push(slots.examiner_contacted);
            ids.push(slots.autopsy_performed);
            ids.push(slots.autopsy_results_available);
        }
        ProjectionKind::DemographicCodedContent => {
            ids.push(slots.decedent);
            ids.push(slots.father);
            ids.push(slots.mother);
            ids.push(slots.spouse);
            ids.push(slots.age_at_death);
            ids.push(slots.education_level);
            ids.push(slots.usual_work);
            ids.push(slots.military_service);
            ids.push(slots.birth_record_identifier);
        }
        ProjectionKind::MortalityRoster => {
            ids.push(slots.decedent);
            ids.push(slots.death_date);
            ids.push(slots.death_location);
            ids.push(slots.age_at_death);
        }
    }
    ids.into_iter().flatten().collect()
}

/// Derive a scoped projection from a fully resolved graph.
///
/// `alias_indicator` is caller-supplied (it reflects suppression policy, not
/// authored content) and is attached only to the mortality roster.
pub fn project(
    graph: &ResourceGraph,
    slots: &ResolvedSlots,
    kind: ProjectionKind,
    alias_indicator: bool,
) -> ResourceGraph {
    let mut shell = ResourceGraph::new(GraphKind::Collection);
    shell.profiles.push(kind.profile().to_string());
    shell.identifier = graph.identifier.clone();
    shell.timestamp = graph.timestamp.clone();

    for id in allow_list(slots, kind) {
        if shell.contains(id) {
            continue;
        }
        if let Some(resource) = graph.get(id) {
            shell.push(resource.clone());
        }
    }

    if kind == ProjectionKind::MortalityRoster {
        // Replace-status is authored content, copied from the source
        // composition when present.
        let replace_status = slots
            .composition
            .and_then(|id| match graph.get(id) {
                Some(Resource::Composition(c)) => {
                    find_extension(&c.extensions, profiles::EXT_REPLACE_STATUS).cloned()
                }
                _ => None,
            });
        if let Some(ext) = replace_status {
            shell.extensions.push(ext);
        }
        shell.extensions.push(
            Extension::new(profiles::EXT_ALIAS_STATUS)
                .with_value(ExtensionValue::Boolean(alias_indicator)),
        );
    }

    shell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DeathDocument;
    use crate::pathway::CauseLine;
    use vrd_core::ConceptCatalog;

    fn sample() -> DeathDocument {
        let mut doc = DeathDocument::new(ConceptCatalog::mortality_defaults());
        doc.set_certificate_number("123456");
        doc.set_auxiliary_state_id("AUX-9");
        doc.set_manner_of_death_code("38605008");
        doc.set_death_date_literal("2018-02-19T16:48:06-05:00");
        doc.set_cause_line(0, &CauseLine::new("Sepsis", "2 days"));
        doc.set_contributing_condition_text("Diabetes");
        doc.set_death_location_name("Example Hospital");
        doc.set_death_location_jurisdiction("MA");
        doc
    }

    #[test]
    fn shell_carries_identifier_verbatim_and_own_profile() {
        let doc = sample();
        let projection = doc.project(ProjectionKind::CauseOfDeathCodedContent, false);

        assert_eq!(projection.kind, GraphKind::Collection);
        assert_ne!(projection.id, doc.graph().id);
        assert!(projection.has_profile(profiles::CAUSE_OF_DEATH_CODED_BUNDLE));
        assert!(!projection.has_profile(profiles::DEATH_CERTIFICATE_DOCUMENT));
        assert_eq!(
            projection.identifier.certificate_number.as_deref(),
            Some("123456")
        );
        assert_eq!(projection.identifier.auxiliary_state_id.as_deref(), Some("AUX-9"));
    }

    #[test]
    fn cause_projection_copies_cause_content_only() {
        let doc = sample();
        let projection = doc.project(ProjectionKind::CauseOfDeathCodedContent, false);

        let manner = doc.slots().manner_of_death.unwrap();
        let pathway_condition = doc.slots().pathway[0];
        assert!(projection.contains(manner));
        assert!(projection.contains(pathway_condition));
        // demographic anchors stay out of the cause projection
        assert!(!projection.contains(doc.slots().decedent.unwrap()));
    }

    #[test]
    fn demographic_projection_copies_decedent() {
        let doc = sample();
        let projection = doc.project(ProjectionKind::DemographicCodedContent, false);
        assert!(projection.contains(doc.slots().decedent.unwrap()));
        assert!(!projection.contains(doc.slots().manner_of_death.unwrap()));
    }

    #[test]
    fn roster_carries_flags_as_bundle_metadata() {
        let mut doc = sample();
        doc.set_replace_status("updated");
        let projection = doc.project(ProjectionKind::MortalityRoster, true);

        let replace = find_extension(&projection.extensions, profiles::EXT_REPLACE_STATUS)
            .and_then(|e| e.value.as_ref())
            .and_then(ExtensionValue::as_str);
        assert_eq!(replace, Some("updated"));

        let alias = find_extension(&projection.extensions, profiles::EXT_ALIAS_STATUS)
            .and_then(|e| e.value.as_ref())
            .and_then(ExtensionValue::as_bool);
        assert_eq!(alias, Some(true));
    }

    #[test]
    fn roster_without_replace_status_carries_alias_only() {
        let doc = sample();
        let projection = doc.project(ProjectionKind::MortalityRoster, false);
        assert!(find_extension(&projection.extensions, profiles::EXT_REPLACE_STATUS).is_none());
        let alias = find_extension(&projection.extensions, profiles::EXT_ALIAS_STATUS)
            .and_then(|e| e.value.as_ref())
            .and_then(ExtensionValue::as_bool);
        assert_eq!(alias, Some(false));
    }

    #[test]
    fn absent_slots_are_skipped() {
        let doc = DeathDocument::new(ConceptCatalog::mortality_defaults());
        let projection = doc.project(ProjectionKind::CauseOfDeathCodedContent, false);
        assert!(projection.is_empty());
    }
}
