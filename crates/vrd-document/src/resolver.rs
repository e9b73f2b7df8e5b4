//! Classification of an untrusted resource graph into typed slots.
//!
//! Input graphs come from outside the builder's invariants; the resolver
//! never creates resources, only classifies and cross-links the ones that
//! exist. The whole graph is scanned before any error surfaces, so every
//! structural problem is reported in one pass.

use vrd_core::partial::{effective_date_part, shape_violations, DatePart, URL_PARTIAL_DATE_TIME};
use vrd_core::graph::extension::find_extension;
use vrd_core::profiles;
use vrd_core::{Observation, ObservationValue, Resource, ResourceGraph};

use crate::error::DocumentError;
use crate::pathway;
use crate::slots::{
    classify_observation_code, DocumentKind, ObservationSlot, ResolvedSlots,
    LINE_NUMBER_COMPONENT,
};

/// Resolve a raw graph into typed slots.
///
/// Full documents (declared by the graph's own profile tag) get the strict
/// checks: a composition must exist and its subject must resolve to a
/// decedent. Scoped projections skip both. Missing attesters are tolerated
/// in every mode.
pub fn resolve(graph: &ResourceGraph) -> Result<ResolvedSlots, DocumentError> {
    let kind = if graph.has_profile(profiles::DEATH_CERTIFICATE_DOCUMENT) {
        DocumentKind::Full
    } else {
        DocumentKind::Scoped
    };
    let mut slots = ResolvedSlots::new(kind);
    let mut problems: Vec<DocumentError> = Vec::new();

    resolve_anchors(graph, &mut slots, &mut problems);
    classify_entries(graph, &mut slots, &mut problems);
    classify_conditions(graph, &mut slots, &mut problems);

    let violations = shape_violations(graph);
    if !violations.is_empty() {
        problems.push(DocumentError::PartialDateShape(violations));
    }

    match problems.len() {
        0 => {}
        1 => return Err(problems.pop().expect("one problem")),
        _ => {
            return Err(DocumentError::Validation(
                problems.iter().map(ToString::to_string).collect(),
            ))
        }
    }

    if kind == DocumentKind::Full {
        slots.display_identifier = Some(display_identifier(graph, &slots));
    }
    Ok(slots)
}

fn resolve_anchors(
    graph: &ResourceGraph,
    slots: &mut ResolvedSlots,
    problems: &mut Vec<DocumentError>,
) {
    let composition = graph.composition();
    match composition {
        Some(c) => slots.composition = Some(c.id),
        None if slots.kind == DocumentKind::Full => {
            problems.push(DocumentError::MissingComposition)
        }
        None => {}
    }

    if let Some(composition) = composition {
        // Subject → decedent. Matching accepts the full urn or the
        // reference's trailing id segment.
        slots.decedent = composition
            .subject
            .as_ref()
            .and_then(|r| r.target_id())
            .filter(|id| matches!(graph.get(*id), Some(Resource::Patient(_))));

        // Attester → certifier. A dangling or absent attester is tolerated
        // even for full documents; the slot just stays empty.
        slots.certifier = composition
            .attester
            .as_ref()
            .and_then(|r| r.target_id())
            .filter(|id| matches!(graph.get(*id), Some(Resource::Practitioner(_))));
    }

    // The subject can only be judged when there is a composition to hold
    // it; a missing composition is already its own error.
    if slots.kind == DocumentKind::Full && composition.is_some() && slots.decedent.is_none() {
        problems.push(DocumentError::MissingSubject);
    }
    if slots.kind == DocumentKind::Scoped && slots.decedent.is_none() {
        // Scoped bundles carry no composition; the decedent, when copied
        // into the projection, is found directly.
        slots.decedent = graph.resources().find_map(|r| match r {
            Resource::Patient(p) => Some(p.id),
            _ => None,
        });
    }
}

fn classify_entries(
    graph: &ResourceGraph,
    slots: &mut ResolvedSlots,
    problems: &mut Vec<DocumentError>,
) {
    for resource in graph.resources() {
        match resource {
            Resource::Observation(obs) => classify_observation(obs, slots, problems),
            Resource::RelatedPerson(person) => match person.relationship_code() {
                None => problems.push(DocumentError::MissingRelationshipCode(person.id)),
                Some("FTH") => assign_first(&mut slots.father, person.id),
                Some("MTH") => assign_first(&mut slots.mother, person.id),
                Some("SPS") => assign_first(&mut slots.spouse, person.id),
                Some(other) => log::debug!("ignoring related person with relationship {other}"),
            },
            Resource::Location(location) => {
                // Untyped locations are skipped without error.
                match location.kind.as_ref().and_then(|k| k.primary_code()) {
                    Some("death") => assign_first(&mut slots.death_location, location.id),
                    Some("disposition") => {
                        assign_first(&mut slots.disposition_location, location.id)
                    }
                    Some("injury") => assign_first(&mut slots.injury_location, location.id),
                    Some(other) => log::debug!("ignoring location typed {other}"),
                    None => {}
                }
            }
            Resource::Procedure(procedure) => {
                assign_first(&mut slots.certification, procedure.id)
            }
            Resource::List(list) => {
                if list
                    .profiles
                    .iter()
                    .any(|p| p == profiles::CAUSE_OF_DEATH_PATHWAY)
                {
                    assign_first(&mut slots.pathway_list, list.id);
                }
            }
            Resource::Organization(org) => {
                if org.profiles.iter().any(|p| p == profiles::FUNERAL_HOME) {
                    assign_first(&mut slots.funeral_home, org.id);
                }
            }
            // Anchors are resolved through composition references;
            // conditions get their own two-pass classification.
            Resource::Composition(_)
            | Resource::Patient(_)
            | Resource::Practitioner(_)
            | Resource::Condition(_) => {}
        }
    }
}

fn classify_observation(
    obs: &Observation,
    slots: &mut ResolvedSlots,
    problems: &mut Vec<DocumentError>,
) {
    let Some(code) = obs.primary_code() else {
        problems.push(DocumentError::MissingObservationCode(obs.id));
        return;
    };
    match classify_observation_code(code) {
        Some(ObservationSlot::CauseOfDeathPart1) => {
            let line = obs
                .component(LINE_NUMBER_COMPONENT)
                .and_then(|c| c.value.as_ref())
                .and_then(|v| match v {
                    ObservationValue::Integer(n) => Some(*n),
                    _ => None,
                });
            match line {
                Some(n @ 1..=4) => {
                    assign_first(&mut slots.cause_part1[(n - 1) as usize], obs.id)
                }
                _ => log::debug!("ignoring cause observation {} without a line number 1-4", obs.id),
            }
        }
        // Axis lists accumulate in original bundle order.
        Some(ObservationSlot::EntityAxisCause) => slots.entity_axis.push(obs.id),
        Some(ObservationSlot::RecordAxisCause) => slots.record_axis.push(obs.id),
        Some(slot) => slots.assign(slot, obs.id),
        None => log::debug!("ignoring unrecognized observation code {code}"),
    }
}

fn classify_conditions(
    graph: &ResourceGraph,
    slots: &mut ResolvedSlots,
    problems: &mut Vec<DocumentError>,
) {
    let list = slots.pathway_list.and_then(|id| match graph.get(id) {
        Some(Resource::List(l)) => Some(l),
        _ => None,
    });
    let (resolved, leftovers) = pathway::classify(graph, list);
    slots.pathway = resolved;
    match leftovers.len() {
        0 => {}
        1 => slots.contributing = Some(leftovers[0]),
        n => problems.push(DocumentError::ContributingConditionCardinality(n)),
    }
}

fn assign_first(slot: &mut Option<vrd_core::ResourceId>, id: vrd_core::ResourceId) {
    if let Some(existing) = slot {
        log::warn!("slot already bound to {existing}; ignoring duplicate {id}");
    } else {
        *slot = Some(id);
    }
}

/// Recompute the derived display identifier of a full document from its
/// constituent parts: death year, death location jurisdiction and the
/// zero-padded certificate number, with placeholder fallbacks.
fn display_identifier(graph: &ResourceGraph, slots: &ResolvedSlots) -> String {
    let year = slots
        .death_date
        .and_then(|id| match graph.get(id) {
            Some(Resource::Observation(o)) => {
                let literal = o.value.as_ref().and_then(ObservationValue::as_date_time);
                let ext = find_extension(&o.extensions, URL_PARTIAL_DATE_TIME);
                effective_date_part(literal, ext, DatePart::Year).known()
            }
            _ => None,
        })
        .map_or_else(|| "0000".to_string(), |y| format!("{y:04}"));

    let jurisdiction = slots
        .death_location
        .and_then(|id| match graph.get(id) {
            Some(Resource::Location(l)) => l
                .address
                .as_ref()
                .and_then(|a| a.state.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "XX".to_string());

    let number = graph
        .identifier
        .certificate_number
        .as_deref()
        .filter(|n| !n.is_empty())
        .map_or_else(|| "000000".to_string(), |n| format!("{n:0>6}"));

    format!("{year}{jurisdiction}{number}")
}
