//! The fixed-capacity ordered cause-of-death pathway.
//!
//! Part I of the certificate is an ordered causal chain of up to ten
//! conditions held in a backing list resource; the single contributing
//! condition (Part II) is structurally distinguished only by *not* being
//! referenced from that list. Classification is therefore two-pass: resolve
//! the pathway first, then everything left over is contributing.

use vrd_core::profiles;
use vrd_core::{
    Concept, Condition, ListEntry, ListResource, Reference, Resource, ResourceGraph, ResourceId,
};

/// Number of pathway slots (lines a through j).
pub const PATHWAY_CAPACITY: usize = 10;

/// The three facets of one cause line: written text, onset-to-death
/// interval, and an optional coded cause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CauseLine {
    pub text: Option<String>,
    pub interval: Option<String>,
    pub code: Option<Concept>,
}

impl CauseLine {
    /// A line with text and interval, the common certificate entry.
    pub fn new(text: &str, interval: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            interval: Some(interval.to_string()),
            code: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.interval.is_none() && self.code.is_none()
    }
}

/// Find the pathway list in a graph, if one exists.
pub(crate) fn find_list(graph: &ResourceGraph) -> Option<&ListResource> {
    graph
        .lists()
        .find(|l| l.profiles.iter().any(|p| p == profiles::CAUSE_OF_DEATH_PATHWAY))
}

/// Create the backing pathway list if the graph has none yet; returns its id.
pub(crate) fn ensure_list(graph: &mut ResourceGraph) -> ResourceId {
    if let Some(list) = find_list(graph) {
        return list.id;
    }
    let mut list = ListResource::new();
    list.profiles.push(profiles::CAUSE_OF_DEATH_PATHWAY.to_string());
    let id = list.id;
    graph.push(Resource::List(list));
    id
}

fn pad_entries(list: &mut ListResource) {
    while list.entries.len() < PATHWAY_CAPACITY {
        list.entries.push(ListEntry::default());
    }
}

/// Write one pathway slot.
///
/// The backing sequence is padded to the full capacity of empty placeholders
/// first, then the condition reference is installed at the slot's fixed
/// index. The condition itself is created lazily on the first facet write;
/// later writes mutate it in place. Returns the condition id.
///
/// # Panics
///
/// Panics when `index >= PATHWAY_CAPACITY`; appending beyond the fixed
/// capacity is disallowed.
pub(crate) fn set_line(
    graph: &mut ResourceGraph,
    list_id: ResourceId,
    index: usize,
    line: &CauseLine,
    subject: Option<Reference>,
) -> ResourceId {
    assert!(
        index < PATHWAY_CAPACITY,
        "cause pathway slot {index} out of range"
    );

    let existing = match graph.get(list_id) {
        Some(Resource::List(list)) => list
            .entries
            .get(index)
            .and_then(|e| e.item.as_ref())
            .and_then(Reference::target_id)
            .filter(|id| matches!(graph.get(*id), Some(Resource::Condition(_)))),
        _ => None,
    };

    let condition_id = match existing {
        Some(id) => id,
        None => {
            let mut condition = Condition::new();
            condition
                .profiles
                .push(profiles::CAUSE_OF_DEATH_CONDITION.to_string());
            condition.subject = subject;
            let id = condition.id;
            graph.push(Resource::Condition(condition));
            if let Some(Resource::List(list)) = graph.get_mut(list_id) {
                pad_entries(list);
                list.entries[index].item = Some(Reference::urn(id));
            }
            id
        }
    };

    if let Some(Resource::Condition(condition)) = graph.get_mut(condition_id) {
        if let Some(text) = &line.text {
            condition.set_text(text);
        }
        if let Some(interval) = &line.interval {
            condition.onset = Some(interval.clone());
        }
        if let Some(code) = &line.code {
            let kept_text = condition.text().map(str::to_string);
            let mut merged = code.clone();
            if merged.text.is_none() {
                merged.text = kept_text;
            }
            condition.code = Some(merged);
        }
    }
    condition_id
}

fn line_of(condition: &Condition) -> CauseLine {
    let text = condition.text().map(str::to_string);
    let code = condition.code.clone().and_then(|mut c| {
        c.text = None;
        if c.primary_code().is_none() {
            None
        } else {
            Some(c)
        }
    });
    CauseLine {
        text,
        interval: condition.onset.clone(),
        code,
    }
}

/// The pathway conditions in slot order, compacted: empty slots and dangling
/// references are skipped, never surfaced as interior gaps.
pub(crate) fn condition_ids(graph: &ResourceGraph, list: &ListResource) -> Vec<ResourceId> {
    list.entries
        .iter()
        .filter_map(|e| e.item.as_ref())
        .filter_map(Reference::target_id)
        .filter(|id| matches!(graph.get(*id), Some(Resource::Condition(_))))
        .collect()
}

/// Read the compacted cause lines.
pub(crate) fn lines(graph: &ResourceGraph, list_id: ResourceId) -> Vec<CauseLine> {
    let Some(Resource::List(list)) = graph.get(list_id) else {
        return Vec::new();
    };
    condition_ids(graph, list)
        .into_iter()
        .filter_map(|id| match graph.get(id) {
            Some(Resource::Condition(c)) => Some(line_of(c)),
            _ => None,
        })
        .collect()
}

/// Two-pass condition classification.
///
/// Pass one resolves the pathway's referenced conditions in slot order; pass
/// two collects every remaining condition in bundle order. The caller
/// decides what the leftovers mean (one is the contributing condition, more
/// is a cardinality violation).
pub(crate) fn classify(
    graph: &ResourceGraph,
    list: Option<&ListResource>,
) -> (Vec<ResourceId>, Vec<ResourceId>) {
    let pathway = list.map_or_else(Vec::new, |l| condition_ids(graph, l));
    let leftovers = graph
        .conditions()
        .map(|c| c.id)
        .filter(|id| !pathway.contains(id))
        .collect();
    (pathway, leftovers)
}
