//! Tri-state partial date/time codec.
//!
//! A date/time on a death record is rarely complete. Each sub-field (year,
//! month, day, and separately time-of-day) is independently in one of three
//! states: known, affirmatively unknown, or simply not supplied yet. The two
//! absent states carry different downstream meaning and must never collapse
//! into each other.
//!
//! On the wire the states live in an extension tree: one sub-part per field,
//! where an absent part carries a data-absent-reason marker (`temp-unknown`
//! or `unknown`). The marker may sit at the part's value position or as a
//! child of the part container; decode reads both.

use std::fmt;

use crate::graph::extension::{
    AbsentReason, Extension, ExtensionValue, URL_DATA_ABSENT_REASON,
};
use crate::graph::resource::ResourceId;
use crate::graph::ResourceGraph;

/// Container url for a partial date (year/month/day).
pub const URL_PARTIAL_DATE: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/PartialDate";

/// Container url for a partial date/time (year/month/day/time).
pub const URL_PARTIAL_DATE_TIME: &str =
    "http://hl7.org/fhir/us/vrdr/StructureDefinition/PartialDateTime";

/// Part url: year.
pub const URL_DATE_YEAR: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/Date-Year";
/// Part url: month.
pub const URL_DATE_MONTH: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/Date-Month";
/// Part url: day.
pub const URL_DATE_DAY: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/Date-Day";
/// Part url: time of day.
pub const URL_DATE_TIME: &str = "http://hl7.org/fhir/us/vrdr/StructureDefinition/Date-Time";

/// One independently-stated sub-field of a partial date/time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialField<T> {
    /// The value was supplied.
    Known(T),
    /// The value was affirmatively declared unknown.
    ExplicitlyUnknown,
    /// The value has not been supplied yet.
    NotYetKnown,
}

impl<T> PartialField<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, PartialField::Known(_))
    }

    /// The known value, if any.
    pub fn known(self) -> Option<T> {
        match self {
            PartialField::Known(v) => Some(v),
            _ => None,
        }
    }
}

/// The date sub-fields of a partial date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    /// The part url within the container extension.
    pub fn url(self) -> &'static str {
        match self {
            DatePart::Year => URL_DATE_YEAR,
            DatePart::Month => URL_DATE_MONTH,
            DatePart::Day => URL_DATE_DAY,
        }
    }
}

/// A fresh partial-date container with every part marked not-yet-known.
pub fn new_partial_date() -> Extension {
    let mut ext = Extension::new(URL_PARTIAL_DATE);
    for part in [DatePart::Year, DatePart::Month, DatePart::Day] {
        set_date_part(&mut ext, part, PartialField::NotYetKnown);
    }
    ext
}

/// A fresh partial-date-time container with every part marked not-yet-known.
pub fn new_partial_date_time() -> Extension {
    let mut ext = Extension::new(URL_PARTIAL_DATE_TIME);
    for part in [DatePart::Year, DatePart::Month, DatePart::Day] {
        set_date_part(&mut ext, part, PartialField::NotYetKnown);
    }
    set_time_part(&mut ext, PartialField::NotYetKnown);
    ext
}

/// The absence marker of a part, read from both admissible positions: the
/// part's value position first, then a data-absent-reason child extension.
fn absence_of(part: &Extension) -> Option<AbsentReason> {
    if let Some(ExtensionValue::Absent(reason)) = part.value {
        return Some(reason);
    }
    part.child(URL_DATA_ABSENT_REASON)
        .and_then(|marker| marker.value.as_ref())
        .and_then(ExtensionValue::as_str)
        .and_then(AbsentReason::from_code)
}

fn decode_part<T>(
    container: &Extension,
    url: &str,
    value_of: impl Fn(&ExtensionValue) -> Option<T>,
) -> PartialField<T> {
    let Some(part) = container.child(url) else {
        return PartialField::NotYetKnown;
    };
    if let Some(v) = part.value.as_ref().and_then(|v| value_of(v)) {
        return PartialField::Known(v);
    }
    match absence_of(part) {
        Some(AbsentReason::Unknown) => PartialField::ExplicitlyUnknown,
        Some(AbsentReason::TempUnknown) | None => PartialField::NotYetKnown,
    }
}

/// Decode a date sub-field from a container extension.
pub fn date_part(container: &Extension, part: DatePart) -> PartialField<u32> {
    decode_part(container, part.url(), |v| {
        v.as_integer().and_then(|n| u32::try_from(n).ok())
    })
}

/// Decode the time-of-day sub-field from a container extension.
pub fn time_part(container: &Extension) -> PartialField<String> {
    decode_part(container, URL_DATE_TIME, |v| v.as_str().map(str::to_string))
}

fn apply_state(part: &mut Extension, value: Option<ExtensionValue>) {
    // Clear any prior absence marker before applying the new state.
    part.remove_child(URL_DATA_ABSENT_REASON);
    part.value = value;
}

/// Encode a date sub-field into a container extension.
pub fn set_date_part(container: &mut Extension, part: DatePart, state: PartialField<u32>) {
    let slot = container.child_or_insert(part.url());
    let value = match state {
        PartialField::Known(n) => ExtensionValue::Integer(i64::from(n)),
        PartialField::ExplicitlyUnknown => ExtensionValue::Absent(AbsentReason::Unknown),
        PartialField::NotYetKnown => ExtensionValue::Absent(AbsentReason::TempUnknown),
    };
    apply_state(slot, Some(value));
}

/// Encode the time-of-day sub-field into a container extension.
///
/// A known time shorter than the 8-character `HH:MM:SS` form is zero-padded.
pub fn set_time_part(container: &mut Extension, state: PartialField<String>) {
    let slot = container.child_or_insert(URL_DATE_TIME);
    let value = match state {
        PartialField::Known(t) => ExtensionValue::Time(pad_time(&t)),
        PartialField::ExplicitlyUnknown => ExtensionValue::Absent(AbsentReason::Unknown),
        PartialField::NotYetKnown => ExtensionValue::Absent(AbsentReason::TempUnknown),
    };
    apply_state(slot, Some(value));
}

/// Zero-pad a time-of-day to `HH:MM:SS`.
pub fn pad_time(time: &str) -> String {
    if time.len() >= 8 {
        return time.to_string();
    }
    let mut parts: Vec<String> = time
        .split(':')
        .map(|p| format!("{p:0>2}"))
        .collect();
    while parts.len() < 3 {
        parts.push("00".to_string());
    }
    parts.truncate(3);
    parts.join(":")
}

// --- Literal readers ---
//
// A conventional date/time literal ("2018-02-19T16:48:06-05:00"), when
// present, takes priority over the partial extension. Sub-fields are sliced
// positionally so the literal's own zone offset is never touched.

/// Read a date sub-field out of a conventional literal.
pub fn literal_date_part(literal: &str, part: DatePart) -> Option<u32> {
    let range = match part {
        DatePart::Year => 0..4,
        DatePart::Month => 5..7,
        DatePart::Day => 8..10,
    };
    literal.get(range).and_then(|s| s.parse().ok())
}

/// Read the `HH:MM:SS` time-of-day out of a conventional literal.
pub fn literal_time(literal: &str) -> Option<String> {
    literal.get(11..19).map(str::to_string)
}

/// Decode a date sub-field with literal priority.
pub fn effective_date_part(
    literal: Option<&str>,
    container: Option<&Extension>,
    part: DatePart,
) -> PartialField<u32> {
    if let Some(n) = literal.and_then(|l| literal_date_part(l, part)) {
        return PartialField::Known(n);
    }
    container.map_or(PartialField::NotYetKnown, |c| date_part(c, part))
}

/// Decode the time-of-day with literal priority.
pub fn effective_time(
    literal: Option<&str>,
    container: Option<&Extension>,
) -> PartialField<String> {
    if let Some(t) = literal.and_then(literal_time) {
        return PartialField::Known(t);
    }
    container.map_or(PartialField::NotYetKnown, time_part)
}

// --- Shape validation ---

/// All shape problems found on one resource's partial date/time extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    pub resource: ResourceId,
    pub problems: Vec<String>,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource {}: {}", self.resource, self.problems.join("; "))
    }
}

fn short_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn check_container(container: &Extension, with_time: bool, problems: &mut Vec<String>) {
    let mut required = vec![URL_DATE_YEAR, URL_DATE_MONTH, URL_DATE_DAY];
    if with_time {
        required.push(URL_DATE_TIME);
    }
    for url in &required {
        if container.child(url).is_none() {
            problems.push(format!(
                "{} is missing its {} part",
                short_url(&container.url),
                short_url(url)
            ));
        }
    }
    for child in &container.extensions {
        if !required.contains(&child.url.as_str()) {
            problems.push(format!(
                "{} has unexpected part {}",
                short_url(&container.url),
                short_url(&child.url)
            ));
        }
    }
}

fn check_tree(extensions: &[Extension], problems: &mut Vec<String>) {
    for ext in extensions {
        match ext.url.as_str() {
            URL_PARTIAL_DATE => check_container(ext, false, problems),
            URL_PARTIAL_DATE_TIME => check_container(ext, true, problems),
            _ => check_tree(&ext.extensions, problems),
        }
    }
}

/// Scan every resource in the graph and collect the shape problems of every
/// partial date/time extension, one violation entry per offending resource.
/// The whole graph is always scanned; nothing short-circuits on the first
/// problem.
pub fn shape_violations(graph: &ResourceGraph) -> Vec<ShapeViolation> {
    let mut violations = Vec::new();
    for resource in graph.resources() {
        let mut problems = Vec::new();
        check_tree(resource.extensions(), &mut problems);
        if !problems.is_empty() {
            violations.push(ShapeViolation {
                resource: resource.id(),
                problems,
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::resource::{Observation, Resource};
    use crate::graph::GraphKind;
    use crate::concept::{Concept, SYSTEM_LOINC};

    #[test]
    fn fresh_container_decodes_not_yet_known() {
        let ext = new_partial_date_time();
        assert_eq!(date_part(&ext, DatePart::Year), PartialField::NotYetKnown);
        assert_eq!(date_part(&ext, DatePart::Month), PartialField::NotYetKnown);
        assert_eq!(date_part(&ext, DatePart::Day), PartialField::NotYetKnown);
        assert_eq!(time_part(&ext), PartialField::NotYetKnown);
    }

    #[test]
    fn missing_part_decodes_not_yet_known() {
        let ext = Extension::new(URL_PARTIAL_DATE_TIME);
        assert_eq!(date_part(&ext, DatePart::Day), PartialField::NotYetKnown);
        assert_eq!(time_part(&ext), PartialField::NotYetKnown);
    }

    #[test]
    fn all_tri_state_combinations_round_trip() {
        let date_states = [
            PartialField::Known(2020u32),
            PartialField::ExplicitlyUnknown,
            PartialField::NotYetKnown,
        ];
        let time_states = [
            PartialField::Known("16:48:06".to_string()),
            PartialField::ExplicitlyUnknown,
            PartialField::NotYetKnown,
        ];
        for year in date_states {
            for month in date_states {
                for day in date_states {
                    for time in &time_states {
                        let mut ext = new_partial_date_time();
                        set_date_part(&mut ext, DatePart::Year, year);
                        set_date_part(&mut ext, DatePart::Month, month);
                        set_date_part(&mut ext, DatePart::Day, day);
                        set_time_part(&mut ext, time.clone());

                        assert_eq!(date_part(&ext, DatePart::Year), year);
                        assert_eq!(date_part(&ext, DatePart::Month), month);
                        assert_eq!(date_part(&ext, DatePart::Day), day);
                        assert_eq!(time_part(&ext), *time);
                    }
                }
            }
        }
    }

    #[test]
    fn explicitly_unknown_does_not_collapse_to_not_yet_known() {
        let mut ext = new_partial_date();
        set_date_part(&mut ext, DatePart::Month, PartialField::ExplicitlyUnknown);
        assert_eq!(date_part(&ext, DatePart::Month), PartialField::ExplicitlyUnknown);
        assert_ne!(
            date_part(&ext, DatePart::Month),
            date_part(&ext, DatePart::Day)
        );
    }

    #[test]
    fn marker_at_part_container_is_read() {
        // Externally-produced input may put the marker on the part container
        // rather than at the value position.
        let part = Extension::new(URL_DATE_YEAR).with_child(
            Extension::new(URL_DATA_ABSENT_REASON)
                .with_value(ExtensionValue::Code("unknown".to_string())),
        );
        let ext = Extension::new(URL_PARTIAL_DATE).with_child(part);
        assert_eq!(date_part(&ext, DatePart::Year), PartialField::ExplicitlyUnknown);
    }

    #[test]
    fn encode_clears_prior_container_marker() {
        let part = Extension::new(URL_DATE_YEAR).with_child(
            Extension::new(URL_DATA_ABSENT_REASON)
                .with_value(ExtensionValue::Code("temp-unknown".to_string())),
        );
        let mut ext = Extension::new(URL_PARTIAL_DATE).with_child(part);
        set_date_part(&mut ext, DatePart::Year, PartialField::Known(1999));
        let year = ext.child(URL_DATE_YEAR).unwrap();
        assert!(year.child(URL_DATA_ABSENT_REASON).is_none());
        assert_eq!(date_part(&ext, DatePart::Year), PartialField::Known(1999));
    }

    #[test]
    fn time_is_zero_padded_on_encode() {
        let mut ext = new_partial_date_time();
        set_time_part(&mut ext, PartialField::Known("9:5".to_string()));
        assert_eq!(time_part(&ext), PartialField::Known("09:05:00".to_string()));

        set_time_part(&mut ext, PartialField::Known("16:48:06".to_string()));
        assert_eq!(time_part(&ext), PartialField::Known("16:48:06".to_string()));
    }

    #[test]
    fn literal_takes_priority_and_keeps_offset_slices() {
        let literal = "2018-02-19T16:48:06-05:00";
        let mut ext = new_partial_date_time();
        set_date_part(&mut ext, DatePart::Year, PartialField::Known(1111));

        assert_eq!(
            effective_date_part(Some(literal), Some(&ext), DatePart::Year),
            PartialField::Known(2018)
        );
        assert_eq!(
            effective_date_part(Some(literal), Some(&ext), DatePart::Month),
            PartialField::Known(2)
        );
        assert_eq!(
            effective_date_part(Some(literal), Some(&ext), DatePart::Day),
            PartialField::Known(19)
        );
        assert_eq!(
            effective_time(Some(literal), Some(&ext)),
            PartialField::Known("16:48:06".to_string())
        );
    }

    #[test]
    fn extension_is_the_fallback_without_literal() {
        let mut ext = new_partial_date_time();
        set_date_part(&mut ext, DatePart::Year, PartialField::Known(2004));
        assert_eq!(
            effective_date_part(None, Some(&ext), DatePart::Year),
            PartialField::Known(2004)
        );
        assert_eq!(
            effective_time(None, Some(&ext)),
            PartialField::NotYetKnown
        );
    }

    #[test]
    fn date_only_literal_has_no_time() {
        assert_eq!(literal_time("2018-02-19"), None);
        assert_eq!(literal_date_part("2018-02-19", DatePart::Day), Some(19));
    }

    #[test]
    fn shape_violations_are_aggregated_per_resource() {
        let mut graph = ResourceGraph::new(GraphKind::Document);

        // One observation with a container missing two parts and carrying an
        // unexpected one.
        let mut bad = Observation::new(Concept::coded(SYSTEM_LOINC, "81956-5"));
        let mut container = Extension::new(URL_PARTIAL_DATE_TIME);
        set_date_part(&mut container, DatePart::Year, PartialField::Known(2020));
        container
            .extensions
            .push(Extension::new("http://example.org/unrelated"));
        bad.extensions.push(container);
        let bad_id = bad.id;
        graph.push(Resource::Observation(bad));

        // One well-formed observation.
        let mut good = Observation::new(Concept::coded(SYSTEM_LOINC, "81956-5"));
        good.extensions.push(new_partial_date_time());
        graph.push(Resource::Observation(good));

        let violations = shape_violations(&graph);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].resource, bad_id);
        // month, day, time missing + one unexpected part
        assert_eq!(violations[0].problems.len(), 4);
    }

    #[test]
    fn well_formed_graph_passes_shape_check() {
        let mut graph = ResourceGraph::new(GraphKind::Document);
        let mut obs = Observation::new(Concept::coded(SYSTEM_LOINC, "81956-5"));
        obs.extensions.push(new_partial_date_time());
        graph.push(Resource::Observation(obs));
        assert!(shape_violations(&graph).is_empty());
    }

    #[test]
    fn pad_time_variants() {
        assert_eq!(pad_time("9"), "09:00:00");
        assert_eq!(pad_time("16:48"), "16:48:00");
        assert_eq!(pad_time("16:48:06"), "16:48:06");
    }
}
