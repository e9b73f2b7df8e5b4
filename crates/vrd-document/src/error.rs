//! Document-level error taxonomy.
//!
//! Resolution either fully succeeds or fully fails: every variant here is
//! raised synchronously while constructing a document from input, and the
//! aggregated variants render one human-readable message listing every
//! problem found, so a caller gets a single review-and-fix cycle.

use thiserror::Error;

use vrd_core::{ResourceId, ShapeViolation};

fn join_problems(problems: &[String]) -> String {
    let lines: Vec<String> = problems.iter().map(|p| format!("  - {p}")).collect();
    format!(
        "{} structural problem(s) found:\n{}",
        problems.len(),
        lines.join("\n")
    )
}

fn join_shapes(violations: &[ShapeViolation]) -> String {
    let lines: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
    format!(
        "malformed partial date extension(s) on {} resource(s):\n{}",
        violations.len(),
        lines.join("\n")
    )
}

/// Errors raised while parsing or resolving a document graph.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input bytes could not be decoded into a resource graph at all.
    #[error("structural parse error: {0}")]
    Parse(String),

    /// Joined pre-validation (or multi-problem resolution) findings.
    #[error("{}", join_problems(.0))]
    Validation(Vec<String>),

    /// A full document without its table-of-contents resource.
    #[error("document bundle contains no Composition")]
    MissingComposition,

    /// A full document whose composition subject does not resolve to a
    /// decedent.
    #[error("composition subject does not resolve to a Decedent")]
    MissingSubject,

    /// An observation without its primary classifying code.
    #[error("observation {0} is missing its primary code")]
    MissingObservationCode(ResourceId),

    /// A related person without a relationship code.
    #[error("related person {0} is missing its relationship code")]
    MissingRelationshipCode(ResourceId),

    /// More conditions outside the cause pathway than the single supported
    /// contributing slot.
    #[error("{0} conditions outside the cause-of-death pathway; at most one contributing condition is supported")]
    ContributingConditionCardinality(usize),

    /// Malformed partial date/time extensions, one entry per offending
    /// resource.
    #[error("{}", join_shapes(.0))]
    PartialDateShape(Vec<ShapeViolation>),

    /// The graph could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn validation_lists_every_problem() {
        let err = DocumentError::Validation(vec![
            "first problem".to_string(),
            "second problem".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("2 structural problem(s)"));
        assert!(msg.contains("first problem"));
        assert!(msg.contains("second problem"));
    }

    #[test]
    fn shape_error_names_resources() {
        let id = Uuid::new_v4();
        let err = DocumentError::PartialDateShape(vec![ShapeViolation {
            resource: id,
            problems: vec!["PartialDate is missing its Date-Day part".to_string()],
        }]);
        let msg = err.to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("Date-Day"));
    }

    #[test]
    fn typed_errors_name_the_resource() {
        let id = Uuid::new_v4();
        assert!(DocumentError::MissingObservationCode(id)
            .to_string()
            .contains(&id.to_string()));
        assert!(DocumentError::ContributingConditionCardinality(2)
            .to_string()
            .starts_with("2 conditions"));
    }
}
