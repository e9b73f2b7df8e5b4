//! Weak resolve-by-id pointers between resources in the same graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resource::ResourceId;

/// A reference to another resource in the same graph.
///
/// Carries either the `urn:uuid:<id>` form (used for entry full-urls) or the
/// `<Type>/<id>` form. Resolution is lookup by id, never ownership: a
/// reference may dangle, and callers decide whether that is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    /// A `urn:uuid:<id>` reference.
    pub fn urn(id: ResourceId) -> Self {
        Self {
            reference: format!("urn:uuid:{id}"),
        }
    }

    /// A `<Type>/<id>` reference.
    pub fn typed(resource_type: &str, id: ResourceId) -> Self {
        Self {
            reference: format!("{resource_type}/{id}"),
        }
    }

    /// Parse the target resource id out of either reference form.
    ///
    /// For the typed form the trailing path segment is taken, so
    /// `Practitioner/abc...` and `urn:uuid:abc...` resolve identically.
    pub fn target_id(&self) -> Option<ResourceId> {
        let tail = self
            .reference
            .strip_prefix("urn:uuid:")
            .unwrap_or_else(|| self.reference.rsplit('/').next().unwrap_or(""));
        Uuid::parse_str(tail).ok()
    }

    /// Whether this reference points at the given resource id.
    pub fn points_to(&self, id: ResourceId) -> bool {
        self.target_id() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urn_form_round_trip() {
        let id = Uuid::new_v4();
        let r = Reference::urn(id);
        assert_eq!(r.target_id(), Some(id));
        assert!(r.points_to(id));
    }

    #[test]
    fn typed_form_takes_trailing_segment() {
        let id = Uuid::new_v4();
        let r = Reference::typed("Practitioner", id);
        assert!(r.reference.starts_with("Practitioner/"));
        assert_eq!(r.target_id(), Some(id));
    }

    #[test]
    fn garbage_reference_does_not_resolve() {
        let r = Reference {
            reference: "Observation/not-a-uuid".to_string(),
        };
        assert_eq!(r.target_id(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = Uuid::nil();
        let json = serde_json::to_string(&Reference::urn(id)).unwrap();
        assert_eq!(json, format!("\"urn:uuid:{id}\""));
    }
}
