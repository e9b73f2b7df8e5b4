//! The document-wide resource graph.
//!
//! A graph is an ordered list of (full-url, resource) entries plus the
//! top-level identifier block, a timestamp and the profile tags declaring
//! its document kind. Resources address one another only by id; lookup is
//! by linear scan over the ordered entries (graphs are small, and entry
//! order is semantically significant for the axis cause lists).

pub mod composition;
pub mod extension;
pub mod reference;
pub mod resource;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use self::composition::Composition;
use self::extension::Extension;
use self::reference::Reference;
use self::resource::{Condition, ListResource, Location, Observation, RelatedPerson, Resource, ResourceId};
use crate::error::GraphError;

/// Whether a graph is a full document or a scoped collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Document,
    Collection,
}

/// The top-level identifier block: certificate number plus the auxiliary
/// state file id. Carried verbatim across every projection of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_state_id: Option<String>,
}

/// One ordered graph entry: the resource plus its addressable full-url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub full_url: String,
    pub resource: Resource,
}

/// The document-wide container of all resources and their cross-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGraph {
    pub id: Uuid,
    pub kind: GraphKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub identifier: CertificateIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
    #[serde(default)]
    entries: Vec<Entry>,
}

impl ResourceGraph {
    /// A new empty graph of the given kind with a fresh id.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            profiles: Vec::new(),
            identifier: CertificateIdentifier::default(),
            timestamp: None,
            extensions: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Insert a resource, rejecting duplicate ids.
    pub fn insert(&mut self, resource: Resource) -> Result<Reference, GraphError> {
        let id = resource.id();
        if self.contains(id) {
            return Err(GraphError::DuplicateResource(id));
        }
        let reference = Reference::urn(id);
        self.entries.push(Entry {
            full_url: reference.reference.clone(),
            resource,
        });
        Ok(reference)
    }

    /// Insert a freshly constructed resource. Panics on id collision, which
    /// cannot happen for ids drawn from `Uuid::new_v4`.
    pub fn push(&mut self, resource: Resource) -> Reference {
        self.insert(resource)
            .expect("fresh resource id should not collide")
    }

    /// Whether a resource with this id is present.
    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.iter().any(|e| e.resource.id() == id)
    }

    /// Look up a resource by id.
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.entries
            .iter()
            .map(|e| &e.resource)
            .find(|r| r.id() == id)
    }

    /// Look up a resource by id, mutable.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.entries
            .iter_mut()
            .map(|e| &mut e.resource)
            .find(|r| r.id() == id)
    }

    /// Resolve a reference to its target resource, if present.
    pub fn resolve(&self, reference: &Reference) -> Option<&Resource> {
        reference.target_id().and_then(|id| self.get(id))
    }

    /// Ordered entries.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Ordered resources.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter().map(|e| &e.resource)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the graph itself carries the given profile tag.
    pub fn has_profile(&self, url: &str) -> bool {
        self.profiles.iter().any(|p| p == url)
    }

    // --- Typed lookups ---

    /// The first composition in entry order, if any.
    pub fn composition(&self) -> Option<&Composition> {
        self.resources().find_map(|r| match r {
            Resource::Composition(c) => Some(c),
            _ => None,
        })
    }

    /// The first composition, mutable.
    pub fn composition_mut(&mut self) -> Option<&mut Composition> {
        self.entries.iter_mut().find_map(|e| match &mut e.resource {
            Resource::Composition(c) => Some(c),
            _ => None,
        })
    }

    /// Observations in entry order.
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.resources().filter_map(|r| match r {
            Resource::Observation(o) => Some(o),
            _ => None,
        })
    }

    /// Conditions in entry order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.resources().filter_map(|r| match r {
            Resource::Condition(c) => Some(c),
            _ => None,
        })
    }

    /// Related persons in entry order.
    pub fn related_persons(&self) -> impl Iterator<Item = &RelatedPerson> {
        self.resources().filter_map(|r| match r {
            Resource::RelatedPerson(p) => Some(p),
            _ => None,
        })
    }

    /// Locations in entry order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.resources().filter_map(|r| match r {
            Resource::Location(l) => Some(l),
            _ => None,
        })
    }

    /// Lists in entry order.
    pub fn lists(&self) -> impl Iterator<Item = &ListResource> {
        self.resources().filter_map(|r| match r {
            Resource::List(l) => Some(l),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::resource::Patient;
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut g = ResourceGraph::new(GraphKind::Document);
        let patient = Patient::new();
        let id = patient.id;
        let r = g.push(Resource::Patient(patient));
        assert_eq!(g.len(), 1);
        assert!(g.contains(id));
        assert!(r.points_to(id));
        assert_eq!(g.resolve(&r).unwrap().id(), id);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut g = ResourceGraph::new(GraphKind::Document);
        let patient = Patient::new();
        g.push(Resource::Patient(patient.clone()));
        let err = g.insert(Resource::Patient(patient)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateResource(_)));
    }

    #[test]
    fn entry_order_preserved() {
        let mut g = ResourceGraph::new(GraphKind::Collection);
        let a = Patient::new();
        let b = Patient::new();
        let (a_id, b_id) = (a.id, b.id);
        g.push(Resource::Patient(a));
        g.push(Resource::Patient(b));
        let ids: Vec<_> = g.resources().map(Resource::id).collect();
        assert_eq!(ids, vec![a_id, b_id]);
    }

    #[test]
    fn full_url_is_urn_form() {
        let mut g = ResourceGraph::new(GraphKind::Document);
        let patient = Patient::new();
        let id = patient.id;
        g.push(Resource::Patient(patient));
        assert_eq!(g.entries()[0].full_url, format!("urn:uuid:{id}"));
    }

    #[test]
    fn graph_serde_round_trip() {
        let mut g = ResourceGraph::new(GraphKind::Document);
        g.identifier.certificate_number = Some("42".to_string());
        let patient = Patient::new();
        let id = patient.id;
        g.push(Resource::Patient(patient));

        let json = serde_json::to_vec(&g).unwrap();
        let back: ResourceGraph = serde_json::from_slice(&json).unwrap();
        assert_eq!(back.id, g.id);
        assert_eq!(back.identifier.certificate_number.as_deref(), Some("42"));
        assert!(back.contains(id));
    }
}
