//! Core data structures for vital-records death documents.
//!
//! A death record is a graph of cross-referenced typed resources: the
//! [`graph::ResourceGraph`] container, the typed records in
//! [`graph::resource`], weak [`graph::reference::Reference`] pointers, and
//! the extension trees that carry the tri-state partial date/time encoding
//! implemented in [`partial`].

pub mod catalog;
pub mod concept;
pub mod error;
pub mod graph;
pub mod partial;
pub mod profiles;

pub use catalog::ConceptCatalog;
pub use concept::Concept;
pub use error::GraphError;
pub use graph::composition::{Composition, Section, SectionCode};
pub use graph::extension::{AbsentReason, Extension, ExtensionValue};
pub use graph::reference::Reference;
pub use graph::resource::{
    Address, Component, Condition, HumanName, ListEntry, ListResource, Location, Observation,
    ObservationValue, Organization, Patient, Practitioner, Procedure, RelatedPerson, Resource,
    ResourceId,
};
pub use graph::{CertificateIdentifier, Entry, GraphKind, ResourceGraph};
pub use partial::{DatePart, PartialField, ShapeViolation};
