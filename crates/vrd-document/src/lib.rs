//! Death certificate documents over a typed resource graph.
//!
//! The [`DeathDocument`] is the main entry point: it assembles a fresh
//! document graph with correct cross-references and section membership,
//! resolves previously-serialized graphs back into typed slots with
//! validation, and derives scoped sub-bundle projections.
//!
//! Resolution either fully succeeds or fully fails with one aggregated,
//! human-readable error; building never fails. Everything is synchronous
//! and in-memory. A document instance owns its graph and slot cache
//! exclusively, and callers serialize shared access externally.

pub mod builder;
pub mod codec;
pub mod error;
pub mod fields;
pub mod pathway;
pub mod project;
pub mod resolver;
pub mod slots;

pub use builder::{AuxiliaryRole, DeathDocument};
pub use codec::{from_json, to_json};
pub use error::DocumentError;
pub use fields::{describe, write_field, FieldCategory, FieldKind, FieldSpec, FieldValue};
pub use pathway::{CauseLine, PATHWAY_CAPACITY};
pub use project::{project, ProjectionKind};
pub use resolver::resolve;
pub use slots::{
    classify_observation_code, DocumentKind, ObservationSlot, ResolvedSlots, OBSERVATION_DISPATCH,
};
