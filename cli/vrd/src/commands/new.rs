//! `vrd new` — create a fresh empty death document.

use std::path::Path;

use anyhow::Result;

use vrd_core::ConceptCatalog;
use vrd_document::DeathDocument;

use crate::config::VrdConfig;

pub fn run(config: &VrdConfig, out: Option<&Path>) -> Result<()> {
    let mut doc = DeathDocument::new(ConceptCatalog::mortality_defaults());
    if let Some(jurisdiction) = config.jurisdiction.as_deref() {
        doc.set_death_location_jurisdiction(jurisdiction);
    }
    let bytes = doc.to_json()?;
    super::emit(&bytes, out)
}
