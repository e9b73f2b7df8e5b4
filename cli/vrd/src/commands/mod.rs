//! CLI command implementations.

pub mod inspect;
pub mod new;
pub mod project;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use vrd_core::ConceptCatalog;
use vrd_document::DeathDocument;

/// Read and resolve a document file.
pub fn load_document(file: &Path, permissive: bool) -> Result<DeathDocument> {
    let bytes =
        std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let doc = DeathDocument::parse(&bytes, permissive, ConceptCatalog::mortality_defaults())
        .with_context(|| format!("resolving {}", file.display()))?;
    Ok(doc)
}

/// Write bytes to a file, or to stdout when no path is given.
pub fn emit(bytes: &[u8], out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let text = String::from_utf8_lossy(bytes);
            println!("{text}");
            Ok(())
        }
    }
}
