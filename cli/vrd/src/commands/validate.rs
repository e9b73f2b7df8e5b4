//! `vrd validate` — parse and resolve a document, reporting every problem.

use std::path::Path;

use anyhow::Result;

use vrd_document::DocumentKind;

pub fn run(file: &Path, permissive: bool) -> Result<()> {
    let doc = super::load_document(file, permissive)?;
    let slots = doc.slots();

    let kind = match slots.kind {
        DocumentKind::Full => "full document",
        DocumentKind::Scoped => "scoped bundle",
    };
    println!("{}: valid {kind}", file.display());
    println!("  resources: {}", doc.graph().len());
    if let Some(id) = slots.display_identifier.as_deref() {
        println!("  identifier: {id}");
    }
    if !slots.pathway.is_empty() {
        println!("  cause pathway: {} condition(s)", slots.pathway.len());
    }
    Ok(())
}
