//! `vrd inspect` — print the category-organized field view.

use std::path::Path;

use anyhow::Result;

use vrd_document::{describe, FieldCategory};

pub fn run(file: &Path) -> Result<()> {
    let doc = super::load_document(file, false)?;
    let view = describe(&doc);

    let mut current: Option<FieldCategory> = None;
    for field in &view {
        if current != Some(field.category) {
            println!("--- {} ---", field.category);
            current = Some(field.category);
        }
        match field.value.as_deref() {
            Some(value) => println!("  {:<28}{value}", field.key),
            None => println!("  {:<28}(unset)", field.key),
        }
    }
    Ok(())
}
