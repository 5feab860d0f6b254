//! Normalize metadata blocks

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader;
use crate::content::FrontMatter;
use crate::Folio;

/// Canonical form of a document: metadata rewritten, body untouched
pub fn format_document(content: &str) -> Result<String> {
    let (fm, body) = FrontMatter::parse(content)?;
    Ok(fm.render(body))
}

/// Format the given files. With `check`, nothing is written and the
/// returned list names the files that would change.
pub fn run(folio: &Folio, paths: &[PathBuf], check: bool) -> Result<Vec<String>> {
    let mut changed = Vec::new();

    for path in paths {
        if format_file(path, check)? {
            let source = folio.relative(path);
            if check {
                println!("Would reformat {}", source);
            } else {
                tracing::info!("Formatted {}", source);
            }
            changed.push(source);
        }
    }

    Ok(changed)
}

/// Format one file, returning whether its content changed
fn format_file(path: &Path, check: bool) -> Result<bool> {
    let content = loader::read(path)?;
    let formatted =
        format_document(&content).with_context(|| format!("Failed to format {:?}", path))?;
    if formatted == content {
        return Ok(false);
    }
    if !check {
        fs::write(path, formatted)?;
    }
    Ok(true)
}
