//! Show one document's metadata and outline

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::content::loader;
use crate::content::markdown::{self, Heading};
use crate::content::{edn, DocumentKind, FrontMatter, Metadata};
use crate::Folio;

/// Parsed view of a single document
#[derive(Debug, Serialize)]
pub struct Summary {
    pub source: String,
    pub kind: Option<DocumentKind>,
    pub metadata: Metadata,
    pub outline: Vec<Heading>,
}

/// Parse a document and summarize it
pub fn summarize(folio: &Folio, path: &Path) -> Result<Summary> {
    let content = loader::read(path)?;
    let (fm, body) = FrontMatter::parse(&content)?;

    Ok(Summary {
        source: folio.relative(path),
        kind: folio.kind_of(path),
        metadata: fm.into_metadata(),
        outline: markdown::outline(body),
    })
}

/// Print a document summary
pub fn run(folio: &Folio, path: &Path, json: bool) -> Result<()> {
    let summary = summarize(folio, path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }
    Ok(())
}

fn format_summary(summary: &Summary) -> String {
    let kind = summary
        .kind
        .map(|k| k.to_string())
        .unwrap_or_else(|| "unplaced".to_string());

    let mut out = format!("{} ({})\n", summary.source, kind);
    out.push_str(&edn::write_map(&summary.metadata));
    out.push('\n');
    if !summary.outline.is_empty() {
        out.push_str("Outline:\n");
        for heading in &summary.outline {
            let indent = "  ".repeat(heading.level as usize);
            out.push_str(&format!("{}{}\n", indent, heading.to_markdown()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_summarize_page() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.pages_dir).unwrap();
        let path = folio.pages_dir.join("projects.md");
        fs::write(
            &path,
            "{:title \"Projects\" :layout :page :page-index 0 :navbar? true}\n\n### Leiningen Plugins\n\n## Libraries\n",
        )
        .unwrap();

        let summary = summarize(&folio, &path).unwrap();
        assert_eq!(summary.kind, Some(DocumentKind::Page));
        assert_eq!(summary.outline[0].to_markdown(), "### Leiningen Plugins");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(
            r#""metadata":{"title":"Projects","layout":"page","page-index":0,"navbar?":true}"#
        ));

        let text = format_summary(&summary);
        assert_eq!(
            text,
            "content/md/pages/projects.md (page)\n\
             {:title \"Projects\"\n :layout :page\n :page-index 0\n :navbar? true}\n\
             Outline:\n      ### Leiningen Plugins\n    ## Libraries\n"
        );
    }

    #[test]
    fn test_summarize_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "no metadata\n").unwrap();

        let err = summarize(&folio, &path).unwrap_err();
        assert!(err.to_string().contains("does not start with a metadata map"));
    }
}
