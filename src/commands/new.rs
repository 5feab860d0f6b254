//! Create a new post or page

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::content::frontmatter::{self, FrontMatter};
use crate::content::{DocumentKind, Metadata, Value};
use crate::Folio;

/// What to scaffold
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub kind: DocumentKind,
    /// Layout identifier; defaults to the kind's name
    pub layout: Option<String>,
    /// Post tags
    pub tags: Vec<String>,
    /// Page ordering; defaults to one past the highest existing index
    pub page_index: Option<u64>,
    /// Page navigation flag
    pub navbar: bool,
}

impl NewDocument {
    pub fn new(title: &str, kind: DocumentKind) -> Self {
        Self {
            title: title.to_string(),
            kind,
            layout: None,
            tags: Vec::new(),
            page_index: None,
            navbar: true,
        }
    }
}

/// Create a new post or page, returning its path
pub fn create_document(folio: &Folio, options: &NewDocument) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    let slug = slug::slugify(&options.title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", options.title);
    }

    let layout = options
        .layout
        .clone()
        .unwrap_or_else(|| options.kind.to_string());
    if !folio.config.is_known_layout(&layout) {
        anyhow::bail!(
            "Unknown layout: {}. Available: {}",
            layout,
            folio.config.layouts.join(", ")
        );
    }

    let mut metadata = Metadata::new();
    metadata.insert(frontmatter::TITLE.to_string(), Value::String(options.title.clone()));
    metadata.insert(frontmatter::LAYOUT.to_string(), Value::Keyword(layout));

    let (target_dir, pattern) = match options.kind {
        DocumentKind::Post => {
            let tags = options.tags.iter().cloned().map(Value::String).collect();
            metadata.insert(frontmatter::TAGS.to_string(), Value::Vector(tags));
            (&folio.posts_dir, &folio.config.new_post_name)
        }
        DocumentKind::Page => {
            let page_index = match options.page_index {
                Some(index) => index,
                None => next_page_index(folio)?,
            };
            let page_index = i64::try_from(page_index)?;
            metadata.insert(frontmatter::PAGE_INDEX.to_string(), Value::Integer(page_index));
            metadata.insert(frontmatter::NAVBAR.to_string(), Value::Bool(options.navbar));
            (&folio.pages_dir, &folio.config.new_page_name)
        }
    };

    fs::create_dir_all(target_dir)?;
    let file_path = target_dir.join(file_name(pattern, &slug, today));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = FrontMatter::from_metadata(metadata).render("");
    fs::write(&file_path, content)?;
    tracing::info!("Created {}", folio.relative(&file_path));

    Ok(file_path)
}

/// Expand a file name pattern
fn file_name(pattern: &str, slug: &str, date: NaiveDate) -> String {
    pattern
        .replace(":title", slug)
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
}

fn next_page_index(folio: &Folio) -> Result<u64> {
    let loader = crate::content::loader::ContentLoader::new(folio)?;
    let pages = loader.load_pages()?;
    Ok(pages.iter().map(|p| p.page_index + 1).max().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2016, 2, 3).unwrap();
        assert_eq!(
            file_name(":year-:month-:day-:title.md", "schemas", date),
            "2016-02-03-schemas.md"
        );
        assert_eq!(file_name(":title.md", "about", date), "about.md");
    }

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let mut options = NewDocument::new("The Transformative Power of Schemas", DocumentKind::Post);
        options.tags = vec!["clojure".to_string(), "schema".to_string()];

        let path = create_document(&folio, &options).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("-the-transformative-power-of-schemas.md"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{:title \"The Transformative Power of Schemas\"\n :layout :post\n :tags [\"clojure\" \"schema\"]}\n"
        );

        let loader = ContentLoader::new(&folio).unwrap();
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].tags, vec!["clojure", "schema"]);

        // Refuses to overwrite
        assert!(create_document(&folio, &options).is_err());
    }

    #[test]
    fn test_create_pages_assigns_next_index() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let first = create_document(&folio, &NewDocument::new("Projects", DocumentKind::Page)).unwrap();
        let second = create_document(&folio, &NewDocument::new("About", DocumentKind::Page)).unwrap();
        assert_eq!(first, folio.pages_dir.join("projects.md"));

        let content = fs::read_to_string(second).unwrap();
        assert!(content.contains(":page-index 1"));
        assert!(content.contains(":navbar? true"));
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let mut options = NewDocument::new("Home", DocumentKind::Page);
        options.layout = Some("home".to_string());
        assert!(create_document(&folio, &options).is_err());
    }
}
