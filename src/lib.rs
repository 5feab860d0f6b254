//! folio: reader and validator for EDN front-matter content
//!
//! A site is a directory of markdown documents. Each document opens with
//! an EDN literal map (`{:title "..." :layout :post ...}`) followed by the
//! markdown body. Pages and posts live in separate directories; placement
//! decides a document's kind. Rendering is left to an external generator.

pub mod commands;
pub mod config;
pub mod content;
pub mod validate;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::DocumentKind;

/// The main application handle for one site
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts directory
    pub posts_dir: PathBuf,
    /// Pages directory
    pub pages_dir: PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", config::CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Folio instance with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let pages_dir = base_dir.join(&config.pages_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            pages_dir,
        }
    }

    /// Kind of the document at `path`, by placement.
    ///
    /// When one content directory is nested inside the other, the deeper
    /// one wins.
    pub fn kind_of(&self, path: &Path) -> Option<DocumentKind> {
        let depth = |dir: &Path| path.starts_with(dir).then(|| dir.components().count());
        match (depth(&self.posts_dir), depth(&self.pages_dir)) {
            (Some(post), Some(page)) if page > post => Some(DocumentKind::Page),
            (Some(_), _) => Some(DocumentKind::Post),
            (None, Some(_)) => Some(DocumentKind::Page),
            (None, None) => None,
        }
    }

    /// Path relative to the site root, for display
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    /// Validate every document in the site
    pub fn check(&self) -> Result<validate::Report> {
        validate::check_site(self)
    }

    /// Create a new post or page
    pub fn new_document(&self, options: &commands::new::NewDocument) -> Result<PathBuf> {
        commands::new::create_document(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.posts_dir, dir.path().join("content/md/posts"));
        assert_eq!(folio.pages_dir, dir.path().join("content/md/pages"));
    }

    #[test]
    fn test_new_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("folio.yml"), "posts_dir: blog\n").unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.posts_dir, dir.path().join("blog"));
    }

    #[test]
    fn test_kind_of() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(
            folio.kind_of(&folio.posts_dir.join("2020-01-01-a.md")),
            Some(DocumentKind::Post)
        );
        assert_eq!(
            folio.kind_of(&folio.pages_dir.join("about.md")),
            Some(DocumentKind::Page)
        );
        assert_eq!(folio.kind_of(&dir.path().join("README.md")), None);
    }

    #[test]
    fn test_kind_of_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config::SiteConfig {
            posts_dir: "content".to_string(),
            pages_dir: "content/pages".to_string(),
            ..config::SiteConfig::default()
        };
        let folio = Folio::with_config(dir.path().to_path_buf(), config);
        assert_eq!(
            folio.kind_of(&dir.path().join("content/2020-01-01-a.md")),
            Some(DocumentKind::Post)
        );
        assert_eq!(
            folio.kind_of(&dir.path().join("content/pages/about.md")),
            Some(DocumentKind::Page)
        );
    }
}
