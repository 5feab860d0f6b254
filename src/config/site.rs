//! Site configuration (folio.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration file name, relative to the site root
pub const CONFIG_FILE: &str = "folio.yml";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub posts_dir: String,
    pub pages_dir: String,
    /// File extensions treated as content documents
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the site root, of files to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    /// Layout identifiers accepted in `:layout`
    pub layouts: Vec<String>,
    pub new_post_name: String,
    pub new_page_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_dir: "content/md/posts".to_string(),
            pages_dir: "content/md/pages".to_string(),
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: Vec::new(),

            layouts: vec!["page".to_string(), "post".to_string()],
            new_post_name: ":year-:month-:day-:title.md".to_string(),
            new_page_name: ":title.md".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        if Path::new(&config.posts_dir) == Path::new(&config.pages_dir) {
            anyhow::bail!(
                "Invalid config {:?}: posts_dir and pages_dir are both {:?}",
                path,
                config.posts_dir
            );
        }
        Ok(config)
    }

    /// Whether `layout` is one of the configured layouts
    pub fn is_known_layout(&self, layout: &str) -> bool {
        self.layouts.iter().any(|l| l == layout)
    }
}
