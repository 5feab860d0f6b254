//! Content loader - loads posts and pages from the content directories

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{parse_post_stem, DocumentKind, FrontMatter, Page, Post};
use crate::Folio;

/// A candidate content file found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path
    pub path: PathBuf,
    /// Path relative to the site root
    pub source: String,
    pub kind: DocumentKind,
}

/// A loaded document of either kind
#[derive(Debug, Clone)]
pub enum Document {
    Post(Post),
    Page(Page),
}

/// Loads content from the posts and pages directories
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    exclude: Vec<Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Result<Self> {
        let exclude = folio
            .config
            .exclude
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern {:?}", p)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { folio, exclude })
    }

    /// Every content file, posts first, each group in path order
    pub fn scan(&self) -> Vec<SourceFile> {
        let mut files = self.scan_kind(DocumentKind::Post);
        files.extend(self.scan_kind(DocumentKind::Page));
        files
    }

    /// Content files of one kind, in path order
    pub fn scan_kind(&self, kind: DocumentKind) -> Vec<SourceFile> {
        let dir = match kind {
            DocumentKind::Post => &self.folio.posts_dir,
            DocumentKind::Page => &self.folio.pages_dir,
        };
        if !dir.exists() {
            tracing::debug!("{} directory {:?} does not exist", kind, dir);
            return Vec::new();
        }

        let mut files = Vec::new();
        // A nested directory of the other kind is left to its own scan
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.folio.kind_of(e.path()) == Some(kind))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !self.is_content_file(path) {
                continue;
            }

            let source = self.folio.relative(path);
            if self.is_excluded(&source) {
                tracing::debug!("Skipping excluded file {}", source);
                continue;
            }

            files.push(SourceFile {
                path: path.to_path_buf(),
                source,
                kind,
            });
        }
        files
    }

    /// Load all posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for file in self.scan_kind(DocumentKind::Post) {
            match self.load_post(&file) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {}: {:#}", file.source, e);
                }
            }
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.source.cmp(&b.source)));

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, file: &SourceFile) -> Result<Post> {
        let content = read(&file.path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let stem = file_stem(&file.path);
        let (date, slug) = parse_post_stem(stem)
            .with_context(|| format!("Post file name {:?} is not YYYY-MM-DD-slug", stem))?;

        let post = Post::from_front_matter(
            &fm,
            body,
            date,
            slug,
            file.source.clone(),
            file.path.clone(),
        )?;
        Ok(post)
    }

    /// Load all pages, ordered by page index
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();

        for file in self.scan_kind(DocumentKind::Page) {
            match self.load_page(&file) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!("Failed to load page {}: {:#}", file.source, e);
                }
            }
        }

        pages.sort_by(|a, b| {
            a.page_index
                .cmp(&b.page_index)
                .then_with(|| a.source.cmp(&b.source))
        });

        Ok(pages)
    }

    /// Load a single page from a file
    pub fn load_page(&self, file: &SourceFile) -> Result<Page> {
        let content = read(&file.path)?;
        let (fm, body) = FrontMatter::parse(&content)?;
        let page = Page::from_front_matter(&fm, body, file.source.clone(), file.path.clone())?;
        Ok(page)
    }

    /// Load one document, deciding its kind by placement
    pub fn load_document(&self, path: &Path) -> Result<Document> {
        let kind = self
            .folio
            .kind_of(path)
            .with_context(|| format!("{:?} is outside the posts and pages directories", path))?;
        let file = SourceFile {
            path: path.to_path_buf(),
            source: self.folio.relative(path),
            kind,
        };

        let document = match kind {
            DocumentKind::Post => Document::Post(self.load_post(&file)?),
            DocumentKind::Page => Document::Page(self.load_page(&file)?),
        };
        Ok(document)
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.folio.config.extensions.iter().any(|x| x == e))
            .unwrap_or(false)
    }

    fn is_excluded(&self, source: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(source))
    }
}

/// Read a document, attaching the path to any error
pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}
