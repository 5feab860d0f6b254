//! Post and Page models

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::edn::Metadata;
use super::frontmatter::{self, FrontMatter};
use super::markdown::{self, Heading};
use super::InvalidDocument;

lazy_static! {
    /// `YYYY-MM-DD-slug`
    static ref POST_STEM: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").unwrap();
}

/// Kind of document, decided by where the file lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Page,
    Post,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Page => f.write_str("page"),
            DocumentKind::Post => f.write_str("post"),
        }
    }
}

/// Split a post file stem into its publish date and slug
pub fn parse_post_stem(stem: &str) -> Option<(NaiveDate, String)> {
    let caps = POST_STEM.captures(stem)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some((date, caps[4].to_string()))
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Layout identifier
    pub layout: String,

    /// Post tags, in declaration order
    pub tags: Vec<String>,

    /// Publication date, from the file name
    pub date: NaiveDate,

    /// Slug, from the file name
    pub slug: String,

    /// Raw markdown body
    pub raw: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Metadata keys without a dedicated field
    pub extra: Metadata,
}

impl Post {
    /// Build a post from its parsed metadata and file name parts
    pub fn from_front_matter(
        fm: &FrontMatter,
        body: &str,
        date: NaiveDate,
        slug: String,
        source: String,
        full_source: PathBuf,
    ) -> Result<Self, InvalidDocument> {
        let title = frontmatter::require(fm.title()?, frontmatter::TITLE)?;
        let layout = frontmatter::require(fm.layout()?, frontmatter::LAYOUT)?;
        let tags = frontmatter::require(fm.tags()?, frontmatter::TAGS)?;

        Ok(Self {
            title: title.to_string(),
            layout: layout.to_string(),
            tags,
            date,
            slug,
            raw: body.to_string(),
            source,
            full_source,
            extra: fm.extra(),
        })
    }

    pub fn first_heading(&self) -> Option<Heading> {
        markdown::first_heading(&self.raw)
    }
}

/// A standalone page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// Layout identifier
    pub layout: String,

    /// Ordering among pages
    pub page_index: u64,

    /// Whether the page is shown in navigation
    pub navbar: bool,

    /// Raw markdown body
    pub raw: String,

    /// Source file path (relative)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Metadata keys without a dedicated field
    pub extra: Metadata,
}

impl Page {
    /// Build a page from its parsed metadata
    pub fn from_front_matter(
        fm: &FrontMatter,
        body: &str,
        source: String,
        full_source: PathBuf,
    ) -> Result<Self, InvalidDocument> {
        let title = frontmatter::require(fm.title()?, frontmatter::TITLE)?;
        let layout = frontmatter::require(fm.layout()?, frontmatter::LAYOUT)?;
        let page_index = frontmatter::require(fm.page_index()?, frontmatter::PAGE_INDEX)?;

        Ok(Self {
            title: title.to_string(),
            layout: layout.to_string(),
            page_index,
            navbar: fm.navbar()?.unwrap_or(false),
            raw: body.to_string(),
            source,
            full_source,
            extra: fm.extra(),
        })
    }

    pub fn first_heading(&self) -> Option<Heading> {
        markdown::first_heading(&self.raw)
    }
}
