//! Corpus validation
//!
//! Every document is checked on its own. A metadata block that does not
//! parse is reported once as `invalid-document`; otherwise each rule
//! reports independently so a single run lists every problem in a file.

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::config::SiteConfig;
use crate::content::frontmatter::{self, FrontMatter};
use crate::content::loader::{self, ContentLoader, SourceFile};
use crate::content::{parse_post_stem, DocumentKind, InvalidDocument};
use crate::Folio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single finding against one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Path relative to the site root
    pub source: String,
    pub severity: Severity,
    pub rule: &'static str,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.rule, self.source, self.message
        )
    }
}

/// Outcome of checking a site
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Number of documents checked
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Whether the check passes, optionally treating warnings as errors
    pub fn passed(&self, deny_warnings: bool) -> bool {
        !self.has_errors() && !(deny_warnings && self.warning_count() > 0)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Check every document in the site
pub fn check_site(folio: &Folio) -> Result<Report> {
    let loader = ContentLoader::new(folio)?;
    let mut report = Report::default();

    for file in loader.scan() {
        let issues = match loader::read(&file.path) {
            Ok(content) => check_document(&file, &content, &folio.config),
            Err(e) => {
                let mut issues = Issues::new(&file.source);
                issues.error("invalid-document", format!("{:#}", e));
                issues.into_vec()
            }
        };
        tracing::debug!("Checked {} ({} issues)", file.source, issues.len());
        report.checked += 1;
        report.issues.extend(issues);
    }

    tracing::info!(
        "Checked {} documents: {} errors, {} warnings",
        report.checked,
        report.error_count(),
        report.warning_count()
    );
    Ok(report)
}

/// Check one document's text
pub fn check_document(file: &SourceFile, content: &str, config: &SiteConfig) -> Vec<Issue> {
    let mut issues = Issues::new(&file.source);

    let fm = match FrontMatter::parse(content) {
        Ok((fm, _)) => fm,
        Err(e) => {
            issues.error("invalid-document", e);
            return issues.into_vec();
        }
    };

    match fm.title() {
        Ok(Some(_)) => {}
        Ok(None) => issues.error("missing-title", missing(frontmatter::TITLE)),
        Err(e) => issues.error("missing-title", e),
    }

    match fm.layout() {
        Ok(Some(layout)) if !config.is_known_layout(layout) => issues.error(
            "unknown-layout",
            format!(
                "layout `{}` is not one of: {}",
                layout,
                config.layouts.join(", ")
            ),
        ),
        Ok(Some(_)) => {}
        Ok(None) => issues.error("missing-layout", missing(frontmatter::LAYOUT)),
        Err(e) => issues.error("missing-layout", e),
    }

    match file.kind {
        DocumentKind::Page => check_page(&fm, &mut issues),
        DocumentKind::Post => check_post(file, &fm, &mut issues),
    }

    issues.into_vec()
}

fn check_page(fm: &FrontMatter, issues: &mut Issues<'_>) {
    match fm.page_index() {
        Ok(Some(_)) => {}
        Ok(None) => issues.error("page-index", missing(frontmatter::PAGE_INDEX)),
        Err(e) => issues.error("page-index", e),
    }

    if let Err(e) = fm.navbar() {
        issues.error("navbar", e);
    }

    if fm.contains(frontmatter::TAGS) {
        issues.warning("kind-keys", "pages do not usually carry :tags");
    }
}

fn check_post(file: &SourceFile, fm: &FrontMatter, issues: &mut Issues<'_>) {
    match fm.tags() {
        Ok(Some(_)) => {}
        Ok(None) => issues.error("tags", missing(frontmatter::TAGS)),
        Err(e) => issues.error("tags", e),
    }

    let stem = file
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    match parse_post_stem(stem) {
        Some((_, slug)) => {
            let canonical = slug::slugify(&slug);
            if canonical != slug {
                issues.warning(
                    "slug",
                    format!("slug `{}` is not URL-friendly, expected `{}`", slug, canonical),
                );
            }
        }
        None => issues.error(
            "post-filename",
            format!("file name `{}` does not follow YYYY-MM-DD-slug", stem),
        ),
    }

    for key in [frontmatter::PAGE_INDEX, frontmatter::NAVBAR] {
        if fm.contains(key) {
            issues.warning("kind-keys", format!("posts do not usually carry :{}", key));
        }
    }
}

fn missing(key: &str) -> InvalidDocument {
    InvalidDocument::MissingKey(key.to_string())
}

/// Issue collector for one document
struct Issues<'a> {
    source: &'a str,
    issues: Vec<Issue>,
}

impl<'a> Issues<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            issues: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, rule: &'static str, message: impl fmt::Display) {
        self.issues.push(Issue {
            source: self.source.to_string(),
            severity,
            rule,
            message: message.to_string(),
        });
    }

    fn error(&mut self, rule: &'static str, message: impl fmt::Display) {
        self.push(Severity::Error, rule, message);
    }

    fn warning(&mut self, rule: &'static str, message: impl fmt::Display) {
        self.push(Severity::Warning, rule, message);
    }

    fn into_vec(self) -> Vec<Issue> {
        self.issues
    }
}
