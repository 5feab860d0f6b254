//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::content::loader::ContentLoader;
use crate::content::{Page, Post};
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(folio)?;

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            print!("{}", format_posts(&posts));
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            print!("{}", format_pages(&pages));
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let tags = tag_counts(&posts);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag",
                content_type
            );
        }
    }

    Ok(())
}

fn format_posts(posts: &[Post]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.source
        ));
    }
    out
}

fn format_pages(pages: &[Page]) -> String {
    let mut out = format!("Pages ({}):\n", pages.len());
    for page in pages {
        let nav = if page.navbar { " (navbar)" } else { "" };
        out.push_str(&format!(
            "  {:>3} {}{} [{}]\n",
            page.page_index, page.title, nav, page.source
        ));
    }
    out
}

/// Tags with their post counts, most used first, then by name
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<_> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn post(tags: &[&str]) -> Post {
        Post {
            title: "Schemas".to_string(),
            layout: "post".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            date: NaiveDate::from_ymd_opt(2016, 2, 13).unwrap(),
            slug: "schemas".to_string(),
            raw: String::new(),
            source: "content/md/posts/2016-02-13-schemas.md".to_string(),
            full_source: PathBuf::new(),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_tag_counts() {
        let posts = vec![
            post(&["clojure", "schema"]),
            post(&["clojure", "ring"]),
            post(&["ring"]),
            post(&["clojure"]),
        ];
        assert_eq!(
            tag_counts(&posts),
            vec![
                ("clojure".to_string(), 3),
                ("ring".to_string(), 2),
                ("schema".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_format_posts() {
        assert_eq!(
            format_posts(&[post(&["clojure"])]),
            "Posts (1):\n  2016-02-13 - Schemas [content/md/posts/2016-02-13-schemas.md]\n"
        );
    }

    #[test]
    fn test_format_pages() {
        let page = Page {
            title: "Projects".to_string(),
            layout: "page".to_string(),
            page_index: 0,
            navbar: true,
            raw: String::new(),
            source: "content/md/pages/projects.md".to_string(),
            full_source: PathBuf::new(),
            extra: Default::default(),
        };
        assert_eq!(
            format_pages(&[page]),
            "Pages (1):\n    0 Projects (navbar) [content/md/pages/projects.md]\n"
        );
    }

    #[test]
    fn test_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(run(&folio, "category").is_err());
        assert!(run(&folio, "posts").is_ok());
    }
}
