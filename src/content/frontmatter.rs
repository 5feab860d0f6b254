//! Front-matter parsing

use super::edn::{self, Metadata, Value};
use super::InvalidDocument;

pub const TITLE: &str = "title";
pub const LAYOUT: &str = "layout";
pub const PAGE_INDEX: &str = "page-index";
pub const NAVBAR: &str = "navbar?";
pub const TAGS: &str = "tags";

/// Keys with a typed accessor
pub const KNOWN_KEYS: [&str; 5] = [TITLE, LAYOUT, PAGE_INDEX, NAVBAR, TAGS];

/// Metadata block of a post or page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    metadata: Metadata,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), InvalidDocument> {
        if !content.trim_start().starts_with('{') {
            return Err(InvalidDocument::MissingMetadata);
        }

        // Leading blank lines count towards error positions
        let (metadata, end) = edn::read_map(content)?;
        let body = content[end..]
            .trim_start_matches([' ', '\t'])
            .trim_start_matches(['\n', '\r']);

        Ok((Self { metadata }, body))
    }

    pub fn from_metadata(metadata: Metadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// Entries without a typed accessor, in source order
    pub fn extra(&self) -> Metadata {
        self.metadata
            .iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Title, which must not be blank
    pub fn title(&self) -> Result<Option<&str>, InvalidDocument> {
        match self.typed(TITLE, "a string", Value::as_str)? {
            Some(title) if title.trim().is_empty() => Err(InvalidDocument::WrongType {
                key: TITLE.to_string(),
                expected: "a non-empty string",
                found: "a blank string",
            }),
            title => Ok(title),
        }
    }

    /// Layout identifier, written as a keyword, string or symbol
    pub fn layout(&self) -> Result<Option<&str>, InvalidDocument> {
        self.typed(LAYOUT, "a keyword naming a layout", Value::as_name)
    }

    pub fn navbar(&self) -> Result<Option<bool>, InvalidDocument> {
        self.typed(NAVBAR, "a boolean", Value::as_bool)
    }

    pub fn page_index(&self) -> Result<Option<u64>, InvalidDocument> {
        let expected = "a non-negative integer";
        match self.typed(PAGE_INDEX, expected, Value::as_integer)? {
            None => Ok(None),
            Some(n) => u64::try_from(n).map(Some).map_err(|_| InvalidDocument::WrongType {
                key: PAGE_INDEX.to_string(),
                expected,
                found: "a negative integer",
            }),
        }
    }

    /// Tags in declaration order
    pub fn tags(&self) -> Result<Option<Vec<String>>, InvalidDocument> {
        let expected = "a sequence of non-empty strings";
        let items = match self.typed(TAGS, expected, Value::as_seq)? {
            Some(items) => items,
            None => return Ok(None),
        };

        let mut tags = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(tag) if !tag.trim().is_empty() => tags.push(tag.to_string()),
                Some(_) => {
                    return Err(InvalidDocument::WrongType {
                        key: TAGS.to_string(),
                        expected,
                        found: "an empty string",
                    })
                }
                None => {
                    return Err(InvalidDocument::WrongType {
                        key: TAGS.to_string(),
                        expected,
                        found: item.type_name(),
                    })
                }
            }
        }
        Ok(Some(tags))
    }

    /// Look up `key` and convert it, distinguishing absent from mistyped
    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        convert: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<Option<T>, InvalidDocument> {
        match self.metadata.get(key) {
            None => Ok(None),
            Some(value) => convert(value).map(Some).ok_or_else(|| InvalidDocument::WrongType {
                key: key.to_string(),
                expected,
                found: value.type_name(),
            }),
        }
    }

    /// Serialize the metadata block followed by `body`
    pub fn render(&self, body: &str) -> String {
        let mut out = edn::write_map(&self.metadata);
        out.push('\n');
        if !body.is_empty() {
            out.push('\n');
            out.push_str(body);
        }
        out
    }
}

/// Require an optional field, reporting the key when it is absent
pub fn require<T>(value: Option<T>, key: &str) -> Result<T, InvalidDocument> {
    value.ok_or_else(|| InvalidDocument::MissingKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS_PAGE: &str = r#"{:title "Projects"
 :layout :page
 :page-index 0
 :navbar? true}

### Leiningen Plugins

* [lein-cljfmt](https://github.com/weavejester/cljfmt)
"#;

    #[test]
    fn test_parse_page_frontmatter() {
        let (fm, body) = FrontMatter::parse(PROJECTS_PAGE).unwrap();
        assert_eq!(fm.title().unwrap(), Some("Projects"));
        assert_eq!(fm.layout().unwrap(), Some("page"));
        assert_eq!(fm.page_index().unwrap(), Some(0));
        assert_eq!(fm.navbar().unwrap(), Some(true));
        assert_eq!(fm.tags().unwrap(), None);
        assert!(body.starts_with("### Leiningen Plugins"));
    }

    #[test]
    fn test_parse_post_tags_in_order() {
        let content = r#"{:title "The Transformative Power of Schemas"
 :layout :post
 :tags  ["clojure" "schema"]}

Data descriptions are worth writing down.
"#;
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(
            fm.tags().unwrap(),
            Some(vec!["clojure".to_string(), "schema".to_string()])
        );
        assert_eq!(body, "Data descriptions are worth writing down.\n");
    }

    #[test]
    fn test_leading_whitespace_allowed() {
        let (fm, body) = FrontMatter::parse("\n\n  {:title \"x\" :layout :post}\nbody").unwrap();
        assert_eq!(fm.title().unwrap(), Some("x"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_error_position_counts_leading_lines() {
        let err = FrontMatter::parse("\n\n\n{:title \"x\"\n :date #inst \"2020-01-01\"}").unwrap_err();
        assert!(matches!(err, InvalidDocument::Syntax { line: 5, column: 8, .. }));
    }

    #[test]
    fn test_missing_metadata_is_invalid() {
        let err = FrontMatter::parse("### Just a heading\n").unwrap_err();
        assert_eq!(err, InvalidDocument::MissingMetadata);

        let err = FrontMatter::parse("---\ntitle: Yaml\n---\n").unwrap_err();
        assert_eq!(err, InvalidDocument::MissingMetadata);
    }

    #[test]
    fn test_wrong_types_are_reported() {
        let (fm, _) =
            FrontMatter::parse(r#"{:title 12 :page-index -1 :navbar? "yes" :tags "clojure"}"#).unwrap();
        assert_eq!(
            fm.title().unwrap_err(),
            InvalidDocument::WrongType {
                key: "title".to_string(),
                expected: "a string",
                found: "an integer",
            }
        );
        assert!(matches!(
            fm.page_index(),
            Err(InvalidDocument::WrongType { found: "a negative integer", .. })
        ));
        assert!(fm.navbar().is_err());
        assert!(matches!(
            fm.tags(),
            Err(InvalidDocument::WrongType { found: "a string", .. })
        ));
    }

    #[test]
    fn test_blank_title_rejected() {
        let (fm, _) = FrontMatter::parse("{:title \"  \\t\" :layout :post}").unwrap();
        assert!(matches!(
            fm.title(),
            Err(InvalidDocument::WrongType { found: "a blank string", .. })
        ));
    }

    #[test]
    fn test_empty_tag_rejected() {
        let (fm, _) = FrontMatter::parse(r#"{:tags ["clojure" ""]}"#).unwrap();
        assert!(matches!(
            fm.tags(),
            Err(InvalidDocument::WrongType { found: "an empty string", .. })
        ));
    }

    #[test]
    fn test_layout_accepts_string() {
        let (fm, _) = FrontMatter::parse(r#"{:layout "post"}"#).unwrap();
        assert_eq!(fm.layout().unwrap(), Some("post"));
    }

    #[test]
    fn test_extra_keys() {
        let (fm, _) = FrontMatter::parse(r#"{:title "x" :toc true :layout :post}"#).unwrap();
        let extra = fm.extra();
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("toc"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_render_roundtrip() {
        let (fm, body) = FrontMatter::parse(PROJECTS_PAGE).unwrap();
        let rendered = fm.render(body);
        assert_eq!(rendered, PROJECTS_PAGE);

        let (again, again_body) = FrontMatter::parse(&rendered).unwrap();
        assert_eq!(again, fm);
        assert_eq!(again_body, body);
    }

    #[test]
    fn test_render_empty_body() {
        let (fm, body) = FrontMatter::parse("{:title \"x\"}").unwrap();
        assert_eq!(fm.render(body), "{:title \"x\"}\n");
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(1), TITLE), Ok(1));
        assert_eq!(
            require::<u8>(None, TITLE),
            Err(InvalidDocument::MissingKey("title".to_string()))
        );
    }
}
