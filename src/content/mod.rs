//! Content module - handles posts, pages, and their metadata blocks

pub mod edn;
mod error;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
mod post;

pub use edn::{Metadata, Value};
pub use error::InvalidDocument;
pub use frontmatter::FrontMatter;
pub use markdown::Heading;
pub use post::{parse_post_stem, DocumentKind, Page, Post};
