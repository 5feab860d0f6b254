//! Document error types

use thiserror::Error;

/// A content document whose metadata block is missing or malformed.
///
/// Every failure to read a document's metadata ends up here. There is no
/// partial recovery: a document either yields a complete metadata map or
/// it is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidDocument {
    #[error("document does not start with a metadata map")]
    MissingMetadata,

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("metadata map opened at line {line} is never closed")]
    Unterminated { line: usize },

    #[error("metadata key `{0}` is not a keyword")]
    NonKeywordKey(String),

    #[error("duplicate metadata key :{0}")]
    DuplicateKey(String),

    #[error("metadata key :{0} holds a nested collection")]
    NestedCollection(String),

    #[error("missing required key :{0}")]
    MissingKey(String),

    #[error("metadata key :{key} must be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
