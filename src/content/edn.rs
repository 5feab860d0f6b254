//! EDN literal-map reader and writer
//!
//! Metadata blocks use a small subset of EDN: one map whose keys are
//! keywords and whose values are scalars or flat vectors and lists.
//! The reader is a character-based scanner that tracks line and column
//! so syntax errors can point at the offending spot.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt::{self, Write};

use super::InvalidDocument;

/// Metadata map, keyed by keyword name (without the leading `:`)
pub type Metadata = IndexMap<String, Value>;

/// A value that may appear in a metadata block
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Keyword name without the leading colon
    Keyword(String),
    Symbol(String),
    Vector(Vec<Value>),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Items of a vector or list
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Name carried by a keyword, string or symbol
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Keyword(s) | Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Human readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "a boolean",
            Value::Integer(_) => "an integer",
            Value::Float(_) => "a float",
            Value::String(_) => "a string",
            Value::Keyword(_) => "a keyword",
            Value::Symbol(_) => "a symbol",
            Value::Vector(_) => "a vector",
            Value::List(_) => "a list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            // Debug keeps a `.0` or exponent so the value reads back as a float
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write_string(f, s),
            Value::Keyword(k) => write!(f, ":{}", k),
            Value::Symbol(s) => f.write_str(s),
            Value::Vector(items) => write_seq(f, '[', ']', items),
            Value::List(items) => write_seq(f, '(', ')', items),
        }
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: char, close: char, items: &[Value]) -> fmt::Result {
    f.write_char(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{}", item)?;
    }
    f.write_char(close)
}

/// Keywords and symbols serialize as their bare names so JSON output reads
/// naturally (`"layout": "page"`).
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) | Value::Keyword(s) | Value::Symbol(s) => serializer.serialize_str(s),
            Value::Vector(items) | Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Serialize a metadata map back to literal-map syntax, one entry per line.
pub fn write_map(map: &Metadata) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str("\n ");
        }
        // Writing into a String cannot fail
        let _ = write!(out, ":{} {}", key, value);
    }
    out.push('}');
    out
}

/// Read one map literal from the start of `input` (leading whitespace and
/// comments allowed). Returns the map and the byte offset just past the
/// closing brace.
pub fn read_map(input: &str) -> Result<(Metadata, usize), InvalidDocument> {
    let mut reader = Reader::new(input);
    reader.skip_whitespace();
    if reader.peek() != Some('{') {
        return Err(InvalidDocument::MissingMetadata);
    }
    let map = reader.read_top_map()?;
    Ok((map, reader.offset()))
}

/// Character scanner over the metadata block
struct Reader<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn error_at(&self, line: usize, column: usize, message: impl Into<String>) -> InvalidDocument {
        InvalidDocument::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn error(&self, message: impl Into<String>) -> InvalidDocument {
        self.error_at(self.line, self.column, message)
    }

    /// Skip whitespace, commas and `;` line comments
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else if c == ';' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_top_map(&mut self) -> Result<Metadata, InvalidDocument> {
        let open_line = self.line;
        self.advance(); // Skip {

        let mut map = Metadata::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(InvalidDocument::Unterminated { line: open_line }),
                Some('}') => {
                    self.advance();
                    return Ok(map);
                }
                Some(_) => {}
            }

            let key = match self.read_value("")? {
                Value::Keyword(k) => k,
                other => return Err(InvalidDocument::NonKeywordKey(other.to_string())),
            };

            self.skip_whitespace();
            match self.peek() {
                None => return Err(InvalidDocument::Unterminated { line: open_line }),
                Some('}') => return Err(self.error(format!("missing value for key :{}", key))),
                Some(_) => {}
            }

            let value = self.read_value(&key)?;
            if map.contains_key(&key) {
                return Err(InvalidDocument::DuplicateKey(key));
            }
            map.insert(key, value);
        }
    }

    /// Read a value. `key` names the entry being read, for error messages.
    fn read_value(&mut self, key: &str) -> Result<Value, InvalidDocument> {
        match self.peek() {
            Some('[') => Ok(Value::Vector(self.read_seq(key, ']')?)),
            Some('(') => Ok(Value::List(self.read_seq(key, ')')?)),
            _ => self.read_scalar(key),
        }
    }

    fn read_seq(&mut self, key: &str, close: char) -> Result<Vec<Value>, InvalidDocument> {
        let (line, column) = (self.line, self.column);
        self.advance(); // Skip [ or (

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    return Err(self.error_at(line, column, format!("unclosed sequence, expected `{}`", close)))
                }
                Some(c) if c == close => {
                    self.advance();
                    return Ok(items);
                }
                Some('[') | Some('(') | Some('{') => {
                    return Err(InvalidDocument::NestedCollection(key.to_string()))
                }
                Some(_) => items.push(self.read_scalar(key)?),
            }
        }
    }

    fn read_scalar(&mut self, key: &str) -> Result<Value, InvalidDocument> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.error("unexpected end of input")),
        };

        match c {
            '"' => self.read_string(),
            ':' => self.read_keyword(),
            '{' if key.is_empty() => Err(self.error("maps cannot be used as metadata keys")),
            '{' => Err(InvalidDocument::NestedCollection(key.to_string())),
            '#' => Err(self.error("tagged literals and sets are not supported")),
            '\\' => Err(self.error("character literals are not supported")),
            ')' | ']' | '}' => Err(self.error(format!("unexpected `{}`", c))),
            c if c.is_ascii_digit() => self.read_number(),
            '+' | '-' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => self.read_number(),
            _ => self.read_symbol(),
        }
    }

    fn read_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if !is_token_char(c) {
                break;
            }
            token.push(c);
            self.advance();
        }
        token
    }

    fn read_keyword(&mut self) -> Result<Value, InvalidDocument> {
        let (line, column) = (self.line, self.column);
        self.advance(); // Skip :
        let name = self.read_token();
        if name.is_empty() || name.starts_with(':') {
            return Err(self.error_at(line, column, "invalid keyword"));
        }
        Ok(Value::Keyword(name))
    }

    fn read_symbol(&mut self) -> Result<Value, InvalidDocument> {
        let (line, column) = (self.line, self.column);
        let token = self.read_token();
        match token.as_str() {
            "" => {
                let c = self.peek().unwrap_or(' ');
                Err(self.error_at(line, column, format!("unexpected character `{}`", c)))
            }
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "nil" => Ok(Value::Nil),
            _ => Ok(Value::Symbol(token)),
        }
    }

    fn read_number(&mut self) -> Result<Value, InvalidDocument> {
        let (line, column) = (self.line, self.column);
        let token = self.read_token();
        let digits = token.trim_start_matches(['+', '-']);

        if digits.chars().all(|c| c.is_ascii_digit()) {
            return token
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| self.error_at(line, column, format!("integer `{}` is out of range", token)));
        }

        if digits.contains(['.', 'e', 'E']) {
            if let Ok(x) = token.parse::<f64>() {
                if x.is_finite() {
                    return Ok(Value::Float(x));
                }
                return Err(self.error_at(line, column, format!("float `{}` is out of range", token)));
            }
        }

        Err(self.error_at(line, column, format!("invalid number `{}`", token)))
    }

    fn read_string(&mut self) -> Result<Value, InvalidDocument> {
        let (line, column) = (self.line, self.column);
        self.advance(); // Skip opening quote

        let mut result = String::new();
        loop {
            let c = match self.advance() {
                Some(c) => c,
                None => return Err(self.error_at(line, column, "unterminated string")),
            };
            match c {
                '"' => return Ok(Value::String(result)),
                '\\' => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('u') => self.read_unicode_escape()?,
                        Some(other) => return Err(self.error(format!("invalid escape `\\{}`", other))),
                        None => return Err(self.error_at(line, column, "unterminated string")),
                    };
                    result.push(escaped);
                }
                c => result.push(c),
            }
        }
    }

    fn read_unicode_escape(&mut self) -> Result<char, InvalidDocument> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.advance() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid unicode escape `\\u{}`", hex)))
    }
}

/// Characters that may appear inside a keyword, symbol or number token
fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '\\')
}
