//! Decode-time errors.
//!
//! Mirrors `logicaffeine_verify::error::VerificationError`'s shape: a plain
//! struct pairing a `kind` enum with free-form context, hand-written
//! `Display`/`Error` impls, and small constructor methods — no `thiserror`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The top-level bytes were not valid JSON.
    Malformed,
    /// A `type` (or similar) tag field held a value outside its enumeration.
    UnknownTag,
    /// A field required by the matched tag was absent.
    MissingField,
    /// A field was present but held a value of the wrong shape (e.g. a
    /// `Shape`-sorted expression where `Num` was required).
    SortMismatch,
    /// An index into `ctrPool` fell outside `[0, len)`.
    IndexOutOfRange,
    /// A field expected to encode a whole number did not (e.g. a JSON float
    /// with a fractional part supplied where an integer tag was required).
    NotAnInteger,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeErrorKind::Malformed => "malformed document",
            DecodeErrorKind::UnknownTag => "unknown tag",
            DecodeErrorKind::MissingField => "missing field",
            DecodeErrorKind::SortMismatch => "sort mismatch",
            DecodeErrorKind::IndexOutOfRange => "index out of range",
            DecodeErrorKind::NotAnInteger => "not an integer",
        };
        f.write_str(s)
    }
}

/// A failure decoding a document into the symbolic IR, located by a
/// JSON-pointer-like path built up as the decoder descends
/// (`"paths[2].ctrPool[5].left"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub path: String,
    pub message: String,
}

pub type DecodeResult<T> = Result<T, DecodeError>;

impl DecodeError {
    fn new(kind: DecodeErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::Malformed, "<root>", message)
    }

    pub fn unknown_tag(path: impl Into<String>, tag: i64) -> Self {
        Self::new(
            DecodeErrorKind::UnknownTag,
            path,
            format!("unrecognized tag value {tag}"),
        )
    }

    pub fn missing_field(path: impl Into<String>, field: &str) -> Self {
        Self::new(
            DecodeErrorKind::MissingField,
            path,
            format!("missing required field `{field}`"),
        )
    }

    pub fn sort_mismatch(path: impl Into<String>, expected: &str, found: &str) -> Self {
        Self::new(
            DecodeErrorKind::SortMismatch,
            path,
            format!("expected a {expected}-sorted expression, found {found}"),
        )
    }

    pub fn index_out_of_range(path: impl Into<String>, index: usize, len: usize) -> Self {
        Self::new(
            DecodeErrorKind::IndexOutOfRange,
            path,
            format!("index {index} out of range for pool of length {len}"),
        )
    }

    pub fn not_an_integer(path: impl Into<String>, value: f64) -> Self {
        Self::new(
            DecodeErrorKind::NotAnInteger,
            path,
            format!("expected an integer, found {value}"),
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.message)
    }
}

impl std::error::Error for DecodeError {}
