//! Symbolic expression IR and document decoder for the shapecheck
//! constraint back-end.
//!
//! # Quick start
//!
//! ```
//! use shapecheck_ir::decode::{decode_document, parse_document};
//!
//! let json = r#"[{"ctrPool":[{"type":10}],"hardCtr":[0],"softCtr":[],"pathCtr":[]}]"#;
//! let doc = parse_document(json).unwrap();
//! let sets = decode_document(doc).unwrap();
//! assert_eq!(sets.len(), 1);
//! ```
//!
//! # Architecture
//!
//! Each sort (`Num`, `Bool`, `Shape`) is its own closed Rust enum rather than
//! one dynamically-tagged tree, so a constraint can never mix sorts by
//! accident — the distinction is a compile-time property, not a runtime
//! check. The decoder is the one place that still has to deal with the
//! front-end's dynamically-tagged wire format; it translates that into the
//! closed IR exhaustively, so every later stage (encoder, classifier) only
//! ever pattern-matches closed enums.

pub mod ctr;
pub mod decode;
pub mod error;
pub mod expr;
pub mod symbol;

pub use ctr::{ConstraintSet, Ctr, CtrKind, Source};
pub use decode::{decode_document, parse_document, Document, PathDoc};
pub use error::{DecodeError, DecodeErrorKind, DecodeResult};
pub use expr::{rank_of, BoolExpr, NumBop, NumExpr, NumUop, ShapeExpr};
pub use symbol::{Sort, SortOf, Symbol, SymbolKind};
