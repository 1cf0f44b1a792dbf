//! SMT encoder and path classifier for the shapecheck constraint back-end.
//!
//! # Architecture
//!
//! | IR sort | Z3 encoding |
//! |---|---|
//! | `Num` (int) | `Int` |
//! | `Num` (float literal / `TrueDiv` result) | `Real` |
//! | `Bool` | `Bool` |
//! | `Shape` | `Array Int Int`, out-of-range reads as `-1` |
//!
//! [`classify_path`] runs the staged query sequence
//! (reachability → validity shortcut → soft-constraint scan) that
//! `packages/pytea/z3wrapper/json2z3.py`'s `CtrSet.analysis` performs, and
//! [`classify_all`] fans that out across paths while preserving input order.

pub mod classify;
pub mod encode;
pub mod error;

pub use classify::{classify_all, classify_path, ClassificationKind, PathReport, UndecidableReason};
pub use encode::{Dynamic, Encoder};
pub use error::{EncodeError, SolverError};
