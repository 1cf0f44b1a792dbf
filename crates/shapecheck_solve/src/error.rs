//! Encoder and solver errors.
//!
//! Plain enums with hand-written `Display`/`Error`, matching
//! `logicaffeine_verify::error`'s style rather than reaching for `thiserror`.

use std::fmt;

/// A constraint could not be translated into an SMT formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// `FloorDiv`/`Mod`, or a `Forall` range bound, applied where an operand
    /// encoded to a real instead of an integer.
    RealInIntOp { context: String },
    /// An internal sort expectation was violated (decoder invariants should
    /// make this unreachable; kept as a defensive, reportable case).
    SortMismatch {
        expected: &'static str,
        found: &'static str,
        context: String,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::RealInIntOp { context } => {
                write!(f, "integer-only operator applied to a real operand in {context}")
            }
            EncodeError::SortMismatch {
                expected,
                found,
                context,
            } => write!(f, "expected {expected}, found {found} in {context}"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// A solver query returned `unknown`, or a Z3-level failure occurred outside
/// the expected `sat`/`unsat` outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverError {
    pub reason: String,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "solver returned unknown: {}", self.reason)
    }
}

impl std::error::Error for SolverError {}
