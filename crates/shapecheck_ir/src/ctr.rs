//! Constraints and constraint sets — one per decoded execution path.

use crate::expr::{BoolExpr, NumExpr, ShapeExpr};
use crate::symbol::Symbol;
use std::fmt;

/// A byte-offset span into the front-end's original source text, carried
/// through so a rejected path can point back at the line that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub start: usize,
    pub length: usize,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.start + self.length.saturating_sub(1);
        write!(f, "[{}:{}]", self.start, end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CtrKind {
    /// A bare `Bool`-sorted expression asserted true.
    ExpBool(BoolExpr),
    EqNum(NumExpr, NumExpr),
    NeNum(NumExpr, NumExpr),
    EqShape(ShapeExpr, ShapeExpr),
    NeShape(ShapeExpr, ShapeExpr),
    Lt(NumExpr, NumExpr),
    Le(NumExpr, NumExpr),
    And(Box<Ctr>, Box<Ctr>),
    Or(Box<Ctr>, Box<Ctr>),
    Not(Box<Ctr>),
    /// `forall sym in [lo, hi]. body`.
    Forall {
        sym: Symbol,
        lo: NumExpr,
        hi: NumExpr,
        body: Box<Ctr>,
    },
    /// NumPy-style broadcast compatibility between two shapes.
    Broadcastable(ShapeExpr, ShapeExpr),
    /// Always-false sentinel emitted by the front-end for paths it has
    /// already proven dead by other means.
    Fail,
}

/// One node of a constraint set's pool: a constraint plus the provenance
/// needed to report it meaningfully.
#[derive(Debug, Clone, PartialEq)]
pub struct Ctr {
    pub kind: CtrKind,
    pub source: Option<Source>,
    pub message: Option<String>,
}

impl Ctr {
    pub fn new(kind: CtrKind) -> Self {
        Self {
            kind,
            source: None,
            message: None,
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for CtrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtrKind::ExpBool(e) => write!(f, "{e}"),
            CtrKind::EqNum(l, r) => write!(f, "({l} == {r})"),
            CtrKind::NeNum(l, r) => write!(f, "({l} != {r})"),
            CtrKind::EqShape(l, r) => write!(f, "({l} == {r})"),
            CtrKind::NeShape(l, r) => write!(f, "({l} != {r})"),
            CtrKind::Lt(l, r) => write!(f, "({l} < {r})"),
            CtrKind::Le(l, r) => write!(f, "({l} <= {r})"),
            CtrKind::And(l, r) => write!(f, "({} && {})", l.kind, r.kind),
            CtrKind::Or(l, r) => write!(f, "({} || {})", l.kind, r.kind),
            CtrKind::Not(v) => write!(f, "!({})", v.kind),
            CtrKind::Forall { sym, lo, hi, body } => {
                write!(f, "forall {sym} in [{lo}, {hi}]. {}", body.kind)
            }
            CtrKind::Broadcastable(l, r) => write!(f, "broadcastable({l}, {r})"),
            CtrKind::Fail => write!(f, "fail"),
        }
    }
}

impl fmt::Display for Ctr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(src) = &self.source {
            write!(f, " - {src}")?;
        }
        Ok(())
    }
}

/// The decoded constraints of a single execution path.
///
/// `hard`, `path`, and `soft` index into `ctr_pool`; a constructed
/// `ConstraintSet` upholds spec section 3's invariant that every index is
/// in range (enforced by the decoder, never re-validated downstream).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    pub ctr_pool: Vec<Ctr>,
    pub hard: Vec<usize>,
    pub path: Vec<usize>,
    pub soft: Vec<usize>,
}

impl ConstraintSet {
    pub fn hard_ctrs(&self) -> impl Iterator<Item = &Ctr> {
        self.hard.iter().map(move |&i| &self.ctr_pool[i])
    }

    pub fn path_ctrs(&self) -> impl Iterator<Item = &Ctr> {
        self.path.iter().map(move |&i| &self.ctr_pool[i])
    }

    pub fn soft_ctrs(&self) -> impl Iterator<Item = &Ctr> {
        self.soft.iter().map(move |&i| &self.ctr_pool[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_display_is_inclusive_end() {
        let s = Source { start: 10, length: 5 };
        assert_eq!(s.to_string(), "[10:14]");
    }

    #[test]
    fn ctr_display_appends_source_suffix() {
        let ctr = Ctr::new(CtrKind::Fail).with_source(Source { start: 0, length: 1 });
        assert_eq!(ctr.to_string(), "fail - [0:0]");
    }

    #[test]
    fn constraint_set_projects_by_index() {
        let set = ConstraintSet {
            ctr_pool: vec![Ctr::new(CtrKind::Fail), Ctr::new(CtrKind::ExpBool(BoolExpr::Const(true)))],
            hard: vec![0],
            path: vec![],
            soft: vec![1],
        };
        assert_eq!(set.hard_ctrs().count(), 1);
        assert_eq!(set.soft_ctrs().count(), 1);
        assert_eq!(set.path_ctrs().count(), 0);
    }
}
