//! The expression algebra: `NumExpr`, `BoolExpr`, `ShapeExpr`.
//!
//! Each sort is its own closed enum rather than one dynamically-tagged tree,
//! so a `NumExpr` can never hold a `Shape` subterm by accident — the
//! distinction spec section 9's first redesign direction calls for. Builder
//! methods mirror `logicaffeine_verify::ir::VerifyExpr`'s `add`/`gt`/`and`
//! style, both for production use and for building test fixtures.

use crate::symbol::{Sort, SortOf, Symbol};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumBop {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
}

impl fmt::Display for NumBop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NumBop::Add => "+",
            NumBop::Sub => "-",
            NumBop::Mul => "*",
            NumBop::TrueDiv => "/",
            NumBop::FloorDiv => "//",
            NumBop::Mod => "%",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumUop {
    Neg,
    Floor,
    Ceil,
    Abs,
}

/// A `Num`-sorted expression: integers, reals, and the arithmetic built from
/// them, including the shape-indexing primitives (`Index`, `Numel`) that
/// cross over into `Shape`-sorted subterms.
#[derive(Debug, Clone, PartialEq)]
pub enum NumExpr {
    ConstInt(i64),
    ConstFloat(f64),
    SymRef(Symbol),
    Bop(NumBop, Box<NumExpr>, Box<NumExpr>),
    Uop(NumUop, Box<NumExpr>),
    /// `min`/`max` over a nonempty list of operands.
    Min(Vec<NumExpr>),
    Max(Vec<NumExpr>),
    /// The `index`-th dimension of a shape.
    Index(Box<ShapeExpr>, Box<NumExpr>),
    /// Product of all dimensions of a shape.
    Numel(Box<ShapeExpr>),
}

impl NumExpr {
    pub fn int(v: i64) -> Self {
        NumExpr::ConstInt(v)
    }

    pub fn float(v: f64) -> Self {
        NumExpr::ConstFloat(v)
    }

    pub fn var(sym: Symbol) -> Self {
        NumExpr::SymRef(sym)
    }

    pub fn add(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::Add, Box::new(l), Box::new(r))
    }

    pub fn sub(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::Sub, Box::new(l), Box::new(r))
    }

    pub fn mul(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::Mul, Box::new(l), Box::new(r))
    }

    pub fn true_div(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::TrueDiv, Box::new(l), Box::new(r))
    }

    pub fn floor_div(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::FloorDiv, Box::new(l), Box::new(r))
    }

    pub fn modulo(l: NumExpr, r: NumExpr) -> Self {
        NumExpr::Bop(NumBop::Mod, Box::new(l), Box::new(r))
    }

    pub fn neg(v: NumExpr) -> Self {
        NumExpr::Uop(NumUop::Neg, Box::new(v))
    }

    pub fn floor(v: NumExpr) -> Self {
        NumExpr::Uop(NumUop::Floor, Box::new(v))
    }

    pub fn ceil(v: NumExpr) -> Self {
        NumExpr::Uop(NumUop::Ceil, Box::new(v))
    }

    pub fn abs(v: NumExpr) -> Self {
        NumExpr::Uop(NumUop::Abs, Box::new(v))
    }

    pub fn index(base: ShapeExpr, idx: NumExpr) -> Self {
        NumExpr::Index(Box::new(base), Box::new(idx))
    }

    pub fn numel(base: ShapeExpr) -> Self {
        NumExpr::Numel(Box::new(base))
    }
}

impl SortOf for NumExpr {
    fn sort(&self) -> Sort {
        Sort::Num
    }
}

impl fmt::Display for NumExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumExpr::ConstInt(v) => write!(f, "{v}"),
            NumExpr::ConstFloat(v) => write!(f, "{v}"),
            NumExpr::SymRef(s) => write!(f, "{s}"),
            NumExpr::Bop(op, l, r) => write!(f, "({l} {op} {r})"),
            NumExpr::Uop(NumUop::Neg, v) => write!(f, "(-{v})"),
            NumExpr::Uop(NumUop::Floor, v) => write!(f, "floor({v})"),
            NumExpr::Uop(NumUop::Ceil, v) => write!(f, "ceil({v})"),
            NumExpr::Uop(NumUop::Abs, v) => write!(f, "abs({v})"),
            NumExpr::Min(vs) => write!(f, "min({})", join(vs)),
            NumExpr::Max(vs) => write!(f, "max({})", join(vs)),
            NumExpr::Index(base, idx) => write!(f, "{base}[{idx}]"),
            NumExpr::Numel(base) => write!(f, "numel({base})"),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A `Bool`-sorted expression.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    Const(bool),
    SymRef(Symbol),
    EqNum(Box<NumExpr>, Box<NumExpr>),
    NeNum(Box<NumExpr>, Box<NumExpr>),
    EqShape(Box<ShapeExpr>, Box<ShapeExpr>),
    NeShape(Box<ShapeExpr>, Box<ShapeExpr>),
    Lt(Box<NumExpr>, Box<NumExpr>),
    Le(Box<NumExpr>, Box<NumExpr>),
    Not(Box<BoolExpr>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
}

impl BoolExpr {
    pub fn bool(v: bool) -> Self {
        BoolExpr::Const(v)
    }

    pub fn var(sym: Symbol) -> Self {
        BoolExpr::SymRef(sym)
    }

    pub fn eq_num(l: NumExpr, r: NumExpr) -> Self {
        BoolExpr::EqNum(Box::new(l), Box::new(r))
    }

    pub fn ne_num(l: NumExpr, r: NumExpr) -> Self {
        BoolExpr::NeNum(Box::new(l), Box::new(r))
    }

    pub fn eq_shape(l: ShapeExpr, r: ShapeExpr) -> Self {
        BoolExpr::EqShape(Box::new(l), Box::new(r))
    }

    pub fn ne_shape(l: ShapeExpr, r: ShapeExpr) -> Self {
        BoolExpr::NeShape(Box::new(l), Box::new(r))
    }

    pub fn lt(l: NumExpr, r: NumExpr) -> Self {
        BoolExpr::Lt(Box::new(l), Box::new(r))
    }

    pub fn le(l: NumExpr, r: NumExpr) -> Self {
        BoolExpr::Le(Box::new(l), Box::new(r))
    }

    pub fn not(v: BoolExpr) -> Self {
        BoolExpr::Not(Box::new(v))
    }

    pub fn and(l: BoolExpr, r: BoolExpr) -> Self {
        BoolExpr::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: BoolExpr, r: BoolExpr) -> Self {
        BoolExpr::Or(Box::new(l), Box::new(r))
    }
}

impl SortOf for BoolExpr {
    fn sort(&self) -> Sort {
        Sort::Bool
    }
}

impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Const(v) => write!(f, "{v}"),
            BoolExpr::SymRef(s) => write!(f, "{s}"),
            BoolExpr::EqNum(l, r) => write!(f, "({l} == {r})"),
            BoolExpr::EqShape(l, r) => write!(f, "({l} == {r})"),
            BoolExpr::NeNum(l, r) => write!(f, "({l} != {r})"),
            BoolExpr::NeShape(l, r) => write!(f, "({l} != {r})"),
            BoolExpr::Lt(l, r) => write!(f, "({l} < {r})"),
            BoolExpr::Le(l, r) => write!(f, "({l} <= {r})"),
            BoolExpr::Not(v) => write!(f, "!({v})"),
            BoolExpr::And(l, r) => write!(f, "({l} && {r})"),
            BoolExpr::Or(l, r) => write!(f, "({l} || {r})"),
        }
    }
}

/// A `Shape`-sorted expression: a tensor shape's dimension vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeExpr {
    /// A fully known dimension list, with its (redundant but carried) rank.
    Const(Vec<NumExpr>, Box<NumExpr>),
    SymRef(Symbol),
    /// `base` with dimension `axis` set to `dim`.
    Set(Box<ShapeExpr>, Box<NumExpr>, Box<NumExpr>),
    /// `base[start..end]`; `None` bounds default per `rank_of`.
    Slice(Box<ShapeExpr>, Option<Box<NumExpr>>, Option<Box<NumExpr>>),
    Concat(Box<ShapeExpr>, Box<ShapeExpr>),
    /// The broadcast (NumPy rules) of two shapes.
    Broadcast(Box<ShapeExpr>, Box<ShapeExpr>),
}

impl ShapeExpr {
    pub fn constant(dims: Vec<NumExpr>) -> Self {
        let rank = NumExpr::int(dims.len() as i64);
        ShapeExpr::Const(dims, Box::new(rank))
    }

    pub fn var(sym: Symbol) -> Self {
        ShapeExpr::SymRef(sym)
    }

    pub fn set(base: ShapeExpr, axis: NumExpr, dim: NumExpr) -> Self {
        ShapeExpr::Set(Box::new(base), Box::new(axis), Box::new(dim))
    }

    pub fn slice(base: ShapeExpr, start: Option<NumExpr>, end: Option<NumExpr>) -> Self {
        ShapeExpr::Slice(Box::new(base), start.map(Box::new), end.map(Box::new))
    }

    pub fn concat(l: ShapeExpr, r: ShapeExpr) -> Self {
        ShapeExpr::Concat(Box::new(l), Box::new(r))
    }

    pub fn broadcast(l: ShapeExpr, r: ShapeExpr) -> Self {
        ShapeExpr::Broadcast(Box::new(l), Box::new(r))
    }
}

impl SortOf for ShapeExpr {
    fn sort(&self) -> Sort {
        Sort::Shape
    }
}

impl fmt::Display for ShapeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeExpr::Const(dims, _) => write!(f, "[{}]", join(dims)),
            ShapeExpr::SymRef(s) => write!(f, "{s}"),
            ShapeExpr::Set(base, axis, dim) => write!(f, "{base}.set({axis}, {dim})"),
            ShapeExpr::Slice(base, start, end) => {
                let start = start
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "0".to_string());
                let end = end
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "rank".to_string());
                write!(f, "{base}[{start}:{end}]")
            }
            ShapeExpr::Concat(l, r) => write!(f, "concat({l}, {r})"),
            ShapeExpr::Broadcast(l, r) => write!(f, "broadcast({l}, {r})"),
        }
    }
}

/// Computes a shape's rank as a `Num` expression, per the recursive
/// definition over each `ShapeExpr` constructor (spec section 4.1).
/// `Slice`'s missing bounds default to `0` and `rank_of(base)` respectively.
///
/// Panics if `shape` is `SymRef` to a non-`Shape` symbol or one missing a
/// rank; both are decoder invariants enforced before this is ever called.
pub fn rank_of(shape: &ShapeExpr) -> NumExpr {
    match shape {
        ShapeExpr::Const(_, rank) => (**rank).clone(),
        ShapeExpr::SymRef(sym) => sym
            .rank
            .as_ref()
            .expect("shape symbol must carry a rank")
            .as_ref()
            .clone(),
        ShapeExpr::Set(base, _, _) => rank_of(base),
        ShapeExpr::Slice(base, start, end) => {
            let hi = end
                .as_ref()
                .map(|e| (**e).clone())
                .unwrap_or_else(|| rank_of(base));
            let lo = start
                .as_ref()
                .map(|s| (**s).clone())
                .unwrap_or(NumExpr::ConstInt(0));
            NumExpr::sub(hi, lo)
        }
        ShapeExpr::Concat(l, r) => NumExpr::add(rank_of(l), rank_of(r)),
        ShapeExpr::Broadcast(l, r) => NumExpr::Max(vec![rank_of(l), rank_of(r)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn sort_is_total_by_construction() {
        assert_eq!(NumExpr::int(1).sort(), Sort::Num);
        assert_eq!(BoolExpr::bool(true).sort(), Sort::Bool);
        assert_eq!(ShapeExpr::constant(vec![]).sort(), Sort::Shape);
    }

    #[test]
    fn rank_of_const_matches_dim_count() {
        let s = ShapeExpr::constant(vec![NumExpr::int(2), NumExpr::int(3)]);
        assert_eq!(rank_of(&s), NumExpr::int(2));
    }

    #[test]
    fn rank_of_concat_sums_ranks() {
        let a = ShapeExpr::constant(vec![NumExpr::int(2)]);
        let b = ShapeExpr::constant(vec![NumExpr::int(3), NumExpr::int(4)]);
        let r = rank_of(&ShapeExpr::concat(a, b));
        assert_eq!(r, NumExpr::add(NumExpr::int(1), NumExpr::int(2)));
    }

    #[test]
    fn rank_of_broadcast_takes_max() {
        let a = ShapeExpr::constant(vec![NumExpr::int(2)]);
        let b = ShapeExpr::constant(vec![NumExpr::int(3), NumExpr::int(4)]);
        let r = rank_of(&ShapeExpr::broadcast(a, b));
        assert_eq!(r, NumExpr::Max(vec![NumExpr::int(1), NumExpr::int(2)]));
    }

    #[test]
    fn rank_of_slice_defaults_start_zero() {
        let base = ShapeExpr::var(Symbol::shape("x", NumExpr::int(4)));
        let sliced = ShapeExpr::slice(base, None, Some(NumExpr::int(2)));
        assert_eq!(rank_of(&sliced), NumExpr::sub(NumExpr::int(2), NumExpr::int(0)));
    }

    #[test]
    fn display_round_trips_readably() {
        let e = NumExpr::add(NumExpr::int(1), NumExpr::int(2));
        assert_eq!(e.to_string(), "(1 + 2)");
    }

    #[test]
    #[allow(clippy::eq_op)]
    fn symbol_scalar_has_no_rank() {
        let sym = Symbol::scalar("n", SymbolKind::Int);
        assert!(sym.rank.is_none());
    }
}
