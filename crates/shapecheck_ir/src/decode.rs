//! Decodes a front-end-emitted document into symbolic IR.
//!
//! The wire format is a flat, dynamically-tagged JSON tree (small integer
//! `type`/`expType`/`opType` fields select the variant, and the fields that
//! apply differ per tag) — the same shape `packages/pytea/z3wrapper/json2z3.py`
//! walks as plain dicts. Rather than model that union as one Rust enum with
//! every field optional, decoding is a single pass over `serde_json::Value`
//! that exhaustively matches on each tag and fails fast (`DecodeError`) the
//! moment a required field is absent or the wrong shape, producing the
//! closed, sort-indexed IR types downstream code can pattern-match
//! exhaustively over. Unknown extra fields are silently ignored, matching
//! `logicaffeine_compile::diagnostic`'s tolerant `#[serde(default)]` style.

use crate::ctr::{Ctr, CtrKind, ConstraintSet, Source};
use crate::error::{DecodeError, DecodeResult};
use crate::expr::{BoolExpr, NumBop, NumExpr, NumUop, ShapeExpr};
use crate::symbol::{Symbol, SymbolKind};
use serde::Deserialize;
use serde_json::Value;

/// One path's worth of raw constraint data, still using `serde_json::Value`
/// for `ctrPool` entries since their shape depends on each entry's `type`.
#[derive(Debug, Deserialize)]
pub struct PathDoc {
    #[serde(rename = "ctrPool")]
    pub ctr_pool: Vec<Value>,
    #[serde(rename = "hardCtr")]
    pub hard_ctr: Vec<usize>,
    #[serde(rename = "softCtr")]
    pub soft_ctr: Vec<usize>,
    #[serde(rename = "pathCtr")]
    pub path_ctr: Vec<usize>,
}

pub type Document = Vec<PathDoc>;

/// Parses the top-level JSON document into its path list, without
/// interpreting constraint contents yet.
pub fn parse_document(text: &str) -> DecodeResult<Document> {
    serde_json::from_str(text).map_err(|e| DecodeError::malformed(e.to_string()))
}

/// Decodes every path of a parsed document into a [`ConstraintSet`], in
/// input order.
pub fn decode_document(doc: Document) -> DecodeResult<Vec<ConstraintSet>> {
    doc.into_iter()
        .enumerate()
        .map(|(i, path)| decode_path(i, path))
        .collect()
}

fn decode_path(path_idx: usize, doc: PathDoc) -> DecodeResult<ConstraintSet> {
    let loc = format!("paths[{path_idx}]");
    let pool_len = doc.ctr_pool.len();
    let ctr_pool = doc
        .ctr_pool
        .iter()
        .enumerate()
        .map(|(i, v)| decode_ctr(&format!("{loc}.ctrPool[{i}]"), v))
        .collect::<DecodeResult<Vec<_>>>()?;

    let check_indices = |field: &str, idxs: &[usize]| -> DecodeResult<()> {
        for &i in idxs {
            if i >= pool_len {
                return Err(DecodeError::index_out_of_range(
                    format!("{loc}.{field}"),
                    i,
                    pool_len,
                ));
            }
        }
        Ok(())
    };
    check_indices("hardCtr", &doc.hard_ctr)?;
    check_indices("softCtr", &doc.soft_ctr)?;
    check_indices("pathCtr", &doc.path_ctr)?;

    Ok(ConstraintSet {
        ctr_pool,
        hard: doc.hard_ctr,
        path: doc.path_ctr,
        soft: doc.soft_ctr,
    })
}

// ---------------------------------------------------------------------
// Value field helpers
// ---------------------------------------------------------------------

fn field<'a>(loc: &str, v: &'a Value, name: &str) -> DecodeResult<&'a Value> {
    v.get(name)
        .ok_or_else(|| DecodeError::missing_field(loc, name))
}

fn as_i64(loc: &str, v: &Value) -> DecodeResult<i64> {
    v.as_i64()
        .ok_or_else(|| DecodeError::missing_field(loc, "<integer>"))
}

fn tag(loc: &str, v: &Value, field_name: &str) -> DecodeResult<i64> {
    as_i64(loc, field(loc, v, field_name)?)
}

fn decode_source(v: &Value) -> Option<Source> {
    let s = v.get("source")?;
    let start = s.get("start")?.as_u64()? as usize;
    let length = s.get("length")?.as_u64()? as usize;
    Some(Source { start, length })
}

fn decode_message(v: &Value) -> Option<String> {
    v.get("message").and_then(|m| m.as_str()).map(String::from)
}

/// Rejects a dim/rank expression that bottoms out in a literal float, per
/// the wire format's requirement that dims and ranks are integral. Walks
/// through the arithmetic an expression can legally be built from (the
/// front-end may compute a dim as `n - 1` rather than emit it as a bare
/// literal); a symbolic reference is trusted to resolve to an `Int`, since
/// `Float`-kind symbols are rejected independently by sort.
fn check_integral(loc: &str, e: &NumExpr) -> DecodeResult<()> {
    match e {
        NumExpr::ConstFloat(v) => Err(DecodeError::not_an_integer(loc, *v)),
        NumExpr::Bop(_, l, r) => {
            check_integral(loc, l)?;
            check_integral(loc, r)
        }
        NumExpr::Uop(_, v) => check_integral(loc, v),
        NumExpr::Min(vs) | NumExpr::Max(vs) => vs.iter().try_for_each(|v| check_integral(loc, v)),
        NumExpr::ConstInt(_) | NumExpr::SymRef(_) | NumExpr::Index(_, _) | NumExpr::Numel(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------

fn decode_ctr(loc: &str, v: &Value) -> DecodeResult<Ctr> {
    let ty = tag(loc, v, "type")?;
    let kind = match ty {
        0 => CtrKind::ExpBool(decode_bool_expr(&format!("{loc}.exp"), field(loc, v, "exp")?)?),
        1 => {
            let (l, r) = decode_pair(loc, v)?;
            eq_kind(loc, l, r)?
        }
        2 => {
            let (l, r) = decode_pair(loc, v)?;
            ne_kind(loc, l, r)?
        }
        3 => CtrKind::And(
            Box::new(decode_ctr(&format!("{loc}.left"), field(loc, v, "left")?)?),
            Box::new(decode_ctr(&format!("{loc}.right"), field(loc, v, "right")?)?),
        ),
        4 => CtrKind::Or(
            Box::new(decode_ctr(&format!("{loc}.left"), field(loc, v, "left")?)?),
            Box::new(decode_ctr(&format!("{loc}.right"), field(loc, v, "right")?)?),
        ),
        5 => CtrKind::Not(Box::new(decode_ctr(
            &format!("{loc}.constraint"),
            field(loc, v, "constraint")?,
        )?)),
        6 => {
            let (l, r) = decode_num_pair(loc, v)?;
            CtrKind::Lt(l, r)
        }
        7 => {
            let (l, r) = decode_num_pair(loc, v)?;
            CtrKind::Le(l, r)
        }
        8 => decode_forall(loc, v)?,
        9 => {
            let l = decode_shape_field(loc, v, "left")?;
            let r = decode_shape_field(loc, v, "right")?;
            CtrKind::Broadcastable(l, r)
        }
        10 => CtrKind::Fail,
        other => return Err(DecodeError::unknown_tag(loc, other)),
    };
    Ok(Ctr {
        kind,
        source: decode_source(v),
        message: decode_message(v),
    })
}

fn decode_pair(loc: &str, v: &Value) -> DecodeResult<(AnyExpr, AnyExpr)> {
    let l = decode_expr(&format!("{loc}.left"), field(loc, v, "left")?)?;
    let r = decode_expr(&format!("{loc}.right"), field(loc, v, "right")?)?;
    Ok((l, r))
}

fn decode_num_pair(loc: &str, v: &Value) -> DecodeResult<(NumExpr, NumExpr)> {
    let l = decode_num_field(loc, v, "left")?;
    let r = decode_num_field(loc, v, "right")?;
    Ok((l, r))
}

fn eq_kind(loc: &str, l: AnyExpr, r: AnyExpr) -> DecodeResult<CtrKind> {
    match (l, r) {
        (AnyExpr::Num(l), AnyExpr::Num(r)) => Ok(CtrKind::EqNum(l, r)),
        (AnyExpr::Shape(l), AnyExpr::Shape(r)) => Ok(CtrKind::EqShape(l, r)),
        (l, _) => Err(DecodeError::sort_mismatch(loc, "Num or Shape", l.sort_name())),
    }
}

fn ne_kind(loc: &str, l: AnyExpr, r: AnyExpr) -> DecodeResult<CtrKind> {
    match (l, r) {
        (AnyExpr::Num(l), AnyExpr::Num(r)) => Ok(CtrKind::NeNum(l, r)),
        (AnyExpr::Shape(l), AnyExpr::Shape(r)) => Ok(CtrKind::NeShape(l, r)),
        (l, _) => Err(DecodeError::sort_mismatch(loc, "Num or Shape", l.sort_name())),
    }
}

fn decode_forall(loc: &str, v: &Value) -> DecodeResult<CtrKind> {
    let sym_loc = format!("{loc}.symbol");
    let sym = decode_symbol(&sym_loc, field(loc, v, "symbol")?)?;
    let range = field(loc, v, "range")?
        .as_array()
        .ok_or_else(|| DecodeError::missing_field(loc, "range"))?;
    if range.len() != 2 {
        return Err(DecodeError::missing_field(loc, "range (expected 2 entries)"));
    }
    let lo = decode_num_expr(&format!("{loc}.range[0]"), &range[0])?;
    let hi = decode_num_expr(&format!("{loc}.range[1]"), &range[1])?;
    let body = decode_ctr(
        &format!("{loc}.constraint"),
        field(loc, v, "constraint")?,
    )?;
    Ok(CtrKind::Forall {
        sym,
        lo,
        hi,
        body: Box::new(body),
    })
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

/// The result of decoding a generic expression field before its sort is
/// known to the caller (e.g. the operands of an `Equal` constraint, which
/// may be either `Num` or `Shape`).
enum AnyExpr {
    Num(NumExpr),
    Bool(BoolExpr),
    Shape(ShapeExpr),
}

impl AnyExpr {
    fn sort_name(&self) -> &'static str {
        match self {
            AnyExpr::Num(_) => "Num",
            AnyExpr::Bool(_) => "Bool",
            AnyExpr::Shape(_) => "Shape",
        }
    }

    fn into_num(self, loc: &str) -> DecodeResult<NumExpr> {
        match self {
            AnyExpr::Num(n) => Ok(n),
            other => Err(DecodeError::sort_mismatch(loc, "Num", other.sort_name())),
        }
    }

    fn into_bool(self, loc: &str) -> DecodeResult<BoolExpr> {
        match self {
            AnyExpr::Bool(b) => Ok(b),
            other => Err(DecodeError::sort_mismatch(loc, "Bool", other.sort_name())),
        }
    }

    fn into_shape(self, loc: &str) -> DecodeResult<ShapeExpr> {
        match self {
            AnyExpr::Shape(s) => Ok(s),
            other => Err(DecodeError::sort_mismatch(loc, "Shape", other.sort_name())),
        }
    }
}

fn decode_expr(loc: &str, v: &Value) -> DecodeResult<AnyExpr> {
    match tag(loc, v, "expType")? {
        0 => decode_shape_op(loc, v).map(AnyExpr::Shape),
        1 => decode_num_op(loc, v).map(AnyExpr::Num),
        2 => decode_bool_op(loc, v).map(AnyExpr::Bool),
        3 => Err(DecodeError::sort_mismatch(loc, "Num, Bool, or Shape", "String")),
        other => Err(DecodeError::unknown_tag(loc, other)),
    }
}

fn decode_num_expr(loc: &str, v: &Value) -> DecodeResult<NumExpr> {
    decode_expr(loc, v)?.into_num(loc)
}

fn decode_bool_expr(loc: &str, v: &Value) -> DecodeResult<BoolExpr> {
    decode_expr(loc, v)?.into_bool(loc)
}

fn decode_shape_expr(loc: &str, v: &Value) -> DecodeResult<ShapeExpr> {
    decode_expr(loc, v)?.into_shape(loc)
}

fn decode_num_field(loc: &str, v: &Value, name: &str) -> DecodeResult<NumExpr> {
    decode_num_expr(&format!("{loc}.{name}"), field(loc, v, name)?)
}

fn decode_shape_field(loc: &str, v: &Value, name: &str) -> DecodeResult<ShapeExpr> {
    decode_shape_expr(&format!("{loc}.{name}"), field(loc, v, name)?)
}

fn decode_symbol(loc: &str, v: &Value) -> DecodeResult<Symbol> {
    let name = field(loc, v, "name")?
        .as_str()
        .ok_or_else(|| DecodeError::missing_field(loc, "name"))?
        .to_string();
    let kind = match tag(loc, v, "type")? {
        0 => SymbolKind::Int,
        1 => SymbolKind::Float,
        2 => SymbolKind::String,
        3 => SymbolKind::Bool,
        4 => SymbolKind::Shape,
        other => return Err(DecodeError::unknown_tag(loc, other)),
    };
    let rank = if kind == SymbolKind::Shape {
        let rank_loc = format!("{loc}.rank");
        let rank_expr = decode_num_expr(&rank_loc, field(loc, v, "rank")?)?;
        check_integral(&rank_loc, &rank_expr)?;
        Some(Box::new(rank_expr))
    } else {
        None
    };
    Ok(Symbol { name, kind, rank })
}

fn decode_num_op(loc: &str, v: &Value) -> DecodeResult<NumExpr> {
    match tag(loc, v, "opType")? {
        0 => decode_num_const(loc, field(loc, v, "value")?),
        1 => {
            let sym_loc = format!("{loc}.symbol");
            Ok(NumExpr::SymRef(decode_symbol(
                &sym_loc,
                field(loc, v, "symbol")?,
            )?))
        }
        2 => {
            let op = match tag(loc, v, "bopType")? {
                0 => NumBop::Add,
                1 => NumBop::Sub,
                2 => NumBop::Mul,
                3 => NumBop::TrueDiv,
                4 => NumBop::FloorDiv,
                5 => NumBop::Mod,
                other => return Err(DecodeError::unknown_tag(&format!("{loc}.bopType"), other)),
            };
            let l = decode_num_field(loc, v, "left")?;
            let r = decode_num_field(loc, v, "right")?;
            Ok(NumExpr::Bop(op, Box::new(l), Box::new(r)))
        }
        3 => {
            let base = decode_shape_field(loc, v, "baseShape")?;
            let idx = decode_num_field(loc, v, "index")?;
            Ok(NumExpr::Index(Box::new(base), Box::new(idx)))
        }
        4 => Ok(NumExpr::Max(decode_num_values(loc, v)?)),
        5 => {
            let base = decode_shape_field(loc, v, "baseShape")?;
            Ok(NumExpr::Numel(Box::new(base)))
        }
        6 => {
            let op = match tag(loc, v, "uopType")? {
                0 => NumUop::Neg,
                1 => NumUop::Floor,
                2 => NumUop::Ceil,
                3 => NumUop::Abs,
                other => return Err(DecodeError::unknown_tag(&format!("{loc}.uopType"), other)),
            };
            let base = decode_num_field(loc, v, "baseValue")?;
            Ok(NumExpr::Uop(op, Box::new(base)))
        }
        7 => Ok(NumExpr::Min(decode_num_values(loc, v)?)),
        other => Err(DecodeError::unknown_tag(&format!("{loc}.opType"), other)),
    }
}

fn decode_num_const(loc: &str, v: &Value) -> DecodeResult<NumExpr> {
    if v.is_i64() || v.is_u64() {
        Ok(NumExpr::ConstInt(
            v.as_i64().ok_or_else(|| DecodeError::missing_field(loc, "value"))?,
        ))
    } else if let Some(f) = v.as_f64() {
        Ok(NumExpr::ConstFloat(f))
    } else {
        Err(DecodeError::missing_field(loc, "value"))
    }
}

fn decode_num_values(loc: &str, v: &Value) -> DecodeResult<Vec<NumExpr>> {
    let values_loc = format!("{loc}.values");
    field(loc, v, "values")?
        .as_array()
        .ok_or_else(|| DecodeError::missing_field(loc, "values"))?
        .iter()
        .enumerate()
        .map(|(i, e)| decode_num_expr(&format!("{values_loc}[{i}]"), e))
        .collect()
}

fn decode_shape_op(loc: &str, v: &Value) -> DecodeResult<ShapeExpr> {
    match tag(loc, v, "opType")? {
        0 => {
            let dims_loc = format!("{loc}.dims");
            let dims = field(loc, v, "dims")?
                .as_array()
                .ok_or_else(|| DecodeError::missing_field(loc, "dims"))?
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let dloc = format!("{dims_loc}[{i}]");
                    let dim = decode_num_expr(&dloc, e)?;
                    check_integral(&dloc, &dim)?;
                    Ok(dim)
                })
                .collect::<DecodeResult<Vec<_>>>()?;
            let rank = NumExpr::ConstInt(dims.len() as i64);
            Ok(ShapeExpr::Const(dims, Box::new(rank)))
        }
        1 => {
            let sym_loc = format!("{loc}.symbol");
            Ok(ShapeExpr::SymRef(decode_symbol(
                &sym_loc,
                field(loc, v, "symbol")?,
            )?))
        }
        2 => {
            let base = decode_shape_field(loc, v, "baseShape")?;
            let axis = decode_num_field(loc, v, "axis")?;
            let dim = decode_num_field(loc, v, "dim")?;
            Ok(ShapeExpr::Set(Box::new(base), Box::new(axis), Box::new(dim)))
        }
        3 => {
            let base = decode_shape_field(loc, v, "baseShape")?;
            let start = match v.get("start") {
                Some(s) if !s.is_null() => Some(Box::new(decode_num_expr(&format!("{loc}.start"), s)?)),
                _ => None,
            };
            let end = match v.get("end") {
                Some(e) if !e.is_null() => Some(Box::new(decode_num_expr(&format!("{loc}.end"), e)?)),
                _ => None,
            };
            Ok(ShapeExpr::Slice(Box::new(base), start, end))
        }
        4 => {
            let l = decode_shape_field(loc, v, "left")?;
            let r = decode_shape_field(loc, v, "right")?;
            Ok(ShapeExpr::Concat(Box::new(l), Box::new(r)))
        }
        5 => {
            let l = decode_shape_field(loc, v, "left")?;
            let r = decode_shape_field(loc, v, "right")?;
            Ok(ShapeExpr::Broadcast(Box::new(l), Box::new(r)))
        }
        other => Err(DecodeError::unknown_tag(&format!("{loc}.opType"), other)),
    }
}

fn decode_bool_op(loc: &str, v: &Value) -> DecodeResult<BoolExpr> {
    match tag(loc, v, "opType")? {
        0 => {
            let b = field(loc, v, "value")?
                .as_bool()
                .ok_or_else(|| DecodeError::missing_field(loc, "value"))?;
            Ok(BoolExpr::Const(b))
        }
        1 => {
            let sym_loc = format!("{loc}.symbol");
            Ok(BoolExpr::SymRef(decode_symbol(
                &sym_loc,
                field(loc, v, "symbol")?,
            )?))
        }
        2 => {
            let (l, r) = decode_pair(loc, v)?;
            match (l, r) {
                (AnyExpr::Num(l), AnyExpr::Num(r)) => Ok(BoolExpr::EqNum(Box::new(l), Box::new(r))),
                (AnyExpr::Shape(l), AnyExpr::Shape(r)) => {
                    Ok(BoolExpr::EqShape(Box::new(l), Box::new(r)))
                }
                (l, _) => Err(DecodeError::sort_mismatch(loc, "Num or Shape", l.sort_name())),
            }
        }
        3 => {
            let (l, r) = decode_pair(loc, v)?;
            match (l, r) {
                (AnyExpr::Num(l), AnyExpr::Num(r)) => Ok(BoolExpr::NeNum(Box::new(l), Box::new(r))),
                (AnyExpr::Shape(l), AnyExpr::Shape(r)) => {
                    Ok(BoolExpr::NeShape(Box::new(l), Box::new(r)))
                }
                (l, _) => Err(DecodeError::sort_mismatch(loc, "Num or Shape", l.sort_name())),
            }
        }
        4 => {
            let (l, r) = decode_num_pair(loc, v)?;
            Ok(BoolExpr::Lt(Box::new(l), Box::new(r)))
        }
        5 => {
            let (l, r) = decode_num_pair(loc, v)?;
            Ok(BoolExpr::Le(Box::new(l), Box::new(r)))
        }
        6 => {
            let inner_loc = format!("{loc}.value");
            let inner = decode_bool_expr(&inner_loc, field(loc, v, "value")?)?;
            Ok(BoolExpr::Not(Box::new(inner)))
        }
        7 => {
            let l = decode_bool_field(loc, v, "left")?;
            let r = decode_bool_field(loc, v, "right")?;
            Ok(BoolExpr::And(Box::new(l), Box::new(r)))
        }
        8 => {
            let l = decode_bool_field(loc, v, "left")?;
            let r = decode_bool_field(loc, v, "right")?;
            Ok(BoolExpr::Or(Box::new(l), Box::new(r)))
        }
        other => Err(DecodeError::unknown_tag(&format!("{loc}.opType"), other)),
    }
}

fn decode_bool_field(loc: &str, v: &Value, name: &str) -> DecodeResult<BoolExpr> {
    decode_bool_expr(&format!("{loc}.{name}"), field(loc, v, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_const_int() {
        let e = decode_num_expr("x", &v(r#"{"expType":1,"opType":0,"value":3}"#)).unwrap();
        assert_eq!(e, NumExpr::ConstInt(3));
    }

    #[test]
    fn decodes_const_float() {
        let e = decode_num_expr("x", &v(r#"{"expType":1,"opType":0,"value":3.5}"#)).unwrap();
        assert_eq!(e, NumExpr::ConstFloat(3.5));
    }

    #[test]
    fn decodes_bop_add() {
        let json = r#"{
            "expType":1,"opType":2,"bopType":0,
            "left":{"expType":1,"opType":0,"value":1},
            "right":{"expType":1,"opType":0,"value":2}
        }"#;
        let e = decode_num_expr("x", &v(json)).unwrap();
        assert_eq!(e, NumExpr::add(NumExpr::int(1), NumExpr::int(2)));
    }

    #[test]
    fn unknown_ctr_tag_is_rejected() {
        let err = decode_ctr("x", &v(r#"{"type":99}"#)).unwrap_err();
        assert_eq!(err.kind, crate::error::DecodeErrorKind::UnknownTag);
    }

    #[test]
    fn missing_field_is_reported_with_path() {
        let err = decode_ctr("paths[0].ctrPool[0]", &v(r#"{"type":6,"left":{"expType":1,"opType":0,"value":1}}"#))
            .unwrap_err();
        assert!(err.path.starts_with("paths[0].ctrPool[0]"));
    }

    #[test]
    fn sort_mismatch_on_equal_between_num_and_shape() {
        let json = r#"{
            "type":1,
            "left":{"expType":1,"opType":0,"value":1},
            "right":{"expType":0,"opType":0,"dims":[]}
        }"#;
        let err = decode_ctr("x", &v(json)).unwrap_err();
        assert_eq!(err.kind, crate::error::DecodeErrorKind::SortMismatch);
    }

    #[test]
    fn non_integer_dim_is_rejected() {
        let json = r#"{"expType":0,"opType":0,"dims":[{"expType":1,"opType":0,"value":2.5}]}"#;
        let err = decode_shape_expr("x", &v(json)).unwrap_err();
        assert_eq!(err.kind, crate::error::DecodeErrorKind::NotAnInteger);
    }

    #[test]
    fn non_integer_rank_is_rejected() {
        let json = r#"{"name":"x","type":4,"rank":{"expType":1,"opType":0,"value":1.5}}"#;
        let err = decode_symbol("x", &v(json)).unwrap_err();
        assert_eq!(err.kind, crate::error::DecodeErrorKind::NotAnInteger);
    }

    #[test]
    fn decodes_full_path_with_index_check() {
        let path: PathDoc = serde_json::from_value(serde_json::json!({
            "ctrPool": [{"type": 10}],
            "hardCtr": [0],
            "softCtr": [],
            "pathCtr": []
        }))
        .unwrap();
        let set = decode_path(0, path).unwrap();
        assert_eq!(set.ctr_pool.len(), 1);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let path: PathDoc = serde_json::from_value(serde_json::json!({
            "ctrPool": [{"type": 10}],
            "hardCtr": [5],
            "softCtr": [],
            "pathCtr": []
        }))
        .unwrap();
        let err = decode_path(0, path).unwrap_err();
        assert_eq!(err.kind, crate::error::DecodeErrorKind::IndexOutOfRange);
    }
}
