//! Translates symbolic IR into Z3 formulas.
//!
//! `Num` expressions encode to `Int` or `Real`, `Bool` to `Bool`, `Shape` to
//! `Array Int Int` (dimension `i` of an out-of-range index reads as `-1`,
//! following `packages/pytea/z3wrapper/json2z3.py`'s convention). The
//! divide-by-zero guards (`z3_div`/`z3_mod`), `min`/`max`, and the recursive
//! `Numel` product are ported from that module's `z3_div`/`z3_mod`/
//! `z3_min`/`z3_max`/`_encodeExpNumNumel` rather than re-derived, since it is
//! the more precise reference for exactly how those primitives behave at the
//! edges (division by a symbolic zero, empty shapes, and so on).

use shapecheck_ir::{BoolExpr, Ctr, CtrKind, NumBop, NumExpr, NumUop, ShapeExpr};
use std::collections::HashMap;
use z3::ast::{Array, Ast, Bool, Int, Real};
use z3::{Context, RecFuncDecl, Sort};

use crate::error::EncodeError;

/// One encoder per constraint set. Holds the `Context` it was built with and
/// memoizes already-encoded subexpressions, keyed by the address of the IR
/// node (stable for the encoder's lifetime since the `ConstraintSet` it
/// walks owns every node and outlives the encoder).
pub struct Encoder<'ctx> {
    ctx: &'ctx Context,
    num_memo: HashMap<usize, Dynamic<'ctx>>,
    shape_memo: HashMap<usize, Array<'ctx>>,
    bool_memo: HashMap<usize, Bool<'ctx>>,
    numel_fn: Option<RecFuncDecl<'ctx>>,
}

/// Either an `Int` or a `Real`, whichever a `Num` expression encoded to.
#[derive(Clone)]
pub enum Dynamic<'ctx> {
    Int(Int<'ctx>),
    Real(Real<'ctx>),
}

impl<'ctx> Dynamic<'ctx> {
    fn is_int(&self) -> bool {
        matches!(self, Dynamic::Int(_))
    }

    fn into_int(self, ctx: &str) -> Result<Int<'ctx>, EncodeError> {
        match self {
            Dynamic::Int(i) => Ok(i),
            Dynamic::Real(_) => Err(EncodeError::RealInIntOp {
                context: ctx.to_string(),
            }),
        }
    }

    fn to_real(&self) -> Real<'ctx> {
        match self {
            Dynamic::Int(i) => i.to_real(),
            Dynamic::Real(r) => r.clone(),
        }
    }
}

fn addr<T>(r: &T) -> usize {
    r as *const T as usize
}

impl<'ctx> Encoder<'ctx> {
    pub fn new(ctx: &'ctx Context) -> Self {
        Self {
            ctx,
            num_memo: HashMap::new(),
            shape_memo: HashMap::new(),
            bool_memo: HashMap::new(),
            numel_fn: None,
        }
    }

    pub fn ctx(&self) -> &'ctx Context {
        self.ctx
    }

    /// The `prod(shape, lo, hi)` recursive function used by `Numel`:
    /// `if lo > hi then 1 else shape[lo] * prod(shape, lo + 1, hi)`.
    /// Built lazily and shared across every `Numel` site in a constraint set.
    fn numel_fn(&mut self) -> RecFuncDecl<'ctx> {
        if let Some(f) = &self.numel_fn {
            return f.clone();
        }
        let int_sort = Sort::int(self.ctx);
        let array_sort = Sort::array(self.ctx, &int_sort, &int_sort);
        let f = RecFuncDecl::new(
            self.ctx,
            "shapecheck_numel_prod",
            &[&array_sort, &int_sort, &int_sort],
            &int_sort,
        );
        let shape = Array::new_const(self.ctx, "shapecheck_numel_shape", &int_sort, &int_sort);
        let lo = Int::new_const(self.ctx, "shapecheck_numel_lo");
        let hi = Int::new_const(self.ctx, "shapecheck_numel_hi");
        let one = Int::from_i64(self.ctx, 1);
        let elem = shape.select(&lo).as_int().expect("array range is Int");
        let next_lo = Int::add(self.ctx, &[&lo, &one]);
        let recurse = f.apply(&[&shape as &dyn Ast, &next_lo as &dyn Ast, &hi as &dyn Ast]);
        let body = lo.gt(&hi).ite(
            &one,
            &Int::mul(self.ctx, &[&elem, &recurse.as_int().expect("prod returns Int")]),
        );
        f.add_def(&[&shape as &dyn Ast, &lo as &dyn Ast, &hi as &dyn Ast], &body);
        self.numel_fn = Some(f.clone());
        f
    }

    pub fn enc_num(&mut self, e: &NumExpr) -> Result<Dynamic<'ctx>, EncodeError> {
        if let Some(cached) = self.num_memo.get(&addr(e)) {
            return Ok(cached.clone());
        }
        let out = self.enc_num_uncached(e)?;
        self.num_memo.insert(addr(e), out.clone());
        Ok(out)
    }

    fn enc_num_uncached(&mut self, e: &NumExpr) -> Result<Dynamic<'ctx>, EncodeError> {
        match e {
            NumExpr::ConstInt(v) => Ok(Dynamic::Int(Int::from_i64(self.ctx, *v))),
            NumExpr::ConstFloat(v) => Ok(Dynamic::Real(real_from_f64(self.ctx, *v))),
            NumExpr::SymRef(sym) => match sym.kind {
                shapecheck_ir::SymbolKind::Float => {
                    Ok(Dynamic::Real(Real::new_const(self.ctx, sym.name.as_str())))
                }
                _ => Ok(Dynamic::Int(Int::new_const(self.ctx, sym.name.as_str()))),
            },
            NumExpr::Bop(op, l, r) => self.enc_num_bop(*op, l, r),
            NumExpr::Uop(op, v) => self.enc_num_uop(*op, v),
            NumExpr::Min(vs) => self.enc_num_reduce(vs, false),
            NumExpr::Max(vs) => self.enc_num_reduce(vs, true),
            NumExpr::Index(base, idx) => {
                let shape = self.enc_shape(base)?;
                let idx = self.enc_num(idx)?.into_int("Index")?;
                Ok(Dynamic::Int(
                    shape.select(&idx).as_int().expect("array range is Int"),
                ))
            }
            NumExpr::Numel(base) => {
                let shape = self.enc_shape(base)?;
                let rank = self.enc_num(&shapecheck_ir::rank_of(base))?.into_int("Numel")?;
                let zero = Int::from_i64(self.ctx, 0);
                let one = Int::from_i64(self.ctx, 1);
                let f = self.numel_fn();
                let hi = Int::sub(self.ctx, &[&rank, &one]);
                let app = f.apply(&[&shape as &dyn Ast, &zero as &dyn Ast, &hi as &dyn Ast]);
                Ok(Dynamic::Int(app.as_int().expect("prod returns Int")))
            }
        }
    }

    fn enc_num_bop(
        &mut self,
        op: NumBop,
        l: &NumExpr,
        r: &NumExpr,
    ) -> Result<Dynamic<'ctx>, EncodeError> {
        let l = self.enc_num(l)?;
        let r = self.enc_num(r)?;
        match op {
            NumBop::Add if l.is_int() && r.is_int() => Ok(Dynamic::Int(Int::add(
                self.ctx,
                &[&l.into_int("Add")?, &r.into_int("Add")?],
            ))),
            NumBop::Add => Ok(Dynamic::Real(Real::add(self.ctx, &[&l.to_real(), &r.to_real()]))),
            NumBop::Sub if l.is_int() && r.is_int() => Ok(Dynamic::Int(Int::sub(
                self.ctx,
                &[&l.into_int("Sub")?, &r.into_int("Sub")?],
            ))),
            NumBop::Sub => Ok(Dynamic::Real(Real::sub(self.ctx, &[&l.to_real(), &r.to_real()]))),
            NumBop::Mul if l.is_int() && r.is_int() => Ok(Dynamic::Int(Int::mul(
                self.ctx,
                &[&l.into_int("Mul")?, &r.into_int("Mul")?],
            ))),
            NumBop::Mul => Ok(Dynamic::Real(Real::mul(self.ctx, &[&l.to_real(), &r.to_real()]))),
            NumBop::TrueDiv => Ok(Dynamic::Real(z3_div_real(self.ctx, &l.to_real(), &r.to_real()))),
            NumBop::FloorDiv => {
                let l = l.into_int("FloorDiv")?;
                let r = r.into_int("FloorDiv")?;
                Ok(Dynamic::Int(z3_div(self.ctx, &l, &r)))
            }
            NumBop::Mod => {
                let l = l.into_int("Mod")?;
                let r = r.into_int("Mod")?;
                Ok(Dynamic::Int(z3_mod(self.ctx, &l, &r)))
            }
        }
    }

    fn enc_num_uop(&mut self, op: NumUop, v: &NumExpr) -> Result<Dynamic<'ctx>, EncodeError> {
        let v = self.enc_num(v)?;
        match (op, v) {
            (NumUop::Neg, Dynamic::Int(v)) => Ok(Dynamic::Int(v.unary_minus())),
            (NumUop::Neg, Dynamic::Real(v)) => Ok(Dynamic::Real(v.unary_minus())),
            (NumUop::Floor, Dynamic::Int(v)) => Ok(Dynamic::Int(v)),
            (NumUop::Floor, Dynamic::Real(v)) => Ok(Dynamic::Int(v.to_int())),
            (NumUop::Ceil, Dynamic::Int(v)) => Ok(Dynamic::Int(v)),
            (NumUop::Ceil, Dynamic::Real(v)) => {
                let floor = v.to_int();
                let one = Int::from_i64(self.ctx, 1);
                let is_exact = floor.to_real()._eq(&v);
                Ok(Dynamic::Int(is_exact.ite(&floor, &Int::add(self.ctx, &[&floor, &one]))))
            }
            (NumUop::Abs, Dynamic::Int(v)) => {
                let zero = Int::from_i64(self.ctx, 0);
                Ok(Dynamic::Int(v.lt(&zero).ite(&v.unary_minus(), &v)))
            }
            (NumUop::Abs, Dynamic::Real(v)) => {
                let zero = Real::from_real(self.ctx, 0, 1);
                Ok(Dynamic::Real(v.lt(&zero).ite(&v.unary_minus(), &v)))
            }
        }
    }

    fn enc_num_reduce(&mut self, vs: &[NumExpr], want_max: bool) -> Result<Dynamic<'ctx>, EncodeError> {
        let mut iter = vs.iter();
        let first = iter
            .next()
            .expect("NumExpr::Min/Max is constructed with a nonempty operand list");
        let mut acc = self.enc_num(first)?;
        for v in iter {
            let v = self.enc_num(v)?;
            acc = if acc.is_int() && v.is_int() {
                let a = acc.into_int("Min/Max")?;
                let b = v.into_int("Min/Max")?;
                Dynamic::Int(if want_max { z3_max_int(self.ctx, &a, &b) } else { z3_min_int(self.ctx, &a, &b) })
            } else {
                let a = acc.to_real();
                let b = v.to_real();
                Dynamic::Real(if want_max { z3_max_real(&a, &b) } else { z3_min_real(&a, &b) })
            };
        }
        Ok(acc)
    }

    pub fn enc_bool(&mut self, e: &BoolExpr) -> Result<Bool<'ctx>, EncodeError> {
        if let Some(cached) = self.bool_memo.get(&addr(e)) {
            return Ok(cached.clone());
        }
        let out = self.enc_bool_uncached(e)?;
        self.bool_memo.insert(addr(e), out.clone());
        Ok(out)
    }

    fn enc_bool_uncached(&mut self, e: &BoolExpr) -> Result<Bool<'ctx>, EncodeError> {
        match e {
            BoolExpr::Const(v) => Ok(Bool::from_bool(self.ctx, *v)),
            BoolExpr::SymRef(sym) => Ok(Bool::new_const(self.ctx, sym.name.as_str())),
            BoolExpr::EqNum(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_eq(&l, &r))
            }
            BoolExpr::NeNum(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_eq(&l, &r).not())
            }
            BoolExpr::EqShape(l, r) => self.enc_shape_eq(l, r),
            BoolExpr::NeShape(l, r) => Ok(self.enc_shape_eq(l, r)?.not()),
            BoolExpr::Lt(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_lt(&l, &r))
            }
            BoolExpr::Le(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_le(&l, &r))
            }
            BoolExpr::Not(v) => Ok(self.enc_bool(v)?.not()),
            BoolExpr::And(l, r) => {
                let l = self.enc_bool(l)?;
                let r = self.enc_bool(r)?;
                Ok(Bool::and(self.ctx, &[&l, &r]))
            }
            BoolExpr::Or(l, r) => {
                let l = self.enc_bool(l)?;
                let r = self.enc_bool(r)?;
                Ok(Bool::or(self.ctx, &[&l, &r]))
            }
        }
    }

    fn enc_num_pair_as_real_if_needed(
        &mut self,
        l: &NumExpr,
        r: &NumExpr,
    ) -> Result<(Dynamic<'ctx>, Dynamic<'ctx>), EncodeError> {
        let l = self.enc_num(l)?;
        let r = self.enc_num(r)?;
        Ok((l, r))
    }

    pub fn enc_shape(&mut self, e: &ShapeExpr) -> Result<Array<'ctx>, EncodeError> {
        if let Some(cached) = self.shape_memo.get(&addr(e)) {
            return Ok(cached.clone());
        }
        let out = self.enc_shape_uncached(e)?;
        self.shape_memo.insert(addr(e), out.clone());
        Ok(out)
    }

    fn enc_shape_uncached(&mut self, e: &ShapeExpr) -> Result<Array<'ctx>, EncodeError> {
        let int_sort = Sort::int(self.ctx);
        match e {
            ShapeExpr::Const(dims, _) => {
                let mut arr = Array::const_array(self.ctx, &int_sort, &Int::from_i64(self.ctx, -1));
                for (i, d) in dims.iter().enumerate() {
                    let d = self.enc_num(d)?.into_int("Shape::Const dimension")?;
                    arr = arr.store(&Int::from_i64(self.ctx, i as i64), &d);
                }
                Ok(arr)
            }
            ShapeExpr::SymRef(sym) => {
                let raw = Array::new_const(self.ctx, sym.name.as_str(), &int_sort, &int_sort);
                let rank = self.enc_num(&shapecheck_ir::rank_of(e))?.into_int("Shape symbol rank")?;
                let zero = Int::from_i64(self.ctx, 0);
                Ok(lambda_select_shifted(self.ctx, &raw, &zero, &rank))
            }
            ShapeExpr::Set(base, axis, dim) => {
                let base = self.enc_shape(base)?;
                let axis = self.enc_num(axis)?.into_int("Shape::Set axis")?;
                let dim = self.enc_num(dim)?.into_int("Shape::Set dim")?;
                Ok(base.store(&axis, &dim))
            }
            ShapeExpr::Slice(base, start, _end) => {
                let base_enc = self.enc_shape(base)?;
                let start = match start {
                    Some(s) => self.enc_num(s)?.into_int("Slice start")?,
                    None => Int::from_i64(self.ctx, 0),
                };
                // `rank_of(e)` already folds `end`'s default (`rank_of(base)`) in.
                let len = self.enc_num(&shapecheck_ir::rank_of(e))?.into_int("Slice length")?;
                Ok(lambda_select_shifted(self.ctx, &base_enc, &start, &len))
            }
            ShapeExpr::Concat(l, r) => {
                let le = self.enc_shape(l)?;
                let re = self.enc_shape(r)?;
                let lrank = self.enc_num(&shapecheck_ir::rank_of(l))?.into_int("Concat left rank")?;
                let rrank = self.enc_num(&shapecheck_ir::rank_of(r))?.into_int("Concat right rank")?;
                Ok(concat_arrays(self.ctx, &le, &lrank, &re, &rrank))
            }
            ShapeExpr::Broadcast(l, r) => {
                let le = self.enc_shape(l)?;
                let re = self.enc_shape(r)?;
                let lrank = self.enc_num(&shapecheck_ir::rank_of(l))?.into_int("Broadcast left rank")?;
                let rrank = self.enc_num(&shapecheck_ir::rank_of(r))?.into_int("Broadcast right rank")?;
                Ok(broadcast_arrays(self.ctx, &le, &lrank, &re, &rrank))
            }
        }
    }

    /// Two shapes are equal when their dimension arrays agree extensionally
    /// *and* their ranks agree — array equality alone lets a longer,
    /// free-valued tail be satisfied by setting it to the out-of-range
    /// sentinel, which would make a rank-3 and a rank-2 shape equal without
    /// this conjunct.
    fn enc_shape_eq(&mut self, l: &ShapeExpr, r: &ShapeExpr) -> Result<Bool<'ctx>, EncodeError> {
        let le = self.enc_shape(l)?;
        let re = self.enc_shape(r)?;
        let lrank = self.enc_num(&shapecheck_ir::rank_of(l))?.into_int("EqShape left rank")?;
        let rrank = self.enc_num(&shapecheck_ir::rank_of(r))?.into_int("EqShape right rank")?;
        Ok(Bool::and(self.ctx, &[&le._eq(&re), &lrank._eq(&rrank)]))
    }

    /// Encodes the `Broadcastable` relation between two shapes, per NumPy's
    /// right-aligned dimension compatibility rule: walking from the trailing
    /// dimension inward, every pair of dimensions must either match or one of
    /// them must be `1`.
    pub fn enc_broadcastable(&mut self, l: &ShapeExpr, r: &ShapeExpr) -> Result<Bool<'ctx>, EncodeError> {
        let le = self.enc_shape(l)?;
        let re = self.enc_shape(r)?;
        let lrank = self.enc_num(&shapecheck_ir::rank_of(l))?.into_int("Broadcastable left rank")?;
        let rrank = self.enc_num(&shapecheck_ir::rank_of(r))?.into_int("Broadcastable right rank")?;
        Ok(broadcastable_relation(self.ctx, &le, &lrank, &re, &rrank))
    }

    pub fn enc_ctr(&mut self, ctr: &Ctr) -> Result<Bool<'ctx>, EncodeError> {
        match &ctr.kind {
            CtrKind::ExpBool(e) => self.enc_bool(e),
            CtrKind::EqNum(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_eq(&l, &r))
            }
            CtrKind::NeNum(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_eq(&l, &r).not())
            }
            CtrKind::EqShape(l, r) => self.enc_shape_eq(l, r),
            CtrKind::NeShape(l, r) => Ok(self.enc_shape_eq(l, r)?.not()),
            CtrKind::Lt(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_lt(&l, &r))
            }
            CtrKind::Le(l, r) => {
                let (l, r) = self.enc_num_pair_as_real_if_needed(l, r)?;
                Ok(num_le(&l, &r))
            }
            CtrKind::And(l, r) => {
                let l = self.enc_ctr(l)?;
                let r = self.enc_ctr(r)?;
                Ok(Bool::and(self.ctx, &[&l, &r]))
            }
            CtrKind::Or(l, r) => {
                let l = self.enc_ctr(l)?;
                let r = self.enc_ctr(r)?;
                Ok(Bool::or(self.ctx, &[&l, &r]))
            }
            CtrKind::Not(v) => Ok(self.enc_ctr(v)?.not()),
            CtrKind::Forall { sym, lo, hi, body } => {
                let lo_b = self.enc_num(lo)?.into_int(&format!("forall {sym} lower bound"))?;
                let hi_b = self.enc_num(hi)?.into_int(&format!("forall {sym} upper bound"))?;
                let x = Int::new_const(self.ctx, sym.name.as_str());
                let body_enc = self.enc_ctr(body)?;
                let bound = Bool::and(self.ctx, &[&x.ge(&lo_b), &x.le(&hi_b)]);
                Ok(z3::ast::forall_const(self.ctx, &[&x as &dyn Ast], &[], &bound.implies(&body_enc)))
            }
            CtrKind::Broadcastable(l, r) => self.enc_broadcastable(l, r),
            CtrKind::Fail => Ok(Bool::from_bool(self.ctx, false)),
        }
    }
}

fn num_eq<'ctx>(l: &Dynamic<'ctx>, r: &Dynamic<'ctx>) -> Bool<'ctx> {
    match (l, r) {
        (Dynamic::Int(l), Dynamic::Int(r)) => l._eq(r),
        _ => l.to_real()._eq(&r.to_real()),
    }
}

fn num_lt<'ctx>(l: &Dynamic<'ctx>, r: &Dynamic<'ctx>) -> Bool<'ctx> {
    match (l, r) {
        (Dynamic::Int(l), Dynamic::Int(r)) => l.lt(r),
        _ => l.to_real().lt(&r.to_real()),
    }
}

fn num_le<'ctx>(l: &Dynamic<'ctx>, r: &Dynamic<'ctx>) -> Bool<'ctx> {
    match (l, r) {
        (Dynamic::Int(l), Dynamic::Int(r)) => l.le(r),
        _ => l.to_real().le(&r.to_real()),
    }
}

/// `a / b` guarded against division by zero: `if b != 0 then a / b else -1`,
/// matching `json2z3.py`'s `z3_div`.
fn z3_div<'ctx>(ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    let zero = Int::from_i64(ctx, 0);
    let neg_one = Int::from_i64(ctx, -1);
    b._eq(&zero).ite(&neg_one, &(a.div(b)))
}

/// `a / b` over reals, guarded the same way as `z3_div`'s integer case.
fn z3_div_real<'ctx>(ctx: &'ctx Context, a: &Real<'ctx>, b: &Real<'ctx>) -> Real<'ctx> {
    let zero = Real::from_real(ctx, 0, 1);
    let neg_one = Real::from_real(ctx, -1, 1);
    b._eq(&zero).ite(&neg_one, &a.div(b))
}

/// `a % b` guarded against division by zero, matching `json2z3.py`'s `z3_mod`.
fn z3_mod<'ctx>(ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    let zero = Int::from_i64(ctx, 0);
    let neg_one = Int::from_i64(ctx, -1);
    b._eq(&zero).ite(&neg_one, &(a.modulo(b)))
}

fn z3_min_int<'ctx>(_ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    b.lt(a).ite(b, a)
}

fn z3_max_int<'ctx>(_ctx: &'ctx Context, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
    a.lt(b).ite(b, a)
}

fn z3_min_real<'ctx>(a: &Real<'ctx>, b: &Real<'ctx>) -> Real<'ctx> {
    b.lt(a).ite(b, a)
}

fn z3_max_real<'ctx>(a: &Real<'ctx>, b: &Real<'ctx>) -> Real<'ctx> {
    a.lt(b).ite(b, a)
}

/// Converts an `f64` literal to an exact `Real` by scaling through its
/// decimal representation (front-end floats are always finite decimal
/// literals, never the result of runtime computation).
fn real_from_f64<'ctx>(ctx: &'ctx Context, v: f64) -> Real<'ctx> {
    let text = format!("{v}");
    match text.split_once('.') {
        Some((int_part, frac_part)) => {
            let denom = 10i64.pow(frac_part.len() as u32);
            let numer: i64 = format!("{int_part}{frac_part}").parse().unwrap_or(0);
            Real::from_real(ctx, numer as i32, denom as i32)
        }
        None => Real::from_real(ctx, v as i32, 1),
    }
}

/// `Lambda i. if 0 <= i < len then select(base, start + i) else -1`.
fn lambda_select_shifted<'ctx>(
    ctx: &'ctx Context,
    base: &Array<'ctx>,
    start: &Int<'ctx>,
    len: &Int<'ctx>,
) -> Array<'ctx> {
    let i = Int::new_const(ctx, "shapecheck_slice_i");
    let zero = Int::from_i64(ctx, 0);
    let in_range = Bool::and(ctx, &[&i.ge(&zero), &i.lt(len)]);
    let shifted = Int::add(ctx, &[start, &i]);
    let body = in_range.ite(
        &base.select(&shifted).as_int().expect("array range is Int"),
        &Int::from_i64(ctx, -1),
    );
    Array::from_func(ctx, &[&i], &body)
}

/// `Lambda i. if 0 <= i < lrank then select(l, i) else if lrank <= i <
/// lrank+rrank then select(r, i - lrank) else -1`.
fn concat_arrays<'ctx>(
    ctx: &'ctx Context,
    l: &Array<'ctx>,
    lrank: &Int<'ctx>,
    r: &Array<'ctx>,
    rrank: &Int<'ctx>,
) -> Array<'ctx> {
    let i = Int::new_const(ctx, "shapecheck_concat_i");
    let zero = Int::from_i64(ctx, 0);
    let total = Int::add(ctx, &[lrank, rrank]);
    let left_sel = l.select(&i).as_int().expect("array range is Int");
    let right_sel = r
        .select(&Int::sub(ctx, &[&i, lrank]))
        .as_int()
        .expect("array range is Int");
    let in_left = Bool::and(ctx, &[&i.ge(&zero), &i.lt(lrank)]);
    let in_right = Bool::and(ctx, &[&i.ge(lrank), &i.lt(&total)]);
    let body = in_left.ite(
        &left_sel,
        &in_right.ite(&right_sel, &Int::from_i64(ctx, -1)),
    );
    Array::from_func(ctx, &[&i], &body)
}

/// Right-aligned broadcast of two shapes over the overlapping trailing
/// dimensions, taking the max where they overlap.
fn broadcast_arrays<'ctx>(
    ctx: &'ctx Context,
    l: &Array<'ctx>,
    lrank: &Int<'ctx>,
    r: &Array<'ctx>,
    rrank: &Int<'ctx>,
) -> Array<'ctx> {
    let i = Int::new_const(ctx, "shapecheck_bcast_i");
    let zero = Int::from_i64(ctx, 0);
    let out_rank = z3_max_int(ctx, lrank, rrank);
    let l_off = z3_max_int(ctx, &Int::sub(ctx, &[rrank, lrank]), &zero);
    let r_off = z3_max_int(ctx, &Int::sub(ctx, &[lrank, rrank]), &zero);
    let l_idx = Int::sub(ctx, &[&i, &l_off]);
    let r_idx = Int::sub(ctx, &[&i, &r_off]);
    let l_sel = l.select(&l_idx).as_int().expect("array range is Int");
    let r_sel = r.select(&r_idx).as_int().expect("array range is Int");
    let l_in = Bool::and(ctx, &[&l_idx.ge(&zero), &l_idx.lt(lrank)]);
    let r_in = Bool::and(ctx, &[&r_idx.ge(&zero), &r_idx.lt(rrank)]);
    let neg_one = Int::from_i64(ctx, -1);
    let both_in = Bool::and(ctx, &[&l_in, &r_in]);
    // Overlap: take the max (NumPy broadcast rule); else whichever side is in range.
    let dim = both_in.ite(
        &z3_max_int(ctx, &l_sel, &r_sel),
        &l_in.ite(&l_sel, &r_in.ite(&r_sel, &neg_one)),
    );
    let in_range = Bool::and(ctx, &[&i.ge(&zero), &i.lt(&out_rank)]);
    let body = in_range.ite(&dim, &neg_one);
    Array::from_func(ctx, &[&i], &body)
}

/// The `Broadcastable` predicate itself: every overlapping trailing
/// dimension must match or be `1`, ported from `json2z3.py`'s `_encodeBc`.
fn broadcastable_relation<'ctx>(
    ctx: &'ctx Context,
    l: &Array<'ctx>,
    lrank: &Int<'ctx>,
    r: &Array<'ctx>,
    rrank: &Int<'ctx>,
) -> Bool<'ctx> {
    let i = Int::new_const(ctx, "shapecheck_bc_i");
    let one = Int::from_i64(ctx, 1);
    let longer_left = {
        let diff = Int::sub(ctx, &[lrank, rrank]);
        let in_overlap = Bool::and(ctx, &[&diff.le(&i), &i.lt(lrank)]);
        let l_sel = l.select(&i).as_int().expect("array range is Int");
        let r_sel = r.select(&Int::sub(ctx, &[&i, &diff])).as_int().expect("array range is Int");
        let compatible = Bool::or(ctx, &[&l_sel._eq(&r_sel), &l_sel._eq(&one), &r_sel._eq(&one)]);
        let body = in_overlap.implies(&compatible);
        Bool::and(ctx, &[&lrank.ge(rrank), &z3::ast::forall_const(ctx, &[&i as &dyn Ast], &[], &body)])
    };
    let longer_right = {
        let diff = Int::sub(ctx, &[rrank, lrank]);
        let in_overlap = Bool::and(ctx, &[&diff.le(&i), &i.lt(rrank)]);
        let r_sel = r.select(&i).as_int().expect("array range is Int");
        let l_sel = l.select(&Int::sub(ctx, &[&i, &diff])).as_int().expect("array range is Int");
        let compatible = Bool::or(ctx, &[&r_sel._eq(&l_sel), &r_sel._eq(&one), &l_sel._eq(&one)]);
        let body = in_overlap.implies(&compatible);
        Bool::and(ctx, &[&rrank.gt(lrank), &z3::ast::forall_const(ctx, &[&i as &dyn Ast], &[], &body)])
    };
    Bool::or(ctx, &[&longer_left, &longer_right])
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapecheck_ir::{NumExpr, Symbol, SymbolKind};
    use z3::{Config, SatResult, Solver};

    fn new_ctx() -> Context {
        Context::new(&Config::new())
    }

    #[test]
    fn encodes_int_literal_equality() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let e = BoolExpr::eq_num(NumExpr::int(2), NumExpr::add(NumExpr::int(1), NumExpr::int(1)));
        let formula = enc.enc_bool(&e).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn contradiction_is_unsat() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let e = BoolExpr::and(BoolExpr::eq_num(x.clone(), NumExpr::int(1)), BoolExpr::eq_num(x, NumExpr::int(2)));
        let formula = enc.enc_bool(&e).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Unsat);
    }

    #[test]
    fn floor_div_by_symbolic_zero_does_not_crash_solver() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let div = NumExpr::floor_div(NumExpr::int(10), x.clone());
        let e = BoolExpr::and(BoolExpr::eq_num(x, NumExpr::int(0)), BoolExpr::eq_num(div, NumExpr::int(-1)));
        let formula = enc.enc_bool(&e).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn numel_of_constant_shape_is_product_of_dims() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let shape = ShapeExpr::constant(vec![NumExpr::int(2), NumExpr::int(3), NumExpr::int(4)]);
        let numel = NumExpr::numel(shape);
        let e = BoolExpr::eq_num(numel, NumExpr::int(24));
        let formula = enc.enc_bool(&e).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn broadcastable_accepts_matching_trailing_dims() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let a = ShapeExpr::constant(vec![NumExpr::int(8), NumExpr::int(1), NumExpr::int(6)]);
        let b = ShapeExpr::constant(vec![NumExpr::int(7), NumExpr::int(1)]);
        let formula = enc.enc_broadcastable(&a, &b).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn broadcastable_rejects_incompatible_dims() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let a = ShapeExpr::constant(vec![NumExpr::int(3)]);
        let b = ShapeExpr::constant(vec![NumExpr::int(4)]);
        let formula = enc.enc_broadcastable(&a, &b).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Unsat);
    }

    #[test]
    fn forall_accepts_symbolic_int_bounds() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let n = Symbol::scalar("n", SymbolKind::Int);
        let i = Symbol::scalar("i", SymbolKind::Int);
        let body = Ctr::new(CtrKind::Le(NumExpr::int(0), NumExpr::var(i.clone())));
        let forall = Ctr::new(CtrKind::Forall {
            sym: i,
            lo: NumExpr::int(0),
            hi: NumExpr::var(n.clone()),
            body: Box::new(body),
        });
        let formula = enc.enc_ctr(&forall).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Sat);
    }

    #[test]
    fn symbolic_shape_masks_out_of_range_index_to_minus_one() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let shape = ShapeExpr::var(Symbol::shape("X", NumExpr::int(2)));
        let array = enc.enc_shape(&shape).unwrap();
        let out_of_range = array.select(&Int::from_i64(&ctx, 5)).as_int().expect("array range is Int");
        let formula = out_of_range._eq(&Int::from_i64(&ctx, -1));
        let solver = Solver::new(&ctx);
        solver.assert(&formula.not());
        assert_eq!(solver.check(), SatResult::Unsat);
    }

    #[test]
    fn eq_shape_rejects_mismatched_rank_even_with_free_tail() {
        let ctx = new_ctx();
        let mut enc = Encoder::new(&ctx);
        let symbolic = ShapeExpr::var(Symbol::shape("X", NumExpr::int(3)));
        let fixed = ShapeExpr::constant(vec![NumExpr::int(4), NumExpr::int(5)]);
        let e = BoolExpr::eq_shape(symbolic, fixed);
        let formula = enc.enc_bool(&e).unwrap();
        let solver = Solver::new(&ctx);
        solver.assert(&formula);
        assert_eq!(solver.check(), SatResult::Unsat);
    }
}
