//! End-to-end scenarios S1-S6, decoding a constraint document and checking
//! the classifier's verdict — the same scenarios the shared specification
//! names, built directly against the public API rather than through JSON so
//! each fixture stays readable.

use shapecheck_ir::{BoolExpr, Ctr, CtrKind, ConstraintSet, NumExpr, ShapeExpr, Symbol, SymbolKind};
use shapecheck_solve::{classify_path, ClassificationKind};
use std::time::Duration;

fn ctr(kind: CtrKind) -> Ctr {
    Ctr::new(kind)
}

fn budget() -> Duration {
    Duration::from_secs(5)
}

#[test]
fn s1_trivial_valid_path() {
    let set = ConstraintSet {
        ctr_pool: vec![ctr(CtrKind::EqNum(NumExpr::int(2), NumExpr::int(2)))],
        hard: vec![],
        path: vec![],
        soft: vec![0],
    };
    assert_eq!(classify_path(&set, budget()), ClassificationKind::Valid);
}

#[test]
fn s2_shape_mismatch_detected() {
    let x = Symbol::shape("X", NumExpr::int(1));
    let shape_x = ShapeExpr::var(x);
    let shape_const = ShapeExpr::constant(vec![NumExpr::int(2)]);
    let indexed = NumExpr::index(shape_x.clone(), NumExpr::int(0));
    let set = ConstraintSet {
        ctr_pool: vec![
            ctr(CtrKind::EqShape(shape_x, shape_const)),
            ctr(CtrKind::EqNum(indexed, NumExpr::int(3))),
        ],
        hard: vec![0],
        path: vec![],
        soft: vec![1],
    };
    assert_eq!(
        classify_path(&set, budget()),
        ClassificationKind::Invalid { offending: 1 }
    );
}

#[test]
fn s3_unreachable_branch() {
    let n = || NumExpr::var(Symbol::scalar("n", SymbolKind::Int));
    let set = ConstraintSet {
        ctr_pool: vec![
            ctr(CtrKind::Lt(n(), NumExpr::int(0))),
            ctr(CtrKind::Le(NumExpr::int(0), n())),
            ctr(CtrKind::EqNum(n(), n())),
        ],
        hard: vec![],
        path: vec![0, 1],
        soft: vec![2],
    };
    assert!(matches!(
        classify_path(&set, budget()),
        ClassificationKind::Unreachable { .. }
    ));
}

#[test]
fn s4_broadcast_success() {
    let a = ShapeExpr::constant(vec![NumExpr::int(1), NumExpr::int(3), NumExpr::int(4)]);
    let b = ShapeExpr::constant(vec![NumExpr::int(2), NumExpr::int(1), NumExpr::int(4)]);
    let set = ConstraintSet {
        ctr_pool: vec![ctr(CtrKind::Broadcastable(a, b))],
        hard: vec![],
        path: vec![],
        soft: vec![0],
    };
    assert_eq!(classify_path(&set, budget()), ClassificationKind::Valid);
}

#[test]
fn s5_broadcast_failure() {
    let a = ShapeExpr::constant(vec![NumExpr::int(2), NumExpr::int(3)]);
    let b = ShapeExpr::constant(vec![NumExpr::int(4), NumExpr::int(3)]);
    let set = ConstraintSet {
        ctr_pool: vec![ctr(CtrKind::Broadcastable(a, b))],
        hard: vec![],
        path: vec![],
        soft: vec![0],
    };
    assert_eq!(
        classify_path(&set, budget()),
        ClassificationKind::Invalid { offending: 0 }
    );
}

#[test]
fn s6_division_by_zero_benign() {
    let z = || NumExpr::var(Symbol::scalar("z", SymbolKind::Int));
    let set = ConstraintSet {
        ctr_pool: vec![
            ctr(CtrKind::EqNum(NumExpr::int(1), NumExpr::true_div(NumExpr::int(1), z()))),
            ctr(CtrKind::EqNum(z(), NumExpr::int(0))),
            ctr(CtrKind::ExpBool(BoolExpr::Const(true))),
        ],
        hard: vec![0],
        path: vec![1],
        soft: vec![2],
    };
    assert!(matches!(
        classify_path(&set, budget()),
        ClassificationKind::Unreachable { .. }
    ));
}
