//! Path classification: the three-stage query sequence that turns a decoded
//! [`ConstraintSet`] into a verdict.
//!
//! Ported from `packages/pytea/z3wrapper/json2z3.py`'s `CtrSet.analysis`
//! (`pathCondCheck` → `checkValidity` → `checkSat`), but built on one
//! `Solver` kept alive across the soft-constraint scan with `push`/`pop`
//! rather than a fresh solver per candidate — the pattern
//! `logicaffeine_verify::solver::VerificationSession::verify` already uses
//! for scoped assumptions.

use shapecheck_ir::{ConstraintSet, Source};
use std::time::{Duration, Instant};
use z3::ast::{Ast, Bool};
use z3::{Config, Context, SatResult, Solver};

use crate::encode::Encoder;
use crate::error::{EncodeError, SolverError};

/// Why a path could not be decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndecidableReason {
    /// A query returned `unknown`; Z3's explanation, if any.
    SolverUnknown(String),
    /// The per-path wall-clock budget elapsed before a verdict was reached.
    Timeout,
    /// The constraint set could not be encoded at all.
    EncodeFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationKind {
    /// The hard and path constraints are jointly unsatisfiable; `conflicting`
    /// names the `ctrPool` indices Z3's unsat core implicated.
    Unreachable { conflicting: Vec<usize> },
    /// Every soft constraint is entailed by the hard and path constraints.
    Valid,
    /// `ctrPool[offending]` is the first soft constraint (in declared order)
    /// that is not entailed.
    Invalid { offending: usize },
    /// A query returned `unknown` or the wall-clock budget elapsed.
    /// `offending` is `Some(ctrPool index)` when the solver went `unknown`
    /// mid-scan on a specific soft-constraint candidate (stage 3); `None`
    /// for a reachability/validity-stage `unknown` or a timeout, where there
    /// is no single constraint to blame.
    Undecidable {
        reason: UndecidableReason,
        offending: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    /// Position of this path in the input document, preserved regardless of
    /// classification order.
    pub index: usize,
    pub kind: ClassificationKind,
    /// `ctrPool[offending]`'s source span, for `Invalid`/`Undecidable` kinds
    /// that name an offending index.
    pub first_offender_source: Option<Source>,
    /// `ctrPool[offending]`'s front-end message, same availability as above.
    pub message: Option<String>,
}

/// Classifies every path, dispatching independently but returning results in
/// input order (spec section 5's ordering contract).
pub fn classify_all(sets: &[ConstraintSet], timeout: Duration) -> Vec<PathReport> {
    let mut reports: Vec<PathReport> = std::thread::scope(|scope| {
        let handles: Vec<_> = sets
            .iter()
            .enumerate()
            .map(|(index, set)| {
                scope.spawn(move || {
                    let kind = classify_path(set, timeout);
                    let offending = offending_index(&kind);
                    let offending_ctr = offending.map(|i| &set.ctr_pool[i]);
                    PathReport {
                        index,
                        kind,
                        first_offender_source: offending_ctr.and_then(|c| c.source),
                        message: offending_ctr.and_then(|c| c.message.clone()),
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("classifier thread panicked")).collect()
    });
    reports.sort_by_key(|r| r.index);
    reports
}

/// The `ctrPool` index `kind` blames, if any — `Invalid`'s offending soft
/// constraint, or the candidate a stage-3 `unknown` was checking.
fn offending_index(kind: &ClassificationKind) -> Option<usize> {
    match kind {
        ClassificationKind::Invalid { offending } => Some(*offending),
        ClassificationKind::Undecidable { offending, .. } => *offending,
        ClassificationKind::Unreachable { .. } | ClassificationKind::Valid => None,
    }
}

/// Classifies a single path. Builds its own `Context`/`Solver` so panics or
/// Z3-internal state in one path can never affect another.
pub fn classify_path(set: &ConstraintSet, timeout: Duration) -> ClassificationKind {
    let deadline = Instant::now() + timeout;

    let mut cfg = Config::new();
    cfg.set_param_value("timeout", &timeout.as_millis().to_string());
    let ctx = Context::new(&cfg);
    let mut enc = Encoder::new(&ctx);

    match classify_with(&ctx, &mut enc, set, deadline) {
        Ok(kind) => kind,
        Err(EncodeError::RealInIntOp { context })
        | Err(EncodeError::SortMismatch { context, .. }) => ClassificationKind::Undecidable {
            reason: UndecidableReason::EncodeFailed(context),
            offending: None,
        },
    }
}

fn classify_with<'ctx>(
    ctx: &'ctx Context,
    enc: &mut Encoder<'ctx>,
    set: &ConstraintSet,
    deadline: Instant,
) -> Result<ClassificationKind, EncodeError> {
    // Stage 1: reachability. Hard and path constraints must be jointly
    // satisfiable, or every soft constraint is vacuous.
    let reach_solver = Solver::new(ctx);
    let mut track_to_index = std::collections::HashMap::new();
    for &idx in set.hard.iter().chain(set.path.iter()) {
        let formula = enc.enc_ctr(&set.ctr_pool[idx])?;
        let track = Bool::new_const(ctx, format!("shapecheck_track_{idx}"));
        reach_solver.assert_and_track(&formula, &track);
        track_to_index.insert(format!("shapecheck_track_{idx}"), idx);
    }
    match reach_solver.check() {
        SatResult::Unsat => {
            let mut conflicting: Vec<usize> = reach_solver
                .get_unsat_core()
                .iter()
                .filter_map(|a| track_to_index.get(&a.to_string()).copied())
                .collect();
            conflicting.sort_unstable();
            return Ok(ClassificationKind::Unreachable { conflicting });
        }
        SatResult::Unknown => {
            return Ok(ClassificationKind::Undecidable {
                reason: unknown_reason(&reach_solver),
                offending: None,
            });
        }
        SatResult::Sat => {}
    }
    if past_deadline(deadline) {
        return Ok(ClassificationKind::Undecidable {
            reason: UndecidableReason::Timeout,
            offending: None,
        });
    }

    // Stage 2: validity shortcut. If `not (hard & path => soft)` is unsat,
    // every soft constraint is entailed and there is no need to scan them
    // individually.
    let soft_formulas = set
        .soft
        .iter()
        .map(|&idx| enc.enc_ctr(&set.ctr_pool[idx]))
        .collect::<Result<Vec<_>, _>>()?;

    let premise_solver = Solver::new(ctx);
    for &idx in set.hard.iter().chain(set.path.iter()) {
        premise_solver.assert(&enc.enc_ctr(&set.ctr_pool[idx])?);
    }

    if soft_formulas.is_empty() {
        return Ok(ClassificationKind::Valid);
    }

    let soft_conjunction = conjoin(ctx, &soft_formulas);
    premise_solver.push();
    premise_solver.assert(&soft_conjunction.not());
    let validity_result = premise_solver.check();
    premise_solver.pop(1);
    match validity_result {
        SatResult::Unsat => return Ok(ClassificationKind::Valid),
        SatResult::Unknown => {
            return Ok(ClassificationKind::Undecidable {
                reason: unknown_reason(&premise_solver),
                offending: None,
            });
        }
        SatResult::Sat => {}
    }
    if past_deadline(deadline) {
        return Ok(ClassificationKind::Undecidable {
            reason: UndecidableReason::Timeout,
            offending: None,
        });
    }

    // Stage 3: localize. Scan soft constraints in declared order, keeping a
    // single running solver: confirmed entries stay asserted, so later
    // checks benefit from everything already proven.
    let scan_solver = Solver::new(ctx);
    for &idx in set.hard.iter().chain(set.path.iter()) {
        scan_solver.assert(&enc.enc_ctr(&set.ctr_pool[idx])?);
    }
    for (&idx, formula) in set.soft.iter().zip(soft_formulas.iter()) {
        if past_deadline(deadline) {
            return Ok(ClassificationKind::Undecidable {
                reason: UndecidableReason::Timeout,
                offending: Some(idx),
            });
        }
        scan_solver.push();
        scan_solver.assert(&formula.not());
        let result = scan_solver.check();
        scan_solver.pop(1);
        match result {
            SatResult::Sat => return Ok(ClassificationKind::Invalid { offending: idx }),
            SatResult::Unsat => scan_solver.assert(formula),
            SatResult::Unknown => {
                return Ok(ClassificationKind::Undecidable {
                    reason: unknown_reason(&scan_solver),
                    offending: Some(idx),
                });
            }
        }
    }
    Ok(ClassificationKind::Valid)
}

fn conjoin<'ctx>(ctx: &'ctx Context, formulas: &[Bool<'ctx>]) -> Bool<'ctx> {
    let refs: Vec<&Bool<'ctx>> = formulas.iter().collect();
    Bool::and(ctx, &refs)
}

fn past_deadline(deadline: Instant) -> bool {
    Instant::now() >= deadline
}

fn unknown_reason(solver: &Solver) -> UndecidableReason {
    let err = SolverError {
        reason: solver
            .get_reason_unknown()
            .unwrap_or_else(|| "no reason given".to_string()),
    };
    UndecidableReason::SolverUnknown(err.reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapecheck_ir::{BoolExpr, Ctr, CtrKind, NumExpr, Symbol, SymbolKind};

    fn ctr(kind: CtrKind) -> Ctr {
        Ctr::new(kind)
    }

    #[test]
    fn empty_constraints_are_valid() {
        let set = ConstraintSet {
            ctr_pool: vec![],
            hard: vec![],
            path: vec![],
            soft: vec![],
        };
        assert_eq!(classify_path(&set, Duration::from_secs(5)), ClassificationKind::Valid);
    }

    #[test]
    fn contradictory_hard_constraints_are_unreachable() {
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let set = ConstraintSet {
            ctr_pool: vec![
                ctr(CtrKind::EqNum(x.clone(), NumExpr::int(1))),
                ctr(CtrKind::EqNum(x, NumExpr::int(2))),
            ],
            hard: vec![0, 1],
            path: vec![],
            soft: vec![],
        };
        match classify_path(&set, Duration::from_secs(5)) {
            ClassificationKind::Unreachable { conflicting } => {
                assert_eq!(conflicting, vec![0, 1]);
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[test]
    fn entailed_soft_constraint_is_valid() {
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let set = ConstraintSet {
            ctr_pool: vec![
                ctr(CtrKind::EqNum(x.clone(), NumExpr::int(5))),
                ctr(CtrKind::Lt(NumExpr::int(0), x)),
            ],
            hard: vec![0],
            path: vec![],
            soft: vec![1],
        };
        assert_eq!(classify_path(&set, Duration::from_secs(5)), ClassificationKind::Valid);
    }

    #[test]
    fn violated_soft_constraint_is_invalid() {
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let set = ConstraintSet {
            ctr_pool: vec![
                ctr(CtrKind::EqNum(x.clone(), NumExpr::int(-5))),
                ctr(CtrKind::Lt(NumExpr::int(0), x)),
            ],
            hard: vec![0],
            path: vec![],
            soft: vec![1],
        };
        assert_eq!(
            classify_path(&set, Duration::from_secs(5)),
            ClassificationKind::Invalid { offending: 1 }
        );
    }

    #[test]
    fn first_offender_wins_when_multiple_soft_constraints_fail() {
        let x = NumExpr::var(Symbol::scalar("x", SymbolKind::Int));
        let set = ConstraintSet {
            ctr_pool: vec![
                ctr(CtrKind::EqNum(x.clone(), NumExpr::int(-5))),
                ctr(CtrKind::Lt(NumExpr::int(0), x.clone())),
                ctr(CtrKind::Lt(NumExpr::int(10), x)),
            ],
            hard: vec![0],
            path: vec![],
            soft: vec![1, 2],
        };
        assert_eq!(
            classify_path(&set, Duration::from_secs(5)),
            ClassificationKind::Invalid { offending: 1 }
        );
    }

    #[test]
    fn classify_all_preserves_input_order() {
        let mk = |v: i64| ConstraintSet {
            ctr_pool: vec![ctr(CtrKind::ExpBool(BoolExpr::Const(v >= 0)))],
            hard: vec![0],
            path: vec![],
            soft: vec![],
        };
        let sets = vec![mk(1), mk(-1), mk(2)];
        let reports = classify_all(&sets, Duration::from_secs(5));
        let indices: Vec<usize> = reports.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(reports[0].kind, ClassificationKind::Valid);
        assert!(matches!(reports[1].kind, ClassificationKind::Unreachable { .. }));
    }
}
