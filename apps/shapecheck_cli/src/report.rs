//! Console reporting: per-path narrative lines and a closing summary,
//! colorized the way `packages/pytea/z3wrapper/json2z3.py`'s `bcolors` /
//! `DefaultConsole` does. No color crate — a handful of ANSI escapes does
//! not earn a dependency.

use shapecheck_solve::{ClassificationKind, PathReport, UndecidableReason};
use std::fmt::Write as _;

mod style {
    pub const GREEN: &str = "\x1b[92m";
    pub const RED: &str = "\x1b[91m";
    pub const YELLOW: &str = "\x1b[93m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const END: &str = "\x1b[0m";
}

/// Suppresses per-path narrative but still accumulates summary counts,
/// mirroring `NullConsole`'s role next to `DefaultConsole`.
pub struct Console {
    silent: bool,
}

impl Console {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn log(&self, message: &str) {
        if !self.silent {
            println!("{message}");
        }
    }
}

pub fn narrate(console: &Console, report: &PathReport) {
    let path_no = report.index + 1;
    let line = match &report.kind {
        ClassificationKind::Unreachable { conflicting } => format!(
            "{}path {}: unreachable{} (conflicting: {:?})",
            style::GRAY,
            path_no,
            style::END,
            conflicting.iter().map(|i| i + 1).collect::<Vec<_>>()
        ),
        ClassificationKind::Valid => {
            format!("{}path {}: valid{}", style::GREEN, path_no, style::END)
        }
        ClassificationKind::Invalid { offending } => format!(
            "{}path {}: invalid{} (violates ctrPool[{}]{})",
            style::RED,
            path_no,
            style::END,
            offending + 1,
            offender_detail(report)
        ),
        ClassificationKind::Undecidable { reason, offending } => format!(
            "{}path {}: undecidable{} ({}){}",
            style::YELLOW,
            path_no,
            style::END,
            describe(reason),
            match offending {
                Some(i) => format!(" (ctrPool[{}]{})", i + 1, offender_detail(report)),
                None => String::new(),
            }
        ),
    };
    console.log(&line);
}

/// Renders `report`'s offending constraint's source span and message, if the
/// front-end supplied either.
fn offender_detail(report: &PathReport) -> String {
    let mut out = String::new();
    if let Some(source) = &report.first_offender_source {
        let _ = write!(out, " - {source}");
    }
    if let Some(message) = &report.message {
        let _ = write!(out, ": {message}");
    }
    out
}

fn describe(reason: &UndecidableReason) -> String {
    match reason {
        UndecidableReason::SolverUnknown(why) => format!("solver returned unknown: {why}"),
        UndecidableReason::Timeout => "timed out".to_string(),
        UndecidableReason::EncodeFailed(why) => format!("could not encode: {why}"),
    }
}

/// Prints the closing `<OVERALL: total N paths>` summary, bucketed the way
/// `Z3Encoder.analyze` buckets into `UnreachablePaths`/`ValidPaths`/
/// `SatPaths`/`UnsatPaths`/`DontknowPaths`.
pub fn summarize(console: &Console, reports: &[PathReport]) {
    let total = reports.len();
    let unreachable = reports
        .iter()
        .filter(|r| matches!(r.kind, ClassificationKind::Unreachable { .. }))
        .count();
    let valid = reports
        .iter()
        .filter(|r| matches!(r.kind, ClassificationKind::Valid))
        .count();
    let invalid = reports
        .iter()
        .filter(|r| matches!(r.kind, ClassificationKind::Invalid { .. }))
        .count();
    let undecidable = reports
        .iter()
        .filter(|r| matches!(r.kind, ClassificationKind::Undecidable { .. }))
        .count();

    let mut out = String::new();
    let _ = write!(out, "{}<OVERALL: total {total} paths>{}\n", style::BOLD, style::END);
    let _ = write!(out, "  {}valid:       {valid}{}\n", style::GREEN, style::END);
    let _ = write!(out, "  {}invalid:     {invalid}{}\n", style::RED, style::END);
    let _ = write!(out, "  {}undecidable: {undecidable}{}\n", style::YELLOW, style::END);
    let _ = write!(out, "  {}unreachable: {unreachable}{}", style::GRAY, style::END);
    console.log(&out);
}
