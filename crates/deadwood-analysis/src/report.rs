//! Maps analysis results back onto the program for display.

use deadwood_syntax::ast::{Program, StmtId, StmtKind};
use serde::Serialize;

use crate::values::{Classification, Reachability};

/// A flagged assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadStore {
    pub id: StmtId,
    pub line: usize,
    pub variable: char,
}

/// A conditional whose guard was decided statically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedBranch {
    pub id: StmtId,
    pub line: usize,
    pub kind: BranchKind,
    pub reachability: Reachability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    If,
    While,
}

/// Resolves dead-store ids against `program`. Ids that do not name an
/// assignment in it are skipped.
pub fn dead_store_report(program: &Program, ids: &[StmtId]) -> Vec<DeadStore> {
    ids.iter()
        .filter_map(|id| {
            let stmt = program.find(*id)?;
            match stmt.kind {
                StmtKind::Assign { target, .. } => Some(DeadStore { id: *id, line: stmt.line, variable: target }),
                _ => None,
            }
        })
        .collect()
}

/// Resolves a classification table against `program`, in source order.
pub fn classified_branches(program: &Program, classification: &Classification) -> Vec<ClassifiedBranch> {
    classification
        .iter()
        .filter_map(|(id, reachability)| {
            let stmt = program.find(*id)?;
            let kind = match stmt.kind {
                StmtKind::If { .. } => BranchKind::If,
                StmtKind::While { .. } => BranchKind::While,
                StmtKind::Assign { .. } => return None,
            };
            Some(ClassifiedBranch { id: *id, line: stmt.line, kind, reachability: *reachability })
        })
        .collect()
}
