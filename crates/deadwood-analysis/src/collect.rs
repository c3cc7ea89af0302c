//! Whole-subtree collectors used when a body is skipped instead of analyzed.

use std::collections::BTreeSet;

use deadwood_syntax::ast::{Stmt, StmtId, StmtKind};

/// Every variable assigned anywhere in `stmts`.
pub(crate) fn write_names(stmts: &[Stmt]) -> BTreeSet<char> {
    let mut names = BTreeSet::new();
    walk(stmts, &mut |s| {
        if let StmtKind::Assign { target, .. } = &s.kind {
            names.insert(*target);
        }
    });
    names
}

/// Ids of every assignment in `stmts`, in source order.
pub(crate) fn assignments(stmts: &[Stmt]) -> Vec<StmtId> {
    let mut ids = Vec::new();
    walk(stmts, &mut |s| {
        if let StmtKind::Assign { .. } = s.kind {
            ids.push(s.id);
        }
    });
    ids
}

/// Ids of every `if`/`while` in `stmts`, in source order.
pub(crate) fn conditionals(stmts: &[Stmt]) -> Vec<StmtId> {
    let mut ids = Vec::new();
    walk(stmts, &mut |s| {
        if !matches!(s.kind, StmtKind::Assign { .. }) {
            ids.push(s.id);
        }
    });
    ids
}

fn walk(stmts: &[Stmt], f: &mut impl FnMut(&Stmt)) {
    for s in stmts {
        f(s);
        walk(s.body(), f);
    }
}
