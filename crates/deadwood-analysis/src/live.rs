//! Backward live-variable analysis and dead-store detection.
//!
//! Statements are visited last to first while a single live set is threaded
//! through the traversal: on entry to a statement it holds the variables whose
//! values may be read after that statement.

use std::collections::BTreeSet;

use deadwood_syntax::ast::{Expr, Program, Stmt, StmtId, StmtKind};
use tracing::trace;

use crate::values::{Classification, Reachability};

/// Finds assignments whose value is never read.
///
/// Loops are handled with a fixed two-pass approximation rather than iteration
/// to a fixed point: the body is analyzed once to learn what the next
/// iteration needs, and a second time to produce the findings that are kept.
#[derive(Debug, Default)]
pub struct LiveVariableAnalyzer<'c> {
    pub(crate) live: BTreeSet<char>,
    pub(crate) unused: Vec<StmtId>,
    classification: Option<&'c Classification>,
}

impl LiveVariableAnalyzer<'static> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'c> LiveVariableAnalyzer<'c> {
    /// A pass that consults `classification` for every `if`/`while` before
    /// falling back to the plain rules.
    pub(crate) fn with_classification(classification: &'c Classification) -> Self {
        Self {
            live: BTreeSet::new(),
            unused: Vec::new(),
            classification: Some(classification),
        }
    }

    /// Runs the pass over the whole program and returns the dead stores in
    /// source order.
    pub fn analyze(&mut self, program: &Program) -> Vec<StmtId> {
        self.live.clear();
        self.unused.clear();
        self.visit_block(&program.statements);
        // findings were collected back to front
        self.unused.iter().rev().copied().collect()
    }

    /// Variables live at the point the last analyzed program starts, i.e.
    /// read before any assignment to them.
    pub fn live_at_entry(&self) -> &BTreeSet<char> {
        &self.live
    }

    pub(crate) fn visit_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts.iter().rev() {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => self.visit_assign(stmt.id, *target, value),
            StmtKind::If { cond, body } => match self.reachability(stmt.id) {
                Some(Reachability::Never) => self.visit_never_taken(cond, body),
                Some(Reachability::Always) => self.visit_always_if(cond, body),
                None => self.visit_if(cond, body),
            },
            StmtKind::While { cond, body } => match self.reachability(stmt.id) {
                Some(Reachability::Never) => self.visit_never_taken(cond, body),
                Some(Reachability::Always) => self.visit_always_while(cond, body),
                None => self.visit_while(cond, body),
            },
        }
    }

    fn reachability(&self, id: StmtId) -> Option<Reachability> {
        self.classification.and_then(|c| c.get(&id).copied())
    }

    fn visit_assign(&mut self, id: StmtId, target: char, value: &Expr) {
        if !self.live.remove(&target) {
            trace!(%id, %target, "dead store");
            self.unused.push(id);
        }
        value.collect_names(&mut self.live);
    }

    /// The body may be skipped, so everything live after the `if` stays live.
    fn visit_if(&mut self, cond: &Expr, body: &[Stmt]) {
        let live_after = self.live.clone();
        self.visit_block(body);
        cond.collect_names(&mut self.live);
        self.live.extend(live_after);
    }

    fn visit_while(&mut self, cond: &Expr, body: &[Stmt]) {
        let live_after = self.live.clone();
        self.visit_body_twice(body, &live_after);
        cond.collect_names(&mut self.live);
        self.live.extend(live_after);
    }

    /// Approximates the loop's back edge: the first pass only computes what
    /// the body needs on entry, which together with `live_after` seeds the
    /// second, kept pass.
    pub(crate) fn visit_body_twice(&mut self, body: &[Stmt], live_after: &BTreeSet<char>) {
        let findings = self.unused.len();
        self.visit_block(body);
        self.unused.truncate(findings);
        self.live.extend(live_after.iter().copied());
        self.visit_block(body);
    }
}
