//! Dead-store analysis sharpened by branch classification.
//!
//! The possible-value pass runs first. Its classification is then consulted by
//! the liveness pass at every `if`/`while`: bodies that never run contribute
//! only dead stores, and bodies that always run are treated as straight-line
//! code instead of a maybe-skipped branch.

use deadwood_syntax::ast::{Expr, Program, Stmt, StmtId};
use tracing::debug;

use crate::collect;
use crate::limits::AnalysisLimits;
use crate::live::LiveVariableAnalyzer;
use crate::values::{Classification, PossibleValueAnalyzer};

/// Result of [`MixedAnalyzer::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixedReport {
    /// Dead stores in source order.
    pub dead_stores: Vec<StmtId>,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default)]
pub struct MixedAnalyzer {
    limits: AnalysisLimits,
}

impl MixedAnalyzer {
    pub fn new(limits: AnalysisLimits) -> Self {
        Self { limits }
    }

    pub fn analyze(&self, program: &Program) -> MixedReport {
        let classification = PossibleValueAnalyzer::new(self.limits).analyze(program).classification;
        debug!(classified = classification.len(), "branch classification done");
        let dead_stores = LiveVariableAnalyzer::with_classification(&classification).analyze(program);
        MixedReport {
            dead_stores,
            classification,
        }
    }
}

impl LiveVariableAnalyzer<'_> {
    /// The body cannot run: every assignment in it, at any depth, is dead.
    /// The guard itself is still evaluated.
    pub(crate) fn visit_never_taken(&mut self, cond: &Expr, body: &[Stmt]) {
        cond.collect_names(&mut self.live);
        // pushed back to front like every other finding
        self.unused.extend(collect::assignments(body).into_iter().rev());
    }

    /// No skip path, so nothing live after the `if` survives unless the body
    /// needs it.
    pub(crate) fn visit_always_if(&mut self, cond: &Expr, body: &[Stmt]) {
        self.visit_block(body);
        cond.collect_names(&mut self.live);
    }

    /// The body runs at least once; the back edge still needs the two-pass
    /// treatment but there is no skip path to merge.
    pub(crate) fn visit_always_while(&mut self, cond: &Expr, body: &[Stmt]) {
        let live_after = self.live.clone();
        self.visit_body_twice(body, &live_after);
        cond.collect_names(&mut self.live);
    }
}
