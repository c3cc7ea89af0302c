//! Forward possible-value analysis and branch classification.
//!
//! Every variable is mapped to the finite set of integers it may hold at the
//! current point. A variable without an entry is unconstrained. Conditions
//! are evaluated over all combinations of their operands' possible values to
//! decide whether an `if` or `while` is never taken, always taken, or either.

use std::collections::{BTreeMap, BTreeSet};

use deadwood_syntax::ast::{Expr, Program, Stmt, StmtId, StmtKind};
use deadwood_syntax::eval::Bindings;
use serde::Serialize;
use tracing::{debug, trace};

use crate::collect;
use crate::limits::AnalysisLimits;

/// Static outcome of an `if`/`while` guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// The guard is false every time it is evaluated; the body never runs.
    Never,
    /// The guard is true on entry; the body runs at least once.
    Always,
}

/// Classified conditionals. Statements without an entry are indeterminate.
pub type Classification = BTreeMap<StmtId, Reachability>;

/// Possible values per variable.
///
/// Unconstrained variables have no entry, so a stored set is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueTable(BTreeMap<char, BTreeSet<i64>>);

impl ValueTable {
    /// The values `name` may hold, or `None` when it is unconstrained.
    pub fn get(&self, name: char) -> Option<&BTreeSet<i64>> {
        self.0.get(&name)
    }

    pub fn is_unconstrained(&self, name: char) -> bool {
        !self.0.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &BTreeSet<i64>)> {
        self.0.iter().map(|(name, values)| (*name, values))
    }

    fn set(&mut self, name: char, values: Option<BTreeSet<i64>>) {
        match values {
            Some(values) if !values.is_empty() => {
                self.0.insert(name, values);
            }
            _ => self.clear(name),
        }
    }

    fn clear(&mut self, name: char) {
        self.0.remove(&name);
    }

    /// Joins the state reached through a branch that may or may not have run.
    ///
    /// Unconstrained wins on either side; otherwise the sets are unioned and
    /// dropped to unconstrained once the union outgrows `cap`.
    fn join(&mut self, branch: ValueTable, cap: usize) {
        let mut branch = branch.0;
        self.0.retain(|name, values| match branch.remove(name) {
            None => false,
            Some(other) => {
                values.extend(other);
                if values.len() > cap {
                    debug!(%name, size = values.len(), cap, "merged value set too large, now unconstrained");
                    false
                } else {
                    true
                }
            }
        });
    }
}

/// Result of [`PossibleValueAnalyzer::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueReport {
    pub classification: Classification,
    /// Possible values once the whole program has run.
    pub values: ValueTable,
}

impl ValueReport {
    pub fn never_happens(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.with(Reachability::Never)
    }

    pub fn always_happens(&self) -> impl Iterator<Item = StmtId> + '_ {
        self.with(Reachability::Always)
    }

    fn with(&self, wanted: Reachability) -> impl Iterator<Item = StmtId> + '_ {
        self.classification
            .iter()
            .filter(move |(_, r)| **r == wanted)
            .map(|(id, _)| *id)
    }
}

/// What one evaluation of a guard can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    /// The operands are unconstrained or the expression could not be evaluated.
    Unknown,
    Never,
    Always,
    Either,
}

/// Per-statement record kept while the tree is walked.
///
/// A conditional may be visited several times (forked branches, unrolled loop
/// iterations). It is only classified when every visit agreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Never,
    Always,
    Mixed,
}

#[derive(Debug, Clone, Default)]
struct Verdicts(BTreeMap<StmtId, Verdict>);

impl Verdicts {
    fn record(&mut self, id: StmtId, verdict: Verdict) {
        self.0
            .entry(id)
            .and_modify(|seen| {
                if *seen != verdict {
                    *seen = Verdict::Mixed;
                }
            })
            .or_insert(verdict);
    }

    fn absorb(&mut self, other: Verdicts) {
        for (id, verdict) in other.0 {
            self.record(id, verdict);
        }
    }

    fn into_classification(self) -> Classification {
        self.0
            .into_iter()
            .filter_map(|(id, verdict)| match verdict {
                Verdict::Never => Some((id, Reachability::Never)),
                Verdict::Always => Some((id, Reachability::Always)),
                Verdict::Mixed => None,
            })
            .collect()
    }
}

impl From<Guard> for Verdict {
    fn from(guard: Guard) -> Self {
        match guard {
            Guard::Never => Verdict::Never,
            Guard::Always => Verdict::Always,
            Guard::Unknown | Guard::Either => Verdict::Mixed,
        }
    }
}

/// Bounded abstract interpreter over possible-value sets.
///
/// Each branch that may or may not run is explored by a forked analyzer that
/// owns a copy of the table; its results are joined back afterwards.
#[derive(Debug, Clone)]
pub struct PossibleValueAnalyzer {
    limits: AnalysisLimits,
    values: ValueTable,
    verdicts: Verdicts,
}

impl Default for PossibleValueAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisLimits::default())
    }
}

impl PossibleValueAnalyzer {
    pub fn new(limits: AnalysisLimits) -> Self {
        Self {
            limits,
            values: ValueTable::default(),
            verdicts: Verdicts::default(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> ValueReport {
        self.visit_block(&program.statements);
        ValueReport {
            classification: self.verdicts.into_classification(),
            values: self.values,
        }
    }

    fn fork(&self) -> Self {
        Self {
            limits: self.limits,
            values: self.values.clone(),
            verdicts: Verdicts::default(),
        }
    }

    fn join(&mut self, branch: PossibleValueAnalyzer) {
        self.verdicts.absorb(branch.verdicts);
        self.values.join(branch.values, self.limits.max_combinations);
    }

    /// Evaluates `expr` over every combination of its variables' possible
    /// values.
    ///
    /// Returns `None` (unconstrained) if an operand is unconstrained, if there
    /// are more combinations than the limit allows, or if no combination
    /// evaluates. Combinations that divide by zero or overflow are skipped.
    pub fn eval_expr(&self, expr: &Expr) -> Option<BTreeSet<i64>> {
        let names: Vec<char> = expr.names().into_iter().collect();
        let mut domains: Vec<Vec<i64>> = Vec::with_capacity(names.len());
        let mut combinations = 1usize;
        for name in &names {
            let values = self.values.get(*name)?;
            combinations = combinations.saturating_mul(values.len());
            if combinations > self.limits.max_combinations {
                debug!(
                    %name,
                    combinations,
                    limit = self.limits.max_combinations,
                    "combination limit reached, result unconstrained"
                );
                return None;
            }
            domains.push(values.iter().copied().collect());
        }

        let mut results = BTreeSet::new();
        let mut cursor = vec![0usize; names.len()];
        loop {
            let bindings: Bindings = names
                .iter()
                .zip(&domains)
                .zip(&cursor)
                .map(|((name, domain), &i)| (*name, domain[i]))
                .collect();
            match expr.evaluate(&bindings) {
                Ok(folded) => match folded.as_constant() {
                    Some(value) => {
                        results.insert(value);
                    }
                    None => return None,
                },
                Err(err) => debug!(%err, "skipping unevaluable combination"),
            }
            if !next_combination(&mut cursor, &domains) {
                break;
            }
        }
        if results.is_empty() {
            None
        } else {
            Some(results)
        }
    }

    fn guard(&self, cond: &Expr) -> Guard {
        let Some(values) = self.eval_expr(cond) else {
            return Guard::Unknown;
        };
        let can_be_true = values.iter().any(|v| *v != 0);
        let can_be_false = values.contains(&0);
        match (can_be_true, can_be_false) {
            (true, false) => Guard::Always,
            (false, true) => Guard::Never,
            _ => Guard::Either,
        }
    }

    fn visit_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let values = self.eval_expr(value);
                self.values.set(*target, values);
            }
            StmtKind::If { cond, body } => self.visit_if(stmt.id, cond, body),
            StmtKind::While { cond, body } => self.visit_while(stmt.id, cond, body, 0),
        }
    }

    fn visit_if(&mut self, id: StmtId, cond: &Expr, body: &[Stmt]) {
        let guard = self.guard(cond);
        trace!(%id, ?guard, "if");
        self.verdicts.record(id, guard.into());
        match guard {
            Guard::Never => {}
            Guard::Always => self.visit_block(body),
            Guard::Unknown | Guard::Either => {
                let mut branch = self.fork();
                branch.visit_block(body);
                self.join(branch);
            }
        }
    }

    /// Unrolls the loop symbolically, one `depth` per iteration.
    ///
    /// Only the check at loop entry (`depth == 0`) classifies the loop itself.
    fn visit_while(&mut self, id: StmtId, cond: &Expr, body: &[Stmt], depth: usize) {
        let guard = self.guard(cond);
        trace!(%id, depth, ?guard, "while");
        if depth == 0 {
            self.verdicts.record(id, guard.into());
        }
        if guard == Guard::Unknown || depth > self.limits.max_depth {
            self.give_up_on_loop(id, body, depth);
            return;
        }
        match guard {
            Guard::Never | Guard::Unknown => {}
            Guard::Always => {
                self.visit_block(body);
                self.visit_while(id, cond, body, depth + 1);
            }
            Guard::Either => {
                let mut branch = self.fork();
                branch.visit_block(body);
                branch.visit_while(id, cond, body, depth + 1);
                self.join(branch);
            }
        }
    }

    /// Anything the body writes may hold any value from here on, and later
    /// iterations run under unknown state, so nothing nested can stay
    /// classified.
    fn give_up_on_loop(&mut self, id: StmtId, body: &[Stmt], depth: usize) {
        debug!(%id, depth, "loop state unknown, clearing values written by its body");
        for name in collect::write_names(body) {
            self.values.clear(name);
        }
        for nested in collect::conditionals(body) {
            self.verdicts.record(nested, Verdict::Mixed);
        }
    }
}

/// Advances `cursor` like an odometer over `domains`; `false` once every
/// combination has been produced.
fn next_combination(cursor: &mut [usize], domains: &[Vec<i64>]) -> bool {
    for (slot, domain) in cursor.iter_mut().zip(domains) {
        *slot += 1;
        if *slot < domain.len() {
            return true;
        }
        *slot = 0;
    }
    false
}
