//! Static dead-code analysis for deadwood programs.
//!
//! Three analyses are provided:
//!
//! - [`LiveVariableAnalyzer`]: backward liveness, reporting assignments whose
//!   value is never read.
//! - [`PossibleValueAnalyzer`]: forward, bounded possible-value sets per
//!   variable, classifying conditionals as never or always taken.
//! - [`MixedAnalyzer`]: liveness that trusts the classification, so stores in
//!   unreachable bodies are flagged and stores in guaranteed bodies are not
//!   protected by a skip path that cannot happen.
//!
//! ```rust
//! use deadwood_analysis::{run_mixed_analysis, AnalysisLimits};
//! use deadwood_syntax::ast::*;
//!
//! // a = 5
//! // if a > 10
//! //   b = 1
//! // end
//! let program = Program::new(vec![
//!     Stmt { id: StmtId(0), line: 1, kind: StmtKind::Assign { target: 'a', value: Expr::Constant(5) } },
//!     Stmt {
//!         id: StmtId(1),
//!         line: 2,
//!         kind: StmtKind::If {
//!             cond: Expr::binary(Expr::Variable('a'), BinOp::Gt, Expr::Constant(10)),
//!             body: vec![Stmt {
//!                 id: StmtId(2),
//!                 line: 3,
//!                 kind: StmtKind::Assign { target: 'b', value: Expr::Constant(1) },
//!             }],
//!         },
//!     },
//! ]);
//! assert_eq!(run_mixed_analysis(&program, &AnalysisLimits::default()), vec![StmtId(2)]);
//! ```

mod collect;
pub mod limits;
pub mod live;
pub mod mixed;
pub mod report;
pub mod values;

pub use limits::{AnalysisLimits, MAX_COMBINATION_COUNT, MAX_DEPTH};
pub use live::LiveVariableAnalyzer;
pub use mixed::{MixedAnalyzer, MixedReport};
pub use report::{classified_branches, dead_store_report, BranchKind, ClassifiedBranch, DeadStore};
pub use values::{Classification, PossibleValueAnalyzer, Reachability, ValueReport, ValueTable};

use deadwood_syntax::ast::{Program, StmtId};

/// Dead stores found by plain liveness, in source order.
pub fn run_live_variable_analysis(program: &Program) -> Vec<StmtId> {
    LiveVariableAnalyzer::new().analyze(program)
}

/// Branch classification and final possible values.
pub fn run_possible_value_analysis(program: &Program, limits: &AnalysisLimits) -> ValueReport {
    PossibleValueAnalyzer::new(*limits).analyze(program)
}

/// Dead stores found by classification-aware liveness, in source order.
pub fn run_mixed_analysis(program: &Program, limits: &AnalysisLimits) -> Vec<StmtId> {
    MixedAnalyzer::new(*limits).analyze(program).dead_stores
}
