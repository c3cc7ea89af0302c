//! Text and JSON rendering of analysis results.

use std::collections::BTreeSet;

use deadwood_analysis::{BranchKind, ClassifiedBranch, DeadStore, Reachability, ValueTable};
use deadwood_fmt::stmt_header;
use deadwood_syntax::ast::{Program, StmtId};
use serde::Serialize;

use crate::Mode;

/// Everything one run of the CLI found, resolved against the program.
#[derive(Debug)]
pub struct Analysis {
    pub mode: Mode,
    pub dead_stores: Vec<DeadStore>,
    pub branches: Vec<ClassifiedBranch>,
    /// Final possible values; only filled in by the value analysis.
    pub values: Option<ValueTable>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    mode: Mode,
    dead_stores: Vec<Located<'a, DeadStore>>,
    branches: Vec<Located<'a, ClassifiedBranch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<&'a ValueTable>,
}

#[derive(Serialize)]
struct Located<'a, T> {
    #[serde(flatten)]
    item: &'a T,
    statement: String,
}

fn header(program: &Program, id: StmtId) -> String {
    program.find(id).map(stmt_header).unwrap_or_default()
}

fn reachability_label(branch: &ClassifiedBranch) -> &'static str {
    match (branch.kind, branch.reachability) {
        (BranchKind::If, Reachability::Never) => "branch never taken",
        (BranchKind::If, Reachability::Always) => "branch always taken",
        (BranchKind::While, Reachability::Never) => "loop never entered",
        (BranchKind::While, Reachability::Always) => "loop always entered",
    }
}

fn format_set(values: &BTreeSet<i64>) -> String {
    let items: Vec<String> = values.iter().map(i64::to_string).collect();
    format!("{{{}}}", items.join(", "))
}

/// One line per finding, prefixed with `file:line:` like a compiler
/// diagnostic.
pub fn text(file: &str, program: &Program, analysis: &Analysis) -> String {
    let mut lines: Vec<String> = analysis
        .branches
        .iter()
        .map(|b| format!("{}:{}: {}: {}", file, b.line, reachability_label(b), header(program, b.id)))
        .collect();
    if analysis.mode != Mode::Values {
        lines.extend(analysis.dead_stores.iter().map(|d| {
            format!("{}:{}: dead store to `{}`: {}", file, d.line, d.variable, header(program, d.id))
        }));
        if analysis.dead_stores.is_empty() {
            lines.push("no dead stores found".to_string());
        }
    }
    if let Some(values) = &analysis.values {
        lines.extend(values.iter().map(|(name, set)| format!("{} = {}", name, format_set(set))));
    }
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

pub fn json(file: &str, program: &Program, analysis: &Analysis) -> serde_json::Result<String> {
    let report = JsonReport {
        file,
        mode: analysis.mode,
        dead_stores: analysis
            .dead_stores
            .iter()
            .map(|item| Located { item, statement: header(program, item.id) })
            .collect(),
        branches: analysis
            .branches
            .iter()
            .map(|item| Located { item, statement: header(program, item.id) })
            .collect(),
        values: analysis.values.as_ref(),
    };
    serde_json::to_string_pretty(&report)
}
