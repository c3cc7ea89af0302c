//! Source rendering for deadwood ASTs.
//!
//! Used by the `deadwood-fmt` binary and by the analyzer CLI to print the
//! statements a report points at.

use deadwood_syntax::ast::*;

const INDENT: usize = 2;

pub fn format_program(p: &Program) -> String {
    let mut out = String::new();
    for s in &p.statements {
        out.push_str(&format_stmt(s, 0));
    }
    out
}

/// Renders a statement and its body, one line per statement, each line
/// terminated by a newline.
pub fn format_stmt(s: &Stmt, indent: usize) -> String {
    let mut out = String::new();
    let pad = " ".repeat(indent);
    out.push_str(&pad);
    out.push_str(&stmt_header(s));
    out.push('\n');
    if let StmtKind::If { body, .. } | StmtKind::While { body, .. } = &s.kind {
        for st in body {
            out.push_str(&format_stmt(st, indent + INDENT));
        }
        out.push_str(&pad);
        out.push_str("end\n");
    }
    out
}

/// First line of a statement: `a = 1`, `if a > 10`, `while a < 1`.
pub fn stmt_header(s: &Stmt) -> String {
    match &s.kind {
        StmtKind::Assign { target, value } => format!("{} = {}", target, format_expr(value)),
        StmtKind::If { cond, .. } => format!("if {}", format_expr(cond)),
        StmtKind::While { cond, .. } => format!("while {}", format_expr(cond)),
    }
}

pub fn format_expr(e: &Expr) -> String {
    match e {
        Expr::Variable(c) => c.to_string(),
        Expr::Constant(n) => n.to_string(),
        Expr::Binary { left, op, right } => format!("{} {} {}", format_expr(left), op, format_expr(right)),
        Expr::Priority(inner) => format!("({})", format_expr(inner)),
    }
}
