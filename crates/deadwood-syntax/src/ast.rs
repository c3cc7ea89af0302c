//! AST (abstract syntax tree) types for the deadwood toy language.
//!
//! Expressions are plain immutable trees. Statements carry a [`StmtId`] that
//! is unique within a [`Program`], so analyses can refer to one specific node
//! even when another statement is textually identical.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Binary operators. Comparisons produce `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Lt => '<',
            BinOp::Gt => '>',
        }
    }

    /// Binding strength used by the parser; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Lt | BinOp::Gt => 1,
            BinOp::Add | BinOp::Sub => 2,
            BinOp::Mul | BinOp::Div => 3,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Expressions over single-letter integer variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Variable(char),
    Constant(i64),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// Parenthesized expression; kept only so it can be printed back.
    Priority(Box<Expr>),
}

impl Expr {
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn priority(inner: Expr) -> Self {
        Expr::Priority(Box::new(inner))
    }

    pub fn as_constant(&self) -> Option<i64> {
        match self {
            Expr::Constant(v) => Some(*v),
            _ => None,
        }
    }

    /// Every variable referenced anywhere in this expression.
    pub fn names(&self) -> BTreeSet<char> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    /// Adds the referenced variables to an existing set.
    pub fn collect_names(&self, names: &mut BTreeSet<char>) {
        match self {
            Expr::Variable(name) => {
                names.insert(*name);
            }
            Expr::Constant(_) => {}
            Expr::Binary { left, right, .. } => {
                left.collect_names(names);
                right.collect_names(names);
            }
            Expr::Priority(inner) => inner.collect_names(names),
        }
    }
}

/// Stable identity of a statement within its program.
///
/// The parser hands ids out in pre-order, so comparing ids compares source
/// positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StmtId(pub u32);

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A statement together with its identity and starting line (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub id: StmtId,
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Assign { target: char, value: Expr },
    If { cond: Expr, body: Vec<Stmt> },
    While { cond: Expr, body: Vec<Stmt> },
}

impl Stmt {
    /// The nested block of an `if`/`while`, empty for assignments.
    pub fn body(&self) -> &[Stmt] {
        match &self.kind {
            StmtKind::Assign { .. } => &[],
            StmtKind::If { body, .. } | StmtKind::While { body, .. } => body,
        }
    }

    /// Finds the statement with `id` in this subtree.
    pub fn find(&self, id: StmtId) -> Option<&Stmt> {
        if self.id == id {
            return Some(self);
        }
        find_in(self.body(), id)
    }
}

/// Depth-first search. Ids are only required to be unique, not ordered.
fn find_in(stmts: &[Stmt], id: StmtId) -> Option<&Stmt> {
    stmts.iter().find_map(|s| s.find(id))
}

/// Entire program: a single non-empty statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Looks up a statement anywhere in the program by identity.
    pub fn find(&self, id: StmtId) -> Option<&Stmt> {
        find_in(&self.statements, id)
    }
}
