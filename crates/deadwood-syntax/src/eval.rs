//! Partial evaluation (constant folding) of expressions.
//!
//! [`Expr::evaluate`] substitutes bound variables with their values and folds
//! every binary node whose operands both reduce to constants. Anything that
//! cannot be resolved stays symbolic, so the result of folding under a partial
//! binding is a smaller tree rather than a value.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::ast::{BinOp, Expr};

/// Variable bindings used during folding.
pub type Bindings = BTreeMap<char, i64>;

/// Failure while folding two constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero in {left} / {right}")]
    DivisionByZero { left: i64, right: i64 },

    #[error("integer overflow in {left} {op} {right}")]
    Overflow { left: i64, op: BinOp, right: i64 },
}

impl BinOp {
    /// Applies the operator to two integers. Comparisons return `0` or `1`.
    pub fn apply(self, left: i64, right: i64) -> Result<i64, ArithmeticError> {
        let overflow = ArithmeticError::Overflow { left, op: self, right };
        match self {
            BinOp::Add => left.checked_add(right).ok_or(overflow),
            BinOp::Sub => left.checked_sub(right).ok_or(overflow),
            BinOp::Mul => left.checked_mul(right).ok_or(overflow),
            BinOp::Div => {
                if right == 0 {
                    Err(ArithmeticError::DivisionByZero { left, right })
                } else {
                    left.checked_div(right).ok_or(overflow)
                }
            }
            BinOp::Lt => Ok(i64::from(left < right)),
            BinOp::Gt => Ok(i64::from(left > right)),
        }
    }
}

impl Expr {
    /// Folds this expression under `bindings`, returning a new tree.
    ///
    /// Parentheses disappear in the result since they carry no meaning once
    /// the tree is built. Folding is idempotent: evaluating the result again
    /// with the same bindings returns it unchanged.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Expr, ArithmeticError> {
        match self {
            Expr::Variable(name) => Ok(match bindings.get(name) {
                Some(value) => Expr::Constant(*value),
                None => Expr::Variable(*name),
            }),
            Expr::Constant(value) => Ok(Expr::Constant(*value)),
            Expr::Binary { left, op, right } => {
                let left = left.evaluate(bindings)?;
                let right = right.evaluate(bindings)?;
                match (left.as_constant(), right.as_constant()) {
                    (Some(l), Some(r)) => op.apply(l, r).map(Expr::Constant),
                    _ => Ok(Expr::binary(left, *op, right)),
                }
            }
            Expr::Priority(inner) => inner.evaluate(bindings),
        }
    }
}
