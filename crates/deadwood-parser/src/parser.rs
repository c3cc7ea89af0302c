//! Recursive-descent parser producing a [`Program`].

use deadwood_syntax::ast::*;
use deadwood_syntax::error::{error_at, Result};
use deadwood_syntax::token::{Token, TokenKind};

/// Parser over a token vector ending in `Eof`.
///
/// Statement ids are handed out in pre-order as statements are opened, so the
/// first statement of a program is `StmtId(0)` and an `if` always has a
/// smaller id than anything in its body.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: u32,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, col) = tokens.last().map_or((1, 1), |t| (t.line, t.col));
            tokens.push(Token { kind: TokenKind::Eof, line, col });
        }
        Self { tokens, pos: 0, next_id: 0 }
    }

    fn peek(&self) -> &Token {
        // the lexer always terminates the stream with Eof
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn advance(&mut self) -> Token {
        let tk = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tk
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        let tk = self.peek().clone();
        if tk.kind == kind {
            Ok(self.advance())
        } else {
            error_at(tk.line, tk.col, format!("Expected {}, found '{}'", what, tk.kind))
        }
    }

    fn fresh_id(&mut self) -> StmtId {
        let id = StmtId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let statements = self.parse_block()?;
        let tk = self.peek();
        if tk.kind != TokenKind::Eof {
            return error_at(tk.line, tk.col, format!("Unexpected token '{}'", tk.kind));
        }
        Ok(Program::new(statements))
    }

    /// One or more statements, stopping at `end` or end of input.
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        while let Some(stmt) = self.parse_stmt()? {
            statements.push(stmt);
        }
        if statements.is_empty() {
            let tk = self.peek();
            return error_at(tk.line, tk.col, format!("Expected statement, found '{}'", tk.kind));
        }
        Ok(statements)
    }

    fn parse_stmt(&mut self) -> Result<Option<Stmt>> {
        let tk = self.peek().clone();
        let kind = match tk.kind {
            TokenKind::Name(target) => {
                let id = self.fresh_id();
                self.advance();
                self.expect(TokenKind::Assign, "'='")?;
                let value = self.parse_expr()?;
                return Ok(Some(Stmt { id, line: tk.line, kind: StmtKind::Assign { target, value } }));
            }
            TokenKind::If | TokenKind::While => tk.kind.clone(),
            _ => return Ok(None),
        };
        let id = self.fresh_id();
        self.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        self.expect(TokenKind::End, "'end'")?;
        let kind = if kind == TokenKind::If {
            StmtKind::If { cond, body }
        } else {
            StmtKind::While { cond, body }
        };
        Ok(Some(Stmt { id, line: tk.line, kind }))
    }

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_binary(1)
    }

    /// Precedence climbing; every operator is left-associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;
        while let Some(op) = binary_op(&self.peek().kind) {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = Expr::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let tk = self.advance();
        match tk.kind {
            TokenKind::Number(n) => Ok(Expr::Constant(n)),
            TokenKind::Name(c) => Ok(Expr::Variable(c)),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::priority(inner))
            }
            other => error_at(tk.line, tk.col, format!("Expected expression, found '{}'", other)),
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Minus => Some(BinOp::Sub),
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        TokenKind::Less => Some(BinOp::Lt),
        TokenKind::Greater => Some(BinOp::Gt),
        _ => None,
    }
}
