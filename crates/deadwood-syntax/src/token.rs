//! Token definitions produced by the lexer.
//!
//! The language is small: single-letter variables, unsigned integer literals,
//! six binary operators, `=`, parentheses and the block keywords `if`, `while`
//! and `end`.

use std::fmt;

/// Token types that can be produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals ===
    /// An unsigned integer literal such as `42`
    Number(i64),

    /// A variable name, always a single lowercase letter
    Name(char),

    // === Keywords ===
    /// `if` opens a conditional block
    If,

    /// `while` opens a loop block
    While,

    /// `end` closes the innermost block
    End,

    // === Punctuation ===
    /// Left parenthesis `(`
    LParen,

    /// Right parenthesis `)`
    RParen,

    // === Operators ===
    /// Assignment operator `=`
    Assign,

    /// Addition operator `+`
    Plus,

    /// Subtraction operator `-`
    Minus,

    /// Multiplication operator `*`
    Star,

    /// Division operator `/`
    Slash,

    /// Less-than comparison `<`
    Less,

    /// Greater-than comparison `>`
    Greater,

    /// End-of-file marker
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Name(c) => write!(f, "{}", c),
            TokenKind::If => write!(f, "if"),
            TokenKind::While => write!(f, "while"),
            TokenKind::End => write!(f, "end"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Less => write!(f, "<"),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}
