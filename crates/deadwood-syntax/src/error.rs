//! Front-end error type shared by the lexer, parser and drivers.
//!
//! Lexing and parsing stop at the first problem, so a single message with an
//! optional source position is all a caller needs to report it.
//!
//! ```rust
//! use deadwood_syntax::error::{error_at, Error, Result};
//!
//! fn expect_digit(c: char, line: usize, col: usize) -> Result<u32> {
//!     c.to_digit(10)
//!         .ok_or_else(|| Error::with_span(format!("Expected digit, found '{}'", c), line, col))
//! }
//!
//! fn reject_tabs(line: usize, col: usize) -> Result<()> {
//!     error_at(line, col, "Tabs are not allowed here")
//! }
//!
//! assert_eq!(expect_digit('7', 1, 1).unwrap(), 7);
//! assert_eq!(reject_tabs(2, 4).unwrap_err().to_string(), "Tabs are not allowed here at 2:4");
//! ```

use std::fmt;

/// A malformed-input error from the lexer or parser.
///
/// `line` and `col` are 1-based and present whenever the problem can be
/// pinned to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error located at `line`:`col`.
    pub fn with_span(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(l), Some(c)) = (self.line, self.col) {
            write!(f, "{} at {}:{}", self.msg, l, c)
        } else {
            write!(f, "{}", self.msg)
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the front end.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::with_span(msg, line, col))`.
pub fn error_at<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(msg, line, col))
}
