pub mod parser;

pub use parser::Parser;

use deadwood_syntax::ast::Program;
use deadwood_syntax::error::Result;

/// Parses a token stream produced by the lexer into a program.
pub fn parse(tokens: Vec<deadwood_syntax::token::Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}
