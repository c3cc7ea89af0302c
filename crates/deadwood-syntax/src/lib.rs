pub mod ast;
pub mod error;
pub mod eval;
pub mod token;

pub use ast::*;
pub use error::*;
pub use eval::*;
pub use token::*;
