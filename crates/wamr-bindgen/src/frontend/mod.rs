//! Header frontend
//!
//! Turns a C header into a flat list of declarations:
//! 1. Preprocessing through an external `cpp` (`gcc -E`)
//! 2. Lexing the preprocessed text into tokens
//! 3. Parsing tokens into a declaration AST

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod preprocessor;

use crate::common::BindgenResult;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use preprocessor::{Preprocessor, preflight};

/// Parse preprocessed header text
pub fn parse_header(source: &str) -> BindgenResult<TranslationUnit> {
    Parser::new(source)?.parse()
}
