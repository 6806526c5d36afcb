//! Lexer module for tokenizing preprocessed C headers

mod token;
mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Lexer;
