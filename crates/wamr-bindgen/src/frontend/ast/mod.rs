//! Abstract Syntax Tree definitions

mod types;
mod decl;

pub use types::*;
pub use decl::*;

/// A complete translation unit (preprocessed header)
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit {
    pub declarations: Vec<Declaration>,
}

impl TranslationUnit {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }
}
