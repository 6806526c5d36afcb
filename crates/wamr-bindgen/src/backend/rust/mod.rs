//! Rust binding backend
//!
//! Emits a module of `#[repr(C)]` records, `c_int` constants and `unsafe fn`
//! wrappers that resolve their symbol through a `libloading::Library`.

mod emit;
pub mod prologue;
mod ty;

pub use emit::RustEmitter;
pub use ty::{RustType, TypeMapper};

use crate::backend::{Backend, BindingOutput};
use crate::common::BindgenResult;
use crate::config::BindgenConfig;
use crate::frontend::ast::TranslationUnit;

/// Backend producing Rust source
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for RustBackend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn generate(&self, unit: &TranslationUnit, config: &BindgenConfig) -> BindgenResult<BindingOutput> {
        tracing::debug!(declarations = unit.declarations.len(), "generating Rust bindings");
        let text = RustEmitter::new(config).generate(unit)?;
        Ok(BindingOutput::new(text))
    }
}
