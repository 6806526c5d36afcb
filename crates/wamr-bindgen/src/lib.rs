//! wamr-bindgen - Rust FFI binding generator for WAMR's `wasm_c_api.h`
//!
//! Preprocesses the header with the system C preprocessor, parses its
//! declarations and emits a Rust module of `#[repr(C)]` records, enumerator
//! constants and `unsafe fn` wrappers that resolve their symbols through an
//! explicitly loaded `libloading::Library`.
//!
//! ## Architecture
//!
//! - **Frontend** (`frontend/`): preprocessor invocation, lexer, parser, AST
//! - **Backend** (`backend/`): C to Rust type mapping and code emission
//! - **Config** (`config/`): per-header table (prefix, paths, skip and deny lists, prologue)
//! - **Driver** (`driver/`): preflight, generation, write/check
//! - **Common** (`common/`): errors, spans and diagnostics

pub mod common;
pub mod config;
pub mod frontend;
pub mod backend;
pub mod driver;

// Re-exports for convenience
pub use common::{BindgenError, BindgenResult, DiagnosticReporter, Span};
pub use config::BindgenConfig;
pub use backend::{Backend, BindingOutput, RustBackend};
pub use driver::{Mode, Pipeline, PipelineOptions};
