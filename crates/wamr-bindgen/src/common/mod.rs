//! Common infrastructure shared by the frontend, backend and driver

mod error;
mod span;

pub use error::{BindgenError, BindgenResult, DiagnosticReporter};
pub use span::Span;
