//! Binding backends
//!
//! A backend turns the parsed declarations of a header into the text of a
//! binding module. [`BindingOutput`] persists that text.

pub mod rust;

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::common::{BindgenError, BindgenResult};
use crate::config::BindgenConfig;
use crate::frontend::ast::TranslationUnit;

pub use rust::RustBackend;

/// Generated binding module text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOutput {
    text: String,
}

impl BindingOutput {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Replace `path` atomically.
    ///
    /// The text goes to a temporary file next to `path` which is then renamed
    /// over it, so a failure never leaves a truncated module behind.
    pub fn write_to(&self, path: &Path) -> BindgenResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(self.text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| BindgenError::Io(e.error))?;

        tracing::debug!(path = %path.display(), bytes = self.text.len(), "wrote bindings");
        Ok(())
    }

    /// Whether `path` already holds exactly this text; a missing file is not current
    pub fn is_current(&self, path: &Path) -> BindgenResult<bool> {
        match fs::read_to_string(path) {
            Ok(existing) => Ok(existing == self.text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trait for binding backends
pub trait Backend {
    /// Name of the target language
    fn name(&self) -> &'static str;

    fn generate(&self, unit: &TranslationUnit, config: &BindgenConfig) -> BindgenResult<BindingOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binding.rs");
        fs::write(&path, "stale contents that are longer than the new ones").unwrap();

        let output = BindingOutput::new("pub const A: c_int = 0;\n".to_string());
        output.write_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "pub const A: c_int = 0;\n");
        // Only the module itself remains; the temporary file was renamed
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src").join("binding.rs");
        BindingOutput::new("x".to_string()).write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_is_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binding.rs");
        let output = BindingOutput::new("text\n".to_string());

        assert!(!output.is_current(&path).unwrap());
        output.write_to(&path).unwrap();
        assert!(output.is_current(&path).unwrap());
        assert!(!BindingOutput::new("other\n".to_string()).is_current(&path).unwrap());
    }

    #[test]
    fn test_rust_backend_name() {
        assert_eq!(RustBackend::new().name(), "rust");
    }
}
