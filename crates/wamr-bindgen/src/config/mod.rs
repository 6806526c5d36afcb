//! Per-header binding table
//!
//! Everything that is specific to one header version lives here rather than in
//! the generator: the library prefix, where the header and the native library
//! sit inside the source checkout, the struct skip-list, the function denylist
//! and the hand-authored items spliced into the prologue.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{BindgenError, BindgenResult};

/// Table shipped for wasm-micro-runtime
const WAMR_TOML: &str = include_str!("../../wamr.toml");

fn default_preprocessor() -> String {
    "gcc".to_string()
}

/// Binding generation settings for one header
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindgenConfig {
    /// Name prefix of the wrapped library's own symbols and types
    pub prefix: String,
    /// Source checkout, relative to the project root
    pub checkout: PathBuf,
    /// Header, relative to the checkout
    pub header: PathBuf,
    /// Generated module, relative to the project root
    pub output: PathBuf,
    #[serde(default = "default_preprocessor")]
    pub preprocessor: String,
    #[serde(default)]
    pub skip_structs: Vec<String>,
    #[serde(default)]
    pub deny_functions: Vec<String>,
    pub library: LibraryPaths,
    #[serde(default)]
    pub prologue: PrologueConfig,
}

/// Native library location per platform, relative to the checkout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryPaths {
    pub linux: String,
    pub windows: String,
    pub macos: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrologueConfig {
    /// License banner lines, emitted as `//` comments
    #[serde(default)]
    pub banner: Vec<String>,
    /// Hand-authored Rust items appended after the loader
    #[serde(default)]
    pub extra: String,
}

impl BindgenConfig {
    pub fn from_toml(source: &str) -> BindgenResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| BindgenError::config(e.to_string()))?;
        if config.prefix.is_empty() {
            return Err(BindgenError::config("`prefix` must not be empty"));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> BindgenResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| {
            BindgenError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&source)
    }

    /// The table for `wasm_c_api.h` shipped with this crate
    pub fn wamr() -> Self {
        Self::from_toml(WAMR_TOML).expect("bundled wamr.toml is valid")
    }

    pub fn has_prefix(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    pub fn is_skipped_struct(&self, name: &str) -> bool {
        self.skip_structs.iter().any(|s| s == name)
    }

    pub fn is_denied_function(&self, name: &str) -> bool {
        self.deny_functions.iter().any(|f| f == name)
    }

    pub fn checkout_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.checkout)
    }

    pub fn header_path(&self, root: &Path) -> PathBuf {
        self.checkout_dir(root).join(&self.header)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }
}

impl Default for BindgenConfig {
    fn default() -> Self {
        Self::wamr()
    }
}
