//! External C preprocessor invocation
//!
//! The header is run through `<cpp> -E` with a fixed set of macro
//! redefinitions that strip compiler-specific extensions (attributes, asm
//! labels, `__restrict`, static assertions) so the parser only ever sees
//! portable declaration syntax.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::common::{BindgenError, BindgenResult};

/// Macro redefinitions passed on every invocation
pub const DEFINES: &[&str] = &[
    "-D__attribute__(x)=",
    "-D__asm__(x)=",
    "-D__asm(x)=",
    "-D__builtin_va_list=int",
    "-D__extension__=",
    "-D__inline__=",
    "-D__restrict=",
    "-D__restrict__=",
    "-D_Static_assert(x, y)=",
    "-D__signed=",
    "-D__volatile__(x)=",
    "-Dstatic_assert(x, y)=",
];

/// Runs an external preprocessor program (`gcc` unless configured otherwise)
#[derive(Debug, Clone)]
pub struct Preprocessor {
    program: String,
}

impl Preprocessor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program name
    pub fn args(&self, header: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(DEFINES.len() + 2);
        args.push("-E".to_string());
        args.extend(DEFINES.iter().map(|d| (*d).to_string()));
        args.push(header.display().to_string());
        args
    }

    /// Locate the program on `PATH`
    pub fn resolve(&self) -> BindgenResult<PathBuf> {
        which::which(&self.program).map_err(|e| {
            BindgenError::preflight(format!(
                "preprocessor `{}` not found on PATH: {}",
                self.program, e
            ))
        })
    }

    /// Preprocess `header`; returns the program's standard output
    pub fn run(&self, header: &Path) -> BindgenResult<String> {
        let args = self.args(header);
        tracing::debug!(program = %self.program, ?args, "running preprocessor");

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            BindgenError::preprocess(format!("failed to spawn `{}`: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BindgenError::preprocess(format!(
                "`{}` exited with {}:\n{}",
                self.program,
                output.status,
                stderr.trim_end()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|e| {
            BindgenError::preprocess(format!("output is not valid UTF-8: {}", e))
        })?;
        tracing::debug!(bytes = text.len(), "preprocessed header");
        Ok(text)
    }
}

/// Check the checkout, the header and the preprocessor before doing any work
pub fn preflight(checkout: &Path, header: &Path, preprocessor: &Preprocessor) -> BindgenResult<()> {
    if !checkout.is_dir() {
        return Err(BindgenError::preflight(format!(
            "source checkout not found at {}",
            checkout.display()
        )));
    }
    if !header.is_file() {
        return Err(BindgenError::preflight(format!(
            "header not found at {}",
            header.display()
        )));
    }
    let program = preprocessor.resolve()?;
    tracing::debug!(program = %program.display(), "preflight passed");
    Ok(())
}
