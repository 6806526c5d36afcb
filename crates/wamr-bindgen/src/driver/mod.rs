//! Generation driver and pipeline orchestration

use std::path::Path;

use crate::backend::{Backend, BindingOutput, RustBackend};
use crate::common::{BindgenError, BindgenResult, DiagnosticReporter};
use crate::config::BindgenConfig;
use crate::frontend::{Lexer, Parser, Preprocessor, preflight};

/// What to do with freshly generated bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Replace the output file
    #[default]
    Write,
    /// Fail if the output file is missing or differs
    Check,
}

/// Debug switches
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub dump_tokens: bool,
    pub dump_ast: bool,
}

/// Pipeline that runs preflight, preprocessing, parsing, emission and writing
pub struct Pipeline {
    config: BindgenConfig,
    options: PipelineOptions,
    backend: Box<dyn Backend>,
}

impl Pipeline {
    pub fn new(config: BindgenConfig) -> Self {
        Self {
            config,
            options: PipelineOptions::default(),
            backend: Box::new(RustBackend::new()),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &BindgenConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.config.preprocessor.clone())
    }

    /// Check the checkout, header and toolchain under `root`
    pub fn preflight(&self, root: &Path) -> BindgenResult<()> {
        preflight(
            &self.config.checkout_dir(root),
            &self.config.header_path(root),
            &self.preprocessor(),
        )
    }

    pub fn preprocess(&self, header: &Path) -> BindgenResult<String> {
        let preprocessor = self.preprocessor();
        tracing::info!(header = %header.display(), program = preprocessor.program(), "preprocessing");
        preprocessor.run(header)
    }

    /// Parse preprocessed header text and emit bindings.
    ///
    /// Errors pointing into the text are also reported as source diagnostics.
    pub fn generate(&self, source: &str) -> BindgenResult<BindingOutput> {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file(self.config.header.display().to_string(), source);

        self.generate_inner(source).inspect_err(|e| {
            if e.span().is_some() {
                reporter.report_error(file_id, e);
            }
        })
    }

    fn generate_inner(&self, source: &str) -> BindgenResult<BindingOutput> {
        if self.options.dump_tokens {
            let tokens = Lexer::new(source).tokenize_all()?;
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("{:?}", token);
            }
            eprintln!("=== End Tokens ===\n");
        }

        tracing::info!("parsing header");
        let unit = Parser::new(source)?.parse()?;
        tracing::debug!(declarations = unit.declarations.len(), "parsed header");

        if self.options.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", unit);
            eprintln!("=== End AST ===\n");
        }

        tracing::info!(backend = self.backend.name(), "emitting bindings");
        self.backend.generate(&unit, &self.config)
    }

    /// Write or check `bindings` against `output`
    pub fn commit(&self, bindings: &BindingOutput, output: &Path, mode: Mode) -> BindgenResult<()> {
        match mode {
            Mode::Write => {
                bindings.write_to(output)?;
                tracing::info!(path = %output.display(), "bindings written");
                Ok(())
            }
            Mode::Check => {
                if bindings.is_current(output)? {
                    tracing::info!(path = %output.display(), "bindings are up to date");
                    Ok(())
                } else {
                    Err(BindgenError::stale(format!(
                        "{} is missing or differs from the header; rerun without --check",
                        output.display()
                    )))
                }
            }
        }
    }

    /// Full run for a project rooted at `root`
    pub fn run(&self, root: &Path, output: &Path, mode: Mode) -> BindgenResult<()> {
        self.preflight(root)?;

        let source = self.preprocess(&self.config.header_path(root))?;

        let bindings = self.generate(&source)?;
        self.commit(&bindings, output, mode)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(BindgenConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "\
# 1 \"wasm_c_api.h\"
typedef uint8_t wasm_valkind_t;
enum wasm_valkind_enum { WASM_I32, WASM_I64, WASM_F32, WASM_F64, WASM_ANYREF = 128, WASM_FUNCREF };
typedef struct wasm_engine_t wasm_engine_t;
typedef struct wasm_limits_t { uint32_t min; uint32_t max; } wasm_limits_t;
wasm_engine_t* wasm_engine_new(void);
void wasm_engine_delete(wasm_engine_t*);
";

    #[test]
    fn test_generate_is_idempotent() {
        let pipeline = Pipeline::default();
        let first = pipeline.generate(HEADER).unwrap();
        let second = pipeline.generate(HEADER).unwrap();
        assert_eq!(first, second);
        assert!(first.as_text().contains("pub const WASM_FUNCREF: c_int = 129;"));
    }

    #[test]
    fn test_check_passes_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("binding.rs");
        let pipeline = Pipeline::default();

        let bindings = pipeline.generate(HEADER).unwrap();
        assert!(matches!(
            pipeline.commit(&bindings, &output, Mode::Check),
            Err(BindgenError::Stale { .. })
        ));

        pipeline.commit(&bindings, &output, Mode::Write).unwrap();
        pipeline.commit(&bindings, &output, Mode::Check).unwrap();

        let changed = pipeline
            .generate(&HEADER.replace("WASM_ANYREF = 128", "WASM_ANYREF = 64"))
            .unwrap();
        assert!(matches!(
            pipeline.commit(&changed, &output, Mode::Check),
            Err(BindgenError::Stale { .. })
        ));
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let pipeline = Pipeline::default();
        let err = pipeline.generate("typedef struct wasm_x_t wasm_x_t").unwrap_err();
        assert!(matches!(err, BindgenError::Parser { .. }));
    }

    #[test]
    fn test_preflight_failure_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("binding.rs");
        fs::write(&output, "previous").unwrap();

        let err = Pipeline::default().run(dir.path(), &output, Mode::Write).unwrap_err();
        assert!(matches!(err, BindgenError::Preflight { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }

    /// Pipeline over a checkout under `root` whose `cpp` just prints the header
    #[cfg(unix)]
    fn stub_pipeline(root: &Path, header_text: &str) -> Pipeline {
        use std::os::unix::fs::PermissionsExt;

        // Stands in for `gcc -E`: prints its last argument
        let cpp = root.join("fake-cpp");
        fs::write(&cpp, "#!/bin/sh\nfor last; do :; done\ncat \"$last\"\n").unwrap();
        fs::set_permissions(&cpp, fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = BindgenConfig::wamr();
        config.preprocessor = cpp.display().to_string();
        let header = config.header_path(root);
        fs::create_dir_all(header.parent().unwrap()).unwrap();
        fs::write(&header, header_text).unwrap();

        Pipeline::new(config)
    }

    #[cfg(unix)]
    #[test]
    fn test_full_run_with_stub_preprocessor() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let pipeline = stub_pipeline(root, HEADER);
        let output = pipeline.config().output_path(root);
        pipeline.run(root, &output, Mode::Write).unwrap();
        let first = fs::read_to_string(&output).unwrap();

        pipeline.run(root, &output, Mode::Check).unwrap();
        pipeline.run(root, &output, Mode::Write).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), first);
        assert!(first.contains("pub unsafe fn wasm_engine_new(lib: &Library)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unsupported_type_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let pipeline = stub_pipeline(root, "struct wasm_a { long x; };\n");
        let output = pipeline.config().output_path(root);
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(&output, "previous").unwrap();

        let err = pipeline.run(root, &output, Mode::Write).unwrap_err();
        assert!(matches!(err, BindgenError::UnsupportedType { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    }
}
