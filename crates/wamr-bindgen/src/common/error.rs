//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use thiserror::Error;
use super::Span;

/// Failure of a generation run. Every variant aborts the whole run.
#[derive(Error, Debug)]
pub enum BindgenError {
    #[error("Preflight check failed: {message}")]
    Preflight { message: String },

    #[error("Preprocessor failed: {message}")]
    Preprocess { message: String },

    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Unsupported type shape at {span:?}: {message}")]
    UnsupportedType { message: String, span: Span },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Generated bindings are out of date: {message}")]
    Stale { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BindgenError {
    pub fn preflight(message: impl Into<String>) -> Self {
        Self::Preflight {
            message: message.into(),
        }
    }

    pub fn preprocess(message: impl Into<String>) -> Self {
        Self::Preprocess {
            message: message.into(),
        }
    }

    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported(message: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedType {
            message: message.into(),
            span,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn stale(message: impl Into<String>) -> Self {
        Self::Stale {
            message: message.into(),
        }
    }

    /// Source location of the error, if it points into the header text
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } | Self::UnsupportedType { span, .. } => {
                Some(*span)
            }
            _ => None,
        }
    }
}

pub type BindgenResult<T> = Result<T, BindgenError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
    color: ColorChoice,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
            color: ColorChoice::Auto,
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    fn diagnostic(file_id: usize, error: &BindgenError) -> Diagnostic<usize> {
        let labelled = |title: &str, message: &str, span: &Span| {
            Diagnostic::error()
                .with_message(title.to_string())
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message.to_string())
                ])
        };

        match error {
            BindgenError::Lexer { message, span } => labelled("Lexer error", message, span),
            BindgenError::Parser { message, span } => labelled("Syntax error", message, span),
            BindgenError::UnsupportedType { message, span } => {
                labelled("Unsupported type shape", message, span)
            }
            other => Diagnostic::error().with_message(other.to_string()),
        }
    }

    fn emit(&self, writer: &mut dyn WriteColor, file_id: usize, error: &BindgenError) {
        let diagnostic = Self::diagnostic(file_id, error);
        if term::emit(writer, &self.config, &self.files, &diagnostic).is_err() {
            // Span outside the registered text; fall back to the plain message.
            let plain = Diagnostic::error().with_message(error.to_string());
            let _ = term::emit(writer, &self.config, &self.files, &plain);
        }
    }

    pub fn report_error(&self, file_id: usize, error: &BindgenError) {
        let writer = StandardStream::stderr(self.color);
        self.emit(&mut writer.lock(), file_id, error);
    }

    /// Render a diagnostic without colors, for logs and tests
    pub fn render(&self, file_id: usize, error: &BindgenError) -> String {
        let mut buffer = NoColor::new(Vec::new());
        self.emit(&mut buffer, file_id, error);
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
