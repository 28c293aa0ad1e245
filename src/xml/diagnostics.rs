//! XML error diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// XML syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("XML syntax error")]
#[diagnostic(code(spt::xml::syntax))]
pub struct XmlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl XmlSyntaxError {
    /// Create a syntax error at a byte offset into the source.
    pub fn at_offset(message: impl Into<String>, source: &str, filename: &str, offset: usize) -> Self {
        let offset = offset.min(source.len().saturating_sub(1));
        let message = message.into();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    /// The underlying parser message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while reading or validating a project file
#[derive(Debug, Error, Diagnostic)]
pub enum XmlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] XmlSyntaxError),

    /// The document is well-formed XML but is not a valid project file of
    /// a supported format version.
    #[error("not a valid project file: {0}")]
    #[diagnostic(code(spt::xml::schema))]
    SchemaValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Suggest a fix for common parser messages.
fn generate_help(message: &str) -> Option<String> {
    if message.contains("unclosed") || message.contains("unexpected closing") {
        return Some("check that every element has a matching closing tag".to_string());
    }

    if message.contains("root element") {
        return Some("a project file holds exactly one top-level <Project> element".to_string());
    }

    None
}
