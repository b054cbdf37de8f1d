use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading documents, policies, and record lines.
///
/// Only the XML variants are parse failures in the sense of
/// [`Error::is_parse_failure`]; everything a traversal can encounter on a
/// well-formed tree (ignored branches, missing attributes, empty documents)
/// is a defined outcome rather than an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("XML syntax error at byte {position}: {message}")]
    XmlSyntax { message: String, position: u64 },

    #[error("Mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEndTag(String),

    #[error("Unclosed element <{0}> at end of input")]
    UnclosedElement(String),

    #[error("Document has more than one root element (second root: <{0}>)")]
    MultipleRoots(String),

    #[error("Text outside the root element: {0:?}")]
    TextOutsideRoot(String),

    #[error("Malformed record on line {line_number}: {line:?}")]
    MalformedLine { line_number: usize, line: String },

    #[error("Invalid policy file {path:?}: {source}")]
    Policy {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the input markup could not be turned into a tree.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Error::XmlSyntax { .. }
                | Error::MismatchedEndTag { .. }
                | Error::UnexpectedEndTag(_)
                | Error::UnclosedElement(_)
                | Error::MultipleRoots(_)
                | Error::TextOutsideRoot(_)
        )
    }
}
