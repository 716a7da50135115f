use std::path::PathBuf;
use thiserror::Error;

/// Why a course document could not be turned into a [`Course`](super::Course).
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{document} failed schema validation: {message}")]
    Validation { document: String, message: String },

    #[error("{document} is not well-formed XML (line {line}, column {column}): {message}")]
    MalformedXml {
        document: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{element} '{id}' in {location} is missing required attribute '{attribute}'; attributes present: {present}")]
    MissingAttribute {
        element: String,
        id: String,
        location: String,
        attribute: String,
        present: String,
    },

    #[error("{element} '{id}' in {location} has {attribute}=\"{value}\", expected {expected}")]
    InvalidAttribute {
        element: String,
        id: String,
        location: String,
        attribute: String,
        value: String,
        expected: String,
    },
}
