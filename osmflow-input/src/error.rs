//! Failures raised while reading a stream.

use std::io;

use camino::Utf8PathBuf;
use osmflow_core::{ModelError, ObjectKind};
use thiserror::Error;

use crate::Location;

/// Errors that abort a read pass.
///
/// Every variant is fatal to the current pass. The handler receives no
/// further callbacks apart from `finished`. Positions are one-based for the
/// XML encoding and zero for the binary encoding.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The text encoding is not well formed.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// One-based line of the offending token.
        line: u64,
        /// One-based column of the offending token.
        column: u64,
        /// Description of the problem.
        message: String,
    },
    /// A relation member role exceeded the length limit.
    #[error("relation {id} has a member role of {length} bytes, the limit is {max}")]
    RoleTooLong {
        /// Identifier of the relation being read.
        id: i64,
        /// Length of the rejected role in bytes.
        length: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// A relation member lacks a usable type or reference.
    #[error("relation {id} has a malformed member at line {line}, column {column}: {detail}")]
    MalformedMember {
        /// Identifier of the relation being read.
        id: i64,
        /// One-based line of the member element.
        line: u64,
        /// One-based column of the member element.
        column: u64,
        /// What is wrong with the member.
        detail: String,
    },
    /// A tag lacks its key or value under the strict tag policy.
    #[error("tag at line {line}, column {column} is missing its key or value")]
    MalformedTag {
        /// One-based line of the tag element.
        line: u64,
        /// One-based column of the tag element.
        column: u64,
    },
    /// A recognised attribute holds a value that cannot be decoded.
    #[error("invalid value {value:?} for attribute {attribute} at line {line}, column {column}")]
    InvalidValue {
        /// Attribute name.
        attribute: String,
        /// Raw attribute value.
        value: String,
        /// One-based line of the element.
        line: u64,
        /// One-based column of the element.
        column: u64,
    },
    /// An object ended without an identifier.
    #[error("{kind} ending at line {line}, column {column} has no id")]
    MissingIdentifier {
        /// Kind of the incomplete object.
        kind: ObjectKind,
        /// One-based line where the object ended.
        line: u64,
        /// One-based column where the object ended.
        column: u64,
    },
    /// The byte source failed.
    #[error("failed to read from the byte source")]
    Io {
        #[source]
        source: io::Error,
    },
    /// The binary encoding could not be decoded.
    #[error("failed to decode PBF data")]
    Decode {
        #[source]
        source: osmpbf::Error,
    },
    /// A file could not be opened.
    #[error("failed to open {path}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The encoding of a file cannot be inferred from its name.
    #[error("cannot infer the encoding of {path}")]
    UnknownFormat {
        /// Path that was rejected.
        path: Utf8PathBuf,
    },
}

impl From<io::Error> for ReadError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

impl ReadError {
    /// Attach the relation identifier and position to a model failure.
    pub(crate) fn from_model(error: ModelError, id: i64, at: Location) -> Self {
        match error {
            ModelError::RoleTooLong { length, max } => Self::RoleTooLong { id, length, max },
            ModelError::MissingIdentifier { kind } => Self::MissingIdentifier {
                kind,
                line: at.line,
                column: at.column,
            },
            ModelError::NothingInProgress => Self::Syntax {
                line: at.line,
                column: at.column,
                message: error.to_string(),
            },
        }
    }
}
