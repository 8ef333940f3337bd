//! Error types for snowflake-tf

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a recognized CREATE statement could not be turned into an object.
///
/// These never escape `parse`; they are recorded as diagnostics next to the
/// statement that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DdlParseError {
    #[error("object name not found after the {object} keyword")]
    MissingName { object: &'static str },

    #[error("table has no column list")]
    MissingColumnList,

    #[error("procedure has no parameter list")]
    MissingParameterList,

    #[error("unbalanced parentheses in {context}")]
    UnbalancedParentheses { context: &'static str },

    #[error("{object} has no AS clause introducing its body")]
    MissingBody { object: &'static str },
}

/// Errors raised by the file-based conversion layer
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to read SQL file: {path}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL file is neither UTF-8 nor Windows-1252: {path}")]
    InvalidEncoding { path: PathBuf },

    #[error("Failed to write Terraform file: {path}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {path}")]
    DirectoryWalkError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No .{extension} files found under {path}")]
    NoInputFiles { path: PathBuf, extension: String },
}
