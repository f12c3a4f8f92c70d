//! Error types for the generator.
//!
//! Every stage of a run reports through [`GenError`]. A run is fail-fast: the
//! first error aborts it and is returned to the caller unchanged. Files that
//! were already written before the failing node are left in place unless the
//! caller chose [`EmitStrategy::Staged`](crate::generator::EmitStrategy).

use std::path::PathBuf;

use thiserror::Error;

use crate::spec::{ResourceKey, ValidationIssue};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GenError>;

/// Main error type for a generator run
#[derive(Debug, Error)]
pub enum GenError {
    /// One or more resource specs are malformed or inconsistent
    ///
    /// Detected while building the options tree, before any file I/O.
    #[error("invalid resource spec: {}", summarize(.issues))]
    InvalidSpec {
        /// Every issue found in the input, in input order
        issues: Vec<ValidationIssue>,
    },

    /// A declared sub-resource is not registered in the tree
    ///
    /// Only raised when strict reference checking is requested; the default
    /// build drops the reference and records it instead.
    #[error("sub-resource {reference} declared by {owner} is not a registered resource")]
    UnresolvedReference {
        /// Resource whose `subResources` list names the missing resource
        owner: ResourceKey,
        /// The identity that could not be found
        reference: ResourceKey,
    },

    /// A template required by a node role is missing from the template set
    #[error("required template '{template}' not found in {}", .source_dir.display())]
    MissingTemplate {
        /// Conventional file name of the template
        template: String,
        /// Directory the template set was loaded from
        source_dir: PathBuf,
    },

    /// Template execution against a node's options failed
    #[error("template '{template}' failed while rendering {}: {source}", .path.display())]
    Template {
        /// Template name
        template: String,
        /// Destination the rendered text was meant for
        path: PathBuf,
        /// Underlying template engine error
        #[source]
        source: minijinja::Error,
    },

    /// The external formatter could not run or rejected the rendered text
    #[error("formatter `{program}` failed for {}: {message}", .path.display())]
    Format {
        /// Formatter executable
        program: String,
        /// Destination of the text being formatted
        path: PathBuf,
        /// What went wrong (spawn failure or the formatter's stderr)
        message: String,
    },

    /// Directory creation, file deletion or file write failed
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        /// Path the failing operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The spec document could not be read or deserialized
    #[error("failed to load spec document {}: {message}", .path.display())]
    Load {
        /// Document path
        path: PathBuf,
        /// Parser or reader message
        message: String,
    },
}

impl GenError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    match issues {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}
