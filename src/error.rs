//! Error types for the documentation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// A record matched a documentable kind but lacks a required field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("{kind} declaration has no name{}", at(.location))]
    MissingName {
        kind: String,
        location: Option<String>,
    },
    #[error("extension `{declared}` has no resolvable base type{}", at(.location))]
    MissingBaseName {
        declared: String,
        location: Option<String>,
    },
}

fn at(location: &Option<String>) -> String {
    location
        .as_deref()
        .map(|l| format!(" at {}", l))
        .unwrap_or_default()
}

/// Misuse of the document index lifecycle. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("cannot append `{0}`: document index is already finalized")]
    Finalized(String),
    #[error("document index must be merged before it is sorted")]
    NotMerged,
    #[error("document index has not been finalized")]
    NotFinalized,
}

/// Rendering aborted for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{bucket} entity has no name")]
    MissingName { bucket: &'static str },
    #[error("member of `{entity}` has no name")]
    MissingMemberName { entity: String },
}

/// Failure to acquire symbol records. Fatal for the run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid symbol JSON in {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{origin} does not contain any symbol records")]
    Empty { origin: String },
}
