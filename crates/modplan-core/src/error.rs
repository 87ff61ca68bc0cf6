//! Error types for plan operations.

use crate::element::ElementRef;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can surface from the geometry core.
///
/// Out-of-range geometry is never an error: it is clamped in place.
/// Stale references during a commit are dropped as a no-op rather than
/// reported here (see [`crate::interaction::CommitOutcome`]).
#[derive(Debug, Error)]
pub enum PlanError {
    /// The referenced element does not exist on the floor.
    #[error("element not found: {0}")]
    NotFound(ElementRef),

    /// A group needs at least two groupable elements.
    #[error("cannot create a group from {groupable} groupable element(s), need at least 2")]
    InsufficientSelection { groupable: usize },

    /// An element's `group_id` tag and the group's member list disagree.
    #[error("group {group} is inconsistent with member {element}")]
    InconsistentGroup { group: Uuid, element: ElementRef },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a file from disk.
    #[error("failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
