//! Unified error handling for segment consolidation.
//!
//! Every variant except the I/O ones describes a broken invariant rather than
//! bad user input. Consolidation aborts on the first one; nothing is skipped
//! or retried.

use thiserror::Error;

/// Unified error type for consolidation operations.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// Two consecutive chain segments do not share their splice point
    #[error(
        "cannot join '{previous}' to '{next}': chain ends at {expected:?} but next segment starts at {found:?}"
    )]
    GeometryMismatch {
        previous: String,
        next: String,
        expected: (f64, f64),
        found: (f64, f64),
    },

    /// A merge rule's priority table has no entry for a value
    #[error("no merge priority defined for {field} value {value}")]
    MissingPriority { field: &'static str, value: String },

    /// A property merge was requested with no segments
    #[error("cannot merge properties of an empty chain")]
    EmptyChain,

    /// A line segment has too few points to have a head and a tail
    #[error("segment '{feature_id}' has {point_count} points, minimum {minimum_required} required")]
    InsufficientPoints {
        feature_id: String,
        point_count: usize,
        minimum_required: usize,
    },

    /// Reading or writing a feature file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GeoJSON parsing or geometry conversion failed
    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    /// A GeoJSON feature is missing its geometry or properties
    #[error("invalid feature at index {index}: {message}")]
    InvalidFeature { index: usize, message: String },
}

/// Result type alias for consolidation operations.
pub type Result<T> = std::result::Result<T, ConsolidationError>;

/// Extension trait for converting `Option` to [`ConsolidationError`].
pub trait OptionExt<T> {
    /// Convert `None` into a missing priority error for `field`.
    fn ok_or_missing_priority(self, field: &'static str, value: &dyn std::fmt::Debug)
        -> Result<T>;

    /// Convert `None` into an empty chain error.
    fn ok_or_empty_chain(self) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_priority(
        self,
        field: &'static str,
        value: &dyn std::fmt::Debug,
    ) -> Result<T> {
        self.ok_or_else(|| ConsolidationError::MissingPriority {
            field,
            value: format!("{:?}", value),
        })
    }

    fn ok_or_empty_chain(self) -> Result<T> {
        self.ok_or(ConsolidationError::EmptyChain)
    }
}
