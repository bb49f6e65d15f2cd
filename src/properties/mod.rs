//! # Feature Properties
//!
//! Typed OpenSkiData property records for runs and lifts, and the
//! [`Consolidate`] trait the graph uses to compare and merge them.
//!
//! Property names serialize in the camelCase form used by the rest of the
//! pipeline (`skiAreas`, `elevationProfile`, `wikidataID`, ...).

mod merge;
pub mod lift;
pub mod run;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use lift::{LiftProperties, LiftType};
pub use run::{Convention, Difficulty, Grooming, RunProperties, RunUse};

// Merge rule helpers are shared by the run and lift mergers
pub(crate) use merge::{
    first_non_null, fold_oneway, join_text, pick_by_priority, union_by_key, BOOLEAN_PRIORITY,
};

/// Properties that can take part in segment consolidation.
///
/// Implementors define which fields identify a single source segment (and may
/// therefore differ between segments of one logical feature) and how N
/// matched segments collapse into one record.
pub trait Consolidate: Sized {
    /// Internal id of the segment, used in error messages and for
    /// deterministic candidate ordering.
    fn feature_id(&self) -> &str;

    /// Tri-state direction flag. `Some(true)` segments are never reversed.
    fn oneway(&self) -> Option<bool>;

    /// Whether `other` continues the same real-world run or lift.
    ///
    /// Identity fields (id, sources, ski areas, places, elevation profile) are
    /// ignored; every other field must be exactly equal.
    fn is_same_logical_feature(&self, other: &Self) -> bool;

    /// Combine the properties of a chain, in traversal order.
    ///
    /// Fails with [`ConsolidationError::EmptyChain`](crate::ConsolidationError::EmptyChain)
    /// on an empty slice and with
    /// [`ConsolidationError::MissingPriority`](crate::ConsolidationError::MissingPriority)
    /// if a priority table is incomplete.
    fn merge(parts: &[&Self]) -> Result<Self>;
}

/// Lifecycle status shared by runs and lifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Operating,
    Construction,
    Planned,
    Proposed,
    Disused,
    Abandoned,
}

/// Merge preference for [`Status`]: the most "alive" status wins.
pub(crate) const STATUS_PRIORITY: [Status; 6] = [
    Status::Operating,
    Status::Construction,
    Status::Planned,
    Status::Proposed,
    Status::Disused,
    Status::Abandoned,
];

/// Data provider a segment was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "openstreetmap")]
    OpenStreetMap,
    #[serde(rename = "skimap.org")]
    SkimapOrg,
}

/// Reference to a source object, e.g. `(openstreetmap, "way/1234")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub id: String,
}

impl Source {
    pub fn new(source_type: SourceType, id: impl Into<String>) -> Self {
        Self {
            source_type,
            id: id.into(),
        }
    }

    pub fn openstreetmap(id: impl Into<String>) -> Self {
        Self::new(SourceType::OpenStreetMap, id)
    }

    pub(crate) fn key(&self) -> (SourceType, &str) {
        (self.source_type, self.id.as_str())
    }
}

/// Ski area a segment has been associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkiAreaRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SkiAreaRef {
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
        }
    }
}

/// Reverse-geocoded place a segment lies in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "iso3166_1Alpha2")]
    pub country_code: String,
    #[serde(rename = "iso3166_2", default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

impl Place {
    pub(crate) fn key(&self) -> (&str, Option<&str>, Option<&str>) {
        (
            self.country_code.as_str(),
            self.region_code.as_deref(),
            self.locality.as_deref(),
        )
    }
}

/// Sampled elevations along a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    pub heights: Vec<f64>,
    /// Distance between samples in meters
    pub resolution: f64,
}
