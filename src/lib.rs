//! # Piste Consolidation
//!
//! Consolidation of ski run and lift line segments for the OpenSkiData
//! processing pipeline.
//!
//! OpenStreetMap and Skimap.org describe one physical run or lift as several
//! line segments: ways split at intersections, duplicated by relations, or
//! digitized twice by different providers. This library stitches segments
//! that continue the same logical feature into one continuous line with
//! merged properties, respecting `oneway` and consuming each segment at most
//! once.
//!
//! ## Features
//!
//! - **`parallel`** - Consolidate runs and lifts concurrently with rayon
//! - **`io`** - Read and write GeoJSON feature collections
//! - **`cli`** - `consolidate-features` command-line binary
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use geo::line_string;
//! use piste_consolidation::{consolidate, ConsolidationConfig, Feature, RunProperties};
//!
//! let props = |id: &str| RunProperties {
//!     name: Some("Face de Bellevarde".to_string()),
//!     ..RunProperties::new(id)
//! };
//!
//! let runs = vec![
//!     Feature::new(line_string![(x: 6.98, y: 45.44), (x: 6.99, y: 45.44)], props("a")),
//!     Feature::new(line_string![(x: 6.99, y: 45.44), (x: 7.00, y: 45.45)], props("b")),
//! ];
//!
//! let merged = consolidate(&runs, &ConsolidationConfig::default()).unwrap();
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].line().unwrap().0.len(), 3);
//! ```

use geo::{Geometry, LineString};

// Unified error handling
pub mod error;
pub use error::{ConsolidationError, OptionExt, Result};

// Typed run/lift properties and merge rules
pub mod properties;
pub use properties::{
    Consolidate, Convention, Difficulty, ElevationProfile, Grooming, LiftProperties, LiftType,
    Place, RunProperties, RunUse, SkiAreaRef, Source, SourceType, Status,
};

// Coordinate-indexed segment graph
pub mod graph;
pub use graph::{
    Chain, ChainLink, ConsolidationGraph, CoordinateIndex, CoordinateKey, SegmentId,
    COORDINATE_PRECISION,
};

// Orchestration over whole feature collections
pub mod consolidate;
pub use consolidate::{
    consolidate, consolidate_runs_and_lifts, consolidate_with_stats, CandidateOrder,
    ConsolidationConfig, ConsolidationStats,
};

// GeoJSON reading/writing
#[cfg(feature = "io")]
pub mod geojson_io;
#[cfg(feature = "io")]
pub use geojson_io::{read_feature_collection, write_feature_collection};

// ============================================================================
// Core Types
// ============================================================================

/// A run, lift or other pipeline feature: geometry plus typed properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<P> {
    pub geometry: Geometry<f64>,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: impl Into<Geometry<f64>>, properties: P) -> Self {
        Self {
            geometry: geometry.into(),
            properties,
        }
    }

    /// The geometry as a line, if it is one.
    pub fn line(&self) -> Option<&LineString<f64>> {
        match &self.geometry {
            Geometry::LineString(line) => Some(line),
            _ => None,
        }
    }
}
