//! Consolidation orchestrator.
//!
//! Builds a fresh [`ConsolidationGraph`] per feature collection, offers every
//! line segment to it in collection order and assembles the output.

use geo::Geometry;
use log::info;
use serde::{Deserialize, Serialize};

use crate::graph::{ConsolidationGraph, SegmentId};
use crate::properties::{Consolidate, LiftProperties, RunProperties};
use crate::{Feature, Result};

/// Order in which segments sharing an endpoint are offered as continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrder {
    /// Collection order of the input features.
    #[default]
    Insertion,
    /// Ascending feature id, independent of input order.
    FeatureId,
}

/// Configuration for a consolidation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Which candidate wins when several segments at one point continue the
    /// same feature. Default: `Insertion`
    pub candidate_order: CandidateOrder,
}

/// Counters for one consolidation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationStats {
    /// Features in the input collection
    pub input_features: usize,
    /// Input features with LineString geometry
    pub line_segments: usize,
    /// Features in the output collection
    pub output_features: usize,
    /// Output features built from more than one segment
    pub merged_chains: usize,
}

/// Consolidate one feature collection.
///
/// Non-line features pass through unchanged. Each chain of line segments is
/// emitted once, at the position of the first of its members in the input.
pub fn consolidate<P>(
    features: &[Feature<P>],
    config: &ConsolidationConfig,
) -> Result<Vec<Feature<P>>>
where
    P: Consolidate + Clone,
{
    consolidate_with_stats(features, config).map(|(output, _)| output)
}

/// Like [`consolidate`], also returning pass statistics.
pub fn consolidate_with_stats<P>(
    features: &[Feature<P>],
    config: &ConsolidationConfig,
) -> Result<(Vec<Feature<P>>, ConsolidationStats)>
where
    P: Consolidate + Clone,
{
    // (feature index, line) for every LineString feature
    let lines: Vec<(usize, &geo::LineString<f64>)> = features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| match &feature.geometry {
            Geometry::LineString(line) => Some((idx, line)),
            _ => None,
        })
        .collect();

    let mut registration: Vec<usize> = (0..lines.len()).collect();
    if config.candidate_order == CandidateOrder::FeatureId {
        registration.sort_by(|&a, &b| {
            let id_a = features[lines[a].0].properties.feature_id();
            let id_b = features[lines[b].0].properties.feature_id();
            id_a.cmp(id_b)
        });
    }

    let mut graph = ConsolidationGraph::with_capacity(lines.len());
    let mut segment_ids: Vec<SegmentId> = vec![0; lines.len()];
    for line_idx in registration {
        let (feature_idx, line) = lines[line_idx];
        segment_ids[line_idx] = graph.register(line, &features[feature_idx].properties)?;
    }

    let mut stats = ConsolidationStats {
        input_features: features.len(),
        line_segments: lines.len(),
        ..Default::default()
    };

    let mut output = Vec::with_capacity(features.len());
    let mut next_line = 0;
    for (idx, feature) in features.iter().enumerate() {
        let is_line = lines.get(next_line).is_some_and(|(line_idx, _)| *line_idx == idx);
        if !is_line {
            output.push(feature.clone());
            continue;
        }

        let segment = segment_ids[next_line];
        next_line += 1;
        let consumed_before = graph.consumed_count();
        if let Some(merged) = graph.merge(segment)? {
            if graph.consumed_count() - consumed_before > 1 {
                stats.merged_chains += 1;
            }
            output.push(merged);
        }
    }
    stats.output_features = output.len();

    info!(
        "[Consolidation] {} features ({} line segments) -> {} features ({} merged chains)",
        stats.input_features, stats.line_segments, stats.output_features, stats.merged_chains
    );

    Ok((output, stats))
}

/// Consolidate runs and lifts, each on its own graph.
///
/// With the `parallel` feature the two collections are processed concurrently.
pub fn consolidate_runs_and_lifts(
    runs: &[Feature<RunProperties>],
    lifts: &[Feature<LiftProperties>],
    config: &ConsolidationConfig,
) -> Result<(Vec<Feature<RunProperties>>, Vec<Feature<LiftProperties>>)> {
    #[cfg(feature = "parallel")]
    let (runs, lifts) = rayon::join(|| consolidate(runs, config), || consolidate(lifts, config));

    #[cfg(not(feature = "parallel"))]
    let (runs, lifts) = (consolidate(runs, config), consolidate(lifts, config));

    Ok((runs?, lifts?))
}
