//! End-to-end consolidation scenarios over whole feature collections.
//!
//! Run with: `cargo test --test consolidation_scenarios`

use geo::{coord, point, Geometry, LineString};
use piste_consolidation::{
    consolidate, consolidate_runs_and_lifts, consolidate_with_stats, CandidateOrder,
    ConsolidationConfig, ConsolidationError, Difficulty, Feature, LiftProperties, LiftType, RunProperties, RunUse,
    Source,
};

fn line(points: &[(f64, f64)]) -> LineString<f64> {
    points
        .iter()
        .map(|&(x, y)| coord! { x: x, y: y })
        .collect::<Vec<_>>()
        .into()
}

fn run(id: &str, points: &[(f64, f64)], oneway: Option<bool>) -> Feature<RunProperties> {
    Feature::new(
        line(points),
        RunProperties {
            uses: vec![RunUse::Downhill],
            name: Some("Sgurgola".to_string()),
            difficulty: Some(Difficulty::Intermediate),
            oneway,
            sources: vec![Source::openstreetmap(format!("way/{}", id))],
            ..RunProperties::new(id)
        },
    )
}

fn coords(feature: &Feature<RunProperties>) -> Vec<(f64, f64)> {
    feature
        .line()
        .expect("expected a line")
        .coords()
        .map(|c| (c.x, c.y))
        .collect()
}

fn default_config() -> ConsolidationConfig {
    ConsolidationConfig::default()
}

// ============================================================================
// Consumption and ordering
// ============================================================================

#[test]
fn test_forward_chain_merges_once() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], Some(true)),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], Some(true)),
    ];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(
        coords(&output[0]),
        vec![(0.0, 0.0), (0.001, 0.0), (0.002, 0.0)]
    );
    assert_eq!(output[0].properties.id, "a");
    assert_eq!(output[0].properties.sources.len(), 2);
}

#[test]
fn test_entry_point_does_not_change_result() {
    // a: p0 -> p1, b: p2 -> p1 (drawn backwards), c: p2 -> p3
    let a = run("a", &[(0.0, 0.0), (0.001, 0.0)], None);
    let b = run("b", &[(0.002, 0.0), (0.001, 0.0)], None);
    let c = run("c", &[(0.002, 0.0), (0.003, 0.0)], None);

    let orders = [
        vec![a.clone(), b.clone(), c.clone()],
        vec![b.clone(), a.clone(), c.clone()],
        vec![c.clone(), b.clone(), a.clone()],
    ];

    for runs in orders {
        let output = consolidate(&runs, &default_config()).unwrap();
        assert_eq!(output.len(), 1, "entry {}", runs[0].properties.id);

        let mut points = coords(&output[0]);
        assert_eq!(points.len(), 4);
        // The chain follows the entry segment's drawing direction
        if points[0] != (0.0, 0.0) {
            points.reverse();
        }
        assert_eq!(
            points,
            vec![(0.0, 0.0), (0.001, 0.0), (0.002, 0.0), (0.003, 0.0)]
        );
    }
}

#[test]
fn test_conflicting_oneway_segments_stay_separate() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], Some(true)),
        run("b", &[(0.002, 0.0), (0.001, 0.0)], Some(true)),
    ];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(output[0], runs[0]);
    assert_eq!(output[1], runs[1]);
}

#[test]
fn test_bidirectional_merge_keeps_entry_direction() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], Some(false)),
        run("b", &[(0.002, 0.0), (0.001, 0.0)], Some(false)),
    ];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(
        coords(&output[0]),
        vec![(0.0, 0.0), (0.001, 0.0), (0.002, 0.0)]
    );
    assert_eq!(output[0].properties.oneway, Some(false));
}

#[test]
fn test_closed_loop_merges_into_ring() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.001, 0.001)], None),
        run("c", &[(0.001, 0.001), (0.0, 0.001)], None),
        run("d", &[(0.0, 0.001), (0.0, 0.0)], None),
    ];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 1);
    let points = coords(&output[0]);
    assert_eq!(points.len(), 5);
    assert_eq!(points.first(), points.last());
}

#[test]
fn test_isolated_segment_passes_through() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(1.0, 1.0), (1.001, 1.0)], None),
    ];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output, runs);
}

#[test]
fn test_consolidation_is_idempotent() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], None),
        run("c", &[(0.001, 0.0), (0.001, 0.001)], None),
        run("d", &[(0.5, 0.5), (0.501, 0.5)], Some(true)),
    ];

    let first = consolidate(&runs, &default_config()).unwrap();
    let (second, stats) = consolidate_with_stats(&first, &default_config()).unwrap();

    assert_eq!(second, first);
    assert_eq!(stats.merged_chains, 0);
}

// ============================================================================
// Mixed collections and property merging
// ============================================================================

#[test]
fn test_non_line_features_pass_through_in_order() {
    let spot = Feature::new(point!(x: 5.0, y: 5.0), RunProperties::new("spot"));
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        spot.clone(),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], None),
    ];

    let (output, stats) = consolidate_with_stats(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 2);
    assert!(matches!(output[0].geometry, Geometry::LineString(_)));
    assert_eq!(output[1], spot);
    assert_eq!(stats.input_features, 3);
    assert_eq!(stats.line_segments, 2);
    assert_eq!(stats.output_features, 2);
    assert_eq!(stats.merged_chains, 1);
}

#[test]
fn test_different_names_are_not_merged() {
    let mut other = run("b", &[(0.001, 0.0), (0.002, 0.0)], None);
    other.properties.name = Some("Another Run".to_string());
    let runs = vec![run("a", &[(0.0, 0.0), (0.001, 0.0)], None), other];

    let output = consolidate(&runs, &default_config()).unwrap();

    assert_eq!(output.len(), 2);
}

#[test]
fn test_duplicate_sources_collapse() {
    let mut a = run("a", &[(0.0, 0.0), (0.001, 0.0)], None);
    a.properties.sources = vec![
        Source::openstreetmap("way/1"),
        Source::openstreetmap("relation/1"),
    ];
    let mut b = run("b", &[(0.001, 0.0), (0.002, 0.0)], None);
    b.properties.sources = vec![
        Source::openstreetmap("way/1"),
        Source::openstreetmap("relation/2"),
    ];

    let output = consolidate(&[a, b], &default_config()).unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(
        output[0].properties.sources,
        vec![
            Source::openstreetmap("way/1"),
            Source::openstreetmap("relation/1"),
            Source::openstreetmap("relation/2"),
        ]
    );
}

#[test]
fn test_candidate_order_by_feature_id() {
    // Two continuations leave the tail of "m"; the lower id wins when sorting.
    let runs = vec![
        run("m", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("z", &[(0.001, 0.0), (0.002, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.001, 0.001)], None),
    ];

    let insertion = consolidate(&runs, &default_config()).unwrap();
    assert_eq!(insertion.len(), 2);
    assert_eq!(coords(&insertion[0]).last(), Some(&(0.002, 0.0)));

    let config = ConsolidationConfig {
        candidate_order: CandidateOrder::FeatureId,
    };
    let by_id = consolidate(&runs, &config).unwrap();
    assert_eq!(by_id.len(), 2);
    assert_eq!(coords(&by_id[0]).last(), Some(&(0.001, 0.001)));
}

#[test]
fn test_runs_and_lifts_use_separate_graphs() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], None),
    ];
    let lift = |id: &str, points: &[(f64, f64)]| {
        Feature::new(
            line(points),
            LiftProperties {
                oneway: Some(true),
                ..LiftProperties::new(id, LiftType::ChairLift)
            },
        )
    };
    // Lifts share the runs' coordinates but never join them
    let lifts = vec![
        lift("l1", &[(0.0, 0.0), (0.001, 0.0)]),
        lift("l2", &[(0.001, 0.0), (0.002, 0.0)]),
        lift("l3", &[(0.003, 0.0), (0.002, 0.0)]),
    ];

    let (runs_out, lifts_out) =
        consolidate_runs_and_lifts(&runs, &lifts, &default_config()).unwrap();

    assert_eq!(runs_out.len(), 1);
    assert_eq!(lifts_out.len(), 2);
    assert_eq!(lifts_out[0].properties.id, "l1");
    assert_eq!(lifts_out[1].properties.id, "l3");
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_single_point_segment_fails_whole_batch() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], None),
        run("stub", &[(0.5, 0.5)], None),
    ];

    let result = consolidate(&runs, &default_config());

    match result {
        Err(ConsolidationError::InsufficientPoints {
            feature_id,
            point_count,
            ..
        }) => {
            assert_eq!(feature_id, "stub");
            assert_eq!(point_count, 1);
        }
        other => panic!("expected InsufficientPoints, got {:?}", other),
    }
}

#[test]
fn test_runs_and_lifts_propagate_lift_error() {
    let runs = vec![
        run("a", &[(0.0, 0.0), (0.001, 0.0)], None),
        run("b", &[(0.001, 0.0), (0.002, 0.0)], None),
    ];
    let lifts = vec![Feature::new(
        line(&[(0.0, 0.0)]),
        LiftProperties::new("l1", LiftType::Gondola),
    )];

    let result = consolidate_runs_and_lifts(&runs, &lifts, &default_config());

    assert!(matches!(
        result,
        Err(ConsolidationError::InsufficientPoints { .. })
    ));
}
