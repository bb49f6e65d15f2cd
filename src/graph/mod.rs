//! # Segment Consolidation Graph
//!
//! Stitches line segments that represent one logical run or lift back into a
//! single continuous feature.
//!
//! ## Algorithm
//! 1. Every segment is registered under its head (outbound index) and its
//!    tail (inbound index), keyed by [`CoordinateKey`].
//! 2. A merge starts at one segment and walks backward from its incoming
//!    endpoint and then forward from its outgoing endpoint.
//! 3. At each endpoint the natural continuation (a segment ending where we
//!    start, or starting where we end) is preferred. Failing that, a segment
//!    drawn the other way is taken reversed, unless it is `oneway = true`.
//! 4. Only segments passing [`Consolidate::is_same_logical_feature`] are
//!    followed, and only the first unconsumed match at a point is taken.
//! 5. The chain's geometries are spliced and its properties merged.
//!
//! Segments are marked consumed before the walk moves past them, so closed
//! loops terminate when they reach their own start and every segment ends up
//! in at most one chain.

mod coordinate_index;

use geo::{Coord, Geometry, LineString};
use log::debug;

use crate::error::{ConsolidationError, Result};
use crate::properties::Consolidate;
use crate::Feature;

pub use coordinate_index::{CoordinateIndex, CoordinateKey, COORDINATE_PRECISION};

/// Index of a registered segment within its graph.
pub type SegmentId = usize;

/// One step of a chain: a segment and whether it is traversed tail to head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub segment: SegmentId,
    pub reversed: bool,
}

impl ChainLink {
    fn forward(segment: SegmentId) -> Self {
        Self {
            segment,
            reversed: false,
        }
    }

    fn reversed(segment: SegmentId) -> Self {
        Self {
            segment,
            reversed: true,
        }
    }
}

/// Ordered path through the graph describing one logical feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    links: Vec<ChainLink>,
}

impl Chain {
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Segment ids in traversal order.
    pub fn segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.links.iter().map(|link| link.segment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

struct Segment<'a, P> {
    line: &'a LineString<f64>,
    properties: &'a P,
}

impl<P> Segment<'_, P> {
    fn head(&self) -> Coord<f64> {
        self.line.0[0]
    }

    fn tail(&self) -> Coord<f64> {
        self.line.0[self.line.0.len() - 1]
    }
}

/// Adjacency structure for one consolidation pass.
///
/// Borrows the segments of a single feature collection. A graph must not be
/// reused for a second collection: its consumed set only makes sense for the
/// segments it was built from.
pub struct ConsolidationGraph<'a, P> {
    segments: Vec<Segment<'a, P>>,
    outbound: CoordinateIndex,
    inbound: CoordinateIndex,
    consumed: Vec<bool>,
    consumed_count: usize,
}

impl<P: Consolidate> Default for ConsolidationGraph<'_, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P: Consolidate> ConsolidationGraph<'a, P> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a graph with room for `capacity` segments.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
            outbound: CoordinateIndex::with_capacity(capacity),
            inbound: CoordinateIndex::with_capacity(capacity),
            consumed: Vec::with_capacity(capacity),
            consumed_count: 0,
        }
    }

    /// Register a segment under its head and tail.
    ///
    /// All segments must be registered before the first [`merge`](Self::merge).
    pub fn register(&mut self, line: &'a LineString<f64>, properties: &'a P) -> Result<SegmentId> {
        if line.0.len() < 2 {
            return Err(ConsolidationError::InsufficientPoints {
                feature_id: properties.feature_id().to_string(),
                point_count: line.0.len(),
                minimum_required: 2,
            });
        }

        let id = self.segments.len();
        let segment = Segment { line, properties };
        self.outbound.add(segment.head(), id);
        self.inbound.add(segment.tail(), id);
        self.segments.push(segment);
        self.consumed.push(false);
        Ok(id)
    }

    /// Number of registered segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `id` has already been placed in a chain.
    pub fn is_consumed(&self, id: SegmentId) -> bool {
        self.consumed.get(id).copied().unwrap_or(false)
    }

    /// Number of segments placed in a chain so far.
    pub fn consumed_count(&self) -> usize {
        self.consumed_count
    }

    /// Merge the maximal chain containing `id` into one feature.
    ///
    /// Returns `Ok(None)` if `id` was already consumed by an earlier merge
    /// (or was never registered).
    pub fn merge(&mut self, id: SegmentId) -> Result<Option<Feature<P>>> {
        let Some(chain) = self.expand(id) else {
            return Ok(None);
        };
        if chain.is_empty() {
            return Ok(None);
        }

        let geometry = self.stitch(&chain)?;
        let parts: Vec<&P> = chain
            .segments()
            .map(|segment| self.segments[segment].properties)
            .collect();
        let properties = P::merge(&parts)?;

        if chain.len() > 1 {
            debug!(
                "[Consolidation] Merged {} segments into '{}' ({} points)",
                chain.len(),
                properties.feature_id(),
                geometry.0.len()
            );
        }

        Ok(Some(Feature {
            geometry: Geometry::LineString(geometry),
            properties,
        }))
    }

    /// Find and consume the maximal chain containing `id`.
    ///
    /// The chain is ordered backward continuation, then `id` itself (never
    /// reversed), then forward continuation. Returns `None` if `id` is
    /// already consumed.
    pub fn expand(&mut self, id: SegmentId) -> Option<Chain> {
        if id >= self.segments.len() || self.consumed[id] {
            return None;
        }
        self.mark_consumed(id);

        let start = ChainLink::forward(id);
        let mut links = self.walk(start, Direction::Backward);
        links.reverse();
        links.push(start);
        links.extend(self.walk(start, Direction::Forward));

        Some(Chain { links })
    }

    /// Follow continuations from `start` in one direction until none is left,
    /// consuming each segment as it is reached.
    fn walk(&mut self, start: ChainLink, direction: Direction) -> Vec<ChainLink> {
        let mut links = Vec::new();
        let mut current = start;
        while let Some(next) = self.find_continuation(current, direction) {
            self.mark_consumed(next.segment);
            links.push(next);
            current = next;
        }
        links
    }

    fn mark_consumed(&mut self, id: SegmentId) {
        if !self.consumed[id] {
            self.consumed[id] = true;
            self.consumed_count += 1;
        }
    }

    fn find_continuation(&self, current: ChainLink, direction: Direction) -> Option<ChainLink> {
        let segment = &self.segments[current.segment];

        // Walking backward we leave through the segment's traversal start,
        // forward through its traversal end.
        let at_head = (direction == Direction::Backward) != current.reversed;
        let point = if at_head {
            segment.head()
        } else {
            segment.tail()
        };

        let (natural, opposed) = match direction {
            Direction::Backward => (&self.inbound, &self.outbound),
            Direction::Forward => (&self.outbound, &self.inbound),
        };

        if let Some(candidate) = self.first_match(natural.get(point), segment.properties, false) {
            return Some(ChainLink::forward(candidate));
        }
        self.first_match(opposed.get(point), segment.properties, true)
            .map(ChainLink::reversed)
    }

    fn first_match(
        &self,
        candidates: &[SegmentId],
        properties: &P,
        reversing: bool,
    ) -> Option<SegmentId> {
        candidates.iter().copied().find(|&candidate| {
            let other = self.segments[candidate].properties;
            !self.consumed[candidate]
                && properties.is_same_logical_feature(other)
                && !(reversing && other.oneway() == Some(true))
        })
    }

    /// Concatenate the chain's coordinates, dropping each shared splice point.
    fn stitch(&self, chain: &Chain) -> Result<LineString<f64>> {
        let capacity = chain
            .segments()
            .map(|segment| self.segments[segment].line.0.len())
            .sum::<usize>();
        let mut coords: Vec<Coord<f64>> = Vec::with_capacity(capacity);

        let mut previous: Option<SegmentId> = None;
        for link in chain.links() {
            let points = &self.segments[link.segment].line.0;
            if link.reversed {
                self.splice(&mut coords, points.iter().rev(), previous, link.segment)?;
            } else {
                self.splice(&mut coords, points.iter(), previous, link.segment)?;
            }
            previous = Some(link.segment);
        }

        Ok(LineString::new(coords))
    }

    fn splice<'c, I>(
        &self,
        coords: &mut Vec<Coord<f64>>,
        mut points: I,
        previous: Option<SegmentId>,
        next: SegmentId,
    ) -> Result<()>
    where
        I: Iterator<Item = &'c Coord<f64>>,
    {
        let Some(&first) = points.next() else {
            return Ok(());
        };

        match (coords.last(), previous) {
            (Some(&last), Some(previous)) => {
                if CoordinateKey::new(last) != CoordinateKey::new(first) {
                    return Err(ConsolidationError::GeometryMismatch {
                        previous: self.segments[previous].properties.feature_id().to_string(),
                        next: self.segments[next].properties.feature_id().to_string(),
                        expected: (last.x, last.y),
                        found: (first.x, first.y),
                    });
                }
            }
            _ => coords.push(first),
        }

        coords.extend(points.copied());
        Ok(())
    }
}
