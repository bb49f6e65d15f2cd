//! Quantized coordinate keys and the endpoint index built on them.

use std::collections::HashMap;

use geo::Coord;

use super::SegmentId;

/// Number of decimal digits kept when testing two coordinates for equality.
///
/// Fixed at 7 (~1.1 cm at the equator). Upstream geometry libraries leave
/// floating point noise below this; anything coarser would start joining
/// genuinely distinct OSM nodes.
pub const COORDINATE_PRECISION: i32 = 7;

/// 10^[`COORDINATE_PRECISION`]
const QUANTIZATION_SCALE: f64 = 10_i64.pow(COORDINATE_PRECISION as u32) as f64;

/// A coordinate rounded to [`COORDINATE_PRECISION`] decimal digits.
///
/// Two coordinates are the same point iff their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    x: i64,
    y: i64,
}

impl CoordinateKey {
    pub fn new(coord: Coord<f64>) -> Self {
        Self {
            x: quantize(coord.x),
            y: quantize(coord.y),
        }
    }
}

impl From<Coord<f64>> for CoordinateKey {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord)
    }
}

#[inline]
fn quantize(value: f64) -> i64 {
    (value * QUANTIZATION_SCALE).round() as i64
}

/// Maps a quantized coordinate to the segments anchored there.
///
/// Buckets behave as sets and iterate in insertion order.
#[derive(Debug, Default, Clone)]
pub struct CoordinateIndex {
    buckets: HashMap<CoordinateKey, Vec<SegmentId>>,
}

impl CoordinateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index with room for `capacity` distinct points.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Anchor `segment` at `point`. Inserting the same pair twice is a no-op.
    pub fn add(&mut self, point: Coord<f64>, segment: SegmentId) {
        let bucket = self.buckets.entry(CoordinateKey::new(point)).or_default();
        if !bucket.contains(&segment) {
            bucket.push(segment);
        }
    }

    /// Segments anchored at `point`, in insertion order.
    pub fn get(&self, point: Coord<f64>) -> &[SegmentId] {
        self.buckets
            .get(&CoordinateKey::new(point))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct points in the index.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_scale_matches_precision() {
        assert_eq!(QUANTIZATION_SCALE, 1e7);
        assert_eq!(10f64.powi(COORDINATE_PRECISION), QUANTIZATION_SCALE);
    }

    #[test]
    fn test_keys_absorb_float_noise() {
        let a = coord! { x: 6.123_456_71, y: 45.000_000_01 };
        let b = coord! { x: 6.123_456_74, y: 44.999_999_99 };
        assert_eq!(CoordinateKey::new(a), CoordinateKey::new(b));
    }

    #[test]
    fn test_keys_distinguish_nearby_points() {
        let a = coord! { x: 6.123_456_7, y: 45.0 };
        let b = coord! { x: 6.123_456_8, y: 45.0 };
        assert_ne!(CoordinateKey::new(a), CoordinateKey::new(b));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut index = CoordinateIndex::new();
        let point = coord! { x: 10.0, y: 47.0 };
        index.add(point, 3);
        index.add(point, 3);
        assert_eq!(index.get(point), &[3]);
    }

    #[test]
    fn test_get_preserves_insertion_order() {
        let mut index = CoordinateIndex::new();
        let point = coord! { x: 10.0, y: 47.0 };
        index.add(point, 5);
        index.add(point, 1);
        index.add(point, 3);
        assert_eq!(index.get(point), &[5, 1, 3]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_get_missing_point_is_empty() {
        let index = CoordinateIndex::new();
        assert!(index.get(coord! { x: 0.0, y: 0.0 }).is_empty());
        assert!(index.is_empty());
    }
}
