//! Distance metrics for nearest-neighbour and radius queries.
//!
//! Every metric reports a *squared* distance. Squared values preserve the ordering of the true
//! distances, so the search never has to take a square root, and a radius query compares against
//! `radius * radius`.

use crate::kdtree::rect::HyperRect;
use crate::r#type::{abs_diff, IndexableNum};

/// A strategy computing the squared distance between two points of arity `D`.
///
/// The search skips a subtree when [`Metric::distance_squared_to_rect`] of its bounding box
/// already exceeds the current bound, so that method must never overestimate.
pub trait Metric<N: IndexableNum, const D: usize> {
    /// The squared distance between `a` and `b`.
    fn distance_squared(&self, a: &[N; D], b: &[N; D]) -> N;

    /// A lower bound on the squared distance from `target` to any point inside `rect`.
    ///
    /// Defaults to the distance to the closest point of `rect`, which is exact for metrics that
    /// grow with each per-axis difference.
    #[inline]
    fn distance_squared_to_rect(&self, target: &[N; D], rect: &HyperRect<N, D>) -> N {
        self.distance_squared(target, &rect.closest_point(target))
    }
}

/// Euclidean distance metric.
///
/// The sum of squared per-axis differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanMetric;

impl<N: IndexableNum, const D: usize> Metric<N, D> for EuclideanMetric {
    #[inline]
    fn distance_squared(&self, a: &[N; D], b: &[N; D]) -> N {
        a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| {
            let d = x - y;
            acc + d * d
        })
    }
}

/// Manhattan (taxicab) distance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanMetric;

impl<N: IndexableNum, const D: usize> Metric<N, D> for ManhattanMetric {
    #[inline]
    fn distance_squared(&self, a: &[N; D], b: &[N; D]) -> N {
        let d = a
            .iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| acc + abs_diff(x, y));
        d * d
    }
}

/// Chebyshev (chessboard) distance metric: the largest per-axis difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevMetric;

impl<N: IndexableNum, const D: usize> Metric<N, D> for ChebyshevMetric {
    #[inline]
    fn distance_squared(&self, a: &[N; D], b: &[N; D]) -> N {
        let d = a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| {
            let d = abs_diff(x, y);
            if d > acc {
                d
            } else {
                acc
            }
        });
        d * d
    }
}

#[cfg(feature = "use-geo_0_31")]
mod geographic {
    use geo_0_31::algorithm::{Distance, Geodesic, Haversine};
    use geo_0_31::Point;
    use num_traits::{Float, NumCast};

    use super::Metric;
    use crate::kdtree::rect::HyperRect;
    use crate::r#type::IndexableNum;

    #[inline]
    fn to_point<N: IndexableNum + Float>(coord: &[N; 2]) -> Point<f64> {
        Point::new(
            coord[0].to_f64().unwrap_or(0.0),
            coord[1].to_f64().unwrap_or(0.0),
        )
    }

    #[inline]
    fn squared<N: IndexableNum + Float>(meters: f64) -> N {
        <N as NumCast>::from(meters * meters).unwrap_or_else(N::pos_infinity)
    }

    /// The point of `rect` on the meridian of `target`, at the latitude in `rect` closest to it.
    ///
    /// The shortest path from `target` to a parallel runs along its meridian, so the distance to
    /// this point bounds the distance to anything in `rect` from below, whatever the longitude.
    #[inline]
    fn meridian_point<N: IndexableNum>(target: &[N; 2], rect: &HyperRect<N, 2>) -> [N; 2] {
        let lat = rect.closest_point(target)[1];
        [target[0], lat]
    }

    /// Haversine distance metric.
    ///
    /// The great-circle distance between two points on a sphere. Coordinates are
    /// `[longitude, latitude]` in degrees and the distance is in meters (squared), so only
    /// floating point coordinates are supported:
    ///
    /// ```compile_fail
    /// use kd_index::kdtree::{HaversineMetric, KdTree};
    ///
    /// let mut tree = KdTree::<i32, 2, (), HaversineMetric>::new();
    /// tree.add([0, 0], ()).unwrap();
    /// tree.nearest_neighbours(&[1, 1], None);
    /// ```
    ///
    /// Subtrees are pruned on latitude only. Bounding boxes in degree space say nothing reliable
    /// about longitude near the poles or across the antimeridian, so results stay exact there at
    /// the cost of visiting more nodes.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct HaversineMetric;

    impl<N: IndexableNum + Float> Metric<N, 2> for HaversineMetric {
        fn distance_squared(&self, a: &[N; 2], b: &[N; 2]) -> N {
            squared(Haversine.distance(to_point(a), to_point(b)))
        }

        fn distance_squared_to_rect(&self, target: &[N; 2], rect: &HyperRect<N, 2>) -> N {
            self.distance_squared(target, &meridian_point(target, rect))
        }
    }

    /// Geodesic distance metric on the WGS84 ellipsoid (Karney's algorithm).
    ///
    /// Same coordinate conventions and pruning as [`HaversineMetric`], but more precise and
    /// slower.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct GeodesicMetric;

    impl<N: IndexableNum + Float> Metric<N, 2> for GeodesicMetric {
        fn distance_squared(&self, a: &[N; 2], b: &[N; 2]) -> N {
            squared(Geodesic.distance(to_point(a), to_point(b)))
        }

        fn distance_squared_to_rect(&self, target: &[N; 2], rect: &HyperRect<N, 2>) -> N {
            self.distance_squared(target, &meridian_point(target, rect))
        }
    }
}

#[cfg(feature = "use-geo_0_31")]
pub use geographic::{GeodesicMetric, HaversineMetric};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_metric() {
        let d: f64 = EuclideanMetric.distance_squared(&[0., 0.], &[3., 4.]);
        assert_eq!(d, 25.);
        let d: i32 = EuclideanMetric.distance_squared(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(d, 0);
    }

    #[test]
    fn test_manhattan_metric() {
        let d: i32 = ManhattanMetric.distance_squared(&[0, 0], &[-3, 4]);
        assert_eq!(d, 49);
    }

    #[test]
    fn test_chebyshev_metric() {
        let d: f32 = ChebyshevMetric.distance_squared(&[1., -1., 0.], &[2., 3., 0.5]);
        assert_eq!(d, 16.);
    }

    #[test]
    fn test_one_dimension() {
        let d: i64 = EuclideanMetric.distance_squared(&[-5], &[5]);
        assert_eq!(d, 100);
        let d: i64 = ChebyshevMetric.distance_squared(&[-5], &[5]);
        assert_eq!(d, 100);
    }

    #[cfg(feature = "use-geo_0_31")]
    #[test]
    fn test_geographic_metrics() {
        // London to Paris, roughly 344 km
        let london = [-0.1278, 51.5074];
        let paris = [2.3522, 48.8566];

        let haversine: f64 = HaversineMetric.distance_squared(&london, &paris);
        let geodesic: f64 = GeodesicMetric.distance_squared(&london, &paris);
        assert!((haversine.sqrt() - 343_000.).abs() < 5_000.);
        assert!((geodesic.sqrt() - 343_900.).abs() < 5_000.);

        let haversine: f32 =
            HaversineMetric.distance_squared(&[-0.1278f32, 51.5074], &[2.3522, 48.8566]);
        assert!((haversine.sqrt() - 343_000.).abs() < 5_000.);
    }

    #[cfg(feature = "use-geo_0_31")]
    #[test]
    fn test_geographic_rect_bound_ignores_longitude() {
        // A box on the other side of the pole, far away in longitude
        let rect = HyperRect::new([170., 80.], [180., 85.]);
        let target = [0., 88.];
        let bound: f64 = HaversineMetric.distance_squared_to_rect(&target, &rect);
        let across_pole: f64 = HaversineMetric.distance_squared(&target, &[180., 85.]);
        assert!(bound <= across_pole);
    }

    #[test]
    fn test_rect_bound_is_distance_to_closest_point() {
        let rect = HyperRect::new([2, 2], [4, 4]);
        let d: i32 = EuclideanMetric.distance_squared_to_rect(&[0, 3], &rect);
        assert_eq!(d, 4);
        let d: i32 = ManhattanMetric.distance_squared_to_rect(&[0, 0], &rect);
        assert_eq!(d, 16);
    }
}
