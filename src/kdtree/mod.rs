//! A mutable k-d tree over fixed-arity points, generic over coordinate type and distance metric.

#![warn(missing_docs)]

mod builder;
mod index;
mod metric;
mod neighbors;
mod node;
mod rect;
mod search;
mod traversal;

pub use builder::KdTreeBuilder;
pub use index::{DuplicatePolicy, KdTree};
#[cfg(feature = "use-geo_0_31")]
pub use metric::{GeodesicMetric, HaversineMetric};
pub use metric::{ChebyshevMetric, EuclideanMetric, ManhattanMetric, Metric};
pub use neighbors::NearestNeighbourList;
pub use rect::HyperRect;
pub use search::Neighbour;
pub use traversal::Iter;
