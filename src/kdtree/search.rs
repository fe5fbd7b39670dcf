use geo_traits::CoordTrait;

use crate::error::{KdIndexError, Result};
use crate::kdtree::metric::Metric;
use crate::kdtree::neighbors::NearestNeighbourList;
use crate::kdtree::node::{next_axis, Node, Side};
use crate::kdtree::rect::HyperRect;
use crate::kdtree::KdTree;
use crate::r#type::IndexableNum;

/// A point returned from a distance query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour<'a, N: IndexableNum, const D: usize, V> {
    /// The stored point
    pub point: [N; D],
    /// The value stored with `point`
    pub value: &'a V,
    /// Squared distance from the query under the tree's metric
    pub distance_squared: N,
}

impl<N: IndexableNum, const D: usize, V, M: Metric<N, D>> KdTree<N, D, V, M> {
    /// Search for the points closest to `point`.
    ///
    /// Returns at most `max_results` neighbours (all of them when `None`), closest first.
    pub fn nearest_neighbours(
        &self,
        point: &[N; D],
        max_results: Option<usize>,
    ) -> Vec<Neighbour<'_, N, D, V>> {
        let capacity = max_results.map(|max_results| max_results.min(self.len()));
        if capacity == Some(0) || self.is_empty() {
            return vec![];
        }

        let mut results = NearestNeighbourList::new(capacity);
        self.nearest_neighbours_into(point, &mut results);
        results.into_sorted_vec()
    }

    /// Search for the points closest to `point`, offering every candidate to `results`.
    ///
    /// The capacity of `results` bounds how many neighbours are kept.
    pub fn nearest_neighbours_into<'a>(
        &'a self,
        point: &[N; D],
        results: &mut NearestNeighbourList<Neighbour<'a, N, D, V>, N>,
    ) {
        self.search(point, N::pos_infinity(), results);
    }

    /// Search for the points within `radius` of `center`, bounds included.
    ///
    /// Returns at most `max_results` neighbours (all of them when `None`), closest first. When
    /// more points than that lie inside the radius, the closest ones are kept.
    pub fn radial_search(
        &self,
        center: &[N; D],
        radius: N,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbour<'_, N, D, V>>> {
        let mut results = NearestNeighbourList::new(max_results);
        self.radial_search_into(center, radius, &mut results)?;
        Ok(results.into_sorted_vec())
    }

    /// Search for the points within `radius` of `center`, offering every candidate to `results`.
    pub fn radial_search_into<'a>(
        &'a self,
        center: &[N; D],
        radius: N,
        results: &mut NearestNeighbourList<Neighbour<'a, N, D, V>, N>,
    ) -> Result<()> {
        // Written so that NaN is rejected too
        if !(radius >= N::zero()) {
            return Err(KdIndexError::InvalidArgument(format!(
                "Radius must be non-negative, got {:?}.",
                radius
            )));
        }

        self.search(center, radius.saturating_square(), results);
        Ok(())
    }

    fn search<'a>(
        &'a self,
        target: &[N; D],
        max_distance_squared: N,
        results: &mut NearestNeighbourList<Neighbour<'a, N, D, V>, N>,
    ) {
        if let Some(root) = self.root.as_deref() {
            let mut search = NeighbourSearch {
                target,
                metric: &self.metric,
                max_distance_squared,
                results,
            };
            search.visit(root, HyperRect::infinite(), 0);
        }
    }
}

impl<N: IndexableNum, V, M: Metric<N, 2>> KdTree<N, 2, V, M> {
    /// Search for the points closest to a 2D coordinate.
    pub fn nearest_neighbours_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        max_results: Option<usize>,
    ) -> Vec<Neighbour<'_, N, 2, V>> {
        self.nearest_neighbours(&[coord.x(), coord.y()], max_results)
    }

    /// Search for the points within `radius` of a 2D coordinate.
    pub fn radial_search_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        radius: N,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbour<'_, N, 2, V>>> {
        self.radial_search(&[coord.x(), coord.y()], radius, max_results)
    }
}

/// State shared by every level of one branch-and-bound traversal.
struct NeighbourSearch<'a, 'q, N: IndexableNum, const D: usize, V, M> {
    target: &'q [N; D],
    metric: &'a M,
    max_distance_squared: N,
    results: &'q mut NearestNeighbourList<Neighbour<'a, N, D, V>, N>,
}

impl<'a, N: IndexableNum, const D: usize, V, M: Metric<N, D>> NeighbourSearch<'a, '_, N, D, V, M> {
    /// Visit the subtree rooted at `node`, whose points all lie inside `rect`.
    ///
    /// The half of the subtree containing the target is searched first. The other half is
    /// searched only if its region could hold a point within the radius that would also beat the
    /// worst result kept so far. The node's own point is offered last.
    fn visit(&mut self, node: &'a Node<N, D, V>, rect: HyperRect<N, D>, axis: usize) {
        let split = node.point[axis];
        let (left_rect, right_rect) = rect.split(axis, split);

        let (near, near_rect, far, far_rect) = match Side::of(self.target[axis], split) {
            Side::Left => (node.left(), left_rect, node.right(), right_rect),
            Side::Right => (node.right(), right_rect, node.left(), left_rect),
        };
        let next = next_axis::<D>(axis);

        if let Some(near) = near {
            self.visit(near, near_rect, next);
        }

        if let Some(far) = far {
            let distance = self.metric.distance_squared_to_rect(self.target, &far_rect);
            if distance <= self.max_distance_squared
                && (!self.results.is_full() || distance < self.results.furthest_distance())
            {
                self.visit(far, far_rect, next);
            }
        }

        let distance = self.metric.distance_squared(&node.point, self.target);
        if distance <= self.max_distance_squared {
            self.results.add(
                Neighbour {
                    point: node.point,
                    value: &node.value,
                    distance_squared: distance,
                },
                distance,
            );
        }
    }
}
