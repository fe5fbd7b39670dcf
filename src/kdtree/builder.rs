use tinyvec::TinyVec;
use tracing::debug;

use crate::error::Result;
use crate::kdtree::metric::EuclideanMetric;
use crate::kdtree::node::{next_axis, Node};
use crate::kdtree::{DuplicatePolicy, KdTree};
use crate::r#type::IndexableNum;

/// A builder to bulk-load a depth-balanced [`KdTree`].
///
/// ```
/// use kd_index::kdtree::{DuplicatePolicy, KdTreeBuilder, ManhattanMetric};
///
/// let mut builder = KdTreeBuilder::<i32, 2, char, ManhattanMetric>::new()
///     .duplicate_policy(DuplicatePolicy::Error);
/// for (i, c) in "abcdefg".chars().enumerate() {
///     builder.add([i as i32, (i * 3 % 7) as i32], c);
/// }
/// let tree = builder.finish().unwrap();
/// assert_eq!(tree.len(), 7);
/// assert_eq!(tree.height(), 3);
/// ```
pub struct KdTreeBuilder<N: IndexableNum, const D: usize, V, M = EuclideanMetric> {
    items: Vec<([N; D], V)>,
    duplicate_policy: DuplicatePolicy,
    metric: M,
}

impl<N: IndexableNum, const D: usize, V, M: Default> KdTreeBuilder<N, D, V, M> {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new builder with room for `num_items` points.
    pub fn with_capacity(num_items: usize) -> Self {
        Self {
            items: Vec::with_capacity(num_items),
            duplicate_policy: DuplicatePolicy::default(),
            metric: M::default(),
        }
    }
}

impl<N: IndexableNum, const D: usize, V, M: Default> Default for KdTreeBuilder<N, D, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IndexableNum, const D: usize, V, M> KdTreeBuilder<N, D, V, M> {
    /// Set the duplicate policy of the finished tree. It also governs repeated points added to
    /// this builder.
    pub fn duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    /// Use a specific metric instance in the finished tree.
    pub fn metric<M2>(self, metric: M2) -> KdTreeBuilder<N, D, V, M2> {
        KdTreeBuilder {
            items: self.items,
            duplicate_policy: self.duplicate_policy,
            metric,
        }
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: [N; D], value: V) -> usize {
        self.items.push((point, value));
        self.items.len() - 1
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no point was added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume this builder, inserting the points median-first so that the tree is balanced.
    ///
    /// Repeated points are resolved with the configured [`DuplicatePolicy`]; under
    /// [`DuplicatePolicy::Error`] the first repeat aborts the build.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn finish(mut self) -> Result<KdTree<N, D, V, M>> {
        debug!(num_items = self.items.len(), "building tree");
        let order = balanced_order(&mut self.items, |(point, _)| point);

        let mut slots: Vec<Option<([N; D], V)>> = self.items.into_iter().map(Some).collect();
        let mut tree = KdTree::with_metric(self.metric, self.duplicate_policy);
        for index in order {
            if let Some((point, value)) = slots[index].take() {
                tree.add(point, value)?;
            }
        }

        debug!(len = tree.len(), height = tree.height(), "built tree");
        Ok(tree)
    }
}

impl<N: IndexableNum, const D: usize, V, M> KdTree<N, D, V, M> {
    /// Rebuild the tree so that it is balanced in depth.
    ///
    /// Every node is detached and re-inserted median-first, splitting on the same cycling axes as
    /// regular insertion. The set of stored points and values does not change.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn balance(&mut self) {
        let mut nodes = self.drain_pre_order();
        debug!(len = nodes.len(), "rebuilding tree");
        let order = balanced_order(&mut nodes, |node| &node.point);

        let mut slots: Vec<Option<Box<Node<N, D, V>>>> = nodes.into_iter().map(Some).collect();
        for index in order {
            if let Some(node) = slots[index].take() {
                self.attach(node);
            }
        }

        debug!(height = self.height(), "balanced tree");
    }
}

/// Order `items` so that inserting them one by one yields a depth-balanced tree.
///
/// `items` is partitioned in place: each sub-range is split around its median on the current axis,
/// then both halves are processed on the next axis. Returns the positions in `items` in insertion
/// order: each median before its lower half, which comes before its upper half.
pub(crate) fn balanced_order<T, N: IndexableNum, const D: usize>(
    items: &mut [T],
    point: impl Fn(&T) -> &[N; D],
) -> Vec<usize> {
    let mut order = Vec::with_capacity(items.len());
    if items.is_empty() {
        return order;
    }

    // Use TinyVec to avoid heap allocations
    let mut stack: TinyVec<[usize; 33]> = TinyVec::new();
    stack.push(0);
    stack.push(items.len() - 1);
    stack.push(0);

    while let Some(axis) = stack.pop() {
        let right = stack.pop().unwrap_or(0);
        let left = stack.pop().unwrap_or(0);

        if left == right {
            order.push(left);
            continue;
        }

        // lower median for even-sized ranges
        let m = left + (right - left) / 2;
        items[left..=right]
            .select_nth_unstable_by(m - left, |a, b| point(a)[axis].axis_cmp(&point(b)[axis]));
        order.push(m);

        let next = next_axis::<D>(axis);

        // Note: pushed in backwards order so the lower half is popped first
        if m < right {
            stack.push(m + 1);
            stack.push(right);
            stack.push(next);
        }
        if left < m {
            stack.push(left);
            stack.push(m - 1);
            stack.push(next);
        }
    }

    order
}
