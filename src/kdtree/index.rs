use std::collections::VecDeque;
use std::fmt;

use geo_traits::CoordTrait;
use tracing::{debug, trace};

use crate::error::{KdIndexError, Result};
use crate::kdtree::metric::EuclideanMetric;
use crate::kdtree::node::{next_axis, Node};
use crate::r#type::IndexableNum;

/// What [`KdTree::add`] does with a point equal to one already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the tree unchanged and return `false`.
    #[default]
    Skip,
    /// Fail with [`KdIndexError::DuplicateKey`].
    Error,
    /// Overwrite the stored value in place.
    Update,
}

/// A mutable k-d tree mapping `D`-dimensional points to values.
///
/// The coordinate type `N`, the arity `D` and the [`Metric`][crate::kdtree::Metric] `M` are fixed
/// by the type. At depth `d` a node splits its subtree on axis `d % D`: points whose coordinate on
/// that axis is less than or equal to the node's go left, the others go right. Two equal points
/// therefore always follow the same path, which is what makes duplicate detection exact.
///
/// ```
/// use kd_index::kdtree::KdTree;
///
/// let mut tree = KdTree::<f64, 2, &str>::new();
/// tree.add([0., 0.], "a").unwrap();
/// tree.add([5., 5.], "b").unwrap();
/// tree.add([1., 1.], "c").unwrap();
///
/// let nearest = tree.nearest_neighbours(&[0., 0.], Some(2));
/// assert_eq!(nearest[0].value, &"a");
/// assert_eq!(nearest[1].value, &"c");
/// assert_eq!(nearest[1].distance_squared, 2.);
/// ```
///
/// The tree is a single-writer, in-memory structure without internal locking.
pub struct KdTree<N: IndexableNum, const D: usize, V, M = EuclideanMetric> {
    pub(crate) root: Option<Box<Node<N, D, V>>>,
    pub(crate) count: usize,
    pub(crate) duplicate_policy: DuplicatePolicy,
    pub(crate) metric: M,
}

impl<N: IndexableNum, const D: usize, V, M: Default> KdTree<N, D, V, M> {
    /// Create an empty tree that skips duplicate points.
    pub fn new() -> Self {
        Self::with_metric(M::default(), DuplicatePolicy::default())
    }

    /// Create an empty tree with the provided duplicate policy.
    pub fn with_duplicate_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self::with_metric(M::default(), duplicate_policy)
    }
}

impl<N: IndexableNum, const D: usize, V, M: Default> Default for KdTree<N, D, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IndexableNum, const D: usize, V, M> KdTree<N, D, V, M> {
    /// Create an empty tree with an explicit metric instance and duplicate policy.
    pub fn with_metric(metric: M, duplicate_policy: DuplicatePolicy) -> Self {
        assert!(D > 0, "A KdTree needs at least one dimension.");
        Self {
            root: None,
            count: 0,
            duplicate_policy,
            metric,
        }
    }

    /// The number of points stored.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the tree stores no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The policy applied when adding a point that is already stored.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// The metric used by distance queries.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The number of levels of the tree; `0` when empty.
    ///
    /// Search recursion goes this deep, so call [`KdTree::balance`] after building a tree from
    /// sorted or otherwise adversarial input.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<N, D, V>, usize)> =
            self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.children.iter().flatten().map(|child| (&**child, depth + 1)));
        }
        height
    }

    /// Add a point to the index.
    ///
    /// Returns `true` if a node was added or, under [`DuplicatePolicy::Update`], an existing value
    /// was replaced. Returns `false` if the point was already stored and the policy is
    /// [`DuplicatePolicy::Skip`].
    pub fn add(&mut self, point: [N; D], value: V) -> Result<bool> {
        let duplicate_policy = self.duplicate_policy;
        let mut slot = &mut self.root;
        let mut axis = 0;

        while let Some(node) = slot {
            if node.point == point {
                return match duplicate_policy {
                    DuplicatePolicy::Skip => Ok(false),
                    DuplicatePolicy::Error => Err(KdIndexError::DuplicateKey),
                    DuplicatePolicy::Update => {
                        node.value = value;
                        Ok(true)
                    }
                };
            }

            let side = node.side_of(&point, axis);
            slot = node.child_mut(side);
            axis = next_axis::<D>(axis);
        }

        *slot = Some(Node::new(point, value));
        self.count += 1;
        Ok(true)
    }

    /// Remove the point equal to `point`, returning its value.
    ///
    /// Every descendant of the removed node is re-inserted from the top of the tree, so the cost
    /// is proportional to the size of that subtree. Repeated removals can leave the tree
    /// unbalanced; see [`KdTree::balance`].
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn remove(&mut self, point: &[N; D]) -> Option<V> {
        let mut slot = &mut self.root;
        let mut axis = 0;

        loop {
            match slot.as_deref() {
                None => return None,
                Some(node) if node.point == *point => break,
                Some(_) => {}
            }
            let Some(node) = slot else {
                return None;
            };
            let side = node.side_of(point, axis);
            slot = node.child_mut(side);
            axis = next_axis::<D>(axis);
        }

        let mut removed = slot.take()?;
        let descendants = detach_breadth_first(&mut removed);
        self.count -= 1 + descendants.len();

        debug!(reinserted = descendants.len(), "removed point");
        for node in descendants {
            self.attach(node);
        }

        Some(removed.value)
    }

    /// The value stored at exactly `point`.
    pub fn get(&self, point: &[N; D]) -> Option<&V> {
        let mut current = self.root.as_deref();
        let mut axis = 0;
        while let Some(node) = current {
            if node.point == *point {
                return Some(&node.value);
            }
            current = node.child(node.side_of(point, axis));
            axis = next_axis::<D>(axis);
        }
        None
    }

    /// A mutable reference to the value stored at exactly `point`.
    pub fn get_mut(&mut self, point: &[N; D]) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        let mut axis = 0;
        while let Some(node) = current {
            if node.point == *point {
                return Some(&mut node.value);
            }
            let side = node.side_of(point, axis);
            current = node.child_mut(side).as_deref_mut();
            axis = next_axis::<D>(axis);
        }
        None
    }

    /// Returns `true` if `point` is stored.
    pub fn contains(&self, point: &[N; D]) -> bool {
        self.get(point).is_some()
    }

    /// The point of the first node holding `value`, searching breadth-first from the root.
    ///
    /// Values are not indexed, so this scans the whole tree in the worst case.
    pub fn find_value(&self, value: &V) -> Option<[N; D]>
    where
        V: PartialEq,
    {
        let mut queue: VecDeque<&Node<N, D, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            if node.value == *value {
                return Some(node.point);
            }
            queue.extend(node.children.iter().flatten().map(|child| &**child));
        }
        None
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        trace!(count = self.count, "clearing tree");
        self.teardown();
    }

    /// Place a detached node by descending from the root. The node's point must not already be
    /// stored.
    pub(crate) fn attach(&mut self, node: Box<Node<N, D, V>>) {
        debug_assert!(node.children.iter().all(Option::is_none));
        let mut slot = &mut self.root;
        let mut axis = 0;
        while let Some(parent) = slot {
            let side = parent.side_of(&node.point, axis);
            slot = parent.child_mut(side);
            axis = next_axis::<D>(axis);
        }
        *slot = Some(node);
        self.count += 1;
    }

    /// Detach every node in pre-order, leaving the tree empty.
    pub(crate) fn drain_pre_order(&mut self) -> Vec<Box<Node<N, D, V>>> {
        let mut nodes = Vec::with_capacity(self.count);
        let mut stack: Vec<Box<Node<N, D, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            let [left, right] = node.take_children();
            stack.extend(right);
            stack.extend(left);
            nodes.push(node);
        }
        self.count = 0;
        nodes
    }

    /// Drop every node without recursing, so deep trees cannot overflow the stack.
    fn teardown(&mut self) {
        let mut stack: Vec<Box<Node<N, D, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.take_children().into_iter().flatten());
        }
        self.count = 0;
    }
}

impl<N: IndexableNum, V, M> KdTree<N, 2, V, M> {
    /// Add a point given as a 2D coordinate.
    pub fn add_coord(&mut self, coord: &impl CoordTrait<T = N>, value: V) -> Result<bool> {
        self.add([coord.x(), coord.y()], value)
    }
}

impl<N: IndexableNum, const D: usize, V, M> Drop for KdTree<N, D, V, M> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<N: IndexableNum, const D: usize, V, M: fmt::Debug> fmt::Debug for KdTree<N, D, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("len", &self.count)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("metric", &self.metric)
            .finish_non_exhaustive()
    }
}

/// Detach all descendants of `node` breadth-first, so they can be re-inserted in roughly the
/// order they were originally added.
fn detach_breadth_first<N: IndexableNum, const D: usize, V>(
    node: &mut Node<N, D, V>,
) -> Vec<Box<Node<N, D, V>>> {
    let mut queue: VecDeque<Box<Node<N, D, V>>> =
        node.take_children().into_iter().flatten().collect();
    let mut nodes = Vec::with_capacity(queue.len());
    while let Some(mut next) = queue.pop_front() {
        queue.extend(next.take_children().into_iter().flatten());
        nodes.push(next);
    }
    nodes
}
