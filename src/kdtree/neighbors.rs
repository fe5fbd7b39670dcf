//! A bounded collection of the best candidates seen during a search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::r#type::IndexableNum;

/// Collects up to `capacity` items keyed by squared distance, keeping the closest ones.
///
/// Internally this is a max-heap on distance so the current worst candidate can be inspected and
/// evicted in `O(log n)`. Ties are broken by arrival order, which makes the final ordering
/// deterministic for a given traversal.
///
/// ```
/// use kd_index::kdtree::NearestNeighbourList;
///
/// let mut list = NearestNeighbourList::new(Some(2));
/// list.add("far", 9.);
/// list.add("near", 1.);
/// list.add("middle", 4.);
/// assert!(list.is_full());
/// assert_eq!(list.furthest_distance(), 4.);
/// assert_eq!(list.into_sorted_vec(), vec!["near", "middle"]);
/// ```
#[derive(Debug, Clone)]
pub struct NearestNeighbourList<T, N: IndexableNum> {
    heap: BinaryHeap<Candidate<T, N>>,
    capacity: Option<usize>,
    /// Arrival counter used to order equal distances
    seq: usize,
}

impl<T, N: IndexableNum> NearestNeighbourList<T, N> {
    /// Create a list keeping at most `capacity` items, or every item when `None`.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.unwrap_or(0).min(1024)),
            capacity,
            seq: 0,
        }
    }

    /// The maximum number of items kept, or `None` when unlimited.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// The number of items currently kept.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` once `capacity` items are kept. An unlimited list is never full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.heap.len() >= capacity)
    }

    /// The distance of the worst kept item if the list is full, otherwise the coordinate type's
    /// positive infinity.
    ///
    /// A search only needs to visit regions closer than this.
    #[inline]
    pub fn furthest_distance(&self) -> N {
        match self.heap.peek() {
            Some(worst) if self.is_full() => worst.distance,
            _ => N::pos_infinity(),
        }
    }

    /// Offer an item. Returns `true` if it was kept.
    ///
    /// When the list is full, the item is kept only if it is strictly closer than the current
    /// worst, which is then evicted.
    pub fn add(&mut self, item: T, distance: N) -> bool {
        if self.is_full() {
            match self.heap.peek() {
                Some(worst) if distance < worst.distance => {
                    self.heap.pop();
                }
                _ => return false,
            }
        }

        self.heap.push(Candidate {
            distance,
            seq: self.seq,
            item,
        });
        self.seq += 1;
        true
    }

    /// Consume the list, returning the kept items in ascending order of distance.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.item)
            .collect()
    }
}

/// A kept item and its distance.
#[derive(Debug, Clone)]
struct Candidate<T, N: IndexableNum> {
    distance: N,
    seq: usize,
    item: T,
}

impl<T, N: IndexableNum> PartialEq for Candidate<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, N: IndexableNum> Eq for Candidate<T, N> {}

impl<T, N: IndexableNum> Ord for Candidate<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .axis_cmp(&other.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T, N: IndexableNum> PartialOrd for Candidate<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_the_closest() {
        let mut list = NearestNeighbourList::new(Some(3));
        for (item, distance) in [(0, 50), (1, 10), (2, 40), (3, 30), (4, 20), (5, 60)] {
            list.add(item, distance);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.furthest_distance(), 30);
        assert_eq!(list.into_sorted_vec(), vec![1, 4, 3]);
    }

    #[test]
    fn rejects_ties_with_the_worst_when_full() {
        let mut list = NearestNeighbourList::new(Some(1));
        assert!(list.add("a", 5));
        assert!(!list.add("b", 5));
        assert!(list.add("c", 4));
        assert_eq!(list.into_sorted_vec(), vec!["c"]);
    }

    #[test]
    fn equal_distances_keep_arrival_order() {
        let mut list = NearestNeighbourList::new(None);
        for item in ["a", "b", "c"] {
            list.add(item, 1.0);
        }
        list.add("z", 0.5);
        assert_eq!(list.into_sorted_vec(), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn unlimited_is_never_full() {
        let mut list = NearestNeighbourList::new(None);
        for i in 0..100 {
            list.add(i, i as f32);
        }
        assert!(!list.is_full());
        assert_eq!(list.furthest_distance(), f32::INFINITY);
        assert_eq!(list.len(), 100);
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut list = NearestNeighbourList::new(Some(0));
        assert!(list.is_full());
        assert!(!list.add((), 0i32));
        assert!(list.is_empty());
        assert_eq!(list.furthest_distance(), i32::MAX);
    }
}
