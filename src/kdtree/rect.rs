//! Axis-aligned bounding regions used to prune the search.

use crate::r#type::IndexableNum;

/// An axis-aligned hyper-rectangle with per-axis `min` and `max` bounds.
///
/// Each search starts from [`HyperRect::infinite`] and splits it at every node it passes, so the
/// rectangle handed to a subtree bounds every point that subtree can contain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperRect<N: IndexableNum, const D: usize> {
    /// Lower bound on each axis.
    pub min: [N; D],
    /// Upper bound on each axis.
    pub max: [N; D],
}

impl<N: IndexableNum, const D: usize> HyperRect<N, D> {
    /// Create a rectangle from its corners.
    pub fn new(min: [N; D], max: [N; D]) -> Self {
        Self { min, max }
    }

    /// The unconstrained rectangle, spanning the infinity sentinels on every axis.
    pub fn infinite() -> Self {
        Self {
            min: [N::neg_infinity(); D],
            max: [N::pos_infinity(); D],
        }
    }

    /// Split along `axis` at `at`, returning the `(left, right)` halves.
    ///
    /// Both halves include the split value itself, matching a branch rule where points equal on
    /// the split axis go left.
    #[inline]
    pub fn split(&self, axis: usize, at: N) -> (Self, Self) {
        let mut left = *self;
        left.max[axis] = at;
        let mut right = *self;
        right.min[axis] = at;
        (left, right)
    }

    /// The point inside this rectangle closest to `target`: `target` clamped on every axis.
    #[inline]
    pub fn closest_point(&self, target: &[N; D]) -> [N; D] {
        let mut closest = *target;
        for (axis, c) in closest.iter_mut().enumerate() {
            if self.min[axis] > *c {
                *c = self.min[axis];
            } else if self.max[axis] < *c {
                *c = self.max[axis];
            }
        }
        closest
    }

    /// Returns `true` if `point` lies inside the rectangle, bounds included.
    pub fn contains(&self, point: &[N; D]) -> bool {
        (0..D).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_keeps_the_other_axes() {
        let rect = HyperRect::new([0, 0, 0], [10, 10, 10]);
        let (left, right) = rect.split(1, 4);
        assert_eq!(left, HyperRect::new([0, 0, 0], [10, 4, 10]));
        assert_eq!(right, HyperRect::new([0, 4, 0], [10, 10, 10]));
    }

    #[test]
    fn closest_point_clamps_each_axis() {
        let rect = HyperRect::new([0., 0.], [2., 2.]);
        assert_eq!(rect.closest_point(&[-1., 1.]), [0., 1.]);
        assert_eq!(rect.closest_point(&[3., 5.]), [2., 2.]);
        assert_eq!(rect.closest_point(&[1., 1.]), [1., 1.]);
    }

    #[test]
    fn infinite_contains_everything() {
        let rect = HyperRect::<i32, 2>::infinite();
        assert!(rect.contains(&[i32::MIN, i32::MAX]));
        assert_eq!(rect.closest_point(&[7, -7]), [7, -7]);

        let (left, _) = rect.split(0, 3);
        assert_eq!(left.closest_point(&[5, 1]), [3, 1]);
        assert!(!left.contains(&[5, 1]));
    }
}
