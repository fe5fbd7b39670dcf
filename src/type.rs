use std::cmp::Ordering;
use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast};

/// A trait for types that can be used for indexed coordinates.
///
/// Arithmetic (`zero`, `+`, `-`, `*`) comes from [`Num`] and the maximal value from [`Bounded`].
/// On top of that each coordinate type names the sentinels used for an unconstrained search
/// region. Floating point types use real infinities; integer types fall back to their minimum and
/// maximum values.
///
/// Only signed types are supported: distances are accumulated from per-axis differences, which
/// must be able to go negative.
pub trait IndexableNum: Num + NumCast + Bounded + PartialOrd + Copy + Debug {
    /// The lower bound of an unconstrained region.
    fn neg_infinity() -> Self;

    /// The upper bound of an unconstrained region.
    fn pos_infinity() -> Self;

    /// `self * self`, clamped to [`IndexableNum::pos_infinity`] instead of overflowing.
    fn saturating_square(self) -> Self;

    /// Total order used for branching and sorting. NaN compares equal to everything.
    #[inline]
    fn axis_cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

macro_rules! impl_indexable_int {
    ($($t:ty),*) => {
        $(
            impl IndexableNum for $t {
                #[inline]
                fn neg_infinity() -> Self {
                    <$t>::MIN
                }

                #[inline]
                fn pos_infinity() -> Self {
                    <$t>::MAX
                }

                #[inline]
                fn saturating_square(self) -> Self {
                    self.saturating_mul(self)
                }
            }
        )*
    };
}

macro_rules! impl_indexable_float {
    ($($t:ty),*) => {
        $(
            impl IndexableNum for $t {
                #[inline]
                fn neg_infinity() -> Self {
                    <$t>::NEG_INFINITY
                }

                #[inline]
                fn pos_infinity() -> Self {
                    <$t>::INFINITY
                }

                #[inline]
                fn saturating_square(self) -> Self {
                    self * self
                }
            }
        )*
    };
}

impl_indexable_int!(i8, i16, i32, i64);
impl_indexable_float!(f32, f64);

/// 1D absolute difference, computed by subtraction only.
#[inline]
pub(crate) fn abs_diff<N: IndexableNum>(a: N, b: N) -> N {
    let d = a - b;
    if d < N::zero() {
        N::zero() - d
    } else {
        d
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sentinels() {
        assert_eq!(i32::neg_infinity(), i32::MIN);
        assert_eq!(i64::pos_infinity(), i64::MAX);
        assert!(f64::pos_infinity().is_infinite());
        assert!(f32::neg_infinity() < f32::MIN);
    }

    #[test]
    fn nan_compares_equal() {
        assert_eq!(f64::NAN.axis_cmp(&1.0), Ordering::Equal);
        assert_eq!(1.0f64.axis_cmp(&2.0), Ordering::Less);
    }

    #[test]
    fn square_saturates_at_the_sentinel() {
        assert_eq!(12i8.saturating_square(), i8::pos_infinity());
        assert_eq!(11i8.saturating_square(), 121);
        assert_eq!(50_000i32.saturating_square(), i32::MAX);
        assert_eq!((-3i64).saturating_square(), 9);
        assert_eq!(1e200f64.saturating_square(), f64::INFINITY);
        assert_eq!(1.5f32.saturating_square(), 2.25);
    }

    #[test]
    fn abs_diff_both_directions() {
        assert_eq!(abs_diff(3, 7), 4);
        assert_eq!(abs_diff(7, 3), 4);
        assert_eq!(abs_diff(-2.5, 2.5), 5.0);
    }
}
