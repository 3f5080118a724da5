//! Distance helpers used by construction and search.
//!
//! Both helpers return `None` when the exact result does not fit in the coordinate type
//! (an integer overflow, or a NaN from `inf - inf`). Searches treat such a distance as
//! farther than any representable one.

use crate::common_types::Coordinate;

/// Absolute difference of two coordinates.
///
/// Computed as `max - min` so unsigned coordinates never underflow.
#[inline]
pub fn axis_distance<T: Coordinate>(a: T, b: T) -> Option<T> {
    if a == b {
        Some(T::zero())
    } else if a < b {
        b.try_sub(a)
    } else {
        a.try_sub(b)
    }
}

/// Squared Euclidean distance between two points of equal dimensionality.
///
/// The caller is responsible for checking that both slices have the same length;
/// extra coordinates in the longer slice are ignored.
#[inline]
pub fn squared_euclidean<T: Coordinate>(p1: &[T], p2: &[T]) -> Option<T> {
    p1.iter().zip(p2.iter()).try_fold(T::zero(), |acc, (&a, &b)| {
        let diff = axis_distance(a, b)?;
        acc.try_add(diff.try_mul(diff)?)
    })
}
