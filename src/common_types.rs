//! This module contains the numeric bound and result types shared by the tree, the searchers
//! and the index facade.

use num_traits::{AsPrimitive, CheckedAdd, CheckedMul, CheckedSub, Num};
use std::fmt::Debug;

/// A single coordinate value of a point.
///
/// Implemented for every primitive integer and float type. Integers and floats are both
/// accepted; float NaN values are rejected wherever points enter the crate, because they
/// would break the ordering the tree is built on.
///
/// Distance arithmetic goes through the `try_*` methods, which return `None` instead of
/// wrapping or panicking when a result leaves the type's range. For floats that means a
/// NaN result; an infinite result is still a value.
pub trait Coordinate: Copy + PartialOrd + Num + AsPrimitive<f64> + Debug {
    fn try_add(self, other: Self) -> Option<Self>;
    fn try_sub(self, other: Self) -> Option<Self>;
    fn try_mul(self, other: Self) -> Option<Self>;
}

macro_rules! impl_integer_coordinate {
    ($($t:ty),*) => {$(
        impl Coordinate for $t {
            #[inline]
            fn try_add(self, other: Self) -> Option<Self> {
                CheckedAdd::checked_add(&self, &other)
            }
            #[inline]
            fn try_sub(self, other: Self) -> Option<Self> {
                CheckedSub::checked_sub(&self, &other)
            }
            #[inline]
            fn try_mul(self, other: Self) -> Option<Self> {
                CheckedMul::checked_mul(&self, &other)
            }
        }
    )*};
}

macro_rules! impl_float_coordinate {
    ($($t:ty),*) => {$(
        impl Coordinate for $t {
            #[inline]
            fn try_add(self, other: Self) -> Option<Self> {
                Some(self + other).filter(|r| !r.is_nan())
            }
            #[inline]
            fn try_sub(self, other: Self) -> Option<Self> {
                Some(self - other).filter(|r| !r.is_nan())
            }
            #[inline]
            fn try_mul(self, other: Self) -> Option<Self> {
                Some(self * other).filter(|r| !r.is_nan())
            }
        }
    )*};
}

impl_integer_coordinate!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float_coordinate!(f32, f64);

/// A point found by a search together with its squared Euclidean distance to the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestResult<T> {
    pub point: Vec<T>,
    pub squared_distance: T,
}

impl<T> NearestResult<T> {
    pub fn new(point: Vec<T>, squared_distance: T) -> Self {
        NearestResult { point, squared_distance }
    }
}

/// Returns the index of the first axis whose value does not compare equal to itself.
#[allow(clippy::eq_op)] // NaN is the only value for which `x != x`
pub(crate) fn first_incomparable_axis<T: Coordinate>(point: &[T]) -> Option<usize> {
    point.iter().position(|&x| x != x)
}
