//! Median selection over a column of coordinate values.

use std::cmp::Ordering;

/// Returns the median *value* of `values`: the element at position `len / 2` of the ascending
/// order (the upper of the two middle elements for even lengths, no interpolation).
///
/// The slice is reordered in place. Returns `None` for an empty slice.
pub fn median_value<T: Copy + PartialOrd>(values: &mut [T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let median_idx = values.len() / 2;
    let (_, median, _) = values.select_nth_unstable_by(median_idx, |a, b| {
        a.partial_cmp(b).unwrap_or(Ordering::Equal) // Inputs are validated, NaN never reaches here
    });
    Some(*median)
}
