//! Range checking and length accounting shared by every node kind.
//!
//! Ranges are plain half-open `Range<usize>` values. They are checked once, at the outermost
//! render call, and then passed down the tree without being checked again.

use std::ops::Range;
use crate::error::RopeError;

/// Check that `range` fits inside something `len` positions long.
pub fn check_range(range: &Range<usize>, len: usize) -> Result<(), RopeError> {
    if range.start <= range.end && range.end <= len {
        Ok(())
    } else {
        log::debug!("rejecting range {}..{} against length {}", range.start, range.end, len);
        Err(RopeError::invalid_range(range.start, range.end))
    }
}

/// Convert loosely typed numeric bounds (eg JS numbers) into a checked range.
///
/// Both bounds must be integral, and `0 <= begin <= end <= len`. NaN and the infinities are
/// rejected. The error carries the numbers exactly as they were given.
pub fn range_from_numbers(begin: f64, end: f64, len: usize) -> Result<Range<usize>, RopeError> {
    let integral = |n: f64| n.is_finite() && n.fract() == 0.0;

    if integral(begin) && integral(end) && begin >= 0.0 && begin <= end && end <= len as f64 {
        // Both values are whole numbers within [0, len] here, so the casts are exact.
        Ok(begin as usize..end as usize)
    } else {
        log::debug!("rejecting numeric range [{}, {}) against length {}", begin, end, len);
        Err(RopeError::invalid_range(begin, end))
    }
}

/// Total length of a run of items. Used when building concatenations.
pub(crate) fn sum_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> usize {
    // Saturate rather than wrap. Overlong substr views can claim huge lengths.
    lengths.into_iter().fold(0, usize::saturating_add)
}

/// Clamp `range` into `0..len`, the way slicing a literal treats out of bounds views.
pub(crate) fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}
