use std::ops::Range;
use crate::fast_str_tools::{char_slice, char_slice_counted, count_chars};

/// A literal run of elements which can sit in a rope leaf.
///
/// Positions are whatever the sequence counts in: chars for `str`, elements for `[T]`. Leaves
/// own an `S::Owned` and ropes render back into one.
pub trait Sequence: ToOwned {
    /// The number of addressable positions.
    fn position_len(&self) -> usize;

    /// Borrow the positions in `range`. The range is always in bounds (`start <= end <= len`).
    fn position_slice(&self, range: Range<usize>) -> &Self;

    /// [`Sequence::position_slice`], for callers which already know `position_len`.
    ///
    /// Leaves cache their length, so they can skip work a cold slice would need to do.
    fn position_slice_counted(&self, range: Range<usize>, position_len: usize) -> &Self {
        debug_assert_eq!(position_len, self.position_len());
        self.position_slice(range)
    }

    /// Join fragments into a fresh owned sequence.
    fn join(fragments: &[&Self]) -> Self::Owned;
}

impl Sequence for str {
    fn position_len(&self) -> usize {
        count_chars(self)
    }

    fn position_slice(&self, range: Range<usize>) -> &str {
        char_slice(self, range)
    }

    fn position_slice_counted(&self, range: Range<usize>, position_len: usize) -> &str {
        char_slice_counted(self, range, position_len)
    }

    fn join(fragments: &[&str]) -> String {
        // concat() sizes the buffer up front, so this is a single allocation.
        fragments.concat()
    }
}

impl<T: Clone> Sequence for [T] {
    fn position_len(&self) -> usize {
        self.len()
    }

    fn position_slice(&self, range: Range<usize>) -> &[T] {
        &self[range]
    }

    fn join(fragments: &[&[T]]) -> Vec<T> {
        fragments.concat()
    }
}
