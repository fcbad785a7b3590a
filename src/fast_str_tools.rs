//! Char position helpers for utf8 string slices.
//!
//! Rope positions over `str` count unicode scalar values (chars). These helpers turn char
//! positions into byte offsets. They defer to str_indices, with a naive fallback under miri.

use std::ops::Range;

/// Counts the chars in `text`.
///
/// Runs in O(N) time, but N is bytes scanned with SIMD-ish bit tricks.
#[inline]
pub(crate) fn count_chars(text: &str) -> usize {
    if text.len() <= 1 { text.len() }
    else if !cfg!(miri) {
        str_indices::chars::count(text)
    } else {
        text.as_bytes().iter()
            .filter(|&&byte| (byte & 0xC0) != 0x80)
            .count()
    }
}

/// Converts from char-index to byte-index in a string slice.
///
/// Any past-the-end index will return the one-past-the-end byte index.
#[inline]
pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if !cfg!(miri) {
        str_indices::chars::to_byte_idx(text, char_idx)
    } else {
        text.char_indices()
            .nth(char_idx)
            .map_or(text.len(), |(i, _)| i)
    }
}

/// Slice `text` by char positions. The range must already be clamped to the char length.
///
/// Scans from the start of `text` up to the end of the range.
#[inline]
pub(crate) fn char_slice(text: &str, range: Range<usize>) -> &str {
    let start = char_to_byte_idx(text, range.start);
    // Only scan the tail we haven't already walked.
    let end = start + char_to_byte_idx(&text[start..], range.end - range.start);
    &text[start..end]
}

/// Like [`char_slice`], when the caller already knows `text` holds `char_count` chars.
///
/// If every char is one byte the char positions are byte positions, and this is O(1).
#[inline]
pub(crate) fn char_slice_counted(text: &str, range: Range<usize>, char_count: usize) -> &str {
    if text.len() == char_count {
        &text[range]
    } else {
        char_slice(text, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 124 bytes, 100 chars, 4 lines
    const TEXT_LINES: &str = "Hello there!  How're you doing?\nIt's \
                              a fine day, isn't it?\nAren't you glad \
                              we're alive?\nこんにちは、みんなさん！";

    #[test]
    fn count_chars_mixed() {
        assert_eq!(54, count_chars("Hello せかい! Hello せかい! Hello せかい! Hello せかい! Hello せかい!"));
        assert_eq!(100, count_chars(TEXT_LINES));
        assert_eq!(0, count_chars(""));
        assert_eq!(1, count_chars("x"));
    }

    #[test]
    fn char_to_byte_idx_mixed() {
        let text = "Hello せかい!";
        assert_eq!(0, char_to_byte_idx(text, 0));
        assert_eq!(6, char_to_byte_idx(text, 6));
        assert_eq!(12, char_to_byte_idx(text, 8));
        assert_eq!(15, char_to_byte_idx(text, 9));
        assert_eq!(16, char_to_byte_idx(text, 10));
        // Past the end
        assert_eq!(16, char_to_byte_idx(text, 30));
    }

    #[test]
    fn slicing() {
        assert_eq!(char_slice("foo bar baz", 4..7), "bar");
        assert_eq!(char_slice("せかい", 1..3), "かい");
        assert_eq!(char_slice("aせbかcい", 1..4), "せbか");
        assert_eq!(char_slice("aせbかcい", 6..6), "");
        assert_eq!(char_slice(TEXT_LINES, 88..93), "こんにちは");
    }

    #[test]
    fn counted_slicing() {
        assert_eq!(char_slice_counted("foo bar baz", 4..7, 11), "bar");
        assert_eq!(char_slice_counted("aせbかcい", 1..4, 6), "せbか");
        assert_eq!(char_slice_counted(TEXT_LINES, 88..93, 100), "こんにちは");

        // A long ascii run slices by byte offset, right up to the last char.
        let long = "xyz".repeat(100_000);
        assert_eq!(char_slice_counted(&long, 299_998..300_000, 300_000), "yz");
        assert_eq!(char_slice_counted(&long, 0..3, 300_000), "xyz");
    }
}
