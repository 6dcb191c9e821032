//! Sentinel values shared across the word-graph and presentation types.
//!
//! Mirrors `libsemigroups/constants.hpp`'s `Constant<Offset, Max|Min>`
//! templates, specialised to the two integer widths this crate actually
//! indexes with (`u32` for nodes/labels, `u64` for path lengths and counts),
//! rather than reproducing the fully generic C++ template over any integral
//! type.

/// No node / no edge. Comparable with any valid `u32` index via `==`, but
/// deliberately the maximum representable value so that `t < UNDEFINED`
/// is never accidentally true for a real node.
pub const UNDEFINED: u32 = u32::MAX;

/// Represents +∞ for path-length and count bounds (`u64`-typed, since
/// lengths and counts are not node indices).
pub const POSITIVE_INFINITY: u64 = u64::MAX - 1;

/// The maximum value a bounded parameter (e.g. a path-length bound) may
/// take while still being treated as finite.
pub const LIMIT_MAX: u64 = u64::MAX - 2;

/// Represents -∞. Only meaningful for signed comparisons (e.g. comparing
/// two path-length bounds), never as a node or label.
pub const NEGATIVE_INFINITY: i64 = i64::MIN;

/// `true` iff `value` is the sentinel node/label used throughout this
/// crate's dense tables.
#[inline]
#[must_use]
pub const fn is_undefined(value: u32) -> bool {
    value == UNDEFINED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_is_not_a_small_index() {
        assert!(!is_undefined(0));
        assert!(!is_undefined(1_000));
        assert!(is_undefined(UNDEFINED));
    }

    #[test]
    fn positive_infinity_exceeds_limit_max() {
        assert!(POSITIVE_INFINITY > LIMIT_MAX);
        assert!(LIMIT_MAX < u64::MAX);
    }
}
