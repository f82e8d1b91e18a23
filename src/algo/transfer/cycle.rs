//! Cyclic flip/rotate of a face's loop sequence.

/// How a rotation at or beyond a face's valence is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotatePolicy {
    /// Reduce the rotation modulo the valence.
    #[default]
    Wrap,
    /// Reject rotations `>= valence`.
    Strict,
}

impl RotatePolicy {
    /// Resolve `rotate` for a face with `valence` loops.
    ///
    /// Returns the shift to apply, or `None` when the policy rejects it.
    pub fn resolve(self, rotate: usize, valence: usize) -> Option<usize> {
        match self {
            RotatePolicy::Wrap if valence == 0 => Some(0),
            RotatePolicy::Wrap => Some(rotate % valence),
            RotatePolicy::Strict => (rotate < valence).then_some(rotate),
        }
    }
}

/// Flip and rotate a cyclic sequence.
///
/// With `flip` the order is reversed first. The rotation then moves the
/// trailing `shift` elements, in their relative order, to the front: the
/// element at position `n - 1` ends at position `0` for `shift == 1`.
/// `shift` must not exceed `items.len()`; resolve it with [`RotatePolicy`].
///
/// # Example
///
/// ```
/// use uvkit::algo::transfer::flip_rotate;
///
/// assert_eq!(flip_rotate(&['a', 'b', 'c', 'd'], false, 1), vec!['d', 'a', 'b', 'c']);
/// assert_eq!(flip_rotate(&['a', 'b', 'c', 'd'], true, 1), vec!['a', 'd', 'c', 'b']);
/// ```
pub fn flip_rotate<T: Clone>(items: &[T], flip: bool, shift: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if flip {
        out.reverse();
    }
    out.rotate_right(shift);
    out
}
