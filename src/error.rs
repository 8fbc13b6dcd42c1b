use std::fmt;

/// Errors returned by read-only operations on a [`crate::JumpRope`].
///
/// Mutating operations (`insert*`, `erase_at`) never return one of these —
/// out-of-range positions are silently clamped instead, per the rope's
/// clamp-don't-error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopeError {
    /// A rune position was past the end of the rope.
    OutOfBounds,
    /// A backward scan (`before`) reached the start of the rope without the
    /// predicate ever matching.
    NotFound,
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RopeError::OutOfBounds => write!(f, "rune position out of bounds"),
            RopeError::NotFound => write!(f, "no matching rune found before the given position"),
        }
    }
}

impl std::error::Error for RopeError {}

/// Errors returned by [`crate::Scanner`]'s rune-level reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The scanner has consumed the whole rope.
    EndOfInput,
    /// `unread_rune` was called before any rune had been read, or twice in a
    /// row without an intervening read.
    StartOfInput,
    /// `unread_rune` couldn't rewind by the last read's width; this
    /// indicates the scanner's cursor and the rope it's reading have gone
    /// out of sync (e.g. the rope was mutated while the scanner was live).
    ShortBuffer,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::EndOfInput => write!(f, "end of input"),
            ScanError::StartOfInput => write!(f, "cannot unread before the start of input"),
            ScanError::ShortBuffer => write!(f, "short buffer while unreading"),
        }
    }
}

impl std::error::Error for ScanError {}
