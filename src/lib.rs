//! A rope (fancy string) built on top of a probabilistic skip list.
//!
//! The rope is a chain of fixed-size byte buckets ("knots"), indexed by a
//! skip list whose pointers carry *both* a byte-distance and a rune-distance
//! to the next knot at that tower level. That dual accounting is what lets
//! [`JumpRope::byte_offset`] and rune-indexed operations run in O(log N)
//! time without re-scanning the whole rope's UTF-8 on every call.
//!
//! Mutation is unsafe under the hood (manually allocated, C-style knots, for
//! cache-friendly fixed-size buckets) but the public surface is entirely
//! safe.

mod height;
mod knot;
mod cursor;
mod rope;
mod api;
mod utils;
mod iter;
mod error;
mod scanner;

pub use error::{RopeError, ScanError};
pub use rope::JumpRope;
pub use scanner::Scanner;
pub use iter::ContentIter;

/// Maximum tower height a knot (or the rope's head) can reach.
///
/// The rope becomes less efficient once the text would need more than
/// `2^MAX_HEIGHT` knots to store, which in practice never happens.
pub const MAX_HEIGHT: usize = 60;

/// Capacity, in bytes, of a single knot's data bucket.
pub const BUCKET_SIZE: usize = 64;

/// Default bias: the percentage (out of 100) chance that a freshly created
/// knot grows one tower level taller than the last level attempted. See
/// [`JumpRope::with_bias`].
pub const DEFAULT_BIAS: u8 = 20;
