//! A public, read-only iterator over a rope's content, one knot's bucket
//! at a time.

use crate::knot::Knot;
use crate::rope::JumpRope;

/// Iterates over the rope's content one knot bucket at a time, as `&str`
/// chunks. Chunk boundaries follow the rope's internal knot layout and are
/// not meaningful on their own (they don't align to, say, lines or words).
pub struct ContentIter<'a> {
    next: Option<&'a Knot>,
}

impl<'a> Iterator for ContentIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(k) = self.next {
            self.next = unsafe { k.first_next().next.as_ref() };
            let s = k.as_str();
            if !s.is_empty() {
                return Some(s);
            }
        }
        None
    }
}

impl JumpRope {
    /// Iterates over the rope's content, one knot bucket at a time.
    pub fn content_iter(&self) -> ContentIter {
        // The head's own bucket is always empty, so start at the first
        // real knot directly.
        ContentIter { next: unsafe { self.head.first_next().next.as_ref() } }
    }
}
