//! The skip-list search cursor used by every read, insert and erase.

use crate::knot::Knot;
use crate::rope::JumpRope;
use crate::{RopeError, MAX_HEIGHT};

/// Per-level record of the last knot visited before descending, and how far
/// (in both bytes and runes) the cursor has travelled through that knot's
/// own content so far. `knot` is never null once a cursor has been built.
#[derive(Copy, Clone)]
pub(crate) struct CursorFrame {
    pub(crate) knot: *mut Knot,
    pub(crate) skipped_bytes: usize,
    pub(crate) skipped_runes: usize,
}

impl CursorFrame {
    fn empty() -> Self {
        CursorFrame { knot: std::ptr::null_mut(), skipped_bytes: 0, skipped_runes: 0 }
    }
}

/// A cursor is built fresh for every operation and never outlives the call
/// that built it, so it lives entirely on the stack.
pub(crate) struct RopeCursor(pub(crate) [CursorFrame; MAX_HEIGHT + 1]);

impl RopeCursor {
    fn empty() -> Self {
        RopeCursor([CursorFrame::empty(); MAX_HEIGHT + 1])
    }

    pub(crate) fn here_knot(&self) -> *mut Knot {
        self.0[0].knot
    }

    /// Propagates an insertion/erase delta (in bytes and runes) to the
    /// outgoing skip pointer at every level `0..height`, both in the knots
    /// the cursor points at and in the cursor's own running offsets.
    pub(crate) fn update_offsets(&mut self, height: usize, by_bytes: isize, by_runes: isize) {
        for i in 0..height {
            unsafe {
                let next = &mut (*self.0[i].knot).nexts_mut()[i];
                next.skipped_bytes = next.skipped_bytes.wrapping_add(by_bytes as usize);
                next.skipped_runes = next.skipped_runes.wrapping_add(by_runes as usize);
            }
        }
    }
}

impl JumpRope {
    /// Descends the skip list to the knot containing rune position
    /// `rune_point`, recording a [`CursorFrame`] at every level. Tracks both
    /// the byte and rune offsets at every level as it goes (the spec allows
    /// a lazier rune-only variant as a performance optimization; this crate
    /// always keeps both, which is simpler and just as correct).
    pub(crate) fn find_for_mutation(&self, rune_point: usize) -> Result<RopeCursor, RopeError> {
        if rune_point > self.runes {
            return Err(RopeError::OutOfBounds);
        }

        let mut e: *const Knot = &self.head;
        let mut height = self.head.height as usize - 1;

        let mut offset_runes = rune_point;
        let mut offset_bytes = 0usize;

        let mut cursor = RopeCursor::empty();

        loop {
            let en = unsafe { &*e };
            let next = &en.nexts()[height];
            if offset_runes > next.skipped_runes && !next.next.is_null() {
                offset_runes -= next.skipped_runes;
                offset_bytes += next.skipped_bytes;
                e = next.next;
            } else {
                cursor.0[height] = CursorFrame {
                    knot: e as *mut Knot,
                    skipped_runes: offset_runes,
                    skipped_bytes: offset_bytes,
                };

                if height == 0 {
                    break;
                }
                height -= 1;
            }
        }

        Ok(cursor)
    }

    /// Like [`Self::find_for_mutation`], but also resolves the rune offset
    /// within the landed knot to a byte offset via a UTF-8 scan, for callers
    /// that only need to read (not mutate) the rope.
    pub(crate) fn find(&self, rune_point: usize) -> Result<(*const Knot, usize, usize), RopeError> {
        let cursor = self.find_for_mutation(rune_point)?;
        let frame = cursor.0[0];
        let knot = unsafe { &*frame.knot };
        let byte_offset_in_knot = crate::utils::byte_offset(knot.content_slice(), frame.skipped_runes);
        Ok((frame.knot, byte_offset_in_knot, frame.skipped_bytes))
    }
}
