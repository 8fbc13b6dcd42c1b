//! The skip list's node type and its forward pointers.
//!
//! A knot is laid out C-style: a fixed-size prefix (the bucket, its use
//! count and height) followed by a height-sized tail of [`SkipPointer`]s,
//! all in one heap allocation. This keeps random access to a knot's data
//! cache-friendly and avoids a second allocation per knot for the tower.

use std::alloc::{alloc, dealloc, Layout};
use std::{mem, ptr, str};

use crate::{BUCKET_SIZE, MAX_HEIGHT};

/// One outgoing pointer in a knot's tower, at a single level.
///
/// `skipped_bytes`/`skipped_runes` are the distance, in bytes and runes
/// respectively, from the *start* of the owning knot to the start of
/// `next` — or to the end of the rope, when `next` is null.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SkipPointer {
    pub(crate) next: *mut Knot,
    pub(crate) skipped_bytes: usize,
    pub(crate) skipped_runes: usize,
}

impl SkipPointer {
    pub(crate) fn new() -> Self {
        SkipPointer { next: ptr::null_mut(), skipped_bytes: 0, skipped_runes: 0 }
    }
}

/// A node in the rope's skip list.
///
/// `nexts` is declared with static size 0; its real length is `height`, and
/// the backing storage for entries beyond the struct's nominal size is
/// allocated alongside the knot by [`Knot::alloc_with_height`] (or, for the
/// rope's head knot, by padding fields in [`crate::rope::JumpRope`] itself).
#[repr(C)]
pub(crate) struct Knot {
    pub(crate) bucket: [u8; BUCKET_SIZE],
    pub(crate) used: u8,
    pub(crate) height: u8,
    nexts: [SkipPointer; 0],
}

impl Knot {
    pub(crate) fn nexts(&self) -> &[SkipPointer] {
        unsafe { std::slice::from_raw_parts(self.nexts.as_ptr(), self.height as usize) }
    }

    pub(crate) fn nexts_mut(&mut self) -> &mut [SkipPointer] {
        unsafe { std::slice::from_raw_parts_mut(self.nexts.as_mut_ptr(), self.height as usize) }
    }

    fn layout_with_height(height: u8) -> Layout {
        Layout::from_size_align(
            mem::size_of::<Knot>() + mem::size_of::<SkipPointer>() * (height as usize),
            mem::align_of::<Knot>(),
        ).unwrap()
    }

    /// Builds an empty, height-1 knot by value, for use as a rope's
    /// embedded head (which is never heap-allocated itself; its tower
    /// storage is borrowed from the owning rope's padding array instead,
    /// see [`crate::rope::JumpRope`]).
    pub(crate) fn new_head() -> Knot {
        Knot {
            bucket: [0; BUCKET_SIZE],
            used: 0,
            height: 1,
            nexts: [],
        }
    }

    /// Allocates a new, empty knot with the given tower height.
    pub(crate) fn alloc_with_height(height: u8) -> *mut Knot {
        assert!(height >= 1 && (height as usize) <= MAX_HEIGHT);
        unsafe {
            let knot = alloc(Self::layout_with_height(height)) as *mut Knot;
            ptr::write(knot, Knot {
                bucket: [0; BUCKET_SIZE],
                used: 0,
                height,
                nexts: [],
            });
            for next in (*knot).nexts_mut() {
                *next = SkipPointer::new();
            }
            knot
        }
    }

    /// Frees a knot allocated by [`Self::alloc_with_height`]. The caller
    /// must have already unlinked it from every tower level.
    pub(crate) unsafe fn free(p: *mut Knot) {
        dealloc(p as *mut u8, Self::layout_with_height((*p).height));
    }

    pub(crate) fn content_slice(&self) -> &[u8] {
        &self.bucket[..self.used as usize]
    }

    pub(crate) fn as_str(&self) -> &str {
        if cfg!(debug_assertions) {
            str::from_utf8(self.content_slice()).unwrap()
        } else {
            unsafe { str::from_utf8_unchecked(self.content_slice()) }
        }
    }

    /// Height is always >= 1, so the first tower entry always exists.
    pub(crate) fn first_next(&self) -> &SkipPointer {
        unsafe { &*self.nexts.as_ptr() }
    }

    pub(crate) fn first_next_mut(&mut self) -> &mut SkipPointer {
        unsafe { &mut *self.nexts.as_mut_ptr() }
    }

    /// Number of runes this knot itself contributes (the level-0 skip).
    pub(crate) fn num_runes(&self) -> usize {
        self.first_next().skipped_runes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Verifies the zero-length trailing array doesn't get misaligned by the
    // compiler; if this ever fails, the alloc/dealloc layout math above is
    // no longer valid.
    #[test]
    fn test_align() {
        #[repr(C)]
        struct Check([SkipPointer; 0]);
        assert!(mem::align_of::<Check>() >= mem::align_of::<SkipPointer>());
    }

    #[test]
    fn alloc_and_free_roundtrip() {
        unsafe {
            let k = Knot::alloc_with_height(5);
            assert_eq!((*k).height, 5);
            assert_eq!((*k).used, 0);
            assert_eq!((*k).nexts().len(), 5);
            Knot::free(k);
        }
    }
}
