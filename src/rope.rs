//! The rope itself: the skip list's head, its totals, and the insert/erase
//! engine that keeps bucket contents and tower skip pointers consistent.

use crate::cursor::RopeCursor;
use crate::height::{self, RopeRng};
use crate::knot::{Knot, SkipPointer};
use crate::utils;
use crate::{BUCKET_SIZE, DEFAULT_BIAS, MAX_HEIGHT};

/// A rope: a chain of byte buckets ("knots") indexed by a skip list.
///
/// `repr(C)` keeps `head` immediately followed by `nexts` in memory, which
/// is what lets `head`'s own (zero-length, per [`Knot`]) tower array read
/// forward into `nexts` for levels below `head.height`.
#[repr(C)]
pub struct JumpRope {
    pub(crate) rng: RopeRng,
    pub(crate) bias: u8,
    pub(crate) size: usize,
    pub(crate) runes: usize,
    pub(crate) head: Knot,
    pub(crate) nexts: [SkipPointer; MAX_HEIGHT + 1],
}

impl JumpRope {
    /// An empty rope with the default bias, seeded from OS entropy.
    pub fn new() -> Self {
        Self::new_with_bias_and_rng(DEFAULT_BIAS, height::new_rng())
    }

    /// An empty rope with a custom [bias](crate::DEFAULT_BIAS), seeded from
    /// OS entropy. Higher bias favors taller towers, which trades a little
    /// memory and append throughput for faster random access.
    pub fn with_bias(bias: u8) -> Self {
        Self::new_with_bias_and_rng(bias, height::new_rng())
    }

    /// An empty rope whose height selection is seeded deterministically.
    /// Intended for tests and other callers that need reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::new_with_bias_and_rng(DEFAULT_BIAS, height::rng_from_seed(seed))
    }

    /// An empty rope with both a custom bias and an explicit seed.
    pub fn with_bias_and_seed(bias: u8, seed: u64) -> Self {
        Self::new_with_bias_and_rng(bias, height::rng_from_seed(seed))
    }

    fn new_with_bias_and_rng(bias: u8, rng: RopeRng) -> Self {
        JumpRope {
            rng,
            bias,
            size: 0,
            runes: 0,
            head: Knot::new_head(),
            nexts: [SkipPointer::new(); MAX_HEIGHT + 1],
        }
    }

    pub(crate) fn iter_knots(&self) -> KnotIter {
        KnotIter(Some(&self.head))
    }

    /// Implements the full insert algorithm (fast in-bucket splice, the
    /// append-into-neighbor shortcut, or a split into one or more fresh
    /// knots), clamping `point` to the rope's current rune count.
    pub(crate) fn insert_bytes_at(&mut self, mut point: usize, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        point = point.min(self.runes);

        let mut cursor = self.find_for_mutation(point).expect("point was just clamped");

        let rune_offset_in_k = cursor.0[0].skipped_runes;
        let mut e = cursor.here_knot();
        let mut byte_offset_in_k = if rune_offset_in_k > 0 {
            let s = unsafe { (*e).content_slice() };
            utils::byte_offset(s, rune_offset_in_k)
        } else {
            0
        };

        let byte_count = data.len();
        let rune_count = utils::count_runes(data);

        let mut insert_here = unsafe { (*e).used as usize + byte_count <= BUCKET_SIZE };

        if !insert_here && byte_offset_in_k == unsafe { (*e).used as usize } {
            let next_ptr = unsafe { (*e).first_next().next };
            if !next_ptr.is_null() {
                let next_used = unsafe { (*next_ptr).used as usize };
                if next_used + byte_count <= BUCKET_SIZE {
                    let height = unsafe { (*next_ptr).height as usize };
                    for i in 0..height {
                        cursor.0[i].knot = next_ptr;
                        cursor.0[i].skipped_bytes = 0;
                        cursor.0[i].skipped_runes = 0;
                    }
                    e = next_ptr;
                    byte_offset_in_k = 0;
                    insert_here = true;
                }
            }
        }

        if insert_here {
            unsafe {
                let used = (*e).used as usize;
                let bucket = &mut (*e).bucket;
                if byte_offset_in_k < used {
                    std::ptr::copy(
                        bucket.as_ptr().add(byte_offset_in_k),
                        bucket.as_mut_ptr().add(byte_offset_in_k + byte_count),
                        used - byte_offset_in_k,
                    );
                }
                std::ptr::copy_nonoverlapping(
                    data.as_ptr(),
                    bucket.as_mut_ptr().add(byte_offset_in_k),
                    byte_count,
                );
                (*e).used += byte_count as u8;
            }
            self.size += byte_count;
            self.runes += rune_count;
            let head_height = self.head.height as usize;
            cursor.update_offsets(head_height, byte_count as isize, rune_count as isize);
        } else {
            self.insert_split(&mut cursor, e, byte_offset_in_k, rune_offset_in_k, data);
        }
    }

    /// The split path of insert (§4.4 step 7): detach `e`'s tail past the
    /// insertion point if any, pack `data` greedily into new knots along
    /// rune boundaries, then re-append the detached tail as one final knot.
    fn insert_split(
        &mut self,
        cursor: &mut RopeCursor,
        e: *mut Knot,
        byte_offset_in_k: usize,
        rune_offset_in_k: usize,
        data: &[u8],
    ) {
        let used = unsafe { (*e).used as usize };
        let tail_bytes = used - byte_offset_in_k;

        let detached_tail = if tail_bytes > 0 {
            let tail_runes = unsafe { (*e).first_next().skipped_runes } - rune_offset_in_k;
            let tail: Vec<u8> = unsafe { (*e).content_slice()[byte_offset_in_k..].to_vec() };
            unsafe {
                (*e).used = byte_offset_in_k as u8;
            }
            let head_height = self.head.height as usize;
            cursor.update_offsets(head_height, -(tail_bytes as isize), -(tail_runes as isize));
            self.size -= tail_bytes;
            self.runes -= tail_runes;
            Some((tail, tail_runes))
        } else {
            None
        };

        let mut remainder = data;
        while !remainder.is_empty() {
            let mut byte_pos = 0;
            let mut rune_pos = 0;
            while byte_pos < remainder.len() {
                let width = utils::utf8_char_width(remainder[byte_pos]);
                if byte_pos + width > BUCKET_SIZE {
                    break;
                }
                byte_pos += width;
                rune_pos += 1;
            }
            if byte_pos == 0 {
                // A single code point wider than BUCKET_SIZE can't happen
                // (UTF-8 code points are at most 4 bytes and BUCKET_SIZE is
                // much larger), but guard forward progress regardless.
                byte_pos = remainder.len().min(BUCKET_SIZE);
                rune_pos = utils::count_runes(&remainder[..byte_pos]);
            }
            let (chunk, rest) = remainder.split_at(byte_pos);
            self.new_knot_insert(cursor, chunk, rune_pos);
            remainder = rest;
        }

        if let Some((tail, tail_runes)) = detached_tail {
            self.new_knot_insert(cursor, &tail, tail_runes);
        }
    }

    /// Allocates a knot holding `data`, splices it into every tower level
    /// the cursor currently spans, and grows the head tower first if the
    /// knot's random height exceeds it (§4.5).
    fn new_knot_insert(&mut self, cursor: &mut RopeCursor, data: &[u8], rune_count: usize) {
        let new_height = height::random_height(&mut self.rng, self.bias);
        let n = Knot::alloc_with_height(new_height);
        unsafe {
            (*n).bucket[..data.len()].copy_from_slice(data);
            (*n).used = data.len() as u8;
        }
        let new_height_usize = new_height as usize;
        let byte_count = data.len();

        let mut head_height = self.head.height as usize;
        while head_height <= new_height_usize {
            self.nexts[head_height] = self.nexts[head_height - 1];
            cursor.0[head_height] = cursor.0[head_height - 1];
            self.head.height += 1;
            head_height += 1;
        }

        for i in 0..new_height_usize {
            unsafe {
                let prev = &mut (*cursor.0[i].knot).nexts_mut()[i];
                let n_next = &mut (*n).nexts_mut()[i];
                n_next.next = prev.next;
                n_next.skipped_bytes = byte_count + prev.skipped_bytes - cursor.0[i].skipped_bytes;
                n_next.skipped_runes = rune_count + prev.skipped_runes - cursor.0[i].skipped_runes;

                prev.next = n;
                prev.skipped_bytes = cursor.0[i].skipped_bytes;
                prev.skipped_runes = cursor.0[i].skipped_runes;
            }

            cursor.0[i].knot = n;
            cursor.0[i].skipped_bytes = byte_count;
            cursor.0[i].skipped_runes = rune_count;
        }

        for i in new_height_usize..head_height {
            unsafe {
                let next = &mut (*cursor.0[i].knot).nexts_mut()[i];
                next.skipped_bytes += byte_count;
                next.skipped_runes += rune_count;
            }
            cursor.0[i].skipped_bytes += byte_count;
            cursor.0[i].skipped_runes += rune_count;
        }

        self.size += byte_count;
        self.runes += rune_count;
    }

    /// Implements the full erase algorithm (§4.6): repeatedly trims or
    /// unlinks knots along the level-0 chain until `n` runes starting at
    /// `point` have been removed, clamping both to the rope's bounds.
    pub(crate) fn erase_runes_at(&mut self, mut point: usize, mut n: usize) {
        point = point.min(self.runes);
        n = n.min(self.runes - point);
        if n == 0 {
            return;
        }

        let mut cursor = self.find_for_mutation(point).expect("point was just clamped");
        let mut offset = cursor.0[0].skipped_runes;
        let mut e = cursor.here_knot();

        self.runes -= n;

        while n > 0 {
            unsafe {
                let s = (*e).first_next();
                if offset == s.skipped_runes {
                    e = s.next;
                    offset = 0;
                }
            }

            let available = unsafe { (*e).first_next().skipped_runes };
            let removed = n.min(available - offset);
            debug_assert!(removed > 0);

            let height = unsafe { (*e).height as usize };
            let is_head = std::ptr::eq(e as *const Knot, &self.head as *const Knot);
            let removed_bytes;

            if removed < available || is_head {
                unsafe {
                    let content = (*e).content_slice();
                    let leading_bytes = utils::byte_offset(content, offset);
                    removed_bytes = utils::byte_offset(&content[leading_bytes..], removed);
                    let used = (*e).used as usize;
                    let trailing_bytes = used - leading_bytes - removed_bytes;

                    let bucket = &mut (*e).bucket;
                    if trailing_bytes > 0 {
                        std::ptr::copy(
                            bucket.as_ptr().add(leading_bytes + removed_bytes),
                            bucket.as_mut_ptr().add(leading_bytes),
                            trailing_bytes,
                        );
                    }
                    (*e).used -= removed_bytes as u8;

                    for s in (*e).nexts_mut() {
                        s.skipped_runes -= removed;
                        s.skipped_bytes -= removed_bytes;
                    }
                }
            } else {
                unsafe {
                    removed_bytes = (*e).used as usize;
                    for i in 0..height {
                        let old = (*e).nexts()[i];
                        let s = &mut (*cursor.0[i].knot).nexts_mut()[i];
                        s.next = old.next;
                        s.skipped_runes += old.skipped_runes - removed;
                        s.skipped_bytes += old.skipped_bytes - removed_bytes;
                    }

                    let next = (*e).first_next().next;
                    Knot::free(e);
                    e = next;
                }
            }

            self.size -= removed_bytes;

            unsafe {
                for i in height..self.head.height as usize {
                    let s = &mut (*cursor.0[i].knot).nexts_mut()[i];
                    s.skipped_runes -= removed;
                    s.skipped_bytes -= removed_bytes;
                }
            }

            n -= removed;
        }
    }
}

impl Default for JumpRope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JumpRope {
    fn drop(&mut self) {
        let mut knot = self.head.first_next().next;
        unsafe {
            while !knot.is_null() {
                let next = (*knot).first_next().next;
                Knot::free(knot);
                knot = next;
            }
        }
    }
}

/// Walks the level-0 chain starting at (and including) the head.
pub(crate) struct KnotIter<'a>(Option<&'a Knot>);

impl<'a> Iterator for KnotIter<'a> {
    type Item = &'a Knot;

    fn next(&mut self) -> Option<&'a Knot> {
        let prev = self.0;
        if let Some(k) = self.0 {
            self.0 = unsafe { k.first_next().next.as_ref() };
        }
        prev
    }
}
