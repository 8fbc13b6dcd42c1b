//! The rope's safe, public operations: the surface built directly on top
//! of the unsafe engine in `rope.rs`.

use std::fmt;
use std::io;

use crate::error::RopeError;
use crate::knot::{Knot, SkipPointer};
use crate::rope::JumpRope;
use crate::{utils, MAX_HEIGHT};

impl JumpRope {
    /// Walks the whole rope, re-deriving its size/rune/skip totals from
    /// scratch and asserting they match what's stored. Exposed publicly so
    /// fuzzers and property tests can validate internal consistency without
    /// reaching into the crate's private state, mirroring the invariant
    /// checker this crate's engine was adapted from.
    pub fn check(&self) {
        assert!(self.head.height >= 1);
        assert!((self.head.height as usize) < MAX_HEIGHT + 1);

        let top = &self.nexts[self.head.height as usize - 1];
        assert!(top.skipped_bytes <= self.size);
        assert!(top.next.is_null());

        let mut frontier = [SkipPointer::new(); MAX_HEIGHT];
        for i in 0..self.head.height as usize {
            frontier[i].next = &self.head as *const Knot as *mut Knot;
        }

        let mut size = 0;
        let mut runes = 0;
        for k in self.iter_knots() {
            let is_head = std::ptr::eq(k as *const Knot, &self.head as *const Knot);
            assert!(is_head || k.used > 0);
            assert!((k.height as usize) <= MAX_HEIGHT);
            assert_eq!(utils::count_runes(k.content_slice()), k.num_runes());

            for (i, frame) in frontier[..k.height as usize].iter_mut().enumerate() {
                assert_eq!(frame.next as *const Knot, k as *const Knot);
                assert_eq!(frame.skipped_runes, runes);
                assert_eq!(frame.skipped_bytes, size);

                frame.next = k.nexts()[i].next;
                frame.skipped_runes += k.nexts()[i].skipped_runes;
                frame.skipped_bytes += k.nexts()[i].skipped_bytes;
            }

            size += k.used as usize;
            runes += k.num_runes();
        }

        for frame in frontier[..self.head.height as usize].iter() {
            assert!(frame.next.is_null());
            assert_eq!(frame.skipped_runes, runes);
            assert_eq!(frame.skipped_bytes, size);
        }

        assert_eq!(self.size, size);
        assert_eq!(self.runes, runes);
    }

    /// Inserts `text` at rune position `rune_pos`, clamping the position to
    /// the rope's current length rather than erroring.
    pub fn insert(&mut self, rune_pos: usize, text: &str) -> Result<(), RopeError> {
        self.insert_bytes_at(rune_pos, text.as_bytes());
        Ok(())
    }

    /// Inserts raw, well-formed UTF-8 `bytes` at rune position `rune_pos`.
    pub fn insert_bytes(&mut self, rune_pos: usize, bytes: &[u8]) -> Result<(), RopeError> {
        self.insert_bytes_at(rune_pos, bytes);
        Ok(())
    }

    /// Inserts `runes` at rune position `rune_pos`.
    pub fn insert_runes(&mut self, rune_pos: usize, runes: &[char]) -> Result<(), RopeError> {
        let s: String = runes.iter().collect();
        self.insert_bytes_at(rune_pos, s.as_bytes());
        Ok(())
    }

    /// Erases `n_runes` runes starting at `rune_pos`, clamping both to the
    /// rope's current bounds.
    pub fn erase_at(&mut self, rune_pos: usize, n_runes: usize) -> Result<(), RopeError> {
        self.erase_runes_at(rune_pos, n_runes);
        Ok(())
    }

    /// Total size of the rope's content in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of runes (Unicode code points) in the rope.
    pub fn runes(&self) -> usize {
        self.runes
    }

    /// The rune at `rune_pos`, or `None` if out of bounds.
    pub fn index(&self, rune_pos: usize) -> Option<char> {
        let (knot, byte_offset_in_knot, _) = self.find(rune_pos).ok()?;
        unsafe {
            let mut k: *const Knot = knot;
            let mut off = byte_offset_in_knot;
            // Landing exactly at a knot's end means the rune to read is the
            // first rune of the next knot.
            while off >= (*k).used as usize {
                let next = (*k).first_next().next;
                if next.is_null() {
                    return None;
                }
                k = next as *const Knot;
                off = 0;
            }
            let content = (*k).content_slice();
            let s = std::str::from_utf8_unchecked(&content[off..]);
            s.chars().next()
        }
    }

    /// Byte index corresponding to rune position `rune_pos`, or `None` if
    /// out of bounds.
    pub fn byte_offset(&self, rune_pos: usize) -> Option<usize> {
        let (_, byte_offset_in_knot, skipped_bytes) = self.find(rune_pos).ok()?;
        Some(skipped_bytes + byte_offset_in_knot)
    }

    /// Copies the bytes of runes `[a, b)` into a freshly allocated buffer.
    pub fn substr_bytes(&self, a: usize, b: usize) -> Vec<u8> {
        let lo = a.min(b).min(self.runes);
        let hi = a.max(b).min(self.runes);
        if lo >= hi {
            return Vec::new();
        }

        let (start_knot, start_off, start_skipped) = self.find(lo).expect("lo already clamped");
        let (end_knot, end_off, end_skipped) = self.find(hi).expect("hi already clamped");

        let mut out = Vec::with_capacity((end_skipped + end_off) - (start_skipped + start_off));
        let mut k: *const Knot = start_knot;
        let mut from = start_off;
        loop {
            let content = unsafe { (*k).content_slice() };
            let to = if std::ptr::eq(k, end_knot) { end_off } else { content.len() };
            out.extend_from_slice(&content[from..to]);
            if std::ptr::eq(k, end_knot) {
                break;
            }
            k = unsafe { (*k).first_next().next as *const Knot };
            from = 0;
            if k.is_null() {
                break;
            }
        }
        out
    }

    /// Copies runes `[a, b)` into a `Vec<char>`.
    pub fn substr_runes(&self, a: usize, b: usize) -> Vec<char> {
        let bytes = self.substr_bytes(a, b);
        let s = unsafe { std::str::from_utf8_unchecked(&bytes) };
        s.chars().collect()
    }

    /// Copies runes `[a, b)` into a `String`.
    pub fn substr(&self, a: usize, b: usize) -> String {
        let bytes = self.substr_bytes(a, b);
        unsafe { String::from_utf8_unchecked(bytes) }
    }

    /// The rope's full content as a `String`.
    pub fn to_string(&self) -> String {
        self.substr(0, self.runes)
    }

    /// Walks backward rune-by-rune from `rune_pos`, returning the position
    /// immediately after the first (scanning backward) rune that satisfies
    /// `predicate`, along with that rune. Returns `RopeError::NotFound` if
    /// the head is reached with no match, rather than looping forever.
    pub fn before(&self, rune_pos: usize, predicate: impl Fn(char) -> bool) -> Result<(usize, char), RopeError> {
        let clamped = rune_pos.min(self.runes);
        let (mut k, mut off, _) = self.find(clamped)?;
        let mut steps_back = 0usize;

        loop {
            if off == 0 {
                if std::ptr::eq(k, &self.head as *const Knot) {
                    return Err(RopeError::NotFound);
                }
                let prev = self.predecessor_of(k);
                k = prev;
                off = unsafe { (*k).used as usize };
                continue;
            }

            let (prev_off, c) = unsafe {
                let content = (*k).content_slice();
                let prev_off = prev_char_boundary(content, off);
                let s = std::str::from_utf8_unchecked(&content[prev_off..off]);
                (prev_off, s.chars().next().expect("valid utf8 boundary"))
            };

            if predicate(c) {
                return Ok((clamped.saturating_sub(steps_back), c));
            }
            steps_back += 1;
            off = prev_off;
        }
    }

    /// The skip list has no back-pointers, so finding the knot preceding
    /// `target` means re-walking the level-0 chain from the head. This
    /// mirrors the backward-scan approach of the engine this rope's design
    /// is adapted from, which has the same structural limitation.
    fn predecessor_of(&self, target: *const Knot) -> *const Knot {
        let mut prev: *const Knot = &self.head;
        let mut it: *const Knot = &self.head;
        loop {
            if std::ptr::eq(it, target) {
                return prev;
            }
            prev = it;
            it = unsafe { (*it).first_next().next as *const Knot };
            debug_assert!(!it.is_null(), "target knot is not reachable from the head");
        }
    }
}

/// Finds the byte index of the UTF-8 character boundary immediately before
/// `off` in `content`.
fn prev_char_boundary(content: &[u8], off: usize) -> usize {
    let mut i = off - 1;
    while i > 0 && (content[i] & 0xC0) == 0x80 {
        i -= 1;
    }
    i
}

impl fmt::Display for JumpRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.content_iter() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl io::Write for JumpRope {
    /// Appends `buf` at the tail of the rope. Always consumes the whole
    /// buffer in one call: there is no partial-write case for an in-memory
    /// append.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let pos = self.runes;
        self.insert_bytes_at(pos, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn scenario_s1_insert_and_substr() {
        let mut rope = JumpRope::with_seed(1);
        rope.insert(0, "0123456789 hello world ab2cdefghi fakk1 eir3d").unwrap();
        assert_eq!(rope.substr(5, 18), "56789 hello w");
    }

    #[test]
    fn scenario_s2_insert_runes() {
        let mut rope = JumpRope::with_seed(1);
        rope.insert(0, "0123456789 hello world ab2cdefghi fakk1 eir3d").unwrap();
        let added: Vec<char> = "ADDED".chars().collect();
        rope.insert_runes(10, &added).unwrap();
        assert_eq!(rope.to_string(), "0123456789ADDED hello world ab2cdefghi fakk1 eir3d");
    }

    #[test]
    fn scenario_s3_erase() {
        let mut rope = JumpRope::with_seed(1);
        rope.insert(0, "0123456789 hello world ab2cdefghi fakk1 eir3d").unwrap();
        let added: Vec<char> = "ADDED".chars().collect();
        rope.insert_runes(10, &added).unwrap();
        rope.erase_at(10, 5).unwrap();
        assert_eq!(rope.to_string(), "0123456789 hello world ab2cdefghi fakk1 eir3d");
    }

    #[test]
    fn scenario_s4_s5_multibyte_substr() {
        let mut rope = JumpRope::with_seed(2);
        rope.insert(0, "Hello 世界").unwrap();
        assert_eq!(rope.substr_bytes(1, 2), b"e");

        let mut rope2 = JumpRope::with_seed(3);
        rope2.insert(0, "你好world").unwrap();
        assert_eq!(rope2.substr_bytes(1, 2), "好".as_bytes());
    }

    #[test]
    fn scenario_s6_byte_offset() {
        let mut rope = JumpRope::with_seed(4);
        rope.insert(0, "你好world").unwrap();
        assert_eq!(rope.byte_offset(1), Some(3));
        assert_eq!(rope.byte_offset(2), Some(6));
        assert_eq!(rope.byte_offset(200), None);
    }

    #[test]
    fn scenario_s7_index_past_first_bucket() {
        let text: String = (0..(crate::BUCKET_SIZE * 3)).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let mut rope = JumpRope::with_seed(5);
        rope.insert(0, &text).unwrap();
        let expected = text.chars().nth(crate::BUCKET_SIZE).unwrap();
        assert_eq!(rope.index(crate::BUCKET_SIZE), Some(expected));
    }

    #[test]
    fn scenario_s8_write_appends() {
        let mut rope = JumpRope::with_seed(6);
        let n1 = rope.write(b"Standing ").unwrap();
        let n2 = rope.write(b"at home").unwrap();
        assert_eq!(n1 + n2, 16);
        assert_eq!(rope.to_string(), "Standing at home");
    }

    #[test]
    fn before_finds_whitespace() {
        let mut rope = JumpRope::with_seed(7);
        rope.insert(0, "Hello World").unwrap();
        let (pos, c) = rope.before(9, |r: char| r.is_whitespace()).unwrap();
        assert_eq!(pos, 6);
        assert_eq!(c, ' ');
    }

    #[test]
    fn before_returns_not_found_at_head() {
        let mut rope = JumpRope::with_seed(8);
        rope.insert(0, "abc").unwrap();
        assert_eq!(rope.before(3, |r: char| r == 'z'), Err(RopeError::NotFound));
    }

    #[test]
    fn display_matches_to_string() {
        let mut rope = JumpRope::with_seed(9);
        rope.insert(0, "formatted").unwrap();
        assert_eq!(format!("{}", rope), rope.to_string());
    }
}
