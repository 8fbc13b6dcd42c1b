//! A non-owning, stateful reader over a live rope.
//!
//! Mirrors the single-step undo buffer of the scanner this crate's rope
//! engine was adapted from: only the single most recently read rune can be
//! pushed back, tracked via `prev_k`/`last_size` rather than a full history.

use std::io;

use crate::error::ScanError;
use crate::knot::Knot;
use crate::rope::JumpRope;

/// Reads a rope's content from the start, either byte-at-a-time
/// ([`std::io::Read`], [`Scanner::read_byte`]) or rune-at-a-time
/// ([`Scanner::read_rune`]).
///
/// Mutating the rope while a scanner is alive leaves the scanner's cursor
/// pointing at freed or relocated memory; this is undefined behavior and is
/// the caller's responsibility to avoid, same as the rope's other internal
/// invariants.
pub struct Scanner<'a> {
    rope: &'a JumpRope,
    k: *const Knot,
    offset: usize,
    remaining: usize,
    last_size: usize,
    prev_k: Option<*const Knot>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `rope`.
    pub fn new(rope: &'a JumpRope) -> Scanner<'a> {
        Scanner {
            rope,
            k: &rope.head as *const Knot,
            offset: 0,
            remaining: rope.size,
            last_size: 0,
            prev_k: None,
        }
    }

    /// Bytes not yet consumed by this scanner.
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Advances past the current knot if it's exhausted, returning `true`
    /// if a knot remains to read from.
    fn advance_if_exhausted(&mut self) -> bool {
        unsafe {
            if (*self.k).used as usize <= self.offset {
                self.prev_k = Some(self.k);
                self.k = (*self.k).first_next().next;
                self.offset = 0;
            }
            !self.k.is_null()
        }
    }

    /// Reads one byte. Does not respect rune boundaries; mixing this with
    /// [`Self::read_rune`] is fine but `unread_rune` will only ever undo a
    /// whole rune's worth of bytes.
    pub fn read_byte(&mut self) -> Result<u8, ScanError> {
        if self.k.is_null() || !self.advance_if_exhausted() {
            return Err(ScanError::EndOfInput);
        }
        unsafe {
            let b = (*self.k).bucket[self.offset];
            self.last_size = 1;
            self.offset += 1;
            self.remaining -= 1;
            self.advance_if_exhausted();
            Ok(b)
        }
    }

    /// Reads one rune and its UTF-8 width in bytes.
    pub fn read_rune(&mut self) -> Result<(char, usize), ScanError> {
        if self.k.is_null() || !self.advance_if_exhausted() {
            return Err(ScanError::EndOfInput);
        }
        unsafe {
            let content = (*self.k).content_slice();
            // Knot content is always well-formed UTF-8 (invariant 5), so
            // decoding the first rune from `offset` onward never fails.
            let s = std::str::from_utf8_unchecked(&content[self.offset..]);
            let c = s.chars().next().expect("non-head knot is never empty");
            let size = c.len_utf8();
            self.last_size = size;
            self.offset += size;
            self.remaining -= size;
            self.advance_if_exhausted();
            Ok((c, size))
        }
    }

    /// Undoes the single most recent `read_byte`/`read_rune` call. Calling
    /// this twice in a row without an intervening read fails with
    /// [`ScanError::StartOfInput`].
    pub fn unread_rune(&mut self) -> Result<(), ScanError> {
        if self.offset == 0 && self.prev_k.is_none() {
            return Err(ScanError::StartOfInput);
        }
        if self.offset == 0 {
            let prev = self.prev_k.take().unwrap();
            let used = unsafe { (*prev).used as usize };
            if self.last_size > used {
                return Err(ScanError::ShortBuffer);
            }
            self.k = prev;
            self.offset = used - self.last_size;
        } else {
            if self.last_size > self.offset {
                return Err(ScanError::ShortBuffer);
            }
            self.offset -= self.last_size;
        }
        self.remaining += self.last_size;
        Ok(())
    }
}

impl<'a> io::Read for Scanner<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            match self.read_byte() {
                Ok(b) => {
                    buf[written] = b;
                    written += 1;
                }
                Err(ScanError::EndOfInput) => break,
                Err(_) => unreachable!("read_byte only ever returns EndOfInput"),
            }
        }
        Ok(written)
    }
}
