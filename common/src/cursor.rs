//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use crate::{parse_u16, parse_u32};

/// A forward-only reader over an untrusted byte slice.
///
/// Every read and skip goes through [`ByteCursor::try_advance`], so a parser
/// built on this can't index past the end of its input no matter what the
/// input claims about its own layout.  A failed read or skip leaves the
/// position where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Skips `n` bytes.  Returns false, without moving, if fewer than `n`
    /// remain.
    pub fn try_advance(&mut self, n: usize) -> bool {
        if self.remaining() < n {
            false
        } else {
            self.pos += n;
            true
        }
    }

    /// Borrows the next `n` bytes from the underlying slice and skips past
    /// them.
    pub fn read_slice(&mut self, n: usize) -> Option<&'a [u8]> {
        let start = self.pos;
        if self.try_advance(n) {
            Some(&self.bytes[start..self.pos])
        } else {
            None
        }
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        Some(self.read_slice(1)?[0])
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        Some(parse_u16(self.read_slice(2)?))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        Some(parse_u32(self.read_slice(4)?))
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn empty() {
        let mut cursor = ByteCursor::new(&[]);
        assert_eq!(0, cursor.remaining());
        assert!(cursor.try_advance(0));
        assert!(!cursor.try_advance(1));
        assert_eq!(None, cursor.read_u8());
        assert_eq!(0, cursor.pos());
    }

    #[test]
    fn advance_and_read() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Some(1), cursor.read_u8());
        assert!(cursor.try_advance(2));
        assert_eq!(3, cursor.pos());
        assert_eq!(4, cursor.remaining());
        assert_eq!(Some(&[4, 5][..]), cursor.read_slice(2));
        assert_eq!(Some(0x0607), cursor.read_u16());
        assert_eq!(7, cursor.pos());
        assert_eq!(0, cursor.remaining());
    }

    #[test]
    fn failed_advance_stays_put() {
        let mut cursor = ByteCursor::new(&[1, 2, 3]);
        assert!(cursor.try_advance(2));
        assert!(!cursor.try_advance(2));
        assert_eq!(2, cursor.pos());
        assert_eq!(Some(3), cursor.read_u8());
    }

    #[test]
    fn failed_read_consumes_nothing() {
        let mut cursor = ByteCursor::new(&[1]);
        assert_eq!(None, cursor.read_u16());
        assert_eq!(None, cursor.read_u32());
        assert_eq!(Some(1), cursor.read_u8());
    }

    #[test]
    fn reads_are_big_endian() {
        let mut cursor = ByteCursor::new(&hex!("0102 01020304"));
        assert_eq!(Some(0x0102), cursor.read_u16());
        assert_eq!(Some(0x0102_0304), cursor.read_u32());
    }

    #[test]
    fn borrowed_slices_outlive_the_cursor() {
        let bytes = hex!("0102030405");
        let middle = {
            let mut cursor = ByteCursor::new(&bytes);
            assert!(cursor.try_advance(1));
            cursor.read_slice(3).unwrap()
        };
        assert_eq!(&hex!("020304")[..], middle);
    }
}
