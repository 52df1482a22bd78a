//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::ops::{BitAnd, BitOr, Shl, Shr};

/// Single-bit access for the flag bytes of wire formats.
/// Indexes are 0 based and panic past the width of the type.
pub trait Bits: Sized + Copy {
    const BIT_WIDTH: u8 = (std::mem::size_of::<Self>() * 8) as u8;

    /// Returns true iff the bit at the index, counted from the most
    /// significant bit, is one.
    fn ms_bit(self, index: u8) -> bool;

    /// Sets the bit at the index, counted from the most significant bit,
    /// to one.
    fn set_ms_bit(self, index: u8) -> Self;

    /// Returns true iff the bit at the index, counted from the least
    /// significant bit, is one.
    fn ls_bit(self, index: u8) -> bool;

    /// Sets the bit at the index, counted from the least significant bit,
    /// to one.
    fn set_ls_bit(self, index: u8) -> Self;
}

impl<T> Bits for T
where
    T: Copy
        + Shr<u8, Output = T>
        + Shl<u8, Output = T>
        + BitAnd<T, Output = T>
        + BitOr<T, Output = T>
        + From<u8>
        + Eq,
{
    fn ms_bit(self, index: u8) -> bool {
        assert!(index < Self::BIT_WIDTH);

        self >> (Self::BIT_WIDTH - index - 1) & T::from(1) == T::from(1)
    }

    fn set_ms_bit(self, index: u8) -> Self {
        assert!(index < Self::BIT_WIDTH);

        self | T::from(1) << (Self::BIT_WIDTH - index - 1)
    }

    fn ls_bit(self, index: u8) -> bool {
        assert!(index < Self::BIT_WIDTH);

        self >> index & T::from(1) == T::from(1)
    }

    fn set_ls_bit(self, index: u8) -> Self {
        assert!(index < Self::BIT_WIDTH);

        self | T::from(1) << index
    }
}
