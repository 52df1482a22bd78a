//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Just enough of the RTP header to strip it from incoming packets.
//! See https://www.rfc-editor.org/rfc/rfc3550#section-5.1 for the format.

use std::ops::Range;

use log::*;
use media_common::ByteCursor;

pub type PayloadType = u8;
pub type SequenceNumber = u16;
pub type Timestamp = u32;
pub type Ssrc = u32;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Header {
    pub marker: bool,
    pub has_padding: bool,
    pub payload_type: PayloadType,
    pub seqnum: SequenceNumber,
    pub timestamp: Timestamp,
    pub ssrc: Ssrc,
    // The payload start is the same as the header len.
    // The payload end isn't technically part of the "Header",
    // but it's convenient to parse at the same time.
    pub payload_range: Range<usize>,
}

impl Header {
    /// Reads the fixed header, skips the CSRC list and the extension block,
    /// and records where the payload starts.
    ///
    /// Returns None if the packet is shorter than what its own counts and
    /// flags claim.
    pub fn parse(packet: &[u8]) -> Option<Self> {
        let mut cursor = ByteCursor::new(packet);

        let byte0 = cursor.read_u8()?;
        let byte1 = cursor.read_u8()?;
        let has_padding = (byte0 & 0b0010_0000) > 0;
        let has_extensions = ((byte0 & 0b0001_0000) >> 4) > 0;
        let csrc_count = byte0 & 0b0000_1111;
        let marker = ((byte1 & 0b1000_0000) >> 7) != 0;
        let payload_type = byte1 & 0b0111_1111;
        let seqnum = cursor.read_u16()?;
        let timestamp = cursor.read_u32()?;
        let ssrc = cursor.read_u32()?;

        if !cursor.try_advance(4 * csrc_count as usize) {
            return None;
        }

        if has_extensions {
            // Only the block's size matters here, not what's in it.
            let _extensions_profile = cursor.read_u16()?;
            let extensions_len = (cursor.read_u16()? as usize) * 4;
            if !cursor.try_advance(extensions_len) {
                return None;
            }
        }

        let payload_range = cursor.pos()..packet.len();

        if has_padding && payload_range.is_empty() {
            debug!(
                "Invalid RTP: has padding, but padding byte count is missing; packet len = {}",
                packet.len()
            );
            return None;
        }

        Some(Self {
            marker,
            has_padding,
            payload_type,
            seqnum,
            timestamp,
            ssrc,
            payload_range,
        })
    }

    /// The count of trailing padding bytes, read from the last byte of the
    /// packet.  `packet` must be the same slice this header was parsed from.
    pub fn padding_len(&self, packet: &[u8]) -> usize {
        if self.has_padding {
            packet[self.payload_range.end - 1] as usize
        } else {
            0
        }
    }
}
