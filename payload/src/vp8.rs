//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! The VP8 RTP payload format.
//! See https://datatracker.ietf.org/doc/html/rfc7741 for the format.

use std::borrow::Borrow;

use log::*;
use media_common::{Bits, ByteCursor, Writer};

use crate::codec::{Depacketize, Frame, Packetize};
use crate::rtp;

pub type TruncatedTl0PicIdx = u8;

/// A picture ID from the payload descriptor.  The M bit of the first
/// picture ID byte picks the width on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PictureId {
    /// Really a u7.
    Short(u8),
    /// Really a u15.
    Long(u16),
}

#[derive(Debug, Eq, PartialEq)]
struct Byte0 {
    has_extensions: bool,
    is_non_ref_frame: bool,
    starts_partition: bool,
    partition_idx: u8,
}

impl Byte0 {
    fn parse(byte0: u8) -> Self {
        Self {
            has_extensions: byte0.ms_bit(0), //   X bit
            //_reserved1: byte0.ms_bit(1),     // R bit
            is_non_ref_frame: byte0.ms_bit(2), // N bit
            starts_partition: byte0.ms_bit(3), // S bit
            //_reserved2: byte0.ms_bit(4),     // R bit
            partition_idx: byte0 & 0b111,
        }
    }

    fn to_u8(&self) -> u8 {
        let mut byte0 = self.partition_idx & 0b111;
        if self.has_extensions {
            byte0 = byte0.set_ms_bit(0); // X bit
        }
        if self.is_non_ref_frame {
            byte0 = byte0.set_ms_bit(2); // N bit
        }
        if self.starts_partition {
            byte0 = byte0.set_ms_bit(3); // S bit
        }
        byte0
    }
}

#[derive(Debug, Eq, PartialEq)]
struct XByte {
    has_picture_id: bool,
    has_tl0_pic_idx: bool,
    has_tid: bool,
    has_key_idx: bool,
}

impl XByte {
    fn parse(x_byte: u8) -> Self {
        Self {
            has_picture_id: x_byte.ms_bit(0),  // I bit
            has_tl0_pic_idx: x_byte.ms_bit(1), // L bit
            has_tid: x_byte.ms_bit(2),         // T bit
            has_key_idx: x_byte.ms_bit(3),     // K bit
        }
    }
}

/// The payload descriptor at the front of every packet's payload.
/// See https://datatracker.ietf.org/doc/html/rfc7741#section-4.2
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ParsedDescriptor {
    /// How many bytes the descriptor takes up at the front of the payload.
    pub len: usize,

    /// True iff this packet starts a partition.  With the packetizer below
    /// that's the first packet of a frame.
    pub starts_partition: bool,

    /// Really a u3.
    pub partition_idx: u8,

    /// True iff the frame can be discarded without disrupting future frames.
    pub is_non_ref_frame: bool,

    /// Incremented with each video frame.
    /// Used to indicate frame order and gaps.
    pub picture_id: Option<PictureId>,

    /// Incremented with each frame with temporal layer 0.
    /// Used to indicate temporal layer dependencies.
    pub tl0_pic_idx: Option<TruncatedTl0PicIdx>,

    /// 0 = temporal base layer.  Really a u2.
    pub tid: Option<u8>,

    /// Incremented with each key frame.  Really a u5.
    pub key_idx: Option<u8>,
}

impl ParsedDescriptor {
    /// Reads the descriptor from the front of an RTP payload, leaving any
    /// frame bytes behind it alone.
    ///
    /// Returns None if a field a presence flag claims runs past the end of
    /// the payload.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        let mut descriptor = Self::default();
        let mut cursor = ByteCursor::new(payload);

        let byte0 = Byte0::parse(cursor.read_u8()?);
        descriptor.starts_partition = byte0.starts_partition;
        descriptor.partition_idx = byte0.partition_idx;
        descriptor.is_non_ref_frame = byte0.is_non_ref_frame;

        if byte0.has_extensions {
            let x_byte = XByte::parse(cursor.read_u8()?);

            if x_byte.has_picture_id {
                let picture_id_byte = cursor.read_u8()?;
                descriptor.picture_id = if picture_id_byte.ms_bit(0) {
                    // M bit: the picture ID continues into a second byte.
                    let low_byte = cursor.read_u8()?;
                    Some(PictureId::Long(
                        u16::from_be_bytes([picture_id_byte, low_byte]) & 0b0111_1111_1111_1111,
                    ))
                } else {
                    Some(PictureId::Short(picture_id_byte))
                };
            }

            if x_byte.has_tl0_pic_idx {
                descriptor.tl0_pic_idx = Some(cursor.read_u8()?);
            }

            // The TID/KEYIDX byte rides along whenever L or K is set.
            if x_byte.has_tl0_pic_idx || x_byte.has_key_idx {
                let tk_byte = cursor.read_u8()?;
                if x_byte.has_tid {
                    descriptor.tid = Some(tk_byte >> 6);
                }
                if x_byte.has_key_idx {
                    descriptor.key_idx = Some(tk_byte & 0b0001_1111);
                }
            }
        }

        descriptor.len = cursor.pos();
        Some(descriptor)
    }
}

/// True iff the encoded frame is a key frame, per the frame type bit at the
/// start of the VP8 bitstream.
/// See https://datatracker.ietf.org/doc/html/rfc6386#section-9.1
pub fn is_key_frame(frame: &[u8]) -> bool {
    match frame.first() {
        Some(byte0) => !byte0.ms_bit(7), // P bit: Inverse key frame flag.
        None => false,
    }
}

const DESCRIPTOR_LEN: usize = 1;

/// Splits encoded VP8 frames into payloads of at most `max_fragment_size`
/// bytes, each prefixed with a one-byte payload descriptor.
///
/// Stamping the RTP headers onto the payloads is the caller's job.
#[derive(Debug, Clone)]
pub struct Packetizer {
    max_fragment_size: usize,
}

impl Packetizer {
    pub fn new(max_fragment_size: usize) -> Self {
        Self { max_fragment_size }
    }
}

impl Packetize for Packetizer {
    /// Each payload is the next run of frame bytes behind a one-byte
    /// descriptor: S on the first payload only, N on every payload of a
    /// delta frame, X and PID always zero.
    ///
    /// An empty frame, or a fragment size with no room behind the
    /// descriptor, yields no payloads.
    fn fragment(&self, frame: &[u8]) -> Vec<Vec<u8>> {
        if frame.is_empty() || self.max_fragment_size <= DESCRIPTOR_LEN {
            return Vec::new();
        }

        // Delta frames get the N bit even though some of them are reference
        // frames too.
        let is_non_ref_frame = !is_key_frame(frame);

        frame
            .chunks(self.max_fragment_size - DESCRIPTOR_LEN)
            .enumerate()
            .map(|(i, chunk)| {
                let byte0 = Byte0 {
                    has_extensions: false,
                    is_non_ref_frame,
                    starts_partition: i == 0,
                    partition_idx: 0,
                };
                ([byte0.to_u8()], chunk).to_vec()
            })
            .collect()
    }
}

/// Rebuilds one encoded VP8 frame from the RTP packets that carried it.
#[derive(Debug, Clone, Default)]
pub struct Depacketizer;

impl Depacketizer {
    pub fn new() -> Self {
        Self
    }
}

impl Depacketize for Depacketizer {
    /// Strips the RTP header, any padding, and the payload descriptor from
    /// each packet and concatenates what remains, in iteration order.
    ///
    /// The frame's payload type and timestamp come from the first packet
    /// whose RTP header can be read, whatever its sequence number; callers
    /// should pass packets already in decode order.  A packet contributes
    /// nothing if its header can't be read, its sequence number doesn't
    /// advance past the previously accepted one, its descriptor is cut
    /// short, or no frame bytes follow the descriptor.
    ///
    /// Returns None only when no packet's RTP header can be read.
    fn reassemble<P: Borrow<[u8]>>(&self, packets: &[P]) -> Option<Frame> {
        let mut metadata: Option<(rtp::PayloadType, rtp::Timestamp)> = None;
        let mut next_seqnum: rtp::SequenceNumber = 0;
        let mut data = Vec::new();

        for packet in packets {
            let packet = packet.borrow();
            let Some(header) = rtp::Header::parse(packet) else {
                debug!("Skipping packet with unreadable RTP header");
                debug!("{}", hex::encode(&packet[..packet.len().min(100)]));
                continue;
            };

            match metadata {
                None => metadata = Some((header.payload_type, header.timestamp)),
                Some(_) => {
                    if header.seqnum < next_seqnum {
                        debug!(
                            "Skipping duplicate or reordered packet; seqnum = {}",
                            header.seqnum
                        );
                        continue;
                    }
                }
            }
            next_seqnum = header.seqnum.wrapping_add(1);

            let header_len = header.payload_range.start;
            let padding_len = header.padding_len(packet);
            if packet.len() <= header_len + padding_len {
                debug!("Skipping packet with empty payload");
                continue;
            }
            let payload = &packet[header_len..packet.len() - padding_len];

            let Some(descriptor) = ParsedDescriptor::parse(payload) else {
                debug!("Skipping packet with truncated payload descriptor");
                continue;
            };
            if payload.len() <= descriptor.len {
                debug!("Skipping packet with no frame bytes behind the descriptor");
                continue;
            }

            data.extend_from_slice(&payload[descriptor.len..]);
        }

        let (payload_type, timestamp) = metadata?;
        Some(Frame {
            payload_type,
            timestamp,
            data,
        })
    }
}





#[cfg(test)]
mod fragment_tests {
    use super::*;

    fn strip_and_concat(payloads: &[Vec<u8>]) -> Vec<u8> {
        payloads
            .iter()
            .flat_map(|payload| payload[DESCRIPTOR_LEN..].iter().copied())
            .collect()
    }

    #[test]
    fn empty_frame_yields_nothing() {
        assert!(Packetizer::new(1200).fragment(&[]).is_empty());
    }

    #[test]
    fn no_room_behind_the_descriptor_yields_nothing() {
        assert!(Packetizer::new(0).fragment(&[1, 2, 3]).is_empty());
        assert!(Packetizer::new(1).fragment(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn key_frame_in_one_payload() {
        let payloads = Packetizer::new(1200).fragment(&[0x00, 1, 2, 3]);
        assert_eq!(vec![vec![0b00010000, 0x00, 1, 2, 3]], payloads);
    }

    #[test]
    fn only_the_first_payload_starts_the_partition() {
        let frame = [0x00, 1, 2, 3, 4];
        let payloads = Packetizer::new(3).fragment(&frame);
        assert_eq!(
            vec![
                vec![0b00010000, 0x00, 1],
                vec![0b00000000, 2, 3],
                vec![0b00000000, 4],
            ],
            payloads
        );
        assert_eq!(frame.to_vec(), strip_and_concat(&payloads));
    }

    #[test]
    fn delta_frames_get_the_n_bit() {
        let payloads = Packetizer::new(3).fragment(&[0x01, 1, 2]);
        assert_eq!(
            vec![vec![0b00110000, 0x01, 1], vec![0b00100000, 2]],
            payloads
        );
    }

    #[test]
    fn every_payload_fits_the_limit() {
        let frame: Vec<u8> = (0..=255).collect();
        for max_fragment_size in [2, 3, 7, 100, 1200] {
            let payloads = Packetizer::new(max_fragment_size).fragment(&frame);
            assert!(payloads
                .iter()
                .all(|payload| payload.len() <= max_fragment_size));
            assert_eq!(frame, strip_and_concat(&payloads));
        }
    }

    #[test]
    fn fragment_size_of_two_sends_one_frame_byte_at_a_time() {
        let payloads = Packetizer::new(2).fragment(&[0x00, 1]);
        assert_eq!(vec![vec![0b00010000, 0x00], vec![0b00000000, 1]], payloads);
    }
}
