//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! The seam between payload formats and the packet pipeline around them.

use std::borrow::Borrow;

use crate::rtp;
use crate::vp8;

/// One reassembled frame plus the RTP metadata a decoder needs to place it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Frame {
    pub payload_type: rtp::PayloadType,
    pub timestamp: rtp::Timestamp,
    pub data: Vec<u8>,
}

/// Splits one encoded frame into RTP payloads of bounded size.
pub trait Packetize {
    fn fragment(&self, frame: &[u8]) -> Vec<Vec<u8>>;
}

/// Rebuilds one encoded frame from the RTP packets that carried it.
pub trait Depacketize {
    fn reassemble<P: Borrow<[u8]>>(&self, packets: &[P]) -> Option<Frame>;
}

/// A packetizer for any of the supported payload formats, picked when the
/// session is negotiated.
#[derive(Debug, Clone)]
pub enum CodecPacketizer {
    Vp8(vp8::Packetizer),
}

impl Packetize for CodecPacketizer {
    fn fragment(&self, frame: &[u8]) -> Vec<Vec<u8>> {
        match self {
            CodecPacketizer::Vp8(packetizer) => packetizer.fragment(frame),
        }
    }
}

impl From<vp8::Packetizer> for CodecPacketizer {
    fn from(packetizer: vp8::Packetizer) -> Self {
        CodecPacketizer::Vp8(packetizer)
    }
}

/// A depacketizer for any of the supported payload formats.
#[derive(Debug, Clone)]
pub enum CodecDepacketizer {
    Vp8(vp8::Depacketizer),
}

impl Depacketize for CodecDepacketizer {
    fn reassemble<P: Borrow<[u8]>>(&self, packets: &[P]) -> Option<Frame> {
        match self {
            CodecDepacketizer::Vp8(depacketizer) => depacketizer.reassemble(packets),
        }
    }
}

impl From<vp8::Depacketizer> for CodecDepacketizer {
    fn from(depacketizer: vp8::Depacketizer) -> Self {
        CodecDepacketizer::Vp8(depacketizer)
    }
}
