//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

pub mod codec;
pub mod rtp;
pub mod vp8;
