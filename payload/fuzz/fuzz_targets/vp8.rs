//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

#![no_main]

use libfuzzer_sys::fuzz_target;
use media_payload::*;

fuzz_target!(|data: &[u8]| {
    let _ = vp8::ParsedDescriptor::parse(data);
});
