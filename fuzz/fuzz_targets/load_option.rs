// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use bootvar_rs_core::boot::load_option::LoadOption;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(option) = LoadOption::decode(data) {
        // anything that decodes must encode again, and decode to the same thing
        let bytes = option.encode().expect("decoded device path always fits");
        assert_eq!(LoadOption::decode(&bytes).ok(), Some(option));
    }
});
