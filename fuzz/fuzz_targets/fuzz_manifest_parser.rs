//! Fuzz target for the Maven and Ivy manifest parsers.
//!
//! Goal: neither parser may panic on any input. Errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_manifest_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = libdrift_repo::fuzz::parse_maven(data);
    let _ = libdrift_repo::fuzz::parse_ivy(data);
});
