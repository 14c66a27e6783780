//! Fuzz target for manifest format detection from a path.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_format_detection
//! ```

#![no_main]

use libdrift_types::RepoPath;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let path = RepoPath::new(text);
        if let Some(format) = libdrift_repo::detect_format(&path) {
            // Detection only ever answers for a file name it recognizes.
            assert!(path.file_name().is_some(), "{format} detected without a file name");
        }
    }
});
