//! Terminal escape sequence stripping.
//!
//! Remote shells decorate their output with ANSI/VT escape sequences and
//! stray control characters. Lines are cleaned before they reach any
//! listener; protocol parsing never sees this function.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CSI sequences, OSC sequences (BEL- or ST-terminated, or running to
    // end of line), other two-byte ESC sequences, and the control codes
    // terminals commonly emit (BEL, BS, VT, FF, CR).
    static ref ESCAPES: Regex = Regex::new(
        r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)?|\x1b[@-_]|[\x07\x08\x0b\x0c\r]",
    )
    .expect("escape pattern is valid");
}

/// Remove terminal escape sequences and stray control characters.
///
/// Stateless and safe to call repeatedly; returns the input unchanged
/// (borrowed) when there is nothing to strip.
pub fn strip_escapes(line: &str) -> Cow<'_, str> {
    ESCAPES.replace_all(line, "")
}
