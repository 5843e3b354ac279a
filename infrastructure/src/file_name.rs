//! File names derived from conversation ids.
//!
//! Bytes outside `[a-z0-9_-]` are written as `%XX` (uppercase hex), so the
//! encoding is reversible: two different ids never share a file, even on a
//! case-insensitive filesystem, and no id can name a path outside its
//! directory.

use phasekeeper_domain::ConversationId;
use std::fmt::Write;

/// `<encoded id>.<extension>`
pub fn conversation_file_name(id: &ConversationId, extension: &str) -> String {
    let mut name = encode(id.as_str());
    if name.is_empty() {
        // Never produced by a non-empty id, since every '%' is followed by hex
        name.push('%');
    }
    name.push('.');
    name.push_str(extension);
    name
}

fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || matches!(byte, b'-' | b'_') {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{:02X}", byte);
        }
    }
    out
}
