//! Repository path construction for wiki2git
//!
//! Page titles can contain any Unicode text, but the paths written into the
//! fast-import stream must be safe for every filesystem and for git itself.
//! The encoding used here keeps `[A-Za-z0-9_]` bytes as-is and replaces any
//! other byte with `.` followed by its two-digit uppercase hex value, so the
//! mapping is total, deterministic, and reversible.
//!
//! Encoded titles are spread across a shallow directory tree ("deepness")
//! derived from the title's leading bytes, which bounds per-directory fan-out
//! on exports with millions of pages.

/// File extension appended to every generated page path.
pub const FILE_EXTENSION: &str = ".mediawiki";

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Append the encoded form of a single byte to `out`.
///
/// Safe bytes are appended unchanged; anything else becomes `.XX` with
/// uppercase hex digits.
pub fn encode_byte(byte: u8, out: &mut String) {
    if is_safe(byte) {
        out.push(byte as char);
    } else {
        out.push('.');
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
}

/// Encode arbitrary text into a filesystem-safe path segment.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        encode_byte(byte, &mut out);
    }
    out
}

/// Decode a segment produced by [`encode`] back into its original bytes.
///
/// Returns `None` if the input is not a valid encoding (a stray `.`, a
/// lowercase or non-hex digit, or a byte outside the safe set).
pub fn decode(encoded: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded.len());
    let mut bytes = encoded.bytes();
    while let Some(byte) = bytes.next() {
        if byte == b'.' {
            let hi = hex_value(bytes.next()?)?;
            let lo = hex_value(bytes.next()?)?;
            out.push((hi << 4) | lo);
        } else if is_safe(byte) {
            out.push(byte);
        } else {
            return None;
        }
    }
    Some(out)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Build the repository path for one page revision.
///
/// The path starts with a numeric flag token (bit 0 = minor edit, bit 1 =
/// anonymous author; bit 2 is reserved for a deletion flag and never set)
/// and the encoded namespace, then `deepness` one-character directory
/// levels taken from the title's leading bytes (fewer if the title is
/// shorter), then the fully encoded title with [`FILE_EXTENSION`].
pub fn file_path(
    title: &str,
    namespace: &str,
    is_minor: bool,
    is_anonymous: bool,
    deepness: u32,
) -> String {
    let mut flags = 0u32;
    if is_minor {
        flags |= 1;
    }
    if is_anonymous {
        flags |= 2;
    }

    let mut path = String::new();
    path.push_str(&flags.to_string());
    path.push('-');
    path.push_str(&encode(namespace));
    path.push('/');
    for byte in title.bytes().take(deepness as usize) {
        encode_byte(byte, &mut path);
        path.push('/');
    }
    path.push_str(&encode(title));
    path.push_str(FILE_EXTENSION);
    path
}
