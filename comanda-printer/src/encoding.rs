//! Code page conversion for Latin-script thermal printers
//!
//! Kitchen printers in this setup run with the WPC1252 code page
//! (Windows-1252), which covers the Spanish repertoire: accented vowels,
//! enye, inverted punctuation. This module converts UTF-8 ticket text to
//! that single-byte encoding.

/// Convert UTF-8 text to Windows-1252 bytes.
///
/// Characters with no Windows-1252 mapping are dropped, not substituted:
/// a ticket with a stray emoji must still print the rest of the line.
/// The whole-string `encoding_rs` encoder would instead insert HTML
/// numeric references for unmappables, which is the wrong behavior for a
/// raw printer stream, so conversion is done character by character.
pub fn convert_to_cp1252(s: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];

    for c in s.chars() {
        let encoded = c.encode_utf8(&mut buf);
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(encoded);
        if !had_errors {
            result.extend_from_slice(&bytes);
        }
    }

    result
}

/// Normalize line endings to bare LF.
///
/// ESC/POS printers treat LF as print-and-feed; CR pairs coming from
/// Windows-edited notes would otherwise double-feed or overprint.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(convert_to_cp1252("2 x Cafe"), b"2 x Cafe".to_vec());
    }

    #[test]
    fn test_spanish_repertoire() {
        // ñ = 0xF1, é = 0xE9, ¡ = 0xA1 in Windows-1252
        assert_eq!(convert_to_cp1252("ñ"), vec![0xF1]);
        assert_eq!(convert_to_cp1252("é"), vec![0xE9]);
        assert_eq!(convert_to_cp1252("¡"), vec![0xA1]);
    }

    #[test]
    fn test_unmappable_dropped() {
        assert_eq!(convert_to_cp1252("a🔥b"), b"ab".to_vec());
        // no numeric-reference leakage
        assert!(!convert_to_cp1252("🔥").iter().any(|&b| b == b'&'));
    }

    #[test]
    fn test_en_dash_maps() {
        // U+2013 is 0x96 in Windows-1252
        assert_eq!(convert_to_cp1252("–"), vec![0x96]);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }
}
