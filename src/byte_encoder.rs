//! The GPT-2/RoBERTa byte-to-visible-unicode table (level 3). Direct port of
//! `OpenAI`'s `bytes_to_unicode()`, reshaped into a 256-entry array so the
//! mapping is built once and indexed by raw byte value.

use std::sync::OnceLock;

const PRINTABLE_RANGES: [(u32, u32); 3] = [(0x21, 0x7E), (0xA1, 0xAC), (0xAE, 0xFF)];

fn is_printable(byte: u32) -> bool {
    PRINTABLE_RANGES.iter().any(|(lo, hi)| byte >= *lo && byte <= *hi)
}

fn build_table() -> [char; 256] {
    let mut table = ['\0'; 256];
    let mut next_overflow_point = 256u32;

    for byte in 0u32..256 {
        let code_point = if is_printable(byte) {
            byte
        } else {
            let cp = next_overflow_point;
            next_overflow_point += 1;
            cp
        };
        table[byte as usize] = char::from_u32(code_point).expect("code points stay within [0, 0x143]");
    }

    table
}

/// The 256-entry byte → visible-unicode table, built once.
pub fn table() -> &'static [char; 256] {
    static TABLE: OnceLock<[char; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let table = build_table();
        crate::invariants::assert_byte_table_well_formed(&table);
        table
    })
}

/// The inverse mapping, built once, used only in tests to verify the
/// round-trip property (the classification pipeline itself never decodes).
pub fn reverse_table() -> &'static std::collections::HashMap<char, u8> {
    static REVERSE: OnceLock<std::collections::HashMap<char, u8>> = OnceLock::new();
    REVERSE.get_or_init(|| {
        table()
            .iter()
            .enumerate()
            .map(|(byte, &ch)| (ch, byte as u8))
            .collect()
    })
}

/// Encodes a level-2 token's UTF-8 bytes through the byte-to-unicode table,
/// concatenating the results. Output length in chars == input UTF-8 byte length.
pub fn encode(token: &str) -> String {
    let t = table();
    token.bytes().map(|b| t[b as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_maps_to_code_point_288() {
        assert_eq!(table()[0x20] as u32, 288);
    }

    #[test]
    fn printable_ascii_maps_to_itself() {
        assert_eq!(table()[0x41], 'A');
    }

    #[test]
    fn all_256_outputs_are_distinct() {
        let t = table();
        let unique: std::collections::HashSet<char> = t.iter().copied().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn no_output_is_whitespace_or_control() {
        for &c in table().iter() {
            assert!(!c.is_whitespace(), "{c:?} is whitespace");
            assert!(!c.is_control(), "{c:?} is control");
        }
    }

    #[test]
    fn encode_length_equals_utf8_byte_length() {
        let s = "héllo";
        assert_eq!(encode(s).chars().count(), s.len());
    }

    #[test]
    fn round_trips_through_reverse_table() {
        let s = "hello, world; \t\n";
        let encoded = encode(s);
        let decoded_bytes: Vec<u8> = encoded
            .chars()
            .map(|c| *reverse_table().get(&c).unwrap())
            .collect();
        assert_eq!(String::from_utf8(decoded_bytes).unwrap(), s);
    }
}
