//! Text field codecs shared by the PDU assemblers.
//!
//! Three character encodings appear on the wire: packed 7-bit GSM
//! (fourteen septets to twelve bytes and change), unpacked 8-bit GSM
//! (one septet value per byte), and UCS-2 big-endian. Scheme-tagged
//! text strings carry a data coding scheme byte in front of the body;
//! EFADN-coded strings instead signal UCS-2 with an 0x80/0x81/0x82
//! prefix byte as in GSM 11.11 annex B.

use crate::codec::{write_ber_length, EncodeOptions};
use bytes::{BufMut, BytesMut};

/// Data coding scheme bits for packed 7-bit GSM text.
pub const SCHEME_7BIT: u8 = 0x00;
/// Data coding scheme bits for unpacked 8-bit GSM text.
pub const SCHEME_8BIT: u8 = 0x04;
/// Data coding scheme bits for UCS-2 big-endian text.
pub const SCHEME_UCS2: u8 = 0x08;

/// GSM 03.38 default alphabet, septet value to Unicode. Position 0x1B
/// is the escape to the extension table and never maps directly.
const BASIC_TO_CHAR: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1B}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

/// GSM 03.38 extension table, reached through the 0x1B escape septet.
const EXTENSION_TO_CHAR: [(u8, char); 10] = [
    (0x0A, '\u{0C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

const ESCAPE: u8 = 0x1B;

/// Map one septet from the basic table.
fn basic_to_char(septet: u8) -> char {
    BASIC_TO_CHAR[(septet & 0x7F) as usize]
}

/// Map a Unicode character to the GSM alphabet. Values below 0x80 are a
/// single septet; values 0x1Bxx are an escape followed by an extension
/// septet. None when the character has no GSM representation.
fn char_to_gsm(ch: char) -> Option<u16> {
    if ch == '\u{1B}' {
        return None;
    }
    if let Some(septet) = BASIC_TO_CHAR.iter().position(|&c| c == ch) {
        return Some(septet as u16);
    }
    EXTENSION_TO_CHAR
        .iter()
        .find(|&&(_, c)| c == ch)
        .map(|&(septet, _)| 0x1B00 | septet as u16)
}

/// Whether every character of `s` is representable in the GSM alphabet.
pub fn gsm_encodable(s: &str) -> bool {
    s.chars().all(|ch| char_to_gsm(ch).is_some())
}

/// Encode to unpacked 8-bit GSM, one septet value per byte. None when
/// some character is outside the alphabet.
pub fn encode_unpacked(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let code = char_to_gsm(ch)?;
        if code >= 0x100 {
            out.push(ESCAPE);
            out.push((code & 0x7F) as u8);
        } else {
            out.push(code as u8);
        }
    }
    Some(out)
}

/// Decode unpacked 8-bit GSM, honouring extension-table escapes.
pub fn decode_unpacked(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut escaped = false;
    for &byte in bytes {
        let septet = byte & 0x7F;
        if escaped {
            escaped = false;
            match EXTENSION_TO_CHAR.iter().find(|&&(s, _)| s == septet) {
                Some(&(_, ch)) => out.push(ch),
                // Unassigned escape pairs display as the bare character.
                None => out.push(basic_to_char(septet)),
            }
        } else if septet == ESCAPE {
            escaped = true;
        } else {
            out.push(basic_to_char(septet));
        }
    }
    out
}

/// Pack into the 7-bit GSM alphabet, septets filled LSB first. None
/// when some character is outside the alphabet.
pub fn pack_septets(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut bits: u32 = 0;
    let mut bit_count = 0;
    let mut push_septet = |septet: u8, out: &mut Vec<u8>| {
        bits |= (septet as u32 & 0x7F) << bit_count;
        bit_count += 7;
        while bit_count >= 8 {
            out.push((bits & 0xFF) as u8);
            bits >>= 8;
            bit_count -= 8;
        }
    };
    for ch in s.chars() {
        let code = char_to_gsm(ch)?;
        if code >= 0x100 {
            push_septet(ESCAPE, &mut out);
            push_septet((code & 0x7F) as u8, &mut out);
        } else {
            push_septet(code as u8, &mut out);
        }
    }
    if bit_count > 0 {
        out.push((bits & 0xFF) as u8);
    }
    Some(out)
}

/// Unpack 7-bit GSM text. A carriage return in the final septet of an
/// exactly filled last byte is padding and is stripped.
pub fn unpack_septets(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut bits: u32 = 0;
    let mut bit_count = 0;
    let mut escaped = false;
    for &byte in bytes {
        bits |= (byte as u32) << bit_count;
        bit_count += 8;
        while bit_count >= 7 {
            let septet = (bits & 0x7F) as u8;
            bits >>= 7;
            bit_count -= 7;
            if escaped {
                escaped = false;
                match EXTENSION_TO_CHAR.iter().find(|&&(s, _)| s == septet) {
                    Some(&(_, ch)) => out.push(ch),
                    None => out.push(basic_to_char(septet)),
                }
            } else if septet == ESCAPE {
                escaped = true;
            } else {
                out.push(basic_to_char(septet));
            }
        }
    }
    if bit_count == 0 && out.ends_with('\r') {
        out.pop();
    }
    out
}

/// Encode to UCS-2 big-endian code units.
pub fn encode_ucs2(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// Decode UCS-2 big-endian code units. A trailing odd byte is ignored.
pub fn decode_ucs2(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Decode an EFADN-coded string: 0x80 introduces UCS-2, 0x81 and 0x82
/// introduce the half-page and full-page shorthand forms, anything else
/// is unpacked GSM with trailing 0xFF padding stripped.
pub fn decode_efadn(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    match bytes[0] {
        0x80 => {
            let units: Vec<u16> = bytes[1..]
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .filter(|&unit| unit != 0xFFFF)
                .collect();
            String::from_utf16_lossy(&units)
        }
        0x81 if bytes.len() >= 3 => {
            let count = bytes[1] as usize;
            let page = (bytes[2] as u32) << 7;
            decode_paged(&bytes[3..], count, page)
        }
        0x82 if bytes.len() >= 4 => {
            let count = bytes[1] as usize;
            let page = ((bytes[2] as u32) << 8) | bytes[3] as u32;
            decode_paged(&bytes[4..], count, page)
        }
        _ => {
            let mut len = bytes.len();
            while len > 0 && bytes[len - 1] == 0xFF {
                len -= 1;
            }
            decode_unpacked(&bytes[..len])
        }
    }
}

fn decode_paged(bytes: &[u8], count: usize, page: u32) -> String {
    bytes
        .iter()
        .take(count)
        .map(|&byte| {
            if byte < 0x80 {
                basic_to_char(byte)
            } else {
                char::from_u32(page + (byte & 0x7F) as u32).unwrap_or('\u{FFFD}')
            }
        })
        .collect()
}

/// Decode a scheme-tagged text string: the first byte carries the data
/// coding scheme, the rest is the body in that scheme.
pub fn decode_coded_string(value: &[u8]) -> String {
    if value.is_empty() {
        return String::new();
    }
    let body = &value[1..];
    match value[0] & 0x0C {
        SCHEME_7BIT => unpack_septets(body),
        SCHEME_UCS2 => decode_ucs2(body),
        _ => decode_efadn(body),
    }
}

/// Write a scheme-tagged text string TLV.
///
/// The low byte of `tag` is the tag on the wire; the high byte is OR-ed
/// into the scheme byte, which lets USSD strings carry their class bits.
pub fn write_text_string(buf: &mut BytesMut, s: &str, options: EncodeOptions, tag: u16) {
    let tag_byte = (tag & 0xFF) as u8;
    let scheme_mask = (tag >> 8) as u8;
    if s.is_empty() && !options.contains(EncodeOptions::ENCODE_EMPTY_STRINGS) {
        buf.put_u8(tag_byte);
        buf.put_u8(0x00);
        return;
    }
    if !options.contains(EncodeOptions::UCS2_STRINGS) && gsm_encodable(s) {
        if options.contains(EncodeOptions::PACKED_STRINGS) {
            let packed = pack_septets(s).unwrap_or_default();
            buf.put_u8(tag_byte);
            write_ber_length(buf, packed.len() + 1);
            buf.put_u8(SCHEME_7BIT | scheme_mask);
            buf.put_slice(&packed);
        } else {
            let unpacked = encode_unpacked(s).unwrap_or_default();
            buf.put_u8(tag_byte);
            write_ber_length(buf, unpacked.len() + 1);
            buf.put_u8(SCHEME_8BIT | scheme_mask);
            buf.put_slice(&unpacked);
        }
    } else {
        let ucs2 = encode_ucs2(s);
        buf.put_u8(tag_byte);
        write_ber_length(buf, ucs2.len() + 1);
        buf.put_u8(SCHEME_UCS2 | scheme_mask);
        buf.put_slice(&ucs2);
    }
}

/// Write an EFADN-coded string TLV. With `tag` of None only the coded
/// body is written, for callers that splice it into a larger field.
pub fn write_efadn(buf: &mut BytesMut, s: &str, options: EncodeOptions, tag: Option<u8>) {
    let body = if !options.contains(EncodeOptions::UCS2_STRINGS) && gsm_encodable(s) {
        encode_unpacked(s).unwrap_or_default()
    } else {
        let mut ucs2 = Vec::with_capacity(s.len() * 2 + 1);
        ucs2.push(0x80);
        ucs2.extend_from_slice(&encode_ucs2(s));
        ucs2
    };
    match tag {
        Some(tag_byte) => {
            buf.put_u8(tag_byte);
            write_ber_length(buf, body.len());
            buf.put_slice(&body);
        }
        None => buf.put_slice(&body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_hello() {
        assert_eq!(
            pack_septets("hello").unwrap(),
            vec![0xE8, 0x32, 0x9B, 0xFD, 0x06]
        );
    }

    #[test]
    fn unpack_hello() {
        assert_eq!(unpack_septets(&[0xE8, 0x32, 0x9B, 0xFD, 0x06]), "hello");
    }

    #[test]
    fn pack_strips_cr_padding() {
        // Eight septets fill seven bytes exactly, so a trailing CR in
        // that position reads back as padding.
        let packed = pack_septets("ABCDEFG\r").unwrap();
        assert_eq!(packed.len(), 7);
        assert_eq!(unpack_septets(&packed), "ABCDEFG");
    }

    #[test]
    fn euro_uses_escape_pair() {
        assert_eq!(encode_unpacked("€").unwrap(), vec![0x1B, 0x65]);
        assert_eq!(decode_unpacked(&[0x1B, 0x65]), "€");
        assert_eq!(pack_septets("€").unwrap(), vec![0x9B, 0x32]);
        assert_eq!(unpack_septets(&[0x9B, 0x32]), "€");
    }

    #[test]
    fn gsm_encodable_rejects_cyrillic() {
        assert!(gsm_encodable("Hello [world] €"));
        assert!(!gsm_encodable("Привет"));
    }

    #[test]
    fn ucs2_roundtrip() {
        let encoded = encode_ucs2("Привет");
        assert_eq!(encoded[0..2], [0x04, 0x1F]);
        assert_eq!(decode_ucs2(&encoded), "Привет");
    }

    #[test]
    fn efadn_plain_gsm_with_padding() {
        assert_eq!(decode_efadn(&[0x48, 0x69, 0xFF, 0xFF]), "Hi");
    }

    #[test]
    fn efadn_ucs2_skips_fill_words() {
        assert_eq!(decode_efadn(&[0x80, 0x04, 0x10, 0xFF, 0xFF, 0x04, 0x11]), "АБ");
    }

    #[test]
    fn efadn_half_page_form() {
        // Page base 0x13 << 7 = 0x0980; 0x95 maps into the page, 0x53
        // stays in the GSM basic table.
        assert_eq!(decode_efadn(&[0x81, 0x02, 0x13, 0x53, 0x95]), "S\u{995}");
    }

    #[test]
    fn efadn_full_page_form() {
        assert_eq!(decode_efadn(&[0x82, 0x02, 0x04, 0x00, 0x41, 0x90]), "A\u{410}");
    }

    #[test]
    fn coded_string_scheme_dispatch() {
        let mut packed = vec![SCHEME_7BIT];
        packed.extend_from_slice(&[0xE8, 0x32, 0x9B, 0xFD, 0x06]);
        assert_eq!(decode_coded_string(&packed), "hello");

        let unpacked = [SCHEME_8BIT, 0x48, 0x69];
        assert_eq!(decode_coded_string(&unpacked), "Hi");

        let ucs2 = [SCHEME_UCS2, 0x04, 0x1F];
        assert_eq!(decode_coded_string(&ucs2), "П");
    }

    #[test]
    fn write_text_string_empty_shorthand() {
        let mut buf = BytesMut::new();
        write_text_string(&mut buf, "", EncodeOptions::NONE, 0x8D);
        assert_eq!(buf.as_ref(), &[0x8D, 0x00]);
    }

    #[test]
    fn write_text_string_empty_full_form() {
        let mut buf = BytesMut::new();
        write_text_string(&mut buf, "", EncodeOptions::ENCODE_EMPTY_STRINGS, 0x8D);
        assert_eq!(buf.as_ref(), &[0x8D, 0x01, SCHEME_8BIT]);
    }

    #[test]
    fn write_text_string_unpacked() {
        let mut buf = BytesMut::new();
        write_text_string(&mut buf, "Hi", EncodeOptions::NONE, 0x8D);
        assert_eq!(buf.as_ref(), &[0x8D, 0x03, 0x04, 0x48, 0x69]);
    }

    #[test]
    fn write_text_string_packed_with_scheme_mask() {
        let mut buf = BytesMut::new();
        write_text_string(&mut buf, "hello", EncodeOptions::PACKED_STRINGS, 0xF08A);
        assert_eq!(
            buf.as_ref(),
            &[0x8A, 0x06, 0xF0, 0xE8, 0x32, 0x9B, 0xFD, 0x06]
        );
    }

    #[test]
    fn write_text_string_falls_back_to_ucs2() {
        let mut buf = BytesMut::new();
        write_text_string(&mut buf, "П", EncodeOptions::NONE, 0x8D);
        assert_eq!(buf.as_ref(), &[0x8D, 0x03, SCHEME_UCS2, 0x04, 0x1F]);
    }

    #[test]
    fn write_efadn_gsm_and_ucs2() {
        let mut buf = BytesMut::new();
        write_efadn(&mut buf, "Hi", EncodeOptions::NONE, Some(0x85));
        assert_eq!(buf.as_ref(), &[0x85, 0x02, 0x48, 0x69]);

        let mut buf = BytesMut::new();
        write_efadn(&mut buf, "П", EncodeOptions::NONE, Some(0x85));
        assert_eq!(buf.as_ref(), &[0x85, 0x03, 0x80, 0x04, 0x1F]);
    }

    #[test]
    fn write_efadn_raw_body() {
        let mut buf = BytesMut::new();
        write_efadn(&mut buf, "Item 1", EncodeOptions::NONE, None);
        assert_eq!(buf.as_ref(), b"Item 1".as_slice());
    }
}
