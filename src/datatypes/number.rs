//! Dialling numbers, DTMF strings and NSAP subaddresses.
//!
//! Numbers travel as BCD nibble pairs, low nibble first, padded with
//! 0xF. The extended digits *, #, p (pause), D (wild) and E map to
//! nibble values 0x0A through 0x0E as in GSM 11.11 section 10.5.1.

use crate::codec::write_ber_length;
use bytes::{BufMut, BytesMut};

/// Type-of-number byte for international numbers.
pub const TON_INTERNATIONAL: u8 = 145;
/// Default type-of-number byte for addresses in proactive commands.
pub const TON_UNKNOWN: u8 = 129;

const DIGITS: &[u8; 15] = b"0123456789*#pDE";

fn digit_to_nibble(ch: char) -> u8 {
    match ch {
        '0'..='9' => ch as u8 - b'0',
        '*' => 0x0A,
        '#' => 0x0B,
        'p' | 'P' | ',' => 0x0C,
        'D' | 'd' => 0x0D,
        'E' | 'e' => 0x0E,
        _ => 0x0A,
    }
}

/// Remove visual separators, keeping only the characters the BCD
/// encoder understands plus a leading `+`.
pub fn strip_number(number: &str) -> String {
    number
        .chars()
        .filter(|ch| matches!(ch, '0'..='9' | '*' | '#' | '+' | 'p' | 'P' | ',' | 'D' | 'd' | 'E' | 'e'))
        .collect()
}

/// Decode BCD digits, low nibble first, stopping at the 0xF filler.
pub fn decode_digits(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        for nibble in [byte & 0x0F, byte >> 4] {
            if nibble == 0x0F {
                return out;
            }
            out.push(DIGITS[nibble as usize] as char);
        }
    }
    out
}

fn put_digits(buf: &mut BytesMut, digits: &str) {
    let mut pending: Option<u8> = None;
    for ch in digits.chars() {
        let nibble = digit_to_nibble(ch);
        match pending.take() {
            None => pending = Some(nibble),
            Some(low) => buf.put_u8(low | (nibble << 4)),
        }
    }
    if let Some(low) = pending {
        buf.put_u8(low | 0xF0);
    }
}

/// Write a dialling number TLV. A leading `+` selects the international
/// type-of-number byte; the DTMF tag 0xAC carries no type byte at all.
pub fn write_number(buf: &mut BytesMut, number: &str, tag: u8, local_type: u8) {
    let stripped = strip_number(number);
    if tag == 0xAC {
        buf.put_u8(tag);
        write_ber_length(buf, stripped.len().div_ceil(2));
        put_digits(buf, &stripped);
    } else if let Some(rest) = stripped.strip_prefix('+') {
        buf.put_u8(tag);
        write_ber_length(buf, 1 + rest.len().div_ceil(2));
        buf.put_u8(TON_INTERNATIONAL);
        put_digits(buf, rest);
    } else {
        buf.put_u8(tag);
        write_ber_length(buf, 1 + stripped.len().div_ceil(2));
        buf.put_u8(local_type);
        put_digits(buf, &stripped);
    }
}

/// Decode an address field body: type-of-number byte then BCD digits.
pub fn decode_address(value: &[u8]) -> String {
    if value.is_empty() {
        return String::new();
    }
    let digits = decode_digits(&value[1..]);
    if value[0] == TON_INTERNATIONAL {
        format!("+{digits}")
    } else {
        digits
    }
}

/// Decode an NSAP subaddress body. The `0x80 0x50` prefix marks the
/// IA5 character encoding; anything else is not a text subaddress.
pub fn decode_subaddress(value: &[u8]) -> String {
    if value.len() < 2 || value[0] != 0x80 || value[1] != 0x50 {
        return String::new();
    }
    value[2..]
        .iter()
        .map(|&bcd| {
            let v = ((bcd >> 4) as u32) * 10 + (bcd & 0x0F) as u32 + 32;
            char::from_u32(v).unwrap_or('\u{FFFD}')
        })
        .collect()
}

/// Write an NSAP subaddress TLV (tag 0x88). Nothing is written for an
/// empty subaddress.
pub fn write_subaddress(buf: &mut BytesMut, subaddress: &str) {
    if subaddress.is_empty() {
        return;
    }
    buf.put_u8(0x88);
    write_ber_length(buf, subaddress.chars().count() + 2);
    buf.put_u8(0x80);
    buf.put_u8(0x50);
    for ch in subaddress.chars() {
        let mut v = ch as u32;
        v = if v < 32 || v > 32 + 127 { 0 } else { v - 32 };
        buf.put_u8((((v / 10) << 4) | (v % 10)) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_roundtrip() {
        let mut buf = BytesMut::new();
        put_digits(&mut buf, "01234567890*#pDE");
        assert_eq!(decode_digits(buf.as_ref()), "01234567890*#pDE");
    }

    #[test]
    fn odd_digit_count_padded() {
        let mut buf = BytesMut::new();
        put_digits(&mut buf, "123");
        assert_eq!(buf.as_ref(), &[0x21, 0xF3]);
        assert_eq!(decode_digits(buf.as_ref()), "123");
    }

    #[test]
    fn local_number_tlv() {
        let mut buf = BytesMut::new();
        write_number(&mut buf, "012340123456", 0x86, TON_UNKNOWN);
        assert_eq!(
            buf.as_ref(),
            &[0x86, 0x07, 0x81, 0x10, 0x32, 0x04, 0x21, 0x43, 0x65]
        );
    }

    #[test]
    fn international_number_tlv() {
        let mut buf = BytesMut::new();
        write_number(&mut buf, "+4412", 0x86, TON_UNKNOWN);
        assert_eq!(buf.as_ref(), &[0x86, 0x03, 0x91, 0x44, 0x21]);
        assert_eq!(decode_address(&buf.as_ref()[2..]), "+4412");
    }

    #[test]
    fn dtmf_tlv_has_no_type_byte() {
        let mut buf = BytesMut::new();
        write_number(&mut buf, "1p2", 0xAC, TON_UNKNOWN);
        assert_eq!(buf.as_ref(), &[0xAC, 0x02, 0xC1, 0xF2]);
        assert_eq!(decode_digits(&buf.as_ref()[2..]), "1p2");
    }

    #[test]
    fn formatting_stripped() {
        assert_eq!(strip_number("+44 (12) 34-56"), "+44123456");
    }

    #[test]
    fn subaddress_roundtrip() {
        let mut buf = BytesMut::new();
        write_subaddress(&mut buf, "A5");
        assert_eq!(buf.as_ref(), &[0x88, 0x04, 0x80, 0x50, 0x33, 0x21]);
        assert_eq!(decode_subaddress(&buf.as_ref()[2..]), "A5");
    }

    #[test]
    fn subaddress_rejects_wrong_prefix() {
        assert_eq!(decode_subaddress(&[0x12, 0x34]), "");
    }
}
