//! Duration TLVs and reversed-BCD timer values.

use bytes::{BufMut, BytesMut};

/// Convert a decoded duration TLV body (unit byte + count) into
/// milliseconds. Unknown unit bytes fall back to minutes.
pub fn duration_to_millis(unit: u8, count: u8) -> u32 {
    let multiplier = match unit {
        0x02 => 100,
        0x01 => 1_000,
        _ => 60_000,
    };
    multiplier * count as u32
}

/// Write a duration TLV (tag 0x84) for the given number of
/// milliseconds, choosing the finest unit that represents the value
/// exactly. Values beyond 255 minutes clamp to 255 minutes; zero writes
/// nothing at all.
pub fn write_duration(buf: &mut BytesMut, millis: u32) {
    if millis == 0 {
        return;
    }
    buf.put_u8(0x84);
    buf.put_u8(0x02);
    if millis % 1_000 != 0 && millis <= 25_500 {
        buf.put_u8(0x02);
        buf.put_u8((millis / 100) as u8);
    } else if millis % 60_000 != 0 && millis <= 255_000 {
        buf.put_u8(0x01);
        buf.put_u8((millis / 1_000) as u8);
    } else if millis <= 255 * 60_000 {
        buf.put_u8(0x00);
        buf.put_u8((millis / 60_000) as u8);
    } else {
        buf.put_u8(0x00);
        buf.put_u8(0xFF);
    }
}

/// Encode a timer value as three reversed-BCD bytes, hour then minute
/// then second, with the tens digit in the low nibble.
pub fn encode_timer(hour: u8, minute: u8, second: u8) -> [u8; 3] {
    [reverse_bcd(hour), reverse_bcd(minute), reverse_bcd(second)]
}

/// Decode a three-byte reversed-BCD timer value.
pub fn decode_timer(bytes: &[u8]) -> Option<(u8, u8, u8)> {
    if bytes.len() != 3 {
        return None;
    }
    Some((
        unreverse_bcd(bytes[0]),
        unreverse_bcd(bytes[1]),
        unreverse_bcd(bytes[2]),
    ))
}

fn reverse_bcd(value: u8) -> u8 {
    (value / 10) | ((value % 10) << 4)
}

fn unreverse_bcd(value: u8) -> u8 {
    (value & 0x0F) * 10 + (value >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenths_of_seconds() {
        let mut buf = BytesMut::new();
        write_duration(&mut buf, 2_500);
        assert_eq!(buf.as_ref(), &[0x84, 0x02, 0x02, 0x19]);
        assert_eq!(duration_to_millis(0x02, 0x19), 2_500);
    }

    #[test]
    fn whole_seconds() {
        let mut buf = BytesMut::new();
        write_duration(&mut buf, 10_000);
        assert_eq!(buf.as_ref(), &[0x84, 0x02, 0x01, 0x0A]);
        assert_eq!(duration_to_millis(0x01, 0x0A), 10_000);
    }

    #[test]
    fn whole_minutes() {
        let mut buf = BytesMut::new();
        write_duration(&mut buf, 120_000);
        assert_eq!(buf.as_ref(), &[0x84, 0x02, 0x00, 0x02]);
        assert_eq!(duration_to_millis(0x00, 0x02), 120_000);
    }

    #[test]
    fn overlong_duration_clamps() {
        let mut buf = BytesMut::new();
        write_duration(&mut buf, 300 * 60_000);
        assert_eq!(buf.as_ref(), &[0x84, 0x02, 0x00, 0xFF]);
    }

    #[test]
    fn zero_duration_writes_nothing() {
        let mut buf = BytesMut::new();
        write_duration(&mut buf, 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn timer_value_bcd() {
        assert_eq!(encode_timer(0, 5, 0), [0x00, 0x50, 0x00]);
        assert_eq!(encode_timer(1, 23, 45), [0x10, 0x32, 0x54]);
        assert_eq!(decode_timer(&[0x10, 0x32, 0x54]), Some((1, 23, 45)));
        assert_eq!(decode_timer(&[0x00, 0x50]), None);
    }
}
