//! Icon identifier TLVs.
//!
//! The icon qualifier byte inverts the obvious sense: 0x00 means the
//! icon is self-explanatory and replaces the text, 0x01 means it
//! accompanies the text.

use bytes::{BufMut, BytesMut};

/// Write an icon identifier TLV. Comprehension is required (tag 0x9E)
/// when the command cannot be performed without understanding the icon.
/// An icon id of zero means no icon and writes nothing.
pub fn write_icon(buf: &mut BytesMut, icon_id: u32, self_explanatory: bool, mandatory: bool) {
    if icon_id == 0 {
        return;
    }
    buf.put_u8(if mandatory { 0x9E } else { 0x1E });
    buf.put_u8(0x02);
    buf.put_u8(if self_explanatory { 0x00 } else { 0x01 });
    buf.put_u8(icon_id as u8);
}

/// Decode an icon identifier body: qualifier byte then icon id.
pub fn decode_icon(value: &[u8]) -> Option<(u32, bool)> {
    if value.len() < 2 {
        return None;
    }
    Some((value[1] as u32, (value[0] & 0x01) == 0))
}

/// Write an item icon list TLV (tag 0x9F): qualifier byte then one
/// icon id per menu item.
pub fn write_item_icons(buf: &mut BytesMut, ids: &[u32], self_explanatory: bool) {
    if ids.iter().all(|&id| id == 0) {
        return;
    }
    buf.put_u8(0x9F);
    buf.put_u8((ids.len() + 1) as u8);
    buf.put_u8(if self_explanatory { 0x00 } else { 0x01 });
    for &id in ids {
        buf.put_u8(id as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandatory_icon() {
        let mut buf = BytesMut::new();
        write_icon(&mut buf, 3, true, true);
        assert_eq!(buf.as_ref(), &[0x9E, 0x02, 0x00, 0x03]);
        assert_eq!(decode_icon(&buf.as_ref()[2..]), Some((3u32, true)));
    }

    #[test]
    fn optional_icon_with_text() {
        let mut buf = BytesMut::new();
        write_icon(&mut buf, 1, false, false);
        assert_eq!(buf.as_ref(), &[0x1E, 0x02, 0x01, 0x01]);
        assert_eq!(decode_icon(&buf.as_ref()[2..]), Some((1u32, false)));
    }

    #[test]
    fn zero_icon_writes_nothing() {
        let mut buf = BytesMut::new();
        write_icon(&mut buf, 0, true, true);
        assert!(buf.is_empty());
    }

    #[test]
    fn item_icon_list() {
        let mut buf = BytesMut::new();
        write_item_icons(&mut buf, &[5, 6, 7], false);
        assert_eq!(buf.as_ref(), &[0x9F, 0x04, 0x01, 0x05, 0x06, 0x07]);
    }
}
