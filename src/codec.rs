// Comprehension-TLV codec core for SIM Toolkit PDUs (ETSI TS 102.223 / GSM 11.14).
//
// This module owns the wire-level primitives: BER length handling, the
// comprehension-required tag bit, ordered TLV sequences, and the
// Encodable/Decodable traits implemented by the PDU types in `datatypes`.
// Decoding is the only direction that can fail; encoding a well-formed
// in-memory object always succeeds.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use std::ops::BitOr;
use thiserror::Error;

/// Outer tag of a Proactive Command PDU ("Proactive SIM" BER wrapper).
pub const PROACTIVE_COMMAND_TAG: u8 = 0xD0;

/// Codec errors with context for debugging.
///
/// Unknown command kinds and device bytes are deliberately *not* errors:
/// they decode into `Unknown(raw)` variants so that unrecognized but
/// well-formed PDUs still round-trip byte-for-byte.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed TLV: {0}")]
    MalformedTlv(&'static str),

    #[error("unexpected outer tag: {0:#04x}")]
    UnexpectedOuterTag(u8),

    #[error("result byte {result_byte:#04x} disagrees with {cause_len} byte(s) of cause data")]
    ResultCauseMismatch { result_byte: u8, cause_len: usize },
}

/// Options that alter the encoded wire form of a PDU.
///
/// Options affect encoding only; decoding accepts every wire form
/// regardless of what the caller later chooses to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions(u8);

impl EncodeOptions {
    /// Default wire form.
    pub const NONE: EncodeOptions = EncodeOptions(0);
    /// Emit a zero-length text string in its full character-set form
    /// instead of the two-byte shorthand.
    pub const ENCODE_EMPTY_STRINGS: EncodeOptions = EncodeOptions(0x01);
    /// Encode text in the packed 7-bit GSM alphabet instead of the
    /// unpacked 8-bit GSM alphabet where possible.
    pub const PACKED_STRINGS: EncodeOptions = EncodeOptions(0x02);
    /// Encode text in UCS-2 even when the GSM alphabet could hold it.
    pub const UCS2_STRINGS: EncodeOptions = EncodeOptions(0x04);
    /// Omit the outermost 0xD0 BER wrapper around a proactive command.
    pub const NO_BER_WRAPPER: EncodeOptions = EncodeOptions(0x08);

    pub fn contains(self, other: EncodeOptions) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for EncodeOptions {
    type Output = EncodeOptions;

    fn bitor(self, rhs: EncodeOptions) -> EncodeOptions {
        EncodeOptions(self.0 | rhs.0)
    }
}

/// Read a BER length field: 0-127 direct, 0x81 + one byte, or
/// 0x82 + two bytes big-endian.
pub fn read_ber_length(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
    if !buf.has_remaining() {
        return Err(CodecError::MalformedTlv("truncated length"));
    }
    match buf.get_u8() {
        0x81 => {
            if !buf.has_remaining() {
                return Err(CodecError::MalformedTlv("truncated two-byte length"));
            }
            Ok(buf.get_u8() as usize)
        }
        0x82 => {
            if buf.remaining() < 2 {
                return Err(CodecError::MalformedTlv("truncated three-byte length"));
            }
            Ok(buf.get_u16() as usize)
        }
        n if n < 0x80 => Ok(n as usize),
        _ => Err(CodecError::MalformedTlv("invalid length-of-length prefix")),
    }
}

/// Write a BER length field in its shortest form.
pub fn write_ber_length(buf: &mut BytesMut, length: usize) {
    if length < 128 {
        buf.put_u8(length as u8);
    } else if length < 256 {
        buf.put_u8(0x81);
        buf.put_u8(length as u8);
    } else {
        buf.put_u8(0x82);
        buf.put_u16(length as u16);
    }
}

/// A single tag-length-value unit.
///
/// Bit 7 of the tag is the comprehension-required marker; the remaining
/// seven bits identify the field. Tag byte and value are preserved
/// exactly as read so that re-encoding an unmodified unit is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u8,
    pub value: Vec<u8>,
}

impl Tlv {
    pub fn new(tag: u8, value: impl Into<Vec<u8>>) -> Self {
        Tlv {
            tag,
            value: value.into(),
        }
    }

    /// The seven-bit field identifier, with the comprehension bit masked off.
    pub fn field_tag(&self) -> u8 {
        self.tag & 0x7F
    }

    /// Whether the receiver must understand this field to process the PDU.
    pub fn comprehension_required(&self) -> bool {
        (self.tag & 0x80) != 0
    }

    /// Decode one TLV unit at the cursor position.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Tlv, CodecError> {
        if !buf.has_remaining() {
            return Err(CodecError::MalformedTlv("truncated tag"));
        }
        let tag = buf.get_u8();
        let length = read_ber_length(buf)?;
        if buf.remaining() < length {
            return Err(CodecError::MalformedTlv("value shorter than declared length"));
        }
        let mut value = vec![0u8; length];
        buf.copy_to_slice(&mut value);
        Ok(Tlv { tag, value })
    }

    /// Decode TLV units until the buffer is exhausted, preserving order.
    pub fn decode_sequence(buf: &mut Cursor<&[u8]>) -> Result<Vec<Tlv>, CodecError> {
        let mut units = Vec::new();
        while buf.has_remaining() {
            units.push(Tlv::decode(buf)?);
        }
        Ok(units)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.tag);
        write_ber_length(buf, self.value.len());
        buf.put_slice(&self.value);
    }
}

/// Ordered collection of tag-keyed fields that were not promoted to a
/// typed accessor on the owning PDU.
///
/// Insertion order is preserved so that unknown fields re-encode in
/// their original relative positions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionData {
    fields: Vec<Tlv>,
}

impl ExtensionData {
    pub fn new() -> Self {
        ExtensionData::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, tag: u8, value: impl Into<Vec<u8>>) {
        self.fields.push(Tlv::new(tag, value));
    }

    /// Look up a field by its seven-bit tag; the comprehension bit of
    /// both the stored and requested tag is ignored.
    pub fn field(&self, tag: u8) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.field_tag() == (tag & 0x7F))
            .map(|f| f.value.as_slice())
    }

    /// Remove and return the first field matching the seven-bit tag.
    pub fn take(&mut self, tag: u8) -> Option<Tlv> {
        let index = self.fields.iter().position(|f| f.field_tag() == (tag & 0x7F))?;
        Some(self.fields.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tlv> {
        self.fields.iter()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        for field in &self.fields {
            field.encode(buf);
        }
    }
}

impl FromIterator<Tlv> for ExtensionData {
    fn from_iter<I: IntoIterator<Item = Tlv>>(iter: I) -> Self {
        ExtensionData {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Trait for PDU types that can be encoded to bytes.
pub trait Encodable {
    /// Encode this PDU into the buffer. Encoding is total: every typed
    /// field has a defined wire representation and extension fields are
    /// opaque bytes already.
    fn encode(&self, buf: &mut BytesMut, options: EncodeOptions);

    /// Convenience wrapper returning a freshly allocated byte sequence.
    fn to_bytes(&self, options: EncodeOptions) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf, options);
        buf.freeze()
    }
}

/// Trait for PDU types that can be decoded from bytes.
pub trait Decodable: Sized {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::decode(&mut Cursor::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ber_length_short_form() {
        let mut buf = BytesMut::new();
        write_ber_length(&mut buf, 0x45);
        assert_eq!(buf.as_ref(), &[0x45]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(read_ber_length(&mut cursor).unwrap(), 0x45);
    }

    #[test]
    fn ber_length_two_byte_form() {
        let mut buf = BytesMut::new();
        write_ber_length(&mut buf, 0x90);
        assert_eq!(buf.as_ref(), &[0x81, 0x90]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(read_ber_length(&mut cursor).unwrap(), 0x90);
    }

    #[test]
    fn ber_length_three_byte_form() {
        let mut buf = BytesMut::new();
        write_ber_length(&mut buf, 0x1234);
        assert_eq!(buf.as_ref(), &[0x82, 0x12, 0x34]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(read_ber_length(&mut cursor).unwrap(), 0x1234);
    }

    #[test]
    fn ber_length_truncated_prefix() {
        let data: &[u8] = &[0x81];
        let mut cursor = Cursor::new(data);
        assert!(matches!(
            read_ber_length(&mut cursor),
            Err(CodecError::MalformedTlv(_))
        ));
    }

    #[test]
    fn tlv_roundtrip() {
        let tlv = Tlv::new(0x8D, vec![0x04, b'h', b'i']);
        let mut buf = BytesMut::new();
        tlv.encode(&mut buf);
        assert_eq!(buf.as_ref(), &[0x8D, 0x03, 0x04, b'h', b'i']);

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = Tlv::decode(&mut cursor).unwrap();
        assert_eq!(decoded, tlv);
        assert!(decoded.comprehension_required());
        assert_eq!(decoded.field_tag(), 0x0D);
    }

    #[test]
    fn tlv_truncated_value() {
        let data: &[u8] = &[0x8D, 0x05, 0x04, b'h'];
        let mut cursor = Cursor::new(data);
        assert!(matches!(
            Tlv::decode(&mut cursor),
            Err(CodecError::MalformedTlv(_))
        ));
    }

    #[test]
    fn tlv_sequence_preserves_order() {
        let data: &[u8] = &[0x95, 0x01, 0xAA, 0x05, 0x02, 0x01, 0x02, 0x83, 0x01, 0x00];
        let mut cursor = Cursor::new(data);
        let seq = Tlv::decode_sequence(&mut cursor).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].tag, 0x95);
        assert_eq!(seq[1].tag, 0x05);
        assert_eq!(seq[2].tag, 0x83);
    }

    #[test]
    fn extension_data_field_lookup_ignores_comprehension_bit() {
        let mut ext = ExtensionData::new();
        ext.push(0x8B, vec![0x01, 0x02]);
        assert_eq!(ext.field(0x0B), Some(&[0x01, 0x02][..]));
        assert_eq!(ext.field(0x8B), Some(&[0x01, 0x02][..]));
        assert_eq!(ext.field(0x0C), None);
    }

    #[test]
    fn extension_data_take_removes_field() {
        let mut ext = ExtensionData::new();
        ext.push(0x87, vec![0x01]);
        ext.push(0x8B, vec![0x02]);
        let taken = ext.take(0x07).unwrap();
        assert_eq!(taken.tag, 0x87);
        assert_eq!(ext.field(0x07), None);
        assert_eq!(ext.field(0x0B), Some(&[0x02][..]));
    }

    #[test]
    fn encode_options_combine() {
        let opts = EncodeOptions::PACKED_STRINGS | EncodeOptions::ENCODE_EMPTY_STRINGS;
        assert!(opts.contains(EncodeOptions::PACKED_STRINGS));
        assert!(opts.contains(EncodeOptions::ENCODE_EMPTY_STRINGS));
        assert!(!opts.contains(EncodeOptions::UCS2_STRINGS));
    }
}
