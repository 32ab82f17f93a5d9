//! Call control and MO SMS control result events.
//!
//! When the handset sends a CallControl or MoSmsControl envelope, the
//! SIM answers with a control event: a bare result byte, a BER length,
//! and an optional TLV payload. The event kind is not on the wire; the
//! caller knows it from the envelope it sent.

use crate::codec::{
    read_ber_length, write_ber_length, CodecError, Encodable, EncodeOptions, Tlv,
    ExtensionData,
};
use crate::datatypes::text::{decode_efadn, write_efadn};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

/// Which action the control event answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEventKind {
    Call,
    Sms,
}

/// The SIM's verdict on the requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlResult {
    Allowed,
    NotAllowed,
    AllowedWithModifications,
    Unknown(u8),
}

impl ControlResult {
    pub fn from_byte(value: u8) -> ControlResult {
        match value {
            0x00 => ControlResult::Allowed,
            0x01 => ControlResult::NotAllowed,
            0x02 => ControlResult::AllowedWithModifications,
            other => ControlResult::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ControlResult::Allowed => 0x00,
            ControlResult::NotAllowed => 0x01,
            ControlResult::AllowedWithModifications => 0x02,
            ControlResult::Unknown(raw) => raw,
        }
    }
}

/// A control event from the SIM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub kind: ControlEventKind,
    pub result: ControlResult,
    /// Alpha identifier to show the user while the modified action is
    /// performed.
    pub text: String,
    /// Modification payload: replacement address, capability
    /// configuration and the like.
    pub extension: ExtensionData,
}

impl ControlEvent {
    pub fn new(kind: ControlEventKind, result: ControlResult) -> Self {
        ControlEvent {
            kind,
            result,
            text: String::new(),
            extension: ExtensionData::new(),
        }
    }

    /// Decode a control event. The kind comes from the envelope this
    /// event answers.
    pub fn from_pdu(kind: ControlEventKind, pdu: &[u8]) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(pdu);
        if !buf.has_remaining() {
            return Err(CodecError::MalformedTlv("empty PDU"));
        }
        let result = ControlResult::from_byte(buf.get_u8());
        let length = read_ber_length(&mut buf)?;
        if buf.remaining() < length {
            return Err(CodecError::MalformedTlv("value shorter than declared length"));
        }
        let data: &[u8] = *buf.get_ref();
        let body_start = buf.position() as usize;
        let body = &data[body_start..body_start + length];

        let mut event = ControlEvent::new(kind, result);
        for unit in Tlv::decode_sequence(&mut Cursor::new(body))? {
            match unit.field_tag() {
                0x05 => event.text = decode_efadn(&unit.value),
                _ => event.extension.push(unit.tag, unit.value),
            }
        }
        Ok(event)
    }
}

impl Encodable for ControlEvent {
    fn encode(&self, buf: &mut BytesMut, options: EncodeOptions) {
        let mut body = BytesMut::new();
        if !self.text.is_empty() {
            write_efadn(&mut body, &self.text, options, Some(0x85));
        }
        self.extension.encode(&mut body);
        buf.put_u8(self.result.to_byte());
        write_ber_length(buf, body.len());
        buf.put_slice(&body);
    }
}
