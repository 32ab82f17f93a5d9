//! Envelope PDU assembly and disassembly.
//!
//! Envelopes travel from the handset to the SIM and are wrapped in a
//! kind-specific outer tag (0xD3 through 0xD7) followed by a BER
//! length. The proactive command tag 0xD0 is rejected here so that a
//! command PDU handed to the wrong decoder fails loudly instead of
//! producing a bogus envelope.

use crate::codec::{
    read_ber_length, write_ber_length, CodecError, Decodable, Encodable, EncodeOptions,
    ExtensionData, Tlv, PROACTIVE_COMMAND_TAG,
};
use crate::datatypes::device::Device;
use crate::datatypes::duration::{decode_timer, encode_timer};
use bytes::{Buf, BufMut, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::io::Cursor;
use tracing::warn;

/// Kind of envelope, from the outer tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    MenuSelection,
    CallControl,
    MoSmsControl,
    EventDownload,
    TimerExpiration,
    Unknown(u8),
}

impl EnvelopeKind {
    pub fn from_byte(value: u8) -> EnvelopeKind {
        match value {
            0xD3 => EnvelopeKind::MenuSelection,
            0xD4 => EnvelopeKind::CallControl,
            0xD5 => EnvelopeKind::MoSmsControl,
            0xD6 => EnvelopeKind::EventDownload,
            0xD7 => EnvelopeKind::TimerExpiration,
            other => EnvelopeKind::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            EnvelopeKind::MenuSelection => 0xD3,
            EnvelopeKind::CallControl => 0xD4,
            EnvelopeKind::MoSmsControl => 0xD5,
            EnvelopeKind::EventDownload => 0xD6,
            EnvelopeKind::TimerExpiration => 0xD7,
            EnvelopeKind::Unknown(raw) => raw,
        }
    }
}

/// Event codes for EventDownload envelopes (GSM 11.14 section 12.25).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Event {
    MtCall = 0x00,
    CallConnected = 0x01,
    CallDisconnected = 0x02,
    LocationStatus = 0x03,
    UserActivity = 0x04,
    IdleScreen = 0x05,
    CardReaderStatus = 0x06,
    LanguageSelection = 0x07,
    BrowserTermination = 0x08,
    DataAvailable = 0x09,
    ChannelStatus = 0x0A,
}

/// An envelope from the handset to the SIM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub source_device: Device,
    /// Event being reported, for EventDownload envelopes.
    pub event: Option<Event>,
    /// Selected menu item, for MenuSelection envelopes.
    pub menu_item: u8,
    /// The user asked for help on the item instead of selecting it.
    pub request_help: bool,
    pub extension: ExtensionData,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            kind: EnvelopeKind::MenuSelection,
            source_device: Device::Me,
            event: None,
            menu_item: 0,
            request_help: false,
            extension: ExtensionData::new(),
        }
    }
}

impl Envelope {
    pub fn new(kind: EnvelopeKind) -> Self {
        Envelope {
            kind,
            ..Envelope::default()
        }
    }

    /// A menu selection envelope, sourced from the keypad as the
    /// conformance suites expect.
    pub fn menu_selection(menu_item: u8) -> Self {
        Envelope {
            kind: EnvelopeKind::MenuSelection,
            source_device: Device::Keypad,
            menu_item,
            ..Envelope::default()
        }
    }

    /// Timer identifier of a TimerExpiration envelope.
    pub fn timer_id(&self) -> Option<u8> {
        self.extension.field(0x24).and_then(|v| v.first().copied())
    }

    /// Timer value of a TimerExpiration envelope as (hour, minute,
    /// second).
    pub fn timer_value(&self) -> Option<(u8, u8, u8)> {
        self.extension.field(0x25).and_then(decode_timer)
    }

    /// Populate the timer fields of a TimerExpiration envelope.
    pub fn set_timer(&mut self, id: u8, hour: u8, minute: u8, second: u8) {
        self.extension.push(0xA4, vec![id]);
        self.extension
            .push(0xA5, encode_timer(hour, minute, second).to_vec());
    }
}

impl Decodable for Envelope {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if !buf.has_remaining() {
            return Err(CodecError::MalformedTlv("empty PDU"));
        }
        let outer = buf.get_u8();
        if outer == PROACTIVE_COMMAND_TAG {
            return Err(CodecError::UnexpectedOuterTag(outer));
        }
        let kind = EnvelopeKind::from_byte(outer);
        if let EnvelopeKind::Unknown(raw) = kind {
            warn!("unknown envelope tag: {raw:#04x}");
        }
        let length = read_ber_length(buf)?;
        if buf.remaining() < length {
            return Err(CodecError::MalformedTlv("value shorter than declared length"));
        }
        let data: &[u8] = *buf.get_ref();
        let body_start = buf.position() as usize;
        let body = &data[body_start..body_start + length];
        buf.advance(length);

        let mut env = Envelope::new(kind);
        // Unknown kinds keep every field verbatim so they re-encode
        // exactly; nothing is lifted out.
        if matches!(kind, EnvelopeKind::Unknown(_)) {
            env.extension = Tlv::decode_sequence(&mut Cursor::new(body))?
                .into_iter()
                .collect();
            return Ok(env);
        }
        for unit in Tlv::decode_sequence(&mut Cursor::new(body))? {
            let v = unit.value.as_slice();
            match unit.field_tag() {
                0x02 => {
                    if v.len() < 2 {
                        return Err(CodecError::MalformedTlv("short device identities"));
                    }
                    env.source_device = Device::from_byte(v[0]);
                }
                0x19 => match v.first().and_then(|&b| Event::try_from(b).ok()) {
                    Some(event) => env.event = Some(event),
                    // Unassigned event codes stay raw for round-trip.
                    None => env.extension.push(unit.tag, unit.value),
                },
                0x10 => {
                    if !v.is_empty() {
                        env.menu_item = v[0];
                    }
                }
                0x15 => env.request_help = true,
                _ => env.extension.push(unit.tag, unit.value),
            }
        }
        Ok(env)
    }
}

impl Encodable for Envelope {
    fn encode(&self, buf: &mut BytesMut, _options: EncodeOptions) {
        let mut body = BytesMut::new();
        match self.kind {
            EnvelopeKind::MenuSelection => {
                body.put_u8(0x82);
                body.put_u8(0x02);
                body.put_u8(self.source_device.to_byte());
                body.put_u8(Device::Sim.to_byte());
                body.put_u8(0x90);
                body.put_u8(0x01);
                body.put_u8(self.menu_item);
                if self.request_help {
                    body.put_u8(0x15);
                    body.put_u8(0x00);
                }
                self.extension.encode(&mut body);
            }
            EnvelopeKind::EventDownload => {
                // Some SIMs send the event list with tag 0x19, but 0x99
                // is what the conformance suite accepts back.
                if let Some(event) = self.event {
                    body.put_u8(0x99);
                    body.put_u8(0x01);
                    body.put_u8(event.into());
                }
                body.put_u8(0x82);
                body.put_u8(0x02);
                body.put_u8(self.source_device.to_byte());
                body.put_u8(Device::Sim.to_byte());
                self.extension.encode(&mut body);
            }
            EnvelopeKind::CallControl
            | EnvelopeKind::MoSmsControl
            | EnvelopeKind::TimerExpiration => {
                body.put_u8(0x82);
                body.put_u8(0x02);
                body.put_u8(self.source_device.to_byte());
                body.put_u8(Device::Sim.to_byte());
                self.extension.encode(&mut body);
            }
            EnvelopeKind::Unknown(_) => {
                self.extension.encode(&mut body);
            }
        }
        buf.put_u8(self.kind.to_byte());
        write_ber_length(buf, body.len());
        buf.put_slice(&body);
    }
}
