//! Codec for SIM Application Toolkit signalling PDUs (ETSI TS 102.223,
//! GSM 11.14).
//!
//! Four PDU families are covered: proactive commands issued by the SIM,
//! terminal responses from the handset, envelopes carrying events and
//! selections back to the SIM, and the control events with which the
//! SIM answers call and MO SMS control requests. Decoding lifts the
//! fields the crate understands into typed structs and preserves
//! everything else as ordered extension fields, so unmodified PDUs
//! survive a decode/encode round trip byte-for-byte.
//!
//! # Examples
//!
//! ```
//! use stk::{decode_command, encode_command, CommandKind, EncodeOptions};
//!
//! let pdu = [
//!     0xD0, 0x1A, 0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x81, 0x02,
//!     0x8D, 0x0F, 0x04, 0x54, 0x6F, 0x6F, 0x6C, 0x6B, 0x69, 0x74, 0x20,
//!     0x54, 0x65, 0x73, 0x74, 0x20, 0x31,
//! ];
//! let cmd = decode_command(&pdu).unwrap();
//! assert_eq!(cmd.kind, CommandKind::DisplayText);
//! assert_eq!(cmd.text, "Toolkit Test 1");
//! assert_eq!(encode_command(&cmd, EncodeOptions::NONE).as_ref(), &pdu);
//! ```

pub mod codec;
pub mod datatypes;

pub use codec::{
    CodecError, Decodable, Encodable, EncodeOptions, ExtensionData, Tlv,
    PROACTIVE_COMMAND_TAG,
};
pub use datatypes::{
    result, Command, CommandKind, CommandSummary, ControlEvent, ControlEventKind,
    ControlResult, Device, Envelope, EnvelopeKind, Event, MenuItem, TerminalResponse,
    TextAttributes, Tone,
};

use bytes::Bytes;

/// Decode a proactive command PDU, with or without its 0xD0 wrapper.
pub fn decode_command(pdu: &[u8]) -> Result<Command, CodecError> {
    tracing::debug!("decoding proactive command ({} bytes)", pdu.len());
    Command::from_bytes(pdu)
}

/// Encode a proactive command PDU.
pub fn encode_command(command: &Command, options: EncodeOptions) -> Bytes {
    command.to_bytes(options)
}

/// Decode a terminal response PDU.
pub fn decode_terminal_response(pdu: &[u8]) -> Result<TerminalResponse, CodecError> {
    tracing::debug!("decoding terminal response ({} bytes)", pdu.len());
    TerminalResponse::from_bytes(pdu)
}

/// Encode a terminal response PDU.
pub fn encode_terminal_response(response: &TerminalResponse) -> Bytes {
    response.to_bytes(EncodeOptions::NONE)
}

/// Decode an envelope PDU.
pub fn decode_envelope(pdu: &[u8]) -> Result<Envelope, CodecError> {
    tracing::debug!("decoding envelope ({} bytes)", pdu.len());
    Envelope::from_bytes(pdu)
}

/// Encode an envelope PDU.
pub fn encode_envelope(envelope: &Envelope) -> Bytes {
    envelope.to_bytes(EncodeOptions::NONE)
}

/// Decode a call or MO SMS control event. The kind is supplied by the
/// caller since it is not carried on the wire.
pub fn decode_control_event(
    kind: ControlEventKind,
    pdu: &[u8],
) -> Result<ControlEvent, CodecError> {
    tracing::debug!("decoding {kind:?} control event ({} bytes)", pdu.len());
    ControlEvent::from_pdu(kind, pdu)
}

/// Encode a call or MO SMS control event.
pub fn encode_control_event(event: &ControlEvent) -> Bytes {
    event.to_bytes(EncodeOptions::NONE)
}
