//! Terminal response PDU assembly and disassembly.
//!
//! A terminal response is a bare TLV sequence with no outer wrapper:
//! command details echoed from the proactive command, device
//! identities, the result field, and any kind-specific payload.

use crate::codec::{
    write_ber_length, CodecError, Decodable, Encodable, EncodeOptions, ExtensionData, Tlv,
};
use crate::datatypes::command_kind::CommandKind;
use crate::datatypes::device::Device;
use crate::datatypes::duration::{duration_to_millis, write_duration};
use crate::datatypes::text::{decode_coded_string, write_text_string};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// Named result codes from GSM 11.14 section 12.12, plus composed
/// values that carry a one-byte cause.
pub mod result {
    pub const SUCCESS: u16 = 0x00;
    pub const PARTIAL_COMPREHENSION: u16 = 0x01;
    pub const MISSING_INFORMATION: u16 = 0x02;
    pub const REFRESH_PERFORMED: u16 = 0x03;
    pub const ICON_NOT_DISPLAYED: u16 = 0x04;
    pub const MODIFIED_CALL_CONTROL: u16 = 0x05;
    pub const LIMITED_SERVICE: u16 = 0x06;
    pub const WITH_MODIFICATION: u16 = 0x07;
    pub const SESSION_TERMINATED: u16 = 0x10;
    pub const BACKWARD_MOVE: u16 = 0x11;
    pub const NO_RESPONSE_FROM_USER: u16 = 0x12;
    pub const HELP_INFORMATION_REQUESTED: u16 = 0x13;
    pub const USSD_OR_SS_TERMINATED_BY_USER: u16 = 0x14;
    pub const ME_UNABLE_TO_PROCESS: u16 = 0x20;
    pub const NETWORK_UNABLE_TO_PROCESS: u16 = 0x21;
    pub const USER_DID_NOT_ACCEPT: u16 = 0x22;
    pub const USER_CLEARED_DOWN_CALL: u16 = 0x23;
    pub const ACTION_IN_CONTRADICTION_WITH_TIMER: u16 = 0x24;
    pub const TEMPORARY_CALL_CONTROL_PROBLEM: u16 = 0x25;
    pub const LAUNCH_BROWSER_ERROR: u16 = 0x26;
    pub const BEYOND_ME_CAPABILITIES: u16 = 0x30;
    pub const TYPE_NOT_UNDERSTOOD: u16 = 0x31;
    pub const DATA_NOT_UNDERSTOOD: u16 = 0x32;
    pub const NUMBER_NOT_UNDERSTOOD: u16 = 0x33;
    pub const SS_RETURN_ERROR: u16 = 0x34;
    pub const SMS_RP_ERROR: u16 = 0x35;
    pub const REQUIRED_VALUES_MISSING: u16 = 0x36;
    pub const USSD_RETURN_ERROR: u16 = 0x37;
    pub const MULTIPLE_CARD_ERROR: u16 = 0x38;
    pub const PERMANENT_CALL_CONTROL_PROBLEM: u16 = 0x39;
    pub const BEARER_INDEPENDENT_PROTOCOL_PROBLEM: u16 = 0x3A;

    /// ME unable to process: screen is busy.
    pub const SCREEN_IS_BUSY: u16 = 0x2001;
    /// Bearer independent protocol: channel closed.
    pub const CHANNEL_CLOSED: u16 = 0x3A02;
    /// Bearer independent protocol: channel identifier not valid.
    pub const CHANNEL_ID_NOT_VALID: u16 = 0x3A03;
}

/// Command details echoed back from the proactive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSummary {
    pub number: u8,
    pub kind: CommandKind,
    pub qualifier: u8,
}

impl Default for CommandSummary {
    fn default() -> Self {
        CommandSummary {
            number: 0,
            kind: CommandKind::Unknown(0),
            qualifier: 0,
        }
    }
}

/// Response from the handset to a proactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalResponse {
    pub command: CommandSummary,
    pub source_device: Device,
    pub destination_device: Device,
    /// Result code; values at 0x100 and above compose the result byte
    /// with a one-byte cause, e.g. `result::SCREEN_IS_BUSY` = 0x2001.
    pub result: u16,
    /// Full additional-information bytes of the result field. When
    /// `result` carries a cause this starts with that cause byte.
    pub cause_data: Vec<u8>,
    /// User input for GetInkey and GetInput; "Yes"/"No" in yes/no mode.
    pub text: String,
    /// Data coding scheme of the input, None when no text was present.
    pub data_coding_scheme: Option<u8>,
    /// Poll interval in milliseconds.
    pub duration: u32,
    /// Chosen item for SelectItem, zero for none.
    pub menu_item: u8,
    pub extension: ExtensionData,
}

impl Default for TerminalResponse {
    fn default() -> Self {
        TerminalResponse {
            command: CommandSummary::default(),
            source_device: Device::Me,
            destination_device: Device::Sim,
            result: result::SUCCESS,
            cause_data: Vec::new(),
            text: String::new(),
            data_coding_scheme: None,
            duration: 0,
            menu_item: 0,
            extension: ExtensionData::new(),
        }
    }
}

impl TerminalResponse {
    pub fn new(command: CommandSummary, result: u16) -> Self {
        let mut resp = TerminalResponse {
            command,
            ..TerminalResponse::default()
        };
        resp.set_result(result);
        resp
    }

    /// Set the result, keeping the cause data consistent with the
    /// composed value.
    pub fn set_result(&mut self, result: u16) {
        self.result = result;
        if result >= 0x100 {
            self.cause_data = vec![(result & 0xFF) as u8];
        } else {
            self.cause_data.clear();
        }
    }

    fn result_byte(&self) -> u8 {
        if self.result >= 0x100 {
            (self.result >> 8) as u8
        } else {
            self.result as u8
        }
    }

    /// The command completed, possibly with a warning such as "icon
    /// not displayed". Only then do input responses carry their text.
    fn command_performed(&self) -> bool {
        matches!(
            self.result,
            result::SUCCESS | result::ICON_NOT_DISPLAYED
        )
    }
}

impl Decodable for TerminalResponse {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let units = Tlv::decode_sequence(buf)?;
        let first = units
            .first()
            .ok_or(CodecError::MalformedTlv("no command details"))?;
        if first.field_tag() != 0x01 {
            return Err(CodecError::UnexpectedOuterTag(first.tag));
        }

        let mut resp = TerminalResponse::default();
        for unit in units {
            let v = unit.value.as_slice();
            match unit.field_tag() {
                0x01 => {
                    if v.len() < 3 {
                        return Err(CodecError::MalformedTlv("short command details"));
                    }
                    resp.command = CommandSummary {
                        number: v[0],
                        kind: CommandKind::from_byte(v[1]),
                        qualifier: v[2],
                    };
                }
                0x02 => {
                    if v.len() < 2 {
                        return Err(CodecError::MalformedTlv("short device identities"));
                    }
                    resp.source_device = Device::from_byte(v[0]);
                    resp.destination_device = Device::from_byte(v[1]);
                }
                0x03 => {
                    let (&code, cause) = v
                        .split_first()
                        .ok_or(CodecError::MalformedTlv("empty result"))?;
                    if cause.is_empty() {
                        resp.result = code as u16;
                    } else {
                        if code == 0x00 {
                            return Err(CodecError::ResultCauseMismatch {
                                result_byte: code,
                                cause_len: cause.len(),
                            });
                        }
                        resp.result = ((code as u16) << 8) | cause[0] as u16;
                        resp.cause_data = cause.to_vec();
                    }
                }
                0x04 => {
                    if v.len() >= 2 {
                        resp.duration = duration_to_millis(v[0], v[1]);
                    }
                }
                0x0D => {
                    if resp.command.kind == CommandKind::GetInkey
                        && (resp.command.qualifier & 0x04) != 0
                    {
                        // Yes/no answers encode as a one-byte boolean
                        // after the scheme byte.
                        resp.text = if v.len() >= 2 && v[1] != 0 {
                            "Yes".into()
                        } else {
                            "No".into()
                        };
                        resp.data_coding_scheme = v.first().copied();
                    } else {
                        resp.data_coding_scheme = v.first().copied();
                        resp.text = decode_coded_string(v);
                    }
                }
                0x10 => {
                    if !v.is_empty() {
                        resp.menu_item = v[0];
                    }
                }
                _ => resp.extension.push(unit.tag, unit.value),
            }
        }
        Ok(resp)
    }
}

impl Encodable for TerminalResponse {
    fn encode(&self, buf: &mut BytesMut, _options: EncodeOptions) {
        buf.put_u8(0x81);
        buf.put_u8(0x03);
        buf.put_u8(self.command.number);
        buf.put_u8(self.command.kind.to_byte());
        buf.put_u8(self.command.qualifier);
        buf.put_u8(0x82);
        buf.put_u8(0x02);
        buf.put_u8(self.source_device.to_byte());
        buf.put_u8(self.destination_device.to_byte());

        // SendSs responses use the bare result tag, except for the data
        // rejection which keeps the comprehension-required form.
        let result_tag = if self.command.kind == CommandKind::SendSs
            && self.result_byte() != result::DATA_NOT_UNDERSTOOD as u8
        {
            0x03
        } else {
            0x83
        };
        buf.put_u8(result_tag);
        write_ber_length(buf, self.cause_data.len() + 1);
        buf.put_u8(self.result_byte());
        buf.put_slice(&self.cause_data);

        match self.command.kind {
            CommandKind::GetInkey if self.command_performed() => {
                if (self.command.qualifier & 0x04) != 0 {
                    buf.put_u8(0x8D);
                    buf.put_u8(0x02);
                    buf.put_u8(0x04);
                    buf.put_u8(if self.text == "Yes" { 0x01 } else { 0x00 });
                } else if (self.command.qualifier & 0x02) != 0 {
                    write_text_string(buf, &self.text, EncodeOptions::UCS2_STRINGS, 0x8D);
                } else {
                    write_text_string(buf, &self.text, EncodeOptions::NONE, 0x8D);
                }
            }
            CommandKind::GetInput if self.command_performed() => {
                let options = if (self.command.qualifier & 0x02) != 0 {
                    EncodeOptions::UCS2_STRINGS | EncodeOptions::ENCODE_EMPTY_STRINGS
                } else if (self.command.qualifier & 0x08) != 0 {
                    EncodeOptions::PACKED_STRINGS | EncodeOptions::ENCODE_EMPTY_STRINGS
                } else {
                    EncodeOptions::ENCODE_EMPTY_STRINGS
                };
                write_text_string(buf, &self.text, options, 0x8D);
            }
            CommandKind::PollInterval => {
                write_duration(buf, self.duration);
            }
            CommandKind::SelectItem => {
                if self.menu_item != 0 {
                    buf.put_u8(0x90);
                    buf.put_u8(0x01);
                    buf.put_u8(self.menu_item);
                }
            }
            CommandKind::SendUssd if self.command_performed() => {
                // Fold the network's recommended data coding scheme into
                // the scheme mask, minus the alphabet bits.
                let scheme = match self.data_coding_scheme {
                    Some(value) => value,
                    None => 0,
                };
                let options = match scheme & 0x0C {
                    0x00 => EncodeOptions::PACKED_STRINGS,
                    0x08 => EncodeOptions::UCS2_STRINGS,
                    _ => EncodeOptions::NONE,
                };
                let tag = (((scheme & 0xF3) as u16) << 8) | 0x8D;
                write_text_string(buf, &self.text, options, tag);
            }
            _ => {}
        }
        self.extension.encode(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Decodable, Encodable};

    // GCF 27.22.4.1.1, DISPLAY TEXT 1.1.1 response.
    static DISPLAY_TEXT_RESP: &[u8] = &[
        0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x00,
    ];

    // Same command answered with "screen is busy".
    static SCREEN_BUSY_RESP: &[u8] = &[
        0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x82, 0x81, 0x83, 0x02, 0x20, 0x01,
    ];

    // GCF 27.22.4.2.5, GET INKEY 5.1.1 yes/no response.
    static GET_INKEY_YES_RESP: &[u8] = &[
        0x81, 0x03, 0x01, 0x22, 0x04, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x00, 0x8D, 0x02,
        0x04, 0x01,
    ];

    // GCF 27.22.4.3.1, GET INPUT 1.2.1 packed response.
    static GET_INPUT_PACKED_RESP: &[u8] = &[
        0x81, 0x03, 0x01, 0x23, 0x08, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x00, 0x8D, 0x06,
        0x00, 0xB6, 0x9B, 0x6A, 0xB4, 0x02,
    ];

    // GCF 27.22.4.21.1, TIMER MANAGEMENT 1.1.2 response with the timer
    // identifier and value echoed back.
    static TIMER_RESP: &[u8] = &[
        0x81, 0x03, 0x01, 0x27, 0x02, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x00, 0xA4, 0x01,
        0x01, 0xA5, 0x03, 0x00, 0x50, 0x00,
    ];

    #[test]
    fn success_response_decodes() {
        let resp = TerminalResponse::from_bytes(DISPLAY_TEXT_RESP).unwrap();
        assert_eq!(resp.command.number, 1);
        assert_eq!(resp.command.kind, CommandKind::DisplayText);
        assert_eq!(resp.command.qualifier, 0x80);
        assert_eq!(resp.source_device, Device::Me);
        assert_eq!(resp.destination_device, Device::Sim);
        assert_eq!(resp.result, result::SUCCESS);
        assert!(resp.cause_data.is_empty());
    }

    #[test]
    fn success_response_reencodes() {
        let resp = TerminalResponse::from_bytes(DISPLAY_TEXT_RESP).unwrap();
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), DISPLAY_TEXT_RESP);
    }

    #[test]
    fn result_with_cause_composes() {
        let resp = TerminalResponse::from_bytes(SCREEN_BUSY_RESP).unwrap();
        assert_eq!(resp.result, result::SCREEN_IS_BUSY);
        assert_eq!(resp.cause_data, [0x01]);
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), SCREEN_BUSY_RESP);
    }

    #[test]
    fn cause_after_success_rejected() {
        let pdu = [
            0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x82, 0x81, 0x83, 0x02, 0x00, 0x01,
        ];
        let err = TerminalResponse::from_bytes(&pdu).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ResultCauseMismatch {
                result_byte: 0x00,
                cause_len: 1
            }
        ));
    }

    #[test]
    fn send_ss_uses_bare_result_tag() {
        // SendSs responses drop the comprehension bit on the result tag
        // except when the data itself was not understood.
        let pdu = [
            0x81, 0x03, 0x01, 0x11, 0x00, 0x82, 0x02, 0x82, 0x81, 0x03, 0x01, 0x00,
        ];
        let resp = TerminalResponse::from_bytes(&pdu).unwrap();
        assert_eq!(resp.command.kind, CommandKind::SendSs);
        assert_eq!(resp.result, result::SUCCESS);
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), &pdu);

        let rejected = TerminalResponse::new(resp.command, result::DATA_NOT_UNDERSTOOD);
        let encoded = rejected.to_bytes(EncodeOptions::NONE);
        assert_eq!(&encoded[9..], &[0x83, 0x01, 0x32]);
    }

    #[test]
    fn backward_move_response() {
        // GCF 27.22.4.1.1, DISPLAY TEXT 1.7.1: the user moved backwards.
        let pdu = [
            0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x11,
        ];
        let resp = TerminalResponse::from_bytes(&pdu).unwrap();
        assert_eq!(resp.result, result::BACKWARD_MOVE);
        assert!(resp.cause_data.is_empty());
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), &pdu);
    }

    #[test]
    fn get_inkey_yes_no() {
        let resp = TerminalResponse::from_bytes(GET_INKEY_YES_RESP).unwrap();
        assert_eq!(resp.text, "Yes");
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), GET_INKEY_YES_RESP);

        let mut no = resp.clone();
        no.text = "No".into();
        let encoded = no.to_bytes(EncodeOptions::NONE);
        assert_eq!(encoded[encoded.len() - 1], 0x00);
    }

    #[test]
    fn get_input_packed_text() {
        let resp = TerminalResponse::from_bytes(GET_INPUT_PACKED_RESP).unwrap();
        assert_eq!(resp.text, "67*#+");
        assert_eq!(resp.data_coding_scheme, Some(0x00));
        assert_eq!(
            resp.to_bytes(EncodeOptions::NONE).as_ref(),
            GET_INPUT_PACKED_RESP
        );
    }

    #[test]
    fn timer_fields_roundtrip_through_extension() {
        let resp = TerminalResponse::from_bytes(TIMER_RESP).unwrap();
        assert_eq!(resp.command.kind, CommandKind::TimerManagement);
        assert_eq!(resp.extension.field(0x24), Some(&[0x01][..]));
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), TIMER_RESP);
    }

    #[test]
    fn set_result_syncs_cause_data() {
        let mut resp = TerminalResponse::default();
        resp.set_result(result::SCREEN_IS_BUSY);
        assert_eq!(resp.cause_data, [0x01]);
        resp.set_result(result::SUCCESS);
        assert!(resp.cause_data.is_empty());
    }

    #[test]
    fn failed_input_omits_text() {
        // GET INKEY 2.1.1: no response from the user.
        let pdu = [
            0x81, 0x03, 0x01, 0x22, 0x00, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x12,
        ];
        let resp = TerminalResponse::from_bytes(&pdu).unwrap();
        assert_eq!(resp.result, result::NO_RESPONSE_FROM_USER);
        assert_eq!(resp.to_bytes(EncodeOptions::NONE).as_ref(), &pdu);
    }
}
