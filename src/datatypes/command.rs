//! Proactive command PDU assembly and disassembly.
//!
//! A proactive command is a 0xD0-wrapped sequence of comprehension-TLV
//! fields starting with the command details and device identities.
//! Decoding lifts the fields this crate understands into typed members
//! and parks everything else in `extension`, in order, so that a PDU
//! with vendor-specific fields re-encodes byte-for-byte.

use crate::codec::{
    write_ber_length, CodecError, Decodable, Encodable, EncodeOptions, ExtensionData, Tlv,
    PROACTIVE_COMMAND_TAG,
};
use crate::datatypes::command_kind::CommandKind;
use crate::datatypes::device::Device;
use crate::datatypes::duration::{duration_to_millis, write_duration};
use crate::datatypes::icon::{decode_icon, write_icon, write_item_icons};
use crate::datatypes::menu_item::MenuItem;
use crate::datatypes::number::{
    decode_address, decode_digits, decode_subaddress, write_number, write_subaddress,
    TON_UNKNOWN,
};
use crate::datatypes::text::{
    decode_coded_string, decode_efadn, write_efadn, write_text_string,
};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;
use tracing::warn;

/// Tone to play for a PlayTone command (GSM 11.14 section 12.16).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Dial,
    Busy,
    Congestion,
    RadioAck,
    Dropped,
    Error,
    CallWaiting,
    Ringing,
    GeneralBeep,
    PositiveBeep,
    NegativeBeep,
    Other(u8),
}

impl Tone {
    pub fn from_byte(value: u8) -> Tone {
        match value {
            0x01 => Tone::Dial,
            0x02 => Tone::Busy,
            0x03 => Tone::Congestion,
            0x04 => Tone::RadioAck,
            0x05 => Tone::Dropped,
            0x06 => Tone::Error,
            0x07 => Tone::CallWaiting,
            0x08 => Tone::Ringing,
            0x10 => Tone::GeneralBeep,
            0x11 => Tone::PositiveBeep,
            0x12 => Tone::NegativeBeep,
            other => Tone::Other(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Tone::Dial => 0x01,
            Tone::Busy => 0x02,
            Tone::Congestion => 0x03,
            Tone::RadioAck => 0x04,
            Tone::Dropped => 0x05,
            Tone::Error => 0x06,
            Tone::CallWaiting => 0x07,
            Tone::Ringing => 0x08,
            Tone::GeneralBeep => 0x10,
            Tone::PositiveBeep => 0x11,
            Tone::NegativeBeep => 0x12,
            Tone::Other(raw) => raw,
        }
    }
}

/// What a Refresh command asks the handset to do, from the qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshType {
    InitAndFullFileChange,
    FileChange,
    InitAndFileChange,
    Initialization,
    Reset,
    NaaApplicationReset,
    NaaSessionReset,
    Unknown(u8),
}

/// How a SetupCall command should treat calls already in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    IfNoOtherCalls,
    PutOnHold,
    Disconnect,
    Unknown(u8),
}

/// Presentation hint for a SelectItem menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPresentation {
    Any,
    DataValues,
    NavigationOptions,
}

/// A proactive SIM command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command number from the command details, normally 1.
    pub command_number: u8,
    pub kind: CommandKind,
    /// Raw qualifier byte; interpret through the accessor methods.
    pub qualifier: u8,
    pub source_device: Device,
    pub destination_device: Device,
    pub text: String,
    pub text_attribute: Vec<u8>,
    /// Second alpha identifier, used by SetupCall for the call phase.
    pub other_text: String,
    pub other_text_attribute: Vec<u8>,
    pub default_text: String,
    /// Menu title for SetupMenu and SelectItem.
    pub title: String,
    pub title_attribute: Vec<u8>,
    /// Set when the alpha identifier was present but empty, which asks
    /// the handset not to show any feedback to the user.
    pub suppress_user_feedback: bool,
    pub immediate_response: bool,
    pub icon_id: u32,
    pub icon_self_explanatory: bool,
    pub other_icon_id: u32,
    pub other_icon_self_explanatory: bool,
    pub menu_items: Vec<MenuItem>,
    pub default_item: u8,
    pub minimum_length: u8,
    pub maximum_length: u8,
    /// Dialling number, SS string, USSD string or DTMF digits.
    pub number: String,
    pub sub_address: String,
    pub url: String,
    pub tone: Option<Tone>,
    /// Duration in milliseconds, zero for none.
    pub duration: u32,
    pub extension: ExtensionData,
}

impl Default for Command {
    fn default() -> Self {
        Command {
            command_number: 1,
            kind: CommandKind::Unknown(0),
            qualifier: 0,
            source_device: Device::Sim,
            destination_device: Device::Me,
            text: String::new(),
            text_attribute: Vec::new(),
            other_text: String::new(),
            other_text_attribute: Vec::new(),
            default_text: String::new(),
            title: String::new(),
            title_attribute: Vec::new(),
            suppress_user_feedback: false,
            immediate_response: false,
            icon_id: 0,
            icon_self_explanatory: false,
            other_icon_id: 0,
            other_icon_self_explanatory: false,
            menu_items: Vec::new(),
            default_item: 0,
            minimum_length: 0,
            maximum_length: 255,
            number: String::new(),
            sub_address: String::new(),
            url: String::new(),
            tone: None,
            duration: 0,
            extension: ExtensionData::new(),
        }
    }
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Command {
            kind,
            ..Command::default()
        }
    }

    /// Help is available (GetInkey, GetInput, SelectItem, SetupMenu).
    pub fn has_help(&self) -> bool {
        (self.qualifier & 0x80) != 0
    }

    /// High priority display (DisplayText).
    pub fn high_priority(&self) -> bool {
        (self.qualifier & 0x01) != 0
    }

    /// Clear the screen after a delay rather than waiting for the user
    /// (DisplayText).
    pub fn clear_after_delay(&self) -> bool {
        (self.qualifier & 0x80) == 0
    }

    /// Input may use the full UCS-2 alphabet (GetInkey, GetInput).
    pub fn ucs2_input(&self) -> bool {
        (self.qualifier & 0x02) != 0
    }

    /// Response should be packed 7-bit (GetInput).
    pub fn packed_input(&self) -> bool {
        (self.qualifier & 0x08) != 0
    }

    /// Only digits are wanted from the user (GetInkey, GetInput).
    pub fn want_digits(&self) -> bool {
        (self.qualifier & 0x01) == 0
    }

    /// A yes/no answer is wanted instead of a character (GetInkey).
    pub fn want_yes_no(&self) -> bool {
        (self.qualifier & 0x04) != 0
    }

    /// Echo input back to the user (GetInput).
    pub fn echo(&self) -> bool {
        (self.qualifier & 0x04) == 0
    }

    /// Call disposition (SetupCall).
    pub fn disposition(&self) -> Disposition {
        match self.qualifier >> 1 {
            0 => Disposition::IfNoOtherCalls,
            1 => Disposition::PutOnHold,
            2 => Disposition::Disconnect,
            other => Disposition::Unknown(other),
        }
    }

    /// Redial on failure (SetupCall).
    pub fn with_redial(&self) -> bool {
        (self.qualifier & 0x01) != 0
    }

    /// Soft keys preferred for small menus (SetupMenu bit 0, SelectItem
    /// bit 2).
    pub fn soft_keys_preferred(&self) -> bool {
        if self.kind == CommandKind::SelectItem {
            (self.qualifier & 0x04) != 0
        } else {
            (self.qualifier & 0x01) != 0
        }
    }

    /// Menu presentation style (SelectItem).
    pub fn menu_presentation(&self) -> MenuPresentation {
        if (self.qualifier & 0x01) != 0 {
            if (self.qualifier & 0x02) != 0 {
                MenuPresentation::NavigationOptions
            } else {
                MenuPresentation::DataValues
            }
        } else {
            MenuPresentation::Any
        }
    }

    /// Refresh action (Refresh).
    pub fn refresh_type(&self) -> RefreshType {
        match self.qualifier {
            0x00 => RefreshType::InitAndFullFileChange,
            0x01 => RefreshType::FileChange,
            0x02 => RefreshType::InitAndFileChange,
            0x03 => RefreshType::Initialization,
            0x04 => RefreshType::Reset,
            0x05 => RefreshType::NaaApplicationReset,
            0x06 => RefreshType::NaaSessionReset,
            other => RefreshType::Unknown(other),
        }
    }

    /// The SMS payload is already packed (SendSms).
    pub fn sms_packing(&self) -> bool {
        (self.qualifier & 0x01) != 0
    }
}

impl Decodable for Command {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let start = buf.position() as usize;
        let data = *buf.get_ref();
        if start >= data.len() {
            return Err(CodecError::MalformedTlv("empty PDU"));
        }
        // The outer proactive wrapper is optional on input.
        if data[start] == PROACTIVE_COMMAND_TAG {
            buf.set_position(start as u64 + 1);
            crate::codec::read_ber_length(buf)?;
        }
        let units = Tlv::decode_sequence(buf)?;
        let first = units
            .first()
            .ok_or(CodecError::MalformedTlv("no command details"))?;
        if first.field_tag() != 0x01 {
            return Err(CodecError::UnexpectedOuterTag(first.tag));
        }

        let mut cmd = Command::default();
        let mut seen_text = false;
        let mut seen_icon = false;
        let mut seen_text_attr = false;
        for unit in units {
            let v = unit.value.as_slice();
            match unit.field_tag() {
                0x01 => {
                    if v.len() < 3 {
                        return Err(CodecError::MalformedTlv("short command details"));
                    }
                    cmd.command_number = v[0];
                    cmd.kind = CommandKind::from_byte(v[1]);
                    if let CommandKind::Unknown(raw) = cmd.kind {
                        warn!("unknown proactive command type: {:#04x}", raw);
                    }
                    cmd.qualifier = v[2];
                }
                0x02 => {
                    if v.len() < 2 {
                        return Err(CodecError::MalformedTlv("short device identities"));
                    }
                    cmd.source_device = Device::from_byte(v[0]);
                    cmd.destination_device = Device::from_byte(v[1]);
                }
                0x04 if cmd.kind != CommandKind::OpenChannel => {
                    if v.len() >= 2 {
                        cmd.duration = duration_to_millis(v[0], v[1]);
                    }
                }
                0x05 => {
                    if matches!(cmd.kind, CommandKind::SetupMenu | CommandKind::SelectItem) {
                        cmd.title = decode_efadn(v);
                    } else if seen_text {
                        cmd.other_text = decode_efadn(v);
                    } else if v.is_empty() {
                        cmd.suppress_user_feedback = true;
                        seen_text = true;
                    } else {
                        cmd.text = decode_efadn(v);
                        seen_text = true;
                    }
                }
                0x06 | 0x09 => cmd.number = decode_address(v),
                0x08 => cmd.sub_address = decode_subaddress(v),
                0x0A => cmd.number = decode_coded_string(v),
                0x0D if !matches!(
                    cmd.kind,
                    CommandKind::LaunchBrowser | CommandKind::OpenChannel
                ) =>
                {
                    cmd.text = decode_coded_string(v);
                }
                0x0E => {
                    if !v.is_empty() {
                        cmd.tone = Some(Tone::from_byte(v[0]));
                    }
                }
                0x0F => {
                    // A zero-length item marks an empty menu.
                    if !v.is_empty() {
                        let mut item = MenuItem::new(v[0], decode_efadn(&v[1..]));
                        item.has_help = cmd.has_help();
                        cmd.menu_items.push(item);
                    }
                }
                0x10 => {
                    if !v.is_empty() {
                        cmd.default_item = v[0];
                    }
                }
                0x11 => {
                    if v.len() >= 2 {
                        cmd.minimum_length = v[0];
                        cmd.maximum_length = v[1];
                    }
                }
                0x17 => cmd.default_text = decode_coded_string(v),
                0x18 => {
                    for (item, &action) in cmd.menu_items.iter_mut().zip(v.iter()) {
                        item.next_action = action;
                    }
                }
                0x1E => {
                    if let Some((id, self_explanatory)) = decode_icon(v) {
                        if seen_icon {
                            cmd.other_icon_id = id;
                            cmd.other_icon_self_explanatory = self_explanatory;
                        } else {
                            cmd.icon_id = id;
                            cmd.icon_self_explanatory = self_explanatory;
                            seen_icon = true;
                        }
                    }
                }
                0x1F => {
                    if !v.is_empty() {
                        let self_explanatory = (v[0] & 0x01) == 0;
                        for (item, &id) in cmd.menu_items.iter_mut().zip(v[1..].iter()) {
                            item.icon_id = id as u32;
                            item.icon_self_explanatory = self_explanatory;
                        }
                    }
                }
                0x2B => cmd.immediate_response = true,
                0x2C => cmd.number = decode_digits(v),
                0x31 => cmd.url = decode_efadn(v),
                0x50 => {
                    if matches!(cmd.kind, CommandKind::SetupMenu | CommandKind::SelectItem) {
                        cmd.title_attribute = v.to_vec();
                    } else if seen_text_attr {
                        cmd.other_text_attribute = v.to_vec();
                    } else {
                        cmd.text_attribute = v.to_vec();
                        seen_text_attr = true;
                    }
                }
                0x51 => {
                    for (item, attr) in cmd.menu_items.iter_mut().zip(v.chunks(4)) {
                        item.label_attribute = attr.to_vec();
                    }
                }
                _ => cmd.extension.push(unit.tag, unit.value),
            }
        }
        Ok(cmd)
    }
}

fn write_attribute(buf: &mut BytesMut, attr: &[u8], tag: u8) {
    if attr.is_empty() {
        return;
    }
    buf.put_u8(tag);
    write_ber_length(buf, attr.len());
    buf.put_slice(attr);
}

fn write_alpha(buf: &mut BytesMut, text: &str, options: EncodeOptions) {
    if !text.is_empty() || options.contains(EncodeOptions::ENCODE_EMPTY_STRINGS) {
        write_efadn(buf, text, options, Some(0x85));
    }
}

fn extract_and_write(ext: &mut ExtensionData, buf: &mut BytesMut, tag: u8) -> bool {
    match ext.take(tag) {
        Some(tlv) => {
            tlv.encode(buf);
            true
        }
        None => false,
    }
}

impl Command {
    fn encode_menu(&self, body: &mut BytesMut, options: EncodeOptions) {
        if self.kind == CommandKind::SetupMenu || !self.title.is_empty() {
            write_efadn(body, &self.title, options, Some(0x85));
        }
        if self.menu_items.is_empty() {
            body.put_u8(0x8F);
            body.put_u8(0x00);
        } else {
            for item in &self.menu_items {
                let mut label = BytesMut::new();
                write_efadn(&mut label, &item.label, options, None);
                body.put_u8(0x8F);
                write_ber_length(body, label.len() + 1);
                body.put_u8(item.identifier);
                body.put_slice(&label);
            }
        }
        if self.menu_items.iter().any(|item| item.next_action != 0) {
            body.put_u8(0x18);
            body.put_u8(self.menu_items.len() as u8);
            for item in &self.menu_items {
                body.put_u8(item.next_action);
            }
        }
        if self.kind == CommandKind::SelectItem && self.default_item != 0 {
            body.put_u8(0x90);
            body.put_u8(0x01);
            body.put_u8(self.default_item);
        }
        write_icon(body, self.icon_id, self.icon_self_explanatory, true);
        if self.menu_items.iter().any(|item| item.icon_id != 0) {
            let ids: Vec<u32> = self.menu_items.iter().map(|item| item.icon_id).collect();
            let self_explanatory = self
                .menu_items
                .iter()
                .any(|item| item.icon_self_explanatory);
            write_item_icons(body, &ids, self_explanatory);
        }
        write_attribute(body, &self.title_attribute, 0xD0);
        if self.menu_items.iter().any(|item| !item.label_attribute.is_empty()) {
            let total: usize = self
                .menu_items
                .iter()
                .map(|item| item.label_attribute.len())
                .sum();
            body.put_u8(0xD1);
            write_ber_length(body, total);
            for item in &self.menu_items {
                body.put_slice(&item.label_attribute);
            }
        }
    }
}

impl Encodable for Command {
    fn encode(&self, buf: &mut BytesMut, options: EncodeOptions) {
        let mut options = options;
        if self.suppress_user_feedback {
            options = options | EncodeOptions::ENCODE_EMPTY_STRINGS;
        }
        let mut qualifier = self.qualifier;
        if self.kind == CommandKind::GetInkey && self.want_yes_no() {
            qualifier &= !0x01;
        }

        let mut body = BytesMut::new();
        body.put_u8(0x81);
        body.put_u8(0x03);
        body.put_u8(self.command_number);
        body.put_u8(self.kind.to_byte());
        body.put_u8(qualifier);
        body.put_u8(0x82);
        body.put_u8(0x02);
        body.put_u8(self.source_device.to_byte());
        body.put_u8(self.destination_device.to_byte());

        let mut ext = self.extension.clone();
        match self.kind {
            CommandKind::DisplayText => {
                write_text_string(&mut body, &self.text, options, 0x8D);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                if self.immediate_response {
                    body.put_u8(0xAB);
                    body.put_u8(0x00);
                }
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::GetInkey => {
                write_text_string(&mut body, &self.text, options, 0x8D);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, false);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::GetInput => {
                write_text_string(&mut body, &self.text, options, 0x8D);
                if self.minimum_length != 0 || self.maximum_length != 255 {
                    body.put_u8(0x91);
                    body.put_u8(0x02);
                    body.put_u8(self.minimum_length);
                    body.put_u8(self.maximum_length);
                }
                if !self.default_text.is_empty() {
                    write_text_string(&mut body, &self.default_text, EncodeOptions::NONE, 0x17);
                }
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, false);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::PlayTone => {
                write_alpha(&mut body, &self.text, options);
                if let Some(tone) = self.tone {
                    body.put_u8(0x8E);
                    body.put_u8(0x01);
                    body.put_u8(tone.to_byte());
                }
                write_duration(&mut body, self.duration);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, false);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::PollInterval => {
                write_duration(&mut body, self.duration);
            }
            CommandKind::SetupMenu | CommandKind::SelectItem => {
                self.encode_menu(&mut body, options);
            }
            CommandKind::SendSms => {
                write_alpha(&mut body, &self.text, options);
                if !self.number.is_empty() {
                    write_number(&mut body, &self.number, 0x86, TON_UNKNOWN);
                }
                extract_and_write(&mut ext, &mut body, 0x8B);
                write_icon(
                    &mut body,
                    self.icon_id,
                    self.icon_self_explanatory,
                    self.icon_self_explanatory,
                );
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::SendSs => {
                write_alpha(&mut body, &self.text, options);
                write_number(&mut body, &self.number, 0x89, 255);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::SendUssd => {
                write_alpha(&mut body, &self.text, EncodeOptions::NONE);
                let tag = if options.contains(EncodeOptions::PACKED_STRINGS) {
                    0xF08A
                } else {
                    0x408A
                };
                write_text_string(&mut body, &self.number, options, tag);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::SetupCall => {
                write_alpha(&mut body, &self.text, EncodeOptions::NONE);
                if !self.number.is_empty() {
                    write_number(&mut body, &self.number, 0x86, TON_UNKNOWN);
                }
                extract_and_write(&mut ext, &mut body, 0x87);
                write_subaddress(&mut body, &self.sub_address);
                write_duration(&mut body, self.duration);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                if !self.other_text.is_empty() {
                    write_efadn(&mut body, &self.other_text, EncodeOptions::NONE, Some(0x85));
                }
                write_icon(
                    &mut body,
                    self.other_icon_id,
                    self.other_icon_self_explanatory,
                    true,
                );
                write_attribute(&mut body, &self.text_attribute, 0xD0);
                write_attribute(&mut body, &self.other_text_attribute, 0xD0);
            }
            CommandKind::SetupIdleModeText => {
                write_text_string(&mut body, &self.text, options, 0x8D);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::RunAtCommand => {
                write_alpha(&mut body, &self.text, EncodeOptions::NONE);
                extract_and_write(&mut ext, &mut body, 0xA8);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::SendDtmf => {
                write_alpha(&mut body, &self.text, options);
                write_number(&mut body, &self.number, 0xAC, TON_UNKNOWN);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::LaunchBrowser => {
                extract_and_write(&mut ext, &mut body, 0x30);
                write_efadn(&mut body, &self.url, EncodeOptions::NONE, Some(0x31));
                // Bearer, provisioning files and gateway stay in their
                // original order between the URL and the alpha id.
                ext.encode(&mut body);
                ext = ExtensionData::new();
                write_alpha(&mut body, &self.text, EncodeOptions::NONE);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, false);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::OpenChannel => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                if !self.number.is_empty() {
                    write_number(&mut body, &self.number, 0x86, TON_UNKNOWN);
                }
                write_subaddress(&mut body, &self.sub_address);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::CloseChannel | CommandKind::ReceiveData | CommandKind::SendData => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::ServiceSearch => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                extract_and_write(&mut ext, &mut body, 0xC3);
                extract_and_write(&mut ext, &mut body, 0xC2);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::GetServiceInformation => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                extract_and_write(&mut ext, &mut body, 0xC4);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::RetrieveMultimediaMessage => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                extract_and_write(&mut ext, &mut body, 0xEA);
                extract_and_write(&mut ext, &mut body, 0x92);
                extract_and_write(&mut ext, &mut body, 0xEE);
                extract_and_write(&mut ext, &mut body, 0xEB);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::SubmitMultimediaMessage => {
                write_alpha(&mut body, &self.text, options);
                write_icon(&mut body, self.icon_id, self.icon_self_explanatory, true);
                extract_and_write(&mut ext, &mut body, 0x92);
                extract_and_write(&mut ext, &mut body, 0xEB);
                write_attribute(&mut body, &self.text_attribute, 0xD0);
            }
            CommandKind::DisplayMultimediaMessage => {
                extract_and_write(&mut ext, &mut body, 0x92);
                extract_and_write(&mut ext, &mut body, 0xEB);
                if self.immediate_response {
                    body.put_u8(0xAB);
                    body.put_u8(0x00);
                }
            }
            _ => {}
        }
        ext.encode(&mut body);

        if options.contains(EncodeOptions::NO_BER_WRAPPER) {
            buf.put_slice(&body);
        } else {
            buf.put_u8(PROACTIVE_COMMAND_TAG);
            write_ber_length(buf, body.len());
            buf.put_slice(&body);
        }
    }
}
