use std::fmt;

/// Type of a proactive SIM command (GSM 11.14 section 13.4).
///
/// `EndSession` is not a wire command: it marks the end of a proactive
/// session and is never serialized. `Unknown` carries an unassigned
/// command byte through decode and re-encode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Refresh,
    MoreTime,
    PollInterval,
    PollingOff,
    SetupEventList,
    SetupCall,
    SendSs,
    SendUssd,
    SendSms,
    SendDtmf,
    LaunchBrowser,
    PlayTone,
    DisplayText,
    GetInkey,
    GetInput,
    SelectItem,
    SetupMenu,
    ProvideLocalInformation,
    TimerManagement,
    SetupIdleModeText,
    PerformCardApdu,
    PowerOnCard,
    PowerOffCard,
    GetReaderStatus,
    RunAtCommand,
    LanguageNotification,
    OpenChannel,
    CloseChannel,
    ReceiveData,
    SendData,
    GetChannelStatus,
    ServiceSearch,
    GetServiceInformation,
    DeclareService,
    SetFrames,
    GetFramesStatus,
    RetrieveMultimediaMessage,
    SubmitMultimediaMessage,
    DisplayMultimediaMessage,
    EndSession,
    Unknown(u8),
}

impl CommandKind {
    pub fn from_byte(value: u8) -> CommandKind {
        match value {
            0x01 => CommandKind::Refresh,
            0x02 => CommandKind::MoreTime,
            0x03 => CommandKind::PollInterval,
            0x04 => CommandKind::PollingOff,
            0x05 => CommandKind::SetupEventList,
            0x10 => CommandKind::SetupCall,
            0x11 => CommandKind::SendSs,
            0x12 => CommandKind::SendUssd,
            0x13 => CommandKind::SendSms,
            0x14 => CommandKind::SendDtmf,
            0x15 => CommandKind::LaunchBrowser,
            0x20 => CommandKind::PlayTone,
            0x21 => CommandKind::DisplayText,
            0x22 => CommandKind::GetInkey,
            0x23 => CommandKind::GetInput,
            0x24 => CommandKind::SelectItem,
            0x25 => CommandKind::SetupMenu,
            0x26 => CommandKind::ProvideLocalInformation,
            0x27 => CommandKind::TimerManagement,
            0x28 => CommandKind::SetupIdleModeText,
            0x30 => CommandKind::PerformCardApdu,
            0x31 => CommandKind::PowerOnCard,
            0x32 => CommandKind::PowerOffCard,
            0x33 => CommandKind::GetReaderStatus,
            0x34 => CommandKind::RunAtCommand,
            0x35 => CommandKind::LanguageNotification,
            0x40 => CommandKind::OpenChannel,
            0x41 => CommandKind::CloseChannel,
            0x42 => CommandKind::ReceiveData,
            0x43 => CommandKind::SendData,
            0x44 => CommandKind::GetChannelStatus,
            0x45 => CommandKind::ServiceSearch,
            0x46 => CommandKind::GetServiceInformation,
            0x47 => CommandKind::DeclareService,
            0x50 => CommandKind::SetFrames,
            0x51 => CommandKind::GetFramesStatus,
            0x60 => CommandKind::RetrieveMultimediaMessage,
            0x61 => CommandKind::SubmitMultimediaMessage,
            0x62 => CommandKind::DisplayMultimediaMessage,
            0x81 => CommandKind::EndSession,
            other => CommandKind::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            CommandKind::Refresh => 0x01,
            CommandKind::MoreTime => 0x02,
            CommandKind::PollInterval => 0x03,
            CommandKind::PollingOff => 0x04,
            CommandKind::SetupEventList => 0x05,
            CommandKind::SetupCall => 0x10,
            CommandKind::SendSs => 0x11,
            CommandKind::SendUssd => 0x12,
            CommandKind::SendSms => 0x13,
            CommandKind::SendDtmf => 0x14,
            CommandKind::LaunchBrowser => 0x15,
            CommandKind::PlayTone => 0x20,
            CommandKind::DisplayText => 0x21,
            CommandKind::GetInkey => 0x22,
            CommandKind::GetInput => 0x23,
            CommandKind::SelectItem => 0x24,
            CommandKind::SetupMenu => 0x25,
            CommandKind::ProvideLocalInformation => 0x26,
            CommandKind::TimerManagement => 0x27,
            CommandKind::SetupIdleModeText => 0x28,
            CommandKind::PerformCardApdu => 0x30,
            CommandKind::PowerOnCard => 0x31,
            CommandKind::PowerOffCard => 0x32,
            CommandKind::GetReaderStatus => 0x33,
            CommandKind::RunAtCommand => 0x34,
            CommandKind::LanguageNotification => 0x35,
            CommandKind::OpenChannel => 0x40,
            CommandKind::CloseChannel => 0x41,
            CommandKind::ReceiveData => 0x42,
            CommandKind::SendData => 0x43,
            CommandKind::GetChannelStatus => 0x44,
            CommandKind::ServiceSearch => 0x45,
            CommandKind::GetServiceInformation => 0x46,
            CommandKind::DeclareService => 0x47,
            CommandKind::SetFrames => 0x50,
            CommandKind::GetFramesStatus => 0x51,
            CommandKind::RetrieveMultimediaMessage => 0x60,
            CommandKind::SubmitMultimediaMessage => 0x61,
            CommandKind::DisplayMultimediaMessage => 0x62,
            CommandKind::EndSession => 0x81,
            CommandKind::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Unknown(raw) => write!(f, "Unknown({raw:#04x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl From<u8> for CommandKind {
    fn from(value: u8) -> Self {
        CommandKind::from_byte(value)
    }
}

impl From<CommandKind> for u8 {
    fn from(value: CommandKind) -> Self {
        value.to_byte()
    }
}
