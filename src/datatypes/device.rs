use std::fmt;

/// Source or destination of a SIM Toolkit PDU, from the device
/// identities field (GSM 11.14 section 12.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Keypad of the handset.
    Keypad,
    /// Display of the handset.
    Display,
    /// Earpiece of the handset.
    Earpiece,
    /// Additional card reader 0 to 7.
    CardReader(u8),
    /// Data channel 1 to 7.
    Channel(u8),
    /// The SIM itself.
    Sim,
    /// The mobile equipment.
    Me,
    /// The network.
    Network,
    /// A device byte outside the assigned ranges, preserved verbatim.
    Unknown(u8),
}

impl Device {
    pub fn from_byte(value: u8) -> Device {
        match value {
            0x01 => Device::Keypad,
            0x02 => Device::Display,
            0x03 => Device::Earpiece,
            0x10..=0x17 => Device::CardReader(value - 0x10),
            0x21..=0x27 => Device::Channel(value - 0x20),
            0x81 => Device::Sim,
            0x82 => Device::Me,
            0x83 => Device::Network,
            other => Device::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Device::Keypad => 0x01,
            Device::Display => 0x02,
            Device::Earpiece => 0x03,
            Device::CardReader(n) => 0x10 + (n & 0x07),
            Device::Channel(n) => 0x20 + (n & 0x07),
            Device::Sim => 0x81,
            Device::Me => 0x82,
            Device::Network => 0x83,
            Device::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Keypad => write!(f, "Keypad"),
            Device::Display => write!(f, "Display"),
            Device::Earpiece => write!(f, "Earpiece"),
            Device::CardReader(n) => write!(f, "CardReader{n}"),
            Device::Channel(n) => write!(f, "Channel{n}"),
            Device::Sim => write!(f, "SIM"),
            Device::Me => write!(f, "ME"),
            Device::Network => write!(f, "Network"),
            Device::Unknown(raw) => write!(f, "Unknown({raw:#04x})"),
        }
    }
}

impl From<u8> for Device {
    fn from(value: u8) -> Self {
        Device::from_byte(value)
    }
}

impl From<Device> for u8 {
    fn from(value: Device) -> Self {
        value.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_devices_roundtrip() {
        for byte in [0x01, 0x02, 0x03, 0x81, 0x82, 0x83] {
            assert_eq!(Device::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn card_reader_range() {
        assert_eq!(Device::from_byte(0x10), Device::CardReader(0));
        assert_eq!(Device::from_byte(0x17), Device::CardReader(7));
        assert_eq!(Device::CardReader(3).to_byte(), 0x13);
    }

    #[test]
    fn channel_range() {
        assert_eq!(Device::from_byte(0x21), Device::Channel(1));
        assert_eq!(Device::from_byte(0x27), Device::Channel(7));
        assert_eq!(Device::Channel(5).to_byte(), 0x25);
    }

    #[test]
    fn unknown_device_preserved() {
        let dev = Device::from_byte(0x55);
        assert_eq!(dev, Device::Unknown(0x55));
        assert_eq!(dev.to_byte(), 0x55);
    }
}
