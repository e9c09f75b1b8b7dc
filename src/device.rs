//! Device area, destination CPU and clear mode code tables.
//!
//! These enumerations carry the byte values the frame codec serializes into
//! requests. The codec never interprets their meaning; every variant is an
//! opaque one-byte code from the QnA-series binary command set.

/// Device memory area codes for QnA-compatible controllers.
///
/// Each variant is the one-byte device code placed after the point address in
/// word and bit access commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceType {
    /// Special relay (SM).
    SpecialRelay = 0x91,
    /// Special register (SD).
    SpecialRegister = 0xA9,
    /// Input (X).
    Input = 0x9C,
    /// Output (Y).
    Output = 0x9D,
    /// Internal relay (M).
    InternalRelay = 0x90,
    /// Latch relay (L).
    LatchRelay = 0x92,
    /// Annunciator (F).
    Annunciator = 0x93,
    /// Edge relay (V).
    EdgeRelay = 0x94,
    /// Link relay (B).
    LinkRelay = 0xA0,
    /// Data register (D).
    DataRegister = 0xA8,
    /// Link register (W).
    LinkRegister = 0xB4,
    /// Timer contact (TS).
    TimerContact = 0xC1,
    /// Timer coil (TC).
    TimerCoil = 0xC0,
    /// Timer current value (TN).
    TimerValue = 0xC2,
    /// Retentive timer contact (SS).
    RetentiveTimerContact = 0xC7,
    /// Retentive timer coil (SC).
    RetentiveTimerCoil = 0xC6,
    /// Retentive timer current value (SN).
    RetentiveTimerValue = 0xC8,
    /// Counter contact (CS).
    CounterContact = 0xC4,
    /// Counter coil (CC).
    CounterCoil = 0xC3,
    /// Counter current value (CN).
    CounterValue = 0xC5,
    /// Link special relay (SB).
    LinkSpecialRelay = 0xA1,
    /// Link special register (SW).
    LinkSpecialRegister = 0xB5,
    /// Step relay (S).
    StepRelay = 0x98,
    /// Direct input (DX).
    DirectInput = 0xA2,
    /// Direct output (DY).
    DirectOutput = 0xA3,
    /// Index register (Z).
    IndexRegister = 0xCC,
    /// File register, block switching (R).
    FileRegister = 0xAF,
    /// File register, serial number access (ZR).
    ExtendedFileRegister = 0xB0,
}

impl DeviceType {
    /// Returns the wire code for this device area.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Destination CPU selector byte for multi-CPU and redundant systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DestinationCpu {
    /// The station the request arrives at (default).
    LocalStation = 0xFF,
    /// Control system CPU of a redundant pair.
    ControlSystem = 0xD0,
    /// Standby system CPU of a redundant pair.
    StandbySystem = 0xD1,
    /// System A CPU of a redundant pair.
    SystemA = 0xD2,
    /// System B CPU of a redundant pair.
    SystemB = 0xD3,
    /// CPU No. 1 in a multi-CPU system.
    MultiCpu1 = 0xE0,
    /// CPU No. 2 in a multi-CPU system.
    MultiCpu2 = 0xE1,
    /// CPU No. 3 in a multi-CPU system.
    MultiCpu3 = 0xE2,
    /// CPU No. 4 in a multi-CPU system.
    MultiCpu4 = 0xE3,
}

impl DestinationCpu {
    /// Returns the wire code for this destination.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Device clear mode byte for the remote RUN command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClearMode {
    /// Do not clear devices before running.
    NotCleared = 0x00,
    /// Clear devices outside the latch range.
    ExceptLatch = 0x01,
    /// Clear all devices including the latch range.
    All = 0x02,
}

impl ClearMode {
    /// Returns the wire code for this clear mode.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceType::SpecialRelay => "SM",
            DeviceType::SpecialRegister => "SD",
            DeviceType::Input => "X",
            DeviceType::Output => "Y",
            DeviceType::InternalRelay => "M",
            DeviceType::LatchRelay => "L",
            DeviceType::Annunciator => "F",
            DeviceType::EdgeRelay => "V",
            DeviceType::LinkRelay => "B",
            DeviceType::DataRegister => "D",
            DeviceType::LinkRegister => "W",
            DeviceType::TimerContact => "TS",
            DeviceType::TimerCoil => "TC",
            DeviceType::TimerValue => "TN",
            DeviceType::RetentiveTimerContact => "SS",
            DeviceType::RetentiveTimerCoil => "SC",
            DeviceType::RetentiveTimerValue => "SN",
            DeviceType::CounterContact => "CS",
            DeviceType::CounterCoil => "CC",
            DeviceType::CounterValue => "CN",
            DeviceType::LinkSpecialRelay => "SB",
            DeviceType::LinkSpecialRegister => "SW",
            DeviceType::StepRelay => "S",
            DeviceType::DirectInput => "DX",
            DeviceType::DirectOutput => "DY",
            DeviceType::IndexRegister => "Z",
            DeviceType::FileRegister => "R",
            DeviceType::ExtendedFileRegister => "ZR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_codes() {
        assert_eq!(DeviceType::DataRegister.code(), 0xA8);
        assert_eq!(DeviceType::InternalRelay.code(), 0x90);
        assert_eq!(DeviceType::Input.code(), 0x9C);
        assert_eq!(DeviceType::Output.code(), 0x9D);
        assert_eq!(DeviceType::LinkRegister.code(), 0xB4);
    }

    #[test]
    fn test_destination_cpu_codes() {
        assert_eq!(DestinationCpu::LocalStation.code(), 0xFF);
        assert_eq!(DestinationCpu::MultiCpu1.code(), 0xE0);
        assert_eq!(DestinationCpu::SystemB.code(), 0xD3);
    }

    #[test]
    fn test_clear_mode_codes() {
        assert_eq!(ClearMode::NotCleared.code(), 0x00);
        assert_eq!(ClearMode::ExceptLatch.code(), 0x01);
        assert_eq!(ClearMode::All.code(), 0x02);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DeviceType::DataRegister.to_string(), "D");
        assert_eq!(DeviceType::ExtendedFileRegister.to_string(), "ZR");
    }
}
