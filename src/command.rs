//! MC protocol command encoders.
//!
//! One encoder per operation family. Each command validates its inputs in
//! `new` and assembles the complete request frame in `to_bytes`, given the
//! frame variant parameters and the station addressing for this exchange.
//!
//! # Command families
//!
//! ## Device memory
//! - [`BatchReadCommand`] / [`BatchWriteCommand`] - sequential word access
//! - [`RandomReadCommand`] / [`RandomWriteCommand`] - scattered address lists
//! - [`BitReadCommand`] - sequential bit access (nibble packed on the wire)
//! - [`SingleBitWriteCommand`] / [`BitArrayWriteCommand`] - bit writes to one
//!   point family
//! - [`RandomBitWriteCommand`] - bit writes to scattered points
//!
//! ## Buffer memory
//! - [`BufferReadCommand`] / [`BufferWriteCommand`] - absolute buffer access
//! - [`ModuleReadCommand`] / [`ModuleWriteCommand`] - intelligent-module
//!   buffer access
//!
//! ## CPU control
//! - [`CpuModelCommand`] - read the CPU model name
//! - [`ControlCommand`] - remote Run/Stop/Pause/Reset/LatchClear/LED-off
//!
//! # Declared length
//!
//! Commands carrying a payload compute the declared length from a
//! family-specific fixed overhead through [`FrameParams::request_length`];
//! payload-free commands use the literal constant the hardware documents.

use crate::device::{ClearMode, DeviceType};
use crate::element::{self, Element};
use crate::error::{McError, Result};
use crate::frame::{
    address_bytes, count_bytes, point_bytes, random_count_bytes, FrameParams, Station,
};

/// Batch (sequential) device read, command 0x0401.
pub(crate) const CMD_BATCH_READ: u16 = 0x0401;
/// Batch (sequential) device write, command 0x1401.
pub(crate) const CMD_BATCH_WRITE: u16 = 0x1401;
/// Random (scattered) device read, command 0x0403.
pub(crate) const CMD_RANDOM_READ: u16 = 0x0403;
/// Random (scattered) device write, command 0x1402.
pub(crate) const CMD_RANDOM_WRITE: u16 = 0x1402;
/// Absolute buffer memory read, command 0x0613.
pub(crate) const CMD_BUFFER_READ: u16 = 0x0613;
/// Absolute buffer memory write, command 0x1613.
pub(crate) const CMD_BUFFER_WRITE: u16 = 0x1613;
/// Intelligent-module buffer read, command 0x0601.
pub(crate) const CMD_MODULE_READ: u16 = 0x0601;
/// Intelligent-module buffer write, command 0x1601.
pub(crate) const CMD_MODULE_WRITE: u16 = 0x1601;
/// CPU model name read, command 0x0101.
pub(crate) const CMD_CPU_MODEL: u16 = 0x0101;

/// Word-access subcommand.
pub(crate) const SUB_WORD: u16 = 0x0000;
/// Bit-access subcommand.
pub(crate) const SUB_BIT: u16 = 0x0001;

/// Command for reading a run of device words.
#[derive(Debug, Clone)]
pub struct BatchReadCommand {
    device: DeviceType,
    point: u16,
    word_count: u16,
}

impl BatchReadCommand {
    /// Creates a batch read of `count` elements of `T` starting at `point`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide.
    pub fn new<T: Element>(point: u16, device: DeviceType, count: u16) -> Result<Self> {
        let width = element::device_width::<T>()?;
        Ok(Self {
            device,
            point,
            word_count: (count as usize * width / 2) as u16,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let addr = point_bytes(self.point);
        let cnt = count_bytes(self.word_count);
        let mut buf = frame.begin_request(station, [0x0C, 0x00], CMD_BATCH_READ, SUB_WORD, 6);
        buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code(), cnt[0], cnt[1]]);
        buf
    }
}

/// Command for writing a run of device words.
#[derive(Debug, Clone)]
pub struct BatchWriteCommand {
    device: DeviceType,
    point: u16,
    word_count: u16,
    payload: Vec<u8>,
}

impl BatchWriteCommand {
    /// Creates a batch write of `values` starting at `point`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide,
    /// or `EmptyInput` when `values` is empty.
    pub fn new<T: Element>(point: u16, values: &[T], device: DeviceType) -> Result<Self> {
        let width = element::device_width::<T>()?;
        if values.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        let mut payload = Vec::new();
        element::pack(values, &mut payload);
        Ok(Self {
            device,
            point,
            word_count: (values.len() * width / 2) as u16,
            payload,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let len = frame.request_length(19, self.payload.len());
        let addr = point_bytes(self.point);
        let cnt = count_bytes(self.word_count);
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_BATCH_WRITE,
            SUB_WORD,
            6 + self.payload.len(),
        );
        buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code(), cnt[0], cnt[1]]);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Command for reading a scattered list of device addresses.
#[derive(Debug, Clone)]
pub struct RandomReadCommand {
    device: DeviceType,
    points: Vec<u16>,
    width: usize,
}

impl RandomReadCommand {
    /// Creates a random read of one `T` element per point in `points`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide,
    /// or `EmptyInput` when `points` is empty.
    pub fn new<T: Element>(points: &[u16], device: DeviceType) -> Result<Self> {
        let width = element::device_width::<T>()?;
        if points.is_empty() {
            return Err(McError::EmptyInput { operation: "read" });
        }
        Ok(Self {
            device,
            points: points.to_vec(),
            width,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let count = self.points.len() as u16;
        let len = frame.request_length(15, self.points.len() * 4);
        let cnt = random_count_bytes(count, self.width);
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_RANDOM_READ,
            SUB_WORD,
            2 + self.points.len() * 4,
        );
        buf.extend_from_slice(&cnt);
        for &point in &self.points {
            let addr = point_bytes(point);
            buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code()]);
        }
        buf
    }
}

/// Command for writing a scattered list of device addresses.
#[derive(Debug, Clone)]
pub struct RandomWriteCommand {
    device: DeviceType,
    points: Vec<u16>,
    values: Vec<u8>,
    width: usize,
}

impl RandomWriteCommand {
    /// Creates a random write pairing each point with one value.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide,
    /// `SizeMismatch` when the arrays differ in length, or `EmptyInput` when
    /// they are empty.
    pub fn new<T: Element>(points: &[u16], values: &[T], device: DeviceType) -> Result<Self> {
        let width = element::device_width::<T>()?;
        if points.len() != values.len() {
            return Err(McError::SizeMismatch {
                points: points.len(),
                values: values.len(),
            });
        }
        if values.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        let mut packed = Vec::new();
        element::pack(values, &mut packed);
        Ok(Self {
            device,
            points: points.to_vec(),
            values: packed,
            width,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let count = self.points.len() as u16;
        let len = frame.request_length(15, self.points.len() * (4 + self.width));
        let cnt = random_count_bytes(count, self.width);
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_RANDOM_WRITE,
            SUB_WORD,
            2 + self.points.len() * (4 + self.width),
        );
        buf.extend_from_slice(&cnt);
        for (i, &point) in self.points.iter().enumerate() {
            let addr = point_bytes(point);
            buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code()]);
            buf.extend_from_slice(&self.values[i * self.width..(i + 1) * self.width]);
        }
        buf
    }
}

/// Command for reading absolute buffer memory.
#[derive(Debug, Clone)]
pub struct BufferReadCommand {
    address: u32,
    word_count: u16,
}

impl BufferReadCommand {
    /// Creates a buffer read of `count` elements of `T` at `address`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide.
    pub fn new<T: Element>(address: u32, count: u16) -> Result<Self> {
        let width = element::device_width::<T>()?;
        Ok(Self {
            address,
            word_count: (count as usize * width / 2) as u16,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let addr = address_bytes(self.address);
        let cnt = count_bytes(self.word_count);
        let mut buf = frame.begin_request(station, [0x0C, 0x00], CMD_BUFFER_READ, SUB_WORD, 6);
        buf.extend_from_slice(&addr);
        buf.extend_from_slice(&cnt);
        buf
    }
}

/// Command for writing absolute buffer memory.
#[derive(Debug, Clone)]
pub struct BufferWriteCommand {
    address: u32,
    word_count: u16,
    payload: Vec<u8>,
}

impl BufferWriteCommand {
    /// Creates a buffer write of `values` at `address`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 2 or 4 bytes wide,
    /// or `EmptyInput` when `values` is empty.
    pub fn new<T: Element>(address: u32, values: &[T]) -> Result<Self> {
        let width = element::device_width::<T>()?;
        if values.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        let mut payload = Vec::new();
        element::pack(values, &mut payload);
        Ok(Self {
            address,
            word_count: (values.len() * width / 2) as u16,
            payload,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let len = frame.request_length(19, self.payload.len());
        let addr = address_bytes(self.address);
        let cnt = count_bytes(self.word_count);
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_BUFFER_WRITE,
            SUB_WORD,
            6 + self.payload.len(),
        );
        buf.extend_from_slice(&addr);
        buf.extend_from_slice(&cnt);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Command for reading an intelligent-module buffer.
#[derive(Debug, Clone)]
pub struct ModuleReadCommand {
    module: u16,
    address: u32,
    byte_count: u16,
}

impl ModuleReadCommand {
    /// Creates a module buffer read of `count` elements of `T`.
    ///
    /// The wire address is `head_address + address * 2` (module buffers are
    /// word oriented but addressed in bytes).
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 1 to 4 bytes wide.
    pub fn new<T: Element>(module: u16, head_address: u32, address: u32, count: u16) -> Result<Self> {
        let width = element::module_width::<T>()?;
        Ok(Self {
            module,
            address: head_address + address * 2,
            byte_count: (count as usize * width) as u16,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let addr = address_bytes(self.address);
        let cnt = count_bytes(self.byte_count);
        let module = self.module.to_le_bytes();
        let mut buf = frame.begin_request(station, [0x0E, 0x00], CMD_MODULE_READ, SUB_WORD, 8);
        buf.extend_from_slice(&addr);
        buf.extend_from_slice(&cnt);
        buf.extend_from_slice(&module);
        buf
    }
}

/// Command for writing an intelligent-module buffer.
#[derive(Debug, Clone)]
pub struct ModuleWriteCommand {
    module: u16,
    address: u32,
    payload: Vec<u8>,
}

impl ModuleWriteCommand {
    /// Creates a module buffer write of `values`.
    ///
    /// # Errors
    ///
    /// Fails with `UnsupportedElementWidth` unless `T` is 1 to 4 bytes wide,
    /// or `EmptyInput` when `values` is empty.
    pub fn new<T: Element>(
        module: u16,
        head_address: u32,
        address: u32,
        values: &[T],
    ) -> Result<Self> {
        element::module_width::<T>()?;
        if values.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        let mut payload = Vec::new();
        element::pack(values, &mut payload);
        Ok(Self {
            module,
            address: head_address + address * 2,
            payload,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let len = frame.request_length(21, self.payload.len());
        let addr = address_bytes(self.address);
        let cnt = count_bytes(self.payload.len() as u16);
        let module = self.module.to_le_bytes();
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_MODULE_WRITE,
            SUB_WORD,
            8 + self.payload.len(),
        );
        buf.extend_from_slice(&addr);
        buf.extend_from_slice(&cnt);
        buf.extend_from_slice(&module);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Command for reading a run of device bits.
#[derive(Debug, Clone)]
pub struct BitReadCommand {
    device: DeviceType,
    point: u16,
    count: u16,
}

impl BitReadCommand {
    /// Creates a bit read of `count` points starting at `point`.
    pub fn new(point: u16, device: DeviceType, count: u16) -> Self {
        Self {
            device,
            point,
            count,
        }
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let addr = point_bytes(self.point);
        let cnt = count_bytes(self.count);
        let mut buf = frame.begin_request(station, [0x0C, 0x00], CMD_BATCH_READ, SUB_BIT, 6);
        buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code(), cnt[0], cnt[1]]);
        buf
    }
}

/// Command for writing one device bit.
#[derive(Debug, Clone)]
pub struct SingleBitWriteCommand {
    device: DeviceType,
    point: u16,
    state: bool,
}

impl SingleBitWriteCommand {
    /// Creates a single-bit write.
    pub fn new(point: u16, state: bool, device: DeviceType) -> Self {
        Self {
            device,
            point,
            state,
        }
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let addr = point_bytes(self.point);
        let on = if self.state { 0x10 } else { 0x00 };
        let mut buf = frame.begin_request(station, [0x0D, 0x00], CMD_BATCH_WRITE, SUB_BIT, 7);
        buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code(), 0x01, 0x00, on]);
        buf
    }
}

/// Command for writing a run of device bits, nibble packed two per byte.
#[derive(Debug, Clone)]
pub struct BitArrayWriteCommand {
    device: DeviceType,
    point: u16,
    payload: Vec<u8>,
    count: u16,
}

impl BitArrayWriteCommand {
    /// Creates a packed bit-array write starting at `point`.
    ///
    /// Each payload byte carries two consecutive bits: the first in the high
    /// nibble (0x10 when set), the second in the low nibble (0x01 when set).
    ///
    /// # Errors
    ///
    /// Fails with `EmptyInput` when `states` is empty or `OddSizeArray` when
    /// its length is odd.
    pub fn new(point: u16, states: &[bool], device: DeviceType) -> Result<Self> {
        if states.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        if states.len() % 2 != 0 {
            return Err(McError::OddSizeArray { len: states.len() });
        }
        let payload = states
            .chunks_exact(2)
            .map(|pair| {
                let mut b = 0u8;
                if pair[0] {
                    b |= 0x10;
                }
                if pair[1] {
                    b |= 0x01;
                }
                b
            })
            .collect();
        Ok(Self {
            device,
            point,
            payload,
            count: states.len() as u16,
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let len = frame.request_length(19, self.payload.len());
        let addr = point_bytes(self.point);
        let cnt = count_bytes(self.count);
        let mut buf = frame.begin_request(
            station,
            len,
            CMD_BATCH_WRITE,
            SUB_BIT,
            6 + self.payload.len(),
        );
        buf.extend_from_slice(&[addr[0], addr[1], addr[2], self.device.code(), cnt[0], cnt[1]]);
        buf.extend_from_slice(&self.payload);
        buf
    }
}

/// Command for writing bits at a scattered list of points.
#[derive(Debug, Clone)]
pub struct RandomBitWriteCommand {
    device: DeviceType,
    points: Vec<u16>,
    states: Vec<bool>,
}

impl RandomBitWriteCommand {
    /// Creates a multi-point bit write pairing each point with one state.
    ///
    /// # Errors
    ///
    /// Fails with `SizeMismatch` when the arrays differ in length, or
    /// `EmptyInput` when they are empty.
    pub fn new(points: &[u16], states: &[bool], device: DeviceType) -> Result<Self> {
        if points.len() != states.len() {
            return Err(McError::SizeMismatch {
                points: points.len(),
                values: states.len(),
            });
        }
        if states.is_empty() {
            return Err(McError::EmptyInput { operation: "write" });
        }
        Ok(Self {
            device,
            points: points.to_vec(),
            states: states.to_vec(),
        })
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(&self, frame: &FrameParams, station: Station) -> Vec<u8> {
        let count = self.points.len();
        let len = frame.request_length(14, count * 5);
        let mut buf = frame.begin_request(station, len, CMD_RANDOM_WRITE, SUB_BIT, 1 + count * 5);
        buf.push(count as u8);
        for (&point, &state) in self.points.iter().zip(&self.states) {
            let addr = point_bytes(point);
            buf.extend_from_slice(&[
                addr[0],
                addr[1],
                addr[2],
                self.device.code(),
                u8::from(state),
            ]);
        }
        buf
    }
}

/// Command for reading the CPU model name.
#[derive(Debug, Clone, Copy)]
pub struct CpuModelCommand;

impl CpuModelCommand {
    /// Serializes the command into a request frame.
    pub fn to_bytes(self, frame: &FrameParams, station: Station) -> Vec<u8> {
        frame.begin_request(station, [0x06, 0x00], CMD_CPU_MODEL, SUB_WORD, 0)
    }
}

/// Remote CPU control commands.
///
/// Constant-shape frames distinguished by command code and, for Run/Pause,
/// the forced-execution flag (0x03 forced, 0x01 normal) and the Run clear
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Remote RUN.
    Run {
        /// Execute even when another device holds the control right.
        forced: bool,
        /// Device clear performed before entering RUN.
        mode: ClearMode,
    },
    /// Remote PAUSE.
    Pause {
        /// Execute even when another device holds the control right.
        forced: bool,
    },
    /// Remote STOP.
    Stop,
    /// Remote RESET. The controller usually drops the connection while
    /// resetting, so the client swallows the post-send transport failure.
    Reset,
    /// Remote latch clear.
    LatchClear,
    /// Turn the CPU error LED off.
    ErrorLedOff,
}

impl ControlCommand {
    fn forced_byte(forced: bool) -> u8 {
        if forced {
            0x03
        } else {
            0x01
        }
    }

    /// Serializes the command into a request frame.
    pub fn to_bytes(self, frame: &FrameParams, station: Station) -> Vec<u8> {
        match self {
            ControlCommand::Run { forced, mode } => {
                let mut buf = frame.begin_request(station, [0x0A, 0x00], 0x1001, SUB_WORD, 4);
                buf.extend_from_slice(&[Self::forced_byte(forced), 0x00, mode.code(), 0x00]);
                buf
            }
            ControlCommand::Pause { forced } => {
                let mut buf = frame.begin_request(station, [0x08, 0x00], 0x1003, SUB_WORD, 2);
                buf.extend_from_slice(&[Self::forced_byte(forced), 0x00]);
                buf
            }
            ControlCommand::Stop => {
                let mut buf = frame.begin_request(station, [0x08, 0x00], 0x1002, SUB_WORD, 2);
                buf.extend_from_slice(&[0x01, 0x00]);
                buf
            }
            ControlCommand::Reset => {
                let mut buf = frame.begin_request(station, [0x08, 0x00], 0x1006, SUB_WORD, 2);
                buf.extend_from_slice(&[0x01, 0x00]);
                buf
            }
            ControlCommand::LatchClear => {
                let mut buf = frame.begin_request(station, [0x08, 0x00], 0x1005, SUB_WORD, 2);
                buf.extend_from_slice(&[0x01, 0x00]);
                buf
            }
            ControlCommand::ErrorLedOff => {
                frame.begin_request(station, [0x06, 0x00], 0x1617, SUB_WORD, 0)
            }
        }
    }
}
