//! # MELSEC MC Protocol Library
//!
//! A Rust library for communicating with Mitsubishi MELSEC controllers over
//! Ethernet using the MC protocol (QnA-compatible 3E and 4E binary frames).
//!
//! This is a **protocol-only** library—no business logic, polling,
//! schedulers, or application-level features. Each call produces exactly 1
//! request and 1 response. No automatic retries or caching; the only
//! connection management is a lazy open, an optional reconnect per request,
//! and a drop of the channel after a transport fault.
//!
//! ## Features
//!
//! - **Protocol-only** — focuses solely on MC protocol framing
//! - **Two frame variants** — QnA-compatible 3E (default) and 4E
//! - **Two transports** — TCP (default) and UDP on port 5000
//! - **Type-safe** — device types as enums, element widths checked before
//!   any bytes are built
//! - **No panics** — all errors returned as `Result<T, McError>`
//! - **Complete API** — batch and random device access, bit access, buffer
//!   memory, intelligent-module buffers, CPU model name, remote control
//!
//! ## Quick Start
//!
//! ```no_run
//! use melsec_mc::{ClientConfig, DeviceType, McClient};
//! use std::net::Ipv4Addr;
//!
//! fn main() -> melsec_mc::Result<()> {
//!     let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 10).into());
//!     let mut client = McClient::new(config)?;
//!
//!     // Read 10 words from D100
//!     let words: Vec<u16> = client.read_elements(DeviceType::DataRegister, 100, 10)?;
//!     println!("D100-109: {words:?}");
//!
//!     // Write values to D200
//!     client.write_elements(DeviceType::DataRegister, 200, &[0x1234u16, 0x5678])?;
//!
//!     // Read a single bit from M5
//!     let bit = client.read_bit(DeviceType::InternalRelay, 5)?;
//!     println!("M5 = {bit}");
//!
//!     // Write a single bit
//!     client.write_bit(DeviceType::InternalRelay, 5, true)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Element widths
//!
//! Device and buffer operations are generic over [`Element`]: `u16`, `u32`,
//! and `f32` for device and buffer memory, plus `u8` for intelligent-module
//! buffers. Wider elements span two consecutive device points, and counts on
//! the wire are always in 16-bit words:
//!
//! ```no_run
//! # use melsec_mc::{ClientConfig, DeviceType, McClient};
//! # use std::net::Ipv4Addr;
//! # let mut client = McClient::new(ClientConfig::new(Ipv4Addr::LOCALHOST.into()))?;
//! // f32 spans D100/D101
//! let temp: f32 = client.read_element(DeviceType::DataRegister, 100)?;
//! client.write_elements(DeviceType::DataRegister, 100, &[25.5f32])?;
//!
//! // u32 at scattered points D10 and D20
//! let values: Vec<u32> = client.read_random(DeviceType::DataRegister, &[10, 20])?;
//! # Ok::<(), melsec_mc::McError>(())
//! ```
//!
//! ## CPU control
//!
//! ```no_run
//! # use melsec_mc::{ClearMode, ClientConfig, McClient};
//! # use std::net::Ipv4Addr;
//! # let mut client = McClient::new(ClientConfig::new(Ipv4Addr::LOCALHOST.into()))?;
//! println!("CPU: {}", client.read_cpu_model()?);
//! client.remote_stop()?;
//! client.remote_run(true, ClearMode::ExceptLatch)?;
//! # Ok::<(), melsec_mc::McError>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, McError>`]. The library never panics in
//! public code.
//!
//! ```no_run
//! use melsec_mc::{ClientConfig, DeviceType, McClient, McError};
//! use std::net::Ipv4Addr;
//!
//! let mut client = McClient::new(ClientConfig::new(Ipv4Addr::LOCALHOST.into()))?;
//! match client.read_elements::<u16>(DeviceType::DataRegister, 100, 10) {
//!     Ok(words) => println!("{words:?}"),
//!     Err(McError::ControllerError { code }) => {
//!         println!("controller completion code 0x{code:04X}");
//!     }
//!     Err(e) => println!("error: {e}"),
//! }
//! # Ok::<(), McError>(())
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use melsec_mc::{ClientConfig, Timeouts};
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 10).into())
//!     .with_port(5007)
//!     .with_udp()
//!     .with_reconnect_per_request()
//!     .with_timeouts(Timeouts {
//!         send: Duration::from_secs(1),
//!         receive: Duration::from_secs(5),
//!     });
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
mod command;
mod device;
mod element;
mod error;
mod frame;
mod response;
mod transport;

// Public re-exports
pub use client::{ClientConfig, McClient};
pub use command::{
    BatchReadCommand, BatchWriteCommand, BitArrayWriteCommand, BitReadCommand, BufferReadCommand,
    BufferWriteCommand, ControlCommand, CpuModelCommand, ModuleReadCommand, ModuleWriteCommand,
    RandomBitWriteCommand, RandomReadCommand, RandomWriteCommand, SingleBitWriteCommand,
};
pub use device::{ClearMode, DestinationCpu, DeviceType};
pub use element::Element;
pub use error::{McError, Result};
pub use frame::{FrameParams, Station};
pub use response::Response;
pub use transport::{
    Channel, TcpChannel, Timeouts, UdpChannel, DEFAULT_MC_PORT, DEFAULT_TIMEOUT, MAX_PACKET_SIZE,
};
