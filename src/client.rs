//! High-level MC protocol client.
//!
//! This module provides the [`McClient`] struct, the primary interface for
//! talking to MELSEC controllers over Ethernet.
//!
//! # Overview
//!
//! The client handles:
//! - Command construction and serialization
//! - Lazy channel management with optional per-request reconnection
//! - Response validation and typed payload decoding
//! - Remote CPU control (Run/Stop/Pause/Reset/latch clear)
//!
//! # Example
//!
//! ```no_run
//! use melsec_mc::{ClientConfig, DeviceType, McClient};
//! use std::net::Ipv4Addr;
//!
//! let config = ClientConfig::new(Ipv4Addr::new(192, 168, 1, 10).into());
//! let mut client = McClient::new(config)?;
//!
//! // Read 10 words from D100
//! let words: Vec<u16> = client.read_elements(DeviceType::DataRegister, 100, 10)?;
//!
//! // Write a float to D200/D201
//! client.write_elements(DeviceType::DataRegister, 200, &[25.5f32])?;
//!
//! // Read and set bits
//! let m5 = client.read_bit(DeviceType::InternalRelay, 5)?;
//! client.write_bit(DeviceType::InternalRelay, 5, !m5)?;
//! # Ok::<(), melsec_mc::McError>(())
//! ```
//!
//! # Configuration
//!
//! [`ClientConfig`] selects the transport (TCP by default, UDP optional),
//! the frame variant (QnA 3E by default, 4E optional), the port, the
//! timeouts, and whether the connection is kept open between requests.
//!
//! # Connection lifecycle
//!
//! The channel opens on the first request. With `keep_connection` the same
//! channel serves every following request; without it the channel is dropped
//! after each one. Reconfiguring the endpoint, transport, or timeouts drops
//! the current channel so the next request picks up the new settings. A
//! transport failure also drops the channel, so the request after a fault
//! starts from a fresh connection.

use std::net::{IpAddr, SocketAddr};

use tracing::debug;

use crate::command::{
    BatchReadCommand, BatchWriteCommand, BitArrayWriteCommand, BitReadCommand, BufferReadCommand,
    BufferWriteCommand, ControlCommand, CpuModelCommand, ModuleReadCommand, ModuleWriteCommand,
    RandomBitWriteCommand, RandomReadCommand, RandomWriteCommand, SingleBitWriteCommand,
};
use crate::device::{ClearMode, DeviceType};
use crate::element::Element;
use crate::error::{McError, Result};
use crate::frame::{FrameParams, Station};
use crate::response::Response;
use crate::transport::{Channel, TcpChannel, Timeouts, UdpChannel, DEFAULT_MC_PORT};

/// Configuration for creating an MC protocol client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller IP address.
    pub ip: IpAddr,
    /// Controller port (default 5000).
    pub port: u16,
    /// Use TCP (default) or UDP.
    pub use_tcp: bool,
    /// Keep the channel open between requests (default) or reconnect per
    /// request.
    pub keep_connection: bool,
    /// Send and receive timeouts.
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Creates a configuration with the default port, TCP transport, kept
    /// connection, and default timeouts.
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            port: DEFAULT_MC_PORT,
            use_tcp: true,
            keep_connection: true,
            timeouts: Timeouts::default(),
        }
    }

    /// Sets a custom port (default is 5000).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Selects UDP instead of TCP.
    pub fn with_udp(mut self) -> Self {
        self.use_tcp = false;
        self
    }

    /// Reconnects for every request instead of keeping the channel open.
    pub fn with_reconnect_per_request(mut self) -> Self {
        self.keep_connection = false;
        self
    }

    /// Sets custom timeouts (default is 2 seconds each way).
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

type Opener = Box<dyn Fn(&ClientConfig) -> Result<Box<dyn Channel>> + Send>;

fn socket_opener() -> Opener {
    Box::new(|config: &ClientConfig| {
        let channel: Box<dyn Channel> = if config.use_tcp {
            Box::new(TcpChannel::connect(config.addr(), config.timeouts)?)
        } else {
            Box::new(UdpChannel::connect(config.addr(), config.timeouts)?)
        };
        Ok(channel)
    })
}

/// MC protocol client for MELSEC controllers.
///
/// Each operation produces exactly one request and one response. No
/// automatic retries or caching; the only connection management is the lazy
/// open and the drop-on-fault described on the module.
pub struct McClient {
    config: ClientConfig,
    frame: FrameParams,
    station: Station,
    channel: Option<Box<dyn Channel>>,
    opener: Opener,
    closed: bool,
}

impl McClient {
    /// Creates a client. The channel is not opened until the first request.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConfiguration` when the port is zero.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.port == 0 {
            return Err(McError::invalid_configuration("port must be nonzero"));
        }
        Ok(Self {
            config,
            frame: FrameParams::qna_3e(),
            station: Station::local(),
            channel: None,
            opener: socket_opener(),
            closed: false,
        })
    }

    /// Switches the frame variant used for every following request.
    pub fn set_frame(&mut self, frame: FrameParams) {
        self.frame = frame;
    }

    /// Sets the station addressing placed in every following request.
    pub fn set_station(&mut self, station: Station) {
        self.station = station;
    }

    /// Returns the current station addressing.
    pub fn station(&self) -> Station {
        self.station
    }

    /// Changes the controller IP address. Drops the current channel.
    pub fn set_ip(&mut self, ip: IpAddr) {
        self.config.ip = ip;
        self.channel = None;
    }

    /// Changes the controller port. Drops the current channel.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConfiguration` when the port is zero.
    pub fn set_port(&mut self, port: u16) -> Result<()> {
        if port == 0 {
            return Err(McError::invalid_configuration("port must be nonzero"));
        }
        self.config.port = port;
        self.channel = None;
        Ok(())
    }

    /// Switches between TCP and UDP. Drops the current channel.
    pub fn set_use_tcp(&mut self, use_tcp: bool) {
        self.config.use_tcp = use_tcp;
        self.channel = None;
    }

    /// Changes the timeouts. Drops the current channel so the new values
    /// apply to the next connection.
    pub fn set_timeouts(&mut self, timeouts: Timeouts) {
        self.config.timeouts = timeouts;
        self.channel = None;
    }

    /// Switches between kept and per-request connections. Turning keeping
    /// off drops the current channel immediately.
    pub fn set_keep_connection(&mut self, keep: bool) {
        self.config.keep_connection = keep;
        if !keep {
            self.channel = None;
        }
    }

    /// Closes the channel and refuses further requests. Idempotent.
    pub fn close(&mut self) {
        self.channel = None;
        self.closed = true;
    }

    #[cfg(test)]
    fn set_opener(&mut self, opener: Opener) {
        self.opener = opener;
    }

    fn transact(&mut self, request: &[u8]) -> Result<Response> {
        if self.closed {
            return Err(McError::ClientClosed);
        }
        if self.channel.is_none() {
            self.channel = Some((self.opener)(&self.config)?);
        }
        let outcome = self
            .channel
            .as_mut()
            .ok_or(McError::ClientClosed)?
            .execute(request);
        let raw = match outcome {
            Ok(raw) => raw,
            Err(error) => {
                self.channel = None;
                return Err(error);
            }
        };
        if !self.config.keep_connection {
            self.channel = None;
        }
        Response::from_bytes(&raw, &self.frame)
    }

    /// Reads `count` elements of `T` from consecutive device points.
    ///
    /// `T` may be `u16`, `u32`, or `f32`; wider elements consume two device
    /// points each.
    pub fn read_elements<T: Element>(
        &mut self,
        device: DeviceType,
        point: u16,
        count: u16,
    ) -> Result<Vec<T>> {
        let cmd = BatchReadCommand::new::<T>(point, device, count)?;
        let resp = self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        resp.to_elements(count as usize)
    }

    /// Reads one element of `T` from a device point.
    pub fn read_element<T: Element>(&mut self, device: DeviceType, point: u16) -> Result<T> {
        let mut values = self.read_elements::<T>(device, point, 1)?;
        values.pop().ok_or(McError::ResponseTooShort {
            len: 0,
            min: T::WIDTH,
        })
    }

    /// Writes elements to consecutive device points.
    pub fn write_elements<T: Element>(
        &mut self,
        device: DeviceType,
        point: u16,
        values: &[T],
    ) -> Result<()> {
        let cmd = BatchWriteCommand::new(point, values, device)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads one element of `T` at each of the given scattered points.
    pub fn read_random<T: Element>(
        &mut self,
        device: DeviceType,
        points: &[u16],
    ) -> Result<Vec<T>> {
        let cmd = RandomReadCommand::new::<T>(points, device)?;
        let resp = self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        resp.to_elements(points.len())
    }

    /// Writes one element to each of the given scattered points.
    pub fn write_random<T: Element>(
        &mut self,
        device: DeviceType,
        points: &[u16],
        values: &[T],
    ) -> Result<()> {
        let cmd = RandomWriteCommand::new(points, values, device)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads one word from a device point.
    pub fn read_u16(&mut self, device: DeviceType, point: u16) -> Result<u16> {
        self.read_element(device, point)
    }

    /// Reads one doubleword spanning two device points.
    pub fn read_u32(&mut self, device: DeviceType, point: u16) -> Result<u32> {
        self.read_element(device, point)
    }

    /// Reads one float spanning two device points.
    pub fn read_f32(&mut self, device: DeviceType, point: u16) -> Result<f32> {
        self.read_element(device, point)
    }

    /// Writes one word to a device point.
    pub fn write_u16(&mut self, device: DeviceType, point: u16, value: u16) -> Result<()> {
        self.write_elements(device, point, &[value])
    }

    /// Writes one doubleword spanning two device points.
    pub fn write_u32(&mut self, device: DeviceType, point: u16, value: u32) -> Result<()> {
        self.write_elements(device, point, &[value])
    }

    /// Writes one float spanning two device points.
    pub fn write_f32(&mut self, device: DeviceType, point: u16, value: f32) -> Result<()> {
        self.write_elements(device, point, &[value])
    }

    /// Reads `count` consecutive bit points.
    pub fn read_bits(
        &mut self,
        device: DeviceType,
        point: u16,
        count: u16,
    ) -> Result<Vec<bool>> {
        let cmd = BitReadCommand::new(point, device, count);
        let resp = self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        resp.to_bits(count as usize)
    }

    /// Reads one bit point.
    pub fn read_bit(&mut self, device: DeviceType, point: u16) -> Result<bool> {
        let bits = self.read_bits(device, point, 1)?;
        Ok(bits.first().copied().unwrap_or(false))
    }

    /// Writes one bit point.
    pub fn write_bit(&mut self, device: DeviceType, point: u16, state: bool) -> Result<()> {
        let cmd = SingleBitWriteCommand::new(point, state, device);
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Writes consecutive bit points.
    ///
    /// A single-element array is sent as a single-bit write; longer arrays
    /// must have even length because the wire format packs two bits per
    /// byte.
    pub fn write_bits(
        &mut self,
        device: DeviceType,
        point: u16,
        states: &[bool],
    ) -> Result<()> {
        if let [state] = states {
            return self.write_bit(device, point, *state);
        }
        let cmd = BitArrayWriteCommand::new(point, states, device)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads one bit at each of the given scattered points.
    ///
    /// Bits cannot be read randomly on the wire, so this reads the points as
    /// words and takes each word's least significant bit.
    pub fn read_bits_random(
        &mut self,
        device: DeviceType,
        points: &[u16],
    ) -> Result<Vec<bool>> {
        let words = self.read_random::<u16>(device, points)?;
        Ok(words.into_iter().map(|w| w & 1 != 0).collect())
    }

    /// Writes one bit to each of the given scattered points.
    pub fn write_bits_random(
        &mut self,
        device: DeviceType,
        points: &[u16],
        states: &[bool],
    ) -> Result<()> {
        let cmd = RandomBitWriteCommand::new(points, states, device)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads `count` elements of `T` from absolute buffer memory.
    pub fn read_buffer<T: Element>(&mut self, address: u32, count: u16) -> Result<Vec<T>> {
        let cmd = BufferReadCommand::new::<T>(address, count)?;
        let resp = self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        resp.to_elements(count as usize)
    }

    /// Writes elements to absolute buffer memory.
    pub fn write_buffer<T: Element>(&mut self, address: u32, values: &[T]) -> Result<()> {
        let cmd = BufferWriteCommand::new(address, values)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads `count` elements of `T` from an intelligent-module buffer.
    ///
    /// `T` may be `u8`, `u16`, `u32`, or `f32`. The wire address is
    /// `head_address + address * 2`.
    pub fn read_module<T: Element>(
        &mut self,
        module: u16,
        head_address: u32,
        address: u32,
        count: u16,
    ) -> Result<Vec<T>> {
        let cmd = ModuleReadCommand::new::<T>(module, head_address, address, count)?;
        let resp = self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        resp.to_elements(count as usize)
    }

    /// Writes elements to an intelligent-module buffer.
    pub fn write_module<T: Element>(
        &mut self,
        module: u16,
        head_address: u32,
        address: u32,
        values: &[T],
    ) -> Result<()> {
        let cmd = ModuleWriteCommand::new(module, head_address, address, values)?;
        self.transact(&cmd.to_bytes(&self.frame, self.station))?;
        Ok(())
    }

    /// Reads the CPU model name.
    pub fn read_cpu_model(&mut self) -> Result<String> {
        let request = CpuModelCommand.to_bytes(&self.frame, self.station);
        let resp = self.transact(&request)?;
        Ok(resp.to_model_name())
    }

    /// Switches the CPU to RUN.
    pub fn remote_run(&mut self, forced: bool, mode: ClearMode) -> Result<()> {
        self.control(ControlCommand::Run { forced, mode })
    }

    /// Switches the CPU to STOP.
    pub fn remote_stop(&mut self) -> Result<()> {
        self.control(ControlCommand::Stop)
    }

    /// Switches the CPU to PAUSE.
    pub fn remote_pause(&mut self, forced: bool) -> Result<()> {
        self.control(ControlCommand::Pause { forced })
    }

    /// Clears the CPU latch area. The CPU must be stopped first.
    pub fn remote_latch_clear(&mut self) -> Result<()> {
        self.control(ControlCommand::LatchClear)
    }

    /// Turns the CPU error LED off.
    pub fn error_led_off(&mut self) -> Result<()> {
        self.control(ControlCommand::ErrorLedOff)
    }

    /// Resets the CPU.
    ///
    /// The controller drops the connection while restarting, so any failure
    /// after the request is encoded is discarded rather than reported. The
    /// channel is dropped so the next request reconnects.
    pub fn remote_reset(&mut self) -> Result<()> {
        if self.closed {
            return Err(McError::ClientClosed);
        }
        let request = ControlCommand::Reset.to_bytes(&self.frame, self.station);
        if let Err(error) = self.transact(&request) {
            debug!(%error, "reset reply discarded, controller is restarting");
        }
        self.channel = None;
        Ok(())
    }

    fn control(&mut self, command: ControlCommand) -> Result<()> {
        self.transact(&command.to_bytes(&self.frame, self.station))?;
        Ok(())
    }
}

impl std::fmt::Debug for McClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McClient")
            .field("config", &self.config)
            .field("station", &self.station)
            .field("connected", &self.channel.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::net::Ipv4Addr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Reply = std::result::Result<Vec<u8>, std::io::ErrorKind>;

    #[derive(Default)]
    struct Script {
        replies: Mutex<VecDeque<Reply>>,
        sent: Mutex<Vec<Vec<u8>>>,
        opens: Mutex<usize>,
    }

    struct ScriptedChannel {
        script: Arc<Script>,
    }

    impl Channel for ScriptedChannel {
        fn execute(&mut self, request: &[u8]) -> Result<Vec<u8>> {
            self.script.sent.lock().unwrap().push(request.to_vec());
            match self.script.replies.lock().unwrap().pop_front() {
                Some(Ok(raw)) => Ok(raw),
                Some(Err(kind)) => Err(McError::Transport(kind.into())),
                None => panic!("unscripted exchange"),
            }
        }
    }

    fn reply_3e(payload: &[u8]) -> Vec<u8> {
        let declared = (2 + payload.len()) as u16;
        let mut buf = vec![0xD0, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00];
        buf.extend_from_slice(&declared.to_le_bytes());
        buf.extend_from_slice(&[0x00, 0x00]);
        buf.extend_from_slice(payload);
        buf
    }

    fn scripted(replies: Vec<Reply>) -> (McClient, Arc<Script>) {
        let script = Arc::new(Script {
            replies: Mutex::new(replies.into()),
            ..Script::default()
        });
        let config = ClientConfig::new(Ipv4Addr::LOCALHOST.into());
        let mut client = McClient::new(config).unwrap();
        let handle = Arc::clone(&script);
        client.set_opener(Box::new(move |_| {
            *handle.opens.lock().unwrap() += 1;
            Ok(Box::new(ScriptedChannel {
                script: Arc::clone(&handle),
            }))
        }));
        (client, script)
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = ClientConfig::new(Ipv4Addr::LOCALHOST.into()).with_port(0);
        assert!(matches!(
            McClient::new(config),
            Err(McError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_read_elements_round_trip() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[0x34, 0x12, 0x78, 0x56]))]);
        let words = client
            .read_elements::<u16>(DeviceType::DataRegister, 100, 2)
            .unwrap();
        assert_eq!(words, vec![0x1234, 0x5678]);

        let sent = script.sent.lock().unwrap();
        let expected = hex::decode("500000ffff03000c00100001040000640000a80200").unwrap();
        assert_eq!(sent.as_slice(), &[expected]);
    }

    #[test]
    fn test_typed_wrappers_round_trip() {
        let (mut client, script) = scripted(vec![
            Ok(reply_3e(&25.5f32.to_le_bytes())),
            Ok(reply_3e(&[])),
        ]);
        let value = client.read_f32(DeviceType::DataRegister, 100).unwrap();
        assert!((value - 25.5).abs() < f32::EPSILON);

        client
            .write_u32(DeviceType::DataRegister, 200, 0x0102_0304)
            .unwrap();
        let sent = script.sent.lock().unwrap();
        // f32 read covers two device points.
        assert_eq!(&sent[0][19..21], &[0x02, 0x00]);
        assert_eq!(&sent[1][21..], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_kept_connection_opens_once() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[0, 0])), Ok(reply_3e(&[0, 0]))]);
        client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        client
            .read_elements::<u16>(DeviceType::DataRegister, 1, 1)
            .unwrap();
        assert_eq!(*script.opens.lock().unwrap(), 1);
    }

    #[test]
    fn test_per_request_connection_reopens() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[0, 0])), Ok(reply_3e(&[0, 0]))]);
        client.set_keep_connection(false);
        client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        client
            .read_elements::<u16>(DeviceType::DataRegister, 1, 1)
            .unwrap();
        assert_eq!(*script.opens.lock().unwrap(), 2);
    }

    #[test]
    fn test_reconfiguration_drops_channel() {
        let replies: Vec<Reply> = (0..6).map(|_| Ok(reply_3e(&[0, 0]))).collect();
        let (mut client, script) = scripted(replies);
        let read = |client: &mut McClient| {
            client
                .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
                .unwrap();
        };

        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 1);

        // Each connection-affecting setter forces a fresh channel.
        client.set_port(5002).unwrap();
        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 2);

        client.set_ip(Ipv4Addr::new(192, 168, 1, 20).into());
        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 3);

        client.set_use_tcp(false);
        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 4);

        client.set_timeouts(Timeouts {
            send: Duration::from_secs(1),
            receive: Duration::from_secs(5),
        });
        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 5);

        // Station changes apply to the next request without reconnecting.
        client.set_station(Station::local());
        read(&mut client);
        assert_eq!(*script.opens.lock().unwrap(), 5);
    }

    #[test]
    fn test_transport_fault_drops_channel() {
        let (mut client, script) = scripted(vec![
            Err(std::io::ErrorKind::TimedOut),
            Ok(reply_3e(&[0, 0])),
        ]);
        let err = client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap_err();
        assert!(matches!(err, McError::Transport(_)));

        client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        assert_eq!(*script.opens.lock().unwrap(), 2);
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let (mut client, _script) = scripted(vec![]);
        client.close();
        client.close();
        let err = client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap_err();
        assert!(matches!(err, McError::ClientClosed));
        assert!(matches!(
            client.remote_reset().unwrap_err(),
            McError::ClientClosed
        ));
    }

    #[test]
    fn test_write_round_trip() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[]))]);
        client
            .write_elements(DeviceType::DataRegister, 50, &[0xABCDu16])
            .unwrap();
        let sent = script.sent.lock().unwrap();
        assert_eq!(&sent[0][11..13], &[0x01, 0x14]);
        assert_eq!(&sent[0][21..], &[0xCD, 0xAB]);
    }

    #[test]
    fn test_controller_error_surfaces() {
        let mut raw = reply_3e(&[]);
        raw[9] = 0x59;
        raw[10] = 0xC0;
        let (mut client, _script) = scripted(vec![Ok(raw)]);
        let err = client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap_err();
        assert!(matches!(err, McError::ControllerError { code: 0xC059 }));
    }

    #[test]
    fn test_read_bits_random_takes_lsb() {
        let (mut client, _script) = scripted(vec![Ok(reply_3e(&[0x01, 0x00, 0x08, 0x00]))]);
        let bits = client
            .read_bits_random(DeviceType::InternalRelay, &[1, 2])
            .unwrap();
        assert_eq!(bits, vec![true, false]);
    }

    #[test]
    fn test_write_bits_single_delegates_to_single_bit_write() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[]))]);
        client
            .write_bits(DeviceType::InternalRelay, 7, &[true])
            .unwrap();
        let sent = script.sent.lock().unwrap();
        // Single-bit form: literal length 0x0D, trailing on-byte.
        assert_eq!(&sent[0][7..9], &[0x0D, 0x00]);
        assert_eq!(*sent[0].last().unwrap(), 0x10);
    }

    #[test]
    fn test_reset_swallows_exchange_failure_and_reconnects() {
        let (mut client, script) = scripted(vec![
            Err(std::io::ErrorKind::ConnectionReset),
            Ok(reply_3e(&[0, 0])),
        ]);
        client.remote_reset().unwrap();
        client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        assert_eq!(*script.opens.lock().unwrap(), 2);
    }

    #[test]
    fn test_reset_swallows_controller_error() {
        let mut raw = reply_3e(&[]);
        raw[9] = 0x01;
        let (mut client, _script) = scripted(vec![Ok(raw)]);
        client.remote_reset().unwrap();
    }

    #[test]
    fn test_cpu_model_round_trip() {
        let mut payload = b"Q03UDECPU".to_vec();
        payload.extend_from_slice(&[0x90, 0x42]);
        let (mut client, script) = scripted(vec![Ok(reply_3e(&payload))]);
        assert_eq!(client.read_cpu_model().unwrap(), "Q03UDECPU");
        let sent = script.sent.lock().unwrap();
        assert_eq!(&sent[0][11..13], &[0x01, 0x01]);
    }

    #[test]
    fn test_qna_4e_frames_validate_against_4e_replies() {
        let (mut client, _script) = {
            let payload = [0x2A, 0x00];
            let declared = (2 + payload.len()) as u16;
            let mut raw = vec![
                0xD4, 0x00, 0x07, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00,
            ];
            raw.extend_from_slice(&declared.to_le_bytes());
            raw.extend_from_slice(&[0x00, 0x00]);
            raw.extend_from_slice(&payload);
            scripted(vec![Ok(raw)])
        };
        client.set_frame(FrameParams::qna_4e(7));
        let words = client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        assert_eq!(words, vec![42]);
    }

    #[test]
    fn test_station_applies_to_next_request() {
        let (mut client, script) = scripted(vec![Ok(reply_3e(&[0, 0]))]);
        client.set_station(Station::new(
            0x01,
            0x02,
            crate::device::DestinationCpu::MultiCpu2,
        ));
        client
            .read_elements::<u16>(DeviceType::DataRegister, 0, 1)
            .unwrap();
        let sent = script.sent.lock().unwrap();
        assert_eq!(&sent[0][2..5], &[0x01, 0x02, 0xE1]);
    }
}
