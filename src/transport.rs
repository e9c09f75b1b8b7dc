//! TCP and UDP transports for MC protocol exchanges.
//!
//! The transport layer only knows about sockets and bytes; frame layout and
//! validation live in the protocol layer. Both transports implement
//! [`Channel`], a blocking one-request-one-reply exchange, which is also the
//! seam test doubles plug into.
//!
//! # Constants
//!
//! - [`DEFAULT_MC_PORT`] - Default MC protocol port (5000)
//! - [`DEFAULT_TIMEOUT`] - Default send/receive timeout (2 seconds)
//! - [`MAX_PACKET_SIZE`] - Receive buffer size (4096 bytes)

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;

use tracing::trace;

use crate::error::Result;

/// Default MC protocol port.
pub const DEFAULT_MC_PORT: u16 = 5000;

/// Default timeout for send and receive operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Receive buffer size.
pub const MAX_PACKET_SIZE: usize = 4096;

/// Independent send and receive timeouts for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Applied to sends and to TCP connection establishment.
    pub send: Duration,
    /// Applied to receives.
    pub receive: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            send: DEFAULT_TIMEOUT,
            receive: DEFAULT_TIMEOUT,
        }
    }
}

/// A blocking request/reply exchange with a controller.
pub trait Channel {
    /// Sends one request frame and receives one reply frame.
    fn execute(&mut self, request: &[u8]) -> Result<Vec<u8>>;
}

/// TCP transport. One connection, one outstanding request at a time.
pub struct TcpChannel {
    stream: TcpStream,
    remote_addr: SocketAddr,
}

impl TcpChannel {
    /// Connects to the controller and applies the timeouts.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the connection cannot be established or
    /// configured.
    pub fn connect(remote_addr: SocketAddr, timeouts: Timeouts) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&remote_addr, timeouts.send)?;
        stream.set_write_timeout(Some(timeouts.send))?;
        stream.set_read_timeout(Some(timeouts.receive))?;
        stream.set_nodelay(true)?;
        trace!(%remote_addr, "tcp channel connected");
        Ok(Self {
            stream,
            remote_addr,
        })
    }

    /// Returns the remote controller address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl Channel for TcpChannel {
    fn execute(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        self.stream.write_all(request)?;
        let mut buffer = vec![0u8; MAX_PACKET_SIZE];
        let size = self.stream.read(&mut buffer)?;
        buffer.truncate(size);
        trace!(sent = request.len(), received = size, "tcp exchange");
        Ok(buffer)
    }
}

impl std::fmt::Debug for TcpChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpChannel")
            .field("remote_addr", &self.remote_addr)
            .field("local_addr", &self.stream.local_addr().ok())
            .finish()
    }
}

/// UDP transport. Binds an ephemeral local port and connects the socket to
/// the controller so stray datagrams from other peers are dropped.
pub struct UdpChannel {
    socket: UdpSocket,
    remote_addr: SocketAddr,
}

impl UdpChannel {
    /// Creates a socket bound to any local port and applies the timeouts.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket cannot be created or configured.
    pub fn connect(remote_addr: SocketAddr, timeouts: Timeouts) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(remote_addr)?;
        socket.set_write_timeout(Some(timeouts.send))?;
        socket.set_read_timeout(Some(timeouts.receive))?;
        trace!(%remote_addr, "udp channel ready");
        Ok(Self {
            socket,
            remote_addr,
        })
    }

    /// Returns the remote controller address.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

impl Channel for UdpChannel {
    fn execute(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        self.socket.send(request)?;
        let mut buffer = vec![0u8; MAX_PACKET_SIZE];
        let size = self.socket.recv(&mut buffer)?;
        buffer.truncate(size);
        trace!(sent = request.len(), received = size, "udp exchange");
        Ok(buffer)
    }
}

impl std::fmt::Debug for UdpChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpChannel")
            .field("remote_addr", &self.remote_addr)
            .field("local_addr", &self.socket.local_addr().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_MC_PORT, 5000);
        assert_eq!(Timeouts::default().send, Duration::from_secs(2));
        assert_eq!(Timeouts::default().receive, Duration::from_secs(2));
    }

    #[test]
    fn test_udp_channel_creation() {
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let channel = UdpChannel::connect(addr, Timeouts::default()).unwrap();
        assert_eq!(channel.remote_addr(), addr);
    }

    #[test]
    fn test_udp_channel_debug() {
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let channel = UdpChannel::connect(addr, Timeouts::default()).unwrap();
        let debug_str = format!("{channel:?}");
        assert!(debug_str.contains("UdpChannel"));
        assert!(debug_str.contains("127.0.0.1:5000"));
    }

    #[test]
    fn test_tcp_echo_round_trip() {
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            stream.write_all(&buf[..n]).unwrap();
        });

        let mut channel = TcpChannel::connect(addr, Timeouts::default()).unwrap();
        let reply = channel.execute(&[0x50, 0x00, 0x01]).unwrap();
        assert_eq!(reply, vec![0x50, 0x00, 0x01]);
        server.join().unwrap();
    }
}
