//! Frame variant parameters, station addressing and field encoders.
//!
//! Every request shares one fixed layout:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | header prefix | variable | Per-variant subheader (2 bytes for 3E, 6 for 4E) |
//! | network no | 1 | Target network number |
//! | PC no | 1 | Target station number |
//! | destination CPU | 1 | Request destination module I/O, low byte |
//! | 0x03, 0x00 | 2 | Request destination module I/O, high byte + station |
//! | length | 2 | Declared request length, little-endian |
//! | 0x10, 0x00 | 2 | Monitoring timer |
//! | command | 2 | Command code, little-endian |
//! | subcommand | 2 | Subcommand code, little-endian |
//!
//! Command-specific address, count and payload fields follow. Responses mirror
//! the variant: header byte, declared length and end code sit at fixed offsets
//! held in [`FrameParams`], so one codec serves both the 3E and 4E frames.

use crate::device::DestinationCpu;

/// Per-variant frame constants, immutable for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameParams {
    /// Byte offset of the 2-byte end code in a response.
    pub error_code_position: usize,
    /// A response must be strictly longer than this to be considered at all.
    pub min_response_length: usize,
    /// Byte offset where response payload data begins.
    pub return_value_position: usize,
    /// Expected first byte of every response.
    pub return_packet_header: u8,
    /// Byte offset of the 2-byte declared length in a response.
    pub data_length_position: usize,
    /// Opaque subheader prepended to every outgoing request.
    pub header: Vec<u8>,
}

impl FrameParams {
    /// Constants for the QnA-compatible 3E frame (subheader `50 00`).
    pub fn qna_3e() -> Self {
        Self {
            error_code_position: 9,
            min_response_length: 10,
            return_value_position: 11,
            return_packet_header: 0xD0,
            data_length_position: 7,
            header: vec![0x50, 0x00],
        }
    }

    /// Constants for the QnA-compatible 4E frame (subheader `54 00` plus a
    /// caller-chosen serial number echoed by the controller).
    pub fn qna_4e(serial: u16) -> Self {
        let s = serial.to_le_bytes();
        Self {
            error_code_position: 13,
            min_response_length: 14,
            return_value_position: 15,
            return_packet_header: 0xD4,
            data_length_position: 11,
            header: vec![0x54, 0x00, s[0], s[1], 0x00, 0x00],
        }
    }

    /// Computes the declared request length field.
    ///
    /// `fixed_overhead` is the command family's byte count from the monitoring
    /// timer through the end of the fixed fields; the header prefix length and
    /// the variant's error-code offset enter the sum exactly as the hardware
    /// expects. Do not simplify this formula: controllers silently reject
    /// frames whose declared length deviates by even one byte.
    pub(crate) fn request_length(&self, fixed_overhead: usize, payload: usize) -> [u8; 2] {
        let len = fixed_overhead + self.header.len() + payload - self.error_code_position;
        (len as u16).to_le_bytes()
    }

    /// Starts a request buffer: header prefix, station bytes, fixed markers,
    /// declared length, monitoring timer, command and subcommand.
    pub(crate) fn begin_request(
        &self,
        station: Station,
        length: [u8; 2],
        command: u16,
        subcommand: u16,
        capacity: usize,
    ) -> Vec<u8> {
        let cmd = command.to_le_bytes();
        let sub = subcommand.to_le_bytes();
        let mut buf = Vec::with_capacity(self.header.len() + 13 + capacity);
        buf.extend_from_slice(&self.header);
        buf.extend_from_slice(&[
            station.network,
            station.pc,
            station.destination_cpu,
            0x03,
            0x00,
            length[0],
            length[1],
            0x10,
            0x00,
            cmd[0],
            cmd[1],
            sub[0],
            sub[1],
        ]);
        buf
    }
}

/// Station addressing triple placed in every request.
///
/// Mutable on the client; applied to the next request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Station {
    /// Network number (0x00 = local network).
    pub network: u8,
    /// PC (station) number (0xFF = the connected station).
    pub pc: u8,
    /// Destination CPU selector byte.
    pub destination_cpu: u8,
}

impl Station {
    /// Creates a station address.
    pub fn new(network: u8, pc: u8, destination_cpu: DestinationCpu) -> Self {
        Self {
            network,
            pc,
            destination_cpu: destination_cpu.code(),
        }
    }

    /// The connected local station (network 0, PC 0xFF, local CPU).
    pub fn local() -> Self {
        Self::new(0x00, 0xFF, DestinationCpu::LocalStation)
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::local()
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "0x{:02X}:0x{:02X}:0x{:02X}",
            self.network, self.pc, self.destination_cpu
        )
    }
}

/// Encodes a device point offset as the 3-byte little-endian address field.
pub(crate) fn point_bytes(point: u16) -> [u8; 3] {
    let b = (point as u32).to_le_bytes();
    [b[0], b[1], b[2]]
}

/// Encodes an absolute buffer address as 4 little-endian bytes.
pub(crate) fn address_bytes(address: u32) -> [u8; 4] {
    address.to_le_bytes()
}

/// Encodes a point/word count as 2 little-endian bytes.
pub(crate) fn count_bytes(count: u16) -> [u8; 2] {
    count.to_le_bytes()
}

/// Count sub-field for randomized multi-address operations.
///
/// The frame reserves independent sub-counts for word-class and
/// doubleword-class device lists. A homogeneous request populates only the
/// sub-count matching its width: width-2 elements use the generic 2-byte
/// encoding, width-4 elements zero the low sub-field and carry the count in
/// the high sub-field.
pub(crate) fn random_count_bytes(count: u16, width: usize) -> [u8; 2] {
    if width == 4 {
        [0x00, count as u8]
    } else {
        count_bytes(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qna_3e_constants() {
        let p = FrameParams::qna_3e();
        assert_eq!(p.error_code_position, 9);
        assert_eq!(p.min_response_length, 10);
        assert_eq!(p.return_value_position, 11);
        assert_eq!(p.return_packet_header, 0xD0);
        assert_eq!(p.data_length_position, 7);
        assert_eq!(p.header, vec![0x50, 0x00]);
    }

    #[test]
    fn test_qna_4e_constants() {
        let p = FrameParams::qna_4e(0x1234);
        assert_eq!(p.error_code_position, 13);
        assert_eq!(p.return_packet_header, 0xD4);
        assert_eq!(p.header, vec![0x54, 0x00, 0x34, 0x12, 0x00, 0x00]);
    }

    #[test]
    fn test_request_length_3e_word_write() {
        // Sequential word write: overhead 19, payload count*2. For the 3E
        // frame the declared length must be 12 + payload.
        let p = FrameParams::qna_3e();
        assert_eq!(p.request_length(19, 4), [0x10, 0x00]);
    }

    #[test]
    fn test_request_length_4e_matches_3e_body() {
        // The longer 4E prefix and larger error offset cancel out: the same
        // command declares the same length under both variants.
        let p3 = FrameParams::qna_3e();
        let p4 = FrameParams::qna_4e(0);
        assert_eq!(p3.request_length(19, 8), p4.request_length(19, 8));
        assert_eq!(p3.request_length(15, 12), p4.request_length(15, 12));
    }

    #[test]
    fn test_begin_request_layout() {
        let p = FrameParams::qna_3e();
        let buf = p.begin_request(Station::local(), [0x0C, 0x00], 0x0401, 0x0000, 0);
        assert_eq!(
            buf,
            [0x50, 0x00, 0x00, 0xFF, 0xFF, 0x03, 0x00, 0x0C, 0x00, 0x10, 0x00, 0x01, 0x04, 0x00,
             0x00]
        );
    }

    #[test]
    fn test_point_encoding() {
        assert_eq!(point_bytes(0x1234), [0x34, 0x12, 0x00]);
        assert_eq!(point_bytes(0), [0x00, 0x00, 0x00]);
        assert_eq!(address_bytes(0x0102_0304), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(count_bytes(0x0A0B), [0x0B, 0x0A]);
    }

    #[test]
    fn test_random_count_width_selects_subfield() {
        assert_eq!(random_count_bytes(3, 2), [0x03, 0x00]);
        assert_eq!(random_count_bytes(3, 4), [0x00, 0x03]);
    }

    #[test]
    fn test_station_display() {
        let s = Station::new(0x01, 0x02, DestinationCpu::MultiCpu1);
        assert_eq!(s.to_string(), "0x01:0x02:0xE0");
    }
}
