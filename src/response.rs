//! MC protocol response validation and payload decoding.
//!
//! Every reply passes through [`Response::from_bytes`], which checks the
//! frame in a fixed order before any payload is touched: overall length,
//! return packet header byte, controller completion code, then the declared
//! data length against the bytes actually received. A response that survives
//! all four checks exposes its payload for typed decoding.

use crate::element::Element;
use crate::error::{McError, Result};
use crate::frame::FrameParams;

/// A validated MC protocol reply.
#[derive(Debug, Clone)]
pub struct Response {
    payload: Vec<u8>,
}

impl Response {
    /// Validates a raw reply against the frame variant parameters.
    ///
    /// # Errors
    ///
    /// - `ResponseTooShort` when the reply is not strictly longer than the
    ///   variant's minimum reply size (the smallest valid 3E reply is 11
    ///   bytes)
    /// - `ResponseHeaderCorrupt` when the first byte is not the variant's
    ///   return packet header
    /// - `ControllerError` when the completion code is nonzero
    /// - `ResponseLengthCorrupt` when the declared data length disagrees
    ///   with the number of bytes received
    pub fn from_bytes(bytes: &[u8], frame: &FrameParams) -> Result<Self> {
        if bytes.len() <= frame.min_response_length {
            return Err(McError::ResponseTooShort {
                len: bytes.len(),
                min: frame.min_response_length,
            });
        }
        if bytes[0] != frame.return_packet_header {
            return Err(McError::ResponseHeaderCorrupt {
                expected: frame.return_packet_header,
                actual: bytes[0],
            });
        }
        let code = u16::from_le_bytes([
            bytes[frame.error_code_position],
            bytes[frame.error_code_position + 1],
        ]);
        if code != 0 {
            return Err(McError::ControllerError { code });
        }
        let declared = u16::from_le_bytes([
            bytes[frame.data_length_position],
            bytes[frame.data_length_position + 1],
        ]) as usize;
        if declared + frame.error_code_position != bytes.len() {
            return Err(McError::ResponseLengthCorrupt {
                declared,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            payload: bytes[frame.return_value_position..].to_vec(),
        })
    }

    /// The raw payload bytes after the fixed reply header.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decodes the payload as `count` little-endian elements of `T`.
    ///
    /// # Errors
    ///
    /// Fails with `ResponseTooShort` when the payload holds fewer bytes than
    /// the elements require.
    pub fn to_elements<T: Element>(&self, count: usize) -> Result<Vec<T>> {
        let need = count * T::WIDTH;
        if self.payload.len() < need {
            return Err(McError::ResponseTooShort {
                len: self.payload.len(),
                min: need,
            });
        }
        Ok(self
            .payload
            .chunks_exact(T::WIDTH)
            .take(count)
            .map(T::get_le)
            .collect())
    }

    /// Decodes the payload as `count` nibble-packed bits.
    ///
    /// Each payload byte carries two points: the first in the high nibble,
    /// the second in the low nibble.
    ///
    /// # Errors
    ///
    /// Fails with `ResponseTooShort` when the payload holds fewer bytes than
    /// the bits require.
    pub fn to_bits(&self, count: usize) -> Result<Vec<bool>> {
        let need = count.div_ceil(2);
        if self.payload.len() < need {
            return Err(McError::ResponseTooShort {
                len: self.payload.len(),
                min: need,
            });
        }
        let mut bits = Vec::with_capacity(count);
        for i in 0..count {
            let byte = self.payload[i / 2];
            // Only bit 0 of each nibble is significant.
            let bit = if i % 2 == 0 { (byte >> 4) & 0x01 } else { byte & 0x01 };
            bits.push(bit != 0);
        }
        Ok(bits)
    }

    /// Decodes the payload as a CPU model name.
    ///
    /// The reply carries the ASCII name followed by a 2-byte CPU type code;
    /// the code and any NUL padding are dropped.
    pub fn to_model_name(&self) -> String {
        let text = if self.payload.len() >= 2 {
            &self.payload[..self.payload.len() - 2]
        } else {
            &self.payload[..]
        };
        text.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }
}
