use bytes::{BufMut, Bytes, BytesMut};

/// iNET-X preamble word
pub const INETX_PREAMBLE: u32 = 0x1100_0000;

/// Stream id for this system's single stream
pub const INETX_STREAM_ID: u32 = 0xD000;

/// iNET-X header length
pub const INETX_HEADER_LEN: usize = 28;

/// Packet length field value: header plus one 4-byte sample
pub const INETX_PACKET_LENGTH: u32 = INETX_HEADER_LEN as u32 + 4;

/// iNET-X header fields that vary per message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InetxHeader {
    /// Stream sequence number
    pub sequence: u32,
    /// Whole seconds since the Unix epoch
    pub seconds: u32,
    /// Nanoseconds within the second
    pub nanos: u32,
}

impl InetxHeader {
    /// Encodes the 28-byte big-endian header
    pub fn encode(&self) -> [u8; INETX_HEADER_LEN] {
        let mut header = [0u8; INETX_HEADER_LEN];
        let mut dst = &mut header[..];
        dst.put_u32(INETX_PREAMBLE);
        dst.put_u32(INETX_STREAM_ID);
        dst.put_u32(self.sequence);
        dst.put_u32(INETX_PACKET_LENGTH);
        dst.put_u32(self.seconds);
        dst.put_u32(self.nanos);
        dst.put_u32(0); // payload info
        header
    }
}

/// Builds the iNET-X header for one message
pub fn encode_inetx(sequence: u32, seconds: u32, nanos: u32) -> [u8; INETX_HEADER_LEN] {
    InetxHeader {
        sequence,
        seconds,
        nanos,
    }
    .encode()
}

/// Builds a complete iNET-X message: header then big-endian sample
pub fn inetx_message(header: &InetxHeader, sample: f32) -> Bytes {
    let mut dst = BytesMut::with_capacity(INETX_PACKET_LENGTH as usize);
    dst.put_slice(&header.encode());
    dst.put_f32(sample);
    dst.freeze()
}
