use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::core::Error;
use super::sequence::{SequenceCounter, TRANSPORT_COUNTER_MAX};

/// Tag byte written after the transport counter
pub const TRANSPORT_TAG: u8 = 0x17;

/// Transport prefix length: 3-byte counter and tag
pub const TRANSPORT_PREFIX_LEN: usize = 4;

/// Prepends the 4-byte transport prefix to each datagram.
///
/// The prefix is a 24-bit little-endian frame counter followed by
/// [`TRANSPORT_TAG`]. It sits outside the Chapter 11 packet and is not part
/// of the recorder format.
#[derive(Debug, Clone)]
pub struct TransportFramer {
    counter: SequenceCounter,
}

impl Default for TransportFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportFramer {
    /// Creates a framer whose first frame carries counter 0
    pub fn new() -> Self {
        TransportFramer {
            counter: SequenceCounter::new(TRANSPORT_COUNTER_MAX),
        }
    }

    /// Counter value the next frame will carry
    pub fn next_count(&self) -> u32 {
        self.counter.peek()
    }

    /// Frames one buffer and advances the counter
    pub fn frame(&mut self, buffer: &[u8]) -> Bytes {
        let mut dst = BytesMut::with_capacity(TRANSPORT_PREFIX_LEN + buffer.len());
        self.put_prefix(&mut dst);
        dst.put_slice(buffer);
        dst.freeze()
    }

    fn put_prefix(&mut self, dst: &mut BytesMut) {
        let count = self.counter.next();
        dst.put_uint_le(count as u64, 3);
        dst.put_u8(TRANSPORT_TAG);
    }
}

impl Encoder<Bytes> for TransportFramer {
    type Error = Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(TRANSPORT_PREFIX_LEN + item.len());
        self.put_prefix(dst);
        dst.extend_from_slice(&item);
        Ok(())
    }
}
