use bytes::{BufMut, Bytes, BytesMut};

use crate::core::{Error, Result};
use crate::time::RelativeTimeCounter;

/// Channel-specific data word for Ethernet format 0: one frame
pub const ETHERNET_CSDW: u32 = 1;

/// Synthetic Ethernet + IPv4 + UDP prefix emitted ahead of every inner message.
///
/// Multicast MAC 01:00:5E:00:00:0A, IPv4 192.168.28.150 -> 235.0.0.10,
/// UDP 51202 -> 4000. Never parsed, only copied.
pub const ETHERNET_FILLER: [u8; 42] = [
    0x01, 0x00, 0x5E, 0x00, 0x00, 0x0A, 0xF4, 0xEE, 0x08, 0xBB, 0x7A, 0xE7, 0x08, 0x00, 0x45,
    0x00, 0x00, 0x3C, 0xEA, 0x09, 0x00, 0x00, 0x01, 0x11, 0x07, 0x5F, 0xC0, 0xA8, 0x1C, 0x96,
    0xEB, 0x00, 0x00, 0x0A, 0xC8, 0x02, 0x0F, 0xA0, 0x00, 0x28, 0x82, 0x6A,
];

/// Bytes before the filler: CSDW, 8-byte RTC, frame length, reserved
pub const ENVELOPE_PREFIX_LEN: usize = 4 + 8 + 2 + 2;

/// Mask of the 14-bit synthetic frame length
pub const FRAME_LENGTH_MASK: u16 = 0x3FFF;

/// What to do when the synthetic frame length exceeds 14 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Fail the encode with a range error
    #[default]
    Reject,
    /// Keep only the low 14 bits
    Mask,
}

/// Wraps sub-protocol messages in an Ethernet format 0 envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct EthernetEnvelope {
    policy: LengthPolicy,
}

impl EthernetEnvelope {
    /// Creates an envelope encoder with the given overflow policy
    pub fn new(policy: LengthPolicy) -> Self {
        EthernetEnvelope { policy }
    }

    /// Synthetic frame length field for an inner message of `inner_len` bytes
    pub fn frame_length(&self, inner_len: usize) -> Result<u16> {
        let length = ETHERNET_FILLER.len() + inner_len;
        if length <= FRAME_LENGTH_MASK as usize {
            return Ok(length as u16);
        }

        match self.policy {
            LengthPolicy::Reject => Err(Error::range("synthetic_frame_length", length as u64, 14)),
            LengthPolicy::Mask => Ok((length & FRAME_LENGTH_MASK as usize) as u16),
        }
    }

    /// Prepends CSDW, RTC, frame length, reserved word and filler to `inner`
    pub fn wrap(&self, rtc: RelativeTimeCounter, inner: &[u8]) -> Result<Bytes> {
        let frame_length = self.frame_length(inner.len())?;

        let mut dst =
            BytesMut::with_capacity(ENVELOPE_PREFIX_LEN + ETHERNET_FILLER.len() + inner.len());
        dst.put_u32_le(ETHERNET_CSDW);
        dst.put_u64_le(rtc.ticks());
        dst.put_u16_le(frame_length);
        dst.put_u16(0); // reserved
        dst.put_slice(&ETHERNET_FILLER);
        dst.put_slice(inner);
        Ok(dst.freeze())
    }
}

/// Wraps `inner` using the default (rejecting) length policy
pub fn wrap(rtc: RelativeTimeCounter, inner: &[u8]) -> Result<Bytes> {
    EthernetEnvelope::default().wrap(rtc, inner)
}
