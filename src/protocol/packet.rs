use bytes::{BufMut, Bytes, BytesMut};

use crate::core::{Error, Result};
use crate::time::RelativeTimeCounter;
use super::checksum::checksum;

/// Packet sync pattern, written little-endian
pub const SYNC_PATTERN: u16 = 0xEB25;

/// Header bytes preceding the header checksum
pub const HEADER_FIELDS_LEN: usize = 22;

/// Full header length including the header checksum
pub const HEADER_LEN: usize = HEADER_FIELDS_LEN + 2;

/// Trailing data checksum length
pub const TRAILER_LEN: usize = 2;

/// Packet flags: data checksum present, no secondary header
pub const PACKET_FLAGS: u8 = 0x02;

/// Chapter 10 data types this encoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Time data, format 1
    Time = 17,
    /// Analog data, format 1
    Analog = 18,
    /// Ethernet data, format 0
    EthernetF0 = 105,
}

impl DataType {
    /// Data type version byte written alongside the data type
    pub fn version(&self) -> u8 {
        match self {
            DataType::Time => 6,
            DataType::Analog => 8,
            DataType::EthernetF0 => 6,
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            17 => Ok(DataType::Time),
            18 => Ok(DataType::Analog),
            105 => Ok(DataType::EthernetF0),
            other => Err(Error::UnsupportedDataType(other)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(data_type: DataType) -> u8 {
        data_type as u8
    }
}

/// An outer Chapter 11 packet, built fresh for every emission.
///
/// Lengths and both checksums are derived from the payload each time the
/// packet is encoded; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter11Packet {
    /// Channel id
    pub channel_id: u16,
    /// Per-channel sequence number
    pub sequence_number: u8,
    /// Payload data type
    pub data_type: DataType,
    /// Relative time counter at emission
    pub rtc: RelativeTimeCounter,
    /// Opaque payload
    pub payload: Bytes,
}

impl Chapter11Packet {
    /// Creates a new packet
    pub fn new(
        channel_id: u16,
        sequence_number: u8,
        data_type: DataType,
        rtc: RelativeTimeCounter,
        payload: impl Into<Bytes>,
    ) -> Self {
        Chapter11Packet {
            channel_id,
            sequence_number,
            data_type,
            rtc,
            payload: payload.into(),
        }
    }

    /// Value of the packet length field
    pub fn packet_length(&self) -> Result<u32> {
        let total = HEADER_LEN + self.payload.len() + TRAILER_LEN;
        u32::try_from(total).map_err(|_| Error::range("packet_length", total as u64, 32))
    }

    /// Encodes header, payload and data checksum
    pub fn encode(&self) -> Result<Bytes> {
        let packet_length = self.packet_length()?;
        // packet_length fits, so the shorter data length does too
        let data_length = self.payload.len() as u32;

        let mut dst = BytesMut::with_capacity(packet_length as usize);
        dst.put_u16_le(SYNC_PATTERN);
        dst.put_u16_le(self.channel_id);
        dst.put_u32_le(packet_length);
        dst.put_u32_le(data_length);
        dst.put_u8(self.data_type.version());
        dst.put_u8(self.sequence_number);
        dst.put_u8(PACKET_FLAGS);
        dst.put_u8(self.data_type.into());
        dst.put_uint_le(self.rtc.ticks(), 6);
        debug_assert_eq!(dst.len(), HEADER_FIELDS_LEN);

        let header_checksum = checksum(&dst);
        dst.put_u16_le(header_checksum);

        dst.put_slice(&self.payload);
        dst.put_u16_le(checksum(&self.payload));

        tracing::trace!(
            channel = self.channel_id,
            sequence = self.sequence_number,
            data_type = u8::from(self.data_type),
            len = dst.len(),
            "encoded chapter 11 packet"
        );

        Ok(dst.freeze())
    }
}

/// Encodes a packet in one call from raw field values
pub fn encode_packet(
    channel_id: u16,
    sequence_number: u8,
    data_type: u8,
    rtc: u64,
    payload: &[u8],
) -> Result<Bytes> {
    let data_type = DataType::try_from(data_type)?;
    let rtc = RelativeTimeCounter::new(rtc)?;

    Chapter11Packet::new(
        channel_id,
        sequence_number,
        data_type,
        rtc,
        Bytes::copy_from_slice(payload),
    )
    .encode()
}


#[cfg(test)]
mod tests {
    use super::decode::decode;
    use super::*;

    #[test]
    fn test_ten_byte_ethernet_packet() {
        let payload = [0xA5u8; 10];
        let packet = encode_packet(21, 0, 105, 0, &payload).unwrap();

        let decoded = decode(&packet);
        assert_eq!(decoded.packet_length, 24 + 10 + 2);
        assert_eq!(decoded.data_length, 10);
        assert_eq!(decoded.channel_id, 21);
        assert_eq!(decoded.data_type, 105);
        assert_eq!(decoded.data_type_version, 6);
        assert_eq!(decoded.packet_flags, PACKET_FLAGS);
        assert_eq!(decoded.payload, payload);
    }

    #[test]
    fn test_lengths_independent_of_payload_contents() {
        let a = encode_packet(21, 0, 105, 0, &[0u8; 10]).unwrap();
        let b = encode_packet(21, 0, 105, 0, &[0xFFu8; 10]).unwrap();
        assert_eq!(a[4..12], b[4..12]);
    }

    #[test]
    fn test_header_layout() {
        let packet = encode_packet(0x0102, 7, 17, 0x0605_0403_0201, &[]).unwrap();
        assert_eq!(
            &packet[..22],
            &[
                0x25, 0xEB, // sync
                0x02, 0x01, // channel
                0x1A, 0x00, 0x00, 0x00, // packet length 26
                0x00, 0x00, 0x00, 0x00, // data length
                0x06, // data type version
                0x07, // sequence
                0x02, // flags
                0x11, // data type 17
                0x01, 0x02, 0x03, 0x04, 0x05, 0x06, // rtc
            ]
        );
        assert_eq!(packet.len(), 26);
    }

    #[test]
    fn test_round_trip_all_data_types() {
        let payload: Vec<u8> = (0u8..=40).collect();
        for (data_type, version) in [(17u8, 6u8), (18, 8), (105, 6)] {
            let packet = encode_packet(3, 200, data_type, 12345, &payload).unwrap();
            let decoded = decode(&packet);
            assert_eq!(decoded.payload, payload);
            assert_eq!(decoded.data_length as usize, payload.len());
            assert_eq!(decoded.data_type, data_type);
            assert_eq!(decoded.data_type_version, version);
            assert_eq!(decoded.sequence_number, 200);
            assert_eq!(decoded.rtc, 12345);
        }
    }

    #[test]
    fn test_unsupported_data_type() {
        let result = encode_packet(21, 0, 0x09, 0, &[1, 2]);
        assert!(matches!(result, Err(Error::UnsupportedDataType(0x09))));
    }

    #[test]
    fn test_rtc_out_of_range() {
        let result = encode_packet(21, 0, 105, 1 << 48, &[1, 2]);
        assert!(matches!(result, Err(Error::Range { .. })));
    }

    #[test]
    fn test_checksums_follow_payload() {
        let rtc = RelativeTimeCounter::new(99).unwrap();
        let mut packet =
            Chapter11Packet::new(21, 1, DataType::Analog, rtc, vec![1u8, 0, 2, 0, 3, 0]);
        let first = decode(&packet.encode().unwrap());
        assert_eq!(first.data_checksum, 3);

        packet.payload = Bytes::from_static(&[1, 0, 2, 0, 3, 0, 4, 0]);
        let second = decode(&packet.encode().unwrap());
        assert_eq!(second.data_checksum, 6);
        assert_ne!(first.header_checksum, second.header_checksum);
    }
}
