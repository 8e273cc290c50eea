use bytes::{BufMut, Bytes, BytesMut};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::core::{Error, Result};

/// IENA key for this stream
pub const IENA_KEY: u16 = 0xD000;

/// IENA header length
pub const IENA_HEADER_LEN: usize = 16;

/// Length field value: header plus one 4-byte sample
pub const IENA_LENGTH: u16 = 20;

/// End-of-message marker written after the sample
pub const IENA_TRAILER: u16 = 0xDEAD;

/// Offset subtracted from the time tag
pub const IENA_TIME_OFFSET_MICROS: i64 = 27_000_000;

/// Largest value of the 48-bit time tag
const TIME_TAG_MAX: u64 = (1 << 48) - 1;

/// IENA header fields that vary per message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IenaHeader {
    /// Microseconds since the start of the year, less the fixed offset
    pub time_tag: u64,
    /// Message sequence
    pub sequence: u16,
}

impl IenaHeader {
    /// Creates a header stamped from the given local calendar time
    pub fn at(sequence: u16, now: &NaiveDateTime) -> Result<Self> {
        Ok(IenaHeader {
            time_tag: time_tag(now)?,
            sequence,
        })
    }

    /// Encodes the 16-byte big-endian header
    pub fn encode(&self) -> Result<[u8; IENA_HEADER_LEN]> {
        if self.time_tag > TIME_TAG_MAX {
            return Err(Error::range("iena_time_tag", self.time_tag, 48));
        }

        let mut header = [0u8; IENA_HEADER_LEN];
        let mut dst = &mut header[..];
        dst.put_u16(IENA_KEY);
        dst.put_u16(IENA_LENGTH);
        dst.put_uint(self.time_tag, 6);
        dst.put_u16(0); // status
        dst.put_u16(self.sequence);
        Ok(header)
    }
}

/// Microseconds elapsed since January 1 of the current year, minus the
/// 27-second offset
pub fn time_tag(now: &NaiveDateTime) -> Result<u64> {
    let new_year = NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::timing(format!("No January 1 for year {}", now.year())))?;

    let micros = (*now - new_year)
        .num_microseconds()
        .ok_or_else(|| Error::timing("Time since new year overflows microseconds"))?
        - IENA_TIME_OFFSET_MICROS;

    u64::try_from(micros).map_err(|_| Error::range("iena_time_tag", micros, 48))
}

/// Builds the IENA header for `sequence` at `now`
pub fn encode_iena(sequence: u16, now: &NaiveDateTime) -> Result<[u8; IENA_HEADER_LEN]> {
    IenaHeader::at(sequence, now)?.encode()
}

/// Builds a complete IENA message: header, big-endian sample, trailer
pub fn iena_message(header: &IenaHeader, sample: f32) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(IENA_HEADER_LEN + 4 + 2);
    dst.put_slice(&header.encode()?);
    dst.put_f32(sample);
    dst.put_u16(IENA_TRAILER);
    Ok(dst.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_header_at_fixed_instant() {
        let now = instant(2024, 1, 1, 0, 1, 0);
        let header = encode_iena(0, &now).unwrap();

        assert_eq!(&header[0..2], &[0xD0, 0x00]);
        assert_eq!(&header[2..4], &[0x00, 20]);
        // 60 s - 27 s = 33_000_000 us = 0x0001F78A40
        assert_eq!(&header[4..10], &[0x00, 0x00, 0x01, 0xF7, 0x8A, 0x40]);
        assert_eq!(&header[10..12], &[0x00, 0x00]);
        assert_eq!(&header[12..14], &[0x00, 0x00]);
        assert_eq!(&header[14..16], &[0x00, 0x00]);
    }

    #[test]
    fn test_sequence_is_last_field() {
        let now = instant(2024, 6, 1, 12, 0, 0);
        let header = encode_iena(0xBEEF, &now).unwrap();
        assert_eq!(&header[14..16], &[0xBE, 0xEF]);
    }

    #[test]
    fn test_time_tag_late_in_year() {
        let now = instant(2023, 12, 31, 23, 59, 59);
        let expected = (364 * 86_400 + 86_399 - 27) as u64 * 1_000_000;
        assert_eq!(time_tag(&now).unwrap(), expected);
    }

    #[test]
    fn test_time_tag_before_offset_is_range_error() {
        let now = instant(2024, 1, 1, 0, 0, 10);
        assert!(matches!(time_tag(&now), Err(Error::Range { .. })));
    }

    #[test]
    fn test_oversized_time_tag_rejected() {
        let header = IenaHeader {
            time_tag: 1 << 48,
            sequence: 0,
        };
        assert!(header.encode().is_err());
    }

    #[test]
    fn test_message_layout() {
        let header = IenaHeader::at(3, &instant(2024, 2, 2, 2, 2, 2)).unwrap();
        let message = iena_message(&header, 1.0).unwrap();

        assert_eq!(message.len(), 22);
        assert_eq!(&message[..16], &header.encode().unwrap());
        assert_eq!(&message[16..20], &[0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(&message[20..], &[0xDE, 0xAD]);
    }
}
