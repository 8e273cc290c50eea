use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::core::{Error, Result};

/// Channel-specific data word of the time packet.
///
/// Format 0x4 with the month/year date layout, source 0x1.
pub const TIME_CSDW: [u8; 4] = [0x41, 0x03, 0x00, 0x00];

/// Length of the time packet payload (CSDW + 8 BCD bytes)
pub const TIME_PAYLOAD_LEN: usize = TIME_CSDW.len() + 8;

/// Packs two decimal digits into one byte, high nibble first
fn pack_digits(high: u32, low: u32) -> u8 {
    (((high & 0xF) << 4) | (low & 0xF)) as u8
}

/// Packs a two-digit quantity as tens/units
fn pack_tens(value: u32) -> u8 {
    pack_digits(value / 10, value % 10)
}

/// Encodes calendar time as the 8 BCD bytes of the time packet.
///
/// Byte layout (high nibble | low nibble):
///
/// ```text
/// 0: hundreds of ms | tens of ms
/// 1: tens of seconds | seconds
/// 2: tens of minutes | minutes
/// 3: tens of hours   | hours
/// 4: tens of days    | days
/// 5: tens of months  | months
/// 6: tens of years   | years
/// 7: thousands of years | hundreds of years
/// ```
pub fn encode_bcd(now: &NaiveDateTime) -> Result<[u8; 8]> {
    let year = now.year();
    if !(0..=9999).contains(&year) {
        return Err(Error::range("year", year, 16));
    }
    let year = year as u32;

    // Leap seconds report 1_000_000_000+ nanoseconds; clamp into the last ms
    let millis = (now.nanosecond() / 1_000_000).min(999);

    Ok([
        pack_digits(millis / 100, (millis / 10) % 10),
        pack_tens(now.second()),
        pack_tens(now.minute()),
        pack_tens(now.hour()),
        pack_tens(now.day()),
        pack_tens(now.month()),
        pack_tens(year % 100),
        pack_digits(year / 1000, (year / 100) % 10),
    ])
}

/// Builds the full time packet payload: CSDW followed by the BCD time
pub fn time_packet_payload(now: &NaiveDateTime) -> Result<[u8; TIME_PAYLOAD_LEN]> {
    let bcd = encode_bcd(now)?;

    let mut payload = [0u8; TIME_PAYLOAD_LEN];
    payload[..TIME_CSDW.len()].copy_from_slice(&TIME_CSDW);
    payload[TIME_CSDW.len()..].copy_from_slice(&bcd);
    Ok(payload)
}
