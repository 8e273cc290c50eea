/// Modular counter that yields its current value and then advances.
///
/// `max` is inclusive: the counter yields `max` once and then wraps to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    value: u32,
    max: u32,
}

impl SequenceCounter {
    /// Creates a counter starting at 0 that wraps after yielding `max`
    pub const fn new(max: u32) -> Self {
        SequenceCounter { value: 0, max }
    }

    /// Returns the current value and advances
    pub fn next(&mut self) -> u32 {
        let current = self.value;
        self.value = if current >= self.max { 0 } else { current + 1 };
        current
    }

    /// Value the next call to `next` will return
    pub fn peek(&self) -> u32 {
        self.value
    }

    /// Inclusive upper bound
    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Chapter 11 packet sequence, 0..=255
pub const PACKET_SEQUENCE_MAX: u32 = u8::MAX as u32;

/// IENA sequence, 0..=65535
pub const IENA_SEQUENCE_MAX: u32 = u16::MAX as u32;

/// iNET-X sequence. The field is 32 bits wide but receivers of this stream
/// see it wrap after 255.
pub const INETX_SEQUENCE_MAX: u32 = 255;

/// Transport frame counter, 24 bits
pub const TRANSPORT_COUNTER_MAX: u32 = 0x00FF_FFFF;

/// The counters carried across emissions for one transmission session.
///
/// Each counter belongs to exactly one encoding path and advances once per
/// unit emitted on that path.
#[derive(Debug, Clone)]
pub struct SequenceCounters {
    /// Chapter 11 sequence on the data channel
    pub data_packet: SequenceCounter,
    /// Chapter 11 sequence on the time channel
    pub time_packet: SequenceCounter,
    /// IENA header sequence
    pub iena: SequenceCounter,
    /// iNET-X header sequence
    pub inetx: SequenceCounter,
}

impl Default for SequenceCounters {
    fn default() -> Self {
        SequenceCounters {
            data_packet: SequenceCounter::new(PACKET_SEQUENCE_MAX),
            time_packet: SequenceCounter::new(PACKET_SEQUENCE_MAX),
            iena: SequenceCounter::new(IENA_SEQUENCE_MAX),
            inetx: SequenceCounter::new(INETX_SEQUENCE_MAX),
        }
    }
}

impl SequenceCounters {
    /// Next Chapter 11 data-channel sequence number
    pub fn next_data_packet(&mut self) -> u8 {
        self.data_packet.next() as u8
    }

    /// Next Chapter 11 time-channel sequence number
    pub fn next_time_packet(&mut self) -> u8 {
        self.time_packet.next() as u8
    }

    /// Next IENA sequence
    pub fn next_iena(&mut self) -> u16 {
        self.iena.next() as u16
    }

    /// Next iNET-X sequence
    pub fn next_inetx(&mut self) -> u32 {
        self.inetx.next()
    }
}
