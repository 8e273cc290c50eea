use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Payload header convention wrapped around each sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubProtocol {
    /// 16-byte IENA header, sample, 0xDEAD trailer
    Iena,
    /// 28-byte iNET-X header followed by the sample
    Inetx,
}

/// How a sub-protocol message is carried to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encapsulation {
    /// Sub-protocol message sent as-is: no Chapter 11 packet, no transport frame
    Bare,
    /// Chapter 11 analog packet (data type 18) carrying the message directly
    Analog,
    /// Chapter 11 Ethernet format 0 packet (data type 105) around an Ethernet envelope
    EthernetFrame,
}

impl Encapsulation {
    /// Whether packets are wrapped in Chapter 11 and time packets are emitted
    pub fn is_chapter11(&self) -> bool {
        !matches!(self, Encapsulation::Bare)
    }
}

/// Configuration for a transmission session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Local interface the sending socket binds to
    pub bind_interface: Ipv4Addr,
    /// Multicast (or unicast) destination for every datagram
    pub destination: SocketAddr,
    /// Multicast time-to-live
    pub multicast_ttl: u32,
    /// Frequency of the generated signal in Hz
    pub signal_frequency: f64,
    /// Samples produced per second
    pub sample_rate: f64,
    /// Peak amplitude of the generated signal
    pub amplitude: f64,
    /// Period between transmitted packets
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub packet_interval: Duration,
    /// Chapter 11 channel carrying sample data
    pub data_channel_id: u16,
    /// Chapter 11 channel carrying time packets
    pub time_channel_id: u16,
    /// Sub-protocol wrapped around each sample
    pub sub_protocol: SubProtocol,
    /// Outer encapsulation
    pub encapsulation: Encapsulation,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            bind_interface: Ipv4Addr::UNSPECIFIED,
            destination: SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::new(235, 0, 0, 10),
                super::DEFAULT_PORT,
            )),
            multicast_ttl: 1,
            signal_frequency: 1.0,
            sample_rate: 100.0,
            amplitude: 1.0,
            packet_interval: Duration::from_secs(1),
            data_channel_id: super::DEFAULT_DATA_CHANNEL,
            time_channel_id: super::DEFAULT_TIME_CHANNEL,
            sub_protocol: SubProtocol::Iena,
            encapsulation: Encapsulation::EthernetFrame,
        }
    }
}

impl StreamConfig {
    /// Checks that the configuration describes a runnable session
    pub fn validate(&self) -> Result<()> {
        self.sample_period()?;
        if !(self.signal_frequency.is_finite() && self.signal_frequency > 0.0) {
            return Err(Error::config("Signal frequency must be positive"));
        }
        if !self.amplitude.is_finite() {
            return Err(Error::config("Amplitude must be finite"));
        }
        if self.packet_interval < Duration::from_millis(10) {
            return Err(Error::config("Packet interval too small"));
        }
        if self.data_channel_id == self.time_channel_id {
            return Err(Error::config(format!(
                "Data and time channels must differ (both {})",
                self.data_channel_id
            )));
        }
        if self.destination.port() == 0 {
            return Err(Error::config("Destination port must be non-zero"));
        }

        Ok(())
    }

    /// Sampling period of the signal source
    pub fn sample_period(&self) -> Result<Duration> {
        sampling_period(self.sample_rate)
    }
}

/// Converts a sampling rate in Hz to its period.
///
/// The period must be non-zero and representable as a `Duration`.
pub fn sampling_period(rate: f64) -> Result<Duration> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(Error::config(format!("Sample rate must be positive, got {}", rate)));
    }

    match Duration::try_from_secs_f64(1.0 / rate) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(Error::config(format!("Sample rate {} Hz has no usable period", rate))),
    }
}
