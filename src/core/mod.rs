//! Core types and traits for the telemetry encoder
//!
//! This module contains the error type and the session configuration shared
//! by every other module.

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{sampling_period, Encapsulation, StreamConfig, SubProtocol};

/// Default UDP destination port
pub const DEFAULT_PORT: u16 = 4000;

/// Default Chapter 11 channel for sample data
pub const DEFAULT_DATA_CHANNEL: u16 = 21;

/// Default Chapter 11 channel for time packets
pub const DEFAULT_TIME_CHANNEL: u16 = 1;

/// Maximum UDP payload size in bytes
pub const MAX_DATAGRAM_SIZE: usize = 65507;
