//! IRIG Stream: IRIG 106 Chapter 10/11 telemetry over UDP multicast
//!
//! This library samples a periodic signal and streams each sample as an
//! IENA or iNET-X message, wrapped in an Ethernet format 0 envelope and a
//! Chapter 11 packet, with a once-per-second BCD time packet alongside.
//!
//! ```no_run
//! use irig_stream::{stream::Session, StreamConfig};
//!
//! # async fn run() -> irig_stream::Result<()> {
//! let session = Session::start(StreamConfig::default())?;
//! tokio::signal::ctrl_c().await?;
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```
pub mod core;
pub mod network;
pub mod protocol;
pub mod source;
pub mod stream;
pub mod time;
mod util;

// Re-export commonly used items
pub use core::{Encapsulation, Error, Result, StreamConfig, SubProtocol};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
