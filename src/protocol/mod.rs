//! Wire protocol implementation module
//!
//! This module builds every layer of the emitted byte stream, innermost first:
//!
//! - IENA or iNET-X sub-protocol messages around a single sample
//! - the Ethernet format 0 envelope
//! - the outer Chapter 11 packet with its two word-sum checksums
//! - the transport prefix handed to the datagram sink
//!
//! plus the sequence counters that number each layer.

pub mod checksum;
pub mod codec;
pub mod ethernet;
pub mod iena;
pub mod inetx;
pub mod message;
pub mod packet;
pub mod sequence;

pub use self::checksum::checksum;
pub use self::codec::{TransportFramer, TRANSPORT_TAG};
pub use self::ethernet::{EthernetEnvelope, LengthPolicy, ETHERNET_FILLER};
pub use self::iena::{encode_iena, IenaHeader};
pub use self::inetx::{encode_inetx, InetxHeader};
pub use self::message::sub_protocol_message;
pub use self::packet::{encode_packet, Chapter11Packet, DataType};
pub use self::sequence::{SequenceCounter, SequenceCounters};
