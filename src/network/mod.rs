//! Datagram transport module
//!
//! This module defines the sink every encoded buffer is handed to, and the
//! UDP implementation used on the wire. Sending is fire-and-forget: a failed
//! send surfaces as an I/O error and is never retried here.

mod udp;

pub use self::udp::bind_multicast_sender;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;

/// Accepts opaque datagrams for transmission
#[async_trait::async_trait]
pub trait DatagramSink: Send + Sync {
    /// Sends one datagram to `target`, returning the bytes sent
    async fn send_to(&self, packet: &[u8], target: SocketAddr) -> io::Result<usize>;
}

#[async_trait::async_trait]
impl<T> DatagramSink for Arc<T>
where
    T: DatagramSink + ?Sized,
{
    async fn send_to(&self, packet: &[u8], target: SocketAddr) -> io::Result<usize> {
        (**self).send_to(packet, target).await
    }
}

/// In-process sink delivering datagrams over a channel
#[async_trait::async_trait]
impl DatagramSink for mpsc::Sender<(Vec<u8>, SocketAddr)> {
    async fn send_to(&self, packet: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.send((packet.to_vec(), target))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionAborted, e.to_string()))?;
        Ok(packet.len())
    }
}
