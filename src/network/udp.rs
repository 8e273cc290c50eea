use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::debug;

use crate::core::Result;
use super::DatagramSink;

/// Creates a non-blocking UDP socket for sending to multicast groups.
///
/// The socket is bound to an ephemeral port on `interface`, and outgoing
/// multicast traffic uses that interface and the given TTL. No group is
/// joined; sending does not require membership.
pub fn bind_multicast_sender(interface: Ipv4Addr, ttl: u32) -> Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    if !interface.is_unspecified() {
        socket.set_multicast_if_v4(&interface)?;
    }
    socket.set_multicast_ttl_v4(ttl)?;
    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::V4(SocketAddrV4::new(interface, 0)).into())?;

    let socket = UdpSocket::from_std(socket.into())?;
    debug!(local = ?socket.local_addr().ok(), ttl, "Bound multicast sender");

    Ok(socket)
}

#[async_trait::async_trait]
impl DatagramSink for UdpSocket {
    #[tracing::instrument(
        level = "trace",
        err,
        skip(self, packet),
        fields(packet.len = packet.len())
    )]
    async fn send_to(&self, packet: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, packet, target).await
    }
}
