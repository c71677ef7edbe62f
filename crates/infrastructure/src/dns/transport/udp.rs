use super::{transport_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use socksgate_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport, one ephemeral socket per query.
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| transport_error(self.server_addr, "failed to bind UDP socket", e))?;

        // Connecting filters out datagrams from any other peer.
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| transport_error(self.server_addr, "failed to connect UDP socket", e))?;

        let exchange = async {
            let bytes_sent = socket
                .send(message_bytes)
                .await
                .map_err(|e| transport_error(self.server_addr, "failed to send UDP query", e))?;

            debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

            let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
            // Stale or forged datagrams are skipped until the timeout fires.
            loop {
                let bytes_received = socket.recv(&mut recv_buf).await.map_err(|e| {
                    transport_error(self.server_addr, "failed to receive UDP response", e)
                })?;

                if bytes_received >= 2 && message_bytes.get(..2) == Some(&recv_buf[..2]) {
                    recv_buf.truncate(bytes_received);
                    return Ok::<_, DomainError>(recv_buf);
                }

                warn!(
                    server = %self.server_addr,
                    bytes_received = bytes_received,
                    "Discarding UDP datagram with mismatched query id"
                );
            }
        };

        let bytes = tokio::time::timeout(timeout, exchange).await.map_err(|_| {
            warn!(server = %self.server_addr, timeout_ms = timeout.as_millis() as u64, "UDP query timed out");
            DomainError::QueryTimeout
        })??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "UDP response received"
        );

        Ok(TransportResponse { bytes })
    }
}
