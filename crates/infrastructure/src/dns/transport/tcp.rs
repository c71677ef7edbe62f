use super::{transport_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use socksgate_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// DNS over TCP transport (RFC 1035 §4.2.2 two-byte length framing).
///
/// Used as the retry path when a UDP answer comes back truncated.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn frame(message_bytes: &[u8]) -> Result<BytesMut, DomainError> {
        let len = u16::try_from(message_bytes.len()).map_err(|_| {
            DomainError::InvalidDnsResponse(format!(
                "DNS message too large for TCP framing: {} bytes",
                message_bytes.len()
            ))
        })?;

        let mut framed = BytesMut::with_capacity(2 + message_bytes.len());
        framed.put_u16(len);
        framed.put_slice(message_bytes);
        Ok(framed)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let framed = Self::frame(message_bytes)?;
        let server = self.server_addr;

        let exchange = async {
            let mut stream = TcpStream::connect(server)
                .await
                .map_err(|e| transport_error(server, "failed to connect", e))?;

            stream
                .write_all(&framed)
                .await
                .map_err(|e| transport_error(server, "failed to send TCP query", e))?;

            debug!(server = %server, bytes_sent = framed.len(), "TCP query sent");

            let response_len = stream
                .read_u16()
                .await
                .map_err(|e| transport_error(server, "failed to read TCP length prefix", e))?
                as usize;

            let mut response = vec![0u8; response_len];
            stream
                .read_exact(&mut response)
                .await
                .map_err(|e| transport_error(server, "failed to read TCP response", e))?;

            Ok::<_, DomainError>(response)
        };

        let bytes = tokio::time::timeout(timeout, exchange).await.map_err(|_| {
            warn!(server = %server, timeout_ms = timeout.as_millis() as u64, "TCP query timed out");
            DomainError::QueryTimeout
        })??;

        debug!(server = %server, bytes_received = bytes.len(), "TCP response received");

        Ok(TransportResponse { bytes })
    }
}
