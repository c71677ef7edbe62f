#![allow(dead_code)]
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;

pub const RCODE_NOERROR: u8 = 0;
pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_REFUSED: u8 = 5;

#[derive(Debug, Clone, Default)]
struct ZoneEntry {
    a: Vec<Ipv4Addr>,
    aaaa: Vec<Ipv6Addr>,
    ttl: u32,
    rcode: Option<u8>,
}

/// Fixed zone served by [`MockDnsServer`].
///
/// Names are matched case-insensitively without the trailing dot. Unknown
/// names get NXDOMAIN; known names without records of the asked type get an
/// empty NOERROR answer.
#[derive(Debug, Clone, Default)]
pub struct MockZone {
    entries: HashMap<String, ZoneEntry>,
    truncate_udp: bool,
    stale_reply_first: bool,
}

impl MockZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, name: &str, ips: &[&str], ttl: u32) -> Self {
        let entry = self.entry(name);
        entry.a = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        entry.ttl = ttl;
        self
    }

    pub fn with_aaaa(mut self, name: &str, ips: &[&str], ttl: u32) -> Self {
        let entry = self.entry(name);
        entry.aaaa = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        entry.ttl = ttl;
        self
    }

    pub fn with_rcode(mut self, name: &str, rcode: u8) -> Self {
        self.entry(name).rcode = Some(rcode);
        self
    }

    /// Answer every UDP query with TC set and no records, forcing a TCP retry.
    pub fn truncate_udp(mut self) -> Self {
        self.truncate_udp = true;
        self
    }

    /// Precede every UDP answer with a copy carrying a different query id,
    /// as a late reply to an earlier query would.
    pub fn stale_reply_first(mut self) -> Self {
        self.stale_reply_first = true;
        self
    }

    /// Mixed A/AAAA reference zone plus a two-record A set with TTL 60.
    pub fn standard() -> Self {
        Self::new()
            .with_a("1.example.com", &["192.168.2.1", "192.168.1.2"], 300)
            .with_aaaa("1.example.com", &["fd02:b47a:7800:cf3c:1234:1234:1234:1111"], 300)
            .with_aaaa("2.example.com", &["fd02:b47a:7800:cf3c::1"], 300)
            .with_a("3.example.com", &["192.168.2.1"], 300)
            .with_a("4.example.com", &["192.168.2.4"], 300)
            .with_aaaa("4.example.com", &["fd02:b47a:7800:cf3c::4"], 300)
            .with_a("pool.example.com", &["198.51.100.1", "198.51.100.2"], 60)
    }

    fn entry(&mut self, name: &str) -> &mut ZoneEntry {
        self.entries.entry(normalize(name)).or_default()
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

#[derive(Debug, Default)]
struct Counters {
    udp: AtomicUsize,
    tcp: AtomicUsize,
}

/// In-process DNS server answering A/AAAA queries from a [`MockZone`]
/// over UDP and TCP on the same loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(zone: MockZone) -> Result<Self, std::io::Error> {
        let (socket, listener) = Self::bind_pair().await?;
        let addr = socket.local_addr()?;

        let zone = Arc::new(zone);
        let counters = Arc::new(Counters::default());
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let udp_zone = Arc::clone(&zone);
        let udp_counters = Arc::clone(&counters);
        let tcp_zone = zone;
        let tcp_counters = Arc::clone(&counters);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_counters.udp.fetch_add(1, Ordering::SeqCst);
                            let truncate = udp_zone.truncate_udp;
                            if let Some(response) = build_response(&udp_zone, &buf[..len], truncate) {
                                if udp_zone.stale_reply_first {
                                    let mut stale = response.clone();
                                    stale[0] ^= 0xff;
                                    let _ = socket.send_to(&stale, peer).await;
                                }
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let zone = Arc::clone(&tcp_zone);
                            let counters = Arc::clone(&tcp_counters);
                            tokio::spawn(async move {
                                let Ok(len) = stream.read_u16().await else { return };
                                let mut query = vec![0u8; len as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                counters.tcp.fetch_add(1, Ordering::SeqCst);
                                if let Some(response) = build_response(&zone, &query, false) {
                                    let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                                    framed.extend_from_slice(&response);
                                    let _ = stream.write_all(&framed).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            counters,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// UDP socket and TCP listener sharing one ephemeral port.
    async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
        let mut last_error = None;

        for _ in 0..16 {
            let socket = UdpSocket::bind("127.0.0.1:0").await?;
            let addr = socket.local_addr()?;
            match TcpListener::bind(addr).await {
                Ok(listener) => return Ok((socket, listener)),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| std::io::Error::other("no free port")))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.counters.udp.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.counters.tcp.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.udp_queries() + self.tcp_queries()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Question name, its wire length and the query type.
fn parse_question(query: &[u8]) -> Option<(String, usize, u16)> {
    let mut pos = 12;
    let mut labels = Vec::new();

    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += len;
    }

    let qtype = u16::from_be_bytes([*query.get(pos)?, *query.get(pos + 1)?]);
    // name + qtype + qclass
    let question_len = pos + 4 - 12;
    if query.len() < 12 + question_len {
        return None;
    }

    Some((normalize(&labels.join(".")), question_len, qtype))
}

fn build_response(zone: &MockZone, query: &[u8], truncate: bool) -> Option<Vec<u8>> {
    if query.len() < 12 {
        return None;
    }
    let (name, question_len, qtype) = parse_question(query)?;

    let entry = zone.entries.get(&name);
    let rcode = match entry {
        None => RCODE_NXDOMAIN,
        Some(entry) => entry.rcode.unwrap_or(RCODE_NOERROR),
    };

    let mut rdatas: Vec<Vec<u8>> = Vec::new();
    if rcode == RCODE_NOERROR && !truncate {
        if let Some(entry) = entry {
            match qtype {
                TYPE_A => rdatas.extend(entry.a.iter().map(|ip| ip.octets().to_vec())),
                TYPE_AAAA => rdatas.extend(entry.aaaa.iter().map(|ip| ip.octets().to_vec())),
                _ => {}
            }
        }
    }
    let ttl = entry.map_or(0, |e| e.ttl);

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    // QR=1, RD=1, TC when truncating
    response.push(if truncate { 0x83 } else { 0x81 });
    // RA=1 + RCODE
    response.push(0x80 | rcode);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(rdatas.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..12 + question_len]);

    for rdata in rdatas {
        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&qtype.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&ttl.to_be_bytes());
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }

    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_for(name: &str, qtype: u16) -> Vec<u8> {
        let mut query = vec![0xab, 0xcd, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
        for label in name.split('.') {
            query.push(label.len() as u8);
            query.extend_from_slice(label.as_bytes());
        }
        query.push(0);
        query.extend_from_slice(&qtype.to_be_bytes());
        query.extend_from_slice(&[0x00, 0x01]);
        query
    }

    #[test]
    fn test_mock_response_builder() {
        let zone = MockZone::standard();
        let response = build_response(&zone, &query_for("pool.example.com", TYPE_A), false).unwrap();

        assert_eq!(response[0..2], [0xab, 0xcd]);
        assert_eq!(response[2], 0x81);
        assert_eq!(response[3] & 0x0f, RCODE_NOERROR);
        assert_eq!(response[6..8], [0x00, 0x02]);
    }

    #[test]
    fn test_unknown_name_is_nxdomain() {
        let zone = MockZone::standard();
        let response = build_response(&zone, &query_for("nope.example.com", TYPE_A), false).unwrap();
        assert_eq!(response[3] & 0x0f, RCODE_NXDOMAIN);
        assert_eq!(response[6..8], [0x00, 0x00]);
    }
}
