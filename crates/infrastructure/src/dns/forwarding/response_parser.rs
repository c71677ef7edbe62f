use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::RData;
use socksgate_domain::{AddressFamily, DomainError};
use std::net::IpAddr;
use tracing::debug;

/// Addresses of one family extracted from an upstream reply.
#[derive(Debug, Clone)]
pub struct DnsAnswer {
    /// Addresses of the requested family, in answer order.
    pub addresses: Vec<IpAddr>,

    /// Smallest TTL among those address records.
    pub min_ttl: Option<u32>,

    pub rcode: ResponseCode,

    pub truncated: bool,
}

impl DnsAnswer {
    pub fn is_success(&self) -> bool {
        self.rcode == ResponseCode::NoError
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse a reply to the query `expected_id`, keeping only `family` records.
    ///
    /// CNAME and other records in the answer section are skipped; the
    /// recursive upstream already appends the final address records.
    pub fn parse(
        response_bytes: &[u8],
        expected_id: u16,
        family: AddressFamily,
    ) -> Result<DnsAnswer, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "message is not a response".to_string(),
            ));
        }

        if message.id() != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {}",
                message.id(),
                expected_id
            )));
        }

        let rcode = message.response_code();
        let truncated = message.truncated();

        let mut addresses = Vec::with_capacity(message.answers().len().min(8));
        let mut min_ttl: Option<u32> = None;

        for record in message.answers() {
            let address = match (family, record.data()) {
                (AddressFamily::V4, RData::A(a)) => IpAddr::V4(a.0),
                (AddressFamily::V6, RData::AAAA(aaaa)) => IpAddr::V6(aaaa.0),
                _ => continue,
            };

            let record_ttl = record.ttl();
            min_ttl = Some(min_ttl.map_or(record_ttl, |current| current.min(record_ttl)));
            addresses.push(address);
        }

        debug!(
            rcode = ?rcode,
            family = %family,
            addresses = addresses.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsAnswer {
            addresses,
            min_ttl,
            rcode,
            truncated,
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
