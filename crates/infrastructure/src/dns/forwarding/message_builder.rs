//! DNS Message Builder
//!
//! Constructs A/AAAA query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use socksgate_domain::{AddressFamily, DomainError};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build an address query and return its ID with the serialized bytes.
    ///
    /// Creates a standard recursive query with:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single question for the fully-qualified `domain`
    pub fn build_query(domain: &str, family: AddressFamily) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Self::fqdn(domain)?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(family));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn fqdn(domain: &str) -> Result<Name, DomainError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(DomainError::InvalidDomainName("empty hostname".to_string()));
        }

        let absolute = if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{domain}.")
        };

        Name::from_str(&absolute).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })
    }

    /// Serialize a Message to wire format bytes
    pub(crate) fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::RecordType;

    #[test]
    fn test_build_query_roundtrip() {
        let (id, bytes) = MessageBuilder::build_query("a.example.com", AddressFamily::V6).unwrap();

        let message = Message::from_vec(&bytes).unwrap();
        assert_eq!(message.id(), id);
        assert_eq!(bytes[2] & 0x01, 0x01, "RD flag should be set");

        let query = &message.queries()[0];
        assert_eq!(query.name().to_utf8(), "a.example.com.");
        assert_eq!(query.query_type(), RecordType::AAAA);
    }

    #[test]
    fn test_build_query_rejects_empty_name() {
        assert!(matches!(
            MessageBuilder::build_query("  ", AddressFamily::V4),
            Err(DomainError::InvalidDomainName(_))
        ));
    }
}
