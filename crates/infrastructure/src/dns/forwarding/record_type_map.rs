use hickory_proto::rr::RecordType as HickoryRecordType;
use socksgate_domain::AddressFamily;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    /// Address family → query type (A for IPv4, AAAA for IPv6)
    pub fn to_hickory(family: AddressFamily) -> HickoryRecordType {
        match family {
            AddressFamily::V4 => HickoryRecordType::A,
            AddressFamily::V6 => HickoryRecordType::AAAA,
        }
    }

    /// Query type → address family; `None` for anything but A/AAAA.
    pub fn from_hickory(record_type: HickoryRecordType) -> Option<AddressFamily> {
        match record_type {
            HickoryRecordType::A => Some(AddressFamily::V4),
            HickoryRecordType::AAAA => Some(AddressFamily::V6),
            _ => None,
        }
    }
}
