use serde::{Deserialize, Serialize};

/// Destination admission policy as written in the config file.
///
/// Entries are kept as strings here; they are compiled into an
/// `AdmissionPolicy` (and rejected if malformed) when the config is validated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Exact hostnames a client may connect to. Empty = no hostname allow-list.
    #[serde(default)]
    pub allowed_hostnames: Vec<String>,

    /// Hostnames that are always refused, even when allow-listed.
    #[serde(default)]
    pub rejected_hostnames: Vec<String>,

    /// CIDR networks or bare addresses a client may connect to.
    #[serde(default)]
    pub allowed_networks: Vec<String>,

    /// CIDR networks or bare addresses that are always refused.
    #[serde(default)]
    pub rejected_networks: Vec<String>,

    /// Refuse every BIND request
    #[serde(default)]
    pub disable_bind: bool,

    /// Refuse every UDP ASSOCIATE request
    #[serde(default)]
    pub disable_associate: bool,
}
