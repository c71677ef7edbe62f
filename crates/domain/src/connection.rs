use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Proxy command carried by a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    Bind,
    Associate,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Bind => "BIND",
            Command::Associate => "ASSOCIATE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "connect" => Ok(Command::Connect),
            "bind" => Ok(Command::Bind),
            "associate" | "udp-associate" => Ok(Command::Associate),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// IP address family requested from a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination of a connection request.
///
/// Uses `Arc<str>` so the hostname can be shared between the resolver and
/// the rule engine without copying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub hostname: Option<Arc<str>>,
    pub ip: Option<IpAddr>,
}

impl Destination {
    pub fn hostname(name: impl Into<Arc<str>>) -> Self {
        Self {
            hostname: Some(name.into()),
            ip: None,
        }
    }

    pub fn ip(ip: IpAddr) -> Self {
        Self {
            hostname: None,
            ip: Some(ip),
        }
    }

    /// Parse user input: an IP literal becomes an address, anything else a hostname.
    pub fn parse(input: &str) -> Self {
        match input.parse::<IpAddr>() {
            Ok(ip) => Self::ip(ip),
            Err(_) => Self::hostname(input),
        }
    }

    /// Attach the address a hostname resolved to.
    pub fn with_resolved(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn needs_resolution(&self) -> bool {
        self.hostname.is_some() && self.ip.is_none()
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.hostname, &self.ip) {
            (Some(name), Some(ip)) => write!(f, "{name} ({ip})"),
            (Some(name), None) => f.write_str(name),
            (None, Some(ip)) => write!(f, "{ip}"),
            (None, None) => f.write_str("<none>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub command: Command,
    pub destination: Destination,
}

impl ConnectionRequest {
    pub fn new(command: Command, destination: Destination) -> Self {
        Self {
            command,
            destination,
        }
    }

    pub fn connect(destination: Destination) -> Self {
        Self::new(Command::Connect, destination)
    }

    pub fn hostname(&self) -> Option<&str> {
        self.destination.hostname.as_deref()
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.destination.ip
    }
}
