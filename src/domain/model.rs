use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Address family as reported in the `addrtype` attribute of a host address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Mac,
    Hostname,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "ipv4"),
            AddressFamily::Ipv6 => write!(f, "ipv6"),
            AddressFamily::Mac => write!(f, "mac"),
            AddressFamily::Hostname => write!(f, "hostname"),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(AddressFamily::Ipv4),
            "ipv6" => Ok(AddressFamily::Ipv6),
            "mac" => Ok(AddressFamily::Mac),
            "hostname" => Ok(AddressFamily::Hostname),
            other => Err(format!("unknown address type '{other}'")),
        }
    }
}

/// Port state, spelled exactly as the scanner spells it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "closed")]
    Closed,
    #[serde(rename = "filtered")]
    Filtered,
    #[serde(rename = "unfiltered")]
    Unfiltered,
    #[serde(rename = "open|filtered")]
    OpenFiltered,
    #[serde(rename = "closed|filtered")]
    ClosedFiltered,
}

impl PortStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortStatus::Open => "open",
            PortStatus::Closed => "closed",
            PortStatus::Filtered => "filtered",
            PortStatus::Unfiltered => "unfiltered",
            PortStatus::OpenFiltered => "open|filtered",
            PortStatus::ClosedFiltered => "closed|filtered",
        }
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PortStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(PortStatus::Open),
            "closed" => Ok(PortStatus::Closed),
            "filtered" => Ok(PortStatus::Filtered),
            "unfiltered" => Ok(PortStatus::Unfiltered),
            "open|filtered" => Ok(PortStatus::OpenFiltered),
            "closed|filtered" => Ok(PortStatus::ClosedFiltered),
            other => Err(format!("unknown port state '{other}'")),
        }
    }
}

/// One examined port. Service details the scanner did not detect are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub num: u16,
    pub status: PortStatus,
    pub service: String,
    pub product: String,
    pub version: String,
}

impl Port {
    pub fn new(num: u16, status: PortStatus, service: impl Into<String>) -> Self {
        Self {
            num,
            status,
            service: service.into(),
            product: String::new(),
            version: String::new(),
        }
    }

    pub fn with_product(mut self, product: impl Into<String>, version: impl Into<String>) -> Self {
        self.product = product.into();
        self.version = version.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub addr: String,
    pub addr_type: AddressFamily,
    pub hostnames: Vec<String>,
    pub ports: Vec<Port>,
}

impl Host {
    pub fn new(addr: impl Into<String>, addr_type: AddressFamily) -> Self {
        Self {
            addr: addr.into(),
            addr_type,
            hostnames: Vec::new(),
            ports: Vec::new(),
        }
    }

    pub fn add_port(&mut self, port: Port) {
        self.ports.push(port);
    }

    pub fn add_hostname(&mut self, hostname: impl Into<String>) {
        self.hostnames.push(hostname.into());
    }

    pub fn open_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.status == PortStatus::Open)
    }
}

/// Hosts from every parsed report, in the order the reports were processed.
///
/// Populated once and only read afterwards; there is no way to add hosts to an
/// existing set. Hosts sharing an address across reports are kept as separate
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResults {
    hosts: Vec<Host>,
}

impl ScanResults {
    pub fn from_hosts(hosts: Vec<Host>) -> Self {
        Self { hosts }
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn open_port_count(&self) -> usize {
        self.hosts.iter().map(|h| h.open_ports().count()).sum()
    }
}

/// Which scanner invocation a target belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TargetGroup {
    Ipv6,
    Other,
}

impl fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetGroup::Ipv6 => write!(f, "ipv6"),
            TargetGroup::Other => write!(f, "ipv4/hostname"),
        }
    }
}

/// A finished scanner run whose report is waiting to be parsed.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub path: PathBuf,
    pub group: TargetGroup,
    pub targets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_round_trips_scanner_spelling() {
        for text in ["open", "closed", "filtered", "unfiltered", "open|filtered", "closed|filtered"] {
            let status: PortStatus = text.parse().unwrap();
            assert_eq!(status.to_string(), text);
        }
        assert!("Open".parse::<PortStatus>().is_err());
    }

    #[test]
    fn test_address_family_rejects_unknown() {
        assert_eq!("ipv6".parse::<AddressFamily>().unwrap(), AddressFamily::Ipv6);
        assert!("ipx".parse::<AddressFamily>().is_err());
    }

    #[test]
    fn test_open_port_count() {
        let mut host = Host::new("10.0.0.1", AddressFamily::Ipv4);
        host.add_port(Port::new(22, PortStatus::Open, "ssh"));
        host.add_port(Port::new(23, PortStatus::Closed, "telnet"));
        host.add_port(Port::new(80, PortStatus::Open, "http"));
        let results = ScanResults::from_hosts(vec![host]);

        assert_eq!(results.len(), 1);
        assert_eq!(results.open_port_count(), 2);
    }

    #[test]
    fn test_port_serializes_status_verbatim() {
        let port = Port::new(53, PortStatus::OpenFiltered, "domain");
        let json = serde_json::to_value(&port).unwrap();
        assert_eq!(json["status"], "open|filtered");
        assert_eq!(json["product"], "");
    }
}
