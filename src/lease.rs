// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum LeaseType {
    /// Derived from an instance's declarative NIC configuration.
    Static,
    /// Read from the DHCP server's leases file.
    Dynamic,
}

impl std::fmt::Display for LeaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LeaseType::Static => "static",
                LeaseType::Dynamic => "dynamic",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct NetworkLease {
    pub hostname: String,
    pub address: String,
    pub hwaddr: String,
    #[serde(rename = "type")]
    pub lease_type: LeaseType,
    /// Cluster member the lease was observed on.
    pub location: String,
}

/// One line of an ISC-style dnsmasq leases file:
/// `<expiry> <mac> <address> <hostname> <clientid>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsmasqLeaseEntry<'a> {
    pub hwaddr_raw: &'a str,
    pub address: &'a str,
    pub hostname: &'a str,
    pub client_id: &'a str,
}

/// Parse a dnsmasq leases file, keeping every line with at least five
/// whitespace-separated fields and ignoring the rest.
pub fn parse_dnsmasq_leases(content: &str) -> Vec<DnsmasqLeaseEntry<'_>> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() >= 5 {
            entries.push(DnsmasqLeaseEntry {
                hwaddr_raw: fields[1],
                address: fields[2],
                hostname: fields[3],
                client_id: fields[4],
            });
        }
    }
    entries
}

/// Canonicalize a raw MAC into colon-separated lowercase form.
///
/// dnsmasq records infiniband-style client addresses as a bare decimal
/// number; those are re-encoded as hex octet pairs. Anything already
/// colon-separated is lowercased as-is.
pub fn mac_from_raw(raw: &str) -> String {
    if raw.contains(':') {
        return raw.to_lowercase();
    }
    let mut octets = Vec::new();
    if let Ok(value) = raw.parse::<u64>() {
        let hex = format!("{value:x}");
        let mut tuple = String::new();
        for (i, c) in hex.chars().enumerate() {
            tuple.push(c);
            if i > 0 && (i + 1) % 2 == 0 {
                octets.push(std::mem::take(&mut tuple));
            }
        }
    }
    octets.join(":")
}

/// Pick the hardware address for a dynamic lease entry. When the
/// canonical MAC comes out shorter than the 17 chars of a full EUI-48,
/// the trailing 17 chars of the clientid field are used instead.
pub fn lease_hwaddr(canonical: String, client_id: &str) -> String {
    if canonical.len() < 17 && !client_id.is_empty() {
        let start = client_id.len().saturating_sub(17);
        client_id[start..].to_string()
    } else {
        canonical
    }
}
