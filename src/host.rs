// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const IFF_LOOPBACK: u64 = 0x8;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[non_exhaustive]
pub struct InterfaceCounters {
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub packets_received: u64,
    pub packets_sent: u64,
}

/// Runtime state of one host interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct InterfaceState {
    pub hwaddr: String,
    pub mtu: u32,
    /// Kernel operstate, e.g. `up`, `down`, `unknown`.
    pub state: String,
    pub counters: InterfaceCounters,
}

/// Host interface probing. The coordinators own the classification
/// priority; this collaborator answers the individual probes.
pub trait HostInterfaces: Send + Sync {
    fn interface_exists(&self, name: &str) -> bool;

    fn is_loopback(&self, name: &str) -> bool;

    /// `/sys/class/net/<name>/bridge` present.
    fn has_bridge_attr(&self, name: &str) -> bool;

    /// `/proc/net/vlan/<name>` present.
    fn has_vlan_entry(&self, name: &str) -> bool;

    /// `/sys/class/net/<name>/device` present.
    fn has_device_attr(&self, name: &str) -> bool;

    /// `/sys/class/net/<name>/bonding` present.
    fn has_bonding_attr(&self, name: &str) -> bool;

    /// Whether the OVS database knows a bridge of this name. OVS
    /// integration is an external concern; implementations without one
    /// inherit the `false` default.
    fn ovs_bridge_exists(&self, _name: &str) -> bool {
        false
    }

    fn interface_state(&self, name: &str) -> Option<InterfaceState>;
}

/// [HostInterfaces] backed by the kernel's sysfs/procfs trees. The
/// roots are configurable so tests can point it at a fixture tree.
#[derive(Debug, Clone)]
pub struct SysfsHost {
    sys_root: PathBuf,
    proc_root: PathBuf,
}

impl Default for SysfsHost {
    fn default() -> Self {
        Self::with_roots("/sys", "/proc")
    }
}

impl SysfsHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots<P: AsRef<Path>>(sys_root: P, proc_root: P) -> Self {
        Self {
            sys_root: sys_root.as_ref().to_path_buf(),
            proc_root: proc_root.as_ref().to_path_buf(),
        }
    }

    fn net_dir(&self, name: &str) -> PathBuf {
        self.sys_root.join("class/net").join(name)
    }

    fn read_trimmed(path: &Path) -> Option<String> {
        std::fs::read_to_string(path)
            .ok()
            .map(|s| s.trim().to_string())
    }

    fn read_u64(path: &Path) -> u64 {
        Self::read_trimmed(path)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }

    fn flags(&self, name: &str) -> u64 {
        Self::read_trimmed(&self.net_dir(name).join("flags"))
            .and_then(|s| {
                u64::from_str_radix(s.trim_start_matches("0x"), 16).ok()
            })
            .unwrap_or(0)
    }
}

impl HostInterfaces for SysfsHost {
    fn interface_exists(&self, name: &str) -> bool {
        self.net_dir(name).exists()
    }

    fn is_loopback(&self, name: &str) -> bool {
        self.flags(name) & IFF_LOOPBACK != 0
    }

    fn has_bridge_attr(&self, name: &str) -> bool {
        self.net_dir(name).join("bridge").exists()
    }

    fn has_vlan_entry(&self, name: &str) -> bool {
        self.proc_root.join("net/vlan").join(name).exists()
    }

    fn has_device_attr(&self, name: &str) -> bool {
        self.net_dir(name).join("device").exists()
    }

    fn has_bonding_attr(&self, name: &str) -> bool {
        self.net_dir(name).join("bonding").exists()
    }

    fn interface_state(&self, name: &str) -> Option<InterfaceState> {
        let dir = self.net_dir(name);
        if !dir.exists() {
            return None;
        }
        let stats = dir.join("statistics");
        Some(InterfaceState {
            hwaddr: Self::read_trimmed(&dir.join("address"))
                .unwrap_or_default(),
            mtu: Self::read_trimmed(&dir.join("mtu"))
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            state: Self::read_trimmed(&dir.join("operstate"))
                .unwrap_or_else(|| "unknown".to_string()),
            counters: InterfaceCounters {
                bytes_received: Self::read_u64(&stats.join("rx_bytes")),
                bytes_sent: Self::read_u64(&stats.join("tx_bytes")),
                packets_received: Self::read_u64(&stats.join("rx_packets")),
                packets_sent: Self::read_u64(&stats.join("tx_packets")),
            },
        })
    }
}
