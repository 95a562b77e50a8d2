// SPDX-License-Identifier: Apache-2.0

use crate::{lease_hwaddr, mac_from_raw, parse_dnsmasq_leases};

#[test]
fn test_mac_from_raw_colon_form() {
    assert_eq!(
        mac_from_raw("00:16:3E:AA:BB:CC"),
        "00:16:3e:aa:bb:cc"
    );
}

#[test]
fn test_mac_from_raw_decimal_form() {
    // 281474976710655 == ff:ff:ff:ff:ff:ff
    assert_eq!(mac_from_raw("281474976710655"), "ff:ff:ff:ff:ff:ff");
}

#[test]
fn test_mac_from_raw_short_decimal() {
    // Odd-length hex encoding loses the trailing nibble.
    assert_eq!(mac_from_raw("123456789"), "75:bc:d1");
}

#[test]
fn test_mac_from_raw_garbage() {
    assert_eq!(mac_from_raw("not-a-mac"), "");
}

#[test]
fn test_lease_hwaddr_keeps_full_mac() {
    assert_eq!(
        lease_hwaddr("00:16:3e:aa:bb:cc".to_string(), "ignored"),
        "00:16:3e:aa:bb:cc"
    );
}

#[test]
fn test_lease_hwaddr_falls_back_to_clientid_tail() {
    assert_eq!(
        lease_hwaddr("75:bc:d1".to_string(), "ff:00:16:3e:11:22:33"),
        "00:16:3e:11:22:33"
    );
}

#[test]
fn test_lease_hwaddr_short_clientid() {
    assert_eq!(lease_hwaddr("75:bc:d1".to_string(), "abc"), "abc");
}

#[test]
fn test_lease_hwaddr_empty_clientid() {
    assert_eq!(lease_hwaddr("75:bc:d1".to_string(), ""), "75:bc:d1");
}

#[test]
fn test_parse_dnsmasq_leases() {
    let content = "1700000000 00:16:3e:aa:bb:cc 10.0.0.10 inst1 *\n\
                   short line\n\
                   \n\
                   1700000001 00:16:3e:dd:ee:ff 10.0.0.50 inst2 01:ff\n";
    let entries = parse_dnsmasq_leases(content);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].hwaddr_raw, "00:16:3e:aa:bb:cc");
    assert_eq!(entries[0].address, "10.0.0.10");
    assert_eq!(entries[0].hostname, "inst1");
    assert_eq!(entries[0].client_id, "*");
    assert_eq!(entries[1].client_id, "01:ff");
}
