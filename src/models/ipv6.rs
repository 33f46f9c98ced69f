//! IPv6 address block and CIDR notation utilities.
//!
//! Provides [`Ipv6Net`] for representing an IPv6 network as a base address plus
//! prefix length, along with the 128-bit mask arithmetic used to split it.

use crate::error::PlanError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Maximum length for an IPv6 prefix (128 bits).
pub const MAX_LENGTH: u8 = 128;

lazy_static! {
    static ref CIDR_RE: Regex =
        Regex::new(r"^([0-9A-Fa-f:.]+)(?:/(\d+))?$").expect("Invalid Regex?");
    static ref PREFIX_LEN_RE: Regex =
        Regex::new(r"^/?(-?\d{1,18})$").expect("Invalid Regex?");
}

/// Convert a prefix length to a network mask as u128.
///
/// # Examples
/// ```
/// use ipv6_subnet_planner::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFFu128 << 112);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u128, PlanError> {
    if len > MAX_LENGTH {
        Err(PlanError::PrefixOutOfRange(len.into()))
    } else {
        // shifting by the full width is None, which is the /0 mask
        Ok(u128::MAX
            .checked_shl(u32::from(MAX_LENGTH - len))
            .unwrap_or(0))
    }
}

/// Number of addresses covered by a prefix of `len`, None for /0 (2^128).
pub fn subnet_size(len: u8) -> Option<u128> {
    if len > MAX_LENGTH {
        return None;
    }
    1u128.checked_shl(u32::from(MAX_LENGTH - len))
}

/// Get the network address for a given address and prefix length.
pub fn cut_addr(addr: Ipv6Addr, len: u8) -> Result<Ipv6Addr, PlanError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv6Addr::from(u128::from(addr) & mask))
}

/// Calculate the last address in the block for a given address and prefix length.
pub fn last_addr(addr: Ipv6Addr, len: u8) -> Result<Ipv6Addr, PlanError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv6Addr::from((u128::from(addr) & mask) | !mask))
}

/// Returns the address following the block, None past the end of the address space.
pub fn ip_after_subnet(addr: Ipv6Addr, len: u8) -> Option<Ipv6Addr> {
    let size = subnet_size(len)?;
    let network = u128::from(cut_addr(addr, len).ok()?);
    network.checked_add(size).map(Ipv6Addr::from)
}

/// Parse a target prefix length typed as "48" or "/48".
///
/// Range checking is left to the request, so "-1" and "129" parse here.
pub fn parse_prefix_len(text: &str) -> Result<i64, PlanError> {
    let trimmed = text.trim();
    PREFIX_LEN_RE
        .captures(trimmed)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .ok_or_else(|| PlanError::parse(trimmed, "is not a prefix length"))
}

/// True when `len` splits the address on a whole hex digit.
pub fn is_nibble_aligned(len: u8) -> bool {
    len % 4 == 0
}

/// IPv6 network in CIDR notation, always held in canonical form (host bits clear).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv6Net {
    /// The network base address.
    addr: Ipv6Addr,
    /// The prefix length (0-128).
    len: u8,
}

impl Ipv6Net {
    /// Parse an `address[/len]` string, e.g. "2001:db8::/32".
    ///
    /// Parsing is non-strict: host bits set beyond the prefix are cleared
    /// instead of rejected. A missing prefix length means /128.
    pub fn new(addr_cidr: &str) -> Result<Ipv6Net, PlanError> {
        let trimmed = addr_cidr.trim();
        let caps = CIDR_RE
            .captures(trimmed)
            .ok_or_else(|| PlanError::parse(trimmed, "is not IPv6 CIDR notation"))?;

        let addr: Ipv6Addr = caps[1]
            .parse()
            .map_err(|_| PlanError::parse(trimmed, "is not a valid IPv6 address"))?;
        let len = match caps.get(2) {
            Some(len) => len
                .as_str()
                .parse::<u8>()
                .ok()
                .filter(|len| *len <= MAX_LENGTH)
                .ok_or_else(|| PlanError::parse(trimmed, "has an invalid prefix length"))?,
            None => MAX_LENGTH,
        };

        let net = Ipv6Net::from_parts(addr, len)?;
        if net.addr != addr {
            log::debug!("normalised {trimmed} to {net}");
        }
        Ok(net)
    }

    /// Build a network from an address and prefix length, clearing host bits.
    pub fn from_parts(addr: Ipv6Addr, len: u8) -> Result<Ipv6Net, PlanError> {
        Ok(Ipv6Net {
            addr: cut_addr(addr, len)?,
            len,
        })
    }

    /// Caller guarantees `len <= 128` and `bits` has no host bits set.
    pub(crate) fn from_bits(bits: u128, len: u8) -> Ipv6Net {
        Ipv6Net {
            addr: Ipv6Addr::from(bits),
            len,
        }
    }

    pub fn addr(&self) -> Ipv6Addr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn bits(&self) -> u128 {
        u128::from(self.addr)
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> Ipv6Addr {
        self.addr
    }

    /// Get the highest address in the block.
    pub fn hi(&self) -> Ipv6Addr {
        let host_bits = get_cidr_mask(self.len).map(|mask| !mask).unwrap_or(0);
        Ipv6Addr::from(self.bits() | host_bits)
    }

    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        self.lo() <= addr && addr <= self.hi()
    }

    /// True when `other` lies entirely inside this block.
    pub fn contains_net(&self, other: &Ipv6Net) -> bool {
        other.len >= self.len && self.contains(other.addr)
    }

    /// The block of the same size directly after this one.
    pub fn next_subnet(&self) -> Option<Ipv6Net> {
        ip_after_subnet(self.addr, self.len).map(|addr| Ipv6Net {
            addr,
            len: self.len,
        })
    }

    pub fn is_nibble_aligned(&self) -> bool {
        is_nibble_aligned(self.len)
    }
}

impl FromStr for Ipv6Net {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv6Net::new(s)
    }
}

impl std::fmt::Display for Ipv6Net {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl Serialize for Ipv6Net {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv6Net {
    fn deserialize<D>(deserializer: D) -> Result<Ipv6Net, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv6Net::new(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv6Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0);
        assert_eq!(get_cidr_mask(1).unwrap(), 1u128 << 127);
        assert_eq!(get_cidr_mask(64).unwrap(), 0xFFFF_FFFF_FFFF_FFFFu128 << 64);
        assert_eq!(get_cidr_mask(128).unwrap(), u128::MAX);
        assert_eq!(
            get_cidr_mask(129).unwrap_err(),
            PlanError::PrefixOutOfRange(129)
        );
    }

    #[test]
    fn test_subnet_size() {
        assert_eq!(subnet_size(128), Some(1));
        assert_eq!(subnet_size(64), Some(1u128 << 64));
        assert_eq!(subnet_size(1), Some(1u128 << 127));
        assert_eq!(subnet_size(0), None);
        assert_eq!(subnet_size(200), None);
    }

    #[test]
    fn test_cut_addr() {
        let ip = addr("2001:db8:1234:5678::42");
        assert_eq!(cut_addr(ip, 64).unwrap(), addr("2001:db8:1234:5678::"));
        assert_eq!(cut_addr(ip, 48).unwrap(), addr("2001:db8:1234::"));
        assert_eq!(cut_addr(ip, 36).unwrap(), addr("2001:db8:1000::"));
        assert_eq!(cut_addr(ip, 0).unwrap(), addr("::"));
        assert_eq!(cut_addr(ip, 128).unwrap(), ip);
        assert!(cut_addr(ip, 129).is_err());
    }

    #[test]
    fn test_last_addr() {
        let ip = addr("2001:db8::");
        assert_eq!(
            last_addr(ip, 32).unwrap(),
            addr("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff")
        );
        assert_eq!(
            last_addr(ip, 36).unwrap(),
            addr("2001:db8:fff:ffff:ffff:ffff:ffff:ffff")
        );
        assert_eq!(last_addr(ip, 128).unwrap(), ip);
    }

    #[test]
    fn test_ip_after_subnet() {
        assert_eq!(
            ip_after_subnet(addr("3fff:1::"), 48),
            Some(addr("3fff:1:1::"))
        );
        assert_eq!(
            ip_after_subnet(addr("3fff:1::"), 32),
            Some(addr("3fff:2::"))
        );
        assert_eq!(ip_after_subnet(addr("::1"), 128), Some(addr("::2")));
        assert_eq!(ip_after_subnet(addr("ffff::"), 16), None);
        assert_eq!(ip_after_subnet(addr("::"), 0), None);
    }

    #[test]
    fn test_new_default_prefix() {
        let net = Ipv6Net::new("2001:db8::1").unwrap();
        assert_eq!(net.prefix_len(), 128);
        assert_eq!(net.to_string(), "2001:db8::1/128");
    }

    #[test]
    fn test_new_non_strict() {
        let net = Ipv6Net::new(" 2001:db8:ffff::1/32 ").unwrap();
        assert_eq!(net.to_string(), "2001:db8::/32");
        assert_eq!(net, Ipv6Net::new("2001:db8::/32").unwrap());
    }

    #[test]
    fn test_new_rejects_garbage() {
        for bad in [
            "",
            "2001:db8::/",
            "2001:db8::/129",
            "2001:db8::/300",
            "2001:db8::/-1",
            "2001:db8:::/32",
            "10.0.0.0/8",
            "3fff:1::/32/48",
            "hello",
        ] {
            match Ipv6Net::new(bad) {
                Err(PlanError::Parse { .. }) => {}
                other => panic!("expected parse error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_lo_hi_contains() {
        let net = Ipv6Net::new("2001:db8::/36").unwrap();
        assert_eq!(net.lo(), addr("2001:db8::"));
        assert_eq!(net.hi(), addr("2001:db8:fff:ffff:ffff:ffff:ffff:ffff"));
        assert!(net.contains(addr("2001:db8:abc::1")));
        assert!(!net.contains(addr("2001:db8:1000::")));

        let all = Ipv6Net::new("::/0").unwrap();
        assert_eq!(all.hi(), Ipv6Addr::from(u128::MAX));
        assert!(all.contains_net(&net));
        assert!(!net.contains_net(&all));
    }

    #[test]
    fn test_next_subnet() {
        let net = Ipv6Net::new("2001:db8::/36").unwrap();
        assert_eq!(
            net.next_subnet().unwrap(),
            Ipv6Net::new("2001:db8:1000::/36").unwrap()
        );
        let top = Ipv6Net::new("ffff:ffff::/32").unwrap();
        assert_eq!(top.next_subnet(), None);
    }

    #[test]
    fn test_parse_prefix_len() {
        assert_eq!(parse_prefix_len("48").unwrap(), 48);
        assert_eq!(parse_prefix_len(" /56\n").unwrap(), 56);
        assert_eq!(parse_prefix_len("-1").unwrap(), -1);
        assert_eq!(parse_prefix_len("129").unwrap(), 129);
        assert!(parse_prefix_len("").is_err());
        assert!(parse_prefix_len("4 8").is_err());
        assert!(parse_prefix_len("forty").is_err());
        assert!(parse_prefix_len("9999999999999999999999").is_err());
    }

    #[test]
    fn test_nibble_alignment() {
        assert!(is_nibble_aligned(48));
        assert!(is_nibble_aligned(0));
        assert!(!is_nibble_aligned(50));
        assert!(!Ipv6Net::new("2001:db8::/33").unwrap().is_nibble_aligned());
    }

    #[test]
    fn test_ip6_cmp() {
        let net1 = Ipv6Net::new("2001:db8::/48").unwrap();
        let net2 = Ipv6Net::new("2001:db8:1::/48").unwrap();
        let net3 = Ipv6Net::new("2001:db8::/32").unwrap();
        assert!(net1 < net2);
        assert!(net3 < net1);
        assert!(net3.contains_net(&net2));
    }

    #[test]
    fn test_serde_round_trip_text() {
        let net = Ipv6Net::new("3fff:1::/48").unwrap();
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"3fff:1::/48\"");
        let back: Ipv6Net = serde_json::from_str("\"3fff:1::5/48\"").unwrap();
        assert_eq!(back, net);
        assert!(serde_json::from_str::<Ipv6Net>("\"nope\"").is_err());
    }
}
