use core::cmp::Ordering;
use core::fmt;
use core::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use core::ops::{BitAnd, BitOr, BitXor, Not};
use core::str::FromStr;

use alloc::string::ToString;

use crate::calc;
use crate::log::debug;
use crate::ParseError;

const IPV4_LEN: usize = 4;
const IPV6_LEN: usize = 16;

/// An IPv4 or IPv6 address held as big-endian bytes.
///
/// The bytes live in a fixed 16-byte buffer alongside the logical length, 4
/// for IPv4 and 16 for IPv6, so arithmetic never allocates. Bytes past the
/// logical length are always zero.
///
/// Building an `Address` from an [`IpAddr`] or from text canonicalizes it:
/// an IPv4-mapped IPv6 address such as `::ffff:192.0.2.1` collapses to the
/// 4-byte `192.0.2.1`. Building one from an [`Ipv6Addr`] or a `[u8; 16]`
/// keeps all 16 bytes, which is what masks need.
///
/// # Examples
///
/// ```
/// use ipwild::Address;
///
/// let a: Address = "::ffff:192.0.2.1".parse().unwrap();
/// assert_eq!(a.len(), 4);
/// assert_eq!(a.version(), 4);
/// assert_eq!(a.to_string(), "192.0.2.1");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    octets: [u8; IPV6_LEN],
    len: u8,
}

/// A bitmask applied to an [`Address`] of the same length.
///
/// Masks need not be contiguous. An absent mask is represented as
/// `Option::<Mask>::None`.
pub type Mask = Address;

/// Returns the canonical form of `ip`.
///
/// IPv4-mapped IPv6 addresses become 4-byte IPv4 addresses, everything else
/// keeps its family's length.
///
/// # Examples
///
/// ```
/// use std::net::IpAddr;
/// use ipwild::canonicalize;
///
/// let ip: IpAddr = "::ffff:192.0.2.0".parse().unwrap();
/// assert_eq!(canonicalize(ip).len(), 4);
/// let ip: IpAddr = "::1".parse().unwrap();
/// assert_eq!(canonicalize(ip).len(), 16);
/// ```
pub fn canonicalize(ip: IpAddr) -> Address {
    match ip.to_canonical() {
        IpAddr::V4(ip) => ip.into(),
        IpAddr::V6(ip) => ip.into(),
    }
}

impl Address {
    /// Returns an all-zero address of `len` bytes.
    pub(crate) const fn zeroed(len: usize) -> Address {
        Address {
            octets: [0; IPV6_LEN],
            len: len as u8,
        }
    }

    /// Returns `self` resized to `len` bytes, zeroing anything past `len`.
    pub(crate) fn resized(self, len: usize) -> Address {
        let mut out = Address::zeroed(len);
        out.octets[..len].copy_from_slice(&self.octets[..len]);
        out
    }

    /// The whole backing buffer, zero-padded past the logical length.
    pub(crate) const fn padded(&self) -> &[u8; IPV6_LEN] {
        &self.octets
    }

    pub(crate) fn octets_mut(&mut self) -> &mut [u8] {
        &mut self.octets[..self.len as usize]
    }

    /// Builds a canonical address from a 4 or 16 byte slice.
    ///
    /// Returns `None` for any other length. A 16-byte IPv4-mapped address
    /// collapses to 4 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use ipwild::Address;
    ///
    /// let a = Address::from_octets(&[192, 0, 2, 1]).unwrap();
    /// assert_eq!(a.to_string(), "192.0.2.1");
    /// assert!(Address::from_octets(&[10, 0, 0]).is_none());
    /// ```
    pub fn from_octets(octets: &[u8]) -> Option<Address> {
        if let Ok(v4) = <[u8; IPV4_LEN]>::try_from(octets) {
            return Some(v4.into());
        }
        let v6 = <[u8; IPV6_LEN]>::try_from(octets).ok()?;
        Some(canonicalize(IpAddr::V6(v6.into())))
    }

    /// The address bytes, most significant first.
    pub fn octets(&self) -> &[u8] {
        &self.octets[..self.len as usize]
    }

    /// The number of bytes in the address, 4 or 16.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// The IP version implied by the length, 4 or 6.
    pub const fn version(&self) -> u8 {
        if self.is_ipv4() {
            4
        } else {
            6
        }
    }

    /// Returns `true` for a 4-byte IPv4 address.
    pub const fn is_ipv4(&self) -> bool {
        self.len as usize == IPV4_LEN
    }

    /// Returns `true` for a 16-byte IPv6 address, including an IPv4-mapped
    /// one built from a raw `Ipv6Addr`.
    pub const fn is_ipv6(&self) -> bool {
        !self.is_ipv4()
    }

    /// The number of bits in the address, 32 or 128.
    pub const fn max_prefix_len(&self) -> u8 {
        self.len * 8
    }

    /// Returns the lowest address of the same length, all zeros.
    pub const fn min_value(&self) -> Address {
        Address::zeroed(self.len as usize)
    }

    /// Returns the highest address of the same length, all ones.
    pub fn max_value(&self) -> Address {
        !self.min_value()
    }

    /// Converts to the standard library representation.
    pub fn to_ip_addr(&self) -> IpAddr {
        if self.is_ipv4() {
            let mut v4 = [0; IPV4_LEN];
            v4.copy_from_slice(self.octets());
            IpAddr::V4(v4.into())
        } else {
            IpAddr::V6(self.octets.into())
        }
    }
}

impl From<[u8; IPV4_LEN]> for Address {
    fn from(octets: [u8; IPV4_LEN]) -> Address {
        let mut out = Address::zeroed(IPV4_LEN);
        out.octets[..IPV4_LEN].copy_from_slice(&octets);
        out
    }
}

impl From<[u8; IPV6_LEN]> for Address {
    fn from(octets: [u8; IPV6_LEN]) -> Address {
        Address {
            octets,
            len: IPV6_LEN as u8,
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Address {
        ip.octets().into()
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Address {
        ip.octets().into()
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Address {
        canonicalize(ip)
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> IpAddr {
        addr.to_ip_addr()
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Address, ParseError> {
        match s.parse::<IpAddr>() {
            Ok(ip) => Ok(canonicalize(ip)),
            Err(_) => {
                debug!("invalid IP address {:?}", s);
                Err(ParseError::Address(s.to_string()))
            }
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_ip_addr(), fmt)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Address) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.octets().cmp(other.octets()))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Not for Address {
    type Output = Address;

    fn not(self) -> Address {
        calc::complement(self)
    }
}

impl BitAnd for Address {
    type Output = Address;

    fn bitand(self, rhs: Address) -> Address {
        calc::and(self, rhs)
    }
}

impl BitOr for Address {
    type Output = Address;

    fn bitor(self, rhs: Address) -> Address {
        calc::or(self, rhs)
    }
}

impl BitXor for Address {
    type Output = Address;

    fn bitxor(self, rhs: Address) -> Address {
        calc::xor(self, rhs)
    }
}
