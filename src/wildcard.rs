//! Wildcard masks.
//!
//! A wildcard mask is often described as an inverse subnet mask, with two
//! differences:
//!
//! * matching is reversed: a `0` bit must match, a `1` bit does not matter;
//! * the `0`s and `1`s need not be contiguous.
//!
//! Written as `address/wildcard`:
//!
//! * `192.0.2.0/0.0.0.255` matches `192.0.2.*`
//! * `192.0.2.10/0.0.255.0` matches `192.0.*.10`
//! * `192.0.2.1/0.0.255.254` matches `192.0.*.{1,3,5,7,...,255}`
//!
//! Use [`complement`] to turn a subnet mask into its wildcard counterpart.

use core::fmt;
use core::iter::FusedIterator;
use core::str::FromStr;

use crate::log::trace;
use crate::{canonicalize, complement, parse_ip_mask, Address, Mask, Network, ParseError};

/// An address pattern built from a base address and a wildcard mask.
///
/// Besides the pattern, a `Wildcard` holds a current address which
/// [`next`] and [`prev`] move through every matching address in order.
///
/// [`next`]: Wildcard::next
/// [`prev`]: Wildcard::prev
///
/// # Examples
///
/// ```
/// use ipwild::{Address, Wildcard};
///
/// let base: Address = "192.0.2.128".parse().unwrap();
/// let mut w = Wildcard::new(base, "0.0.0.254".parse().unwrap());
/// assert_eq!(w.first().ip().to_string(), "192.0.2.0");
/// assert_eq!(w.last().ip().to_string(), "192.0.2.254");
/// assert_eq!(w.next().to_string(), "192.0.2.130");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Wildcard {
    ip: Address,
    bits: Address,
    mask: Mask,
}

impl Wildcard {
    /// Creates a new wildcard from an address and a wildcard mask, where
    /// set bits in `wildcard` mark the bits that do not matter.
    ///
    /// An IPv4-mapped `ip` is collapsed to its 4-byte form first.
    pub fn new(ip: Address, wildcard: Mask) -> Wildcard {
        let ip = canonicalize(ip.to_ip_addr());
        let mask = complement(wildcard);
        Wildcard {
            ip,
            bits: ip & mask,
            mask,
        }
    }

    /// Returns the current address.
    pub const fn ip(&self) -> Address {
        self.ip
    }

    /// Returns the wildcard mask.
    pub fn wildcard(&self) -> Mask {
        complement(self.mask)
    }

    /// Returns the number of don't-care bits, so a wildcard matches
    /// `2.pow(dont_care_bits())` addresses.
    pub fn dont_care_bits(&self) -> u32 {
        self.wildcard()
            .octets()
            .iter()
            .map(|o| o.count_ones())
            .sum()
    }

    /// Returns `true` if `ip` matches the wildcard.
    ///
    /// An address of the other family never matches.
    ///
    /// ```
    /// use ipwild::Wildcard;
    ///
    /// let w: Wildcard = "2001:db8::/::fffe".parse().unwrap();
    /// assert!(w.matches("2001:db8::2".parse().unwrap()));
    /// assert!(!w.matches("2001:db8::3".parse().unwrap()));
    /// assert!(!w.matches("2001:db8:a::2".parse().unwrap()));
    /// ```
    pub fn matches(&self, ip: Address) -> bool {
        ip.len() == self.mask.len() && ip & self.mask == self.bits
    }

    /// Returns a wildcard positioned at the lowest matching address.
    pub fn first(&self) -> Wildcard {
        Wildcard {
            ip: self.bits,
            ..*self
        }
    }

    /// Returns a wildcard positioned at the highest matching address.
    pub fn last(&self) -> Wildcard {
        Wildcard {
            ip: self.bits | self.wildcard(),
            ..*self
        }
    }

    /// Moves to the next matching address and returns it.
    ///
    /// Steps past the highest matching address wrap around to the lowest.
    pub fn next(&mut self) -> Address {
        let mask = *self.mask.padded();
        let octets = self.ip.octets_mut();
        for i in (0..octets.len()).rev() {
            for j in 0..8 {
                if bit(mask[i], j) {
                    continue;
                }
                if !bit(octets[i], j) {
                    octets[i] |= 1 << j;
                    return self.ip;
                }
                octets[i] &= !(1 << j);
            }
        }
        trace!("wildcard {} wrapped around", self);
        self.ip
    }

    /// Moves to the previous matching address and returns it.
    ///
    /// Steps past the lowest matching address wrap around to the highest.
    pub fn prev(&mut self) -> Address {
        let mask = *self.mask.padded();
        let octets = self.ip.octets_mut();
        for i in (0..octets.len()).rev() {
            for j in 0..8 {
                if bit(mask[i], j) {
                    continue;
                }
                if bit(octets[i], j) {
                    octets[i] &= !(1 << j);
                    return self.ip;
                }
                octets[i] |= 1 << j;
            }
        }
        trace!("wildcard {} wrapped around", self);
        self.ip
    }

    /// Returns an iterator over every matching address, lowest first.
    ///
    /// ```
    /// use ipwild::Wildcard;
    ///
    /// let w: Wildcard = "192.0.2.1/0.0.1.2".parse().unwrap();
    /// let addrs: Vec<String> = w.addrs().map(|a| a.to_string()).collect();
    /// assert_eq!(addrs, ["192.0.2.1", "192.0.2.3", "192.0.3.1", "192.0.3.3"]);
    /// ```
    pub fn addrs(&self) -> WildcardAddrs {
        WildcardAddrs {
            front: self.first(),
            back: self.last(),
            done: false,
        }
    }
}

fn bit(b: u8, i: u8) -> bool {
    (b >> i) & 1 == 1
}

/// Returns the most specific wildcard matching every given address.
///
/// Every bit that differs between any of the addresses becomes a don't-care
/// bit, and the resulting address holds the bits common to all of them.
///
/// # Examples
///
/// ```
/// use ipwild::find_wildcard;
///
/// let a = "192.0.2.1".parse().unwrap();
/// let b = "192.0.2.255".parse().unwrap();
/// let w = find_wildcard(a, b, []);
/// assert_eq!(w.to_string(), "192.0.2.1/0.0.0.254");
/// ```
pub fn find_wildcard<I>(a: Address, b: Address, extra: I) -> Wildcard
where
    I: IntoIterator<Item = Address>,
{
    let (mut common, mut dont_care) = (a & b, a ^ b);
    for ip in extra {
        dont_care = dont_care | (common ^ ip);
        common = common & ip;
    }
    Wildcard::new(common, dont_care)
}

impl From<Network> for Wildcard {
    /// A wildcard matching the same addresses as a network with a
    /// contiguous mask, positioned at the network's address.
    fn from(net: Network) -> Wildcard {
        Wildcard::new(net.addr(), complement(net.mask()))
    }
}

impl fmt::Debug for Wildcard {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}/{}", self.ip, self.wildcard())
    }
}

impl FromStr for Wildcard {
    type Err = ParseError;

    /// Parses `address[/wildcard]` with the grammar of [`parse_ip_mask`].
    /// A missing mask yields a wildcard matching only the address itself.
    fn from_str(s: &str) -> Result<Wildcard, ParseError> {
        let (ip, wildcard) = parse_ip_mask(s)?;
        Ok(Wildcard::new(ip, wildcard.unwrap_or(ip.min_value())))
    }
}

/// An iterator over the addresses matching a [`Wildcard`], in address
/// order.
///
/// This is created by [`Wildcard::addrs`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardAddrs {
    front: Wildcard,
    back: Wildcard,
    done: bool,
}

impl Iterator for WildcardAddrs {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        if self.done {
            return None;
        }
        let ip = self.front.ip();
        if ip == self.back.ip() {
            self.done = true;
        } else {
            self.front.next();
        }
        Some(ip)
    }
}

impl DoubleEndedIterator for WildcardAddrs {
    fn next_back(&mut self) -> Option<Address> {
        if self.done {
            return None;
        }
        let ip = self.back.ip();
        if ip == self.front.ip() {
            self.done = true;
        } else {
            self.back.prev();
        }
        Some(ip)
    }
}

impl FusedIterator for WildcardAddrs {}
