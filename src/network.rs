use core::fmt;
use core::str::FromStr;

use crate::{cidr_mask, mask_to_prefix, next, parse_ip_mask, prev};
use crate::{Address, Mask, ParseError, PrefixLenError};

/// An address paired with a mask.
///
/// This is the analogue of a CIDR block, except the mask may be any bit
/// pattern. Operations that reason about a contiguous range of addresses,
/// [`broadcast`], [`next_subnet`], [`prev_subnet`] and [`contains`], only
/// give meaningful answers for contiguous masks. The address is kept as
/// given; use [`trunc`] to clear its host bits.
///
/// [`broadcast`]: Network::broadcast
/// [`next_subnet`]: Network::next_subnet
/// [`prev_subnet`]: Network::prev_subnet
/// [`contains`]: Network::contains
/// [`trunc`]: Network::trunc
///
/// # Examples
///
/// ```
/// use ipwild::Network;
///
/// let net: Network = "192.0.2.0/24".parse().unwrap();
/// assert_eq!(net.broadcast().to_string(), "192.0.2.255");
/// assert_eq!(net.next_subnet().to_string(), "192.0.3.0/24");
/// assert_eq!(net.prev_subnet().to_string(), "192.0.1.0/24");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Network {
    addr: Address,
    mask: Mask,
}

impl Network {
    /// Creates a new network from an address and a mask of the same length.
    pub const fn new(addr: Address, mask: Mask) -> Network {
        Network { addr, mask }
    }

    /// Creates a new network from an address and a prefix length.
    ///
    /// # Errors
    /// If `prefix_len` is larger than the address allows this will return a
    /// `PrefixLenError`.
    pub fn with_prefix(addr: Address, prefix_len: u8) -> Result<Network, PrefixLenError> {
        let mask = cidr_mask(prefix_len, addr.max_prefix_len())?;
        Ok(Network::new(addr, mask))
    }

    /// Returns the address.
    pub const fn addr(&self) -> Address {
        self.addr
    }

    /// Returns the mask.
    pub const fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the prefix length of a contiguous mask.
    ///
    /// # Errors
    /// Returns a `PrefixLenError` if the mask is not contiguous.
    pub fn prefix_len(&self) -> Result<u8, PrefixLenError> {
        mask_to_prefix(self.mask)
    }

    /// Returns the network address, the address with every bit outside the
    /// mask cleared.
    pub fn network(&self) -> Address {
        self.addr & self.mask
    }

    /// Returns the broadcast address, the address with every bit outside
    /// the mask set.
    pub fn broadcast(&self) -> Address {
        self.addr | !self.mask.resized(self.addr.len())
    }

    /// Returns a copy of the network with the address truncated to the
    /// network address.
    ///
    /// ```
    /// use ipwild::Network;
    ///
    /// let net: Network = "192.0.2.10/24".parse().unwrap();
    /// assert_eq!(net.trunc().to_string(), "192.0.2.0/24");
    /// ```
    pub fn trunc(&self) -> Network {
        Network::new(self.network(), self.mask)
    }

    /// Returns the adjacent block of the same size above this one, wrapping
    /// at the top of the address space.
    pub fn next_subnet(&self) -> Network {
        Network::new(next(self.broadcast()), self.mask)
    }

    /// Returns the adjacent block of the same size below this one, wrapping
    /// at the bottom of the address space.
    pub fn prev_subnet(&self) -> Network {
        Network::new(prev(self.addr) & self.mask, self.mask)
    }

    /// Returns `true` if `addr` falls within the network.
    ///
    /// An address of the other family is never contained.
    pub fn contains_addr(&self, addr: Address) -> bool {
        addr.len() == self.mask.len() && addr & self.mask == self.network()
    }

    /// Returns `true` if this network contains both the address and the
    /// broadcast address of `other`.
    ///
    /// The result is undefined if either mask is not contiguous.
    ///
    /// ```
    /// use ipwild::Network;
    ///
    /// let outer: Network = "2001:db8:a::/48".parse().unwrap();
    /// assert!(outer.contains(&"2001:db8:a:1::/64".parse().unwrap()));
    /// assert!(!outer.contains(&"2001:db8:b:1::/64".parse().unwrap()));
    /// ```
    pub fn contains(&self, other: &Network) -> bool {
        self.contains_addr(other.addr) && self.contains_addr(other.broadcast())
    }
}

impl From<Address> for Network {
    /// A host network, with every mask bit set.
    fn from(addr: Address) -> Network {
        Network::new(addr, addr.max_value())
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self.prefix_len() {
            Ok(prefix_len) => write!(fmt, "{}/{}", self.addr, prefix_len),
            Err(_) => write!(fmt, "{}/{}", self.addr, self.mask),
        }
    }
}

impl FromStr for Network {
    type Err = ParseError;

    /// Parses `address[/mask]` with the grammar of [`parse_ip_mask`]. A
    /// missing mask yields a host network.
    fn from_str(s: &str) -> Result<Network, ParseError> {
        let (addr, mask) = parse_ip_mask(s)?;
        Ok(match mask {
            Some(mask) => Network::new(addr, mask),
            None => Network::from(addr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn net(s: &str) -> Network {
        s.parse().unwrap()
    }

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("192.0.2.0/24", "192.0.2.255")]
    #[case("192.0.2.0/31", "192.0.2.1")]
    #[case("192.0.2.0/32", "192.0.2.0")]
    #[case("2001:db8::/64", "2001:db8:0:0:ffff:ffff:ffff:ffff")]
    fn test_broadcast(#[case] n: &str, #[case] want: &str) {
        assert_eq!(net(n).broadcast(), addr(want));
    }

    #[rstest]
    #[case("192.0.2.0/23", "192.0.4.0/23")]
    #[case("192.0.2.0/24", "192.0.3.0/24")]
    #[case("192.0.2.0/25", "192.0.2.128/25")]
    #[case("192.0.2.0/31", "192.0.2.2/31")]
    #[case("192.0.2.0/32", "192.0.2.1/32")]
    #[case::wrap("255.255.255.0/24", "0.0.0.0/24")]
    #[case("2001:db8::/64", "2001:db8:0:1::/64")]
    #[case("2001:db8:9:fffe::/63", "2001:db8:a::/63")]
    fn test_next_subnet(#[case] n: &str, #[case] want: &str) {
        assert_eq!(net(n).next_subnet(), net(want));
    }

    #[rstest]
    #[case("192.0.2.0/23", "192.0.0.0/23")]
    #[case("192.0.2.0/24", "192.0.1.0/24")]
    #[case("192.0.2.128/25", "192.0.2.0/25")]
    #[case("192.0.2.2/31", "192.0.2.0/31")]
    #[case("192.0.2.1/32", "192.0.2.0/32")]
    #[case::wrap("0.0.0.0/24", "255.255.255.0/24")]
    #[case("2001:db8:0:1::/64", "2001:db8::/64")]
    #[case("2001:db8:a::/63", "2001:db8:9:fffe::/63")]
    fn test_prev_subnet(#[case] n: &str, #[case] want: &str) {
        assert_eq!(net(n).prev_subnet(), net(want));
    }

    #[rstest]
    #[case("192.0.2.0/24", "192.0.2.0/24", true)]
    #[case("192.0.2.0/24", "192.0.2.0/23", false)]
    #[case("192.0.2.0/24", "192.0.2.0/25", true)]
    #[case("192.0.2.0/24", "192.0.1.0/24", false)]
    #[case("2001:db8:a::/48", "2001:db8:a:1::/64", true)]
    #[case("2001:db8:a::/48", "2001:db8:b:1::/64", false)]
    #[case::other_family("192.0.2.0/24", "2001:db8::/64", false)]
    fn test_contains(#[case] a: &str, #[case] b: &str, #[case] want: bool) {
        assert_eq!(net(a).contains(&net(b)), want);
    }

    #[test]
    fn test_contains_addr() {
        let n = net("192.0.2.10/24");
        assert!(n.contains_addr(addr("192.0.2.200")));
        assert!(!n.contains_addr(addr("192.0.3.0")));
        assert!(!n.contains_addr(addr("2001:db8::1")));
    }

    #[test]
    fn test_with_prefix() {
        let n = Network::with_prefix(addr("2001:db8::"), 48).unwrap();
        assert_eq!(n.mask(), addr("ffff:ffff:ffff::"));
        assert_eq!(n.prefix_len(), Ok(48));
        assert_eq!(
            Network::with_prefix(addr("192.0.2.0"), 33),
            Err(PrefixLenError)
        );
    }

    #[rstest]
    #[case("192.0.2.10/24", "192.0.2.10/24")]
    #[case("192.0.2.10/255.255.255.0", "192.0.2.10/24")]
    #[case("192.0.2.10", "192.0.2.10/32")]
    #[case("192.0.2.10/255.0.255.0", "192.0.2.10/255.0.255.0")]
    #[case("2001:db8::/~64", "2001:db8::/::ffff:ffff:ffff:ffff")]
    #[case("2001:db8::/~80", "2001:db8::/::ffff:255.255.255.255")]
    fn test_display(#[case] s: &str, #[case] want: &str) {
        assert_eq!(net(s).to_string(), want);
        assert_eq!(net(want), net(s));
    }
}
