//! Wraparound-safe IP address arithmetic and wildcard masks.
//!
//! [`Address`] is a fixed-capacity byte buffer holding either a 4-byte IPv4
//! or a 16-byte IPv6 address. The functions in this crate treat it as a
//! big-endian unsigned integer: [`next`] and [`prev`] step by one, [`add`]
//! and [`subtract`] apply a masked operand, and all of them wrap silently at
//! the edges of the address space, so `next(255.255.255.255)` is `0.0.0.0`.
//!
//! [`Wildcard`] builds on that arithmetic to model Cisco-style wildcard
//! masks, where a `1` bit means "don't care" and the bits need not be
//! contiguous:
//!
//! ```
//! use ipwild::{Address, Wildcard};
//!
//! let mut w: Wildcard = "192.0.2.1/0.0.255.254".parse().unwrap();
//! assert!(w.matches("192.0.7.3".parse().unwrap()));
//! assert!(!w.matches("192.0.7.4".parse().unwrap()));
//! assert_eq!(w.next(), "192.0.2.3".parse::<Address>().unwrap());
//! ```
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

#[cfg(feature = "logging")]
use log;

#[cfg(not(feature = "logging"))]
mod log {
    macro_rules! trace    ( ($($tt:tt)*) => {{}} );
    macro_rules! debug    ( ($($tt:tt)*) => {{}} );
    pub(crate) use {debug, trace};
}

pub use self::address::{canonicalize, Address, Mask};
pub use self::calc::{add, and, complement, merge, next, or, prev, subtract, xor};
pub use self::mask::{cidr_mask, mask_to_prefix, parse_mask, PrefixLenError};
pub use self::network::Network;
pub use self::parser::{parse_ip_mask, ParseError};
pub use self::wildcard::{find_wildcard, Wildcard, WildcardAddrs};

mod address;
mod calc;
mod mask;
mod network;
mod parser;
#[cfg(feature = "serde")]
mod serde_str;
mod wildcard;
