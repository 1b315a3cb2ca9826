//! Byte-wise arithmetic over [`Address`] values.
//!
//! Every function here is total: overflow and underflow wrap silently, the
//! same way unsigned integers wrap. Binary operations expect operands of the
//! same length. Passing a 4-byte and a 16-byte address together never
//! panics, but the result is unspecified.

use crate::log::trace;
use crate::{Address, Mask};

/// Adds one to the big-endian integer in `octets`. Returns `true` when the
/// carry falls off the most significant byte.
fn increment(octets: &mut [u8]) -> bool {
    for o in octets.iter_mut().rev() {
        *o = o.wrapping_add(1);
        if *o != 0x00 {
            return false;
        }
    }
    true
}

/// Subtracts one from the big-endian integer in `octets`. Returns `true` when
/// the borrow falls off the most significant byte.
fn decrement(octets: &mut [u8]) -> bool {
    for o in octets.iter_mut().rev() {
        *o = o.wrapping_sub(1);
        if *o != 0xff {
            return false;
        }
    }
    true
}

fn zip_with(a: Address, b: Address, len: usize, f: impl Fn(u8, u8) -> u8) -> Address {
    let mut out = Address::zeroed(len);
    let (a, b) = (a.padded(), b.padded());
    for (i, o) in out.octets_mut().iter_mut().enumerate() {
        *o = f(a[i], b[i]);
    }
    out
}

/// Returns the bitwise complement of `mask`.
///
/// This turns a subnet mask into its wildcard counterpart and back. An
/// unset mask stays unset with `Option::map`:
///
/// ```
/// use ipwild::{complement, Mask};
///
/// let mask: Mask = "255.255.254.0".parse().unwrap();
/// assert_eq!(complement(mask).to_string(), "0.0.1.255");
/// assert_eq!(None::<Mask>.map(complement), None);
/// ```
pub fn complement(mask: Mask) -> Mask {
    let mut out = mask;
    for o in out.octets_mut() {
        *o = !*o;
    }
    out
}

/// Returns the address after `ip`, wrapping from the highest address to
/// the lowest.
///
/// ```
/// use ipwild::{next, Address};
///
/// let ip: Address = "192.0.2.255".parse().unwrap();
/// assert_eq!(next(ip).to_string(), "192.0.3.0");
/// let ip: Address = "255.255.255.255".parse().unwrap();
/// assert_eq!(next(ip).to_string(), "0.0.0.0");
/// ```
pub fn next(ip: Address) -> Address {
    let mut out = ip;
    if increment(out.octets_mut()) {
        trace!("next({}) wrapped to {}", ip, out);
    }
    out
}

/// Returns the address before `ip`, wrapping from the lowest address to the
/// highest.
pub fn prev(ip: Address) -> Address {
    let mut out = ip;
    if decrement(out.octets_mut()) {
        trace!("prev({}) wrapped to {}", ip, out);
    }
    out
}

/// Returns `a + (b & mask)`, treating both as big-endian integers.
///
/// The sum is computed over the length of `mask`. Carries ripple into the
/// bytes to the left and anything past the first byte is dropped.
///
/// ```
/// use ipwild::{add, Address};
///
/// let a: Address = "192.0.2.255".parse().unwrap();
/// let b: Address = "0.0.1.2".parse().unwrap();
/// let m: Address = "0.0.1.255".parse().unwrap();
/// assert_eq!(add(a, b, m).to_string(), "192.0.4.1");
/// ```
pub fn add(a: Address, b: Address, mask: Mask) -> Address {
    let mut out = a.resized(mask.len());
    let (b, mask) = (b.padded(), mask.padded());
    let octets = out.octets_mut();
    for i in (0..octets.len()).rev() {
        let (sum, carry) = octets[i].overflowing_add(b[i] & mask[i]);
        octets[i] = sum;
        if carry {
            increment(&mut octets[..i]);
        }
    }
    out
}

/// Returns `a - (b & mask)`, treating both as big-endian integers.
///
/// The inverse of [`add`] under the same mask: borrows ripple into the bytes
/// to the left and anything past the first byte is dropped.
pub fn subtract(a: Address, b: Address, mask: Mask) -> Address {
    let mut out = a.resized(mask.len());
    let (b, mask) = (b.padded(), mask.padded());
    let octets = out.octets_mut();
    for i in (0..octets.len()).rev() {
        let (diff, borrow) = octets[i].overflowing_sub(b[i] & mask[i]);
        octets[i] = diff;
        if borrow {
            decrement(&mut octets[..i]);
        }
    }
    out
}

/// Returns the bitwise AND of `a` and `b`, with `b`'s length.
pub fn and(a: Address, b: Address) -> Address {
    zip_with(a, b, b.len(), |a, b| a & b)
}

/// Returns the bitwise OR of `a` and `b`, with `b`'s length.
pub fn or(a: Address, b: Address) -> Address {
    zip_with(a, b, b.len(), |a, b| a | b)
}

/// Returns the bitwise XOR of `a` and `b`, with `b`'s length.
pub fn xor(a: Address, b: Address) -> Address {
    zip_with(a, b, b.len(), |a, b| a ^ b)
}

/// Combines two addresses bit by bit: where `mask` is set the bit comes
/// from `b`, elsewhere from `a`.
///
/// ```
/// use ipwild::{merge, Address};
///
/// let a: Address = "192.168.0.1".parse().unwrap();
/// let b: Address = "172.16.32.100".parse().unwrap();
/// let m: Address = "0.0.0.255".parse().unwrap();
/// assert_eq!(merge(a, b, m).to_string(), "192.168.0.100");
/// ```
pub fn merge(a: Address, b: Address, mask: Mask) -> Address {
    let mut out = Address::zeroed(mask.len());
    let (a, b) = (a.padded(), b.padded());
    for (i, (o, m)) in out.octets_mut().iter_mut().zip(mask.octets()).enumerate() {
        *o = a[i] & !m | b[i] & m;
    }
    out
}
