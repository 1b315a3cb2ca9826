use core::net::IpAddr;

use alloc::string::ToString;

use crate::log::debug;
use crate::{Address, Mask, ParseError};

/// An error returned when a prefix length does not fit the address family,
/// or a mask is not a contiguous run of high-order ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid IP prefix length")]
pub struct PrefixLenError;

/// Builds a contiguous mask of `prefix_len` leading ones for an address of
/// `max_prefix_len` bits (32 or 128).
///
/// # Errors
/// Returns a `PrefixLenError` if `max_prefix_len` is not 32 or 128, or if
/// `prefix_len` exceeds it.
///
/// # Examples
///
/// ```
/// use ipwild::cidr_mask;
///
/// assert_eq!(cidr_mask(24, 32).unwrap().to_string(), "255.255.255.0");
/// assert_eq!(cidr_mask(64, 128).unwrap().to_string(), "ffff:ffff:ffff:ffff::");
/// assert!(cidr_mask(33, 32).is_err());
/// ```
pub fn cidr_mask(prefix_len: u8, max_prefix_len: u8) -> Result<Mask, PrefixLenError> {
    if !matches!(max_prefix_len, 32 | 128) || prefix_len > max_prefix_len {
        return Err(PrefixLenError);
    }
    let ones = u128::MAX
        .checked_shl(128 - u32::from(prefix_len))
        .unwrap_or(0);
    Ok(Address::from(ones.to_be_bytes()).resized(usize::from(max_prefix_len / 8)))
}

/// Converts a contiguous mask into its prefix length.
///
/// # Errors
/// If the mask is not a run of leading ones followed only by zeros this
/// will return a `PrefixLenError`.
pub fn mask_to_prefix(mask: Mask) -> Result<u8, PrefixLenError> {
    let mask = u128::from_be_bytes(*mask.padded());

    let prefix = mask.leading_ones();
    if mask.checked_shl(prefix).unwrap_or(0) == 0 {
        Ok(prefix as u8)
    } else {
        Err(PrefixLenError)
    }
}

/// Parses a dotted-decimal or colon-hex mask.
///
/// Unlike addresses, masks are never canonicalized: colon-hex text always
/// yields a 16-byte mask, even in the `::ffff:a.b.c.d` form.
///
/// # Errors
/// Returns `ParseError::Mask` carrying `s` when it is not an address.
pub fn parse_mask(s: &str) -> Result<Mask, ParseError> {
    match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(mask)) => Ok(mask.into()),
        Ok(IpAddr::V6(mask)) => Ok(mask.into()),
        Err(_) => {
            debug!("invalid mask {:?}", s);
            Err(ParseError::Mask(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[rstest]
    #[case(0, 32, "0.0.0.0")]
    #[case(8, 32, "255.0.0.0")]
    #[case(12, 32, "255.240.0.0")]
    #[case(32, 32, "255.255.255.255")]
    #[case(0, 128, "::")]
    #[case(63, 128, "ffff:ffff:ffff:fffe::")]
    #[case(128, 128, "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff")]
    fn test_cidr_mask(#[case] prefix: u8, #[case] bits: u8, #[case] want: &str) {
        let mask = cidr_mask(prefix, bits).unwrap();
        assert_eq!(mask, addr(want));
        assert_eq!(mask.len(), usize::from(bits / 8));
        assert_eq!(mask_to_prefix(mask), Ok(prefix));
    }

    #[rstest]
    #[case(33, 32)]
    #[case(129, 128)]
    #[case(8, 64)]
    fn test_cidr_mask_invalid(#[case] prefix: u8, #[case] bits: u8) {
        assert_eq!(cidr_mask(prefix, bits), Err(PrefixLenError));
    }

    #[rstest]
    #[case("255.255.0.255")]
    #[case("0.0.0.255")]
    #[case("ffff::1")]
    fn test_mask_to_prefix_invalid(#[case] mask: &str) {
        assert_eq!(mask_to_prefix(addr(mask)), Err(PrefixLenError));
    }

    #[test]
    fn test_parse_mask() {
        assert_eq!(parse_mask("255.255.255.0"), Ok(addr("255.255.255.0")));
        assert_eq!(parse_mask("::fffe").unwrap().len(), 16);
        assert_eq!(parse_mask("::ffff:ffff:ffff").unwrap().len(), 16);
        assert_eq!(
            parse_mask("::ffff:255.255.255.0").unwrap().octets()[10..],
            [0xff, 0xff, 255, 255, 255, 0]
        );
        assert_eq!(
            parse_mask("invalid"),
            Err(ParseError::Mask("invalid".to_string()))
        );
    }
}
