use alloc::string::{String, ToString};

use crate::log::debug;
use crate::{cidr_mask, complement, parse_mask, Address, Mask};

/// An error which can be returned when parsing an address or an
/// `address/mask` string.
///
/// Each variant carries the text that failed to parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address: {0}")]
    Address(String),
    #[error("invalid mask: {0}")]
    Mask(String),
}

/// Parses `address[/mask]` into an address and an optional mask.
///
/// The mask segment is a decimal prefix length sized to the address family
/// (`192.0.2.0/24`) or a literal mask (`192.0.2.0/255.255.255.0`), which need
/// not be contiguous. A leading `~` complements whichever form follows, so
/// `192.0.2.0/~24` carries the wildcard mask `0.0.0.255`. Without a mask
/// segment the mask is `None`, meaning no mask constraint.
///
/// # Errors
/// `ParseError::Address` with the address text when the address is invalid.
/// `ParseError::Mask` with everything after the first `/` when there is more
/// than one `/`, when the prefix or literal is invalid, or when the mask
/// belongs to the other address family.
///
/// # Examples
///
/// ```
/// use ipwild::parse_ip_mask;
///
/// let (ip, mask) = parse_ip_mask("192.0.2.10/~12").unwrap();
/// assert_eq!(ip.to_string(), "192.0.2.10");
/// assert_eq!(mask.unwrap().to_string(), "0.15.255.255");
///
/// let (_, mask) = parse_ip_mask("2001:db8::").unwrap();
/// assert!(mask.is_none());
/// ```
pub fn parse_ip_mask(s: &str) -> Result<(Address, Option<Mask>), ParseError> {
    let (addr, suffix) = match s.split_once('/') {
        Some((addr, suffix)) => (addr, Some(suffix)),
        None => (s, None),
    };
    let ip: Address = addr.parse()?;
    let Some(suffix) = suffix else {
        return Ok((ip, None));
    };

    let invalid = || {
        debug!("invalid mask {:?} for {}", suffix, ip);
        ParseError::Mask(suffix.to_string())
    };
    if suffix.contains('/') {
        return Err(invalid());
    }
    let (inverted, text) = match suffix.strip_prefix('~') {
        Some(text) => (true, text),
        None => (false, suffix),
    };
    let mask = match text.parse::<u8>() {
        Ok(prefix_len) => cidr_mask(prefix_len, ip.max_prefix_len()).map_err(|_| invalid())?,
        Err(_) => parse_mask(text).map_err(|_| invalid())?,
    };
    if mask.len() != ip.len() {
        return Err(invalid());
    }
    Ok((ip, Some(if inverted { complement(mask) } else { mask })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("192.0.2.10/24", "192.0.2.10", Some("255.255.255.0"))]
    #[case("192.0.2.10/255.255.255.0", "192.0.2.10", Some("255.255.255.0"))]
    #[case("192.0.2.10", "192.0.2.10", None)]
    #[case("192.0.2.10/~12", "192.0.2.10", Some("0.15.255.255"))]
    #[case("192.0.2.10/~255.240.0.0", "192.0.2.10", Some("0.15.255.255"))]
    #[case("192.0.2.10/0.255.0.254", "192.0.2.10", Some("0.255.0.254"))]
    #[case("0.0.0.0/0", "0.0.0.0", Some("0.0.0.0"))]
    #[case("2001:db8::/64", "2001:db8::", Some("ffff:ffff:ffff:ffff::"))]
    #[case("2001:db8::/ffff::", "2001:db8::", Some("ffff::"))]
    #[case("2001:db8::/~120", "2001:db8::", Some("::ff"))]
    #[case("2001:db8::/::ffff:ffff:ffff", "2001:db8::", Some("::ffff:ffff:ffff"))]
    #[case("2001:db8::/~80", "2001:db8::", Some("::ffff:ffff:ffff"))]
    #[case("2001:db8::", "2001:db8::", None)]
    fn test_parse_ip_mask(#[case] s: &str, #[case] ip: &str, #[case] mask: Option<&str>) {
        let mask = mask.map(|m| parse_mask(m).unwrap());
        assert_eq!(parse_ip_mask(s), Ok((addr(ip), mask)));
    }

    #[test]
    fn test_parse_ip_mask_keeps_mapped_mask_wide() {
        let (ip, mask) = parse_ip_mask("2001:db8::/::ffff:255.255.255.255").unwrap();
        let mask = mask.unwrap();
        assert_eq!(mask.len(), 16);
        assert_eq!(mask.len(), ip.len());
    }

    #[rstest]
    #[case::empty_inverted("192.0.2.10/~", ParseError::Mask("~".to_string()))]
    #[case::bad_address("invalid/24", ParseError::Address("invalid".to_string()))]
    #[case::bad_mask("192.0.2.0/invalid", ParseError::Mask("invalid".to_string()))]
    #[case::too_many_slashes("192.0.2.0/24/1", ParseError::Mask("24/1".to_string()))]
    #[case::prefix_too_long("192.0.2.0/33", ParseError::Mask("33".to_string()))]
    #[case::family_mismatch("192.0.2.0/ffff::", ParseError::Mask("ffff::".to_string()))]
    #[case::no_mask_text("foo", ParseError::Address("foo".to_string()))]
    fn test_parse_ip_mask_invalid(#[case] s: &str, #[case] want: ParseError) {
        assert_eq!(parse_ip_mask(s), Err(want));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::Address("foo".to_string()).to_string(),
            "invalid IP address: foo"
        );
        assert_eq!(
            ParseError::Mask("24/1".to_string()).to_string(),
            "invalid mask: 24/1"
        );
    }
}
