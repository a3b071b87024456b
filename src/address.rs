/// Length of `0x` followed by 20 bytes of hex.
pub const ADDRESS_LEN: usize = 42;

/// Checks that `s` is `0x` followed by exactly 40 hex digits, in either case.
///
/// No checksum validation is done: upstream accepts mixed-case addresses as-is.
pub fn is_hex_address(s: &str) -> bool {
    s.len() == ADDRESS_LEN
        && s.starts_with("0x")
        && s.bytes().skip(2).all(|b| b.is_ascii_hexdigit())
}
