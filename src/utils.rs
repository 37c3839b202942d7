use crate::error::ByteDecodeError;
use std::str;

/// A function that takes a hexadecimal representation of bytes
/// back into a stream of bytes.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, ByteDecodeError> {
    let s = match s.strip_prefix("0x") {
        Some(v) => v,
        None => s,
    };
    if s.len() % 2 != 0 {
        return Err(ByteDecodeError::OddLength);
    }
    s.as_bytes()
        .chunks(2)
        .map(|ch| {
            str::from_utf8(ch)
                .map_err(ByteDecodeError::DecodeError)
                .and_then(|res| u8::from_str_radix(res, 16).map_err(ByteDecodeError::ParseError))
        })
        .collect()
}

pub fn bytes_to_hex_str(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:0>2X}", b))
        .fold(String::new(), |acc, x| acc + &x)
}

pub fn contains_non_hex_chars(input: &str) -> bool {
    for char in input.chars() {
        if !char.is_ascii_hexdigit() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let bytes = hex_str_to_bytes("0x00ff10ab").unwrap();
        assert_eq!(bytes, vec![0x00, 0xff, 0x10, 0xab]);
        assert_eq!(bytes_to_hex_str(&bytes), "00FF10AB");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert_eq!(hex_str_to_bytes("abc"), Err(ByteDecodeError::OddLength));
        assert!(hex_str_to_bytes("zz").is_err());
        assert!(contains_non_hex_chars("cosmos1"));
        assert!(!contains_non_hex_chars("DEADbeef"));
    }
}
