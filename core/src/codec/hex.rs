//! `0x`-prefixed hex, strict about length.

use crate::error::{Error, Result};

/// Encodes bytes as `0x` followed by lowercase hex.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes hex text into exactly `expected_len` bytes.
///
/// The `0x` / `0X` prefix is optional and either letter case is accepted,
/// since half the tooling out there drops the prefix and the other half
/// checksums via capitalisation. Length is never fudged: too short or too
/// long is an [`Error::InvalidLength`].
pub fn decode_prefixed(text: &str, expected_len: usize) -> Result<Vec<u8>> {
    let digits = strip_prefix(text.trim());
    let bytes = hex::decode(digits).map_err(|e| Error::MalformedInput {
        field: "payload",
        reason: e.to_string(),
    })?;
    if bytes.len() != expected_len {
        return Err(Error::InvalidLength {
            field: "payload",
            expected: expected_len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Decodes hex text into a fixed-size array.
pub fn decode_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = decode_prefixed(text, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn strip_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_prefixed_lowercase() {
        assert_eq!(encode_prefixed(&[0xde, 0xad, 0xBE, 0xef]), "0xdeadbeef");
        assert_eq!(encode_prefixed(&[]), "0x");
    }

    #[test]
    fn decode_accepts_with_and_without_prefix() {
        assert_eq!(decode_prefixed("0xdeadbeef", 4).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_prefixed("DEADBEEF", 4).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_prefixed("0XdeadBEEF", 4).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = decode_prefixed("0xdeadbeef", 32).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidLength {
                field: "payload",
                expected: 32,
                actual: 4
            }
        );
    }

    #[test]
    fn decode_rejects_odd_and_non_hex() {
        assert!(matches!(
            decode_prefixed("0xabc", 2),
            Err(Error::MalformedInput { .. })
        ));
        assert!(matches!(
            decode_prefixed("0xzz", 1),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_decode_array() {
        let arr: [u8; 2] = decode_array("0x0102").unwrap();
        assert_eq!(arr, [1, 2]);
        assert!(decode_array::<3>("0x0102").is_err());
    }
}
