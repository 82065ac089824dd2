use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};

/// Decodes base64url text (RFC 4648 §5) into bytes.
///
/// Tolerates non-canonical input: `=` padding is accepted and the standard
/// alphabet characters `+`/`/` decode as their URL-safe counterparts would.
/// Re-encoding such input reproduces the canonical unpadded form.
pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let mut normalized = input.replace('-', "+").replace('_', "/");
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }
    STANDARD
        .decode(normalized)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_unpadded() {
        assert_eq!(base64url_decode("AQID").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_accepts_padding() {
        // "AA==" is the padded form of a single zero byte
        assert_eq!(base64url_decode("AA==").unwrap(), vec![0]);
        assert_eq!(base64url_decode("AA").unwrap(), vec![0]);
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in the URL-safe alphabet
        assert_eq!(base64url_decode("-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(base64url_encode(vec![0xfb, 0xff]), "-_8");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = base64url_decode("not base64url!");
        assert!(matches!(result, Err(UtilError::Format(_))));
    }

    #[test]
    fn test_decode_empty_is_empty() {
        assert_eq!(base64url_decode("").unwrap(), Vec::<u8>::new());
        assert_eq!(base64url_encode(vec![]), "");
    }

    #[test]
    fn test_encode_strips_padding() {
        let encoded = base64url_encode(vec![0]);
        assert_eq!(encoded, "AA");
        assert!(!encoded.contains('='));
    }

    proptest! {
        /// Round-trip law: decode(encode(b)) == b for all byte sequences.
        #[test]
        fn test_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = base64url_encode(bytes.clone());
            prop_assert!(!encoded.contains('='));
            prop_assert!(!encoded.contains('+'));
            prop_assert!(!encoded.contains('/'));
            prop_assert_eq!(base64url_decode(&encoded).unwrap(), bytes);
        }
    }
}
