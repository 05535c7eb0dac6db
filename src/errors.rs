//! Revert decoding and the user-facing transaction error taxonomy.
//!
//! Raw provider errors are logged for diagnostics; only the categorized
//! message reaches the user. The category, not the raw string, drives any
//! retry/guidance UI.

use std::fmt;

use crate::config::consts::ERROR_STRING_SELECTOR;

/// Outcome of trying to decode revert data out of a provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedRevert {
    /// A standard Solidity `Error(string)` revert with its message.
    ErrorString(String),
    /// No revert data could be found; carries the original error text.
    NoRevertData(String),
}

impl fmt::Display for DecodedRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedRevert::ErrorString(msg) => write!(f, "{msg}"),
            DecodedRevert::NoRevertData(original) => write!(f, "{original}"),
        }
    }
}

/// Decode a Solidity `Error(string)` revert message from hex data.
/// Returns None unless the data is a well-formed `Error(string)` encoding.
pub fn decode_error_string(revert_data: &str) -> Option<String> {
    let data = revert_data.strip_prefix("0x").unwrap_or(revert_data);

    if !data.starts_with(ERROR_STRING_SELECTOR) {
        return None;
    }

    // Skip the 4-byte selector; what follows is ABI encoding for a string:
    // a 32-byte offset (must be 0x20), a 32-byte length, then padded bytes.
    let encoded = &data[8..];
    if encoded.len() < 128 {
        return None;
    }

    let offset = u64::from_str_radix(&encoded[0..64], 16).ok()?;
    if offset != 32 {
        return None;
    }

    let length = u64::from_str_radix(&encoded[64..128], 16).ok()? as usize;
    let string_bytes = hex::decode(&encoded[128..]).ok()?;
    if length > string_bytes.len() {
        return None;
    }

    String::from_utf8(string_bytes[..length].to_vec()).ok()
}

/// Extract and decode revert data from any displayable error.
///
/// Provider error messages embed revert data in several formats; this scans
/// for each of them before giving up.
pub fn decode_any_error<E: fmt::Display>(error: &E) -> DecodedRevert {
    let error_str = error.to_string();

    let revert_data = error_str
        .split("reverted with data: ")
        .nth(1)
        .or_else(|| error_str.split("revert data: ").nth(1))
        .or_else(|| {
            // Bare hex payload starting with the Error(string) selector
            let selector = format!("0x{ERROR_STRING_SELECTOR}");
            error_str.find(&selector).map(|start| {
                let remaining = &error_str[start..];
                let end = remaining
                    .char_indices()
                    .skip(2)
                    .find(|(_, c)| !c.is_ascii_hexdigit())
                    .map(|(i, _)| i)
                    .unwrap_or(remaining.len());
                &error_str[start..start + end]
            })
        });

    if let Some(data) = revert_data {
        if let Some(decoded) = decode_error_string(data.trim()) {
            return DecodedRevert::ErrorString(decoded);
        }
    }

    DecodedRevert::NoRevertData(error_str)
}

/// Category of a failed wallet/transaction operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxErrorKind {
    /// No wallet signer is available; nothing was submitted.
    NotConnected,
    /// The user declined to sign the transaction.
    UserRejected,
    /// The account cannot cover value + gas.
    InsufficientFunds,
    /// Gas estimation failed. Always recovered locally via the static
    /// fallback tier; never surfaces to the user.
    GasEstimationFailed,
    /// Nonce conflict with a pending or already-confirmed transaction.
    NonceError,
    /// An on-chain read failed during status resolution.
    ReadFailure,
    /// Anything else; surfaces the raw message.
    Unknown,
}

impl TxErrorKind {
    /// Classify a raw provider error message into a category.
    pub fn classify(raw: &str) -> Self {
        let msg = raw.to_ascii_lowercase();
        if msg.contains("user rejected")
            || msg.contains("user denied")
            || msg.contains("rejected the request")
        {
            TxErrorKind::UserRejected
        } else if msg.contains("insufficient funds") {
            TxErrorKind::InsufficientFunds
        } else if msg.contains("nonce too low")
            || msg.contains("nonce has already been used")
            || msg.contains("replacement transaction underpriced")
        {
            TxErrorKind::NonceError
        } else if msg.contains("cannot estimate gas")
            || msg.contains("gas required exceeds")
            || msg.contains("intrinsic gas too low")
        {
            TxErrorKind::GasEstimationFailed
        } else {
            TxErrorKind::Unknown
        }
    }

    /// The single user-facing message for this category. `Unknown` carries
    /// the raw message instead; see [`TxError::from_provider`].
    pub fn user_message(&self) -> &'static str {
        match self {
            TxErrorKind::NotConnected => "Connect a wallet before submitting a transaction.",
            TxErrorKind::UserRejected => "Transaction was rejected in the wallet.",
            TxErrorKind::InsufficientFunds => {
                "Insufficient ETH for gas. Please fund the account."
            }
            TxErrorKind::GasEstimationFailed => {
                "Gas estimation failed; conservative defaults were used."
            }
            TxErrorKind::NonceError => {
                "Nonce conflict. A pending transaction may be blocking this one."
            }
            TxErrorKind::ReadFailure => "Failed to read on-chain state. Please try again.",
            TxErrorKind::Unknown => "Transaction failed.",
        }
    }
}

/// A categorized, user-facing transaction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxError {
    pub kind: TxErrorKind,
    pub message: String,
}

impl TxError {
    pub fn new(kind: TxErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from a raw provider error, logging the raw string and keeping
    /// only the categorized message. A decoded revert reason beats the
    /// generic category text.
    pub fn from_provider(method: &str, raw: &str) -> Self {
        tracing::debug!(method, error = raw, "provider error");

        if let DecodedRevert::ErrorString(reason) = decode_any_error(&raw) {
            return Self::new(TxErrorKind::Unknown, format!("{method} reverted: {reason}"));
        }

        let kind = TxErrorKind::classify(raw);
        let message = match kind {
            TxErrorKind::Unknown => format!("{method} failed: {raw}"),
            _ => kind.user_message().to_string(),
        };
        Self { kind, message }
    }
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TxError {}

#[cfg(test)]
mod tests {
    use super::*;

    // Error(string) encoding of "Marketplace: item not listed"
    const LISTING_REVERT: &str = "0x08c379a0\
        0000000000000000000000000000000000000000000000000000000000000020\
        000000000000000000000000000000000000000000000000000000000000001c\
        4d61726b6574706c6163653a206974656d206e6f74206c697374656400000000";

    fn revert_hex() -> String {
        LISTING_REVERT.split_whitespace().collect()
    }

    #[test]
    fn test_decode_error_string() {
        let decoded = decode_error_string(&revert_hex());
        assert_eq!(decoded, Some("Marketplace: item not listed".to_string()));

        // Without 0x prefix
        let decoded = decode_error_string(&revert_hex()[2..]);
        assert_eq!(decoded, Some("Marketplace: item not listed".to_string()));
    }

    #[test]
    fn test_decode_error_string_wrong_selector() {
        let data = revert_hex().replacen("08c379a0", "12345678", 1);
        assert_eq!(decode_error_string(&data), None);
    }

    #[test]
    fn test_decode_error_string_truncated() {
        assert_eq!(decode_error_string("0x08c379a00000"), None);
    }

    #[test]
    fn test_decode_any_error_embedded_revert() {
        let err = format!("server returned an error: revert data: {}", revert_hex());
        let decoded = decode_any_error(&err);
        assert_eq!(
            decoded,
            DecodedRevert::ErrorString("Marketplace: item not listed".to_string())
        );
    }

    #[test]
    fn test_decode_any_error_bare_hex() {
        let err = format!("execution reverted {}", revert_hex());
        let decoded = decode_any_error(&err);
        assert_eq!(
            decoded,
            DecodedRevert::ErrorString("Marketplace: item not listed".to_string())
        );
    }

    #[test]
    fn test_decode_any_error_no_data() {
        let decoded = decode_any_error(&"connection refused");
        assert_eq!(
            decoded,
            DecodedRevert::NoRevertData("connection refused".to_string())
        );
    }

    #[test]
    fn test_classify_user_rejected() {
        assert_eq!(
            TxErrorKind::classify("MetaMask Tx Signature: User denied transaction signature."),
            TxErrorKind::UserRejected
        );
        assert_eq!(
            TxErrorKind::classify("user rejected the request"),
            TxErrorKind::UserRejected
        );
    }

    #[test]
    fn test_classify_insufficient_funds() {
        assert_eq!(
            TxErrorKind::classify("insufficient funds for gas * price + value"),
            TxErrorKind::InsufficientFunds
        );
    }

    #[test]
    fn test_classify_nonce() {
        assert_eq!(
            TxErrorKind::classify("nonce too low"),
            TxErrorKind::NonceError
        );
        assert_eq!(
            TxErrorKind::classify("replacement transaction underpriced"),
            TxErrorKind::NonceError
        );
    }

    #[test]
    fn test_classify_unknown_fallback() {
        assert_eq!(
            TxErrorKind::classify("something exotic"),
            TxErrorKind::Unknown
        );
    }

    #[test]
    fn test_from_provider_unknown_keeps_raw_message() {
        let err = TxError::from_provider("mintTrack", "weird transport glitch");
        assert_eq!(err.kind, TxErrorKind::Unknown);
        assert!(err.message.contains("weird transport glitch"));
    }

    #[test]
    fn test_from_provider_category_hides_raw_message() {
        let err = TxError::from_provider("mintTrack", "insufficient funds for transfer");
        assert_eq!(err.kind, TxErrorKind::InsufficientFunds);
        assert!(!err.message.contains("for transfer"));
    }

    #[test]
    fn test_from_provider_prefers_decoded_revert() {
        let raw = format!("call reverted with data: {}", revert_hex());
        let err = TxError::from_provider("listItem", &raw);
        assert!(err.message.contains("Marketplace: item not listed"));
    }
}
