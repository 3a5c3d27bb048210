//! The library's single error type.

/// Errors returned by parameter, key, and engine operations.
///
/// Decryption failures are intentionally undifferentiated: corruption, a
/// wrong key, and an adversarial ciphertext all produce
/// [`NtruError::DecryptionFailed`], so that callers can't build an oracle out
/// of the failure reason.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NtruError {
    /// A parameter set is internally inconsistent, e.g. `maxMsgLenBytes > 255`.
    #[error("invalid parameter set: {0}")]
    InvalidParameter(String),

    /// The plaintext is longer than `maxMsgLenBytes` for the given parameters.
    #[error("message too long: {len} bytes, maximum is {max}")]
    MessageTooLong {
        /// The length of the rejected plaintext, in bytes.
        len: usize,
        /// The maximum plaintext length for the parameter set in use.
        max: usize,
    },

    /// Decryption failed. This single variant covers corrupted ciphertexts,
    /// decryption under the wrong key, and adversarial ciphertexts alike.
    #[error("invalid message encoding")]
    DecryptionFailed,

    /// A byte stream ended before a codec finished parsing it.
    #[error("unexpected end of input while decoding {0}")]
    UnexpectedEof(&'static str),

    /// A parameter or key blob failed to parse for a reason other than
    /// running out of bytes (bad OID, bad flags byte, length mismatch).
    #[error("malformed {0}")]
    Malformed(&'static str),

    /// Key generation did not converge within the iteration ceiling.
    #[error("key generation did not converge after {0} attempts")]
    KeyGenerationExhausted(u32),

    /// Encryption's rejection-sampling loop did not converge within the
    /// iteration ceiling.
    #[error("encryption did not converge after {0} attempts")]
    EncryptionExhausted(u32),
}

/// A convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, NtruError>;
