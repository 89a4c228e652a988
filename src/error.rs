//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All operations return [`Result<T, EncodeError>`](EncodeError).

use thiserror::Error;

/// The error type for all message-encryption operations.
///
/// Setup failures (everything before the first output byte) leave no
/// partial output; failures during the streaming copy abort the filter
/// stack and discard the destination where possible.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The plaintext source (or a batch output file) could not be opened.
    #[error("`{path}`: can't open: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stream I/O failed while copying through the filter stack.
    ///
    /// This covers sink write errors (including disk-full) as well as
    /// read errors from an already-open source.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    /// Key derivation produced no usable key, or the passphrase request
    /// was cancelled by the passphrase collaborator.
    #[error("error creating passphrase: {0}")]
    Passphrase(String),

    /// Public-key encryption of the session key failed for a recipient.
    ///
    /// Fatal to the whole message: no partial multi-recipient output is
    /// ever produced.
    #[error("session key encryption failed for key {key_id}: {source}")]
    KeyWrap {
        key_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A length or structural field could not be legally encoded.
    #[error("packet format error: {0}")]
    PacketFormat(String),

    /// No key matched the given user id.
    #[error("no encryption key found for `{0}`")]
    NoSuchKey(String),

    /// More than one key matched the given user id.
    #[error("user id `{0}` is ambiguous")]
    AmbiguousKey(String),

    /// The matched key cannot be used for encryption.
    #[error("key for `{0}` is not usable for encryption")]
    UnusableKey(String),

    /// A cryptographic primitive was invoked with inconsistent state
    /// (wrong key length, unsupported algorithm id).
    #[error("crypto error: {0}")]
    Crypto(String),
}
