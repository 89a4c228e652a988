// src/lib.rs

pub mod algo;
pub mod consts;
pub mod crypto;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod input;
pub mod keys;
pub mod mpi;
pub mod options;
pub mod packet;
pub mod policy;
pub mod s2k;
pub mod secrets;
pub mod session;
pub mod status;

// High-level API — this is what most callers import
pub use encoder::Encoder;
pub use error::EncodeError;
pub use input::Input;
pub use options::Options;

// Collaborator seams, implemented by the caller
pub use keys::{KeyUsage, KeyVersion, Keyring, LookupError, PublicKeyEncrypt, RecipientKey};
pub use session::PassphraseSource;
pub use status::{NullStatus, StatusEvent, StatusSink};

// Building blocks that show up in the public signatures
pub use algo::{CipherAlgo, CompressAlgo, DigestAlgo, PubkeyAlgo};
pub use mpi::Mpi;
pub use policy::{resolve_policy, Policy};
pub use s2k::{S2k, S2kMode};
pub use secrets::Dek;

// Re-exported so callers can hand passphrases in without pulling the
// dependency themselves
pub use secrecy::SecretString;
