//! Plaintext sources.
//!
//! An [`Input`] pairs a byte stream with what little metadata the
//! encoder needs: a display/literal name and a probed length. Opening
//! failures are the only errors surfaced as [`EncodeError::Open`].

use std::fs::File;
use std::io::{Read, Stdin};
use std::path::Path;

use crate::error::EncodeError;

/// A plaintext source for one message.
pub struct Input<R> {
    pub(crate) reader: R,
    pub(crate) name: Option<String>,
    pub(crate) len: Option<u64>,
    pub(crate) from_file: bool,
}

impl Input<File> {
    /// Open a file, capturing its name and length.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EncodeError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let len = file.metadata().ok().map(|m| m.len());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(Input {
            reader: file,
            name,
            len,
            from_file: true,
        })
    }
}

impl Input<Stdin> {
    /// Read from standard input; size unknown, no name.
    pub fn stdin() -> Self {
        Input {
            reader: std::io::stdin(),
            name: None,
            len: None,
            from_file: false,
        }
    }
}

impl<R: Read> Input<R> {
    /// Wrap an arbitrary reader; size unknown, no name.
    pub fn from_reader(reader: R) -> Self {
        Input {
            reader,
            name: None,
            len: None,
            from_file: false,
        }
    }
}

/// Magic prefixes of formats that are pointless to recompress.
const COMPRESSED_MAGICS: &[&[u8]] = &[
    b"\x1f\x8b",         // gzip
    b"BZh",              // bzip2
    b"PK\x03\x04",       // zip
    b"\xfd7zXZ\x00",     // xz
    b"\x28\xb5\x2f\xfd", // zstd
];

/// Probe the first bytes of the stream for a known compressed format.
pub(crate) fn looks_compressed(head: &[u8]) -> bool {
    COMPRESSED_MAGICS
        .iter()
        .any(|magic| head.len() >= magic.len() && &head[..magic.len()] == *magic)
}
