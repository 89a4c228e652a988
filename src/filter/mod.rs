// src/filter/mod.rs

//! Stream transforms and the filter stack.
//!
//! The transform set is closed: text canonicalization, compression,
//! encryption and armoring, each implementing the same small contract
//! (`flush` on the write path, `underflow` on the read path,
//! `finalize` exactly once, `name` for diagnostics). The stack owns an
//! ordered list of transforms over one sink; writes pass through them
//! in reverse-push order, so the transform pushed last is the first to
//! see application data and the one pushed first touches the bytes
//! last before they reach the sink.

pub mod armor;
pub mod cipher;
pub mod compress;
pub mod text;

use std::io::{Read, Write};

use tracing::trace;

use crate::error::EncodeError;

pub use self::armor::ArmorFilter;
pub use self::cipher::CipherFilter;
pub use self::compress::CompressFilter;
pub use self::text::TextFilter;

/// One stream transform.
///
/// Each variant supports exactly one direction; invoking the other is
/// a caller bug, as it is for the iobuf filters this models.
pub enum Transform {
    Text(TextFilter),
    Compress(CompressFilter),
    Encrypt(CipherFilter),
    Armor(ArmorFilter),
}

impl Transform {
    /// Write path: transform `data`, returning the bytes for the next
    /// stage. Safe to call any number of times before `finalize`.
    pub fn flush(&mut self, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
        match self {
            Transform::Text(_) => unreachable!("text filter has no write path"),
            Transform::Compress(f) => f.flush(data),
            Transform::Encrypt(f) => f.flush(data),
            Transform::Armor(f) => f.flush(data),
        }
    }

    /// Read path: pull and transform the next chunk from `src`. An
    /// empty result means the upstream is exhausted.
    pub fn underflow(&mut self, src: &mut dyn Read) -> Result<Vec<u8>, EncodeError> {
        match self {
            Transform::Text(f) => f.underflow(src),
            _ => unreachable!("{} has no read path", self.name()),
        }
    }

    /// Flush any buffered state and emit trailers. Runs exactly once.
    pub fn finalize(&mut self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Transform::Text(f) => Ok(f.finalize()),
            Transform::Compress(f) => f.finalize(),
            Transform::Encrypt(f) => f.finalize(),
            Transform::Armor(f) => f.finalize(),
        }
    }

    /// Stable diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Text(_) => "text_filter",
            Transform::Compress(_) => "compress_filter",
            Transform::Encrypt(_) => "cipher_filter",
            Transform::Armor(_) => "armor_filter",
        }
    }
}

/// An ordered stack of transforms bound to one output stream.
pub struct FilterStack<W: Write> {
    filters: Vec<Transform>,
    sink: W,
}

impl<W: Write> FilterStack<W> {
    pub fn new(sink: W) -> Self {
        FilterStack {
            filters: Vec::new(),
            sink,
        }
    }

    /// Push a transform; it becomes the first to see written data.
    pub fn push(&mut self, transform: Transform) {
        trace!(filter = transform.name(), "pushing filter");
        self.filters.push(transform);
    }

    /// Write application data through the whole stack.
    pub fn write_all(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        if self.filters.is_empty() {
            self.sink.write_all(data)?;
            return Ok(());
        }
        let mut current = data.to_vec();
        for filter in self.filters.iter_mut().rev() {
            if current.is_empty() {
                return Ok(());
            }
            current = filter.flush(&current)?;
        }
        if !current.is_empty() {
            self.sink.write_all(&current)?;
        }
        Ok(())
    }

    /// Finalize every transform in data order (last pushed first),
    /// cascading each trailer through the remaining stack, then flush
    /// and return the sink.
    ///
    /// On error the remaining transforms are dropped, which releases
    /// their state without emitting further output.
    pub fn finalize(self) -> Result<W, EncodeError> {
        let FilterStack {
            mut filters,
            mut sink,
        } = self;
        for idx in (0..filters.len()).rev() {
            let mut tail = filters[idx].finalize()?;
            trace!(filter = filters[idx].name(), "finalized filter");
            for downstream in filters[..idx].iter_mut().rev() {
                if tail.is_empty() {
                    break;
                }
                tail = downstream.flush(&tail)?;
            }
            if !tail.is_empty() {
                sink.write_all(&tail)?;
            }
        }
        sink.flush()?;
        Ok(sink)
    }
}
