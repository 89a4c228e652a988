//! Symmetric and store-only encoding.

use std::io::{BufRead, BufReader, Read, Write};

use tracing::info;

use crate::algo::{CipherAlgo, CompressAlgo, DigestAlgo};
use crate::error::EncodeError;
use crate::filter::{ArmorFilter, CipherFilter, CompressFilter, FilterStack, TextFilter, Transform};
use crate::input::{looks_compressed, Input};
use crate::packet::literal::LiteralWriter;
use crate::packet::seskey::symkey_packet;
use crate::s2k::{S2k, S2kMode};
use crate::session::{passphrase_to_dek, PassphraseSource};
use crate::status::StatusEvent;

use super::{plan_literal, stream_plaintext, Encoder};

impl<'a> Encoder<'a> {
    /// Encrypt one message under a passphrase-derived key.
    pub fn encode_symmetric<R: Read, W: Write>(
        &mut self,
        input: Input<R>,
        out: W,
        passphrases: &dyn PassphraseSource,
    ) -> Result<(), EncodeError> {
        self.encode_simple(input, out, Some(passphrases))
    }

    /// Package one message as (optionally compressed, optionally
    /// armored) literal data, without encryption.
    pub fn encode_store<R: Read, W: Write>(
        &mut self,
        input: Input<R>,
        out: W,
    ) -> Result<(), EncodeError> {
        self.encode_simple(input, out, None)
    }

    fn encode_simple<R: Read, W: Write>(
        &mut self,
        input: Input<R>,
        out: W,
        passphrases: Option<&dyn PassphraseSource>,
    ) -> Result<(), EncodeError> {
        let legacy = self.opts.legacy;
        let Input {
            reader,
            name,
            len,
            from_file,
        } = input;
        let mut reader = BufReader::new(reader);

        let already_compressed = {
            let head = reader.fill_buf()?;
            looks_compressed(head)
        };
        if already_compressed {
            info!(
                file = name.as_deref().unwrap_or("[stdin]"),
                "already compressed"
            );
        }
        let do_compress = self.opts.compress && !legacy && !already_compressed;

        let mut header_packets = Vec::new();
        let dek = match passphrases {
            Some(source) => {
                let s2k = S2k::new(
                    if legacy {
                        S2kMode::Simple
                    } else {
                        self.opts.s2k_mode
                    },
                    self.opts.def_digest.unwrap_or(if legacy {
                        DigestAlgo::Md5
                    } else {
                        self.opts.s2k_digest
                    }),
                );
                let cipher = self.opts.def_cipher.unwrap_or(if legacy {
                    CipherAlgo::Idea
                } else {
                    self.opts.s2k_cipher
                });
                let dek = passphrase_to_dek(source, cipher, &s2k)?;
                // a legacy message re-derives the key from the
                // passphrase alone; only the modern format announces
                // its derivation parameters
                if !legacy {
                    header_packets = symkey_packet(dek.algo(), &s2k)?;
                }
                Some(dek)
            }
            None => None,
        };

        let (spec, datalen) = plan_literal(&self.opts, name, len, from_file, do_compress)?;

        let mut stack = FilterStack::new(out);
        if self.opts.armor {
            stack.push(Transform::Armor(ArmorFilter::new()));
        }
        if let Some(dek) = &dek {
            stack.push(Transform::Encrypt(CipherFilter::new(
                dek,
                datalen,
                legacy,
                header_packets,
            )?));
        }
        if do_compress {
            let algo = self.opts.def_compress.unwrap_or(CompressAlgo::Zip);
            if algo != CompressAlgo::Uncompressed {
                stack.push(Transform::Compress(CompressFilter::new(algo, legacy)?));
            }
        }

        if dek.is_some() {
            self.status.status(StatusEvent::BeginEncryption);
        }
        let text = self
            .opts
            .textmode
            .then(|| Transform::Text(TextFilter::new()));
        let literal = if self.opts.no_literal {
            None
        } else {
            Some(LiteralWriter::new(&spec, legacy)?)
        };
        stream_plaintext(&mut stack, &mut reader, text, literal)?;
        stack.finalize()?;
        if dek.is_some() {
            self.status.status(StatusEvent::EndEncryption);
        }
        Ok(())
    }
}
