//! Public-key encoding: per-recipient session-key fan-out plus the
//! shared streaming pipeline.

use std::io::{BufRead, BufReader, Read, Write};

use tracing::{debug, info};

use crate::error::EncodeError;
use crate::filter::{ArmorFilter, CipherFilter, CompressFilter, FilterStack, TextFilter, Transform};
use crate::input::{looks_compressed, Input};
use crate::keys::{build_recipient_list, KeyUsage, Keyring, PublicKeyEncrypt};
use crate::packet::literal::LiteralWriter;
use crate::policy::resolve_policy;
use crate::session::{make_session_key, write_pubkey_enc_list};
use crate::status::StatusEvent;

use super::{plan_literal, stream_plaintext, Encoder};

impl<'a> Encoder<'a> {
    /// Encrypt one message to every listed recipient.
    ///
    /// All session-key packets are produced before any output byte: a
    /// wrap failure for any single recipient aborts the whole message.
    pub fn encode_crypt<R: Read, W: Write>(
        &mut self,
        input: Input<R>,
        out: W,
        recipients: &[String],
        keyring: &dyn Keyring,
        engine: &dyn PublicKeyEncrypt,
    ) -> Result<(), EncodeError> {
        let keys = build_recipient_list(keyring, recipients, KeyUsage::Encrypt)?;

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

        let policy = resolve_policy(&self.opts, &keys, already_compressed);
        if self.opts.legacy && !policy.legacy {
            // stays off for the remainder of the run
            self.opts.legacy = false;
        }
        let legacy = policy.legacy;

        let dek = make_session_key(policy.cipher, policy.use_mdc);
        debug!(
            cipher = dek.algo().name(),
            mdc = dek.use_mdc(),
            "session key created"
        );
        let header_packets = write_pubkey_enc_list(engine, &keys, &dek)?;

        let do_compress = policy.compress.is_some();
        let (spec, datalen) = plan_literal(&self.opts, name, len, from_file, do_compress)?;

        let mut stack = FilterStack::new(out);
        if self.opts.armor {
            stack.push(Transform::Armor(ArmorFilter::new()));
        }
        stack.push(Transform::Encrypt(CipherFilter::new(
            &dek,
            datalen,
            legacy,
            header_packets,
        )?));
        if let Some(algo) = policy.compress {
            stack.push(Transform::Compress(CompressFilter::new(algo, legacy)?));
        }

        self.status.status(StatusEvent::BeginEncryption);
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
        self.status.status(StatusEvent::EndEncryption);
        Ok(())
    }
}
