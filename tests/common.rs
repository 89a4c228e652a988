//! tests/common.rs
//! Shared fixtures: a stub keyring, a reversible stand-in for the
//! public-key primitive, and enough packet parsing / decryption to
//! verify round trips. The decryption pipeline itself is deliberately
//! not part of the library, so the inverse lives here.

#![allow(dead_code)]

use std::io::Read;

use sha1::{Digest, Sha1};

use pktcrypt_rs::crypto::cfb::CfbCipher;
use pktcrypt_rs::crypto::engine::CipherEngine;
use pktcrypt_rs::{
    CipherAlgo, CompressAlgo, DigestAlgo, KeyUsage, KeyVersion, Keyring, LookupError, Mpi,
    PubkeyAlgo, PublicKeyEncrypt, RecipientKey, S2k, S2kMode, SecretString,
};

pub const TEST_PASSPHRASE: &str = "correct horse battery staple";

pub fn passphrase() -> SecretString {
    SecretString::new(TEST_PASSPHRASE.to_string())
}

// ───────────────────────────────────────────────────────────────────
// Stub collaborators
// ───────────────────────────────────────────────────────────────────

/// XOR pad for the stand-in public-key engine; reversible so tests can
/// unwrap the session key like a private-key holder would.
pub const XOR_PAD: u8 = 0xA5;

pub struct XorEngine;

impl PublicKeyEncrypt for XorEngine {
    fn encrypt(
        &self,
        _algo: PubkeyAlgo,
        _public: &[Mpi],
        frame: &Mpi,
    ) -> Result<Vec<Mpi>, Box<dyn std::error::Error + Send + Sync>> {
        let mixed: Vec<u8> = frame.as_bytes().iter().map(|b| b ^ XOR_PAD).collect();
        Ok(vec![Mpi::from_bytes(&mixed)])
    }
}

/// Fails for any recipient whose key material starts with `poison`;
/// otherwise behaves like [`XorEngine`].
pub struct PoisonedEngine {
    pub poison: u8,
}

impl PublicKeyEncrypt for PoisonedEngine {
    fn encrypt(
        &self,
        algo: PubkeyAlgo,
        public: &[Mpi],
        frame: &Mpi,
    ) -> Result<Vec<Mpi>, Box<dyn std::error::Error + Send + Sync>> {
        if public
            .first()
            .and_then(|m| m.as_bytes().first())
            .copied()
            == Some(self.poison)
        {
            return Err("stub engine refused this key".into());
        }
        XorEngine.encrypt(algo, public, frame)
    }
}

/// A recipient key whose id and material are filled with `tag`
/// (nonzero, so the material survives MPI normalization).
pub fn recipient(tag: u8) -> RecipientKey {
    assert_ne!(tag, 0);
    RecipientKey {
        algo: PubkeyAlgo::Rsa,
        key_id: [tag; 8],
        nbits: 2048,
        version: KeyVersion::V4,
        sym_prefs: vec![CipherAlgo::Aes256, CipherAlgo::Aes128],
        compress_prefs: vec![CompressAlgo::Zip],
        supports_mdc: true,
        hidden: false,
        material: vec![Mpi::from_bytes(&[tag; 256])],
    }
}

pub struct TestKeyring {
    pub keys: Vec<(String, RecipientKey)>,
}

impl TestKeyring {
    pub fn with(entries: &[(&str, RecipientKey)]) -> Self {
        TestKeyring {
            keys: entries
                .iter()
                .map(|(id, key)| (id.to_string(), key.clone()))
                .collect(),
        }
    }
}

impl Keyring for TestKeyring {
    fn lookup(&self, user_id: &str, _usage: KeyUsage) -> Result<RecipientKey, LookupError> {
        let matches: Vec<&RecipientKey> = self
            .keys
            .iter()
            .filter(|(id, _)| id == user_id)
            .map(|(_, key)| key)
            .collect();
        match matches.len() {
            0 => Err(LookupError::NotFound),
            1 if !matches[0].algo.can_encrypt() => Err(LookupError::Unusable),
            1 => Ok(matches[0].clone()),
            _ => Err(LookupError::Ambiguous),
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Packet parsing
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Packet {
    pub tag: u8,
    pub new_format: bool,
    /// Old-format length type (3 = indeterminate).
    pub lentype: Option<u8>,
    /// Whether any new-format partial-length chunk was used.
    pub partial: bool,
    pub body: Vec<u8>,
}

impl Packet {
    pub fn has_fixed_length(&self) -> bool {
        match self.lentype {
            Some(lentype) => lentype != 3,
            None => !self.partial,
        }
    }
}

pub fn parse_packets(data: &[u8]) -> Vec<Packet> {
    let mut packets = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let ctb = rest[0];
        assert_eq!(ctb & 0x80, 0x80, "bad ctb {ctb:#04x}");
        if ctb & 0x40 == 0 {
            let tag = (ctb >> 2) & 0x0F;
            let lentype = ctb & 0x03;
            let (len, header) = match lentype {
                0 => (rest[1] as usize, 2),
                1 => (u16::from_be_bytes([rest[1], rest[2]]) as usize, 3),
                2 => (
                    u32::from_be_bytes([rest[1], rest[2], rest[3], rest[4]]) as usize,
                    5,
                ),
                _ => (rest.len() - 1, 1),
            };
            packets.push(Packet {
                tag,
                new_format: false,
                lentype: Some(lentype),
                partial: false,
                body: rest[header..header + len].to_vec(),
            });
            rest = &rest[header + len..];
        } else {
            let tag = ctb & 0x3F;
            let mut body = Vec::new();
            let mut partial = false;
            let mut cur = &rest[1..];
            loop {
                let first = cur[0] as usize;
                if first < 192 {
                    body.extend_from_slice(&cur[1..1 + first]);
                    cur = &cur[1 + first..];
                    break;
                } else if first < 224 {
                    let len = ((first - 192) << 8) + cur[1] as usize + 192;
                    body.extend_from_slice(&cur[2..2 + len]);
                    cur = &cur[2 + len..];
                    break;
                } else if first == 255 {
                    let len = u32::from_be_bytes([cur[1], cur[2], cur[3], cur[4]]) as usize;
                    body.extend_from_slice(&cur[5..5 + len]);
                    cur = &cur[5 + len..];
                    break;
                } else {
                    partial = true;
                    let len = 1usize << (first & 0x1F);
                    body.extend_from_slice(&cur[1..1 + len]);
                    cur = &cur[1 + len..];
                }
            }
            packets.push(Packet {
                tag,
                new_format: true,
                lentype: None,
                partial,
                body,
            });
            rest = cur;
        }
    }
    packets
}

// ───────────────────────────────────────────────────────────────────
// Decryption helpers (the inverse pipeline, test-side only)
// ───────────────────────────────────────────────────────────────────

/// Decrypt a tag 9 / tag 18 body: strip and check the random prefix,
/// resync for tag 9, verify and strip the integrity trailer for
/// tag 18.
pub fn cfb_decrypt_body(algo: CipherAlgo, key: &[u8], body: &[u8], mdc: bool) -> Vec<u8> {
    let mut cfb = CfbCipher::new(CipherEngine::new(algo, key).unwrap());
    let data = if mdc {
        assert_eq!(body[0], 1, "mdc packet version");
        &body[1..]
    } else {
        body
    };
    let bs = algo.block_len();
    let mut buf = data.to_vec();
    let prefix_ct = buf[..bs + 2].to_vec();
    cfb.decrypt(&mut buf[..bs + 2]);
    assert_eq!(&buf[bs - 2..bs], &buf[bs..bs + 2], "prefix repeat check");
    if !mdc {
        cfb.resync(&prefix_ct[2..]);
    }
    cfb.decrypt(&mut buf[bs + 2..]);
    let mut plain = buf[bs + 2..].to_vec();
    if mdc {
        let n = plain.len();
        assert!(n >= 22, "missing integrity trailer");
        assert_eq!(&plain[n - 22..n - 20], &[0xD3, 0x14]);
        let mut hash = Sha1::new();
        hash.update(&buf[..bs + 2]);
        hash.update(&plain[..n - 22]);
        hash.update([0xD3, 0x14]);
        assert_eq!(
            hash.finalize().as_slice(),
            &plain[n - 20..],
            "integrity trailer mismatch"
        );
        plain.truncate(n - 22);
    }
    plain
}

/// Recover key id, cipher and session key from a tag 1 body written
/// with [`XorEngine`].
pub fn unwrap_pubkey_packet(body: &[u8]) -> ([u8; 8], CipherAlgo, Vec<u8>) {
    assert_eq!(body[0], 3, "pubkey packet version");
    let mut key_id = [0u8; 8];
    key_id.copy_from_slice(&body[1..9]);
    let nbits = u16::from_be_bytes([body[10], body[11]]) as usize;
    let nbytes = (nbits + 7) / 8;
    let frame: Vec<u8> = body[12..12 + nbytes].iter().map(|b| b ^ XOR_PAD).collect();
    assert_eq!(frame[0], 0x02, "frame marker");
    let sep = 1 + frame[1..]
        .iter()
        .position(|&b| b == 0)
        .expect("pad terminator");
    let cipher = CipherAlgo::from_id(frame[sep + 1]).unwrap();
    let key = frame[sep + 2..frame.len() - 2].to_vec();
    let declared = u16::from_be_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    let computed: u16 = key.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    assert_eq!(declared, computed, "session key checksum");
    assert_eq!(key.len(), cipher.key_len());
    (key_id, cipher, key)
}

/// Recover cipher and derivation parameters from a tag 3 body.
pub fn parse_symkey_packet(body: &[u8]) -> (CipherAlgo, S2k) {
    assert_eq!(body[0], 4, "symkey packet version");
    let cipher = CipherAlgo::from_id(body[1]).unwrap();
    let hash = DigestAlgo::from_id(body[3]).unwrap();
    let (mode, salt, count) = match body[2] {
        0 => (S2kMode::Simple, [0u8; 8], 0),
        1 => {
            let mut salt = [0u8; 8];
            salt.copy_from_slice(&body[4..12]);
            (S2kMode::Salted, salt, 0)
        }
        3 => {
            let mut salt = [0u8; 8];
            salt.copy_from_slice(&body[4..12]);
            (S2kMode::IteratedSalted, salt, body[12])
        }
        other => panic!("unknown s2k mode {other}"),
    };
    (
        cipher,
        S2k {
            mode,
            hash,
            salt,
            count,
        },
    )
}

pub fn inflate(algo: CompressAlgo, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    match algo {
        CompressAlgo::Zip => {
            flate2::read::DeflateDecoder::new(data)
                .read_to_end(&mut out)
                .unwrap();
        }
        CompressAlgo::Zlib => {
            flate2::read::ZlibDecoder::new(data)
                .read_to_end(&mut out)
                .unwrap();
        }
        CompressAlgo::Uncompressed => panic!("nothing to inflate"),
    }
    out
}

/// A decoded literal-data packet plus the packet framing it arrived in.
#[derive(Debug)]
pub struct LiteralOut {
    pub packet: Packet,
    pub text_mode: bool,
    pub name: String,
    pub timestamp: u32,
    pub payload: Vec<u8>,
}

/// Walk a decrypted plaintext stream down to its literal packet,
/// inflating compressed wrappers on the way.
pub fn unwrap_literal(data: &[u8]) -> LiteralOut {
    let packets = parse_packets(data);
    assert_eq!(packets.len(), 1, "expected a single nested packet");
    let packet = packets.into_iter().next().unwrap();
    match packet.tag {
        8 => {
            let algo = CompressAlgo::from_id(packet.body[0]).unwrap();
            unwrap_literal(&inflate(algo, &packet.body[1..]))
        }
        11 => {
            let body = &packet.body;
            let text_mode = match body[0] {
                b't' => true,
                b'b' => false,
                other => panic!("unknown literal mode {other:#04x}"),
            };
            let name_len = body[1] as usize;
            let name = String::from_utf8(body[2..2 + name_len].to_vec()).unwrap();
            let ts_at = 2 + name_len;
            let timestamp = u32::from_be_bytes([
                body[ts_at],
                body[ts_at + 1],
                body[ts_at + 2],
                body[ts_at + 3],
            ]);
            let payload = body[ts_at + 4..].to_vec();
            LiteralOut {
                packet: packet.clone(),
                text_mode,
                name,
                timestamp,
                payload,
            }
        }
        other => panic!("unexpected inner packet tag {other}"),
    }
}

/// Full symmetric decryption: tag 3 parameters, re-derived key, body.
pub fn decrypt_symmetric(message: &[u8], passphrase: &str) -> LiteralOut {
    unwrap_literal(&decrypt_symmetric_inner(message, passphrase))
}

/// Like [`decrypt_symmetric`] but stops at the decrypted inner stream
/// (for `no_literal` messages).
pub fn decrypt_symmetric_inner(message: &[u8], passphrase: &str) -> Vec<u8> {
    let packets = parse_packets(message);
    assert_eq!(packets.len(), 2, "expected symkey + encrypted packets");
    assert_eq!(packets[0].tag, 3);
    let (cipher, s2k) = parse_symkey_packet(&packets[0].body);
    let key = s2k.derive(passphrase, cipher.key_len());
    assert!(packets[1].tag == 9 || packets[1].tag == 18);
    cfb_decrypt_body(cipher, &key, &packets[1].body, packets[1].tag == 18)
}

/// Full public-key decryption via the [`XorEngine`] stand-in. Returns
/// the key ids addressed and the literal payload.
pub fn decrypt_pubkey(message: &[u8]) -> (Vec<[u8; 8]>, LiteralOut) {
    let packets = parse_packets(message);
    assert!(packets.len() >= 2, "expected pubkey + encrypted packets");
    let (enc, seskeys) = packets.split_last().unwrap();
    let mut key_ids = Vec::new();
    let mut session: Option<(CipherAlgo, Vec<u8>)> = None;
    for packet in seskeys {
        assert_eq!(packet.tag, 1);
        let (key_id, cipher, key) = unwrap_pubkey_packet(&packet.body);
        key_ids.push(key_id);
        match &session {
            Some((prev_cipher, prev_key)) => {
                assert_eq!(*prev_cipher, cipher);
                assert_eq!(prev_key, &key, "recipients share one session key");
            }
            None => session = Some((cipher, key)),
        }
    }
    let (cipher, key) = session.expect("at least one recipient");
    assert!(enc.tag == 9 || enc.tag == 18);
    let plain = cfb_decrypt_body(cipher, &key, &enc.body, enc.tag == 18);
    (key_ids, unwrap_literal(&plain))
}

/// Strip ASCII armor down to the binary message, checking the frame.
pub fn dearmor(text: &str) -> Vec<u8> {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("-----BEGIN PGP MESSAGE-----"));
    assert_eq!(lines.next(), Some(""));
    let mut body = String::new();
    let mut crc_line = None;
    for line in lines {
        if let Some(crc) = line.strip_prefix('=') {
            crc_line = Some(crc.to_string());
        } else if line == "-----END PGP MESSAGE-----" {
            break;
        } else {
            body.push_str(line);
        }
    }
    assert!(crc_line.is_some(), "missing crc line");
    STANDARD.decode(body).unwrap()
}
