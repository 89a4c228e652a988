//! Multi-precision integers as carried in packets.
//!
//! The encoder never does bignum arithmetic; an [`Mpi`] is a
//! bit-counted big-endian byte string passed between the session-key
//! frame builder, the public-key collaborator and the packet codec.

/// A packet-format multi-precision integer.
///
/// Stored with leading zero octets stripped; serialized as a 16-bit
/// big-endian bit count followed by the magnitude.
#[derive(Clone, PartialEq, Eq)]
pub struct Mpi {
    bytes: Vec<u8>,
}

impl Mpi {
    /// Build from a big-endian byte string, stripping leading zeros.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Mpi {
            bytes: bytes[start..].to_vec(),
        }
    }

    /// Number of significant bits.
    pub fn nbits(&self) -> u16 {
        match self.bytes.first() {
            None => 0,
            Some(&first) => {
                let high = 8 - first.leading_zeros() as u16;
                high + 8 * (self.bytes.len() as u16 - 1)
            }
        }
    }

    /// Big-endian magnitude without leading zeros.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Serialized size: 2-byte bit count + magnitude.
    pub fn encoded_len(&self) -> usize {
        2 + self.bytes.len()
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.nbits().to_be_bytes());
        out.extend_from_slice(&self.bytes);
    }
}

impl std::fmt::Debug for Mpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // magnitude intentionally omitted; MPIs often carry key material
        write!(f, "Mpi({} bits)", self.nbits())
    }
}
