//! Genesis block header construction and serialization.

/// Block version of the genesis header.
pub const BLOCK_VERSION: u32 = 1;

/// Size of a block header in bytes.
pub const BLOCK_HEADER_SIZE: usize = 80;

/// Offset of the nonce within a serialized header.
pub const NONCE_OFFSET: usize = 76;

/// A genesis block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Merkle root of all transactions (internal byte order).
    pub merkle_root: [u8; 32],
    /// Block timestamp (Unix time).
    pub time: u32,
    /// Difficulty target in compact "bits" format.
    pub bits: u32,
    /// Nonce for proof of work.
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a new genesis header. The previous block hash is all zeros.
    pub fn new(merkle_root: [u8; 32], time: u32, bits: u32, nonce: u32) -> Self {
        BlockHeader {
            merkle_root,
            time,
            bits,
            nonce,
        }
    }

    /// Serialize the block header to 80 bytes.
    pub fn serialize(&self) -> HeaderBuf {
        let mut header = [0u8; BLOCK_HEADER_SIZE];

        // Version (4 bytes, little-endian)
        header[0..4].copy_from_slice(&BLOCK_VERSION.to_le_bytes());

        // Previous block hash stays zero: bytes 4..36

        // Merkle root (32 bytes, internal order)
        header[36..68].copy_from_slice(&self.merkle_root);

        // Timestamp (4 bytes, little-endian)
        header[68..72].copy_from_slice(&self.time.to_le_bytes());

        // Bits (4 bytes, little-endian)
        header[72..76].copy_from_slice(&self.bits.to_le_bytes());

        // Nonce (4 bytes, little-endian)
        header[76..80].copy_from_slice(&self.nonce.to_le_bytes());

        HeaderBuf(header)
    }
}

/// An owned, serialized 80-byte header whose nonce can be rewritten in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBuf([u8; BLOCK_HEADER_SIZE]);

impl HeaderBuf {
    /// Overwrite the trailing nonce bytes.
    #[inline]
    pub fn set_nonce(&mut self, nonce: u32) {
        self.0[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());
    }

    /// Return a copy with the nonce replaced.
    #[inline]
    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.set_nonce(nonce);
        self
    }

    /// The nonce currently stored in the buffer.
    pub fn nonce(&self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.0[NONCE_OFFSET..]);
        u32::from_le_bytes(bytes)
    }

    /// The raw header bytes.
    pub fn as_bytes(&self) -> &[u8; BLOCK_HEADER_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for HeaderBuf {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
