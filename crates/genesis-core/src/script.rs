//! Coinbase input script and pay-to-pubkey output script construction.

use crate::error::{GenesisError, Result};

/// Leading bytes of the genesis coinbase script: push of 0x1d00ffff
/// followed by a push of the single byte 0x04.
pub const COINBASE_SCRIPT_PREFIX: [u8; 7] = [0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04];

/// OP_PUSHDATA1
pub const OP_PUSHDATA1: u8 = 0x4c;

/// OP_CHECKSIG
pub const OP_CHECKSIG: u8 = 0xac;

/// Largest payload a bare push opcode can carry.
pub const MAX_DIRECT_PUSH: usize = 76;

/// Size of an uncompressed secp256k1 public key.
pub const PUBKEY_SIZE: usize = 65;

/// Largest script whose length fits the single length byte of the transaction.
pub const MAX_SCRIPT_SIZE: usize = 0xff;

/// Build the coinbase input script carrying the timestamp text.
///
/// Layout: `04ffff001d0104` [`4c`] `<len>` `<utf8 bytes>`. The pushdata
/// marker is only emitted when the text is longer than 76 bytes.
pub fn build_input_script(timestamp: &str) -> Result<Vec<u8>> {
    let payload = timestamp.as_bytes();
    let pushdata = payload.len() > MAX_DIRECT_PUSH;

    let script_len = COINBASE_SCRIPT_PREFIX.len() + usize::from(pushdata) + 1 + payload.len();
    if script_len > MAX_SCRIPT_SIZE {
        return Err(GenesisError::ScriptTooLong(script_len));
    }

    let mut script = Vec::with_capacity(script_len);
    script.extend_from_slice(&COINBASE_SCRIPT_PREFIX);
    if pushdata {
        script.push(OP_PUSHDATA1);
    }
    script.push(payload.len() as u8);
    script.extend_from_slice(payload);

    debug_assert_eq!(script.len(), script_len);
    Ok(script)
}

/// Decode a hex public key, requiring exactly 65 bytes.
pub fn parse_pubkey(pubkey_hex: &str) -> Result<[u8; PUBKEY_SIZE]> {
    let bytes = hex::decode(pubkey_hex.trim())?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| GenesisError::InvalidKeyLength(bytes.len()))
}

/// Build the pay-to-pubkey output script: `41 <pubkey> ac`.
pub fn p2pk_script(pubkey: &[u8; PUBKEY_SIZE]) -> Vec<u8> {
    let mut script = Vec::with_capacity(PUBKEY_SIZE + 2);
    script.push(PUBKEY_SIZE as u8);
    script.extend_from_slice(pubkey);
    script.push(OP_CHECKSIG);
    script
}

/// Build the output script straight from hex key text.
pub fn build_output_script(pubkey_hex: &str) -> Result<Vec<u8>> {
    Ok(p2pk_script(&parse_pubkey(pubkey_hex)?))
}
