//! Coinbase transaction construction for the genesis block.
//!
//! The genesis coinbase has a fixed shape: one input spending the null
//! outpoint and carrying the timestamp script, and one pay-to-pubkey output.

use crate::hash::double_sha256;

/// Transaction version.
pub const TX_VERSION: u32 = 1;

/// Index of the null previous outpoint.
pub const NULL_OUTPOINT_INDEX: u32 = 0xFFFFFFFF;

/// Input sequence number.
pub const SEQUENCE_FINAL: u32 = 0xFFFFFFFF;

/// Length byte written for the pay-to-pubkey output script.
pub const OUTPUT_SCRIPT_LEN: u8 = 0x43;

/// Bytes of the transaction that do not belong to the input script.
pub const FIXED_TX_SIZE: usize = 127;

/// Serialize the coinbase transaction.
///
/// All integers are little-endian. The output script length byte is always
/// 0x43, matching a 65-byte pay-to-pubkey script.
pub fn encode_transaction(input_script: &[u8], output_script: &[u8], value: i64) -> Vec<u8> {
    debug_assert_eq!(output_script.len(), OUTPUT_SCRIPT_LEN as usize);

    let mut raw_tx = Vec::with_capacity(FIXED_TX_SIZE + input_script.len());

    // Version (4 bytes, little-endian)
    raw_tx.extend_from_slice(&TX_VERSION.to_le_bytes());

    // Input count
    raw_tx.push(0x01);

    // Input: null previous output
    raw_tx.extend_from_slice(&[0u8; 32]);
    raw_tx.extend_from_slice(&NULL_OUTPOINT_INDEX.to_le_bytes());

    // ScriptSig
    raw_tx.push(input_script.len() as u8);
    raw_tx.extend_from_slice(input_script);

    // Sequence
    raw_tx.extend_from_slice(&SEQUENCE_FINAL.to_le_bytes());

    // Output count
    raw_tx.push(0x01);

    // Output value (8 bytes, signed little-endian) and script
    raw_tx.extend_from_slice(&value.to_le_bytes());
    raw_tx.push(OUTPUT_SCRIPT_LEN);
    raw_tx.extend_from_slice(output_script);

    // Locktime
    raw_tx.extend_from_slice(&0u32.to_le_bytes());

    raw_tx
}

/// A serialized coinbase transaction and its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinbaseTransaction {
    /// Raw serialized transaction.
    pub raw_tx: Vec<u8>,
    /// Transaction ID (double SHA256 of raw_tx, internal byte order).
    pub txid: [u8; 32],
}

impl CoinbaseTransaction {
    /// Encode the transaction and compute its txid.
    pub fn new(input_script: &[u8], output_script: &[u8], value: i64) -> Self {
        let raw_tx = encode_transaction(input_script, output_script, value);
        let txid = double_sha256(&raw_tx);
        CoinbaseTransaction { raw_tx, txid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_to_display_hex;
    use crate::script::{build_input_script, build_output_script};

    const TIMES: &str = "The Times 03/Jan/2009 Chancellor on brink of second bailout for banks";
    const SATOSHI_PUBKEY: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

    fn output_script() -> Vec<u8> {
        build_output_script(SATOSHI_PUBKEY).unwrap()
    }

    #[test]
    fn test_transaction_length() {
        let output = output_script();
        for text in ["", "x", TIMES, &"y".repeat(200)] {
            let input = build_input_script(text).unwrap();
            let tx = encode_transaction(&input, &output, 5_000_000_000);
            assert_eq!(tx.len(), FIXED_TX_SIZE + input.len());
        }
    }

    #[test]
    fn test_transaction_layout() {
        let input = build_input_script(TIMES).unwrap();
        let output = output_script();
        let tx = encode_transaction(&input, &output, 5_000_000_000);

        assert_eq!(&tx[0..4], &[0x01, 0x00, 0x00, 0x00]);
        assert_eq!(tx[4], 0x01);
        assert_eq!(&tx[5..37], &[0u8; 32]);
        assert_eq!(&tx[37..41], &[0xff; 4]);
        assert_eq!(tx[41] as usize, input.len());

        let after_script = 42 + input.len();
        assert_eq!(&tx[after_script..after_script + 4], &[0xff; 4]);
        assert_eq!(tx[after_script + 4], 0x01);
        // 50 coins = 0x00000001_2a05f200
        assert_eq!(
            &tx[after_script + 5..after_script + 13],
            &[0x00, 0xf2, 0x05, 0x2a, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(tx[after_script + 13], 0x43);
        assert_eq!(&tx[tx.len() - 4..], &[0u8; 4]);
    }

    #[test]
    fn test_genesis_txid() {
        let input = build_input_script(TIMES).unwrap();
        let coinbase = CoinbaseTransaction::new(&input, &output_script(), 5_000_000_000);

        assert_eq!(coinbase.raw_tx.len(), 204);
        assert_eq!(
            hash_to_display_hex(&coinbase.txid),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let input = build_input_script("deterministic").unwrap();
        let output = output_script();

        let first = CoinbaseTransaction::new(&input, &output, 42);
        let second = CoinbaseTransaction::new(&input, &output, 42);
        assert_eq!(first, second);
    }
}
