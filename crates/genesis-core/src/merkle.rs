//! Merkle root computation.

use crate::hash::double_sha256;

/// Compute the merkle root from a list of transaction IDs.
///
/// A genesis block carries only its coinbase, so the root is that txid.
/// Odd levels duplicate their last element.
pub fn compute_merkle_root(txids: &[[u8; 32]]) -> [u8; 32] {
    match txids {
        [] => [0u8; 32],
        [single] => *single,
        _ => {
            let mut level: Vec<[u8; 32]> = txids.to_vec();
            while level.len() > 1 {
                level = level
                    .chunks(2)
                    .map(|pair| {
                        let right = pair.get(1).unwrap_or(&pair[0]);
                        let mut combined = [0u8; 64];
                        combined[..32].copy_from_slice(&pair[0]);
                        combined[32..].copy_from_slice(right);
                        double_sha256(&combined)
                    })
                    .collect();
            }
            level[0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tx_merkle_root() {
        let txid = [0x42u8; 32];
        assert_eq!(compute_merkle_root(&[txid]), txid);
    }

    #[test]
    fn test_empty_merkle_root() {
        assert_eq!(compute_merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn test_three_tx_merkle_root() {
        let tx1 = [0x11u8; 32];
        let tx2 = [0x22u8; 32];
        let tx3 = [0x33u8; 32];

        let pair = |a: &[u8; 32], b: &[u8; 32]| {
            let mut combined = [0u8; 64];
            combined[..32].copy_from_slice(a);
            combined[32..].copy_from_slice(b);
            double_sha256(&combined)
        };
        let expected = pair(&pair(&tx1, &tx2), &pair(&tx3, &tx3));

        assert_eq!(compute_merkle_root(&[tx1, tx2, tx3]), expected);
    }
}
