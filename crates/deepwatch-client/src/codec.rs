//! Decoding of the hex payloads Substrate nodes hand back: SCALE-encoded
//! storage values and hex block numbers.

use deepwatch_core::DeepwatchError;

/// Storage key of `Balances::TotalIssuance`:
/// twox128("Balances") ++ twox128("TotalIssuance"). Stable across runtime
/// upgrades as long as the pallet keeps its name.
pub const TOTAL_ISSUANCE_KEY: &str =
    "0xc2261276cc9d1f8598ea4b6a74b15c2f57c875e4cff74148e4628f264b974c80";

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Decodes a `state_getStorage` result for a `u128` balance entry:
/// SCALE fixed-width encoding, 16 bytes little-endian.
pub fn decode_issuance(hex_value: &str) -> Result<u128, DeepwatchError> {
    let raw = hex::decode(strip_hex_prefix(hex_value)).map_err(|e| {
        DeepwatchError::Encoding {
            what: "storage value",
            detail: e.to_string(),
        }
    })?;
    let bytes: [u8; 16] =
        raw.as_slice()
            .try_into()
            .map_err(|_| DeepwatchError::Encoding {
                what: "storage value",
                detail: format!("expected 16 bytes, got {}", raw.len()),
            })?;
    Ok(u128::from_le_bytes(bytes))
}

/// Parses a header's hex block number ("0x12d687") into a height.
pub fn decode_block_number(hex_number: &str) -> Result<u64, DeepwatchError> {
    let digits = strip_hex_prefix(hex_number);
    if digits.is_empty() {
        return Err(DeepwatchError::Encoding {
            what: "block number",
            detail: "empty hex string".to_string(),
        });
    }
    u64::from_str_radix(digits, 16).map_err(|e| DeepwatchError::Encoding {
        what: "block number",
        detail: format!("{hex_number:?}: {e}"),
    })
}

/// Checks that `hash` looks like a 32-byte block hash before it is echoed
/// back to the node in a pinned query.
pub fn ensure_block_hash(hash: &str) -> Result<(), DeepwatchError> {
    let raw = hex::decode(strip_hex_prefix(hash)).map_err(|e| DeepwatchError::Encoding {
        what: "block hash",
        detail: e.to_string(),
    })?;
    if raw.len() != 32 {
        return Err(DeepwatchError::Encoding {
            what: "block hash",
            detail: format!("expected 32 bytes, got {}", raw.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_storage_values() {
        assert_eq!(
            decode_issuance("0x01000000000000000000000000000000").unwrap(),
            1
        );
        // Realistic magnitude: 5 × 10^26 raw units.
        let issuance: u128 = 500_000_000_000_000_000_000_000_000;
        let encoded = format!("0x{}", hex::encode(issuance.to_le_bytes()));
        assert_eq!(decode_issuance(&encoded).unwrap(), issuance);
    }

    #[test]
    fn storage_decode_rejects_bad_payloads() {
        assert!(decode_issuance("0x01").is_err()); // short
        assert!(decode_issuance("0xzz000000000000000000000000000000").is_err()); // non-hex
        assert!(decode_issuance("").is_err());
    }

    #[test]
    fn parses_header_numbers() {
        assert_eq!(decode_block_number("0x12d687").unwrap(), 1_234_567);
        assert_eq!(decode_block_number("0x0").unwrap(), 0);
        assert!(decode_block_number("0x").is_err());
        assert!(decode_block_number("height").is_err());
    }

    #[test]
    fn block_hashes_must_be_32_bytes() {
        let good = format!("0x{}", "ab".repeat(32));
        assert!(ensure_block_hash(&good).is_ok());
        assert!(ensure_block_hash("0xabcd").is_err());
        assert!(ensure_block_hash("not-hex").is_err());
    }
}
