use jsonrpsee::proc_macros::rpc;
use serde::{Deserialize, Serialize};

/// The slice of a Substrate block header this crate reads. Unknown fields
/// (state root, digest, ...) are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcHeader {
    pub parent_hash: String,
    /// Block height as a 0x-prefixed hex string.
    pub number: String,
}

/// Substrate JSON-RPC methods the engine depends on. Method names carry
/// their own `chain_`/`state_` prefixes, so no shared namespace applies.
#[rpc(client)]
pub trait DeeperApi {
    /// Header of the given block, or of the chain head when `hash` is None.
    #[method(name = "chain_getHeader")]
    async fn get_header(&self, hash: Option<String>)
        -> jsonrpsee::core::RpcResult<Option<RpcHeader>>;

    /// Hash of the block at `number`. None if the node has no such block.
    #[method(name = "chain_getBlockHash")]
    async fn get_block_hash(&self, number: Option<u64>)
        -> jsonrpsee::core::RpcResult<Option<String>>;

    /// Raw storage value under `key`, pinned to block `at` when given.
    /// None when the storage entry does not exist.
    #[method(name = "state_getStorage")]
    async fn get_storage(&self, key: String, at: Option<String>)
        -> jsonrpsee::core::RpcResult<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_deserializes_from_node_json() {
        // Shape as served by a Substrate node; extra fields must not break us.
        let json = r#"{
            "parentHash": "0x3d9eacfbbf2c2ba2a062e674a11a4e6382d14d42bcc7b016b14f8a96ed6a0f01",
            "number": "0x12d687",
            "stateRoot": "0xaaaa",
            "extrinsicsRoot": "0xbbbb",
            "digest": { "logs": [] }
        }"#;
        let header: RpcHeader = serde_json::from_str(json).unwrap();
        assert_eq!(header.number, "0x12d687");
    }
}
