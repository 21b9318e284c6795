use std::sync::Arc;
use std::time::Duration;

use jsonrpsee::core::{async_trait, ClientError};
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use deepwatch_core::constants::{API_TIMEOUT, MAINNET_ENDPOINT, MAX_RETRY_ATTEMPTS, RETRY_DELAY};
use deepwatch_core::validation::validate_balance;
use deepwatch_core::DeepwatchError;

use crate::api::DeeperApiClient;
use crate::codec::{decode_block_number, decode_issuance, ensure_block_hash, TOTAL_ISSUANCE_KEY};
use crate::retry::connect_with_retry;

/// Connection settings. Defaults mirror the mainnet constants.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Dial attempts per connection establishment.
    pub max_retry_attempts: u32,
    /// Fixed pause between dial attempts.
    pub retry_delay: Duration,
    /// Per-request and connection deadline.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: MAINNET_ENDPOINT.to_string(),
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            retry_delay: RETRY_DELAY,
            request_timeout: API_TIMEOUT,
        }
    }
}

/// The chain reads the engine needs, behind a trait so tests can swap the
/// network for an in-process fake.
///
/// Balance-returning methods yield full-precision base-10 strings, already
/// validated; callers never see raw RPC payloads or transport error types.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Total token issuance at the chain head.
    async fn total_issuance(&self) -> Result<String, DeepwatchError>;

    /// Height of the chain head.
    async fn current_block_number(&self) -> Result<u64, DeepwatchError>;

    /// Hash of the block at `number`.
    async fn block_hash(&self, number: u64) -> Result<String, DeepwatchError>;

    /// Total token issuance as of the block with the given hash.
    async fn issuance_at(&self, hash: &str) -> Result<String, DeepwatchError>;

    /// Releases the connection. Idempotent; later reads reconnect.
    async fn disconnect(&self);
}

/// `ChainSource` over a lazily-established jsonrpsee WebSocket connection.
///
/// The connection slot is a mutex so establishment is single-flight:
/// concurrent callers wait on the winner and reuse its socket instead of
/// dialing a second one. A transport failure drops the socket and the next
/// call redials from scratch.
pub struct ChainClient {
    config: ClientConfig,
    conn: Mutex<Option<Arc<WsClient>>>,
}

impl ChainClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(ClientConfig::default())
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Eagerly establishes the connection. Idempotent; reads connect on
    /// demand anyway, this just surfaces dial errors early.
    pub async fn connect(&self) -> Result<(), DeepwatchError> {
        self.connection().await.map(|_| ())
    }

    async fn connection(&self) -> Result<Arc<WsClient>, DeepwatchError> {
        let mut guard = self.conn.lock().await;
        if let Some(client) = guard.as_ref() {
            if client.is_connected() {
                return Ok(Arc::clone(client));
            }
            // Socket died quietly; rebuild below.
            *guard = None;
        }
        let config = &self.config;
        let client = connect_with_retry(
            |attempt| {
                debug!(attempt, endpoint = %config.endpoint, "dialing node");
                WsClientBuilder::default()
                    .connection_timeout(config.request_timeout)
                    .request_timeout(config.request_timeout)
                    .build(&config.endpoint)
            },
            config.max_retry_attempts,
            config.retry_delay,
        )
        .await?;
        info!(endpoint = %config.endpoint, "connected");
        let client = Arc::new(client);
        *guard = Some(Arc::clone(&client));
        Ok(client)
    }

    async fn invalidate(&self) {
        let mut guard = self.conn.lock().await;
        if guard.take().is_some() {
            warn!("dropping broken connection; next call redials");
        }
    }

    /// Maps a jsonrpsee error into the engine's taxonomy. Anything other
    /// than an explicit node-side rejection or a decode problem means the
    /// socket can no longer be trusted, so it is dropped.
    async fn fail(&self, err: ClientError) -> DeepwatchError {
        match err {
            ClientError::Call(e) => DeepwatchError::Rpc(e.to_string()),
            ClientError::ParseError(e) => DeepwatchError::Encoding {
                what: "rpc response",
                detail: e.to_string(),
            },
            err => {
                self.invalidate().await;
                DeepwatchError::Transport(err.to_string())
            }
        }
    }

    async fn read_issuance(&self, at: Option<String>) -> Result<String, DeepwatchError> {
        let conn = self.connection().await?;
        let value = match conn.get_storage(TOTAL_ISSUANCE_KEY.to_owned(), at).await {
            Ok(value) => value,
            Err(e) => return Err(self.fail(e).await),
        };
        let hex_value = value.ok_or(DeepwatchError::EmptyIssuance)?;
        let issuance = decode_issuance(&hex_value)?.to_string();
        if !validate_balance(&issuance) {
            return Err(DeepwatchError::InvalidBalance(issuance));
        }
        Ok(issuance)
    }
}

#[async_trait]
impl ChainSource for ChainClient {
    async fn total_issuance(&self) -> Result<String, DeepwatchError> {
        let issuance = self.read_issuance(None).await?;
        debug!(%issuance, "current total issuance");
        Ok(issuance)
    }

    async fn current_block_number(&self) -> Result<u64, DeepwatchError> {
        let conn = self.connection().await?;
        let header = match conn.get_header(None).await {
            Ok(header) => header,
            Err(e) => return Err(self.fail(e).await),
        };
        let header = header.ok_or_else(|| {
            DeepwatchError::Rpc("node returned no head header".to_string())
        })?;
        let number = decode_block_number(&header.number)?;
        debug!(number, "chain head");
        Ok(number)
    }

    async fn block_hash(&self, number: u64) -> Result<String, DeepwatchError> {
        let conn = self.connection().await?;
        let hash = match conn.get_block_hash(Some(number)).await {
            Ok(hash) => hash,
            Err(e) => return Err(self.fail(e).await),
        };
        let hash = hash.ok_or(DeepwatchError::UnknownBlock(number))?;
        ensure_block_hash(&hash)?;
        Ok(hash)
    }

    async fn issuance_at(&self, hash: &str) -> Result<String, DeepwatchError> {
        ensure_block_hash(hash)?;
        self.read_issuance(Some(hash.to_owned())).await
    }

    async fn disconnect(&self) {
        let mut guard = self.conn.lock().await;
        if guard.take().is_some() {
            info!(endpoint = %self.config.endpoint, "disconnected");
        }
    }
}
