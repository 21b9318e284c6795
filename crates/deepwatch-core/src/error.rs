use std::time::Duration;

use thiserror::Error;

/// Coarse classification driving the scheduler's retry policy.
///
/// `Connection`, `Data` and `Timeout` failures are assumed transient and
/// retried within the refresh budget; `Calculation` failures are
/// deterministic and surface immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Data,
    Calculation,
    Timeout,
}

#[derive(Debug, Error)]
pub enum DeepwatchError {
    // ── Connection errors ────────────────────────────────────────────────────
    #[error("connection failed after {attempts} attempts: {last}")]
    ConnectionFailed { attempts: u32, last: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("network reported offline; refresh not attempted")]
    Offline,

    // ── Data errors ──────────────────────────────────────────────────────────
    #[error("RPC call rejected by node: {0}")]
    Rpc(String),

    #[error("balance failed validation: {0:?}")]
    InvalidBalance(String),

    #[error("node knows no hash for block {0}")]
    UnknownBlock(u64),

    #[error("total issuance storage entry is empty")]
    EmptyIssuance,

    #[error("malformed {what} encoding: {detail}")]
    Encoding { what: &'static str, detail: String },

    // ── Calculation errors ───────────────────────────────────────────────────
    #[error("comparison window must be positive; got {days} days")]
    WindowNotPositive { days: i64 },

    #[error("historical issuance {previous} exceeds current {current}")]
    IssuanceRegression { current: String, previous: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("comparison window starts before genesis (current block {current_block}, window {window_blocks} blocks)")]
    WindowBeforeGenesis {
        current_block: u64,
        window_blocks: u64,
    },

    #[error("estimated days is unbounded; no completion date exists")]
    UnboundedEstimate,

    #[error("estimated completion date overflows the calendar")]
    DateOverflow,

    // ── Timeout ──────────────────────────────────────────────────────────────
    #[error("combined fetch exceeded the {0:?} deadline")]
    Timeout(Duration),

    // ── Scheduler ────────────────────────────────────────────────────────────
    #[error("refresh failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<DeepwatchError>,
    },
}

impl DeepwatchError {
    /// The coarse kind the consumer sees. `RetriesExhausted` carries the
    /// kind of the final underlying failure, so budget exhaustion of a
    /// connection problem still reads as exactly one connection error.
    pub fn kind(&self) -> ErrorKind {
        use DeepwatchError::*;
        match self {
            ConnectionFailed { .. } | Transport(_) | Offline => ErrorKind::Connection,
            Rpc(_) | InvalidBalance(_) | UnknownBlock(_) | EmptyIssuance
            | Encoding { .. } => ErrorKind::Data,
            WindowNotPositive { .. }
            | IssuanceRegression { .. }
            | DivisionByZero
            | WindowBeforeGenesis { .. }
            | UnboundedEstimate
            | DateOverflow => ErrorKind::Calculation,
            Timeout(_) => ErrorKind::Timeout,
            RetriesExhausted { last, .. } => last.kind(),
        }
    }

    /// Whether the scheduler may retry this failure within its budget.
    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::Calculation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_retry_policy() {
        assert!(DeepwatchError::Transport("peer closed".into()).is_retryable());
        assert!(DeepwatchError::InvalidBalance("abc".into()).is_retryable());
        assert!(DeepwatchError::Timeout(Duration::from_secs(10)).is_retryable());
        assert!(!DeepwatchError::DivisionByZero.is_retryable());
        assert!(!DeepwatchError::IssuanceRegression {
            current: "100".into(),
            previous: "200".into(),
        }
        .is_retryable());
    }

    #[test]
    fn exhaustion_keeps_the_underlying_kind() {
        let err = DeepwatchError::RetriesExhausted {
            attempts: 3,
            last: Box::new(DeepwatchError::ConnectionFailed {
                attempts: 3,
                last: "refused".into(),
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.is_retryable());
    }
}
