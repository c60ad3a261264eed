// Error taxonomy shared across the dashboard core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The identity provider rejected the operation (bad credentials,
    /// expired session, provider outage). The message is the provider's
    /// own text, surfaced to the user verbatim.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The remote player table could not be queried. Callers keep showing
    /// the last-known-good roster slice instead of clearing it.
    #[error("player data unavailable: {0}")]
    DataUnavailable(String),

    /// The durable key-value store failed a read or write. Never blocks the
    /// accompanying in-memory operation; logged as a warning.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A sort header that does not name a sortable player column. Contract
    /// violation: the UI should only offer known headers.
    #[error("invalid sort key: {0}")]
    InvalidSortKey(String),

    /// A lineup slot index outside the fixed slot list. Contract violation.
    #[error("slot index {index} out of range (lineup has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DashboardError>;
