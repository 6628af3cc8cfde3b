use thiserror::Error;

/// Errors that end a placement attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// No strategy produced a target position.
    #[error("no placement target could be resolved")]
    NoTarget,

    /// The actor disappeared mid-operation; nothing further may mutate it.
    #[error("actor lost during placement")]
    ActorLost,

    /// The bounded retry loop ran out of attempts.
    #[error("placement failed after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// Errors from the scene transition controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The host refused to even begin the area load.
    #[error("area load failed to start: {0}")]
    LoadFailed(String),
}

/// Errors from the currency ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Balance is known and below the requested amount.
    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: i64, required: i64 },

    /// The economy host exposes no compatible mutation path.
    #[error("currency mutation not supported by the economy host")]
    NotSupported,

    /// The economy host faulted; the mutation may or may not have applied.
    #[error("economy host error: {0}")]
    Host(String),
}

/// Errors from the visited-destination store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}
