use thiserror::Error;

/// Errors from the selection store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("selection store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("selection store holds malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("selection store lock poisoned")]
    Poisoned,
}

/// Errors rejected locally by the workflow.
///
/// None of these move the state machine; the caller can keep going.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("unknown shipping option id: {0}")]
    InvalidOptionId(String),

    #[error("no locker map is open")]
    MapNotOpen,

    #[error("locker {0} is not on the open map")]
    UnknownMarker(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
