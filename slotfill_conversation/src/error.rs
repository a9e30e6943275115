use slotfill_core::SlotError;
use thiserror::Error;

use crate::script::NodeLabel;

/// Errors that can occur while running a dialogue turn.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("Unknown node label: {0}")]
    UnknownLabel(NodeLabel),

    #[error("Form storage has not been registered")]
    StorageMissing,

    #[error("Processing '{name}' failed: {source}")]
    Processing {
        name: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Invalid condition pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
