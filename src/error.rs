//! Error types for the engine facade.

use thiserror::Error;

use crate::sim::BubbleId;

/// Errors surfaced to the host. The tick loop itself never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The handle does not belong to any current bubble.
    #[error("unknown bubble {0}")]
    UnknownBubble(BubbleId),

    /// Settings JSON could not be parsed.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}
