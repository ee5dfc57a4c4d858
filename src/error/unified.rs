//! Error classification.

use serde::{Deserialize, Serialize};

/// Broad error category for routing caller logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Bad argument, e.g. an unknown provider.
    InvalidArgument,
    /// Operation not valid in the current state, e.g. a login already running.
    InvalidState,
    Canceled,
    Authentication,
    Network,
    Server,
    Api,
    Serialization,
    Configuration,
    Unknown,
}
