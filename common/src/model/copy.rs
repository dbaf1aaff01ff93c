use serde::{Deserialize, Serialize};

/// Result of a copy call: a status flag and a human-readable message.
/// There is no structured error taxonomy; engine failures all arrive as
/// `status == false` with the wrapped message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CopyOutcome {
    pub status: bool,
    pub message: String,
}
