//! Core configuration for obscura-keyframe-core.

use serde::{Deserialize, Serialize};

/// Engine tuning knobs. Keep this minimal; expand without breaking API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Snap distance in milliseconds: an edit lands on an existing keyframe
    /// when the playhead is within this window of it. The same constant is
    /// used by hosts for playhead-to-keyframe snapping.
    pub snap_window_ms: u32,

    /// Maximum undo entries retained per project; the oldest entry is
    /// silently dropped when the stack is full.
    pub undo_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_window_ms: 120,
            undo_capacity: 80,
        }
    }
}
