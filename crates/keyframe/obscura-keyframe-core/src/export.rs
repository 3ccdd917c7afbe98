//! Export/preview boundary contract.
//!
//! Actual decoding, blurring and encoding happen in a native module on the
//! host side. The core's only obligation is to hand it a serialized
//! RenderState plus export parameters; the bridge reports back through
//! [`ExportEvent`] values on whatever channel the host wires up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while handing a snapshot to the bridge.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no project selected")]
    NoProjectSelected,
    #[error("an export is already running")]
    AlreadyRunning,
    #[error("render state serialization: {0}")]
    Serialize(String),
    #[error("export bridge unavailable: {0}")]
    Unavailable(String),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Codec {
    #[default]
    H264,
    Hevc,
}

/// Parameters for one export run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f32,
    pub codec: Codec,
    pub include_audio: bool,
    pub hdr: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            frame_rate: 30.0,
            codec: Codec::default(),
            include_audio: true,
            hdr: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportStage {
    Preparing,
    Rendering,
    Encoding,
    Finalizing,
}

/// Progress/terminal signals emitted by the native module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExportEvent {
    Progress {
        stage: ExportStage,
        /// Fraction in [0,1] within the stage.
        progress: f32,
        message: Option<String>,
    },
    Completed {
        output_path: String,
    },
    Failed {
        code: String,
        message: String,
    },
}

/// The native export module seam consumed by the engine.
pub trait ExportBridge {
    fn start_export(
        &mut self,
        render_state_json: &str,
        settings: &ExportSettings,
    ) -> Result<(), ExportError>;
    fn cancel_export(&mut self);
}
