//! Input contracts for the editor engine.
//!
//! Hosts (wasm/native UI) build command batches and pass them into
//! Engine::apply(). Every edit is a named command; the engine answers with
//! change notifications in Outputs.

use serde::{Deserialize, Serialize};

use crate::data::{BlendMode, TrackKind};
use crate::mutate::PartialValues;
use crate::params::ParamSet;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct EditInputs {
    #[serde(default)]
    pub commands: Vec<EditCommand>,
}

/// Whether an edit is continuous drag feedback or a committed step.
///
/// Live edits skip undo bookkeeping; the merge/insert algorithm itself is
/// identical in both modes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyMode {
    Live,
    Commit,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EditCommand {
    SelectProject {
        project: String,
    },
    SelectTrack {
        track: Option<String>,
    },
    AddTrack {
        name: String,
        kind: TrackKind,
    },
    RemoveTrack {
        track: String,
    },
    SetTrackVisible {
        track: String,
        visible: bool,
    },
    SetTrackLocked {
        track: String,
        locked: bool,
    },
    SetTrackZIndex {
        track: String,
        z_index: i32,
    },
    SetBlendMode {
        track: String,
        blend_mode: BlendMode,
    },
    SetEnabledParams {
        params: ParamSet,
    },
    RemoveKeyframe {
        track: String,
        keyframe: String,
    },
    BeginInteraction,
    EndInteraction,
    ApplyPartial {
        playhead_ms: f64,
        values: PartialValues,
        mode: ApplyMode,
    },
    Undo,
    Redo,
}
