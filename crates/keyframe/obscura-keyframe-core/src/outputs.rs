//! Output contracts from the editor engine.
//!
//! Outputs carry the semantic change notifications produced by one
//! Engine::apply() batch. Observers (UI bindings, persistence triggers)
//! read them to decide what to refresh; rejected edits surface here as
//! events, never as errors.

use serde::{Deserialize, Serialize};

use crate::mutate::Mutation;
use crate::params::ParamSet;

/// Why an edit was ignored. Missing referents and locked tracks are
/// no-ops by design; hosts that want to warn the user check these.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    NoProjectSelected,
    NoTrackSelected,
    UnknownProject,
    UnknownTrack,
    UnknownKeyframe,
    TrackLocked,
    EmptyUpdate,
    LastKeyframe,
    NothingToUndo,
    NothingToRedo,
}

/// Discrete semantic signals emitted while applying commands.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EditorEvent {
    SelectionChanged {
        project: Option<String>,
        track: Option<String>,
    },
    TrackAdded {
        project: String,
        track: String,
    },
    TrackRemoved {
        project: String,
        track: String,
    },
    TrackChanged {
        project: String,
        track: String,
    },
    KeyframeMerged {
        track: String,
        keyframe: String,
    },
    KeyframeInserted {
        track: String,
        keyframe: String,
    },
    KeyframeRemoved {
        track: String,
        keyframe: String,
    },
    EnabledParamsChanged {
        params: ParamSet,
    },
    HistoryPushed {
        project: String,
    },
    UndoApplied {
        project: String,
    },
    RedoApplied {
        project: String,
    },
    EditRejected {
        reason: RejectReason,
    },
}

/// Outputs returned by Engine::apply().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<EditorEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The mutation outcome of the last ApplyPartial in the batch, if any.
    pub fn last_mutation(&self) -> Option<Mutation> {
        self.events.iter().rev().find_map(|e| match e {
            EditorEvent::KeyframeMerged { keyframe, .. } => Some(Mutation::Merged {
                keyframe_id: keyframe.clone(),
            }),
            EditorEvent::KeyframeInserted { keyframe, .. } => Some(Mutation::Inserted {
                keyframe_id: keyframe.clone(),
            }),
            _ => None,
        })
    }
}
