//! Keyframe mutation: merge a partial parameter update into a track at the
//! playhead, or synthesize a new keyframe there.
//!
//! The merge/insert algorithm is identical for live (drag feedback) and
//! committed edits; undo bookkeeping is layered on top by the engine.

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{Keyframe, Track};
use crate::params::{Param, ParamSet};
use crate::resolve::values_at_time;

/// Sparse user-authored parameter update, e.g. `{x: 0.31, width: 0.5}`.
pub type PartialValues = HashMap<Param, f32>;

/// What a partial-update application did to the track.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    /// Values were merged into an existing keyframe near the playhead.
    Merged { keyframe_id: String },
    /// A new keyframe was synthesized and inserted.
    Inserted { keyframe_id: String },
    /// Nothing changed (empty update after sanitization).
    NoOp,
}

/// Per-call context supplied by the engine.
#[derive(Clone, Copy, Debug)]
pub struct MutationCtx {
    pub snap_window_ms: u32,
    pub created_at_ms: u64,
}

/// Drop non-finite entries from a partial update. Gesture streams can
/// transiently produce NaN/Infinity (e.g. division by a momentarily-zero
/// layout dimension); a single bad frame must not surface an error.
pub fn sanitize_partial(partial: &PartialValues) -> PartialValues {
    let mut clean = PartialValues::with_capacity(partial.len());
    for (&param, &value) in partial.iter() {
        if value.is_finite() {
            clean.insert(param, value);
        } else {
            debug!("dropping non-finite update for '{}'", param.name());
        }
    }
    clean
}

/// Apply a sanitized partial update to a track at the playhead.
///
/// An existing keyframe within `snap_window_ms` of the playhead absorbs the
/// update (first match in time-ascending order, i.e. the earlier of two
/// equidistant keyframes). Otherwise a new keyframe is synthesized from the
/// currently-effective values at the playhead so the edit causes no visible
/// jump, masked for the touched parameters plus `enabled`.
pub fn apply_partial(
    track: &mut Track,
    playhead_ms: f64,
    partial: &PartialValues,
    enabled: &ParamSet,
    ctx: &MutationCtx,
) -> Mutation {
    if partial.is_empty() {
        return Mutation::NoOp;
    }

    let window = ctx.snap_window_ms as f64;
    let near = track
        .keyframes
        .iter()
        .position(|kf| ((kf.time_ms as f64) - playhead_ms).abs() <= window);

    if let Some(idx) = near {
        let kf = &mut track.keyframes[idx];
        for (&param, &value) in partial.iter() {
            kf.touch(param, value);
        }
        return Mutation::Merged {
            keyframe_id: kf.id.clone(),
        };
    }

    // Synthesize: carry the effective values so untouched parameters keep
    // interpolating through the new keyframe unchanged.
    let effective = values_at_time(track, playhead_ms);
    let time_ms = playhead_ms.round().max(0.0).min(u32::MAX as f64) as u32;
    let mut kf = Keyframe::new(time_ms, ctx.created_at_ms);
    for param in Param::ALL {
        kf.values.insert(param, effective.get(param));
    }
    for param in enabled.iter() {
        kf.mask.insert(param, true);
    }
    for (&param, &value) in partial.iter() {
        kf.touch(param, value);
    }
    let keyframe_id = kf.id.clone();
    track.keyframes.push(kf);
    track.sort_keyframes();
    Mutation::Inserted { keyframe_id }
}
