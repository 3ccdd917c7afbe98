//! Render-state snapshots: the one artifact handed to preview/export hosts.
//!
//! A `RenderState` is a value type with no references back into track
//! storage; it crosses the UI/native boundary by serialization. It is
//! re-derived on every playhead or track change and discarded once
//! consumed. Building it twice from the same inputs yields equal output
//! (and equal digests), which is what lets consumers diff digests to skip
//! redundant downstream work.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::data::{BlendMode, PathPoint, Project, TrackKind};
use crate::params::{KeyframeValues, Param};
use crate::resolve::values_at_time;

/// Preview resolution tier requested by the host renderer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewQuality {
    Low,
    #[default]
    Medium,
    Full,
}

/// Preview canvas zoom/pan, copied verbatim into the snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasTransform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// A fully-resolved, time-sliced projection of one track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStateTrack {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub visible: bool,
    pub locked: bool,
    pub blend_mode: BlendMode,
    pub z_index: i32,
    pub values: KeyframeValues,
    pub path_points: Vec<PathPoint>,
}

/// Project-wide snapshot at one playhead, tracks ascending by z-index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub project_id: String,
    pub playhead_ms: f64,
    pub quality: PreviewQuality,
    pub canvas: CanvasTransform,
    pub tracks: Vec<RenderStateTrack>,
}

/// Project a whole project into a render state for one playhead.
///
/// Tracks are stable-sorted by `z_index` (ties preserve authored order) and
/// resolved independently; path points are copied by value.
pub fn build_render_state(
    project: &Project,
    playhead_ms: f64,
    quality: PreviewQuality,
    canvas: CanvasTransform,
) -> RenderState {
    let mut ordered: Vec<&crate::data::Track> = project.tracks.iter().collect();
    ordered.sort_by_key(|t| t.z_index);

    let tracks = ordered
        .into_iter()
        .map(|t| RenderStateTrack {
            id: t.id.clone(),
            name: t.name.clone(),
            kind: t.kind,
            visible: t.visible,
            locked: t.locked,
            blend_mode: t.blend_mode,
            z_index: t.z_index,
            values: values_at_time(t, playhead_ms),
            path_points: t.path_points.clone(),
        })
        .collect();

    RenderState {
        project_id: project.id.clone(),
        playhead_ms,
        quality,
        canvas,
        tracks,
    }
}

/// Stable content digest over (project id, rounded playhead, per-track
/// id/visible/locked/values) for cheap change detection.
///
/// The playhead is rounded to the nearest integer millisecond so floating
/// sub-ms jitter does not churn the digest.
pub fn render_state_digest(state: &RenderState) -> String {
    let mut out = String::with_capacity(64 + state.tracks.len() * 96);
    let _ = write!(out, "{}|{}", state.project_id, state.playhead_ms.round() as i64);
    for track in &state.tracks {
        let _ = write!(
            out,
            "|{}:{}:{}",
            track.id, track.visible as u8, track.locked as u8
        );
        for param in Param::ALL {
            let _ = write!(out, ":{:.6}", track.values.get(param));
        }
    }
    out
}
