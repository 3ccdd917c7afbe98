//! Canonical editor data model (Project / Track / Keyframe).
//!
//! Serde names match the persisted camelCase document format; see
//! stored_project.rs for the tolerant parse path.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::Param;

/// Easing curve applied across the segment *from* the keyframe carrying it
/// *to* the next keyframe on the track.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    Linear,
    #[default]
    EaseInOut,
    Spring,
    Hold,
}

/// Region geometry family of a track.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackKind {
    #[default]
    Rectangle,
    RoundedRect,
    Ellipse,
    Path,
    Face,
    Plate,
}

/// Compositing mode of a region against the frame beneath it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

/// Freeform polygon vertex, normalized to the source frame. Only meaningful
/// for [`TrackKind::Path`] tracks.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
}

/// A point-in-time parameter snapshot on a track.
///
/// A keyframe *authors* a parameter only when the mask entry is `true` AND a
/// finite value is present; parameters it does not author are invisible to
/// the resolver, independently per parameter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub id: String,
    #[serde(rename = "timeMs")]
    pub time_ms: u32,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub values: HashMap<Param, f32>,
    #[serde(default)]
    #[serde(rename = "parameterMask")]
    pub mask: HashMap<Param, bool>,
    /// Creation timestamp (unix ms), informational only.
    #[serde(default)]
    #[serde(rename = "createdAt")]
    pub created_at_ms: u64,
}

impl Keyframe {
    /// Empty keyframe at a position; authors nothing until touched.
    pub fn new(time_ms: u32, created_at_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time_ms,
            interpolation: Interpolation::default(),
            values: HashMap::new(),
            mask: HashMap::new(),
            created_at_ms,
        }
    }

    /// Seed keyframe authoring all nine parameters at their defaults, so a
    /// freshly created track never resolves from "no data".
    pub fn seed(time_ms: u32, created_at_ms: u64) -> Self {
        let mut kf = Self::new(time_ms, created_at_ms);
        for p in Param::ALL {
            kf.touch(p, p.default_value());
        }
        kf
    }

    /// The authored value for `param`, if this keyframe owns it.
    #[inline]
    pub fn authors(&self, param: Param) -> Option<f32> {
        if !self.mask.get(&param).copied().unwrap_or(false) {
            return None;
        }
        self.values.get(&param).copied().filter(|v| v.is_finite())
    }

    /// Set a value and mark the parameter owned by this keyframe.
    #[inline]
    pub fn touch(&mut self, param: Param, value: f32) {
        self.values.insert(param, value);
        self.mask.insert(param, true);
    }
}

/// An editable blur region with a time-varying parameter set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub visible: bool,
    pub locked: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Stacking order, lower first.
    pub z_index: i32,
    #[serde(default)]
    pub path_points: Vec<PathPoint>,
    /// Kept sorted ascending by `time_ms` after any mutation.
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    /// New track seeded with one all-parameter keyframe at t=0.
    pub fn new(name: &str, kind: TrackKind, z_index: i32, created_at_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind,
            visible: true,
            locked: false,
            blend_mode: BlendMode::default(),
            z_index,
            path_points: Vec::new(),
            keyframes: vec![Keyframe::seed(0, created_at_ms)],
        }
    }

    /// Restore the ascending-time invariant (stable; coincident times keep
    /// insertion order).
    pub fn sort_keyframes(&mut self) {
        self.keyframes.sort_by_key(|kf| kf.time_ms);
    }
}

/// An editable project: one source clip plus its blur regions.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Source clip location, opaque to the core.
    #[serde(default)]
    pub source_path: Option<String>,
    pub duration_ms: u32,
    pub tracks: Vec<Track>,
}

impl Project {
    pub fn new(name: &str, duration_ms: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            source_path: None,
            duration_ms,
            tracks: Vec::new(),
        }
    }

    /// Validate basic invariants (non-zero duration, sorted keyframes,
    /// finite authored values, at least one keyframe per track).
    pub fn validate_basic(&self) -> Result<(), String> {
        if self.duration_ms == 0 {
            return Err("Project.durationMs must be > 0".into());
        }
        for track in &self.tracks {
            if track.keyframes.is_empty() {
                return Err(format!("track '{}' has no keyframes", track.id));
            }
            let mut last = 0u32;
            for kf in &track.keyframes {
                if kf.time_ms < last {
                    return Err(format!(
                        "keyframe times must be non-decreasing for track '{}'",
                        track.id
                    ));
                }
                last = kf.time_ms;
                for (param, value) in kf.values.iter() {
                    if !value.is_finite() {
                        return Err(format!(
                            "non-finite value for '{}' on keyframe '{}'",
                            param.name(),
                            kf.id
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
