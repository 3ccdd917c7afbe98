//! Tolerant parsing of persisted project documents.
//!
//! Projects are stored as JSON blobs in an opaque key-value store owned by
//! the host. Documents written by newer or older app versions must load:
//! unknown parameter names are ignored, unknown enum strings fall back to
//! defaults, non-finite numbers are dropped, keyframes are re-sorted and a
//! seed keyframe is ensured so every track resolves.

use hashbrown::HashMap;
use log::debug;
use serde::Deserialize;

use crate::data::{BlendMode, Interpolation, Keyframe, PathPoint, Project, Track, TrackKind};
use crate::params::Param;

/// Opaque synchronous key-value store seam. Reads are synchronous, writes
/// fire-and-forget; the core never interprets keys beyond [`storage_key`].
pub trait ProjectStore {
    fn load(&mut self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, json: &str);
}

/// Key under which a project document is stored.
pub fn storage_key(project_id: &str) -> String {
    format!("project:{project_id}")
}

/// Parse a persisted project document into the canonical model.
pub fn parse_stored_project_json(s: &str) -> Result<Project, String> {
    let sp: SpProject = serde_json::from_str(s).map_err(|e| format!("parse error: {e}"))?;

    let mut tracks: Vec<Track> = Vec::with_capacity(sp.tracks.len());
    for st in sp.tracks {
        let mut keyframes: Vec<Keyframe> = Vec::with_capacity(st.keyframes.len());
        for sk in st.keyframes {
            let mut values = HashMap::new();
            for (name, value) in sk.values {
                match Param::from_name(&name) {
                    Some(param) if value.is_finite() => {
                        values.insert(param, value as f32);
                    }
                    Some(param) => {
                        debug!("dropping non-finite stored value for '{}'", param.name());
                    }
                    None => debug!("ignoring unknown stored parameter '{name}'"),
                }
            }
            let mut mask = HashMap::new();
            for (name, on) in sk.mask {
                match Param::from_name(&name) {
                    Some(param) => {
                        mask.insert(param, on);
                    }
                    None => debug!("ignoring unknown masked parameter '{name}'"),
                }
            }
            keyframes.push(Keyframe {
                id: sk.id,
                time_ms: sk.time_ms.max(0.0).min(u32::MAX as f64) as u32,
                interpolation: parse_interpolation(sk.interpolation.as_deref()),
                values,
                mask,
                created_at_ms: sk.created_at.max(0.0) as u64,
            });
        }

        let mut track = Track {
            id: st.id,
            name: st.name,
            kind: parse_kind(st.kind.as_deref()),
            visible: st.visible,
            locked: st.locked,
            blend_mode: parse_blend_mode(st.blend_mode.as_deref()),
            z_index: st.z_index,
            path_points: st
                .path_points
                .into_iter()
                .filter(|p| p.x.is_finite() && p.y.is_finite())
                .map(|p| PathPoint {
                    x: p.x as f32,
                    y: p.y as f32,
                })
                .collect(),
            keyframes,
        };
        if track.keyframes.is_empty() {
            debug!("track '{}' stored without keyframes, reseeding", track.id);
            track.keyframes.push(Keyframe::seed(0, 0));
        }
        track.sort_keyframes();
        tracks.push(track);
    }

    let project = Project {
        id: sp.id,
        name: sp.name,
        source_path: sp.source_path,
        duration_ms: sp.duration_ms,
        tracks,
    };
    project.validate_basic()?;
    Ok(project)
}

/// Serialize a project into its persisted document form.
pub fn to_stored_project_json(project: &Project) -> Result<String, String> {
    serde_json::to_string(project).map_err(|e| format!("serialize project: {e}"))
}

fn parse_interpolation(s: Option<&str>) -> Interpolation {
    match s {
        Some("linear") => Interpolation::Linear,
        Some("easeInOut") => Interpolation::EaseInOut,
        Some("spring") => Interpolation::Spring,
        Some("hold") => Interpolation::Hold,
        Some(other) => {
            debug!("unknown interpolation '{other}', using default");
            Interpolation::default()
        }
        None => Interpolation::default(),
    }
}

fn parse_kind(s: Option<&str>) -> TrackKind {
    match s {
        Some("rectangle") => TrackKind::Rectangle,
        Some("roundedRect") => TrackKind::RoundedRect,
        Some("ellipse") => TrackKind::Ellipse,
        Some("path") => TrackKind::Path,
        Some("face") => TrackKind::Face,
        Some("plate") => TrackKind::Plate,
        Some(other) => {
            debug!("unknown track type '{other}', using default");
            TrackKind::default()
        }
        None => TrackKind::default(),
    }
}

fn parse_blend_mode(s: Option<&str>) -> BlendMode {
    match s {
        Some("normal") => BlendMode::Normal,
        Some("multiply") => BlendMode::Multiply,
        Some("screen") => BlendMode::Screen,
        Some("overlay") => BlendMode::Overlay,
        Some(other) => {
            debug!("unknown blend mode '{other}', using default");
            BlendMode::default()
        }
        None => BlendMode::default(),
    }
}

// ----- JSON schema (serde) -----

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SpProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    #[serde(rename = "sourcePath")]
    pub source_path: Option<String>,
    #[serde(rename = "durationMs", alias = "duration")]
    pub duration_ms: u32,
    pub tracks: Vec<SpTrack>,
}

#[derive(Debug, Deserialize)]
struct SpTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    #[serde(rename = "blendMode")]
    pub blend_mode: Option<String>,
    #[serde(default)]
    #[serde(rename = "zIndex")]
    pub z_index: i32,
    #[serde(default)]
    #[serde(rename = "pathPoints")]
    pub path_points: Vec<SpPoint>,
    #[serde(default)]
    pub keyframes: Vec<SpKeyframe>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
struct SpPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
struct SpKeyframe {
    pub id: String,
    #[serde(rename = "timeMs")]
    pub time_ms: f64,
    #[serde(default)]
    pub interpolation: Option<String>,
    #[serde(default)]
    pub values: HashMap<String, f64>,
    #[serde(default)]
    #[serde(rename = "parameterMask")]
    pub mask: HashMap<String, bool>,
    #[serde(default)]
    #[serde(rename = "createdAt")]
    pub created_at: f64,
}
