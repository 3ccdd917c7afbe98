//! Obscura Keyframe Core (host-agnostic)
//!
//! Keyframe interpolation and render-state engine for a region-blurring
//! video editor. This crate owns the data model, the per-parameter keyframe
//! resolver, the render-state builder and the mutation/undo engine; video
//! decoding, blurring, encoding, persistence and UI all live on the host
//! side of thin serialization seams.

pub mod config;
pub mod data;
pub mod ease;
pub mod engine;
pub mod export;
pub mod history;
pub mod inputs;
pub mod mutate;
pub mod outputs;
pub mod params;
pub mod render_state;
pub mod resolve;
pub mod stored_project;

// Re-exports for consumers (adapters)
pub use config::Config;
pub use data::{BlendMode, Interpolation, Keyframe, PathPoint, Project, Track, TrackKind};
pub use engine::{Clock, Engine, Selection, SystemClock};
pub use export::{Codec, ExportBridge, ExportError, ExportEvent, ExportSettings, ExportStage};
pub use history::History;
pub use inputs::{ApplyMode, EditCommand, EditInputs};
pub use mutate::{Mutation, PartialValues};
pub use outputs::{EditorEvent, Outputs, RejectReason};
pub use params::{KeyframeValues, Param, ParamSet};
pub use render_state::{
    build_render_state, render_state_digest, CanvasTransform, PreviewQuality, RenderState,
    RenderStateTrack,
};
pub use resolve::{resolve_parameter, values_at_time};
pub use stored_project::{parse_stored_project_json, to_stored_project_json, ProjectStore};
