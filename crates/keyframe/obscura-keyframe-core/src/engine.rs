//! Engine: data ownership and the public editing API.
//!
//! One engine owns the loaded projects, the selection, the enabled-parameter
//! toggle set, per-project undo histories and the interaction-depth counter.
//! Edits arrive as named commands (inputs.rs) and observers read change
//! notifications from Outputs; there is no ambient global state.
//!
//! Everything here is single-threaded and synchronous: operations run to
//! completion on the calling thread. The interaction-depth counter supports
//! nested begin/end pairs on one logical thread of control; it is not a
//! mutex and must not be treated as one.

use hashbrown::HashMap;
use log::warn;

use crate::config::Config;
use crate::data::{Project, Track, TrackKind};
use crate::export::{ExportBridge, ExportError, ExportSettings};
use crate::history::{History, Snapshot};
use crate::inputs::{ApplyMode, EditCommand, EditInputs};
use crate::mutate::{self, Mutation, MutationCtx, PartialValues};
use crate::outputs::{EditorEvent, Outputs, RejectReason};
use crate::params::ParamSet;
use crate::render_state::{
    build_render_state, CanvasTransform, PreviewQuality, RenderState,
};
use crate::stored_project::{parse_stored_project_json, storage_key, ProjectStore};

/// Wall-clock seam used to stamp `createdAt` on synthesized keyframes.
/// Hosts without a system clock (wasm) install their own implementation.
pub trait Clock: std::fmt::Debug {
    fn now_ms(&mut self) -> u64;
}

/// Default clock backed by the OS.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&mut self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// The currently-targeted project/track for edits.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Selection {
    pub project: Option<String>,
    pub track: Option<String>,
}

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    projects: HashMap<String, Project>,
    selection: Selection,
    enabled_params: ParamSet,
    histories: HashMap<String, History>,

    // Interaction state machine: Idle <-> InteractionActive. The before
    // snapshot is captured on the 0 -> 1 transition and compared on the
    // 1 -> 0 transition, so nested gestures collapse to one undo entry.
    interaction_depth: u32,
    pending_before: Option<(String, Snapshot)>,

    clock: Box<dyn Clock>,
    outputs: Outputs,
}

impl Engine {
    /// Create a new engine with the given config and the system clock.
    pub fn new(cfg: Config) -> Self {
        Self::with_clock(cfg, Box::new(SystemClock))
    }

    pub fn with_clock(cfg: Config, clock: Box<dyn Clock>) -> Self {
        Self {
            cfg,
            projects: HashMap::new(),
            selection: Selection::default(),
            enabled_params: ParamSet::EMPTY,
            histories: HashMap::new(),
            interaction_depth: 0,
            pending_before: None,
            clock,
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn enabled_params(&self) -> ParamSet {
        self.enabled_params
    }

    /// Load a project into the engine; the first loaded project becomes the
    /// selected one. Returns the project id.
    pub fn load_project(&mut self, project: Project) -> String {
        let id = project.id.clone();
        if let Err(msg) = project.validate_basic() {
            warn!("loading project '{id}' with invalid data: {msg}");
        }
        self.projects.insert(id.clone(), project);
        if self.selection.project.is_none() {
            self.selection.project = Some(id.clone());
        }
        id
    }

    /// Create and load an empty project, selecting it.
    pub fn create_project(&mut self, name: &str, duration_ms: u32) -> String {
        let project = Project::new(name, duration_ms);
        let id = project.id.clone();
        self.projects.insert(id.clone(), project);
        self.selection.project = Some(id.clone());
        self.selection.track = None;
        id
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selection
            .project
            .as_deref()
            .and_then(|id| self.projects.get(id))
    }

    /// Events produced since the last Engine::apply() batch started.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Undo/redo availability for a project (None before its first edit).
    pub fn history(&self, project_id: &str) -> Option<&History> {
        self.histories.get(project_id)
    }

    /// Apply a command batch, producing change notifications.
    pub fn apply(&mut self, inputs: EditInputs) -> &Outputs {
        self.outputs.clear();
        for cmd in inputs.commands {
            self.dispatch(cmd);
        }
        &self.outputs
    }

    fn dispatch(&mut self, cmd: EditCommand) {
        match cmd {
            EditCommand::SelectProject { project } => {
                if self.projects.contains_key(&project) {
                    self.selection.project = Some(project);
                    self.selection.track = None;
                    self.push_selection_event();
                } else {
                    self.reject(RejectReason::UnknownProject);
                }
            }
            EditCommand::SelectTrack { track } => match track {
                None => {
                    self.selection.track = None;
                    self.push_selection_event();
                }
                Some(id) => {
                    let exists = self
                        .selected_project()
                        .map(|p| p.tracks.iter().any(|t| t.id == id))
                        .unwrap_or(false);
                    if exists {
                        self.selection.track = Some(id);
                        self.push_selection_event();
                    } else {
                        self.reject(RejectReason::UnknownTrack);
                    }
                }
            },
            EditCommand::AddTrack { name, kind } => {
                self.add_track(&name, kind);
            }
            EditCommand::RemoveTrack { track } => {
                self.remove_track(&track);
            }
            EditCommand::SetTrackVisible { track, visible } => {
                self.update_track(&track, |t| t.visible = visible);
            }
            EditCommand::SetTrackLocked { track, locked } => {
                self.update_track(&track, |t| t.locked = locked);
            }
            EditCommand::SetTrackZIndex { track, z_index } => {
                self.update_track(&track, |t| t.z_index = z_index);
            }
            EditCommand::SetBlendMode { track, blend_mode } => {
                self.update_track(&track, |t| t.blend_mode = blend_mode);
            }
            EditCommand::SetEnabledParams { params } => {
                self.enabled_params = params;
                self.outputs
                    .push_event(EditorEvent::EnabledParamsChanged { params });
            }
            EditCommand::RemoveKeyframe { track, keyframe } => {
                self.remove_keyframe(&track, &keyframe);
            }
            EditCommand::BeginInteraction => self.begin_interaction(),
            EditCommand::EndInteraction => self.end_interaction(),
            EditCommand::ApplyPartial {
                playhead_ms,
                values,
                mode,
            } => {
                self.apply_partial_at_playhead(playhead_ms, &values, mode);
            }
            EditCommand::Undo => {
                self.undo();
            }
            EditCommand::Redo => {
                self.redo();
            }
        }
    }

    /// Apply a user-driven partial parameter update at the playhead to the
    /// selected, unlocked track. Missing referents, locked tracks and
    /// empty-after-sanitization updates are no-ops, reported as
    /// EditRejected events rather than errors.
    pub fn apply_partial_at_playhead(
        &mut self,
        playhead_ms: f64,
        values: &PartialValues,
        mode: ApplyMode,
    ) -> Mutation {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => return self.reject(RejectReason::NoProjectSelected),
        };
        let track_id = match self.selection.track.clone() {
            Some(id) => id,
            None => return self.reject(RejectReason::NoTrackSelected),
        };
        let sanitized = mutate::sanitize_partial(values);
        if sanitized.is_empty() {
            return self.reject(RejectReason::EmptyUpdate);
        }

        let ctx = MutationCtx {
            snap_window_ms: self.cfg.snap_window_ms,
            created_at_ms: self.clock.now_ms(),
        };
        let enabled = self.enabled_params;

        let project = match self.projects.get_mut(&project_id) {
            Some(p) => p,
            None => return self.reject(RejectReason::UnknownProject),
        };
        let before = if mode == ApplyMode::Commit {
            Some(project.tracks.clone())
        } else {
            None
        };
        let track = match project.tracks.iter_mut().find(|t| t.id == track_id) {
            Some(t) => t,
            None => return self.reject(RejectReason::UnknownTrack),
        };
        if track.locked {
            return self.reject(RejectReason::TrackLocked);
        }

        let outcome = mutate::apply_partial(track, playhead_ms, &sanitized, &enabled, &ctx);
        match &outcome {
            Mutation::Merged { keyframe_id } => {
                self.outputs.push_event(EditorEvent::KeyframeMerged {
                    track: track_id.clone(),
                    keyframe: keyframe_id.clone(),
                });
            }
            Mutation::Inserted { keyframe_id } => {
                self.outputs.push_event(EditorEvent::KeyframeInserted {
                    track: track_id.clone(),
                    keyframe: keyframe_id.clone(),
                });
            }
            Mutation::NoOp => {}
        }
        if let Some(before) = before {
            self.commit_history(&project_id, before);
        }
        outcome
    }

    /// Add a seeded track to the selected project and select it.
    pub fn add_track(&mut self, name: &str, kind: TrackKind) -> Option<String> {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return None;
            }
        };
        let now = self.clock.now_ms();
        if let Some(project) = self.projects.get_mut(&project_id) {
            let before = project.tracks.clone();
            let z_index = project
                .tracks
                .iter()
                .map(|t| t.z_index)
                .max()
                .map(|z| z + 1)
                .unwrap_or(0);
            let track = Track::new(name, kind, z_index, now);
            let id = track.id.clone();
            project.tracks.push(track);
            self.selection.track = Some(id.clone());
            self.outputs.push_event(EditorEvent::TrackAdded {
                project: project_id.clone(),
                track: id.clone(),
            });
            self.commit_history(&project_id, before);
            Some(id)
        } else {
            self.reject(RejectReason::UnknownProject);
            None
        }
    }

    /// Remove a track from the selected project. Locked tracks stay.
    pub fn remove_track(&mut self, track_id: &str) -> bool {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return false;
            }
        };
        if let Some(project) = self.projects.get_mut(&project_id) {
            match project.tracks.iter().position(|t| t.id == track_id) {
                Some(idx) if project.tracks[idx].locked => {
                    self.reject(RejectReason::TrackLocked);
                    return false;
                }
                Some(idx) => {
                    let before = project.tracks.clone();
                    project.tracks.remove(idx);
                    if self.selection.track.as_deref() == Some(track_id) {
                        self.selection.track = None;
                    }
                    self.outputs.push_event(EditorEvent::TrackRemoved {
                        project: project_id.clone(),
                        track: track_id.to_string(),
                    });
                    self.commit_history(&project_id, before);
                    true
                }
                None => {
                    self.reject(RejectReason::UnknownTrack);
                    false
                }
            }
        } else {
            self.reject(RejectReason::UnknownProject);
            false
        }
    }

    /// Remove a keyframe by id; a track always keeps at least one keyframe.
    pub fn remove_keyframe(&mut self, track_id: &str, keyframe_id: &str) -> bool {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return false;
            }
        };
        let project = match self.projects.get_mut(&project_id) {
            Some(p) => p,
            None => {
                self.reject(RejectReason::UnknownProject);
                return false;
            }
        };
        let before = project.tracks.clone();
        let track = match project.tracks.iter_mut().find(|t| t.id == track_id) {
            Some(t) => t,
            None => {
                self.reject(RejectReason::UnknownTrack);
                return false;
            }
        };
        if track.locked {
            self.reject(RejectReason::TrackLocked);
            return false;
        }
        if track.keyframes.len() <= 1 {
            self.reject(RejectReason::LastKeyframe);
            return false;
        }
        match track.keyframes.iter().position(|kf| kf.id == keyframe_id) {
            Some(idx) => {
                track.keyframes.remove(idx);
                self.outputs.push_event(EditorEvent::KeyframeRemoved {
                    track: track_id.to_string(),
                    keyframe: keyframe_id.to_string(),
                });
                self.commit_history(&project_id, before);
                true
            }
            None => {
                self.reject(RejectReason::UnknownKeyframe);
                false
            }
        }
    }

    /// Enter an interaction (drag/gesture). Nested begins are counted; the
    /// before snapshot is captured only on the outermost one.
    pub fn begin_interaction(&mut self) {
        if self.interaction_depth == 0 {
            self.pending_before = self
                .selection
                .project
                .clone()
                .and_then(|id| self.projects.get(&id).map(|p| (id, p.tracks.clone())));
        }
        self.interaction_depth += 1;
    }

    /// Leave an interaction; on the outermost end, push one undo entry iff
    /// the tracks actually changed since the matching begin.
    pub fn end_interaction(&mut self) {
        if self.interaction_depth == 0 {
            warn!("end_interaction without matching begin");
            return;
        }
        self.interaction_depth -= 1;
        if self.interaction_depth > 0 {
            return;
        }
        if let Some((project_id, before)) = self.pending_before.take() {
            let changed = self
                .projects
                .get(&project_id)
                .map(|p| p.tracks != before)
                .unwrap_or(false);
            if changed {
                let cap = self.cfg.undo_capacity;
                self.histories
                    .entry(project_id.clone())
                    .or_insert_with(|| History::new(cap))
                    .push(before);
                self.outputs
                    .push_event(EditorEvent::HistoryPushed { project: project_id });
            }
        }
    }

    pub fn interaction_depth(&self) -> u32 {
        self.interaction_depth
    }

    /// Restore the previous track state of the selected project.
    pub fn undo(&mut self) -> bool {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return false;
            }
        };
        let cap = self.cfg.undo_capacity;
        let mut applied = false;
        if let Some(project) = self.projects.get_mut(&project_id) {
            let history = self
                .histories
                .entry(project_id.clone())
                .or_insert_with(|| History::new(cap));
            if let Some(snapshot) = history.undo(project.tracks.clone()) {
                project.tracks = snapshot;
                applied = true;
            }
        }
        if applied {
            self.outputs
                .push_event(EditorEvent::UndoApplied { project: project_id });
            true
        } else {
            self.reject(RejectReason::NothingToUndo);
            false
        }
    }

    /// Re-apply the last undone track state of the selected project.
    pub fn redo(&mut self) -> bool {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return false;
            }
        };
        let cap = self.cfg.undo_capacity;
        let mut applied = false;
        if let Some(project) = self.projects.get_mut(&project_id) {
            let history = self
                .histories
                .entry(project_id.clone())
                .or_insert_with(|| History::new(cap));
            if let Some(snapshot) = history.redo(project.tracks.clone()) {
                project.tracks = snapshot;
                applied = true;
            }
        }
        if applied {
            self.outputs
                .push_event(EditorEvent::RedoApplied { project: project_id });
            true
        } else {
            self.reject(RejectReason::NothingToRedo);
            false
        }
    }

    /// Build a render-state snapshot of the selected project.
    pub fn render_state(
        &self,
        playhead_ms: f64,
        quality: PreviewQuality,
        canvas: CanvasTransform,
    ) -> Option<RenderState> {
        self.selected_project()
            .map(|p| build_render_state(p, playhead_ms, quality, canvas))
    }

    /// Serialize a project into the caller-provided store.
    pub fn persist_project(
        &self,
        project_id: &str,
        store: &mut dyn ProjectStore,
    ) -> Result<(), String> {
        let project = self
            .projects
            .get(project_id)
            .ok_or_else(|| format!("unknown project '{project_id}'"))?;
        let json =
            serde_json::to_string(project).map_err(|e| format!("serialize project: {e}"))?;
        store.save(&storage_key(project_id), &json);
        Ok(())
    }

    /// Load a project from the caller-provided store, returning its id.
    pub fn restore_project(
        &mut self,
        project_id: &str,
        store: &mut dyn ProjectStore,
    ) -> Result<String, String> {
        let json = store
            .load(&storage_key(project_id))
            .ok_or_else(|| format!("no stored project under '{project_id}'"))?;
        let project = parse_stored_project_json(&json)?;
        Ok(self.load_project(project))
    }

    /// Snapshot the selected project at full quality and hand it to the
    /// export bridge. The bridge reports progress/completion on its own.
    pub fn start_export(
        &self,
        playhead_ms: f64,
        settings: &ExportSettings,
        bridge: &mut dyn ExportBridge,
    ) -> Result<(), ExportError> {
        let project = self
            .selected_project()
            .ok_or(ExportError::NoProjectSelected)?;
        let state = build_render_state(
            project,
            playhead_ms,
            PreviewQuality::Full,
            CanvasTransform::default(),
        );
        let json =
            serde_json::to_string(&state).map_err(|e| ExportError::Serialize(e.to_string()))?;
        bridge.start_export(&json, settings)
    }

    /// Push one undo entry for a committed edit, unless an interaction is
    /// active (the interaction's closing end collapses it) or nothing
    /// actually changed.
    fn commit_history(&mut self, project_id: &str, before: Snapshot) {
        if self.interaction_depth > 0 {
            return;
        }
        let changed = self
            .projects
            .get(project_id)
            .map(|p| p.tracks != before)
            .unwrap_or(false);
        if !changed {
            return;
        }
        let cap = self.cfg.undo_capacity;
        self.histories
            .entry(project_id.to_string())
            .or_insert_with(|| History::new(cap))
            .push(before);
        self.outputs.push_event(EditorEvent::HistoryPushed {
            project: project_id.to_string(),
        });
    }

    fn update_track<F: FnOnce(&mut Track)>(&mut self, track_id: &str, f: F) {
        let project_id = match self.selection.project.clone() {
            Some(id) => id,
            None => {
                self.reject(RejectReason::NoProjectSelected);
                return;
            }
        };
        let project = match self.projects.get_mut(&project_id) {
            Some(p) => p,
            None => {
                self.reject(RejectReason::UnknownProject);
                return;
            }
        };
        let before = project.tracks.clone();
        match project.tracks.iter_mut().find(|t| t.id == track_id) {
            Some(track) => {
                f(track);
                self.outputs.push_event(EditorEvent::TrackChanged {
                    project: project_id.clone(),
                    track: track_id.to_string(),
                });
                self.commit_history(&project_id, before);
            }
            None => {
                self.reject(RejectReason::UnknownTrack);
            }
        }
    }

    fn push_selection_event(&mut self) {
        self.outputs.push_event(EditorEvent::SelectionChanged {
            project: self.selection.project.clone(),
            track: self.selection.track.clone(),
        });
    }

    fn reject(&mut self, reason: RejectReason) -> Mutation {
        warn!("edit rejected: {reason:?}");
        self.outputs.push_event(EditorEvent::EditRejected { reason });
        Mutation::NoOp
    }
}
