//! wasm-bindgen adapter for obscura-keyframe-core.
//!
//! The editor UI talks to the engine exclusively through serialized values:
//! stored-project JSON in, command batches in, RenderState snapshots and
//! digests out. Nothing on the JS side ever holds a reference into engine
//! state.

use js_sys::JSON;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use obscura_keyframe_core::{
    parse_stored_project_json, render_state_digest, to_stored_project_json, ApplyMode,
    CanvasTransform, Clock, Config, EditInputs, Engine, PartialValues, PreviewQuality,
};

/// Bump when the JS-visible surface changes incompatibly.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Clock backed by `Date.now()`; the default system clock is unavailable on
/// wasm32-unknown-unknown.
#[derive(Debug)]
struct JsClock;

impl Clock for JsClock {
    fn now_ms(&mut self) -> u64 {
        js_sys::Date::now().max(0.0) as u64
    }
}

#[wasm_bindgen]
pub struct ObscuraEditor {
    core: Engine,
}

#[wasm_bindgen]
impl ObscuraEditor {
    /// Create a new engine instance. Pass a JSON config object or
    /// undefined/null for defaults. Example:
    ///   new ObscuraEditor({ snap_window_ms: 120, undo_capacity: 80 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ObscuraEditor, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(ObscuraEditor {
            core: Engine::with_clock(cfg, Box::new(JsClock)),
        })
    }

    /// Load a stored project document (any JS object in the persisted
    /// format). Returns the project id.
    #[wasm_bindgen(js_name = load_project)]
    pub fn load_project(&mut self, data_json: JsValue) -> Result<String, JsError> {
        if jsvalue_is_undefined_or_null(&data_json) {
            return Err(JsError::new("load_project: data_json is null/undefined"));
        }
        // Stringify the JS object so we can reuse the core parser (expects &str)
        let s = JSON::stringify(&data_json)
            .map_err(|e| JsError::new(&format!("load_project stringify error: {e:?}")))?
            .as_string()
            .ok_or_else(|| JsError::new("load_project: stringify produced non-string"))?;
        let project = parse_stored_project_json(&s)
            .map_err(|e| JsError::new(&format!("load_project parse error: {e}")))?;
        Ok(self.core.load_project(project))
    }

    /// Create an empty project and select it. Returns the project id.
    #[wasm_bindgen(js_name = create_project)]
    pub fn create_project(&mut self, name: &str, duration_ms: u32) -> String {
        self.core.create_project(name, duration_ms)
    }

    /// Apply a batch of edit commands (EditInputs as a JS object). Returns
    /// the Outputs events for this batch.
    pub fn apply(&mut self, inputs: JsValue) -> Result<JsValue, JsError> {
        let inputs: EditInputs = swb::from_value(inputs)
            .map_err(|e| JsError::new(&format!("apply parse error: {e}")))?;
        let outputs = self.core.apply(inputs);
        swb::to_value(outputs).map_err(|e| JsError::new(&format!("apply serialize error: {e}")))
    }

    /// Apply a partial parameter update (e.g. `{x: 0.31}`) at the playhead
    /// to the selected track. `commit=false` is live drag feedback, `true`
    /// records an undo step. Returns the Mutation outcome.
    #[wasm_bindgen(js_name = apply_partial)]
    pub fn apply_partial(
        &mut self,
        playhead_ms: f64,
        values: JsValue,
        commit: bool,
    ) -> Result<JsValue, JsError> {
        let partial: PartialValues = swb::from_value(values)
            .map_err(|e| JsError::new(&format!("apply_partial parse error: {e}")))?;
        let mode = if commit {
            ApplyMode::Commit
        } else {
            ApplyMode::Live
        };
        let outcome = self.core.apply_partial_at_playhead(playhead_ms, &partial, mode);
        swb::to_value(&outcome)
            .map_err(|e| JsError::new(&format!("apply_partial serialize error: {e}")))
    }

    /// Build a RenderState snapshot of the selected project, or null if no
    /// project is selected.
    #[wasm_bindgen(js_name = render_state)]
    pub fn render_state(
        &self,
        playhead_ms: f64,
        quality: JsValue,
        zoom: f32,
        pan_x: f32,
        pan_y: f32,
    ) -> Result<JsValue, JsError> {
        let quality: PreviewQuality = if jsvalue_is_undefined_or_null(&quality) {
            PreviewQuality::default()
        } else {
            swb::from_value(quality)
                .map_err(|e| JsError::new(&format!("render_state quality error: {e}")))?
        };
        let canvas = CanvasTransform { zoom, pan_x, pan_y };
        match self.core.render_state(playhead_ms, quality, canvas) {
            Some(state) => swb::to_value(&state)
                .map_err(|e| JsError::new(&format!("render_state serialize error: {e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Content digest of the snapshot at `playhead_ms`, for consumers that
    /// diff frames before pushing them to the native renderer.
    #[wasm_bindgen(js_name = render_state_digest)]
    pub fn render_state_digest(&self, playhead_ms: f64) -> Option<String> {
        self.core
            .render_state(
                playhead_ms,
                PreviewQuality::default(),
                CanvasTransform::default(),
            )
            .map(|state| render_state_digest(&state))
    }

    #[wasm_bindgen(js_name = begin_interaction)]
    pub fn begin_interaction(&mut self) {
        self.core.begin_interaction();
    }

    #[wasm_bindgen(js_name = end_interaction)]
    pub fn end_interaction(&mut self) {
        self.core.end_interaction();
    }

    pub fn undo(&mut self) -> bool {
        self.core.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.core.redo()
    }

    /// Serialize the selected project into its stored document form for the
    /// host's key-value store, or null if no project is selected.
    #[wasm_bindgen(js_name = selected_project_json)]
    pub fn selected_project_json(&self) -> Result<Option<String>, JsError> {
        match self.core.selected_project() {
            Some(project) => to_stored_project_json(project)
                .map(Some)
                .map_err(|e| JsError::new(&format!("project serialize error: {e}"))),
            None => Ok(None),
        }
    }
}
