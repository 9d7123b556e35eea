use funnel_editor::{
    project, Command, EditorConfig, EditorState, ElementKind, Mutation,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {error}"))
}

fn to_json(value: &impl Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

/// Editing session handle for the page builder UI
#[wasm_bindgen]
pub struct FunnelEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl FunnelEditor {
    /// Create a session; `config` is optional editor config JSON
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<FunnelEditor, JsValue> {
        let config = match config {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| js_error("Config error", e))?,
            None => EditorConfig::default(),
        };

        Ok(Self {
            state: EditorState::with_config(config),
        })
    }

    /// Load persisted page content
    pub fn load(&mut self, content: String, with_live: bool) -> Result<(), JsValue> {
        self.apply(Command::LoadDocument { content, with_live })
    }

    /// Dispatch a command given as `{"type": ..., "payload": ...}` JSON
    pub fn dispatch(&mut self, command: &str) -> Result<(), JsValue> {
        let command: Command =
            serde_json::from_str(command).map_err(|e| js_error("Invalid command", e))?;
        self.apply(command)
    }

    /// Flip the hidden flag of an element from the layers panel
    #[wasm_bindgen(js_name = toggleHidden)]
    pub fn toggle_hidden(&mut self, element_id: &str) -> Result<(), JsValue> {
        let element = self
            .state
            .body()
            .find(element_id)
            .ok_or_else(|| js_error("Unknown element", element_id))?;
        let command = Command::from(Mutation::toggle_hidden(element));
        self.apply(command)
    }

    /// Page content JSON for persistence
    pub fn save(&self) -> Result<String, JsValue> {
        self.state.save().map_err(|e| js_error("Save error", e))
    }

    /// Render input for the canvas and layers panel, as JSON
    pub fn projection(&self) -> Result<String, JsValue> {
        to_json(&project(&self.state))
    }

    /// Fresh palette element JSON for `kind` (e.g. `"text"`, `"2Col"`).
    /// Fails for the body and once the page has run out of element ids.
    #[wasm_bindgen(js_name = newElement)]
    pub fn new_element(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind: ElementKind = serde_json::from_value(serde_json::Value::from(kind))
            .map_err(|e| js_error("Unknown element type", e))?;
        let element = self
            .state
            .new_element(kind)
            .ok_or_else(|| js_error("Cannot create element", kind))?;
        to_json(&element)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    #[wasm_bindgen(js_name = selectedId)]
    pub fn selected_id(&self) -> Option<String> {
        self.state.selected_id().map(|id| id.to_string())
    }

    fn apply(&mut self, command: Command) -> Result<(), JsValue> {
        self.state
            .dispatch(command)
            .map_err(|e| js_error("Command rejected", e))
    }
}
