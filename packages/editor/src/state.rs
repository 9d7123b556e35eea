//! # Editor State
//!
//! The full state behind one page editing session: the current tree, its
//! history, the selection, and the view flags (device, preview, live).
//!
//! Everything changes through [`EditorState::dispatch`]. A command either
//! applies completely or returns an error and leaves the state untouched.

use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::history::History;
use crate::mutations::{Mutation, MutationError};
use crate::post_effects::PostEffectEngine;
use crate::registry;
use funnel_document::{
    parse_page_content, serialize_page, Element, ElementId, ElementKind, IdGenerator,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Seed for element ids minted before the page id is known
const DRAFT_SEED: &str = "draft";

/// Simulated viewport the canvas is sized for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// Mode implied by the preview/live flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditorMode {
    /// Full editing affordances
    Edit,
    /// Read-only, editor chrome visible
    Preview,
    /// Read-only, chrome hidden (in-app preview and the published page)
    Live,
}

/// Commands the UI dispatches into the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Initialize the session from persisted page content
    #[serde(rename_all = "camelCase")]
    LoadDocument { content: String, with_live: bool },

    /// Select an element, or clear the selection with `None`
    #[serde(rename_all = "camelCase")]
    SelectElement { element_id: Option<ElementId> },

    #[serde(rename_all = "camelCase")]
    InsertElement {
        container_id: ElementId,
        element: Element,
    },

    UpdateElement { element: Element },

    #[serde(rename_all = "camelCase")]
    DeleteElement { element_id: ElementId },

    /// Move a child within or between containers
    #[serde(rename_all = "camelCase")]
    ReorderElements {
        source_container: ElementId,
        source_index: usize,
        dest_container: ElementId,
        dest_index: usize,
    },

    ChangeDevice { device: Device },

    TogglePreviewMode,

    ToggleLiveMode,

    #[serde(rename_all = "camelCase")]
    SetPageId { funnel_page_id: String },

    Undo,

    Redo,
}

impl Command {
    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadDocument { .. } => "LoadDocument",
            Command::SelectElement { .. } => "SelectElement",
            Command::InsertElement { .. } => "InsertElement",
            Command::UpdateElement { .. } => "UpdateElement",
            Command::DeleteElement { .. } => "DeleteElement",
            Command::ReorderElements { .. } => "ReorderElements",
            Command::ChangeDevice { .. } => "ChangeDevice",
            Command::TogglePreviewMode => "TogglePreviewMode",
            Command::ToggleLiveMode => "ToggleLiveMode",
            Command::SetPageId { .. } => "SetPageId",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
        }
    }

    /// The tree mutation behind a structural command
    pub fn to_mutation(&self) -> Option<Mutation> {
        let mutation = match self {
            Command::InsertElement {
                container_id,
                element,
            } => Mutation::InsertElement {
                container_id: container_id.clone(),
                element: element.clone(),
            },
            Command::UpdateElement { element } => Mutation::UpdateElement {
                element: element.clone(),
            },
            Command::DeleteElement { element_id } => Mutation::DeleteElement {
                element_id: element_id.clone(),
            },
            Command::ReorderElements {
                source_container,
                source_index,
                dest_container,
                dest_index,
            } => Mutation::MoveElement {
                source_container: source_container.clone(),
                source_index: *source_index,
                dest_container: dest_container.clone(),
                dest_index: *dest_index,
            },
            _ => return None,
        };
        Some(mutation)
    }
}

impl From<Mutation> for Command {
    fn from(mutation: Mutation) -> Self {
        match mutation {
            Mutation::InsertElement {
                container_id,
                element,
            } => Command::InsertElement {
                container_id,
                element,
            },
            Mutation::UpdateElement { element } => Command::UpdateElement { element },
            Mutation::DeleteElement { element_id } => Command::DeleteElement { element_id },
            Mutation::MoveElement {
                source_container,
                source_index,
                dest_container,
                dest_index,
            } => Command::ReorderElements {
                source_container,
                source_index,
                dest_container,
                dest_index,
            },
        }
    }
}

/// Editing session state
#[derive(Debug, Clone)]
pub struct EditorState {
    /// Current tree, always equal to the active history snapshot
    body: Arc<Element>,

    /// Selected element id (`None` = nothing selected)
    selected: Option<ElementId>,

    device: Device,
    preview_mode: bool,
    live_mode: bool,

    /// Persisted page this session edits
    funnel_page_id: Option<String>,

    /// Whether LoadDocument has run
    loaded: bool,

    history: History,
    ids: IdGenerator,
    config: EditorConfig,
    effects: Arc<PostEffectEngine>,
}

impl EditorState {
    /// Create an empty session with default config
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an empty session
    pub fn with_config(config: EditorConfig) -> Self {
        let body = Arc::new(Element::body());
        let mut history = History::with_max_levels(config.max_history);
        history.load(Arc::clone(&body));

        Self {
            body,
            selected: None,
            device: config.initial_device,
            preview_mode: false,
            live_mode: false,
            funnel_page_id: None,
            loaded: false,
            history,
            ids: IdGenerator::from_seed(DRAFT_SEED.to_string()),
            config,
            effects: Arc::new(PostEffectEngine::new()),
        }
    }

    /// Replace the post-effects run after structural commands
    pub fn with_effects(mut self, effects: PostEffectEngine) -> Self {
        self.effects = Arc::new(effects);
        self
    }

    /// Root `__body` element
    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Shared handle to the current tree
    pub fn tree(&self) -> Arc<Element> {
        Arc::clone(&self.body)
    }

    /// Top-level elements (children of the body)
    pub fn elements(&self) -> &[Arc<Element>] {
        self.body.children().unwrap_or(&[])
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    /// Selected element as it exists in the current tree
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected
            .as_ref()
            .and_then(|id| self.body.find(id.as_str()))
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn preview_mode(&self) -> bool {
        self.preview_mode
    }

    pub fn live_mode(&self) -> bool {
        self.live_mode
    }

    pub fn mode(&self) -> EditorMode {
        match (self.live_mode, self.preview_mode) {
            (true, _) => EditorMode::Live,
            (false, true) => EditorMode::Preview,
            (false, false) => EditorMode::Edit,
        }
    }

    pub fn funnel_page_id(&self) -> Option<&str> {
        self.funnel_page_id.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Serialize the current tree for persistence
    pub fn save(&self) -> EditorResult<String> {
        let content = serialize_page(&self.body)?;
        info!(
            funnel_page_id = ?self.funnel_page_id,
            bytes = content.len(),
            "Serialized page for save"
        );
        Ok(content)
    }

    /// Build a palette element of `kind` with fresh ids, ready to insert.
    ///
    /// `None` for kinds that cannot be placed, or once the id counter for
    /// this page is exhausted.
    pub fn new_element(&mut self, kind: ElementKind) -> Option<Element> {
        registry::build(kind, &mut self.ids)
    }

    /// Apply a command and return the resulting state, leaving `self` as is
    pub fn reduce(&self, command: Command) -> EditorResult<Self> {
        let mut next = self.clone();
        next.dispatch(command)?;
        Ok(next)
    }

    /// Apply a command.
    ///
    /// On error nothing has changed.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub fn dispatch(&mut self, command: Command) -> EditorResult<()> {
        let result = self.apply_command(command);
        if let Err(e) = &result {
            warn!(error = %e, "Rejected command");
        }
        result
    }

    fn apply_command(&mut self, command: Command) -> EditorResult<()> {
        match command {
            structural @ (Command::InsertElement { .. }
            | Command::UpdateElement { .. }
            | Command::DeleteElement { .. }
            | Command::ReorderElements { .. }) => {
                let mutation = structural
                    .to_mutation()
                    .ok_or_else(|| MutationError::InvalidStructure(structural.name().to_string()))?;
                self.apply_mutation(&mutation)
            }

            Command::LoadDocument { content, with_live } => self.load(&content, with_live),

            Command::SelectElement { element_id } => self.select(element_id),

            Command::ChangeDevice { device } => {
                self.device = device;
                Ok(())
            }

            Command::TogglePreviewMode => {
                self.preview_mode = !self.preview_mode;
                Ok(())
            }

            Command::ToggleLiveMode => {
                self.live_mode = !self.live_mode;
                Ok(())
            }

            Command::SetPageId { funnel_page_id } => {
                self.ids = IdGenerator::new(&funnel_page_id);
                self.ids.resume(&self.body);
                self.funnel_page_id = Some(funnel_page_id);
                Ok(())
            }

            Command::Undo => {
                self.ensure_editable()?;
                if let Some(tree) = self.history.undo() {
                    self.set_tree(tree);
                }
                Ok(())
            }

            Command::Redo => {
                self.ensure_editable()?;
                if let Some(tree) = self.history.redo() {
                    self.set_tree(tree);
                }
                Ok(())
            }
        }
    }

    fn load(&mut self, content: &str, with_live: bool) -> EditorResult<()> {
        if self.loaded {
            return Err(EditorError::AlreadyLoaded);
        }

        let body = Arc::new(parse_page_content(content)?);

        self.ids.resume(&body);
        self.history.load(Arc::clone(&body));
        self.body = body;
        self.selected = None;
        self.live_mode = with_live;
        self.loaded = true;

        info!(
            elements = self.body.node_count(),
            live = with_live,
            "Loaded page document"
        );
        Ok(())
    }

    fn select(&mut self, element_id: Option<ElementId>) -> EditorResult<()> {
        // An empty id is the clear-selection sentinel some callers send
        let element_id = element_id.filter(|id| !id.is_empty());

        if let Some(id) = &element_id {
            if self.body.find(id.as_str()).is_none() {
                return Err(EditorError::UnknownSelection(id.clone()));
            }
        }

        self.selected = element_id;
        Ok(())
    }

    /// Tree-changing commands (edits, undo, redo) are refused in live mode
    fn ensure_editable(&self) -> EditorResult<()> {
        if self.live_mode && !self.config.allow_structural_edits_in_live {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    fn apply_mutation(&mut self, mutation: &Mutation) -> EditorResult<()> {
        self.ensure_editable()?;

        let (next, applied) = self.effects.apply_with_effects(mutation, &self.body)?;

        self.history.record(Arc::clone(&next));
        self.set_tree(next);

        debug!(
            mutation = mutation.name(),
            subject = %mutation.target_id(),
            secondary = applied.len() - 1,
            history = self.history.len(),
            "Applied mutation"
        );
        Ok(())
    }

    /// Point the live tree at `tree`, dropping a selection that no longer exists
    fn set_tree(&mut self, tree: Arc<Element>) {
        self.body = tree;

        let stale = self
            .selected
            .as_ref()
            .is_some_and(|id| self.body.find(id.as_str()).is_none());
        if stale {
            self.selected = None;
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::{LeafContent, BODY_ID};

    const PAGE: &str = r#"[{"id":"__body","type":"__body","name":"Body","styles":{},"content":[
        {"id":"hero","type":"text","name":"Hero","styles":{"color":"black"},"content":{"innerText":"Hi"}}
    ]}]"#;

    fn loaded() -> EditorState {
        let mut state = EditorState::new();
        state
            .dispatch(Command::LoadDocument {
                content: PAGE.to_string(),
                with_live: false,
            })
            .unwrap();
        state
    }

    #[test]
    fn test_state_creation() {
        let state = EditorState::new();

        assert!(!state.is_loaded());
        assert!(state.elements().is_empty());
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.mode(), EditorMode::Edit);
        assert_eq!(state.device(), Device::Desktop);
    }

    #[test]
    fn test_load_sets_history_depth_one() {
        let state = loaded();

        assert!(state.is_loaded());
        assert_eq!(state.elements().len(), 1);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history().current_index(), 0);
    }

    #[test]
    fn test_load_with_live_enters_live_mode() {
        let mut state = EditorState::new();
        state
            .dispatch(Command::LoadDocument {
                content: PAGE.to_string(),
                with_live: true,
            })
            .unwrap();

        assert_eq!(state.mode(), EditorMode::Live);
    }

    #[test]
    fn test_malformed_load_keeps_empty_state() {
        let mut state = EditorState::new();
        let result = state.dispatch(Command::LoadDocument {
            content: "{not json".to_string(),
            with_live: false,
        });

        assert!(matches!(result, Err(EditorError::Document(_))));
        assert!(!state.is_loaded());
        assert!(state.elements().is_empty());
    }

    #[test]
    fn test_second_load_rejected() {
        let mut state = loaded();
        let result = state.dispatch(Command::LoadDocument {
            content: String::new(),
            with_live: false,
        });

        assert!(matches!(result, Err(EditorError::AlreadyLoaded)));
        assert_eq!(state.elements().len(), 1);
    }

    #[test]
    fn test_select_unknown_element_rejected() {
        let mut state = loaded();
        let result = state.dispatch(Command::SelectElement {
            element_id: Some("ghost".into()),
        });

        assert!(matches!(result, Err(EditorError::UnknownSelection(_))));
        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_empty_id_clears_selection() {
        let mut state = loaded();
        state
            .dispatch(Command::SelectElement {
                element_id: Some("hero".into()),
            })
            .unwrap();
        state
            .dispatch(Command::SelectElement {
                element_id: Some("".into()),
            })
            .unwrap();

        assert!(state.selected_id().is_none());
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut state = loaded();
        state
            .dispatch(Command::SelectElement {
                element_id: Some("hero".into()),
            })
            .unwrap();
        state
            .dispatch(Command::DeleteElement {
                element_id: "hero".into(),
            })
            .unwrap();

        assert!(state.selected_id().is_none());
        assert!(state.elements().is_empty());
    }

    #[test]
    fn test_structural_commands_blocked_in_live_mode() {
        let mut state = loaded();
        state.dispatch(Command::ToggleLiveMode).unwrap();

        let result = state.dispatch(Command::DeleteElement {
            element_id: "hero".into(),
        });

        assert!(matches!(result, Err(EditorError::ReadOnly)));
        assert_eq!(state.elements().len(), 1);
    }

    #[test]
    fn test_undo_and_redo_blocked_in_live_mode() {
        let mut state = loaded();
        state
            .dispatch(Command::InsertElement {
                container_id: BODY_ID.into(),
                element: Element::new("t", ElementKind::Text),
            })
            .unwrap();
        state.dispatch(Command::ToggleLiveMode).unwrap();

        assert!(matches!(
            state.dispatch(Command::Undo),
            Err(EditorError::ReadOnly)
        ));
        assert_eq!(state.elements().len(), 2);
        assert_eq!(state.history().current_index(), 1);

        state.dispatch(Command::ToggleLiveMode).unwrap();
        state.dispatch(Command::Undo).unwrap();
        state.dispatch(Command::ToggleLiveMode).unwrap();

        assert!(matches!(
            state.dispatch(Command::Redo),
            Err(EditorError::ReadOnly)
        ));
        assert_eq!(state.elements().len(), 1);
    }

    #[test]
    fn test_structural_commands_always_reach_history() {
        let commands = [
            Command::InsertElement {
                container_id: BODY_ID.into(),
                element: Element::new("box", ElementKind::Container),
            },
            Command::UpdateElement {
                element: Element::new("box", ElementKind::Container).with_name("Box"),
            },
            Command::ReorderElements {
                source_container: BODY_ID.into(),
                source_index: 1,
                dest_container: BODY_ID.into(),
                dest_index: 0,
            },
            Command::DeleteElement {
                element_id: "box".into(),
            },
        ];

        let mut state = loaded();
        for (step, command) in commands.into_iter().enumerate() {
            state.dispatch(command).unwrap();
            assert_eq!(state.history().len(), step + 2);
        }
    }

    #[test]
    fn test_new_element_after_huge_loaded_id() {
        let content = r#"[{"id":"__body","type":"__body","styles":{},"content":[
            {"id":"draft-4294967295","type":"text","styles":{},"content":"big"}
        ]}]"#;
        let mut state = EditorState::new();
        state
            .dispatch(Command::LoadDocument {
                content: content.to_string(),
                with_live: false,
            })
            .unwrap();

        let element = state.new_element(ElementKind::Text).unwrap();
        assert_eq!(element.id.as_str(), "draft-4294967296");
        state
            .dispatch(Command::InsertElement {
                container_id: BODY_ID.into(),
                element,
            })
            .unwrap();
    }

    #[test]
    fn test_new_element_none_when_ids_exhausted() {
        let content = format!(
            r#"[{{"id":"__body","type":"__body","styles":{{}},"content":[
                {{"id":"draft-{}","type":"text","styles":{{}},"content":"last"}}
            ]}}]"#,
            u64::MAX
        );
        let mut state = EditorState::new();
        state
            .dispatch(Command::LoadDocument {
                content,
                with_live: false,
            })
            .unwrap();

        assert!(state.new_element(ElementKind::Text).is_none());
        assert!(state.new_element(ElementKind::TwoColumns).is_none());
    }

    #[test]
    fn test_live_edits_allowed_by_config() {
        let config = EditorConfig {
            allow_structural_edits_in_live: true,
            ..EditorConfig::default()
        };
        let mut state = EditorState::with_config(config);
        state.dispatch(Command::ToggleLiveMode).unwrap();

        state
            .dispatch(Command::InsertElement {
                container_id: BODY_ID.into(),
                element: Element::new("t", ElementKind::Text),
            })
            .unwrap();
        assert_eq!(state.elements().len(), 1);
    }

    #[test]
    fn test_failed_mutation_reports_error() {
        let mut state = loaded();
        let result = state.dispatch(Command::UpdateElement {
            element: Element::new("ghost", ElementKind::Text),
        });

        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::NodeNotFound(_)))
        ));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_reduce_leaves_original_untouched() {
        let state = loaded();
        let next = state
            .reduce(Command::InsertElement {
                container_id: BODY_ID.into(),
                element: Element::new("new", ElementKind::Text).with_leaf(LeafContent::text("x")),
            })
            .unwrap();

        assert_eq!(state.elements().len(), 1);
        assert_eq!(next.elements().len(), 2);
        assert_eq!(next.history().len(), 2);
    }

    #[test]
    fn test_new_element_ids_follow_page_id() {
        let mut state = loaded();
        state
            .dispatch(Command::SetPageId {
                funnel_page_id: "page-42".to_string(),
            })
            .unwrap();

        let element = state.new_element(ElementKind::Text).unwrap();
        assert!(element
            .id
            .as_str()
            .starts_with(&funnel_document::get_page_seed("page-42")));
        assert_eq!(state.funnel_page_id(), Some("page-42"));
    }

    #[test]
    fn test_command_wire_format() {
        let command: Command = serde_json::from_str(
            r#"{"type":"REORDER_ELEMENTS","payload":{"sourceContainer":"a","sourceIndex":0,"destContainer":"b","destIndex":1}}"#,
        )
        .unwrap();
        assert_eq!(command.name(), "ReorderElements");

        let undo: Command = serde_json::from_str(r#"{"type":"UNDO"}"#).unwrap();
        assert_eq!(undo, Command::Undo);

        let device: Command =
            serde_json::from_str(r#"{"type":"CHANGE_DEVICE","payload":{"device":"Tablet"}}"#)
                .unwrap();
        assert_eq!(
            device,
            Command::ChangeDevice {
                device: Device::Tablet
            }
        );
    }

    #[test]
    fn test_mutation_round_trips_through_command() {
        let mutation = Mutation::DeleteElement {
            element_id: "hero".into(),
        };
        let command = Command::from(mutation.clone());
        assert_eq!(command.to_mutation(), Some(mutation));
    }
}
