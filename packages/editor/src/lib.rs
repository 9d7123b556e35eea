//! # Funnel Editor
//!
//! Command-driven editing engine for funnel pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: page JSON → element tree          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorState + dispatch(Command)     │
//! │  - Validate mutations before committing     │
//! │  - Post-effects folded into one step        │
//! │  - Snapshot history with undo/redo          │
//! │  - Selection, device and mode flags         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ projection: state → canvas + layers input   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: projections are derived on demand
//! 2. **All-or-nothing commands**: a rejected command leaves state untouched
//! 3. **Structural sharing**: snapshots share every subtree an edit did not touch
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_editor::{project, Command, EditorState};
//!
//! let mut state = EditorState::new();
//! state.dispatch(Command::LoadDocument { content, with_live: false })?;
//!
//! let text = state.new_element(ElementKind::Text).unwrap();
//! state.dispatch(Command::InsertElement {
//!     container_id: "__body".into(),
//!     element: text,
//! })?;
//! state.dispatch(Command::Undo)?;
//!
//! let view = project(&state);
//! let saved = state.save()?;
//! ```

mod config;
mod errors;
mod history;
mod mutations;
mod post_effects;
mod projection;
mod registry;
mod state;

pub use config::EditorConfig;
pub use errors::{EditorError, EditorResult};
pub use history::History;
pub use mutations::{Mutation, MutationError};
pub use post_effects::{NormalizeVideoEmbed, PostEffect, PostEffectEngine};
pub use projection::{project, CanvasLayout, Chrome, LayerRow, Projection, RenderNode};
pub use registry::{palette, KindEntry, Widget};
pub use state::{Command, Device, EditorMode, EditorState};

// Re-export document types for convenience
pub use funnel_document::{
    Content, Element, ElementId, ElementKind, LeafContent, Styles, BODY_ID,
};
