//! # View-Model Projection
//!
//! Derives everything the canvas and the layers panel draw from an
//! [`EditorState`]. Projection is a pure function of the state, so the
//! renderer can call it every frame and tests can inspect it without a UI.

use crate::registry::{self, Widget};
use crate::state::{Device, EditorMode, EditorState};
use funnel_document::{Element, ElementId, ElementKind, Styles};
use serde::Serialize;

/// Canvas sizing for the active device
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasLayout {
    pub device: Device,
    pub width_class: &'static str,
    /// `None` means the canvas fills the available width
    pub max_width_px: Option<u32>,
}

impl CanvasLayout {
    pub fn for_device(device: Device) -> Self {
        let (width_class, max_width_px) = match device {
            Device::Desktop => ("w-full", None),
            Device::Tablet => ("!w-[850px]", Some(850)),
            Device::Mobile => ("!w-[420px]", Some(420)),
        };

        Self {
            device,
            width_class,
            max_width_px,
        }
    }
}

/// Which parts of the editor chrome are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chrome {
    pub show_navigation: bool,
    pub show_sidebar: bool,
    /// Floating button that leaves preview
    pub show_unpreview_button: bool,
    /// Canvas drops padding, margin and border
    pub borderless: bool,
}

/// One element as the canvas should draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: Option<String>,
    /// Position among its siblings
    pub position: usize,
    pub depth: usize,
    pub styles: Styles,
    pub selected: bool,
    pub hidden: bool,
    /// Name badge above the selected element
    pub show_badge: bool,
    pub show_delete: bool,
    pub dashed_border: bool,
    pub widget: Option<Widget>,
    pub children: Vec<RenderNode>,
}

/// One row of the layers panel outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRow {
    pub id: ElementId,
    pub kind: ElementKind,
    pub depth: usize,
    pub label: String,
    pub selected: bool,
    pub hidden: bool,
    pub expandable: bool,
}

/// Render input derived from editor state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub mode: EditorMode,
    pub canvas: CanvasLayout,
    pub chrome: Chrome,
    pub can_undo: bool,
    pub can_redo: bool,
    /// The body, with the top-level elements as its children
    pub root: RenderNode,
    pub layers: Vec<LayerRow>,
}

impl Projection {
    /// Top-level elements in render order
    pub fn top_level(&self) -> &[RenderNode] {
        &self.root.children
    }

    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        fn search<'a>(node: &'a RenderNode, id: &str) -> Option<&'a RenderNode> {
            if node.id.as_str() == id {
                return Some(node);
            }
            node.children.iter().find_map(|child| search(child, id))
        }
        search(&self.root, id)
    }
}

/// Project editor state into render input
pub fn project(state: &EditorState) -> Projection {
    let live = state.live_mode();
    let preview = state.preview_mode();

    let context = NodeContext {
        selected: state.selected_id(),
        live,
    };

    let mut layers = Vec::new();
    collect_layers(state.body(), 0, None, state.selected_id(), &mut layers);

    Projection {
        mode: state.mode(),
        canvas: CanvasLayout::for_device(state.device()),
        chrome: Chrome {
            show_navigation: !preview,
            show_sidebar: !preview,
            show_unpreview_button: preview && live,
            borderless: preview || live,
        },
        can_undo: state.can_undo(),
        can_redo: state.can_redo(),
        root: render_node(state.body(), 0, 0, false, &context),
        layers,
    }
}

struct NodeContext<'a> {
    selected: Option<&'a ElementId>,
    live: bool,
}

fn render_node(
    element: &Element,
    position: usize,
    depth: usize,
    in_columns: bool,
    context: &NodeContext<'_>,
) -> RenderNode {
    let selected = !context.live && context.selected == Some(&element.id);
    let removable = element.kind != ElementKind::Body && !in_columns;

    let holds_columns = element.kind.column_slots().is_some();
    let children = element
        .children()
        .unwrap_or(&[])
        .iter()
        .enumerate()
        .map(|(index, child)| render_node(child, index, depth + 1, holds_columns, context))
        .collect();

    RenderNode {
        id: element.id.clone(),
        kind: element.kind,
        name: element.name.clone(),
        position,
        depth,
        styles: element.styles.clone(),
        selected,
        hidden: element.is_hidden(),
        show_badge: selected,
        show_delete: selected && removable,
        dashed_border: !context.live,
        widget: registry::widget(element),
        children,
    }
}

fn collect_layers(
    element: &Element,
    depth: usize,
    column: Option<usize>,
    selected: Option<&ElementId>,
    rows: &mut Vec<LayerRow>,
) {
    let children = element.children().unwrap_or(&[]);

    rows.push(LayerRow {
        id: element.id.clone(),
        kind: element.kind,
        depth,
        label: layer_label(element, column),
        selected: selected == Some(&element.id),
        hidden: element.is_hidden(),
        expandable: !children.is_empty(),
    });

    let holds_columns = element.kind.column_slots().is_some();
    for (index, child) in children.iter().enumerate() {
        let column = holds_columns.then_some(index);
        collect_layers(child, depth + 1, column, selected, rows);
    }
}

fn layer_label(element: &Element, column: Option<usize>) -> String {
    if let Some(index) = column {
        return format!("Column {}", index + 1);
    }

    if let Some(name) = &element.name {
        return name.clone();
    }

    if element.kind == ElementKind::Text {
        if let Some(text) = element.leaf().and_then(|leaf| leaf.inner_text.as_deref()) {
            let preview: String = text.chars().take(20).collect();
            return format!("Text: {preview}...");
        }
    }

    registry::label(element.kind).to_string()
}
