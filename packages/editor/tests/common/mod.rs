//! Shared fixtures for editor integration tests

#![allow(dead_code)]

use funnel_editor::{Command, Element, ElementKind, EditorState, LeafContent};
use tracing_subscriber::EnvFilter;

/// Route editor logs through the test harness; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn text(id: &str, body: &str) -> Element {
    Element::new(id, ElementKind::Text).with_leaf(LeafContent::text(body))
}

pub fn container(id: &str) -> Element {
    Element::new(id, ElementKind::Container)
}

pub fn two_columns(id: &str, left: Element, right: Element) -> Element {
    Element::new(id, ElementKind::TwoColumns)
        .with_child(left)
        .with_child(right)
}

/// State loaded with `body`, live mode off
pub fn load(body: &Element) -> EditorState {
    init_tracing();

    let content = funnel_document::serialize_page(body).expect("fixture serializes");
    let mut state = EditorState::new();
    state
        .dispatch(Command::LoadDocument {
            content,
            with_live: false,
        })
        .expect("fixture loads");
    state
}

pub fn child_ids(element: &Element) -> Vec<String> {
    element
        .children()
        .unwrap_or(&[])
        .iter()
        .map(|child| child.id.to_string())
        .collect()
}
