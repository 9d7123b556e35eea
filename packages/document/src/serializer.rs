//! # Page Content Codec
//!
//! Pages are persisted as a JSON array holding the single `__body` element,
//! e.g. `[{"id":"__body","type":"__body","styles":{},"content":[...]}]`.
//! Loading validates every structural invariant before handing the tree to
//! the editor, so the editor never sees a broken tree.

use crate::element::{Element, ElementKind};
use crate::error::{DocumentError, DocumentResult};
use crate::visitor::collect_ids;
use serde_json::Value;

/// Parse persisted page content into a validated body element.
///
/// Empty content is a page that was never saved and yields an empty body.
pub fn parse_page_content(content: &str) -> DocumentResult<Element> {
    if content.trim().is_empty() {
        return Ok(Element::body());
    }

    let value: Value = serde_json::from_str(content)?;

    let root = match value {
        Value::Array(mut roots) => match roots.len() {
            0 => return Ok(Element::body()),
            1 => roots.remove(0),
            n => return Err(DocumentError::MultipleRoots(n)),
        },
        other => other,
    };

    let body: Element = serde_json::from_value(root)?;
    validate_tree(&body)?;
    Ok(body)
}

/// Serialize a body element into the persisted page content shape
pub fn serialize_page(body: &Element) -> DocumentResult<String> {
    Ok(serde_json::to_string(&[body])?)
}

/// Validate a whole page tree rooted at `body`
pub fn validate_tree(body: &Element) -> DocumentResult<()> {
    if body.kind != ElementKind::Body {
        return Err(DocumentError::MissingBody);
    }

    let children = body
        .children()
        .ok_or_else(|| DocumentError::content_mismatch(&body.id, body.kind))?;

    for child in children {
        validate_subtree(child)?;
    }

    if let Some(duplicate) = collect_ids(body).duplicate {
        return Err(DocumentError::DuplicateId(duplicate));
    }

    Ok(())
}

/// Validate an element that will live below the body.
///
/// Checks shape only; id uniqueness against a surrounding tree is the
/// caller's concern.
pub fn validate_subtree(element: &Element) -> DocumentResult<()> {
    if element.id.is_empty() {
        return Err(DocumentError::EmptyId(element.kind));
    }

    if element.kind == ElementKind::Body {
        return Err(DocumentError::UnexpectedBody(element.id.clone()));
    }

    if element.kind.holds_children() != element.content.is_children() {
        return Err(DocumentError::content_mismatch(&element.id, element.kind));
    }

    let Some(children) = element.children() else {
        return Ok(());
    };

    if let Some(slots) = element.kind.column_slots() {
        let columns_ok = children.len() == slots
            && children.iter().all(|c| c.kind == ElementKind::Container);

        if !columns_ok {
            return Err(DocumentError::invalid_columns(&element.id, children.len()));
        }
    }

    for child in children {
        validate_subtree(child)?;
    }

    Ok(())
}
