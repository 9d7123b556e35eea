use crate::element::{Content, Element, ElementId, LeafContent};
use std::collections::HashSet;

/// Visitor pattern for traversing element trees immutably
///
/// Default implementations walk the entire tree depth-first, children in
/// order. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_leaf(&mut self, _leaf: &LeafContent) {
        // Leaf payload, no children to walk
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    match &element.content {
        Content::Children(children) => {
            for child in children {
                visitor.visit_element(child);
            }
        }
        Content::Leaf(leaf) => {
            visitor.visit_leaf(leaf);
        }
    }
}

/// Collects element ids, remembering the first id seen twice
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: HashSet<ElementId>,
    pub duplicate: Option<ElementId>,
}

impl Visitor for IdCollector {
    fn visit_element(&mut self, element: &Element) {
        if !self.ids.insert(element.id.clone()) && self.duplicate.is_none() {
            self.duplicate = Some(element.id.clone());
        }
        walk_element(self, element);
    }
}

/// All ids in `element`'s subtree, `element` included
pub fn collect_ids(element: &Element) -> IdCollector {
    let mut collector = IdCollector::default();
    collector.visit_element(element);
    collector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[derive(Default)]
    struct TextCounter(usize);

    impl Visitor for TextCounter {
        fn visit_leaf(&mut self, leaf: &LeafContent) {
            if leaf.inner_text.is_some() {
                self.0 += 1;
            }
        }
    }

    #[test]
    fn test_walk_visits_every_leaf() {
        let body = Element::body()
            .with_child(Element::new("a", ElementKind::Text).with_leaf(LeafContent::text("a")))
            .with_child(
                Element::new("box", ElementKind::Container).with_child(
                    Element::new("b", ElementKind::Text).with_leaf(LeafContent::text("b")),
                ),
            );

        let mut counter = TextCounter::default();
        counter.visit_element(&body);
        assert_eq!(counter.0, 2);
    }

    #[test]
    fn test_collect_ids_flags_duplicates() {
        let body = Element::body()
            .with_child(Element::new("x", ElementKind::Text))
            .with_child(Element::new("box", ElementKind::Container).with_child(Element::new("x", ElementKind::Image)));

        let collected = collect_ids(&body);
        assert_eq!(collected.ids.len(), 3);
        assert_eq!(collected.duplicate, Some(ElementId::from("x")));
    }
}
