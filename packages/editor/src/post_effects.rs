//! # Post-Effect System
//!
//! Mutations can require follow-up changes to keep element content coherent.
//! For example, pasting a YouTube share link into a video's `src` means the
//! canvas needs the matching embed URL in `embedUrl`.
//!
//! ## Design
//!
//! Post-effects inspect a mutation together with the tree it produced and
//! return secondary mutations. The editor applies them on top of the primary
//! mutation and records the result as a single history step, so one undo
//! reverts the edit and everything it triggered.
//!
//! Post-effects are:
//! - **Deterministic**: Same mutation on the same tree yields the same effects
//! - **Minimal**: Only generate mutations that change something

use crate::mutations::{Mutation, MutationError};
use funnel_document::{normalize_embed_url, walk_element, Element, ElementKind, Visitor};
use std::sync::Arc;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the mutation and generate secondary mutations if needed.
    ///
    /// `tree` is the tree after the mutation was applied.
    fn analyze(&self, mutation: &Mutation, tree: &Element) -> Vec<Mutation>;
}

/// Keep `embedUrl` of video elements in sync with their `src`
#[derive(Debug)]
pub struct NormalizeVideoEmbed;

impl PostEffect for NormalizeVideoEmbed {
    fn analyze(&self, mutation: &Mutation, tree: &Element) -> Vec<Mutation> {
        let root_id = match mutation {
            Mutation::InsertElement { element, .. } | Mutation::UpdateElement { element } => {
                &element.id
            }
            Mutation::DeleteElement { .. } | Mutation::MoveElement { .. } => return vec![],
        };

        let Some(root) = tree.find(root_id.as_str()) else {
            return vec![];
        };

        let mut stale = StaleVideos::default();
        stale.visit_element(root);
        stale.updates
    }
}

#[derive(Default)]
struct StaleVideos {
    updates: Vec<Mutation>,
}

impl Visitor for StaleVideos {
    fn visit_element(&mut self, element: &Element) {
        if element.kind == ElementKind::Video {
            if let Some(leaf) = element.leaf() {
                let embed = leaf.src.as_deref().map(normalize_embed_url);

                if embed.is_some() && embed != leaf.embed_url {
                    let mut leaf = leaf.clone();
                    leaf.embed_url = embed;
                    self.updates.push(Mutation::UpdateElement {
                        element: element.clone().with_leaf(leaf),
                    });
                }
            }
        }
        walk_element(self, element);
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(NormalizeVideoEmbed)],
        }
    }

    /// Create engine without any effects
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Register an additional effect
    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, tree: &Element) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(mutation, tree);
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Returns the final tree and every mutation applied, primary first.
    pub fn apply_with_effects(
        &self,
        mutation: &Mutation,
        tree: &Arc<Element>,
    ) -> Result<(Arc<Element>, Vec<Mutation>), MutationError> {
        // Apply primary mutation
        let mut next = mutation.apply(tree)?;
        let mut applied_mutations = vec![mutation.clone()];

        // Generate and apply secondary mutations
        let secondary = self.analyze(mutation, &next);
        for secondary_mutation in secondary {
            next = secondary_mutation.apply(&next)?;
            applied_mutations.push(secondary_mutation);
        }

        Ok((next, applied_mutations))
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}
