//! # Funnel Document
//!
//! The page element tree and its persisted content format.
//!
//! A funnel page is a tree of [`Element`]s under a single `__body` root.
//! Containers own an ordered child list; two-column containers own exactly two
//! column containers; everything else carries a leaf payload.

pub mod element;
pub mod embed;
pub mod error;
pub mod id_generator;
pub mod serializer;
pub mod visitor;

pub use element::{
    find_by_id, find_parent_of, Content, Element, ElementId, ElementKind, LeafContent, Styles,
    BODY_ID,
};
pub use embed::{is_embeddable, normalize_embed_url};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::{get_page_seed, IdGenerator};
pub use serializer::{parse_page_content, serialize_page, validate_subtree, validate_tree};
pub use visitor::{collect_ids, walk_element, IdCollector, Visitor};
