//! # Element Kind Registry
//!
//! One table row per [`ElementKind`]: its palette label, how to build a fresh
//! element for the components palette, and how to describe it to the canvas.
//! Supporting a new kind means adding a row here.

use funnel_document::{
    is_embeddable, Element, ElementKind, IdGenerator, LeafContent, Styles,
};
use serde::Serialize;
use serde_json::Value;

/// What the canvas should draw for an element, minus its children
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum Widget {
    Body,
    Container,
    Section,
    TwoColumns,
    Text {
        text: String,
    },
    Link {
        text: String,
        href: Option<String>,
    },
    Image {
        src: Option<String>,
        alt: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        src: Option<String>,
        embed_url: Option<String>,
        embeddable: bool,
    },
    ContactForm,
    PaymentForm,
}

pub struct KindEntry {
    pub kind: ElementKind,
    pub label: &'static str,
    /// Offered in the components palette
    pub palette: bool,
    build: fn(&mut IdGenerator) -> Option<Element>,
    widget: fn(&Element) -> Widget,
}

static REGISTRY: [KindEntry; 10] = [
    KindEntry {
        kind: ElementKind::Body,
        label: "Body",
        palette: false,
        build: build_body,
        widget: body_widget,
    },
    KindEntry {
        kind: ElementKind::Container,
        label: "Container",
        palette: true,
        build: build_container,
        widget: container_widget,
    },
    KindEntry {
        kind: ElementKind::Section,
        label: "Section",
        palette: true,
        build: build_section,
        widget: section_widget,
    },
    KindEntry {
        kind: ElementKind::TwoColumns,
        label: "Two Columns",
        palette: true,
        build: build_two_columns,
        widget: two_columns_widget,
    },
    KindEntry {
        kind: ElementKind::Text,
        label: "Text",
        palette: true,
        build: build_text,
        widget: text_widget,
    },
    KindEntry {
        kind: ElementKind::Link,
        label: "Link",
        palette: true,
        build: build_link,
        widget: link_widget,
    },
    KindEntry {
        kind: ElementKind::Image,
        label: "Image",
        palette: true,
        build: build_image,
        widget: image_widget,
    },
    KindEntry {
        kind: ElementKind::Video,
        label: "Video",
        palette: true,
        build: build_video,
        widget: video_widget,
    },
    KindEntry {
        kind: ElementKind::ContactForm,
        label: "Contact Form",
        palette: true,
        build: build_contact_form,
        widget: contact_form_widget,
    },
    KindEntry {
        kind: ElementKind::PaymentForm,
        label: "Payment Form",
        palette: true,
        build: build_payment_form,
        widget: payment_form_widget,
    },
];

pub fn entry(kind: ElementKind) -> Option<&'static KindEntry> {
    REGISTRY.iter().find(|entry| entry.kind == kind)
}

/// Kinds offered in the components palette, in palette order
pub fn palette() -> impl Iterator<Item = &'static KindEntry> {
    REGISTRY.iter().filter(|entry| entry.palette)
}

/// Fresh palette element of `kind`.
///
/// `None` for kinds that cannot be placed, or when `ids` has run out of ids.
pub fn build(kind: ElementKind, ids: &mut IdGenerator) -> Option<Element> {
    entry(kind)
        .filter(|entry| entry.palette)
        .and_then(|entry| (entry.build)(ids))
}

/// Canvas description of `element`
pub fn widget(element: &Element) -> Option<Widget> {
    entry(element.kind).map(|entry| (entry.widget)(element))
}

pub fn label(kind: ElementKind) -> &'static str {
    entry(kind).map_or(kind.as_str(), |entry| entry.label)
}

fn default_styles() -> Styles {
    [
        ("backgroundPosition", "center"),
        ("objectFit", "cover"),
        ("backgroundRepeat", "no-repeat"),
        ("textAlign", "left"),
        ("opacity", "100%"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), Value::from(value)))
    .collect()
}

fn styled(ids: &mut IdGenerator, kind: ElementKind, name: &str) -> Option<Element> {
    let mut element = Element::new(ids.new_id()?, kind).with_name(name);
    element.styles = default_styles();
    Some(element)
}

fn build_body(_ids: &mut IdGenerator) -> Option<Element> {
    Some(Element::body())
}

fn build_container(ids: &mut IdGenerator) -> Option<Element> {
    styled(ids, ElementKind::Container, "Container")
}

fn build_section(ids: &mut IdGenerator) -> Option<Element> {
    styled(ids, ElementKind::Section, "Section")
}

fn build_column(ids: &mut IdGenerator) -> Option<Element> {
    Some(styled(ids, ElementKind::Container, "Container")?.with_style("width", "100%"))
}

fn build_two_columns(ids: &mut IdGenerator) -> Option<Element> {
    let element =
        styled(ids, ElementKind::TwoColumns, "Two Columns")?.with_style("display", "flex");
    let first = build_column(ids)?;
    let second = build_column(ids)?;
    Some(element.with_child(first).with_child(second))
}

fn build_text(ids: &mut IdGenerator) -> Option<Element> {
    let element = styled(ids, ElementKind::Text, "Text")?
        .with_style("color", "black")
        .with_leaf(LeafContent::text("Text Element"));
    Some(element)
}

fn build_link(ids: &mut IdGenerator) -> Option<Element> {
    let element = styled(ids, ElementKind::Link, "Link")?
        .with_style("color", "black")
        .with_leaf(LeafContent {
            inner_text: Some("Link Element".to_string()),
            href: Some("#".to_string()),
            ..LeafContent::default()
        });
    Some(element)
}

fn build_image(ids: &mut IdGenerator) -> Option<Element> {
    styled(ids, ElementKind::Image, "Image")
}

fn build_video(ids: &mut IdGenerator) -> Option<Element> {
    let element = Element::new(ids.new_id()?, ElementKind::Video)
        .with_name("Video")
        .with_leaf(LeafContent::default());
    Some(element)
}

fn build_contact_form(ids: &mut IdGenerator) -> Option<Element> {
    styled(ids, ElementKind::ContactForm, "Contact Form")
}

fn build_payment_form(ids: &mut IdGenerator) -> Option<Element> {
    styled(ids, ElementKind::PaymentForm, "Payment Form")
}

fn body_widget(_: &Element) -> Widget {
    Widget::Body
}

fn container_widget(_: &Element) -> Widget {
    Widget::Container
}

fn section_widget(_: &Element) -> Widget {
    Widget::Section
}

fn two_columns_widget(_: &Element) -> Widget {
    Widget::TwoColumns
}

fn contact_form_widget(_: &Element) -> Widget {
    Widget::ContactForm
}

fn payment_form_widget(_: &Element) -> Widget {
    Widget::PaymentForm
}

fn leaf_text(element: &Element) -> String {
    element
        .leaf()
        .and_then(|leaf| leaf.inner_text.clone())
        .unwrap_or_default()
}

fn text_widget(element: &Element) -> Widget {
    Widget::Text {
        text: leaf_text(element),
    }
}

fn link_widget(element: &Element) -> Widget {
    Widget::Link {
        text: leaf_text(element),
        href: element.leaf().and_then(|leaf| leaf.href.clone()),
    }
}

fn image_widget(element: &Element) -> Widget {
    let leaf = element.leaf();
    Widget::Image {
        src: leaf.and_then(|leaf| leaf.src.clone()),
        alt: leaf.and_then(|leaf| leaf.alt.clone()),
    }
}

fn video_widget(element: &Element) -> Widget {
    let leaf = element.leaf();
    let embed_url = leaf.and_then(|leaf| leaf.embed_url.clone());
    let embeddable = embed_url.as_deref().is_some_and(is_embeddable);

    Widget::Video {
        src: leaf.and_then(|leaf| leaf.src.clone()),
        embed_url,
        embeddable,
    }
}
