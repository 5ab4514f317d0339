//! Placeholder subtree and the isolated scope it lives in.

use crate::config::WidgetOptions;
use crate::lazy_image::LazyImage;
use crate::resolver::ResolvedSource;
use html::Node;

pub const CONTAINER_CLASS: &str = "lazytube";
pub const IMAGE_CLASS: &str = "lazytube__placeholder";
pub const PLAY_CLASS: &str = "lazytube__play";

// Scoped to the shadow root; nothing here can match page content.
const STYLES: &str = "\
:host { display: inline-block; }
.lazytube {
  position: relative;
  display: inline-block;
  background-color: #000;
  cursor: pointer;
  line-height: 0;
}
.lazytube__placeholder { display: block; object-fit: cover; }
.lazytube__play {
  position: absolute;
  top: 50%;
  left: 50%;
  width: 68px;
  height: 48px;
  transform: translate(-50%, -50%);
  border-radius: 12px;
  background-color: rgba(0, 0, 0, 0.6);
  pointer-events: none;
}
.lazytube__play::before {
  content: \"\";
  position: absolute;
  top: 50%;
  left: 50%;
  transform: translate(-40%, -50%);
  border-style: solid;
  border-width: 11px 0 11px 19px;
  border-color: transparent transparent transparent #fff;
}
.lazytube:hover .lazytube__play, .lazytube:focus-visible .lazytube__play {
  background-color: #f00;
}
";

/// An encapsulated rendering scope: a scoped stylesheet plus one container element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRoot {
    style: Node,
    container: Node,
}

impl ShadowRoot {
    pub fn container(&self) -> &Node {
        &self.container
    }

    /// Replaces everything inside the container with `node`, returning what was there.
    pub fn replace_contents(&mut self, node: Node) -> Vec<Node> {
        match self.container.children_mut() {
            Some(children) => std::mem::replace(children, vec![node]),
            None => Vec::new(),
        }
    }

    /// Declarative form, `<template shadowrootmode="open">…</template>`, for serialization.
    pub fn to_template(&self) -> Node {
        Node::element("template")
            .with_attr("shadowrootmode", "open")
            .with_child(self.style.clone())
            .with_child(self.container.clone())
    }
}

pub fn render_placeholder(source: &ResolvedSource, options: &WidgetOptions) -> ShadowRoot {
    let image = LazyImage {
        src: source.thumbnail_url(),
        alt: options.placeholder_alt.clone(),
        width: source.width,
        height: source.height,
        disable_native_lazy: source.disable_native_lazy,
    };

    let container = Node::element("div")
        .with_attr("class", CONTAINER_CLASS)
        .with_attr("role", "button")
        .with_attr("tabindex", "0")
        .with_attr("aria-label", options.play_label.clone())
        .with_child(image.into_node(IMAGE_CLASS))
        .with_child(
            Node::element("div")
                .with_attr("class", PLAY_CLASS)
                .with_attr("aria-hidden", "true"),
        );

    ShadowRoot {
        style: Node::element("style").with_child(Node::text(STYLES)),
        container,
    }
}
