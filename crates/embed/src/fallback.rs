//! Degradation path for hosts without custom element support: every widget element is
//! rewritten into a plain, immediately visible embed. Autoplay is left as authored.

use crate::builder::retag;
use crate::config::{EMBED_TAG, REALIZED_CLASS};
use crate::resolver::locate_fallback_embed;
use html::dom_utils::{collect_elements_named, find_node_by_id_mut};
use html::{Id, Node};

/// Plain embed form of one widget element. The result keeps the element's id.
pub fn plain_embed(mut element: Node, tag_name: &str) -> Node {
    let id = element.id();
    let authored = if element.has_attr("src") {
        None
    } else {
        take_fallback_embed(&mut element)
    };

    let mut embed = match authored {
        Some(embed) => embed,
        None => retag(&element, tag_name, EMBED_TAG),
    };
    embed.add_class(REALIZED_CLASS);
    embed.set_id(id);
    embed
}

fn take_fallback_embed(element: &mut Node) -> Option<Node> {
    let (block_index, child_index) = locate_fallback_embed(element).ok()?;
    let block = element.children_mut()?.get_mut(block_index)?;
    Some(block.children_mut()?.remove(child_index))
}

/// Rewrites every `tag_name` element under `root` in place, `root` included. Each plain embed
/// keeps its widget's id. Returns the rewritten ids.
pub fn degrade_all(root: &mut Node, tag_name: &str) -> Vec<Id> {
    let mut ids = Vec::new();
    collect_elements_named(root, tag_name, &mut ids);

    let mut rewritten = Vec::with_capacity(ids.len());
    for id in ids {
        // Earlier rewrites drop nested widgets along with their host's children.
        let Some(slot) = find_node_by_id_mut(root, id) else {
            continue;
        };
        let element = std::mem::replace(slot, Node::text(""));
        *slot = plain_embed(element, tag_name);
        rewritten.push(id);
    }
    log::info!(
        target: "embed.fallback",
        "custom elements unavailable; rewrote {} <{tag_name}> element(s) as plain embeds",
        rewritten.len()
    );
    rewritten
}
