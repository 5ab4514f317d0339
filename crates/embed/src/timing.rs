//! Page-load timing display. Independent of the widget; it only writes text into the page.

use html::Node;
use html::dom_utils::{collect_elements_with_class, find_node_by_id_mut};

pub const DISPLAY_CLASS: &str = "dom-complete-time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// The navigation timing entry fields the reporter reads, in milliseconds since navigation start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationTiming {
    pub dom_complete_ms: f64,
}

pub fn format_duration(ms: f64) -> String {
    format!("{}ms", ms.round().max(0.0) as u64)
}

/// Writes the rounded `domComplete` duration into every display element once the document is
/// complete. Returns how many elements were updated.
///
/// The new text nodes carry `Id::UNSET`; numbering them is up to the owner of the document.
pub fn report_dom_complete(document: &mut Node, state: ReadyState, timing: NavigationTiming) -> usize {
    if state != ReadyState::Complete {
        return 0;
    }
    let text = format_duration(timing.dom_complete_ms);
    let mut ids = Vec::new();
    collect_elements_with_class(document, DISPLAY_CLASS, &mut ids);

    let mut written = 0;
    for id in ids {
        if let Some(children) = find_node_by_id_mut(document, id).and_then(Node::children_mut) {
            *children = vec![Node::text(text.clone())];
            written += 1;
        }
    }
    log::debug!(target: "embed.timing", "dom complete after {text}, {written} display(s) updated");
    written
}
