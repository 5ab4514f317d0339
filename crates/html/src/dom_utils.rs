use crate::{Id, Node};

/// Assigns ids to every node still carrying `Id::UNSET`, continuing after the largest id
/// already present so that existing ids stay stable.
pub fn assign_node_ids(root: &mut Node) {
    assign_node_ids_after(root, Id::UNSET);
}

/// Like [`assign_node_ids`], but numbers new nodes after `floor` as well, for trees whose ids
/// must not collide with nodes held outside of them.
pub fn assign_node_ids_after(root: &mut Node, floor: Id) {
    fn walk(node: &mut Node, next: &mut u32) {
        if node.id() == Id::UNSET {
            node.set_id(Id(*next));
            *next = next.wrapping_add(1);
        }
        if let Some(children) = node.children_mut() {
            for c in children {
                walk(c, next);
            }
        }
    }

    let mut next = max_node_id(root).max(floor).0 + 1;
    walk(root, &mut next);
}

pub fn max_node_id(root: &Node) -> Id {
    root.children()
        .iter()
        .map(max_node_id)
        .fold(root.id(), Ord::max)
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|c| find_node_by_id(c, id))
}

pub fn find_node_by_id_mut(node: &mut Node, id: Id) -> Option<&mut Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut()?
        .iter_mut()
        .find_map(|c| find_node_by_id_mut(c, id))
}

/// Ids of every element named `name`, in document order.
pub fn collect_elements_named(node: &Node, name: &str, out: &mut Vec<Id>) {
    if node.is_element_named(name) {
        out.push(node.id());
    }
    for c in node.children() {
        collect_elements_named(c, name, out);
    }
}

/// Ids of every element whose class list contains `class`, in document order.
pub fn collect_elements_with_class(node: &Node, class: &str, out: &mut Vec<Id>) {
    if node.has_class(class) {
        out.push(node.id());
    }
    for c in node.children() {
        collect_elements_with_class(c, class, out);
    }
}

/// Where a detached node used to live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub parent: Id,
    pub index: usize,
}

/// Removes the node with `id` from the tree and returns it with its former position.
/// The root itself cannot be detached.
pub fn detach_node(root: &mut Node, id: Id) -> Option<(Position, Node)> {
    let parent_id = root.id();
    let children = root.children_mut()?;
    if let Some(index) = children.iter().position(|c| c.id() == id) {
        let node = children.remove(index);
        return Some((
            Position {
                parent: parent_id,
                index,
            },
            node,
        ));
    }
    children.iter_mut().find_map(|c| detach_node(c, id))
}

/// Inserts `node` under `parent` at `index` (clamped to the child count).
/// Hands the node back if the parent is missing or cannot hold children.
pub fn insert_child(root: &mut Node, parent: Id, index: usize, node: Node) -> Result<(), Node> {
    let Some(children) = find_node_by_id_mut(root, parent).and_then(Node::children_mut) else {
        return Err(node);
    };
    let index = index.min(children.len());
    children.insert(index, node);
    Ok(())
}

pub fn outline_from_dom(root: &Node, cap: usize) -> Vec<String> {
    fn walk(node: &Node, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        match node {
            Node::Document {
                doctype, children, ..
            } => {
                match doctype {
                    Some(dt) => out.push(format!("{indent}<!{dt}>")),
                    None => out.push(format!("{indent}#document")),
                }
                for c in children {
                    walk(c, depth + 1, out, left);
                }
            }
            Node::Element { name, children, .. } => {
                let mut line = format!("{indent}<{name}");
                for key in ["id", "class", "src", "width", "height"] {
                    if let Some(v) = node.attr(key).filter(|v| !v.is_empty()) {
                        line.push_str(&format!(r#" {key}="{v}""#));
                    }
                }
                line.push('>');
                out.push(line);
                for c in children {
                    walk(c, depth + 1, out, left);
                }
            }
            Node::Text { text, .. } => {
                let t = text.replace('\n', " ").trim().to_string();
                if !t.is_empty() {
                    out.push(format!("{indent}\"{}\"", shorten(&t)));
                }
            }
            Node::Comment { text, .. } => {
                out.push(format!("{indent}<!-- {} -->", shorten(&text.replace('\n', " "))));
            }
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(root, 0, &mut out, &mut left);
    out
}

fn shorten(t: &str) -> String {
    match t.char_indices().nth(40) {
        Some((cut, _)) => format!("{}…", &t[..cut]),
        None => t.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    fn doc() -> Node {
        let mut doc = parse_document(
            r#"<body><lazy-youtube src="a"></lazy-youtube><p class="dom-complete-time x"></p><lazy-youtube src="b"></lazy-youtube></body>"#,
        );
        assign_node_ids(&mut doc);
        doc
    }

    #[test]
    fn assign_node_ids_keeps_existing_ids() {
        let mut doc = doc();
        let before = max_node_id(&doc);
        let mut ids = Vec::new();
        collect_elements_named(&doc, "lazy-youtube", &mut ids);

        if let Some(children) = find_node_by_id_mut(&mut doc, ids[0]).and_then(Node::children_mut) {
            children.push(Node::element("span"));
        }
        assign_node_ids(&mut doc);

        let mut again = Vec::new();
        collect_elements_named(&doc, "lazy-youtube", &mut again);
        assert_eq!(ids, again);
        let span = &find_node_by_id(&doc, ids[0]).unwrap().children()[0];
        assert_eq!(span.id(), Id(before.0 + 1));
    }

    #[test]
    fn assign_node_ids_after_skips_ids_held_elsewhere() {
        let mut doc = doc();
        let held = max_node_id(&doc);
        let mut extra = Node::element("span").with_child(Node::text("x"));
        assign_node_ids_after(&mut extra, Id(held.0 + 10));
        assert_eq!(extra.id(), Id(held.0 + 11));
        assert_eq!(extra.children()[0].id(), Id(held.0 + 12));

        // A floor below the tree's own ids changes nothing.
        let before = doc.clone();
        assign_node_ids_after(&mut doc, Id(1));
        assert_eq!(doc, before);
    }

    #[test]
    fn collect_by_class_matches_whole_tokens() {
        let doc = doc();
        let mut ids = Vec::new();
        collect_elements_with_class(&doc, "dom-complete-time", &mut ids);
        assert_eq!(ids.len(), 1);
        let mut none = Vec::new();
        collect_elements_with_class(&doc, "dom-complete", &mut none);
        assert!(none.is_empty());
    }

    #[test]
    fn detach_then_insert_restores_position() {
        let mut doc = doc();
        let mut ids = Vec::new();
        collect_elements_named(&doc, "lazy-youtube", &mut ids);
        let original = doc.clone();

        let (pos, node) = detach_node(&mut doc, ids[1]).unwrap();
        assert_eq!(pos.index, 2);
        assert!(find_node_by_id(&doc, ids[1]).is_none());

        insert_child(&mut doc, pos.parent, pos.index, node).unwrap();
        assert_eq!(doc, original);
    }

    #[test]
    fn outline_lists_identifying_attributes() {
        let doc = doc();
        let lines = outline_from_dom(&doc, 10);
        assert_eq!(lines[0], "#document");
        assert_eq!(lines[2], r#"    <lazy-youtube src="a">"#);
    }
}
