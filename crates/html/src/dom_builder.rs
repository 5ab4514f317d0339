use crate::tokenizer::tokenize;
use crate::types::{Id, Node, Token};

/// Builds a document tree from a token list.
///
/// Tree construction is deliberately simple: end tags close the nearest open element with the
/// same name (popping anything opened after it), unmatched end tags are ignored, and elements
/// still open at end of input are closed implicitly.
pub fn build_dom(tokens: &[Token]) -> Node {
    let mut doctype = None;
    let mut builder = OpenElements::new();

    for token in tokens {
        match token {
            Token::Doctype(s) => doctype = Some(s.clone()),
            Token::Comment(c) => builder.append(Node::Comment {
                id: Id::UNSET,
                text: c.clone(),
            }),
            Token::Text(t) => {
                if !t.is_empty() {
                    builder.append(Node::text(t.clone()));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Node::Element {
                    id: Id::UNSET,
                    name: name.clone(),
                    attributes: attributes.clone(),
                    children: Vec::new(),
                };
                if *self_closing {
                    builder.append(element);
                } else {
                    builder.open(element);
                }
            }
            Token::EndTag(name) => builder.close(name),
        }
    }

    Node::Document {
        id: Id::UNSET,
        doctype,
        children: builder.finish(),
    }
}

pub fn parse_document(input: &str) -> Node {
    build_dom(&tokenize(input))
}

/// Parses markup into a detached list of top-level nodes.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    match parse_document(input) {
        Node::Document { children, .. } => children,
        other => vec![other],
    }
}

struct OpenElements {
    roots: Vec<Node>,
    stack: Vec<Node>,
}

impl OpenElements {
    fn new() -> Self {
        Self {
            roots: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut().and_then(Node::children_mut) {
            Some(children) => children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, element: Node) {
        self.stack.push(element);
    }

    fn close(&mut self, name: &str) {
        if !self.stack.iter().any(|n| n.is_element_named(name)) {
            log::trace!(target: "html.builder", "ignoring unmatched </{name}>");
            return;
        }
        while let Some(top) = self.stack.pop() {
            let done = top.is_element_named(name);
            self.append(top);
            if done {
                break;
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while let Some(top) = self.stack.pop() {
            self.append(top);
        }
        self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fragment_nests_children() {
        let nodes = parse_fragment(
            r#"<lazy-youtube><template><iframe src="x"></iframe></template></lazy-youtube>"#,
        );
        assert_eq!(nodes.len(), 1);
        let host = &nodes[0];
        assert!(host.is_element_named("lazy-youtube"));
        let template = &host.children()[0];
        assert!(template.is_element_named("template"));
        assert_eq!(template.children()[0].attr("src"), Some("x"));
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let nodes = parse_fragment("<div>a</span>b</div>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children(), &[Node::text("a"), Node::text("b")]);
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let nodes = parse_fragment("<div><p>one<div2>two</div><p>three");
        assert_eq!(nodes.len(), 2);
        let div = &nodes[0];
        assert_eq!(div.children().len(), 1);
        assert!(div.children()[0].is_element_named("p"));
        assert!(nodes[1].is_element_named("p"));
    }

    #[test]
    fn build_dom_deep_nesting() {
        let depth = 2_000;
        let mut tokens = Vec::with_capacity(depth * 2);
        for _ in 0..depth {
            tokens.push(Token::StartTag {
                name: "div".to_string(),
                attributes: Vec::new(),
                self_closing: false,
            });
        }
        for _ in 0..depth {
            tokens.push(Token::EndTag("div".to_string()));
        }
        let dom = build_dom(&tokens);
        let mut current = &dom.children()[0];
        let mut seen = 1;
        while let Some(child) = current.children().first() {
            current = child;
            seen += 1;
        }
        assert_eq!(seen, depth);
    }
}
