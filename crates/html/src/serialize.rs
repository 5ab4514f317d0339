//! Markup serialization for `Node` trees.
//!
//! Attribute values are always double-quoted and escaped; valueless attributes are written bare.
//! Void elements get no end tag, rawtext elements (`style`, `script`) are written unescaped.

use crate::entities::{escape_attr, escape_text};
use crate::tokenizer::{is_rawtext_element, is_void_element};
use crate::types::{Attribute, Node};

pub fn outer_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

pub fn inner_html(node: &Node) -> String {
    let mut out = String::new();
    let rawtext = node.name().is_some_and(is_rawtext_element);
    for child in node.children() {
        write_node(child, rawtext, &mut out);
    }
    out
}

pub fn write_start_tag(name: &str, attributes: &[Attribute], out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        if let Some(value) = value {
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
    }
    out.push('>');
}

pub fn write_end_tag(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

pub fn write_node(node: &Node, in_rawtext: bool, out: &mut String) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            for c in children {
                write_node(c, false, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            write_start_tag(name, attributes, out);
            if is_void_element(name) {
                return;
            }
            let rawtext = is_rawtext_element(name);
            for c in children {
                write_node(c, rawtext, out);
            }
            write_end_tag(name, out);
        }
        Node::Text { text, .. } => {
            if in_rawtext {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}
