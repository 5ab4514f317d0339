//! Minimal HTML node model, tokenizer, tree builder and serializer.

pub mod dom_utils;
pub mod serialize;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::dom_builder::{build_dom, parse_document, parse_fragment};
pub use crate::entities::{escape_attr, escape_text};
pub use crate::serialize::{inner_html, outer_html};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Attribute, Id, Node, NodeId, Token};

