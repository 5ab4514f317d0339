pub type NodeId = u32;

/// Stable node identity inside one document. `Id(0)` means "not yet assigned".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    pub const UNSET: Id = Id(0);
}

pub type Attribute = (String, Option<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            id: Id::UNSET,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            id: Id::UNSET,
            text: text.into(),
        }
    }

    /// Builder-style attribute setter, used when assembling subtrees by hand.
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style flag setter (`<iframe allowfullscreen>`).
    pub fn with_flag(mut self, key: &str) -> Self {
        self.set_flag(key);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: Id) {
        match self {
            Node::Document { id, .. } => *id = new_id,
            Node::Element { id, .. } => *id = new_id,
            Node::Text { id, .. } => *id = new_id,
            Node::Comment { id, .. } => *id = new_id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, target: &str) -> bool {
        self.name().is_some_and(|n| n.eq_ignore_ascii_case(target))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// True for comments and text that is only ASCII whitespace.
    pub fn is_insignificant(&self) -> bool {
        match self {
            Node::Comment { .. } => true,
            Node::Text { text, .. } => text.trim_ascii().is_empty(),
            _ => false,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Attribute value; `Some("")` for a valueless attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes()
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    /// Overwrites an existing attribute in place (keeping its position) or appends it.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.put_attr(key, Some(value.into()));
    }

    pub fn set_flag(&mut self, key: &str) {
        self.put_attr(key, None);
    }

    fn put_attr(&mut self, key: &str, value: Option<String>) {
        let Node::Element { attributes, .. } = self else {
            return;
        };
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, v)) => *v = value,
            None => attributes.push((key.to_ascii_lowercase(), value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// Appends `class` to the class list unless it is already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let merged = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }
}
