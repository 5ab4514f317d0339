use crate::config::DISABLE_LAZY_MARKER;
use html::Node;

/// Deferred-loading image.
///
/// With native lazy loading disabled the image carries a marker attribute instead of
/// `loading="lazy"`, leaving the decision to a page-level lazy loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    pub disable_native_lazy: bool,
}

impl LazyImage {
    pub fn into_node(self, class: &str) -> Node {
        let img = Node::element("img")
            .with_attr("class", class)
            .with_attr("src", self.src)
            .with_attr("width", self.width.to_string())
            .with_attr("height", self.height.to_string())
            .with_attr("alt", self.alt)
            .with_attr("decoding", "async");
        if self.disable_native_lazy {
            img.with_flag(DISABLE_LAZY_MARKER)
        } else {
            img.with_attr("loading", "lazy")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(disable_native_lazy: bool) -> LazyImage {
        LazyImage {
            src: "https://img.youtube.com/vi/a/maxresdefault.jpg".to_string(),
            alt: "thumb".to_string(),
            width: 640,
            height: 360,
            disable_native_lazy,
        }
    }

    #[test]
    fn native_lazy_loading_by_default() {
        let node = image(false).into_node("thumb");
        assert_eq!(node.attr("loading"), Some("lazy"));
        assert!(!node.has_attr(DISABLE_LAZY_MARKER));
        assert_eq!(node.attr("width"), Some("640"));
        assert_eq!(node.attr("height"), Some("360"));
    }

    #[test]
    fn disabled_native_lazy_loading_leaves_a_marker() {
        let node = image(true).into_node("thumb");
        assert!(node.attr("loading").is_none());
        assert!(node.has_attr(DISABLE_LAZY_MARKER));
    }
}
