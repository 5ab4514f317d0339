//! Source resolution: turns a widget element's declared configuration into a validated
//! video id, display geometry and parsed embed URL.
//!
//! Resolution never mutates the element unless it succeeds; the only mutation is moving the
//! fallback embed out of its block, which happens after every check has passed.

use crate::config::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, DISABLE_LAZY_ATTR, EMBED_TAG, FALLBACK_BLOCKS, SOURCE_GRAMMAR,
    THUMBNAIL_BASE, THUMBNAIL_FILE,
};
use crate::error::{EmbedError, MarkupProblem};
use html::Node;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    AttributeUrl,
    FallbackMarkup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub video_id: String,
    pub src: Url,
    pub width: u32,
    pub height: u32,
    pub mode: SourceMode,
    pub disable_native_lazy: bool,
}

impl ResolvedSource {
    pub fn thumbnail_url(&self) -> String {
        thumbnail_url(&self.video_id)
    }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!(
        "{THUMBNAIL_BASE}/{}/{THUMBNAIL_FILE}",
        utf8_percent_encode(video_id, PATH_SEGMENT)
    )
}

#[derive(Debug)]
pub struct Resolution {
    pub source: ResolvedSource,
    /// The embed moved out of the fallback block (`FallbackMarkup` only).
    pub fallback_embed: Option<Node>,
}

/// Matches `src` against the provider grammar and returns the video id with the parsed URL.
pub fn match_source(src: &str) -> Result<(String, Url), EmbedError> {
    let invalid = || EmbedError::InvalidSource {
        src: src.to_string(),
    };
    let id = SOURCE_GRAMMAR
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(invalid)?;
    let url = Url::parse(src).map_err(|_| invalid())?;
    Ok((id, url))
}

/// Positive integer or `default`. Never fails.
pub fn parse_dimension(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn flag_is_set(element: &Node, key: &str) -> bool {
    element
        .attr(key)
        .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"))
}

/// Locates the single significant child of the fallback block.
/// Returns `(block index, child index)` within the element and the block.
pub fn locate_fallback_embed(element: &Node) -> Result<(usize, usize), MarkupProblem> {
    let (block_index, block) = element
        .children()
        .iter()
        .enumerate()
        .find(|(_, c)| FALLBACK_BLOCKS.iter().any(|b| c.is_element_named(b)))
        .ok_or(MarkupProblem::MissingFallback)?;

    let significant: Vec<(usize, &Node)> = block
        .children()
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_insignificant())
        .collect();
    let &[(child_index, child)] = significant.as_slice() else {
        return Err(MarkupProblem::ChildCount(significant.len()));
    };
    if !child.is_element_named(EMBED_TAG) {
        let found = match child.name() {
            Some(name) => format!("<{name}>"),
            None => "text".to_string(),
        };
        return Err(MarkupProblem::UnexpectedChild(found));
    }
    Ok((block_index, child_index))
}

pub fn resolve(element: &mut Node) -> Result<Resolution, EmbedError> {
    let disable_native_lazy = flag_is_set(element, DISABLE_LAZY_ATTR);

    if let Some(src) = element.attr("src") {
        let (video_id, src) = match_source(src)?;
        log::trace!(target: "embed.resolver", "attribute source, video id {video_id}");
        return Ok(Resolution {
            source: ResolvedSource {
                video_id,
                src,
                width: parse_dimension(element.attr("width"), DEFAULT_WIDTH),
                height: parse_dimension(element.attr("height"), DEFAULT_HEIGHT),
                mode: SourceMode::AttributeUrl,
                disable_native_lazy,
            },
            fallback_embed: None,
        });
    }

    let (block_index, child_index) = locate_fallback_embed(element)?;
    let embed = &element.children()[block_index].children()[child_index];
    let raw_src = embed.attr("src").unwrap_or("");
    let (video_id, src) = match_source(raw_src)?;
    let width = parse_dimension(embed.attr("width"), DEFAULT_WIDTH);
    let height = parse_dimension(embed.attr("height"), DEFAULT_HEIGHT);

    // Everything validated; take ownership of the authored embed.
    let embed = element
        .children_mut()
        .and_then(|children| children[block_index].children_mut())
        .map(|block| block.remove(child_index))
        .ok_or(MarkupProblem::MissingFallback)?;
    log::trace!(target: "embed.resolver", "fallback source, video id {video_id}");

    Ok(Resolution {
        source: ResolvedSource {
            video_id,
            src,
            width,
            height,
            mode: SourceMode::FallbackMarkup,
            disable_native_lazy,
        },
        fallback_embed: Some(embed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_fragment;

    fn element(markup: &str) -> Node {
        parse_fragment(markup).remove(0)
    }

    #[test]
    fn attribute_source_uses_capture_group_and_defaults() {
        let mut el = element(r#"<lazy-youtube src="https://www.youtube.com/embed/dQw4w9WgXcQ">"#);
        let res = resolve(&mut el).unwrap();
        assert_eq!(res.source.video_id, "dQw4w9WgXcQ");
        assert_eq!((res.source.width, res.source.height), (560, 315));
        assert_eq!(res.source.mode, SourceMode::AttributeUrl);
        assert!(res.fallback_embed.is_none());
        assert_eq!(
            res.source.thumbnail_url(),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn dimensions_fall_back_per_axis() {
        assert_eq!(parse_dimension(Some("640"), 560), 640);
        assert_eq!(parse_dimension(Some(" 640 "), 560), 640);
        assert_eq!(parse_dimension(Some(""), 560), 560);
        assert_eq!(parse_dimension(Some("wide"), 560), 560);
        assert_eq!(parse_dimension(Some("0"), 560), 560);
        assert_eq!(parse_dimension(Some("-5"), 560), 560);
        assert_eq!(parse_dimension(Some("640px"), 560), 560);
        assert_eq!(parse_dimension(None, 315), 315);

        let mut el = element(
            r#"<lazy-youtube src="https://www.youtube.com/embed/abc" width="800" height="tall">"#,
        );
        let res = resolve(&mut el).unwrap();
        assert_eq!((res.source.width, res.source.height), (800, 315));
    }

    #[test]
    fn malformed_sources_are_rejected() {
        for src in [
            "",
            "https://www.youtube.com/watch?v=abc",
            "https://www.youtube.com/embed/",
            "http://www.youtube.com/embed/abc",
            "https://www.evil.com/embed/abc",
            "https://www.youtube.com/embed/abc-def",
            "https://www.youtube.com/embed/abc\"><script>",
        ] {
            let mut markup = String::from(r#"<lazy-youtube src=""#);
            html::escape_attr(src, &mut markup);
            markup.push_str(r#"">"#);
            let mut el = element(&markup);
            let err = resolve(&mut el).unwrap_err();
            assert_eq!(
                err,
                EmbedError::InvalidSource {
                    src: src.to_string()
                }
            );
        }
    }

    #[test]
    fn fallback_embed_is_moved_out_of_its_block() {
        let mut el = element(
            r#"<lazy-youtube><template>
                <iframe src="https://www.youtube.com/embed/abc123?start=30" width="640" height="360" title="Talk"></iframe>
            </template></lazy-youtube>"#,
        );
        let res = resolve(&mut el).unwrap();
        assert_eq!(res.source.mode, SourceMode::FallbackMarkup);
        assert_eq!(res.source.video_id, "abc123");
        assert_eq!((res.source.width, res.source.height), (640, 360));
        let embed = res.fallback_embed.unwrap();
        assert_eq!(embed.attr("title"), Some("Talk"));

        let block = &el.children()[0];
        assert!(block.children().iter().all(Node::is_insignificant));
    }

    #[test]
    fn fallback_shape_errors() {
        let cases = [
            ("<lazy-youtube></lazy-youtube>", MarkupProblem::MissingFallback),
            (
                "<lazy-youtube><template> <!-- none --> </template></lazy-youtube>",
                MarkupProblem::ChildCount(0),
            ),
            (
                "<lazy-youtube><template><iframe></iframe><iframe></iframe></template></lazy-youtube>",
                MarkupProblem::ChildCount(2),
            ),
            (
                "<lazy-youtube><noscript><video></video></noscript></lazy-youtube>",
                MarkupProblem::UnexpectedChild("<video>".to_string()),
            ),
            (
                "<lazy-youtube><template>watch here</template></lazy-youtube>",
                MarkupProblem::UnexpectedChild("text".to_string()),
            ),
        ];
        for (markup, expected) in cases {
            let mut el = element(markup);
            assert_eq!(
                resolve(&mut el).unwrap_err(),
                EmbedError::InvalidMarkup(expected),
                "{markup}"
            );
        }
    }

    #[test]
    fn failed_fallback_source_leaves_element_untouched() {
        let markup = r#"<lazy-youtube><template><iframe src="https://vimeo.com/1"></iframe></template></lazy-youtube>"#;
        let mut el = element(markup);
        let before = el.clone();
        assert!(matches!(
            resolve(&mut el),
            Err(EmbedError::InvalidSource { .. })
        ));
        assert_eq!(el, before);
    }

    #[test]
    fn lazy_flag_is_boolean_style() {
        let mut on = element(
            r#"<lazy-youtube src="https://www.youtube.com/embed/a" disable-native-lazy-loading>"#,
        );
        assert!(resolve(&mut on).unwrap().source.disable_native_lazy);
        let mut off = element(
            r#"<lazy-youtube src="https://www.youtube.com/embed/a" disable-native-lazy-loading="false">"#,
        );
        assert!(!resolve(&mut off).unwrap().source.disable_native_lazy);
    }

    #[test]
    fn thumbnail_id_is_percent_encoded() {
        assert_eq!(
            thumbnail_url("a/b?c"),
            "https://img.youtube.com/vi/a%2Fb%3Fc/maxresdefault.jpg"
        );
        assert_eq!(
            thumbnail_url("ab_c"),
            "https://img.youtube.com/vi/ab_c/maxresdefault.jpg"
        );
    }
}
