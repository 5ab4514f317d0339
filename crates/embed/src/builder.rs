//! Embed artifact construction.
//!
//! Both strategies end in `apply_forced_properties`, so the realized embed always has
//! autoplay on, the resolved geometry and the realized-embed class, whatever the author wrote.

use crate::config::{AUTOPLAY_ON, AUTOPLAY_PARAM, EMBED_ALLOW, EMBED_TAG, REALIZED_CLASS};
use crate::resolver::{Resolution, ResolvedSource};
use html::serialize::{write_end_tag, write_start_tag};
use html::{Node, Token, build_dom, tokenize};
use url::Url;

/// Returns `src` with `autoplay=1`: existing `autoplay` pairs are overwritten in place,
/// otherwise the pair is appended. Every other query segment is kept byte for byte.
pub fn force_autoplay(src: &Url) -> Url {
    let forced = format!("{AUTOPLAY_PARAM}={AUTOPLAY_ON}");
    let mut found = false;
    let mut segments: Vec<&str> = match src.query() {
        Some(query) if !query.is_empty() => query
            .split('&')
            .map(|segment| {
                let key = segment.split_once('=').map_or(segment, |(key, _)| key);
                if key == AUTOPLAY_PARAM {
                    found = true;
                    forced.as_str()
                } else {
                    segment
                }
            })
            .collect(),
        _ => Vec::new(),
    };
    if !found {
        segments.push(&forced);
    }

    let mut url = src.clone();
    url.set_query(Some(&segments.join("&")));
    url
}

pub fn apply_forced_properties(embed: &mut Node, source: &ResolvedSource) {
    embed.set_attr("src", force_autoplay(&source.src).as_str());
    embed.set_attr("width", source.width.to_string());
    embed.set_attr("height", source.height.to_string());
    if !embed.has_attr("allow") {
        embed.set_attr("allow", EMBED_ALLOW);
    }
    if !embed.has_attr("allowfullscreen") {
        embed.set_flag("allowfullscreen");
    }
    embed.add_class(REALIZED_CLASS);
}

/// Re-tags an element through its own markup: serializes the element's start and end tag,
/// renames tags called `from` to `to` at the token level and parses the result back.
///
/// Children are not carried over; the realized embed ignores content.
pub fn retag(element: &Node, from: &str, to: &str) -> Node {
    let name = element.name().unwrap_or(from);
    let mut markup = String::new();
    write_start_tag(name, element.attributes(), &mut markup);
    write_end_tag(name, &mut markup);

    let tokens: Vec<Token> = tokenize(&markup)
        .into_iter()
        .map(|token| match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } if name.eq_ignore_ascii_case(from) => Token::StartTag {
                name: to.to_string(),
                attributes,
                self_closing,
            },
            Token::EndTag(name) if name.eq_ignore_ascii_case(from) => Token::EndTag(to.to_string()),
            other => other,
        })
        .collect();

    let mut retagged = build_dom(&tokens)
        .children()
        .iter()
        .find(|c| c.is_element_named(to))
        .cloned()
        .unwrap_or_else(|| Node::Element {
            id: html::Id::UNSET,
            name: to.to_string(),
            attributes: element.attributes().to_vec(),
            children: Vec::new(),
        });
    retagged.set_id(element.id());
    retagged
}

/// Derive-from-self: the widget element re-tagged into an embed, then forced.
pub fn derive_from_self(element: &Node, tag_name: &str, source: &ResolvedSource) -> Node {
    let mut embed = retag(element, tag_name, EMBED_TAG);
    embed.set_id(html::Id::UNSET);
    apply_forced_properties(&mut embed, source);
    embed
}

/// Derive-from-fallback: the authored embed, mutated in place.
pub fn derive_from_fallback(mut embed: Node, source: &ResolvedSource) -> Node {
    apply_forced_properties(&mut embed, source);
    embed
}

/// Picks the strategy matching how the source was resolved.
pub fn build_artifact(element: &Node, tag_name: &str, resolution: &mut Resolution) -> Node {
    match resolution.fallback_embed.take() {
        Some(embed) => derive_from_fallback(embed, &resolution.source),
        None => derive_from_self(element, tag_name, &resolution.source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use html::{outer_html, parse_fragment};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn autoplay_is_appended_when_absent() {
        let out = force_autoplay(&url("https://www.youtube.com/embed/abc"));
        assert_eq!(out.as_str(), "https://www.youtube.com/embed/abc?autoplay=1");
    }

    #[test]
    fn autoplay_is_overwritten_in_place() {
        let out = force_autoplay(&url(
            "https://www.youtube.com/embed/abc?autoplay=0&start=30&rel=0",
        ));
        assert_eq!(
            out.as_str(),
            "https://www.youtube.com/embed/abc?autoplay=1&start=30&rel=0"
        );
    }

    #[test]
    fn autoplay_keeps_other_params_and_fragment() {
        let out = force_autoplay(&url("https://www.youtube.com/embed/abc?start=30#t"));
        assert_eq!(
            out.as_str(),
            "https://www.youtube.com/embed/abc?start=30&autoplay=1#t"
        );
    }

    #[test]
    fn autoplay_leaves_authored_segments_untouched() {
        let out = force_autoplay(&url("https://www.youtube.com/embed/abc?rel&t=a%20b&x=a~b"));
        assert_eq!(
            out.as_str(),
            "https://www.youtube.com/embed/abc?rel&t=a%20b&x=a~b&autoplay=1"
        );

        let out = force_autoplay(&url("https://www.youtube.com/embed/abc?list=a+b&autoplay&end=9"));
        assert_eq!(
            out.as_str(),
            "https://www.youtube.com/embed/abc?list=a+b&autoplay=1&end=9"
        );
    }

    #[test]
    fn retag_renames_tags_but_not_attribute_values() {
        let element = parse_fragment(
            r#"<lazy-youtube class="lazy-youtube big" src="https://www.youtube.com/embed/a"></lazy-youtube>"#,
        )
        .remove(0);
        let retagged = retag(&element, "lazy-youtube", "iframe");
        assert_eq!(
            outer_html(&retagged),
            r#"<iframe class="lazy-youtube big" src="https://www.youtube.com/embed/a"></iframe>"#
        );
    }

    #[test]
    fn derive_from_self_forces_properties_and_keeps_caller_attributes() {
        let mut element = parse_fragment(
            r#"<lazy-youtube src="https://www.youtube.com/embed/a?autoplay=0" width="320" class="hero" title="Demo" allow="autoplay"></lazy-youtube>"#,
        )
        .remove(0);
        let mut resolution = resolve(&mut element).unwrap();
        let embed = build_artifact(&element, "lazy-youtube", &mut resolution);

        assert!(embed.is_element_named("iframe"));
        assert_eq!(embed.attr("src"), Some("https://www.youtube.com/embed/a?autoplay=1"));
        assert_eq!(embed.attr("width"), Some("320"));
        assert_eq!(embed.attr("height"), Some("315"));
        assert_eq!(embed.attr("class"), Some("hero lazytube__iframe"));
        assert_eq!(embed.attr("title"), Some("Demo"));
        assert_eq!(embed.attr("allow"), Some("autoplay"));
        assert!(embed.has_attr("allowfullscreen"));
    }

    #[test]
    fn derive_from_fallback_reuses_the_authored_node() {
        let mut element = parse_fragment(
            r#"<lazy-youtube><template><iframe src="https://www.youtube.com/embed/abc123?start=30" width="640" height="360" referrerpolicy="strict-origin" data-x="1"></iframe></template></lazy-youtube>"#,
        )
        .remove(0);
        let mut resolution = resolve(&mut element).unwrap();
        let embed = build_artifact(&element, "lazy-youtube", &mut resolution);

        let keys: Vec<&str> = embed.attributes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            [
                "src",
                "width",
                "height",
                "referrerpolicy",
                "data-x",
                "allow",
                "allowfullscreen",
                "class"
            ]
        );
        let src = embed.attr("src").unwrap();
        assert!(src.contains("start=30"), "{src}");
        assert!(src.contains("autoplay=1"), "{src}");
        assert_eq!(embed.attr("allow"), Some(EMBED_ALLOW));
        assert!(resolution.fallback_embed.is_none());
    }
}
