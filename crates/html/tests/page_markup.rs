use html::dom_utils::{assign_node_ids, collect_elements_named, find_node_by_id, outline_from_dom};
use html::{Node, outer_html, parse_document};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><style>.a > b { color: red }</style></head>
  <body>
    <!-- widgets -->
    <lazy-youtube src="https://www.youtube.com/embed/abc?start=1&amp;t=2" width="640"></lazy-youtube>
    <lazy-youtube>
      <template><iframe src="https://www.youtube.com/embed/def" allowfullscreen></iframe></template>
    </lazy-youtube>
    <p>Fish &amp; chips<br>served <img src="x.png" alt="a &quot;b&quot;"></p>
  </body>
</html>"#;

#[test]
fn page_parses_into_expected_tree() {
    let mut doc = parse_document(PAGE);
    assign_node_ids(&mut doc);

    let Node::Document { doctype, .. } = &doc else {
        panic!("root is not a document");
    };
    assert_eq!(doctype.as_deref(), Some("DOCTYPE html"));

    let mut widgets = Vec::new();
    collect_elements_named(&doc, "lazy-youtube", &mut widgets);
    assert_eq!(widgets.len(), 2, "{:#?}", outline_from_dom(&doc, 40));

    let first = find_node_by_id(&doc, widgets[0]).unwrap();
    assert_eq!(
        first.attr("src"),
        Some("https://www.youtube.com/embed/abc?start=1&t=2")
    );
    assert_eq!(first.attr("width"), Some("640"));

    let second = find_node_by_id(&doc, widgets[1]).unwrap();
    let mut embeds = Vec::new();
    collect_elements_named(second, "iframe", &mut embeds);
    assert_eq!(embeds.len(), 1);
    let embed = find_node_by_id(&doc, embeds[0]).unwrap();
    assert!(embed.has_attr("allowfullscreen"));
}

#[test]
fn serialized_page_reparses_to_the_same_tree() {
    let doc = parse_document(PAGE);
    let again = parse_document(&outer_html(&doc));
    assert_eq!(again, doc);
}

#[test]
fn style_contents_survive_untouched() {
    let out = outer_html(&parse_document(PAGE));
    assert!(out.contains("<style>.a > b { color: red }</style>"), "{out}");
    assert!(out.contains(r#"alt="a &quot;b&quot;""#), "{out}");
    assert!(out.contains("Fish &amp; chips<br>served"), "{out}");
}
