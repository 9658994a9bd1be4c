//! Edge case tests for malformed and unusual HTML

use slim_dom::{HTML_NAMESPACE, NodeId, Shape, TreeAdapter};
use slim_html::{HtmlParser, ParseConfig, ParsedDocument};

fn body(doc: &ParsedDocument) -> NodeId {
    let adapter = doc.adapter();
    let html = doc.document_element().unwrap();
    adapter
        .get_child_nodes(html)
        .unwrap()
        .iter()
        .copied()
        .find(|&child| adapter.get_tag_name(child).ok() == Some("body"))
        .unwrap()
}

fn head(doc: &ParsedDocument) -> NodeId {
    let html = doc.document_element().unwrap();
    doc.adapter().get_first_child(html).unwrap().unwrap()
}

fn tag(adapter: &TreeAdapter, node: NodeId) -> &str {
    adapter.get_tag_name(node).unwrap()
}

fn text(adapter: &TreeAdapter, node: NodeId) -> &str {
    adapter.get_text_node_content(node).unwrap()
}

// ============================================================================
// Tree Construction Recovery Tests
// ============================================================================

#[test]
fn test_foster_parented_text() {
    let doc = slim_html::parse("<table><tr><td>a</td></tr>x</table>").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(body(&doc)).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(text(adapter, children[0]), "x");
    assert_eq!(tag(adapter, children[1]), "table");

    // The table itself keeps its implied tbody.
    let tbody = adapter.get_first_child(children[1]).unwrap().unwrap();
    assert_eq!(tag(adapter, tbody), "tbody");
}

#[test]
fn test_foster_parented_element() {
    let doc = slim_html::parse("<table><tr><td>a</td></tr><span>s</span></table>").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(body(&doc)).unwrap();
    assert_eq!(tag(adapter, children[0]), "span");
    assert_eq!(tag(adapter, children[1]), "table");
    assert_eq!(adapter.get_parent_node(children[0]), Some(body(&doc)));
}

#[test]
fn test_fostered_text_runs_land_before_table() {
    let doc = slim_html::parse("<table>a<tr><td>c</td></tr>b</table>").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(body(&doc)).unwrap();
    let (table, before) = children.split_last().unwrap();
    assert_eq!(tag(adapter, *table), "table");

    let fostered: String = before.iter().map(|&node| text(adapter, node)).collect();
    assert_eq!(fostered, "ab");
}

#[test]
fn test_adoption_agency_reparents_children() {
    let doc = slim_html::parse("<b>1<p>2</b>3</p>").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(body(&doc)).unwrap();
    assert_eq!(children.len(), 2);

    let (b, p) = (children[0], children[1]);
    assert_eq!(tag(adapter, b), "b");
    assert_eq!(text(adapter, adapter.get_first_child(b).unwrap().unwrap()), "1");

    assert_eq!(tag(adapter, p), "p");
    let p_children = adapter.get_child_nodes(p).unwrap();
    assert_eq!(p_children.len(), 2);
    assert_eq!(tag(adapter, p_children[0]), "b");
    assert_eq!(text(adapter, adapter.get_first_child(p_children[0]).unwrap().unwrap()), "2");
    assert_eq!(text(adapter, p_children[1]), "3");

    // Reparented nodes point at their new parent.
    let inner = adapter.get_first_child(p_children[0]).unwrap().unwrap();
    assert_eq!(adapter.get_parent_node(inner), Some(p_children[0]));
}

#[test]
fn test_html_attributes_are_merged_not_overwritten() {
    let doc = slim_html::parse("<html lang=en><body><html lang=fr data-x=1>").unwrap();
    let adapter = doc.adapter();

    let html = doc.document_element().unwrap();
    assert_eq!(adapter.get_attribute(html, "lang").unwrap(), Some("en"));
    assert_eq!(adapter.get_attribute(html, "data-x").unwrap(), Some("1"));
    assert_eq!(adapter.get_attr_list(html).unwrap().len(), 2);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let doc = slim_html::parse("<p id=a id=b>x</p>").unwrap();
    let adapter = doc.adapter();

    let p = adapter.get_first_child(body(&doc)).unwrap().unwrap();
    assert_eq!(adapter.get_attribute(p, "id").unwrap(), Some("a"));
    assert!(!doc.errors().is_empty());
}

// ============================================================================
// Document Type Tests
// ============================================================================

#[test]
fn test_comment_before_doctype() {
    let doc = slim_html::parse("<!-- lead --><!DOCTYPE html><p>x</p>").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(doc.document()).unwrap();
    assert_eq!(children.len(), 3);
    // The document type is always placed first.
    assert!(adapter.is_document_type_node(children[0]));
    assert_eq!(adapter.get_comment_node_content(children[1]).unwrap(), " lead ");
    assert!(adapter.is_element_node(children[2]));
}

#[test]
fn test_legacy_doctype_identifiers() {
    let html = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><p>x"#;
    let doc = slim_html::parse(html).unwrap();
    let adapter = doc.adapter();

    let doctype = adapter.get_first_child(doc.document()).unwrap().unwrap();
    assert_eq!(adapter.get_document_type_node_name(doctype).unwrap(), "html");
    assert_eq!(
        adapter.get_document_type_node_public_id(doctype).unwrap(),
        "-//W3C//DTD HTML 4.01//EN"
    );
    assert_eq!(
        adapter.get_document_type_node_system_id(doctype).unwrap(),
        "http://www.w3.org/TR/html4/strict.dtd"
    );
}

#[test]
fn test_drop_doctype_config() {
    let config = ParseConfig {
        drop_doctype: true,
        ..ParseConfig::default()
    };
    let doc = HtmlParser::with_config(config).parse("<!DOCTYPE html><p>x").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(doc.document()).unwrap();
    assert_eq!(children.len(), 1);
    assert!(adapter.is_element_node(children[0]));
}

#[test]
fn test_quirks_mode_is_not_tracked() {
    // No doctype puts html5ever in quirks mode; the adapter ignores it.
    let doc = slim_html::parse("<p>x</p>").unwrap();
    assert!(!doc.adapter().is_quirks_mode(doc.document()));
}

// ============================================================================
// Template Tests
// ============================================================================

#[test]
fn test_template_content_is_element_children() {
    let doc = slim_html::parse("<template><tr><td>x</td></tr></template>").unwrap();
    let adapter = doc.adapter();

    let template = adapter.get_first_child(head(&doc)).unwrap().unwrap();
    assert_eq!(tag(adapter, template), "template");

    let content = adapter.get_template_content(template).unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(tag(adapter, content[0]), "tr");
    assert_eq!(adapter.get_parent_node(content[0]), Some(template));

    let td = adapter.get_first_child(content[0]).unwrap().unwrap();
    assert_eq!(tag(adapter, td), "td");
}

#[test]
fn test_nested_templates() {
    let doc = slim_html::parse("<template><template><b>x</b></template></template>").unwrap();
    let adapter = doc.adapter();

    let outer = adapter.get_first_child(head(&doc)).unwrap().unwrap();
    let inner = adapter.get_template_content(outer).unwrap()[0];
    assert_eq!(tag(adapter, inner), "template");

    let b = adapter.get_template_content(inner).unwrap()[0];
    assert_eq!(tag(adapter, b), "b");
}

// ============================================================================
// Foreign Content and Input Tests
// ============================================================================

#[test]
fn test_foreign_elements_report_html_namespace() {
    let doc = slim_html::parse("<svg viewBox='0 0 1 1'><circle r=1 /></svg>").unwrap();
    let adapter = doc.adapter();

    let svg = adapter.get_first_child(body(&doc)).unwrap().unwrap();
    assert_eq!(tag(adapter, svg), "svg");
    assert_eq!(adapter.get_namespace_uri(svg).unwrap(), HTML_NAMESPACE);

    let circle = adapter.get_first_child(svg).unwrap().unwrap();
    assert_eq!(tag(adapter, circle), "circle");
    assert!(adapter.get_child_nodes(circle).unwrap().is_empty());
}

#[test]
fn test_processing_instruction_becomes_comment() {
    let doc = slim_html::parse(r#"<?xml version="1.0"?><p>x</p>"#).unwrap();
    let adapter = doc.adapter();

    let first = adapter.get_first_child(doc.document()).unwrap().unwrap();
    assert_eq!(adapter.shape(first).unwrap(), Shape::Comment);
    assert_eq!(
        adapter.get_comment_node_content(first).unwrap(),
        r#"?xml version="1.0"?"#
    );
}

#[test]
fn test_empty_input() {
    let doc = slim_html::parse("").unwrap();
    let adapter = doc.adapter();

    let html = doc.document_element().unwrap();
    let tags: Vec<&str> = adapter
        .get_child_nodes(html)
        .unwrap()
        .iter()
        .map(|&child| tag(adapter, child))
        .collect();
    assert_eq!(tags, vec!["head", "body"]);
    assert!(adapter.get_child_nodes(body(&doc)).unwrap().is_empty());
}

#[test]
fn test_text_after_html_end_goes_to_body() {
    let doc = slim_html::parse("<p>a</p></body></html>tail").unwrap();
    let adapter = doc.adapter();

    let children = adapter.get_child_nodes(body(&doc)).unwrap();
    let last = *children.last().unwrap();
    assert_eq!(text(adapter, last), "tail");
}

#[test]
fn test_long_text_runs_reuse_one_node() {
    let html = format!("<p>{}</p>", "a&amp;".repeat(2000));
    let doc = slim_html::parse(&html).unwrap();
    let adapter = doc.adapter();

    let p = adapter.get_first_child(body(&doc)).unwrap().unwrap();
    let content = adapter.get_child_nodes(p).unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(text(adapter, content[0]).len(), 4000);

    // document, html, head, body, p and one text node
    assert_eq!(adapter.tree().len(), 6);
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let bytes: &[u8] = b"<p>\xFFok</p>";
    let doc = HtmlParser::new().parse_reader(&mut &bytes[..]).unwrap();
    let adapter = doc.adapter();

    let p = adapter.get_first_child(body(&doc)).unwrap().unwrap();
    let content = adapter.get_first_child(p).unwrap().unwrap();
    assert_eq!(text(adapter, content), "\u{FFFD}ok");
}

// ============================================================================
// Parse Error Tests
// ============================================================================

#[test]
fn test_parse_errors_are_recorded() {
    let doc = slim_html::parse("<p>unclosed <div></span>").unwrap();
    assert!(!doc.errors().is_empty());
}

#[test]
fn test_parse_errors_respect_cap() {
    let config = ParseConfig {
        max_recorded_errors: 1,
        ..ParseConfig::default()
    };
    let doc = HtmlParser::with_config(config)
        .parse("</x></y></z><p>unclosed <div></span>")
        .unwrap();
    assert_eq!(doc.errors().len(), 1);
}

#[test]
fn test_well_formed_document_has_no_errors() {
    let doc = slim_html::parse("<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>")
        .unwrap();
    assert!(doc.errors().is_empty());
}
