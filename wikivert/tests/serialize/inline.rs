use crate::common::full;

#[test]
fn test_bold_and_italic_quotes() {
    let out = full("<p><b>bold</b> and <i>italic</i></p>");
    assert_eq!(out, "'''bold''' and ''italic''");
}

#[test]
fn test_adjacent_italics_need_a_guard() {
    let out = full("<p><i>a</i><i>b</i></p>");
    assert_eq!(out, "''a''<nowiki/>''b''");
}

#[test]
fn test_html_syntax_bold_stays_html() {
    let out = full(r#"<p><b data-parsoid='{"stx":"html"}'>x</b></p>"#);
    assert_eq!(out, "<b>x</b>");
}

#[test]
fn test_simple_wikilink() {
    let out = full(r#"<p><a rel="mw:WikiLink" href="./Foo">Foo</a></p>"#);
    assert_eq!(out, "[[Foo]]");
}

#[test]
fn test_piped_wikilink() {
    let out = full(r#"<p><a rel="mw:WikiLink" href="./Foo">bar</a></p>"#);
    assert_eq!(out, "[[Foo|bar]]");
}

#[test]
fn test_external_link_with_label() {
    let out = full(r#"<p><a rel="mw:ExtLink" href="https://x.example">label</a></p>"#);
    assert_eq!(out, "[https://x.example label]");
}

#[test]
fn test_bare_url_autolinks() {
    let out = full(r#"<p><a rel="mw:ExtLink" href="https://x.example">https://x.example</a></p>"#);
    assert_eq!(out, "https://x.example");
}

#[test]
fn test_sol_list_marker_escaped() {
    let out = full("<p>*not a list</p>");
    assert_eq!(out, "<nowiki>*</nowiki>not a list");
}

#[test]
fn test_inline_markup_in_text_escaped() {
    let out = full("<p>see [[this]]</p>");
    assert_eq!(out, "<nowiki>see [[this]]</nowiki>");
}

#[test]
fn test_entity_span_uses_preserved_source() {
    let out = full(r#"<p>a<span typeof="mw:Entity" data-parsoid='{"src":"&nbsp;"}'> </span>b</p>"#);
    assert_eq!(out, "a&nbsp;b");
}

#[test]
fn test_nowiki_span_re_emits_guard() {
    let out = full(r#"<p><span typeof="mw:Nowiki">''not markup''</span></p>"#);
    assert_eq!(out, "<nowiki>''not markup''</nowiki>");
}

#[test]
fn test_ambiguous_ampersand_escaped() {
    let out = full("<p>fish &amp;chips &amp;amp; more</p>");
    assert_eq!(out, "fish &chips &amp;amp; more");
}
