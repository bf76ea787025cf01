use crate::common::full;

#[test]
fn test_html_syntax_div_round_trips_as_html() {
    let out = full(r#"<div data-parsoid='{"stx":"html"}' class="foo">x</div>"#);
    assert_eq!(out, "<div class=\"foo\">x</div>");
}

#[test]
fn test_sanitized_away_attribute_restored() {
    let out = full(
        r#"<div data-parsoid='{"stx":"html","sa":{"style":"color:red"},"a":{"style":null}}' class="foo">x</div>"#,
    );
    assert_eq!(out, "<div class=\"foo\" style=\"color:red\">x</div>");
}

#[test]
fn test_auto_inserted_end_omits_close_tag() {
    let out = full(r#"<div data-parsoid='{"stx":"html","autoInsertedEnd":true}'>x</div>"#);
    assert_eq!(out, "<div>x");
}

#[test]
fn test_auto_inserted_start_omits_open_tag() {
    let out = full(r#"<div data-parsoid='{"stx":"html","autoInsertedStart":true}'>x</div>"#);
    assert_eq!(out, "x</div>");
}

#[test]
fn test_src_tag_name_preserved() {
    let out = full(r#"<div data-parsoid='{"stx":"html","srcTagName":"DIV"}'>x</div>"#);
    assert_eq!(out, "<DIV>x</DIV>");
}

#[test]
fn test_void_element_self_closes() {
    let out = full(r#"<p>a<br data-parsoid='{"stx":"html"}'/>b</p>"#);
    assert_eq!(out, "a<br />b");
}

#[test]
fn test_parser_generated_id_dropped_in_output() {
    let out = full(r#"<div data-parsoid='{"stx":"html"}' id="mwAQ">x</div>"#);
    assert_eq!(out, "<div>x</div>");
}

#[test]
fn test_unknown_element_falls_back_to_html() {
    let out = full("<p><kbd>Ctrl</kbd></p>");
    assert_eq!(out, "<kbd>Ctrl</kbd>");
}

#[test]
fn test_inserted_item_in_html_list_keeps_html_syntax() {
    // The li has no DSR (freshly inserted) under an HTML-syntax list, so it
    // must not sprout a wiki bullet.
    let out = full(
        r#"<ul data-parsoid='{"stx":"html","dsr":[0,30,4,5]}'><li data-parsoid='{"stx":"html","dsr":[4,12,4,5]}'>a</li><li>b</li></ul>"#,
    );
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}
