use crate::common::full;

#[test]
fn test_single_paragraph() {
    let out = full(r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p>"#);
    assert_eq!(out, "foo");
}

#[test]
fn test_two_paragraphs_get_a_blank_line() {
    let out = full(
        r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p><p data-parsoid='{"dsr":[5,8,0,0]}'>bar</p>"#,
    );
    assert_eq!(out, "foo\n\nbar");
}

#[test]
fn test_heading_then_paragraph() {
    let out = full("<h2>Title</h2><p>body</p>");
    assert_eq!(out, "==Title==\nbody");
}

#[test]
fn test_heading_levels() {
    assert_eq!(full("<h1>a</h1>"), "=a=");
    assert_eq!(full("<h3>a</h3>"), "===a===");
    assert_eq!(full("<h6>a</h6>"), "======a======");
}

#[test]
fn test_flat_list() {
    let out = full("<ul><li>one</li><li>two</li></ul>");
    assert_eq!(out, "*one\n*two");
}

#[test]
fn test_ordered_list() {
    let out = full("<ol><li>one</li><li>two</li></ol>");
    assert_eq!(out, "#one\n#two");
}

#[test]
fn test_nested_list_bullets_accumulate() {
    let out = full("<ul><li>a<ul><li>b</li></ul></li></ul>");
    insta::assert_snapshot!(out, @r"
    *a
    **b
    ");
}

#[test]
fn test_definition_list() {
    let out = full("<dl><dt>term</dt><dd>meaning</dd></dl>");
    assert_eq!(out, ";term\n:meaning");
}

#[test]
fn test_table_cells_on_own_lines() {
    let out = full("<table><tbody><tr><td>A</td><td>B</td></tr></tbody></table>");
    insta::assert_snapshot!(out, @r"
    {|
    |A
    |B
    |}
    ");
}

#[test]
fn test_table_header_and_second_row() {
    let out = full("<table><tbody><tr><th>H</th></tr><tr><td>C</td></tr></tbody></table>");
    insta::assert_snapshot!(out, @r"
    {|
    !H
    |-
    |C
    |}
    ");
}

#[test]
fn test_table_caption() {
    let out = full("<table><caption>cap</caption><tbody><tr><td>C</td></tr></tbody></table>");
    assert_eq!(out, "{|\n|+cap\n|C\n|}");
}

#[test]
fn test_hr_between_paragraphs() {
    let out = full("<p>a</p><hr/><p>b</p>");
    assert_eq!(out, "a\n----\nb");
}

#[test]
fn test_comment_survives_in_separator() {
    let out = full("<p>a</p><!-- note --><p>b</p>");
    assert_eq!(out, "a\n<!-- note -->\nb");
}

#[test]
fn test_indent_pre_prefixes_every_line() {
    let out = full("<pre>code</pre>");
    assert_eq!(out, " code");
}

#[test]
fn test_html_pre_keeps_tags_and_content() {
    let out = full(r#"<pre data-parsoid='{"stx":"html"}'>a  b</pre>"#);
    assert_eq!(out, "<pre>a  b</pre>");
}

#[test]
fn test_whitespace_between_blocks_is_layout() {
    let out = full("<p>a</p>\n  <p>b</p>");
    assert_eq!(out, "a\n\nb");
}
