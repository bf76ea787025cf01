use crate::common::{full, selser};

#[test]
fn test_unmodified_italic_reuses_source_bytes() {
    let out = selser(
        r#"<i data-parsoid='{"dsr":[0,7,2,2],"stx":"wiki"}'>foo</i>"#,
        "''foo''",
    );
    assert_eq!(out, "''foo''");
}

#[test]
fn test_unmodified_document_is_byte_identical() {
    let original = "foo\n\nbar";
    let out = selser(
        r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p><p data-parsoid='{"dsr":[5,8,0,0]}'>bar</p>"#,
        original,
    );
    assert_eq!(out, original);
}

#[test]
fn test_modified_subtree_re_emits_only_itself() {
    // Second paragraph edited: its text changed but the rest of the page
    // must keep the original bytes.
    let out = selser(
        concat!(
            r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p>"#,
            r#"<p data-parsoid='{"dsr":[5,8,0,0]}' data-parsoid-diff='{"diff":["subtree-changed"]}'>baz</p>"#,
        ),
        "foo\n\nbar",
    );
    assert_eq!(out, "foo\n\nbaz");
}

#[test]
fn test_original_gap_kept_even_past_constraint_max() {
    // Three newlines between the paragraphs exceed the synthesized maximum
    // but come straight from the source, so they are kept as-is.
    let original = "foo\n\n\nbar";
    let out = selser(
        r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p><p data-parsoid='{"dsr":[6,9,0,0]}'>bar</p>"#,
        original,
    );
    assert_eq!(out, original);
}

#[test]
fn test_inserted_sibling_serialized_fresh() {
    let out = selser(
        concat!(
            r#"<i data-parsoid='{"dsr":[0,5,2,2],"stx":"wiki"}'>a</i>"#,
            r#"<p data-parsoid-diff='{"diff":["inserted"]}'>new</p>"#,
        ),
        "''a''",
    );
    assert_eq!(out, "''a''\nnew");
}

#[test]
fn test_invalid_dsr_disqualifies_reuse() {
    // start > end: the node falls through to full re-emission.
    let out = selser(
        r#"<i data-parsoid='{"dsr":[5,3,2,2],"stx":"wiki"}'>foo</i>"#,
        "''foo''",
    );
    assert_eq!(out, "''foo''");
}

#[test]
fn test_dsr_beyond_source_disqualifies_reuse() {
    let out = selser(
        r#"<i data-parsoid='{"dsr":[0,99,2,2],"stx":"wiki"}'>foo</i>"#,
        "''foo''",
    );
    assert_eq!(out, "''foo''");
}

#[test]
fn test_selser_off_ignores_dsr() {
    // Full mode re-emits from the DOM even when reuse would be possible.
    let out = full(r#"<i data-parsoid='{"dsr":[0,7,2,2],"stx":"wiki"}'>foo</i>"#);
    assert_eq!(out, "''foo''");
}

#[test]
fn test_reused_boundary_guard_against_following_quotes() {
    // The reused span ends in ' so an immediately following italic needs a
    // guard.
    let out = selser(
        concat!(
            r#"<i data-parsoid='{"dsr":[0,5,2,2],"stx":"wiki"}'>a</i>"#,
            r#"<i data-parsoid-diff='{"diff":["inserted"]}'>b</i>"#,
        ),
        "''a''",
    );
    assert_eq!(out, "''a''<nowiki/>''b''");
}

#[test]
fn test_zero_width_paragraph_reuses_nothing() {
    let out = selser(
        concat!(
            r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p>"#,
            r#"<p data-parsoid='{"dsr":[5,5,0,0]}'></p>"#,
        ),
        "foo\n\n",
    );
    assert_eq!(out, "foo");
}
