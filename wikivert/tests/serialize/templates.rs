use crate::common::full;

#[test]
fn test_template_with_positional_and_added_named_param() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-parsoid='{"pi":[[{"k":"1"}]]}'
              data-mw='{"parts":[{"template":{"target":{"wt":"echo"},"params":{"1":{"wt":"a"},"x":{"wt":"b"}},"i":0}}]}'>a</span>"##,
    );
    assert_eq!(out, "{{echo|a|x=b}}");
}

#[test]
fn test_template_preserves_recorded_spacing() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-parsoid='{"pi":[[{"k":"name","named":true,"spc":[" "," "," ",""]}]]}'
              data-mw='{"parts":[{"template":{"target":{"wt":"infobox"},"params":{"name":{"wt":"v"}},"i":0}}]}'>x</span>"##,
    );
    assert_eq!(out, "{{infobox| name = v}}");
}

#[test]
fn test_template_named_flag_defeats_positional_form() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-parsoid='{"pi":[[{"k":"1","named":true}]]}'
              data-mw='{"parts":[{"template":{"target":{"wt":"echo"},"params":{"1":{"wt":"a"}},"i":0}}]}'>x</span>"##,
    );
    assert_eq!(out, "{{echo|1 = a}}");
}

#[test]
fn test_template_value_with_equals_forced_named() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-mw='{"parts":[{"template":{"target":{"wt":"echo"},"params":{"1":{"wt":"a=b"}},"i":0}}]}'>x</span>"##,
    );
    assert_eq!(out, "{{echo|1=a=b}}");
}

#[test]
fn test_multi_part_transclusion_keeps_literals() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-mw='{"parts":["before ",{"template":{"target":{"wt":"tpl"},"params":{},"i":0}}]}'>x</span>"##,
    );
    assert_eq!(out, "before {{tpl}}");
}

#[test]
fn test_envelope_spans_about_siblings() {
    // Both spans belong to one transclusion; the second must not re-emit.
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-mw='{"parts":[{"template":{"target":{"wt":"tpl"},"params":{},"i":0}}]}'>x</span><span about="#mwt1">y</span><p>after</p>"##,
    );
    assert_eq!(out, "{{tpl}}\nafter");
}

#[test]
fn test_malformed_wt_value_coerced() {
    let out = full(
        r##"<span about="#mwt1" typeof="mw:Transclusion"
              data-mw='{"parts":[{"template":{"target":{"wt":"echo"},"params":{"1":{"wt":["a",{"src":"b"}]}},"i":0}}]}'>x</span>"##,
    );
    assert_eq!(out, "{{echo|ab}}");
}

#[test]
fn test_extension_with_raw_body() {
    let out = full(
        r##"<span typeof="mw:Extension/ref" about="#mwt2"
              data-mw='{"name":"ref","attrs":{"name":"note"},"body":{"extsrc":"the text"}}'></span>"##,
    );
    assert_eq!(out, "<ref name=\"note\">the text</ref>");
}

#[test]
fn test_extension_without_body_self_closes() {
    let out = full(
        r##"<span typeof="mw:Extension/references" about="#mwt2"
              data-mw='{"name":"references"}'></span>"##,
    );
    assert_eq!(out, "<references />");
}

#[test]
fn test_extension_with_unresolvable_body_dropped() {
    let out = full(
        r##"<p>a</p><span typeof="mw:Extension/ref" about="#mwt2"
              data-mw='{"name":"ref","body":{"id":"missing"}}'></span><p>b</p>"##,
    );
    // The broken call is dropped; the document still serializes.
    assert_eq!(out, "a\nb");
}

#[test]
fn test_transclusion_without_parts_dropped() {
    let out = full(
        r##"<p>a</p><span about="#mwt1" typeof="mw:Transclusion" data-mw='{}'>x</span>"##,
    );
    assert_eq!(out, "a");
}
