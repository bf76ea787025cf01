use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn serializes_paragraph_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p>"#).unwrap();

    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg(input.as_os_str());
    // Not a terminal, so "auto" adds no trailing newline.
    cmd.assert().success().stdout("foo");
}

#[test]
fn selser_without_original_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>foo</p>").unwrap();

    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg(input.as_os_str()).arg("--selser");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--original"));
}

#[test]
fn selser_reuses_original_bytes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(
        &input,
        r#"<i data-parsoid='{"dsr":[0,7,2,2],"stx":"wiki"}'>foo</i>"#,
    )
    .unwrap();
    let original = dir.path().join("page.wt");
    fs::write(&original, "''foo''").unwrap();

    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg(input.as_os_str())
        .arg("--selser")
        .arg("--original")
        .arg(original.as_os_str());
    cmd.assert().success().stdout("''foo''");
}

#[test]
fn writes_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>bar</p>"#).unwrap();
    let out = dir.path().join("page.wt");

    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg(input.as_os_str()).arg("-o").arg(out.as_os_str());
    cmd.assert().success();
    assert_eq!(fs::read_to_string(&out).unwrap(), "bar");
}

#[test]
fn trailing_newline_respects_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, r#"<p data-parsoid='{"dsr":[0,3,0,0]}'>foo</p>"#).unwrap();

    let config = dir.path().join("wikivert.toml");
    fs::write(
        &config,
        "[output]\ntrailing_newline = \"always\"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg(input.as_os_str())
        .arg("--config")
        .arg(config.as_os_str());
    cmd.assert().success().stdout("foo\n");
}

#[test]
fn missing_input_reports_error() {
    let mut cmd = cargo_bin_cmd!("wikivert");
    cmd.arg("does-not-exist.html");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
