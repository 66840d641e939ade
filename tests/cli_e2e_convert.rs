//! End-to-end tests for the `convert` command
//!
//! These tests invoke the actual CLI binary and validate its behavior
//! from a user's perspective.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SMALL_EXPORT: &str = r#"<mediawiki>
  <page>
    <title>Example</title>
    <id>1</id>
    <revision>
      <id>10</id>
      <timestamp>2009-12-01T12:09:31Z</timestamp>
      <contributor><username>Alice</username><id>7</id></contributor>
      <comment>first</comment>
      <text>hello</text>
    </revision>
  </page>
</mediawiki>
"#;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_help() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Convert an export to a fast-import stream",
        ));
}

/// Test conversion of a small export read from stdin
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_stdin() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .arg("--wikitime")
        .write_stdin(SMALL_EXPORT)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("blob\nmark :11\ndata 5\nhello\n"))
        .stdout(predicate::str::contains("commit refs/heads/master"));
}

/// Test conversion of a small export read from a file
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let export = temp.child("export.xml");
    export.write_str(SMALL_EXPORT).unwrap();

    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .arg("--wikitime")
        .arg(export.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mark :11"));
}

/// Test that a missing export file produces an error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_missing_file() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .arg("/nonexistent/export.xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("can't open export file"));
}

/// Test that malformed input aborts with a diagnostic on stderr
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_malformed_input() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .write_stdin("<mediawiki><page><title>Broken")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

/// Test that a missing blacklist file is non-fatal
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_missing_blacklist_warns() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("convert")
        .arg("--wikitime")
        .arg("--blacklist")
        .arg("/nonexistent/blacklist.txt")
        .write_stdin(SMALL_EXPORT)
        .assert()
        .success()
        .stderr(predicate::str::contains("can't open blacklist file"));
}

/// Test that a spool file path enables disk mode with identical output
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_convert_spooled_output_matches() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut plain = cargo_bin_cmd!("wiki2git");
    let plain_out = plain
        .arg("convert")
        .arg("--wikitime")
        .write_stdin(SMALL_EXPORT)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let mut spooled = cargo_bin_cmd!("wiki2git");
    let spooled_out = spooled
        .arg("convert")
        .arg("--wikitime")
        .arg("--spool")
        .arg(temp.child("spool.bin").path())
        .write_stdin(SMALL_EXPORT)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(plain_out, spooled_out);
}

/// Test completions generation
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("wiki2git");

    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("wiki2git"));
}
