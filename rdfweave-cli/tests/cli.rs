use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DOC: &str = "@prefix dc: <http://purl.org/dc/elements/1.1/> .\n<urn:doc> dc:title \"Hi\" .\n";
const DOC_NT: &str = "<urn:doc> <http://purl.org/dc/elements/1.1/title> \"Hi\" .\n";

fn rdfweave_cmd(work_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("rdfweave");
    cmd.current_dir(work_dir.path());
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Happy path tests
// ============================================================================

#[test]
fn version_flag() {
    cargo_bin_cmd!("rdfweave")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rdfweave"));
}

#[test]
fn help_flag() {
    cargo_bin_cmd!("rdfweave")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("syntaxes"));
}

#[test]
fn syntaxes_lists_all() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .arg("syntaxes")
        .assert()
        .success()
        .stdout(predicate::str::contains("turtle"))
        .stdout(predicate::str::contains("application/n-triples"))
        .stdout(predicate::str::contains("rdf, xml, owl"))
        .stdout(predicate::str::contains("json"));
}

#[test]
fn convert_file_detects_input_from_extension() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("doc.ttl"), DOC).unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "doc.ttl", "--to", "ntriples"])
        .assert()
        .success()
        .stdout(DOC_NT);
}

#[test]
fn convert_stdin_to_json() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "turtle", "--to", "json"])
        .write_stdin(DOC)
        .assert()
        .success()
        .stdout("{\"dc:title\":\"Hi\"}\n");
}

#[test]
fn convert_to_rdfxml() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "-", "--from", "nt", "--to", "rdfxml"])
        .write_stdin(DOC_NT)
        .assert()
        .success()
        .stdout(predicate::str::contains("rdf:about=\"urn:doc\""))
        .stdout(predicate::str::contains("<dc:title>Hi</dc:title>"));
}

#[test]
fn rdfxml_input_is_sniffed() {
    let tmp = TempDir::new().unwrap();
    let xml = concat!(
        "<?xml version=\"1.0\"?>\n",
        "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n",
        "         xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n",
        "  <rdf:Description rdf:about=\"urn:doc\"><dc:title>Hi</dc:title></rdf:Description>\n",
        "</rdf:RDF>\n",
    );
    rdfweave_cmd(&tmp)
        .args(["convert", "--to", "nt"])
        .write_stdin(xml)
        .assert()
        .success()
        .stdout(DOC_NT);
}

#[test]
fn output_file_picks_syntax() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("doc.ttl"), DOC).unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "doc.ttl", "-o", "out.nt"])
        .assert()
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(tmp.path().join("out.nt")).unwrap(), DOC_NT);
}

#[test]
fn base_flag_resolves_relative_iris() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "turtle", "--to", "nt", "--base", "http://example.org/"])
        .write_stdin("<doc> <http://x/p> \"v\" .\n")
        .assert()
        .success()
        .stdout("<http://example.org/doc> <http://x/p> \"v\" .\n");
}

#[test]
fn config_file_supplies_namespaces() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("rdfweave.toml"),
        "[namespaces]\nex = \"http://example.org/\"\n",
    )
    .unwrap();
    rdfweave_cmd(&tmp)
        .args(["--config", "rdfweave.toml", "convert", "--from", "nt", "--to", "json"])
        .write_stdin("<http://example.org/s> <http://example.org/p> \"v\" .\n")
        .assert()
        .success()
        .stdout("{\"ex:p\":\"v\"}\n");
}

#[test]
fn pretty_nests_blank_nodes() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "turtle", "--to", "json", "--pretty"])
        .write_stdin("<urn:s> <urn:p> [ <urn:q> \"inner\" ] .\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"urn:p\": {"))
        .stdout(predicate::str::contains("\"urn:q\": \"inner\""));
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn verbose_quiet_conflict() {
    cargo_bin_cmd!("rdfweave")
        .args(["--verbose", "--quiet", "syntaxes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unknown_syntax_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "yaml"])
        .write_stdin(DOC)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown syntax 'yaml'"))
        .stderr(predicate::str::contains("valid syntaxes"));
}

#[test]
fn json_input_rejected() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "json"])
        .write_stdin("{}")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("output-only"));
}

#[test]
fn parse_error_reports_line() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "--from", "nt", "--to", "turtle"])
        .write_stdin("<http://x/s> <http://x/p> <http://x/o> .\n<http://x/s> <http://x/p> .\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("near line 2"));
}

#[test]
fn missing_file() {
    let tmp = TempDir::new().unwrap();
    rdfweave_cmd(&tmp)
        .args(["convert", "absent.ttl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn bad_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.toml"), "[output]\npretty = \"yes\"\n").unwrap();
    rdfweave_cmd(&tmp)
        .args(["--config", "bad.toml", "convert", "--from", "nt"])
        .write_stdin(DOC_NT)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config parse error"));
}
