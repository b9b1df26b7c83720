//! CLI integration tests
//!
//! Run the built binary against the syntax fixtures and check exit codes,
//! stdout and files written.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENABLE: &str = "build_property.FunctionsEnableMetadataSourceGen=true";

fn fnmeta_bin() -> PathBuf {
    let mut path = env::current_exe()
        .expect("Failed to get current executable path")
        .parent()
        .expect("No parent")
        .parent()
        .expect("No parent")
        .to_path_buf();

    if path.ends_with("deps") {
        path = path.parent().expect("No parent").to_path_buf();
    }

    path.join("fnmeta")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/syntax")
        .join(name)
}

fn fnmeta(args: &[&str]) -> Output {
    Command::new(fnmeta_bin())
        .args(args)
        .env_remove("FNMETA_ENABLE_SOURCE_GEN")
        .env_remove("FNMETA_AUTO_REGISTER")
        .env_remove("FNMETA_NAMESPACE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute fnmeta")
}

#[test]
fn test_cli_help() {
    let output = fnmeta(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("scan"));
}

#[test]
fn test_cli_version() {
    let output = fnmeta(&["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("fnmeta"));
}

#[test]
fn test_generate_to_stdout() {
    let tree = fixture("orders_get.json");
    let output = fnmeta(&[
        "-q",
        "generate",
        tree.to_str().unwrap(),
        "--assembly-name",
        "Contoso.Api",
        "-p",
        ENABLE,
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("// <auto-generated/>"));
    assert!(stdout.contains("namespace Contoso.Api"));
    assert!(stdout.contains("Function0RawBindings.Add(@\"{\"\"name\"\":\"\"req\"\""));
}

#[test]
fn test_generate_disabled_prints_nothing() {
    let tree = fixture("orders_get.json");
    let output = fnmeta(&["-q", "generate", tree.to_str().unwrap(), "--assembly-name", "App"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_generate_without_call_sites_writes_nothing() {
    let out = TempDir::new().unwrap();
    let tree = fixture("no_routes.json");
    let output = fnmeta(&[
        "-q",
        "generate",
        tree.to_str().unwrap(),
        "--assembly-name",
        "App",
        "-p",
        ENABLE,
        "--out-dir",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(!out.path().join("MapActionGeneratedFunctionMetadata.g.cs").exists());
}

#[test]
fn test_generate_with_properties_file_into_out_dir() {
    let out = TempDir::new().unwrap();
    let props = fixture("build_properties.toml");
    let trees = [fixture("orders_get.json"), fixture("retry_routes.json")];

    let output = fnmeta(&[
        "-q",
        "generate",
        trees[0].to_str().unwrap(),
        trees[1].to_str().unwrap(),
        "--build-properties",
        props.to_str().unwrap(),
        "--out-dir",
        out.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let generated =
        fs::read_to_string(out.path().join("MapActionGeneratedFunctionMetadata.g.cs")).unwrap();
    assert!(generated.contains("ScriptFile = \"Contoso.Api.dll\""));
    assert!(generated.contains("var Function2 = new DefaultFunctionMetadata"));
    assert!(generated.contains("IAutoConfigureStartup"));
}

#[test]
fn test_generate_missing_tree_fails() {
    let output = fnmeta(&[
        "generate",
        "/nonexistent/tree.json",
        "--assembly-name",
        "App",
        "-p",
        ENABLE,
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/tree.json"));
}

#[test]
fn test_generate_requires_assembly_name() {
    let tree = fixture("orders_get.json");
    let output = fnmeta(&["generate", tree.to_str().unwrap(), "-p", ENABLE]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_scan_json_report() {
    let tree = fixture("retry_routes.json");
    let output = fnmeta(&["-q", "scan", tree.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["callSites"], 2);
    assert_eq!(report["functions"][1]["metadata"]["retry"]["strategy"], "exponentialBackoff");
    assert_eq!(report["functions"][1]["metadata"]["scriptFile"], "App.dll");
}

#[test]
fn test_scan_human_report() {
    let tree = fixture("orders_get.json");
    let output = fnmeta(&["-q", "scan", tree.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Function0  GET /orders"));
}
