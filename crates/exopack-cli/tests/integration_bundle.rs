//! End-to-end CLI tests running the `exopack` binary against fixture trees.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn install_package(root: &Path, name: &str, body: &str) {
    let dir = root.join("node_modules").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("package.json"),
        format!(r#"{{ "name": "{name}", "main": "index.js" }}"#),
    )
    .unwrap();
    fs::write(dir.join("index.js"), body).unwrap();
}

fn write_manifest(root: &Path, json: &str) -> std::path::PathBuf {
    let path = root.join("externals.json");
    fs::write(&path, json).unwrap();
    path
}

fn exopack() -> Command {
    Command::cargo_bin("exopack").unwrap()
}

#[test]
fn bundles_a_manifest_and_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    install_package(tmp.path(), "demo", "module.exports = { hello: 'world' };");
    let shims = tmp.path().join("shims");
    fs::create_dir_all(&shims).unwrap();
    fs::write(shims.join("demo.d.ts"), "declare const demo: unknown;").unwrap();
    let manifest = write_manifest(tmp.path(), r#"{ "flat": [ { "name": "demo" } ] }"#);

    exopack()
        .arg("bundle")
        .arg("--root")
        .arg(tmp.path())
        .arg("--out")
        .arg(tmp.path().join("vendor"))
        .arg("--shims")
        .arg(&shims)
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stderr(predicate::str::contains("demo"));

    let bundled = fs::read_to_string(tmp.path().join("vendor/demo.js")).unwrap();
    assert!(bundled.starts_with("\"use strict\";"));
    assert!(bundled.contains("hello"));
    assert!(tmp.path().join("vendor/demo.d.ts").is_file());
}

#[test]
fn second_run_produces_byte_identical_output() {
    let tmp = tempfile::tempdir().unwrap();
    install_package(tmp.path(), "stable", "module.exports = 42;");
    let manifest = write_manifest(tmp.path(), r#"{ "flat": [ { "name": "stable" } ] }"#);

    let run = || {
        exopack()
            .arg("bundle")
            .arg("--root")
            .arg(tmp.path())
            .arg("--out")
            .arg(tmp.path().join("vendor"))
            .arg("--shims")
            .arg(tmp.path().join("shims"))
            .arg("--manifest")
            .arg(&manifest)
            .assert()
            .success();
    };

    run();
    let first = fs::read(tmp.path().join("vendor/stable.js")).unwrap();
    run();
    let second = fs::read(tmp.path().join("vendor/stable.js")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn required_failure_exits_nonzero_and_names_the_package() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("node_modules")).unwrap();
    let manifest = write_manifest(tmp.path(), r#"{ "flat": [ { "name": "ghost-package" } ] }"#);

    exopack()
        .arg("bundle")
        .arg("--root")
        .arg(tmp.path())
        .arg("--out")
        .arg(tmp.path().join("vendor"))
        .arg("--shims")
        .arg(tmp.path().join("shims"))
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost-package"));
}

#[test]
fn optional_failure_still_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    install_package(tmp.path(), "present", "module.exports = 1;");
    let manifest = write_manifest(
        tmp.path(),
        r#"{ "flat": [ { "name": "present" }, { "name": "ghost-native", "optional": true } ] }"#,
    );

    exopack()
        .arg("bundle")
        .arg("--root")
        .arg(tmp.path())
        .arg("--out")
        .arg(tmp.path().join("vendor"))
        .arg("--shims")
        .arg(tmp.path().join("shims"))
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping optional package ghost-native"));
}

#[test]
fn clean_flag_removes_stale_output() {
    let tmp = tempfile::tempdir().unwrap();
    install_package(tmp.path(), "fresh", "module.exports = 'new';");
    let vendor = tmp.path().join("vendor");
    fs::create_dir_all(&vendor).unwrap();
    fs::write(vendor.join("stale.js"), "module.exports = 'old';").unwrap();
    let manifest = write_manifest(tmp.path(), r#"{ "flat": [ { "name": "fresh" } ] }"#);

    exopack()
        .arg("bundle")
        .arg("--clean")
        .arg("--root")
        .arg(tmp.path())
        .arg("--out")
        .arg(&vendor)
        .arg("--shims")
        .arg(tmp.path().join("shims"))
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success();

    assert!(!vendor.join("stale.js").exists());
    assert!(vendor.join("fresh.js").is_file());
}

#[test]
fn rewrite_points_consumer_requires_at_the_vendor_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(tmp.path().join("vendor")).unwrap();
    fs::write(
        src.join("app.js"),
        "const demo = require(\"demo\");\nconst log = require('#shared/log.js');\n",
    )
    .unwrap();
    let manifest = write_manifest(tmp.path(), r#"{ "flat": [ { "name": "demo" } ] }"#);

    exopack()
        .arg("rewrite")
        .arg("--root")
        .arg(tmp.path())
        .arg("--vendor")
        .arg("vendor")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--alias")
        .arg("#shared=src/shared")
        .assert()
        .success();

    let app = fs::read_to_string(src.join("app.js")).unwrap();
    assert!(app.contains("require(\"../vendor/demo.js\")"));
    assert!(app.contains("require('../src/shared/log.js')"));
}
