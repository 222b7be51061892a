mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::skills::{SkillDoc, SkillTreeBuilder};
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = cargo_bin_cmd!("skill-lint");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Structural linter for Markdown skill documents",
        ))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("rules"));
}

#[test]
fn test_cli_version() {
    let mut cmd = cargo_bin_cmd!("skill-lint");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skill-lint"));
}

#[test]
fn test_cli_check_help() {
    let mut cmd = cargo_bin_cmd!("skill-lint");
    cmd.args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--deny-warnings"))
        .stdout(predicate::str::contains("--disable"))
        .stdout(predicate::str::contains("--separator"));
}

#[test]
fn test_check_clean_tree_succeeds() {
    let tree = SkillTreeBuilder::new()
        .skill("api.md", SkillDoc::new("api", "API design"))
        .build()
        .unwrap();

    let mut cmd = cargo_bin_cmd!("skill-lint");
    cmd.current_dir(tree.path())
        .args(["check", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 document(s): 0 error(s)"));
}

#[test]
fn test_check_errors_fail() {
    let tree = SkillTreeBuilder::new()
        .file("broken.md", "---\nname: broken\n")
        .build()
        .unwrap();

    let mut cmd = cargo_bin_cmd!("skill-lint");
    cmd.current_dir(tree.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[unterminated-frontmatter]"))
        .stdout(predicate::str::contains("broken.md:1"));
}

#[test]
fn test_check_deny_warnings() {
    let tree = SkillTreeBuilder::new()
        .skill("x.md", SkillDoc::new("Not Kebab", "desc"))
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("[name-format]"));

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "--deny-warnings"])
        .assert()
        .failure();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "--deny-warnings", "--disable", "name-format"])
        .assert()
        .success();
}

#[test]
fn test_check_unknown_rule_is_rejected() {
    let tree = SkillTreeBuilder::new().build().unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "--disable", "no-such-rule"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule: no-such-rule"));
}

#[test]
fn test_check_missing_path() {
    let tree = SkillTreeBuilder::new().build().unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_check_json_output() {
    let tree = SkillTreeBuilder::new()
        .bundle(
            "bundle.md",
            &[SkillDoc::new("one", "1"), SkillDoc::new("one", "2")],
        )
        .build()
        .unwrap();

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["documents"], 2);
    assert_eq!(json["summary"]["warnings"], 1);
    assert_eq!(json["diagnostics"][0]["rule"], "duplicate-name");
    assert_eq!(json["diagnostics"][0]["document"], 2);
}

#[test]
fn test_check_stream_output() {
    let tree = SkillTreeBuilder::new()
        .file("a.md", "---\nname: a\n---\n")
        .build()
        .unwrap();

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "--output", "stream"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let last = lines.last().unwrap();
    assert_eq!(last["type"], "summary");
    assert_eq!(last["errors"], 2);
    assert!(lines[..lines.len() - 1]
        .iter()
        .all(|l| l["type"] == "diagnostic"));
}

#[test]
fn test_list_json() {
    let tree = SkillTreeBuilder::new()
        .bundle(
            "bundle.md",
            &[
                SkillDoc::new("alpha", "First").key("bonded_agent", "01-agent"),
                SkillDoc::new("beta", "Second"),
            ],
        )
        .build()
        .unwrap();

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["list", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let docs = json.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["name"], "alpha");
    assert_eq!(docs[0]["bonded_agent"], "01-agent");
    assert!(docs[1]["label"].as_str().unwrap().ends_with("bundle.md#2"));
}

#[test]
fn test_list_includes_unreadable_files() {
    let tree = SkillTreeBuilder::new()
        .skill("good.md", SkillDoc::new("good", "Fine"))
        .build()
        .unwrap();
    std::fs::write(tree.join("bad.md"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["list", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let bad = entries
        .iter()
        .find(|e| e["front_matter"] == "unreadable")
        .unwrap();
    assert!(bad["path"].as_str().unwrap().ends_with("bad.md"));
    assert!(bad["error"].is_string());

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["list", "-o", "stream"])
        .output()
        .unwrap();
    let events: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["type"] == "document"));
    assert!(events.iter().any(|e| e["front_matter"] == "unreadable"));
}

#[test]
fn test_split_writes_documents() {
    let tree = SkillTreeBuilder::new()
        .bundle(
            "bundle.md",
            &[SkillDoc::new("alpha", "A"), SkillDoc::new("beta", "B")],
        )
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 file(s)"));

    let alpha = std::fs::read_to_string(tree.join("out/alpha.md")).unwrap();
    assert!(alpha.starts_with("---\nname: alpha\n"));
    assert!(tree.join("out/beta.md").exists());

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md", "--out-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md", "--out-dir", "out", "--force"])
        .assert()
        .success();
}

#[test]
fn test_split_spaced_bundle_writes_standalone_documents() {
    let tree = SkillTreeBuilder::new()
        .spaced_bundle(
            "bundle.md",
            &[SkillDoc::new("alpha", "A"), SkillDoc::new("beta", "B")],
        )
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md", "--out-dir", "out"])
        .assert()
        .success();

    let beta = std::fs::read_to_string(tree.join("out/beta.md")).unwrap();
    assert!(beta.starts_with("---\nname: beta\n"));

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["check", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 document(s): 0 error(s)"));
}

#[test]
fn test_split_file_names_stay_unique() {
    let tree = SkillTreeBuilder::new()
        .bundle(
            "bundle.md",
            &[
                SkillDoc::new("x-3", "first"),
                SkillDoc::new("x", "second"),
                SkillDoc::new("x", "third"),
            ],
        )
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 file(s)"));

    let third = std::fs::read_to_string(tree.join("out/x-4.md")).unwrap();
    assert!(third.contains("description: third"));
    assert!(std::fs::read_to_string(tree.join("out/x-3.md"))
        .unwrap()
        .contains("description: first"));
}

#[test]
fn test_split_preview_writes_nothing() {
    let tree = SkillTreeBuilder::new()
        .bundle(
            "bundle.md",
            &[SkillDoc::new("alpha", "A"), SkillDoc::new("beta", "B")],
        )
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["split", "bundle.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha.md"))
        .stdout(predicate::str::contains("--out-dir"));

    assert!(!tree.join("alpha.md").exists());
}

#[test]
fn test_rules_json_reflects_config() {
    let tree = SkillTreeBuilder::new()
        .file(
            "skill-lint.toml",
            "[rules]\ndisabled = [\"empty-body\"]\n\n[rules.severity]\nname-format = \"error\"\n",
        )
        .build()
        .unwrap();

    let output = cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["rules", "-o", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = json.as_array().unwrap();
    assert_eq!(rules.len(), 17);

    let find = |code: &str| rules.iter().find(|r| r["code"] == code).unwrap().clone();
    assert_eq!(find("empty-body")["enabled"], false);
    assert_eq!(find("name-format")["severity"], "error");
    assert_eq!(find("name-format")["default_severity"], "warning");
}

#[test]
fn test_config_init_and_show() {
    let tree = SkillTreeBuilder::new().build().unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(tree.join("skill-lint.toml").exists());

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["config", "init"])
        .assert()
        .failure();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[bundle]"))
        .stdout(predicate::str::contains("skill-separator"));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let tree = SkillTreeBuilder::new()
        .file("custom.toml", "[discovery]\nread_concurrency = 0\n")
        .build()
        .unwrap();

    cargo_bin_cmd!("skill-lint")
        .current_dir(tree.path())
        .args(["--config", "custom.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read_concurrency"));
}
