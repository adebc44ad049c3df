#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FEATURE: &str = "001-test-feature";

const TEMPLATE: &str = "# [PROJECT NAME] Development Guidelines

Auto-generated from all feature plans. Last updated: [DATE]

## Active Technologies

[EXTRACTED FROM ALL PLAN.MD FILES]

## Project Structure

[ACTUAL STRUCTURE FROM PLANS]

## Commands

[ONLY COMMANDS FOR ACTIVE TECHNOLOGIES]

## Code Style

[LANGUAGE-SPECIFIC, ONLY FOR LANGUAGES IN USE]

## Recent Changes

[LAST 3 FEATURES AND WHAT THEY ADDED]
";

const PLAN: &str = "# Test Feature Plan

## Technology Stack

- Language: Python
- Framework: FastAPI
- Database: N/A
";

const FRONTMATTER: &str = "---
description: Project Development Guidelines
globs: [\"**/*\"]
alwaysApply: true
---
";

fn agentctx(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agentctx").unwrap();
    cmd.current_dir(dir.path())
        .env("AGENTCTX_ROOT", dir.path())
        .env("SPECIFY_FEATURE", FEATURE)
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read(dir: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(dir.path().join(rel)).unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, ".specify/templates/agent-file-template.md", TEMPLATE);
    write(&dir, &format!("specs/{FEATURE}/plan.md"), PLAN);
    dir
}

const CURSOR_FILE: &str = ".cursor/rules/specify-rules.mdc";

// ---------------------------------------------------------------------------
// agentctx update <agent>
// ---------------------------------------------------------------------------

#[test]
fn cursor_agent_creates_mdc_with_frontmatter() {
    let dir = fixture();
    agentctx(&dir)
        .args(["update", "cursor-agent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .cursor/rules/specify-rules.mdc"));

    let content = read(&dir, CURSOR_FILE);
    assert_eq!(content.lines().next(), Some("---"));
    assert!(content.starts_with(&format!("{FRONTMATTER}\n")));
    assert!(content.contains("Development Guidelines"));
    assert!(content.contains("- Python + FastAPI (001-test-feature)"));
    assert_eq!(content.matches("alwaysApply: true").count(), 1);
}

#[test]
fn existing_mdc_without_frontmatter_gets_it() {
    let dir = fixture();
    let body = "# repo Development Guidelines

## Active Technologies

- Python + FastAPI (main)

## Recent Changes

- main: Added Python + FastAPI
";
    write(&dir, CURSOR_FILE, body);

    agentctx(&dir)
        .args(["update", "cursor-agent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated:"));

    let content = read(&dir, CURSOR_FILE);
    assert!(content.starts_with(&format!("{FRONTMATTER}\n# repo Development Guidelines\n")));
    assert!(content.contains("- Python + FastAPI (main)"));
    assert!(content.contains("- main: Added Python + FastAPI"));
}

#[test]
fn rerun_does_not_duplicate_frontmatter() {
    let dir = fixture();
    agentctx(&dir).args(["update", "cursor-agent"]).assert().success();
    let first = read(&dir, CURSOR_FILE);

    agentctx(&dir)
        .args(["update", "cursor-agent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged:"));

    let second = read(&dir, CURSOR_FILE);
    assert_eq!(first, second);
    assert_eq!(second.matches("alwaysApply: true").count(), 1);
    assert_eq!(second.matches("- Python + FastAPI (001-test-feature)").count(), 1);
}

#[test]
fn claude_file_has_no_frontmatter() {
    let dir = fixture();
    agentctx(&dir).args(["update", "claude"]).assert().success();
    let content = read(&dir, "CLAUDE.md");
    assert!(!content.starts_with("---"));
    assert!(!content.contains("alwaysApply"));
    assert!(content.contains("Development Guidelines"));
}

#[test]
fn unknown_agent_fails() {
    let dir = fixture();
    agentctx(&dir)
        .args(["update", "notepad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown agent type 'notepad'"));
    assert!(!dir.path().join("CLAUDE.md").exists());
}

#[test]
fn missing_template_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    write(&dir, &format!("specs/{FEATURE}/plan.md"), PLAN);
    agentctx(&dir)
        .args(["update", "cursor-agent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template"));
    assert!(!dir.path().join(".cursor").exists());
}

#[test]
fn missing_plan_still_updates() {
    let dir = fixture();
    agentctx(&dir)
        .args(["update", "claude"])
        .env("SPECIFY_FEATURE", "002-no-plan")
        .assert()
        .success();
    let content = read(&dir, "CLAUDE.md");
    assert!(content.contains("- 002-no-plan: Updated agent context"));
}

#[test]
fn history_keeps_last_three_features() {
    let dir = fixture();
    for feature in ["001-a", "002-b", "003-c", "004-d", "005-e"] {
        write(
            &dir,
            &format!("specs/{feature}/plan.md"),
            "## Technology Stack\n\n- Language: Rust\n",
        );
        agentctx(&dir)
            .args(["update", "cursor-agent"])
            .env("SPECIFY_FEATURE", feature)
            .assert()
            .success();
    }

    let content = read(&dir, CURSOR_FILE);
    let changes: Vec<&str> = content
        .split("## Recent Changes")
        .nth(1)
        .unwrap()
        .lines()
        .filter(|l| l.starts_with("- "))
        .collect();
    assert_eq!(
        changes,
        vec![
            "- 005-e: Added Rust",
            "- 004-d: Added Rust",
            "- 003-c: Added Rust",
        ]
    );
    assert_eq!(content.matches("alwaysApply: true").count(), 1);
}

#[test]
fn feature_flag_overrides_env() {
    let dir = fixture();
    agentctx(&dir)
        .args(["update", "claude", "--feature", "009-flag"])
        .assert()
        .success();
    assert!(read(&dir, "CLAUDE.md").contains("- 009-flag: Updated agent context"));
}

#[test]
fn feature_falls_back_to_specs_dir() {
    let dir = fixture();
    std::fs::create_dir_all(dir.path().join("specs/002-second")).unwrap();
    agentctx(&dir)
        .env_remove("SPECIFY_FEATURE")
        .args(["update", "claude"])
        .assert()
        .success();
    assert!(read(&dir, "CLAUDE.md").contains("- 002-second: Updated agent context"));
}

// ---------------------------------------------------------------------------
// agentctx update (all)
// ---------------------------------------------------------------------------

#[test]
fn update_all_creates_claude_when_nothing_exists() {
    let dir = fixture();
    agentctx(&dir)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: CLAUDE.md"));
    assert!(dir.path().join("CLAUDE.md").exists());
}

#[test]
fn update_all_refreshes_shared_file_once() {
    let dir = fixture();
    write(&dir, "AGENTS.md", "# Agents\n");
    write(&dir, "GEMINI.md", "# Gemini\n");

    let out = agentctx(&dir).arg("update").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("AGENTS.md").count(), 1);
    assert!(stdout.contains("updated: GEMINI.md"));
    assert!(!dir.path().join("CLAUDE.md").exists());

    let agents = read(&dir, "AGENTS.md");
    assert!(agents.starts_with("# Agents\n"));
    assert!(agents.contains("- 001-test-feature: Added Python + FastAPI"));
}

#[test]
fn update_json_reports_outcomes() {
    let dir = fixture();
    let out = agentctx(&dir)
        .args(["update", "cursor-agent", "--json"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(value[0]["agent"], "cursor-agent");
    assert_eq!(value[0]["status"], "created");
    assert_eq!(value[0]["tech"]["language"], "Python");
}

// ---------------------------------------------------------------------------
// agentctx agents / status
// ---------------------------------------------------------------------------

#[test]
fn agents_lists_every_type() {
    let dir = fixture();
    write(&dir, "CLAUDE.md", "# Claude\n");
    let out = agentctx(&dir).args(["agents", "--json"]).assert().success();
    let value: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 17);
    let cursor = rows.iter().find(|r| r["agent"] == "cursor-agent").unwrap();
    assert_eq!(cursor["format"], "mdc");
    assert_eq!(cursor["exists"], false);
    let claude = rows.iter().find(|r| r["agent"] == "claude").unwrap();
    assert_eq!(claude["exists"], true);
}

#[test]
fn agents_table_output() {
    let dir = fixture();
    agentctx(&dir)
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("cursor-agent"))
        .stdout(predicate::str::contains(".cursor/rules/specify-rules.mdc"));
}

#[test]
fn status_shows_feature_and_stack() {
    let dir = fixture();
    let out = agentctx(&dir).args(["status", "-j"]).assert().success();
    let value: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(value["feature"], FEATURE);
    assert_eq!(value["plan_exists"], true);
    assert_eq!(value["tech"]["framework"], "FastAPI");
    assert_eq!(value["recent_features"][0], FEATURE);
}

#[test]
fn status_without_feature_fails() {
    let dir = TempDir::new().unwrap();
    agentctx(&dir)
        .env_remove("SPECIFY_FEATURE")
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot determine the current feature"));
}
