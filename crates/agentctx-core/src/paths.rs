use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SPECIFY_DIR: &str = ".specify";
pub const SPECS_DIR: &str = "specs";

pub const CONFIG_FILE: &str = ".specify/config.yaml";
pub const TEMPLATE_FILE: &str = ".specify/templates/agent-file-template.md";
pub const PLAN_FILE: &str = "plan.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn template_path(root: &Path) -> PathBuf {
    root.join(TEMPLATE_FILE)
}

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

pub fn feature_dir(root: &Path, feature: &str) -> PathBuf {
    specs_dir(root).join(feature)
}

pub fn plan_path(root: &Path, feature: &str) -> PathBuf {
    feature_dir(root, feature).join(PLAN_FILE)
}

// ---------------------------------------------------------------------------
// Feature identifiers
// ---------------------------------------------------------------------------

static FEATURE_RE: OnceLock<Regex> = OnceLock::new();

fn feature_re() -> &'static Regex {
    FEATURE_RE.get_or_init(|| Regex::new(r"^(\d{3})-").unwrap())
}

/// Feature identifiers look like `001-user-auth`: three digits and a dash.
pub fn is_feature_id(name: &str) -> bool {
    feature_re().is_match(name)
}

/// Numeric prefix of a feature identifier (`042-x` → 42).
pub fn feature_number(name: &str) -> Option<u32> {
    feature_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
