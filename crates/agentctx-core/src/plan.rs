//! Technology facts pulled out of a feature's `plan.md`.
//!
//! Extraction is deliberately forgiving: plans are often half-written early in
//! a feature, so anything that cannot be found becomes [`UNKNOWN`].

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Sentinel for a fact the plan does not state.
pub const UNKNOWN: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechStack {
    pub language: String,
    pub framework: String,
    pub database: String,
    pub project_type: String,
}

impl Default for TechStack {
    fn default() -> Self {
        Self::unknown()
    }
}

impl TechStack {
    pub fn unknown() -> Self {
        Self {
            language: UNKNOWN.to_string(),
            framework: UNKNOWN.to_string(),
            database: UNKNOWN.to_string(),
            project_type: UNKNOWN.to_string(),
        }
    }

    pub fn has_language(&self) -> bool {
        is_known(&self.language)
    }

    pub fn has_database(&self) -> bool {
        is_known(&self.database)
    }

    /// `Language + Framework`, skipping unknown parts. `None` if both are unknown.
    pub fn stack_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.language.as_str(), self.framework.as_str()]
            .into_iter()
            .filter(|v| is_known(v))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" + "))
        }
    }

    pub fn database_label(&self) -> Option<&str> {
        self.has_database().then_some(self.database.as_str())
    }

    /// Replace unknown fields with the corresponding field of `defaults`.
    pub fn fill_missing(&mut self, defaults: &TechStack) {
        for (field, fallback) in [
            (&mut self.language, &defaults.language),
            (&mut self.framework, &defaults.framework),
            (&mut self.database, &defaults.database),
            (&mut self.project_type, &defaults.project_type),
        ] {
            if !is_known(field) && is_known(fallback) {
                field.clone_from(fallback);
            }
        }
    }

    pub fn is_web_project(&self) -> bool {
        self.project_type.to_ascii_lowercase().contains("web")
    }
}

/// Whether `value` carries information, as opposed to a blank or placeholder.
pub fn is_known(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty()
        || v.eq_ignore_ascii_case(UNKNOWN)
        || v.eq_ignore_ascii_case("na")
        || v.to_ascii_uppercase().starts_with("NEEDS CLARIFICATION"))
}

fn normalize(value: &str) -> String {
    let v = value.trim().trim_end_matches("**").trim();
    if is_known(v) {
        v.to_string()
    } else {
        UNKNOWN.to_string()
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

static HEADING_RE: OnceLock<Regex> = OnceLock::new();
static STACK_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static FIELD_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| Regex::new(r"^\s*(#{1,6})\s").unwrap())
}

fn stack_heading_re() -> &'static Regex {
    STACK_HEADING_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*#{1,6}\s*(technology stack|tech stack|technical context)\s*:?\s*$")
            .unwrap()
    })
}

fn field_re() -> &'static Regex {
    FIELD_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:[-*+]\s+)?\**\s*(language(?:\s*/\s*version)?|framework|primary dependencies|database|storage|project type)\s*\**\s*:\s*\**\s*(.*?)\s*$",
        )
        .unwrap()
    })
}

fn heading_level(line: &str) -> Option<usize> {
    heading_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().len())
}

/// Lines of the technology section, or the whole document if there is none.
fn stack_section(plan: &str) -> Vec<&str> {
    let lines: Vec<&str> = plan.lines().collect();
    let Some(start) = lines.iter().position(|l| stack_heading_re().is_match(l)) else {
        return lines;
    };
    let level = heading_level(lines[start]).unwrap_or(1);
    lines[start + 1..]
        .iter()
        .take_while(|l| heading_level(l).map_or(true, |lvl| lvl > level))
        .copied()
        .collect()
}

/// Extract language, framework, database and project type from plan text.
///
/// Never fails; missing or placeholder fields come back as [`UNKNOWN`].
pub fn extract_tech_stack(plan: &str) -> TechStack {
    let mut stack = TechStack::unknown();
    for line in stack_section(plan) {
        let Some(caps) = field_re().captures(line) else {
            continue;
        };
        let key = caps[1].to_ascii_lowercase();
        let slot = if key.starts_with("language") {
            &mut stack.language
        } else if key == "framework" || key == "primary dependencies" {
            &mut stack.framework
        } else if key == "database" || key == "storage" {
            &mut stack.database
        } else {
            &mut stack.project_type
        };
        // First mention wins.
        if !is_known(slot) {
            *slot = normalize(&caps[2]);
        }
    }
    stack
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
