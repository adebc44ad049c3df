//! Body merge: render the template on first run, then keep the
//! "Active Technologies" and "Recent Changes" sections current.
//!
//! Every entry is tagged with its feature id, so re-running for the same
//! feature supersedes that feature's entries instead of adding new ones.
//! Running twice with the same inputs yields byte-identical output.

use crate::plan::TechStack;
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_HISTORY_LIMIT: usize = 3;

pub const ACTIVE_TECHNOLOGIES: &str = "## Active Technologies";
pub const RECENT_CHANGES: &str = "## Recent Changes";

// Template placeholders
pub const PH_PROJECT_NAME: &str = "[PROJECT NAME]";
pub const PH_DATE: &str = "[DATE]";
pub const PH_TECHNOLOGIES: &str = "[EXTRACTED FROM ALL PLAN.MD FILES]";
pub const PH_STRUCTURE: &str = "[ACTUAL STRUCTURE FROM PLANS]";
pub const PH_COMMANDS: &str = "[ONLY COMMANDS FOR ACTIVE TECHNOLOGIES]";
pub const PH_CONVENTIONS: &str = "[LANGUAGE-SPECIFIC, ONLY FOR LANGUAGES IN USE]";
pub const PH_RECENT_CHANGES: &str = "[LAST 3 FEATURES AND WHAT THEY ADDED]";

/// Inputs to a merge other than the facts themselves.
#[derive(Debug, Clone)]
pub struct MergeContext {
    pub feature_id: String,
    pub project_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub history_limit: usize,
}

impl MergeContext {
    pub fn new(feature_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            feature_id: feature_id.into(),
            project_name: project_name.into(),
            date: today(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Entry rendering
// ---------------------------------------------------------------------------

/// `- Python + FastAPI (001-x)` plus `- PostgreSQL (001-x)` when a database is known.
pub fn technology_entries(facts: &TechStack, feature_id: &str) -> Vec<String> {
    let mut entries = Vec::new();
    if let Some(stack) = facts.stack_label() {
        entries.push(format!("- {stack} ({feature_id})"));
    }
    if let Some(db) = facts.database_label() {
        entries.push(format!("- {db} ({feature_id})"));
    }
    entries
}

/// `- 001-x: Added Python + FastAPI`
pub fn change_entry(facts: &TechStack, feature_id: &str) -> String {
    let added: Vec<String> = facts
        .stack_label()
        .into_iter()
        .chain(facts.database_label().map(str::to_string))
        .collect();
    if added.is_empty() {
        format!("- {feature_id}: Updated agent context")
    } else {
        format!("- {feature_id}: Added {}", added.join(" + "))
    }
}

fn project_structure(facts: &TechStack) -> String {
    if facts.is_web_project() {
        "```text\nbackend/\nfrontend/\ntests/\n```".to_string()
    } else {
        "```text\nsrc/\ntests/\n```".to_string()
    }
}

fn commands_for(facts: &TechStack) -> String {
    if !facts.has_language() {
        return "# Add commands for your stack".to_string();
    }
    let lang = facts.language.to_ascii_lowercase();
    let cmds = if lang.contains("python") {
        "cd src && pytest && ruff check ."
    } else if lang.contains("rust") {
        "cargo test && cargo clippy"
    } else if lang.contains("javascript") || lang.contains("typescript") || lang.contains("node") {
        "npm test && npm run lint"
    } else {
        return format!("# Add commands for {}", facts.language);
    };
    cmds.to_string()
}

fn conventions_for(facts: &TechStack) -> String {
    if facts.has_language() {
        format!("{}: Follow standard conventions", facts.language)
    } else {
        "Follow standard conventions".to_string()
    }
}

/// Substitute every placeholder in `template`.
pub fn render_template(template: &str, facts: &TechStack, ctx: &MergeContext) -> String {
    template
        .replace(PH_PROJECT_NAME, &ctx.project_name)
        .replace(PH_DATE, &ctx.date)
        .replace(
            PH_TECHNOLOGIES,
            &technology_entries(facts, &ctx.feature_id).join("\n"),
        )
        .replace(PH_STRUCTURE, &project_structure(facts))
        .replace(PH_COMMANDS, &commands_for(facts))
        .replace(PH_CONVENTIONS, &conventions_for(facts))
        .replace(PH_RECENT_CHANGES, &change_entry(facts, &ctx.feature_id))
}

// ---------------------------------------------------------------------------
// Section editing
// ---------------------------------------------------------------------------

/// Indices of level-1/2 headings outside code fences.
fn heading_positions(lines: &[String]) -> Vec<usize> {
    let mut in_fence = false;
    let mut out = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && (line.starts_with("# ") || line.starts_with("## ")) {
            out.push(i);
        }
    }
    out
}

/// `(heading_index, end_exclusive)` of the section under `heading`.
fn find_section(lines: &[String], heading: &str) -> Option<(usize, usize)> {
    let headings = heading_positions(lines);
    let pos = headings
        .iter()
        .position(|&i| lines[i].trim_end().eq_ignore_ascii_case(heading))?;
    let start = headings[pos];
    let end = headings.get(pos + 1).copied().unwrap_or(lines.len());
    Some((start, end))
}

/// Text after a `-`, `*` or `+` list marker.
fn bullet_text(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .into_iter()
        .find_map(|marker| line.strip_prefix(marker))
}

fn is_bullet(line: &str) -> bool {
    bullet_text(line).is_some()
}

/// Feature id of a `- <id>: ...` change entry.
fn change_id(line: &str) -> Option<&str> {
    let rest = bullet_text(line)?;
    Some(rest.split_once(':').map_or(rest, |(id, _)| id).trim())
}

/// Put `entries` into a section that currently has no bullets, keeping a blank
/// line on either side.
fn insert_into_empty(section: &mut Vec<String>, mut entries: Vec<String>, followed_by_heading: bool) {
    let at = if section.first().is_some_and(|l| l.trim().is_empty()) {
        1
    } else {
        entries.insert(0, String::new());
        0
    };
    let after = at + entries.len();
    section.splice(at..at, entries);
    match section.get(after) {
        Some(l) if !l.trim().is_empty() => section.insert(after, String::new()),
        None if followed_by_heading => section.push(String::new()),
        _ => {}
    }
}

fn append_section(lines: &mut Vec<String>, heading: &str, entries: Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(heading.to_string());
    lines.push(String::new());
    lines.extend(entries);
    lines.push(String::new());
}

fn update_active_technologies(lines: &mut Vec<String>, entries: Vec<String>, feature_id: &str) {
    let Some((start, end)) = find_section(lines, ACTIVE_TECHNOLOGIES) else {
        if !entries.is_empty() {
            append_section(lines, ACTIVE_TECHNOLOGIES, entries);
        }
        return;
    };

    let tag = format!("({feature_id})");
    let owned = |l: &String| is_bullet(l) && l.trim_end().ends_with(&tag);

    let mut section: Vec<String> = lines[start + 1..end].to_vec();
    let first_owned = section.iter().position(owned);
    if first_owned.is_none() && entries.is_empty() {
        return;
    }
    section.retain(|l| !owned(l));

    if let Some(last) = section.iter().rposition(|l| is_bullet(l)) {
        section.splice(last + 1..last + 1, entries);
    } else if let Some(at) = first_owned {
        section.splice(at..at, entries);
    } else {
        insert_into_empty(&mut section, entries, end < lines.len());
    }

    lines.splice(start + 1..end, section);
}

fn update_recent_changes(lines: &mut Vec<String>, entry: String, feature_id: &str, limit: usize) {
    let Some((start, end)) = find_section(lines, RECENT_CHANGES) else {
        append_section(lines, RECENT_CHANGES, vec![entry]);
        return;
    };

    let mut section: Vec<String> = lines[start + 1..end].to_vec();
    let first_bullet = section.iter().position(|l| is_bullet(l));

    let mut kept = vec![entry];
    let mut seen = vec![feature_id.to_string()];
    for line in section.iter().filter(|l| is_bullet(l)) {
        let id = change_id(line).unwrap_or_default();
        if !seen.iter().any(|s| s == id) {
            seen.push(id.to_string());
            kept.push(line.clone());
        }
    }
    kept.truncate(limit.max(1));

    section.retain(|l| !is_bullet(l));
    match first_bullet {
        Some(at) => {
            section.splice(at..at, kept);
        }
        None => insert_into_empty(&mut section, kept, end < lines.len()),
    }

    lines.splice(start + 1..end, section);
}

static LAST_UPDATED_RE: OnceLock<Regex> = OnceLock::new();

fn last_updated_re() -> &'static Regex {
    LAST_UPDATED_RE.get_or_init(|| {
        Regex::new(r"(Last updated(?:\*\*)?:(?:\*\*)?\s*)\d{4}-\d{2}-\d{2}").unwrap()
    })
}

/// Merge `facts` for `ctx.feature_id` into `existing`, or into a fresh render
/// of `template` when there is no existing body.
pub fn merge_body(
    existing: Option<&str>,
    template: &str,
    facts: &TechStack,
    ctx: &MergeContext,
) -> String {
    let base = match existing {
        Some(body) => body.to_string(),
        None => render_template(template, facts, ctx),
    };

    let mut lines: Vec<String> = base.split('\n').map(str::to_string).collect();
    update_active_technologies(
        &mut lines,
        technology_entries(facts, &ctx.feature_id),
        &ctx.feature_id,
    );
    update_recent_changes(
        &mut lines,
        change_entry(facts, &ctx.feature_id),
        &ctx.feature_id,
        ctx.history_limit,
    );
    let merged = lines.join("\n");

    last_updated_re()
        .replace_all(&merged, format!("${{1}}{}", ctx.date).as_str())
        .into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
