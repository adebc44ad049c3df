use crate::agent::AgentType;
use crate::config::{Config, WarnLevel};
use crate::error::{ContextError, Result};
use crate::frontmatter;
use crate::io;
use crate::merge::{self, MergeContext};
use crate::paths;
use crate::plan::{self, TechStack};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Created,
    Updated,
    Unchanged,
}

impl UpdateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateStatus::Created => "created",
            UpdateStatus::Updated => "updated",
            UpdateStatus::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub agent: AgentType,
    pub path: PathBuf,
    pub status: UpdateStatus,
    pub feature: String,
    pub tech: TechStack,
}

/// Everything an update needs besides the agent: repository root, feature and
/// merge settings.
#[derive(Debug, Clone)]
pub struct UpdateRequest<'a> {
    pub root: &'a Path,
    pub feature: &'a str,
    pub config: &'a Config,
    pub date: String,
}

impl<'a> UpdateRequest<'a> {
    pub fn new(root: &'a Path, feature: &'a str, config: &'a Config) -> Self {
        Self {
            root,
            feature,
            config,
            date: merge::today(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    fn merge_context(&self) -> MergeContext {
        MergeContext::new(self.feature, self.config.project_name(self.root))
            .with_date(self.date.clone())
            .with_history_limit(self.config.history_limit)
    }
}

/// Tech stack for `feature`: from its plan, gaps filled from config.
///
/// An unreadable plan is not fatal; early in a feature it may not exist yet.
pub fn load_tech_stack(root: &Path, feature: &str, config: &Config) -> TechStack {
    let path = paths::plan_path(root, feature);
    let mut stack = match std::fs::read_to_string(&path) {
        Ok(text) => plan::extract_tech_stack(&text),
        Err(source) => {
            let err = ContextError::UnreadablePlan { path, source };
            tracing::warn!("{err}; continuing without plan facts");
            TechStack::unknown()
        }
    };
    stack.fill_missing(&config.tech_defaults());
    stack
}

/// Pure part of an update: new file content from what is on disk now.
pub fn render(
    existing: Option<&str>,
    template: &str,
    facts: &TechStack,
    ctx: &MergeContext,
    agent: AgentType,
) -> String {
    let body = merge::merge_body(existing, template, facts, ctx);
    frontmatter::ensure(&body, agent.format())
}

fn log_config_warnings(config: &Config) {
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => tracing::error!("config: {}", w.message),
        }
    }
}

/// Refresh the context file for one agent.
pub fn update_agent(req: &UpdateRequest<'_>, agent: AgentType) -> Result<UpdateOutcome> {
    let path = agent.path(req.root);
    let existing = io::read_optional(&path)?;
    // An empty file (e.g. from `touch`) has no body worth keeping.
    let body = existing.as_deref().filter(|s| !s.trim().is_empty());

    // Only a file without a body needs the template. Load it before anything is written.
    let template = match body {
        Some(_) => String::new(),
        None => {
            let template_path = req.config.template_path(req.root);
            io::read_optional(&template_path)?
                .ok_or(ContextError::MissingTemplate(template_path))?
        }
    };

    let tech = load_tech_stack(req.root, req.feature, req.config);
    let content = render(
        body,
        &template,
        &tech,
        &req.merge_context(),
        agent,
    );

    if agent.format().requires_frontmatter() && !frontmatter::satisfies_invariant(&content) {
        return Err(ContextError::FrontmatterInvariant(path));
    }

    let status = match existing.as_deref() {
        Some(old) if old == content => UpdateStatus::Unchanged,
        Some(_) => UpdateStatus::Updated,
        None => UpdateStatus::Created,
    };
    if status != UpdateStatus::Unchanged {
        io::atomic_write(&path, content.as_bytes())?;
    }
    tracing::info!(
        agent = %agent,
        path = %path.display(),
        status = status.as_str(),
        "agent context"
    );

    Ok(UpdateOutcome {
        agent,
        path,
        status,
        feature: req.feature.to_string(),
        tech,
    })
}

/// Agents whose files `update_all` touches: existing files plus configured
/// agents, one agent per distinct path. Falls back to Claude.
pub fn agents_to_update(root: &Path, config: &Config) -> Vec<AgentType> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut agents = Vec::new();
    let configured = config.default_agents();
    for agent in AgentType::all() {
        let wanted = agent.path(root).is_file() || configured.contains(agent);
        if wanted && !seen.contains(&agent.relative_path()) {
            seen.push(agent.relative_path());
            agents.push(*agent);
        }
    }
    if agents.is_empty() {
        agents.push(AgentType::Claude);
    }
    agents
}

/// Refresh every agent file in the repository.
pub fn update_all(req: &UpdateRequest<'_>) -> Result<Vec<UpdateOutcome>> {
    log_config_warnings(req.config);
    agents_to_update(req.root, req.config)
        .into_iter()
        .map(|agent| update_agent(req, agent))
        .collect()
}

/// Refresh one agent's file, logging config warnings first.
pub fn update_one(req: &UpdateRequest<'_>, agent: AgentType) -> Result<UpdateOutcome> {
    log_config_warnings(req.config);
    update_agent(req, agent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
