use crate::agent::AgentType;
use crate::error::Result;
use crate::merge::DEFAULT_HISTORY_LIMIT;
use crate::paths;
use crate::plan::{TechStack, UNKNOWN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// `.specify/config.yaml`. Every field is optional; a missing file is the
/// same as an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Overrides the repository directory name in `[PROJECT NAME]`.
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    /// Template path, relative to the repository root.
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Agents refreshed by a bare `update`, in addition to files already on disk.
    #[serde(default)]
    pub agents: Vec<String>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: None,
            project_type: None,
            language: None,
            framework: None,
            database: None,
            template: None,
            history_limit: default_history_limit(),
            agents: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn template_path(&self, root: &Path) -> PathBuf {
        match &self.template {
            Some(p) => root.join(p),
            None => paths::template_path(root),
        }
    }

    /// Project name for the template: config override, else the root's directory name.
    pub fn project_name(&self, root: &Path) -> String {
        self.project_name.clone().unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// Fallback facts for fields a plan leaves out.
    pub fn tech_defaults(&self) -> TechStack {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        TechStack {
            language: or_unknown(&self.language),
            framework: or_unknown(&self.framework),
            database: or_unknown(&self.database),
            project_type: or_unknown(&self.project_type),
        }
    }

    /// Configured agents that parse; unknown names are reported by [`Config::validate`].
    pub fn default_agents(&self) -> Vec<AgentType> {
        self.agents.iter().filter_map(|a| a.parse().ok()).collect()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.history_limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "history_limit is 0; the current feature is still recorded".to_string(),
            });
        }

        for name in &self.agents {
            if name.parse::<AgentType>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown agent '{name}' in agents"),
                });
            }
        }

        if let Some(t) = &self.template {
            if t.is_absolute() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "template '{}' must be relative to the repository root",
                        t.display()
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
