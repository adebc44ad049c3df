use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain markdown body.
    Markdown,
    /// Cursor rules file: markdown body behind a fixed YAML frontmatter block.
    Mdc,
}

impl OutputFormat {
    pub fn for_path(path: &Path) -> OutputFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some("mdc") => OutputFormat::Mdc,
            _ => OutputFormat::Markdown,
        }
    }

    pub fn requires_frontmatter(self) -> bool {
        matches!(self, OutputFormat::Mdc)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Mdc => "mdc",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgentType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentType {
    Claude,
    Gemini,
    Copilot,
    CursorAgent,
    Qwen,
    Opencode,
    Codex,
    Windsurf,
    Kilocode,
    Auggie,
    Roo,
    Codebuddy,
    Qoder,
    Amp,
    Shai,
    Q,
    Bob,
}

impl AgentType {
    pub fn all() -> &'static [AgentType] {
        &[
            AgentType::Claude,
            AgentType::Gemini,
            AgentType::Copilot,
            AgentType::CursorAgent,
            AgentType::Qwen,
            AgentType::Opencode,
            AgentType::Codex,
            AgentType::Windsurf,
            AgentType::Kilocode,
            AgentType::Auggie,
            AgentType::Roo,
            AgentType::Codebuddy,
            AgentType::Qoder,
            AgentType::Amp,
            AgentType::Shai,
            AgentType::Q,
            AgentType::Bob,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentType::Claude => "claude",
            AgentType::Gemini => "gemini",
            AgentType::Copilot => "copilot",
            AgentType::CursorAgent => "cursor-agent",
            AgentType::Qwen => "qwen",
            AgentType::Opencode => "opencode",
            AgentType::Codex => "codex",
            AgentType::Windsurf => "windsurf",
            AgentType::Kilocode => "kilocode",
            AgentType::Auggie => "auggie",
            AgentType::Roo => "roo",
            AgentType::Codebuddy => "codebuddy",
            AgentType::Qoder => "qoder",
            AgentType::Amp => "amp",
            AgentType::Shai => "shai",
            AgentType::Q => "q",
            AgentType::Bob => "bob",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentType::Claude => "Claude",
            AgentType::Gemini => "Gemini CLI",
            AgentType::Copilot => "GitHub Copilot",
            AgentType::CursorAgent => "Cursor IDE",
            AgentType::Qwen => "Qwen Code",
            AgentType::Opencode => "opencode",
            AgentType::Codex => "Codex CLI",
            AgentType::Windsurf => "Windsurf",
            AgentType::Kilocode => "Kilo Code",
            AgentType::Auggie => "Auggie CLI",
            AgentType::Roo => "Roo Code",
            AgentType::Codebuddy => "CodeBuddy CLI",
            AgentType::Qoder => "Qoder CLI",
            AgentType::Amp => "Amp",
            AgentType::Shai => "SHAI",
            AgentType::Q => "Amazon Q Developer CLI",
            AgentType::Bob => "IBM Bob",
        }
    }

    /// Context file location relative to the repository root.
    pub fn relative_path(self) -> &'static str {
        match self {
            AgentType::Claude => "CLAUDE.md",
            AgentType::Gemini => "GEMINI.md",
            AgentType::Copilot => ".github/agents/copilot-instructions.md",
            AgentType::CursorAgent => ".cursor/rules/specify-rules.mdc",
            AgentType::Qwen => "QWEN.md",
            AgentType::Opencode
            | AgentType::Codex
            | AgentType::Amp
            | AgentType::Q
            | AgentType::Bob => "AGENTS.md",
            AgentType::Windsurf => ".windsurf/rules/specify-rules.md",
            AgentType::Kilocode => ".kilocode/rules/specify-rules.md",
            AgentType::Auggie => ".augment/rules/specify-rules.md",
            AgentType::Roo => ".roo/rules/specify-rules.md",
            AgentType::Codebuddy => "CODEBUDDY.md",
            AgentType::Qoder => "QODER.md",
            AgentType::Shai => "SHAI.md",
        }
    }

    pub fn path(self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    pub fn format(self) -> OutputFormat {
        OutputFormat::for_path(Path::new(self.relative_path()))
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgentType {
    type Err = crate::error::ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| crate::error::ContextError::UnknownAgent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip_for_every_agent() {
        for agent in AgentType::all() {
            let parsed: AgentType = agent.as_str().parse().unwrap();
            assert_eq!(parsed, *agent);
        }
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let err = "vim".parse::<AgentType>().unwrap_err();
        assert!(err.to_string().contains("unknown agent type 'vim'"));
    }

    #[test]
    fn only_cursor_uses_mdc() {
        for agent in AgentType::all() {
            let expected = if *agent == AgentType::CursorAgent {
                OutputFormat::Mdc
            } else {
                OutputFormat::Markdown
            };
            assert_eq!(agent.format(), expected, "{agent}");
        }
    }

    #[test]
    fn conventional_paths() {
        let root = Path::new("/repo");
        assert_eq!(
            AgentType::CursorAgent.path(root),
            PathBuf::from("/repo/.cursor/rules/specify-rules.mdc")
        );
        assert_eq!(AgentType::Claude.path(root), PathBuf::from("/repo/CLAUDE.md"));
        assert_eq!(AgentType::Codex.path(root), AgentType::Opencode.path(root));
    }

    #[test]
    fn serde_uses_cli_names() {
        let yaml = serde_yaml::to_string(&AgentType::CursorAgent).unwrap();
        assert_eq!(yaml.trim(), "cursor-agent");
    }
}
