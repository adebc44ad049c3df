use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("cannot read plan {}: {source}", path.display())]
    UnreadablePlan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("frontmatter must appear exactly once at the top of {}", .0.display())]
    FrontmatterInvariant(PathBuf),

    #[error("unknown agent type '{0}'")]
    UnknownAgent(String),

    #[error("not on a feature branch: '{0}' (expected a name like 001-feature-name)")]
    NotFeatureBranch(String),

    #[error("no feature found: create specs/NNN-name/ or set SPECIFY_FEATURE")]
    NoFeature,

    #[error("git: {0}")]
    Git(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ContextError>;
