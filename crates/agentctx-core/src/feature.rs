//! Which feature is being worked on, and which came before it.
//!
//! Git is the usual source (the checked-out `NNN-name` branch). Repositories
//! without git fall back to the numbered directories under `specs/`.

use crate::error::{ContextError, Result};
use crate::paths;
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait FeatureSource {
    /// Identifier of the feature currently being worked on.
    fn current_feature(&self) -> Result<String>;

    /// Up to `limit` feature identifiers, most recent first.
    fn recent_features(&self, limit: usize) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// `Some` when `root` is inside a git work tree and `git` is on PATH.
    pub fn discover(root: &Path) -> Option<Self> {
        which::which("git").ok()?;
        let repo = Self {
            root: root.to_path_buf(),
        };
        let inside = repo.git(&["rev-parse", "--is-inside-work-tree"]).ok()?;
        (inside == "true").then_some(repo)
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(args = ?args, cwd = %self.root.display(), "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ContextError::Git(format!("git {}: {stderr}", args.join(" "))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn current_branch(&self) -> Result<String> {
        // symbolic-ref works on an unborn branch, where rev-parse HEAD fails.
        self.git(&["symbolic-ref", "--short", "HEAD"])
            .or_else(|_| self.git(&["rev-parse", "--abbrev-ref", "HEAD"]))
    }
}

impl FeatureSource for GitRepo {
    fn current_feature(&self) -> Result<String> {
        let branch = self.current_branch()?;
        if paths::is_feature_id(&branch) {
            Ok(branch)
        } else {
            Err(ContextError::NotFeatureBranch(branch))
        }
    }

    fn recent_features(&self, limit: usize) -> Result<Vec<String>> {
        let refs = self.git(&[
            "for-each-ref",
            "--sort=-committerdate",
            "--format=%(refname:short)",
            "refs/heads/",
        ])?;
        let mut features: Vec<String> = refs
            .lines()
            .map(str::trim)
            .filter(|b| paths::is_feature_id(b))
            .map(str::to_string)
            .collect();
        // An unborn feature branch has no ref yet but is still the most recent.
        if let Ok(current) = self.current_feature() {
            if !features.contains(&current) {
                features.insert(0, current);
            }
        }
        features.truncate(limit);
        Ok(features)
    }
}

// ---------------------------------------------------------------------------
// specs/ directory
// ---------------------------------------------------------------------------

pub struct SpecsDir {
    root: PathBuf,
}

impl SpecsDir {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Feature directories, highest number first.
    fn features(&self) -> Result<Vec<String>> {
        let dir = paths::specs_dir(&self.root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut found: Vec<(u32, String)> = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(n) = paths::feature_number(&name) {
                found.push((n, name));
            }
        }
        found.sort_by(|a, b| b.cmp(a));
        Ok(found.into_iter().map(|(_, name)| name).collect())
    }
}

impl FeatureSource for SpecsDir {
    fn current_feature(&self) -> Result<String> {
        self.features()?
            .into_iter()
            .next()
            .ok_or(ContextError::NoFeature)
    }

    fn recent_features(&self, limit: usize) -> Result<Vec<String>> {
        let mut features = self.features()?;
        features.truncate(limit);
        Ok(features)
    }
}

// ---------------------------------------------------------------------------
// Explicit override
// ---------------------------------------------------------------------------

/// A feature named on the command line or via `SPECIFY_FEATURE`.
pub struct Pinned {
    feature: String,
    history: Box<dyn FeatureSource>,
}

impl FeatureSource for Pinned {
    fn current_feature(&self) -> Result<String> {
        Ok(self.feature.clone())
    }

    fn recent_features(&self, limit: usize) -> Result<Vec<String>> {
        let mut features = match self.history.recent_features(limit) {
            Ok(features) => features,
            Err(e) => {
                tracing::warn!("cannot list recent features: {e}; using {} only", self.feature);
                Vec::new()
            }
        };
        features.retain(|f| f != &self.feature);
        features.insert(0, self.feature.clone());
        features.truncate(limit);
        Ok(features)
    }
}

/// Pick the feature source for `root`: an explicit feature wins, then git,
/// then `specs/`.
pub fn resolve(root: &Path, explicit: Option<&str>) -> Box<dyn FeatureSource> {
    let discovered: Box<dyn FeatureSource> = match GitRepo::discover(root) {
        Some(git) => Box::new(git),
        None => {
            tracing::debug!(root = %root.display(), "no git work tree; using specs/");
            Box::new(SpecsDir::new(root))
        }
    };
    match explicit.map(str::trim).filter(|f| !f.is_empty()) {
        Some(feature) => Box::new(Pinned {
            feature: feature.to_string(),
            history: discovered,
        }),
        None => discovered,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
