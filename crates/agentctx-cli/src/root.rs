use agentctx_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the repository root.
///
/// Priority:
/// 1. `--root` flag / `AGENTCTX_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.specify/`
/// 3. Walk upward from `cwd` looking for `.git`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd)
}

fn find_root_from(start: &Path) -> PathBuf {
    if let Some(dir) = find_upward(start, |d| d.join(paths::SPECIFY_DIR).is_dir()) {
        return dir;
    }
    // `.git` is a file in worktrees and submodules.
    if let Some(dir) = find_upward(start, |d| d.join(".git").exists()) {
        return dir;
    }
    start.to_path_buf()
}

fn find_upward(start: &Path, found: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    start.ancestors().find(|d| found(d)).map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_specify_dir_from_subdir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();
        assert_eq!(find_root_from(&subdir), dir.path());
    }

    #[test]
    fn specify_dir_beats_nested_git() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".specify")).unwrap();
        let nested = dir.path().join("vendor/lib");
        std::fs::create_dir_all(nested.join(".git")).unwrap();
        assert_eq!(find_root_from(&nested), dir.path());
    }

    #[test]
    fn falls_back_to_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let subdir = dir.path().join("docs");
        std::fs::create_dir_all(&subdir).unwrap();
        assert_eq!(find_root_from(&subdir), dir.path());
    }
}
