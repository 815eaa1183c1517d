use std::fs;
use std::path::Path;
use std::process::Command;

// Best-effort queries against the git working copy the process runs in.
// Every function degrades to None (or false) when git is missing or the
// current directory is not a repository; run metadata must never take a
// training run down.

/// Commit hash of `HEAD`, if available.
pub fn commit() -> Option<String> {
    run_git(&["rev-parse", "HEAD"])
}

/// Name of the checked-out branch, if available.
pub fn branch() -> Option<String> {
    run_git(&["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Whether the working tree has uncommitted changes. `git diff --quiet`
/// exits non-zero exactly when the tree is dirty; a missing `git` reads as
/// clean.
pub fn is_dirty() -> bool {
    Command::new("git")
        .args(["diff", "--quiet"])
        .output()
        .map(|out| !out.status.success())
        .unwrap_or(false)
}

/// The working tree's diff against `HEAD`, if available. When `save_to` is
/// given and the diff is non-empty, it is also written to that path,
/// creating parent directories as needed.
pub fn diff(save_to: Option<&Path>) -> Option<String> {
    let text = run_git_raw(&["diff"])?;
    if let Some(path) = save_to {
        if !text.is_empty() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(path, &text);
        }
    }
    Some(text)
}

fn run_git(args: &[&str]) -> Option<String> {
    let text = run_git_raw(args)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn run_git_raw(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The test host may or may not have git and may or may not be a
    // repository, so these only pin down the degraded-result contract.

    #[test]
    fn queries_never_panic_and_trim_output() {
        if let Some(hash) = commit() {
            assert_eq!(hash, hash.trim());
            assert!(!hash.is_empty());
        }
        if let Some(name) = branch() {
            assert_eq!(name, name.trim());
            assert!(!name.is_empty());
        }
        let _ = is_dirty();
        let _ = diff(None);
    }
}
