use std::path::{Path, PathBuf};

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Expand a path and resolve it against `base` when it is still relative.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper function for cross-platform path comparison
    fn normalize_path_separator(s: &str) -> String {
        s.replace('\\', "/")
    }

    #[test]
    fn given_relative_path_when_resolving_then_joins_base() {
        let resolved = resolve_path(Path::new("wheel.json"), Path::new("/etc/flavortree"));
        assert_eq!(
            normalize_path_separator(&resolved.to_string_lossy()),
            "/etc/flavortree/wheel.json"
        );
    }

    #[test]
    fn given_absolute_path_when_resolving_then_unchanged() {
        let resolved = resolve_path(Path::new("/data/wheel.json"), Path::new("/etc"));
        assert_eq!(resolved, PathBuf::from("/data/wheel.json"));
    }
}
