//! Path utilities: expand `~/` in configured directories.

use std::path::PathBuf;

/// Resolve a leading `~` or `~/` against the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };
    match path.strip_prefix('~') {
        Some("") => home,
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
