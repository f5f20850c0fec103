//! Locating the engine's runtime data directory.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// First existing candidate among the workspace layout, a flat `data/`, and
/// the same two next to (or one above) the executable.
fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("dark_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("dark_engine/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("dark_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("dark_engine/data"))
}
