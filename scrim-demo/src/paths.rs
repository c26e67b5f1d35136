//! Where the demo keeps its config and logs.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "scrim";
const APPLICATION: &str = "scrim-demo";

/// Archived logs kept besides `latest.log`.
const MAX_ARCHIVED_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// `config.json` in the platform config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/scrim-demo/config.json`
/// - macOS: `~/Library/Application Support/dev.scrim.scrim-demo/config.json`
pub fn config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// `latest.log` in the platform cache directory, created if missing.
pub fn log_file() -> Option<PathBuf> {
    let dir = cache_dir()?;
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("latest.log"))
}

/// Move the previous `latest.log` aside under a timestamped name and prune
/// old archives. Runs before the logger exists, so failures are silent.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join("latest.log");
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{}.log", stamp)));
    }
    prune_archives(&cache);
}

fn prune_archives(cache: &Path) {
    let Ok(entries) = fs::read_dir(cache) else { return };
    let mut archives: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();
    if archives.len() <= MAX_ARCHIVED_LOGS {
        return;
    }
    archives.sort_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok());
    let excess = archives.len() - MAX_ARCHIVED_LOGS;
    for entry in archives.iter().take(excess) {
        let _ = fs::remove_file(entry.path());
    }
}
