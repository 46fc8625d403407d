//! Publishes theme changes from `config.toml` as they are written.
//!
//! The directory is watched rather than the file so that editors which
//! save by rename keep being seen.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use studyverse_core::{Config, ThemeChannel};

/// Keeps the file watcher alive; dropping it stops publishing.
pub struct ThemeWatcher {
    _watcher: RecommendedWatcher,
}

impl ThemeWatcher {
    pub fn spawn(config_path: PathBuf, theme: Arc<ThemeChannel>) -> notify::Result<Self> {
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    apply(&event, &config_path, &theme);
                }
                Err(e) => tracing::warn!(error = %e, "config watch error"),
            },
            NotifyConfig::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), "watching config");
        Ok(Self { _watcher: watcher })
    }
}

/// Re-read the config when `event` wrote to it. Returns whether the
/// published theme changed.
fn apply(event: &Event, config_path: &Path, theme: &ThemeChannel) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return false;
    }
    let file_name = config_path.file_name();
    if !event.paths.iter().any(|p| p.file_name() == file_name) {
        return false;
    }
    // A truncating write shows up as an empty file first.
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) if !content.trim().is_empty() => content,
        Ok(_) => return false,
        Err(e) => {
            tracing::debug!(error = %e, "config not readable yet");
            return false;
        }
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => theme.publish(config.ui.theme),
        Err(e) => {
            tracing::debug!(error = %e, "config not parseable yet");
            false
        }
    }
}
