//! Live view loop.
//!
//! Two timers drive the view: a fast clock repaint and a slower resolver
//! pass that re-reads the store, resolves the active timetable and fires
//! change notifications. The theme arrives over a watch channel, fed by a
//! file watcher on `config.toml`.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use studyverse_core::{
    BackgroundNotifier, Config, DesktopNotifier, LiveUpdate, LiveView, ThemeChannel,
};
use tokio::time::{interval, MissedTickBehavior};

use super::{open_store, CliResult};
use crate::config_watch::ThemeWatcher;
use crate::render::{color_enabled, status_line};

pub fn run() -> CliResult {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_loop())
}

async fn watch_loop() -> CliResult {
    let config = Config::load_or_default();
    let mut store = open_store()?;
    let theme = Arc::new(ThemeChannel::new(config.ui.theme));
    let mut theme_rx = theme.subscribe();
    let _theme_watcher = match ThemeWatcher::spawn(Config::path()?, Arc::clone(&theme)) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(error = %e, "theme changes will not be picked up");
            None
        }
    };
    let notifier = BackgroundNotifier::new(DesktopNotifier::new(config.notifications.enabled))?;
    let mut view = LiveView::new(notifier);
    let color = color_enabled();

    let mut clock = interval(Duration::from_secs(config.watch.clock_secs.max(1)));
    let mut resolver = interval(Duration::from_secs(config.watch.resolve_secs.max(1)));
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    resolver.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last: Option<LiveUpdate> = None;
    let mut status = String::new();
    let mut stdout = std::io::stdout();

    tracing::debug!(
        clock_secs = config.watch.clock_secs,
        resolve_secs = config.watch.resolve_secs,
        "watch started"
    );

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = clock.tick() => {
                let now = view.clock_tick(Local::now().time());
                write!(stdout, "\r{now}  {status}\x1b[K")?;
                stdout.flush()?;
            }
            _ = resolver.tick() => {
                store.reload();

                let update = view.resolve_tick(store.get_active(), Local::now().time());
                if let Some(event) = &update.change {
                    tracing::info!(?event, "activity changed");
                }
                status = status_line(
                    &update.resolution,
                    update.upcoming.as_ref(),
                    theme.current(),
                    color,
                );
                last = Some(update);
            }
            changed = theme_rx.changed() => {
                if changed.is_err() {
                    continue;
                }
                let current = *theme_rx.borrow_and_update();
                if let Some(update) = &last {
                    status = status_line(
                        &update.resolution,
                        update.upcoming.as_ref(),
                        current,
                        color,
                    );
                }
            }
        }
    }

    writeln!(stdout)?;
    Ok(())
}
