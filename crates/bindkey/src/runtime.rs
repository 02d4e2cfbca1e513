//! Daemon runtime: permission polling, tap wiring, and the dispatch loop.

use std::{sync::Arc, time::Duration};

use bindkey_engine::{Engine, EngineMsg, EngineNotifier};
use bindkey_registry::Registry;
use mac_eventtap::{BindingIndex, Monitor, TapEvent};
use mac_keycombo::KeyCombination;
use thiserror::Error as ThisError;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Convenient result type for the binary.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level errors the binary can exit with.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Registry failure (store I/O or decode).
    #[error("registry error: {0}")]
    Registry(#[from] bindkey_registry::Error),
    /// Dispatcher failure from a direct engine query.
    #[error("engine error: {0}")]
    Engine(#[from] bindkey_engine::Error),
    /// Runtime construction failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Adapter giving the tap read-only visibility into the registry.
struct RegistryIndex(Arc<Registry>);

impl BindingIndex for RegistryIndex {
    fn is_bound(&self, combo: &KeyCombination) -> bool {
        self.0.lookup(combo).is_some()
    }
}

/// Run the daemon until interrupted: poll permissions once per second,
/// keep the monitor running while authorized, and dispatch tap events.
pub async fn run_daemon(registry: Arc<Registry>, engine: Engine) -> Result<()> {
    let (tap_tx, tap_rx) = crossbeam_channel::unbounded();
    let monitor = Monitor::new(Arc::new(RegistryIndex(registry.clone())), tap_tx);

    // Bridge the tap's blocking channel onto the async runtime.
    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        for ev in tap_rx.iter() {
            if ev_tx.send(ev).is_err() {
                break;
            }
        }
    });

    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let notifier = EngineNotifier::new(msg_tx);
    tokio::spawn(report_notifications(msg_rx));

    info!(shortcuts = registry.all().len(), "daemon_started");

    // Guide the user to System Settings at most once per run.
    let mut prompted = false;
    let mut poll = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = poll.tick() => {
                if permissions::check_permissions().fully_authorized() {
                    if !monitor.is_monitoring()
                        && let Err(e) = monitor.start()
                    {
                        warn!(error = %e, "monitor_start_failed");
                    }
                } else if monitor.is_monitoring() {
                    warn!("permissions_revoked_stopping_monitor");
                    monitor.stop();
                } else if !prompted {
                    prompted = true;
                    warn!("permissions_missing_waiting");
                    if let Err(e) = permissions::open_accessibility_settings() {
                        warn!(error = %e, "open_settings_failed");
                    }
                }
            }
            Some(ev) = ev_rx.recv() => {
                handle_tap_event(ev, &registry, &engine, &notifier);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown_requested");
                monitor.stop();
                return Ok(());
            }
        }
    }
}

// Resolve a tap event against the registry and hand actions to the engine.
// Execution runs on its own task; the engine's internal lock keeps actions
// serialized, so the event loop stays responsive during long scripts.
fn handle_tap_event(
    ev: TapEvent,
    registry: &Arc<Registry>,
    engine: &Engine,
    notifier: &EngineNotifier,
) {
    match ev {
        TapEvent::Triggered(combo) => {
            let Some(shortcut) = registry.lookup(&combo) else {
                // Binding removed between tap classification and dispatch.
                return;
            };
            registry.record_use(shortcut.id);
            let _ = notifier.send_triggered(combo.display_string(), shortcut.action.display_name());
            let engine = engine.clone();
            let notifier = notifier.clone();
            tokio::spawn(async move {
                if let Err(e) = engine.execute(&shortcut.action).await {
                    let _ = notifier.send_action_failed(shortcut.action.display_name(), &e);
                }
            });
        }
        TapEvent::Unknown(combo) => {
            let _ = notifier.send_unknown_combo(combo.display_string());
        }
    }
}

async fn report_notifications(mut rx: mpsc::UnboundedReceiver<EngineMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            EngineMsg::Triggered { combo, action } => {
                info!(%combo, %action, "shortcut_triggered");
            }
            EngineMsg::ActionFailed { action, error } => {
                warn!(%action, %error, "action_failed");
            }
            EngineMsg::UnknownCombo { combo } => {
                info!(%combo, "unknown_combination");
            }
        }
    }
}
