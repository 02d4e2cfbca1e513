//! Global keyboard monitor for macOS.
//!
//! Installs a CoreGraphics event tap on a dedicated thread and classifies
//! every key-down: bound combinations are swallowed and reported as
//! [`TapEvent::Triggered`], unknown modified chords are swallowed and
//! reported as [`TapEvent::Unknown`], and everything else passes through to
//! the foreground app untouched. The tap callback does no I/O; consumers
//! receive events over a crossbeam channel and act on their own thread.

use std::{sync::Arc, thread::JoinHandle};

use crossbeam_channel::Sender;
use mac_keycombo::KeyCombination;
use parking_lot::Mutex;
use tracing::{info, warn};

mod error;
pub mod policy;
mod sys;

pub use error::{Error, Result};
pub use policy::is_reserved;

use policy::Emit;
use sys::SysControl;

/// Lookup seam the tap uses to ask whether a combination is bound.
///
/// Implementations must be cheap and never block on I/O: this is called from
/// the event-tap callback for every modified key-down on the system.
pub trait BindingIndex: Send + Sync {
    /// Whether any shortcut currently owns this combination.
    fn is_bound(&self, combo: &KeyCombination) -> bool;
}

/// Event emitted by the tap to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapEvent {
    /// A bound combination was pressed and swallowed; fire its action.
    Triggered(KeyCombination),
    /// A modified chord nobody owns was pressed and swallowed.
    Unknown(KeyCombination),
}

// State shared with the tap callback.
struct TapShared {
    index: Arc<dyn BindingIndex>,
    tx: Sender<TapEvent>,
}

// Classify one key-down and emit to the consumer; returns whether the tap
// should swallow the event.
fn handle_key_down(shared: &TapShared, combo: KeyCombination, is_repeat: bool) -> bool {
    let bound = shared.index.is_bound(&combo);
    let d = policy::classify(&combo, bound, is_repeat);
    match d.emit {
        Some(Emit::Triggered) => {
            let _ = shared.tx.send(TapEvent::Triggered(combo));
        }
        Some(Emit::Unknown) => {
            let _ = shared.tx.send(TapEvent::Unknown(combo));
        }
        None => {}
    }
    d.intercept
}

struct Running {
    ctrl: Arc<SysControl>,
    handle: JoinHandle<()>,
}

/// Owns the event-tap thread. `start` and `stop` are idempotent.
pub struct Monitor {
    index: Arc<dyn BindingIndex>,
    tx: Sender<TapEvent>,
    running: Mutex<Option<Running>>,
}

impl Monitor {
    /// Create a monitor that resolves combinations through `index` and
    /// delivers classified events on `tx`. Nothing runs until [`start`].
    ///
    /// [`start`]: Monitor::start
    pub fn new(index: Arc<dyn BindingIndex>, tx: Sender<TapEvent>) -> Self {
        Self {
            index,
            tx,
            running: Mutex::new(None),
        }
    }

    /// Install the tap on a dedicated thread and wait for it to come up.
    ///
    /// A no-op when already running. Fails with
    /// [`Error::PermissionDenied`] when Input Monitoring has not been
    /// granted, and [`Error::EventTapStart`] when the OS refuses the tap.
    pub fn start(&self) -> Result<()> {
        let mut g = self.running.lock();
        if g.is_some() {
            return Ok(());
        }

        let ctrl = Arc::new(SysControl::new());
        let ctrl_thread = ctrl.clone();
        let shared = TapShared {
            index: self.index.clone(),
            tx: self.tx.clone(),
        };
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let handle = std::thread::Builder::new()
            .name("eventtap".into())
            .spawn(move || {
                if let Err(e) = sys::run_event_loop(shared, ready_tx, ctrl_thread) {
                    warn!(error = %e, "event_tap_thread_exited_with_error");
                }
            })
            .map_err(|_| Error::EventTapStart)?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *g = Some(Running { ctrl, handle });
                info!("monitor_started");
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(Error::EventTapStart)
            }
        }
    }

    /// Tear down the tap and join its thread. A no-op when not running.
    pub fn stop(&self) {
        let mut g = self.running.lock();
        if let Some(r) = g.take() {
            r.ctrl.stop();
            let _ = r.handle.join();
            info!("monitor_stopped");
        }
    }

    /// Whether the tap thread is currently installed.
    pub fn is_monitoring(&self) -> bool {
        self.running.lock().is_some()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crossbeam_channel::Receiver;

    use super::*;

    struct FixedIndex {
        bound: HashSet<KeyCombination>,
    }

    impl FixedIndex {
        fn new(specs: &[&str]) -> Self {
            Self {
                bound: specs
                    .iter()
                    .map(|s| KeyCombination::parse(s).expect("combo spec"))
                    .collect(),
            }
        }
    }

    impl BindingIndex for FixedIndex {
        fn is_bound(&self, combo: &KeyCombination) -> bool {
            self.bound.contains(combo)
        }
    }

    fn shared(specs: &[&str]) -> (TapShared, Receiver<TapEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            TapShared {
                index: Arc::new(FixedIndex::new(specs)),
                tx,
            },
            rx,
        )
    }

    fn combo(spec: &str) -> KeyCombination {
        KeyCombination::parse(spec).expect("combo spec")
    }

    #[test]
    fn bound_chord_is_swallowed_and_delivered_once() {
        let (shared, rx) = shared(&["cmd+shift+k"]);
        assert!(handle_key_down(&shared, combo("cmd+shift+k"), false));
        assert_eq!(rx.try_recv(), Ok(TapEvent::Triggered(combo("cmd+shift+k"))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unknown_chord_is_swallowed_with_one_notification() {
        let (shared, rx) = shared(&["cmd+shift+k"]);
        assert!(handle_key_down(&shared, combo("ctrl+opt+9"), false));
        assert_eq!(rx.try_recv(), Ok(TapEvent::Unknown(combo("ctrl+opt+9"))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unmodified_and_reserved_keys_pass_silently() {
        let (shared, rx) = shared(&["cmd+shift+k"]);
        assert!(!handle_key_down(&shared, combo("a"), false));
        assert!(!handle_key_down(&shared, combo("cmd+c"), false));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn held_chord_repeats_are_swallowed_without_refiring() {
        let (shared, rx) = shared(&["cmd+shift+k"]);
        assert!(handle_key_down(&shared, combo("cmd+shift+k"), false));
        assert!(handle_key_down(&shared, combo("cmd+shift+k"), true));
        assert!(handle_key_down(&shared, combo("cmd+shift+k"), true));
        assert_eq!(rx.iter().take(1).count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivery_survives_a_dropped_consumer() {
        let (shared, rx) = shared(&["cmd+shift+k"]);
        drop(rx);
        // Interception still applies so the chord never leaks through.
        assert!(handle_key_down(&shared, combo("cmd+shift+k"), false));
    }

    #[test]
    fn monitor_stop_without_start_is_a_noop() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let monitor = Monitor::new(Arc::new(FixedIndex::new(&[])), tx);
        assert!(!monitor.is_monitoring());
        monitor.stop();
        assert!(!monitor.is_monitoring());
    }
}
