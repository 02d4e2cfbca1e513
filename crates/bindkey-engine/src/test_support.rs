//! Mock collaborators for engine tests.
//!
//! Each mock records the calls it receives behind atomics or mutexes so
//! tests can assert ordering and short-circuit behavior without touching
//! the real OS services.

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    Error, Result,
    deps::{AutomationService, ClipboardOps, PastePoster, Workspace},
};

/// Workspace mock: records launches/opens, fails for configured bundles.
#[derive(Default)]
pub struct MockWorkspace {
    /// Bundle identifiers that should fail resolution.
    pub missing: Mutex<HashSet<String>>,
    /// Bundle identifiers launched, in order.
    pub launched: Mutex<Vec<String>>,
    /// URLs opened, in order.
    pub opened: Mutex<Vec<String>>,
}

impl MockWorkspace {
    /// Mark a bundle identifier as unresolvable.
    pub fn mark_missing(&self, bundle_id: &str) {
        self.missing.lock().insert(bundle_id.to_string());
    }
}

impl Workspace for MockWorkspace {
    fn launch_app(&self, bundle_id: &str) -> Result<()> {
        if self.missing.lock().contains(bundle_id) {
            return Err(Error::AppNotFound(bundle_id.to_string()));
        }
        self.launched.lock().push(bundle_id.to_string());
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

/// Automation-service mock with a fixed name list and optional failure.
#[derive(Default)]
pub struct MockAutomation {
    /// Names returned from `list_names`.
    pub names: Vec<String>,
    /// When set, every `run` fails with this message.
    pub fail_with: Option<String>,
    /// Automations run, in order.
    pub runs: Mutex<Vec<String>>,
}

impl AutomationService for MockAutomation {
    fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    fn run(&self, name: &str) -> Result<()> {
        if let Some(msg) = &self.fail_with {
            return Err(Error::Automation(msg.clone()));
        }
        self.runs.lock().push(name.to_string());
        Ok(())
    }
}

/// In-memory clipboard that records every state it passes through.
#[derive(Default)]
pub struct MockClipboard {
    content: Mutex<Option<String>>,
    /// Every value the clipboard has held, in order (None = cleared).
    pub history: Mutex<Vec<Option<String>>>,
}

impl MockClipboard {
    /// Seed the clipboard with prior content.
    pub fn seed(&self, text: &str) {
        *self.content.lock() = Some(text.to_string());
    }

    /// Current content snapshot.
    pub fn current(&self) -> Option<String> {
        self.content.lock().clone()
    }
}

impl ClipboardOps for MockClipboard {
    fn get_text(&self) -> Option<String> {
        self.content.lock().clone()
    }

    fn set_text(&self, text: &str) -> Result<()> {
        *self.content.lock() = Some(text.to_string());
        self.history.lock().push(Some(text.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.content.lock() = None;
        self.history.lock().push(None);
        Ok(())
    }
}

/// Paste poster mock that counts events and snapshots the clipboard at the
/// moment of key-down, i.e. what a foreground app would paste.
pub struct MockPoster {
    clipboard: Arc<MockClipboard>,
    downs: AtomicUsize,
    ups: AtomicUsize,
    /// Clipboard content observed when the paste key-down was posted.
    pub pasted: Mutex<Vec<Option<String>>>,
    /// When true, event posting fails as if no event source exists.
    pub unavailable: Mutex<bool>,
}

impl MockPoster {
    /// Create a poster observing `clipboard`.
    pub fn new(clipboard: Arc<MockClipboard>) -> Self {
        Self {
            clipboard,
            downs: AtomicUsize::new(0),
            ups: AtomicUsize::new(0),
            pasted: Mutex::new(Vec::new()),
            unavailable: Mutex::new(false),
        }
    }

    /// Number of key-down events posted.
    pub fn downs(&self) -> usize {
        self.downs.load(Ordering::SeqCst)
    }

    /// Number of key-up events posted.
    pub fn ups(&self) -> usize {
        self.ups.load(Ordering::SeqCst)
    }
}

impl PastePoster for MockPoster {
    fn post_paste_down(&self) -> Result<()> {
        if *self.unavailable.lock() {
            return Err(Error::TextTypingFailed);
        }
        self.downs.fetch_add(1, Ordering::SeqCst);
        self.pasted.lock().push(self.clipboard.current());
        Ok(())
    }

    fn post_paste_up(&self) -> Result<()> {
        if *self.unavailable.lock() {
            return Err(Error::TextTypingFailed);
        }
        self.ups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
