//! Bindkey Engine
//!
//! The engine crate owns the action model and performs the side effects for
//! triggered shortcuts:
//! - launches applications and opens URLs via the OS workspace
//! - runs shell/AppleScript/JXA scripts to completion, capturing output
//! - delegates named automations to the external automation service
//! - injects text through a clipboard save/set/paste/restore sequence
//! - evaluates chains left-to-right with first-failure propagation
//!
//! Every `execute` call passes through one serialized path, so two triggered
//! shortcuts can never interleave a clipboard save/mutate/restore sequence.
//! There is no timeout: a hung external process stalls dispatch until it
//! exits.
//!
//! This crate is macOS-only by design. The OS services sit behind the trait
//! seams in [`deps`]; production code installs the [`mac`] implementations.

use std::{future::Future, io, pin::Pin, sync::Arc, time::Duration};

use tokio::{task, time::sleep};
use tracing::{debug, trace};

mod action;
pub mod deps;
mod error;
pub mod mac;
mod notification;
mod shell;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use action::{Action, ScriptKind, SystemCommand};
pub use error::{Error, Result};
pub use notification::{EngineMsg, EngineNotifier};

use deps::{AutomationService, ClipboardOps, PastePoster, Workspace};

/// Delay after the clipboard write so it becomes visible to the input
/// subsystem before the paste chord is posted.
const CLIPBOARD_SETTLE_MS: u64 = 100;
/// Gap between the paste key-down and key-up events.
const PASTE_CHORD_GAP_MS: u64 = 50;
/// Time for the foreground app to consume the paste before restore.
const PASTE_CONSUME_MS: u64 = 150;

/// Serialized executor for shortcut actions.
///
/// Cheap to clone; clones share the same serialization lock, so at most one
/// execution is in flight across all handles.
#[derive(Clone)]
pub struct Engine {
    /// Serializes every execution, clipboard sequence included.
    exec_lock: Arc<tokio::sync::Mutex<()>>,
    workspace: Arc<dyn Workspace>,
    automation: Arc<dyn AutomationService>,
    clipboard: Arc<dyn ClipboardOps>,
    poster: Arc<dyn PastePoster>,
}

impl Engine {
    /// Create an engine over explicit collaborators.
    pub fn new(
        workspace: Arc<dyn Workspace>,
        automation: Arc<dyn AutomationService>,
        clipboard: Arc<dyn ClipboardOps>,
        poster: Arc<dyn PastePoster>,
    ) -> Self {
        Self {
            exec_lock: Arc::new(tokio::sync::Mutex::new(())),
            workspace,
            automation,
            clipboard,
            poster,
        }
    }

    /// Create an engine wired to the macOS collaborators.
    pub fn new_mac() -> Self {
        Self::new(
            Arc::new(mac::MacWorkspace),
            Arc::new(mac::ShortcutsCli),
            Arc::new(mac::MacClipboard),
            Arc::new(mac::MacPastePoster),
        )
    }

    /// Execute one action to completion.
    ///
    /// Failures are terminal for this call only; the engine stays usable.
    pub async fn execute(&self, action: &Action) -> Result<()> {
        let _guard = self.exec_lock.lock().await;
        trace!(action = %action.display_name(), "execute_start");
        let res = self.run_action(action).await;
        if let Err(e) = &res {
            debug!(action = %action.display_name(), error = %e, "execute_failed");
        }
        res
    }

    /// Names of available external automations, in service order.
    pub async fn automation_names(&self) -> Result<Vec<String>> {
        let automation = self.automation.clone();
        task::spawn_blocking(move || automation.list_names())
            .await
            .map_err(join_error)?
    }

    /// Recursive action evaluation. Runs inside the serialization lock held
    /// by [`Engine::execute`]; chain elements re-enter here directly so the
    /// whole chain stays on the one serialized path.
    fn run_action<'a>(
        &'a self,
        action: &'a Action,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            match action {
                Action::LaunchApp { bundle_id, .. } => {
                    let workspace = self.workspace.clone();
                    let id = bundle_id.clone();
                    task::spawn_blocking(move || workspace.launch_app(&id))
                        .await
                        .map_err(join_error)?
                }
                Action::OpenUrl { url, .. } => {
                    let workspace = self.workspace.clone();
                    let url = url.clone();
                    task::spawn_blocking(move || workspace.open_url(&url))
                        .await
                        .map_err(join_error)?
                }
                Action::RunScriptFile { path, kind } => {
                    let source = tokio::fs::read_to_string(path).await?;
                    self.run_script(&source, *kind).await
                }
                Action::RunInlineScript { source, kind } => self.run_script(source, *kind).await,
                Action::SystemCommand(cmd) => self.run_script(cmd.shell_command(), ScriptKind::Shell).await,
                Action::RunNamedAutomation { name } => {
                    let automation = self.automation.clone();
                    let name = name.clone();
                    task::spawn_blocking(move || automation.run(&name))
                        .await
                        .map_err(join_error)?
                }
                Action::TypeText { text, .. } => self.type_text(text).await,
                Action::Chain(actions) => {
                    for (i, inner) in actions.iter().enumerate() {
                        trace!(index = i, action = %inner.display_name(), "chain_step");
                        self.run_action(inner).await?;
                    }
                    Ok(())
                }
            }
        })
    }

    /// Run script source through the interpreter for `kind`, blocking the
    /// serialized path until the process exits.
    async fn run_script(&self, source: &str, kind: ScriptKind) -> Result<()> {
        let source = source.to_string();
        task::spawn_blocking(move || match kind {
            ScriptKind::Shell => shell::run_shell_blocking(&source),
            ScriptKind::AppleScript => {
                shell::run_command_blocking("/usr/bin/osascript", &["-e", &source])
            }
            ScriptKind::Jxa => shell::run_command_blocking(
                "/usr/bin/osascript",
                &["-l", "JavaScript", "-e", &source],
            ),
        })
        .await
        .map_err(join_error)?
    }

    /// Clipboard-based text injection.
    ///
    /// Saves prior clipboard text, writes the payload, posts a synthetic
    /// paste chord, then restores the prior content if there was any. The
    /// three delays are load-bearing: shortening them risks the clipboard
    /// write or the paste losing the race with the target app's event loop.
    async fn type_text(&self, text: &str) -> Result<()> {
        let previous = self.clipboard.get_text();
        debug!(had_previous = previous.is_some(), "type_text_start");

        self.clipboard.set_text(text)?;
        sleep(Duration::from_millis(CLIPBOARD_SETTLE_MS)).await;

        let pasted = self.post_paste_chord().await;
        if pasted.is_ok() {
            sleep(Duration::from_millis(PASTE_CONSUME_MS)).await;
        }

        // Restore runs even when the paste failed, so the user's clipboard
        // never keeps the injected payload.
        if let Some(prev) = previous {
            self.clipboard.clear()?;
            self.clipboard.set_text(&prev)?;
            debug!("type_text_restored_clipboard");
        }
        pasted
    }

    async fn post_paste_chord(&self) -> Result<()> {
        self.poster.post_paste_down()?;
        sleep(Duration::from_millis(PASTE_CHORD_GAP_MS)).await;
        self.poster.post_paste_up()?;
        Ok(())
    }
}

/// A panicked blocking task; surfaced as an I/O error.
fn join_error(e: task::JoinError) -> Error {
    Error::Io(io::Error::other(e))
}
