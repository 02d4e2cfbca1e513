//! Collaborator seams consumed by the engine.
//!
//! Each trait covers one OS service the dispatcher touches. Production code
//! installs the macOS implementations from [`crate::mac`]; tests inject
//! mocks with side-effect counters.

use crate::Result;

/// OS application registry and resource opener.
pub trait Workspace: Send + Sync {
    /// Resolve `bundle_id` to an application and request an asynchronous
    /// launch-and-activate. Fails with [`crate::Error::AppNotFound`] when
    /// nothing resolves.
    fn launch_app(&self, bundle_id: &str) -> Result<()>;

    /// Open a URL through the OS opener. Fails with
    /// [`crate::Error::UrlOpenFailed`] when the opener reports failure.
    fn open_url(&self, url: &str) -> Result<()>;
}

/// External automation service that lists and runs named automations.
pub trait AutomationService: Send + Sync {
    /// List the names of available automations, in the service's order.
    fn list_names(&self) -> Result<Vec<String>>;

    /// Run one automation by name; the service's error message propagates
    /// verbatim as [`crate::Error::Automation`].
    fn run(&self, name: &str) -> Result<()>;
}

/// The system clipboard.
pub trait ClipboardOps: Send + Sync {
    /// Current text content, if any. Read failures are treated as absent.
    fn get_text(&self) -> Option<String>;

    /// Clear the clipboard and write `text` as the new content.
    fn set_text(&self, text: &str) -> Result<()>;

    /// Clear the clipboard.
    fn clear(&self) -> Result<()>;
}

/// Synthetic input: posts the platform paste accelerator into the global
/// input stream as if typed by hardware.
pub trait PastePoster: Send + Sync {
    /// Post the paste chord's key-down event.
    fn post_paste_down(&self) -> Result<()>;

    /// Post the matching key-up event.
    fn post_paste_up(&self) -> Result<()>;
}
