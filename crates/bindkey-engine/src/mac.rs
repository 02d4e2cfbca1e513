//! macOS implementations of the engine's collaborator seams.

use std::process::Command;

use core_graphics::{
    event as cge,
    event_source::{CGEventSource, CGEventSourceStateID},
};
use tracing::{debug, trace, warn};

use crate::{
    Error, Result,
    deps::{AutomationService, ClipboardOps, PastePoster, Workspace},
};

/// Virtual keycode for `V` (`kVK_ANSI_V`), the paste accelerator key.
const KEY_V: u16 = 9;

/// Application launching and URL opening via the OS `open` service.
#[derive(Default)]
pub struct MacWorkspace;

impl Workspace for MacWorkspace {
    fn launch_app(&self, bundle_id: &str) -> Result<()> {
        // `open -b` resolves through LaunchServices and activates the app;
        // a non-zero exit means nothing resolved for the identifier.
        let status = Command::new("open").args(["-b", bundle_id]).output()?;
        if status.status.success() {
            debug!(bundle_id, "launched_app");
            Ok(())
        } else {
            Err(Error::AppNotFound(bundle_id.to_string()))
        }
    }

    fn open_url(&self, url: &str) -> Result<()> {
        let status = Command::new("open").arg(url).output()?;
        if status.status.success() {
            debug!(url, "opened_url");
            Ok(())
        } else {
            Err(Error::UrlOpenFailed(url.to_string()))
        }
    }
}

/// The Shortcuts app's CLI, treated as a black-box run-by-name service.
#[derive(Default)]
pub struct ShortcutsCli;

impl AutomationService for ShortcutsCli {
    fn list_names(&self) -> Result<Vec<String>> {
        let output = Command::new("shortcuts")
            .arg("list")
            .output()
            .map_err(|e| Error::Automation(e.to_string()))?;
        if !output.status.success() {
            return Err(Error::Automation(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .filter(|l| !l.is_empty())
            .collect())
    }

    fn run(&self, name: &str) -> Result<()> {
        let output = Command::new("shortcuts")
            .args(["run", name])
            .output()
            .map_err(|e| Error::Automation(e.to_string()))?;
        if output.status.success() {
            debug!(name, "automation_ran");
            Ok(())
        } else {
            Err(Error::Automation(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// System clipboard via arboard.
#[derive(Default)]
pub struct MacClipboard;

impl ClipboardOps for MacClipboard {
    fn get_text(&self) -> Option<String> {
        arboard::Clipboard::new().ok()?.get_text().ok()
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut cb = arboard::Clipboard::new().map_err(|_| Error::TextTypingFailed)?;
        cb.set_text(text).map_err(|_| Error::TextTypingFailed)
    }

    fn clear(&self) -> Result<()> {
        let mut cb = arboard::Clipboard::new().map_err(|_| Error::TextTypingFailed)?;
        cb.clear().map_err(|_| Error::TextTypingFailed)
    }
}

/// Posts the paste chord (`cmd+v`) into the global input stream.
///
/// Events are tagged with [`eventtag::BNDK_TAG`] so our own tap ignores
/// them, and posted at HID placement like hardware input.
#[derive(Default)]
pub struct MacPastePoster;

impl MacPastePoster {
    fn build_paste_event(&self, down: bool) -> Result<cge::CGEvent> {
        let source = match CGEventSource::new(CGEventSourceStateID::HIDSystemState) {
            Ok(s) => s,
            Err(_) => {
                if !permissions::accessibility_ok() {
                    warn!("accessibility_permission_missing_for_event_source");
                }
                return Err(Error::TextTypingFailed);
            }
        };
        let event = match cge::CGEvent::new_keyboard_event(source, cge::CGKeyCode::from(KEY_V), down)
        {
            Ok(e) => e,
            Err(_) => {
                if !permissions::accessibility_ok() {
                    warn!("accessibility_permission_missing_for_event_create");
                }
                return Err(Error::TextTypingFailed);
            }
        };
        event.set_flags(cge::CGEventFlags::CGEventFlagCommand);
        event.set_integer_value_field(cge::EventField::EVENT_SOURCE_USER_DATA, eventtag::BNDK_TAG);
        Ok(event)
    }
}

impl PastePoster for MacPastePoster {
    fn post_paste_down(&self) -> Result<()> {
        trace!("post_paste_down");
        let event = self.build_paste_event(true)?;
        event.post(cge::CGEventTapLocation::HID);
        Ok(())
    }

    fn post_paste_up(&self) -> Result<()> {
        trace!("post_paste_up");
        let event = self.build_paste_event(false)?;
        event.post(cge::CGEventTapLocation::HID);
        Ok(())
    }
}
