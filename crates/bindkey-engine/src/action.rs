//! The action model: what a shortcut executes when triggered.

use serde::{Deserialize, Serialize};

/// Interpreter family for script actions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ScriptKind {
    /// The user's login shell (`$SHELL -c`).
    Shell,
    /// AppleScript via the OS scripting bridge.
    AppleScript,
    /// JavaScript for Automation (`osascript -l JavaScript`).
    Jxa,
}

impl ScriptKind {
    /// Human-readable name used in action display strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Shell => "Shell",
            Self::AppleScript => "AppleScript",
            Self::Jxa => "JavaScript for Automation",
        }
    }
}

/// Fixed system-level commands, each mapping to a single OS invocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SystemCommand {
    /// Put the machine to sleep.
    Sleep,
    /// Invoke the screen lock.
    LockScreen,
    /// Log out the current session.
    LogOut,
    /// Flip light/dark appearance.
    ToggleAppearance,
    /// Empty the trash.
    EmptyTrash,
    /// Toggle the desktop reveal.
    ShowDesktop,
    /// Invoke the window overview.
    MissionControl,
    /// Invoke the app launcher.
    Launchpad,
    /// Open the notification settings surface.
    NotificationCenter,
}

impl SystemCommand {
    /// Human-readable name used in action display strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::LockScreen => "Lock Screen",
            Self::LogOut => "Log Out",
            Self::ToggleAppearance => "Toggle Dark Mode",
            Self::EmptyTrash => "Empty Trash",
            Self::ShowDesktop => "Show Desktop",
            Self::MissionControl => "Mission Control",
            Self::Launchpad => "Launchpad",
            Self::NotificationCenter => "Show Notification Center",
        }
    }

    /// The literal shell invocation for this command. The mapping is static;
    /// every command runs through the shell execution path.
    pub fn shell_command(self) -> &'static str {
        match self {
            Self::Sleep => "pmset sleepnow",
            Self::LockScreen => "open -a ScreenSaverEngine",
            Self::LogOut => {
                "osascript -e 'tell application id \"com.apple.systemevents\" to log out'"
            }
            Self::ToggleAppearance => {
                "osascript -e 'tell application id \"com.apple.systemevents\" to tell appearance preferences to set dark mode to not dark mode'"
            }
            Self::EmptyTrash => {
                "osascript -e 'tell application id \"com.apple.finder\" to empty trash'"
            }
            Self::ShowDesktop => "open -a 'Mission Control' --args --toggle-show-desktop",
            Self::MissionControl => "open -a 'Mission Control'",
            Self::Launchpad => "open -a Launchpad",
            Self::NotificationCenter => {
                "open -g 'x-apple.systempreferences:com.apple.preference.notifications'"
            }
        }
    }
}

/// What a shortcut executes: a recursive tagged union of eight variants.
///
/// Construction is total; building an `Action` never consults registry or
/// dispatcher state. `Chain` composes actions left-to-right.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Launch and activate an application by bundle identifier.
    LaunchApp {
        /// Bundle identifier, e.g. `com.apple.Safari`.
        bundle_id: String,
        /// Display name shown to the user.
        name: String,
    },
    /// Open a URL through the OS resource opener.
    OpenUrl {
        /// The URL to open.
        url: String,
        /// Optional display name; falls back to the URL itself.
        name: Option<String>,
    },
    /// Read a script file and run its contents.
    RunScriptFile {
        /// Path to the script file.
        path: String,
        /// Interpreter to run it with.
        kind: ScriptKind,
    },
    /// Run inline script source.
    RunInlineScript {
        /// Script source text.
        source: String,
        /// Interpreter to run it with.
        kind: ScriptKind,
    },
    /// One of the fixed system commands.
    SystemCommand(SystemCommand),
    /// Run a named automation via the external automation service.
    RunNamedAutomation {
        /// The automation's name as the service lists it.
        name: String,
    },
    /// Inject text into the focused application via the clipboard.
    TypeText {
        /// The text to type.
        text: String,
        /// Display label for this snippet.
        label: String,
    },
    /// Execute each action in order; the first failure stops the chain.
    Chain(Vec<Action>),
}

impl Action {
    /// Human-readable description used by registry search, notifications,
    /// and conflict messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::LaunchApp { name, .. } => format!("Open {name}"),
            Self::OpenUrl { url, name } => name.clone().unwrap_or_else(|| url.clone()),
            Self::RunScriptFile { path, .. } => {
                let file = std::path::Path::new(path)
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone());
                format!("Run {file}")
            }
            Self::RunInlineScript { kind, .. } => format!("Run {}", kind.name()),
            Self::SystemCommand(cmd) => cmd.name().to_string(),
            Self::RunNamedAutomation { name } => format!("Shortcut: {name}"),
            Self::TypeText { label, .. } => {
                if label.is_empty() {
                    "Type Text".to_string()
                } else {
                    format!("Type: {label}")
                }
            }
            Self::Chain(actions) => format!("{} actions", actions.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        let a = Action::LaunchApp {
            bundle_id: "com.apple.Safari".into(),
            name: "Safari".into(),
        };
        assert_eq!(a.display_name(), "Open Safari");

        let a = Action::OpenUrl {
            url: "https://example.com".into(),
            name: None,
        };
        assert_eq!(a.display_name(), "https://example.com");

        let a = Action::RunScriptFile {
            path: "/tmp/scripts/cleanup.sh".into(),
            kind: ScriptKind::Shell,
        };
        assert_eq!(a.display_name(), "Run cleanup.sh");

        let a = Action::TypeText {
            text: "hi".into(),
            label: String::new(),
        };
        assert_eq!(a.display_name(), "Type Text");

        let a = Action::Chain(vec![Action::SystemCommand(SystemCommand::LockScreen)]);
        assert_eq!(a.display_name(), "1 actions");
    }

    #[test]
    fn serde_roundtrip_recursive() {
        let action = Action::Chain(vec![
            Action::LaunchApp {
                bundle_id: "com.apple.Terminal".into(),
                name: "Terminal".into(),
            },
            Action::Chain(vec![Action::RunInlineScript {
                source: "echo hi".into(),
                kind: ScriptKind::Shell,
            }]),
        ]);
        let json = serde_json::to_string(&action).expect("serialize");
        let back: Action = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(action, back);
    }

    #[test]
    fn every_system_command_has_an_invocation() {
        let cmds = [
            SystemCommand::Sleep,
            SystemCommand::LockScreen,
            SystemCommand::LogOut,
            SystemCommand::ToggleAppearance,
            SystemCommand::EmptyTrash,
            SystemCommand::ShowDesktop,
            SystemCommand::MissionControl,
            SystemCommand::Launchpad,
            SystemCommand::NotificationCenter,
        ];
        for cmd in cmds {
            assert!(!cmd.shell_command().is_empty());
            assert!(!cmd.name().is_empty());
        }
    }
}
