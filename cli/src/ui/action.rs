//! Actions offered on a list screen.

use odie_core::Table;

/// Effect requested by an action key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PrevPage,
    NextPage,
    Create,
    Edit,
    Delete,
    Select,
    Activate,
    SeedSites,
    ToggleFlag,
    Open(Table),
    Home,
    Quit,
}

/// A key the user can type, shown in the action panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub key: &'static str,
    pub label: String,
    pub enabled: bool,
    pub command: Command,
}

impl Action {
    pub fn new(key: &'static str, label: impl Into<String>, command: Command) -> Self {
        Self {
            key,
            label: label.into(),
            enabled: true,
            command,
        }
    }

    /// Enables the action only when `condition` holds.
    pub fn enabled_if(mut self, condition: bool) -> Self {
        self.enabled = condition;
        self
    }

    /// Whether `choice` selects this action, ignoring case and padding.
    pub fn matches(&self, choice: &str) -> bool {
        self.key.eq_ignore_ascii_case(choice.trim())
    }
}
