//! Click interpretation: the mode state machine applied to tree clicks.

use crate::host::{ClickRegion, Command, TreeClick};
use crate::mode::{Mode, ModeSwitch, ModeSwitcher, Notice};
use crate::settings::Settings;

/// What the adapter should do with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome<R> {
    /// Leave the event alone; the host's default runs.
    PassThrough,
    /// Cancel the event and run the command instead.
    Intercept(Command<R>),
    /// Cancel the event; the id set changed and must be persisted.
    Toggled { node_id: String, added: bool },
    /// Cancel the event, then ask the oracle and run what it decides.
    AwaitOracle { row: R, node_id: String },
}

impl<R> ClickOutcome<R> {
    /// Whether the original event's default action and propagation are cancelled.
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Toggled { added, .. } => Some(Notice::captured(*added)),
            _ => None,
        }
    }
}

/// Decides, per click, between expanding, recording, and passing through.
///
/// Owns the settings and the active mode. Everything it returns is a plain
/// value; the adapter performs the side effects.
#[derive(Debug, Clone, Default)]
pub struct ClickInterpreter {
    settings: Settings,
    modes: ModeSwitcher,
}

impl ClickInterpreter {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            modes: ModeSwitcher::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings wholesale after a reload.
    pub fn replace_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.modes.active()
    }

    pub fn switch_mode(&mut self, mode: Mode) -> ModeSwitch {
        self.modes.switch(mode)
    }

    pub fn interpret<R: Clone>(&mut self, click: &TreeClick<R>) -> ClickOutcome<R> {
        if click.is_replay || click.region == ClickRegion::ActionMenu {
            return ClickOutcome::PassThrough;
        }
        // Rows without a node id are not documents.
        if click.node.node_id.is_none() {
            return ClickOutcome::PassThrough;
        }

        match self.modes.active() {
            Mode::Normal => self.interpret_normal(click),
            Mode::Capture => self.interpret_capture(click),
            Mode::Reveal => ClickOutcome::PassThrough,
        }
    }

    fn interpret_normal<R: Clone>(&self, click: &TreeClick<R>) -> ClickOutcome<R> {
        if click.region.is_special() {
            return ClickOutcome::PassThrough;
        }

        if self.is_listed(click) {
            return ClickOutcome::Intercept(Command::Expand(click.row.clone()));
        }

        match &click.node.node_id {
            Some(node_id) if self.settings.auto_detect => ClickOutcome::AwaitOracle {
                row: click.row.clone(),
                node_id: node_id.clone(),
            },
            _ => ClickOutcome::PassThrough,
        }
    }

    fn interpret_capture<R>(&mut self, click: &TreeClick<R>) -> ClickOutcome<R> {
        if click.region.is_special() {
            return ClickOutcome::PassThrough;
        }
        let Some(node_id) = &click.node.node_id else {
            return ClickOutcome::PassThrough;
        };

        let added = self.settings.ids.toggle(node_id);
        log::info!(
            "{node_id} {}",
            if added { "marked as subfolder" } else { "restored" }
        );
        ClickOutcome::Toggled {
            node_id: node_id.clone(),
            added,
        }
    }

    fn is_listed<R>(&self, click: &TreeClick<R>) -> bool {
        let by_id = self.settings.match_ids
            && click
                .node
                .node_id
                .as_deref()
                .is_some_and(|id| self.settings.ids.contains(id));
        let by_icon = self.settings.match_emojis && self.settings.is_marker(&click.node.icon_text);
        by_id || by_icon
    }
}

/// The node id to check against the live tree once a click is handled.
///
/// Every click that reached interpretation with an id qualifies, in every
/// mode and whatever the outcome.
pub fn diagnosed_id<R>(click: &TreeClick<R>) -> Option<&str> {
    if click.is_replay || click.region == ClickRegion::ActionMenu {
        return None;
    }
    click.node.node_id.as_deref()
}
