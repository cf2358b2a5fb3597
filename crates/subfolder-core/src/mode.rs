//! Interaction modes and the side effects of switching between them.

use crate::config::{NORMAL_NOTICE_AFTER_SWITCHES, notice};

/// How clicks on tree rows are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Subfolder rows expand instead of opening.
    #[default]
    Normal,
    /// Clicks toggle a row's membership in the id set.
    Capture,
    /// Clicks fall through to the host untouched.
    Reveal,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Capture, Mode::Reveal];

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Capture => "capture",
            Self::Reveal => "reveal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name.trim())
    }
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub duration_ms: u32,
}

impl Notice {
    pub fn new(text: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            text: text.into(),
            duration_ms,
        }
    }

    fn mode_entered(mode: Mode) -> Self {
        match mode {
            Mode::Normal => Self::new("Normal mode: subfolder documents expand on click", notice::SHORT_MS),
            Mode::Capture => Self::new(
                "Capture mode: click a document to mark it as a subfolder, click it again to \
                 restore it. Toggles and icons keep their usual behavior. Switch back to normal \
                 mode when done.",
                notice::LONG_MS,
            ),
            Mode::Reveal => Self::new("Reveal mode: documents open normally", notice::SHORT_MS),
        }
    }

    /// Notice for a capture toggle.
    pub fn captured(added: bool) -> Self {
        if added {
            Self::new("Document is now considered as subfolder", notice::SHORT_MS)
        } else {
            Self::new("Document recovered as a normal document", notice::SHORT_MS)
        }
    }
}

/// Visual state of one mode button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub mode: Mode,
    pub active: bool,
}

/// Result of a mode switch, applied by the host adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSwitch {
    pub mode: Mode,
    pub buttons: [ButtonState; 3],
    pub notice: Option<Notice>,
}

/// Tracks the active mode and how often it has been switched.
///
/// The plugin switches into Normal silently while starting up, so the
/// Normal notice only appears once the switch counter has reached
/// [`NORMAL_NOTICE_AFTER_SWITCHES`]. The counter saturates there.
#[derive(Debug, Clone, Default)]
pub struct ModeSwitcher {
    active: Mode,
    switches: u8,
}

impl ModeSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn active(&self) -> Mode {
        self.active
    }

    pub fn switch(&mut self, mode: Mode) -> ModeSwitch {
        let announce = match mode {
            Mode::Normal => self.switches >= NORMAL_NOTICE_AFTER_SWITCHES,
            Mode::Capture | Mode::Reveal => true,
        };
        if self.switches < NORMAL_NOTICE_AFTER_SWITCHES {
            self.switches += 1;
        }
        self.active = mode;
        log::debug!("mode switched to {}", mode.name());

        ModeSwitch {
            mode,
            buttons: Mode::ALL.map(|m| ButtonState {
                mode: m,
                active: m == mode,
            }),
            notice: announce.then(|| Notice::mode_entered(mode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_buttons(switch: &ModeSwitch) -> Vec<Mode> {
        switch.buttons.iter().filter(|b| b.active).map(|b| b.mode).collect()
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(ModeSwitcher::new().active(), Mode::Normal);
    }

    #[test]
    fn test_normal_notice_suppressed_twice() {
        let mut modes = ModeSwitcher::new();
        assert!(modes.switch(Mode::Normal).notice.is_none());
        assert!(modes.switch(Mode::Normal).notice.is_none());
        assert!(modes.switch(Mode::Normal).notice.is_some());
        assert!(modes.switch(Mode::Normal).notice.is_some());
    }

    #[test]
    fn test_other_switches_count_towards_normal_notice() {
        let mut modes = ModeSwitcher::new();
        assert!(modes.switch(Mode::Capture).notice.is_some());
        assert!(modes.switch(Mode::Normal).notice.is_none());
        assert!(modes.switch(Mode::Normal).notice.is_some());
    }

    #[test]
    fn test_capture_notice_is_long() {
        let mut modes = ModeSwitcher::new();
        let capture = modes.switch(Mode::Capture).notice.unwrap();
        let reveal = modes.switch(Mode::Reveal).notice.unwrap();
        assert_eq!(capture.duration_ms, notice::LONG_MS);
        assert_eq!(reveal.duration_ms, notice::SHORT_MS);
    }

    #[test]
    fn test_repeated_switch_keeps_one_button_active() {
        let mut modes = ModeSwitcher::new();
        modes.switch(Mode::Normal);
        let second = modes.switch(Mode::Normal);
        assert_eq!(active_buttons(&second), vec![Mode::Normal]);

        let capture = modes.switch(Mode::Capture);
        assert_eq!(active_buttons(&capture), vec![Mode::Capture]);
        assert_eq!(modes.active(), Mode::Capture);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("jump"), None);
    }

    #[test]
    fn test_capture_notices_differ() {
        assert!(Notice::captured(true).text.contains("considered as subfolder"));
        assert!(Notice::captured(false).text.contains("recovered"));
    }
}
