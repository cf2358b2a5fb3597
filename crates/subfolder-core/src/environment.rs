//! Host environment classification.
//!
//! The host reports a frontend kind and a backend kind. Together they decide
//! whether the plugin runs on a desktop, a phone, or a tablet.

use std::str::FromStr;

use crate::config::notice;
use crate::mode::Notice;

/// Frontend reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frontend {
    Desktop,
    DesktopWindow,
    BrowserDesktop,
    Mobile,
    BrowserMobile,
    Unknown(String),
}

impl Frontend {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "desktop" => Self::Desktop,
            "desktop-window" => Self::DesktopWindow,
            "browser-desktop" => Self::BrowserDesktop,
            "mobile" => Self::Mobile,
            "browser-mobile" => Self::BrowserMobile,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl FromStr for Frontend {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Backend reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Ios,
    Android,
    Docker,
    /// Any desktop operating system.
    Other(String),
}

impl Backend {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "ios" => Self::Ios,
            "android" => Self::Android,
            "docker" => Self::Docker,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for Backend {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Device class derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Phone,
    Tablet,
}

impl DeviceClass {
    /// Phones have no physical keyboard for the navigation overlay.
    pub fn supports_keyboard_navigation(self) -> bool {
        !matches!(self, Self::Phone)
    }

    /// DOM events that activate a tree row on this device.
    ///
    /// Desktop hosts also deliver touch input as `touchend` without a
    /// following click.
    pub fn activation_events(self) -> &'static [&'static str] {
        match self {
            Self::Desktop => &["click", "touchend"],
            Self::Phone | Self::Tablet => &["click"],
        }
    }
}

/// Classify an environment, or `None` if the combination is not known.
pub fn classify(frontend: &Frontend, backend: &Backend) -> Option<DeviceClass> {
    match frontend {
        Frontend::Mobile | Frontend::BrowserMobile => Some(DeviceClass::Phone),
        Frontend::Desktop | Frontend::DesktopWindow | Frontend::BrowserDesktop => match backend {
            Backend::Ios | Backend::Android | Backend::Docker => Some(DeviceClass::Tablet),
            Backend::Other(_) => Some(DeviceClass::Desktop),
        },
        Frontend::Unknown(_) => None,
    }
}

/// Shows the unsupported-environment notice at most once per session.
#[derive(Debug, Default)]
pub struct EnvironmentGuard {
    reported: bool,
}

impl EnvironmentGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify, returning the notice to show if this is the first failure.
    pub fn check(&mut self, frontend: &str, backend: &str) -> Result<DeviceClass, Option<Notice>> {
        let front = Frontend::from_name(frontend);
        let back = Backend::from_name(backend);
        match classify(&front, &back) {
            Some(class) => Ok(class),
            None if self.reported => Err(None),
            None => {
                self.reported = true;
                log::warn!("unclassified environment: frontend={frontend} backend={backend}");
                Err(Some(Notice::new(
                    format!(
                        "未适配的运行环境 ({frontend} / {backend})，请向插件作者反馈。\n\
                         Unsupported environment ({frontend} / {backend}), please report it to the plugin author."
                    ),
                    notice::ENVIRONMENT_MS,
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(frontend: &str, backend: &str) -> Option<DeviceClass> {
        classify(&frontend.parse().unwrap(), &backend.parse().unwrap())
    }

    #[test]
    fn test_activation_events_per_device() {
        assert_eq!(DeviceClass::Desktop.activation_events(), ["click", "touchend"]);
        assert_eq!(DeviceClass::Phone.activation_events(), ["click"]);
        assert_eq!(DeviceClass::Tablet.activation_events(), ["click"]);
    }

    #[test]
    fn test_desktop_family() {
        assert_eq!(class("desktop", "windows"), Some(DeviceClass::Desktop));
        assert_eq!(class("desktop-window", "darwin"), Some(DeviceClass::Desktop));
        assert_eq!(class("browser-desktop", "linux"), Some(DeviceClass::Desktop));
    }

    #[test]
    fn test_tablet_combinations() {
        assert_eq!(class("desktop", "ios"), Some(DeviceClass::Tablet));
        assert_eq!(class("browser-desktop", "android"), Some(DeviceClass::Tablet));
        assert_eq!(class("browser-desktop", "docker"), Some(DeviceClass::Tablet));
    }

    #[test]
    fn test_phone_family() {
        assert_eq!(class("mobile", "ios"), Some(DeviceClass::Phone));
        assert_eq!(class("browser-mobile", "linux"), Some(DeviceClass::Phone));
        assert!(!DeviceClass::Phone.supports_keyboard_navigation());
        assert!(DeviceClass::Tablet.supports_keyboard_navigation());
    }

    #[test]
    fn test_unknown_frontend() {
        assert_eq!(class("tv", "linux"), None);
    }

    #[test]
    fn test_guard_reports_once() {
        let mut guard = EnvironmentGuard::new();
        let first = guard.check("tv", "linux");
        assert!(matches!(first, Err(Some(ref n)) if n.text.contains("Unsupported environment")));
        assert!(matches!(guard.check("tv", "linux"), Err(None)));
        assert_eq!(guard.check("desktop", "linux"), Ok(DeviceClass::Desktop));
    }
}
