//! Platform-neutral core of the subfolder plugin.
//!
//! This crate provides:
//! - [`MarkerSet`] with [`parse_set`] and [`serialize_set`] for the id and emoji sets
//! - [`Settings`] over a host [`SettingsStore`]
//! - [`ClickInterpreter`] and the [`Mode`] state machine
//! - [`NavigationEngine`] for the keyboard overlay
//! - [`TreeView`] and [`TreeActions`], the seams a host adapter implements
//!
//! Nothing here touches a DOM. The wasm plugin implements the traits in
//! [`host`] over `web-sys`; tests use the in-memory double in `testing`.

pub mod config;
pub mod environment;
pub mod error;
pub mod host;
mod identity;
pub mod interpreter;
pub mod mode;
pub mod nav;
pub mod oracle;
pub mod settings;

#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use environment::{Backend, DeviceClass, Frontend};
pub use error::{HostError, OracleError};
pub use host::{ClickRegion, Command, RowView, Toggle, TreeActions, TreeClick, TreeNode, TreeView};
pub use identity::{MarkerSet, parse_set, serialize_set};
pub use interpreter::{ClickInterpreter, ClickOutcome};
pub use mode::{Mode, ModeSwitch, ModeSwitcher, Notice};
pub use nav::{NavEffect, NavKey, NavTask, NavigationEngine, OverlayModel};
pub use oracle::{DocStatus, EmptinessOracle};
pub use settings::{SettingItem, SettingKind, Settings, SettingsStore};
