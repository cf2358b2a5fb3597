//! Keyboard navigation overlay.
//!
//! - [`scan`] collects the direct children of the current scope
//! - [`keys`] assigns and decodes key sequences
//! - [`timer`] models the two deferred callbacks as cancellable slots
//! - [`engine`] ties them into the Inactive/Active state machine

pub mod engine;
pub mod keys;
pub mod scan;
pub mod timer;

pub use engine::{NavEffect, NavTask, NavigationEngine, OverlayEntry, OverlayModel};
pub use keys::{KeySequenceMap, NavKey, code_for_index};
pub use scan::{Anchor, NavigationCursor, ScanEntry};
pub use timer::TimerToken;
