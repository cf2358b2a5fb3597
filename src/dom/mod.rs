//! DOM access for the host's document tree.
//!
//! - [`tree`] - [`DomTree`], the `TreeView`/`TreeActions` adapter
//! - [`events`] - click classification and replay-tagged dispatch
//!
//! Also provides [`Listener`], an event listener removed on drop.

pub mod events;
pub mod tree;

pub use tree::DomTree;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Document, Element, Event, EventTarget};

use crate::error::{DomError, describe};

/// Get the page document.
#[inline]
pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// First descendant of `root` matching `selector`.
#[inline]
pub fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// All elements under `root` matching `selector`, in document order.
pub fn query_all(root: &impl AsRef<web_sys::Node>, selector: &str) -> Vec<Element> {
    let node: &web_sys::Node = root.as_ref();
    let list = if let Some(element) = node.dyn_ref::<Element>() {
        element.query_selector_all(selector)
    } else if let Some(document) = node.dyn_ref::<Document>() {
        document.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

// =============================================================================
// Listener
// =============================================================================

/// An attached event listener. Dropping it detaches the callback.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, DomError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback_and_bool(
                event,
                closure.as_ref().unchecked_ref(),
                capture,
            )
            .map_err(|e| DomError::ListenerFailed(describe(&e)))?;
        log::debug!("listening for {event}");
        Ok(Self {
            target: target.clone(),
            event,
            capture,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.closure.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}
