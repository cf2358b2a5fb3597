//! Click classification and synthetic event dispatch.

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, MouseEvent, MouseEventInit};

use subfolder_core::{ClickRegion, HostError};

use crate::config::{REPLAY_MARKER, tree};
use crate::error::describe;

/// Whether the plugin dispatched this event itself.
pub fn is_replay(event: &Event) -> bool {
    Reflect::get(event, &JsValue::from_str(REPLAY_MARKER)).is_ok_and(|v| v.is_truthy())
}

/// The tree row a click landed on, and where within it.
///
/// Returns `None` unless the click landed on a document row inside a tree
/// container. Notebook roots and other lists are left alone.
pub fn click_target(event: &Event) -> Option<(Element, ClickRegion)> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let row = target.closest(tree::CLICK_ROW).ok()??;
    row.closest(tree::CONTAINER).ok()??;

    let within = |selector: &str| {
        target
            .closest(selector)
            .ok()
            .flatten()
            .is_some_and(|found| row.contains(Some(found.as_ref())))
    };
    let region = if within(tree::ACTION_MENU) {
        ClickRegion::ActionMenu
    } else if within(tree::TOGGLE) {
        ClickRegion::Toggle
    } else if within(tree::ICON) {
        ClickRegion::Icon
    } else {
        ClickRegion::Row
    };
    Some((row, region))
}

/// Dispatch a bubbling, cancelable click at `target`, tagged as a replay.
pub fn replay_click(target: &Element) -> Result<(), HostError> {
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = MouseEvent::new_with_mouse_event_init_dict("click", &init)
        .map_err(|e| HostError::DispatchFailed(describe(&e)))?;
    Reflect::set(&event, &JsValue::from_str(REPLAY_MARKER), &JsValue::TRUE)
        .map_err(|e| HostError::DispatchFailed(describe(&e)))?;
    target
        .dispatch_event(&event)
        .map_err(|e| HostError::DispatchFailed(describe(&e)))?;
    Ok(())
}
