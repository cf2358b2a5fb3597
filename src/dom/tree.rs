//! The host file tree, read and driven through the DOM.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use subfolder_core::{HostError, RowView, Toggle, TreeActions, TreeView};

use super::{events, query, query_all};
use crate::config::tree;

/// [`TreeView`] and [`TreeActions`] over the live document.
///
/// Rows are the `li` elements themselves. Nothing is cached: every call
/// queries the DOM as it is now.
#[derive(Debug, Clone)]
pub struct DomTree {
    document: Document,
}

impl DomTree {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl TreeView for DomTree {
    type Row = Element;

    fn containers(&self) -> Vec<Vec<Element>> {
        query_all(&self.document, tree::CONTAINER)
            .iter()
            .map(|container| query_all(container, tree::SCAN_ROW))
            .collect()
    }

    fn row_view(&self, row: &Element) -> RowView {
        let toggle = query(row, tree::TOGGLE);
        RowView {
            node_id: row.get_attribute(tree::NODE_ID_ATTR),
            display_name: text_of(row, tree::NAME),
            indent_px: toggle.as_ref().and_then(padding_left),
            toggle: toggle.as_ref().map_or(Toggle::Absent, toggle_state),
            icon_text: text_of(row, tree::ICON),
        }
    }

    fn is_visible(&self, row: &Element) -> bool {
        let rect = row.get_bounding_client_rect();
        rect.width() > 0.0 && rect.height() > 0.0
    }

    fn find_by_id(&self, node_id: &str) -> Option<Element> {
        self.containers()
            .into_iter()
            .flatten()
            .find(|row| row.get_attribute(tree::NODE_ID_ATTR).as_deref() == Some(node_id))
    }
}

impl TreeActions for DomTree {
    type Row = Element;

    fn expand(&self, row: &Element) -> Result<(), HostError> {
        let toggle = query(row, tree::TOGGLE).ok_or(HostError::MissingToggle)?;
        events::replay_click(&toggle)
    }

    fn open(&self, row: &Element) -> Result<(), HostError> {
        if !row.is_connected() {
            let id = row.get_attribute(tree::NODE_ID_ATTR).unwrap_or_default();
            return Err(HostError::RowNotFound(id));
        }
        events::replay_click(row)
    }
}

fn text_of(row: &Element, selector: &str) -> String {
    query(row, selector)
        .and_then(|e| e.text_content())
        .unwrap_or_default()
}

fn toggle_state(toggle: &Element) -> Toggle {
    if toggle.class_list().contains(tree::HIDDEN_CLASS) {
        return Toggle::Hidden;
    }
    let open = query(toggle, tree::ARROW)
        .is_some_and(|arrow| arrow.class_list().contains(tree::ARROW_OPEN_CLASS));
    if open { Toggle::Expanded } else { Toggle::Collapsed }
}

fn padding_left(element: &Element) -> Option<f64> {
    let element = element.dyn_ref::<HtmlElement>()?;
    parse_px(&element.style().get_property_value("padding-left").ok()?)
}

/// Parse an inline CSS length such as `"36px"`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}
