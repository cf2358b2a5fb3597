//! Keyboard navigation overlay.
//!
//! A leptos view mounted into its own `div` at the end of `<body>`. The
//! plugin drives it through [`Overlay`]; the view re-renders whenever the
//! model signal changes.

use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use subfolder_core::OverlayModel;
use subfolder_core::nav::OverlayEntry;

use crate::error::{DomError, describe};

stylance::import_crate_style!(css, "src/overlay.module.css");

/// Handle to the mounted overlay.
pub struct Overlay {
    model: ArcRwSignal<Option<OverlayModel>>,
    root: RefCell<Option<HtmlElement>>,
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            model: ArcRwSignal::new(None),
            root: RefCell::new(None),
        }
    }

    pub fn mount(&self, document: &Document) -> Result<(), DomError> {
        let body = document.body().ok_or(DomError::NoDocument)?;
        let root = document
            .create_element("div")
            .map_err(|e| DomError::ElementFailed(describe(&e)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::ElementFailed("div is not an HtmlElement".to_string()))?;
        body.append_child(&root)
            .map_err(|e| DomError::ElementFailed(describe(&e)))?;

        let model = self.model.clone();
        mount_to(root.clone(), move || view! { <NavigationOverlay model=model /> }).forget();
        *self.root.borrow_mut() = Some(root);
        Ok(())
    }

    pub fn unmount(&self) {
        self.hide();
        if let Some(root) = self.root.borrow_mut().take() {
            root.remove();
        }
    }

    pub fn show(&self, model: OverlayModel) {
        self.model.set(Some(model));
    }

    /// Update only the partial-sequence indicator.
    pub fn indicate(&self, sequence: String) {
        self.model.update(|model| {
            if let Some(model) = model {
                model.sequence = sequence;
            }
        });
    }

    pub fn hide(&self) {
        self.model.set(None);
    }
}

#[component]
fn NavigationOverlay(model: ArcRwSignal<Option<OverlayModel>>) -> impl IntoView {
    view! {
        {move || model.get().map(|model| view! { <Panel model=model /> })}
    }
}

#[component]
fn Panel(model: OverlayModel) -> impl IntoView {
    let breadcrumb = if model.path.is_empty() {
        "/".to_string()
    } else {
        model.path.join(" / ")
    };
    let loading = model.loading;
    let empty = model.entries.is_empty() && !loading;
    let entries = model
        .entries
        .into_iter()
        .map(|entry| view! { <EntryRow entry=entry /> })
        .collect_view();

    view! {
        <div class=css::overlay role="dialog">
            <div class=css::path>{breadcrumb}</div>
            <Show when=move || loading>
                <div class=css::status>"Expanding…"</div>
            </Show>
            <Show when=move || empty>
                <div class=css::status>"No documents here"</div>
            </Show>
            <ul class=css::entries>{entries}</ul>
            <div class=css::footer>
                <span class=css::sequence>{model.sequence}</span>
                <span class=css::hint>"a-z select · Backspace up · Esc close"</span>
            </div>
        </div>
    }
}

#[component]
fn EntryRow(entry: OverlayEntry) -> impl IntoView {
    let marker = match (entry.has_children, entry.is_expanded) {
        (false, _) => "",
        (true, false) => "▸",
        (true, true) => "▾",
    };
    let class = if entry.has_children {
        format!("{} {}", css::entry, css::folder)
    } else {
        css::entry.to_string()
    };

    view! {
        <li class=class>
            <kbd class=css::code>{entry.code}</kbd>
            <span class=css::icon>{entry.icon}</span>
            <span class=css::name>{entry.name}</span>
            <span class=css::marker>{marker}</span>
        </li>
    }
}
