//! Plugin runtime: wires the core state machines to the page.
//!
//! The core returns plain values and effect lists. Everything here runs on
//! the browser's single thread; `RefCell` borrows are always released
//! before an effect is applied, because applying one can dispatch a
//! synthetic click that re-enters the click listener.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, HtmlElement, KeyboardEvent};

use subfolder_core::environment::EnvironmentGuard;
use subfolder_core::host::{self as core_host, TreeClick};
use subfolder_core::interpreter;
use subfolder_core::mode::ButtonState;
use subfolder_core::nav::TimerToken;
use subfolder_core::oracle::{self as core_oracle, OracleQuery};
use subfolder_core::{
    ClickInterpreter, ClickOutcome, Mode, NavEffect, NavKey, NavTask, NavigationEngine, Settings,
    TreeView,
};

use crate::config::buttons;
use crate::dom::{self, DomTree, Listener, events};
use crate::error::DomError;
use crate::host::{HostApi, HostSettings};
use crate::logger;
use crate::oracle::RpcOracle;
use crate::overlay::Overlay;

/// Top-bar buttons and the callbacks keeping them alive.
#[derive(Default)]
struct TopBar {
    modes: Vec<(Mode, HtmlElement)>,
    navigation: Option<HtmlElement>,
    callbacks: Vec<Closure<dyn FnMut()>>,
}

impl TopBar {
    fn paint(&self, states: &[ButtonState]) {
        for state in states {
            let Some((_, button)) = self.modes.iter().find(|(mode, _)| *mode == state.mode) else {
                continue;
            };
            let style = button.style();
            if state.active {
                let _ = style.set_property("background-color", buttons::ACTIVE_BACKGROUND);
                let _ = style.set_property("color", buttons::ACTIVE_COLOR);
            } else {
                let _ = style.remove_property("background-color");
                let _ = style.remove_property("color");
            }
        }
    }

    fn clear(&mut self) {
        for (_, button) in self.modes.drain(..) {
            button.remove();
        }
        if let Some(button) = self.navigation.take() {
            button.remove();
        }
        self.callbacks.clear();
    }
}

pub struct Plugin {
    host: HostApi,
    document: Document,
    tree: DomTree,
    oracle: RpcOracle,
    interpreter: RefCell<ClickInterpreter>,
    engine: RefCell<NavigationEngine<web_sys::Element>>,
    environment: RefCell<EnvironmentGuard>,
    overlay: Overlay,
    timers: RefCell<HashMap<NavTask, Timeout>>,
    click_listeners: RefCell<Vec<Listener>>,
    key_listener: RefCell<Option<Listener>>,
    top_bar: RefCell<TopBar>,
}

impl Plugin {
    pub fn new(host: HostApi) -> Result<Rc<Self>, DomError> {
        let document = dom::document().ok_or(DomError::NoDocument)?;
        Ok(Rc::new(Self {
            host,
            tree: DomTree::new(document.clone()),
            document,
            oracle: RpcOracle::new(OracleQuery::default()),
            interpreter: RefCell::new(ClickInterpreter::default()),
            engine: RefCell::new(NavigationEngine::new()),
            environment: RefCell::new(EnvironmentGuard::new()),
            overlay: Overlay::new(),
            timers: RefCell::new(HashMap::new()),
            click_listeners: RefCell::new(Vec::new()),
            key_listener: RefCell::new(None),
            top_bar: RefCell::new(TopBar::default()),
        }))
    }

    /// Load settings, register UI, and start intercepting clicks.
    ///
    /// In an unrecognized environment no buttons are added and nothing is
    /// intercepted.
    pub async fn start(self: &Rc<Self>) -> Result<(), DomError> {
        self.reload_settings().await;
        self.host
            .register_settings(&self.interpreter.borrow().settings().items());

        let checked = self
            .environment
            .borrow_mut()
            .check(&self.host.frontend(), &self.host.backend());
        self.overlay.mount(&self.document)?;
        let device = match checked {
            Ok(device) => device,
            Err(notice) => {
                if let Some(notice) = notice {
                    self.host.notify(&notice);
                }
                log::info!("unsupported environment, staying idle");
                return Ok(());
            }
        };
        log::info!("starting on {device:?}");

        self.add_buttons(device.supports_keyboard_navigation());

        let mut listeners = self.click_listeners.borrow_mut();
        for &kind in device.activation_events() {
            let weak = Rc::downgrade(self);
            listeners.push(Listener::attach(&self.document, kind, true, move |event| {
                if let Some(plugin) = weak.upgrade() {
                    plugin.on_click(&event);
                }
            })?);
        }
        Ok(())
    }

    pub async fn reload_settings(&self) {
        self.host.reload().await;
        let settings = Settings::load(&HostSettings::new(&self.host));
        logger::set_debug(settings.debug_logging);
        log::debug!(
            "settings loaded: {} ids, {} emojis",
            settings.ids.len(),
            settings.emojis.len()
        );
        self.interpreter.borrow_mut().replace_settings(settings);
    }

    /// Detach everything the plugin added to the page.
    pub fn dispose(self: &Rc<Self>) {
        let effects = self.engine.borrow_mut().deactivate();
        self.apply(effects);
        self.click_listeners.borrow_mut().clear();
        self.key_listener.borrow_mut().take();
        self.timers.borrow_mut().clear();
        self.top_bar.borrow_mut().clear();
        self.overlay.unmount();
        log::info!("disposed");
    }

    // =========================================================================
    // Modes
    // =========================================================================

    pub fn switch_mode(&self, mode: Mode) {
        let switch = self.interpreter.borrow_mut().switch_mode(mode);
        self.top_bar.borrow().paint(&switch.buttons);
        if let Some(notice) = switch.notice {
            self.host.notify(&notice);
        }
    }

    fn add_buttons(self: &Rc<Self>, device_has_keyboard: bool) {
        let (mode_buttons, keyboard) = {
            let interpreter = self.interpreter.borrow();
            let settings = interpreter.settings();
            (
                settings.mode_buttons,
                settings.keyboard_navigation && device_has_keyboard,
            )
        };
        let mut top_bar = self.top_bar.borrow_mut();
        let modes = if mode_buttons { &buttons::MODES[..] } else { &[] };
        for &(mode, icon, title) in modes {
            let weak = Rc::downgrade(self);
            let callback = Closure::wrap(Box::new(move || {
                if let Some(plugin) = weak.upgrade() {
                    plugin.switch_mode(mode);
                }
            }) as Box<dyn FnMut()>);
            let button = self
                .host
                .add_top_bar_button(icon, title, callback.as_ref().unchecked_ref());
            top_bar.modes.push((mode, button));
            top_bar.callbacks.push(callback);
        }

        if keyboard {
            let (icon, title) = buttons::NAVIGATION;
            let weak = Rc::downgrade(self);
            let callback = Closure::wrap(Box::new(move || {
                if let Some(plugin) = weak.upgrade() {
                    plugin.toggle_navigation();
                }
            }) as Box<dyn FnMut()>);
            let button = self
                .host
                .add_top_bar_button(icon, title, callback.as_ref().unchecked_ref());
            top_bar.navigation = Some(button);
            top_bar.callbacks.push(callback);
        }

        let active = self.interpreter.borrow().mode();
        top_bar.paint(&Mode::ALL.map(|mode| ButtonState {
            mode,
            active: mode == active,
        }));
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    fn on_click(self: &Rc<Self>, event: &Event) {
        let Some((row, region)) = events::click_target(event) else {
            return;
        };
        let click = TreeClick {
            node: self.tree.node(&row),
            row,
            region,
            is_replay: events::is_replay(event),
        };
        let outcome = match self.interpreter.try_borrow_mut() {
            Ok(mut interpreter) => interpreter.interpret(&click),
            Err(_) => {
                log::warn!("click ignored: interpreter busy");
                return;
            }
        };

        if outcome.suppresses_default() {
            event.prevent_default();
            event.stop_immediate_propagation();
        }
        if let Some(notice) = outcome.notice() {
            self.host.notify(&notice);
        }

        match outcome {
            ClickOutcome::PassThrough => {}
            ClickOutcome::Intercept(command) => core_host::execute(&self.tree, &command),
            ClickOutcome::Toggled { node_id, added } => {
                log::debug!("{node_id} {}", if added { "captured" } else { "released" });
                let mut store = HostSettings::new(&self.host);
                self.interpreter.borrow().settings().persist_ids(&mut store);
            }
            ClickOutcome::AwaitOracle { row, node_id } => {
                let plugin = Rc::clone(self);
                spawn_local(async move {
                    let command = core_oracle::resolve(&plugin.oracle, row, &node_id).await;
                    core_host::execute(&plugin.tree, &command);
                });
            }
        }

        if let Some(node_id) = interpreter::diagnosed_id(&click) {
            let _ = core_host::diagnose(&self.tree, node_id);
        }
    }

    // =========================================================================
    // Keyboard Navigation
    // =========================================================================

    pub fn toggle_navigation(self: &Rc<Self>) {
        let effects = {
            let mut engine = self.engine.borrow_mut();
            if engine.is_active() {
                engine.deactivate()
            } else {
                engine.activate(&self.tree)
            }
        };
        self.apply(effects);
    }

    fn on_key(self: &Rc<Self>, event: &KeyboardEvent) {
        let key = NavKey::from_key(&event.key());
        if key == NavKey::Other || event.ctrl_key() || event.meta_key() || event.alt_key() {
            return;
        }
        event.prevent_default();
        event.stop_propagation();

        let effects = match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.key(key, &self.tree),
            Err(_) => return,
        };
        self.apply(effects);
    }

    fn on_timer(self: &Rc<Self>, task: NavTask, token: TimerToken) {
        let effects = match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.on_timer(task, token, &self.tree),
            Err(_) => return,
        };
        self.apply(effects);
    }

    fn listen_keys(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let attached = Listener::attach(&self.document, "keydown", true, move |event| {
            if let Some(plugin) = weak.upgrade()
                && let Some(event) = event.dyn_ref::<KeyboardEvent>()
            {
                plugin.on_key(event);
            }
        });
        match attached {
            Ok(listener) => *self.key_listener.borrow_mut() = Some(listener),
            Err(e) => log::warn!("keyboard navigation unavailable: {e}"),
        }
    }

    fn schedule(self: &Rc<Self>, task: NavTask, token: TimerToken, delay_ms: u32) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(plugin) = weak.upgrade() {
                plugin.on_timer(task, token);
            }
        });
        // Replacing the entry drops, and so cancels, the previous timer.
        self.timers.borrow_mut().insert(task, timeout);
    }

    fn apply(self: &Rc<Self>, effects: Vec<NavEffect<web_sys::Element>>) {
        for effect in effects {
            match effect {
                NavEffect::Render(model) => self.overlay.show(model),
                NavEffect::Indicator(sequence) => self.overlay.indicate(sequence),
                NavEffect::Hide => self.overlay.hide(),
                NavEffect::ListenKeys => self.listen_keys(),
                NavEffect::UnlistenKeys => {
                    self.key_listener.borrow_mut().take();
                }
                NavEffect::Schedule {
                    task,
                    token,
                    delay_ms,
                } => self.schedule(task, token, delay_ms),
                NavEffect::Cancel(task) => {
                    self.timers.borrow_mut().remove(&task);
                }
                NavEffect::Run(command) => core_host::execute(&self.tree, &command),
            }
        }
    }
}
