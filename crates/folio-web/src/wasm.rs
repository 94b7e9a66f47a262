#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and page wiring.
//!
//! [`boot`] builds one [`App`] per page and parks it in a thread-local slot.
//! Every DOM listener and timer callback re-enters through [`with_app`], so
//! all page state is mutated from exactly one place.
//!
//! Only compiled on `wasm32` targets.

use core::time::Duration;
use std::cell::RefCell;

use folio_core::{
    ScrollSpy, SectionBounds, SiteConfig, SmartButtonMode, TapTarget, ThemeToggle, TimerId,
    TourSequencer,
};
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Node, Window};

use crate::console::{ConsoleLayer, ConsoleMethod, ConsoleSink, parse_level};
use crate::hover::HOVER_RULES;
use crate::markup;
use crate::page::{PageHost, query, query_all, scroll_window_to, set_class, set_style, set_timeout};

/// Delay before the profile name fades in.
const NAME_FADE_DELAY: Duration = Duration::from_millis(300);

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static LISTENERS: RefCell<Vec<Closure<dyn FnMut(Event)>>> = const { RefCell::new(Vec::new()) };
}

struct BrowserConsole;

impl ConsoleSink for BrowserConsole {
    fn write_line(&self, method: ConsoleMethod, line: &str) {
        let line = JsValue::from_str(line);
        match method {
            ConsoleMethod::Log => web_sys::console::log_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Error => web_sys::console::error_1(&line),
        }
    }
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn install_logging(level: &str) {
    let subscriber = tracing_subscriber::registry()
        .with(parse_level(level))
        .with(ConsoleLayer::new(BrowserConsole));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("folio: tracing subscriber already set"));
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Run `f` against the booted app. Dropped if the app is missing or already
/// borrowed further up the stack.
fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            tracing::warn!("re-entrant page callback dropped");
            return;
        };
        if let Some(app) = slot.as_mut() {
            f(app);
        }
    });
}

fn on_tour_timer(id: TimerId) {
    with_app(|app| {
        app.host.timer_fired(id);
        app.tour.on_timer_elapsed(&mut app.host, id);
    });
}

/// Register `handler` for `kind` events on `target` for the page lifetime.
fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::warn!(kind, "failed to register listener");
        return;
    }
    LISTENERS.with(|listeners| listeners.borrow_mut().push(closure));
}

fn nav_target(item: &Element) -> Option<String> {
    item.get_attribute("href")
        .and_then(|href| href.strip_prefix('#').map(str::to_string))
}

struct App {
    config: SiteConfig,
    host: PageHost,
    tour: TourSequencer,
    theme: ThemeToggle,
    spy: ScrollSpy,
    scroll_debounce: Option<i32>,
}

impl App {
    fn document(&self) -> &Document {
        self.host.document()
    }

    fn window(&self) -> &Window {
        self.host.window()
    }

    /// Decide what a page click means to the tour.
    fn classify_tap(&self, event: &Event) -> TapTarget {
        let Some(element) = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
        else {
            return TapTarget::Elsewhere;
        };
        let within = |selector: &str| element.closest(selector).ok().flatten().is_some();

        if within(&markup::class_selector(markup::TOOLTIP_SKIP_CLASS)) {
            TapTarget::SkipControl
        } else if within(&markup::class_selector(markup::TOOLTIP_NEXT_CLASS)) {
            TapTarget::NextControl
        } else if within(&markup::class_selector(markup::TOOLTIP_CLASS)) {
            TapTarget::TooltipBody
        } else if within(&self.host.selectors().print_button) {
            TapTarget::PrintControl
        } else if self.host.highlighted().is_some_and(|highlighted| {
            let node: &Node = &element;
            highlighted.contains(Some(node))
        }) {
            TapTarget::Highlighted
        } else {
            TapTarget::Elsewhere
        }
    }

    fn on_page_click(&mut self, event: &Event) {
        if !self.tour.is_active() {
            return;
        }
        let tap = self.classify_tap(event);
        self.tour.on_tap(&mut self.host, tap);
    }

    fn on_smart_button(&mut self) {
        match self.spy.button_mode(self.host.scroll_y()) {
            SmartButtonMode::Theme => {
                self.theme.toggle(&mut self.host);
                self.apply_theme();
            }
            SmartButtonMode::BackToTop => self.host.scroll_to_top(),
        }
    }

    fn apply_theme(&self) {
        if let Some(body) = self.document().body() {
            set_class(&body, markup::DARK_THEME_CLASS, self.theme.current_is_dark());
        }
        self.update_smart_button();
    }

    fn update_smart_button(&self) {
        let Some(button) = query(self.document(), &self.config.selectors.smart_button) else {
            return;
        };
        let mode = self.spy.button_mode(self.host.scroll_y());
        let back = mode == SmartButtonMode::BackToTop;
        set_class(&button, markup::BACK_TO_TOP_CLASS, back);
        set_class(&button, markup::THEME_MODE_CLASS, !back);
        set_class(&button, markup::VISIBLE_CLASS, back);

        let theme = self.theme.current();
        let title = mode.title().unwrap_or(theme.title());
        let icon = mode.icon_class().unwrap_or(theme.icon_class());
        let _ = button.set_attribute("title", title);
        if let Some(glyph) = button.query_selector("i").ok().flatten() {
            glyph.set_class_name(icon);
        }
    }

    fn update_active_nav(&self) {
        let document = self.document();
        let sections: Vec<SectionBounds> = self
            .config
            .navigation
            .sections
            .iter()
            .filter_map(|id| {
                let section = document
                    .get_element_by_id(id)?
                    .dyn_into::<HtmlElement>()
                    .ok()?;
                Some(SectionBounds::new(
                    id.clone(),
                    f64::from(section.offset_top()),
                    f64::from(section.offset_height()),
                ))
            })
            .collect();
        let active = self.spy.active_section(self.host.scroll_y(), &sections);
        for item in query_all(document, &self.config.selectors.nav_items) {
            let on = active.is_some() && nav_target(&item).as_deref() == active;
            set_class(&item, markup::ACTIVE_CLASS, on);
        }
    }

    fn on_nav_click(&self, item: &Element, event: &Event) {
        event.prevent_default();
        let Some(section) = nav_target(item) else {
            return;
        };
        for other in query_all(self.document(), &self.config.selectors.nav_items) {
            set_class(&other, markup::ACTIVE_CLASS, false);
        }
        set_class(item, markup::ACTIVE_CLASS, true);

        if let Some(element) = self.document().get_element_by_id(&section) {
            let viewport_top = element.get_bounding_client_rect().top();
            let top = self.spy.section_scroll_top(viewport_top, self.host.scroll_y());
            scroll_window_to(self.window(), top);
        }

        let navigation = &self.config.navigation;
        if section == navigation.skills_section {
            let tab = navigation.skills_default_tab.clone();
            set_timeout(self.window(), navigation.skills_tab_delay(), move || {
                with_app(|app| app.host.activate_tab(&tab));
            });
        }
    }

    fn on_scroll(&mut self) {
        if let Some(handle) = self.scroll_debounce.take() {
            self.window().clear_timeout_with_handle(handle);
        }
        self.scroll_debounce = set_timeout(
            self.window(),
            self.config.navigation.scroll_debounce(),
            || with_app(App::after_scroll),
        );
    }

    fn after_scroll(&mut self) {
        self.scroll_debounce = None;
        self.update_active_nav();
        self.update_smart_button();
        self.tour.relayout(&mut self.host);
    }

    fn print(&self) {
        if let Err(err) = self.window().print() {
            tracing::warn!(error = ?err, "print dialog failed");
        }
    }
}

fn wire_page(window: &Window, document: &Document, config: &SiteConfig) {
    listen(document, "click", |event| {
        with_app(|app| app.on_page_click(&event));
    });
    listen(window, "scroll", |_| with_app(App::on_scroll));
    listen(window, "resize", |_| {
        with_app(|app| {
            app.tour.relayout(&mut app.host);
        });
    });

    if let Some(button) = query(document, &config.selectors.smart_button) {
        listen(&button, "click", |_| with_app(App::on_smart_button));
    }
    if let Some(button) = query(document, &config.selectors.print_button) {
        listen(&button, "click", |_| with_app(|app| app.print()));
    }
    for item in query_all(document, &config.selectors.nav_items) {
        let target = item.clone();
        listen(&item, "click", move |event| {
            with_app(|app| app.on_nav_click(&target, &event));
        });
    }
    for tab in query_all(document, &config.selectors.tabs) {
        let Some(id) = tab.get_attribute("data-tab") else {
            continue;
        };
        listen(&tab, "click", move |_| {
            with_app(|app| app.host.activate_tab(&id));
        });
    }
}

fn install_hover_effects(document: &Document) {
    for rule in HOVER_RULES {
        for element in query_all(document, rule.selector) {
            let Ok(element) = element.dyn_into::<HtmlElement>() else {
                continue;
            };
            for (kind, entering) in [("mouseenter", true), ("mouseleave", false)] {
                let target = element.clone();
                listen(&element, kind, move |_| {
                    let active = target.class_list().contains(markup::ACTIVE_CLASS);
                    if let Some(style) = rule.style_for(entering, active) {
                        set_style(&target, "transform", style.transform);
                        if let Some(shadow) = style.box_shadow {
                            set_style(&target, "box-shadow", shadow);
                        }
                    }
                });
            }
        }
    }
}

fn fade_in_name(window: &Window, document: &Document, selector: &str) {
    let Some(name) =
        query(document, selector).and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    set_style(&name, "opacity", "0");
    set_timeout(window, NAME_FADE_DELAY, move || {
        set_style(&name, "transition", "opacity 0.8s ease");
        set_style(&name, "opacity", "1");
    });
}

/// Wire up the page. Call once after `DOMContentLoaded`.
///
/// `config_json` is an optional [`SiteConfig`] document; omitted fields keep
/// their defaults.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Result<(), JsValue> {
    install_panic_hook();
    let config = match config_json.as_deref() {
        Some(json) => SiteConfig::from_json_str(json).map_err(to_js)?,
        None => SiteConfig::default(),
    };
    install_logging(&config.log_level);

    if APP.with(|slot| slot.borrow().is_some()) {
        tracing::warn!("boot called more than once; ignoring");
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let tour = TourSequencer::from_config(&config).map_err(to_js)?;
    let host = PageHost::new(
        window.clone(),
        document.clone(),
        config.selectors.clone(),
        on_tour_timer,
    );
    let theme = ThemeToggle::load(&host, config.theme.storage_key.clone());
    let spy = ScrollSpy::from_config(&config.navigation);
    let app = App {
        config: config.clone(),
        host,
        tour,
        theme,
        spy,
        scroll_debounce: None,
    };
    app.apply_theme();
    app.update_active_nav();
    APP.with(|slot| *slot.borrow_mut() = Some(app));

    wire_page(&window, &document, &config);
    install_hover_effects(&document);
    fade_in_name(&window, &document, &config.selectors.profile_name);

    with_app(|app| {
        app.tour.schedule_start(&mut app.host);
    });
    tracing::info!(steps = config.catalog().len(), "page booted");
    Ok(())
}
