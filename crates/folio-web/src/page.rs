#![forbid(unsafe_code)]

//! DOM-backed [`TourHost`](folio_core::TourHost).
//!
//! Only compiled on `wasm32` targets.

use core::time::Duration;

use folio_core::config::SelectorConfig;
use folio_core::{
    DeviceSnapshot, FlagError, FlagStore, MemoryFlagStore, Rect, Size, StepAction, TabSwitcher,
    TargetSelector, TimerHost, TimerId, TooltipContent, TooltipPlacement, TourSurface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions, Storage, Window,
};

use crate::markup;
use crate::timeouts::TimeoutHandles;

/// Run `f` after `delay` on the browser event loop. Returns the timeout
/// handle, or `None` when the browser refused to schedule it.
pub(crate) fn set_timeout(
    window: &Window,
    delay: Duration,
    f: impl FnOnce() + 'static,
) -> Option<i32> {
    let callback = Closure::once_into_js(f);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        millis,
    ) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::warn!(error = ?err, "setTimeout failed");
            None
        }
    }
}

/// All elements matching `selector`, in document order.
pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        tracing::debug!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub(crate) fn set_class(element: &Element, class: &str, on: bool) {
    let list = element.class_list();
    let result = if on { list.add_1(class) } else { list.remove_1(class) };
    if result.is_err() {
        tracing::debug!(class, "class list update failed");
    }
}

pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if element.style().set_property(property, value).is_err() {
        tracing::debug!(property, "style update failed");
    }
}

/// Smooth-scroll the window to a document offset.
pub(crate) fn scroll_window_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

/// The page as seen by the tour and the page collaborators.
pub(crate) struct PageHost {
    window: Window,
    document: Document,
    storage: Option<Storage>,
    fallback: MemoryFlagStore,
    selectors: SelectorConfig,
    highlighted: Option<Element>,
    tooltip: Option<HtmlElement>,
    timers: TimeoutHandles,
    tabs: TabSwitcher,
    on_timer: fn(TimerId),
}

impl PageHost {
    pub(crate) fn new(
        window: Window,
        document: Document,
        selectors: SelectorConfig,
        on_timer: fn(TimerId),
    ) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) | Err(_) => {
                tracing::warn!("localStorage unavailable; flags last for this page view only");
                None
            }
        };
        let tab_elements = query_all(&document, &selectors.tabs);
        let ids: Vec<String> = tab_elements
            .iter()
            .filter_map(|tab| tab.get_attribute("data-tab"))
            .collect();
        let initial = tab_elements
            .iter()
            .find(|tab| tab.class_list().contains(markup::ACTIVE_CLASS))
            .and_then(|tab| tab.get_attribute("data-tab"));
        let tabs = TabSwitcher::new(ids, initial.as_deref());
        Self {
            window,
            document,
            storage,
            fallback: MemoryFlagStore::new(),
            selectors,
            highlighted: None,
            tooltip: None,
            timers: TimeoutHandles::new(),
            tabs,
            on_timer,
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    pub(crate) fn highlighted(&self) -> Option<&Element> {
        self.highlighted.as_ref()
    }

    pub(crate) fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// Activate a tab and its panel. Unknown ids are ignored.
    pub(crate) fn activate_tab(&mut self, id: &str) {
        if !self.tabs.activate(id) {
            return;
        }
        for tab in query_all(&self.document, &self.selectors.tabs) {
            let on = tab.get_attribute("data-tab").as_deref() == Some(id);
            set_class(&tab, markup::ACTIVE_CLASS, on);
        }
        for panel in query_all(&self.document, &self.selectors.tab_panels) {
            set_class(&panel, markup::ACTIVE_CLASS, panel.id() == id);
        }
    }

    /// Drop the handle of a tour timer whose callback is running.
    pub(crate) fn timer_fired(&mut self, id: TimerId) {
        self.timers.fired(id);
    }

    pub(crate) fn scroll_to_top(&self) {
        scroll_window_to(&self.window, 0.0);
    }

    fn resolve(&self, target: &TargetSelector) -> Option<Element> {
        query(&self.document, target.as_str())
    }
}

impl TimerHost for PageHost {
    fn arm_timer(&mut self, id: TimerId, delay: Duration) {
        let on_timer = self.on_timer;
        if let Some(handle) = set_timeout(&self.window, delay, move || on_timer(id)) {
            self.timers.armed(id, handle);
        }
    }

    fn cancel_timer(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.cancel(id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

impl FlagStore for PageHost {
    fn read_raw(&self, key: &str) -> Option<String> {
        match &self.storage {
            Some(storage) => storage.get_item(key).ok().flatten(),
            None => self.fallback.read_raw(key),
        }
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), FlagError> {
        match &self.storage {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|err| FlagError::WriteRejected {
                    key: key.to_string(),
                    reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
                }),
            None => self.fallback.write_raw(key, value),
        }
    }
}

impl TourSurface for PageHost {
    fn device(&self) -> DeviceSnapshot {
        let user_agent = self.window.navigator().user_agent().unwrap_or_default();
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(f64::NAN);
        DeviceSnapshot::new(user_agent, width)
    }

    fn viewport(&self) -> Size {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or(0.0)
        };
        Size::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn target_bounds(&mut self, target: &TargetSelector) -> Option<Rect> {
        let element = self.resolve(target)?;
        let rect = element.get_bounding_client_rect();
        Some(Rect::new(rect.x(), rect.y(), rect.width(), rect.height()))
    }

    fn scroll_into_view(&mut self, target: &TargetSelector) {
        let Some(element) = self.resolve(target) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        options.set_inline(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn highlight(&mut self, target: &TargetSelector) {
        self.clear_highlight();
        if let Some(element) = self.resolve(target) {
            set_class(&element, markup::HIGHLIGHT_CLASS, true);
            self.highlighted = Some(element);
        }
    }

    fn clear_highlight(&mut self) {
        if let Some(element) = self.highlighted.take() {
            set_class(&element, markup::HIGHLIGHT_CLASS, false);
        }
    }

    fn mount_tooltip(&mut self, content: &TooltipContent<'_>) -> Size {
        self.unmount_tooltip();
        let Some(body) = self.document.body() else {
            return Size::default();
        };
        let Some(tooltip) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            tracing::warn!("failed to create tooltip element");
            return Size::default();
        };
        tooltip.set_class_name(markup::TOOLTIP_CLASS);
        let _ = tooltip.set_attribute("role", "tooltip");
        let _ = tooltip.set_attribute("aria-label", &content.aria_label());
        tooltip.set_inner_html(&markup::tooltip_inner_html(content));
        set_style(&tooltip, "position", "fixed");
        set_style(&tooltip, "z-index", markup::TOOLTIP_Z_INDEX);
        set_style(&tooltip, "visibility", "hidden");
        if body.append_child(&tooltip).is_err() {
            tracing::warn!("failed to attach tooltip");
            return Size::default();
        }
        let rect = tooltip.get_bounding_client_rect();
        self.tooltip = Some(tooltip);
        Size::new(rect.width(), rect.height())
    }

    fn position_tooltip(&mut self, placement: &TooltipPlacement) {
        let Some(tooltip) = &self.tooltip else {
            return;
        };
        set_style(tooltip, "top", &markup::px(placement.top));
        set_style(tooltip, "left", &markup::px(placement.left));
        set_style(tooltip, "max-width", &markup::px(placement.width));
        set_style(tooltip, "visibility", "visible");
        let _ = tooltip.set_attribute("data-side", markup::side_attr(placement.side));
    }

    fn unmount_tooltip(&mut self) {
        if let Some(tooltip) = self.tooltip.take() {
            tooltip.remove();
        }
    }

    fn run_action(&mut self, action: &StepAction) {
        match action {
            StepAction::ActivateTab(id) => self.activate_tab(id),
            StepAction::ScrollToTop => self.scroll_to_top(),
        }
    }
}
