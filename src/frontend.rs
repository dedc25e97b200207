use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use serde_json::json;
use thiserror::Error;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent, NodeList,
};

use crate::config::EffectsConfig;
use crate::contact_form;
use crate::dispatch::{page_table, DispatchTable};
use crate::filter::visible_cards;
use crate::logging::{log_event, LogLevel};
use crate::view::{Mutation, PageEvent, PageLayout, RevealKind, ScrollMetrics, Target, ViewState};

const CONFIG_ELEMENT_ID: &str = "effects-config";
const REVEAL_INDEX_ATTR: &str = "data-reveal-index";
const REVEALABLE_SELECTOR: &str =
    ".work-card, .skill-category, .timeline-item, .about-content, .contact-content";
const HERO_ELEMENT_SELECTOR: &str =
    ".hero-badge, .hero-greeting, .hero-title, .hero-description, .hero-actions, .hero-stats, .hero-visual";
const INTERACTIVE_SELECTOR: &str = ".btn, .work-card, .skill-category, .timeline-content";

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("browser window is unavailable")]
    MissingWindow,
    #[error("document is unavailable")]
    MissingDocument,
    #[error("javascript call failed: {0}")]
    Js(String),
}

impl From<JsValue> for FrontendError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn scroll_metrics() -> ScrollMetrics {
    let Some(win) = window() else {
        return ScrollMetrics::default();
    };

    let offset = win.scroll_y().unwrap_or(0.0).max(0.0);
    let viewport_height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let scroll_height = win
        .document()
        .and_then(|d| d.body())
        .map(|body| f64::from(body.scroll_height()))
        .unwrap_or(0.0);

    ScrollMetrics {
        offset,
        scroll_height,
        viewport_height,
    }
}

fn load_config(document: &Document) -> EffectsConfig {
    let Some(source) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return EffectsConfig::default();
    };

    match EffectsConfig::from_json(&source) {
        Ok(config) => config,
        Err(error) => {
            let fallback = EffectsConfig::default();
            log_event(
                &fallback,
                LogLevel::Warn,
                "config_rejected",
                json!({ "error": error.to_string() }),
            );
            fallback
        }
    }
}

fn html_elements(list: Result<NodeList, JsValue>) -> Vec<HtmlElement> {
    let Ok(list) = list else {
        return Vec::new();
    };

    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn query(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

struct Elements {
    body: Option<HtmlElement>,
    nav: Option<HtmlElement>,
    nav_toggle: Option<HtmlElement>,
    nav_links: Option<HtmlElement>,
    scroll_indicator: Option<HtmlElement>,
    image_decoration: Option<HtmlElement>,
    cursor_trail: Option<HtmlElement>,
    floating_cards: Vec<HtmlElement>,
    filter_buttons: Vec<HtmlElement>,
    work_cards: Vec<HtmlElement>,
    revealables: Vec<HtmlElement>,
    reveal_kinds: Vec<RevealKind>,
    skill_items: Vec<Vec<HtmlElement>>,
    stats: Vec<HtmlElement>,
    hero_elements: Vec<HtmlElement>,
    interactive: Vec<HtmlElement>,
    anchors: Vec<HtmlElement>,
}

impl Elements {
    fn collect(document: &Document) -> Self {
        let mut revealables = html_elements(document.query_selector_all(REVEALABLE_SELECTOR));
        let mut reveal_kinds = Vec::with_capacity(revealables.len() + 1);
        let mut skill_items = Vec::with_capacity(revealables.len() + 1);

        for element in &revealables {
            let classes = element.class_list();
            if classes.contains("skill-category") {
                let items = html_elements(element.query_selector_all(".skill-item"));
                reveal_kinds.push(RevealKind::SkillCategory { items: items.len() });
                skill_items.push(items);
                continue;
            }

            reveal_kinds.push(if classes.contains("timeline-item") {
                RevealKind::TimelineItem
            } else {
                RevealKind::Plain
            });
            skill_items.push(Vec::new());
        }

        if let Some(hero) = query(document, ".hero") {
            revealables.push(hero);
            reveal_kinds.push(RevealKind::Hero);
            skill_items.push(Vec::new());
        }

        for (index, element) in revealables.iter().enumerate() {
            let _ = element.set_attribute(REVEAL_INDEX_ATTR, &index.to_string());
        }

        Self {
            body: document.body(),
            nav: query(document, "#nav"),
            nav_toggle: query(document, "#nav-toggle"),
            nav_links: query(document, ".nav-links"),
            scroll_indicator: query(document, ".scroll-indicator"),
            image_decoration: query(document, ".image-decoration"),
            cursor_trail: query(document, ".cursor-trail"),
            floating_cards: html_elements(document.query_selector_all(".floating-card")),
            filter_buttons: html_elements(document.query_selector_all(".work-nav-btn")),
            work_cards: html_elements(document.query_selector_all(".work-card")),
            revealables,
            reveal_kinds,
            skill_items,
            stats: html_elements(document.query_selector_all(".stat-number")),
            hero_elements: html_elements(document.query_selector_all(HERO_ELEMENT_SELECTOR)),
            interactive: html_elements(document.query_selector_all(INTERACTIVE_SELECTOR)),
            anchors: html_elements(document.query_selector_all("a[href^=\"#\"]")),
        }
    }

    fn layout(&self) -> PageLayout {
        let attribute = |elements: &[HtmlElement], name: &str| -> Vec<String> {
            elements
                .iter()
                .map(|element| element.get_attribute(name).unwrap_or_default())
                .collect()
        };

        PageLayout {
            has_nav: self.nav.is_some(),
            has_nav_toggle: self.nav_toggle.is_some(),
            has_scroll_indicator: self.scroll_indicator.is_some(),
            has_image_decoration: self.image_decoration.is_some(),
            has_cursor_trail: self.cursor_trail.is_some(),
            floating_cards: self.floating_cards.len(),
            filter_buttons: attribute(&self.filter_buttons, "data-filter"),
            work_cards: attribute(&self.work_cards, "data-category"),
            revealables: self.reveal_kinds.clone(),
            stats: self
                .stats
                .iter()
                .map(|stat| stat.text_content().unwrap_or_default())
                .collect(),
            hero_elements: self.hero_elements.len(),
            interactive: self.interactive.len(),
        }
    }

    fn resolve(&self, target: Target) -> Option<&HtmlElement> {
        match target {
            Target::Body => self.body.as_ref(),
            Target::Nav => self.nav.as_ref(),
            Target::NavToggle => self.nav_toggle.as_ref(),
            Target::NavLinks => self.nav_links.as_ref(),
            Target::ScrollIndicator => self.scroll_indicator.as_ref(),
            Target::ImageDecoration => self.image_decoration.as_ref(),
            Target::CursorTrail => self.cursor_trail.as_ref(),
            Target::FloatingCard(index) => self.floating_cards.get(index),
            Target::FilterButton(index) => self.filter_buttons.get(index),
            Target::WorkCard(index) => self.work_cards.get(index),
            Target::Revealable(index) => self.revealables.get(index),
            Target::SkillItem { category, item } => {
                self.skill_items.get(category).and_then(|items| items.get(item))
            }
            Target::Stat(index) => self.stats.get(index),
            Target::HeroElement(index) => self.hero_elements.get(index),
            Target::Interactive(index) => self.interactive.get(index),
        }
    }
}

struct Runtime {
    table: RefCell<DispatchTable>,
    state: RefCell<ViewState>,
    elements: Elements,
    observers: RefCell<Vec<IntersectionObserver>>,
    frame_pending: Cell<bool>,
    frame_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Runtime {
    fn log(&self, level: LogLevel, event: &str, fields: serde_json::Value) {
        let state = self.state.borrow();
        log_event(&state.config, level, event, fields);
    }
}

fn dispatch(runtime: &Rc<Runtime>, event: PageEvent) {
    let mutations = {
        let mut table = runtime.table.borrow_mut();
        let mut state = runtime.state.borrow_mut();
        table.dispatch(now_ms(), &event, &mut state)
    };

    for mutation in mutations {
        apply(runtime, mutation);
    }
}

fn apply(runtime: &Rc<Runtime>, mutation: Mutation) {
    match mutation {
        Mutation::Class {
            target,
            class,
            enabled,
        } => {
            if let Some(element) = runtime.elements.resolve(target) {
                let _ = element.class_list().toggle_with_force(class, enabled);
            }
        }
        Mutation::Style {
            target,
            property,
            value,
        } => {
            if let Some(element) = runtime.elements.resolve(target) {
                let _ = element.style().set_property(property, &value);
            }
        }
        Mutation::Text { target, text } => {
            if let Some(element) = runtime.elements.resolve(target) {
                element.set_text_content(Some(&text));
            }
        }
        Mutation::Unobserve(index) => {
            if let Some(element) = runtime.elements.revealables.get(index) {
                for observer in runtime.observers.borrow().iter() {
                    observer.unobserve(element);
                }
            }
        }
        Mutation::ScrollTo { top } => {
            if let Some(win) = window() {
                win.scroll_to_with_x_and_y(0.0, top);
            }
        }
        Mutation::Schedule { delay_ms, event } => schedule(runtime, delay_ms, event),
        Mutation::RequestFrame => request_frame(runtime),
    }
}

fn schedule(runtime: &Rc<Runtime>, delay_ms: u32, event: PageEvent) {
    let Some(win) = window() else {
        return;
    };

    let weak = Rc::downgrade(runtime);
    let callback = Closure::once_into_js(move || {
        if let Some(runtime) = weak.upgrade() {
            dispatch(&runtime, event);
        }
    });

    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if win
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        .is_err()
    {
        runtime.log(LogLevel::Warn, "timer_rejected", json!({ "delayMs": delay_ms }));
    }
}

fn install_frame_callback(runtime: &Rc<Runtime>) {
    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        if let Some(runtime) = weak.upgrade() {
            runtime.frame_pending.set(false);
            dispatch(&runtime, PageEvent::Frame { now_ms: timestamp });
        }
    });

    *runtime.frame_callback.borrow_mut() = Some(callback);
}

fn request_frame(runtime: &Rc<Runtime>) {
    if runtime.frame_pending.replace(true) {
        return;
    }

    let requested = window().is_some_and(|win| {
        runtime
            .frame_callback
            .borrow()
            .as_ref()
            .is_some_and(|callback| {
                win.request_animation_frame(callback.as_ref().unchecked_ref())
                    .is_ok()
            })
    });

    if !requested {
        runtime.frame_pending.set(false);
    }
}

fn listen(
    target: &EventTarget,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), FrontendError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn attach_listeners(runtime: &Rc<Runtime>, document: &Document) -> Result<(), FrontendError> {
    let win = window().ok_or(FrontendError::MissingWindow)?;

    {
        let runtime = Rc::clone(runtime);
        listen(&win, "scroll", move |_| {
            dispatch(&runtime, PageEvent::Scroll(scroll_metrics()));
        })?;
    }

    {
        let runtime = Rc::clone(runtime);
        listen(&win, "resize", move |_| {
            dispatch(&runtime, PageEvent::Resize(scroll_metrics()));
        })?;
    }

    {
        let runtime = Rc::clone(runtime);
        listen(&win, "load", move |_| dispatch(&runtime, PageEvent::Load))?;
    }

    if let Some(toggle) = runtime.elements.nav_toggle.as_ref() {
        let runtime = Rc::clone(runtime);
        listen(toggle, "click", move |_| dispatch(&runtime, PageEvent::NavToggle))?;
    }

    for anchor in &runtime.elements.anchors {
        let runtime = Rc::clone(runtime);
        let document = document.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        listen(anchor, "click", move |event| {
            event.prevent_default();
            let destination = document
                .query_selector(&href)
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlElement>().ok())
                .map(|element| f64::from(element.offset_top()));
            dispatch(
                &runtime,
                PageEvent::AnchorClick {
                    destination,
                    from: scroll_metrics().offset,
                },
            );
        })?;
    }

    for (index, button) in runtime.elements.filter_buttons.iter().enumerate() {
        let runtime = Rc::clone(runtime);
        listen(button, "click", move |_| {
            dispatch(&runtime, PageEvent::FilterClick(index));
            let fields = {
                let state = runtime.state.borrow();
                let active = state.active_category();
                json!({
                    "category": active,
                    "visible": visible_cards(&state.layout.work_cards, active).len(),
                })
            };
            runtime.log(LogLevel::Debug, "filter_selected", fields);
        })?;
    }

    for (index, element) in runtime.elements.interactive.iter().enumerate() {
        let enter_runtime = Rc::clone(runtime);
        let enter_element = element.clone();
        listen(element, "mouseenter", move |_| {
            let transform = enter_element
                .style()
                .get_property_value("transform")
                .unwrap_or_default();
            dispatch(&enter_runtime, PageEvent::PointerEnter { index, transform });
        })?;

        let leave_runtime = Rc::clone(runtime);
        let leave_element = element.clone();
        listen(element, "mouseleave", move |_| {
            let transform = leave_element
                .style()
                .get_property_value("transform")
                .unwrap_or_default();
            dispatch(&leave_runtime, PageEvent::PointerLeave { index, transform });
        })?;
    }

    {
        let runtime = Rc::clone(runtime);
        listen(document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                dispatch(&runtime, PageEvent::KeyDown(event.key()));
            }
        })?;
    }

    {
        let runtime = Rc::clone(runtime);
        listen(document, "mousedown", move |_| dispatch(&runtime, PageEvent::MouseDown))?;
    }

    {
        let runtime = Rc::clone(runtime);
        listen(document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                dispatch(
                    &runtime,
                    PageEvent::PointerMove {
                        x: f64::from(event.client_x()),
                        y: f64::from(event.client_y()),
                    },
                );
            }
        })?;
    }

    Ok(())
}

fn observe_revealables(runtime: &Rc<Runtime>) -> Result<(), FrontendError> {
    if runtime.elements.revealables.is_empty() {
        return Ok(());
    }

    let (threshold, root_margin) = {
        let state = runtime.state.borrow();
        (state.config.reveal_threshold, state.config.reveal_root_margin.clone())
    };

    let weak = Rc::downgrade(runtime);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };

            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let Some(index) = entry
                    .target()
                    .get_attribute(REVEAL_INDEX_ATTR)
                    .and_then(|value| value.parse::<usize>().ok())
                else {
                    continue;
                };

                dispatch(
                    &runtime,
                    PageEvent::Intersection {
                        index,
                        ratio: entry.intersection_ratio(),
                        intersecting: entry.is_intersecting(),
                    },
                );
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    options.set_root_margin(&root_margin);

    let sections =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    let hero = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    callback.forget();

    let elements = &runtime.elements;
    for (element, kind) in elements.revealables.iter().zip(&elements.reveal_kinds) {
        match kind {
            RevealKind::Hero => hero.observe(element),
            _ => sections.observe(element),
        }
    }
    *runtime.observers.borrow_mut() = vec![sections, hero];

    Ok(())
}

fn start() -> Result<(), FrontendError> {
    let document = window()
        .ok_or(FrontendError::MissingWindow)?
        .document()
        .ok_or(FrontendError::MissingDocument)?;

    let config = load_config(&document);
    let elements = Elements::collect(&document);
    let layout = elements.layout();
    let reduced_motion = prefers_reduced_motion();

    log_event(
        &config,
        LogLevel::Info,
        "effects_ready",
        json!({
            "filterButtons": layout.filter_buttons.len(),
            "workCards": layout.work_cards.len(),
            "revealables": layout.revealables.len(),
            "stats": layout.stats.len(),
            "reducedMotion": reduced_motion,
        }),
    );

    let runtime = Rc::new(Runtime {
        table: RefCell::new(page_table(&config)),
        state: RefCell::new(ViewState::new(config.clone(), layout, reduced_motion)),
        elements,
        observers: RefCell::new(Vec::new()),
        frame_pending: Cell::new(false),
        frame_callback: RefCell::new(None),
    });

    install_frame_callback(&runtime);
    attach_listeners(&runtime, &document)?;
    observe_revealables(&runtime)?;
    contact_form::mount(&document, config);

    dispatch(&runtime, PageEvent::Scroll(scroll_metrics()));
    if document.ready_state() == "complete" {
        dispatch(&runtime, PageEvent::Load);
    }

    Ok(())
}

pub fn run() {
    if let Err(error) = start() {
        log_event(
            &EffectsConfig::default(),
            LogLevel::Warn,
            "effects_unavailable",
            json!({ "error": error.to_string() }),
        );
    }
}
