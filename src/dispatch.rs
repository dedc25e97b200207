//! Ordered event routing.
//!
//! Handlers are registered per [`EventKind`] and run in registration order.
//! A registration may be gated by a [`Throttle`] or a [`Debounce`]; debounced
//! handlers run when their `DebounceElapsed` event comes back from the timer.

use std::collections::HashMap;

use crate::config::EffectsConfig;
use crate::timing::{Debounce, Throttle};
use crate::view::{EventKind, Mutation, PageEvent, ViewState};
use crate::{cursor, filter, interaction, reveal, scroll_effects};

pub type Handler = fn(&PageEvent, &mut ViewState, &mut Vec<Mutation>);

enum Gate {
    Open,
    Throttled(Throttle),
    Debounced(Debounce<PageEvent>),
}

struct Slot {
    handler: Handler,
    gate: Gate,
}

#[derive(Default)]
pub struct DispatchTable {
    slots: Vec<Slot>,
    routes: HashMap<EventKind, Vec<usize>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, handler: Handler) -> &mut Self {
        self.register(kind, handler, Gate::Open)
    }

    pub fn on_throttled(&mut self, kind: EventKind, limit_ms: u32, handler: Handler) -> &mut Self {
        self.register(kind, handler, Gate::Throttled(Throttle::new(limit_ms)))
    }

    pub fn on_debounced(
        &mut self,
        kind: EventKind,
        wait_ms: u32,
        immediate: bool,
        handler: Handler,
    ) -> &mut Self {
        self.register(
            kind,
            handler,
            Gate::Debounced(Debounce::new(wait_ms, immediate)),
        )
    }

    fn register(&mut self, kind: EventKind, handler: Handler, gate: Gate) -> &mut Self {
        let slot = self.slots.len();
        self.slots.push(Slot { handler, gate });
        self.routes.entry(kind).or_default().push(slot);
        self
    }

    #[cfg(test)]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.routes.get(&kind).map_or(0, Vec::len)
    }

    /// Runs every handler registered for the event's kind and returns the
    /// mutations they produced, in order.
    pub fn dispatch(&mut self, now_ms: f64, event: &PageEvent, state: &mut ViewState) -> Vec<Mutation> {
        let mut out = Vec::new();

        if let PageEvent::DebounceElapsed { slot, ticket } = event {
            if let Some(Slot {
                handler,
                gate: Gate::Debounced(debounce),
            }) = self.slots.get_mut(*slot)
            {
                if let Some(latest) = debounce.expire(*ticket) {
                    (*handler)(&latest, state, &mut out);
                }
            }
            return out;
        }

        let Some(route) = self.routes.get(&event.kind()) else {
            return out;
        };

        for &index in route {
            let slot = &mut self.slots[index];
            match &mut slot.gate {
                Gate::Open => (slot.handler)(event, state, &mut out),
                Gate::Throttled(throttle) => {
                    if throttle.admit(now_ms) {
                        (slot.handler)(event, state, &mut out);
                    }
                }
                Gate::Debounced(debounce) => {
                    let triggered = debounce.trigger(event.clone());
                    if let Some(args) = triggered.run_now {
                        (slot.handler)(&args, state, &mut out);
                    }
                    out.push(Mutation::schedule(
                        triggered.wait_ms,
                        PageEvent::DebounceElapsed {
                            slot: index,
                            ticket: triggered.ticket,
                        },
                    ));
                }
            }
        }

        out
    }
}

pub fn page_table(config: &EffectsConfig) -> DispatchTable {
    let mut table = DispatchTable::new();

    table
        .on(EventKind::Scroll, scroll_effects::on_scroll_nav)
        .on_throttled(EventKind::Scroll, config.scroll_throttle_ms, scroll_effects::on_scroll_parallax)
        .on_throttled(EventKind::Scroll, config.scroll_throttle_ms, scroll_effects::on_scroll_progress)
        .on_debounced(EventKind::Resize, config.resize_debounce_ms, false, scroll_effects::on_scroll_progress)
        .on(EventKind::AnchorClick, scroll_effects::on_anchor_click)
        .on(EventKind::Frame, scroll_effects::on_frame_anchor_scroll)
        .on(EventKind::NavToggle, interaction::on_nav_toggle)
        .on(EventKind::FilterClick, filter::on_filter_click)
        .on(EventKind::FilterEnter, filter::on_filter_enter)
        .on(EventKind::FilterExit, filter::on_filter_exit)
        .on(EventKind::Intersection, reveal::on_intersection)
        .on(EventKind::SkillItemReveal, reveal::on_skill_item_reveal)
        .on(EventKind::StatsStart, reveal::on_stats_start)
        .on(EventKind::StatTick, reveal::on_stat_tick)
        .on(EventKind::Load, interaction::on_load)
        .on(EventKind::HeroReveal, interaction::on_hero_reveal)
        .on(EventKind::HeroElementReveal, interaction::on_hero_element_reveal)
        .on(EventKind::KeyDown, interaction::on_key_down)
        .on(EventKind::MouseDown, interaction::on_mouse_down)
        .on(EventKind::PointerEnter, interaction::on_pointer_enter)
        .on(EventKind::PointerLeave, interaction::on_pointer_leave)
        .on(EventKind::PointerMove, cursor::on_pointer_move)
        .on(EventKind::Frame, cursor::on_frame);

    table
}
