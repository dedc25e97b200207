use crate::view::{
    Mutation, PageEvent, ScrollMetrics, Target, ViewState, CLASS_ACTIVE, CLASS_SCROLLED,
};

pub fn nav_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Percentage of the scrollable distance covered, or 0 when the page does
/// not scroll at all.
pub fn scroll_percent(metrics: &ScrollMetrics) -> f64 {
    let distance = metrics.scrollable_distance();
    if distance <= 0.0 {
        return 0.0;
    }

    (metrics.offset / distance * 100.0).clamp(0.0, 100.0)
}

pub fn card_parallax(offset: f64, base_rate: f64, speed_step: f64, index: usize) -> f64 {
    let speed = (index as f64 + 1.0) * speed_step;
    offset * base_rate * speed
}

/// Quadratic ease-in-out: position at time `t` of a move from `start` by
/// `change` lasting `duration`.
pub fn ease_in_out_quad(t: f64, start: f64, change: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return start + change;
    }

    let t = t / (duration / 2.0);
    if t < 1.0 {
        return change / 2.0 * t * t + start;
    }

    let t = t - 1.0;
    -change / 2.0 * (t * (t - 2.0) - 1.0) + start
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AnchorScroll {
    start: f64,
    distance: f64,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl AnchorScroll {
    fn new(from: f64, to: f64, duration_ms: u32) -> Self {
        Self {
            start: from,
            distance: to - from,
            duration_ms: f64::from(duration_ms),
            started_at: None,
        }
    }

    /// Position for the frame at `now_ms`, and whether the move is complete.
    /// The first frame anchors the timeline.
    fn step(&mut self, now_ms: f64) -> (f64, bool) {
        let started_at = *self.started_at.get_or_insert(now_ms);
        let elapsed = (now_ms - started_at).clamp(0.0, self.duration_ms);
        let top = ease_in_out_quad(elapsed, self.start, self.distance, self.duration_ms);

        (top, elapsed >= self.duration_ms)
    }
}

pub fn on_scroll_nav(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::Scroll(metrics) = event else {
        return;
    };

    if state.layout.has_nav {
        out.push(Mutation::class(
            Target::Nav,
            CLASS_SCROLLED,
            nav_scrolled(metrics.offset, state.config.nav_scroll_threshold),
        ));
    }
}

pub fn on_scroll_parallax(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::Scroll(metrics) = event else {
        return;
    };

    if state.reduced_motion {
        return;
    }

    let config = &state.config;
    let offset = metrics.offset;

    for index in 0..state.layout.floating_cards {
        let shift = card_parallax(offset, config.parallax_base_rate, config.parallax_speed_step, index);
        out.push(Mutation::style(
            Target::FloatingCard(index),
            "transform",
            format!("translateY({shift:.2}px)"),
        ));
    }

    if state.layout.has_image_decoration {
        let shift = offset * config.parallax_base_rate * config.decoration_speed;
        let rotation = offset * config.decoration_rotation_rate;
        out.push(Mutation::style(
            Target::ImageDecoration,
            "transform",
            format!("translateY({shift:.2}px) rotate({rotation:.2}deg)"),
        ));
    }
}

/// Handles both scroll and (debounced) resize, since either changes the
/// covered fraction.
pub fn on_scroll_progress(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let (PageEvent::Scroll(metrics) | PageEvent::Resize(metrics)) = event else {
        return;
    };

    if state.layout.has_scroll_indicator {
        out.push(Mutation::style(
            Target::ScrollIndicator,
            "--scroll-percent",
            format!("{:.2}%", scroll_percent(metrics)),
        ));
    }
}

pub fn on_anchor_click(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::AnchorClick { destination, from } = event else {
        return;
    };

    let Some(destination) = destination else {
        return;
    };

    let top = (destination - state.config.anchor_offset).max(0.0);

    state.nav_open = false;
    out.push(Mutation::class(Target::NavLinks, CLASS_ACTIVE, false));
    if state.layout.has_nav_toggle {
        out.push(Mutation::class(Target::NavToggle, CLASS_ACTIVE, false));
    }

    if state.reduced_motion || state.config.anchor_scroll_ms == 0 {
        state.anchor_scroll = None;
        out.push(Mutation::ScrollTo { top });
        return;
    }

    state.anchor_scroll = Some(AnchorScroll::new(*from, top, state.config.anchor_scroll_ms));
    out.push(Mutation::RequestFrame);
}

pub fn on_frame_anchor_scroll(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::Frame { now_ms } = event else {
        return;
    };

    let Some(animation) = state.anchor_scroll.as_mut() else {
        return;
    };

    let (top, done) = animation.step(*now_ms);
    out.push(Mutation::ScrollTo { top });

    if done {
        state.anchor_scroll = None;
    } else {
        out.push(Mutation::RequestFrame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectsConfig;
    use crate::view::PageLayout;

    fn page() -> PageLayout {
        PageLayout {
            has_nav: true,
            has_nav_toggle: true,
            has_scroll_indicator: true,
            has_image_decoration: true,
            floating_cards: 3,
            ..PageLayout::default()
        }
    }

    fn metrics(offset: f64) -> ScrollMetrics {
        ScrollMetrics {
            offset,
            scroll_height: 3_000.0,
            viewport_height: 1_000.0,
        }
    }

    fn run(handler: crate::dispatch::Handler, event: PageEvent, state: &mut ViewState) -> Vec<Mutation> {
        let mut out = Vec::new();
        handler(&event, state, &mut out);
        out
    }

    #[test]
    fn nav_threshold_is_strict() {
        assert!(!nav_scrolled(0.0, 50.0));
        assert!(!nav_scrolled(50.0, 50.0));
        assert!(nav_scrolled(51.0, 50.0));
    }

    #[test]
    fn nav_class_follows_offset_both_ways() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), false);

        let down = run(on_scroll_nav, PageEvent::Scroll(metrics(51.0)), &mut state);
        assert_eq!(down, vec![Mutation::class(Target::Nav, CLASS_SCROLLED, true)]);

        let up = run(on_scroll_nav, PageEvent::Scroll(metrics(50.0)), &mut state);
        assert_eq!(up, vec![Mutation::class(Target::Nav, CLASS_SCROLLED, false)]);
    }

    #[test]
    fn progress_spans_zero_to_one_hundred() {
        assert_eq!(scroll_percent(&metrics(0.0)), 0.0);
        assert_eq!(scroll_percent(&metrics(500.0)), 25.0);
        assert_eq!(scroll_percent(&metrics(2_000.0)), 100.0);
    }

    #[test]
    fn progress_on_an_unscrollable_page_is_zero() {
        let flat = ScrollMetrics {
            offset: 0.0,
            scroll_height: 800.0,
            viewport_height: 900.0,
        };
        assert_eq!(scroll_percent(&flat), 0.0);
    }

    #[test]
    fn progress_is_written_as_a_custom_property() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), false);
        let out = run(on_scroll_progress, PageEvent::Resize(metrics(1_000.0)), &mut state);

        assert_eq!(
            out,
            vec![Mutation::style(Target::ScrollIndicator, "--scroll-percent", "50.00%")]
        );
    }

    #[test]
    fn parallax_is_recomputed_from_the_offset() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), false);

        run(on_scroll_parallax, PageEvent::Scroll(metrics(400.0)), &mut state);
        let out = run(on_scroll_parallax, PageEvent::Scroll(metrics(100.0)), &mut state);

        assert_eq!(
            out,
            vec![
                Mutation::style(Target::FloatingCard(0), "transform", "translateY(-6.00px)"),
                Mutation::style(Target::FloatingCard(1), "transform", "translateY(-12.00px)"),
                Mutation::style(Target::FloatingCard(2), "transform", "translateY(-18.00px)"),
                Mutation::style(
                    Target::ImageDecoration,
                    "transform",
                    "translateY(-15.00px) rotate(10.00deg)"
                ),
            ]
        );
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut state = ViewState::new(EffectsConfig::default(), PageLayout::default(), false);
        let event = PageEvent::Scroll(metrics(300.0));

        assert!(run(on_scroll_nav, event.clone(), &mut state).is_empty());
        assert!(run(on_scroll_parallax, event.clone(), &mut state).is_empty());
        assert!(run(on_scroll_progress, event, &mut state).is_empty());
    }

    #[test]
    fn reduced_motion_disables_parallax() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), true);
        assert!(run(on_scroll_parallax, PageEvent::Scroll(metrics(300.0)), &mut state).is_empty());
    }

    #[test]
    fn easing_hits_both_endpoints_and_the_midpoint() {
        assert_eq!(ease_in_out_quad(0.0, 100.0, 400.0, 1_000.0), 100.0);
        assert_eq!(ease_in_out_quad(500.0, 100.0, 400.0, 1_000.0), 300.0);
        assert_eq!(ease_in_out_quad(1_000.0, 100.0, 400.0, 1_000.0), 500.0);
    }

    #[test]
    fn anchor_click_animates_to_the_offset_target() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), false);
        state.nav_open = true;

        let out = run(
            on_anchor_click,
            PageEvent::AnchorClick {
                destination: Some(1_080.0),
                from: 0.0,
            },
            &mut state,
        );
        assert!(!state.nav_open);
        assert_eq!(out.last(), Some(&Mutation::RequestFrame));

        let first = run(on_frame_anchor_scroll, PageEvent::Frame { now_ms: 5_000.0 }, &mut state);
        assert_eq!(first, vec![Mutation::ScrollTo { top: 0.0 }, Mutation::RequestFrame]);

        let last = run(on_frame_anchor_scroll, PageEvent::Frame { now_ms: 6_200.0 }, &mut state);
        assert_eq!(last, vec![Mutation::ScrollTo { top: 1_000.0 }]);
        assert!(state.anchor_scroll.is_none());
    }

    #[test]
    fn anchor_without_destination_does_nothing() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), false);
        let out = run(
            on_anchor_click,
            PageEvent::AnchorClick {
                destination: None,
                from: 200.0,
            },
            &mut state,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn reduced_motion_jumps_to_the_anchor() {
        let mut state = ViewState::new(EffectsConfig::default(), page(), true);
        let out = run(
            on_anchor_click,
            PageEvent::AnchorClick {
                destination: Some(40.0),
                from: 900.0,
            },
            &mut state,
        );
        assert_eq!(out.last(), Some(&Mutation::ScrollTo { top: 0.0 }));
        assert!(state.anchor_scroll.is_none());
    }
}
