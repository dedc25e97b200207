use crate::view::{
    Mutation, PageEvent, Target, ViewState, CLASS_ACTIVE, CLASS_KEYBOARD_NAVIGATION, CLASS_LOADED,
};

const LIFT: &str = " translateY(-4px)";
const RESTING_LIFT: &str = "translateY(0px)";

/// Adds the hover lift to an inline transform, dropping an explicit resting
/// offset first so the two never stack.
pub fn lifted_transform(current: &str) -> String {
    format!("{}{LIFT}", current.replacen(RESTING_LIFT, "", 1))
}

pub fn settled_transform(current: &str) -> String {
    current.replacen(LIFT, "", 1)
}

pub fn on_nav_toggle(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    if !matches!(event, PageEvent::NavToggle) {
        return;
    }

    state.nav_open = !state.nav_open;
    out.push(Mutation::class(Target::NavLinks, CLASS_ACTIVE, state.nav_open));
    out.push(Mutation::class(Target::NavToggle, CLASS_ACTIVE, state.nav_open));
}

pub fn on_load(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    if !matches!(event, PageEvent::Load) {
        return;
    }

    out.push(Mutation::class(Target::Body, CLASS_LOADED, true));
    if state.layout.hero_elements > 0 {
        out.push(Mutation::schedule(
            state.config.hero_reveal_delay_ms,
            PageEvent::HeroReveal,
        ));
    }
}

pub fn on_hero_reveal(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    if !matches!(event, PageEvent::HeroReveal) {
        return;
    }

    for index in 0..state.layout.hero_elements {
        out.push(Mutation::schedule(
            state.config.hero_stagger_ms.saturating_mul(index as u32),
            PageEvent::HeroElementReveal(index),
        ));
    }
}

pub fn on_hero_element_reveal(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::HeroElementReveal(index) = event else {
        return;
    };

    if *index >= state.layout.hero_elements {
        return;
    }

    out.push(Mutation::style(Target::HeroElement(*index), "opacity", "1"));
    out.push(Mutation::style(Target::HeroElement(*index), "transform", "translateY(0)"));
}

pub fn on_key_down(event: &PageEvent, _state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::KeyDown(key) = event else {
        return;
    };

    if key == "Tab" {
        out.push(Mutation::class(Target::Body, CLASS_KEYBOARD_NAVIGATION, true));
    }
}

pub fn on_mouse_down(event: &PageEvent, _state: &mut ViewState, out: &mut Vec<Mutation>) {
    if matches!(event, PageEvent::MouseDown) {
        out.push(Mutation::class(Target::Body, CLASS_KEYBOARD_NAVIGATION, false));
    }
}

pub fn on_pointer_enter(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::PointerEnter { index, transform } = event else {
        return;
    };

    if *index < state.layout.interactive {
        out.push(Mutation::style(
            Target::Interactive(*index),
            "transform",
            lifted_transform(transform),
        ));
    }
}

pub fn on_pointer_leave(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::PointerLeave { index, transform } = event else {
        return;
    };

    if *index < state.layout.interactive {
        out.push(Mutation::style(
            Target::Interactive(*index),
            "transform",
            settled_transform(transform),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectsConfig;
    use crate::view::PageLayout;

    fn state() -> ViewState {
        let layout = PageLayout {
            has_nav_toggle: true,
            hero_elements: 3,
            interactive: 2,
            ..PageLayout::default()
        };
        ViewState::new(EffectsConfig::default(), layout, false)
    }

    fn run(handler: crate::dispatch::Handler, event: PageEvent, state: &mut ViewState) -> Vec<Mutation> {
        let mut out = Vec::new();
        handler(&event, state, &mut out);
        out
    }

    #[test]
    fn nav_toggle_flips_both_elements_together() {
        let mut state = state();

        let open = run(on_nav_toggle, PageEvent::NavToggle, &mut state);
        assert_eq!(
            open,
            vec![
                Mutation::class(Target::NavLinks, CLASS_ACTIVE, true),
                Mutation::class(Target::NavToggle, CLASS_ACTIVE, true),
            ]
        );

        let closed = run(on_nav_toggle, PageEvent::NavToggle, &mut state);
        assert!(closed
            .iter()
            .all(|mutation| matches!(mutation, Mutation::Class { enabled: false, .. })));
    }

    #[test]
    fn load_marks_body_then_staggers_hero_elements() {
        let mut state = state();

        let loaded = run(on_load, PageEvent::Load, &mut state);
        assert_eq!(
            loaded,
            vec![
                Mutation::class(Target::Body, CLASS_LOADED, true),
                Mutation::schedule(300, PageEvent::HeroReveal),
            ]
        );

        let staggered = run(on_hero_reveal, PageEvent::HeroReveal, &mut state);
        assert_eq!(
            staggered,
            vec![
                Mutation::schedule(0, PageEvent::HeroElementReveal(0)),
                Mutation::schedule(150, PageEvent::HeroElementReveal(1)),
                Mutation::schedule(300, PageEvent::HeroElementReveal(2)),
            ]
        );

        let shown = run(on_hero_element_reveal, PageEvent::HeroElementReveal(1), &mut state);
        assert_eq!(shown[0], Mutation::style(Target::HeroElement(1), "opacity", "1"));
    }

    #[test]
    fn tab_enables_and_mouse_disables_keyboard_styling() {
        let mut state = state();

        assert!(run(on_key_down, PageEvent::KeyDown("Enter".into()), &mut state).is_empty());
        assert_eq!(
            run(on_key_down, PageEvent::KeyDown("Tab".into()), &mut state),
            vec![Mutation::class(Target::Body, CLASS_KEYBOARD_NAVIGATION, true)]
        );
        assert_eq!(
            run(on_mouse_down, PageEvent::MouseDown, &mut state),
            vec![Mutation::class(Target::Body, CLASS_KEYBOARD_NAVIGATION, false)]
        );
    }

    #[test]
    fn hover_lift_round_trips_the_inline_transform() {
        assert_eq!(lifted_transform(""), " translateY(-4px)");
        assert_eq!(lifted_transform("translateY(0px)"), " translateY(-4px)");
        assert_eq!(settled_transform("scale(1.02) translateY(-4px)"), "scale(1.02)");
        assert_eq!(settled_transform(&lifted_transform("rotate(2deg)")), "rotate(2deg)");
    }

    #[test]
    fn hover_on_unknown_element_is_ignored() {
        let mut state = state();
        let out = run(
            on_pointer_enter,
            PageEvent::PointerEnter {
                index: 5,
                transform: String::new(),
            },
            &mut state,
        );
        assert!(out.is_empty());
    }
}
