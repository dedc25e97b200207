use crate::view::{Mutation, PageEvent, Target, ViewState, CLASS_ACTIVE, FILTER_ALL};

const ENTER_OFFSET: &str = "translateY(20px)";
const EXIT_OFFSET: &str = "translateY(-20px)";
const RESTING: &str = "translateY(0)";

/// The selected work category. Every click bumps `generation` so follow-ups
/// scheduled by an older click can recognize they are stale.
#[derive(Clone, Debug)]
pub(crate) struct FilterState {
    active: String,
    generation: u64,
}

impl FilterState {
    pub(crate) fn new() -> Self {
        Self {
            active: FILTER_ALL.to_string(),
            generation: 0,
        }
    }

    pub(crate) fn active_category(&self) -> &str {
        &self.active
    }
}

pub fn matches_filter(category: &str, active: &str) -> bool {
    active == FILTER_ALL || category == active
}

pub fn visible_cards(categories: &[String], active: &str) -> Vec<usize> {
    categories
        .iter()
        .enumerate()
        .filter(|(_, category)| matches_filter(category, active))
        .map(|(index, _)| index)
        .collect()
}

pub fn on_filter_click(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::FilterClick(clicked) = event else {
        return;
    };

    let Some(category) = state.layout.filter_buttons.get(*clicked).cloned() else {
        return;
    };

    state.filter.active = category;
    state.filter.generation += 1;
    let generation = state.filter.generation;
    let active = state.filter.active.as_str();

    for index in 0..state.layout.filter_buttons.len() {
        out.push(Mutation::class(Target::FilterButton(index), CLASS_ACTIVE, index == *clicked));
    }

    for (index, category) in state.layout.work_cards.iter().enumerate() {
        let card = Target::WorkCard(index);
        if matches_filter(category, active) {
            out.push(Mutation::style(card, "display", "block"));
            out.push(Mutation::style(card, "opacity", "0"));
            out.push(Mutation::style(card, "transform", ENTER_OFFSET));
            out.push(Mutation::schedule(
                state.config.filter_stagger_ms.saturating_mul(index as u32),
                PageEvent::FilterEnter {
                    card: index,
                    generation,
                },
            ));
        } else {
            out.push(Mutation::style(card, "opacity", "0"));
            out.push(Mutation::style(card, "transform", EXIT_OFFSET));
            out.push(Mutation::schedule(
                state.config.filter_exit_ms,
                PageEvent::FilterExit {
                    card: index,
                    generation,
                },
            ));
        }
    }
}

pub fn on_filter_enter(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::FilterEnter { card, generation } = event else {
        return;
    };

    if *generation != state.filter.generation || *card >= state.layout.work_cards.len() {
        return;
    }

    out.push(Mutation::style(Target::WorkCard(*card), "opacity", "1"));
    out.push(Mutation::style(Target::WorkCard(*card), "transform", RESTING));
}

pub fn on_filter_exit(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::FilterExit { card, generation } = event else {
        return;
    };

    if *generation != state.filter.generation || *card >= state.layout.work_cards.len() {
        return;
    }

    out.push(Mutation::style(Target::WorkCard(*card), "display", "none"));
}
