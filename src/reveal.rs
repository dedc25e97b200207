use crate::view::{Mutation, PageEvent, RevealKind, Target, ViewState, CLASS_ANIMATE};

const PLUS_MARKER: char = '+';

#[derive(Clone, Debug)]
pub(crate) struct RevealState {
    revealed: Vec<bool>,
}

impl RevealState {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            revealed: vec![false; count],
        }
    }

    /// Marks `index` revealed if this intersection qualifies. Returns false
    /// for unknown, already revealed, or insufficiently visible elements.
    fn try_reveal(&mut self, index: usize, ratio: f64, intersecting: bool, threshold: f64) -> bool {
        let Some(revealed) = self.revealed.get_mut(index) else {
            return false;
        };

        if *revealed || !intersecting || ratio < threshold {
            return false;
        }

        *revealed = true;
        true
    }

    #[cfg(test)]
    pub(crate) fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CountStep {
    Running(String),
    Finished(String),
}

/// Counts from 0 to `target` in `target / steps` increments. The value is
/// floored while running and set to exactly `target` on the last step.
#[derive(Clone, Debug, PartialEq)]
pub struct CountUp {
    target: u64,
    increment: f64,
    current: f64,
    plus_marker: bool,
    finished: bool,
}

impl CountUp {
    /// Reads the leading integer of a statistic's text, e.g. `"150+"`.
    pub fn parse(text: &str, steps: u32) -> Option<Self> {
        let trimmed = text.trim_start();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let target = trimmed[..digits_end].parse::<u64>().ok()?;

        Some(Self {
            target,
            increment: target as f64 / f64::from(steps.max(1)),
            current: 0.0,
            plus_marker: text.contains(PLUS_MARKER),
            finished: false,
        })
    }

    pub fn final_text(&self) -> String {
        self.render(self.target)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tick(&mut self) -> CountStep {
        if self.finished {
            return CountStep::Finished(self.final_text());
        }

        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.finished = true;
            return CountStep::Finished(self.final_text());
        }

        CountStep::Running(self.render(self.current.floor() as u64))
    }

    fn render(&self, value: u64) -> String {
        if self.plus_marker {
            format!("{value}{PLUS_MARKER}")
        } else {
            value.to_string()
        }
    }
}

pub fn on_intersection(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::Intersection {
        index,
        ratio,
        intersecting,
    } = event
    else {
        return;
    };

    let Some(kind) = state.layout.revealables.get(*index).copied() else {
        return;
    };

    // The hero has its own observer with default options: any overlap counts.
    let threshold = match kind {
        RevealKind::Hero => 0.0,
        _ => state.config.reveal_threshold,
    };
    if !state.reveal.try_reveal(*index, *ratio, *intersecting, threshold) {
        return;
    }
    let target = Target::Revealable(*index);

    match kind {
        RevealKind::Plain => out.push(Mutation::class(target, CLASS_ANIMATE, true)),
        RevealKind::SkillCategory { items } => {
            out.push(Mutation::class(target, CLASS_ANIMATE, true));
            for item in 0..items {
                out.push(Mutation::schedule(
                    state.config.skill_stagger_ms.saturating_mul(item as u32),
                    PageEvent::SkillItemReveal {
                        category: *index,
                        item,
                    },
                ));
            }
        }
        RevealKind::TimelineItem => {
            out.push(Mutation::class(target, CLASS_ANIMATE, true));
            out.push(Mutation::style(target, "opacity", "1"));
            out.push(Mutation::style(target, "transform", "translateX(0)"));
        }
        RevealKind::Hero => {
            out.push(Mutation::schedule(state.config.stats_delay_ms, PageEvent::StatsStart));
        }
    }

    out.push(Mutation::Unobserve(*index));
}

pub fn on_skill_item_reveal(event: &PageEvent, _state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::SkillItemReveal { category, item } = event else {
        return;
    };

    let target = Target::SkillItem {
        category: *category,
        item: *item,
    };
    out.push(Mutation::style(target, "opacity", "1"));
    out.push(Mutation::style(target, "transform", "translateY(0)"));
}

pub fn on_stats_start(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    if !matches!(event, PageEvent::StatsStart) {
        return;
    }

    let steps = state.config.count_up_steps;
    let tick_ms = state.config.count_up_tick_ms;

    for (index, text) in state.layout.stats.iter().enumerate() {
        let Some(slot) = state.counters.get_mut(index) else {
            continue;
        };
        if slot.is_some() {
            continue;
        }

        let Some(counter) = CountUp::parse(text, steps) else {
            continue;
        };

        if state.reduced_motion {
            out.push(Mutation::Text {
                target: Target::Stat(index),
                text: counter.final_text(),
            });
            let mut counter = counter;
            counter.finished = true;
            *slot = Some(counter);
            continue;
        }

        *slot = Some(counter);
        out.push(Mutation::schedule(tick_ms, PageEvent::StatTick(index)));
    }
}

pub fn on_stat_tick(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::StatTick(index) = event else {
        return;
    };

    let Some(Some(counter)) = state.counters.get_mut(*index) else {
        return;
    };

    if counter.is_finished() {
        return;
    }

    let target = Target::Stat(*index);
    match counter.tick() {
        CountStep::Running(text) => {
            out.push(Mutation::Text { target, text });
            out.push(Mutation::schedule(
                state.config.count_up_tick_ms,
                PageEvent::StatTick(*index),
            ));
        }
        CountStep::Finished(text) => out.push(Mutation::Text { target, text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectsConfig;
    use crate::view::PageLayout;

    fn state(reduced_motion: bool) -> ViewState {
        let layout = PageLayout {
            revealables: vec![
                RevealKind::Plain,
                RevealKind::SkillCategory { items: 3 },
                RevealKind::TimelineItem,
                RevealKind::Hero,
            ],
            stats: ["150+", "12", "n/a"].map(String::from).to_vec(),
            ..PageLayout::default()
        };
        ViewState::new(EffectsConfig::default(), layout, reduced_motion)
    }

    fn intersect(state: &mut ViewState, index: usize, ratio: f64) -> Vec<Mutation> {
        let mut out = Vec::new();
        on_intersection(
            &PageEvent::Intersection {
                index,
                ratio,
                intersecting: ratio > 0.0,
            },
            state,
            &mut out,
        );
        out
    }

    /// Feeds scheduled stat ticks back in until none remain.
    fn drain_ticks(state: &mut ViewState, mut pending: Vec<PageEvent>) -> Vec<(usize, String)> {
        let mut shown = Vec::new();
        while let Some(event) = pending.pop() {
            let mut out = Vec::new();
            on_stat_tick(&event, state, &mut out);
            for mutation in out {
                match mutation {
                    Mutation::Text {
                        target: Target::Stat(index),
                        text,
                    } => shown.push((index, text)),
                    Mutation::Schedule { event, .. } => pending.push(event),
                    other => panic!("unexpected mutation {other:?}"),
                }
            }
        }
        shown
    }

    #[test]
    fn below_threshold_never_reveals() {
        let mut state = state(false);
        assert!(intersect(&mut state, 0, 0.05).is_empty());
        assert!(intersect(&mut state, 0, 0.0).is_empty());
        assert!(!state.reveal.is_revealed(0));
    }

    #[test]
    fn reveal_is_terminal_and_unobserves() {
        let mut state = state(false);

        let first = intersect(&mut state, 0, 0.2);
        assert_eq!(
            first,
            vec![
                Mutation::class(Target::Revealable(0), CLASS_ANIMATE, true),
                Mutation::Unobserve(0),
            ]
        );

        assert!(intersect(&mut state, 0, 1.0).is_empty());
        assert!(state.reveal.is_revealed(0));
    }

    #[test]
    fn exactly_the_threshold_reveals_and_just_under_does_not() {
        let threshold = EffectsConfig::default().reveal_threshold;
        let mut state = state(false);

        assert!(intersect(&mut state, 0, threshold - 1e-4).is_empty());
        assert!(intersect(&mut state, 0, 0.0995).is_empty());
        assert!(!state.reveal.is_revealed(0));

        assert!(!intersect(&mut state, 0, threshold).is_empty());
        assert!(state.reveal.is_revealed(0));
    }

    #[test]
    fn hero_starts_stats_on_any_overlap() {
        let mut state = state(false);
        let mut out = Vec::new();
        on_intersection(
            &PageEvent::Intersection {
                index: 3,
                ratio: 0.0,
                intersecting: true,
            },
            &mut state,
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Mutation::schedule(1_000, PageEvent::StatsStart),
                Mutation::Unobserve(3),
            ]
        );
    }

    #[test]
    fn skill_category_staggers_its_items() {
        let mut state = state(false);
        let out = intersect(&mut state, 1, 0.5);

        let delays: Vec<u32> = out
            .iter()
            .filter_map(|mutation| match mutation {
                Mutation::Schedule { delay_ms, .. } => Some(*delay_ms),
                _ => None,
            })
            .collect();
        assert_eq!(delays, vec![0, 100, 200]);
    }

    #[test]
    fn timeline_item_slides_into_place() {
        let mut state = state(false);
        let out = intersect(&mut state, 2, 0.3);
        assert!(out.contains(&Mutation::style(Target::Revealable(2), "transform", "translateX(0)")));
    }

    #[test]
    fn hero_starts_stats_after_the_delay() {
        let mut state = state(false);
        let out = intersect(&mut state, 3, 0.5);
        assert_eq!(
            out,
            vec![
                Mutation::schedule(1_000, PageEvent::StatsStart),
                Mutation::Unobserve(3),
            ]
        );
    }

    #[test]
    fn count_up_ends_exactly_on_target_keeping_the_plus_marker() {
        let mut state = state(false);
        let mut out = Vec::new();
        on_stats_start(&PageEvent::StatsStart, &mut state, &mut out);

        let pending: Vec<PageEvent> = out
            .into_iter()
            .filter_map(|mutation| match mutation {
                Mutation::Schedule { delay_ms: 30, event } => Some(event),
                _ => None,
            })
            .collect();
        assert_eq!(pending.len(), 2, "non-numeric stat is skipped");

        let shown = drain_ticks(&mut state, pending);
        let last_of = |stat: usize| {
            shown
                .iter()
                .filter(|(index, _)| *index == stat)
                .map(|(_, text)| text.clone())
                .last()
        };

        assert_eq!(last_of(0).as_deref(), Some("150+"));
        assert_eq!(last_of(1).as_deref(), Some("12"));
        assert!(shown
            .iter()
            .filter(|(index, _)| *index == 0)
            .all(|(_, text)| text.ends_with('+')));
    }

    #[test]
    fn count_up_values_never_exceed_the_target() {
        let mut counter = CountUp::parse("7", 50).expect("numeric text");
        let mut values = Vec::new();
        loop {
            match counter.tick() {
                CountStep::Running(text) => values.push(text),
                CountStep::Finished(text) => {
                    values.push(text);
                    break;
                }
            }
        }

        assert_eq!(values.last().map(String::as_str), Some("7"));
        assert!(values
            .iter()
            .all(|text| text.parse::<u64>().map(|value| value <= 7).unwrap_or(false)));
    }

    #[test]
    fn parse_reads_the_leading_integer() {
        assert_eq!(CountUp::parse(" 42 projects", 50).map(|c| c.final_text()), Some("42".to_string()));
        assert_eq!(CountUp::parse("0+", 50).map(|c| c.final_text()), Some("0+".to_string()));
        assert!(CountUp::parse("about 5", 50).is_none());
    }

    #[test]
    fn reduced_motion_shows_targets_at_once() {
        let mut state = state(true);
        let mut out = Vec::new();
        on_stats_start(&PageEvent::StatsStart, &mut state, &mut out);

        assert_eq!(
            out,
            vec![
                Mutation::Text {
                    target: Target::Stat(0),
                    text: "150+".to_string()
                },
                Mutation::Text {
                    target: Target::Stat(1),
                    text: "12".to_string()
                },
            ]
        );
    }

    #[test]
    fn stats_start_twice_does_not_restart_counters() {
        let mut state = state(false);
        let mut out = Vec::new();
        on_stats_start(&PageEvent::StatsStart, &mut state, &mut out);
        out.clear();
        on_stats_start(&PageEvent::StatsStart, &mut state, &mut out);
        assert!(out.is_empty());
    }
}
