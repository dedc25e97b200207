use crate::config::EffectsConfig;
use crate::cursor::CursorTrail;
use crate::filter::FilterState;
use crate::reveal::{CountUp, RevealState};
use crate::scroll_effects::AnchorScroll;
use crate::timing::Ticket;

pub const FILTER_ALL: &str = "all";

pub const CLASS_ACTIVE: &str = "active";
pub const CLASS_ANIMATE: &str = "animate";
pub const CLASS_KEYBOARD_NAVIGATION: &str = "keyboard-navigation";
pub const CLASS_LOADED: &str = "loaded";
pub const CLASS_SCROLLED: &str = "scrolled";

/// An element (or element slot) the glue layer knows how to look up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Body,
    Nav,
    NavToggle,
    NavLinks,
    ScrollIndicator,
    ImageDecoration,
    CursorTrail,
    FloatingCard(usize),
    FilterButton(usize),
    WorkCard(usize),
    Revealable(usize),
    SkillItem { category: usize, item: usize },
    Stat(usize),
    HeroElement(usize),
    Interactive(usize),
}

/// What a revealable element does when it first becomes visible, beyond
/// gaining the `animate` class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealKind {
    Plain,
    SkillCategory { items: usize },
    TimelineItem,
    Hero,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageLayout {
    pub has_nav: bool,
    pub has_nav_toggle: bool,
    pub has_scroll_indicator: bool,
    pub has_image_decoration: bool,
    pub has_cursor_trail: bool,
    pub floating_cards: usize,
    pub filter_buttons: Vec<String>,
    pub work_cards: Vec<String>,
    pub revealables: Vec<RevealKind>,
    pub stats: Vec<String>,
    pub hero_elements: usize,
    pub interactive: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn scrollable_distance(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Scroll(ScrollMetrics),
    Resize(ScrollMetrics),
    Load,
    NavToggle,
    AnchorClick {
        destination: Option<f64>,
        from: f64,
    },
    FilterClick(usize),
    FilterEnter {
        card: usize,
        generation: u64,
    },
    FilterExit {
        card: usize,
        generation: u64,
    },
    Intersection {
        index: usize,
        ratio: f64,
        intersecting: bool,
    },
    SkillItemReveal {
        category: usize,
        item: usize,
    },
    StatsStart,
    StatTick(usize),
    HeroReveal,
    HeroElementReveal(usize),
    KeyDown(String),
    MouseDown,
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerEnter {
        index: usize,
        transform: String,
    },
    PointerLeave {
        index: usize,
        transform: String,
    },
    Frame {
        now_ms: f64,
    },
    DebounceElapsed {
        slot: usize,
        ticket: Ticket,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Load,
    NavToggle,
    AnchorClick,
    FilterClick,
    FilterEnter,
    FilterExit,
    Intersection,
    SkillItemReveal,
    StatsStart,
    StatTick,
    HeroReveal,
    HeroElementReveal,
    KeyDown,
    MouseDown,
    PointerMove,
    PointerEnter,
    PointerLeave,
    Frame,
    DebounceElapsed,
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll(_) => EventKind::Scroll,
            Self::Resize(_) => EventKind::Resize,
            Self::Load => EventKind::Load,
            Self::NavToggle => EventKind::NavToggle,
            Self::AnchorClick { .. } => EventKind::AnchorClick,
            Self::FilterClick(_) => EventKind::FilterClick,
            Self::FilterEnter { .. } => EventKind::FilterEnter,
            Self::FilterExit { .. } => EventKind::FilterExit,
            Self::Intersection { .. } => EventKind::Intersection,
            Self::SkillItemReveal { .. } => EventKind::SkillItemReveal,
            Self::StatsStart => EventKind::StatsStart,
            Self::StatTick(_) => EventKind::StatTick,
            Self::HeroReveal => EventKind::HeroReveal,
            Self::HeroElementReveal(_) => EventKind::HeroElementReveal,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::MouseDown => EventKind::MouseDown,
            Self::PointerMove { .. } => EventKind::PointerMove,
            Self::PointerEnter { .. } => EventKind::PointerEnter,
            Self::PointerLeave { .. } => EventKind::PointerLeave,
            Self::Frame { .. } => EventKind::Frame,
            Self::DebounceElapsed { .. } => EventKind::DebounceElapsed,
        }
    }
}

/// A write the glue layer performs against the live document.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Class {
        target: Target,
        class: &'static str,
        enabled: bool,
    },
    Style {
        target: Target,
        property: &'static str,
        value: String,
    },
    Text {
        target: Target,
        text: String,
    },
    Unobserve(usize),
    ScrollTo {
        top: f64,
    },
    Schedule {
        delay_ms: u32,
        event: PageEvent,
    },
    RequestFrame,
}

impl Mutation {
    pub fn class(target: Target, class: &'static str, enabled: bool) -> Self {
        Self::Class {
            target,
            class,
            enabled,
        }
    }

    pub fn style(target: Target, property: &'static str, value: impl Into<String>) -> Self {
        Self::Style {
            target,
            property,
            value: value.into(),
        }
    }

    pub fn schedule(delay_ms: u32, event: PageEvent) -> Self {
        Self::Schedule { delay_ms, event }
    }
}

#[derive(Debug)]
pub struct ViewState {
    pub config: EffectsConfig,
    pub layout: PageLayout,
    pub reduced_motion: bool,
    pub(crate) nav_open: bool,
    pub(crate) filter: FilterState,
    pub(crate) reveal: RevealState,
    pub(crate) counters: Vec<Option<CountUp>>,
    pub(crate) cursor: CursorTrail,
    pub(crate) anchor_scroll: Option<AnchorScroll>,
}

impl ViewState {
    pub fn new(config: EffectsConfig, layout: PageLayout, reduced_motion: bool) -> Self {
        let filter = FilterState::new();
        let reveal = RevealState::new(layout.revealables.len());
        let counters = vec![None; layout.stats.len()];
        let cursor = CursorTrail::new(config.cursor_smoothing);

        Self {
            config,
            layout,
            reduced_motion,
            nav_open: false,
            filter,
            reveal,
            counters,
            cursor,
            anchor_scroll: None,
        }
    }

    pub fn active_category(&self) -> &str {
        self.filter.active_category()
    }
}
