use crate::view::{Mutation, PageEvent, Target, ViewState};

/// Below this distance from the pointer (in px) the trail snaps and stops
/// requesting frames.
const SETTLE_DISTANCE: f64 = 0.1;

/// Exponentially smoothed follower of the pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorTrail {
    smoothing: f64,
    pointer: (f64, f64),
    position: (f64, f64),
}

impl CursorTrail {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing,
            pointer: (0.0, 0.0),
            position: (0.0, 0.0),
        }
    }

    pub fn point_at(&mut self, x: f64, y: f64) {
        self.pointer = (x, y);
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn is_settled(&self) -> bool {
        (self.pointer.0 - self.position.0).abs() < SETTLE_DISTANCE
            && (self.pointer.1 - self.position.1).abs() < SETTLE_DISTANCE
    }

    /// Moves one frame's worth toward the pointer.
    pub fn step(&mut self) {
        let (x, y) = self.position;
        self.position = (
            x + (self.pointer.0 - x) * self.smoothing,
            y + (self.pointer.1 - y) * self.smoothing,
        );

        if self.is_settled() {
            self.position = self.pointer;
        }
    }
}

pub fn on_pointer_move(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    let PageEvent::PointerMove { x, y } = event else {
        return;
    };

    state.cursor.point_at(*x, *y);
    if state.layout.has_cursor_trail && !state.reduced_motion {
        out.push(Mutation::RequestFrame);
    }
}

pub fn on_frame(event: &PageEvent, state: &mut ViewState, out: &mut Vec<Mutation>) {
    if !matches!(event, PageEvent::Frame { .. }) {
        return;
    }

    if !state.layout.has_cursor_trail || state.reduced_motion || state.cursor.is_settled() {
        return;
    }

    state.cursor.step();
    let (x, y) = state.cursor.position();
    out.push(Mutation::style(
        Target::CursorTrail,
        "transform",
        format!("translate({x:.2}px, {y:.2}px)"),
    ));

    if !state.cursor.is_settled() {
        out.push(Mutation::RequestFrame);
    }
}
