use serde::{Deserialize, Serialize};

use crate::config::InputConfig;

/// Carousel navigation direction. A zero-magnitude gesture has no direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Maps the sign of `value` onto a direction. Zero has none.
    pub fn from_sign(value: i32) -> Option<Self> {
        match value.signum() {
            1 => Some(Self::Forward),
            -1 => Some(Self::Backward),
            _ => None,
        }
    }

    /// Like [`Direction::from_sign`] for continuous deltas; NaN is rejected.
    pub fn from_delta(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Forward)
        } else if delta < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub fn signum(self) -> f32 {
        self.sign() as f32
    }
}

/// Turns wheel and touch gestures into discrete [`Direction`] steps.
///
/// The adapter does not debounce: every qualifying gesture yields a step, and
/// the carousel's transition lock decides whether it is honoured.
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    touch_threshold: f32,
    touch_start_y: Option<f32>,
}

impl InputAdapter {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            touch_threshold: config.touch_threshold.max(0.0),
            touch_start_y: None,
        }
    }

    pub fn wheel(&mut self, delta_y: f32) -> Option<Direction> {
        Direction::from_delta(delta_y)
    }

    pub fn touch_start(&mut self, y: f32) {
        self.touch_start_y = y.is_finite().then_some(y);
    }

    /// Emits a step once the finger has travelled past the threshold, then
    /// re-anchors so a continued drag can produce further steps.
    pub fn touch_move(&mut self, y: f32) -> Option<Direction> {
        let start = self.touch_start_y?;
        if !y.is_finite() {
            return None;
        }
        let delta = start - y;
        if delta.abs() <= self.touch_threshold {
            return None;
        }

        self.touch_start_y = Some(y);
        Direction::from_delta(delta)
    }

    pub fn touch_end(&mut self) {
        self.touch_start_y = None;
    }

    pub fn is_touching(&self) -> bool {
        self.touch_start_y.is_some()
    }
}
