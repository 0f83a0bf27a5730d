//! Carousel controller: the `Idle` / `Transitioning` state machine that walks
//! the preset catalog.
//!
//! An accepted [`CarouselController::advance`] starts every tween of the
//! transition in the same tick (label slides and wipes, blob spin, background
//! fade, progress bar, material parameters). The outgoing label's wipe is the
//! gate: when it completes the new index is committed and the lock released.
//! Requests that arrive while the lock is held are dropped, so at most one
//! transition is ever in flight and at most two labels are on screen.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{
    animator::{ParameterAnimator, ParameterSet},
    config::TransitionConfig,
    input::Direction,
    preset::{Preset, PresetCatalog, Rgb},
    scene::{labels_for, SceneState, TextLabel},
    tween::{Easing, Lerp, Tween},
};

/// Value the label wipe uniform reaches at the end of a transition.
pub const WIPE_END: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Transitioning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselState {
    pub current_index: usize,
    pub animation_in_flight: bool,
    pub pending_next_index: Option<usize>,
}

/// Notifications produced by [`CarouselController::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEvent {
    Revealed,
    TransitionStarted {
        from: usize,
        to: usize,
        direction: Direction,
    },
    /// Flat shading, wireframe and gradient of `index` landed.
    DiscreteApplied { index: usize },
    Committed { index: usize },
}

#[derive(Debug)]
struct ActiveTransition {
    from: usize,
    to: usize,
    gate: Tween<f32>,
}

#[derive(Debug)]
pub struct CarouselController {
    catalog: PresetCatalog,
    config: TransitionConfig,
    state: CarouselState,
    scene: SceneState,
    params: ParameterSet,
    labels: Vec<TextLabel>,
    animator: ParameterAnimator,
    transition: Option<ActiveTransition>,
    label_slides: Vec<(usize, Tween<f32>)>,
    label_wipes: Vec<(usize, Tween<f32>)>,
    background: Option<Tween<Rgb>>,
    rotation: Option<Tween<f32>>,
    progress_bar: Option<Tween<f32>>,
    blob_scale: Option<Tween<f32>>,
    blob_tint: Option<Tween<Rgb>>,
    loader_fade: Option<Tween<f32>>,
    revealed: bool,
    events: Vec<CarouselEvent>,
}

impl CarouselController {
    pub fn new(catalog: PresetCatalog, config: TransitionConfig, font_size: f32) -> Self {
        let labels = labels_for(&catalog, font_size);
        Self {
            animator: ParameterAnimator::new(&config),
            catalog,
            config,
            state: CarouselState {
                current_index: 0,
                animation_in_flight: false,
                pending_next_index: None,
            },
            scene: SceneState::default(),
            params: ParameterSet::default(),
            labels,
            transition: None,
            label_slides: Vec::new(),
            label_wipes: Vec::new(),
            background: None,
            rotation: None,
            progress_bar: None,
            blob_scale: None,
            blob_tint: None,
            loader_fade: None,
            revealed: false,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.animation_in_flight {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Direct access for debug panels that tweak values by hand.
    pub fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn current_preset(&self) -> &Preset {
        self.preset(self.state.current_index)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        for label in &mut self.labels {
            label.font_size = font_size;
        }
    }

    /// Raw-sign entry point used by input handlers. Zero is ignored.
    pub fn advance(&mut self, direction: i32) -> Option<usize> {
        match Direction::from_sign(direction) {
            Some(direction) => self.advance_in(direction),
            None => {
                tracing::debug!("ignoring advance without direction");
                None
            }
        }
    }

    /// Starts a transition toward the neighbour in `direction`. Returns the
    /// target index, or `None` when the request was dropped.
    pub fn advance_in(&mut self, direction: Direction) -> Option<usize> {
        if self.state.animation_in_flight {
            tracing::debug!(?direction, "transition in flight, dropping advance");
            return None;
        }

        let from = self.state.current_index;
        let to = self.catalog.next(from, direction);
        if to == from {
            tracing::debug!("single preset catalog, nothing to advance to");
            return None;
        }

        let sign = direction.signum();
        let offset = self.config.offscreen_offset;
        let duration = self.config.duration;

        let incoming = &mut self.labels[to];
        incoming.show();
        incoming.position.x = sign * offset;
        incoming.progress = 0.0;
        incoming.direction = sign;

        let outgoing = &mut self.labels[from];
        outgoing.progress = 0.0;
        outgoing.direction = sign;
        let outgoing_x = outgoing.position.x;

        self.transition = Some(ActiveTransition {
            from,
            to,
            gate: Tween::new(0.0, WIPE_END, duration, Easing::Linear),
        });
        self.label_wipes
            .push((to, Tween::new(0.0, WIPE_END, duration, Easing::Linear)));
        self.label_slides.push((
            from,
            Tween::new(outgoing_x, -sign * offset, duration, Easing::CubicInOut),
        ));
        self.label_slides
            .push((to, Tween::new(sign * offset, 0.0, duration, Easing::CubicInOut)));

        let spin = TAU * self.config.spin_turns * -sign;
        self.rotation = Some(Tween::new(
            self.scene.blob_rotation_y,
            self.scene.blob_rotation_y + spin,
            duration,
            Easing::CubicInOut,
        ));
        self.background = Some(Tween::new(
            self.scene.background,
            self.preset(to).background,
            duration,
            Easing::Linear,
        ));
        self.start_progress_bar(to);

        let bag = self.preset(to).parameters.clone();
        self.animator.start(&bag, &self.params);

        self.state.animation_in_flight = true;
        self.state.pending_next_index = Some(to);
        self.events.push(CarouselEvent::TransitionStarted {
            from,
            to,
            direction,
        });
        tracing::debug!(from, to, preset = %self.preset(to).name, "transition started");

        Some(to)
    }

    /// Fades the loader out and brings the blob in. Runs once; later calls
    /// return `false`. An advance accepted before the reveal keeps its target.
    pub fn reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.scene.visible = true;

        let duration = self.config.reveal_duration;
        let target = self
            .state
            .pending_next_index
            .unwrap_or(self.state.current_index);

        self.loader_fade = Some(Tween::new(
            self.scene.loader.opacity,
            0.0,
            self.config.loader_fade_duration,
            Easing::ExpoInOut,
        ));
        self.blob_scale = Some(Tween::new(
            self.scene.blob_scale,
            1.0,
            duration,
            Easing::QuadOut,
        ));
        self.blob_tint = Some(Tween::new(
            self.scene.blob_tint,
            Rgb::WHITE,
            duration,
            Easing::QuintIn,
        ));
        self.background = Some(Tween::new(
            self.scene.background,
            self.preset(target).background,
            duration,
            Easing::ExpoInOut,
        ));
        self.start_progress_bar(target);

        let bag = self.preset(target).parameters.clone();
        self.animator.start(&bag, &self.params);

        self.events.push(CarouselEvent::Revealed);
        tracing::info!(preset = %self.preset(target).name, "scene revealed");
        true
    }

    /// Advances every running tween by `dt` seconds and returns what happened
    /// since the previous call.
    pub fn update(&mut self, dt: f32) -> Vec<CarouselEvent> {
        let mut events = std::mem::take(&mut self.events);

        if self.animator.update(dt, &mut self.params) {
            let index = self
                .state
                .pending_next_index
                .unwrap_or(self.state.current_index);
            events.push(CarouselEvent::DiscreteApplied { index });
        }

        for (index, tween) in &mut self.label_slides {
            self.labels[*index].position.x = tween.advance(dt);
        }
        self.label_slides.retain(|(_, tween)| !tween.is_finished());

        for (index, tween) in &mut self.label_wipes {
            self.labels[*index].progress = tween.advance(dt);
        }
        self.label_wipes.retain(|(_, tween)| !tween.is_finished());

        if let Some(value) = step(&mut self.background, dt) {
            self.scene.background = value;
        }
        if let Some(value) = step(&mut self.rotation, dt) {
            self.scene.blob_rotation_y = value;
        }
        if let Some(value) = step(&mut self.progress_bar, dt) {
            self.scene.progress_bar = value;
        }
        if let Some(value) = step(&mut self.blob_scale, dt) {
            self.scene.blob_scale = value;
        }
        if let Some(value) = step(&mut self.blob_tint, dt) {
            self.scene.blob_tint = value;
        }
        if let Some(value) = step(&mut self.loader_fade, dt) {
            self.scene.loader.opacity = value;
            self.scene.loader.scale = value;
            if self.loader_fade.is_none() {
                self.scene.loader.attached = false;
            }
        }

        let gate_done = match &mut self.transition {
            Some(transition) => {
                self.labels[transition.from].progress = transition.gate.advance(dt);
                transition.gate.is_finished()
            }
            None => false,
        };
        if gate_done {
            events.push(self.commit());
        }

        events
    }

    fn commit(&mut self) -> CarouselEvent {
        let Some(transition) = self.transition.take() else {
            return CarouselEvent::Committed {
                index: self.state.current_index,
            };
        };

        let outgoing = &mut self.labels[transition.from];
        outgoing.progress = 0.0;
        outgoing.hide();
        self.labels[transition.to].progress = 0.0;
        self.label_wipes
            .retain(|(index, _)| *index != transition.to);

        self.state.current_index = transition.to;
        self.state.pending_next_index = None;
        self.state.animation_in_flight = false;
        tracing::debug!(index = transition.to, "transition committed");

        CarouselEvent::Committed {
            index: transition.to,
        }
    }

    /// Progress bar target is `(index + 1) / count`. Landing on the first
    /// preset restarts the bar from empty instead of shrinking it.
    fn start_progress_bar(&mut self, index: usize) {
        let target = (index + 1) as f32 / self.catalog.count() as f32;
        let from = if index == 0 {
            0.0
        } else {
            self.scene.progress_bar
        };
        self.scene.progress_bar = from;
        self.progress_bar = Some(Tween::new(
            from,
            target,
            self.config.duration,
            Easing::QuadOut,
        ));
    }

    fn preset(&self, index: usize) -> &Preset {
        self.catalog.at(index)
    }
}

fn step<T: Lerp>(slot: &mut Option<Tween<T>>, dt: f32) -> Option<T> {
    let tween = slot.as_mut()?;
    let value = tween.advance(dt);
    if tween.is_finished() {
        *slot = None;
    }
    Some(value)
}
