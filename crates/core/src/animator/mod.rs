//! Parameter animator: drives the live material and noise parameters toward
//! a preset's targets.
//!
//! Numeric parameters ease smoothly from the first frame. Flat shading,
//! wireframe and the gradient texture cannot be blended, so they are grouped
//! into a single [`DiscreteChange`] that lands atomically part-way through the
//! transition, where the blob is spinning fast enough to hide the pop.

use serde::{Deserialize, Serialize};

use crate::{
    config::TransitionConfig,
    preset::ParameterBag,
    timeline::Scheduler,
    tween::{Easing, Tween},
};

/// Live value of every tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub position_frequency: f32,
    pub time_frequency: f32,
    pub strength: f32,
    pub wrapped_position_frequency: f32,
    pub wrapped_time_frequency: f32,
    pub wrapped_strength: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub env_map_intensity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub transmission: f32,
    pub flat_shading: bool,
    pub wireframe: bool,
    pub gradient: String,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            position_frequency: 1.0,
            time_frequency: 0.4,
            strength: 0.3,
            wrapped_position_frequency: 0.5,
            wrapped_time_frequency: 0.12,
            wrapped_strength: 0.7,
            roughness: 1.0,
            metalness: 1.0,
            env_map_intensity: 0.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            transmission: 0.0,
            flat_shading: false,
            wireframe: false,
            gradient: "white".to_string(),
        }
    }
}

impl ParameterSet {
    pub fn get(&self, param: NumericParam) -> f32 {
        *self.slot(param)
    }

    pub fn set(&mut self, param: NumericParam, value: f32) {
        *self.slot_mut(param) = value;
    }

    /// Applies every present key immediately, without animation.
    pub fn apply_bag(&mut self, bag: &ParameterBag) {
        for param in NumericParam::ALL {
            if let Some(value) = param.target_in(bag) {
                self.set(param, value);
            }
        }
        DiscreteChange::from_bag(bag).apply(self);
    }

    /// Full snapshot of the live values, suitable for pasting into a catalog.
    pub fn to_bag(&self) -> ParameterBag {
        ParameterBag {
            position_frequency: Some(self.position_frequency),
            time_frequency: Some(self.time_frequency),
            strength: Some(self.strength),
            wrapped_position_frequency: Some(self.wrapped_position_frequency),
            wrapped_time_frequency: Some(self.wrapped_time_frequency),
            wrapped_strength: Some(self.wrapped_strength),
            roughness: Some(self.roughness),
            metalness: Some(self.metalness),
            env_map_intensity: Some(self.env_map_intensity),
            clearcoat: Some(self.clearcoat),
            clearcoat_roughness: Some(self.clearcoat_roughness),
            transmission: Some(self.transmission),
            flat_shading: Some(self.flat_shading),
            wireframe: Some(self.wireframe),
            gradient: Some(self.gradient.clone()),
        }
    }

    fn slot(&self, param: NumericParam) -> &f32 {
        match param {
            NumericParam::PositionFrequency => &self.position_frequency,
            NumericParam::TimeFrequency => &self.time_frequency,
            NumericParam::Strength => &self.strength,
            NumericParam::WrappedPositionFrequency => &self.wrapped_position_frequency,
            NumericParam::WrappedTimeFrequency => &self.wrapped_time_frequency,
            NumericParam::WrappedStrength => &self.wrapped_strength,
            NumericParam::Roughness => &self.roughness,
            NumericParam::Metalness => &self.metalness,
            NumericParam::EnvMapIntensity => &self.env_map_intensity,
            NumericParam::Clearcoat => &self.clearcoat,
            NumericParam::ClearcoatRoughness => &self.clearcoat_roughness,
            NumericParam::Transmission => &self.transmission,
        }
    }

    fn slot_mut(&mut self, param: NumericParam) -> &mut f32 {
        match param {
            NumericParam::PositionFrequency => &mut self.position_frequency,
            NumericParam::TimeFrequency => &mut self.time_frequency,
            NumericParam::Strength => &mut self.strength,
            NumericParam::WrappedPositionFrequency => &mut self.wrapped_position_frequency,
            NumericParam::WrappedTimeFrequency => &mut self.wrapped_time_frequency,
            NumericParam::WrappedStrength => &mut self.wrapped_strength,
            NumericParam::Roughness => &mut self.roughness,
            NumericParam::Metalness => &mut self.metalness,
            NumericParam::EnvMapIntensity => &mut self.env_map_intensity,
            NumericParam::Clearcoat => &mut self.clearcoat,
            NumericParam::ClearcoatRoughness => &mut self.clearcoat_roughness,
            NumericParam::Transmission => &mut self.transmission,
        }
    }
}

/// Continuous parameters the animator interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericParam {
    PositionFrequency,
    TimeFrequency,
    Strength,
    WrappedPositionFrequency,
    WrappedTimeFrequency,
    WrappedStrength,
    Roughness,
    Metalness,
    EnvMapIntensity,
    Clearcoat,
    ClearcoatRoughness,
    Transmission,
}

impl NumericParam {
    pub const ALL: [NumericParam; 12] = [
        Self::PositionFrequency,
        Self::TimeFrequency,
        Self::Strength,
        Self::WrappedPositionFrequency,
        Self::WrappedTimeFrequency,
        Self::WrappedStrength,
        Self::Roughness,
        Self::Metalness,
        Self::EnvMapIntensity,
        Self::Clearcoat,
        Self::ClearcoatRoughness,
        Self::Transmission,
    ];

    pub fn target_in(self, bag: &ParameterBag) -> Option<f32> {
        match self {
            Self::PositionFrequency => bag.position_frequency,
            Self::TimeFrequency => bag.time_frequency,
            Self::Strength => bag.strength,
            Self::WrappedPositionFrequency => bag.wrapped_position_frequency,
            Self::WrappedTimeFrequency => bag.wrapped_time_frequency,
            Self::WrappedStrength => bag.wrapped_strength,
            Self::Roughness => bag.roughness,
            Self::Metalness => bag.metalness,
            Self::EnvMapIntensity => bag.env_map_intensity,
            Self::Clearcoat => bag.clearcoat,
            Self::ClearcoatRoughness => bag.clearcoat_roughness,
            Self::Transmission => bag.transmission,
        }
    }
}

/// Non-interpolable part of a preset, applied all at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscreteChange {
    pub flat_shading: Option<bool>,
    pub wireframe: Option<bool>,
    pub gradient: Option<String>,
}

impl DiscreteChange {
    pub fn from_bag(bag: &ParameterBag) -> Self {
        Self {
            flat_shading: bag.flat_shading,
            wireframe: bag.wireframe,
            gradient: bag.gradient.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flat_shading.is_none() && self.wireframe.is_none() && self.gradient.is_none()
    }

    pub fn apply(self, params: &mut ParameterSet) {
        if let Some(flat_shading) = self.flat_shading {
            params.flat_shading = flat_shading;
        }
        if let Some(wireframe) = self.wireframe {
            params.wireframe = wireframe;
        }
        if let Some(gradient) = self.gradient {
            params.gradient = gradient;
        }
    }
}

#[derive(Debug)]
pub struct ParameterAnimator {
    duration: f32,
    discrete_delay: f32,
    easing: Easing,
    tweens: Vec<(NumericParam, Tween<f32>)>,
    discrete: Scheduler<DiscreteChange>,
}

impl ParameterAnimator {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            duration: config.duration.max(0.0),
            discrete_delay: config.discrete_delay(),
            easing: Easing::CubicInOut,
            tweens: Vec::new(),
            discrete: Scheduler::new(),
        }
    }

    /// Starts animating `live` toward every key present in `bag`.
    ///
    /// A parameter that is already animating is retargeted from its current
    /// value; the others keep running untouched.
    pub fn start(&mut self, bag: &ParameterBag, live: &ParameterSet) {
        for param in NumericParam::ALL {
            let Some(target) = param.target_in(bag) else {
                continue;
            };
            self.tweens.retain(|(existing, _)| *existing != param);
            self.tweens.push((
                param,
                Tween::new(live.get(param), target, self.duration, self.easing),
            ));
        }

        let discrete = DiscreteChange::from_bag(bag);
        if !discrete.is_empty() {
            self.discrete.schedule_in(self.discrete_delay, discrete);
        }

        tracing::trace!(
            tweens = self.tweens.len(),
            discrete_pending = self.discrete.pending(),
            "parameter animation started"
        );
    }

    /// Advances every running tween and writes the results into `live`.
    /// Returns `true` when a discrete change landed during this step.
    pub fn update(&mut self, dt: f32, live: &mut ParameterSet) -> bool {
        for (param, tween) in &mut self.tweens {
            live.set(*param, tween.advance(dt));
        }
        self.tweens.retain(|(_, tween)| !tween.is_finished());

        let due = self.discrete.tick(dt);
        let applied = !due.is_empty();
        for change in due {
            change.apply(live);
        }
        applied
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty() || !self.discrete.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PresetCatalog;

    const EPSILON: f32 = 1e-5;

    fn animator() -> ParameterAnimator {
        ParameterAnimator::new(&TransitionConfig::default())
    }

    fn run_for(animator: &mut ParameterAnimator, live: &mut ParameterSet, seconds: f32) {
        let steps = (seconds * 60.0).ceil() as usize;
        for _ in 0..steps {
            animator.update(1.0 / 60.0, live);
        }
    }

    #[test]
    fn every_builtin_preset_is_reached() {
        let catalog = PresetCatalog::builtin();
        for preset in catalog.iter() {
            let mut live = ParameterSet::default();
            let mut animator = animator();
            animator.start(&preset.parameters, &live);
            run_for(&mut animator, &mut live, 1.1);

            for param in NumericParam::ALL {
                if let Some(target) = param.target_in(&preset.parameters) {
                    assert!(
                        (live.get(param) - target).abs() < EPSILON,
                        "{} {param:?}",
                        preset.name
                    );
                }
            }
            assert_eq!(Some(live.wireframe), preset.parameters.wireframe);
            assert_eq!(live.gradient.as_str(), preset.parameters.gradient.as_deref().unwrap());
            assert!(!animator.is_animating());
        }
    }

    #[test]
    fn absent_keys_keep_their_values() {
        let mut live = ParameterSet {
            roughness: 0.25,
            gradient: "foil".to_string(),
            ..ParameterSet::default()
        };
        let before = live.clone();
        let bag = ParameterBag {
            metalness: Some(0.0),
            ..Default::default()
        };

        let mut animator = animator();
        animator.start(&bag, &live);
        run_for(&mut animator, &mut live, 1.5);

        assert_eq!(live.metalness, 0.0);
        assert_eq!(live.roughness, before.roughness);
        assert_eq!(live.strength, before.strength);
        assert_eq!(live.gradient, before.gradient);
        assert_eq!(live.flat_shading, before.flat_shading);
    }

    #[test]
    fn numeric_values_move_from_the_first_frame() {
        let mut live = ParameterSet::default();
        let bag = ParameterBag {
            strength: Some(1.3),
            ..Default::default()
        };
        let mut animator = animator();
        animator.start(&bag, &live);
        animator.update(0.1, &mut live);

        assert!(live.strength > 0.3);
        assert!(live.strength < 1.3);
    }

    #[test]
    fn wireframe_flips_once_at_the_deferred_point() {
        let mut live = ParameterSet::default();
        let bag = ParameterBag {
            wireframe: Some(true),
            gradient: Some("synthwave".to_string()),
            ..Default::default()
        };
        let mut animator = animator();
        animator.start(&bag, &live);

        assert!(!animator.update(0.2, &mut live));
        assert!(!animator.update(0.15, &mut live));
        assert!(!live.wireframe);
        assert_eq!(live.gradient, "white");

        assert!(animator.update(0.1, &mut live));
        assert!(live.wireframe);
        assert_eq!(live.gradient, "synthwave");

        assert!(!animator.update(0.1, &mut live));
        assert!(!animator.update(1.0, &mut live));
    }

    #[test]
    fn deferred_point_scales_with_duration() {
        let config = TransitionConfig {
            duration: 2.0,
            ..TransitionConfig::default()
        };
        let mut animator = ParameterAnimator::new(&config);
        let mut live = ParameterSet::default();
        animator.start(
            &ParameterBag {
                flat_shading: Some(true),
                ..Default::default()
            },
            &live,
        );

        assert!(!animator.update(0.5, &mut live));
        assert!(!live.flat_shading);
        assert!(animator.update(0.35, &mut live));
        assert!(live.flat_shading);
    }

    #[test]
    fn retargeting_starts_from_current_value() {
        let mut live = ParameterSet::default();
        let mut animator = animator();
        animator.start(
            &ParameterBag {
                clearcoat: Some(1.0),
                transmission: Some(1.0),
                ..Default::default()
            },
            &live,
        );
        animator.update(0.5, &mut live);
        let halfway = live.clearcoat;

        animator.start(
            &ParameterBag {
                clearcoat: Some(0.0),
                ..Default::default()
            },
            &live,
        );
        animator.update(0.0, &mut live);
        assert!((live.clearcoat - halfway).abs() < EPSILON);

        run_for(&mut animator, &mut live, 1.1);
        assert!(live.clearcoat.abs() < EPSILON);
        assert!((live.transmission - 1.0).abs() < EPSILON);
    }

    #[test]
    fn snapshot_restores_the_same_set() {
        let live = ParameterSet {
            metalness: 0.73,
            wireframe: true,
            gradient: "hologram".to_string(),
            ..ParameterSet::default()
        };

        let mut restored = ParameterSet::default();
        restored.apply_bag(&live.to_bag());
        assert_eq!(restored, live);
    }
}
