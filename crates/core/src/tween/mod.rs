use serde::{Deserialize, Serialize};

/// Easing curves used by the carousel. Named after the power-curve family
/// they belong to; all map `t ∈ [0, 1]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadOut,
    CubicInOut,
    QuintIn,
    ExpoInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t).powi(2),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::QuintIn => t.powi(5),
            Self::ExpoInOut => {
                if t <= 0.0 || t >= 1.0 {
                    t
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

/// Values that can be linearly interpolated by a [`Tween`].
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// Time-driven interpolation from one value to another.
///
/// Tweens do not own a clock: the owner advances them with the frame delta
/// and writes the returned value wherever it belongs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Moves the tween forward by `dt` seconds and returns the new value.
    pub fn advance(&mut self, dt: f32) -> T {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    pub fn value(&self) -> T {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    /// Normalised progress in `[0, 1]`. Zero-length tweens are complete.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_their_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::QuadOut,
            Easing::CubicInOut,
            Easing::QuintIn,
            Easing::ExpoInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{easing:?} at 1");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_around_midpoint() {
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let early = Easing::CubicInOut.apply(0.25);
        let late = Easing::CubicInOut.apply(0.75);
        assert!((early + late - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tween_reaches_target_and_stops() {
        let mut tween = Tween::new(1.0_f32, 5.0, 1.0, Easing::CubicInOut);
        let mid = tween.advance(0.5);
        assert!((mid - 3.0).abs() < 1e-5);
        assert!(!tween.is_finished());

        let end = tween.advance(0.75);
        assert_eq!(end, 5.0);
        assert!(tween.is_finished());
        assert_eq!(tween.advance(1.0), 5.0);
    }

    #[test]
    fn zero_duration_tween_is_immediately_done() {
        let tween = Tween::new(0.0_f32, 2.0, 0.0, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 2.0);
    }

    #[test]
    fn ignores_negative_and_nan_deltas() {
        let mut tween = Tween::new(0.0_f32, 1.0, 1.0, Easing::Linear);
        tween.advance(-1.0);
        tween.advance(f32::NAN);
        assert_eq!(tween.value(), 0.0);
    }
}
