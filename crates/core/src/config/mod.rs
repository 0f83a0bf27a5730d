use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CarouselError, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub transition: TransitionConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
}

impl AppConfig {
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Parses a configuration document. Missing sections and fields fall back
    /// to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let transition = &self.transition;
        if !(transition.duration.is_finite() && transition.duration > 0.0) {
            return Err(CarouselError::InvalidInput(
                "transition.duration must be a positive number of seconds",
            ));
        }
        if !(0.0..=1.0).contains(&transition.discrete_apply_at) {
            return Err(CarouselError::InvalidInput(
                "transition.discrete_apply_at must lie between 0 and 1",
            ));
        }
        if !(transition.reveal_duration.is_finite() && transition.reveal_duration >= 0.0)
            || !(transition.loader_fade_duration.is_finite()
                && transition.loader_fade_duration >= 0.0)
        {
            return Err(CarouselError::InvalidInput(
                "reveal and loader fade durations must not be negative",
            ));
        }
        if !(self.input.touch_threshold.is_finite() && self.input.touch_threshold >= 0.0) {
            return Err(CarouselError::InvalidInput(
                "input.touch_threshold must not be negative",
            ));
        }
        if self.render.fps == 0 {
            return Err(CarouselError::InvalidInput("render.fps must be at least 1"));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Timing of carousel transitions and of the initial reveal. All values are
/// in seconds except `discrete_apply_at`, which is a fraction of `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration: f32,
    pub discrete_apply_at: f32,
    pub offscreen_offset: f32,
    pub spin_turns: f32,
    pub reveal_duration: f32,
    pub loader_fade_duration: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            discrete_apply_at: 0.4,
            offscreen_offset: 3.5,
            spin_turns: 2.0,
            reveal_duration: 1.4,
            loader_fade_duration: 1.0,
        }
    }
}

impl TransitionConfig {
    /// Delay after a transition starts at which discrete parameters land.
    pub fn discrete_delay(&self) -> f32 {
        self.duration.max(0.0) * self.discrete_apply_at.clamp(0.0, 1.0)
    }
}

/// Configuration specific to gesture normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Vertical travel, in device-independent pixels, before a swipe counts.
    pub touch_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            touch_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub label_sync_delay: f32,
    pub font_size_divisor: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            label_sync_delay: 1.0,
            font_size_divisor: 3000.0,
        }
    }
}

impl RenderConfig {
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    pub fn font_size_for(&self, width: u32) -> f32 {
        width as f32 / self.font_size_divisor.max(1.0)
    }
}

/// Locations of the environment map and gradient textures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: String,
    pub environment_map: String,
    pub gradient_dir: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            environment_map: "hdri/peppermint_powerplants_1k.hdr".to_string(),
            gradient_dir: "gradient".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config =
            AppConfig::from_json_str(r#"{ "transition": { "duration": 1.5 } }"#).unwrap();

        assert_eq!(config.transition.duration, 1.5);
        assert_eq!(config.transition.discrete_apply_at, 0.4);
        assert_eq!(config.input.touch_threshold, 50.0);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn discrete_delay_follows_duration() {
        let mut transition = TransitionConfig::default();
        assert!((transition.discrete_delay() - 0.4).abs() < 1e-6);

        transition.duration = 2.0;
        assert!((transition.discrete_delay() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(AppConfig::from_json_str("{ transition: }").is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        for json in [
            r#"{ "transition": { "duration": 0 } }"#,
            r#"{ "transition": { "discrete_apply_at": 1.5 } }"#,
            r#"{ "transition": { "discrete_apply_at": -0.1 } }"#,
            r#"{ "transition": { "reveal_duration": -1 } }"#,
            r#"{ "input": { "touch_threshold": -5 } }"#,
            r#"{ "render": { "fps": 0 } }"#,
        ] {
            let err = AppConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, CarouselError::InvalidInput(_)), "{json}: {err}");
        }
        assert!(AppConfig::live_defaults().validate().is_ok());
    }
}
