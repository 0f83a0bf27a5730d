use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::preset::{PresetCatalog, Rgb};

/// Background shown before the first preset's color fades in.
pub const INITIAL_BACKGROUND: Rgb = Rgb::new(0.0784, 0.0824, 0.0941);

/// Depth at which labels float in front of the blob.
pub const LABEL_DEPTH: f32 = 2.0;

/// One text label per preset. Renderers lay the glyphs out; the carousel only
/// moves, scales and wipes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub text: String,
    pub position: Vec3,
    pub scale: Vec3,
    /// Texture-wipe uniform; runs from `0.0` to `0.5` across a transition.
    pub progress: f32,
    /// Sign of the wipe, matching the carousel direction.
    pub direction: f32,
    pub font_size: f32,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, visible: bool, font_size: f32) -> Self {
        Self {
            text: text.into(),
            position: Vec3::new(0.0, 0.0, LABEL_DEPTH),
            scale: if visible { Vec3::ONE } else { Vec3::ZERO },
            progress: 0.0,
            direction: 1.0,
            font_size,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.scale != Vec3::ZERO
    }

    pub fn show(&mut self) {
        self.scale = Vec3::ONE;
    }

    pub fn hide(&mut self) {
        self.scale = Vec3::ZERO;
    }
}

/// Builds the label set for `catalog`; only the first label starts visible.
pub fn labels_for(catalog: &PresetCatalog, font_size: f32) -> Vec<TextLabel> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, preset)| TextLabel::new(preset.name.clone(), index == 0, font_size))
        .collect()
}

/// Full-screen overlay shown while assets load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderOverlay {
    pub opacity: f32,
    pub scale: f32,
    /// Cleared once the fade-out completes and the overlay can be dropped.
    pub attached: bool,
}

impl Default for LoaderOverlay {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            attached: true,
        }
    }
}

/// Everything besides labels and material parameters that a renderer reads
/// each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub background: Rgb,
    pub blob_rotation_y: f32,
    pub blob_scale: f32,
    pub blob_tint: Rgb,
    /// Horizontal fill of the progress bar in `[0, 1]`.
    pub progress_bar: f32,
    pub loader: LoaderOverlay,
    pub visible: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            background: INITIAL_BACKGROUND,
            blob_rotation_y: 0.0,
            blob_scale: 0.0,
            blob_tint: Rgb::BLACK,
            progress_bar: 0.0,
            loader: LoaderOverlay::default(),
            visible: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_label_starts_visible() {
        let labels = labels_for(&PresetCatalog::builtin(), 0.4);

        assert_eq!(labels.len(), 7);
        assert!(labels[0].is_visible());
        assert!(labels[1..].iter().all(|label| !label.is_visible()));
        assert_eq!(labels[3].text, "Liquidity");
        assert_eq!(labels[3].position, Vec3::new(0.0, 0.0, LABEL_DEPTH));
    }

    #[test]
    fn scene_starts_hidden_behind_loader() {
        let scene = SceneState::default();
        assert!(!scene.visible);
        assert!(scene.loader.attached);
        assert_eq!(scene.blob_scale, 0.0);
    }
}
