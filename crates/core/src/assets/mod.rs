use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{config::AssetConfig, preset::PresetCatalog, CarouselError, Result};

/// Gradient textures shipped with the showcase, by id. The file name is the
/// id with a `.png` suffix.
pub const BUILTIN_GRADIENTS: [&str; 18] = [
    "blackbloom",
    "cd",
    "cosmic-fusion",
    "deep-ocean",
    "foil",
    "halloween",
    "hologram",
    "imaginarium",
    "iridescent",
    "lucky-day",
    "passion",
    "pink-floyd",
    "purple-rain",
    "rainbow",
    "sirens",
    "sunset-vibes",
    "synthwave",
    "white",
];

/// Descriptor for a gradient texture sampled by the blob material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientAsset {
    pub id: String,
    pub path: String,
}

/// Registry for every asset the showcase loads at startup.
#[derive(Debug, Default)]
pub struct AssetStore {
    environment_map: String,
    gradients: BTreeMap<String, GradientAsset>,
}

impl AssetStore {
    pub fn new(environment_map: impl Into<String>) -> Self {
        Self {
            environment_map: environment_map.into(),
            gradients: BTreeMap::new(),
        }
    }

    /// Registry pre-filled with the built-in gradients under `config`'s paths.
    pub fn with_builtin_gradients(config: &AssetConfig) -> Self {
        let mut store = Self::new(join(&config.root, &config.environment_map));
        for id in BUILTIN_GRADIENTS {
            let path = join(&config.root, &format!("{}/{id}.png", config.gradient_dir));
            store.register_gradient(GradientAsset {
                id: id.to_string(),
                path,
            });
        }
        store
    }

    pub fn register_gradient(&mut self, asset: GradientAsset) {
        self.gradients.insert(asset.id.clone(), asset);
    }

    pub fn gradient(&self, id: &str) -> Option<&GradientAsset> {
        self.gradients.get(id)
    }

    pub fn environment_map(&self) -> &str {
        &self.environment_map
    }

    /// Every path to fetch before the scene can be revealed, environment map
    /// first.
    pub fn urls(&self) -> Vec<String> {
        std::iter::once(self.environment_map.clone())
            .chain(self.gradients.values().map(|asset| asset.path.clone()))
            .collect()
    }

    /// Fails on the first preset whose gradient is not registered.
    pub fn validate_catalog(&self, catalog: &PresetCatalog) -> Result<()> {
        for preset in catalog.iter() {
            if let Some(gradient) = &preset.parameters.gradient {
                if !self.gradients.contains_key(gradient) {
                    return Err(CarouselError::UnknownGradient {
                        preset: preset.name.clone(),
                        gradient: gradient.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn join(root: &str, path: &str) -> String {
    if root.is_empty() || root == "." {
        path.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), path)
    }
}

/// Tracks loader callbacks and exposes a percentage for the loading readout.
///
/// Failed assets count towards completion: the scene renders with whatever
/// arrived rather than waiting forever.
#[derive(Debug, Default, Clone)]
pub struct LoadingProgress {
    loaded: usize,
    total: usize,
    failed: Vec<String>,
    complete: bool,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(&mut self, url: &str, loaded: usize, total: usize) {
        tracing::debug!(url, loaded, total, "started loading");
        self.record(loaded, total);
    }

    pub fn on_progress(&mut self, url: &str, loaded: usize, total: usize) {
        tracing::debug!(url, loaded, total, "loading");
        self.record(loaded, total);
    }

    /// Returns `true` the first time it is called.
    pub fn on_load(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.complete = true;
        tracing::info!(
            loaded = self.loaded,
            failed = self.failed.len(),
            "loading complete"
        );
        true
    }

    pub fn on_error(&mut self, url: &str) {
        tracing::warn!(url, "there was an error loading asset");
        self.failed.push(url.to_string());
    }

    pub fn percent(&self) -> f32 {
        if self.complete {
            100.0
        } else if self.total == 0 {
            0.0
        } else {
            self.loaded as f32 / self.total as f32 * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// On-screen text while loading; `None` once the overlay is gone.
    pub fn readout(&self) -> Option<String> {
        (!self.complete).then(|| format!("Loading: {}%", self.percent().round()))
    }

    fn record(&mut self, loaded: usize, total: usize) {
        self.total = total;
        self.loaded = loaded.min(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{ParameterBag, Preset, Rgb};

    fn preset(name: &str, gradient: &str) -> Preset {
        Preset {
            name: name.to_string(),
            background: Rgb::BLACK,
            parameters: ParameterBag {
                gradient: Some(gradient.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn builtin_catalog_only_uses_registered_gradients() {
        let store = AssetStore::with_builtin_gradients(&AssetConfig::default());
        assert!(store.validate_catalog(&PresetCatalog::builtin()).is_ok());
    }

    #[test]
    fn errors_on_missing_gradient() {
        let store = AssetStore::with_builtin_gradients(&AssetConfig::default());
        let catalog = PresetCatalog::new(vec![preset("Odd", "missing-gradient")]).unwrap();

        let err = store.validate_catalog(&catalog).unwrap_err();
        assert!(format!("{err}").contains("missing-gradient"));
    }

    #[test]
    fn urls_are_rooted_and_start_with_environment() {
        let config = AssetConfig {
            root: "public/".to_string(),
            ..AssetConfig::default()
        };
        let store = AssetStore::with_builtin_gradients(&config);
        let urls = store.urls();

        assert_eq!(urls.len(), BUILTIN_GRADIENTS.len() + 1);
        assert_eq!(urls[0], "public/hdri/peppermint_powerplants_1k.hdr");
        assert_eq!(
            store.gradient("passion").unwrap().path,
            "public/gradient/passion.png"
        );
    }

    #[test]
    fn progress_reports_percentage_until_loaded() {
        let mut progress = LoadingProgress::new();
        assert_eq!(progress.readout().as_deref(), Some("Loading: 0%"));

        progress.on_start("a", 0, 4);
        progress.on_progress("a", 1, 4);
        assert_eq!(progress.percent(), 25.0);
        assert_eq!(progress.readout().as_deref(), Some("Loading: 25%"));

        assert!(progress.on_load());
        assert!(!progress.on_load());
        assert_eq!(progress.readout(), None);
        assert_eq!(progress.percent(), 100.0);
    }

    #[test]
    fn errors_are_recorded_without_blocking_completion() {
        let mut progress = LoadingProgress::new();
        progress.on_start("gradient/foil.png", 0, 2);
        progress.on_error("gradient/foil.png");
        progress.on_progress("gradient/foil.png", 2, 2);

        assert_eq!(progress.failed(), ["gradient/foil.png".to_string()]);
        assert!(progress.on_load());
        assert!(progress.is_complete());
    }
}
