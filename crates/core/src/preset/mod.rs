//! Preset catalog: the ordered, circular list of blob looks the carousel
//! walks through.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{input::Direction, tween::Lerp, CarouselError, Result};

/// Linear RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || CarouselError::InvalidColor(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channels: Vec<u8> = match digits.len() {
            3 => digits
                .chars()
                .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| invalid())?,
            6 => (0..3)
                .map(|i| u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        Ok(Self::new(
            channels[0] as f32 / 255.0,
            channels[1] as f32 / 255.0,
            channels[2] as f32 / 255.0,
        ))
    }

    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    pub fn distance(self, other: Rgb) -> f32 {
        ((self.r - other.r).powi(2) + (self.g - other.g).powi(2) + (self.b - other.b).powi(2))
            .sqrt()
    }
}

impl Lerp for Rgb {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self::new(
            Lerp::lerp(self.r, to.r, t),
            Lerp::lerp(self.g, to.g, t),
            Lerp::lerp(self.b, to.b, t),
        )
    }
}

impl TryFrom<String> for Rgb {
    type Error = CarouselError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Target values for a preset. Every key is optional: an absent key leaves
/// the live value where it is.
///
/// Field names serialise in camelCase. The shader-uniform spellings used by
/// older catalogs (`uPositionFrequency`, `uSmallWavePositionStrength`, `map`,
/// ...) are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBag {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "uPositionFrequency")]
    pub position_frequency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "uTimeFrequency")]
    pub time_frequency: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "uStrength",
        alias = "uPositionStrength"
    )]
    pub strength: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "uWrappedPositionFrequency",
        alias = "uSmallWavePositionFrequency"
    )]
    pub wrapped_position_frequency: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "uWrappedTimeFrequency",
        alias = "uSmallWaveTimeFrequency"
    )]
    pub wrapped_time_frequency: Option<f32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "uWrappedStrength",
        alias = "uSmallWavePositionStrength"
    )]
    pub wrapped_strength: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_map_intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_shading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireframe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "map")]
    pub gradient: Option<String>,
}

impl ParameterBag {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named look: background color plus target parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub background: Rgb,
    #[serde(default, alias = "config")]
    pub parameters: ParameterBag,
}

/// Ordered, non-empty preset list. Order defines circular adjacency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    pub fn new(presets: Vec<Preset>) -> Result<Self> {
        if presets.is_empty() {
            return Err(CarouselError::EmptyCatalog);
        }
        Ok(Self { presets })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let presets: Vec<Preset> = serde_json::from_str(json)?;
        Self::new(presets)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.presets)?)
    }

    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    /// Preset at `index`, wrapping around the end of the catalog.
    pub fn at(&self, index: usize) -> &Preset {
        &self.presets[index % self.presets.len()]
    }

    pub fn count(&self) -> usize {
        self.presets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// Circular neighbour of `index` in `direction`.
    pub fn next(&self, index: usize, direction: Direction) -> usize {
        let count = self.count() as i64;
        (index as i64 + direction.sign() as i64).rem_euclid(count) as usize
    }

    /// The seven looks shipped with the showcase.
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                builtin_preset("Color Fusion", "#9D73F7", [1.0, 0.3, 0.5, 0.7], [1.0, 0.0, 0.5, 0.0, 0.0, 0.0], false, "cosmic-fusion"),
                builtin_preset("Purple Mirror", "#5300B1", [0.584, 0.276, 0.899, 1.266], [0.0, 1.0, 2.0, 0.0, 0.0, 0.0], false, "purple-rain"),
                builtin_preset("Alien Goo", "#45ACD8", [1.022, 0.99, 0.378, 0.341], [0.292, 0.73, 0.86, 1.0, 0.0, 0.0], false, "lucky-day"),
                builtin_preset("Liquidity", "#FDB38A", [1.0, 1.0, 2.275, 0.06], [0.58, 1.0, 1.0, 0.0, 1.0, 1.0], false, "imaginarium"),
                builtin_preset("Discobrain", "#7601F0", [0.5, 0.575, 3.5, 0.15], [0.0, 0.1, 0.0, 0.4, 0.5, 0.0], false, "rainbow"),
                builtin_preset("Fire Fly", "#380B16", [1.0, 1.5, 1.0, 0.5], [1.0, 1.0, 0.0, 1.0, 0.0, 0.0], true, "passion"),
                builtin_preset("Back Bloosom", "#667174", [0.0, 0.0, 1.5, 0.7], [1.0, 0.0, 3.0, 1.0, 1.0, 1.0], true, "blackbloom"),
            ],
        }
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'de> Deserialize<'de> for PresetCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let presets = Vec::<Preset>::deserialize(deserializer)?;
        Self::new(presets).map_err(serde::de::Error::custom)
    }
}

/// `wobble` is `[position frequency, strength, wrapped position frequency,
/// wrapped strength]`; `surface` is `[roughness, metalness, env intensity,
/// clearcoat, clearcoat roughness, transmission]`.
fn builtin_preset(
    name: &str,
    background: &str,
    wobble: [f32; 4],
    surface: [f32; 6],
    flat_shading: bool,
    gradient: &str,
) -> Preset {
    let [position_frequency, strength, wrapped_position_frequency, wrapped_strength] = wobble;
    let [roughness, metalness, env_map_intensity, clearcoat, clearcoat_roughness, transmission] =
        surface;

    Preset {
        name: name.to_string(),
        background: Rgb::from_hex(background).unwrap_or(Rgb::BLACK),
        parameters: ParameterBag {
            position_frequency: Some(position_frequency),
            strength: Some(strength),
            wrapped_position_frequency: Some(wrapped_position_frequency),
            wrapped_strength: Some(wrapped_strength),
            roughness: Some(roughness),
            metalness: Some(metalness),
            env_map_intensity: Some(env_map_intensity),
            clearcoat: Some(clearcoat),
            clearcoat_roughness: Some(clearcoat_roughness),
            transmission: Some(transmission),
            flat_shading: Some(flat_shading),
            wireframe: Some(false),
            gradient: Some(gradient.to_string()),
            ..Default::default()
        },
    }
}
