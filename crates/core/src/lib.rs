//! Core library for the Blob Carousel preset showcase.
//!
//! The crate owns the state that sits between user gestures and a renderer:
//! a circular catalog of presets, the animator that eases material and noise
//! parameters toward the selected preset, and the carousel controller that
//! keeps labels, background, blob spin and progress bar in lockstep. Drawing
//! is delegated to a [`Renderer`] implementation supplied by the host.

pub mod animator;
pub mod assets;
pub mod carousel;
pub mod config;
pub mod error;
pub mod input;
pub mod preset;
pub mod render;
pub mod scene;
pub mod timeline;
pub mod tween;

pub use animator::{DiscreteChange, NumericParam, ParameterAnimator, ParameterSet};
pub use assets::{AssetStore, GradientAsset, LoadingProgress};
pub use carousel::{CarouselController, CarouselEvent, CarouselState, Phase};
pub use config::{AppConfig, AssetConfig, InputConfig, RenderConfig, TransitionConfig};
pub use error::{CarouselError, Result};
pub use input::{Direction, InputAdapter};
pub use preset::{ParameterBag, Preset, PresetCatalog, Rgb};
pub use render::{Frame, RecordingRenderer, RenderLoop, Renderer};
pub use scene::{LoaderOverlay, SceneState, TextLabel};
pub use timeline::{PlaybackClock, ScheduledEvent, Scheduler};
pub use tween::{Easing, Lerp, Tween};
