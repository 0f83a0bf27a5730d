use crate::{
    animator::ParameterSet,
    assets::LoadingProgress,
    carousel::{CarouselController, CarouselEvent},
    config::RenderConfig,
    preset::Rgb,
    scene::{SceneState, TextLabel},
    timeline::{PlaybackClock, Scheduler},
    Result,
};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Value of the shader time uniform.
    pub time: f32,
    pub scene: &'a SceneState,
    pub parameters: &'a ParameterSet,
    pub labels: &'a [TextLabel],
    pub loading_readout: Option<&'a str>,
}

/// Rendering backend capability. Geometry, environment lighting and glyph
/// layout live behind this trait.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;

    fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    /// Re-lays out label glyphs after text or font size changes.
    fn sync_labels(&mut self, _labels: &[TextLabel]) {}
}

/// Renderer that keeps the most recent frame's state instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: u64,
    last_time: f32,
    last_background: Option<Rgb>,
    last_parameters: Option<ParameterSet>,
    last_labels: Vec<TextLabel>,
    last_readout: Option<String>,
    label_syncs: u32,
    size: Option<(u32, u32)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_time(&self) -> f32 {
        self.last_time
    }

    pub fn last_background(&self) -> Option<Rgb> {
        self.last_background
    }

    pub fn last_parameters(&self) -> Option<&ParameterSet> {
        self.last_parameters.as_ref()
    }

    pub fn last_labels(&self) -> &[TextLabel] {
        &self.last_labels
    }

    pub fn last_readout(&self) -> Option<&str> {
        self.last_readout.as_deref()
    }

    pub fn label_syncs(&self) -> u32 {
        self.label_syncs
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.frames += 1;
        self.last_time = frame.time;
        self.last_background = Some(frame.scene.background);
        self.last_parameters = Some(frame.parameters.clone());
        self.last_labels = frame.labels.to_vec();
        self.last_readout = frame.loading_readout.map(str::to_string);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.size = Some((width, height));
        Ok(())
    }

    fn sync_labels(&mut self, _labels: &[TextLabel]) {
        self.label_syncs += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopTask {
    SyncLabels,
}

/// Per-frame driver: advances the time uniform, reveals the scene once
/// loading finishes, steps the carousel and hands the result to a renderer.
#[derive(Debug)]
pub struct RenderLoop {
    config: RenderConfig,
    clock: PlaybackClock,
    tasks: Scheduler<LoopTask>,
    readout: Option<String>,
}

impl RenderLoop {
    pub fn new(config: RenderConfig) -> Self {
        let mut tasks = Scheduler::new();
        tasks.schedule_in(config.label_sync_delay, LoopTask::SyncLabels);
        Self {
            config,
            clock: PlaybackClock::default(),
            tasks,
            readout: None,
        }
    }

    /// Current value of the time uniform.
    pub fn time(&self) -> f32 {
        self.clock.time_seconds
    }

    pub fn readout(&self) -> Option<&str> {
        self.readout.as_deref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Runs one frame. Renderer failures are logged and the loop carries on.
    pub fn tick<R: Renderer>(
        &mut self,
        dt: f32,
        controller: &mut CarouselController,
        renderer: &mut R,
        loading: &LoadingProgress,
    ) -> Vec<CarouselEvent> {
        self.clock.advance(dt);

        if loading.is_complete() && !controller.is_revealed() {
            controller.reveal();
        }
        let events = controller.update(dt);

        for task in self.tasks.tick(dt) {
            match task {
                LoopTask::SyncLabels => renderer.sync_labels(controller.labels()),
            }
        }

        self.readout = loading.readout();
        let frame = Frame {
            time: self.clock.time_seconds,
            scene: controller.scene(),
            parameters: controller.parameters(),
            labels: controller.labels(),
            loading_readout: self.readout.as_deref(),
        };
        if let Err(err) = renderer.render(&frame) {
            tracing::warn!(%err, "frame render failed");
        }

        events
    }

    /// Recomputes label font size for the new viewport and forwards the
    /// resize to the renderer.
    pub fn resize<R: Renderer>(
        &mut self,
        width: u32,
        height: u32,
        controller: &mut CarouselController,
        renderer: &mut R,
    ) {
        controller.set_font_size(self.config.font_size_for(width));
        if let Err(err) = renderer.resize(width, height) {
            tracing::warn!(%err, width, height, "renderer resize failed");
        }
        renderer.sync_labels(controller.labels());
    }
}
