use std::path::{Path, PathBuf};

use blob_carousel_core::{
    AppConfig, AssetStore, CarouselController, CarouselEvent, InputAdapter, LoadingProgress,
    PresetCatalog, RecordingRenderer, RenderLoop,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> blob_carousel_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            catalog,
            seconds,
            wheel,
            swipe,
            check_assets,
            dump_config,
        } => {
            let options = SimulateOptions {
                seconds,
                wheel,
                swipe,
                check_assets,
                dump_config,
            };
            run_simulation(config.as_deref(), catalog.as_deref(), options)
        }
        Commands::Presets { catalog } => list_presets(catalog.as_deref()),
        Commands::ExportPresets { output } => export_presets(&output),
    }
}

struct SimulateOptions {
    seconds: f32,
    wheel: Vec<WheelGesture>,
    swipe: Vec<SwipeGesture>,
    check_assets: bool,
    dump_config: Option<PathBuf>,
}

fn run_simulation(
    config_path: Option<&Path>,
    catalog_path: Option<&Path>,
    options: SimulateOptions,
) -> blob_carousel_core::Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::live_defaults(),
    };
    let catalog = load_catalog(catalog_path)?;
    let store = AssetStore::with_builtin_gradients(&config.assets);
    store.validate_catalog(&catalog)?;

    tracing::info!(
        presets = catalog.count(),
        seconds = options.seconds,
        "starting simulation"
    );

    let font_size = config.render.font_size_for(config.render.width);
    let mut controller = CarouselController::new(catalog, config.transition.clone(), font_size);
    let mut input = InputAdapter::new(&config.input);
    let mut render_loop = RenderLoop::new(config.render.clone());
    let mut renderer = RecordingRenderer::new();
    let mut loading = LoadingProgress::new();
    render_loop.resize(
        config.render.width,
        config.render.height,
        &mut controller,
        &mut renderer,
    );

    let mut gestures = options
        .wheel
        .iter()
        .map(|wheel| (wheel.time, Gesture::Wheel(wheel.delta)))
        .chain(
            options
                .swipe
                .iter()
                .map(|swipe| (swipe.time, Gesture::Swipe(swipe.from_y, swipe.to_y))),
        )
        .collect::<Vec<_>>();
    gestures.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut gestures = gestures.into_iter().peekable();

    let urls = store.urls();
    let mut next_asset = 0;
    let dt = config.render.frame_delta();
    let frames = (options.seconds.max(0.0) / dt).ceil() as u64;

    for _ in 0..frames {
        if next_asset < urls.len() {
            load_asset(&urls, next_asset, options.check_assets, &mut loading);
            next_asset += 1;
            if next_asset == urls.len() {
                loading.on_load();
            }
        }

        while let Some((_, gesture)) = gestures.next_if(|(at, _)| *at <= render_loop.time()) {
            let steps = match gesture {
                Gesture::Wheel(delta) => vec![input.wheel(delta)],
                Gesture::Swipe(from_y, to_y) => swipe(&mut input, from_y, to_y),
            };
            for direction in steps.into_iter().flatten() {
                if controller.advance_in(direction).is_none() {
                    tracing::info!(?direction, "gesture dropped");
                }
            }
        }

        for event in render_loop.tick(dt, &mut controller, &mut renderer, &loading) {
            log_event(&controller, &event);
        }
    }

    let preset = controller.current_preset();
    tracing::info!(
        frames = renderer.frames(),
        time = render_loop.time(),
        preset = %preset.name,
        background = %controller.scene().background,
        "simulation finished"
    );

    if let Some(path) = options.dump_config {
        let snapshot = serde_json::to_string_pretty(&controller.parameters().to_bag())?;
        std::fs::write(&path, snapshot)?;
        tracing::info!(?path, "wrote parameter snapshot");
    }

    Ok(())
}

fn load_asset(urls: &[String], index: usize, check: bool, loading: &mut LoadingProgress) {
    let url = &urls[index];
    if index == 0 {
        loading.on_start(url, 0, urls.len());
    }
    if check && !Path::new(url).exists() {
        loading.on_error(url);
    }
    loading.on_progress(url, index + 1, urls.len());
}

/// Feeds a drag from `from_y` to `to_y` through the adapter in small moves.
fn swipe(
    input: &mut InputAdapter,
    from_y: f32,
    to_y: f32,
) -> Vec<Option<blob_carousel_core::Direction>> {
    const MOVES: usize = 8;

    input.touch_start(from_y);
    let steps = (1..=MOVES)
        .map(|step| {
            let y = from_y + (to_y - from_y) * step as f32 / MOVES as f32;
            input.touch_move(y)
        })
        .collect();
    input.touch_end();
    steps
}

fn log_event(controller: &CarouselController, event: &CarouselEvent) {
    let name = |index: usize| {
        controller
            .catalog()
            .get(index)
            .map(|preset| preset.name.as_str())
            .unwrap_or("?")
    };

    match event {
        CarouselEvent::Revealed => tracing::info!("scene revealed"),
        CarouselEvent::TransitionStarted { from, to, direction } => {
            tracing::info!(from = name(*from), to = name(*to), ?direction, "transition started")
        }
        CarouselEvent::DiscreteApplied { index } => {
            tracing::debug!(preset = name(*index), "discrete parameters applied")
        }
        CarouselEvent::Committed { index } => {
            tracing::info!(preset = name(*index), "transition committed")
        }
    }
}

fn load_catalog(path: Option<&Path>) -> blob_carousel_core::Result<PresetCatalog> {
    match path {
        Some(path) => PresetCatalog::load(path),
        None => Ok(PresetCatalog::builtin()),
    }
}

fn list_presets(catalog_path: Option<&Path>) -> blob_carousel_core::Result<()> {
    let catalog = load_catalog(catalog_path)?;
    for (index, preset) in catalog.iter().enumerate() {
        println!(
            "{index:>2}  {:<16} {}  {}",
            preset.name,
            preset.background,
            preset.parameters.gradient.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn export_presets(output: &Path) -> blob_carousel_core::Result<()> {
    tracing::info!(?output, "exporting built-in presets");
    std::fs::write(output, PresetCatalog::builtin().to_json()?)?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Wheel(f32),
    Swipe(f32, f32),
}

/// `TIME:DELTA_Y`, e.g. `1.5:120`.
#[derive(Debug, Clone, Copy)]
struct WheelGesture {
    time: f32,
    delta: f32,
}

/// `TIME:FROM_Y:TO_Y`, e.g. `3:400:250`.
#[derive(Debug, Clone, Copy)]
struct SwipeGesture {
    time: f32,
    from_y: f32,
    to_y: f32,
}

fn parse_numbers<const N: usize>(raw: &str) -> Result<[f32; N], String> {
    let values = raw
        .split(':')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("`{raw}`: {err}"))?;
    values
        .try_into()
        .map_err(|_| format!("`{raw}`: expected {N} colon-separated numbers"))
}

fn parse_wheel(raw: &str) -> Result<WheelGesture, String> {
    let [time, delta] = parse_numbers::<2>(raw)?;
    Ok(WheelGesture { time, delta })
}

fn parse_swipe(raw: &str) -> Result<SwipeGesture, String> {
    let [time, from_y, to_y] = parse_numbers::<3>(raw)?;
    Ok(SwipeGesture { time, from_y, to_y })
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Preset carousel for a shader-deformed blob", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the carousel headlessly at a fixed frame rate with scripted gestures.
    Simulate {
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Optional JSON preset catalog; the built-in presets are used otherwise.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Simulated duration in seconds.
        #[arg(short, long, default_value_t = 8.0)]
        seconds: f32,
        /// Wheel event as `TIME:DELTA_Y`. Repeatable.
        #[arg(long, value_parser = parse_wheel)]
        wheel: Vec<WheelGesture>,
        /// Touch drag as `TIME:FROM_Y:TO_Y`. Repeatable.
        #[arg(long, value_parser = parse_swipe)]
        swipe: Vec<SwipeGesture>,
        /// Report assets missing on disk through the loader error path.
        #[arg(long)]
        check_assets: bool,
        /// Write the final live parameters as JSON to this path.
        #[arg(long)]
        dump_config: Option<PathBuf>,
    },
    /// Print the preset catalog.
    Presets {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Write the built-in presets as a JSON catalog.
    ExportPresets {
        /// Output path for the catalog file.
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gesture_arguments() {
        let wheel = parse_wheel("1.5:-120").unwrap();
        assert_eq!(wheel.time, 1.5);
        assert_eq!(wheel.delta, -120.0);

        let swipe = parse_swipe("3:400:250").unwrap();
        assert_eq!((swipe.from_y, swipe.to_y), (400.0, 250.0));

        assert!(parse_wheel("1.5").is_err());
        assert!(parse_swipe("a:b:c").is_err());
    }

    #[test]
    fn long_swipe_emits_several_steps() {
        let mut input = InputAdapter::new(&Default::default());
        let steps = swipe(&mut input, 400.0, 200.0);
        let emitted = steps.iter().flatten().count();

        assert_eq!(emitted, 2);
        assert!(!input.is_touching());
    }
}
