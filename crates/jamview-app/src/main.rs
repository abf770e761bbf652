//! jamview - replay a jamming simulation log against a headless scene

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jamview_app::control;
use jamview_app::state::AppState;
use jamview_core::commands::PlaybackCommand;
use jamview_core::constants::FRAME_RATE;
use jamview_core::log::SimulationLog;
use jamview_engine::config::PlaybackConfig;

#[derive(Parser)]
#[command(name = "jamview")]
#[command(about = "Replay a UAV-swarm jamming simulation log")]
#[command(version)]
struct Cli {
    /// Simulation log exported as JSON
    #[arg(short, long)]
    log: PathBuf,

    /// Playback config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speed multiplier (clamped to the configured bounds)
    #[arg(short, long)]
    speed: Option<f64>,

    /// Step to start from
    #[arg(long, default_value_t = 0)]
    start_step: i64,

    /// Wall-clock seconds to play for
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Frame rate of the player loop
    #[arg(long, default_value_t = FRAME_RATE)]
    fps: u32,

    /// Hide interference links
    #[arg(long)]
    no_links: bool,

    /// Hide entity trails
    #[arg(long)]
    no_trails: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    if !cli.seconds.is_finite() {
        bail!("--seconds must be a finite number");
    }

    let log = SimulationLog::load_from_file(&cli.log)
        .with_context(|| format!("cannot start playback of {}", cli.log.display()))?;

    let mut config = match &cli.config {
        Some(path) => PlaybackConfig::from_json_file(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => PlaybackConfig::default(),
    };
    if let Some(speed) = cli.speed {
        config.initial_speed = speed;
    }
    config.show_links &= !cli.no_links;
    config.show_trails &= !cli.no_trails;
    config
        .validate()
        .context("invalid playback settings after command-line overrides")?;

    let state = AppState::new();
    control::start_player(&state, log, config, cli.fps).map_err(|e| anyhow!(e))?;
    control::send_command(&state, PlaybackCommand::Seek { step: cli.start_step })
        .map_err(|e| anyhow!(e))?;
    control::send_command(&state, PlaybackCommand::Play).map_err(|e| anyhow!(e))?;

    let duration = Duration::from_secs_f64(cli.seconds.max(0.0));
    let started = Instant::now();
    let mut last_step = None;
    while started.elapsed() < duration {
        std::thread::sleep(Duration::from_millis(100));
        if let Some(snapshot) = control::get_snapshot(&state).map_err(|e| anyhow!(e))? {
            if last_step != Some(snapshot.step) {
                last_step = Some(snapshot.step);
                println!("{}", serde_json::to_string(&snapshot)?);
            }
        }
    }

    control::stop_player(&state).map_err(|e| anyhow!(e))?;
    tracing::info!(last_step = ?last_step, "playback finished");
    Ok(())
}
