use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fruitrun_common::{Camera, GamePhase, RunConfig};
use fruitrun_kernel::{Run, RunEvent};
use fruitrun_persist::{HighScoreStore, Recording, RecordingStore};
use fruitrun_render::{DebugTextRenderer, Renderer};
use fruitrun_tools::{Autopilot, RunInspector};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fruitrun-cli", about = "Headless Fruit Runner: simulate, replay, verify")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML run config (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the active run config
    Info,
    /// Play a run with the autopilot
    Simulate {
        /// Maximum number of ticks to simulate
        #[arg(short, long, default_value = "3600")]
        ticks: u64,
        /// RNG seed for the run
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Save the run into a recording store at this directory
        #[arg(short, long)]
        record: Option<PathBuf>,
        /// Print the final state of every entity
        #[arg(long)]
        dump: bool,
    },
    /// Re-simulate a stored recording
    Replay {
        /// Recording store directory
        store: PathBuf,
        /// 1-based recording index (latest when omitted)
        #[arg(short, long)]
        index: Option<u32>,
    },
    /// Check store integrity and re-simulate every recording
    Verify {
        /// Recording store directory
        store: PathBuf,
    },
    /// Show or reset the saved best score
    HighScore {
        /// Forget the saved best score
        #[arg(long)]
        reset: bool,
        /// High score file
        #[arg(short, long, default_value = "fruitrun-highscore.json")]
        file: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RunConfig> {
    let config = match path {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    config.validate()?;
    tracing::debug!(
        source = %path.map_or("defaults".into(), |p| p.display().to_string()),
        max_obstacles = config.spawn.max_obstacles,
        "run config loaded"
    );
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("fruitrun-cli v{}", env!("CARGO_PKG_VERSION"));
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Simulate {
            ticks,
            seed,
            record,
            dump,
        } => {
            println!("Simulating: seed={seed}, ticks<={ticks}");
            let pilot = Autopilot::default();
            let mut run = Run::with_config(config, seed);
            run.start();

            let (mut jumps, mut slices) = (0u32, 0u32);
            while run.tick() < ticks && run.phase() == GamePhase::Playing {
                for input in pilot.decide(&run) {
                    run.apply(input);
                }
                run.step();
                for event in run.drain_events() {
                    match event {
                        RunEvent::Jumped { .. } => jumps += 1,
                        RunEvent::FruitSliced { id, points } => {
                            slices += 1;
                            if let Some(fruit) = RunInspector::inspect_fruit(&run, id) {
                                tracing::debug!(points, "sliced {fruit}");
                            }
                        }
                        RunEvent::Collided {
                            obstacle,
                            kind,
                            final_score,
                        } => {
                            println!(
                                "Crashed into {} at tick {} (score {final_score})",
                                kind.name(),
                                run.tick()
                            );
                            if let Some(info) = RunInspector::inspect_obstacle(&run, obstacle) {
                                println!("  {info}");
                            }
                        }
                        _ => {}
                    }
                }
            }

            println!("{}", RunInspector::summary(&run));
            println!("Jumps: {jumps}, slices: {slices}, hash={:#018x}", run.state_hash());
            if dump {
                print!("{}", DebugTextRenderer::new().render(&run, &Camera::default()));
                for info in RunInspector::list_entities(&run) {
                    println!("  {info}");
                }
            }

            if let Some(dir) = record {
                let mut store = RecordingStore::open(&dir)?;
                let recording = Recording::capture(&run);
                let index = store.save(&recording)?;
                tracing::info!(index, ticks = recording.ticks, "run recorded");
                println!(
                    "Recorded #{index} ({}) into {}",
                    recording.id,
                    dir.display()
                );
            }
        }
        Commands::Replay { store, index } => {
            let store = RecordingStore::open_existing(&store)?;
            let recording = match index {
                Some(index) => store.load(index)?,
                None => store.load_latest()?,
            };
            let run = recording.replay()?;
            println!("{}", RunInspector::summary(&run));
            let matches =
                run.state_hash() == recording.final_hash && run.score() == recording.final_score;
            println!(
                "Recording {}: jumps={} score={} hash={:#018x} {}",
                recording.id,
                recording.jumps(),
                recording.final_score,
                recording.final_hash,
                if matches { "OK" } else { "MISMATCH" }
            );
            if !matches {
                anyhow::bail!("replay diverged from recording {}", recording.id);
            }
        }
        Commands::Verify { store } => {
            let store = RecordingStore::open_existing(&store)?;
            store.verify_integrity()?;
            println!("Integrity chain OK ({} recordings)", store.len());

            let mut failed = 0;
            for (number, entry) in (1u32..).zip(store.entries()) {
                let recording = store.load(number)?;
                let ok = recording.verify() && recording.id == entry.recording;
                if !ok {
                    tracing::warn!(number, id = %entry.recording, "recording diverged on replay");
                    failed += 1;
                }
                println!(
                    "  #{number} {} score={} {}",
                    entry.file,
                    entry.final_score,
                    if ok { "OK" } else { "MISMATCH" }
                );
            }
            if failed > 0 {
                anyhow::bail!("{failed} recording(s) failed to replay");
            }
        }
        Commands::HighScore { reset, file } => {
            let mut scores = HighScoreStore::open(&file)?;
            if reset {
                scores.reset()?;
                println!("High score reset ({})", file.display());
            } else {
                println!("High score: {}", scores.best());
            }
        }
    }

    Ok(())
}
