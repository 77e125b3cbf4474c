mod loader;
mod play;
mod simulate;
mod util;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::PathBuf;

use loader::FileLoader;
use stationdle_game::{DisconnectionPolicy, EngineConfig, GameEngine, StationGame};
use util::{parse_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Play a game interactively, or from a scripted guess list
    Play,
    /// Run the random-candidate solver across seeds
    Simulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// An unreachable target empties the candidate pool
    Clear,
    /// An unreachable target leaves the pool untouched for that clue
    Skip,
}

impl From<PolicyArg> for DisconnectionPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Clear => Self::ClearCandidates,
            PolicyArg::Skip => Self::SkipClue,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "stationdle", version)]
#[command(about = "Guess the hidden station from distance and attribute clues")]
struct Args {
    /// Station dataset (JSON array of stations)
    #[arg(long)]
    data: PathBuf,

    /// Run mode: play (interactive or scripted) or simulate
    #[arg(long, value_enum, default_value_t = RunMode::Play)]
    mode: RunMode,

    /// Engine config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the disconnection policy from the config
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Seed for target selection
    #[arg(long, conflicts_with = "daily")]
    seed: Option<u64>,

    /// Play today's puzzle
    #[arg(long)]
    daily: bool,

    /// Force the answer to a named station
    #[arg(long)]
    answer: Option<String>,

    /// Guesses to play non-interactively (comma-separated)
    #[arg(long, default_value = "")]
    guesses: String,

    /// Seeds to simulate (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games per seed (simulate mode only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&args)?;
    let engine = GameEngine::load(&FileLoader::new(&args.data), config)
        .with_context(|| format!("failed to prepare dataset {}", args.data.display()))?;
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.mode {
        RunMode::Play => run_play(&args, &engine, &mut output_target)?,
        RunMode::Simulate => run_simulate(&args, &engine, &mut output_target)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::default(),
    };
    if let Some(policy) = args.policy {
        config = config.with_disconnection(policy.into());
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn today() -> u32 {
    u32::try_from(Utc::now().date_naive().num_days_from_ce()).unwrap_or_default()
}

fn build_session(args: &Args, engine: &GameEngine) -> Result<StationGame> {
    let mut game = if args.daily {
        engine.create_daily_session(today())
    } else {
        engine.create_session()
    };
    if let Some(answer) = &args.answer {
        game.override_answer(answer)?;
    }
    Ok(game)
}

fn run_play(args: &Args, engine: &GameEngine, out: &mut OutputTarget) -> Result<()> {
    let mut game = build_session(args, engine)?;
    let guesses = split_csv(&args.guesses);
    let json = args.report == "json";

    if guesses.is_empty() {
        announce_banner(engine);
        play::run_interactive(&mut game, stdin().lock(), out)
    } else {
        if !json {
            announce_banner(engine);
        }
        play::run_scripted(&mut game, &guesses, json, out).map(|_| ())
    }
}

fn run_simulate(args: &Args, engine: &GameEngine, out: &mut OutputTarget) -> Result<()> {
    let seeds = parse_seeds(&args.seeds)?;
    let records = simulate::run_simulation(engine, &seeds, args.iterations)?;
    let summary = simulate::aggregate(&records);

    if args.report == "json" {
        let payload = serde_json::json!({ "summary": summary, "records": records });
        serde_json::to_writer_pretty(&mut *out, &payload)?;
        writeln!(out)?;
    } else {
        announce_banner(engine);
        simulate::write_console_summary(out, &summary)?;
    }
    Ok(())
}

fn announce_banner(engine: &GameEngine) {
    println!("{}", "🚇 Stationdle".bright_cyan().bold());
    println!(
        "{}",
        format!(
            "{} stations, {} lines",
            engine.index().len(),
            engine.index().lines().len()
        )
        .cyan()
    );
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
