use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{Config, WriteLogger};

use rustsnake::grid::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_UNIT_SIZE};
use rustsnake::terminal::{self, Settings};
use rustsnake::{
    ApplePlacement, EngineConfig, GameDifficulty, GridConfig, DEFAULT_TICK_DELAY_MS,
    MIN_TICK_DELAY_MS,
};

#[derive(Parser, Debug)]
#[command(name = "rustsnake", version, about = "Snake in the terminal")]
struct Args {
    /// Board width in pixels, a multiple of --unit
    #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    width: i32,
    /// Board height in pixels, a multiple of --unit
    #[arg(long, default_value_t = DEFAULT_SCREEN_HEIGHT)]
    height: i32,
    /// Size of one cell in pixels
    #[arg(long, default_value_t = DEFAULT_UNIT_SIZE)]
    unit: i32,
    /// easy, medium or hard
    #[arg(short, long, default_value_t = GameDifficulty::Easy)]
    difficulty: GameDifficulty,
    /// Tick delay at the start of a game, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_DELAY_MS)]
    tick_delay: u64,
    /// Eating never makes the game tick faster than this, in milliseconds
    #[arg(long, default_value_t = MIN_TICK_DELAY_MS)]
    min_tick_delay: u64,
    /// Fixed seed for apple placement
    #[arg(long)]
    seed: Option<u64>,
    /// Never drop an apple on the snake
    #[arg(long)]
    avoid_snake: bool,
    /// Start with the grid overlay on
    #[arg(long)]
    grid: bool,
    #[arg(long, default_value = "rustsnake.log")]
    log_file: PathBuf,
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level {s:?}, expected off, error, warn, info, debug or trace"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout is the game board, so logs go to a file
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    WriteLogger::init(args.log_level, Config::default(), log_file)
        .context("failed to initialise logger")?;

    let grid = GridConfig::new(args.width, args.height, args.unit)?;
    let settings = Settings {
        grid,
        difficulty: args.difficulty,
        engine: EngineConfig {
            initial_tick_delay_ms: args.tick_delay,
            min_tick_delay_ms: args.min_tick_delay,
            apple_placement: if args.avoid_snake {
                ApplePlacement::AvoidSnake
            } else {
                ApplePlacement::Anywhere
            },
            seed: args.seed,
        },
        show_grid: args.grid,
    };
    info!("starting rustsnake with {settings:?}");

    let best_score = terminal::run(settings)?;
    info!("session over, best score {best_score}");
    println!("Thanks for playing! Best score: {best_score}");
    Ok(())
}
