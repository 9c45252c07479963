//! Pong Rally entry point
//!
//! Plays a seeded bot-vs-bot match headlessly and reports the result.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use pong_rally::settings::MatchLength;
use pong_rally::sim::{BotPair, GameEvent, MatchState, MatchSummary, Side, TickInput, advance_frame};
use pong_rally::Settings;

/// Host frame time the headless loop pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "pong-rally", about = "Run a headless bot-vs-bot Pong match")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Settings JSON to load
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Write the effective settings to this path and continue
    #[arg(long)]
    write_settings: Option<PathBuf>,
    /// Match length preset: quick | standard | long
    #[arg(long)]
    length: Option<String>,
    /// Points needed to win (overrides the preset)
    #[arg(long)]
    win_score: Option<u32>,
    #[arg(long)]
    left_name: Option<String>,
    #[arg(long)]
    right_name: Option<String>,
    /// Left bot skill, 0.0 ..= 1.0
    #[arg(long, default_value_t = 0.75)]
    left_skill: f32,
    /// Right bot skill, 0.0 ..= 1.0
    #[arg(long, default_value_t = 0.75)]
    right_skill: f32,
    /// Number of matches to play; each rematch bumps the seed by one
    #[arg(long, default_value_t = 1)]
    matches: u32,
    /// Give up on a match after this many host frames
    #[arg(long, default_value_t = 500_000)]
    max_frames: u64,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn build_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(length) = &args.length {
        let Some(preset) = MatchLength::from_str(length) else {
            bail!("unknown match length {length:?} (expected quick, standard or long)");
        };
        log::info!("Match length: {}", preset.as_str());
        settings.apply_preset(preset);
    }
    if let Some(win_score) = args.win_score {
        settings.win_score = win_score;
    }
    if let Some(name) = &args.left_name {
        settings.left_name = name.clone();
    }
    if let Some(name) = &args.right_name {
        settings.right_name = name.clone();
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = build_settings(&args)?;
    if let Some(path) = &args.write_settings {
        settings
            .save(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
    }

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let mut state = MatchState::new(settings, seed)?;
    for round in 0..args.matches.max(1) {
        if round > 0 {
            state = state.rematch(state.seed.wrapping_add(1))?;
        }
        play(&mut state, &args);

        let summary = state.summary();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            report(&state, &summary);
        }
    }

    Ok(())
}

/// Run one match with bots on both paddles until it ends or the frame limit hits
fn play(state: &mut MatchState, args: &Args) {
    let mut bots = BotPair::new(args.left_skill, args.right_skill);
    let mut bot_rng = Pcg32::seed_from_u64(state.seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut accumulator = 0.0;
    let mut input = TickInput::default();

    let mut frames = 0;
    while !state.is_over() && frames < args.max_frames {
        let axes = bots.axes(state, &mut bot_rng);
        input.set_axis(Side::Left, axes.x);
        input.set_axis(Side::Right, axes.y);

        advance_frame(state, &input, FRAME_DT, &mut accumulator);
        frames += 1;

        for event in state.drain_events() {
            match event {
                GameEvent::Score { scorer } => log::debug!("Point to {scorer}"),
                GameEvent::Rebound { by } => log::trace!("Returned by {by}"),
                GameEvent::WallBounce => log::trace!("Wall bounce"),
                GameEvent::Served { attacker, .. } => log::trace!("{attacker} serves"),
                GameEvent::MatchOver { winner } => log::debug!("Match over, {winner} wins"),
            }
        }
    }

    if !state.is_over() {
        log::warn!("Frame limit reached after {frames} frames; abandoning match");
        state.abort();
    }
}

fn report(state: &MatchState, summary: &MatchSummary) {
    let winner = match summary.winner {
        Some(side) => state.players[side].data().name.clone(),
        None => "nobody".to_string(),
    };
    println!(
        "{} {} - {} {}  ({} rebounds, {} ticks, seed {})",
        summary.left_name,
        summary.left_score,
        summary.right_score,
        summary.right_name,
        summary.rebounds,
        summary.ticks,
        summary.seed
    );
    println!("Winner: {winner}");
}
