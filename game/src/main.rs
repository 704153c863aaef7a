use anyhow::{Context, Result};
use clap::Parser;
use learn_game::board::Mark;
use learn_game::config::Config;
use learn_game::players::{HumanPlayer, LearningAgent};
use learn_game::{demo_game_stats, evaluate_against_random, learn_game, play_interactive_game};
use log::info;
use std::path::PathBuf;

/// Train two TD agents at tic-tac-toe by self-play, then play against one.
#[derive(Parser)]
#[command(name = "game", about = "Self-play TD learning for tic-tac-toe")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the number of training rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Override the number of training episodes per round
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the number of evaluation games after each round
    #[arg(long)]
    demo_episodes: Option<usize>,

    /// Seed both agents for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final evaluation's win/draw events as JSON (file or directory)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Skip the game against a human at the end
    #[arg(long)]
    no_interactive: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(rounds) = cli.rounds {
        config.rounds = rounds;
    }
    if let Some(episodes) = cli.episodes {
        config.episodes_per_round = episodes;
    }
    if let Some(demo_episodes) = cli.demo_episodes {
        config.demo_episodes = demo_episodes;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate().context("checking configuration")?;

    let mut a1 = LearningAgent::from_config(Mark::X, &config)?;
    let mut a2 = LearningAgent::from_config(Mark::O, &config)?;

    println!("before learning");
    let mut stats = demo_game_stats(&mut a1, &mut a2, config.demo_episodes)?;
    println!("{stats}");

    for round in 1..=config.rounds {
        println!("after learning {} times", round * config.episodes_per_round);
        learn_game(&mut a1, &mut a2, config.episodes_per_round)?;
        stats = demo_game_stats(&mut a1, &mut a2, config.demo_episodes)?;
        println!("{stats}");
    }

    if let Some(path) = &cli.events {
        let written = stats
            .write_events(path)
            .with_context(|| format!("writing events to {}", path.display()))?;
        info!("events written to {}", written.display());
    }

    let seed = config.seed.unwrap_or_default();
    for agent in [&mut a1, &mut a2] {
        let versus_random = evaluate_against_random(agent, config.demo_episodes, seed)?;
        println!("{}: against a random player\n{versus_random}", agent.name);
    }

    if !cli.no_interactive {
        let mut human = HumanPlayer::stdio("Human".to_owned(), Mark::X);
        let mark = human.choose_mark()?;
        let agent = if mark == Mark::X { &mut a2 } else { &mut a1 };
        play_interactive_game(agent, &mut human, Mark::X)?;
    }
    Ok(())
}
