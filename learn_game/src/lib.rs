use crate::board::{GameState, Mark};
use crate::error::{Error, Result};
use crate::players::{HumanPlayer, LearningAgent, Player, RandomPlayer};
use crate::stats::GameStats;
use log::{debug, info};
use std::io::{BufRead, Write};

pub mod board;
pub mod config;
pub mod error;
pub mod players;
pub mod policy;
pub mod stats;
pub mod value_table;

/// X opens even episodes, O odd ones.
pub fn starting_mark(episode: usize) -> Mark {
    if episode % 2 == 0 {
        Mark::X
    } else {
        Mark::O
    }
}

fn check_opponents(first: Mark, second: Mark) -> Result<()> {
    if first == second {
        return Err(Error::invalid_config(format!(
            "both players play {first}, they need different marks"
        )));
    }
    Ok(())
}

/// Self-play training: both agents back up every ply of every episode.
pub fn learn_game(a1: &mut LearningAgent, a2: &mut LearningAgent, episodes: usize) -> Result<()> {
    check_opponents(a1.mark(), a2.mark())?;
    for episode in 0..episodes {
        let mut state = GameState::new(starting_mark(episode));
        while state.is_playable() {
            let next = if state.turn() == a1.mark() {
                a1.train_play(&state)?
            } else {
                a2.train_play(&state)?
            };
            a1.learn_from_move(&state, &next);
            a2.learn_from_move(&state, &next);
            state = next;
        }
        a1.learn_from_move(&state, &state);
        a2.learn_from_move(&state, &state);
        debug!("episode {episode} ended {:?}", state.status());
    }
    info!(
        "trained {episodes} episodes, {} knows {} states, {} knows {} states",
        a1.name(),
        a1.value_table().len(),
        a2.name(),
        a2.value_table().len()
    );
    Ok(())
}

/// Plays one game to the end between two players holding different marks.
pub fn play_game(
    p1: &mut dyn Player,
    p2: &mut dyn Player,
    starting: Mark,
) -> Result<GameState> {
    check_opponents(p1.mark(), p2.mark())?;
    let mut state = GameState::new(starting);
    while state.is_playable() {
        let mv = if state.turn() == p1.mark() {
            p1.choose_move(&state)?
        } else {
            p2.choose_move(&state)?
        };
        state = state.apply_move(mv)?;
    }
    Ok(state)
}

/// Greedy games between the two agents, no learning.
pub fn demo_game_stats(
    a1: &mut LearningAgent,
    a2: &mut LearningAgent,
    episodes: usize,
) -> Result<GameStats> {
    let mut stats = GameStats::with_capacity(episodes);
    for episode in 0..episodes {
        let state = play_game(a1, a2, starting_mark(episode))?;
        stats.record(state.status());
    }
    Ok(stats)
}

/// Greedy games of `agent` against a uniformly random opponent.
pub fn evaluate_against_random(
    agent: &mut LearningAgent,
    episodes: usize,
    seed: u64,
) -> Result<GameStats> {
    let mut opponent = RandomPlayer::new(agent.mark().other(), seed);
    let mut stats = GameStats::with_capacity(episodes);
    for episode in 0..episodes {
        let state = play_game(agent, &mut opponent, starting_mark(episode))?;
        stats.record(state.status());
    }
    info!(
        "{} against random: {:.1}% wins over {episodes} games",
        agent.name(),
        stats.win_rate(agent.mark()) * 100.0
    );
    Ok(stats)
}

/// One game of a human against an agent; the result is shown to the human.
pub fn play_interactive_game<R: BufRead, W: Write>(
    agent: &mut LearningAgent,
    human: &mut HumanPlayer<R, W>,
    starting: Mark,
) -> Result<GameState> {
    let state = play_game(agent, human, starting)?;
    human.announce_result(&state)?;
    Ok(state)
}
