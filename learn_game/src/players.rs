use crate::board::{GameState, Mark, Status};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::policy::select_move;
use crate::value_table::ValueTable;
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Anything that can pick a move for its mark.
pub trait Player {
    fn mark(&self) -> Mark;
    fn name(&self) -> &str;
    fn choose_move(&mut self, state: &GameState) -> Result<usize>;
}

/// Tabular TD(0) learner.
///
/// The agent owns its value table and learns from every ply it observes,
/// including the opponent's, so two agents trained on the same games keep
/// separate estimates from their own point of view.
#[derive(Debug)]
pub struct LearningAgent {
    pub name: String,
    mark: Mark,
    learning_rate: f64,
    exploration_rate: f64,
    table: ValueTable,
    rng: StdRng,
}

fn check_rates(learning_rate: f64, exploration_rate: f64) -> Result<()> {
    if !(learning_rate > 0.0 && learning_rate <= 1.0) {
        return Err(Error::invalid_config("learning_rate must be in (0, 1]"));
    }
    if !(0.0..=1.0).contains(&exploration_rate) {
        return Err(Error::invalid_config("exploration_rate must be in [0, 1]"));
    }
    Ok(())
}

impl LearningAgent {
    pub fn new(mark: Mark, learning_rate: f64, exploration_rate: f64) -> Result<Self> {
        Self::with_table(ValueTable::new(mark), learning_rate, exploration_rate)
    }

    pub fn with_table(table: ValueTable, learning_rate: f64, exploration_rate: f64) -> Result<Self> {
        check_rates(learning_rate, exploration_rate)?;
        let mark = table.owner();
        Ok(LearningAgent {
            name: format!("TD-{mark}"),
            mark,
            learning_rate,
            exploration_rate,
            table,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn from_config(mark: Mark, config: &Config) -> Result<Self> {
        let table = ValueTable::with_priors(mark, config.initial_value, config.draw_value);
        let agent = Self::with_table(table, config.learning_rate, config.exploration_rate)?;
        Ok(match config.seed {
            Some(seed) => agent.with_seed(seed.wrapping_add(mark as u64)),
            None => agent,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    pub fn set_exploration_rate(&mut self, exploration_rate: f64) -> Result<()> {
        check_rates(self.learning_rate, exploration_rate)?;
        self.exploration_rate = exploration_rate;
        Ok(())
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.table
    }

    /// Picks a move with exploration and returns the resulting state.
    pub fn train_play(&mut self, state: &GameState) -> Result<GameState> {
        let mv = select_move(state, &self.table, self.exploration_rate, &mut self.rng)?;
        state.apply_move(mv)
    }

    /// Greedy counterpart of [`LearningAgent::train_play`].
    pub fn play(&mut self, state: &GameState) -> Result<GameState> {
        let mv = self.choose_move(state)?;
        state.apply_move(mv)
    }

    /// TD(0) backup of `prior` towards `next`.
    ///
    /// A finished `next` contributes its fixed outcome value. Nothing is
    /// stored when no move happened between the two states.
    pub fn learn_from_move(&mut self, prior: &GameState, next: &GameState) {
        if prior == next || !prior.is_playable() {
            return;
        }
        let v_prior = self.table.get(prior);
        let v_next = self.table.get(next);
        self.table
            .set(prior.key(), v_prior + self.learning_rate * (v_next - v_prior));
    }
}

impl Player for LearningAgent {
    fn mark(&self) -> Mark {
        self.mark
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        select_move(state, &self.table, 0.0, &mut self.rng)
    }
}

/// Uniformly random opponent used to measure learned play.
#[derive(Debug)]
pub struct RandomPlayer {
    pub name: String,
    mark: Mark,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(mark: Mark, seed: u64) -> Self {
        RandomPlayer {
            name: "Random".to_owned(),
            mark,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn mark(&self) -> Mark {
        self.mark
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        state
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoLegalMove)
    }
}

/// A person entering cells 1-9, row by row from the top left.
#[derive(Debug)]
pub struct HumanPlayer<R, W> {
    pub name: String,
    mark: Mark,
    input: R,
    output: W,
}

impl HumanPlayer<StdinLock<'static>, Stdout> {
    pub fn stdio(name: String, mark: Mark) -> Self {
        HumanPlayer::new(name, mark, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(name: String, mark: Mark, input: R, output: W) -> Self {
        HumanPlayer {
            name,
            mark,
            input,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_owned())
    }

    /// Asks which mark to play until X or O is entered.
    pub fn choose_mark(&mut self) -> Result<Mark> {
        loop {
            writeln!(
                self.output,
                "{}, do you want to play X (makes the first move) or O?",
                self.name
            )?;
            match self.read_line()?.to_ascii_uppercase().as_str() {
                "X" => self.mark = Mark::X,
                "O" | "0" => self.mark = Mark::O,
                _ => {
                    writeln!(self.output, "You typed a wrong symbol, please try again.")?;
                    continue;
                }
            }
            return Ok(self.mark);
        }
    }

    pub fn announce_result(&mut self, state: &GameState) -> Result<()> {
        write!(self.output, "{state}")?;
        match state.status() {
            Status::Won(mark) if mark == self.mark => {
                writeln!(self.output, "Congratulations, {}! You have won!", self.name)?
            }
            Status::Won(_) => writeln!(self.output, "Really sorry, {}, you have lost.", self.name)?,
            Status::Drawn => writeln!(self.output, "The game ended in a draw.")?,
            Status::InProgress => writeln!(self.output, "The game is still on.")?,
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn mark(&self) -> Mark {
        self.mark
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn choose_move(&mut self, state: &GameState) -> Result<usize> {
        let legal = state.legal_moves();
        if legal.is_empty() {
            return Err(Error::NoLegalMove);
        }
        loop {
            write!(self.output, "{state}")?;
            writeln!(self.output, "{}, please choose a cell (1-9):", self.name)?;
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(cell @ 1..=9) if legal.contains(&(cell - 1)) => return Ok(cell - 1),
                Ok(cell @ 1..=9) => writeln!(
                    self.output,
                    "Cell {cell} is taken, please choose another one."
                )?,
                _ => writeln!(
                    self.output,
                    "Unknown cell {line:?}, please enter a number from 1 to 9."
                )?,
            }
        }
    }
}
