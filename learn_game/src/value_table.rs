use crate::board::{GameState, Mark, StateKey, Status};
use std::collections::HashMap;
use std::ops::Deref;

pub const WIN_VALUE: f64 = 1.0;
pub const LOSS_VALUE: f64 = 0.0;
pub const DEFAULT_INITIAL_VALUE: f64 = 0.5;
pub const DEFAULT_DRAW_VALUE: f64 = 0.5;

/// Learned estimates of the probability that `owner` eventually wins from a
/// given position.
///
/// Only positions still in play are ever stored. Finished positions have a
/// fixed value and unseen ones fall back to `initial_value`, so reading never
/// grows the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    owner: Mark,
    initial_value: f64,
    draw_value: f64,
    table: HashMap<StateKey, f64>,
}

impl Deref for ValueTable {
    type Target = HashMap<StateKey, f64>;
    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl ValueTable {
    pub fn new(owner: Mark) -> Self {
        Self::with_priors(owner, DEFAULT_INITIAL_VALUE, DEFAULT_DRAW_VALUE)
    }

    pub fn with_priors(owner: Mark, initial_value: f64, draw_value: f64) -> Self {
        ValueTable {
            owner,
            initial_value,
            draw_value,
            table: HashMap::with_capacity(5478),
        }
    }

    pub fn owner(&self) -> Mark {
        self.owner
    }

    pub fn terminal_value(&self, status: Status) -> Option<f64> {
        match status {
            Status::InProgress => None,
            Status::Won(mark) if mark == self.owner => Some(WIN_VALUE),
            Status::Won(_) => Some(LOSS_VALUE),
            Status::Drawn => Some(self.draw_value),
        }
    }

    pub fn get(&self, state: &GameState) -> f64 {
        if let Some(value) = self.terminal_value(state.status()) {
            return value;
        }
        self.table
            .get(&state.key())
            .copied()
            .unwrap_or(self.initial_value)
    }

    pub fn set(&mut self, key: StateKey, value: f64) {
        self.table.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_positions_use_the_prior() {
        let table = ValueTable::with_priors(Mark::X, 0.3, 0.5);
        let state = GameState::from_moves(Mark::X, &[4]).unwrap();
        assert_eq!(table.get(&state), 0.3);
        assert!(table.is_empty());
    }

    #[test]
    fn finished_positions_have_fixed_values() {
        let x_table = ValueTable::new(Mark::X);
        let o_table = ValueTable::with_priors(Mark::O, 0.5, 0.0);
        let x_won = GameState::from_moves(Mark::X, &[0, 3, 1, 4, 2]).unwrap();
        let drawn = GameState::from_moves(Mark::X, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();

        assert_eq!(x_table.get(&x_won), WIN_VALUE);
        assert_eq!(o_table.get(&x_won), LOSS_VALUE);
        assert_eq!(x_table.get(&drawn), DEFAULT_DRAW_VALUE);
        assert_eq!(o_table.get(&drawn), 0.0);
        assert!(x_table.is_empty() && o_table.is_empty());
    }

    #[test]
    fn set_overwrites_the_estimate() {
        let mut table = ValueTable::new(Mark::O);
        let state = GameState::from_moves(Mark::X, &[0, 4]).unwrap();
        table.set(state.key(), 0.9);
        table.set(state.key(), 0.7);
        assert_eq!(table.get(&state), 0.7);
        assert_eq!(table.len(), 1);
    }
}
