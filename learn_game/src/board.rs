use crate::error::{Error, IllegalMoveReason, Result};
use itertools::Itertools;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every row, column and diagonal of the board, as cell indices.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Cell {
    Empty,
    Mark(Mark),
}

impl Cell {
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Mark(mark) => mark.as_char(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Status {
    InProgress,
    Won(Mark),
    Drawn,
}

/// Lookup key of a board position in a value table.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateKey(String);

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 3x3 board together with the mark to move and the outcome so far.
///
/// Cells are addressed by index 0-8 in row-major order. A state is never
/// mutated in place: [`GameState::apply_move`] returns the successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    cells: Array2<Cell>,
    turn: Mark,
    status: Status,
}

fn position(index: usize) -> [usize; 2] {
    [index / 3, index % 3]
}

impl GameState {
    pub fn new(starting: Mark) -> Self {
        GameState {
            cells: Array::from_elem((3, 3), Cell::Empty),
            turn: starting,
            status: Status::InProgress,
        }
    }

    /// Plays `moves` in order from an empty board.
    pub fn from_moves(starting: Mark, moves: &[usize]) -> Result<Self> {
        moves
            .iter()
            .try_fold(GameState::new(starting), |state, &mv| state.apply_move(mv))
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(position(index)).copied()
    }

    pub fn is_playable(&self) -> bool {
        self.status == Status::InProgress
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        if !self.is_playable() {
            return Vec::new();
        }
        self.cells
            .indexed_iter()
            .filter(|(_, &cell)| cell == Cell::Empty)
            .map(|((row, col), _)| row * 3 + col)
            .collect()
    }

    pub fn apply_move(&self, index: usize) -> Result<GameState> {
        let illegal = |reason| Error::IllegalMove {
            cell: index,
            reason,
        };
        if !self.is_playable() {
            return Err(illegal(IllegalMoveReason::GameOver));
        }
        match self.cell(index) {
            None => return Err(illegal(IllegalMoveReason::OutOfRange)),
            Some(Cell::Mark(_)) => return Err(illegal(IllegalMoveReason::Occupied)),
            Some(Cell::Empty) => {}
        }

        let mut next = self.clone();
        next.cells[position(index)] = Cell::Mark(self.turn);
        if next.has_won(self.turn) {
            next.status = Status::Won(self.turn);
        } else if next.is_full() {
            next.status = Status::Drawn;
        } else {
            next.turn = self.turn.other();
        }
        Ok(next)
    }

    pub fn has_won(&self, mark: Mark) -> bool {
        self.line_of(mark).is_some()
    }

    /// The first line of [`WINNING_LINES`] held by the winner, if any.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        match self.status {
            Status::Won(mark) => self.line_of(mark),
            _ => None,
        }
    }

    fn line_of(&self, mark: Mark) -> Option<[usize; 3]> {
        let target = Cell::Mark(mark);
        WINNING_LINES
            .iter()
            .find(|line| line.iter().all(|&idx| self.cells[position(idx)] == target))
            .copied()
    }

    /// Cells in index order, followed by the mark to move while the game is
    /// still on. Finished positions carry no turn.
    pub fn key(&self) -> StateKey {
        let mut key: String = self.cells.iter().map(|cell| cell.as_char()).collect();
        if self.is_playable() {
            key.push(self.turn.as_char());
        }
        StateKey(key)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.rows() {
            writeln!(f, "{}", row.iter().map(|cell| cell.as_char()).join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_consistent(state: &GameState) {
        let x_won = state.has_won(Mark::X);
        let o_won = state.has_won(Mark::O);
        assert!(!(x_won && o_won), "both marks hold a line:\n{state}");
        match state.status() {
            Status::Won(mark) => {
                assert!(state.has_won(mark));
                assert!(state.legal_moves().is_empty());
            }
            Status::Drawn => {
                assert!(state.is_full());
                assert!(!x_won && !o_won);
                assert!(state.legal_moves().is_empty());
            }
            Status::InProgress => {
                assert!(!x_won && !o_won);
                assert!(!state.legal_moves().is_empty());
            }
        }
    }

    fn walk(state: &GameState, seen: &mut HashSet<StateKey>) {
        assert_consistent(state);
        if !seen.insert(state.key()) {
            return;
        }
        for mv in state.legal_moves() {
            walk(&state.apply_move(mv).unwrap(), seen);
        }
    }

    #[test]
    fn new_board_is_empty() {
        let state = GameState::new(Mark::O);
        assert_eq!(state.turn(), Mark::O);
        assert_eq!(state.status(), Status::InProgress);
        assert_eq!(state.legal_moves(), (0..9).collect::<Vec<_>>());
        assert_eq!(state.key().as_str(), "---------O");
    }

    #[test]
    fn center_opening_leaves_eight_moves() {
        let state = GameState::new(Mark::X).apply_move(4).unwrap();
        assert_eq!(state.legal_moves(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(state.turn(), Mark::O);
        assert_eq!(state.cell(4), Some(Cell::Mark(Mark::X)));
    }

    #[test]
    fn anti_diagonal_win() {
        let state = GameState::from_moves(Mark::X, &[2, 0, 4, 1, 6]).unwrap();
        assert_eq!(state.status(), Status::Won(Mark::X));
        assert_eq!(state.winning_line(), Some([2, 4, 6]));
        assert!(state.legal_moves().is_empty());
        assert!(!state.is_playable());
    }

    #[test]
    fn corners_and_center_need_a_full_line() {
        // O blocks both diagonals, so X on 4, 6 and 8 is not yet a win.
        let state = GameState::from_moves(Mark::X, &[4, 0, 8, 2, 6]).unwrap();
        assert_eq!(state.status(), Status::InProgress);
        assert_eq!(state.turn(), Mark::O);
        assert_eq!(state.winning_line(), None);

        let state = state.apply_move(3).unwrap().apply_move(7).unwrap();
        assert_eq!(state.status(), Status::Won(Mark::X));
        assert_eq!(state.winning_line(), Some([6, 7, 8]));
    }

    #[test]
    fn full_board_without_line_is_drawn() {
        // X O X
        // X O O
        // O X X
        let state = GameState::from_moves(Mark::X, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(state.status(), Status::Drawn);
        assert!(state.legal_moves().is_empty());
        assert_eq!(state.winning_line(), None);
    }

    #[test]
    fn finished_game_rejects_moves() {
        let drawn = GameState::from_moves(Mark::X, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        for cell in 0..9 {
            assert!(matches!(
                drawn.apply_move(cell),
                Err(Error::IllegalMove {
                    reason: IllegalMoveReason::GameOver,
                    ..
                })
            ));
        }
        let won = GameState::from_moves(Mark::O, &[0, 3, 1, 4, 2]).unwrap();
        assert_eq!(won.status(), Status::Won(Mark::O));
        assert!(won.apply_move(8).is_err());
    }

    #[test]
    fn occupied_and_out_of_range_cells_are_rejected() {
        let state = GameState::new(Mark::X).apply_move(4).unwrap();
        assert!(matches!(
            state.apply_move(4),
            Err(Error::IllegalMove {
                cell: 4,
                reason: IllegalMoveReason::Occupied
            })
        ));
        assert!(matches!(
            state.apply_move(9),
            Err(Error::IllegalMove {
                reason: IllegalMoveReason::OutOfRange,
                ..
            })
        ));
    }

    #[test]
    fn key_depends_on_position_not_path() {
        let a = GameState::from_moves(Mark::X, &[0, 4, 8]).unwrap();
        let b = GameState::from_moves(Mark::X, &[8, 4, 0]).unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().as_str(), "X---O---XO");
        let c = GameState::from_moves(Mark::X, &[0, 4, 2]).unwrap();
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn all_reachable_states_are_consistent() {
        let mut seen = HashSet::new();
        walk(&GameState::new(Mark::X), &mut seen);
        assert_eq!(seen.len(), 5478);
    }

    #[test]
    fn display_draws_three_rows() {
        let state = GameState::from_moves(Mark::X, &[4, 0]).unwrap();
        assert_eq!(state.to_string(), "O - -\n- X -\n- - -\n");
    }
}
