use crate::board::GameState;
use crate::error::{Error, Result};
use crate::value_table::ValueTable;
use itertools::Itertools;
use rand::prelude::SliceRandom;
use rand::Rng;

/// Epsilon-greedy move selection with one ply of lookahead.
///
/// With probability `exploration_rate` a uniformly random legal move is
/// returned. Otherwise every legal move is applied and the move leading to
/// the highest valued successor wins; ties go to the lowest cell index.
pub fn select_move<R: Rng + ?Sized>(
    state: &GameState,
    table: &ValueTable,
    exploration_rate: f64,
    rng: &mut R,
) -> Result<usize> {
    let moves = state.legal_moves();
    if moves.is_empty() {
        return Err(Error::NoLegalMove);
    }
    if rng.gen::<f64>() < exploration_rate {
        return moves.choose(rng).copied().ok_or(Error::NoLegalMove);
    }

    let scored = moves
        .into_iter()
        .map(|mv| Ok((mv, table.get(&state.apply_move(mv)?))))
        .collect::<Result<Vec<(usize, f64)>>>()?;
    scored
        .into_iter()
        .max_set_by(|(_, value1), (_, value2)| value1.total_cmp(value2))
        .into_iter()
        .map(|(mv, _)| mv)
        .next()
        .ok_or(Error::NoLegalMove)
}
