use learn_game::board::{GameState, Mark, Status};
use learn_game::config::Config;
use learn_game::error::Error;
use learn_game::players::{HumanPlayer, LearningAgent, RandomPlayer};
use learn_game::stats::GameStats;
use learn_game::{learn_game, play_game, play_interactive_game};
use std::io::Cursor;

fn trained_agents(episodes: usize) -> (LearningAgent, LearningAgent) {
    let config = Config {
        seed: Some(2024),
        ..Config::default()
    };
    let mut a1 = LearningAgent::from_config(Mark::X, &config).unwrap();
    let mut a2 = LearningAgent::from_config(Mark::O, &config).unwrap();
    learn_game(&mut a1, &mut a2, episodes).unwrap();
    (a1, a2)
}

#[test]
fn self_play_beats_a_random_opponent() {
    let (mut a1, _) = trained_agents(30_000);
    let mut random = RandomPlayer::new(Mark::O, 99);
    let mut stats = GameStats::new();
    for _ in 0..1000 {
        let state = play_game(&mut a1, &mut random, Mark::X).unwrap();
        stats.record(state.status());
    }
    println!("{stats}");
    assert!(
        stats.win_rate(Mark::X) > 0.9,
        "win rate {} after training",
        stats.win_rate(Mark::X)
    );
}

#[test]
fn training_stays_within_reachable_states() {
    let (a1, a2) = trained_agents(5_000);
    // Both openers are trained, so each non-terminal position can be keyed
    // once per mark to move.
    assert!(a1.value_table().len() <= 2 * 5478);
    assert_eq!(a1.value_table().len(), a2.value_table().len());
    let opening = GameState::new(Mark::X);
    let value = a1.value_table().get(&opening);
    assert!((0.0..=1.0).contains(&value));
}

#[test]
fn human_wins_against_untrained_agent() {
    // The untrained agent breaks ties on the lowest cell: X 0, 1, 3.
    let input = Cursor::new("5\n3\n7\n");
    let mut human = HumanPlayer::new("Oscar".to_owned(), Mark::O, input, Vec::new());
    let mut agent = LearningAgent::new(Mark::X, 0.5, 0.1).unwrap();
    let state = play_interactive_game(&mut agent, &mut human, Mark::X).unwrap();
    assert_eq!(state.status(), Status::Won(Mark::O));
    assert_eq!(state.winning_line(), Some([2, 4, 6]));
    let transcript = String::from_utf8(human.output().clone()).unwrap();
    assert!(transcript.ends_with("Congratulations, Oscar! You have won!\n"));
}

#[test]
fn closed_input_ends_the_interactive_game() {
    let mut human = HumanPlayer::new("Oscar".to_owned(), Mark::X, Cursor::new("5\n"), Vec::new());
    let mut agent = LearningAgent::new(Mark::O, 0.5, 0.1).unwrap();
    assert!(matches!(
        play_interactive_game(&mut agent, &mut human, Mark::X),
        Err(Error::InputClosed)
    ));
}
