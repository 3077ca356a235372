use crate::domain::scoring::calculate_score;
use crate::domain::settings::Settings;
use crate::domain::state::{GameState, Phase, PlayResult};
use crate::domain::test_state_helpers::{cards, pid, play_state};
use crate::domain::tricks::make_play;
use crate::domain::Rank;

/// Four players, p1 declared and is the only friend, hands already played out.
fn finished_round() -> GameState {
    let mut s = play_state(Settings::default(), "2S", &["", "", "", ""]);
    s.current_turn = pid("p1");
    s
}

#[test]
fn defenders_win_at_cutoff() {
    let mut s = finished_round();
    // 40 + 20 = 60 points, 20 over a cutoff of 40
    s.players[1].points = cards("TC TD TH TS");
    s.players[2].points = cards("5C 5D 5H 5S");
    let result = calculate_score(&mut s).unwrap();

    assert_eq!(result.points, 60);
    assert_eq!(result.winners, vec![pid("p2"), pid("p3"), pid("p4")]);
    assert_eq!(result.level_change, 1);
    assert_eq!(s.players[1].rank, Rank::Three);
    assert_eq!(s.players[0].rank, Rank::Two);
    assert_eq!(s.winners.len(), 3);
    assert_eq!(s.last_round, Some(result));
}

#[test]
fn exactly_cutoff_goes_to_defenders_without_levels() {
    let mut s = finished_round();
    s.players[3].points = cards("TC TD KH KS");
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.points, 40);
    assert_eq!(result.winners.len(), 3);
    assert_eq!(result.level_change, 0);
}

#[test]
fn bottom_counts_only_when_last_trick_goes_to_defenders() {
    let mut s = finished_round();
    s.bottom = cards("5C KD");
    s.current_turn = pid("p2");
    let result = calculate_score(&mut s).unwrap();
    // 15 * bottom_multiplier 2
    assert_eq!(result.points, 30);
    assert_eq!(result.bottom, cards("5C KD"));

    let mut s = finished_round();
    s.bottom = cards("5C KD");
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.points, 0);
}

#[test]
fn unrevealed_friends_multiply_the_attack() {
    let mut s = finished_round();
    // team of two, only the declarer revealed: multiplier 2
    s.players[2].points = cards("TC");
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.winners, vec![pid("p1")]);
    // 2 * floor(|10 - 40| * 2 / 40) = 2
    assert_eq!(result.level_change, 2);
    assert_eq!(s.players[0].rank, Rank::Four);

    let mut s = finished_round();
    s.friends.insert(pid("p3"));
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.winners, vec![pid("p1"), pid("p3")]);
    assert_eq!(result.level_change, 3);
}

#[test]
fn friend_points_do_not_count() {
    let mut s = finished_round();
    s.friends.insert(pid("p3"));
    s.players[2].points = cards("TC TD TH TS KC");
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.points, 0);
}

#[test]
fn running_past_ace_wins_the_game() {
    let mut s = finished_round();
    s.players[0].rank = Rank::King;
    let result = calculate_score(&mut s).unwrap();
    assert_eq!(result.level_change, 6);
    assert_eq!(result.game_winners, vec![pid("p1")]);
    assert_eq!(s.players[0].rank, Rank::Ace);
}

#[test]
fn oversized_bottom_multiplier_saturates_instead_of_overflowing() {
    let mut s = play_state(Settings::default(), "2S", &["3H", "AH"]);
    s.settings.bottom_multiplier = u32::MAX;
    s.bottom = cards("KD");

    make_play(&mut s, &pid("p1"), &[cards("3H")]).unwrap();
    let result = make_play(&mut s, &pid("p2"), &[cards("AH")]).unwrap();

    let PlayResult::RoundComplete(result) = result else {
        panic!("expected the round to end, got {result:?}");
    };
    assert_eq!(result.points, u32::MAX);
    assert_eq!(result.winners, vec![pid("p2")]);
    assert_eq!(result.game_winners, vec![pid("p2")]);
    assert_eq!(s.phase, Phase::Score);
    assert_eq!(s.last_round, Some(result));
}
