use uuid::Uuid;

use crate::domain::state::Phase;
use crate::domain::test_state_helpers::pid;
use crate::domain::{PlayerId, Settings};
use crate::errors::ErrorCode;
use crate::table::protocol::{ClientMsg, Outbound, Recipient, ServerMsg, PROTOCOL_VERSION};
use crate::table::session::TableSession;

fn join(name: &str) -> ClientMsg {
    ClientMsg::Join {
        name: name.into(),
        avatar_uri: None,
    }
}

fn error_code(out: &[Outbound]) -> Option<ErrorCode> {
    match out {
        [Outbound {
            msg: ServerMsg::Error { code, .. },
            ..
        }] => Some(*code),
        _ => None,
    }
}

/// A started four-player table (`p1` hosts).
fn started() -> TableSession {
    let mut table = TableSession::new(Uuid::new_v4(), "test", Settings::default(), 11);
    for i in 1..=4 {
        let id = pid(&format!("p{i}"));
        table.handle(&id, join(&format!("Player {i}"))).unwrap();
    }
    table.handle(&pid("p1"), ClientMsg::StartGame).unwrap();
    table
}

#[test]
fn first_joiner_hosts_and_hosting_passes_on() {
    let mut table = TableSession::new(Uuid::new_v4(), "t", Settings::default(), 1);
    table.handle(&pid("a"), join("Ann")).unwrap();
    table.handle(&pid("b"), join("Bo")).unwrap();
    assert_eq!(table.host(), Some(&pid("a")));

    let out = table.handle_or_reject(&pid("a"), join("Ann"));
    assert_eq!(error_code(&out), Some(ErrorCode::SeatTaken));

    table.handle(&pid("a"), ClientMsg::Leave).unwrap();
    assert_eq!(table.host(), Some(&pid("b")));
    assert_eq!(table.members().len(), 1);
}

#[test]
fn only_the_host_starts_and_needs_two_players() {
    let mut table = TableSession::new(Uuid::new_v4(), "t", Settings::default(), 1);
    table.handle(&pid("a"), join("Ann")).unwrap();
    let out = table.handle_or_reject(&pid("a"), ClientMsg::StartGame);
    assert_eq!(error_code(&out), Some(ErrorCode::InvalidSettings));

    table.handle(&pid("b"), join("Bo")).unwrap();
    let out = table.handle_or_reject(&pid("b"), ClientMsg::StartGame);
    assert_eq!(error_code(&out), Some(ErrorCode::Forbidden));
    assert!(table.in_lobby());

    table.handle(&pid("a"), ClientMsg::StartGame).unwrap();
    assert!(!table.in_lobby());
    assert_eq!(table.game().unwrap().settings.num_players, 2);
}

#[test]
fn blank_names_are_rejected() {
    let mut table = TableSession::new(Uuid::new_v4(), "t", Settings::default(), 1);
    let out = table.handle_or_reject(&pid("a"), join("   "));
    assert_eq!(error_code(&out), Some(ErrorCode::ValidationError));
    assert!(table.members().is_empty());
}

#[test]
fn hello_checks_protocol_version() {
    let mut table = started();
    let out = table.handle_or_reject(&pid("p1"), ClientMsg::Hello { protocol: 99 });
    assert_eq!(error_code(&out), Some(ErrorCode::BadRequest));

    let out = table
        .handle(
            &pid("p2"),
            ClientMsg::Hello {
                protocol: PROTOCOL_VERSION,
            },
        )
        .unwrap();
    assert!(matches!(out[0].msg, ServerMsg::HelloAck { .. }));
    assert!(out
        .iter()
        .any(|o| matches!(&o.msg, ServerMsg::GameState { game, .. } if game.viewer == Some(pid("p2")))));
}

#[test]
fn each_seat_gets_only_its_own_hand() {
    let mut table = started();
    let out = table.handle(&pid("p3"), ClientMsg::StartRound).unwrap();
    let out2 = table.handle(&pid("p3"), ClientMsg::DealAll).unwrap();
    assert!(table.version() >= 2);
    assert!(out.iter().any(|o| matches!(
        &o.msg,
        ServerMsg::Transitions { transitions, .. } if !transitions.is_empty()
    )));

    for o in &out2 {
        if let (Recipient::Player(to), ServerMsg::GameState { game, .. }) = (&o.to, &o.msg) {
            let seat = table.game().unwrap().seat_of(to).unwrap();
            assert_eq!(game.hand, table.game().unwrap().players[seat].hand);
            assert_eq!(game.viewer.as_ref(), Some(to));
        }
    }
}

#[test]
fn rejected_play_changes_nothing() {
    let mut table = started();
    table.handle(&pid("p1"), ClientMsg::StartRound).unwrap();
    let version = table.version();
    let before = table.game().cloned();

    let out = table.handle_or_reject(&pid("p2"), ClientMsg::EndDealPhase);
    assert_eq!(error_code(&out), Some(ErrorCode::DealingInProgress));
    let out = table.handle_or_reject(&pid("zz"), ClientMsg::DealCard);
    assert_eq!(error_code(&out), Some(ErrorCode::PlayerNotFound));

    assert_eq!(table.version(), version);
    assert_eq!(table.game().cloned(), before);
}

#[test]
fn bottom_goes_to_the_dealer_and_turns_are_announced() {
    let mut table = started();
    table.handle(&pid("p1"), ClientMsg::StartRound).unwrap();
    table.handle(&pid("p1"), ClientMsg::DealAll).unwrap();

    // Whoever holds a card of their rank declares it.
    let game = table.game().unwrap().clone();
    let declarer = game
        .players
        .iter()
        .find_map(|p| {
            p.hand
                .iter()
                .find(|c| c.rank() == Some(p.rank))
                .map(|c| (p.id.clone(), *c))
        });
    let Some((who, card)) = declarer else {
        // Nobody can declare: the table redeals instead.
        table.handle(&pid("p1"), ClientMsg::Redeal).unwrap();
        assert_eq!(table.game().unwrap().phase, Phase::Deal);
        return;
    };
    table
        .handle(&who, ClientMsg::Declare { card, amount: 1 })
        .unwrap();

    let out = table.handle(&pid("p4"), ClientMsg::EndDealPhase).unwrap();
    let bottoms: Vec<&Recipient> = out
        .iter()
        .filter(|o| matches!(o.msg, ServerMsg::Bottom { .. }))
        .map(|o| &o.to)
        .collect();
    assert_eq!(bottoms, vec![&Recipient::Player(who.clone())]);
    assert_eq!(table.game().unwrap().phase, Phase::Bottom);

    let turn: Vec<&PlayerId> = out
        .iter()
        .filter_map(|o| match (&o.to, &o.msg) {
            (Recipient::Player(id), ServerMsg::YourTurn { .. }) => Some(id),
            _ => None,
        })
        .collect();
    if table.game().unwrap().current_turn != game.current_turn {
        assert_eq!(turn, vec![&who]);
    }
}

#[test]
fn seats_change_only_between_rounds() {
    let mut table = started();
    table.handle(&pid("p1"), ClientMsg::StartRound).unwrap();
    let out = table.handle_or_reject(&pid("p5"), join("Late"));
    assert_eq!(error_code(&out), Some(ErrorCode::RoundInProgress));
    let out = table.handle_or_reject(&pid("p2"), ClientMsg::Leave);
    assert_eq!(error_code(&out), Some(ErrorCode::RoundInProgress));

    table.handle(&pid("p1"), ClientMsg::ResetGame).unwrap();
    table.handle(&pid("p5"), join("Late")).unwrap();
    assert_eq!(table.game().unwrap().players.len(), 5);
    assert_eq!(table.game().unwrap().settings.num_players, 5);
}
