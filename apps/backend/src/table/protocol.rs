use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::game_transition::RoundTransition;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::FriendCall;
use crate::domain::{Card, PlayerId, PlayerUpdate, SettingsUpdate};
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    Join {
        name: String,
        #[serde(default)]
        avatar_uri: Option<String>,
    },
    Leave,
    UpdatePlayer {
        updates: Vec<PlayerUpdate>,
    },
    UpdateSettings {
        update: SettingsUpdate,
    },
    /// Host only: leave the lobby and seat everyone who joined.
    StartGame,
    StartRound,
    DealCard,
    DealAll,
    Declare {
        card: Card,
        amount: u8,
    },
    EndDealPhase,
    Redeal,
    EndBottomPhase {
        bottom: Vec<Card>,
        friend_calls: Vec<FriendCall>,
    },
    /// One card group per unit.
    MakePlay {
        play: Vec<Vec<Card>>,
    },
    /// Host only: new game with the same seats.
    ResetGame,
}

/// One lobby entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyMember {
    pub player_id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        table_id: Uuid,
        player_id: PlayerId,
    },
    Lobby {
        table_id: Uuid,
        host: Option<PlayerId>,
        members: Vec<LobbyMember>,
    },
    /// The recipient's own view of the table after `version` changes.
    GameState {
        table_id: Uuid,
        version: u64,
        game: GameSnapshot,
    },
    Transitions {
        table_id: Uuid,
        version: u64,
        transitions: Vec<RoundTransition>,
    },
    /// Sent to the dealer only when dealing ends.
    Bottom {
        table_id: Uuid,
        cards: Vec<Card>,
    },
    /// Sent to a thrower whose throw was cut down to the unit an opponent could beat.
    ThrowCutDown {
        table_id: Uuid,
        played: Vec<Card>,
    },
    YourTurn {
        table_id: Uuid,
        version: u64,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

/// Who a [`ServerMsg`] is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerId),
    /// Every connected participant, seated or not.
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub msg: ServerMsg,
}

impl Outbound {
    pub fn to(player: &PlayerId, msg: ServerMsg) -> Self {
        Self {
            to: Recipient::Player(player.clone()),
            msg,
        }
    }

    pub fn all(msg: ServerMsg) -> Self {
        Self {
            to: Recipient::All,
            msg,
        }
    }
}
