//! One table: a lobby until the host starts the game, then the single
//! authoritative [`GameState`] every message is applied to in turn.

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::game_transition::{derive_round_transitions, RoundTransition};
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{GameState, PlayResult};
use crate::domain::{
    add_player, bidding, deal_all, deal_card, end_bottom_phase, make_play, redeal,
    remove_player, reset, start_round, update_settings, PlayerId, PlayerProfile, Settings,
};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::table::protocol::{ClientMsg, LobbyMember, Outbound, ServerMsg, PROTOCOL_VERSION};

#[derive(Debug, Clone)]
pub struct TableSession {
    id: Uuid,
    name: String,
    seed: u64,
    /// Settings the game starts with; `num_players` follows the lobby.
    settings: Settings,
    host: Option<PlayerId>,
    lobby: Vec<(PlayerId, PlayerProfile)>,
    game: Option<GameState>,
    /// Bumped on every accepted change to the game.
    version: u64,
}

impl TableSession {
    pub fn new(id: Uuid, name: impl Into<String>, settings: Settings, seed: u64) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
            settings,
            host: None,
            lobby: Vec::new(),
            game: None,
            version: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> Option<&PlayerId> {
        self.host.as_ref()
    }

    pub fn in_lobby(&self) -> bool {
        self.game.is_none()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// `viewer`'s projection of the game, `None` while in the lobby.
    pub fn view(&self, viewer: Option<&PlayerId>) -> Option<GameSnapshot> {
        self.game.as_ref().map(|g| snapshot(g, viewer))
    }

    pub fn members(&self) -> Vec<LobbyMember> {
        let entries: Vec<(&PlayerId, &PlayerProfile)> = match &self.game {
            Some(game) => game.players.iter().map(|p| (&p.id, &p.profile)).collect(),
            None => self.lobby.iter().map(|(id, profile)| (id, profile)).collect(),
        };
        entries
            .into_iter()
            .map(|(id, profile)| LobbyMember {
                player_id: id.clone(),
                name: profile.name.clone(),
                avatar_uri: profile.avatar_uri.clone(),
            })
            .collect()
    }

    fn is_member(&self, who: &PlayerId) -> bool {
        match &self.game {
            Some(game) => game.players.iter().any(|p| &p.id == who),
            None => self.lobby.iter().any(|(id, _)| id == who),
        }
    }

    /// Apply `msg` from `who`, answering rejections with an error to `who`.
    pub fn handle_or_reject(&mut self, who: &PlayerId, msg: ClientMsg) -> Vec<Outbound> {
        match self.handle(who, msg) {
            Ok(out) => out,
            Err(err) => {
                debug!(
                    table_id = %self.id,
                    player_id = %who,
                    code = %err.code(),
                    error = %err,
                    "Message rejected"
                );
                vec![Outbound::to(
                    who,
                    ServerMsg::Error {
                        code: err.code(),
                        message: err.detail().to_string(),
                    },
                )]
            }
        }
    }

    /// Apply `msg` from `who`. A rejected message leaves the table unchanged.
    pub fn handle(&mut self, who: &PlayerId, msg: ClientMsg) -> Result<Vec<Outbound>, AppError> {
        match msg {
            ClientMsg::Hello { protocol } => {
                if protocol != PROTOCOL_VERSION {
                    return Err(AppError::bad_request(format!(
                        "Unsupported protocol {protocol}, expected {PROTOCOL_VERSION}"
                    )));
                }
                let mut out = vec![Outbound::to(
                    who,
                    ServerMsg::HelloAck {
                        protocol,
                        table_id: self.id,
                        player_id: who.clone(),
                    },
                )];
                out.push(Outbound::to(who, self.lobby_msg()));
                if let Some(game) = self.view(Some(who)) {
                    out.push(Outbound::to(
                        who,
                        ServerMsg::GameState {
                            table_id: self.id,
                            version: self.version,
                            game,
                        },
                    ));
                }
                Ok(out)
            }
            ClientMsg::Join { name, avatar_uri } => self.join(who, &name, avatar_uri),
            ClientMsg::Leave => self.leave(who),
            ClientMsg::UpdatePlayer { updates } => {
                if let Some(game) = &mut self.game {
                    let before = game.clone();
                    game.player_mut(who)?.apply_updates(&updates)?;
                    return Ok(self.publish(&before, Vec::new()));
                }
                let (_, profile) = self
                    .lobby
                    .iter_mut()
                    .find(|(id, _)| id == who)
                    .ok_or_else(|| not_seated(who))?;
                profile.apply(&updates)?;
                Ok(vec![Outbound::all(self.lobby_msg())])
            }
            ClientMsg::UpdateSettings { update } => {
                self.require_host(who, "change settings")?;
                match &mut self.game {
                    Some(game) => {
                        let before = game.clone();
                        update_settings(game, update)?;
                        self.settings = game.settings.clone();
                        Ok(self.publish(&before, Vec::new()))
                    }
                    None => {
                        let mut next = self.settings.clone();
                        next.apply(update)?;
                        self.settings = next;
                        info!(table_id = %self.id, settings = ?self.settings, "Lobby settings updated");
                        Ok(vec![Outbound::all(self.lobby_msg())])
                    }
                }
            }
            ClientMsg::StartGame => self.start_game(who),
            ClientMsg::ResetGame => {
                self.require_host(who, "reset the game")?;
                self.apply(who, |game| reset(game).map(|_| Vec::new()))
            }
            ClientMsg::StartRound => self.apply(who, |game| start_round(game).map(|_| Vec::new())),
            ClientMsg::DealCard => self.apply(who, |game| deal_card(game).map(|_| Vec::new())),
            ClientMsg::DealAll => self.apply(who, |game| deal_all(game).map(|_| Vec::new())),
            ClientMsg::Redeal => self.apply(who, |game| redeal(game).map(|_| Vec::new())),
            ClientMsg::Declare { card, amount } => self.apply(who, |game| {
                bidding::declare(game, who, card, amount).map(|_| Vec::new())
            }),
            ClientMsg::EndDealPhase => {
                let table_id = self.id;
                self.apply(who, |game| {
                    let result = bidding::end_deal_phase(game)?;
                    Ok(vec![Outbound::to(
                        &result.dealer,
                        ServerMsg::Bottom {
                            table_id,
                            cards: result.bottom,
                        },
                    )])
                })
            }
            ClientMsg::EndBottomPhase {
                bottom,
                friend_calls,
            } => self.apply(who, |game| {
                end_bottom_phase(game, who, bottom, friend_calls).map(|_| Vec::new())
            }),
            ClientMsg::MakePlay { play } => {
                let table_id = self.id;
                self.apply(who, |game| match make_play(game, who, &play)? {
                    PlayResult::ForcedPlay { forced } => Ok(vec![Outbound::to(
                        who,
                        ServerMsg::ThrowCutDown {
                            table_id,
                            played: forced.cards(),
                        },
                    )]),
                    _ => Ok(Vec::new()),
                })
            }
        }
    }

    fn join(
        &mut self,
        who: &PlayerId,
        name: &str,
        avatar_uri: Option<String>,
    ) -> Result<Vec<Outbound>, AppError> {
        if self.is_member(who) {
            return Err(
                DomainError::conflict(ConflictKind::SeatTaken, format!("{who} already joined"))
                    .into(),
            );
        }
        let profile = PlayerProfile::new(name, avatar_uri)?;
        let before = match &mut self.game {
            Some(game) => {
                let before = game.clone();
                add_player(game, who.clone(), profile)?;
                self.settings = game.settings.clone();
                Some(before)
            }
            None => {
                self.lobby.push((who.clone(), profile));
                None
            }
        };
        if self.host.is_none() {
            self.host = Some(who.clone());
        }
        info!(table_id = %self.id, player_id = %who, "Player joined table");

        let mut out = vec![Outbound::all(self.lobby_msg())];
        if let Some(before) = before {
            out.extend(self.publish(&before, Vec::new()));
        }
        Ok(out)
    }

    fn leave(&mut self, who: &PlayerId) -> Result<Vec<Outbound>, AppError> {
        let mut out = Vec::new();
        match &mut self.game {
            Some(game) => {
                let before = game.clone();
                remove_player(game, who)?;
                self.settings = game.settings.clone();
                out.extend(self.publish(&before, Vec::new()));
            }
            None => {
                let idx = self
                    .lobby
                    .iter()
                    .position(|(id, _)| id == who)
                    .ok_or_else(|| not_seated(who))?;
                self.lobby.remove(idx);
            }
        }
        if self.host.as_ref() == Some(who) {
            self.host = self.members().first().map(|m| m.player_id.clone());
        }
        info!(table_id = %self.id, player_id = %who, host = ?self.host, "Player left table");
        out.insert(0, Outbound::all(self.lobby_msg()));
        Ok(out)
    }

    fn start_game(&mut self, who: &PlayerId) -> Result<Vec<Outbound>, AppError> {
        self.require_host(who, "start the game")?;
        if self.game.is_some() {
            return Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "Game already started",
            )
            .into());
        }
        let mut settings = self.settings.clone();
        settings.num_players = u8::try_from(self.lobby.len())
            .map_err(|_| DomainError::conflict(ConflictKind::TableFull, "Too many players"))?;
        let game = GameState::new(settings, self.lobby.clone(), self.seed)?;
        let before = game.clone();
        self.settings = game.settings.clone();
        self.game = Some(game);
        self.lobby.clear();
        info!(table_id = %self.id, players = self.members().len(), "Game started");

        let mut out = vec![Outbound::all(self.lobby_msg())];
        out.extend(self.publish(&before, Vec::new()));
        Ok(out)
    }

    /// Run an engine operation against the game and publish the outcome.
    fn apply<F>(&mut self, who: &PlayerId, op: F) -> Result<Vec<Outbound>, AppError>
    where
        F: FnOnce(&mut GameState) -> Result<Vec<Outbound>, DomainError>,
    {
        if !self.is_member(who) {
            return Err(not_seated(who).into());
        }
        let game = self.game.as_mut().ok_or_else(|| {
            DomainError::validation(ValidationKind::WrongPhase, "Game has not started")
        })?;
        let before = game.clone();
        let extra = op(game)?;
        Ok(self.publish(&before, extra))
    }

    /// Bump the version and fan out transitions plus each seat's own view.
    fn publish(&mut self, before: &GameState, extra: Vec<Outbound>) -> Vec<Outbound> {
        let Some(game) = &self.game else {
            return extra;
        };
        self.version += 1;
        let transitions = derive_round_transitions(before, game);
        let mut out = Vec::new();
        if !transitions.is_empty() {
            out.push(Outbound::all(ServerMsg::Transitions {
                table_id: self.id,
                version: self.version,
                transitions: transitions.clone(),
            }));
        }
        out.extend(extra);
        for player in &game.players {
            out.push(Outbound::to(
                &player.id,
                ServerMsg::GameState {
                    table_id: self.id,
                    version: self.version,
                    game: snapshot(game, Some(&player.id)),
                },
            ));
        }
        for t in &transitions {
            if let RoundTransition::TurnBecame { player_id } = t {
                out.push(Outbound::to(
                    player_id,
                    ServerMsg::YourTurn {
                        table_id: self.id,
                        version: self.version,
                    },
                ));
            }
        }
        out
    }

    fn lobby_msg(&self) -> ServerMsg {
        ServerMsg::Lobby {
            table_id: self.id,
            host: self.host.clone(),
            members: self.members(),
        }
    }

    fn require_host(&self, who: &PlayerId, action: &str) -> Result<(), AppError> {
        if self.host.as_ref() != Some(who) {
            return Err(AppError::forbidden(format!("Only the host may {action}")));
        }
        Ok(())
    }
}

fn not_seated(who: &PlayerId) -> DomainError {
    DomainError::not_found(NotFoundKind::Player, format!("{who} is not at this table"))
}
