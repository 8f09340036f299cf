use std::rc::Rc;
use yew::prelude::*;

use crate::command::GameCommand;
use crate::model::PlayerId;

/// Who this browser is playing as. Once active it stays active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Choosing { typing: String },
    Active { player_id: PlayerId },
}

impl Default for Session {
    fn default() -> Self {
        Session::Choosing {
            typing: String::new(),
        }
    }
}

pub enum SessionAction {
    Type(String),
    /// Pick a player that already exists on the server.
    Pick(PlayerId),
    /// Register the typed name as a new player.
    Register,
}

impl Session {
    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            Session::Active { player_id } => Some(player_id),
            Session::Choosing { .. } => None,
        }
    }

    /// The command a `Register` from this state would send, if any.
    pub fn registration(&self) -> Option<GameCommand> {
        match self {
            Session::Choosing { typing } => {
                let name = typing.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(GameCommand::RegisterPlayer {
                        player_id: PlayerId(name.to_string()),
                    })
                }
            }
            Session::Active { .. } => None,
        }
    }
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        if let Session::Active { .. } = *self {
            return self;
        }
        match action {
            SessionAction::Type(typing) => Rc::new(Session::Choosing { typing }),
            SessionAction::Pick(player_id) => {
                tracing::info!(player = %player_id, "playing as existing player");
                Rc::new(Session::Active { player_id })
            }
            SessionAction::Register => match self.registration() {
                Some(GameCommand::RegisterPlayer { player_id }) => {
                    tracing::info!(player = %player_id, "registered new player");
                    Rc::new(Session::Active { player_id })
                }
                _ => self,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(name: &str) -> Rc<Session> {
        Rc::new(Session::default()).reduce(SessionAction::Type(name.to_string()))
    }

    #[test]
    fn registering_adopts_the_trimmed_name_immediately() {
        let s = typed("  alice ");
        assert_eq!(
            s.registration(),
            Some(GameCommand::RegisterPlayer {
                player_id: PlayerId("alice".to_string())
            })
        );
        let s = s.reduce(SessionAction::Register);
        assert_eq!(s.player_id(), Some(&PlayerId("alice".to_string())));
    }

    #[test]
    fn blank_names_are_ignored() {
        let s = typed("   ");
        assert_eq!(s.registration(), None);
        let s = s.reduce(SessionAction::Register);
        assert!(matches!(*s, Session::Choosing { .. }));
    }

    #[test]
    fn an_active_session_never_goes_back() {
        let s = Rc::new(Session::default()).reduce(SessionAction::Pick(PlayerId("bob".to_string())));
        let s = s.reduce(SessionAction::Type("carol".to_string()));
        let s = s.reduce(SessionAction::Register);
        assert_eq!(s.player_id(), Some(&PlayerId("bob".to_string())));
        assert_eq!(s.registration(), None);
    }
}
