use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Street;
use crate::domain::participant::LastAction;
use crate::domain::{MatchId, ParticipantId, PlayerId, UserId};

/// Что произошло за столом в ходе одной команды.
///
/// Движок только дописывает события; актор стола превращает их
/// в сообщения клиентам и факты для кошелька.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandEventKind {
    /// Игрок сел за стол с бай-ином.
    PlayerJoined {
        player_id: PlayerId,
        user_id: UserId,
        buy_in: Chips,
    },

    /// Новый матч начался.
    MatchStarted {
        match_id: MatchId,
        button: PlayerId,
        small_blind: PlayerId,
        big_blind: PlayerId,
    },

    AntePosted {
        player_id: PlayerId,
        amount: Chips,
    },

    BlindPosted {
        player_id: PlayerId,
        amount: Chips,
    },

    /// Действие участника.
    PlayerActed {
        player_id: PlayerId,
        participant_id: ParticipantId,
        action: LastAction,
        committed: Chips,
        pot_after: Chips,
    },

    /// Отключившийся игрок сброшен автоматически.
    AutoFolded {
        player_id: PlayerId,
    },

    /// Ход перешёл к игроку.
    TurnChanged {
        player_id: PlayerId,
    },

    StreetChanged {
        street: Street,
    },

    /// Торговля закончилась, борд докладывается без действий.
    BoardRunOut,

    ShowdownReveal {
        player_id: PlayerId,
        hand_name: String,
        cards: [Card; 5],
    },

    /// Выплата из пота (0 – главный, дальше сайд-поты).
    PotAwarded {
        player_id: PlayerId,
        amount: Chips,
        pot_index: usize,
    },

    RakeTaken {
        amount: Chips,
    },

    HandFinished {
        match_id: MatchId,
        showdown: bool,
    },

    /// Игрок добровольно открыл карты после раздачи.
    HandShowed {
        player_id: PlayerId,
        cards: [Card; 2],
    },

    /// Игрок ушёл из-за стола, стек возвращается в кошелёк.
    PlayerLeft {
        player_id: PlayerId,
        user_id: UserId,
        stack: Chips,
    },
}

/// Событие с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Журнал событий одной команды.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    pub fn kinds(&self) -> impl Iterator<Item = &HandEventKind> {
        self.events.iter().map(|e| &e.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
