use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{MatchId, ParticipantId, PlayerId};

/// Последнее действие участника в раздаче.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LastAction {
    Fold,
    Check,
    Call,
    Raise,
    /// Рейз на половину банка.
    Half,
    /// Рейз на четверть банка.
    Quarter,
    /// Рейз на весь банк.
    Full,
    AllIn,
    Winner,
}

impl fmt::Display for LastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LastAction::Fold => "FOLD",
            LastAction::Check => "CHECK",
            LastAction::Call => "CALL",
            LastAction::Raise => "RAISE",
            LastAction::Half => "HALF",
            LastAction::Quarter => "QUARTER",
            LastAction::Full => "FULL",
            LastAction::AllIn => "ALLIN",
            LastAction::Winner => "WINNER",
        };
        f.write_str(s)
    }
}

/// Участник матча: запись игрока в конкретной раздаче.
///
/// Ссылается на игрока только по id и не владеет им.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    /// Карманные карты выдаются один раз при раздаче.
    pub card_one: Card,
    pub card_two: Card,
    /// Ставка на текущей улице.
    pub bet: Chips,
    /// Всё, что участник вложил в раздачу; только растёт.
    pub total_bet: Chips,
    pub is_folded: bool,
    pub is_checked: bool,
    pub is_all_in: bool,
    pub last_action: Option<LastAction>,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        match_id: MatchId,
        player_id: PlayerId,
        hole: (Card, Card),
    ) -> Self {
        Self {
            id,
            match_id,
            player_id,
            card_one: hole.0,
            card_two: hole.1,
            bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            is_folded: false,
            is_checked: false,
            is_all_in: false,
            last_action: None,
        }
    }

    pub fn hole_cards(&self) -> [Card; 2] {
        [self.card_one, self.card_two]
    }

    /// Внести фишки в текущую улицу (bet и total_bet растут вместе).
    pub fn commit(&mut self, amount: Chips) {
        self.bet += amount;
        self.total_bet += amount;
    }

    /// Внести фишки в банк мимо ставки улицы (анте).
    pub fn commit_dead(&mut self, amount: Chips) {
        self.total_bet += amount;
    }

    /// Сбросить состояние улицы при переходе на следующую.
    pub fn reset_for_street(&mut self) {
        if self.is_all_in {
            return;
        }
        self.bet = Chips::ZERO;
        self.is_checked = false;
        self.last_action = None;
    }
}
