use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId};

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// Сколько карт борда видно на этой улице.
    pub const fn visible_board_cards(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }
}

/// Сайд-пот: часть банка, в которую участвуют только некоторые участники.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible: Vec<ParticipantId>,
}

/// Одна раздача (матч) за столом.
///
/// Флаги улиц только включаются и никогда не сбрасываются внутри матча;
/// текущая улица – самая поздняя включённая.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub table_id: TableId,

    pub button_id: PlayerId,
    pub small_blind_id: PlayerId,
    pub big_blind_id: PlayerId,

    pub is_pre_flop: bool,
    pub is_flop: bool,
    pub is_turn: bool,
    pub is_river: bool,
    pub is_showdown: bool,

    /// Сумма всех вложений в раздачу (до рейка).
    pub pot: Chips,
    /// Главный пот, считается на шоудауне.
    pub main_pot: Chips,
    /// Ставка, до которой нужно дотянуться на текущей улице.
    pub call_amount: Chips,
    pub min_bet: Chips,
    /// Минимальная сумма следующего рейза (целевая ставка).
    pub min_raise: Chips,

    /// Все 5 карт борда; открываются по улицам.
    pub board: Vec<Card>,
    /// Участники в порядке мест.
    pub participants: Vec<ParticipantId>,
    /// Сайд-поты, фиксируются один раз на шоудауне.
    pub side_pots: Vec<SidePot>,
    pub winners: BTreeSet<PlayerId>,

    /// Ставки закончились досрочно и борд докладывался без действий.
    pub is_all_all_in: bool,
    /// Удержанный рейк.
    pub rake: Chips,
    /// Раздача завершена и выплачена.
    pub settled: bool,
}

impl Match {
    /// Текущая улица по флагам.
    pub fn street(&self) -> Street {
        if self.is_showdown {
            Street::Showdown
        } else if self.is_river {
            Street::River
        } else if self.is_turn {
            Street::Turn
        } else if self.is_flop {
            Street::Flop
        } else {
            Street::Preflop
        }
    }

    /// Карты борда, которые уже открыты.
    pub fn visible_board(&self) -> &[Card] {
        let n = self.street().visible_board_cards().min(self.board.len());
        &self.board[..n]
    }

    /// Перейти на следующую улицу. Возвращает новую улицу,
    /// `None` – если уже шоудаун.
    pub fn advance_street(&mut self) -> Option<Street> {
        match self.street() {
            Street::Preflop => self.is_flop = true,
            Street::Flop => self.is_turn = true,
            Street::Turn => self.is_river = true,
            Street::River => self.is_showdown = true,
            Street::Showdown => return None,
        }
        Some(self.street())
    }

    pub fn is_in_progress(&self) -> bool {
        !self.settled
    }
}
