use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{MatchId, PlayerId, UserId};

/// Запись о выигрыше игрока в матче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinRecord {
    pub player_id: PlayerId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub amount: Chips,
    /// Название комбинации победителя; None при победе без вскрытия.
    pub hand_name: Option<String>,
}

/// Запись о проигрыше игрока в матче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoseRecord {
    pub player_id: PlayerId,
    pub user_id: UserId,
    pub match_id: MatchId,
    pub amount: Chips,
}

/// Итог матча для одного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Win(WinRecord),
    Lose(LoseRecord),
}

impl Outcome {
    pub fn player_id(&self) -> PlayerId {
        match self {
            Outcome::Win(w) => w.player_id,
            Outcome::Lose(l) => l.player_id,
        }
    }

    pub fn match_id(&self) -> MatchId {
        match self {
            Outcome::Win(w) => w.match_id,
            Outcome::Lose(l) => l.match_id,
        }
    }

    pub fn amount(&self) -> Chips {
        match self {
            Outcome::Win(w) => w.amount,
            Outcome::Lose(l) => l.amount,
        }
    }
}
