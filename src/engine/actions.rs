use serde::{Deserialize, Serialize};

use crate::domain::participant::LastAction;
use crate::domain::{Chips, ParticipantId};

/// Разновидность рейза. Сумма всегда задаётся клиентом,
/// вид влияет на подпись действия (и на all-in).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RaiseKind {
    Raise,
    Half,
    Quarter,
    Full,
    /// Весь стек; сумма из запроса игнорируется.
    AllIn,
}

impl From<RaiseKind> for LastAction {
    fn from(kind: RaiseKind) -> Self {
        match kind {
            RaiseKind::Raise => LastAction::Raise,
            RaiseKind::Half => LastAction::Half,
            RaiseKind::Quarter => LastAction::Quarter,
            RaiseKind::Full => LastAction::Full,
            RaiseKind::AllIn => LastAction::AllIn,
        }
    }
}

/// Тип действия игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// `amount` – новая итоговая ставка участника на улице.
    Raise { amount: Chips, kind: RaiseKind },
}

/// Конкретное действие участника матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub participant_id: ParticipantId,
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn fold(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            kind: PlayerActionKind::Fold,
        }
    }

    pub fn check(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            kind: PlayerActionKind::Check,
        }
    }

    pub fn call(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            kind: PlayerActionKind::Call,
        }
    }

    pub fn raise(participant_id: ParticipantId, amount: Chips, kind: RaiseKind) -> Self {
        Self {
            participant_id,
            kind: PlayerActionKind::Raise { amount, kind },
        }
    }
}
