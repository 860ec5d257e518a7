use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::TableConfig;
use crate::domain::{ConnectionId, ParticipantId, PlayerId, TableId, UserId};
use crate::engine::actions::{PlayerAction, RaiseKind};

/// Команда верхнего уровня, как она приходит от клиента.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Создать новый кэш-стол.
    CreateTable(TableConfig),

    /// Операция над конкретным столом.
    Table {
        table_id: TableId,
        command: TableCommand,
    },
}

impl Command {
    pub fn for_table(table_id: TableId, command: TableCommand) -> Self {
        Command::Table { table_id, command }
    }

    /// Разобрать команду из JSON.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Команды, которые относятся к существующему столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableCommand {
    /// Сесть за стол с бай-ином.
    Join {
        user_id: UserId,
        buy_in: Chips,
        connection: Option<ConnectionId>,
    },

    /// Встать из-за стола сейчас.
    Leave { player_id: PlayerId },

    /// Встать после текущей раздачи.
    LeaveNextMatch { player_id: PlayerId },

    Disconnect { player_id: PlayerId },

    /// Запланировать следующий матч через `delay_ms`.
    RequestNextMatch { delay_ms: u64 },

    /// Отменить запланированный старт.
    CancelNextMatch,

    /// Начать матч немедленно.
    CreateMatch,

    Fold { participant_id: ParticipantId },

    Check { participant_id: ParticipantId },

    Call { participant_id: ParticipantId },

    Raise {
        participant_id: ParticipantId,
        amount: Chips,
        kind: RaiseKind,
    },

    /// Показать карты после раздачи.
    ShowHand { player_id: PlayerId },
}

impl TableCommand {
    /// Игровое действие, если команда – ход в раздаче.
    pub fn as_player_action(&self) -> Option<PlayerAction> {
        match *self {
            TableCommand::Fold { participant_id } => Some(PlayerAction::fold(participant_id)),
            TableCommand::Check { participant_id } => Some(PlayerAction::check(participant_id)),
            TableCommand::Call { participant_id } => Some(PlayerAction::call(participant_id)),
            TableCommand::Raise {
                participant_id,
                amount,
                kind,
            } => Some(PlayerAction::raise(participant_id, amount, kind)),
            _ => None,
        }
    }
}
