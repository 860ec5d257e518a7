use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::SeatIndex;
use crate::domain::{ConnectionId, PlayerId, TableId, UserId};

/// Игрок за кэш-столом. Создаётся при бай-ине, удаляется при уходе
/// (стек возвращается во внешний кошелёк).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Ссылка на внешний аккаунт (логин в кошельке).
    pub user_id: UserId,
    pub table_id: TableId,
    pub seat: SeatIndex,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Стек на начало последней раздачи – от него считаем выигрыш/проигрыш.
    pub previous_stack: Chips,
    pub is_turn: bool,
    /// Соединение клиента; None – игрок отвалился.
    pub connection: Option<ConnectionId>,
    /// Игрок попросил встать из-за стола после текущей раздачи.
    pub leave_after_match: bool,
}

impl Player {
    pub fn new(
        id: PlayerId,
        user_id: UserId,
        table_id: TableId,
        seat: SeatIndex,
        stack: Chips,
        connection: Option<ConnectionId>,
    ) -> Self {
        Self {
            id,
            user_id,
            table_id,
            seat,
            stack,
            previous_stack: stack,
            is_turn: false,
            connection,
            leave_after_match: false,
        }
    }

    pub fn has_chips(&self) -> bool {
        !self.stack.is_zero()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
}
