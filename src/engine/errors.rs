use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId};

/// Сущность, которую не удалось найти.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Entity {
    Table(TableId),
    Player(PlayerId),
    Match(MatchId),
    Participant(ParticipantId),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Table(id) => write!(f, "стол {id}"),
            Entity::Player(id) => write!(f, "игрок {id}"),
            Entity::Match(id) => write!(f, "матч {id}"),
            Entity::Participant(id) => write!(f, "участник {id}"),
        }
    }
}

/// Ошибки движка покера.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Недопустимое действие: {0}")]
    InvalidAction(&'static str),

    #[error("Недостаточно фишек: нужно {needed}, есть {available}")]
    InsufficientStack { needed: Chips, available: Chips },

    #[error("Не найден {0}")]
    NotFound(Entity),

    #[error("Ошибка внешнего сервиса: {0}")]
    ExternalServiceFailure(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
