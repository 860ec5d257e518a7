use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId};
use crate::engine::{EngineError, Entity};

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("table {0} not found")]
    TableNotFound(TableId),

    #[error("player {0} is not at the table")]
    PlayerNotAtTable(PlayerId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("participant {0} not found")]
    ParticipantNotFound(ParticipantId),

    /// Команда не может быть выполнена в текущем состоянии.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("insufficient stack: needed {needed}, available {available}")]
    InsufficientStack { needed: Chips, available: Chips },

    /// Внешний сервис (кошелёк, хранилище) недоступен.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidAction(reason) => ApiError::InvalidCommand(reason.to_string()),
            EngineError::InsufficientStack { needed, available } => {
                ApiError::InsufficientStack { needed, available }
            }
            EngineError::NotFound(Entity::Table(id)) => ApiError::TableNotFound(id),
            EngineError::NotFound(Entity::Player(id)) => ApiError::PlayerNotAtTable(id),
            EngineError::NotFound(Entity::Match(id)) => ApiError::MatchNotFound(id),
            EngineError::NotFound(Entity::Participant(id)) => ApiError::ParticipantNotFound(id),
            EngineError::ExternalServiceFailure(msg) => ApiError::Unavailable(msg),
            EngineError::Internal(msg) => ApiError::Internal(msg.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
