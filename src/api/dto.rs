use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{SidePot, Street};
use crate::domain::participant::LastAction;
use crate::domain::table::SeatIndex;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId, UserId};
use crate::eval::Highlight;

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerDto {
    pub player_id: PlayerId,
    pub user_id: UserId,
    pub seat: SeatIndex,
    pub stack: Chips,
    pub is_turn: bool,
    pub connected: bool,
    pub leave_after_match: bool,
}

/// DTO участника раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantDto {
    pub participant_id: ParticipantId,
    pub player_id: PlayerId,
    pub bet: Chips,
    pub total_bet: Chips,
    pub is_folded: bool,
    pub is_checked: bool,
    pub is_all_in: bool,
    pub last_action: Option<LastAction>,
    /// Карманные карты – только владельцу.
    pub hole_cards: Option<[Card; 2]>,
}

/// DTO матча. Борд – только открытая часть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchDto {
    pub match_id: MatchId,
    pub street: Street,
    pub button_id: PlayerId,
    pub small_blind_id: PlayerId,
    pub big_blind_id: PlayerId,
    pub pot: Chips,
    pub main_pot: Chips,
    pub call_amount: Chips,
    pub min_raise: Chips,
    pub board: Vec<Card>,
    pub side_pots: Vec<SidePot>,
    pub winners: Vec<PlayerId>,
    pub is_all_all_in: bool,
    pub rake: Chips,
    pub settled: bool,
    pub participants: Vec<ParticipantDto>,
}

/// DTO стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableDto {
    pub table_id: TableId,
    pub name: String,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub max_players: u8,
    pub dealer_button: Option<SeatIndex>,
    pub hand_over: bool,
    pub players: Vec<PlayerDto>,
    #[serde(rename = "match")]
    pub current_match: Option<MatchDto>,
}

/// Ответ на действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionOutcome {
    pub participant: ParticipantDto,
    pub player: PlayerDto,
    #[serde(rename = "match")]
    pub match_view: MatchDto,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Событие, которое рассылается всем клиентам стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum TableEvent {
    PlayersUpdated {
        players: Vec<PlayerDto>,
        #[serde(rename = "match")]
        match_view: Option<MatchDto>,
    },
    ParticipantsUpdated {
        participant: ParticipantDto,
    },
    ChangeTurn {
        #[serde(rename = "match")]
        match_view: MatchDto,
        next_player_id: PlayerId,
    },
    HighlightCards {
        per_player: BTreeMap<PlayerId, Highlight>,
        is_all_all_in: bool,
    },
    TableMessage {
        text: String,
        severity: Severity,
    },
    /// Скоро начнётся следующий матч (или старт отменён).
    NextMatchComing {
        is_coming: bool,
    },
    HandShowed {
        player_id: PlayerId,
        cards: [Card; 2],
    },
    LeaveTable {
        player_id: PlayerId,
    },
}

impl TableEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::PlayersUpdated { .. } => "players_updated",
            TableEvent::ParticipantsUpdated { .. } => "participants_updated",
            TableEvent::ChangeTurn { .. } => "change_turn",
            TableEvent::HighlightCards { .. } => "highlight_cards",
            TableEvent::TableMessage { .. } => "table_message",
            TableEvent::NextMatchComing { .. } => "next_match_coming",
            TableEvent::HandShowed { .. } => "hand_showed",
            TableEvent::LeaveTable { .. } => "leave_table",
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        TableEvent::TableMessage {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        TableEvent::TableMessage {
            text: text.into(),
            severity: Severity::Warning,
        }
    }

    /// JSON-представление для транспорта.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Успешный результат без доп.данных.
    Ok,

    TableCreated { table_id: TableId },

    Joined { player_id: PlayerId },

    MatchCreated { match_id: MatchId },

    /// Следующий матч запланирован (false – уже был запланирован).
    NextMatchScheduled { scheduled: bool },

    Action(ActionOutcome),

    Table(TableDto),
}
