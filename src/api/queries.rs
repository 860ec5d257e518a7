use serde::{Deserialize, Serialize};

use crate::domain::arena::TableArena;
use crate::domain::hand::Match;
use crate::domain::participant::Participant;
use crate::domain::player::Player;
use crate::domain::{PlayerId, TableId};

use super::dto::{MatchDto, ParticipantDto, PlayerDto, TableDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Query {
    /// Состояние стола; карты видны только `viewer`.
    GetTable {
        table_id: TableId,
        viewer: Option<PlayerId>,
    },

    /// Список столов (для лобби).
    ListTables,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Table(TableDto),
    Tables(Vec<TableDto>),
}

/// Сформировать DTO стола. `is_hero` решает, чьи карманные карты показать.
pub fn build_table_view(arena: &TableArena, is_hero: impl Fn(PlayerId) -> bool) -> TableDto {
    let table = &arena.table;
    let stakes = table.stakes();

    TableDto {
        table_id: table.id,
        name: table.name.clone(),
        min_buy_in: table.min_buy_in,
        max_buy_in: table.max_buy_in,
        small_blind: stakes.small_blind,
        big_blind: stakes.big_blind,
        ante: stakes.ante,
        max_players: table.max_players,
        dealer_button: table.dealer_button,
        hand_over: table.hand_over,
        players: build_players_dto(arena),
        current_match: arena
            .current_match()
            .map(|m| build_match_view(arena, m, &is_hero)),
    }
}

/// DTO матча с участниками.
pub fn build_match_view(
    arena: &TableArena,
    m: &Match,
    is_hero: &impl Fn(PlayerId) -> bool,
) -> MatchDto {
    let participants = arena
        .participants_of(m.id)
        .into_iter()
        .map(|p| build_participant_view(p, is_hero(p.player_id)))
        .collect();

    MatchDto {
        match_id: m.id,
        street: m.street(),
        button_id: m.button_id,
        small_blind_id: m.small_blind_id,
        big_blind_id: m.big_blind_id,
        pot: m.pot,
        main_pot: m.main_pot,
        call_amount: m.call_amount,
        min_raise: m.min_raise,
        board: m.visible_board().to_vec(),
        side_pots: m.side_pots.clone(),
        winners: m.winners.iter().copied().collect(),
        is_all_all_in: m.is_all_all_in,
        rake: m.rake,
        settled: m.settled,
        participants,
    }
}

pub fn build_participant_view(p: &Participant, reveal: bool) -> ParticipantDto {
    ParticipantDto {
        participant_id: p.id,
        player_id: p.player_id,
        bet: p.bet,
        total_bet: p.total_bet,
        is_folded: p.is_folded,
        is_checked: p.is_checked,
        is_all_in: p.is_all_in,
        last_action: p.last_action,
        hole_cards: reveal.then(|| p.hole_cards()),
    }
}

pub fn build_player_view(p: &Player) -> PlayerDto {
    PlayerDto {
        player_id: p.id,
        user_id: p.user_id.clone(),
        seat: p.seat,
        stack: p.stack,
        is_turn: p.is_turn,
        connected: p.is_connected(),
        leave_after_match: p.leave_after_match,
    }
}

/// Игроки в порядке мест.
pub fn build_players_dto(arena: &TableArena) -> Vec<PlayerDto> {
    arena
        .players_in_seat_order()
        .into_iter()
        .map(build_player_view)
        .collect()
}
