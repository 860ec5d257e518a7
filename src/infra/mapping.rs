//! Перевод журнала команды (`HandHistory`) во внешние эффекты:
//! события для клиентов и денежные факты для кошелька.

use std::collections::BTreeMap;

use crate::api::dto::TableEvent;
use crate::api::queries::{build_match_view, build_participant_view, build_players_dto};
use crate::domain::arena::TableArena;
use crate::domain::hand::Street;
use crate::domain::{MatchId, PlayerId};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::eval::{highlight_for_player, Highlight};
use crate::infra::ids::IdGenerator;
use crate::infra::ledger::{LedgerFact, LedgerFactKind};

/// Денежные факты: бай-ин, кэш-аут и итоги завершённых матчей.
pub fn ledger_facts(arena: &TableArena, history: &HandHistory, ids: &IdGenerator) -> Vec<LedgerFact> {
    let table_id = arena.table.id;
    let mut facts = Vec::new();
    let mut push = |kind: LedgerFactKind| {
        facts.push(LedgerFact {
            id: ids.next_fact_id(),
            table_id,
            kind,
        })
    };

    for event in history.kinds() {
        match event {
            HandEventKind::PlayerJoined {
                user_id, buy_in, ..
            } => push(LedgerFactKind::BuyIn {
                user_id: user_id.clone(),
                amount: *buy_in,
            }),
            HandEventKind::PlayerLeft { user_id, stack, .. } => push(LedgerFactKind::CashOut {
                user_id: user_id.clone(),
                amount: *stack,
            }),
            HandEventKind::HandFinished { match_id, .. } => {
                for outcome in arena.outcomes_of(*match_id) {
                    push(LedgerFactKind::PayoutOccurred(outcome.clone()));
                }
            }
            _ => {}
        }
    }
    facts
}

/// События для клиентов стола. Последним всегда идёт снимок игроков.
pub fn table_events(arena: &TableArena, history: &HandHistory) -> Vec<TableEvent> {
    let nobody = |_: PlayerId| false;
    let mut events = Vec::new();

    for event in history.kinds() {
        match event {
            HandEventKind::MatchStarted { match_id, .. } => {
                events.extend(highlight_event(arena, *match_id, Street::Preflop));
            }
            HandEventKind::StreetChanged { street } => {
                if let Some(m) = arena.current_match() {
                    events.extend(highlight_event(arena, m.id, *street));
                }
            }
            HandEventKind::PlayerActed { participant_id, .. } => {
                if let Some(p) = arena.participant(*participant_id) {
                    events.push(TableEvent::ParticipantsUpdated {
                        participant: build_participant_view(p, false),
                    });
                }
            }
            HandEventKind::AutoFolded { player_id } => {
                events.push(TableEvent::info(format!(
                    "Player {player_id} is disconnected and folds"
                )));
            }
            HandEventKind::TurnChanged { player_id } => {
                if let Some(m) = arena.current_match() {
                    events.push(TableEvent::ChangeTurn {
                        match_view: build_match_view(arena, m, &nobody),
                        next_player_id: *player_id,
                    });
                }
            }
            HandEventKind::ShowdownReveal {
                player_id,
                hand_name,
                ..
            } => {
                events.push(TableEvent::info(format!("Player {player_id} shows {hand_name}")));
            }
            HandEventKind::PotAwarded {
                player_id,
                amount,
                pot_index,
            } => {
                let pot = if *pot_index == 0 {
                    "the main pot".to_string()
                } else {
                    format!("side pot {pot_index}")
                };
                events.push(TableEvent::info(format!(
                    "Player {player_id} wins {amount} from {pot}"
                )));
            }
            HandEventKind::HandShowed { player_id, cards } => {
                events.push(TableEvent::HandShowed {
                    player_id: *player_id,
                    cards: *cards,
                });
            }
            HandEventKind::PlayerLeft { player_id, .. } => {
                events.push(TableEvent::LeaveTable {
                    player_id: *player_id,
                });
            }
            _ => {}
        }
    }

    events.push(TableEvent::PlayersUpdated {
        players: build_players_dto(arena),
        match_view: arena
            .current_match()
            .map(|m| build_match_view(arena, m, &nobody)),
    });
    events
}

/// Подсветка лучших рук живых участников на заданной улице.
fn highlight_event(arena: &TableArena, match_id: MatchId, street: Street) -> Option<TableEvent> {
    let m = arena.match_by_id(match_id)?;
    let visible = &m.board[..street.visible_board_cards().min(m.board.len())];

    let per_player: BTreeMap<PlayerId, Highlight> = arena
        .participants_of(match_id)
        .into_iter()
        .filter(|p| !p.is_folded)
        .map(|p| (p.player_id, highlight_for_player(visible, p.hole_cards())))
        .collect();

    Some(TableEvent::HighlightCards {
        per_player,
        is_all_all_in: m.is_all_all_in,
    })
}
