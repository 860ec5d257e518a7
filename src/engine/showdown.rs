use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::hand::{Match, SidePot};
use crate::domain::outcome::{LoseRecord, Outcome, WinRecord};
use crate::domain::participant::LastAction;
use crate::domain::{MatchId, ParticipantId, PlayerId};
use crate::engine::errors::{Entity, EngineError};
use crate::engine::game_loop::EngineSettings;
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::pot::PotAllocation;
use crate::engine::side_pots::allocate_pots;
use crate::engine::turns::participant_seats_after;
use crate::eval::{compare_hands, evaluate_best_hand, EvaluatedHand};

/// Победа без вскрытия: весь банк за вычетом рейка единственному живому участнику.
/// Борд дальше не открывается.
pub fn award_uncontested(
    arena: &mut TableArena,
    match_id: MatchId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    let m = match_of(arena, match_id)?;
    let winner = m
        .participants
        .iter()
        .filter_map(|id| arena.participant(*id))
        .find(|p| !p.is_folded)
        .map(|p| (p.id, p.player_id))
        .ok_or(EngineError::Internal("no live participant to award"))?;

    let pot = m.pot;
    let rake = pot.fee(settings.service_fee_bps);
    let payout = pot - rake;

    credit(arena, winner.0, winner.1, payout)?;
    history.push(HandEventKind::PotAwarded {
        player_id: winner.1,
        amount: payout,
        pot_index: 0,
    });
    if !rake.is_zero() {
        history.push(HandEventKind::RakeTaken { amount: rake });
    }

    if let Some(m) = arena.matches.get_mut(&match_id) {
        m.main_pot = pot;
        m.rake = rake;
        m.winners.insert(winner.1);
    }

    tracing::info!(
        match_id,
        winner = winner.1,
        amount = payout.0,
        rake = rake.0,
        "pot awarded without showdown"
    );

    record_outcomes(arena, match_id, &BTreeMap::new());
    Ok(())
}

/// Шоудаун: разложить банк на поты, найти победителей каждого пота,
/// удержать рейк с главного пота и выплатить.
pub fn resolve_showdown(
    arena: &mut TableArena,
    match_id: MatchId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    let m = match_of(arena, match_id)?;
    let button_seat = arena
        .player(m.button_id)
        .map(|p| p.seat)
        .ok_or(EngineError::NotFound(Entity::Player(m.button_id)))?;

    let mut live: Vec<(ParticipantId, Chips)> = Vec::new();
    let mut folded: Vec<Chips> = Vec::new();
    let mut hands: BTreeMap<ParticipantId, EvaluatedHand> = BTreeMap::new();
    let mut owners: BTreeMap<ParticipantId, PlayerId> = BTreeMap::new();

    for participant in arena.participants_of(match_id) {
        owners.insert(participant.id, participant.player_id);
        if participant.is_folded {
            folded.push(participant.total_bet);
            continue;
        }
        live.push((participant.id, participant.total_bet));

        let mut cards = participant.hole_cards().to_vec();
        cards.extend_from_slice(&m.board);
        let hand = evaluate_best_hand(&cards)
            .ok_or(EngineError::Internal("showdown hand is not 5..=7 cards"))?;
        hands.insert(participant.id, hand);
    }

    let allocation: PotAllocation = allocate_pots(&live, &folded);
    if allocation.total() != m.pot {
        return Err(EngineError::Internal("pot allocation does not match the pot"));
    }

    let rake = allocation.main_pot.fee(settings.service_fee_bps);

    // Порядок выплаты нечётных фишек: по местам, начиная слева от кнопки.
    let seat_order = participant_seats_after(arena, m, button_seat);
    let seat_rank = |pid: &ParticipantId| -> usize {
        owners
            .get(pid)
            .and_then(|player_id| arena.player(*player_id))
            .and_then(|p| seat_order.iter().position(|s| *s == p.seat))
            .unwrap_or(usize::MAX)
    };

    let mut payouts: Vec<(ParticipantId, Chips, usize)> = Vec::new();
    for (pot_index, pot) in allocation.pots().into_iter().enumerate() {
        let amount = if pot_index == 0 {
            pot.amount - rake
        } else {
            pot.amount
        };
        if amount.is_zero() {
            continue;
        }

        let mut winners = pot_winners(&pot, &hands, settings);
        winners.sort_by_key(|pid| seat_rank(pid));
        let (share, remainder) = amount.split(winners.len());
        for (i, pid) in winners.iter().enumerate() {
            let odd = if (i as u64) < remainder.0 { Chips(1) } else { Chips::ZERO };
            payouts.push((*pid, share + odd, pot_index));
        }
    }

    let paid: Chips = payouts.iter().map(|(_, c, _)| *c).sum();
    if paid + rake != m.pot {
        return Err(EngineError::Internal("payouts do not conserve the pot"));
    }

    for (pid, hand) in &hands {
        if let Some(player_id) = owners.get(pid) {
            history.push(HandEventKind::ShowdownReveal {
                player_id: *player_id,
                hand_name: hand.name().to_string(),
                cards: hand.cards,
            });
        }
    }

    let mut winners: Vec<PlayerId> = Vec::new();
    for (pid, amount, pot_index) in payouts {
        let player_id = owners
            .get(&pid)
            .copied()
            .ok_or(EngineError::NotFound(Entity::Participant(pid)))?;
        credit(arena, pid, player_id, amount)?;
        winners.push(player_id);
        history.push(HandEventKind::PotAwarded {
            player_id,
            amount,
            pot_index,
        });
    }
    if !rake.is_zero() {
        history.push(HandEventKind::RakeTaken { amount: rake });
    }

    if let Some(m) = arena.matches.get_mut(&match_id) {
        m.main_pot = allocation.main_pot;
        m.side_pots = allocation.side_pots.clone();
        m.rake = rake;
        m.winners.extend(winners.iter().copied());
    }

    tracing::info!(
        match_id,
        main_pot = allocation.main_pot.0,
        side_pots = allocation.side_pots.len(),
        rake = rake.0,
        "showdown resolved"
    );

    let hand_names: BTreeMap<PlayerId, String> = hands
        .iter()
        .filter_map(|(pid, hand)| Some((*owners.get(pid)?, hand.name().to_string())))
        .collect();
    record_outcomes(arena, match_id, &hand_names);
    Ok(())
}

/// Лучшие руки среди претендентов на пот (несколько – делёж).
fn pot_winners(
    pot: &SidePot,
    hands: &BTreeMap<ParticipantId, EvaluatedHand>,
    settings: &EngineSettings,
) -> Vec<ParticipantId> {
    let mut best: Vec<ParticipantId> = Vec::new();
    let mut best_hand: Option<&EvaluatedHand> = None;

    for pid in &pot.eligible {
        let Some(hand) = hands.get(pid) else {
            continue;
        };
        match best_hand.map(|b| compare_hands(hand, b, settings.tie_break)) {
            None | Some(Ordering::Greater) => {
                best.clear();
                best.push(*pid);
                best_hand = Some(hand);
            }
            Some(Ordering::Equal) => best.push(*pid),
            Some(Ordering::Less) => {}
        }
    }
    best
}

fn credit(
    arena: &mut TableArena,
    participant_id: ParticipantId,
    player_id: PlayerId,
    amount: Chips,
) -> Result<(), EngineError> {
    let player = arena
        .player_mut(player_id)
        .ok_or(EngineError::NotFound(Entity::Player(player_id)))?;
    player.stack += amount;

    let participant = arena
        .participant_mut(participant_id)
        .ok_or(EngineError::NotFound(Entity::Participant(participant_id)))?;
    participant.last_action = Some(LastAction::Winner);
    Ok(())
}

/// Записи выигрыша/проигрыша по разнице стека с началом матча.
fn record_outcomes(arena: &mut TableArena, match_id: MatchId, hand_names: &BTreeMap<PlayerId, String>) {
    let records: Vec<Outcome> = arena
        .participants_of(match_id)
        .into_iter()
        .filter_map(|p| arena.player(p.player_id))
        .filter_map(|player| {
            let delta = player.stack.signed_delta(player.previous_stack);
            match delta.cmp(&0) {
                Ordering::Greater => Some(Outcome::Win(WinRecord {
                    player_id: player.id,
                    user_id: player.user_id.clone(),
                    match_id,
                    amount: player.stack - player.previous_stack,
                    hand_name: hand_names.get(&player.id).cloned(),
                })),
                Ordering::Less => Some(Outcome::Lose(LoseRecord {
                    player_id: player.id,
                    user_id: player.user_id.clone(),
                    match_id,
                    amount: player.previous_stack - player.stack,
                })),
                Ordering::Equal => None,
            }
        })
        .collect();
    arena.outcomes.extend(records);
}

fn match_of(arena: &TableArena, match_id: MatchId) -> Result<&Match, EngineError> {
    arena
        .match_by_id(match_id)
        .ok_or(EngineError::NotFound(Entity::Match(match_id)))
}
