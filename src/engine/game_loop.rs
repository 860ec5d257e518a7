use serde::{Deserialize, Serialize};

use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{Match, Street};
use crate::domain::participant::{LastAction, Participant};
use crate::domain::player::Player;
use crate::domain::table::SeatIndex;
use crate::domain::{MatchId, ParticipantId, PlayerId};
use crate::engine::actions::PlayerAction;
use crate::engine::betting::{apply_validated, post_chips, reset_for_street};
use crate::engine::errors::{Entity, EngineError};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::showdown::{award_uncontested, resolve_showdown};
use crate::engine::turns::{
    first_postflop_actor, first_preflop_actor, is_action_complete, is_all_checked_or_called,
    live_participants, next_actor,
};
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::TieBreakRule;
use crate::infra::ids::IdGenerator;

/// Параметры движка, которые приходят из конфига.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineSettings {
    /// Рейк в базисных пунктах (500 = 5%).
    pub service_fee_bps: u32,
    pub tie_break: TieBreakRule,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            service_fee_bps: 500,
            tie_break: TieBreakRule::Standard,
        }
    }
}

/// Результат принятого действия: участник и игрок сразу после него.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionApplied {
    pub participant: Participant,
    pub player: Player,
}

/// Что делать дальше после очередного действия.
enum Step {
    Turn(PlayerId),
    Finished,
}

/// Старт нового матча за столом:
/// - выбирает кнопку;
/// - раздаёт карманные карты и борд;
/// - собирает анте и блайнды;
/// - передаёт ход первому игроку (или сразу докладывает борд).
pub fn create_match<R: RandomSource>(
    arena: &mut TableArena,
    rng: &mut R,
    ids: &IdGenerator,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<MatchId, EngineError> {
    if !arena.table.hand_over {
        return Err(EngineError::InvalidAction("a hand is already in progress"));
    }

    let stakes = arena.table.stakes();
    let seated: Vec<(PlayerId, SeatIndex)> = arena
        .players_in_seat_order()
        .into_iter()
        .filter(|p| p.has_chips())
        .map(|p| (p.id, p.seat))
        .collect();
    if seated.len() < 2 {
        return Err(EngineError::InvalidAction("not enough players with chips"));
    }

    for player in arena.players.values_mut() {
        player.previous_stack = player.stack;
        player.is_turn = false;
    }

    // Кнопка: следующее подходящее место после прошлой кнопки.
    let button_idx = match arena.table.dealer_button {
        Some(prev) => seated.iter().position(|(_, s)| *s > prev).unwrap_or(0),
        None => 0,
    };
    let order: Vec<PlayerId> = seated[button_idx..]
        .iter()
        .chain(seated[..button_idx].iter())
        .map(|(id, _)| *id)
        .collect();
    let button_id = order[0];
    let button_seat = seated[button_idx].1;
    let (small_blind_id, big_blind_id) = if order.len() == 2 {
        (order[0], order[1])
    } else {
        (order[1], order[2])
    };

    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);
    let dealt = deck
        .deal(seated.len())
        .ok_or(EngineError::Internal("deck cannot serve all participants"))?;

    let match_id = ids.next_match_id();
    let mut participant_ids = Vec::with_capacity(seated.len());
    for ((player_id, _), hole) in seated.iter().zip(dealt.hole_cards) {
        let id = ids.next_participant_id();
        arena
            .participants
            .insert(id, Participant::new(id, match_id, *player_id, hole));
        participant_ids.push((*player_id, id));
    }

    let mut m = Match {
        id: match_id,
        table_id: arena.table.id,
        button_id,
        small_blind_id,
        big_blind_id,
        is_pre_flop: true,
        is_flop: false,
        is_turn: false,
        is_river: false,
        is_showdown: false,
        pot: Chips::ZERO,
        main_pot: Chips::ZERO,
        call_amount: Chips::ZERO,
        min_bet: stakes.min_bet,
        min_raise: Chips::ZERO,
        board: dealt.board,
        participants: participant_ids.iter().map(|(_, id)| *id).collect(),
        side_pots: Vec::new(),
        winners: Default::default(),
        is_all_all_in: false,
        rake: Chips::ZERO,
        settled: false,
    };

    history.push(HandEventKind::MatchStarted {
        match_id,
        button: button_id,
        small_blind: small_blind_id,
        big_blind: big_blind_id,
    });

    // Анте: только с тех, чей стек его покрывает.
    if !stakes.ante.is_zero() {
        for (player_id, participant_id) in &participant_ids {
            let (participant, player) =
                participant_and_player(arena, *participant_id, *player_id)?;
            if player.stack < stakes.ante {
                continue;
            }
            player.stack -= stakes.ante;
            participant.commit_dead(stakes.ante);
            if player.stack.is_zero() {
                participant.is_all_in = true;
            }
            m.pot += stakes.ante;
            history.push(HandEventKind::AntePosted {
                player_id: *player_id,
                amount: stakes.ante,
            });
        }
    }

    // Блайнды, не больше стека.
    for (blind_player, amount) in [
        (small_blind_id, stakes.small_blind),
        (big_blind_id, stakes.big_blind),
    ] {
        let participant_id = participant_ids
            .iter()
            .find(|(p, _)| *p == blind_player)
            .map(|(_, id)| *id)
            .ok_or(EngineError::Internal("blind is not a participant"))?;
        let (participant, player) = participant_and_player(arena, participant_id, blind_player)?;
        let posted = amount.min(player.stack);
        post_chips(&mut m, participant, player, posted);
        history.push(HandEventKind::BlindPosted {
            player_id: blind_player,
            amount: posted,
        });
    }

    m.call_amount = stakes.big_blind;
    m.min_raise = stakes.big_blind + stakes.big_blind;

    arena.table.dealer_button = Some(button_seat);
    arena.table.current_match = Some(match_id);
    arena.table.hand_over = false;
    arena.matches.insert(match_id, m);

    tracing::info!(
        table_id = arena.table.id,
        match_id,
        participants = seated.len(),
        button = button_id,
        "match created"
    );

    let m = current(arena, match_id)?;
    if is_action_complete(arena, m) {
        run_out_and_showdown(arena, match_id, settings, history)?;
        return Ok(match_id);
    }

    let first = first_preflop_actor(arena, m, button_seat)
        .ok_or(EngineError::Internal("no player can act after blinds"))?;
    pass_turn(arena, match_id, first, settings, history)?;

    Ok(match_id)
}

/// Применить действие участника и передать ход дальше.
pub fn apply_action(
    arena: &mut TableArena,
    action: &PlayerAction,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<ActionApplied, EngineError> {
    let match_id = arena
        .active_match()
        .map(|m| m.id)
        .ok_or(EngineError::InvalidAction("no hand in progress"))?;

    let player_id = arena
        .participant(action.participant_id)
        .map(|p| p.player_id)
        .ok_or(EngineError::NotFound(Entity::Participant(action.participant_id)))?;

    let TableArena {
        matches,
        participants,
        players,
        table,
        ..
    } = arena;
    let m = matches
        .get_mut(&match_id)
        .ok_or(EngineError::NotFound(Entity::Match(match_id)))?;
    let participant = participants
        .get_mut(&action.participant_id)
        .ok_or(EngineError::NotFound(Entity::Participant(action.participant_id)))?;
    let player = players
        .get_mut(&player_id)
        .ok_or(EngineError::NotFound(Entity::Player(player_id)))?;

    let validated = match validate_action(m, participant, player, &action.kind) {
        Ok(v) => v,
        Err(err) => {
            tracing::debug!(
                table_id = table.id,
                match_id,
                player_id,
                error = %err,
                "action rejected"
            );
            return Err(err);
        }
    };

    let committed = apply_validated(m, participant, player, validated);
    history.push(HandEventKind::PlayerActed {
        player_id,
        participant_id: participant.id,
        action: validated.last_action,
        committed,
        pot_after: m.pot,
    });

    let applied = ActionApplied {
        participant: participant.clone(),
        player: player.clone(),
    };
    let seat = player.seat;

    change_turn(arena, match_id, seat, settings, history)?;
    Ok(applied)
}

/// Решить, что происходит после действия игрока на месте `from_seat`.
pub fn change_turn(
    arena: &mut TableArena,
    match_id: MatchId,
    from_seat: SeatIndex,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    match next_step(arena, match_id, from_seat, settings, history)? {
        Step::Turn(next) => pass_turn(arena, match_id, next, settings, history),
        Step::Finished => Ok(()),
    }
}

fn next_step(
    arena: &mut TableArena,
    match_id: MatchId,
    from_seat: SeatIndex,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<Step, EngineError> {
    let m = current(arena, match_id)?;

    if live_participants(arena, m).len() <= 1 {
        award_uncontested(arena, match_id, settings, history)?;
        end_hand(arena, match_id, false, history)?;
        return Ok(Step::Finished);
    }

    if is_action_complete(arena, m) {
        run_out_and_showdown(arena, match_id, settings, history)?;
        return Ok(Step::Finished);
    }

    if is_all_checked_or_called(arena, m) {
        let street = advance_street(arena, match_id, history)?;
        if street == Street::Showdown {
            resolve_showdown(arena, match_id, settings, history)?;
            end_hand(arena, match_id, true, history)?;
            return Ok(Step::Finished);
        }

        let m = current(arena, match_id)?;
        let button_seat = seat_of(arena, m.button_id)?;
        let next = first_postflop_actor(arena, m, button_seat)
            .ok_or(EngineError::Internal("no player can act on the new street"))?;
        return Ok(Step::Turn(next));
    }

    next_actor(arena, m, from_seat)
        .map(Step::Turn)
        .ok_or(EngineError::Internal("no next actor"))
}

/// Отдать ход игроку. Отключившийся игрок сбрасывает карты автоматически,
/// и ход идёт дальше.
fn pass_turn(
    arena: &mut TableArena,
    match_id: MatchId,
    mut candidate: PlayerId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    loop {
        let player = arena
            .player_mut(candidate)
            .ok_or(EngineError::NotFound(Entity::Player(candidate)))?;

        if player.is_connected() {
            player.is_turn = true;
            history.push(HandEventKind::TurnChanged {
                player_id: candidate,
            });
            return Ok(());
        }

        let seat = player.seat;
        let participant_id = arena
            .participant_for_player(match_id, candidate)
            .map(|p| p.id)
            .ok_or(EngineError::Internal("turn holder is not a participant"))?;
        if let Some(p) = arena.participant_mut(participant_id) {
            p.is_folded = true;
            p.last_action = Some(LastAction::Fold);
        }
        history.push(HandEventKind::AutoFolded {
            player_id: candidate,
        });
        tracing::debug!(match_id, player_id = candidate, "disconnected player auto-folded");

        match next_step(arena, match_id, seat, settings, history)? {
            Step::Turn(next) => candidate = next,
            Step::Finished => return Ok(()),
        }
    }
}

/// Перейти на следующую улицу и сбросить ставки.
fn advance_street(
    arena: &mut TableArena,
    match_id: MatchId,
    history: &mut HandHistory,
) -> Result<Street, EngineError> {
    let big_blind = arena.table.stakes().big_blind;
    let TableArena {
        matches,
        participants,
        ..
    } = arena;
    let m = matches
        .get_mut(&match_id)
        .ok_or(EngineError::NotFound(Entity::Match(match_id)))?;
    let street = m
        .advance_street()
        .ok_or(EngineError::Internal("street advanced past showdown"))?;

    let ids: Vec<ParticipantId> = m.participants.clone();
    reset_for_street(
        m,
        big_blind,
        participants
            .iter_mut()
            .filter(|(id, _)| ids.contains(*id))
            .map(|(_, p)| p),
    );

    history.push(HandEventKind::StreetChanged { street });
    tracing::debug!(match_id, ?street, "street advanced");
    Ok(street)
}

/// Торговля закончилась: доложить оставшиеся улицы и вскрыться.
fn run_out_and_showdown(
    arena: &mut TableArena,
    match_id: MatchId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    if let Some(m) = arena.matches.get_mut(&match_id) {
        m.is_all_all_in = true;
    }
    history.push(HandEventKind::BoardRunOut);

    while current(arena, match_id)?.street() != Street::Showdown {
        advance_street(arena, match_id, history)?;
    }

    resolve_showdown(arena, match_id, settings, history)?;
    end_hand(arena, match_id, true, history)
}

/// Завершение матча: снять ходы, вернуть стол в ожидание,
/// отпустить игроков, которые уходят или отключились.
pub fn end_hand(
    arena: &mut TableArena,
    match_id: MatchId,
    showdown: bool,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    for player in arena.players.values_mut() {
        player.is_turn = false;
    }

    let m = arena
        .matches
        .get_mut(&match_id)
        .ok_or(EngineError::NotFound(Entity::Match(match_id)))?;
    m.settled = true;
    arena.table.hand_over = true;
    history.push(HandEventKind::HandFinished { match_id, showdown });

    let leaving: Vec<PlayerId> = arena
        .players
        .values()
        .filter(|p| p.leave_after_match || !p.is_connected())
        .map(|p| p.id)
        .collect();
    for player_id in leaving {
        release_player(arena, player_id, history);
    }

    tracing::info!(
        table_id = arena.table.id,
        match_id,
        showdown,
        "match finished"
    );
    Ok(())
}

/// Убрать игрока со стола; его стек уходит обратно в кошелёк.
pub fn release_player(arena: &mut TableArena, player_id: PlayerId, history: &mut HandHistory) {
    if let Some(player) = arena.remove_player(player_id) {
        history.push(HandEventKind::PlayerLeft {
            player_id,
            user_id: player.user_id,
            stack: player.stack,
        });
    }
}

/// Игрок показывает свои карты после окончания раздачи.
pub fn show_hand(
    arena: &TableArena,
    player_id: PlayerId,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    let m = arena
        .current_match()
        .ok_or(EngineError::InvalidAction("no hand to show"))?;
    if !m.settled {
        return Err(EngineError::InvalidAction("cards can be shown only after the hand"));
    }
    let participant = arena
        .participant_for_player(m.id, player_id)
        .ok_or(EngineError::InvalidAction("player did not take part in the hand"))?;

    history.push(HandEventKind::HandShowed {
        player_id,
        cards: participant.hole_cards(),
    });
    Ok(())
}

fn current(arena: &TableArena, match_id: MatchId) -> Result<&Match, EngineError> {
    arena
        .match_by_id(match_id)
        .ok_or(EngineError::NotFound(Entity::Match(match_id)))
}

fn seat_of(arena: &TableArena, player_id: PlayerId) -> Result<SeatIndex, EngineError> {
    arena
        .player(player_id)
        .map(|p| p.seat)
        .ok_or(EngineError::NotFound(Entity::Player(player_id)))
}

fn participant_and_player(
    arena: &mut TableArena,
    participant_id: ParticipantId,
    player_id: PlayerId,
) -> Result<(&mut Participant, &mut Player), EngineError> {
    let participant = arena
        .participants
        .get_mut(&participant_id)
        .ok_or(EngineError::NotFound(Entity::Participant(participant_id)))?;
    let player = arena
        .players
        .get_mut(&player_id)
        .ok_or(EngineError::NotFound(Entity::Player(player_id)))?;
    Ok((participant, player))
}
