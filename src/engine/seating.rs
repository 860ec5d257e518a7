use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::{ConnectionId, PlayerId, UserId};
use crate::engine::actions::PlayerAction;
use crate::engine::errors::{Entity, EngineError};
use crate::engine::game_loop::{apply_action, release_player, EngineSettings};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::infra::ids::IdGenerator;

/// Посадить игрока за стол с бай-ином. Занимает первое свободное место.
pub fn join_table(
    arena: &mut TableArena,
    ids: &IdGenerator,
    user_id: UserId,
    buy_in: Chips,
    connection: Option<ConnectionId>,
    history: &mut HandHistory,
) -> Result<PlayerId, EngineError> {
    if !arena.table.buy_in_allowed(buy_in) {
        return Err(EngineError::InvalidAction("buy-in is outside table limits"));
    }
    if arena.player_by_user(&user_id).is_some() {
        return Err(EngineError::InvalidAction("user is already seated at this table"));
    }
    let seat = arena
        .table
        .first_empty_seat()
        .ok_or(EngineError::InvalidAction("table is full"))?;

    let player_id = ids.next_player_id();
    let player = Player::new(
        player_id,
        user_id.clone(),
        arena.table.id,
        seat,
        buy_in,
        connection,
    );
    if !arena.seat_player(player) {
        return Err(EngineError::Internal("free seat was taken"));
    }

    history.push(HandEventKind::PlayerJoined {
        player_id,
        user_id,
        buy_in,
    });
    tracing::info!(table_id = arena.table.id, player_id, seat, buy_in = buy_in.0, "player joined");
    Ok(player_id)
}

/// Игрок встанет из-за стола после текущей раздачи.
pub fn leave_next_match(arena: &mut TableArena, player_id: PlayerId) -> Result<(), EngineError> {
    let player = arena
        .player_mut(player_id)
        .ok_or(EngineError::NotFound(Entity::Player(player_id)))?;
    player.leave_after_match = true;
    Ok(())
}

/// Игрок уходит из-за стола сейчас.
///
/// Вне раздачи (или если он в ней не участвует) стек сразу уходит в кошелёк.
/// В раздаче: сбрасывает карты, если ход его, иначе сбросит, когда ход дойдёт;
/// расчёт – в конце раздачи.
pub fn leave_table(
    arena: &mut TableArena,
    player_id: PlayerId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    leave_next_match(arena, player_id)?;
    release_or_fold(arena, player_id, settings, history)
}

/// Соединение игрока потеряно. Отключённый игрок тоже покидает стол
/// (сразу или в конце раздачи), но флаг ухода не ставится.
pub fn disconnect(
    arena: &mut TableArena,
    player_id: PlayerId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    if arena.player(player_id).is_none() {
        return Err(EngineError::NotFound(Entity::Player(player_id)));
    }
    tracing::debug!(player_id, "player disconnected");
    release_or_fold(arena, player_id, settings, history)
}

fn release_or_fold(
    arena: &mut TableArena,
    player_id: PlayerId,
    settings: &EngineSettings,
    history: &mut HandHistory,
) -> Result<(), EngineError> {
    // Отключаем в любом случае: автофолд срабатывает по отсутствию соединения.
    if let Some(player) = arena.player_mut(player_id) {
        player.connection = None;
    }

    // Участник текущей раздачи (даже сбросивший) остаётся до её конца.
    let in_hand = arena.active_match().and_then(|m| {
        arena
            .participant_for_player(m.id, player_id)
            .map(|p| p.id)
    });

    let Some(participant_id) = in_hand else {
        release_player(arena, player_id, history);
        return Ok(());
    };

    let on_turn = arena.player(player_id).map_or(false, |p| p.is_turn);
    if on_turn {
        apply_action(arena, &PlayerAction::fold(participant_id), settings, history)?;
    }
    Ok(())
}
