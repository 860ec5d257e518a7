use crate::domain::arena::TableArena;
use crate::domain::hand::{Match, Street};
use crate::domain::participant::Participant;
use crate::domain::table::SeatIndex;
use crate::domain::PlayerId;

/// Участник вместе со стеком и местом его игрока.
#[derive(Clone, Copy, Debug)]
pub struct Seated<'a> {
    pub participant: &'a Participant,
    pub seat: SeatIndex,
    pub stack: crate::domain::Chips,
}

impl Seated<'_> {
    /// Может ещё действовать: не сбросил карты и есть фишки.
    pub fn can_act(&self) -> bool {
        !self.participant.is_folded && !self.stack.is_zero()
    }
}

/// Участники матча в порядке мест вместе с данными игроков.
pub fn seated_participants<'a>(arena: &'a TableArena, m: &Match) -> Vec<Seated<'a>> {
    m.participants
        .iter()
        .filter_map(|id| {
            let participant = arena.participant(*id)?;
            let player = arena.player(participant.player_id)?;
            Some(Seated {
                participant,
                seat: player.seat,
                stack: player.stack,
            })
        })
        .collect()
}

/// Участники, не сбросившие карты.
pub fn live_participants<'a>(arena: &'a TableArena, m: &Match) -> Vec<Seated<'a>> {
    seated_participants(arena, m)
        .into_iter()
        .filter(|s| !s.participant.is_folded)
        .collect()
}

/// Торговля окончена: действовать некому, или остался один с фишками
/// и ему ничего не нужно доставлять.
pub fn is_action_complete(arena: &TableArena, m: &Match) -> bool {
    let with_chips: Vec<Seated<'_>> = seated_participants(arena, m)
        .into_iter()
        .filter(Seated::can_act)
        .collect();

    match with_chips.as_slice() {
        [] => true,
        [only] => only.participant.bet >= m.call_amount,
        _ => false,
    }
}

/// Все, кто может действовать, уравняли ставку (или прочекали, если ставки нет).
///
/// Большой блайнд на префлопе сохраняет право хода, пока не действовал сам.
pub fn is_all_checked_or_called(arena: &TableArena, m: &Match) -> bool {
    let big_blind_amount = m.min_bet + m.min_bet;
    let pre_flop = m.street() == Street::Preflop;

    seated_participants(arena, m)
        .into_iter()
        .filter(Seated::can_act)
        .all(|s| {
            let p = s.participant;
            if pre_flop
                && p.player_id == m.big_blind_id
                && p.bet == big_blind_amount
                && !p.is_checked
                && p.last_action.is_none()
            {
                return false;
            }
            if m.call_amount.is_zero() {
                p.is_checked
            } else {
                p.bet == m.call_amount
            }
        })
}

/// Следующий, кто может действовать, после места `after` (по кругу).
/// Пустые места, не участники, сбросившие и игроки без фишек пропускаются.
pub fn next_actor(arena: &TableArena, m: &Match, after: SeatIndex) -> Option<PlayerId> {
    let seated = seated_participants(arena, m);
    let seats = arena.table.seats.len();
    (1..=seats)
        .map(|offset| ((after as usize + offset) % seats) as SeatIndex)
        .find_map(|seat| {
            seated
                .iter()
                .find(|s| s.seat == seat && s.can_act())
                .map(|s| s.participant.player_id)
        })
}

/// Места участников по кругу, начиная со следующего после `after`.
pub fn participant_seats_after(arena: &TableArena, m: &Match, after: SeatIndex) -> Vec<SeatIndex> {
    let mut seats: Vec<SeatIndex> = seated_participants(arena, m).iter().map(|s| s.seat).collect();
    seats.sort_unstable();
    let split = seats.iter().position(|s| *s > after).unwrap_or(seats.len());
    seats.rotate_left(split);
    seats
}

/// Первый ход на префлопе: кнопка, если участников не больше трёх,
/// иначе третье место после кнопки. Если там действовать некому – дальше по кругу.
pub fn first_preflop_actor(arena: &TableArena, m: &Match, button: SeatIndex) -> Option<PlayerId> {
    let order = participant_seats_after(arena, m, button);
    let start = if order.len() <= 3 {
        button
    } else {
        order[2]
    };
    actor_from(arena, m, start)
}

/// Первый ход после смены улицы: первое подходящее место после кнопки.
pub fn first_postflop_actor(arena: &TableArena, m: &Match, button: SeatIndex) -> Option<PlayerId> {
    next_actor(arena, m, button)
}

/// Подходящее место начиная с `seat` включительно.
fn actor_from(arena: &TableArena, m: &Match, seat: SeatIndex) -> Option<PlayerId> {
    let seats = arena.table.seats.len();
    if seats == 0 {
        return None;
    }
    let before = ((seat as usize + seats - 1) % seats) as SeatIndex;
    next_actor(arena, m, before)
}
