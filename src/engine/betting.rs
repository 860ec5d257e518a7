use crate::domain::chips::Chips;
use crate::domain::hand::Match;
use crate::domain::participant::Participant;
use crate::domain::player::Player;
use crate::engine::validation::ValidatedAction;

/// Применить проверенное действие к матчу, участнику и игроку.
///
/// Возвращает, сколько фишек ушло в банк.
pub fn apply_validated(
    m: &mut Match,
    participant: &mut Participant,
    player: &mut Player,
    action: ValidatedAction,
) -> Chips {
    player.is_turn = false;
    participant.last_action = Some(action.last_action);

    if action.is_fold {
        participant.is_folded = true;
        return Chips::ZERO;
    }
    if action.is_check {
        participant.is_checked = true;
        return Chips::ZERO;
    }

    post_chips(m, participant, player, action.commit);
    raise_call_amount(m, action.new_bet);
    action.commit
}

/// Перенести фишки из стека игрока в ставку улицы и в банк.
/// Пустой стек означает all-in.
pub fn post_chips(m: &mut Match, participant: &mut Participant, player: &mut Player, amount: Chips) {
    let amount = amount.min(player.stack);
    player.stack -= amount;
    participant.commit(amount);
    m.pot += amount;
    if player.stack.is_zero() {
        participant.is_all_in = true;
    }
}

/// Поднять ставку для колла, если новая ставка её превышает.
///
/// Минимальный следующий рейз: прежняя ставка плюс удвоенное повышение
/// (или удвоенная ставка, если ставок ещё не было).
pub fn raise_call_amount(m: &mut Match, new_bet: Chips) {
    let prev = m.call_amount;
    if new_bet <= prev {
        return;
    }
    m.call_amount = new_bet;
    m.min_raise = if prev.is_zero() {
        Chips(new_bet.0.saturating_mul(2))
    } else {
        prev + Chips((new_bet - prev).0.saturating_mul(2))
    };
}

/// Сброс ставок при переходе на новую улицу.
pub fn reset_for_street<'a, I>(m: &mut Match, big_blind: Chips, participants: I)
where
    I: IntoIterator<Item = &'a mut Participant>,
{
    for p in participants {
        p.reset_for_street();
    }
    m.call_amount = Chips::ZERO;
    m.min_raise = big_blind;
}
