use crate::domain::chips::Chips;
use crate::domain::hand::{Match, Street};
use crate::domain::participant::{LastAction, Participant};
use crate::domain::player::Player;
use crate::engine::actions::{PlayerActionKind, RaiseKind};
use crate::engine::errors::EngineError;

/// Проверенное действие: сколько фишек уходит в банк и какой станет ставка.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedAction {
    pub last_action: LastAction,
    /// Сколько фишек игрок докладывает этим действием.
    pub commit: Chips,
    /// Итоговая ставка участника на улице после действия.
    pub new_bet: Chips,
    pub is_fold: bool,
    pub is_check: bool,
}

impl ValidatedAction {
    fn passive(last_action: LastAction, bet: Chips) -> Self {
        Self {
            last_action,
            commit: Chips::ZERO,
            new_bet: bet,
            is_fold: last_action == LastAction::Fold,
            is_check: last_action == LastAction::Check,
        }
    }
}

/// Проверка, может ли участник выполнить действие при текущем состоянии матча.
///
/// Ничего не мутирует: все ошибки возвращаются до изменения состояния.
pub fn validate_action(
    m: &Match,
    participant: &Participant,
    player: &Player,
    action: &PlayerActionKind,
) -> Result<ValidatedAction, EngineError> {
    if m.settled || m.street() == Street::Showdown {
        return Err(EngineError::InvalidAction("hand is not accepting actions"));
    }
    if participant.match_id != m.id {
        return Err(EngineError::InvalidAction("participant is not in the current hand"));
    }
    if !player.is_turn {
        return Err(EngineError::InvalidAction("not this player's turn"));
    }
    if participant.is_folded || participant.is_all_in || !player.has_chips() {
        return Err(EngineError::InvalidAction("participant cannot act"));
    }

    let bet = participant.bet;
    let stack = player.stack;

    match *action {
        PlayerActionKind::Fold => Ok(ValidatedAction::passive(LastAction::Fold, bet)),

        PlayerActionKind::Check => {
            if bet == m.call_amount {
                Ok(ValidatedAction::passive(LastAction::Check, bet))
            } else {
                Err(EngineError::InvalidAction("cannot check facing a bet"))
            }
        }

        PlayerActionKind::Call => {
            if m.call_amount <= bet {
                return Err(EngineError::InvalidAction("nothing to call"));
            }
            let commit = (m.call_amount - bet).min(stack);
            let last_action = if commit == stack {
                LastAction::AllIn
            } else {
                LastAction::Call
            };
            Ok(ValidatedAction {
                last_action,
                commit,
                new_bet: bet + commit,
                is_fold: false,
                is_check: false,
            })
        }

        PlayerActionKind::Raise { amount, kind } => {
            let amount = if kind == RaiseKind::AllIn {
                bet + stack
            } else {
                amount
            };
            if amount <= bet {
                return Err(EngineError::InvalidAction("raise must increase the bet"));
            }

            let increment = amount - bet;
            if increment > stack {
                return Err(EngineError::InsufficientStack {
                    needed: increment,
                    available: stack,
                });
            }

            if kind != RaiseKind::AllIn {
                if amount <= m.call_amount {
                    return Err(EngineError::InvalidAction("raise must exceed the call amount"));
                }
                if amount < m.min_raise {
                    return Err(EngineError::InvalidAction("raise is below the minimum raise"));
                }
            }

            let last_action = if increment == stack {
                LastAction::AllIn
            } else {
                kind.into()
            };
            Ok(ValidatedAction {
                last_action,
                commit: increment,
                new_bet: amount,
                is_fold: false,
                is_check: false,
            })
        }
    }
}
