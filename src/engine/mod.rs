//! Покерный движок кэш-стола: ставки, очередь хода, улицы, сайд-поты, шоудаун.
//!
//! Все операции работают над `TableArena` одного стола:
//!   - `create_match` – запустить новый матч
//!   - `apply_action` – применить действие участника и передать ход
//!   - `join_table` / `leave_table` / `disconnect` – посадка и уход игроков

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod pot;
pub mod seating;
pub mod showdown;
pub mod side_pots;
pub mod turns;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind, RaiseKind};
pub use errors::{EngineError, Entity};
pub use game_loop::{
    apply_action, change_turn, create_match, end_hand, show_hand, ActionApplied, EngineSettings,
};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use pot::PotAllocation;
pub use seating::{disconnect, join_table, leave_next_match, leave_table};
pub use side_pots::{allocate_pots, compute_side_pots};

/// Источник случайности для перемешивания колоды.
/// Реализации – в infra (`SystemRng`, `DeterministicRng`, `TableRng`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
