//! Оценка силы покерных рук (Texas Hold'em).
//!
//! Основная функция:
//!   `evaluate_best_hand(cards) -> Option<EvaluatedHand>`
//! Сравнение рук – `compare_hands` с выбранным `TieBreakRule`.

pub mod evaluator;
pub mod hand_rank;
pub mod highlight;
pub mod lookup_tables;

pub use evaluator::evaluate_best_hand;
pub use hand_rank::{compare_hands, EvaluatedHand, HandCategory, HandStrength, TieBreakRule};
pub use highlight::{highlight_for_player, Highlight};
