use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

use super::evaluator::evaluate_best_hand;
use super::hand_rank::HandCategory;

/// Подсветка лучшей руки игрока для клиента: какие карты выделить и подпись.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Highlight {
    pub cards: Vec<Card>,
    pub label: String,
}

impl Highlight {
    fn high_card(top: Card) -> Self {
        Self {
            cards: Vec::new(),
            label: format!("{} high", top.rank),
        }
    }
}

/// Подсветка для игрока по открытой части борда.
///
/// Пока на борде меньше трёх карт, смотрим только на карманные:
/// карманная пара или старшая карта.
pub fn highlight_for_player(board_visible: &[Card], hole: [Card; 2]) -> Highlight {
    let [a, b] = hole;
    let top = if a.rank >= b.rank { a } else { b };

    if board_visible.len() < 3 {
        if a.rank == b.rank {
            return Highlight {
                cards: vec![a, b],
                label: HandCategory::OnePair.name().to_string(),
            };
        }
        return Highlight::high_card(top);
    }

    let mut cards = Vec::with_capacity(board_visible.len() + 2);
    cards.extend_from_slice(&hole);
    cards.extend_from_slice(board_visible);

    let Some(best) = evaluate_best_hand(&cards) else {
        return Highlight::high_card(top);
    };

    let highlighted = match best.category {
        HandCategory::HighCard => return Highlight::high_card(best.cards[0]),
        HandCategory::OnePair => best.cards[..2].to_vec(),
        HandCategory::TwoPair => best.cards[..4].to_vec(),
        HandCategory::ThreeOfAKind => best.cards[..3].to_vec(),
        HandCategory::FourOfAKind => best.cards[..4].to_vec(),
        _ => best.cards.to_vec(),
    };

    Highlight {
        cards: highlighted,
        label: best.name().to_string(),
    }
}
