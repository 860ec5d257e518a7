use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Колода карт. В домене – просто упорядоченный список карт.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

/// Результат раздачи колоды на матч: карманные карты, борд и сброс.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealtCards {
    /// По паре карт на каждого участника, в порядке запроса.
    pub hole_cards: Vec<(Card, Card)>,
    /// Все 5 карт борда сразу; открываются по улицам.
    pub board: Vec<Card>,
    /// Оставшиеся карты. В игре больше не участвуют.
    pub discard: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять n карт сверху.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let keep = self.cards.len().saturating_sub(n);
        let mut taken = self.cards.split_off(keep);
        taken.reverse();
        taken
    }

    /// Разложить колоду: сначала карманные карты (по две на участника),
    /// затем 5 карт борда, остаток – в сброс. Каждая карта используется ровно один раз.
    ///
    /// `None`, если карт не хватает (больше 23 участников).
    pub fn deal(mut self, participants: usize) -> Option<DealtCards> {
        if self.cards.len() < participants * 2 + 5 {
            return None;
        }

        let mut hole_cards = Vec::with_capacity(participants);
        for _ in 0..participants {
            let first = self.draw_one()?;
            let second = self.draw_one()?;
            hole_cards.push((first, second));
        }
        let board = self.draw_n(5);

        Some(DealtCards {
            hole_cards,
            board,
            discard: self.cards,
        })
    }
}
