use core::cmp::Ordering;
use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank};

/// Категория покерной руки по силе (от слабой к сильной).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandCategory {
    /// Название комбинации, как его видит клиент.
    pub const fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "1 Pair",
            HandCategory::TwoPair => "2 Pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }

    /// Категории, где при равенстве сравниваются ранги даже в режиме Legacy.
    const fn legacy_compares_ranks(self) -> bool {
        matches!(
            self,
            HandCategory::HighCard
                | HandCategory::OnePair
                | HandCategory::TwoPair
                | HandCategory::ThreeOfAKind
                | HandCategory::Straight
        )
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Правило разрешения ничьих внутри одной категории.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakRule {
    /// Обычные покерные правила: ранги в порядке значимости для всех категорий.
    #[default]
    Standard,
    /// Совместимость со старыми столами: Flush и старше сравниваются только по категории.
    Legacy,
}

impl FromStr for TieBreakRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(TieBreakRule::Standard),
            "legacy" => Ok(TieBreakRule::Legacy),
            other => Err(format!("unknown tie-break rule: {other}")),
        }
    }
}

/// Лучшая 5-карточная рука игрока.
///
/// `cards` упорядочены по значимости: каре/сет/пары первыми (старшая пара
/// раньше младшей), затем кикеры по убыванию; стрит от старшей карты вниз.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluatedHand {
    pub category: HandCategory,
    pub cards: [Card; 5],
}

impl EvaluatedHand {
    pub fn name(&self) -> &'static str {
        self.category.name()
    }

    /// Ранги карт руки в порядке значимости.
    pub fn ranks(&self) -> [Rank; 5] {
        self.cards.map(|c| c.rank)
    }

    /// Упакованная сила руки для быстрых сравнений.
    ///
    /// Схема (u32): [категория:4][r0:4][r1:4][r2:4][r3:4][r4:4].
    /// Для wheel туз стоит последним, поэтому он сравнивается как пятёрка.
    pub fn strength(&self) -> HandStrength {
        let ranks = self.ranks();
        let value = ranks
            .iter()
            .fold(self.category as u32, |acc, r| (acc << 4) | r.value() as u32);
        HandStrength(value)
    }
}

/// Упакованная сила руки; больше = сильнее.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandStrength(pub u32);

/// Сравнить две оценённые руки по выбранному правилу.
pub fn compare_hands(a: &EvaluatedHand, b: &EvaluatedHand, rule: TieBreakRule) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => {}
        other => return other,
    }

    match rule {
        TieBreakRule::Standard => a.strength().cmp(&b.strength()),
        TieBreakRule::Legacy if a.category.legacy_compares_ranks() => {
            a.ranks().cmp(&b.ranks())
        }
        TieBreakRule::Legacy => Ordering::Equal,
    }
}
