use crate::domain::card::{Card, Rank, Suit};

use super::hand_rank::{EvaluatedHand, HandCategory};
use super::lookup_tables::{detect_straight, mask_of, straight_ranks};

/// Вычислить лучшую 5-карточную руку из 5–7 карт (карманные + борд).
///
/// Категории проверяются сверху вниз, от роял-флеша до старшей карты;
/// первая подошедшая и есть ответ. `None`, если карт меньше 5 или больше 7.
pub fn evaluate_best_hand(cards: &[Card]) -> Option<EvaluatedHand> {
    if !(5..=7).contains(&cards.len()) {
        return None;
    }

    let mut sorted: Vec<Card> = cards.to_vec();
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank).then_with(|| b.suit.cmp(&a.suit)));

    let flush_cards = flush_suit_cards(&sorted);

    // Стрит-флеш и роял: стрит только внутри масти флеша.
    if let Some(suited) = flush_cards.as_deref() {
        if let Some(run) = best_straight(suited) {
            let category = if run[0].rank == Rank::Ace {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return Some(EvaluatedHand { category, cards: run });
        }
    }

    let groups = rank_groups(&sorted);

    if groups[0].len() == 4 {
        return made_hand(HandCategory::FourOfAKind, &groups[..1], &sorted);
    }

    if groups[0].len() == 3 {
        // Пара для фулла – старший из остальных рангов, где карт хотя бы две
        // (второй сет тоже годится).
        let pair = groups[1..]
            .iter()
            .filter(|g| g.len() >= 2)
            .max_by_key(|g| g[0].rank);
        if let Some(pair) = pair {
            let mut five = groups[0].clone();
            five.extend_from_slice(&pair[..2]);
            return to_hand(HandCategory::FullHouse, &five);
        }
    }

    if let Some(suited) = flush_cards {
        return to_hand(HandCategory::Flush, &suited[..5]);
    }

    if let Some(run) = best_straight(&sorted) {
        return Some(EvaluatedHand {
            category: HandCategory::Straight,
            cards: run,
        });
    }

    if groups[0].len() == 3 {
        return made_hand(HandCategory::ThreeOfAKind, &groups[..1], &sorted);
    }

    if groups[0].len() == 2 && groups.get(1).map_or(false, |g| g.len() == 2) {
        return made_hand(HandCategory::TwoPair, &groups[..2], &sorted);
    }

    if groups[0].len() == 2 {
        return made_hand(HandCategory::OnePair, &groups[..1], &sorted);
    }

    to_hand(HandCategory::HighCard, &sorted[..5])
}

/// Карты масти, которой не меньше пяти, по убыванию ранга.
fn flush_suit_cards(sorted: &[Card]) -> Option<Vec<Card>> {
    Suit::ALL.iter().find_map(|&suit| {
        let suited: Vec<Card> = sorted.iter().copied().filter(|c| c.suit == suit).collect();
        (suited.len() >= 5).then_some(suited)
    })
}

/// Группы карт одного ранга: сначала самые многочисленные,
/// при равенстве – старший ранг.
fn rank_groups(sorted: &[Card]) -> Vec<Vec<Card>> {
    let mut groups: Vec<Vec<Card>> = Vec::new();
    for card in sorted {
        match groups.last_mut() {
            Some(group) if group[0].rank == card.rank => group.push(*card),
            _ => groups.push(vec![*card]),
        }
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b[0].rank.cmp(&a[0].rank)));
    groups
}

/// Лучший стрит из отсортированных карт. Ранги сначала схлопываются,
/// пара одного ранга не даёт двух стритов.
fn best_straight(sorted: &[Card]) -> Option<[Card; 5]> {
    let top = detect_straight(mask_of(sorted.iter().map(|c| c.rank)))?;
    let ranks = straight_ranks(top)?;

    let mut run = [sorted[0]; 5];
    for (slot, rank) in run.iter_mut().zip(ranks) {
        *slot = *sorted.iter().find(|c| c.rank == rank)?;
    }
    Some(run)
}

/// Комбинация из групп (каре/сет/пары) плюс старшие кикеры до пяти карт.
fn made_hand(
    category: HandCategory,
    made: &[Vec<Card>],
    sorted: &[Card],
) -> Option<EvaluatedHand> {
    let mut five: Vec<Card> = made.iter().flatten().copied().collect();
    let kickers = sorted.iter().filter(|c| !five.contains(c)).copied().collect::<Vec<_>>();
    five.extend(kickers.into_iter().take(5 - five.len()));
    to_hand(category, &five)
}

fn to_hand(category: HandCategory, five: &[Card]) -> Option<EvaluatedHand> {
    let cards: [Card; 5] = five.try_into().ok()?;
    Some(EvaluatedHand { category, cards })
}
