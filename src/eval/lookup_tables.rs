use crate::domain::card::Rank;

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маски всех стритов, от слабейшего (wheel A2345) до бродвея (TJQKA).
/// Индекс + 5 = значение старшей карты стрита.
pub const STRAIGHT_MASKS: [RankMask; 10] = build_straight_masks();

const fn build_straight_masks() -> [RankMask; 10] {
    let mut masks = [0u16; 10];
    // wheel: туз играет как единица
    masks[0] = mask_from_values(&[14, 2, 3, 4, 5]);
    let mut i = 1;
    while i < 10 {
        // старшая карта = i + 5, берём 5 подряд вниз от неё
        let low = (i + 1) as u8;
        masks[i] = mask_from_values(&[low, low + 1, low + 2, low + 3, low + 4]);
        i += 1;
    }
    masks
}

const fn mask_from_values(values: &[u8]) -> RankMask {
    let mut mask: RankMask = 0;
    let mut i = 0;
    while i < values.len() {
        mask |= 1 << (values[i] - 2);
        i += 1;
    }
    mask
}

/// Бит одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << (rank.value() - 2)
}

/// Маска по набору рангов (повторы схлопываются сами).
pub fn mask_of<I: IntoIterator<Item = Rank>>(ranks: I) -> RankMask {
    ranks.into_iter().fold(0, |mask, r| mask | rank_to_bit(r))
}

/// Старшая карта лучшего стрита в маске. Для wheel это пятёрка.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    STRAIGHT_MASKS
        .iter()
        .enumerate()
        .rev()
        .find(|(_, sm)| rank_mask & **sm == **sm)
        .and_then(|(i, _)| Rank::from_value(i as u8 + 5))
}

/// Ранги стрита от старшей карты вниз. Wheel: 5, 4, 3, 2, A.
pub fn straight_ranks(top: Rank) -> Option<[Rank; 5]> {
    if top == Rank::Five {
        return Some([Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace]);
    }
    let v = top.value();
    if v < 6 {
        return None;
    }
    Some([
        top,
        Rank::from_value(v - 1)?,
        Rank::from_value(v - 2)?,
        Rank::from_value(v - 3)?,
        Rank::from_value(v - 4)?,
    ])
}
