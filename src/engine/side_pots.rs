use crate::domain::chips::Chips;
use crate::domain::hand::SidePot;
use crate::domain::ParticipantId;
use crate::engine::pot::PotAllocation;

/// Разложить вклады живых участников на главный пот и сайд-поты.
///
/// То же, что [`allocate_pots`] без сбросивших.
pub fn compute_side_pots(contributions: &[(ParticipantId, Chips)]) -> PotAllocation {
    allocate_pots(contributions, &[])
}

/// Разложить банк на главный пот и сайд-поты.
///
/// `live`: `(participant, total_bet)` не сбросивших, в порядке мест.
/// `folded`: вклады сбросивших. Они не претендуют ни на один пот, но их
/// фишки раскладываются по тем же уровням, что и фишки живых: в слой с
/// уровнем `min` сбросивший кладёт не больше `min`.
///
/// Слой за слоем: минимальный оставшийся живой вклад × число претендентов
/// плюс доля сбросивших. Первый слой – главный пот, следующие – сайд-поты.
/// Излишек последнего живого участника и остаток сбросивших сверх всех
/// уровней уходят в последний пот.
///
/// Инвариант: `main_pot + Σ side = Σ live + Σ folded`.
pub fn allocate_pots(live: &[(ParticipantId, Chips)], folded: &[Chips]) -> PotAllocation {
    let mut remaining: Vec<(ParticipantId, Chips)> = live
        .iter()
        .copied()
        .filter(|(_, c)| !c.is_zero())
        .collect();
    let mut dead: Vec<Chips> = folded.iter().copied().filter(|c| !c.is_zero()).collect();

    let mut allocation = PotAllocation::default();
    let mut main_taken = false;

    while remaining.len() > 1 {
        let min = remaining
            .iter()
            .map(|(_, c)| *c)
            .min()
            .unwrap_or(Chips::ZERO);
        let mut layer = Chips(min.0 * remaining.len() as u64);
        for chips in dead.iter_mut() {
            let share = (*chips).min(min);
            layer += share;
            *chips -= share;
        }
        dead.retain(|c| !c.is_zero());
        let eligible: Vec<ParticipantId> = remaining.iter().map(|(id, _)| *id).collect();

        if main_taken {
            allocation.side_pots.push(SidePot {
                amount: layer,
                eligible,
            });
        } else {
            allocation.main_pot = layer;
            allocation.main_eligible = eligible;
            main_taken = true;
        }

        for (_, c) in remaining.iter_mut() {
            *c -= min;
        }
        remaining.retain(|(_, c)| !c.is_zero());
    }

    let leftover: Chips = dead.iter().copied().sum();

    match remaining.first().copied() {
        Some((id, rest)) if main_taken => allocation.side_pots.push(SidePot {
            amount: rest + leftover,
            eligible: vec![id],
        }),
        Some((id, rest)) => {
            allocation.main_pot = rest + leftover;
            allocation.main_eligible = vec![id];
        }
        None => match allocation.side_pots.last_mut() {
            Some(last) => last.amount += leftover,
            None => allocation.main_pot += leftover,
        },
    }

    allocation
}
