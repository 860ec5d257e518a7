use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::SidePot;
use crate::domain::ParticipantId;

/// Раскладка банка на главный пот и сайд-поты.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAllocation {
    pub main_pot: Chips,
    /// Кто претендует на главный пот (все живые участники с вкладом).
    pub main_eligible: Vec<ParticipantId>,
    pub side_pots: Vec<SidePot>,
}

impl PotAllocation {
    /// Сумма всех потов.
    pub fn total(&self) -> Chips {
        self.main_pot + self.side_pots.iter().map(|p| p.amount).sum::<Chips>()
    }

    /// Все поты по порядку: главный, затем сайд-поты.
    pub fn pots(&self) -> Vec<SidePot> {
        let mut pots = Vec::with_capacity(self.side_pots.len() + 1);
        pots.push(SidePot {
            amount: self.main_pot,
            eligible: self.main_eligible.clone(),
        });
        pots.extend(self.side_pots.iter().cloned());
        pots
    }
}
