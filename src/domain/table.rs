use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::{MatchId, PlayerId, TableId};

/// Индекс места за столом (0..max_players-1).
pub type SeatIndex = u8;

/// Верхний предел мест за кэш-столом.
pub const MAX_PLAYERS_LIMIT: u8 = 10;

/// Делитель минимального бай-ина: min_bet = min_buy_in / 200.
pub const MIN_BET_DIVISOR: u64 = 200;

/// Конфиг стола: лимиты бай-ина, анте, количество мест.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub name: String,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub ante: Chips,
    /// Максимальное количество мест (2–10).
    pub max_players: u8,
}

impl TableConfig {
    /// Проверка конфига перед созданием стола.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(2..=MAX_PLAYERS_LIMIT).contains(&self.max_players) {
            return Err("max_players must be within 2..=10");
        }
        if self.min_buy_in > self.max_buy_in {
            return Err("min_buy_in must not exceed max_buy_in");
        }
        if self.min_buy_in.0 < MIN_BET_DIVISOR {
            return Err("min_buy_in is too small to derive blinds");
        }
        Ok(())
    }
}

/// Стейки стола, производные от минимального бай-ина.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub min_bet: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl TableStakes {
    pub fn derive(min_buy_in: Chips, ante: Chips) -> Self {
        let min_bet = Chips(min_buy_in.0 / MIN_BET_DIVISOR);
        Self {
            min_bet,
            small_blind: min_bet,
            big_blind: Chips(min_bet.0 * 2),
            ante,
        }
    }
}

/// Основное состояние кэш-стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub ante: Chips,
    pub max_players: u8,

    /// Места за столом: индекс вектора = SeatIndex.
    /// None – место пустое.
    pub seats: Vec<Option<PlayerId>>,

    /// Место дилерской кнопки прошлой/текущей раздачи.
    pub dealer_button: Option<SeatIndex>,

    /// true, когда раздача не идёт и стол ждёт следующую.
    pub hand_over: bool,

    /// Текущий (или последний) матч за столом.
    pub current_match: Option<MatchId>,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, config: TableConfig) -> Self {
        let max_players = config.max_players.min(MAX_PLAYERS_LIMIT);
        Self {
            id,
            name: config.name,
            min_buy_in: config.min_buy_in,
            max_buy_in: config.max_buy_in,
            ante: config.ante,
            max_players,
            seats: vec![None; max_players as usize],
            dealer_button: None,
            hand_over: true,
            current_match: None,
        }
    }

    pub fn stakes(&self) -> TableStakes {
        TableStakes::derive(self.min_buy_in, self.ante)
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn first_empty_seat(&self) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| s.is_none())
            .map(|idx| idx as SeatIndex)
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| *s == Some(player_id))
            .map(|idx| idx as SeatIndex)
    }

    pub fn buy_in_allowed(&self, amount: Chips) -> bool {
        amount >= self.min_buy_in && amount <= self.max_buy_in
    }
}
