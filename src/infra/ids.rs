use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::arena::TableArena;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId};

/// Следующие свободные значения счётчиков. Хранится в `PokerStorage`,
/// чтобы после перезапуска id не выдавались повторно.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdWatermark {
    pub next_table: u64,
    pub next_player: u64,
    pub next_match: u64,
    pub next_participant: u64,
    pub next_fact: u64,
}

impl IdWatermark {
    /// Покомпонентный максимум: водяная метка только растёт.
    pub fn max(self, other: IdWatermark) -> IdWatermark {
        IdWatermark {
            next_table: self.next_table.max(other.next_table),
            next_player: self.next_player.max(other.next_player),
            next_match: self.next_match.max(other.next_match),
            next_participant: self.next_participant.max(other.next_participant),
            next_fact: self.next_fact.max(other.next_fact),
        }
    }
}

/// Генерация ID на основе монотонных счётчиков.
///
/// Один генератор делится между всеми столами (`Arc<IdGenerator>`),
/// поэтому id уникальны в пределах процесса.
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
    player_counter: AtomicU64,
    match_counter: AtomicU64,
    participant_counter: AtomicU64,
    fact_counter: AtomicU64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            table_counter: AtomicU64::new(1),
            player_counter: AtomicU64::new(1),
            match_counter: AtomicU64::new(1),
            participant_counter: AtomicU64::new(1),
            fact_counter: AtomicU64::new(1),
        }
    }

    /// Текущие значения всех счётчиков.
    pub fn watermark(&self) -> IdWatermark {
        IdWatermark {
            next_table: self.table_counter.load(Ordering::Relaxed),
            next_player: self.player_counter.load(Ordering::Relaxed),
            next_match: self.match_counter.load(Ordering::Relaxed),
            next_participant: self.participant_counter.load(Ordering::Relaxed),
            next_fact: self.fact_counter.load(Ordering::Relaxed),
        }
    }

    /// Продолжить с сохранённой метки. Счётчики никогда не уменьшаются.
    pub fn resume_from(&self, mark: &IdWatermark) {
        self.table_counter.fetch_max(mark.next_table, Ordering::Relaxed);
        self.player_counter.fetch_max(mark.next_player, Ordering::Relaxed);
        self.match_counter.fetch_max(mark.next_match, Ordering::Relaxed);
        self.participant_counter
            .fetch_max(mark.next_participant, Ordering::Relaxed);
        self.fact_counter.fetch_max(mark.next_fact, Ordering::Relaxed);
    }

    /// Сдвинуть счётчики за все id восстановленного стола.
    pub fn observe_arena(&self, arena: &TableArena) {
        self.table_counter
            .fetch_max(arena.table.id + 1, Ordering::Relaxed);
        self.player_counter
            .fetch_max(next_after(arena.players.keys()), Ordering::Relaxed);
        self.match_counter
            .fetch_max(next_after(arena.matches.keys()), Ordering::Relaxed);
        self.participant_counter
            .fetch_max(next_after(arena.participants.keys()), Ordering::Relaxed);
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_player_id(&self) -> PlayerId {
        self.player_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_match_id(&self) -> MatchId {
        self.match_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_participant_id(&self) -> ParticipantId {
        self.participant_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Номер факта для кошелька; служит ключом идемпотентности.
    #[inline]
    pub fn next_fact_id(&self) -> u64 {
        self.fact_counter.fetch_add(1, Ordering::Relaxed)
    }
}

fn next_after<'a>(ids: impl Iterator<Item = &'a u64>) -> u64 {
    ids.max().map_or(0, |id| id + 1)
}
