use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::hand::{Match, SidePot};
use crate::domain::participant::Participant;
use crate::domain::player::Player;
use crate::domain::table::Table;
use crate::domain::{MatchId, ParticipantId, PlayerId, TableId};
use crate::infra::ids::IdWatermark;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Абстракция хранилища покерных сущностей.
///
/// Актор стола сохраняет состояние после каждой успешной команды;
/// ошибки хранения логируются и не откатывают игру.
pub trait PokerStorage: Send + Sync {
    fn load_table(&self, id: TableId) -> Option<Table>;
    fn save_table(&self, table: &Table) -> Result<(), StorageError>;

    fn load_players(&self, table_id: TableId) -> Vec<Player>;
    fn save_player(&self, player: &Player) -> Result<(), StorageError>;
    fn delete_player(&self, id: PlayerId) -> Result<(), StorageError>;

    /// Атомарно изменить стек игрока на `delta`; возвращает новый стек.
    fn adjust_stack(&self, player_id: PlayerId, delta: i64) -> Result<Chips, StorageError>;

    fn load_match(&self, id: MatchId) -> Option<Match>;
    fn save_match(&self, m: &Match) -> Result<(), StorageError>;

    fn load_participant(&self, id: ParticipantId) -> Option<Participant>;
    fn save_participant(&self, participant: &Participant) -> Result<(), StorageError>;

    fn load_side_pots(&self, match_id: MatchId) -> Vec<SidePot>;
    fn save_side_pots(&self, match_id: MatchId, pots: &[SidePot]) -> Result<(), StorageError>;

    /// Счётчики id, выданные до перезапуска.
    fn load_id_watermark(&self) -> Option<IdWatermark>;
    /// Метка не должна откатываться назад, даже если столы пишут её вперемешку.
    fn save_id_watermark(&self, mark: &IdWatermark) -> Result<(), StorageError>;

    /// Сохранить всё состояние стола разом.
    fn save_arena(&self, arena: &TableArena) -> Result<(), StorageError> {
        self.save_table(&arena.table)?;

        let known: Vec<PlayerId> = self
            .load_players(arena.table.id)
            .into_iter()
            .map(|p| p.id)
            .collect();
        for id in known {
            if !arena.players.contains_key(&id) {
                self.delete_player(id)?;
            }
        }
        for player in arena.players.values() {
            self.save_player(player)?;
        }

        if let Some(m) = arena.current_match() {
            self.save_match(m)?;
            for participant in arena.participants_of(m.id) {
                self.save_participant(participant)?;
            }
            if !m.side_pots.is_empty() {
                self.save_side_pots(m.id, &m.side_pots)?;
            }
        }
        Ok(())
    }

    /// Восстановить стол с игроками и текущим матчем.
    fn load_arena(&self, table_id: TableId) -> Option<TableArena> {
        let table = self.load_table(table_id)?;
        let current = table.current_match;
        let mut arena = TableArena::new(table);

        for player in self.load_players(table_id) {
            arena.players.insert(player.id, player);
        }
        if let Some(m) = current.and_then(|id| self.load_match(id)) {
            for id in &m.participants {
                if let Some(p) = self.load_participant(*id) {
                    arena.participants.insert(p.id, p);
                }
            }
            arena.matches.insert(m.id, m);
        }
        Some(arena)
    }
}

#[derive(Debug, Default)]
struct Records {
    tables: HashMap<TableId, Table>,
    players: HashMap<PlayerId, Player>,
    matches: HashMap<MatchId, Match>,
    participants: HashMap<ParticipantId, Participant>,
    side_pots: HashMap<MatchId, Vec<SidePot>>,
    id_watermark: Option<IdWatermark>,
}

/// In-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryPokerStorage {
    inner: RwLock<Records>,
}

impl InMemoryPokerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Records) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl PokerStorage for InMemoryPokerStorage {
    fn load_table(&self, id: TableId) -> Option<Table> {
        self.read(|r| r.tables.get(&id).cloned())
    }

    fn save_table(&self, table: &Table) -> Result<(), StorageError> {
        self.write(|r| r.tables.insert(table.id, table.clone()));
        Ok(())
    }

    fn load_players(&self, table_id: TableId) -> Vec<Player> {
        self.read(|r| {
            let mut players: Vec<Player> = r
                .players
                .values()
                .filter(|p| p.table_id == table_id)
                .cloned()
                .collect();
            players.sort_by_key(|p| p.seat);
            players
        })
    }

    fn save_player(&self, player: &Player) -> Result<(), StorageError> {
        self.write(|r| r.players.insert(player.id, player.clone()));
        Ok(())
    }

    fn delete_player(&self, id: PlayerId) -> Result<(), StorageError> {
        self.write(|r| r.players.remove(&id))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("player {id}")))
    }

    fn adjust_stack(&self, player_id: PlayerId, delta: i64) -> Result<Chips, StorageError> {
        self.write(|r| {
            let player = r
                .players
                .get_mut(&player_id)
                .ok_or_else(|| StorageError::NotFound(format!("player {player_id}")))?;
            let next = player.stack.0 as i128 + delta as i128;
            if next < 0 {
                return Err(StorageError::Backend(format!(
                    "stack of player {player_id} would become negative"
                )));
            }
            player.stack = Chips(next as u64);
            Ok(player.stack)
        })
    }

    fn load_match(&self, id: MatchId) -> Option<Match> {
        self.read(|r| r.matches.get(&id).cloned())
    }

    fn save_match(&self, m: &Match) -> Result<(), StorageError> {
        self.write(|r| r.matches.insert(m.id, m.clone()));
        Ok(())
    }

    fn load_participant(&self, id: ParticipantId) -> Option<Participant> {
        self.read(|r| r.participants.get(&id).cloned())
    }

    fn save_participant(&self, participant: &Participant) -> Result<(), StorageError> {
        self.write(|r| r.participants.insert(participant.id, participant.clone()));
        Ok(())
    }

    fn load_side_pots(&self, match_id: MatchId) -> Vec<SidePot> {
        self.read(|r| r.side_pots.get(&match_id).cloned().unwrap_or_default())
    }

    fn save_side_pots(&self, match_id: MatchId, pots: &[SidePot]) -> Result<(), StorageError> {
        // Сайд-поты фиксируются один раз.
        self.write(|r| {
            r.side_pots
                .entry(match_id)
                .or_insert_with(|| pots.to_vec());
        });
        Ok(())
    }

    fn load_id_watermark(&self) -> Option<IdWatermark> {
        self.read(|r| r.id_watermark)
    }

    fn save_id_watermark(&self, mark: &IdWatermark) -> Result<(), StorageError> {
        self.write(|r| {
            r.id_watermark = Some(match r.id_watermark {
                Some(stored) => stored.max(*mark),
                None => *mark,
            });
        });
        Ok(())
    }
}
