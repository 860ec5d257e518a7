use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::hand::Match;
use crate::domain::outcome::Outcome;
use crate::domain::participant::Participant;
use crate::domain::player::Player;
use crate::domain::table::Table;
use crate::domain::{MatchId, ParticipantId, PlayerId};

/// Всё состояние одного стола: сам стол, игроки, матчи, участники и итоги.
///
/// Связи между сущностями хранятся только как id и разрешаются через арену.
/// Сыгранные матчи остаются в арене (append-only после расчёта).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableArena {
    pub table: Table,
    pub players: BTreeMap<PlayerId, Player>,
    pub matches: BTreeMap<MatchId, Match>,
    pub participants: BTreeMap<ParticipantId, Participant>,
    pub outcomes: Vec<Outcome>,
}

impl TableArena {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            players: BTreeMap::new(),
            matches: BTreeMap::new(),
            participants: BTreeMap::new(),
            outcomes: Vec::new(),
        }
    }

    //
    // ===== Игроки =====
    //

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Игроки в порядке мест.
    pub fn players_in_seat_order(&self) -> Vec<&Player> {
        self.table
            .seats
            .iter()
            .flatten()
            .filter_map(|id| self.players.get(id))
            .collect()
    }

    /// Посадить игрока на его место. Место должно быть свободно,
    /// а id игрока не должен быть занят.
    pub fn seat_player(&mut self, player: Player) -> bool {
        if self.players.contains_key(&player.id) {
            return false;
        }
        let seat = player.seat as usize;
        match self.table.seats.get_mut(seat) {
            Some(slot @ None) => {
                *slot = Some(player.id);
                self.players.insert(player.id, player);
                true
            }
            _ => false,
        }
    }

    /// Убрать игрока со стола (освободить место).
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.players.remove(&id)?;
        if let Some(slot) = self.table.seats.get_mut(player.seat as usize) {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        Some(player)
    }

    pub fn player_by_user(&self, user_id: &str) -> Option<&Player> {
        self.players.values().find(|p| p.user_id == user_id)
    }

    //
    // ===== Матчи =====
    //

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.get(&id)
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.table.current_match.and_then(|id| self.matches.get(&id))
    }

    /// Текущий матч, если он ещё не рассчитан.
    pub fn active_match(&self) -> Option<&Match> {
        self.current_match().filter(|m| m.is_in_progress())
    }

    //
    // ===== Участники =====
    //

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    /// Участники матча в порядке мест.
    pub fn participants_of(&self, match_id: MatchId) -> Vec<&Participant> {
        self.matches
            .get(&match_id)
            .map(|m| {
                m.participants
                    .iter()
                    .filter_map(|id| self.participants.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Участник матча, соответствующий игроку.
    pub fn participant_for_player(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Option<&Participant> {
        self.participants_of(match_id)
            .into_iter()
            .find(|p| p.player_id == player_id)
    }

    /// Игрок, которому в данный момент принадлежит ход.
    pub fn player_on_turn(&self) -> Option<&Player> {
        self.players.values().find(|p| p.is_turn)
    }

    //
    // ===== Итоги =====
    //

    pub fn outcomes_of(&self, match_id: MatchId) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(move |o| o.match_id() == match_id)
    }
}
