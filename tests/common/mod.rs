//! Общие утилиты интеграционных тестов: карты, подтасованная колода,
//! стол с игроками и быстрые действия.

#![allow(dead_code)]

use holdem_cash_engine::domain::{
    arena::TableArena,
    card::{Card, Rank, Suit},
    chips::Chips,
    deck::Deck,
    table::{Table, TableConfig},
    ParticipantId, PlayerId,
};
use holdem_cash_engine::engine::{
    apply_action, create_match, join_table, ActionApplied, EngineError, EngineSettings,
    HandHistory, PlayerAction, RandomSource,
};
use holdem_cash_engine::infra::IdGenerator;

/// Утилита: собрать карту.
pub fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

/// "Перемешивание", которое раскладывает колоду в заранее заданном порядке:
/// карманные карты участников в порядке мест, затем борд.
pub struct StackedRng {
    perm: Vec<usize>,
}

impl StackedRng {
    pub fn new(holes: &[(Card, Card)], board: [Card; 5]) -> Self {
        let standard = Deck::standard_52().cards;

        // Верх колоды (раздаётся первым) – конец вектора.
        let mut top: Vec<Card> = Vec::new();
        for (a, b) in holes {
            top.push(*a);
            top.push(*b);
        }
        top.extend_from_slice(&board);

        let mut order: Vec<Card> = standard.iter().copied().filter(|c| !top.contains(c)).collect();
        order.extend(top.iter().rev());
        assert_eq!(order.len(), 52, "карты в подтасовке не должны повторяться");

        let perm = order
            .iter()
            .map(|card| standard.iter().position(|s| s == card).unwrap())
            .collect();
        Self { perm }
    }
}

impl RandomSource for StackedRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        assert_eq!(slice.len(), self.perm.len());
        let n = slice.len();
        // at[i] – исходный индекс элемента на позиции i, pos – обратное отображение.
        let mut at: Vec<usize> = (0..n).collect();
        let mut pos: Vec<usize> = (0..n).collect();
        for i in 0..n {
            let want = self.perm[i];
            let j = pos[want];
            slice.swap(i, j);
            let moved = at[i];
            at[j] = moved;
            pos[moved] = j;
            at[i] = want;
            pos[want] = i;
        }
    }
}

/// Конфиг стола: min_buy_in 2000 → блайнды 10/20.
pub fn table_config(ante: u64) -> TableConfig {
    TableConfig {
        name: "Test table".to_string(),
        min_buy_in: Chips(2_000),
        max_buy_in: Chips(100_000),
        ante: Chips(ante),
        max_players: 6,
    }
}

/// Тестовый стол со своим генератором id и настройками движка.
pub struct TestTable {
    pub arena: TableArena,
    pub ids: IdGenerator,
    pub settings: EngineSettings,
}

impl TestTable {
    /// Стол с игроками на местах 0..n и заданными стеками.
    pub fn with_stacks(stacks: &[u64]) -> (Self, Vec<PlayerId>) {
        Self::with_config(table_config(0), stacks)
    }

    pub fn with_config(config: TableConfig, stacks: &[u64]) -> (Self, Vec<PlayerId>) {
        let ids = IdGenerator::new();
        let mut arena = TableArena::new(Table::new(ids.next_table_id(), config));
        let mut history = HandHistory::new();
        let mut players = Vec::new();

        for (i, stack) in stacks.iter().enumerate() {
            let min = arena.table.min_buy_in;
            let pid = join_table(
                &mut arena,
                &ids,
                format!("user-{i}"),
                min,
                Some(100 + i as u64),
                &mut history,
            )
            .expect("посадка должна пройти");
            arena.player_mut(pid).unwrap().stack = Chips(*stack);
            players.push(pid);
        }

        let table = TestTable {
            arena,
            ids,
            settings: EngineSettings::default(),
        };
        (table, players)
    }

    pub fn start<R: RandomSource>(&mut self, rng: &mut R) -> HandHistory {
        let mut history = HandHistory::new();
        create_match(&mut self.arena, rng, &self.ids, &self.settings, &mut history)
            .expect("матч должен стартовать");
        history
    }

    pub fn act(&mut self, action: PlayerAction) -> Result<ActionApplied, EngineError> {
        let mut history = HandHistory::new();
        apply_action(&mut self.arena, &action, &self.settings, &mut history)
    }

    pub fn act_logged(&mut self, action: PlayerAction) -> (Result<ActionApplied, EngineError>, HandHistory) {
        let mut history = HandHistory::new();
        let res = apply_action(&mut self.arena, &action, &self.settings, &mut history);
        (res, history)
    }

    /// Участник текущего матча для игрока.
    pub fn pid(&self, player: PlayerId) -> ParticipantId {
        let m = self.arena.current_match().expect("матч есть");
        self.arena
            .participant_for_player(m.id, player)
            .expect("игрок участвует")
            .id
    }

    /// Игрок, чей сейчас ход.
    pub fn on_turn(&self) -> Option<PlayerId> {
        self.arena.player_on_turn().map(|p| p.id)
    }

    pub fn stack(&self, player: PlayerId) -> Chips {
        self.arena.player(player).expect("игрок за столом").stack
    }

    /// Сумма стеков всех игроков за столом.
    pub fn total_stacks(&self) -> Chips {
        self.arena.players.values().map(|p| p.stack).sum()
    }
}
