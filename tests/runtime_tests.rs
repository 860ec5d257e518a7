//! Рантайм столов: акторы, планировщик матчей, события и кошелёк.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use common::table_config;
use holdem_cash_engine::api::dto::{Severity, TableEvent};
use holdem_cash_engine::domain::{arena::TableArena, chips::Chips, ParticipantId, PlayerId, TableId};
use holdem_cash_engine::engine::{EngineError, Entity};
use holdem_cash_engine::infra::{
    BroadcastPublisher, EngineConfig, InMemoryPokerStorage, InMemoryWallet, LedgerWorker,
    PokerStorage, Wallet, WalletError,
};
use holdem_cash_engine::TableRegistry;
use tokio::sync::broadcast;
use tokio::time::sleep;

struct Harness {
    registry: Arc<TableRegistry>,
    publisher: Arc<BroadcastPublisher>,
    storage: Arc<InMemoryPokerStorage>,
    wallet: Arc<InMemoryWallet>,
}

fn harness(config: EngineConfig, wallet: InMemoryWallet) -> Harness {
    let storage = Arc::new(InMemoryPokerStorage::new());
    let publisher = Arc::new(BroadcastPublisher::new());
    let wallet = Arc::new(wallet);
    let (ledger, _worker) = LedgerWorker::spawn(wallet.clone(), config.ledger);
    let registry = TableRegistry::new(config, storage.clone(), publisher.clone(), ledger);
    Harness {
        registry: Arc::new(registry),
        publisher,
        storage,
        wallet,
    }
}

/// Конфиг без автозапуска и с фиксированным seed.
fn manual_config() -> EngineConfig {
    EngineConfig {
        auto_next_match: false,
        rng_seed: Some(1),
        ..EngineConfig::default()
    }
}

async fn seated_table(h: &Harness, players: usize) -> (TableId, Vec<PlayerId>) {
    let table_id = h.registry.create_table(table_config(0)).unwrap();
    let mut ids = Vec::new();
    for i in 0..players {
        let pid = h
            .registry
            .join_table(table_id, format!("user-{i}"), Chips(2_000), Some(i as u64))
            .await
            .unwrap();
        ids.push(pid);
    }
    (table_id, ids)
}

fn drain(rx: &mut broadcast::Receiver<TableEvent>) -> Vec<TableEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Участник игрока, которому сейчас принадлежит ход.
fn on_turn(arena: &TableArena) -> ParticipantId {
    let m = arena.current_match().expect("матч есть");
    let player = arena.player_on_turn().expect("чей-то ход");
    arena
        .participant_for_player(m.id, player.id)
        .expect("игрок участвует")
        .id
}

async fn wait_for(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..400 {
        if cond() {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("не дождались: {what}");
}

//
// ===== ПАРАЛЛЕЛЬНЫЕ СТОЛЫ =====
//

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tables_run_independently() {
    let h = harness(manual_config(), InMemoryWallet::new());

    let mut tasks = Vec::new();
    for n in 0..4u64 {
        let registry = Arc::clone(&h.registry);
        tasks.push(tokio::spawn(async move {
            let table_id = registry.create_table(table_config(0)).unwrap();
            for seat in 0..3u64 {
                registry
                    .join_table(table_id, format!("t{n}-u{seat}"), Chips(2_000), Some(seat))
                    .await
                    .unwrap();
            }
            let match_id = registry.create_match(table_id).await.unwrap();
            (table_id, match_id)
        }));
    }

    let mut tables = BTreeSet::new();
    let mut matches = BTreeSet::new();
    for task in tasks {
        let (table_id, match_id) = task.await.unwrap();
        tables.insert(table_id);
        matches.insert(match_id);
    }
    assert_eq!(tables.len(), 4, "У каждого стола свой id");
    assert_eq!(matches.len(), 4, "id матчей уникальны в процессе");

    let listed = h.registry.list_tables().await;
    assert_eq!(listed.len(), 4);
    for table in listed {
        assert_eq!(table.players.len(), 3);
        assert!(table.current_match.is_some());
        assert!(!table.hand_over);
    }
}

//
// ===== ДЕЙСТВИЯ ЧЕРЕЗ АКТОР =====
//

#[tokio::test]
async fn rejected_action_changes_nothing_and_warns_table() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, players) = seated_table(&h, 2).await;
    h.registry.create_match(table_id).await.unwrap();

    let handle = h.registry.handle(table_id).unwrap();
    let before = handle.arena().await.unwrap();
    let m = before.current_match().unwrap();
    let not_on_turn = before.participant_for_player(m.id, players[1]).unwrap().id;

    let mut events = h.publisher.subscribe(table_id);
    let err = handle.check(not_on_turn).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidAction("not this player's turn"));
    assert_eq!(handle.arena().await.unwrap(), before, "Состояние стола не изменилось");

    let events = drain(&mut events);
    assert!(
        matches!(
            events.as_slice(),
            [TableEvent::TableMessage { severity: Severity::Warning, .. }]
        ),
        "Ожидалось одно предупреждение, получено {events:?}"
    );
}

#[tokio::test]
async fn accepted_action_broadcasts_update_without_foreign_cards() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, players) = seated_table(&h, 2).await;
    h.registry.create_match(table_id).await.unwrap();
    let handle = h.registry.handle(table_id).unwrap();
    let arena = handle.arena().await.unwrap();

    let mut events = h.publisher.subscribe(table_id);
    let outcome = h.registry.call(table_id, on_turn(&arena)).await.unwrap();

    assert_eq!(outcome.player.player_id, players[0]);
    assert!(outcome.participant.hole_cards.is_some(), "Свои карты видны");
    let foreign = outcome
        .match_view
        .participants
        .iter()
        .find(|p| p.player_id == players[1])
        .unwrap();
    assert!(foreign.hole_cards.is_none(), "Чужие карты скрыты");

    let events = drain(&mut events);
    assert!(events.iter().any(|e| matches!(e, TableEvent::ParticipantsUpdated { participant } if participant.hole_cards.is_none())));
    assert!(events.iter().any(|e| matches!(e, TableEvent::ChangeTurn { next_player_id, .. } if *next_player_id == players[1])));
    assert!(matches!(events.last(), Some(TableEvent::PlayersUpdated { .. })));
}

#[tokio::test]
async fn committed_state_is_persisted() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 3).await;
    let match_id = h.registry.create_match(table_id).await.unwrap();

    let stored = h.storage.load_arena(table_id).expect("стол в хранилище");
    assert_eq!(stored.table.current_match, Some(match_id));
    assert_eq!(stored, h.registry.handle(table_id).unwrap().arena().await.unwrap());
}

#[tokio::test]
async fn closed_table_is_not_found() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 2).await;

    h.registry.close_table(table_id).unwrap();
    assert!(matches!(
        h.registry.handle(table_id),
        Err(EngineError::NotFound(Entity::Table(id))) if id == table_id
    ));
    assert!(h.registry.close_table(table_id).is_err());
}

#[tokio::test]
async fn table_restored_from_storage_keeps_players() {
    let config = manual_config();
    let first = harness(config.clone(), InMemoryWallet::new());
    let (table_id, players) = seated_table(&first, 2).await;
    first.registry.shutdown();

    let (ledger, _worker) = LedgerWorker::spawn(Arc::new(InMemoryWallet::new()), config.ledger);
    let second = TableRegistry::new(
        config,
        first.storage.clone(),
        Arc::new(BroadcastPublisher::new()),
        ledger,
    );
    assert_eq!(second.restore_table(table_id).unwrap(), table_id);

    let view = second.snapshot(table_id, None).await.unwrap();
    let restored: Vec<PlayerId> = view.players.iter().map(|p| p.player_id).collect();
    assert_eq!(restored, players);
    assert!(second.restore_table(9_999).is_err());
}

#[tokio::test]
async fn restored_registry_never_reuses_ids() {
    let config = manual_config();
    let first = harness(config.clone(), InMemoryWallet::new());
    let (table_id, players) = seated_table(&first, 3).await;
    wait_for("бай-ины", || first.wallet.applied_facts() == 3).await;
    first.registry.shutdown();

    // Тот же кошелёк: повторный номер факта он бы молча проглотил.
    let (ledger, _worker) = LedgerWorker::spawn(first.wallet.clone(), config.ledger);
    let second = TableRegistry::new(
        config,
        first.storage.clone(),
        Arc::new(BroadcastPublisher::new()),
        ledger,
    );
    second.restore_table(table_id).unwrap();

    let newcomer = second
        .join_table(table_id, "user-new", Chips(2_000), Some(42))
        .await
        .unwrap();
    assert!(!players.contains(&newcomer), "Новый игрок не перезаписывает старого");

    let arena = second.handle(table_id).unwrap().arena().await.unwrap();
    assert_eq!(arena.players.len(), 4);
    for id in &players {
        assert_eq!(arena.player(*id).map(|p| p.stack), Some(Chips(2_000)));
    }

    let other = second.create_table(table_config(0)).unwrap();
    assert_ne!(other, table_id, "Новый стол не занимает id восстановленного");

    wait_for("бай-ин новичка", || first.wallet.applied_facts() == 4).await;
    assert_eq!(first.wallet.balance("user-new"), -2_000);
}

//
// ===== ПЛАНИРОВЩИК =====
//

#[tokio::test(start_paused = true)]
async fn scheduled_match_warns_then_starts() {
    let config = EngineConfig {
        next_match_warning_ms: 1_000,
        ..manual_config()
    };
    let h = harness(config, InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 2).await;
    let mut events = h.publisher.subscribe(table_id);

    assert!(h.registry.request_next_match(table_id, 5_000).unwrap());
    assert!(
        !h.registry.request_next_match(table_id, 5_000).unwrap(),
        "Второй старт для того же стола не планируется"
    );
    assert!(h.registry.scheduler().is_pending(table_id));

    sleep(Duration::from_millis(3_900)).await;
    assert!(drain(&mut events).is_empty());

    sleep(Duration::from_millis(200)).await;
    assert_eq!(
        drain(&mut events),
        vec![TableEvent::NextMatchComing { is_coming: true }]
    );
    assert!(h.registry.snapshot(table_id, None).await.unwrap().current_match.is_none());

    sleep(Duration::from_millis(1_000)).await;
    let view = h.registry.snapshot(table_id, None).await.unwrap();
    assert!(view.current_match.is_some(), "Матч начался по расписанию");
    assert!(!view.hand_over);
    assert!(!h.registry.scheduler().is_pending(table_id));
}

#[tokio::test(start_paused = true)]
async fn cancelled_start_never_fires() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 2).await;
    let mut events = h.publisher.subscribe(table_id);

    assert!(h.registry.request_next_match(table_id, 5_000).unwrap());
    assert!(h.registry.cancel_next_match(table_id));
    assert!(!h.registry.cancel_next_match(table_id), "Отменять больше нечего");

    sleep(Duration::from_millis(10_000)).await;
    assert!(drain(&mut events).is_empty());
    assert!(h.registry.snapshot(table_id, None).await.unwrap().current_match.is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_start_withdraws_announcement() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 1).await;
    let mut events = h.publisher.subscribe(table_id);

    assert!(h.registry.request_next_match(table_id, 100).unwrap());
    sleep(Duration::from_millis(200)).await;

    assert_eq!(
        drain(&mut events),
        vec![
            TableEvent::NextMatchComing { is_coming: true },
            TableEvent::NextMatchComing { is_coming: false },
        ]
    );
    assert!(!h.registry.scheduler().is_pending(table_id));
}

#[tokio::test(start_paused = true)]
async fn next_match_starts_automatically() {
    let config = EngineConfig {
        auto_next_match: true,
        match_start_delay_ms: 2_000,
        next_match_warning_ms: 500,
        ..manual_config()
    };
    let h = harness(config, InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 1).await;
    assert!(!h.registry.scheduler().is_pending(table_id), "Одному игроку матч не нужен");

    h.registry
        .join_table(table_id, "late", Chips(2_000), Some(50))
        .await
        .unwrap();
    assert!(h.registry.scheduler().is_pending(table_id));

    sleep(Duration::from_millis(2_100)).await;
    let handle = h.registry.handle(table_id).unwrap();
    let arena = handle.arena().await.unwrap();
    let first = arena.table.current_match.expect("первый матч начался");

    handle.fold(on_turn(&arena)).await.unwrap();
    assert!(h.registry.scheduler().is_pending(table_id), "После раздачи планируется следующая");

    sleep(Duration::from_millis(2_100)).await;
    let arena = handle.arena().await.unwrap();
    let second = arena.table.current_match.expect("второй матч начался");
    assert_ne!(first, second);
    assert!(!arena.table.hand_over);
}

//
// ===== КОШЕЛЁК =====
//

#[tokio::test]
async fn buy_in_and_cash_out_reach_wallet() {
    let wallet = InMemoryWallet::new().with_balance("alice", 10_000);
    let h = harness(manual_config(), wallet);
    let table_id = h.registry.create_table(table_config(0)).unwrap();

    let alice = h
        .registry
        .join_table(table_id, "alice", Chips(3_000), Some(1))
        .await
        .unwrap();
    wait_for("бай-ин", || h.wallet.applied_facts() >= 1).await;
    assert_eq!(h.wallet.balance("alice"), 7_000);

    h.registry.leave_table(table_id, alice).await.unwrap();
    wait_for("кэш-аут", || h.wallet.applied_facts() >= 2).await;
    assert_eq!(h.wallet.balance("alice"), 10_000);
}

#[tokio::test]
async fn hand_outcomes_reach_wallet() {
    let h = harness(manual_config(), InMemoryWallet::new());
    let (table_id, _) = seated_table(&h, 2).await;
    h.registry.create_match(table_id).await.unwrap();

    let handle = h.registry.handle(table_id).unwrap();
    let arena = handle.arena().await.unwrap();
    handle.fold(on_turn(&arena)).await.unwrap();

    wait_for("итоги матча", || h.wallet.outcomes().len() == 2).await;
    let outcomes = h.wallet.outcomes();
    assert_eq!(outcomes.iter().filter(|o| matches!(o, holdem_cash_engine::domain::Outcome::Win(_))).count(), 1);
}

/// Кошелёк, который принимает вызов и больше не отвечает.
struct StuckWallet;

#[async_trait::async_trait]
impl Wallet for StuckWallet {
    async fn credit(&self, _fact_id: u64, _user: &str, _amount: Chips) -> Result<(), WalletError> {
        std::future::pending().await
    }

    async fn debit(&self, _fact_id: u64, _user: &str, _amount: Chips) -> Result<(), WalletError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn stuck_wallet_never_blocks_the_table() {
    let config = manual_config();
    let storage = Arc::new(InMemoryPokerStorage::new());
    let (ledger, _worker) = LedgerWorker::spawn(Arc::new(StuckWallet), config.ledger);
    let registry = TableRegistry::new(
        config,
        storage,
        Arc::new(BroadcastPublisher::new()),
        ledger,
    );
    let table_id = registry.create_table(table_config(0)).unwrap();

    // Каждый круг – два денежных факта; очередь растёт далеко за тысячу.
    let rounds = async {
        for i in 0..700 {
            let player = registry
                .join_table(table_id, format!("user-{i}"), Chips(2_000), Some(i))
                .await
                .unwrap();
            registry.leave_table(table_id, player).await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(30), rounds)
        .await
        .expect("стол не должен ждать кошелёк");

    let view = registry.snapshot(table_id, None).await.unwrap();
    assert!(view.players.is_empty());
}
