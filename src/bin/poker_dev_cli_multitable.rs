// src/bin/poker_dev_cli_multitable.rs

use std::sync::Arc;

use holdem_cash_engine::api::dto::{TableDto, TableEvent};
use holdem_cash_engine::domain::chips::Chips;
use holdem_cash_engine::domain::table::TableConfig;
use holdem_cash_engine::domain::TableId;
use holdem_cash_engine::engine::{EngineError, RaiseKind};
use holdem_cash_engine::infra::config;
use holdem_cash_engine::infra::{
    init_logging, BroadcastPublisher, InMemoryPokerStorage, InMemoryWallet, LedgerWorker,
};
use holdem_cash_engine::TableRegistry;

/// Сценарий ботов за столом.
#[derive(Copy, Clone, Debug)]
enum Scenario {
    SimpleCheckCall,
    WithFold,
    WithRaises,
    WithAllInSidePots,
}

const HANDS_PER_TABLE: u32 = 3;
const MAX_STEPS: u32 = 200;

#[tokio::main]
async fn main() {
    init_logging();
    println!("poker_dev_cli_multitable: стартуем мульти-табличный dev-CLI…");

    // 1. Конфиг: файл/окружение, если есть. Матчи запускаем сами.
    let mut cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("[CLI] конфиг не загружен ({e}), берём значения по умолчанию");
            Default::default()
        }
    };
    cfg.auto_next_match = false;

    // 2. Инфраструктура: хранилище, рассылка событий, кошелёк.
    let storage = Arc::new(InMemoryPokerStorage::new());
    let publisher = Arc::new(BroadcastPublisher::new());
    let wallet = Arc::new(InMemoryWallet::new());
    let (ledger, _ledger_task) = LedgerWorker::spawn(wallet.clone(), cfg.ledger);

    let registry = Arc::new(TableRegistry::new(cfg, storage, publisher.clone(), ledger));

    println!();
    println!("================ MULTI-TABLE SIMULATION =================");

    let scenarios = [
        Scenario::SimpleCheckCall,
        Scenario::WithFold,
        Scenario::WithRaises,
        Scenario::WithAllInSidePots,
    ];

    let mut tasks = Vec::new();
    for (n, scenario) in scenarios.into_iter().enumerate() {
        let table_id = match registry.create_table(TableConfig {
            name: format!("AUTO TABLE {}", n + 1),
            min_buy_in: Chips(2_000),
            max_buy_in: Chips(20_000),
            ante: Chips::ZERO,
            max_players: 9,
        }) {
            Ok(id) => id,
            Err(e) => {
                println!("[CLI] ОШИБКА создания стола: {e}");
                continue;
            }
        };

        // Число игроков: от 3 до 6.
        let num_players = 3 + n;
        for i in 0..num_players {
            let buy_in = Chips(2_000 + 1_000 * i as u64);
            let user = format!("bot-{table_id}-{i}");
            if let Err(e) = registry
                .join_table(table_id, user, buy_in, Some(i as u64 + 1))
                .await
            {
                println!("[CLI] ОШИБКА посадки на стол {table_id}: {e}");
            }
        }

        let mut events = publisher.subscribe(table_id);
        tokio::spawn(async move {
            let mut count = 0u64;
            while let Ok(event) = events.recv().await {
                count += 1;
                if let TableEvent::TableMessage { text, .. } = event {
                    println!("[EVENTS][table_id={table_id}] #{count}: {text}");
                }
            }
        });

        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            for hand in 1..=HANDS_PER_TABLE {
                println!("[CLI][table_id={table_id}] ===== HAND {hand} ({scenario:?}) =====");
                if let Err(e) = play_hand(&registry, table_id, scenario).await {
                    println!("[CLI][table_id={table_id}] ОШИБКА раздачи: {e}");
                    break;
                }
            }
        }));
    }

    for task in tasks {
        let _ = task.await;
    }

    println!();
    println!("================ FINAL TABLES =================");
    for table in registry.list_tables().await {
        debug_print_table_state(&table);
    }

    registry.shutdown();
    println!("[CLI] Завершение работы dev-CLI (multitable).");
}

/// Одна раздача: старт матча и ходы ботов до расчёта.
async fn play_hand(
    registry: &TableRegistry,
    table_id: TableId,
    scenario: Scenario,
) -> Result<(), EngineError> {
    let match_id = registry.create_match(table_id).await?;
    println!("[CLI][table_id={table_id}] match_id={match_id} стартовал");

    for step in 1..=MAX_STEPS {
        let table = registry.snapshot(table_id, None).await?;
        let Some(m) = table.current_match.as_ref() else {
            break;
        };
        if m.settled {
            println!(
                "[CLI][table_id={table_id}] матч {} завершён: банк={} рейк={} победители={:?}",
                m.match_id, m.pot, m.rake, m.winners
            );
            return Ok(());
        }

        let Some(actor) = table.players.iter().find(|p| p.is_turn) else {
            break;
        };
        let Some(me) = m.participants.iter().find(|p| p.player_id == actor.player_id) else {
            break;
        };

        let owed = m.call_amount.saturating_sub(me.bet);
        let pid = me.participant_id;
        let result = match scenario {
            Scenario::WithAllInSidePots if step <= 2 => {
                registry.raise(table_id, pid, Chips::ZERO, RaiseKind::AllIn).await
            }
            Scenario::WithFold if step % 4 == 0 && !owed.is_zero() => {
                registry.fold(table_id, pid).await
            }
            Scenario::WithRaises if step % 3 == 1 && actor.stack > m.min_raise => {
                registry.raise(table_id, pid, m.min_raise, RaiseKind::Raise).await
            }
            _ if owed.is_zero() => registry.check(table_id, pid).await,
            _ => registry.call(table_id, pid).await,
        };

        match result {
            Ok(outcome) => println!(
                "[CLI][table_id={table_id}] [step={step}] street={:?} player_id={} -> {:?}",
                outcome.match_view.street, actor.player_id, outcome.participant.last_action
            ),
            Err(e) => {
                println!("[CLI][table_id={table_id}] действие отклонено: {e}, пробуем fold");
                registry.fold(table_id, pid).await?;
            }
        }
    }

    println!("[CLI][table_id={table_id}] Превышен лимит шагов ({MAX_STEPS}) или нет хода.");
    Ok(())
}

fn debug_print_table_state(table: &TableDto) {
    println!(
        "Table {} '{}' blinds={}/{} hand_over={} button={:?}",
        table.table_id,
        table.name,
        table.small_blind,
        table.big_blind,
        table.hand_over,
        table.dealer_button
    );
    for p in &table.players {
        println!(
            "  seat={} player_id={} user={} stack={}",
            p.seat, p.player_id, p.user_id, p.stack
        );
    }
}
