//! Доставка денежных фактов во внешний кошелёк.
//!
//! Стол никогда не ждёт кошелёк: факты уходят в неограниченную очередь
//! после коммита, отдельная задача доставляет их минимум один раз
//! (ретраи с паузой). Зависший кошелёк растит очередь, но не блокирует актор.
//! Номер факта – ключ идемпотентности на стороне кошелька.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::chips::Chips;
use crate::domain::outcome::Outcome;
use crate::domain::{TableId, UserId};
use crate::infra::config::LedgerConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet rejected the operation: {0}")]
    Rejected(String),

    #[error("wallet unavailable: {0}")]
    Unavailable(String),
}

/// Внешний кошелёк игроков.
#[async_trait::async_trait]
pub trait Wallet: Send + Sync {
    /// Вернуть фишки на счёт (кэш-аут).
    async fn credit(&self, fact_id: u64, user: &str, amount: Chips) -> Result<(), WalletError>;

    /// Списать со счёта (бай-ин).
    async fn debit(&self, fact_id: u64, user: &str, amount: Chips) -> Result<(), WalletError>;

    /// Итог матча для истории игрока.
    async fn record_outcome(
        &self,
        _fact_id: u64,
        _user: &str,
        _outcome: &Outcome,
    ) -> Result<(), WalletError> {
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerFactKind {
    BuyIn { user_id: UserId, amount: Chips },
    CashOut { user_id: UserId, amount: Chips },
    PayoutOccurred(Outcome),
}

/// Денежный факт, который нужно донести до кошелька.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerFact {
    pub id: u64,
    pub table_id: TableId,
    pub kind: LedgerFactKind,
}

impl LedgerFact {
    async fn deliver(&self, wallet: &dyn Wallet) -> Result<(), WalletError> {
        match &self.kind {
            LedgerFactKind::BuyIn { user_id, amount } => wallet.debit(self.id, user_id, *amount).await,
            LedgerFactKind::CashOut { user_id, amount } => {
                wallet.credit(self.id, user_id, *amount).await
            }
            LedgerFactKind::PayoutOccurred(outcome) => {
                let user = match outcome {
                    Outcome::Win(w) => &w.user_id,
                    Outcome::Lose(l) => &l.user_id,
                };
                wallet.record_outcome(self.id, user, outcome).await
            }
        }
    }
}

/// Отправитель фактов; клонируется в каждый актор стола.
#[derive(Clone, Debug)]
pub struct LedgerHandle {
    tx: mpsc::UnboundedSender<LedgerFact>,
}

impl LedgerHandle {
    /// Поставить факт в очередь без ожидания.
    /// Закрытая очередь логируется, игра продолжается.
    pub fn submit(&self, fact: LedgerFact) {
        if let Err(err) = self.tx.send(fact) {
            tracing::error!(fact_id = err.0.id, "ledger worker is gone, fact dropped");
        }
    }
}

/// Фоновая задача доставки фактов.
pub struct LedgerWorker;

impl LedgerWorker {
    pub fn spawn(wallet: Arc<dyn Wallet>, config: LedgerConfig) -> (LedgerHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<LedgerFact>();
        let join = tokio::spawn(async move {
            while let Some(fact) = rx.recv().await {
                deliver_with_retry(wallet.as_ref(), &fact, config).await;
            }
            tracing::debug!("ledger worker stopped");
        });
        (LedgerHandle { tx }, join)
    }
}

/// Доставить факт; после `max_attempts` неудач – только лог.
pub async fn deliver_with_retry(wallet: &dyn Wallet, fact: &LedgerFact, config: LedgerConfig) -> bool {
    for attempt in 1..=config.max_attempts {
        match fact.deliver(wallet).await {
            Ok(()) => {
                tracing::debug!(fact_id = fact.id, table_id = fact.table_id, attempt, "ledger fact delivered");
                return true;
            }
            Err(err) if attempt < config.max_attempts => {
                tracing::warn!(fact_id = fact.id, attempt, error = %err, "ledger delivery failed, retrying");
                let backoff = config.retry_backoff_ms.saturating_mul(u64::from(attempt));
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }
            Err(err) => {
                tracing::error!(
                    fact_id = fact.id,
                    table_id = fact.table_id,
                    attempts = attempt,
                    error = %err,
                    ?fact,
                    "ledger fact could not be delivered"
                );
            }
        }
    }
    false
}

/// Кошелёк в памяти: для тестов и локального стенда.
///
/// Повторный факт с тем же id игнорируется. `fail_next` заставляет
/// следующие N вызовов вернуть `Unavailable`.
#[derive(Debug, Default)]
pub struct InMemoryWallet {
    state: Mutex<WalletState>,
    fail_next: AtomicU32,
}

#[derive(Debug, Default)]
struct WalletState {
    balances: HashMap<UserId, i128>,
    applied: HashSet<u64>,
    outcomes: Vec<Outcome>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, user: &str, amount: u64) -> Self {
        self.lock().balances.insert(user.to_string(), amount as i128);
        self
    }

    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn balance(&self, user: &str) -> i128 {
        self.lock().balances.get(user).copied().unwrap_or(0)
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.lock().outcomes.clone()
    }

    pub fn applied_facts(&self) -> usize {
        self.lock().applied.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn maybe_fail(&self) -> Result<(), WalletError> {
        let left = self.fail_next.load(Ordering::SeqCst);
        if left > 0 {
            self.fail_next.store(left - 1, Ordering::SeqCst);
            return Err(WalletError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }

    fn apply(&self, fact_id: u64, user: &str, delta: i128) {
        let mut state = self.lock();
        if state.applied.insert(fact_id) {
            *state.balances.entry(user.to_string()).or_insert(0) += delta;
        }
    }
}

#[async_trait::async_trait]
impl Wallet for InMemoryWallet {
    async fn credit(&self, fact_id: u64, user: &str, amount: Chips) -> Result<(), WalletError> {
        self.maybe_fail()?;
        self.apply(fact_id, user, amount.0 as i128);
        Ok(())
    }

    async fn debit(&self, fact_id: u64, user: &str, amount: Chips) -> Result<(), WalletError> {
        self.maybe_fail()?;
        self.apply(fact_id, user, -(amount.0 as i128));
        Ok(())
    }

    async fn record_outcome(
        &self,
        fact_id: u64,
        _user: &str,
        outcome: &Outcome,
    ) -> Result<(), WalletError> {
        self.maybe_fail()?;
        let mut state = self.lock();
        if state.applied.insert(fact_id) {
            state.outcomes.push(outcome.clone());
        }
        Ok(())
    }
}
