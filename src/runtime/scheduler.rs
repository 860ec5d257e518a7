use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::dto::TableEvent;
use crate::domain::TableId;
use crate::infra::publisher::EventPublisher;
use crate::runtime::table_actor::TableHandle;

struct Pending {
    generation: u64,
    task: JoinHandle<()>,
}

/// Отложенные старты матчей: не больше одного на стол.
///
/// За `warning_ms` до старта клиенты получают `NextMatchComing { is_coming: true }`;
/// если стол не смог начать матч, уходит `is_coming: false`.
#[derive(Clone)]
pub struct MatchScheduler {
    pending: Arc<Mutex<HashMap<TableId, Pending>>>,
    generation: Arc<AtomicU64>,
    publisher: Arc<dyn EventPublisher>,
    warning_ms: u64,
}

impl MatchScheduler {
    pub fn new(publisher: Arc<dyn EventPublisher>, warning_ms: u64) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(1)),
            publisher,
            warning_ms,
        }
    }

    /// Запланировать матч через `delay_ms`. Если старт уже ждёт – ничего не делаем
    /// и возвращаем false.
    pub fn schedule(&self, handle: TableHandle, delay_ms: u64) -> bool {
        let table_id = handle.table_id();
        let mut pending = self.lock();
        if pending.get(&table_id).map_or(false, |p| !p.task.is_finished()) {
            tracing::debug!(table_id, "next match already scheduled");
            return false;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let warning = self.warning_ms.min(delay_ms);
        let quiet = delay_ms - warning;
        let publisher = Arc::clone(&self.publisher);
        let registry = Arc::clone(&self.pending);

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(quiet)).await;
            publisher.publish(table_id, TableEvent::NextMatchComing { is_coming: true });
            tokio::time::sleep(Duration::from_millis(warning)).await;

            // Снимаем себя до старта: завершившийся матч сможет запланировать следующий.
            {
                let mut guard = registry.lock().unwrap_or_else(|e| e.into_inner());
                if guard.get(&table_id).map(|p| p.generation) == Some(generation) {
                    guard.remove(&table_id);
                }
            }

            match handle.create_match().await {
                Ok(match_id) => tracing::debug!(table_id, match_id, "scheduled match started"),
                Err(err) => {
                    tracing::info!(table_id, error = %err, "scheduled match did not start");
                    publisher.publish(table_id, TableEvent::NextMatchComing { is_coming: false });
                }
            }
        });

        pending.insert(table_id, Pending { generation, task });
        tracing::debug!(table_id, delay_ms, "next match scheduled");
        true
    }

    /// Отменить ожидающий старт. true – если было что отменять.
    pub fn cancel(&self, table_id: TableId) -> bool {
        match self.lock().remove(&table_id) {
            Some(p) if !p.task.is_finished() => {
                p.task.abort();
                tracing::debug!(table_id, "scheduled match cancelled");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, table_id: TableId) -> bool {
        self.lock()
            .get(&table_id)
            .map_or(false, |p| !p.task.is_finished())
    }

    /// Отменить всё (остановка сервиса).
    pub fn cancel_all(&self) {
        for (_, p) in self.lock().drain() {
            p.task.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TableId, Pending>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
