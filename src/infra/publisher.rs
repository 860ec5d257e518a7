use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::api::dto::TableEvent;
use crate::domain::TableId;

/// Буфер событий на стол; медленный подписчик теряет старые события.
const EVENT_CHANNEL_BUFFER: usize = 256;

/// Рассылка событий стола клиентам.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, table_id: TableId, event: TableEvent);
}

/// Издатель на `tokio::sync::broadcast`: отдельный канал на каждый стол.
#[derive(Debug, Default)]
pub struct BroadcastPublisher {
    channels: RwLock<HashMap<TableId, broadcast::Sender<TableEvent>>>,
}

impl BroadcastPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Подписаться на события стола (канал создаётся при первой подписке).
    pub fn subscribe(&self, table_id: TableId) -> broadcast::Receiver<TableEvent> {
        let mut guard = self.channels.write().unwrap_or_else(|e| e.into_inner());
        let sender = guard
            .entry(table_id)
            .or_insert_with(|| broadcast::channel(EVENT_CHANNEL_BUFFER).0);
        tracing::debug!(table_id, "client subscribed to table events");
        sender.subscribe()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, table_id: TableId, event: TableEvent) {
        let sender = {
            let guard = self.channels.read().unwrap_or_else(|e| e.into_inner());
            guard.get(&table_id).cloned()
        };

        match sender {
            Some(sender) => {
                tracing::trace!(table_id, event = event.name(), "broadcasting table event");
                // Нет подписчиков – не ошибка.
                let _ = sender.send(event);
            }
            None => tracing::trace!(table_id, "no subscribers for table"),
        }
    }
}
