use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tokio::task::JoinHandle;

use crate::api::commands::{Command, TableCommand};
use crate::api::dto::{ActionOutcome, CommandResponse, TableDto};
use crate::api::errors::ApiError;
use crate::api::queries::{Query, QueryResponse};
use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::table::{Table, TableConfig};
use crate::domain::{ConnectionId, MatchId, ParticipantId, PlayerId, TableId, UserId};
use crate::engine::actions::RaiseKind;
use crate::engine::errors::{Entity, EngineError};
use crate::infra::config::EngineConfig;
use crate::infra::ids::IdGenerator;
use crate::infra::ledger::LedgerHandle;
use crate::infra::persistence::PokerStorage;
use crate::infra::publisher::EventPublisher;
use crate::infra::rng::TableRng;
use crate::runtime::scheduler::MatchScheduler;
use crate::runtime::table_actor::{ActorContext, AutoStart, TableActor, TableHandle};

struct Entry {
    handle: TableHandle,
    task: JoinHandle<()>,
}

/// Все кэш-столы процесса. Каждый стол живёт в своём акторе,
/// столы работают параллельно и не делят изменяемое состояние.
pub struct TableRegistry {
    tables: RwLock<BTreeMap<TableId, Entry>>,
    config: EngineConfig,
    ctx: ActorContext,
    scheduler: MatchScheduler,
}

impl TableRegistry {
    pub fn new(
        config: EngineConfig,
        storage: Arc<dyn PokerStorage>,
        publisher: Arc<dyn EventPublisher>,
        ledger: LedgerHandle,
    ) -> Self {
        let scheduler = MatchScheduler::new(Arc::clone(&publisher), config.next_match_warning_ms);
        let ids = IdGenerator::new();
        if let Some(mark) = storage.load_id_watermark() {
            ids.resume_from(&mark);
        }
        let ctx = ActorContext {
            ids: Arc::new(ids),
            settings: config.settings(),
            storage,
            publisher,
            ledger,
        };
        Self {
            tables: RwLock::new(BTreeMap::new()),
            config,
            ctx,
            scheduler,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &MatchScheduler {
        &self.scheduler
    }

    //
    // ===== Столы =====
    //

    /// Создать стол и запустить его актор.
    pub fn create_table(&self, config: TableConfig) -> Result<TableId, EngineError> {
        config.validate().map_err(EngineError::InvalidAction)?;
        let mut table_id = self.ctx.ids.next_table_id();
        while self.ctx.storage.load_table(table_id).is_some() {
            table_id = self.ctx.ids.next_table_id();
        }
        let arena = TableArena::new(Table::new(table_id, config));

        if let Err(err) = self.ctx.storage.save_arena(&arena) {
            tracing::error!(table_id, error = %err, "failed to persist new table");
        }
        self.persist_ids();
        self.start_actor(arena);
        tracing::info!(table_id, "table created");
        Ok(table_id)
    }

    /// Поднять стол из хранилища (после рестарта процесса).
    pub fn restore_table(&self, table_id: TableId) -> Result<TableId, EngineError> {
        if self.read().contains_key(&table_id) {
            return Ok(table_id);
        }
        let arena = self
            .ctx
            .storage
            .load_arena(table_id)
            .ok_or(EngineError::NotFound(Entity::Table(table_id)))?;
        self.ctx.ids.observe_arena(&arena);
        self.persist_ids();
        self.start_actor(arena);
        tracing::info!(table_id, "table restored from storage");
        Ok(table_id)
    }

    fn persist_ids(&self) {
        if let Err(err) = self.ctx.storage.save_id_watermark(&self.ctx.ids.watermark()) {
            tracing::error!(error = %err, "failed to persist id counters");
        }
    }

    fn start_actor(&self, arena: TableArena) {
        let table_id = arena.table.id;
        let rng = TableRng::new(self.config.seed(), table_id);
        let auto = self.config.auto_next_match.then(|| AutoStart {
            scheduler: self.scheduler.clone(),
            delay_ms: self.config.match_start_delay_ms,
        });
        let (handle, task) =
            TableActor::spawn(arena, rng, self.ctx.clone(), auto, self.config.command_buffer);
        self.write().insert(table_id, Entry { handle, task });
    }

    pub fn handle(&self, table_id: TableId) -> Result<TableHandle, EngineError> {
        self.read()
            .get(&table_id)
            .map(|e| e.handle.clone())
            .ok_or(EngineError::NotFound(Entity::Table(table_id)))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.read().keys().copied().collect()
    }

    /// Закрыть стол: отменить старт, остановить актор.
    pub fn close_table(&self, table_id: TableId) -> Result<(), EngineError> {
        self.scheduler.cancel(table_id);
        let entry = self
            .write()
            .remove(&table_id)
            .ok_or(EngineError::NotFound(Entity::Table(table_id)))?;
        entry.task.abort();
        tracing::info!(table_id, "table closed");
        Ok(())
    }

    //
    // ===== Матчи =====
    //

    /// Запланировать следующий матч. false – старт уже запланирован.
    pub fn request_next_match(&self, table_id: TableId, delay_ms: u64) -> Result<bool, EngineError> {
        let handle = self.handle(table_id)?;
        Ok(self.scheduler.schedule(handle, delay_ms))
    }

    pub fn cancel_next_match(&self, table_id: TableId) -> bool {
        self.scheduler.cancel(table_id)
    }

    /// Начать матч немедленно, минуя планировщик.
    pub async fn create_match(&self, table_id: TableId) -> Result<MatchId, EngineError> {
        self.handle(table_id)?.create_match().await
    }

    //
    // ===== Действия =====
    //

    pub async fn fold(&self, table_id: TableId, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.handle(table_id)?.fold(participant_id).await
    }

    pub async fn check(&self, table_id: TableId, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.handle(table_id)?.check(participant_id).await
    }

    pub async fn call(&self, table_id: TableId, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.handle(table_id)?.call(participant_id).await
    }

    pub async fn raise(
        &self,
        table_id: TableId,
        participant_id: ParticipantId,
        amount: Chips,
        kind: RaiseKind,
    ) -> Result<ActionOutcome, EngineError> {
        self.handle(table_id)?.raise(participant_id, amount, kind).await
    }

    //
    // ===== Игроки =====
    //

    pub async fn join_table(
        &self,
        table_id: TableId,
        user_id: impl Into<UserId>,
        buy_in: Chips,
        connection: Option<ConnectionId>,
    ) -> Result<PlayerId, EngineError> {
        self.handle(table_id)?.join(user_id, buy_in, connection).await
    }

    pub async fn leave_table(&self, table_id: TableId, player_id: PlayerId) -> Result<(), EngineError> {
        self.handle(table_id)?.leave(player_id).await
    }

    pub async fn leave_next_match(&self, table_id: TableId, player_id: PlayerId) -> Result<(), EngineError> {
        self.handle(table_id)?.leave_next_match(player_id).await
    }

    pub async fn disconnect(&self, table_id: TableId, player_id: PlayerId) -> Result<(), EngineError> {
        self.handle(table_id)?.disconnect(player_id).await
    }

    pub async fn show_hand(&self, table_id: TableId, player_id: PlayerId) -> Result<(), EngineError> {
        self.handle(table_id)?.show_hand(player_id).await
    }

    //
    // ===== Чтение =====
    //

    pub async fn snapshot(&self, table_id: TableId, viewer: Option<PlayerId>) -> Result<TableDto, EngineError> {
        self.handle(table_id)?.snapshot(viewer).await
    }

    pub async fn list_tables(&self) -> Vec<TableDto> {
        let handles: Vec<TableHandle> = self.read().values().map(|e| e.handle.clone()).collect();
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.snapshot(None).await {
                Ok(dto) => out.push(dto),
                Err(err) => tracing::warn!(table_id = handle.table_id(), error = %err, "table snapshot failed"),
            }
        }
        out
    }

    //
    // ===== Диспетчер API =====
    //

    /// Выполнить клиентскую команду.
    pub async fn execute(&self, command: Command) -> Result<CommandResponse, ApiError> {
        let (table_id, command) = match command {
            Command::CreateTable(config) => {
                let table_id = self.create_table(config)?;
                return Ok(CommandResponse::TableCreated { table_id });
            }
            Command::Table { table_id, command } => (table_id, command),
        };

        if let Some(action) = command.as_player_action() {
            let outcome = self.handle(table_id)?.act(action).await?;
            return Ok(CommandResponse::Action(outcome));
        }

        let response = match command {
            TableCommand::Join {
                user_id,
                buy_in,
                connection,
            } => {
                let player_id = self.join_table(table_id, user_id, buy_in, connection).await?;
                CommandResponse::Joined { player_id }
            }
            TableCommand::Leave { player_id } => {
                self.leave_table(table_id, player_id).await?;
                CommandResponse::Ok
            }
            TableCommand::LeaveNextMatch { player_id } => {
                self.leave_next_match(table_id, player_id).await?;
                CommandResponse::Ok
            }
            TableCommand::Disconnect { player_id } => {
                self.disconnect(table_id, player_id).await?;
                CommandResponse::Ok
            }
            TableCommand::RequestNextMatch { delay_ms } => CommandResponse::NextMatchScheduled {
                scheduled: self.request_next_match(table_id, delay_ms)?,
            },
            TableCommand::CancelNextMatch => {
                self.cancel_next_match(table_id);
                CommandResponse::Ok
            }
            TableCommand::CreateMatch => CommandResponse::MatchCreated {
                match_id: self.create_match(table_id).await?,
            },
            TableCommand::ShowHand { player_id } => {
                self.show_hand(table_id, player_id).await?;
                CommandResponse::Ok
            }
            TableCommand::Fold { .. }
            | TableCommand::Check { .. }
            | TableCommand::Call { .. }
            | TableCommand::Raise { .. } => {
                return Err(ApiError::Internal("player action was not dispatched".into()))
            }
        };
        Ok(response)
    }

    pub async fn query(&self, query: Query) -> Result<QueryResponse, ApiError> {
        match query {
            Query::GetTable { table_id, viewer } => {
                Ok(QueryResponse::Table(self.snapshot(table_id, viewer).await?))
            }
            Query::ListTables => Ok(QueryResponse::Tables(self.list_tables().await)),
        }
    }

    /// Остановить все столы и отложенные старты.
    pub fn shutdown(&self) {
        self.scheduler.cancel_all();
        for (table_id, entry) in std::mem::take(&mut *self.write()) {
            entry.task.abort();
            tracing::debug!(table_id, "table actor aborted");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<TableId, Entry>> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<TableId, Entry>> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}
