//! Актор стола: единственный владелец `TableArena`.
//!
//! Команды приходят по ограниченному mpsc-каналу и выполняются строго по одной.
//! Каждая команда применяется к черновой копии арены; при ошибке черновик
//! выбрасывается и состояние стола не меняется. После коммита актор
//! сохраняет стол, рассылает события и ставит денежные факты в очередь.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::dto::{ActionOutcome, TableDto, TableEvent};
use crate::api::queries::{build_match_view, build_participant_view, build_player_view, build_table_view};
use crate::domain::arena::TableArena;
use crate::domain::chips::Chips;
use crate::domain::{ConnectionId, MatchId, ParticipantId, PlayerId, TableId, UserId};
use crate::engine::actions::{PlayerAction, RaiseKind};
use crate::engine::errors::{Entity, EngineError};
use crate::engine::game_loop::{self, ActionApplied, EngineSettings};
use crate::engine::hand_history::{HandEventKind, HandHistory};
use crate::engine::seating;
use crate::infra::ids::IdGenerator;
use crate::infra::ledger::LedgerHandle;
use crate::infra::mapping::{ledger_facts, table_events};
use crate::infra::persistence::PokerStorage;
use crate::infra::publisher::EventPublisher;
use crate::infra::rng::TableRng;
use crate::runtime::scheduler::MatchScheduler;

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

/// Команды актору стола.
pub(crate) enum ActorCommand {
    CreateMatch {
        reply: Reply<MatchId>,
    },
    Act {
        action: PlayerAction,
        reply: Reply<ActionOutcome>,
    },
    Join {
        user_id: UserId,
        buy_in: Chips,
        connection: Option<ConnectionId>,
        reply: Reply<PlayerId>,
    },
    Leave {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    LeaveNextMatch {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    ShowHand {
        player_id: PlayerId,
        reply: Reply<()>,
    },
    Snapshot {
        viewer: Option<PlayerId>,
        reply: oneshot::Sender<TableDto>,
    },
    Arena {
        reply: oneshot::Sender<TableArena>,
    },
}

impl std::fmt::Debug for ActorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActorCommand::CreateMatch { .. } => "CreateMatch",
            ActorCommand::Act { .. } => "Act",
            ActorCommand::Join { .. } => "Join",
            ActorCommand::Leave { .. } => "Leave",
            ActorCommand::LeaveNextMatch { .. } => "LeaveNextMatch",
            ActorCommand::Disconnect { .. } => "Disconnect",
            ActorCommand::ShowHand { .. } => "ShowHand",
            ActorCommand::Snapshot { .. } => "Snapshot",
            ActorCommand::Arena { .. } => "Arena",
        };
        f.write_str(name)
    }
}

/// Автозапуск следующего матча после раздачи и при посадке второго игрока.
pub(crate) struct AutoStart {
    pub scheduler: MatchScheduler,
    pub delay_ms: u64,
}

/// Общие зависимости всех акторов.
#[derive(Clone)]
pub struct ActorContext {
    pub ids: Arc<IdGenerator>,
    pub settings: EngineSettings,
    pub storage: Arc<dyn PokerStorage>,
    pub publisher: Arc<dyn EventPublisher>,
    pub ledger: LedgerHandle,
}

pub struct TableActor {
    arena: TableArena,
    rng: TableRng,
    ctx: ActorContext,
    auto_start: Option<AutoStart>,
    rx: mpsc::Receiver<ActorCommand>,
    /// Слабая ссылка на собственный канал: для автозапуска, не держит актор живым.
    weak_tx: mpsc::WeakSender<ActorCommand>,
}

impl TableActor {
    /// Запустить актор и вернуть хэндл стола.
    pub(crate) fn spawn(
        arena: TableArena,
        rng: TableRng,
        ctx: ActorContext,
        auto_start: Option<AutoStart>,
        buffer: usize,
    ) -> (TableHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let table_id = arena.table.id;
        let actor = TableActor {
            arena,
            rng,
            ctx,
            auto_start,
            rx,
            weak_tx: tx.downgrade(),
        };
        let join = tokio::spawn(actor.run());
        (TableHandle { table_id, tx }, join)
    }

    async fn run(mut self) {
        tracing::debug!(table_id = self.arena.table.id, "table actor started");
        while let Some(cmd) = self.rx.recv().await {
            self.handle(cmd).await;
        }
        tracing::debug!(table_id = self.arena.table.id, "table actor stopped");
    }

    async fn handle(&mut self, cmd: ActorCommand) {
        match cmd {
            ActorCommand::CreateMatch { reply } => {
                let ids = Arc::clone(&self.ctx.ids);
                let settings = self.ctx.settings;
                let res = self
                    .execute(|arena, rng, history| {
                        game_loop::create_match(arena, rng, &ids, &settings, history)
                    })
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::Act { action, reply } => {
                let settings = self.ctx.settings;
                let res = self
                    .execute(|arena, _, history| {
                        game_loop::apply_action(arena, &action, &settings, history)
                    })
                    .await;
                let res = match res {
                    Ok(applied) => self.action_outcome(applied),
                    Err(err) => {
                        self.ctx
                            .publisher
                            .publish(self.arena.table.id, TableEvent::warning(err.to_string()));
                        Err(err)
                    }
                };
                let _ = reply.send(res);
            }
            ActorCommand::Join {
                user_id,
                buy_in,
                connection,
                reply,
            } => {
                let ids = Arc::clone(&self.ctx.ids);
                let res = self
                    .execute(|arena, _, history| {
                        seating::join_table(arena, &ids, user_id, buy_in, connection, history)
                    })
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::Leave { player_id, reply } => {
                let settings = self.ctx.settings;
                let res = self
                    .execute(|arena, _, history| {
                        seating::leave_table(arena, player_id, &settings, history)
                    })
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::LeaveNextMatch { player_id, reply } => {
                let res = self
                    .execute(|arena, _, _| seating::leave_next_match(arena, player_id))
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::Disconnect { player_id, reply } => {
                let settings = self.ctx.settings;
                let res = self
                    .execute(|arena, _, history| {
                        seating::disconnect(arena, player_id, &settings, history)
                    })
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::ShowHand { player_id, reply } => {
                let res = self
                    .execute(|arena, _, history| game_loop::show_hand(arena, player_id, history))
                    .await;
                let _ = reply.send(res);
            }
            ActorCommand::Snapshot { viewer, reply } => {
                let _ = reply.send(build_table_view(&self.arena, |id| Some(id) == viewer));
            }
            ActorCommand::Arena { reply } => {
                let _ = reply.send(self.arena.clone());
            }
        }
    }

    /// Выполнить операцию атомарно: черновик арены и RNG, коммит только при успехе.
    async fn execute<T>(
        &mut self,
        op: impl FnOnce(&mut TableArena, &mut TableRng, &mut HandHistory) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut draft = self.arena.clone();
        let mut rng = self.rng.clone();
        let mut history = HandHistory::new();

        let value = op(&mut draft, &mut rng, &mut history)?;

        self.arena = draft;
        self.rng = rng;
        self.after_commit(&history);
        Ok(value)
    }

    fn after_commit(&mut self, history: &HandHistory) {
        let table_id = self.arena.table.id;
        let facts = ledger_facts(&self.arena, history, &self.ctx.ids);

        if let Err(err) = self.ctx.storage.save_arena(&self.arena) {
            tracing::error!(table_id, error = %err, "failed to persist table state");
        }
        // Номера фактов сохраняются до отправки в кошелёк.
        if let Err(err) = self.ctx.storage.save_id_watermark(&self.ctx.ids.watermark()) {
            tracing::error!(table_id, error = %err, "failed to persist id counters");
        }

        for event in table_events(&self.arena, history) {
            self.ctx.publisher.publish(table_id, event);
        }

        for fact in facts {
            self.ctx.ledger.submit(fact);
        }

        self.maybe_schedule_next(history);
    }

    fn maybe_schedule_next(&self, history: &HandHistory) {
        let Some(auto) = &self.auto_start else {
            return;
        };
        let trigger = history.kinds().any(|e| {
            matches!(
                e,
                HandEventKind::HandFinished { .. } | HandEventKind::PlayerJoined { .. }
            )
        });
        if !trigger || !self.arena.table.hand_over {
            return;
        }
        let ready = self
            .arena
            .players
            .values()
            .filter(|p| p.has_chips())
            .count()
            >= 2;
        if !ready {
            return;
        }
        if let Some(tx) = self.weak_tx.upgrade() {
            let handle = TableHandle {
                table_id: self.arena.table.id,
                tx,
            };
            auto.scheduler.schedule(handle, auto.delay_ms);
        }
    }

    /// Ответ на действие: участник и игрок из стола, если они ещё там,
    /// иначе их состояние сразу после действия.
    fn action_outcome(&self, applied: ActionApplied) -> Result<ActionOutcome, EngineError> {
        let match_id = applied.participant.match_id;
        let owner = applied.player.id;
        let m = self
            .arena
            .match_by_id(match_id)
            .ok_or(EngineError::NotFound(Entity::Match(match_id)))?;

        let participant = self
            .arena
            .participant(applied.participant.id)
            .unwrap_or(&applied.participant);
        let player = self.arena.player(owner).unwrap_or(&applied.player);

        Ok(ActionOutcome {
            participant: build_participant_view(participant, true),
            player: build_player_view(player),
            match_view: build_match_view(&self.arena, m, &|id| id == owner),
        })
    }
}

/// Хэндл стола: клонируется и отдаётся всем, кто шлёт команды.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    tx: mpsc::Sender<ActorCommand>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> ActorCommand,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| EngineError::NotFound(Entity::Table(self.table_id)))?;
        rx.await
            .map_err(|_| EngineError::ExternalServiceFailure(format!("table {} actor dropped the reply", self.table_id)))
    }

    pub async fn create_match(&self) -> Result<MatchId, EngineError> {
        self.request(|reply| ActorCommand::CreateMatch { reply }).await?
    }

    pub async fn act(&self, action: PlayerAction) -> Result<ActionOutcome, EngineError> {
        self.request(|reply| ActorCommand::Act { action, reply }).await?
    }

    pub async fn fold(&self, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.act(PlayerAction::fold(participant_id)).await
    }

    pub async fn check(&self, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.act(PlayerAction::check(participant_id)).await
    }

    pub async fn call(&self, participant_id: ParticipantId) -> Result<ActionOutcome, EngineError> {
        self.act(PlayerAction::call(participant_id)).await
    }

    pub async fn raise(
        &self,
        participant_id: ParticipantId,
        amount: Chips,
        kind: RaiseKind,
    ) -> Result<ActionOutcome, EngineError> {
        self.act(PlayerAction::raise(participant_id, amount, kind)).await
    }

    pub async fn join(
        &self,
        user_id: impl Into<UserId>,
        buy_in: Chips,
        connection: Option<ConnectionId>,
    ) -> Result<PlayerId, EngineError> {
        let user_id = user_id.into();
        self.request(|reply| ActorCommand::Join {
            user_id,
            buy_in,
            connection,
            reply,
        })
        .await?
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| ActorCommand::Leave { player_id, reply }).await?
    }

    pub async fn leave_next_match(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| ActorCommand::LeaveNextMatch { player_id, reply })
            .await?
    }

    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| ActorCommand::Disconnect { player_id, reply })
            .await?
    }

    pub async fn show_hand(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.request(|reply| ActorCommand::ShowHand { player_id, reply })
            .await?
    }

    /// Снимок стола; карманные карты видны только `viewer`.
    pub async fn snapshot(&self, viewer: Option<PlayerId>) -> Result<TableDto, EngineError> {
        self.request(|reply| ActorCommand::Snapshot { viewer, reply })
            .await
    }

    /// Полная копия арены (отладка и тесты).
    pub async fn arena(&self) -> Result<TableArena, EngineError> {
        self.request(|reply| ActorCommand::Arena { reply }).await
    }
}
