//! Рантайм столов на tokio:
//!   - `TableActor` – один последовательный контекст на стол;
//!   - `MatchScheduler` – отложенные старты матчей;
//!   - `TableRegistry` – все столы процесса и публичный API действий.

pub mod registry;
pub mod scheduler;
pub mod table_actor;

pub use registry::TableRegistry;
pub use scheduler::MatchScheduler;
pub use table_actor::{ActorContext, TableActor, TableHandle};
