//! Движок кэш-игры Texas Hold'em на много столов.
//!
//! Слои снизу вверх:
//! - `domain` – карты, фишки, стол, игроки, матчи, участники;
//! - `eval` – оценка и сравнение рук;
//! - `engine` – ставки, очередь хода, улицы, сайд-поты, шоудаун;
//! - `infra` – конфиг, логирование, RNG, хранилище, кошелёк, рассылка событий;
//! - `runtime` – акторы столов, планировщик матчей, реестр столов;
//! - `api` – команды, запросы, DTO и ошибки для клиентов.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod runtime;

pub use engine::{EngineError, EngineSettings};
pub use infra::config::EngineConfig;
pub use runtime::{TableHandle, TableRegistry};
