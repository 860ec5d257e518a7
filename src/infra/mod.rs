//! Инфраструктурный слой вокруг покерного движка:
//! - генерация ID и RNG-реализации для движка;
//! - конфиг и логирование;
//! - хранилище, кошелёк и рассылка событий;
//! - маппинг журнала команды во внешние эффекты.

pub mod config;
pub mod ids;
pub mod ledger;
pub mod logging;
pub mod mapping;
pub mod persistence;
pub mod publisher;
pub mod rng;
pub mod rng_seed;

pub use config::{ConfigError, EngineConfig, LedgerConfig};
pub use ids::*;
pub use ledger::{InMemoryWallet, LedgerFact, LedgerFactKind, LedgerHandle, LedgerWorker, Wallet, WalletError};
pub use logging::init_logging;
pub use mapping::{ledger_facts, table_events};
pub use persistence::{InMemoryPokerStorage, PokerStorage, StorageError};
pub use publisher::{BroadcastPublisher, EventPublisher};
pub use rng::*;
pub use rng_seed::RngSeed;
