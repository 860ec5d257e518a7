//! Внешний API кэш-столов.
//!
//! Здесь описываются:
//! - команды (commands.rs) – всё, что меняет состояние;
//! - запросы (queries.rs) – только чтение и сборка DTO;
//! - DTO (dto.rs) – снимки стола и события для клиентов;
//! - ошибки (errors.rs) – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
