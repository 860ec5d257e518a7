//! Доменная модель кэш-игры: карты, фишки, столы, игроки, матчи, участники.

pub mod arena;
pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod outcome;
pub mod participant;
pub mod player;
pub mod table;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type TableId = u64;
pub type MatchId = u64;
pub type ParticipantId = u64;
/// Соединение клиента (сокет) – выдаётся транспортом.
pub type ConnectionId = u64;
/// Внешний аккаунт игрока в кошельке.
pub type UserId = String;

pub use arena::*;
pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use outcome::*;
pub use participant::*;
pub use player::*;
pub use table::*;
