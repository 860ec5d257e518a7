use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Фильтр по умолчанию, если `RUST_LOG` не задан.
pub const DEFAULT_FILTER: &str = "info,holdem_cash_engine=debug";

/// Инициализировать глобальный подписчик `tracing`.
///
/// Повторный вызов ничего не ломает: второй подписчик просто не ставится.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
