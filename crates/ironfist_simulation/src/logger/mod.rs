//! Logging setup (tracing + tracing-subscriber).
//!
//! Симуляция пишет через `tracing` макросы (`debug!`, `info!`, `warn!`).
//! Здесь только установка subscriber'а для headless запуска и тестов.

use tracing_subscriber::EnvFilter;

/// Фильтр по умолчанию, если `RUST_LOG` не задан
pub const DEFAULT_FILTER: &str = "info";

/// Устанавливает глобальный fmt subscriber.
///
/// Идемпотентна: повторный вызов (второй `App` в тестах) молча игнорируется.
pub fn init_logger() {
    init_logger_with_filter(DEFAULT_FILTER);
}

/// Как [`init_logger`], но с явным fallback фильтром (`RUST_LOG` имеет приоритет).
pub fn init_logger_with_filter(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // try_init: Err если subscriber уже установлен, это нормально
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
