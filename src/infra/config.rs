use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::BASIS_POINTS;
use crate::engine::game_loop::EngineSettings;
use crate::eval::TieBreakRule;
use crate::infra::rng_seed::RngSeed;

/// Переменная окружения с путём к TOML-конфигу.
pub const CONFIG_PATH_ENV: &str = "HOLDEM_CONFIG";

/// Настройки доставки фактов в кошелёк.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_backoff_ms: 200,
        }
    }
}

/// Конфигурация движка и рантайма столов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Рейк в базисных пунктах (500 = 5%).
    pub service_fee_bps: u32,
    /// Пауза между матчами.
    pub match_start_delay_ms: u64,
    /// За сколько до старта матча предупреждать клиентов.
    pub next_match_warning_ms: u64,
    pub tie_break: TieBreakRule,
    /// Базовый seed для воспроизводимых раздач; None – системный RNG.
    pub rng_seed: Option<u64>,
    /// Размер очереди команд одного стола.
    pub command_buffer: usize,
    /// Планировать следующий матч автоматически.
    pub auto_next_match: bool,
    pub ledger: LedgerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service_fee_bps: 500,
            match_start_delay_ms: 12_000,
            next_match_warning_ms: 3_000,
            tie_break: TieBreakRule::Standard,
            rng_seed: None,
            command_buffer: 64,
            auto_next_match: true,
            ledger: LedgerConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            service_fee_bps: self.service_fee_bps,
            tie_break: self.tie_break,
        }
    }

    pub fn seed(&self) -> Option<RngSeed> {
        self.rng_seed.map(RngSeed::from_u64)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Поля TOML-файла; всё необязательное, отсутствующее берётся из дефолтов.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    service_fee_bps: Option<u32>,
    #[serde(default)]
    match_start_delay_ms: Option<u64>,
    #[serde(default)]
    next_match_warning_ms: Option<u64>,
    #[serde(default)]
    tie_break: Option<TieBreakRule>,
    #[serde(default)]
    rng_seed: Option<u64>,
    #[serde(default)]
    command_buffer: Option<usize>,
    #[serde(default)]
    auto_next_match: Option<bool>,
    #[serde(default)]
    ledger: Option<FileLedgerConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLedgerConfig {
    #[serde(default)]
    max_attempts: Option<u32>,
    #[serde(default)]
    retry_backoff_ms: Option<u64>,
}

/// Загрузить конфиг: дефолты < файл из `HOLDEM_CONFIG` < переменные окружения.
pub fn load() -> Result<EngineConfig, ConfigError> {
    let file = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => Some(read_file(Path::new(&path))?),
        _ => None,
    };
    resolve(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    Ok(fs::read_to_string(path)?)
}

/// Собрать конфиг из содержимого файла и источника переменных окружения.
pub fn resolve(
    file_toml: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<EngineConfig, ConfigError> {
    let mut cfg = EngineConfig::default();

    if let Some(text) = file_toml {
        let f: FileConfig = toml::from_str(text)?;
        if let Some(v) = f.service_fee_bps {
            cfg.service_fee_bps = v;
        }
        if let Some(v) = f.match_start_delay_ms {
            cfg.match_start_delay_ms = v;
        }
        if let Some(v) = f.next_match_warning_ms {
            cfg.next_match_warning_ms = v;
        }
        if let Some(v) = f.tie_break {
            cfg.tie_break = v;
        }
        if let Some(v) = f.rng_seed {
            cfg.rng_seed = Some(v);
        }
        if let Some(v) = f.command_buffer {
            cfg.command_buffer = v;
        }
        if let Some(v) = f.auto_next_match {
            cfg.auto_next_match = v;
        }
        if let Some(ledger) = f.ledger {
            if let Some(v) = ledger.max_attempts {
                cfg.ledger.max_attempts = v;
            }
            if let Some(v) = ledger.retry_backoff_ms {
                cfg.ledger.retry_backoff_ms = v;
            }
        }
    }

    if let Some(v) = non_empty(env("HOLDEM_SERVICE_FEE_BPS")) {
        cfg.service_fee_bps = v
            .parse()
            .map_err(|_| ConfigError::Invalid("HOLDEM_SERVICE_FEE_BPS is not a number".into()))?;
    }
    if let Some(v) = non_empty(env("HOLDEM_SEED")) {
        cfg.rng_seed = Some(
            v.parse()
                .map_err(|_| ConfigError::Invalid("HOLDEM_SEED is not a number".into()))?,
        );
    }
    if let Some(v) = non_empty(env("HOLDEM_MATCH_DELAY_MS")) {
        cfg.match_start_delay_ms = v
            .parse()
            .map_err(|_| ConfigError::Invalid("HOLDEM_MATCH_DELAY_MS is not a number".into()))?;
    }
    if let Some(v) = non_empty(env("HOLDEM_TIE_BREAK")) {
        cfg.tie_break = v.parse().map_err(ConfigError::Invalid)?;
    }

    validate(&cfg)?;
    Ok(cfg)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn validate(cfg: &EngineConfig) -> Result<(), ConfigError> {
    if u64::from(cfg.service_fee_bps) > BASIS_POINTS {
        return Err(ConfigError::Invalid(
            "service_fee_bps must not exceed 10000".into(),
        ));
    }
    if cfg.command_buffer == 0 {
        return Err(ConfigError::Invalid("command_buffer must be >0".into()));
    }
    if cfg.ledger.max_attempts == 0 {
        return Err(ConfigError::Invalid("ledger.max_attempts must be >=1".into()));
    }
    Ok(())
}
