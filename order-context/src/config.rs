use bon::Builder;
use mediator_application::behaviours::RetryPolicy;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const TIMEOUT_ENV: &str = "ORDER_CONTEXT_TIMEOUT_MS";
pub const RETRY_ATTEMPTS_ENV: &str = "ORDER_CONTEXT_RETRY_ATTEMPTS";

/// 订单上下文运行配置
#[derive(Builder, Clone, Debug)]
pub struct AppConfig {
    /// 单次请求分发的超时（覆盖全部重试）
    #[builder(default = Duration::from_secs(5))]
    pub timeout: Duration,
    #[builder(default)]
    pub retry: RetryPolicy,
    /// 事件广播缓冲容量
    #[builder(default = 1024)]
    pub publisher_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl AppConfig {
    /// 从环境变量读取覆盖项，非法取值忽略并沿用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = read::<u64>(&lookup, TIMEOUT_ENV) {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = read::<u32>(&lookup, RETRY_ATTEMPTS_ENV) {
            config.retry.max_attempts = attempts;
        }

        config
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Option<T>
where
    T: FromStr + PartialEq + Default,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match parse_positive(key, &raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%err, "ignoring configuration override");
            None
        }
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: Display,
{
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason,
    };
    let value: T = raw.trim().parse().map_err(|e: T::Err| invalid(e.to_string()))?;
    if value == T::default() {
        return Err(invalid("must be greater than zero".into()));
    }
    Ok(value)
}
