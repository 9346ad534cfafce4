use crate::config::LoggingConfig;
use crate::utils::error::{Result, SchoolError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 初始化日誌。RUST_LOG 優先，其次使用配置中的 level。
///
/// 重複初始化會回傳 `SchoolError::Config`，不會 panic。
pub fn init_logger(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format.as_str() {
        "json" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .try_init(),
        _ => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init(),
    };

    result.map_err(|e| SchoolError::Config {
        field: "logging".to_string(),
        message: format!("Failed to install tracing subscriber: {}", e),
    })
}

