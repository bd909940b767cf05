//! 统一可观测性模块
//!
//! 所有二进制入口通过单一入口点初始化日志，确保一致的日志格式和过滤规则。
//! 业务代码只依赖 `tracing` 宏，不关心订阅者如何安装。

pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use seftec_shared::config::AppConfig;
/// use seftec_shared::observability;
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("rewards-cli")?;
///     observability::init(&config.service_name, &config.observability)?;
///     Ok(())
/// }
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs(),
        "Observability initialized"
    );

    Ok(())
}
