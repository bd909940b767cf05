//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `check` - 加载并校验等级与徽章目录
//! - `level` - 查询积分对应的等级、进度与升级差额
//! - `award` - 对 UserStats 快照发放积分并输出结果
//!
//! # 使用示例
//!
//! ```bash
//! # 校验目录文件
//! rewards-cli --catalog config/catalog.toml check
//!
//! # 查询等级
//! rewards-cli level --points 250
//!
//! # 发放积分（携带显式触发标识）
//! rewards-cli award --stats stats.json --points 10 --reason chat -t first_chat
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::{CatalogSummary, CommandRunner, LevelReport};
