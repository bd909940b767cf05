//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 奖励引擎命令行工具
///
/// 用于校验目录配置、查询等级、离线演算积分发放。
#[derive(Parser, Debug)]
#[command(name = "rewards-cli")]
#[command(version, about = "SEFTEC 等级与奖励引擎工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// 目录文件路径，未指定时使用配置项 rewards.catalog_path，再回退到内置目录
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 加载并校验目录
    Check,

    /// 查询积分对应的等级与升级进度
    Level {
        /// 积分总额
        #[arg(short, long)]
        points: u64,
    },

    /// 对用户统计快照发放积分，输出结果 JSON
    Award {
        /// UserStats JSON 快照文件，未指定时从新用户开始
        #[arg(short, long)]
        stats: Option<PathBuf>,

        /// 积分变动，可为负数
        #[arg(short, long, allow_hyphen_values = true)]
        points: i64,

        /// 发放原因
        #[arg(short, long, default_value = "manual adjustment")]
        reason: String,

        /// 显式触发标识，可重复指定
        #[arg(short, long = "trigger")]
        triggers: Vec<String>,
    },
}
