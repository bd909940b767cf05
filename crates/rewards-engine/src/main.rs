//! 奖励引擎 CLI
//!
//! 命令行入口点，提供目录校验、等级查询、积分演算功能。

use anyhow::Result;
use clap::Parser;
use rewards_engine::cli::{Cli, CommandRunner, Commands};
use seftec_shared::config::AppConfig;
use seftec_shared::observability;
use serde::Serialize;
use tracing::info;

const SERVICE_NAME: &str = "rewards-cli";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            ..AppConfig::default()
        }
    });

    // 命令行指定的日志级别优先于配置文件
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    observability::init(&config.service_name, &config.observability)?;

    let catalog_path = cli.catalog.clone().or_else(|| config.rewards.catalog_path());
    let engine = CommandRunner::build_engine(catalog_path.as_deref())?;
    let runner = CommandRunner::new(engine);

    match cli.command {
        Commands::Check => {
            let summary = runner.run_check();
            info!(
                levels = summary.levels.len(),
                badges = summary.badge_count,
                "Catalog is valid"
            );
            print_json(&summary)?;
        }
        Commands::Level { points } => {
            print_json(&runner.run_level(points))?;
        }
        Commands::Award {
            stats,
            points,
            reason,
            triggers,
        } => {
            let outcome = runner.run_award(stats.as_deref(), points, &reason, &triggers)?;
            info!(message = %outcome.message, "Award applied");
            print_json(&outcome)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
