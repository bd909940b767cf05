//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑，返回可序列化的结果，由 main 统一输出。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::engine::RewardsEngine;
use crate::models::{AwardOutcome, Level, UserStats};
use crate::rules::TriggerSet;

/// 目录概要
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub levels: Vec<String>,
    pub badge_count: usize,
    pub explicit_triggers: Vec<String>,
}

/// 等级查询结果
#[derive(Debug, Clone, Serialize)]
pub struct LevelReport {
    pub points: u64,
    pub level: Level,
    pub progress_percent: f64,
    pub points_to_next_level: u64,
    pub next_level: Option<String>,
}

/// 命令执行器
pub struct CommandRunner {
    engine: RewardsEngine,
}

impl CommandRunner {
    pub fn new(engine: RewardsEngine) -> Self {
        Self { engine }
    }

    /// 构造引擎：显式路径优先，否则使用内置目录
    pub fn build_engine(catalog: Option<&Path>) -> Result<RewardsEngine> {
        match catalog {
            Some(path) => RewardsEngine::from_catalog_file(path)
                .with_context(|| format!("加载目录失败: {}", path.display())),
            None => {
                info!("使用内置 SEFTEC 目录");
                Ok(RewardsEngine::seftec())
            }
        }
    }

    /// 执行 check 命令
    pub fn run_check(&self) -> CatalogSummary {
        let levels = self
            .engine
            .levels()
            .levels()
            .iter()
            .map(|l| match l.max_points {
                Some(max) => format!("{} {} [{}, {}]", l.rank, l.name, l.min_points, max),
                None => format!("{} {} [{}, ∞)", l.rank, l.name, l.min_points),
            })
            .collect();

        let explicit_triggers = self
            .engine
            .badges()
            .iter()
            .filter(|b| b.unlock_rule.is_explicit())
            .map(|b| b.unlock_rule.to_string())
            .collect();

        CatalogSummary {
            levels,
            badge_count: self.engine.badges().len(),
            explicit_triggers,
        }
    }

    /// 执行 level 命令
    pub fn run_level(&self, points: u64) -> LevelReport {
        LevelReport {
            points,
            level: self.engine.level_for(points).clone(),
            progress_percent: self.engine.progress_to_next_level(points),
            points_to_next_level: self.engine.points_to_next_level(points),
            next_level: self.engine.next_level(points).map(|l| l.name.clone()),
        }
    }

    /// 执行 award 命令
    pub fn run_award(
        &self,
        stats_path: Option<&Path>,
        points: i64,
        reason: &str,
        triggers: &[String],
    ) -> Result<AwardOutcome> {
        let stats = match stats_path {
            Some(path) => self.read_stats(path)?,
            None => self.engine.new_user_stats(),
        };
        let triggers: TriggerSet = triggers.iter().map(String::as_str).collect();

        Ok(self
            .engine
            .award_points_with_triggers(&stats, points, reason, &triggers))
    }

    fn read_stats(&self, path: &Path) -> Result<UserStats> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取统计快照失败: {}", path.display()))?;
        let stats: UserStats = serde_json::from_str(&raw)
            .with_context(|| format!("解析统计快照失败: {}", path.display()))?;
        // 快照中的等级可能来自旧目录
        Ok(self.engine.reconcile(stats))
    }
}
