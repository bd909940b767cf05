//! 奖励引擎
//!
//! 所有操作都是对调用方传入数据的纯函数：不做 I/O、不持有全局可变状态，
//! 返回替换值而非原地修改，便于调用方在单个持久化事务中整体写回。

use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info};

use crate::catalog::{BadgeCatalog, CatalogFile, LevelCatalog};
use crate::error::Result;
use crate::models::{AchievementUpdate, AwardOutcome, Badge, Level, UserStats};
use crate::points::PointAction;
use crate::rules::{RuleInput, TriggerSet};

/// 等级与徽章规则引擎
///
/// 由调用方显式构造并注入，可以放在 `Arc` 中跨线程共享。
#[derive(Debug, Clone)]
pub struct RewardsEngine {
    levels: LevelCatalog,
    badges: BadgeCatalog,
}

impl RewardsEngine {
    pub fn new(levels: LevelCatalog, badges: BadgeCatalog) -> Self {
        Self { levels, badges }
    }

    /// 使用内置 SEFTEC 目录
    pub fn seftec() -> Self {
        Self::new(LevelCatalog::seftec(), BadgeCatalog::seftec())
    }

    /// 从目录文件构造
    pub fn from_catalog_file(path: &Path) -> Result<Self> {
        let (levels, badges) = CatalogFile::load(path)?;
        Ok(Self::new(levels, badges))
    }

    pub fn levels(&self) -> &LevelCatalog {
        &self.levels
    }

    pub fn badges(&self) -> &BadgeCatalog {
        &self.badges
    }

    /// 新用户的初始统计：计数器全部为 0，等级为 rank 1
    pub fn new_user_stats(&self) -> UserStats {
        UserStats::new(self.levels.first().clone())
    }

    /// 按积分重新计算缓存的等级
    ///
    /// 用于从存储反序列化的快照，保证 `current_level` 与当前目录一致。
    pub fn reconcile(&self, mut stats: UserStats) -> UserStats {
        let total = stats.total_points();
        let level = self.level_for(total).clone();
        stats.set_points(total, level);
        stats
    }

    // ==================== 等级计算 ====================

    pub fn level_for(&self, points: u64) -> &Level {
        self.levels.level_for(points)
    }

    pub fn next_level(&self, points: u64) -> Option<&Level> {
        self.levels.next_after(self.level_for(points))
    }

    /// 当前等级内的进度百分比，范围 [0, 100]
    ///
    /// 跨度取到下一级起点（即 `max - min + 1`），0-99 区间内 50 分对应 50%。
    /// 最高等级与单点等级（`max == min`）固定返回 100。
    pub fn progress_to_next_level(&self, points: u64) -> f64 {
        let level = self.level_for(points);
        let Some(next) = self.levels.next_after(level) else {
            return 100.0;
        };
        if level.max_points == Some(level.min_points) {
            return 100.0;
        }

        let span = next.min_points.saturating_sub(level.min_points);
        if span == 0 {
            return 100.0;
        }

        let progress = (points - level.min_points) as f64 * 100.0 / span as f64;
        progress.clamp(0.0, 100.0)
    }

    /// 距离下一级还差的积分，最高等级返回 0
    pub fn points_to_next_level(&self, points: u64) -> u64 {
        self.next_level(points)
            .map(|next| next.min_points.saturating_sub(points))
            .unwrap_or(0)
    }

    // ==================== 徽章评估 ====================

    /// 判断单个徽章是否可解锁
    ///
    /// 未知徽章与已解锁徽章均返回 false。
    pub fn is_badge_unlocked(&self, badge_id: &str, stats: &UserStats, triggers: &TriggerSet) -> bool {
        let Some(badge) = self.badges.get(badge_id) else {
            debug!(badge_id, "Unknown badge id");
            return false;
        };

        if stats.has_badge(badge_id) {
            return false;
        }

        badge.unlock_rule.is_satisfied(&RuleInput::from(stats), triggers)
    }

    /// 评估全部徽章，返回新满足条件的徽章（按目录顺序）
    pub fn evaluate_all_badges(&self, stats: &UserStats, triggers: &TriggerSet) -> Vec<Badge> {
        self.evaluate_with_input(stats, RuleInput::from(stats), triggers)
    }

    fn evaluate_with_input(
        &self,
        stats: &UserStats,
        input: RuleInput,
        triggers: &TriggerSet,
    ) -> Vec<Badge> {
        self.badges
            .iter()
            .filter(|badge| !stats.has_badge(&badge.id))
            .filter(|badge| badge.unlock_rule.is_satisfied(&input, triggers))
            .cloned()
            .collect()
    }

    // ==================== 积分发放 ====================

    /// 发放积分（仅按统计数据评估徽章）
    pub fn award_points(&self, stats: &UserStats, points: i64, reason: &str) -> AwardOutcome {
        self.award_points_with_triggers(stats, points, reason, &TriggerSet::none())
    }

    /// 发放积分并携带显式触发标识
    ///
    /// 积分下限为 0；徽章基于发放后的积分总额评估，其余计数器使用调用方传入的最新值。
    pub fn award_points_with_triggers(
        &self,
        stats: &UserStats,
        points: i64,
        reason: &str,
        triggers: &TriggerSet,
    ) -> AwardOutcome {
        // 缓存的等级可能来自过期快照，以积分重新推导
        let old_rank = self.level_for(stats.total_points()).rank;
        let new_total = apply_delta(stats.total_points(), points);
        let new_level = self.level_for(new_total).clone();
        let leveled_up = new_level.rank > old_rank;

        let input = RuleInput::from(stats).with_total_points(new_total);
        let newly_unlocked_badges = self.evaluate_with_input(stats, input, triggers);

        let mut updated_stats = stats.clone();
        updated_stats.set_points(new_total, new_level);
        updated_stats.push_badges(&newly_unlocked_badges);

        let message = compose_message(
            points,
            reason,
            leveled_up.then(|| updated_stats.current_level().name.as_str()),
            &newly_unlocked_badges,
        );

        debug!(
            points,
            reason,
            old_total = stats.total_points(),
            new_total,
            triggers = ?triggers,
            "Points awarded"
        );
        record_award_metrics(points, leveled_up, newly_unlocked_badges.len());

        if leveled_up {
            info!(
                old_rank,
                new_rank = updated_stats.current_level().rank,
                level = %updated_stats.current_level().name,
                "Level up"
            );
        }
        if !newly_unlocked_badges.is_empty() {
            info!(
                badges = ?newly_unlocked_badges.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(),
                "Badges unlocked"
            );
        }

        AwardOutcome {
            updated_stats,
            leveled_up,
            newly_unlocked_badges,
            message,
        }
    }

    /// 按行为类型发放固定积分
    pub fn award_action(
        &self,
        stats: &UserStats,
        action: PointAction,
        triggers: &TriggerSet,
    ) -> AwardOutcome {
        self.award_points_with_triggers(stats, i64::from(action.points()), action.label(), triggers)
    }

    // ==================== 成就进度 ====================

    /// 推进成就进度，未追踪的成就返回 None
    pub fn record_achievement_progress(
        &self,
        stats: &UserStats,
        achievement_id: &str,
        delta: u32,
        at: DateTime<Utc>,
    ) -> Option<AchievementUpdate> {
        let mut updated_stats = stats.clone();
        let achievement = updated_stats.achievement_mut(achievement_id)?;
        let newly_completed = achievement.advance(delta, at);
        let achievement = achievement.clone();

        if newly_completed {
            info!(
                achievement_id,
                title = %achievement.title,
                completed_at = %at,
                "Achievement completed"
            );
        }

        Some(AchievementUpdate {
            updated_stats,
            achievement,
            newly_completed,
        })
    }
}

/// 应用积分变动，结果下限为 0，上限饱和
fn apply_delta(total: u64, delta: i64) -> u64 {
    if delta >= 0 {
        total.saturating_add(delta.unsigned_abs())
    } else {
        total.saturating_sub(delta.unsigned_abs())
    }
}

fn compose_message(points: i64, reason: &str, new_level: Option<&str>, badges: &[Badge]) -> String {
    let mut message = format!("{:+} points for {}!", points, reason);

    if let Some(level_name) = new_level {
        message.push_str(&format!(" Level up! You're now a {}!", level_name));
    }

    if !badges.is_empty() {
        let names: Vec<&str> = badges.iter().map(|b| b.name.as_str()).collect();
        let plural = if badges.len() > 1 { "s" } else { "" };
        message.push_str(&format!(" New badge{}: {}!", plural, names.join(", ")));
    }

    message
}

fn record_award_metrics(points: i64, leveled_up: bool, unlocked: usize) {
    let direction = if points >= 0 { "award" } else { "penalty" };
    metrics::counter!("rewards_points_awarded_total", "direction" => direction)
        .increment(points.unsigned_abs());

    if leveled_up {
        metrics::counter!("rewards_level_ups_total").increment(1);
    }
    if unlocked > 0 {
        metrics::counter!("rewards_badges_unlocked_total").increment(unlocked as u64);
    }
}
