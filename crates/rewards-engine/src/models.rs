//! 奖励引擎领域模型
//!
//! 等级、徽章为静态目录数据；UserStats 由调用方持有，引擎只读取并返回替换值。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::achievements::Achievement;
use crate::rules::UnlockRule;

/// 等级定义
///
/// 区间为闭区间 `[min_points, max_points]`，`max_points` 为 None 表示无上限（仅最后一级）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub rank: u32,
    pub name: String,
    pub min_points: u64,
    #[serde(default)]
    pub max_points: Option<u64>,
    /// 展示用图标
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub perks: Vec<String>,
}

impl Level {
    pub fn new(rank: u32, name: impl Into<String>, min_points: u64, max_points: Option<u64>) -> Self {
        Self {
            rank,
            name: name.into(),
            min_points,
            max_points,
            icon: String::new(),
            perks: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_perks<I, S>(mut self, perks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.perks = perks.into_iter().map(Into::into).collect();
        self
    }

    /// 积分是否落在本等级区间内
    pub fn contains(&self, points: u64) -> bool {
        points >= self.min_points && self.max_points.is_none_or(|max| points <= max)
    }

    /// 是否为最高等级（无上限）
    pub fn is_final(&self) -> bool {
        self.max_points.is_none()
    }
}

/// 徽章稀有度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        };
        write!(f, "{}", s)
    }
}

/// 徽章目录条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub point_value: u32,
    pub unlock_rule: UnlockRule,
}

impl Badge {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        rarity: Rarity,
        point_value: u32,
        unlock_rule: UnlockRule,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: String::new(),
            rarity,
            point_value,
            unlock_rule,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// 用户统计聚合
///
/// `total_points` 与 `current_level` 只能由引擎修改，保证 `current_level == level_for(total_points)`；
/// 行为计数器（预订数、评价数、连续天数）由调用方在业务成功后自行累加。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    total_points: u64,
    current_level: Level,
    #[serde(default)]
    unlocked_badges: Vec<Badge>,
    #[serde(default)]
    achievements: Vec<Achievement>,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub favorite_category: String,
}

impl UserStats {
    pub(crate) fn new(initial_level: Level) -> Self {
        Self {
            total_points: 0,
            current_level: initial_level,
            unlocked_badges: Vec::new(),
            achievements: Vec::new(),
            streak_days: 0,
            total_bookings: 0,
            total_reviews: 0,
            favorite_category: String::new(),
        }
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn current_level(&self) -> &Level {
        &self.current_level
    }

    /// 已解锁徽章，按解锁顺序排列
    pub fn unlocked_badges(&self) -> &[Badge] {
        &self.unlocked_badges
    }

    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.unlocked_badges.iter().any(|b| b.id == badge_id)
    }

    /// 最近解锁的 n 个徽章（旧的在前）
    pub fn recent_badges(&self, n: usize) -> &[Badge] {
        let start = self.unlocked_badges.len().saturating_sub(n);
        &self.unlocked_badges[start..]
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn completed_achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.is_completed())
    }

    /// 登记需要追踪进度的成就，已存在的同 ID 成就保持不变
    pub fn track_achievement(mut self, achievement: Achievement) -> Self {
        if !self.achievements.iter().any(|a| a.id == achievement.id) {
            self.achievements.push(achievement);
        }
        self
    }

    pub(crate) fn achievement_mut(&mut self, achievement_id: &str) -> Option<&mut Achievement> {
        self.achievements.iter_mut().find(|a| a.id == achievement_id)
    }

    /// 写入积分与等级，两者必须在同一处更新
    pub(crate) fn set_points(&mut self, total_points: u64, level: Level) {
        self.total_points = total_points;
        self.current_level = level;
    }

    pub(crate) fn push_badges(&mut self, badges: &[Badge]) {
        for badge in badges {
            if !self.has_badge(&badge.id) {
                self.unlocked_badges.push(badge.clone());
            }
        }
    }
}

/// 积分发放结果
#[derive(Debug, Clone, Serialize)]
pub struct AwardOutcome {
    pub updated_stats: UserStats,
    pub leveled_up: bool,
    pub newly_unlocked_badges: Vec<Badge>,
    /// 展示文案，不属于契约字段
    pub message: String,
}

impl AwardOutcome {
    pub fn new_badge_ids(&self) -> Vec<&str> {
        self.newly_unlocked_badges.iter().map(|b| b.id.as_str()).collect()
    }
}

/// 成就进度更新结果
#[derive(Debug, Clone, Serialize)]
pub struct AchievementUpdate {
    pub updated_stats: UserStats,
    pub achievement: Achievement,
    /// 本次更新是否使成就从未完成变为完成
    pub newly_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explorer() -> Level {
        Level::new(1, "Explorer", 0, Some(99))
    }

    #[test]
    fn test_level_contains() {
        let level = explorer();
        assert!(level.contains(0));
        assert!(level.contains(99));
        assert!(!level.contains(100));

        let legend = Level::new(6, "Legend", 2000, None);
        assert!(legend.contains(u64::MAX));
        assert!(!legend.contains(1999));
        assert!(legend.is_final());
    }

    #[test]
    fn test_recent_badges() {
        let mut stats = UserStats::new(explorer());
        let badges: Vec<Badge> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| {
                Badge::new(
                    *id,
                    id.to_uppercase(),
                    "",
                    Rarity::Common,
                    0,
                    UnlockRule::ExplicitTrigger {
                        trigger: id.to_string(),
                    },
                )
            })
            .collect();
        stats.push_badges(&badges);

        let recent: Vec<&str> = stats.recent_badges(3).iter().map(|b| b.id.as_str()).collect();
        assert_eq!(recent, vec!["b", "c", "d"]);
        assert_eq!(stats.recent_badges(10).len(), 4);
    }

    #[test]
    fn test_push_badges_keeps_set_semantics() {
        let mut stats = UserStats::new(explorer());
        let badge = Badge::new(
            "reviewer",
            "Critic",
            "Left your first review",
            Rarity::Common,
            20,
            UnlockRule::TotalReviewsAtLeast { threshold: 1 },
        );
        stats.push_badges(&[badge.clone()]);
        stats.push_badges(&[badge]);
        assert_eq!(stats.unlocked_badges().len(), 1);
        assert!(stats.has_badge("reviewer"));
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = UserStats::new(explorer());
        stats.total_bookings = 3;

        let json = serde_json::to_string(&stats).unwrap();
        let parsed: UserStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }

    #[test]
    fn test_rarity_serialization() {
        assert_eq!(serde_json::to_string(&Rarity::Legendary).unwrap(), "\"legendary\"");
        assert_eq!(Rarity::Epic.to_string(), "epic");
    }
}
