//! 徽章解锁规则
//!
//! 每种规则是对用户统计字段的固定布尔判断，使用封闭枚举穷举匹配。
//! 无法从统计数据推导的徽章（如首次对话）使用显式触发标识，由调用方在事件发生时传入。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::models::UserStats;

/// 解锁规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnlockRule {
    TotalBookingsAtLeast { threshold: u32 },
    TotalReviewsAtLeast { threshold: u32 },
    StreakDaysAtLeast { threshold: u32 },
    /// 基于发放后的积分总额判断
    TotalPointsAtLeast { threshold: u64 },
    /// 仅当调用方传入对应触发标识时满足
    ExplicitTrigger { trigger: String },
}

impl UnlockRule {
    pub fn is_satisfied(&self, input: &RuleInput, triggers: &TriggerSet) -> bool {
        match self {
            Self::TotalBookingsAtLeast { threshold } => input.total_bookings >= *threshold,
            Self::TotalReviewsAtLeast { threshold } => input.total_reviews >= *threshold,
            Self::StreakDaysAtLeast { threshold } => input.streak_days >= *threshold,
            Self::TotalPointsAtLeast { threshold } => input.total_points >= *threshold,
            Self::ExplicitTrigger { trigger } => triggers.contains(trigger),
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::ExplicitTrigger { .. })
    }
}

impl fmt::Display for UnlockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalBookingsAtLeast { threshold } => write!(f, "total_bookings >= {}", threshold),
            Self::TotalReviewsAtLeast { threshold } => write!(f, "total_reviews >= {}", threshold),
            Self::StreakDaysAtLeast { threshold } => write!(f, "streak_days >= {}", threshold),
            Self::TotalPointsAtLeast { threshold } => write!(f, "total_points >= {}", threshold),
            Self::ExplicitTrigger { trigger } => write!(f, "trigger:{}", trigger),
        }
    }
}

/// 规则评估输入
///
/// 统计数据中规则关心的字段快照。发放积分时用发放后的总额替换 `total_points`，
/// 避免为了评估而克隆整份 UserStats。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleInput {
    pub total_points: u64,
    pub streak_days: u32,
    pub total_bookings: u32,
    pub total_reviews: u32,
}

impl RuleInput {
    pub fn with_total_points(mut self, total_points: u64) -> Self {
        self.total_points = total_points;
        self
    }
}

impl From<&UserStats> for RuleInput {
    fn from(stats: &UserStats) -> Self {
        Self {
            total_points: stats.total_points(),
            streak_days: stats.streak_days,
            total_bookings: stats.total_bookings,
            total_reviews: stats.total_reviews,
        }
    }
}

/// 显式触发标识集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet(BTreeSet<String>);

impl TriggerSet {
    /// 空集合，仅按统计数据评估
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(trigger: impl Into<String>) -> Self {
        let mut set = Self::default();
        set.insert(trigger);
        set
    }

    pub fn insert(&mut self, trigger: impl Into<String>) {
        self.0.insert(trigger.into());
    }

    pub fn contains(&self, trigger: &str) -> bool {
        self.0.contains(trigger)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TriggerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
