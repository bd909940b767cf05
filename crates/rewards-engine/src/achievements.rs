//! 成就进度追踪
//!
//! 成就与徽章不同，暴露部分进度。完成状态由进度推导，完成时间只写入一次。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 进度型成就
///
/// 反序列化时重新推导完成状态，目标进度同样至少为 1。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AchievementRecord")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub point_value: u32,
    current_progress: u32,
    target_progress: u32,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AchievementRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    point_value: u32,
    #[serde(default)]
    current_progress: u32,
    target_progress: u32,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl From<AchievementRecord> for Achievement {
    fn from(record: AchievementRecord) -> Self {
        let target_progress = record.target_progress.max(1);
        let completed = record.current_progress >= target_progress;

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            point_value: record.point_value,
            current_progress: record.current_progress,
            target_progress,
            completed,
            completed_at: record.completed_at.filter(|_| completed),
        }
    }
}

impl Achievement {
    /// 创建成就，目标进度至少为 1
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        point_value: u32,
        target_progress: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            point_value,
            current_progress: 0,
            target_progress: target_progress.max(1),
            completed: false,
            completed_at: None,
        }
    }

    pub fn current_progress(&self) -> u32 {
        self.current_progress
    }

    pub fn target_progress(&self) -> u32 {
        self.target_progress
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// 完成百分比，范围 [0, 100]
    pub fn percent(&self) -> f64 {
        let ratio = f64::from(self.current_progress) / f64::from(self.target_progress);
        (ratio * 100.0).min(100.0)
    }

    /// 推进进度
    ///
    /// 返回 true 表示本次推进使成就完成；已完成的成就继续累加进度但不会再次返回 true。
    pub fn advance(&mut self, delta: u32, at: DateTime<Utc>) -> bool {
        self.current_progress = self.current_progress.saturating_add(delta);

        let reached = self.current_progress >= self.target_progress;
        if reached && !self.completed {
            self.completed = true;
            self.completed_at = Some(at);
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_advance_completes_once() {
        let mut achievement = Achievement::new("book_3", "Booker", "Book three services", 30, 3);

        assert!(!achievement.advance(1, ts(8)));
        assert!(!achievement.advance(1, ts(9)));
        assert!(achievement.advance(1, ts(10)));
        assert!(achievement.is_completed());
        assert_eq!(achievement.completed_at(), Some(ts(10)));

        // 继续推进不会改写完成时间
        assert!(!achievement.advance(5, ts(10) + Duration::hours(1)));
        assert_eq!(achievement.completed_at(), Some(ts(10)));
        assert_eq!(achievement.current_progress(), 8);
        assert_eq!(achievement.percent(), 100.0);
    }

    #[test]
    fn test_overshoot_in_single_step() {
        let mut achievement = Achievement::new("reviews", "Reviewer", "Leave reviews", 10, 2);
        assert!(achievement.advance(10, ts(12)));
        assert!(achievement.is_completed());
    }

    #[test]
    fn test_zero_target_is_clamped() {
        let mut achievement = Achievement::new("noop", "Noop", "", 0, 0);
        assert_eq!(achievement.target_progress(), 1);
        assert!(!achievement.is_completed());
        assert!(achievement.advance(1, ts(1)));
    }

    #[test]
    fn test_percent_partial() {
        let mut achievement = Achievement::new("streak", "Streak", "", 0, 4);
        achievement.advance(1, ts(1));
        assert_eq!(achievement.percent(), 25.0);
    }

    #[test]
    fn test_deserialize_rederives_completion() {
        let achievement: Achievement = serde_json::from_value(serde_json::json!({
            "id": "book_3",
            "title": "Booker",
            "current_progress": 1,
            "target_progress": 3,
            "completed": true,
            "completed_at": "2024-06-01T08:00:00Z"
        }))
        .unwrap();
        assert!(!achievement.is_completed());
        assert_eq!(achievement.completed_at(), None);

        let achievement: Achievement = serde_json::from_value(serde_json::json!({
            "id": "noop",
            "title": "Noop",
            "current_progress": 0,
            "target_progress": 0,
            "completed": false
        }))
        .unwrap();
        assert_eq!(achievement.target_progress(), 1);
        assert!(!achievement.is_completed());

        let mut done = Achievement::new("reviews", "Reviewer", "", 10, 2);
        done.advance(2, ts(12));
        let round_tripped: Achievement =
            serde_json::from_str(&serde_json::to_string(&done).unwrap()).unwrap();
        assert_eq!(round_tripped, done);
    }

    #[test]
    fn test_saturating_progress() {
        let mut achievement = Achievement::new("big", "Big", "", 0, u32::MAX);
        achievement.advance(u32::MAX - 1, ts(1));
        assert!(achievement.advance(10, ts(2)));
        assert_eq!(achievement.current_progress(), u32::MAX);
    }
}
