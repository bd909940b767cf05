//! 等级与徽章目录
//!
//! 目录是配置数据而非计算状态：可以使用内置的 SEFTEC 目录，也可以从配置文件加载。
//! 构造时完成全部校验，校验通过后等级查找对任意非负积分都是全函数。

use config::{Config, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{CatalogError, Result};
use crate::models::{Badge, Level, Rarity};
use crate::rules::UnlockRule;

/// 内置目录使用的显式触发标识
pub mod triggers {
    /// 首次向 AI 助手发送消息
    pub const FIRST_CHAT: &str = "first_chat";
    /// 22:00 - 06:00 之间完成预订
    pub const NIGHT_OWL: &str = "night_owl";
    /// 05:00 - 07:00 之间完成预订
    pub const EARLY_BIRD: &str = "early_bird";
    /// 在 5 个不同类目下完成预订
    pub const CATEGORY_EXPLORER: &str = "explorer";
    /// 内测期间注册
    pub const BETA_TESTER: &str = "beta_tester";
}

/// 等级目录
///
/// 等级按 rank 升序排列，区间首尾相接覆盖 `[0, ∞)`。
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        Self::validate(&levels)?;
        Ok(Self { levels })
    }

    fn validate(levels: &[Level]) -> Result<()> {
        let first = levels.first().ok_or(CatalogError::EmptyLevels)?;
        if first.min_points != 0 {
            return Err(CatalogError::FirstLevelNotAtZero {
                rank: first.rank,
                min_points: first.min_points,
            });
        }

        let mut expected_min = 0u64;
        for (index, level) in levels.iter().enumerate() {
            let expected_rank = index as u32 + 1;
            if level.rank != expected_rank {
                return Err(CatalogError::NonContiguousRank {
                    expected: expected_rank,
                    actual: level.rank,
                });
            }

            if level.min_points != expected_min {
                return Err(CatalogError::RangeGapOrOverlap {
                    rank: level.rank,
                    expected_min,
                    actual_min: level.min_points,
                });
            }

            let is_last = index + 1 == levels.len();
            match (level.max_points, is_last) {
                (Some(max), _) if max < level.min_points => {
                    return Err(CatalogError::InvertedRange {
                        rank: level.rank,
                        min_points: level.min_points,
                        max_points: max,
                    });
                }
                (Some(max), true) => {
                    return Err(CatalogError::BoundedLastLevel {
                        rank: level.rank,
                        max_points: max,
                    });
                }
                (Some(max), false) => {
                    // 上限已是 u64::MAX 时后面不可能再有等级
                    expected_min = max.checked_add(1).ok_or(CatalogError::RangeGapOrOverlap {
                        rank: level.rank + 1,
                        expected_min: u64::MAX,
                        actual_min: levels[index + 1].min_points,
                    })?;
                }
                (None, false) => {
                    return Err(CatalogError::UnboundedLevelNotLast { rank: level.rank });
                }
                (None, true) => {}
            }
        }

        Ok(())
    }

    /// 查找积分所在等级
    ///
    /// 区间已按 min_points 升序排列，二分查找最后一个 `min_points <= points` 的等级。
    pub fn level_for(&self, points: u64) -> &Level {
        let index = self.levels.partition_point(|l| l.min_points <= points);
        &self.levels[index.saturating_sub(1)]
    }

    /// 给定等级的下一级
    pub fn next_after(&self, level: &Level) -> Option<&Level> {
        // rank 从 1 连续递增，下一级的下标恰好等于当前 rank
        self.levels.get(level.rank as usize)
    }

    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// SEFTEC Hub 内置等级
    pub fn seftec() -> Self {
        Self {
            levels: vec![
                Level::new(1, "Explorer", 0, Some(99))
                    .with_icon("🌱")
                    .with_perks(["Basic chat features", "Browse all services"]),
                Level::new(2, "Adventurer", 100, Some(299))
                    .with_icon("🚀")
                    .with_perks([
                        "Priority chat responses",
                        "5% booking discount",
                        "Early access to new features",
                    ]),
                Level::new(3, "Connoisseur", 300, Some(599))
                    .with_icon("💎")
                    .with_perks([
                        "Personalized recommendations",
                        "10% booking discount",
                        "VIP customer support",
                    ]),
                Level::new(4, "Trendsetter", 600, Some(999))
                    .with_icon("👑")
                    .with_perks([
                        "Exclusive experiences",
                        "15% booking discount",
                        "Beta feature access",
                    ]),
                Level::new(5, "Influencer", 1000, Some(1999))
                    .with_icon("🌟")
                    .with_perks([
                        "Partner benefits",
                        "20% booking discount",
                        "Custom AI personality",
                    ]),
                Level::new(6, "Legend", 2000, None)
                    .with_icon("🔥")
                    .with_perks([
                        "All perks unlocked",
                        "25% booking discount",
                        "Lifetime premium features",
                    ]),
            ],
        }
    }
}

/// 徽章目录
///
/// 保持配置中的顺序，批量评估的返回顺序以此为准。
#[derive(Debug, Clone, Default)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<Badge>) -> Result<Self> {
        Self::validate(&badges)?;
        Ok(Self { badges })
    }

    fn validate(badges: &[Badge]) -> Result<()> {
        let mut seen = HashSet::with_capacity(badges.len());
        for badge in badges {
            if badge.id.trim().is_empty() {
                return Err(CatalogError::EmptyBadgeId);
            }
            if !seen.insert(badge.id.as_str()) {
                return Err(CatalogError::DuplicateBadgeId(badge.id.clone()));
            }
            if let UnlockRule::ExplicitTrigger { trigger } = &badge.unlock_rule {
                if trigger.trim().is_empty() {
                    return Err(CatalogError::EmptyTrigger(badge.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, badge_id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == badge_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// SEFTEC Hub 内置徽章
    pub fn seftec() -> Self {
        use self::triggers::*;

        let trigger = |t: &str| UnlockRule::ExplicitTrigger {
            trigger: t.to_string(),
        };

        Self {
            badges: vec![
                // 探索类
                Badge::new(
                    "first_chat",
                    "First Contact",
                    "Had your first AI conversation",
                    Rarity::Common,
                    10,
                    trigger(FIRST_CHAT),
                )
                .with_icon("💬"),
                Badge::new(
                    "night_owl",
                    "Night Owl",
                    "Booked a service after 10 PM",
                    Rarity::Common,
                    15,
                    trigger(NIGHT_OWL),
                )
                .with_icon("🦉"),
                Badge::new(
                    "early_bird",
                    "Early Bird",
                    "Booked a service before 7 AM",
                    Rarity::Common,
                    15,
                    trigger(EARLY_BIRD),
                )
                .with_icon("🐦"),
                // 社交类
                Badge::new(
                    "reviewer",
                    "Critic",
                    "Left your first review",
                    Rarity::Common,
                    20,
                    UnlockRule::TotalReviewsAtLeast { threshold: 1 },
                )
                .with_icon("⭐"),
                Badge::new(
                    "super_reviewer",
                    "Super Critic",
                    "Left 10 helpful reviews",
                    Rarity::Rare,
                    100,
                    UnlockRule::TotalReviewsAtLeast { threshold: 10 },
                )
                .with_icon("🌟"),
                // 预订类
                Badge::new(
                    "first_booking",
                    "First Timer",
                    "Made your first booking",
                    Rarity::Common,
                    25,
                    UnlockRule::TotalBookingsAtLeast { threshold: 1 },
                )
                .with_icon("🎉"),
                Badge::new(
                    "regular",
                    "Regular",
                    "Made 5 successful bookings",
                    Rarity::Rare,
                    75,
                    UnlockRule::TotalBookingsAtLeast { threshold: 5 },
                )
                .with_icon("🔄"),
                Badge::new(
                    "power_user",
                    "Power User",
                    "Made 25 successful bookings",
                    Rarity::Epic,
                    200,
                    UnlockRule::TotalBookingsAtLeast { threshold: 25 },
                )
                .with_icon("⚡"),
                // 特殊类
                Badge::new(
                    "streak_warrior",
                    "Streak Warrior",
                    "Used the platform for 7 days in a row",
                    Rarity::Rare,
                    150,
                    UnlockRule::StreakDaysAtLeast { threshold: 7 },
                )
                .with_icon("🔥"),
                Badge::new(
                    "explorer",
                    "Category Explorer",
                    "Tried services from 5 different categories",
                    Rarity::Epic,
                    180,
                    trigger(CATEGORY_EXPLORER),
                )
                .with_icon("🗺️"),
                Badge::new(
                    "beta_tester",
                    "Beta Tester",
                    "Joined during the beta period",
                    Rarity::Legendary,
                    500,
                    trigger(BETA_TESTER),
                )
                .with_icon("🧪"),
            ],
        }
    }
}

/// 目录文件格式
///
/// ```toml
/// [[levels]]
/// rank = 1
/// name = "Explorer"
/// min_points = 0
/// max_points = 99
///
/// [[badges]]
/// id = "first_booking"
/// name = "First Timer"
/// description = "Made your first booking"
/// rarity = "common"
/// point_value = 25
/// unlock_rule = { kind = "total_bookings_at_least", threshold = 1 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub levels: Vec<Level>,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl CatalogFile {
    /// 读取目录文件（TOML / JSON / YAML，按扩展名识别）并校验
    pub fn load(path: &Path) -> Result<(LevelCatalog, BadgeCatalog)> {
        let file: CatalogFile = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        let catalogs = file.into_catalogs()?;
        info!(
            path = %path.display(),
            levels = catalogs.0.len(),
            badges = catalogs.1.len(),
            "Catalog loaded"
        );
        Ok(catalogs)
    }

    pub fn into_catalogs(self) -> Result<(LevelCatalog, BadgeCatalog)> {
        Ok((LevelCatalog::new(self.levels)?, BadgeCatalog::new(self.badges)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(rank: u32, min: u64, max: Option<u64>) -> Level {
        Level::new(rank, format!("L{}", rank), min, max)
    }

    #[test]
    fn test_builtin_catalogs_are_valid() {
        let levels = LevelCatalog::seftec();
        LevelCatalog::validate(levels.levels()).unwrap();
        assert_eq!(levels.len(), 6);

        let badges = BadgeCatalog::seftec();
        BadgeCatalog::validate(&badges.badges).unwrap();
        assert_eq!(badges.len(), 11);
    }

    #[test]
    fn test_level_for_boundaries() {
        let levels = LevelCatalog::seftec();
        assert_eq!(levels.level_for(0).rank, 1);
        assert_eq!(levels.level_for(99).rank, 1);
        assert_eq!(levels.level_for(100).rank, 2);
        assert_eq!(levels.level_for(1999).rank, 5);
        assert_eq!(levels.level_for(2000).rank, 6);
        assert_eq!(levels.level_for(u64::MAX).name, "Legend");
    }

    #[test]
    fn test_next_after() {
        let levels = LevelCatalog::seftec();
        let explorer = levels.first().clone();
        assert_eq!(levels.next_after(&explorer).map(|l| l.rank), Some(2));

        let legend = levels.level_for(5000).clone();
        assert!(levels.next_after(&legend).is_none());
    }

    #[test]
    fn test_reject_empty_levels() {
        let err = LevelCatalog::new(vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyLevels));
    }

    #[test]
    fn test_reject_first_level_not_at_zero() {
        let err = LevelCatalog::new(vec![level(1, 10, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::FirstLevelNotAtZero { .. }));
    }

    #[test]
    fn test_reject_gap_and_overlap() {
        let gap = LevelCatalog::new(vec![level(1, 0, Some(99)), level(2, 150, None)]).unwrap_err();
        assert!(matches!(
            gap,
            CatalogError::RangeGapOrOverlap {
                expected_min: 100,
                actual_min: 150,
                ..
            }
        ));

        let overlap =
            LevelCatalog::new(vec![level(1, 0, Some(99)), level(2, 50, None)]).unwrap_err();
        assert!(matches!(overlap, CatalogError::RangeGapOrOverlap { .. }));
    }

    #[test]
    fn test_reject_rank_problems() {
        let err = LevelCatalog::new(vec![level(1, 0, Some(99)), level(3, 100, None)]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NonContiguousRank {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_reject_unbounded_shapes() {
        let err = LevelCatalog::new(vec![level(1, 0, None), level(2, 100, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::UnboundedLevelNotLast { rank: 1 }));

        let err = LevelCatalog::new(vec![level(1, 0, Some(99))]).unwrap_err();
        assert!(matches!(err, CatalogError::BoundedLastLevel { rank: 1, .. }));

        let err = LevelCatalog::new(vec![level(1, 0, Some(u64::MAX)), level(2, u64::MAX, None)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::RangeGapOrOverlap { .. }));
    }

    #[test]
    fn test_reject_inverted_range() {
        let err = LevelCatalog::new(vec![
            level(1, 0, Some(99)),
            level(2, 100, Some(50)),
            level(3, 51, None),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvertedRange { rank: 2, .. }));
    }

    #[test]
    fn test_degenerate_level_is_allowed() {
        let levels =
            LevelCatalog::new(vec![level(1, 0, Some(0)), level(2, 1, None)]).unwrap();
        assert_eq!(levels.level_for(0).rank, 1);
        assert_eq!(levels.level_for(1).rank, 2);
    }

    #[test]
    fn test_reject_duplicate_badge_ids() {
        let mut badges = BadgeCatalog::seftec().badges;
        badges.push(badges[0].clone());
        let err = BadgeCatalog::new(badges).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateBadgeId(id) if id == "first_chat"));
    }

    #[test]
    fn test_reject_empty_trigger() {
        let badge = Badge::new(
            "broken",
            "Broken",
            "",
            Rarity::Common,
            0,
            UnlockRule::ExplicitTrigger {
                trigger: " ".to_string(),
            },
        );
        let err = BadgeCatalog::new(vec![badge]).unwrap_err();
        assert_eq!(err.code(), "EMPTY_TRIGGER");
    }

    #[test]
    fn test_catalog_file_from_json() {
        let raw = serde_json::json!({
            "levels": [
                {"rank": 1, "name": "Explorer", "min_points": 0, "max_points": 99},
                {"rank": 2, "name": "Adventurer", "min_points": 100}
            ],
            "badges": [
                {
                    "id": "first_booking",
                    "name": "First Timer",
                    "description": "Made your first booking",
                    "unlock_rule": {"kind": "total_bookings_at_least", "threshold": 1}
                }
            ]
        });
        let file: CatalogFile = serde_json::from_value(raw).unwrap();
        let (levels, badges) = file.into_catalogs().unwrap();

        assert!(levels.level_for(500).is_final());
        let badge = badges.get("first_booking").unwrap();
        assert_eq!(badge.rarity, Rarity::Common);
        assert_eq!(badge.point_value, 0);
    }
}
