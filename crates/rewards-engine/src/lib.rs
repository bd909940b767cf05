//! SEFTEC 等级与奖励引擎
//!
//! 提供纯函数式的积分奖励计算能力，支持：
//! - 积分到等级的映射与升级进度
//! - 徽章解锁规则评估（统计阈值与显式触发）
//! - 积分发放事务（返回替换后的用户统计）
//! - 成就进度追踪

pub mod achievements;
pub mod catalog;
pub mod cli;
pub mod engine;
pub mod error;
pub mod models;
pub mod points;
pub mod rules;
pub mod surprise;

pub use achievements::Achievement;
pub use catalog::{BadgeCatalog, CatalogFile, LevelCatalog, triggers};
pub use engine::RewardsEngine;
pub use error::{CatalogError, Result};
pub use models::{AchievementUpdate, AwardOutcome, Badge, Level, Rarity, UserStats};
pub use points::PointAction;
pub use rules::{RuleInput, TriggerSet, UnlockRule};
pub use surprise::{SurpriseKind, SurpriseReward, draw_surprise_reward};
