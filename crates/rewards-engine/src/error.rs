//! 奖励引擎错误类型
//!
//! 引擎的评估与发放操作都是全函数，不返回错误；
//! 这里只有目录配置错误，应在启动或测试阶段暴露。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("等级目录为空")]
    EmptyLevels,

    #[error("首个等级必须从 0 分开始: rank={rank} min_points={min_points}")]
    FirstLevelNotAtZero { rank: u32, min_points: u64 },

    #[error("等级序号不连续: 期望 {expected}, 实际 {actual}")]
    NonContiguousRank { expected: u32, actual: u32 },

    #[error("等级区间倒置: rank={rank} [{min_points}, {max_points}]")]
    InvertedRange {
        rank: u32,
        min_points: u64,
        max_points: u64,
    },

    #[error("等级区间不衔接: rank={rank} 应从 {expected_min} 开始, 实际 {actual_min}")]
    RangeGapOrOverlap {
        rank: u32,
        expected_min: u64,
        actual_min: u64,
    },

    #[error("只有最后一个等级可以没有上限: rank={rank}")]
    UnboundedLevelNotLast { rank: u32 },

    #[error("最后一个等级必须没有上限: rank={rank} max_points={max_points}")]
    BoundedLastLevel { rank: u32, max_points: u64 },

    #[error("徽章 ID 重复: {0}")]
    DuplicateBadgeId(String),

    #[error("徽章 ID 不能为空")]
    EmptyBadgeId,

    #[error("徽章触发标识不能为空: badge_id={0}")]
    EmptyTrigger(String),

    #[error("目录文件加载失败: {0}")]
    Load(#[from] config::ConfigError),
}

impl CatalogError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyLevels => "EMPTY_LEVELS",
            Self::FirstLevelNotAtZero { .. } => "FIRST_LEVEL_NOT_AT_ZERO",
            Self::NonContiguousRank { .. } => "NON_CONTIGUOUS_RANK",
            Self::InvertedRange { .. } => "INVERTED_RANGE",
            Self::RangeGapOrOverlap { .. } => "RANGE_GAP_OR_OVERLAP",
            Self::UnboundedLevelNotLast { .. } => "UNBOUNDED_LEVEL_NOT_LAST",
            Self::BoundedLastLevel { .. } => "BOUNDED_LAST_LEVEL",
            Self::DuplicateBadgeId(_) => "DUPLICATE_BADGE_ID",
            Self::EmptyBadgeId => "EMPTY_BADGE_ID",
            Self::EmptyTrigger(_) => "EMPTY_TRIGGER",
            Self::Load(_) => "CATALOG_LOAD_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = CatalogError::DuplicateBadgeId("first_chat".to_string());
        assert_eq!(err.code(), "DUPLICATE_BADGE_ID");
        assert!(err.to_string().contains("first_chat"));
    }
}
