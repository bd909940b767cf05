//! 用户行为积分表

use serde::{Deserialize, Serialize};
use std::fmt;

/// 可获得积分的用户行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointAction {
    FirstChat,
    ChatMessage,
    FirstBooking,
    BookingCompleted,
    ReviewLeft,
    HelpfulReview,
    ShareExperience,
    DailyLogin,
    StreakBonus,
    CategoryFirstTry,
    PerfectRatingGiven,
    FriendReferred,
}

impl PointAction {
    pub const ALL: [PointAction; 12] = [
        Self::FirstChat,
        Self::ChatMessage,
        Self::FirstBooking,
        Self::BookingCompleted,
        Self::ReviewLeft,
        Self::HelpfulReview,
        Self::ShareExperience,
        Self::DailyLogin,
        Self::StreakBonus,
        Self::CategoryFirstTry,
        Self::PerfectRatingGiven,
        Self::FriendReferred,
    ];

    /// 行为对应的固定积分
    pub fn points(&self) -> u32 {
        match self {
            Self::FirstChat => 10,
            Self::ChatMessage => 1,
            Self::FirstBooking => 25,
            Self::BookingCompleted => 15,
            Self::ReviewLeft => 20,
            Self::HelpfulReview => 10,
            Self::ShareExperience => 5,
            Self::DailyLogin => 5,
            Self::StreakBonus => 10,
            Self::CategoryFirstTry => 15,
            Self::PerfectRatingGiven => 25,
            Self::FriendReferred => 100,
        }
    }

    /// 发放原因文案
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstChat => "your first chat",
            Self::ChatMessage => "sent message",
            Self::FirstBooking => "your first booking",
            Self::BookingCompleted => "completing a booking",
            Self::ReviewLeft => "leaving a review",
            Self::HelpfulReview => "a helpful review",
            Self::ShareExperience => "sharing an experience",
            Self::DailyLogin => "daily login",
            Self::StreakBonus => "keeping your streak",
            Self::CategoryFirstTry => "trying a new category",
            Self::PerfectRatingGiven => "a perfect rating",
            Self::FriendReferred => "referring a friend",
        }
    }
}

impl fmt::Display for PointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FirstChat => "FIRST_CHAT",
            Self::ChatMessage => "CHAT_MESSAGE",
            Self::FirstBooking => "FIRST_BOOKING",
            Self::BookingCompleted => "BOOKING_COMPLETED",
            Self::ReviewLeft => "REVIEW_LEFT",
            Self::HelpfulReview => "HELPFUL_REVIEW",
            Self::ShareExperience => "SHARE_EXPERIENCE",
            Self::DailyLogin => "DAILY_LOGIN",
            Self::StreakBonus => "STREAK_BONUS",
            Self::CategoryFirstTry => "CATEGORY_FIRST_TRY",
            Self::PerfectRatingGiven => "PERFECT_RATING_GIVEN",
            Self::FriendReferred => "FRIEND_REFERRED",
        };
        write!(f, "{}", s)
    }
}
