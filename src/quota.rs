// Quota display: a pure mapping from remaining counts to an indicator level.

use crate::models::QuotaInfo;

pub const USER_DAILY_LIMIT: i64 = 5;
pub const GLOBAL_DAILY_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    Exhausted,
    Low,
    Healthy,
}

impl QuotaLevel {
    // Indicator colour (red / amber / green)
    pub fn color(&self) -> &'static str {
        match self {
            QuotaLevel::Exhausted => "#ff4444",
            QuotaLevel::Low => "#ffaa00",
            QuotaLevel::Healthy => "#44ff44",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuotaLevel::Exhausted => "exhausted",
            QuotaLevel::Low => "low",
            QuotaLevel::Healthy => "ok",
        }
    }
}

pub fn user_level(left: i64) -> QuotaLevel {
    if left <= 0 {
        QuotaLevel::Exhausted
    } else if left <= 2 {
        QuotaLevel::Low
    } else {
        QuotaLevel::Healthy
    }
}

pub fn global_level(left: i64) -> QuotaLevel {
    if left < 100 {
        QuotaLevel::Exhausted
    } else if left < 500 {
        QuotaLevel::Low
    } else {
        QuotaLevel::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaIndicator {
    pub title: &'static str,
    pub left: i64,
    pub limit: i64,
    pub level: QuotaLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaView {
    pub user: QuotaIndicator,
    pub global: QuotaIndicator,
}

impl From<&QuotaInfo> for QuotaView {
    fn from(quota: &QuotaInfo) -> Self {
        QuotaView {
            user: QuotaIndicator {
                title: "Your Quota",
                left: quota.user_left_today,
                limit: USER_DAILY_LIMIT,
                level: user_level(quota.user_left_today),
            },
            global: QuotaIndicator {
                title: "Global Quota",
                left: quota.global_left_today,
                limit: GLOBAL_DAILY_LIMIT,
                level: global_level(quota.global_left_today),
            },
        }
    }
}
