//! ShopCoins reward activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a coin movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Earned,
    Redeemed,
}

/// One line in the rewards activity feed.
///
/// `amount` is stored as an absolute value; direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardActivity {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub amount: i64,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl RewardActivity {
    /// Record a signed coin delta the way the feed stores it: positive deltas
    /// are earnings, everything else a redemption, amount made absolute.
    #[must_use]
    pub fn from_delta(delta: i64, description: impl Into<String>, at: DateTime<Utc>) -> Self {
        let kind = if delta > 0 {
            ActivityKind::Earned
        } else {
            ActivityKind::Redeemed
        };
        Self {
            id: Uuid::new_v4(),
            kind,
            amount: delta.abs(),
            description: description.into(),
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_deltas_record_as_earned() {
        let activity = RewardActivity::from_delta(10, "Viewed product in AR", Utc::now());
        assert_eq!(activity.kind, ActivityKind::Earned);
        assert_eq!(activity.amount, 10);
    }

    #[test]
    fn negative_deltas_record_as_redeemed_with_absolute_amount() {
        let activity = RewardActivity::from_delta(-250, "Flash deal discount", Utc::now());
        assert_eq!(activity.kind, ActivityKind::Redeemed);
        assert_eq!(activity.amount, 250);
    }
}
