//! User, loyalty tier, and order history types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{OrderId, UserId};
use crate::types::price::Price;
use crate::types::product::CartItem;

/// Loyalty membership ladder. Ordering follows the coin thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// Coin balance at which the tier begins.
    #[must_use]
    pub const fn threshold(self) -> i64 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 1_000,
            Self::Gold => 2_500,
            Self::Platinum => 5_000,
        }
    }

    /// The tier above this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "Bronze"),
            Self::Silver => write!(f, "Silver"),
            Self::Gold => write!(f, "Gold"),
            Self::Platinum => write!(f, "Platinum"),
        }
    }
}

/// Order progress states, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
}

/// A past order on the user's account.
///
/// Carried for the order-history display; the demo never creates new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub coins_earned: i64,
    pub coins_used: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// The signed-in shopper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    /// Current ShopCoins balance.
    pub shop_coins: i64,
    /// Tier is assigned at sign-in and not re-derived when the balance moves.
    pub tier: Tier,
    pub total_spent: Price,
    pub orders: Vec<Order>,
}

impl User {
    /// The demo account every session starts with.
    #[must_use]
    pub fn demo() -> Self {
        Self::demo_with_email("john@example.com")
    }

    /// The demo account with a caller-supplied email (mock sign-in).
    #[must_use]
    pub fn demo_with_email(email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(1),
            name: "John Doe".to_owned(),
            email: email.into(),
            avatar: None,
            shop_coins: 1_250,
            tier: Tier::Gold,
            total_spent: Price::rupees(45_000),
            orders: Vec::new(),
        }
    }

    /// Coins still needed to reach the next tier.
    ///
    /// Zero at the top tier. The difference is signed: a balance that crossed
    /// the next threshold without a tier change reports a negative value.
    #[must_use]
    pub fn coins_to_next_tier(&self) -> i64 {
        self.tier
            .next()
            .map_or(0, |next| next.threshold() - self.shop_coins)
    }

    /// Progress toward the next tier as a 0-100 percentage.
    #[must_use]
    pub fn tier_progress_percent(&self) -> f64 {
        let needed = self.coins_to_next_tier();
        if needed <= 0 {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.shop_coins as f64 / (self.shop_coins + needed) as f64;
        ratio * 100.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds_are_the_fixed_four_step_ladder() {
        assert_eq!(Tier::Bronze.threshold(), 0);
        assert_eq!(Tier::Silver.threshold(), 1_000);
        assert_eq!(Tier::Gold.threshold(), 2_500);
        assert_eq!(Tier::Platinum.threshold(), 5_000);
        assert!(Tier::Bronze < Tier::Platinum);
    }

    #[test]
    fn demo_user_starts_gold_with_1250_coins() {
        let user = User::demo();
        assert_eq!(user.shop_coins, 1_250);
        assert_eq!(user.tier, Tier::Gold);
        assert!(user.orders.is_empty());
    }

    #[test]
    fn coins_to_next_tier_measures_distance_to_the_next_threshold() {
        let user = User::demo();
        // Gold -> Platinum at 5000, so 5000 - 1250.
        assert_eq!(user.coins_to_next_tier(), 3_750);
    }

    #[test]
    fn platinum_users_need_zero_coins_regardless_of_balance() {
        let mut user = User::demo();
        user.tier = Tier::Platinum;
        user.shop_coins = 7;
        assert_eq!(user.coins_to_next_tier(), 0);
        assert!((user.tier_progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn balance_exactly_at_a_threshold_keeps_the_assigned_tier() {
        let mut user = User::demo();
        user.shop_coins = 2_500;
        // Tier stays Gold; distance is measured to Platinum.
        assert_eq!(user.tier, Tier::Gold);
        assert_eq!(user.coins_to_next_tier(), 2_500);
    }

    #[test]
    fn overshooting_the_next_threshold_reports_a_negative_distance() {
        let mut user = User::demo();
        user.shop_coins = 6_000;
        assert_eq!(user.coins_to_next_tier(), -1_000);
        assert!((user.tier_progress_percent() - 100.0).abs() < f64::EPSILON);
    }
}
