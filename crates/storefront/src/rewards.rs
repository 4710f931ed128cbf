//! ShopCoins award schedule.
//!
//! Maps engagement event kinds to coin awards and activity-feed descriptions.
//! Every award flows through [`reward_for`] so the schedule lives in one place;
//! kinds absent from it (viewer close, visibility beacons) earn nothing.

use shopverse_core::types::kinds;

/// Upper bound of the daily spin award.
pub const DAILY_SPIN_MAX: i64 = 500;

/// One coin award with its activity-feed description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub coins: i64,
    pub description: String,
}

/// Coins awarded for an engagement event, if the kind is rewarded.
///
/// `product_name` feeds the descriptions that name the product; kinds with
/// static descriptions ignore it.
#[must_use]
pub fn reward_for(kind: &str, product_name: Option<&str>) -> Option<Reward> {
    let product = product_name.unwrap_or("this product");
    let (coins, description) = match kind {
        kinds::ADD_TO_CART => (5, "Added item to cart".to_owned()),
        kinds::AR_VIEWER_OPENED => (10, format!("Viewed {product} in AR")),
        kinds::VR_VIEW_INITIATED => (15, format!("Viewed {product} in VR")),
        kinds::COLOR_CUSTOMIZATION => (5, format!("Customized {product} color")),
        kinds::SHARE_AR_EXPERIENCE => (15, "Shared AR experience".to_owned()),
        kinds::AR_SESSION_STARTED => (20, format!("AR interaction: {kind}")),
        kinds::MODEL_INTERACTION => (2, format!("AR interaction: {kind}")),
        kinds::CONTROL => (1, format!("AR interaction: {kind}")),
        _ => return None,
    };
    Some(Reward { coins, description })
}

/// Roll the daily spin award: a uniform draw up to [`DAILY_SPIN_MAX`] coins.
pub fn daily_spin<R: rand::Rng + ?Sized>(rng: &mut R) -> Reward {
    Reward {
        coins: rng.random_range(1..=DAILY_SPIN_MAX),
        description: "Daily Spin reward".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cart_additions_award_five_coins() {
        let reward = reward_for(kinds::ADD_TO_CART, None).unwrap();
        assert_eq!(reward.coins, 5);
        assert_eq!(reward.description, "Added item to cart");
    }

    #[test]
    fn viewer_awards_name_the_product() {
        let reward = reward_for(kinds::AR_VIEWER_OPENED, Some("Modern Sofa")).unwrap();
        assert_eq!(reward.coins, 10);
        assert_eq!(reward.description, "Viewed Modern Sofa in AR");

        let reward = reward_for(kinds::VR_VIEW_INITIATED, Some("Modern Sofa")).unwrap();
        assert_eq!(reward.coins, 15);
        assert_eq!(reward.description, "Viewed Modern Sofa in VR");

        let reward = reward_for(kinds::COLOR_CUSTOMIZATION, Some("Modern Sofa")).unwrap();
        assert_eq!(reward.coins, 5);
        assert_eq!(reward.description, "Customized Modern Sofa color");
    }

    #[test]
    fn scene_interactions_award_the_fixed_ladder() {
        assert_eq!(reward_for(kinds::MODEL_INTERACTION, None).unwrap().coins, 2);
        assert_eq!(reward_for(kinds::CONTROL, None).unwrap().coins, 1);
        assert_eq!(
            reward_for(kinds::AR_SESSION_STARTED, None).unwrap().coins,
            20
        );
        assert_eq!(
            reward_for(kinds::SHARE_AR_EXPERIENCE, None).unwrap().coins,
            15
        );
    }

    #[test]
    fn unrewarded_kinds_earn_nothing() {
        assert!(reward_for(kinds::AR_VIEWER_CLOSED, None).is_none());
        assert!(reward_for(kinds::APP_INITIALIZED, None).is_none());
        assert!(reward_for(kinds::PAGE_VISIBILITY_CHANGED, None).is_none());
        assert!(reward_for("made_up_kind", None).is_none());
    }

    #[test]
    fn daily_spin_stays_within_bounds() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let reward = daily_spin(&mut rng);
            assert!((1..=DAILY_SPIN_MAX).contains(&reward.coins));
            assert_eq!(reward.description, "Daily Spin reward");
        }
    }
}
