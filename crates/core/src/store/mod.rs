//! The reactive store: one state struct, one dispatch function.
//!
//! Every mutation in the app flows through [`StoreState::dispatch`], which
//! applies the action and returns the side effects the host still owes
//! (currently only [`Effect::Persist`]). Reads go through selector methods.
//! Dispatch never fails; actions that cannot apply (no user, unknown line)
//! are no-ops.
//!
//! Category and search query are ephemeral: they are dispatched like
//! everything else but excluded from the persisted record, which is why
//! their actions return no effects.

pub mod snapshot;

pub use snapshot::{Rehydration, SCHEMA_VERSION, STORE_RECORD_KEY, StoreSnapshot};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::types::{
    AnalyticsEvent, AnalyticsStats, CartItem, EventPayload, Product, ProductId, RewardActivity,
    User,
};

/// Most recent reward activities kept in the feed.
pub const REWARD_LOG_CAP: usize = 50;

/// Most recent analytics events kept in the log.
pub const ANALYTICS_LOG_CAP: usize = 1000;

/// Everything the UI renders from, mutated only through [`dispatch`].
///
/// [`dispatch`]: StoreState::dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub dark_mode: bool,
    pub selected_category: String,
    pub search_query: String,
    pub cart_items: Vec<CartItem>,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub reward_activities: Vec<RewardActivity>,
    pub analytics_events: Vec<AnalyticsEvent>,
    pub ar_mode: bool,
    pub vr_mode: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            dark_mode: false,
            selected_category: "all".to_owned(),
            search_query: String::new(),
            cart_items: Vec::new(),
            user: Some(User::demo()),
            is_authenticated: true,
            reward_activities: Vec::new(),
            analytics_events: Vec::new(),
            ar_mode: false,
            vr_mode: false,
        }
    }
}

/// A state mutation intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleDarkMode,
    SetSelectedCategory(String),
    SetSearchQuery(String),
    AddToCart { product: Product, quantity: u32 },
    RemoveFromCart(ProductId),
    SetQuantity { product_id: ProductId, quantity: u32 },
    ClearCart,
    /// Move the coin balance by `delta` and record one activity entry.
    AdjustCoins { delta: i64, description: String },
    RecordEvent { kind: String, payload: EventPayload },
    Login { email: String },
    Logout,
    SetArMode(bool),
    SetVrMode(bool),
}

/// Work the host owes after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// A persisted field changed; write the snapshot back to storage.
    Persist,
}

impl StoreState {
    /// Apply `action` and return the side effects the host must carry out.
    pub fn dispatch(&mut self, action: Action, now: DateTime<Utc>) -> Vec<Effect> {
        match action {
            Action::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                vec![Effect::Persist]
            }
            Action::SetSelectedCategory(category) => {
                self.selected_category = category;
                Vec::new()
            }
            Action::SetSearchQuery(query) => {
                self.search_query = query;
                Vec::new()
            }
            Action::AddToCart { product, quantity } => {
                if quantity == 0 {
                    return Vec::new();
                }
                if let Some(line) = self
                    .cart_items
                    .iter_mut()
                    .find(|line| line.product.id == product.id)
                {
                    line.quantity = line.quantity.saturating_add(quantity);
                } else {
                    self.cart_items.push(CartItem::new(product, quantity));
                }
                vec![Effect::Persist]
            }
            Action::RemoveFromCart(product_id) => {
                self.cart_items.retain(|line| line.product.id != product_id);
                vec![Effect::Persist]
            }
            Action::SetQuantity {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    self.cart_items.retain(|line| line.product.id != product_id);
                } else if let Some(line) = self
                    .cart_items
                    .iter_mut()
                    .find(|line| line.product.id == product_id)
                {
                    line.quantity = quantity;
                }
                vec![Effect::Persist]
            }
            Action::ClearCart => {
                self.cart_items.clear();
                vec![Effect::Persist]
            }
            Action::AdjustCoins { delta, description } => {
                let Some(user) = self.user.as_mut() else {
                    return Vec::new();
                };
                user.shop_coins += delta;
                self.reward_activities
                    .insert(0, RewardActivity::from_delta(delta, description, now));
                self.reward_activities.truncate(REWARD_LOG_CAP);
                vec![Effect::Persist]
            }
            Action::RecordEvent { kind, payload } => {
                self.analytics_events
                    .insert(0, AnalyticsEvent::new(kind, payload, now));
                self.analytics_events.truncate(ANALYTICS_LOG_CAP);
                vec![Effect::Persist]
            }
            Action::Login { email } => {
                self.user = Some(User::demo_with_email(email));
                self.is_authenticated = true;
                vec![Effect::Persist]
            }
            Action::Logout => {
                self.user = None;
                self.is_authenticated = false;
                vec![Effect::Persist]
            }
            Action::SetArMode(on) => {
                self.ar_mode = on;
                Vec::new()
            }
            Action::SetVrMode(on) => {
                self.vr_mode = on;
                Vec::new()
            }
        }
    }

    /// Products matching the selected category and search query.
    ///
    /// Category `all` matches everything; otherwise the product category must
    /// equal the selected slug ignoring case. A non-empty query must appear
    /// in the product name or brand, ignoring case.
    #[must_use]
    pub fn filtered_products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let query = self.search_query.to_lowercase();
        catalog
            .products()
            .iter()
            .filter(|product| {
                let category_ok = self.selected_category == "all"
                    || product
                        .category
                        .eq_ignore_ascii_case(&self.selected_category);
                let query_ok = query.is_empty()
                    || product.name.to_lowercase().contains(&query)
                    || product.brand.to_lowercase().contains(&query);
                category_ok && query_ok
            })
            .collect()
    }

    /// Total units across all cart lines.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart_items.iter().map(|line| line.quantity).sum()
    }

    /// Cart total as price x quantity summed over lines.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart_items.iter().map(CartItem::subtotal).sum()
    }

    /// Dashboard aggregates over the analytics log.
    #[must_use]
    pub fn analytics_stats(&self) -> AnalyticsStats {
        AnalyticsStats::from_events(&self.analytics_events)
    }

    /// Coins to the next tier, 0 with no user or at the top tier.
    #[must_use]
    pub fn coins_to_next_tier(&self) -> i64 {
        self.user.as_ref().map_or(0, User::coins_to_next_tier)
    }

    /// Current coin balance, 0 with no user.
    #[must_use]
    pub fn coin_balance(&self) -> i64 {
        self.user.as_ref().map_or(0, |user| user.shop_coins)
    }
}
