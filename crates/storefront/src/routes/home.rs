//! Home page route handler.
//!
//! One page composes the whole storefront: hero banner, category filter row,
//! the filtered product grid, and the rewards/analytics sidebar. Category and
//! search are ephemeral state carried in the query string.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopverse_core::catalog::CATEGORIES;
use shopverse_core::store::{Action, StoreState};
use shopverse_core::types::{EventPayload, Price, Product, ProductId, kinds};
use shopverse_core::viewer::PALETTE;

use crate::error::Result;
use crate::filters;
use crate::models::session::{apply_actions, keys, load_store, record_engagement};
use crate::routes::analytics::AnalyticsView;
use crate::routes::rewards::RewardsPanelView;
use crate::state::AppState;

/// Swatches previewed on a product card's hover overlay.
const CARD_SWATCHES: usize = 4;

// =============================================================================
// View Models
// =============================================================================

/// Header display data shared by every page.
#[derive(Clone)]
pub struct HeaderView {
    pub dark_mode: bool,
    pub query: String,
    pub cart_count: u32,
    pub coins: i64,
    pub tier: String,
    /// Signed-in display name; `None` renders the sign-in form.
    pub user_name: Option<String>,
}

impl HeaderView {
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            dark_mode: state.dark_mode,
            query: state.search_query.clone(),
            cart_count: state.cart_count(),
            coins: state.coin_balance(),
            tier: state
                .user
                .as_ref()
                .map(|user| user.tier.to_string())
                .unwrap_or_default(),
            user_name: state
                .user
                .as_ref()
                .filter(|_| state.is_authenticated)
                .map(|user| user.name.clone()),
        }
    }
}

/// One entry in the category filter row.
#[derive(Clone)]
pub struct CategoryView {
    pub slug: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub selected: bool,
}

impl CategoryView {
    /// The full filter row with the active slug marked.
    pub fn row(selected: &str) -> Vec<Self> {
        CATEGORIES
            .iter()
            .map(|category| Self {
                slug: category.slug,
                name: category.name,
                icon: category.icon,
                selected: category.slug == selected,
            })
            .collect()
    }
}

/// Product display data for grid cards.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub discount_percent: Option<u8>,
    /// Five filled/empty flags for the star row.
    pub stars: Vec<bool>,
    pub rating: f32,
    pub reviews: u32,
    pub image: String,
    pub coin_reward: i64,
    pub in_stock: bool,
    pub has_ar: bool,
    pub has_vr: bool,
    pub viewable: bool,
    /// Palette preview on the hover overlay.
    pub swatches: Vec<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let filled = product.rating.round() as i64;
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            original_price: product.original_price,
            discount_percent: product.discount_percent,
            stars: (1..=5).map(|star| star <= filled).collect(),
            rating: product.rating,
            reviews: product.reviews,
            image: product.image.clone(),
            coin_reward: product.coin_reward,
            in_stock: product.in_stock,
            has_ar: product.has_ar,
            has_vr: product.has_vr,
            viewable: product.viewable(),
            swatches: PALETTE
                .iter()
                .take(CARD_SWATCHES)
                .map(|color| color.to_hex())
                .collect(),
        }
    }
}

// =============================================================================
// Static Content
// =============================================================================

/// Hero banner content.
///
/// Static marketing copy, seeded in code the same way the catalog is.
pub struct HeroConfig {
    pub badge: &'static str,
    pub heading: &'static str,
    pub heading_accent: &'static str,
    pub subtitle: &'static str,
    pub pills: &'static [&'static str],
    pub cta: &'static str,
    pub panel_icon: &'static str,
    pub panel_title: &'static str,
    pub panel_subtitle: &'static str,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            badge: "New AR/VR Experience",
            heading: "Shop in the",
            heading_accent: "Future",
            subtitle: "Experience immersive shopping with AR/VR technology. \
                       Try products virtually, earn ShopCoins, and revolutionize \
                       your shopping journey.",
            pills: &["AR Try-On", "VR Shopping", "ShopCoins Rewards"],
            cta: "Start Shopping",
            panel_icon: "\u{1f6d2}",
            panel_title: "Virtual Shopping",
            panel_subtitle: "Experience products before you buy",
        }
    }
}

// =============================================================================
// Query & Template
// =============================================================================

/// Ephemeral filter state carried in the URL.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Shared header state.
    pub header: HeaderView,
    /// Hero banner content.
    pub hero: HeroConfig,
    /// Category filter row.
    pub categories: Vec<CategoryView>,
    /// Products matching the active filters.
    pub products: Vec<ProductCardView>,
    /// Active search query, for the grid heading and empty state.
    pub query: String,
    /// Active category slug, for the empty state.
    pub selected_category: String,
    /// Rewards sidebar panel.
    pub rewards: RewardsPanelView,
    /// Analytics sidebar panel.
    pub analytics: AnalyticsView,
}

// =============================================================================
// Handler
// =============================================================================

/// Display the home page.
#[instrument(skip(state, session, headers))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<HomeQuery>,
) -> Result<HomeTemplate> {
    let mut store = load_store(&session).await;

    let mut actions = Vec::new();
    if let Some(category) = query.category {
        actions.push(Action::SetSelectedCategory(category));
    }
    if let Some(q) = query.q {
        actions.push(Action::SetSearchQuery(q));
    }
    apply_actions(&session, &mut store, actions).await?;

    // The first page of a session records the app lifecycle event.
    let initialized = session
        .get::<bool>(keys::APP_INITIALIZED)
        .await
        .ok()
        .flatten()
        .unwrap_or(false);
    if !initialized {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        record_engagement(
            &session,
            &mut store,
            kinds::APP_INITIALIZED,
            EventPayload::Lifecycle { user_agent },
            None,
        )
        .await?;
        session.insert(keys::APP_INITIALIZED, true).await?;
    }

    let products = store
        .filtered_products(state.catalog())
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Ok(HomeTemplate {
        header: HeaderView::from_state(&store),
        hero: HeroConfig::default(),
        categories: CategoryView::row(&store.selected_category),
        products,
        query: store.search_query.clone(),
        selected_category: store.selected_category.clone(),
        rewards: RewardsPanelView::from_state(&store),
        analytics: AnalyticsView::from_state(&store),
    })
}
