//! Catalog product and cart line types.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// Which AR presentation a product uses.
///
/// Drives the viewer's instruction copy and the fallback 3D asset when a
/// product ships without its own model URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArKind {
    Furniture,
    Electronics,
    Apparel,
}

impl ArKind {
    /// Stable string form used in analytics payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Electronics => "electronics",
            Self::Apparel => "apparel",
        }
    }
}

impl std::fmt::Display for ArKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product.
///
/// The demo catalog embeds the full record everywhere it travels (cart lines,
/// persisted snapshots) rather than re-resolving by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Pre-discount price, shown struck through when present.
    pub original_price: Option<Price>,
    pub rating: f32,
    pub reviews: u32,
    pub image: String,
    pub images: Vec<String>,
    pub category: String,
    pub brand: String,
    pub description: String,
    pub features: Vec<String>,
    pub in_stock: bool,
    pub discount_percent: Option<u8>,
    /// ShopCoins earned when this product is purchased.
    pub coin_reward: i64,
    pub has_ar: bool,
    pub has_vr: bool,
    /// URL of the glTF/GLB asset backing the 3D preview.
    pub model_url: Option<String>,
    pub ar_kind: Option<ArKind>,
}

impl Product {
    /// Whether the viewer can open this product at all.
    #[must_use]
    pub const fn viewable(&self) -> bool {
        self.has_ar || self.has_vr
    }
}

/// One cart line: a product plus how many of it.
///
/// Quantity is at least 1; an update intent of zero removes the line instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub const fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Line subtotal (price x quantity).
    #[must_use]
    pub fn subtotal(&self) -> rust_decimal::Decimal {
        self.product.price.times(self.quantity)
    }
}
