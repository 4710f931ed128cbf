//! Core types for ShopVerse.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod analytics;
pub mod id;
pub mod price;
pub mod product;
pub mod rewards;
pub mod user;

pub use analytics::{AnalyticsEvent, AnalyticsStats, EventPayload, kinds};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{ArKind, CartItem, Product};
pub use rewards::{ActivityKind, RewardActivity};
pub use user::{Order, OrderStatus, Tier, User};
