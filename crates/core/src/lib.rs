//! ShopVerse Core - domain model and state machines.
//!
//! This crate provides the domain logic used across all ShopVerse components:
//! - `storefront` - Server-rendered demo storefront
//! - `integration-tests` - End-to-end request tests
//!
//! # Architecture
//!
//! The core crate contains types, the reactive store, and the viewer state
//! machine - no I/O, no HTTP, no rendering. Environment capabilities
//! (on-device storage, the immersive AR runtime) are traits implemented by
//! hosts, and everything degrades to safe defaults when a capability is
//! missing.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and the catalog/loyalty/analytics domain types
//! - [`catalog`] - The static demo catalog and category row
//! - [`store`] - State struct, action dispatch, selectors, and the persistence codec
//! - [`storage`] - On-device key-value storage seam with in-memory fallback
//! - [`viewer`] - 3D scene, orbit camera, color customization, and the AR session flow
//! - [`capability`] - The availability outcome reported by probes and loaders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod capability;
pub mod catalog;
pub mod storage;
pub mod store;
pub mod types;
pub mod viewer;

pub use capability::Capability;
pub use types::*;
