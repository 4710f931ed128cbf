//! Domain models for storefront.
//!
//! Catalog, store, and viewer types live in `shopverse-core`; this module
//! holds what is storefront-specific: the session keys and the helpers that
//! move store records and viewer scenes in and out of the session.

pub mod session;

pub use session::keys as session_keys;
